// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types and the error sink.

use thicket_dom::{DomError, NodeId};
use thicket_events::dispatch::HandlerFailure;
use tracing::{error, warn};

use crate::node::ComponentError;

/// Misuse of call-order state.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum HookError {
    /// The number of state declarations differs from the previous pass.
    #[error("hook order changed: previous pass declared {expected} state slots, this pass {found}")]
    OrderChanged {
        /// Slots declared by the previous pass.
        expected: usize,
        /// Slots declared by this pass.
        found: usize,
    },
    /// A slot was read back with a different type than it was created with.
    #[error("hook slot {slot} does not hold a `{expected}`")]
    TypeMismatch {
        /// Slot index.
        slot: usize,
        /// Type requested by the caller.
        expected: &'static str,
    },
}

/// Failure while expanding components.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The tree nests deeper than the configured limit.
    #[error("resolution exceeded the depth limit of {limit}")]
    DepthExceeded {
        /// Configured limit.
        limit: usize,
    },
    /// A component returned an error.
    #[error("component `{name}` failed")]
    Component {
        /// Component name.
        name: &'static str,
        /// The component's error.
        source: ComponentError,
    },
    /// A component misused state.
    #[error(transparent)]
    Hook(#[from] HookError),
}

/// Reconciliation hit a live tree that does not match the previous resolved tree.
#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    /// A document operation failed.
    #[error(transparent)]
    Dom(#[from] DomError),
    /// A position that should hold a live node is empty.
    #[error("no live node at the patched position under {parent}")]
    MissingLiveNode {
        /// The live parent.
        parent: NodeId,
    },
    /// The live node at a position is not of the expected kind or tag.
    #[error("live node {node} does not match the previous tree")]
    Mismatch {
        /// The mismatching live node.
        node: NodeId,
    },
}

/// Failure of a mount or render pass.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// `render` was called before any `mount`.
    #[error("root is not mounted")]
    NotMounted,
    /// `mount` was called while a pass was running.
    #[error("a render pass is already running on this root")]
    Busy,
    /// Resolution failed.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    /// Call-order check failed at the end of the pass.
    #[error(transparent)]
    Hook(#[from] HookError),
    /// Materialization failed.
    #[error(transparent)]
    Dom(#[from] DomError),
    /// State changes kept scheduling passes.
    #[error("state changes scheduled more than {limit} consecutive render passes")]
    RenderLoop {
        /// Configured limit.
        limit: usize,
    },
}

/// Something that went wrong without stopping the runtime.
#[derive(Debug)]
#[non_exhaustive]
pub enum Incident<'a> {
    /// An event handler returned an error; other handlers still ran.
    Handler(&'a HandlerFailure),
    /// Patching failed and the root content was remounted.
    PatchRecovered(&'a PatchError),
    /// A render requested by a state setter failed.
    Render(&'a RenderError),
}

/// Receives incidents from a root.
///
/// Closures taking an [`Incident`] implement this trait.
pub trait ErrorSink {
    /// Handle one incident.
    fn report(&self, incident: Incident<'_>);
}

impl<F: Fn(Incident<'_>)> ErrorSink for F {
    fn report(&self, incident: Incident<'_>) {
        self(incident);
    }
}

/// The default sink: logs every incident through `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl ErrorSink for TracingSink {
    fn report(&self, incident: Incident<'_>) {
        match incident {
            Incident::Handler(failure) => {
                warn!(node = %failure.node, event = %failure.event, error = %failure.error, "event handler failed");
            }
            Incident::PatchRecovered(err) => {
                warn!(%err, "patch failed; root content remounted");
            }
            Incident::Render(err) => {
                error!(%err, "render failed");
            }
        }
    }
}

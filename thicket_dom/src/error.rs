// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::types::NodeId;

/// Errors raised by document mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// The identifier refers to a released slot.
    #[error("node {0} is no longer alive")]
    Stale(NodeId),
    /// `child` is not a direct child of `parent`.
    #[error("node {child} is not a child of {parent}")]
    NotAChild {
        /// Expected parent.
        parent: NodeId,
        /// Offending node.
        child: NodeId,
    },
    /// The operation needs an element (attributes, styles, properties, listeners).
    #[error("node {0} is not an element")]
    NotAnElement(NodeId),
    /// Inserting `child` under `parent` would create a cycle, or `parent` cannot hold children.
    #[error("cannot insert {child} under {parent}")]
    HierarchyRequest {
        /// Receiving node.
        parent: NodeId,
        /// Node being inserted.
        child: NodeId,
    },
}

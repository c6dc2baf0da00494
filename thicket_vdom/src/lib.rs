// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Thicket VDOM: description trees reconciled onto a Thicket live document.
//!
//! ## Overview
//!
//! - Build immutable description trees with [`create_element`], [`fragment`]
//!   and [`children!`].
//! - Write components as [`Component`]s: functions from [`Props`] to a tree,
//!   with call-order state through [`Scope::use_state`].
//! - Mount a tree with [`Root::mount`]. State setters re-render the root: the
//!   tree is resolved again and the live document is patched positionally.
//!
//! Properties are classified once into a closed [`PropKind`] schema: inline
//! style, ref callback, class, event handler, boolean flag, value, or plain
//! attribute. Click handlers are delegated: bound elements carry a marker
//! attribute and a single document-level listener serves them all.
//!
//! ## Errors
//!
//! Mount and render return [`RenderError`]. Incidents that do not stop the
//! runtime (handler failures, patch recoveries, failed renders requested by
//! setters) go to the root's [`ErrorSink`]; the default sink logs them with
//! `tracing`.
//!
//! ## Example
//!
//! ```
//! use thicket_vdom::{Root, children, create_element};
//!
//! let root = Root::new();
//! let container = root.with_document_mut(|doc| doc.create_element("div"));
//! let list = |items: &[&str]| {
//!     create_element(
//!         "ul",
//!         None,
//!         items
//!             .iter()
//!             .map(|t| create_element("li", None, children![*t]))
//!             .collect::<Vec<_>>(),
//!     )
//! };
//! root.mount(list(&["a", "b"]), container).unwrap();
//! assert_eq!(
//!     root.with_document(|doc| doc.to_html(container)),
//!     "<div><ul><li>a</li><li>b</li></ul></div>"
//! );
//! ```

mod apply;
mod error;
mod hooks;
mod node;
mod patch;
mod props;
mod render;
mod resolve;
mod root;

pub use error::{ErrorSink, HookError, Incident, PatchError, RenderError, ResolveError, TracingSink};
pub use hooks::{Scope, Setter, State};
pub use node::{
    Child, Component, ComponentError, ComponentResult, FRAGMENT, Node, NodeType, VNode,
    create_element, fragment, text,
};
pub use props::{PropEntry, PropKind, PropValue, Props, RefCallback, StyleMap, hyphenate};
pub use resolve::{Resolved, ResolvedElement, Tag, resolve};
pub use root::{RenderStats, Root, RootConfig, RootRef};

pub use thicket_dom::{Document, Event, HandlerError, HandlerResult, NodeId};
pub use thicket_events::dispatch::{DispatchReport, HandlerFailure};
pub use thicket_events::registry::DelegationConfig;

// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Thicket DOM: a generational, arena-backed live document.
//!
//! Thicket DOM is the "live" half of the Thicket stack: the materialized
//! counterpart of a resolved description tree. It is deliberately small.
//!
//! - Represents elements, text leaves and transparent fragments linked into ordered trees.
//! - Elements carry attributes, inline style declarations, live properties
//!   (`value` and [`ElementFlags`]) and direct event [`Listener`]s.
//! - Every mutation bumps [`Document::epoch`], so callers can assert that a
//!   reconciliation pass touched nothing.
//!
//! ## Where this fits
//!
//! - Description tree: immutable virtual nodes (`thicket_vdom`).
//! - Live document: this crate.
//! - Event routing and delegation: `thicket_events`.
//!
//! ## API overview
//!
//! - [`Document`]: container managing nodes.
//! - [`NodeId`]: generational handle of a node.
//! - [`NodeKind`]: element, text or fragment.
//! - [`Event`] and [`Listener`]: what travels through the document and who receives it.
//! - [`DomError`]: failures of structural and element operations.
//!
//! ### Minimal usage
//!
//! ```
//! use thicket_dom::Document;
//!
//! let mut doc = Document::new();
//! let ul = doc.create_element("ul");
//! for label in ["a", "b"] {
//!     let li = doc.create_element("li");
//!     let text = doc.create_text(label);
//!     doc.append_child(li, text).unwrap();
//!     doc.append_child(ul, li).unwrap();
//! }
//! assert_eq!(doc.to_html(ul), "<ul><li>a</li><li>b</li></ul>");
//!
//! // Removing a node releases its subtree; the old id goes stale.
//! let first = doc.child_at(ul, 0).unwrap();
//! doc.remove_child(ul, first).unwrap();
//! assert!(!doc.is_alive(first));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod document;
mod error;
mod event;
mod html;
mod style;
mod types;

pub use document::Document;
pub use error::DomError;
pub use event::{Event, HandlerError, HandlerResult, Listener};
pub use types::{ElementFlags, NodeId, NodeKind};

// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Thicket Events: propagation and click delegation over a Thicket live document.
//!
//! ## Overview
//!
//! This crate decides which listeners an event reaches and in what order. It
//! has two parts:
//!
//! - [`path`]: the bubble path of a target (the target, then its ancestors)
//!   and the nearest marked ancestor lookup, both read off the
//!   [`Document`](thicket_dom::Document).
//! - [`registry`]: the delegation registry. One document-level listener
//!   serves a whole category (click by default): bound elements carry a marker
//!   attribute whose identifier selects the handler, so a deep tree of
//!   clickable nodes costs no native listeners at all.
//!
//! [`dispatch`] ties them together: it plans delivery under a shared document
//! borrow and then runs the handlers with no borrow held.
//!
//! ## Workflow
//!
//! ```
//! use std::rc::Rc;
//! use thicket_dom::{Document, Event, HandlerResult, NodeId};
//! use thicket_events::dispatch::plan;
//! use thicket_events::registry::DelegationRegistry;
//!
//! let mut doc = Document::new();
//! let button = doc.create_element("button");
//! let label = doc.create_text("+");
//! doc.append_child(button, label).unwrap();
//!
//! let mut registry = DelegationRegistry::default();
//! registry
//!     .bind(&mut doc, button, Rc::new(|_: &Event, _: NodeId| -> HandlerResult { Ok(()) }))
//!     .unwrap();
//!
//! // A click on the label is served by the button's delegated handler.
//! let event = Event::click(label);
//! let report = plan(&doc, &registry, &event).run(&event);
//! assert_eq!(report.invoked, 1);
//! ```

#![no_std]

extern crate alloc;

pub mod dispatch;
pub mod path;
pub mod registry;

// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Events and listeners.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use core::cell::Cell;

use kurbo::Point;

use crate::types::NodeId;

/// Error returned by a failing listener.
pub type HandlerError = Box<dyn core::error::Error>;

/// Result of a listener invocation.
pub type HandlerResult = Result<(), HandlerError>;

/// A shared event listener.
///
/// Receives the event and the node the listener was matched on (the current
/// target for direct listeners, the marked ancestor for delegated ones).
/// Listener identity is pointer identity of the `Rc`.
pub type Listener = Rc<dyn Fn(&Event, NodeId) -> HandlerResult>;

/// An event travelling through the document.
#[derive(Debug)]
pub struct Event {
    name: String,
    target: NodeId,
    position: Point,
    default_prevented: Cell<bool>,
    propagation_stopped: Cell<bool>,
}

impl Event {
    /// Create an event of category `name` aimed at `target`.
    pub fn new(name: impl Into<String>, target: NodeId) -> Self {
        Self {
            name: name.into(),
            target,
            position: Point::ORIGIN,
            default_prevented: Cell::new(false),
            propagation_stopped: Cell::new(false),
        }
    }

    /// Shorthand for a `click` event.
    pub fn click(target: NodeId) -> Self {
        Self::new("click", target)
    }

    /// Attach a pointer position.
    #[must_use]
    pub fn at(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    /// Event category, for example `click` or `input`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Node the event was aimed at.
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Pointer position in document space; the origin when not a pointer event.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Mark the default action as cancelled.
    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    /// Whether [`Event::prevent_default`] was called.
    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }

    /// Stop delivery to further nodes. Listeners on the current node still run.
    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    /// Whether [`Event::stop_propagation`] was called.
    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }
}

// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatch planning and delivery.
//!
//! ## Overview
//!
//! Delivery is split in two so that handlers never run while the document is
//! borrowed:
//!
//! 1) [`plan`] walks the bubble path of the event target with a shared
//!    borrow of the document and collects the listeners to call: the direct
//!    listeners of the target and of every ancestor, followed by the
//!    document-level delegated listener when the event belongs to the
//!    registry's category.
//! 2) [`DispatchPlan::run`] calls them in order. Handlers are free to mutate
//!    state and trigger re-renders.
//!
//! ## Failures
//!
//! A failing handler is recorded in the [`DispatchReport`] and delivery
//! continues with the next listener. [`Event::stop_propagation`] ends delivery
//! once the listeners of the current node have run; the delegated listener
//! sits at document level, so stopping propagation on any element suppresses it.

use alloc::string::String;
use alloc::vec::Vec;

use thicket_dom::{Document, Event, HandlerError, Listener, NodeId};
use tracing::debug;

use crate::path::bubble_path;
use crate::registry::DelegationRegistry;

/// Where a planned listener sits on the propagation path.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Level {
    /// A direct listener on this node.
    Node(NodeId),
    /// The document-level delegated listener, matched on this node.
    Delegated(NodeId),
}

impl Level {
    /// The node the listener is invoked with.
    pub fn node(self) -> NodeId {
        match self {
            Self::Node(n) | Self::Delegated(n) => n,
        }
    }
}

struct Step {
    level: Level,
    listener: Listener,
}

/// Listeners selected for one event, in delivery order.
pub struct DispatchPlan {
    steps: Vec<Step>,
}

impl core::fmt::Debug for DispatchPlan {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list()
            .entries(self.steps.iter().map(|s| s.level))
            .finish()
    }
}

/// A listener that returned an error.
#[derive(Debug, thiserror::Error)]
#[error("`{event}` handler on {node} failed: {error}")]
pub struct HandlerFailure {
    /// Node the failing listener was invoked with.
    pub node: NodeId,
    /// Event category.
    pub event: String,
    /// The handler's error.
    #[source]
    pub error: HandlerError,
}

/// Outcome of running a [`DispatchPlan`].
#[derive(Debug, Default)]
pub struct DispatchReport {
    /// Number of listeners called, including failing ones.
    pub invoked: usize,
    /// Listeners that returned an error.
    pub failures: Vec<HandlerFailure>,
}

impl DispatchReport {
    /// Whether every invoked listener succeeded.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Collect the listeners `event` reaches in `doc`.
pub fn plan(doc: &Document, registry: &DelegationRegistry, event: &Event) -> DispatchPlan {
    let mut steps = Vec::new();
    if !doc.is_alive(event.target()) {
        return DispatchPlan { steps };
    }
    for node in bubble_path(doc, event.target()) {
        for listener in doc.listeners(node, event.name()) {
            steps.push(Step {
                level: Level::Node(node),
                listener,
            });
        }
    }
    if event.name() == registry.category()
        && let Some((node, listener)) = registry.lookup(doc, event.target())
    {
        steps.push(Step {
            level: Level::Delegated(node),
            listener,
        });
    }
    DispatchPlan { steps }
}

impl DispatchPlan {
    /// Number of listeners selected.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether no listener was selected.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Levels in delivery order.
    pub fn levels(&self) -> impl Iterator<Item = Level> + '_ {
        self.steps.iter().map(|s| s.level)
    }

    /// Call every selected listener, honoring [`Event::stop_propagation`].
    pub fn run(self, event: &Event) -> DispatchReport {
        let mut report = DispatchReport::default();
        let mut current: Option<Level> = None;
        for step in self.steps {
            if event.propagation_stopped() && current != Some(step.level) {
                debug!(event = event.name(), "propagation stopped");
                break;
            }
            current = Some(step.level);
            let node = step.level.node();
            report.invoked += 1;
            if let Err(error) = (step.listener)(event, node) {
                debug!(event = event.name(), %node, %error, "handler failed");
                report.failures.push(HandlerFailure {
                    node,
                    event: String::from(event.name()),
                    error,
                });
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::RefCell;
    use thicket_dom::HandlerResult;

    type Log = Rc<RefCell<Vec<&'static str>>>;

    fn recorder(log: &Log, label: &'static str) -> Listener {
        let log = log.clone();
        Rc::new(move |_: &Event, _: NodeId| -> HandlerResult {
            log.borrow_mut().push(label);
            Ok(())
        })
    }

    fn tree() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let outer = doc.create_element("div");
        let button = doc.create_element("button");
        let label = doc.create_text("go");
        doc.append_child(outer, button).unwrap();
        doc.append_child(button, label).unwrap();
        (doc, outer, button, label)
    }

    #[test]
    fn direct_listeners_bubble_then_delegated_runs() {
        let (mut doc, outer, button, label) = tree();
        let log: Log = Rc::default();
        let mut reg = DelegationRegistry::default();
        doc.add_event_listener(outer, "click", recorder(&log, "outer"))
            .unwrap();
        doc.add_event_listener(button, "click", recorder(&log, "button"))
            .unwrap();
        reg.bind(&mut doc, button, recorder(&log, "delegated"))
            .unwrap();

        let ev = Event::click(label);
        let report = plan(&doc, &reg, &ev).run(&ev);
        assert_eq!(report.invoked, 3);
        assert!(report.is_clean());
        assert_eq!(*log.borrow(), vec!["button", "outer", "delegated"]);
    }

    #[test]
    fn delegated_handler_receives_matched_element() {
        let (mut doc, _outer, button, label) = tree();
        let seen = Rc::new(RefCell::new(None));
        let mut reg = DelegationRegistry::default();
        let sink = seen.clone();
        reg.bind(
            &mut doc,
            button,
            Rc::new(move |ev: &Event, el: NodeId| -> HandlerResult {
                *sink.borrow_mut() = Some((ev.target(), el));
                Ok(())
            }),
        )
        .unwrap();
        let ev = Event::click(label);
        plan(&doc, &reg, &ev).run(&ev);
        assert_eq!(*seen.borrow(), Some((label, button)));
    }

    #[test]
    fn failing_handler_does_not_stop_others() {
        let (mut doc, outer, button, label) = tree();
        let log: Log = Rc::default();
        let reg = DelegationRegistry::default();
        doc.add_event_listener(
            button,
            "click",
            Rc::new(|_: &Event, _: NodeId| -> HandlerResult { Err("boom".into()) }),
        )
        .unwrap();
        doc.add_event_listener(outer, "click", recorder(&log, "outer"))
            .unwrap();
        let ev = Event::click(label);
        let report = plan(&doc, &reg, &ev).run(&ev);
        assert_eq!(report.invoked, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].node, button);
        assert_eq!(*log.borrow(), vec!["outer"]);
    }

    #[test]
    fn stop_propagation_skips_ancestors_and_delegation() {
        let (mut doc, outer, button, label) = tree();
        let log: Log = Rc::default();
        let mut reg = DelegationRegistry::default();
        doc.add_event_listener(
            button,
            "click",
            Rc::new(|ev: &Event, _: NodeId| -> HandlerResult {
                ev.stop_propagation();
                Ok(())
            }),
        )
        .unwrap();
        doc.add_event_listener(button, "click", recorder(&log, "button-2"))
            .unwrap();
        doc.add_event_listener(outer, "click", recorder(&log, "outer"))
            .unwrap();
        reg.bind(&mut doc, outer, recorder(&log, "delegated"))
            .unwrap();
        let ev = Event::click(label);
        plan(&doc, &reg, &ev).run(&ev);
        assert_eq!(*log.borrow(), vec!["button-2"]);
    }

    #[test]
    fn other_categories_skip_delegation() {
        let (mut doc, _outer, button, label) = tree();
        let log: Log = Rc::default();
        let mut reg = DelegationRegistry::default();
        reg.bind(&mut doc, button, recorder(&log, "delegated"))
            .unwrap();
        let ev = Event::new("mousedown", label);
        let p = plan(&doc, &reg, &ev);
        assert!(p.is_empty());
    }

    #[test]
    fn stale_target_plans_nothing() {
        let (mut doc, outer, button, _label) = tree();
        let mut reg = DelegationRegistry::default();
        reg.bind(&mut doc, button, recorder(&Log::default(), "x"))
            .unwrap();
        doc.remove_child(outer, button).unwrap();
        let ev = Event::click(button);
        assert!(plan(&doc, &reg, &ev).is_empty());
    }
}

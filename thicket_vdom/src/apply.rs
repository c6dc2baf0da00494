// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property applier.
//!
//! Brings a live element from the state described by one property map to the
//! state described by another, one [`PropKind`] rule at a time:
//!
//! 1. Removal pass: entries of the old map that are missing from the new map,
//!    or whose kind changed, are unwound with the inverse of their rule.
//! 2. Update pass: entries of the new map are applied. Entries equal to their
//!    old counterpart are skipped, except refs, which run on every application.

use std::collections::HashMap;

use thicket_dom::{Document, DomError, Listener, NodeId};
use thicket_events::registry::DelegationRegistry;
use tracing::debug;

use crate::props::{PropEntry, PropKind, PropValue, Props, hyphenate};

/// Direct listeners attached by the applier, per element and event.
pub(crate) type ListenerTable = HashMap<NodeId, HashMap<String, Listener>>;

/// Mutable view of the live state of one root.
pub(crate) struct LiveCx<'a> {
    pub(crate) doc: &'a mut Document,
    pub(crate) registry: &'a mut DelegationRegistry,
    pub(crate) listeners: &'a mut ListenerTable,
}

impl LiveCx<'_> {
    /// Forget delegated handlers and listener entries of a subtree about to be released.
    pub(crate) fn teardown(&mut self, root: NodeId) {
        self.registry.discard_subtree(self.doc, root);
        for node in self.doc.descendants(root) {
            self.listeners.remove(&node);
        }
    }

    /// Tear down and release `root` with its subtree, attached or not.
    pub(crate) fn discard(&mut self, root: NodeId) {
        self.teardown(root);
        self.doc.remove(root);
    }

    /// Tear down and release every child of `container`.
    pub(crate) fn clear_container(&mut self, container: NodeId) -> Result<(), DomError> {
        for child in self.doc.children(container).to_vec() {
            self.teardown(child);
        }
        self.doc.clear_children(container)
    }
}

/// Reconcile the properties of `el` from `old` to `new`. `None` stands for an empty map.
pub(crate) fn apply_props(
    cx: &mut LiveCx<'_>,
    el: NodeId,
    old: Option<&Props>,
    new: Option<&Props>,
) -> Result<(), DomError> {
    let empty = Props::default();
    let old = old.unwrap_or(&empty);
    let new = new.unwrap_or(&empty);

    for entry in old.iter() {
        let kept = new
            .entry(entry.key())
            .is_some_and(|n| n.kind() == entry.kind());
        if !kept {
            unwind(cx, el, entry)?;
        }
    }

    for entry in new.iter() {
        let previous = old
            .entry(entry.key())
            .filter(|p| p.kind() == entry.kind());
        if let Some(p) = previous
            && p.value() == entry.value()
            && *entry.kind() != PropKind::Ref
        {
            continue;
        }
        apply(cx, el, previous, entry)?;
    }
    Ok(())
}

fn unwind(cx: &mut LiveCx<'_>, el: NodeId, entry: &PropEntry) -> Result<(), DomError> {
    match entry.kind() {
        PropKind::Style => clear_style(cx.doc, el, entry.value())?,
        PropKind::Ref => {}
        PropKind::Class => {
            cx.doc.remove_attribute(el, "class")?;
        }
        PropKind::Event(name) => {
            if name == cx.registry.category() {
                cx.registry.unbind(cx.doc, el)?;
            } else if let Some(old) = cx
                .listeners
                .get_mut(&el)
                .and_then(|per_event| per_event.remove(name))
            {
                cx.doc.remove_event_listener(el, name, &old)?;
            }
        }
        PropKind::Flag(flag) => guarded(el, "flag", cx.doc.set_flag(el, *flag, false)),
        PropKind::Value => guarded(el, "value", cx.doc.set_value(el, "")),
        PropKind::Attr => {
            cx.doc.remove_attribute(el, entry.key())?;
        }
    }
    Ok(())
}

fn apply(
    cx: &mut LiveCx<'_>,
    el: NodeId,
    previous: Option<&PropEntry>,
    entry: &PropEntry,
) -> Result<(), DomError> {
    match (entry.kind(), entry.value()) {
        (PropKind::Style, value) => apply_style(cx.doc, el, previous.map(PropEntry::value), value)?,
        (PropKind::Ref, PropValue::Ref(callback)) => callback(&mut *cx.doc, el),
        (PropKind::Class, value) => match value.attr_text() {
            Some(class) => cx.doc.set_attribute(el, "class", &class)?,
            None => {
                cx.doc.remove_attribute(el, "class")?;
            }
        },
        (PropKind::Event(name), PropValue::Handler(handler)) => {
            if name == cx.registry.category() {
                cx.registry.bind(cx.doc, el, handler.clone())?;
            } else {
                let stale = cx
                    .listeners
                    .entry(el)
                    .or_default()
                    .insert(name.clone(), handler.clone());
                if let Some(stale) = stale {
                    cx.doc.remove_event_listener(el, name, &stale)?;
                }
                cx.doc.add_event_listener(el, name, handler.clone())?;
            }
        }
        (PropKind::Flag(flag), value) => {
            guarded(el, "flag", cx.doc.set_flag(el, *flag, value.is_truthy()));
        }
        (PropKind::Value, value) => {
            let text = value.display_text().unwrap_or_default();
            guarded(el, "value", cx.doc.set_value(el, &text));
        }
        (PropKind::Attr, value) => match value.attr_text() {
            Some(text) => cx.doc.set_attribute(el, entry.key(), &text)?,
            None => {
                cx.doc.remove_attribute(el, entry.key())?;
            }
        },
        // Ref and Event kinds are only assigned to callback values.
        (PropKind::Ref | PropKind::Event(_), _) => {}
    }
    Ok(())
}

fn apply_style(
    doc: &mut Document,
    el: NodeId,
    previous: Option<&PropValue>,
    value: &PropValue,
) -> Result<(), DomError> {
    match value {
        PropValue::Str(css) => doc.set_attribute(el, "style", css),
        PropValue::Style(map) => {
            match previous {
                Some(PropValue::Style(old)) => {
                    for (key, _) in old.iter() {
                        if map.get(key).is_none() {
                            doc.remove_style_property(el, &hyphenate(key))?;
                        }
                    }
                }
                Some(other) => clear_style(doc, el, other)?,
                None => {}
            }
            for (key, v) in map.iter() {
                doc.set_style_property(el, &hyphenate(key), v)?;
            }
            Ok(())
        }
        _ => {
            doc.remove_attribute(el, "style")?;
            Ok(())
        }
    }
}

fn clear_style(doc: &mut Document, el: NodeId, value: &PropValue) -> Result<(), DomError> {
    match value {
        PropValue::Style(map) => {
            for (key, _) in map.iter() {
                doc.remove_style_property(el, &hyphenate(key))?;
            }
        }
        _ => {
            doc.remove_attribute(el, "style")?;
        }
    }
    Ok(())
}

/// Live property writes never abort reconciliation.
fn guarded(el: NodeId, what: &'static str, result: Result<(), DomError>) {
    if let Err(err) = result {
        debug!(%el, what, %err, "live property write ignored");
    }
}

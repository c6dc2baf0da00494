// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Click delegation registry.
//!
//! ## Overview
//!
//! Instead of one native listener per interactive element, a delegated
//! category is served by a single document-level listener. Binding a handler
//! stores a fresh identifier in a marker attribute on the element and records
//! the identifier → handler mapping here. On dispatch, the nearest inclusive
//! ancestor of the target that carries the marker selects the handler.
//!
//! ## Invariants
//!
//! - Every live element carrying the marker has exactly one table entry.
//! - Re-binding an element first discards its previous identifier and entry.
//! - Unbinding removes the table entry first, then the marker attribute.
//! - Identifiers are never reused while the registry lives.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use thicket_dom::{Document, DomError, Listener, NodeId};
use tracing::debug;

use crate::path::closest_marked;

/// Which category is delegated and which attribute marks bound elements.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DelegationConfig {
    /// Event category served by the document-level listener.
    pub category: String,
    /// Attribute holding the delegation identifier.
    pub marker_attribute: String,
}

impl Default for DelegationConfig {
    fn default() -> Self {
        Self {
            category: String::from("click"),
            marker_attribute: String::from("data-click-id"),
        }
    }
}

/// Identifier → handler table for one delegated category.
pub struct DelegationRegistry {
    config: DelegationConfig,
    handlers: BTreeMap<String, Listener>,
    next_id: u64,
}

impl fmt::Debug for DelegationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelegationRegistry")
            .field("config", &self.config)
            .field("handlers", &self.handlers.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

impl Default for DelegationRegistry {
    fn default() -> Self {
        Self::new(DelegationConfig::default())
    }
}

impl DelegationRegistry {
    /// Create an empty registry.
    pub fn new(config: DelegationConfig) -> Self {
        Self {
            config,
            handlers: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// The delegated event category.
    pub fn category(&self) -> &str {
        &self.config.category
    }

    /// The marker attribute name.
    pub fn marker_attribute(&self) -> &str {
        &self.config.marker_attribute
    }

    /// Number of bound handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no handler is bound.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Whether an identifier is present in the table.
    pub fn contains(&self, id: &str) -> bool {
        self.handlers.contains_key(id)
    }

    /// Identifier currently bound to `el`.
    pub fn handler_id(&self, doc: &Document, el: NodeId) -> Option<String> {
        doc.attribute(el, &self.config.marker_attribute)
    }

    /// Bind `handler` to `el`, replacing any previous binding. Returns the fresh identifier.
    pub fn bind(
        &mut self,
        doc: &mut Document,
        el: NodeId,
        handler: Listener,
    ) -> Result<String, DomError> {
        self.unbind(doc, el)?;
        let id = self.fresh_id();
        doc.set_attribute(el, &self.config.marker_attribute, &id)?;
        self.handlers.insert(id.clone(), handler);
        debug!(%el, id = %id, category = %self.config.category, "delegated handler bound");
        Ok(id)
    }

    /// Remove the binding of `el`. Returns whether one existed.
    pub fn unbind(&mut self, doc: &mut Document, el: NodeId) -> Result<bool, DomError> {
        let Some(id) = self.handler_id(doc, el) else {
            return Ok(false);
        };
        self.handlers.remove(&id);
        doc.remove_attribute(el, &self.config.marker_attribute)?;
        debug!(%el, id = %id, "delegated handler unbound");
        Ok(true)
    }

    /// Drop the table entries of every marked node in the subtree of `root`.
    ///
    /// The markers themselves are left in place; this is meant to run right
    /// before the subtree is released. Returns the number of entries dropped.
    pub fn discard_subtree(&mut self, doc: &Document, root: NodeId) -> usize {
        let mut dropped = 0;
        for node in doc.descendants(root) {
            if let Some(id) = self.handler_id(doc, node)
                && self.handlers.remove(&id).is_some()
            {
                dropped += 1;
            }
        }
        if dropped > 0 {
            debug!(%root, dropped, "delegated handlers discarded with subtree");
        }
        dropped
    }

    /// Handler for an event aimed at `target`: the nearest marked inclusive ancestor and its handler.
    pub fn lookup(&self, doc: &Document, target: NodeId) -> Option<(NodeId, Listener)> {
        let el = closest_marked(doc, target, &self.config.marker_attribute)?;
        let id = self.handler_id(doc, el)?;
        self.handlers.get(&id).map(|h| (el, h.clone()))
    }

    fn fresh_id(&mut self) -> String {
        self.next_id += 1;
        base36(self.next_id)
    }
}

fn base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut buf = Vec::new();
    loop {
        #[allow(clippy::cast_possible_truncation, reason = "remainder is below 36.")]
        buf.push(DIGITS[(n % 36) as usize]);
        n /= 36;
        if n == 0 {
            break;
        }
    }
    buf.iter().rev().map(|&b| char::from(b)).collect()
}

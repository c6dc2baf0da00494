// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core document implementation: structure, mutation, queries.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;

use crate::error::DomError;
use crate::event::Listener;
use crate::style::Declarations;
use crate::types::{ElementFlags, NodeId, NodeKind};

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Live document: an arena of nodes linked into trees.
///
/// Nodes are created detached and become part of a tree through
/// [`append_child`](Self::append_child), [`insert_before`](Self::insert_before) or
/// [`replace_child`](Self::replace_child). Any node without a parent is a root;
/// a mount container is simply a root element created by the host.
pub struct Document {
    nodes: Vec<Option<Node>>, // slots
    generations: Vec<u32>,    // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    epoch: u64,
}

impl core::fmt::Debug for Document {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        let free = self.free_list.len();
        f.debug_struct("Document")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &free)
            .field("epoch", &self.epoch)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub(crate) struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    pub(crate) data: NodeData,
}

#[derive(Clone)]
pub(crate) enum NodeData {
    Element(Element),
    Text(String),
    Fragment,
}

#[derive(Clone, Default)]
pub(crate) struct Element {
    pub(crate) tag: String,
    pub(crate) attributes: Vec<(String, String)>,
    pub(crate) style: Declarations,
    value: String,
    flags: ElementFlags,
    listeners: Vec<(String, Listener)>,
}

const STYLE: &str = "style";

impl Node {
    fn new(generation: u32, data: NodeData) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            data,
        }
    }
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            epoch: 0,
        }
    }

    /// Mutation counter. Bumped once by every call that changes the document;
    /// writes that leave the state as it was do not bump it.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free_list.len()
    }

    /// Whether the document holds no live nodes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // --- creation ---

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(NodeData::Element(Element {
            tag: String::from(tag),
            ..Element::default()
        }))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.alloc(NodeData::Text(String::from(text)))
    }

    /// Create a detached fragment.
    pub fn create_fragment(&mut self) -> NodeId {
        self.alloc(NodeData::Fragment)
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        self.epoch += 1;
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, data));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, data)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        NodeId::new(idx, generation)
    }

    // --- structure ---

    /// Append `child` as the last child of `parent`, moving it from any previous parent.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` into `parent` before `reference`, or last when `reference` is `None`.
    ///
    /// A child that already has a parent is moved.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<(), DomError> {
        self.check_insert(parent, child)?;
        if let Some(r) = reference
            && self.node(r)?.parent != Some(parent)
        {
            return Err(DomError::NotAChild { parent, child: r });
        }
        if reference == Some(child) {
            return Ok(());
        }
        self.unlink(child);
        let siblings = &mut self.node_mut(parent)?.children;
        let at = match reference {
            Some(r) => siblings.iter().position(|c| *c == r).unwrap_or(siblings.len()),
            None => siblings.len(),
        };
        siblings.insert(at, child);
        self.node_mut(child)?.parent = Some(parent);
        self.epoch += 1;
        Ok(())
    }

    /// Put `new_child` where `old_child` is and release `old_child` with its subtree.
    pub fn replace_child(
        &mut self,
        parent: NodeId,
        new_child: NodeId,
        old_child: NodeId,
    ) -> Result<(), DomError> {
        if self.node(old_child)?.parent != Some(parent) {
            return Err(DomError::NotAChild {
                parent,
                child: old_child,
            });
        }
        if new_child == old_child {
            return Ok(());
        }
        self.check_insert(parent, new_child)?;
        self.unlink(new_child);
        let siblings = &mut self.node_mut(parent)?.children;
        if let Some(slot) = siblings.iter_mut().find(|c| **c == old_child) {
            *slot = new_child;
        }
        self.node_mut(new_child)?.parent = Some(parent);
        self.node_mut(old_child)?.parent = None;
        self.release(old_child);
        self.epoch += 1;
        Ok(())
    }

    /// Remove `child` from `parent` and release it with its subtree.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if self.node(child)?.parent != Some(parent) {
            return Err(DomError::NotAChild { parent, child });
        }
        self.remove(child);
        Ok(())
    }

    /// Release every child of `parent` (the `innerHTML = ""` operation).
    pub fn clear_children(&mut self, parent: NodeId) -> Result<(), DomError> {
        let children = core::mem::take(&mut self.node_mut(parent)?.children);
        if children.is_empty() {
            return Ok(());
        }
        for child in children {
            if let Ok(n) = self.node_mut(child) {
                n.parent = None;
            }
            self.release(child);
        }
        self.epoch += 1;
        Ok(())
    }

    /// Unlink a node from its parent without releasing it.
    pub fn detach(&mut self, id: NodeId) -> Result<(), DomError> {
        if self.node(id)?.parent.is_some() {
            self.unlink(id);
            self.epoch += 1;
        }
        Ok(())
    }

    /// Remove a node (and its subtree) from the document. Stale ids are ignored.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        self.unlink(id);
        self.release(id);
        self.epoch += 1;
    }

    fn release(&mut self, id: NodeId) {
        let Some(slot) = self.nodes.get_mut(id.idx()) else {
            return;
        };
        if slot.as_ref().is_none_or(|n| n.generation != id.1) {
            return;
        }
        let Some(node) = slot.take() else {
            return;
        };
        for child in node.children {
            self.release(child);
        }
        self.free_list.push(id.idx());
    }

    fn unlink(&mut self, id: NodeId) {
        let Some(parent) = self.node(id).ok().and_then(|n| n.parent) else {
            return;
        };
        if let Ok(p) = self.node_mut(parent) {
            p.children.retain(|c| *c != id);
        }
        if let Ok(n) = self.node_mut(id) {
            n.parent = None;
        }
    }

    fn check_insert(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let parent_node = self.node(parent)?;
        self.node(child)?;
        if matches!(parent_node.data, NodeData::Text(_)) || self.is_inclusive_ancestor(child, parent)
        {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        Ok(())
    }

    fn is_inclusive_ancestor(&self, ancestor: NodeId, mut id: NodeId) -> bool {
        loop {
            if id == ancestor {
                return true;
            }
            match self.parent(id) {
                Some(p) => id = p,
                None => return false,
            }
        }
    }

    // --- queries ---

    /// Returns true if `id` refers to a live node.
    ///
    /// A `NodeId` is considered live if its slot exists and its generation matches
    /// the current generation stored in that slot.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .is_some_and(|n| n.generation == id.1)
    }

    /// Kind of a live node.
    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.node(id).ok().map(|n| match n.data {
            NodeData::Element(_) => NodeKind::Element,
            NodeData::Text(_) => NodeKind::Text,
            NodeData::Fragment => NodeKind::Fragment,
        })
    }

    /// Tag name of an element.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).ok().map(|e| e.tag.as_str())
    }

    /// Content of a text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).ok()?.data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Parent of a node, if attached.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).ok()?.parent
    }

    /// Children of a node in order; empty for stale ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Child at `index`.
    pub fn child_at(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.children(id).get(index).copied()
    }

    /// Path from the topmost ancestor to `id` (inclusive).
    pub fn path_to_root(&self, mut id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.is_alive(id) {
            return out;
        }
        loop {
            out.push(id);
            match self.parent(id) {
                Some(p) => id = p,
                None => break,
            }
        }
        out.reverse();
        out
    }

    /// Nearest inclusive ancestor of `id` satisfying `pred`.
    pub fn closest(&self, id: NodeId, pred: impl Fn(&Self, NodeId) -> bool) -> Option<NodeId> {
        let mut cur = self.is_alive(id).then_some(id)?;
        loop {
            if pred(self, cur) {
                return Some(cur);
            }
            cur = self.parent(cur)?;
        }
    }

    /// `id` and all its descendants in document (pre-)order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.is_alive(id) {
            return out;
        }
        let mut stack = alloc::vec![id];
        while let Some(cur) = stack.pop() {
            out.push(cur);
            stack.extend(self.children(cur).iter().rev().copied());
        }
        out
    }

    // --- attributes ---

    /// Value of an attribute. `style` is serialized from the inline declarations.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<String> {
        let el = self.element(id).ok()?;
        if name == STYLE {
            return (!el.style.is_empty()).then(|| el.style.serialize());
        }
        el.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    }

    /// Whether an attribute is present.
    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.attribute(id, name).is_some()
    }

    /// All attributes in insertion order, with `style` last when present.
    pub fn attributes(&self, id: NodeId) -> Vec<(String, String)> {
        let Ok(el) = self.element(id) else {
            return Vec::new();
        };
        let mut out = el.attributes.clone();
        if !el.style.is_empty() {
            out.push((String::from(STYLE), el.style.serialize()));
        }
        out
    }

    /// Set an attribute. Setting `style` replaces every inline declaration.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let el = self.element_mut(id)?;
        let changed = if name == STYLE {
            let next = Declarations::parse(value);
            let changed = el.style != next;
            el.style = next;
            changed
        } else if let Some((_, v)) = el.attributes.iter_mut().find(|(n, _)| n == name) {
            let changed = v != value;
            if changed {
                *v = String::from(value);
            }
            changed
        } else {
            el.attributes.push((String::from(name), String::from(value)));
            true
        };
        if changed {
            self.epoch += 1;
        }
        Ok(())
    }

    /// Remove an attribute. Returns whether it was present.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Result<bool, DomError> {
        let el = self.element_mut(id)?;
        let removed = if name == STYLE {
            let had = !el.style.is_empty();
            el.style = Declarations::default();
            had
        } else {
            let before = el.attributes.len();
            el.attributes.retain(|(n, _)| n != name);
            el.attributes.len() != before
        };
        if removed {
            self.epoch += 1;
        }
        Ok(removed)
    }

    // --- inline style ---

    /// Value of one inline style declaration (hyphenated property name).
    pub fn style_property(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).ok()?.style.get(name)
    }

    /// Set one inline style declaration.
    pub fn set_style_property(
        &mut self,
        id: NodeId,
        name: &str,
        value: &str,
    ) -> Result<(), DomError> {
        if self.element_mut(id)?.style.set(name, value) {
            self.epoch += 1;
        }
        Ok(())
    }

    /// Clear one inline style declaration. Returns whether it was present.
    pub fn remove_style_property(&mut self, id: NodeId, name: &str) -> Result<bool, DomError> {
        let removed = self.element_mut(id)?.style.remove(name);
        if removed {
            self.epoch += 1;
        }
        Ok(removed)
    }

    // --- live properties ---

    /// The `value` property of an element.
    pub fn value(&self, id: NodeId) -> Option<&str> {
        self.element(id).ok().map(|e| e.value.as_str())
    }

    /// Set the `value` property. Attributes are left untouched.
    pub fn set_value(&mut self, id: NodeId, value: &str) -> Result<(), DomError> {
        let el = self.element_mut(id)?;
        if el.value != value {
            el.value = String::from(value);
            self.epoch += 1;
        }
        Ok(())
    }

    /// Boolean properties of an element; empty for other nodes.
    pub fn flags(&self, id: NodeId) -> ElementFlags {
        self.element(id).map(|e| e.flags).unwrap_or_default()
    }

    /// Turn a boolean property on or off.
    pub fn set_flag(&mut self, id: NodeId, flag: ElementFlags, on: bool) -> Result<(), DomError> {
        let el = self.element_mut(id)?;
        let before = el.flags;
        el.flags.set(flag, on);
        if el.flags != before {
            self.epoch += 1;
        }
        Ok(())
    }

    // --- listeners ---

    /// Attach a direct listener for events named `event`.
    pub fn add_event_listener(
        &mut self,
        id: NodeId,
        event: &str,
        listener: Listener,
    ) -> Result<(), DomError> {
        self.element_mut(id)?
            .listeners
            .push((String::from(event), listener));
        self.epoch += 1;
        Ok(())
    }

    /// Detach a direct listener by identity. Returns whether it was attached.
    pub fn remove_event_listener(
        &mut self,
        id: NodeId,
        event: &str,
        listener: &Listener,
    ) -> Result<bool, DomError> {
        let listeners = &mut self.element_mut(id)?.listeners;
        let at = listeners
            .iter()
            .position(|(name, l)| name == event && Rc::ptr_eq(l, listener));
        let Some(at) = at else {
            return Ok(false);
        };
        listeners.remove(at);
        self.epoch += 1;
        Ok(true)
    }

    /// Direct listeners for `event` in attachment order.
    pub fn listeners(&self, id: NodeId, event: &str) -> Vec<Listener> {
        self.element(id)
            .map(|e| {
                e.listeners
                    .iter()
                    .filter(|(name, _)| name == event)
                    .map(|(_, l)| Rc::clone(l))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Total direct listeners attached to an element.
    pub fn listener_count(&self, id: NodeId) -> usize {
        self.element(id).map(|e| e.listeners.len()).unwrap_or(0)
    }

    // --- internals ---

    pub(crate) fn node(&self, id: NodeId) -> Result<&Node, DomError> {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .filter(|n| n.generation == id.1)
            .ok_or(DomError::Stale(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, DomError> {
        self.nodes
            .get_mut(id.idx())
            .and_then(|n| n.as_mut())
            .filter(|n| n.generation == id.1)
            .ok_or(DomError::Stale(id))
    }

    fn element(&self, id: NodeId) -> Result<&Element, DomError> {
        match &self.node(id)?.data {
            NodeData::Element(e) => Ok(e),
            _ => Err(DomError::NotAnElement(id)),
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Result<&mut Element, DomError> {
        match &mut self.node_mut(id)?.data {
            NodeData::Element(e) => Ok(e),
            _ => Err(DomError::NotAnElement(id)),
        }
    }
}

// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the live document: node identifiers, node kinds and element flags.

use core::fmt;

/// Identifier for a node in the [`Document`](crate::Document).
///
/// This is a small, copyable handle that stays stable while the node is
/// attached to the arena but becomes invalid when the underlying slot is released.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On creation, a fresh slot is allocated with generation `1`.
/// - On release, the slot is freed; any existing `NodeId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `NodeId`.
///
/// ### Liveness
///
/// Use [`Document::is_alive`](crate::Document::is_alive) to check whether a `NodeId` still refers to a live node.
/// Stale `NodeId`s never alias a different live node because the generation must match.
///
/// ### Notes
///
/// - The generation increments on slot reuse and never decreases.
/// - `u32` is ample for practical lifetimes; behavior on generation overflow is unspecified.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    /// Generation of the slot this identifier was issued for.
    pub const fn generation(self) -> u32 {
        self.1
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.0, self.1)
    }
}

/// The kind of a live node.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum NodeKind {
    /// A tagged element carrying attributes, styles, properties and listeners.
    Element,
    /// A text leaf.
    Text,
    /// A transparent container; serializes as its children.
    Fragment,
}

bitflags::bitflags! {
    /// Boolean live properties of an element.
    ///
    /// These are properties, not attributes: they are not visible through
    /// [`Document::attribute`](crate::Document::attribute) and are not serialized.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ElementFlags: u8 {
        /// Checkbox or radio is checked.
        const CHECKED  = 0b0000_0001;
        /// Option is selected.
        const SELECTED = 0b0000_0010;
        /// Control is disabled.
        const DISABLED = 0b0000_0100;
        /// Select accepts multiple options.
        const MULTIPLE = 0b0000_1000;
    }
}

impl ElementFlags {
    /// Map a property name (`checked`, `selected`, `disabled`, `multiple`) to its flag.
    pub fn from_property(name: &str) -> Option<Self> {
        match name {
            "checked" => Some(Self::CHECKED),
            "selected" => Some(Self::SELECTED),
            "disabled" => Some(Self::DISABLED),
            "multiple" => Some(Self::MULTIPLE),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_names_round_trip() {
        for (name, flag) in [
            ("checked", ElementFlags::CHECKED),
            ("selected", ElementFlags::SELECTED),
            ("disabled", ElementFlags::DISABLED),
            ("multiple", ElementFlags::MULTIPLE),
        ] {
            assert_eq!(ElementFlags::from_property(name), Some(flag));
        }
        assert_eq!(ElementFlags::from_property("hidden"), None);
    }

    #[test]
    fn display_includes_slot_and_generation() {
        let id = NodeId::new(3, 2);
        assert_eq!(alloc::format!("{id}"), "#3v2");
        assert_eq!(id.generation(), 2);
    }
}

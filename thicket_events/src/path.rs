// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bubble paths over the live document.

use alloc::vec::Vec;

use thicket_dom::{Document, NodeId};

/// Nodes an event aimed at `target` bubbles through: the target first, then
/// each ancestor up to the topmost one. A stale target yields an empty path.
pub fn bubble_path(doc: &Document, target: NodeId) -> Vec<NodeId> {
    let mut path = doc.path_to_root(target);
    path.reverse();
    path
}

/// Nearest inclusive ancestor of `target` carrying the attribute `marker`.
pub fn closest_marked(doc: &Document, target: NodeId, marker: &str) -> Option<NodeId> {
    doc.closest(target, |d, n| d.has_attribute(n, marker))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn bubble_runs_from_target_to_top() {
        let mut doc = Document::new();
        let ul = doc.create_element("ul");
        let li = doc.create_element("li");
        let text = doc.create_text("a");
        doc.append_child(ul, li).unwrap();
        doc.append_child(li, text).unwrap();

        assert_eq!(bubble_path(&doc, text), vec![text, li, ul]);
        assert_eq!(bubble_path(&doc, ul), vec![ul]);

        doc.remove_child(ul, li).unwrap();
        assert!(bubble_path(&doc, text).is_empty());
    }

    #[test]
    fn closest_marked_is_inclusive() {
        let mut doc = Document::new();
        let ul = doc.create_element("ul");
        let li = doc.create_element("li");
        let text = doc.create_text("a");
        doc.append_child(ul, li).unwrap();
        doc.append_child(li, text).unwrap();
        doc.set_attribute(li, "data-click-id", "1").unwrap();

        assert_eq!(closest_marked(&doc, text, "data-click-id"), Some(li));
        assert_eq!(closest_marked(&doc, li, "data-click-id"), Some(li));
        assert_eq!(closest_marked(&doc, ul, "data-click-id"), None);
    }
}

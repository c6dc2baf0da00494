// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! First-mount materialization.

use thicket_dom::{DomError, NodeId};

use crate::apply::{LiveCx, apply_props};
use crate::resolve::{Resolved, ResolvedElement, Tag};

/// Create detached live nodes for `node`.
///
/// Properties of an element are applied before its children are created, so
/// bindings and refs fire in pre-order. On failure nothing created here stays
/// in the document.
pub(crate) fn materialize(cx: &mut LiveCx<'_>, node: &Resolved) -> Result<NodeId, DomError> {
    let el = match node {
        Resolved::Text(t) => return Ok(cx.doc.create_text(t)),
        Resolved::Element(el) => el,
    };
    let id = match &el.tag {
        Tag::Fragment => cx.doc.create_fragment(),
        Tag::Name(name) => cx.doc.create_element(name),
    };
    if let Err(err) = fill(cx, id, el) {
        cx.discard(id);
        return Err(err);
    }
    Ok(id)
}

fn fill(cx: &mut LiveCx<'_>, id: NodeId, el: &ResolvedElement) -> Result<(), DomError> {
    if matches!(el.tag, Tag::Name(_)) {
        apply_props(cx, id, None, Some(&el.props))?;
    }
    for child in &el.children {
        let c = materialize(cx, child)?;
        cx.doc.append_child(id, c)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apply::ListenerTable;
    use crate::children;
    use crate::hooks::Scope;
    use crate::node::{create_element, fragment};
    use crate::props::Props;
    use crate::resolve::resolve;
    use thicket_dom::Document;
    use thicket_events::registry::DelegationRegistry;

    #[test]
    fn materializes_tags_fragments_and_text() {
        let tree = create_element(
            "div",
            Some(Props::new().set("id", "root")),
            children![
                fragment(children!["a", create_element("i", None, children!["b"])]),
                "c"
            ],
        );
        let resolved = resolve(&tree, &Scope::detached()).unwrap();
        let mut doc = Document::new();
        let mut registry = DelegationRegistry::default();
        let mut listeners = ListenerTable::new();
        let mut cx = LiveCx {
            doc: &mut doc,
            registry: &mut registry,
            listeners: &mut listeners,
        };
        let id = materialize(&mut cx, &resolved).unwrap();
        assert_eq!(doc.to_html(id), "<div id=\"root\">a<i>b</i>c</div>");
        assert_eq!(doc.children(id).len(), 2);
        assert_eq!(doc.len(), 6);
    }
}

// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mounting, patching and delegation through a [`Root`].

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use thicket_vdom::{
    Component, Event, HandlerResult, Node, NodeId, Props, Root, children, create_element,
};

/// A root whose description is whatever `current` holds.
struct Harness {
    root: Root,
    container: NodeId,
    current: Rc<RefCell<Node>>,
}

impl Harness {
    fn mount(node: Node) -> Self {
        let current = Rc::new(RefCell::new(node));
        let source = current.clone();
        let view = Component::new("View", move |_, _| source.borrow().clone());
        let root = Root::new();
        let container = root.with_document_mut(|doc| doc.create_element("div"));
        root.mount(create_element(&view, None, children![]), container)
            .unwrap();
        Self {
            root,
            container,
            current,
        }
    }

    fn update(&self, node: Node) {
        *self.current.borrow_mut() = node;
        self.root.render().unwrap();
    }

    fn html(&self) -> String {
        self.root.with_document(|doc| doc.to_html(self.container))
    }

    fn top(&self) -> NodeId {
        self.root
            .with_document(|doc| doc.child_at(self.container, 0))
            .unwrap()
    }

    fn epoch(&self) -> u64 {
        self.root.with_document(|doc| doc.epoch())
    }
}

fn items(labels: &[&str]) -> Node {
    create_element(
        "ul",
        None,
        labels
            .iter()
            .map(|l| create_element("li", None, children![*l]))
            .collect::<Vec<_>>(),
    )
}

#[test]
fn end_to_end_list_append() {
    let h = Harness::mount(items(&["a", "b"]));
    assert_eq!(h.html(), "<div><ul><li>a</li><li>b</li></ul></div>");
    let ul = h.top();
    let before = h.root.with_document(|doc| doc.children(ul).to_vec());
    let first_texts: Vec<NodeId> = h
        .root
        .with_document(|doc| before.iter().map(|li| doc.children(*li)[0]).collect());

    h.update(items(&["a", "b", "c"]));
    assert_eq!(h.html(), "<div><ul><li>a</li><li>b</li><li>c</li></ul></div>");
    let after = h.root.with_document(|doc| doc.children(ul).to_vec());
    assert_eq!(after.len(), 3);
    assert_eq!(&after[..2], &before[..]);
    let texts_now: Vec<NodeId> = h
        .root
        .with_document(|doc| after[..2].iter().map(|li| doc.children(*li)[0]).collect());
    assert_eq!(texts_now, first_texts);
    assert_eq!(h.top(), ul);
    assert_eq!(h.root.stats().renders, 1);
}

#[test]
fn unchanged_tree_performs_no_mutation() {
    let tree = create_element(
        "section",
        Some(
            Props::new()
                .class("card")
                .set("data-kind", "x")
                .on_click(|_, _| Ok(())),
        ),
        children![items(&["a"]), "tail"],
    );
    let h = Harness::mount(tree.clone());
    let epoch = h.epoch();
    h.update(tree);
    assert_eq!(h.epoch(), epoch);
}

#[test]
fn leaf_change_touches_only_that_text() {
    let h = Harness::mount(create_element(
        "p",
        Some(Props::new().set("id", "x")),
        children![create_element("b", None, children!["A"]), "!"],
    ));
    let p = h.top();
    let (b, bang) = h
        .root
        .with_document(|doc| (doc.children(p)[0], doc.children(p)[1]));
    let epoch = h.epoch();

    h.update(create_element(
        "p",
        Some(Props::new().set("id", "x")),
        children![create_element("b", None, children!["B"]), "!"],
    ));
    assert_eq!(h.html(), "<div><p id=\"x\"><b>B</b>!</p></div>");
    h.root.with_document(|doc| {
        assert_eq!(doc.children(p), &[b, bang]);
        assert!(doc.is_alive(bang));
    });
    // One text node created, one replaced.
    assert_eq!(h.epoch(), epoch + 2);
}

#[test]
fn tag_change_remounts_without_old_attributes() {
    let h = Harness::mount(create_element(
        "div",
        Some(Props::new().set("data-deep", "1")),
        children!["x"],
    ));
    let old = h.top();
    h.update(create_element("span", None, children!["x"]));
    let new = h.top();
    assert_ne!(old, new);
    h.root.with_document(|doc| {
        assert!(!doc.is_alive(old));
        assert_eq!(doc.tag(new), Some("span"));
        assert!(!doc.has_attribute(new, "data-deep"));
    });
}

#[test]
fn delegated_click_reaches_the_nearest_marked_ancestor_once() {
    let outer_hits = Rc::new(Cell::new(0));
    let inner_hits = Rc::new(Cell::new(0));
    let (o, i) = (outer_hits.clone(), inner_hits.clone());
    let tree = create_element(
        "div",
        Some(Props::new().on_click(move |_, _| {
            o.set(o.get() + 1);
            Ok(())
        })),
        children![create_element(
            "button",
            Some(Props::new().on_click(move |_, _| {
                i.set(i.get() + 1);
                Ok(())
            })),
            children![create_element("span", None, children!["go"])],
        )],
    );
    let h = Harness::mount(tree);
    let span = h.root.with_document(|doc| {
        let button = doc.children(h.top())[0];
        doc.children(button)[0]
    });
    let report = h.root.click(span);
    assert_eq!(report.invoked, 1);
    assert_eq!(inner_hits.get(), 1);
    assert_eq!(outer_hits.get(), 0);
}

#[test]
fn delegated_handler_receives_event_and_element() {
    let seen: Rc<Cell<Option<(NodeId, NodeId)>>> = Rc::default();
    let sink = seen.clone();
    let h = Harness::mount(create_element(
        "button",
        Some(Props::new().on_click(move |ev: &Event, el| -> HandlerResult {
            sink.set(Some((ev.target(), el)));
            ev.prevent_default();
            Ok(())
        })),
        children!["+"],
    ));
    let button = h.top();
    let label = h.root.with_document(|doc| doc.children(button)[0]);
    let event = Event::click(label);
    h.root.dispatch(&event);
    assert_eq!(seen.get(), Some((label, button)));
    assert!(event.default_prevented());
}

#[test]
fn removing_the_handler_removes_delegation() {
    let hits = Rc::new(Cell::new(0));
    let counter = hits.clone();
    let with_handler = create_element(
        "button",
        Some(Props::new().on_click(move |_, _| {
            counter.set(counter.get() + 1);
            Ok(())
        })),
        children![create_element("i", None, children!["icon"])],
    );
    let h = Harness::mount(with_handler);
    assert_eq!(h.root.delegated_count(), 1);

    h.update(create_element(
        "button",
        None,
        children![create_element("i", None, children!["icon"])],
    ));
    let button = h.top();
    let icon = h.root.with_document(|doc| doc.children(button)[0]);
    let report = h.root.click(icon);
    assert_eq!(report.invoked, 0);
    assert_eq!(hits.get(), 0);
    assert_eq!(h.root.delegated_count(), 0);
    assert!(!h.root.with_document(|doc| doc.has_attribute(button, "data-click-id")));
}

#[test]
fn direct_listeners_are_swapped_not_stacked() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let tree = |label: &'static str| {
        let log = log.clone();
        create_element(
            "input",
            Some(Props::new().on("input", move |_, _| {
                log.borrow_mut().push(label);
                Ok(())
            })),
            children![],
        )
    };
    let h = Harness::mount(tree("first"));
    h.update(tree("second"));
    let input = h.top();
    h.root.dispatch(&Event::new("input", input));
    assert_eq!(*log.borrow(), vec!["second"]);
    assert_eq!(h.root.with_document(|doc| doc.listener_count(input)), 1);
}

#[test]
fn fragments_patch_in_place() {
    let h = Harness::mount(create_element(
        "div",
        None,
        children![thicket_vdom::fragment(["a", "b"]), "c"],
    ));
    h.update(create_element(
        "div",
        None,
        children![thicket_vdom::fragment(["a", "x", "y"]), "c"],
    ));
    assert_eq!(h.html(), "<div><div>axyc</div></div>");
    assert_eq!(h.root.stats().recoveries, 0);
}

#[test]
fn value_and_flags_track_props() {
    let input = |value: &str, checked: bool| {
        create_element(
            "input",
            Some(
                Props::new()
                    .set("type", "checkbox")
                    .value(value)
                    .set("checked", checked),
            ),
            children![],
        )
    };
    let h = Harness::mount(input("a", true));
    let el = h.top();
    h.root.with_document(|doc| {
        assert_eq!(doc.value(el), Some("a"));
        assert!(doc.flags(el).contains(thicket_dom::ElementFlags::CHECKED));
    });
    h.update(input("b", false));
    h.root.with_document(|doc| {
        assert_eq!(doc.value(el), Some("b"));
        assert!(doc.flags(el).is_empty());
        assert_eq!(doc.attributes(el), vec![(String::from("type"), String::from("checkbox"))]);
    });
}

#[test]
fn refs_fire_parent_first_in_document_order() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let labelled = |label: &'static str| {
        let log = log.clone();
        Props::new().node_ref(move |_, _| log.borrow_mut().push(label))
    };
    let tree = || {
        create_element(
            "ul",
            Some(labelled("parent")),
            children![
                create_element("li", Some(labelled("first")), children!["a"]),
                create_element("li", Some(labelled("second")), children!["b"]),
            ],
        )
    };
    let h = Harness::mount(tree());
    assert_eq!(*log.borrow(), vec!["parent", "first", "second"]);

    log.borrow_mut().clear();
    h.update(tree());
    assert_eq!(*log.borrow(), vec!["parent", "first", "second"]);
}

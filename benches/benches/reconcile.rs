// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::cell::RefCell;
use std::rc::Rc;

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use thicket_vdom::{Component, Node, NodeId, Props, Root, children, create_element};

fn list(n: usize, changed: Option<usize>) -> Node {
    create_element(
        "ul",
        Some(Props::new().class("list")),
        (0..n)
            .map(|i| {
                let label = if changed == Some(i) {
                    format!("item {i}!")
                } else {
                    format!("item {i}")
                };
                create_element(
                    "li",
                    Some(Props::new().set("data-index", i as i64).on_click(|_, _| Ok(()))),
                    children![create_element("span", None, children![label])],
                )
            })
            .collect::<Vec<_>>(),
    )
}

/// A mounted root whose component returns whatever `current` holds.
fn mounted(node: Node) -> (Root, NodeId, Rc<RefCell<Node>>) {
    let current = Rc::new(RefCell::new(node));
    let source = current.clone();
    let view = Component::new("View", move |_, _| source.borrow().clone());
    let root = Root::new();
    let container = root.with_document_mut(|doc| doc.create_element("div"));
    root.mount(create_element(&view, None, children![]), container)
        .unwrap();
    (root, container, current)
}

fn bench_mount(c: &mut Criterion) {
    let mut group = c.benchmark_group("mount");
    for n in [100_usize, 1000] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("list_n{n}"), |b| {
            b.iter_batched(
                || {
                    let root = Root::new();
                    let container = root.with_document_mut(|doc| doc.create_element("div"));
                    (root, container, list(n, None))
                },
                |(root, container, tree)| {
                    root.mount(tree, container).unwrap();
                    black_box(root);
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_patch(c: &mut Criterion) {
    let mut group = c.benchmark_group("patch");
    for n in [100_usize, 1000] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("unchanged_n{n}"), |b| {
            let (root, _, _) = mounted(list(n, None));
            b.iter(|| root.render().unwrap());
        });
        group.bench_function(format!("one_leaf_n{n}"), |b| {
            let (root, _, current) = mounted(list(n, None));
            let a = list(n, None);
            let z = list(n, Some(n / 2));
            let mut flip = false;
            b.iter(|| {
                flip = !flip;
                *current.borrow_mut() = if flip { z.clone() } else { a.clone() };
                root.render().unwrap();
            });
        });
    }
    group.finish();
}

fn bench_click(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");
    let mut tree = create_element("b", None, children!["leaf"]);
    for _ in 0..64 {
        tree = create_element("div", None, children![tree]);
    }
    let top = create_element(
        "section",
        Some(Props::new().on_click(|_, _| Ok(()))),
        children![tree],
    );
    let (root, container, _) = mounted(top);
    let leaf = root.with_document(|doc| {
        let mut node = container;
        while let Some(child) = doc.child_at(node, 0) {
            node = child;
        }
        node
    });
    group.bench_function("delegated_click_depth64", |b| {
        b.iter(|| black_box(root.click(leaf)));
    });
    group.finish();
}

criterion_group!(benches, bench_mount, bench_patch, bench_click);
criterion_main!(benches);

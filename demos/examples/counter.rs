// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Counter.
//!
//! One component with one state slot. Each click goes through the delegated
//! click listener, the setter re-renders the root and only the label text is
//! replaced in the live document.
//!
//! Run:
//! - `RUST_LOG=thicket_vdom=debug cargo run -p thicket_demos --example counter`

use kurbo::Point;
use thicket_vdom::{Component, Event, Props, Root, StyleMap, children, create_element};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let counter = Component::new("Counter", |props, scope| {
        let step = props.get("step").and_then(|v| v.as_int()).unwrap_or(1);
        let (count, set_count) = scope.use_state(0_i64);
        let n = count.get();
        let color = if n % 2 == 0 { "steelblue" } else { "tomato" };
        create_element(
            "div",
            Some(Props::new().class("counter")),
            children![
                create_element(
                    "span",
                    Some(Props::new().style(StyleMap::new().set("color", color))),
                    children!["count: ", n],
                ),
                create_element(
                    "button",
                    Some(Props::new().on_click(move |ev: &Event, _| {
                        tracing::info!(position = ?ev.position(), "increment");
                        set_count.set(n + step);
                        Ok(())
                    })),
                    children!["+", step],
                ),
            ],
        )
    });

    let root = Root::new();
    let container = root.with_document_mut(|doc| doc.create_element("main"));
    if let Err(err) = root.mount(
        create_element(&counter, Some(Props::new().set("step", 5)), children![]),
        container,
    ) {
        eprintln!("mount failed: {err}");
        return;
    }
    println!("{}", root.with_document(|doc| doc.to_html(container)));

    let button = root.with_document(|doc| {
        let div = doc.child_at(container, 0)?;
        doc.child_at(div, 1)
    });
    let Some(button) = button else {
        eprintln!("button not found");
        return;
    };
    for i in 0..3 {
        let report = root.dispatch(&Event::click(button).at(Point::new(4.0, 2.0 + f64::from(i))));
        println!("click {i}: {} handler(s) invoked", report.invoked);
        println!("{}", root.with_document(|doc| doc.to_html(container)));
    }
    println!("{:?}", root.stats());
}

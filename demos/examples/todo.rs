// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Todo list.
//!
//! A list component with nested item components. Shows positional patching
//! of a list that grows and shrinks, boolean flags driven by props, and
//! handlers that capture setters.
//!
//! Run:
//! - `cargo run -p thicket_demos --example todo`

use thicket_vdom::{
    Component, Document, Event, HandlerResult, NodeId, Props, Root, Setter, StyleMap, children,
    create_element,
};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug)]
struct Task {
    id: u32,
    label: String,
    done: bool,
}

fn item(set_tasks: Setter<Vec<Task>>) -> Component {
    Component::new("TodoItem", move |props, _| {
        let id = props
            .get("task-id")
            .and_then(|v| v.as_int())
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or_default();
        let done = props.get("done").is_some_and(|v| v.is_truthy());
        let label = props.get("label").and_then(|v| v.as_str()).unwrap_or("");
        let (toggle, remove) = (set_tasks.clone(), set_tasks.clone());
        let mut style = StyleMap::new();
        if done {
            style.insert("text-decoration", "line-through");
        }
        create_element(
            "li",
            None,
            children![
                create_element(
                    "input",
                    Some(
                        Props::new()
                            .set("type", "checkbox")
                            .set("checked", done)
                            .set("data-action", "toggle")
                            .on_click(move |_, _| {
                                toggle.update(|tasks| {
                                    if let Some(t) = tasks.iter_mut().find(|t| t.id == id) {
                                        t.done = !t.done;
                                    }
                                });
                                Ok(())
                            }),
                    ),
                    children![],
                ),
                create_element("span", Some(Props::new().style(style)), children![label]),
                create_element(
                    "button",
                    Some(Props::new().set("data-action", "remove").on_click(
                        move |_, _| {
                            remove.update(|tasks| tasks.retain(|t| t.id != id));
                            Ok(())
                        }
                    )),
                    children!["x"],
                ),
            ],
        )
    })
}

fn app() -> Component {
    Component::new("TodoApp", |_, scope| {
        let (tasks, set_tasks) = scope.use_state(Vec::<Task>::new());
        let (next, set_next) = scope.use_state(1_u32);
        let row = item(set_tasks.clone());
        let id = next.get();
        let add = move |_: &Event, _: NodeId| -> HandlerResult {
            set_next.set(id + 1);
            set_tasks.update(|tasks| {
                tasks.push(Task {
                    id,
                    label: format!("task {id}"),
                    done: false,
                });
            });
            Ok(())
        };
        let remaining = tasks.with(|t| t.iter().filter(|t| !t.done).count());
        create_element(
            "section",
            None,
            children![
                create_element(
                    "button",
                    Some(Props::new().set("data-action", "add").on_click(add)),
                    children!["add"],
                ),
                create_element(
                    "ul",
                    None,
                    tasks.with(|t| {
                        t.iter()
                            .map(|task| {
                                create_element(
                                    &row,
                                    Some(
                                        Props::new()
                                            .set("task-id", task.id)
                                            .set("label", task.label.as_str())
                                            .set("done", task.done),
                                    ),
                                    children![],
                                )
                            })
                            .collect::<Vec<_>>()
                    }),
                ),
                create_element("p", None, children![remaining, " left"]),
            ],
        )
    })
}

/// Elements under `from` whose `data-action` is `action`, in document order.
fn find(doc: &Document, from: NodeId, action: &str) -> Vec<NodeId> {
    doc.descendants(from)
        .into_iter()
        .filter(|n| doc.attribute(*n, "data-action").as_deref() == Some(action))
        .collect()
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let root = Root::new();
    let container = root.with_document_mut(|doc| doc.create_element("main"));
    if let Err(err) = root.mount(create_element(&app(), None, children![]), container) {
        eprintln!("mount failed: {err}");
        return;
    }
    let show = |what: &str| {
        println!("== {what} ==");
        println!("{}", root.with_document(|doc| doc.to_html(container)));
    };
    show("empty");

    for _ in 0..3 {
        if let Some(add) = root.with_document(|doc| find(doc, container, "add").first().copied()) {
            root.click(add);
        }
    }
    show("three tasks");

    if let Some(toggle) = root.with_document(|doc| find(doc, container, "toggle").get(1).copied())
    {
        root.click(toggle);
    }
    show("second done");

    if let Some(remove) = root.with_document(|doc| find(doc, container, "remove").first().copied())
    {
        root.click(remove);
    }
    show("first removed");

    println!(
        "{:?}, {} delegated handlers",
        root.stats(),
        root.delegated_count()
    );
}

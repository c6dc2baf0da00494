// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Description nodes and the tree builder.

use std::fmt;
use std::rc::Rc;

use crate::hooks::Scope;
use crate::props::Props;

/// Tag name reserved for fragments.
pub const FRAGMENT: &str = "fragment";

/// Error a component may return instead of a tree.
pub type ComponentError = Box<dyn std::error::Error>;

/// Outcome of invoking a component.
pub type ComponentResult = Result<Node, ComponentError>;

type RenderFn = dyn Fn(&Props, &Scope) -> ComponentResult;

/// An immutable description of UI: a text leaf or a typed node.
#[derive(Clone, PartialEq)]
pub enum Node {
    /// Text leaf. Numbers are stored in their display form.
    Text(String),
    /// Tag, fragment or component node.
    Element(VNode),
}

impl Node {
    /// Text of a leaf.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(t) => Some(t.as_str()),
            Self::Element(_) => None,
        }
    }

    /// The typed node, if this is not a leaf.
    pub fn as_element(&self) -> Option<&VNode> {
        match self {
            Self::Text(_) => None,
            Self::Element(v) => Some(v),
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(t) => fmt::Debug::fmt(t, f),
            Self::Element(v) => fmt::Debug::fmt(v, f),
        }
    }
}

/// A typed description node. Cheap to clone; never mutated after construction.
#[derive(Clone)]
pub struct VNode(Rc<VNodeData>);

struct VNodeData {
    ty: NodeType,
    props: Props,
    children: Vec<Node>,
}

impl VNode {
    /// Build a node from already flattened children.
    pub fn new(ty: NodeType, props: Props, children: Vec<Node>) -> Self {
        Self(Rc::new(VNodeData {
            ty,
            props,
            children,
        }))
    }

    /// The node's type.
    pub fn node_type(&self) -> &NodeType {
        &self.0.ty
    }

    /// The node's properties.
    pub fn props(&self) -> &Props {
        &self.0.props
    }

    /// The node's children.
    pub fn children(&self) -> &[Node] {
        &self.0.children
    }
}

impl PartialEq for VNode {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
            || (self.0.ty == other.0.ty
                && self.0.props == other.0.props
                && self.0.children == other.0.children)
    }
}

impl fmt::Debug for VNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VNode")
            .field("type", &self.0.ty)
            .field("props", &self.0.props)
            .field("children", &self.0.children)
            .finish()
    }
}

/// What a typed node stands for.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeType {
    /// A primitive element tag.
    Tag(String),
    /// A transparent group of children.
    Fragment,
    /// A function that expands to another description.
    Component(Component),
}

impl From<&str> for NodeType {
    fn from(tag: &str) -> Self {
        if tag == FRAGMENT {
            Self::Fragment
        } else {
            Self::Tag(String::from(tag))
        }
    }
}

impl From<String> for NodeType {
    fn from(tag: String) -> Self {
        if tag == FRAGMENT {
            Self::Fragment
        } else {
            Self::Tag(tag)
        }
    }
}

impl From<Component> for NodeType {
    fn from(c: Component) -> Self {
        Self::Component(c)
    }
}

impl From<&Component> for NodeType {
    fn from(c: &Component) -> Self {
        Self::Component(c.clone())
    }
}

/// A named render function from props to a description.
///
/// Components may declare state through the [`Scope`] they receive. Two
/// components are equal only when they share the same function allocation.
#[derive(Clone)]
pub struct Component {
    name: &'static str,
    render: Rc<RenderFn>,
}

impl Component {
    /// Wrap an infallible render function.
    pub fn new(name: &'static str, render: impl Fn(&Props, &Scope) -> Node + 'static) -> Self {
        Self::try_new(name, move |props, scope| Ok(render(props, scope)))
    }

    /// Wrap a render function that may fail.
    pub fn try_new(
        name: &'static str,
        render: impl Fn(&Props, &Scope) -> ComponentResult + 'static,
    ) -> Self {
        Self {
            name,
            render: Rc::new(render),
        }
    }

    /// Name used in diagnostics.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn call(&self, props: &Props, scope: &Scope) -> ComponentResult {
        (self.render)(props, scope)
    }
}

impl PartialEq for Component {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.render, &other.render)
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Component").field(&self.name).finish()
    }
}

/// One argument in a children list before flattening.
#[derive(Clone, Debug, PartialEq)]
pub enum Child {
    /// A single node.
    Node(Node),
    /// A nested list, flattened at any depth.
    List(Vec<Child>),
    /// Dropped during construction.
    Empty,
}

impl From<Node> for Child {
    fn from(n: Node) -> Self {
        Self::Node(n)
    }
}

impl From<VNode> for Child {
    fn from(v: VNode) -> Self {
        Self::Node(Node::Element(v))
    }
}

impl From<&str> for Child {
    fn from(s: &str) -> Self {
        Self::Node(Node::Text(String::from(s)))
    }
}

impl From<String> for Child {
    fn from(s: String) -> Self {
        Self::Node(Node::Text(s))
    }
}

impl From<&String> for Child {
    fn from(s: &String) -> Self {
        Self::Node(Node::Text(s.clone()))
    }
}

macro_rules! child_from_integer {
    ($($t:ty),*) => {
        $(impl From<$t> for Child {
            fn from(n: $t) -> Self {
                Self::Node(Node::Text(n.to_string()))
            }
        })*
    };
}

child_from_integer!(i32, i64, u32, u64, usize);

impl From<f64> for Child {
    fn from(n: f64) -> Self {
        Self::Node(Node::Text(number_text(n)))
    }
}

impl<T: Into<Self>> From<Option<T>> for Child {
    fn from(c: Option<T>) -> Self {
        c.map_or(Self::Empty, Into::into)
    }
}

impl<T: Into<Self>> From<Vec<T>> for Child {
    fn from(list: Vec<T>) -> Self {
        Self::List(list.into_iter().map(Into::into).collect())
    }
}

/// Display form of a number leaf, as a browser would print it.
///
/// Integral values print without a fraction and negative zero prints as `0`.
/// Magnitudes from `1e21` up, or below `1e-6`, use exponent form with an
/// explicit sign (`1e+21`, `1.5e-7`).
pub(crate) fn number_text(n: f64) -> String {
    if n.is_infinite() {
        return String::from(if n > 0.0 { "Infinity" } else { "-Infinity" });
    }
    if n == 0.0 {
        return String::from("0");
    }
    let magnitude = n.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let exp = format!("{n:e}");
        return match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => {
                format!("{mantissa}e+{power}")
            }
            _ => exp,
        };
    }
    n.to_string()
}

/// Build a list of [`Child`] arguments from mixed expressions.
///
/// ```
/// use thicket_vdom::{children, create_element};
///
/// let name: Option<&str> = None;
/// let list = create_element("p", None, children!["n = ", 3, name]);
/// assert_eq!(list.as_element().map(|v| v.children().len()), Some(2));
/// ```
#[macro_export]
macro_rules! children {
    () => {
        ::std::vec::Vec::<$crate::Child>::new()
    };
    ($($child:expr),+ $(,)?) => {
        ::std::vec![$($crate::Child::from($child)),+]
    };
}

/// Construct a description node.
///
/// `children` is flattened at any depth and [`Child::Empty`] entries are
/// dropped. No validation of `props` happens here.
pub fn create_element<I>(ty: impl Into<NodeType>, props: Option<Props>, children: I) -> Node
where
    I: IntoIterator,
    I::Item: Into<Child>,
{
    let mut flat = Vec::new();
    for child in children {
        flatten_into(&mut flat, child.into());
    }
    Node::Element(VNode::new(ty.into(), props.unwrap_or_default(), flat))
}

/// A fragment grouping `children` without a wrapping element.
pub fn fragment<I>(children: I) -> Node
where
    I: IntoIterator,
    I::Item: Into<Child>,
{
    create_element(NodeType::Fragment, None, children)
}

/// A text leaf.
pub fn text(s: impl Into<String>) -> Node {
    Node::Text(s.into())
}

fn flatten_into(out: &mut Vec<Node>, child: Child) {
    match child {
        Child::Node(n) => out.push(n),
        Child::List(list) => {
            for c in list {
                flatten_into(out, c);
            }
        }
        Child::Empty => {}
    }
}

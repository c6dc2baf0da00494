// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Component expansion.

use tracing::trace;

use crate::error::ResolveError;
use crate::hooks::Scope;
use crate::node::{Node, NodeType, VNode};
use crate::props::Props;

/// A description tree containing only tags, fragments and text.
#[derive(Clone, Debug, PartialEq)]
pub enum Resolved {
    /// Text leaf.
    Text(String),
    /// Element or fragment.
    Element(ResolvedElement),
}

/// Primitive node of a [`Resolved`] tree.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedElement {
    /// Tag or fragment marker.
    pub tag: Tag,
    /// Properties to apply to the live element.
    pub props: Props,
    /// Resolved children, in order.
    pub children: Vec<Resolved>,
}

/// Type of a primitive node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tag {
    /// A named element.
    Name(String),
    /// A fragment.
    Fragment,
}

impl Resolved {
    /// Text of a leaf.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(t) => Some(t.as_str()),
            Self::Element(_) => None,
        }
    }

    /// The element, if this is not a leaf.
    pub fn as_element(&self) -> Option<&ResolvedElement> {
        match self {
            Self::Text(_) => None,
            Self::Element(e) => Some(e),
        }
    }

    /// Convert back into a description tree.
    pub fn to_node(&self) -> Node {
        match self {
            Self::Text(t) => Node::Text(t.clone()),
            Self::Element(e) => {
                let ty = match &e.tag {
                    Tag::Name(n) => NodeType::Tag(n.clone()),
                    Tag::Fragment => NodeType::Fragment,
                };
                Node::Element(VNode::new(
                    ty,
                    e.props.clone(),
                    e.children.iter().map(Self::to_node).collect(),
                ))
            }
        }
    }
}

/// Expand every component in `node`.
///
/// Components receive their props with the node's children attached and may
/// declare state through `scope`. Their output is resolved again, so a
/// component may return another component.
pub fn resolve(node: &Node, scope: &Scope) -> Result<Resolved, ResolveError> {
    resolve_at(node, scope, 0)
}

fn resolve_at(node: &Node, scope: &Scope, depth: usize) -> Result<Resolved, ResolveError> {
    let v = match node {
        Node::Text(t) => return Ok(Resolved::Text(t.clone())),
        Node::Element(v) => v,
    };
    if depth >= scope.max_depth() {
        return Err(ResolveError::DepthExceeded {
            limit: scope.max_depth(),
        });
    }
    match v.node_type() {
        NodeType::Component(c) => {
            trace!(component = c.name(), depth, "expanding component");
            let props = v.props().clone().with_children(v.children());
            let out = c
                .call(&props, scope)
                .map_err(|source| ResolveError::Component {
                    name: c.name(),
                    source,
                })?;
            if let Some(err) = scope.take_hook_error() {
                return Err(err.into());
            }
            resolve_at(&out, scope, depth + 1)
        }
        NodeType::Tag(name) => primitive(Tag::Name(name.clone()), v, scope, depth),
        NodeType::Fragment => primitive(Tag::Fragment, v, scope, depth),
    }
}

fn primitive(tag: Tag, v: &VNode, scope: &Scope, depth: usize) -> Result<Resolved, ResolveError> {
    let children = v
        .children()
        .iter()
        .map(|c| resolve_at(c, scope, depth + 1))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Resolved::Element(ResolvedElement {
        tag,
        props: v.props().clone(),
        children,
    }))
}

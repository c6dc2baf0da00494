// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property maps and their closed schema.
//!
//! Every entry is classified into a [`PropKind`] once, when it is inserted.
//! The applier then handles each kind with one rule and never inspects key
//! names again. Classification follows this priority:
//!
//! 1. `style`
//! 2. `ref` holding a callback
//! 3. `className` or `class`
//! 4. `on<Name>` holding a handler; the event name is `<Name>` lower-cased
//! 5. `checked`, `selected`, `disabled`, `multiple`
//! 6. `value`
//! 7. anything else is a plain attribute
//!
//! A value that does not fit the shape its key asks for falls through to the
//! next rule: `ref="x"` and `onclick="x"` are plain attributes.

use std::fmt;
use std::rc::Rc;

use thicket_dom::{Document, ElementFlags, Event, HandlerResult, Listener, NodeId};

use crate::node::{Node, number_text};

/// Callback receiving a live element after it is created or patched.
pub type RefCallback = Rc<dyn Fn(&mut Document, NodeId)>;

/// A property value.
#[derive(Clone)]
pub enum PropValue {
    /// Absent value; clears the bound state.
    Null,
    /// Boolean.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// String.
    Str(String),
    /// Inline style map.
    Style(StyleMap),
    /// Event handler.
    Handler(Listener),
    /// Live element callback.
    Ref(RefCallback),
}

impl PropValue {
    /// Wrap an event handler.
    pub fn handler(f: impl Fn(&Event, NodeId) -> HandlerResult + 'static) -> Self {
        Self::Handler(Rc::new(f))
    }

    /// Wrap a ref callback.
    pub fn node_ref(f: impl Fn(&mut Document, NodeId) + 'static) -> Self {
        Self::Ref(Rc::new(f))
    }

    /// The string, if this is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// The integer, if this is one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// The boolean, if this is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Boolean coercion: null, false, zero, NaN and the empty string are false.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Int(n) => *n != 0,
            Self::Float(f) => *f != 0.0 && !f.is_nan(),
            Self::Str(s) => !s.is_empty(),
            Self::Style(_) | Self::Handler(_) | Self::Ref(_) => true,
        }
    }

    /// String form of the value, or `None` for null and callbacks.
    pub fn display_text(&self) -> Option<String> {
        match self {
            Self::Null | Self::Handler(_) | Self::Ref(_) => None,
            Self::Bool(b) => Some(b.to_string()),
            Self::Int(n) => Some(n.to_string()),
            Self::Float(f) => Some(number_text(*f)),
            Self::Str(s) => Some(s.clone()),
            Self::Style(m) => Some(m.to_css()),
        }
    }

    /// Attribute text: like [`display_text`](Self::display_text), but `false`
    /// means "no attribute".
    pub fn attr_text(&self) -> Option<String> {
        match self {
            Self::Bool(false) => None,
            other => other.display_text(),
        }
    }
}

impl PartialEq for PropValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Style(a), Self::Style(b)) => a == b,
            (Self::Handler(a), Self::Handler(b)) => Rc::ptr_eq(a, b),
            (Self::Ref(a), Self::Ref(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::Int(n) => f.debug_tuple("Int").field(n).finish(),
            Self::Float(x) => f.debug_tuple("Float").field(x).finish(),
            Self::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Self::Style(m) => f.debug_tuple("Style").field(m).finish(),
            Self::Handler(h) => write!(f, "Handler({:p})", Rc::as_ptr(h)),
            Self::Ref(r) => write!(f, "Ref({:p})", Rc::as_ptr(r)),
        }
    }
}

impl From<bool> for PropValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i32> for PropValue {
    fn from(n: i32) -> Self {
        Self::Int(n.into())
    }
}

impl From<i64> for PropValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<u32> for PropValue {
    fn from(n: u32) -> Self {
        Self::Int(n.into())
    }
}

impl From<f64> for PropValue {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<&str> for PropValue {
    fn from(s: &str) -> Self {
        Self::Str(String::from(s))
    }
}

impl From<String> for PropValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<StyleMap> for PropValue {
    fn from(m: StyleMap) -> Self {
        Self::Style(m)
    }
}

impl<T: Into<Self>> From<Option<T>> for PropValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// How an entry is applied to a live element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PropKind {
    /// Inline style, as text or as a map.
    Style,
    /// Ref callback.
    Ref,
    /// The `class` attribute.
    Class,
    /// Event handler for the named category.
    Event(String),
    /// Boolean live property.
    Flag(ElementFlags),
    /// The `value` live property.
    Value,
    /// Plain attribute.
    Attr,
}

impl PropKind {
    /// Classify an entry.
    pub fn classify(key: &str, value: &PropValue) -> Self {
        if key == "style" {
            return Self::Style;
        }
        if key == "ref" && matches!(value, PropValue::Ref(_)) {
            return Self::Ref;
        }
        if key == "className" || key == "class" {
            return Self::Class;
        }
        if let Some(name) = key.strip_prefix("on")
            && !name.is_empty()
            && matches!(value, PropValue::Handler(_))
        {
            return Self::Event(name.to_ascii_lowercase());
        }
        if let Some(flag) = ElementFlags::from_property(key) {
            return Self::Flag(flag);
        }
        if key == "value" {
            return Self::Value;
        }
        Self::Attr
    }
}

/// One classified entry of a [`Props`] map.
#[derive(Clone, Debug, PartialEq)]
pub struct PropEntry {
    key: String,
    value: PropValue,
    kind: PropKind,
}

impl PropEntry {
    /// Property name.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Property value.
    pub fn value(&self) -> &PropValue {
        &self.value
    }

    /// Classification decided at insertion.
    pub fn kind(&self) -> &PropKind {
        &self.kind
    }
}

/// An insertion-ordered property map.
///
/// Components additionally see the children of their node through
/// [`children`](Self::children). Equality ignores entry order and compares
/// handlers and refs by identity.
#[derive(Clone, Default)]
pub struct Props {
    entries: Vec<PropEntry>,
    children: Option<Rc<[Node]>>,
}

impl Props {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace an entry. A replaced entry keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PropValue>) {
        let key = key.into();
        let value = value.into();
        let kind = PropKind::classify(&key, &value);
        if let Some(entry) = self.entries.iter_mut().find(|e| e.key == key) {
            entry.value = value;
            entry.kind = kind;
        } else {
            self.entries.push(PropEntry { key, value, kind });
        }
    }

    /// Remove an entry, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<PropValue> {
        let at = self.entries.iter().position(|e| e.key == key)?;
        Some(self.entries.remove(at).value)
    }

    /// Set `className`.
    #[must_use]
    pub fn class(self, class: impl Into<PropValue>) -> Self {
        self.set("className", class)
    }

    /// Set `style` to inline text or a [`StyleMap`].
    #[must_use]
    pub fn style(self, style: impl Into<PropValue>) -> Self {
        self.set("style", style)
    }

    /// Set `value`.
    #[must_use]
    pub fn value(self, value: impl Into<PropValue>) -> Self {
        self.set("value", value)
    }

    /// Attach a handler for `event` (stored under `on<event>`).
    #[must_use]
    pub fn on(self, event: &str, f: impl Fn(&Event, NodeId) -> HandlerResult + 'static) -> Self {
        self.set(format!("on{event}"), PropValue::handler(f))
    }

    /// Attach a click handler.
    #[must_use]
    pub fn on_click(self, f: impl Fn(&Event, NodeId) -> HandlerResult + 'static) -> Self {
        self.set("onClick", PropValue::handler(f))
    }

    /// Attach a ref callback.
    #[must_use]
    pub fn node_ref(self, f: impl Fn(&mut Document, NodeId) + 'static) -> Self {
        self.set("ref", PropValue::node_ref(f))
    }

    /// Value of an entry.
    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.entry(key).map(|e| &e.value)
    }

    /// A classified entry.
    pub fn entry(&self, key: &str) -> Option<&PropEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &PropEntry> + '_ {
        self.entries.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Children passed to a component. Empty for element props.
    pub fn children(&self) -> &[Node] {
        self.children.as_deref().unwrap_or(&[])
    }

    pub(crate) fn with_children(mut self, children: &[Node]) -> Self {
        self.children = Some(children.into());
        self
    }
}

impl PartialEq for Props {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .all(|e| other.entry(&e.key).is_some_and(|o| o.value == e.value))
            && self.children() == other.children()
    }
}

impl fmt::Debug for Props {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|e| (&e.key, &e.value)))
            .finish()
    }
}

/// Inline style declarations keyed by property name.
///
/// Keys may be camel-case (`backgroundColor`); they are hyphenated when
/// applied. Values are stored in their display form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StyleMap {
    entries: Vec<(String, String)>,
}

impl StyleMap {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a declaration.
    pub fn insert(&mut self, key: impl Into<String>, value: impl fmt::Display) {
        let key = key.into();
        let value = value.to_string();
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    /// Value for `key` as written in the map.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Declarations in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of declarations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize as inline CSS text with hyphenated names.
    pub fn to_css(&self) -> String {
        let mut out = String::new();
        for (k, v) in &self.entries {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&hyphenate(k));
            out.push_str(": ");
            out.push_str(v);
            out.push(';');
        }
        out
    }
}

impl<K: Into<String>, V: fmt::Display> FromIterator<(K, V)> for StyleMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// Translate a camel-case property name to its hyphenated CSS form.
pub fn hyphenate(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_follows_priority() {
        let handler = PropValue::handler(|_, _| Ok(()));
        let cb = PropValue::node_ref(|_, _| {});
        assert_eq!(PropKind::classify("style", &"a: b".into()), PropKind::Style);
        assert_eq!(PropKind::classify("ref", &cb), PropKind::Ref);
        assert_eq!(PropKind::classify("ref", &"x".into()), PropKind::Attr);
        assert_eq!(PropKind::classify("className", &"a".into()), PropKind::Class);
        assert_eq!(PropKind::classify("class", &"a".into()), PropKind::Class);
        assert_eq!(
            PropKind::classify("onMouseDown", &handler),
            PropKind::Event(String::from("mousedown"))
        );
        assert_eq!(PropKind::classify("onclick", &"x".into()), PropKind::Attr);
        assert_eq!(
            PropKind::classify("checked", &true.into()),
            PropKind::Flag(ElementFlags::CHECKED)
        );
        assert_eq!(PropKind::classify("value", &"v".into()), PropKind::Value);
        assert_eq!(PropKind::classify("title", &"t".into()), PropKind::Attr);
        assert_eq!(PropKind::classify("on", &handler), PropKind::Attr);
    }

    #[test]
    fn insert_replaces_and_reclassifies() {
        let mut props = Props::new().set("ref", "plain");
        assert_eq!(props.entry("ref").unwrap().kind(), &PropKind::Attr);
        props.insert("ref", PropValue::node_ref(|_, _| {}));
        assert_eq!(props.len(), 1);
        assert_eq!(props.entry("ref").unwrap().kind(), &PropKind::Ref);
        assert!(props.remove("ref").is_some());
        assert!(props.is_empty());
    }

    #[test]
    fn equality_ignores_order_and_uses_handler_identity() {
        let a = Props::new().set("id", "x").class("c");
        let b = Props::new().class("c").set("id", "x");
        assert_eq!(a, b);

        let h = PropValue::handler(|_, _| Ok(()));
        let with_h = a.clone().set("onClick", h.clone());
        assert_eq!(with_h, a.clone().set("onClick", h));
        assert_ne!(with_h, a.on_click(|_, _| Ok(())));
    }

    #[test]
    fn attr_text_mirrors_attribute_rules() {
        assert_eq!(PropValue::Null.attr_text(), None);
        assert_eq!(PropValue::Bool(false).attr_text(), None);
        assert_eq!(PropValue::Bool(true).attr_text().as_deref(), Some("true"));
        assert_eq!(PropValue::Float(3.0).attr_text().as_deref(), Some("3"));
        assert_eq!(PropValue::Bool(false).display_text().as_deref(), Some("false"));
        assert!(!PropValue::Str(String::new()).is_truthy());
        assert!(PropValue::Int(2).is_truthy());
    }

    #[test]
    fn style_maps_hyphenate_on_serialization() {
        let map: StyleMap = [("backgroundColor", "red"), ("fontSize", "12px")]
            .into_iter()
            .collect();
        assert_eq!(map.to_css(), "background-color: red; font-size: 12px;");
        assert_eq!(hyphenate("WebkitTransition"), "-webkit-transition");
        assert_eq!(StyleMap::new().set("opacity", 0.5).get("opacity"), Some("0.5"));
    }
}

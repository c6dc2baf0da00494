// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Inline style declarations backing the `style` attribute.

use alloc::string::String;
use alloc::vec::Vec;

/// Ordered inline style declarations of one element.
///
/// Writing the `style` attribute replaces every declaration; reading it
/// serializes the declarations back to `name: value;` text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Declarations {
    entries: Vec<(String, String)>,
}

impl Declarations {
    /// Parse `a: b; c: d` text. Malformed pieces without a colon are dropped.
    pub(crate) fn parse(text: &str) -> Self {
        let entries = text
            .split(';')
            .filter_map(|decl| {
                let (name, value) = decl.split_once(':')?;
                let name = name.trim();
                if name.is_empty() {
                    return None;
                }
                Some((String::from(name), String::from(value.trim())))
            })
            .collect();
        Self { entries }
    }

    pub(crate) fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns false when the declaration already had this value.
    pub(crate) fn set(&mut self, name: &str, value: &str) -> bool {
        if let Some((_, v)) = self.entries.iter_mut().find(|(n, _)| n == name) {
            if v == value {
                return false;
            }
            *v = String::from(value);
        } else {
            self.entries.push((String::from(name), String::from(value)));
        }
        true
    }

    pub(crate) fn remove(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(n, _)| n != name);
        self.entries.len() != before
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn serialize(&self) -> String {
        let mut out = String::new();
        for (i, (name, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push_str(name);
            out.push_str(": ");
            out.push_str(value);
            out.push(';');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_serialize() {
        let d = Declarations::parse("color: red; margin:0 auto;;bogus; : x");
        assert_eq!(d.get("color"), Some("red"));
        assert_eq!(d.get("margin"), Some("0 auto"));
        assert_eq!(d.serialize(), "color: red; margin: 0 auto;");
    }

    #[test]
    fn set_reports_changes_only() {
        let mut d = Declarations::default();
        assert!(d.set("color", "red"));
        assert!(!d.set("color", "red"));
        assert!(d.set("color", "blue"));
        assert!(d.remove("color"));
        assert!(!d.remove("color"));
        assert!(d.is_empty());
    }
}

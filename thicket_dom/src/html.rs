// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Outer-HTML serialization for diagnostics and tests.

use alloc::string::String;

use crate::document::{Document, NodeData};
use crate::types::NodeId;

impl Document {
    /// Serialize a subtree as HTML.
    ///
    /// Fragments serialize as their children. Live properties (`value` and
    /// [`ElementFlags`](crate::ElementFlags)) are not attributes and are omitted.
    /// Stale ids serialize to the empty string.
    pub fn to_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_html(id, &mut out);
        out
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        let Ok(node) = self.node(id) else {
            return;
        };
        match &node.data {
            NodeData::Text(text) => escape_into(text, false, out),
            NodeData::Fragment => {
                for &child in self.children(id) {
                    self.write_html(child, out);
                }
            }
            NodeData::Element(el) => {
                out.push('<');
                out.push_str(&el.tag);
                for (name, value) in self.attributes(id) {
                    out.push(' ');
                    out.push_str(&name);
                    out.push_str("=\"");
                    escape_into(&value, true, out);
                    out.push('"');
                }
                out.push('>');
                for &child in self.children(id) {
                    self.write_html(child, out);
                }
                out.push_str("</");
                out.push_str(&el.tag);
                out.push('>');
            }
        }
    }
}

fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Document, ElementFlags};

    #[test]
    fn serializes_nested_markup() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        doc.set_attribute(div, "class", "card").unwrap();
        doc.set_style_property(div, "font-size", "12px").unwrap();
        let frag = doc.create_fragment();
        let a = doc.create_text("a < b");
        let input = doc.create_element("input");
        doc.set_value(input, "typed").unwrap();
        doc.set_flag(input, ElementFlags::CHECKED, true).unwrap();
        doc.set_attribute(input, "title", "say \"hi\"").unwrap();
        doc.append_child(frag, a).unwrap();
        doc.append_child(frag, input).unwrap();
        doc.append_child(div, frag).unwrap();
        assert_eq!(
            doc.to_html(div),
            "<div class=\"card\" style=\"font-size: 12px;\">a &lt; b\
             <input title=\"say &quot;hi&quot;\"></input></div>"
        );
    }
}

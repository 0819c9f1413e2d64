#![forbid(unsafe_code)]

//! Serialize a [`Document`] (or a subtree of it) back to XML text.
//!
//! The output is well-formed and re-parses to the same tree.  It is not
//! canonical; use `samlsig-c14n` for digest and signature input.

use crate::document::{Document, NodeId, NodeKind};

impl Document {
    /// Serialize the whole document.
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        for child in self.children(self.root()) {
            write_node(self, *child, &mut out);
        }
        out
    }

    /// Serialize the subtree rooted at `id`.
    pub fn serialize(&self, id: NodeId) -> String {
        let mut out = String::new();
        write_node(self, id, &mut out);
        out
    }
}

fn write_node(doc: &Document, id: NodeId, out: &mut String) {
    match doc.node_kind(id) {
        Some(NodeKind::Document) => {
            for child in doc.children(id) {
                write_node(doc, *child, out);
            }
        }
        Some(NodeKind::Element(elem)) => {
            let name = elem.name.qualified();
            out.push('<');
            out.push_str(&name);
            for (prefix, uri) in &elem.namespace_declarations {
                if prefix.is_empty() {
                    out.push_str(" xmlns=\"");
                } else {
                    out.push_str(" xmlns:");
                    out.push_str(prefix);
                    out.push_str("=\"");
                }
                escape_attr(uri, out);
                out.push('"');
            }
            for attr in &elem.attributes {
                out.push(' ');
                out.push_str(&attr.name.qualified());
                out.push_str("=\"");
                escape_attr(&attr.value, out);
                out.push('"');
            }
            let children = doc.children(id);
            if children.is_empty() {
                out.push_str("/>");
                return;
            }
            out.push('>');
            for child in children {
                write_node(doc, *child, out);
            }
            out.push_str("</");
            out.push_str(&name);
            out.push('>');
        }
        Some(NodeKind::Text(text)) => escape_text(text, out),
        Some(NodeKind::Comment(text)) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        Some(NodeKind::ProcessingInstruction { target, data }) => {
            out.push_str("<?");
            out.push_str(target);
            if let Some(data) = data.as_deref().filter(|d| !d.is_empty()) {
                out.push(' ');
                out.push_str(data);
            }
            out.push_str("?>");
        }
        None => {}
    }
}

fn escape_text(s: &str, out: &mut String) {
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\r' => out.push_str("&#xD;"),
            _ => out.push(ch),
        }
    }
}

// Whitespace is written as character references so attribute-value
// normalization on re-parse leaves the value unchanged.
fn escape_attr(s: &str, out: &mut String) {
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '"' => out.push_str("&quot;"),
            '\t' => out.push_str("&#x9;"),
            '\n' => out.push_str("&#xA;"),
            '\r' => out.push_str("&#xD;"),
            _ => out.push(ch),
        }
    }
}

#![forbid(unsafe_code)]

//! Build a [`Document`] from XML text using `roxmltree`.
//!
//! roxmltree resolves names but does not keep the prefixes written in the
//! source, which canonicalization has to reproduce.  The prefixes are
//! recovered by scanning each element's start tag in the input text.

use crate::document::{Attribute, Document, Element, NodeId, NodeKind, QName};
use samlsig_core::{ns, Error};
use std::collections::BTreeMap;

impl Document {
    /// Parse an XML document from text.
    pub fn parse(text: &str) -> Result<Self, Error> {
        let source = roxmltree::Document::parse_with_options(text, crate::parsing_options())
            .map_err(|e| Error::XmlParse(e.to_string()))?;
        let mut doc = Document::new();
        let root = doc.root();
        let scope = BTreeMap::new();
        for child in source.root().children() {
            copy_node(text, child, &mut doc, root, &scope)?;
        }
        if doc.root_element().is_none() {
            return Err(Error::XmlParse("document has no root element".into()));
        }
        Ok(doc)
    }

    /// Parse an XML document from UTF-8 bytes.
    pub fn parse_bytes(data: &[u8]) -> Result<Self, Error> {
        let text = std::str::from_utf8(data)
            .map_err(|e| Error::XmlParse(format!("invalid UTF-8: {e}")))?;
        Self::parse(text)
    }
}

fn copy_node(
    input: &str,
    src: roxmltree::Node<'_, '_>,
    doc: &mut Document,
    parent: NodeId,
    parent_scope: &BTreeMap<String, String>,
) -> Result<(), Error> {
    match src.node_type() {
        roxmltree::NodeType::Element => {
            let scope: BTreeMap<String, String> = src
                .namespaces()
                .filter(|n| n.name() != Some("xml") && !n.uri().is_empty())
                .map(|n| (n.name().unwrap_or("").to_owned(), n.uri().to_owned()))
                .collect();

            let mut namespace_declarations: Vec<(String, String)> = scope
                .iter()
                .filter(|(prefix, uri)| parent_scope.get(*prefix) != Some(*uri))
                .map(|(p, u)| (p.clone(), u.clone()))
                .collect();
            if parent_scope.contains_key("") && !scope.contains_key("") {
                namespace_declarations.push((String::new(), String::new()));
            }

            let tag = StartTag::scan(&input[src.range().start..]).ok_or_else(|| {
                Error::XmlParse(format!(
                    "cannot read start tag of <{}>",
                    src.tag_name().name()
                ))
            })?;

            let written: Vec<_> = src.attributes().collect();
            let positional = written.len() == tag.attributes.len();
            let attributes = written
                .iter()
                .enumerate()
                .map(|(i, attr)| {
                    let prefix = match attr.namespace() {
                        None => None,
                        Some(ns::XML) => Some("xml".to_owned()),
                        Some(uri) => positional
                            .then(|| prefix_of(tag.attributes[i]))
                            .flatten()
                            .map(str::to_owned)
                            .or_else(|| lookup_prefix(&scope, uri)),
                    };
                    Attribute {
                        name: QName {
                            prefix,
                            local_name: attr.name().to_owned(),
                            namespace_uri: attr.namespace().map(str::to_owned),
                        },
                        value: attr.value().to_owned(),
                    }
                })
                .collect();

            let element = Element {
                name: QName {
                    prefix: prefix_of(tag.name).map(str::to_owned),
                    local_name: src.tag_name().name().to_owned(),
                    namespace_uri: src.tag_name().namespace().map(str::to_owned),
                },
                attributes,
                namespace_declarations,
            };
            let id = doc.append_child(parent, NodeKind::Element(element));
            for child in src.children() {
                copy_node(input, child, doc, id, &scope)?;
            }
        }
        roxmltree::NodeType::Text => {
            doc.append_child(parent, NodeKind::Text(src.text().unwrap_or("").to_owned()));
        }
        roxmltree::NodeType::Comment => {
            doc.append_child(
                parent,
                NodeKind::Comment(src.text().unwrap_or("").to_owned()),
            );
        }
        roxmltree::NodeType::PI => {
            if let Some(pi) = src.pi() {
                doc.append_child(
                    parent,
                    NodeKind::ProcessingInstruction {
                        target: pi.target.to_owned(),
                        data: pi.value.map(str::to_owned),
                    },
                );
            }
        }
        roxmltree::NodeType::Root => {}
    }
    Ok(())
}

fn prefix_of(qname: &str) -> Option<&str> {
    qname.split_once(':').map(|(prefix, _)| prefix)
}

fn lookup_prefix(scope: &BTreeMap<String, String>, uri: &str) -> Option<String> {
    scope
        .iter()
        .find(|(prefix, u)| !prefix.is_empty() && u.as_str() == uri)
        .map(|(prefix, _)| prefix.clone())
}

/// Qualified names as written in an element's start tag.
struct StartTag<'a> {
    name: &'a str,
    /// Attribute names in document order, `xmlns` declarations excluded.
    attributes: Vec<&'a str>,
}

impl<'a> StartTag<'a> {
    /// Scan the start tag at the beginning of `text` (which starts at `<`).
    fn scan(text: &'a str) -> Option<Self> {
        let bytes = text.as_bytes();
        if bytes.first() != Some(&b'<') {
            return None;
        }
        let mut pos = 1;
        while pos < bytes.len() && !is_name_end(bytes[pos]) {
            pos += 1;
        }
        let name = &text[1..pos];

        let mut attributes = Vec::new();
        loop {
            while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }
            match bytes.get(pos)? {
                b'>' | b'/' => break,
                _ => {}
            }
            let start = pos;
            while pos < bytes.len() && bytes[pos] != b'=' && !bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }
            let qname = &text[start..pos];
            while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }
            if bytes.get(pos) != Some(&b'=') {
                return None;
            }
            pos += 1;
            while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }
            let quote = *bytes.get(pos)?;
            if quote != b'"' && quote != b'\'' {
                return None;
            }
            pos += 1;
            pos += bytes[pos..].iter().position(|b| *b == quote)? + 1;

            if qname != "xmlns" && !qname.starts_with("xmlns:") {
                attributes.push(qname);
            }
        }
        Some(Self { name, attributes })
    }
}

fn is_name_end(b: u8) -> bool {
    b.is_ascii_whitespace() || b == b'/' || b == b'>'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixes_are_preserved() {
        let doc = Document::parse(
            r#"<p:R xmlns:p="urn:p" xmlns:q="urn:q" q:a="1" b='2'><q:C/></p:R>"#,
        )
        .unwrap();
        let root = doc.root_element().unwrap();
        let elem = doc.element(root).unwrap();
        assert_eq!(elem.name.qualified(), "p:R");
        assert_eq!(elem.name.namespace_uri.as_deref(), Some("urn:p"));
        assert_eq!(elem.attributes[0].name.qualified(), "q:a");
        assert_eq!(elem.attributes[1].name.qualified(), "b");
        assert_eq!(
            elem.namespace_declarations,
            vec![
                ("p".to_owned(), "urn:p".to_owned()),
                ("q".to_owned(), "urn:q".to_owned())
            ]
        );

        let child = doc.first_child_element(root, "urn:q", "C").unwrap();
        let child_elem = doc.element(child).unwrap();
        assert_eq!(child_elem.name.qualified(), "q:C");
        assert!(child_elem.namespace_declarations.is_empty());
    }

    #[test]
    fn test_default_namespace_undeclaration() {
        let doc = Document::parse(r#"<a xmlns="urn:d"><b xmlns=""/></a>"#).unwrap();
        let root = doc.root_element().unwrap();
        let b = doc.children(root)[0];
        assert_eq!(
            doc.element(b).unwrap().namespace_declarations,
            vec![(String::new(), String::new())]
        );
    }

    #[test]
    fn test_text_comment_and_entities() {
        let doc = Document::parse("<a>x &amp; y<!-- note --><![CDATA[<z>]]></a>").unwrap();
        let root = doc.root_element().unwrap();
        let kinds: Vec<_> = doc
            .children(root)
            .iter()
            .map(|c| doc.node_kind(*c).unwrap().clone())
            .collect();
        assert_eq!(kinds[0], NodeKind::Text("x & y".into()));
        assert_eq!(kinds[1], NodeKind::Comment(" note ".into()));
        assert_eq!(doc.text(root), "x & y<z>");
    }

    #[test]
    fn test_xml_prefixed_attribute() {
        let doc = Document::parse(r#"<a xml:lang="en"/>"#).unwrap();
        let root = doc.root_element().unwrap();
        let attr = &doc.element(root).unwrap().attributes[0];
        assert_eq!(attr.name.qualified(), "xml:lang");
    }

    #[test]
    fn test_dtd_is_rejected() {
        let err = Document::parse(r#"<!DOCTYPE a [<!ENTITY e "x">]><a>&e;</a>"#).unwrap_err();
        assert!(matches!(err, Error::XmlParse(_)));
    }

    #[test]
    fn test_invalid_xml() {
        assert!(matches!(
            Document::parse("<a><b></a>"),
            Err(Error::XmlParse(_))
        ));
        assert!(matches!(
            Document::parse_bytes(&[0xff, 0xfe]),
            Err(Error::XmlParse(_))
        ));
    }
}

#![forbid(unsafe_code)]

//! Exclusive Canonical XML 1.0 (exc-C14N).
//!
//! Algorithm URI: `http://www.w3.org/2001/10/xml-exc-c14n#`
//! With comments: `http://www.w3.org/2001/10/xml-exc-c14n#WithComments`
//!
//! Only "visibly utilized" namespace declarations are output.  A namespace
//! is visibly utilized by an element if:
//! 1. Its prefix is used by the element's tag name, OR
//! 2. Its prefix is used by one of the element's attributes, OR
//! 3. The prefix appears in the InclusiveNamespaces PrefixList.
//!
//! The node set is the subtree rooted at the apex, minus the subtree rooted
//! at the excluded node (the enveloped signature).

use crate::escape;
use crate::render::{Attr, NsDecl};
use samlsig_core::{ns, Error};
use samlsig_xml::{Document, Element, NodeId, NodeKind};
use std::collections::{BTreeMap, HashSet};

/// Canonicalize the subtree rooted at `apex` using Exclusive C14N 1.0.
pub fn canonicalize(
    doc: &Document,
    apex: NodeId,
    excluded: Option<NodeId>,
    with_comments: bool,
    inclusive_prefixes: &[String],
) -> Result<Vec<u8>, Error> {
    if doc.node_kind(apex).is_none() {
        return Err(Error::Canonicalization(format!(
            "node {} does not exist",
            apex.index()
        )));
    }
    let prefix_set = inclusive_prefixes
        .iter()
        .map(|p| if p == "#default" { String::new() } else { p.clone() })
        .collect();
    let ctx = ExcC14nContext {
        doc,
        excluded,
        with_comments,
        inclusive_prefixes: prefix_set,
    };
    let mut output = Vec::new();
    ctx.process_node(apex, &mut output, &BTreeMap::new())?;
    Ok(output)
}

struct ExcC14nContext<'a> {
    doc: &'a Document,
    excluded: Option<NodeId>,
    with_comments: bool,
    /// PrefixList entries, `#default` already mapped to `""`.
    inclusive_prefixes: HashSet<String>,
}

impl ExcC14nContext<'_> {
    fn process_node(
        &self,
        id: NodeId,
        output: &mut Vec<u8>,
        rendered_ns: &BTreeMap<String, String>,
    ) -> Result<(), Error> {
        if self.excluded == Some(id) {
            return Ok(());
        }
        match self.doc.node_kind(id) {
            Some(NodeKind::Document) => {
                // Whitespace outside the document element is not part of
                // the canonical form.
                for child in self.doc.children(id) {
                    if !matches!(self.doc.node_kind(*child), Some(NodeKind::Text(_))) {
                        self.process_node(*child, output, rendered_ns)?;
                    }
                }
            }
            Some(NodeKind::Element(elem)) => {
                self.process_element(id, elem, output, rendered_ns)?;
            }
            Some(NodeKind::Text(text)) => escape::write_text(text, output),
            Some(NodeKind::Comment(text)) => {
                if self.with_comments {
                    self.top_level(id, output, |output| {
                        output.extend_from_slice(b"<!--");
                        output.extend_from_slice(text.as_bytes());
                        output.extend_from_slice(b"-->");
                    });
                }
            }
            Some(NodeKind::ProcessingInstruction { target, data }) => {
                self.top_level(id, output, |output| {
                    output.extend_from_slice(b"<?");
                    output.extend_from_slice(target.as_bytes());
                    if let Some(value) = data.as_deref().filter(|v| !v.is_empty()) {
                        output.push(b' ');
                        escape::write_pi(value, output);
                    }
                    output.extend_from_slice(b"?>");
                });
            }
            None => {
                return Err(Error::Canonicalization(format!(
                    "node {} does not exist",
                    id.index()
                )))
            }
        }
        Ok(())
    }

    /// Write a comment or PI, separating it by a line break from the document
    /// element when it sits outside of it.
    fn top_level(&self, id: NodeId, output: &mut Vec<u8>, write: impl FnOnce(&mut Vec<u8>)) {
        let siblings = match self.doc.parent(id) {
            Some(p) if matches!(self.doc.node_kind(p), Some(NodeKind::Document)) => {
                self.doc.children(p)
            }
            _ => {
                write(output);
                return;
            }
        };
        let (before, after) = match siblings.iter().position(|s| *s == id) {
            Some(pos) => (&siblings[..pos], &siblings[pos + 1..]),
            None => (siblings, &[][..]),
        };
        let is_element = |s: &NodeId| self.doc.element(*s).is_some();
        if before.iter().any(is_element) {
            output.push(b'\n');
        }
        write(output);
        if after.iter().any(is_element) {
            output.push(b'\n');
        }
    }

    fn process_element(
        &self,
        id: NodeId,
        elem: &Element,
        output: &mut Vec<u8>,
        rendered_ns: &BTreeMap<String, String>,
    ) -> Result<(), Error> {
        let mut utilized_prefixes: HashSet<&str> = HashSet::new();
        utilized_prefixes.insert(elem.name.prefix.as_deref().unwrap_or(""));
        for attr in &elem.attributes {
            if let Some(prefix) = attr_prefix(attr) {
                if !prefix.is_empty() {
                    utilized_prefixes.insert(prefix);
                }
            }
        }
        for p in &self.inclusive_prefixes {
            utilized_prefixes.insert(p.as_str());
        }

        let inscope_ns = collect_inscope_namespaces(self.doc, id);

        let mut ns_decls: Vec<NsDecl> = Vec::new();
        for prefix in utilized_prefixes {
            if prefix == "xml" {
                continue;
            }
            match inscope_ns.get(prefix) {
                Some(uri) => {
                    if rendered_ns.get(prefix) != Some(uri) {
                        ns_decls.push(NsDecl {
                            prefix: prefix.to_owned(),
                            uri: uri.clone(),
                        });
                    }
                }
                // The default namespace is not in scope here but an output
                // ancestor rendered one: undeclare it.
                None if prefix.is_empty() => {
                    if rendered_ns.get("").is_some_and(|uri| !uri.is_empty()) {
                        ns_decls.push(NsDecl {
                            prefix: String::new(),
                            uri: String::new(),
                        });
                    }
                }
                None => {}
            }
        }
        ns_decls.sort();

        let mut attrs: Vec<Attr> = elem
            .attributes
            .iter()
            .map(|attr| {
                let qualified_name = match attr_prefix(attr) {
                    Some(prefix) if !prefix.is_empty() => {
                        format!("{prefix}:{}", attr.name.local_name)
                    }
                    _ => attr.name.local_name.clone(),
                };
                Attr {
                    ns_uri: attr.name.namespace_uri.clone().unwrap_or_default(),
                    local_name: attr.name.local_name.clone(),
                    qualified_name,
                    value: attr.value.clone(),
                }
            })
            .collect();
        attrs.sort();

        let elem_name = elem.name.qualified();
        output.push(b'<');
        output.extend_from_slice(elem_name.as_bytes());
        for ns_decl in &ns_decls {
            ns_decl.write(output);
        }
        for attr in &attrs {
            attr.write(output);
        }
        output.push(b'>');

        let mut child_rendered_ns = rendered_ns.clone();
        for ns_decl in ns_decls {
            child_rendered_ns.insert(ns_decl.prefix, ns_decl.uri);
        }
        for child in self.doc.children(id) {
            self.process_node(*child, output, &child_rendered_ns)?;
        }

        output.extend_from_slice(b"</");
        output.extend_from_slice(elem_name.as_bytes());
        output.push(b'>');
        Ok(())
    }
}

/// The prefix of a namespaced attribute, `None` for unqualified ones.
fn attr_prefix(attr: &samlsig_xml::Attribute) -> Option<&str> {
    match attr.name.namespace_uri.as_deref()? {
        ns::XML => Some("xml"),
        _ => Some(attr.name.prefix.as_deref().unwrap_or("")),
    }
}

/// Collect all in-scope namespaces for an element.
///
/// An `xmlns=""` undeclaration removes the default namespace from scope.
fn collect_inscope_namespaces(doc: &Document, id: NodeId) -> BTreeMap<String, String> {
    let mut chain = Vec::new();
    let mut current = Some(id);
    while let Some(n) = current {
        if let Some(elem) = doc.element(n) {
            chain.push(elem);
        }
        current = doc.parent(n);
    }

    let mut result = BTreeMap::new();
    for elem in chain.into_iter().rev() {
        for (prefix, uri) in &elem.namespace_declarations {
            if uri.is_empty() {
                result.remove(prefix);
            } else {
                result.insert(prefix.clone(), uri.clone());
            }
        }
    }
    result
}

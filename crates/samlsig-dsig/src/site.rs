#![forbid(unsafe_code)]

//! Locating signature sites and the DSig elements inside them.
//!
//! A site is a `ds:Signature` element together with the element it signs
//! (its parent).  A SAML message has at most two: the signature on the
//! message itself and the one on its `saml:Assertion`.

use samlsig_core::{ns, Error};
use samlsig_xml::{Document, NodeId};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteKind {
    Assertion,
    Root,
}

impl fmt::Display for SiteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Assertion => "assertion",
            Self::Root => "root",
        })
    }
}

/// A `ds:Signature` element and the DSig elements the profile requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureSite {
    pub kind: SiteKind,
    pub signature: NodeId,
    /// The signed element.
    pub parent: NodeId,
    pub signed_info: NodeId,
    /// The single `ds:Reference` of `SignedInfo`.
    pub reference: NodeId,
    pub signature_value: NodeId,
}

impl SignatureSite {
    /// Resolve the elements of the signature rooted at `signature`.
    pub fn locate(doc: &Document, signature: NodeId, kind: SiteKind) -> Result<Self, Error> {
        let parent = doc
            .parent(signature)
            .filter(|p| doc.element(*p).is_some())
            .ok_or_else(|| Error::XmlStructure("Signature has no parent element".into()))?;
        let signed_info = required_child(doc, signature, ns::node::SIGNED_INFO)?;

        let references = doc.child_elements(signed_info, ns::DSIG, ns::node::REFERENCE);
        let reference = match references.as_slice() {
            [] => return Err(Error::MissingElement(ns::node::REFERENCE.into())),
            [reference] => *reference,
            _ => {
                return Err(Error::XmlStructure(format!(
                    "SignedInfo has {} References, expected exactly one",
                    references.len()
                )))
            }
        };
        let signature_value = required_child(doc, signature, ns::node::SIGNATURE_VALUE)?;

        Ok(Self {
            kind,
            signature,
            parent,
            signed_info,
            reference,
            signature_value,
        })
    }
}

/// The message signature: first `ds:Signature` child of the document element.
pub fn root_signature(doc: &Document) -> Result<Option<NodeId>, Error> {
    let root = doc
        .root_element()
        .ok_or_else(|| Error::XmlStructure("document has no root element".into()))?;
    Ok(doc.first_child_element(root, ns::DSIG, ns::node::SIGNATURE))
}

/// The signature on the first `saml:Assertion` child of the document element.
pub fn assertion_signature(doc: &Document) -> Option<NodeId> {
    let root = doc.root_element()?;
    let assertion = doc.first_child_element(root, ns::SAML_ASSERTION, ns::node::ASSERTION)?;
    doc.first_child_element(assertion, ns::DSIG, ns::node::SIGNATURE)
}

pub(crate) fn required_child(doc: &Document, parent: NodeId, local_name: &str) -> Result<NodeId, Error> {
    doc.first_child_element(parent, ns::DSIG, local_name)
        .ok_or_else(|| Error::MissingElement(local_name.into()))
}

/// The `Algorithm` attribute of the DSig child `local_name` of `parent`.
pub(crate) fn algorithm_of<'a>(
    doc: &'a Document,
    parent: NodeId,
    local_name: &str,
) -> Result<&'a str, Error> {
    let node = required_child(doc, parent, local_name)?;
    doc.attribute(node, ns::attr::ALGORITHM)
        .ok_or_else(|| Error::MissingAttribute(format!("Algorithm on {local_name}")))
}

/// Element text with XML whitespace removed (base64 is often line-wrapped).
pub(crate) fn base64_text(doc: &Document, node: NodeId) -> String {
    doc.text(node)
        .chars()
        .filter(|c| !matches!(c, ' ' | '\t' | '\n' | '\r'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r##"<samlp:Response xmlns:samlp="urn:oasis:names:tc:SAML:2.0:protocol" xmlns:saml="urn:oasis:names:tc:SAML:2.0:assertion" xmlns:ds="http://www.w3.org/2000/09/xmldsig#" ID="_r">
<ds:Signature><ds:SignedInfo><ds:Reference URI="#_r"/></ds:SignedInfo><ds:SignatureValue/></ds:Signature>
<saml:Assertion ID="_a"><ds:Signature><ds:SignedInfo><ds:Reference URI="#_a"/></ds:SignedInfo><ds:SignatureValue>
AAAA
BBBB</ds:SignatureValue></ds:Signature></saml:Assertion>
</samlp:Response>"##;

    #[test]
    fn test_locate_both_sites() {
        let doc = Document::parse(RESPONSE).unwrap();
        let root = doc.root_element().unwrap();

        let sig = root_signature(&doc).unwrap().unwrap();
        let site = SignatureSite::locate(&doc, sig, SiteKind::Root).unwrap();
        assert_eq!(site.parent, root);
        assert_eq!(doc.attribute(site.reference, "URI"), Some("#_r"));

        let sig = assertion_signature(&doc).unwrap();
        let site = SignatureSite::locate(&doc, sig, SiteKind::Assertion).unwrap();
        assert_eq!(doc.attribute(site.parent, "ID"), Some("_a"));
        assert_eq!(base64_text(&doc, site.signature_value), "AAAABBBB");
    }

    #[test]
    fn test_unsigned_document_has_no_sites() {
        let doc = Document::parse(r#"<samlp:Response xmlns:samlp="urn:oasis:names:tc:SAML:2.0:protocol"/>"#).unwrap();
        assert_eq!(root_signature(&doc).unwrap(), None);
        assert_eq!(assertion_signature(&doc), None);
    }

    #[test]
    fn test_nested_signature_is_not_the_root_signature() {
        let doc = Document::parse(
            r#"<r xmlns:ds="http://www.w3.org/2000/09/xmldsig#"><x><ds:Signature/></x></r>"#,
        )
        .unwrap();
        assert_eq!(root_signature(&doc).unwrap(), None);
    }

    #[test]
    fn test_missing_and_duplicate_elements() {
        let doc = Document::parse(
            r#"<r xmlns:ds="http://www.w3.org/2000/09/xmldsig#"><ds:Signature><ds:SignedInfo/></ds:Signature></r>"#,
        )
        .unwrap();
        let sig = root_signature(&doc).unwrap().unwrap();
        assert!(matches!(
            SignatureSite::locate(&doc, sig, SiteKind::Root),
            Err(Error::MissingElement(name)) if name == "Reference"
        ));

        let doc = Document::parse(
            r#"<r xmlns:ds="http://www.w3.org/2000/09/xmldsig#"><ds:Signature><ds:SignedInfo><ds:Reference/><ds:Reference/></ds:SignedInfo><ds:SignatureValue/></ds:Signature></r>"#,
        )
        .unwrap();
        let sig = root_signature(&doc).unwrap().unwrap();
        assert!(matches!(
            SignatureSite::locate(&doc, sig, SiteKind::Root),
            Err(Error::XmlStructure(_))
        ));
    }

    #[test]
    fn test_missing_algorithm() {
        let doc = Document::parse(
            r#"<r xmlns:ds="http://www.w3.org/2000/09/xmldsig#"><ds:SignatureMethod/></r>"#,
        )
        .unwrap();
        let root = doc.root_element().unwrap();
        assert!(matches!(
            algorithm_of(&doc, root, "SignatureMethod"),
            Err(Error::MissingAttribute(_))
        ));
        assert!(matches!(
            algorithm_of(&doc, root, "DigestMethod"),
            Err(Error::MissingElement(_))
        ));
    }
}

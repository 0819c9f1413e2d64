#![forbid(unsafe_code)]

//! Reference validation: linkage to the signed element and the transform
//! chain the SAML signature profile allows.

use crate::site::SignatureSite;
use samlsig_c14n::C14nMode;
use samlsig_core::{algorithm, ns, Error};
use samlsig_xml::{Document, NodeId};

/// What the transform chain asks of the digest canonicalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformInfo {
    pub mode: C14nMode,
    /// The InclusiveNamespaces PrefixList, if the C14N transform carries one.
    pub prefix_list: Option<Vec<String>>,
}

impl TransformInfo {
    pub fn with_comments(&self) -> bool {
        self.mode.with_comments()
    }

    pub fn inclusive_prefixes(&self) -> &[String] {
        self.prefix_list.as_deref().unwrap_or(&[])
    }
}

/// Check that the Reference URI is `#` followed by the parent's `ID`.
pub fn validate_linkage(doc: &Document, site: &SignatureSite) -> Result<(), Error> {
    let uri = doc.attribute(site.reference, ns::attr::URI).unwrap_or("");
    let id = doc.attribute(site.parent, ns::attr::ID).unwrap_or("");
    if id.is_empty() || uri.strip_prefix('#') != Some(id) {
        return Err(Error::Linkage {
            uri: uri.to_owned(),
            id: id.to_owned(),
        });
    }
    Ok(())
}

/// Check that the Reference has exactly the enveloped-signature transform
/// followed by an exclusive C14N transform.
pub fn validate_transforms(doc: &Document, reference: NodeId) -> Result<TransformInfo, Error> {
    let transforms = doc
        .first_child_element(reference, ns::DSIG, ns::node::TRANSFORMS)
        .ok_or_else(|| Error::UnsupportedTransform("Reference has no Transforms".into()))?;
    let transforms = doc.child_elements(transforms, ns::DSIG, ns::node::TRANSFORM);
    let [enveloped, c14n] = transforms.as_slice() else {
        return Err(Error::UnsupportedTransform(format!(
            "expected 2 transforms, found {}",
            transforms.len()
        )));
    };

    let first = transform_algorithm(doc, *enveloped)?;
    if first != algorithm::ENVELOPED_SIGNATURE {
        return Err(Error::UnsupportedTransform(format!(
            "unexpected digest transform {first}"
        )));
    }

    let second = transform_algorithm(doc, *c14n)?;
    let mode = C14nMode::from_uri(second).ok_or_else(|| {
        Error::UnsupportedTransform(format!("unexpected digest transform {second}"))
    })?;

    let prefix_list = doc
        .first_child_named(*c14n, ns::node::INCLUSIVE_NAMESPACES)
        .map(|node| {
            doc.attribute(node, ns::attr::PREFIX_LIST)
                .unwrap_or("")
                .split_whitespace()
                .map(str::to_owned)
                .collect()
        });

    Ok(TransformInfo { mode, prefix_list })
}

fn transform_algorithm(doc: &Document, transform: NodeId) -> Result<&str, Error> {
    doc.attribute(transform, ns::attr::ALGORITHM)
        .ok_or_else(|| Error::MissingAttribute("Algorithm on Transform".into()))
}

#![forbid(unsafe_code)]

//! Exclusive XML Canonicalization 1.0 (with and without comments).
//!
//! Only the exclusive variant exists here: it is the one canonicalization
//! the SAML V2.0 signature profile admits, for both the Reference transform
//! chain and `SignedInfo`.

pub mod escape;
pub mod exclusive;
pub mod render;

use samlsig_core::{algorithm, Error};
use samlsig_xml::{Document, NodeId};

/// The canonicalization mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum C14nMode {
    /// Exclusive Canonical XML 1.0
    Exclusive,
    /// Exclusive Canonical XML 1.0 with comments
    ExclusiveWithComments,
}

impl C14nMode {
    /// Get the algorithm URI for this mode.
    pub fn uri(&self) -> &'static str {
        match self {
            Self::Exclusive => algorithm::EXC_C14N,
            Self::ExclusiveWithComments => algorithm::EXC_C14N_WITH_COMMENTS,
        }
    }

    /// Parse a C14N mode from an algorithm URI.
    ///
    /// The URI must be the exclusive C14N URI, optionally followed by
    /// exactly `WithComments`.
    pub fn from_uri(uri: &str) -> Option<Self> {
        match uri.strip_prefix(algorithm::EXC_C14N)? {
            "" => Some(Self::Exclusive),
            algorithm::WITH_COMMENTS_SUFFIX => Some(Self::ExclusiveWithComments),
            _ => None,
        }
    }

    pub fn with_comments(&self) -> bool {
        matches!(self, Self::ExclusiveWithComments)
    }
}

/// Canonicalize the subtree rooted at `apex`, leaving out the subtree
/// rooted at `excluded` (if any).
///
/// `inclusive_prefixes` is the InclusiveNamespaces PrefixList; `#default`
/// stands for the default namespace.
pub fn canonicalize(
    doc: &Document,
    apex: NodeId,
    excluded: Option<NodeId>,
    mode: C14nMode,
    inclusive_prefixes: &[String],
) -> Result<Vec<u8>, Error> {
    exclusive::canonicalize(doc, apex, excluded, mode.with_comments(), inclusive_prefixes)
}

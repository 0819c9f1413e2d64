#![forbid(unsafe_code)]

//! XML document model for samlsig.
//!
//! `roxmltree` parses the input; the tree is then copied into an owned,
//! mutable arena ([`Document`]) so that signing can assign IDs and fill in
//! `DigestValue`/`SignatureValue` in place.  Nodes refer to each other by
//! [`NodeId`] index only; the document owns every node.

pub mod document;
pub mod parse;
pub mod writer;

pub use document::{Attribute, Document, Element, NodeId, NodeKind, QName};

/// roxmltree parsing options.
///
/// DTDs are refused: a SAML message never needs one and an internal subset
/// is the usual vehicle for entity-expansion tricks.
pub fn parsing_options() -> roxmltree::ParsingOptions {
    roxmltree::ParsingOptions {
        allow_dtd: false,
        ..roxmltree::ParsingOptions::default()
    }
}

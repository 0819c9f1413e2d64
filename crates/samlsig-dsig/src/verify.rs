#![forbid(unsafe_code)]

//! SAML signature verification.
//!
//! Processing order (SAML V2.0 profiles, 4.1.4.3):
//! 1. The message must carry a root `ds:Signature`
//! 2. The assertion signature, if any: digest, then signature value
//! 3. The root signature: digest, then signature value
//!
//! The first mismatch ends verification with `Ok(false)`; a document that
//! does not follow the signature profile is an error.

use crate::context::DsigContext;
use crate::digest::verify_digest;
use crate::signature::verify_signature_value;
use crate::site::{self, SignatureSite, SiteKind};
use samlsig_core::Error;
use samlsig_keys::Key;
use samlsig_xml::Document;
use tracing::debug;

/// Verify the signatures of a SAML message.
pub fn verify(ctx: &DsigContext, doc: &Document) -> Result<bool, Error> {
    let root_signature = site::root_signature(doc)?.ok_or(Error::UnsignedMessage)?;
    let sites = [
        (SiteKind::Assertion, site::assertion_signature(doc)),
        (SiteKind::Root, Some(root_signature)),
    ];

    for (kind, signature) in sites {
        let Some(signature) = signature else {
            continue;
        };
        let site = SignatureSite::locate(doc, signature, kind)?;
        debug!(site = %kind, "verifying signature");
        if !verify_digest(ctx, doc, &site)? || !verify_signature_value(ctx, doc, &site)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Verify the signatures of a SAML message with a public key.
pub fn verify_saml_signature(doc: &Document, key: &Key) -> Result<bool, Error> {
    verify(&DsigContext::new(key.clone()), doc)
}

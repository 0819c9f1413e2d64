#![forbid(unsafe_code)]

//! `SignatureValue`: RSA signature over the canonical `SignedInfo`.

use crate::context::DsigContext;
use crate::site::{self, SignatureSite};
use base64::Engine;
use samlsig_c14n::C14nMode;
use samlsig_core::{ns, Error};
use samlsig_crypto::SignatureMethod;
use samlsig_xml::{Document, NodeId};
use tracing::{debug, warn};

/// Canonicalize `SignedInfo` with its own CanonicalizationMethod.
///
/// Only the comments switch of the method applies: nothing is excluded and
/// no prefix list is used.
pub fn canonicalize_signed_info(doc: &Document, signed_info: NodeId) -> Result<Vec<u8>, Error> {
    let uri = site::algorithm_of(doc, signed_info, ns::node::CANONICALIZATION_METHOD)?;
    let mode = C14nMode::from_uri(uri)
        .ok_or_else(|| Error::UnsupportedAlgorithm(format!("C14N: {uri}")))?;
    samlsig_c14n::canonicalize(doc, signed_info, None, mode, &[])
}

fn signature_method(doc: &Document, site: &SignatureSite) -> Result<SignatureMethod, Error> {
    SignatureMethod::from_uri(site::algorithm_of(
        doc,
        site.signed_info,
        ns::node::SIGNATURE_METHOD,
    )?)
}

fn signed_info_bytes(ctx: &DsigContext, doc: &Document, site: &SignatureSite) -> Result<Vec<u8>, Error> {
    let canonical = canonicalize_signed_info(doc, site.signed_info)?;
    if ctx.debug {
        debug!(
            site = %site.kind,
            data = %String::from_utf8_lossy(&canonical),
            "pre-signature data"
        );
    }
    Ok(canonical)
}

/// Verify `SignatureValue` against the canonical `SignedInfo` with the
/// context's public key.
pub fn verify_signature_value(
    ctx: &DsigContext,
    doc: &Document,
    site: &SignatureSite,
) -> Result<bool, Error> {
    let method = signature_method(doc, site)?;
    let data = signed_info_bytes(ctx, doc, site)?;

    let sig_value = base64::engine::general_purpose::STANDARD
        .decode(site::base64_text(doc, site.signature_value))
        .map_err(|e| Error::Base64(format!("SignatureValue: {e}")))?;
    debug!(site = %site.kind, method = method.uri(), "verifying signature value");

    let valid = ctx.key.verify(method, &data, &sig_value)?;
    if !valid {
        warn!(site = %site.kind, "signature value mismatch");
    }
    Ok(valid)
}

/// Sign the canonical `SignedInfo` with the context's private key and write
/// the result into `SignatureValue`.
pub fn produce_signature_value(
    ctx: &DsigContext,
    doc: &mut Document,
    site: &SignatureSite,
) -> Result<(), Error> {
    let method = signature_method(doc, site)?;
    let data = signed_info_bytes(ctx, doc, site)?;
    let sig = ctx.key.sign(method, &data)?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(sig);
    doc.set_text(site.signature_value, &encoded)
}

#![forbid(unsafe_code)]

//! Reference digest: exclusive C14N of the signed element with the
//! signature itself left out, hashed with the Reference's DigestMethod.

use crate::context::DsigContext;
use crate::reference;
use crate::site::{self, SignatureSite};
use base64::Engine;
use samlsig_c14n::exclusive;
use samlsig_core::{ns, Error};
use samlsig_crypto::DigestMethod;
use samlsig_xml::Document;
use tracing::{debug, warn};

/// Compute the base64 digest of the element signed at `site`.
fn compute_digest(ctx: &DsigContext, doc: &Document, site: &SignatureSite) -> Result<String, Error> {
    reference::validate_linkage(doc, site)?;
    let transforms = reference::validate_transforms(doc, site.reference)?;
    let method = DigestMethod::from_uri(site::algorithm_of(
        doc,
        site.reference,
        ns::node::DIGEST_METHOD,
    )?)?;

    let canonical = exclusive::canonicalize(
        doc,
        site.parent,
        Some(site.signature),
        transforms.with_comments(),
        transforms.inclusive_prefixes(),
    )?;
    if ctx.debug {
        debug!(
            site = %site.kind,
            data = %String::from_utf8_lossy(&canonical),
            "pre-digest data"
        );
    }

    let digest = method.digest(&canonical);
    Ok(base64::engine::general_purpose::STANDARD.encode(digest))
}

/// Recompute the Reference digest and compare it with `DigestValue`.
pub fn verify_digest(ctx: &DsigContext, doc: &Document, site: &SignatureSite) -> Result<bool, Error> {
    let computed = compute_digest(ctx, doc, site)?;
    let digest_value = site::required_child(doc, site.reference, ns::node::DIGEST_VALUE)?;
    let expected = site::base64_text(doc, digest_value);
    debug!(site = %site.kind, %computed, %expected, "reference digest");

    let valid = computed == expected;
    if !valid {
        warn!(site = %site.kind, "reference digest mismatch");
    }
    Ok(valid)
}

/// Compute the Reference digest and write it into `DigestValue`.
pub fn produce_digest(ctx: &DsigContext, doc: &mut Document, site: &SignatureSite) -> Result<(), Error> {
    let computed = compute_digest(ctx, doc, site)?;
    let digest_value = site::required_child(doc, site.reference, ns::node::DIGEST_VALUE)?;
    debug!(site = %site.kind, %computed, "produced reference digest");
    doc.set_text(digest_value, &computed)
}

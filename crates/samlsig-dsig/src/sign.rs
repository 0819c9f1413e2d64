#![forbid(unsafe_code)]

//! SAML message signing.
//!
//! Signs a template whose root `ds:Signature` already holds the complete
//! `SignedInfo`, with empty `DigestValue` and `SignatureValue`.

use crate::context::DsigContext;
use crate::digest::produce_digest;
use crate::signature::produce_signature_value;
use crate::site::{self, SignatureSite, SiteKind};
use chrono::{SecondsFormat, Utc};
use samlsig_core::{ns, Error};
use samlsig_crypto::random::random_id;
use samlsig_keys::Key;
use samlsig_xml::Document;
use tracing::info;

/// Sign a SAML message template in place.
///
/// The root element gets a fresh random `ID` (referenced by the signature)
/// and the current time as `IssueInstant`.
pub fn sign(ctx: &DsigContext, doc: &mut Document) -> Result<(), Error> {
    let id = random_id();
    let issue_instant = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    sign_with(ctx, doc, &id, &issue_instant)
}

/// Sign a SAML message template in place with the given `ID` and `IssueInstant`.
pub fn sign_with(
    ctx: &DsigContext,
    doc: &mut Document,
    id: &str,
    issue_instant: &str,
) -> Result<(), Error> {
    if ctx.key.private_key().is_none() {
        return Err(Error::Key("signing requires a private key".into()));
    }
    let root = doc
        .root_element()
        .ok_or_else(|| Error::XmlStructure("document has no root element".into()))?;
    let signature = site::root_signature(doc)?
        .ok_or_else(|| Error::MissingElement(ns::node::SIGNATURE.into()))?;
    let site = SignatureSite::locate(doc, signature, SiteKind::Root)?;

    doc.set_attribute(root, ns::attr::ID, id)?;
    doc.set_attribute(site.reference, ns::attr::URI, &format!("#{id}"))?;
    doc.set_attribute(root, ns::attr::ISSUE_INSTANT, issue_instant)?;

    produce_digest(ctx, doc, &site)?;
    produce_signature_value(ctx, doc, &site)?;
    info!(id, issue_instant, "signed SAML message");
    Ok(())
}

/// Sign a SAML message template in place with a private key.
pub fn sign_saml(doc: &mut Document, key: &Key) -> Result<(), Error> {
    sign(&DsigContext::new(key.clone()), doc)
}

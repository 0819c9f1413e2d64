#![forbid(unsafe_code)]

//! SAML 2.0 XML Signature profile.
//!
//! Verifies and produces enveloped signatures restricted to what the SAML
//! V2.0 signature profile allows: one same-document Reference to the parent
//! element, the enveloped-signature transform followed by exclusive C14N,
//! SHA-1/SHA-256 digests and RSA PKCS#1 v1.5 signatures.

pub mod context;
pub mod digest;
pub mod reference;
pub mod sign;
pub mod signature;
pub mod site;
pub mod verify;

pub use context::DsigContext;
pub use sign::{sign, sign_saml, sign_with};
pub use site::{SignatureSite, SiteKind};
pub use verify::{verify, verify_saml_signature};

#![forbid(unsafe_code)]

//! Key material for samlsig.
//!
//! Verification keys are SubjectPublicKeyInfo (`PUBLIC KEY`), signing keys
//! are PKCS#8 (`PRIVATE KEY`), either PEM-armoured or raw DER.

pub mod key;
pub mod loader;

pub use key::Key;

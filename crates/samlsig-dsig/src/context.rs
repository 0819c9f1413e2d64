#![forbid(unsafe_code)]

//! DSig context: the key and switches for one verify or sign call.

use samlsig_keys::Key;

/// Context for SAML signature operations.
#[derive(Debug, Clone)]
pub struct DsigContext {
    /// SPKI public key for verification, PKCS#8 private key for signing.
    pub key: Key,
    /// Debug mode: log pre-digest and pre-signature canonical data.
    pub debug: bool,
}

impl DsigContext {
    pub fn new(key: Key) -> Self {
        Self { key, debug: false }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

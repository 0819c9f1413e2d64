#![forbid(unsafe_code)]

pub use samlsig_c14n as c14n;
pub use samlsig_core as core;
pub use samlsig_crypto as crypto;
pub use samlsig_dsig as dsig;
pub use samlsig_keys as keys;
pub use samlsig_xml as xml;

pub use samlsig_core::{Error, Result};
pub use samlsig_dsig::{sign_saml, verify_saml_signature, DsigContext};

#![forbid(unsafe_code)]

/// Errors produced by samlsig.
///
/// The first four variants are the structural failures of the SAML
/// signature profile: the document is not a conformant signed message.
/// A digest or signature that simply does not match is not an error; the
/// verification functions report it as `Ok(false)`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("SAML message is unsigned")]
    UnsignedMessage,

    #[error("signed reference URI {uri} does not point to the parent {id}")]
    Linkage { uri: String, id: String },

    #[error("unsupported transform: {0}")]
    UnsupportedTransform(String),

    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("XML parsing error: {0}")]
    XmlParse(String),

    #[error("invalid XML structure: {0}")]
    XmlStructure(String),

    #[error("missing required element: {0}")]
    MissingElement(String),

    #[error("missing required attribute: {0}")]
    MissingAttribute(String),

    #[error("base64 decode error: {0}")]
    Base64(String),

    #[error("cryptographic error: {0}")]
    Crypto(String),

    #[error("key error: {0}")]
    Key(String),

    #[error("canonicalization error: {0}")]
    Canonicalization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

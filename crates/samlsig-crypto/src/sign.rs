#![forbid(unsafe_code)]

//! RSASSA-PKCS1-v1_5 signature algorithms.

use crate::digest::DigestMethod;
use samlsig_core::{algorithm, Error};

/// A `SignatureMethod` algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureMethod {
    RsaSha1,
    RsaSha256,
}

// Dispatch on the hash with a concrete `$hasher` type bound in `$body`.
macro_rules! with_hasher {
    ($method:expr, $hasher:ident => $body:expr) => {
        match $method {
            SignatureMethod::RsaSha1 => {
                type $hasher = sha1::Sha1;
                $body
            }
            SignatureMethod::RsaSha256 => {
                type $hasher = sha2::Sha256;
                $body
            }
        }
    };
}

impl SignatureMethod {
    /// Look up a signature algorithm by URI.
    pub fn from_uri(uri: &str) -> Result<Self, Error> {
        match uri {
            algorithm::RSA_SHA1 => Ok(Self::RsaSha1),
            algorithm::RSA_SHA256 => Ok(Self::RsaSha256),
            _ => Err(Error::UnsupportedAlgorithm(format!(
                "signature algorithm: {uri}"
            ))),
        }
    }

    pub fn uri(&self) -> &'static str {
        match self {
            Self::RsaSha1 => algorithm::RSA_SHA1,
            Self::RsaSha256 => algorithm::RSA_SHA256,
        }
    }

    /// The hash the signature is computed over.
    pub fn digest_method(&self) -> DigestMethod {
        match self {
            Self::RsaSha1 => DigestMethod::Sha1,
            Self::RsaSha256 => DigestMethod::Sha256,
        }
    }

    /// Sign `data`, returning the raw signature bytes.
    pub fn sign(&self, private_key: &rsa::RsaPrivateKey, data: &[u8]) -> Result<Vec<u8>, Error> {
        use signature::{SignatureEncoding, Signer};
        with_hasher!(self, H => {
            let sk = rsa::pkcs1v15::SigningKey::<H>::new(private_key.clone());
            let sig = sk
                .try_sign(data)
                .map_err(|e| Error::Crypto(format!("RSA signing failed: {e}")))?;
            Ok(sig.to_vec())
        })
    }

    /// Verify `sig_bytes` over `data`.
    ///
    /// A signature that does not match is `Ok(false)`; so is one whose length
    /// does not fit the key.
    pub fn verify(
        &self,
        public_key: &rsa::RsaPublicKey,
        data: &[u8],
        sig_bytes: &[u8],
    ) -> Result<bool, Error> {
        use signature::Verifier;
        let Ok(sig) = rsa::pkcs1v15::Signature::try_from(sig_bytes) else {
            return Ok(false);
        };
        with_hasher!(self, H => {
            let vk = rsa::pkcs1v15::VerifyingKey::<H>::new(public_key.clone());
            Ok(vk.verify(data, &sig).is_ok())
        })
    }
}

#![forbid(unsafe_code)]

//! The RSA key type used for signing and verification.

use samlsig_core::Error;
use samlsig_crypto::SignatureMethod;
use std::borrow::Cow;

/// An RSA key.
#[derive(Clone)]
pub enum Key {
    /// A private key; its public half is derived when verifying.
    RsaPrivate(rsa::RsaPrivateKey),
    RsaPublic(rsa::RsaPublicKey),
}

impl std::fmt::Debug for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RsaPrivate(_) => write!(f, "RSA private+public key ({} bits)", self.bits()),
            Self::RsaPublic(_) => write!(f, "RSA public key ({} bits)", self.bits()),
        }
    }
}

impl Key {
    pub fn public_key(&self) -> Cow<'_, rsa::RsaPublicKey> {
        match self {
            Self::RsaPrivate(pk) => Cow::Owned(pk.to_public_key()),
            Self::RsaPublic(pk) => Cow::Borrowed(pk),
        }
    }

    pub fn private_key(&self) -> Option<&rsa::RsaPrivateKey> {
        match self {
            Self::RsaPrivate(pk) => Some(pk),
            Self::RsaPublic(_) => None,
        }
    }

    /// Modulus size in bits.
    pub fn bits(&self) -> usize {
        use rsa::traits::PublicKeyParts;
        match self {
            Self::RsaPrivate(pk) => pk.size() * 8,
            Self::RsaPublic(pk) => pk.size() * 8,
        }
    }

    /// Sign `data` with `method`.  Fails on a public key.
    pub fn sign(&self, method: SignatureMethod, data: &[u8]) -> Result<Vec<u8>, Error> {
        let private_key = self
            .private_key()
            .ok_or_else(|| Error::Key("signing requires a private key".into()))?;
        method.sign(private_key, data)
    }

    /// Verify `signature` over `data` with `method`.
    pub fn verify(
        &self,
        method: SignatureMethod,
        data: &[u8],
        signature: &[u8],
    ) -> Result<bool, Error> {
        method.verify(&self.public_key(), data, signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn private() -> Key {
        let mut rng = rand::thread_rng();
        Key::RsaPrivate(rsa::RsaPrivateKey::new(&mut rng, 1024).unwrap())
    }

    #[test]
    fn test_private_key_signs_and_verifies() {
        let key = private();
        let sig = key.sign(SignatureMethod::RsaSha256, b"data").unwrap();
        assert!(key.verify(SignatureMethod::RsaSha256, b"data", &sig).unwrap());

        let public = Key::RsaPublic(key.public_key().into_owned());
        assert!(public
            .verify(SignatureMethod::RsaSha256, b"data", &sig)
            .unwrap());
        assert!(!public
            .verify(SignatureMethod::RsaSha256, b"datb", &sig)
            .unwrap());
    }

    #[test]
    fn test_public_key_cannot_sign() {
        let public = Key::RsaPublic(private().public_key().into_owned());
        assert!(public.private_key().is_none());
        assert!(matches!(
            public.sign(SignatureMethod::RsaSha1, b"data"),
            Err(Error::Key(_))
        ));
    }

    #[test]
    fn test_debug_does_not_leak_material() {
        let key = private();
        assert_eq!(format!("{key:?}"), "RSA private+public key (1024 bits)");
    }
}

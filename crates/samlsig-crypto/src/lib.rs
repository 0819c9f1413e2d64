#![forbid(unsafe_code)]

//! Cryptographic algorithms for the SAML signature profile.
//!
//! The algorithm registry is closed: every supported URI maps to a variant of
//! [`DigestMethod`] or [`SignatureMethod`], and any other URI is an
//! `UnsupportedAlgorithm` error.

pub mod digest;
pub mod random;
pub mod sign;

pub use digest::DigestMethod;
pub use sign::SignatureMethod;

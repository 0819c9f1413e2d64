#![forbid(unsafe_code)]

//! Core types shared by every samlsig crate: the error taxonomy and the
//! algorithm, namespace and node-name constants of the SAML V2.0 XML
//! Signature profile.

pub mod algorithm;
pub mod error;
pub mod ns;

pub use error::{Error, Result};

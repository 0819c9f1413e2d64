#![forbid(unsafe_code)]

//! Random identifiers.

use rand::RngCore;

/// Number of random bytes in a generated ID.
pub const ID_BYTES: usize = 16;

/// A fresh identifier: [`ID_BYTES`] bytes from the thread CSPRNG, hex-encoded.
pub fn random_id() -> String {
    let mut bytes = [0u8; ID_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

//! Cryptographic error types for `sealkit-core`.

use thiserror::Error;

use crate::keys::KeyUsage;

/// Errors produced by sealkit operations.
///
/// Decryption failures deliberately carry no cause. Whether a tag, a
/// padding block or a length check rejected the input is only reported
/// through `tracing` at debug level.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Key material is structurally invalid (bad base64, bad PEM, bad DER,
    /// wrong length, unsupported modulus).
    #[error("malformed key: {0}")]
    MalformedKey(String),

    /// Signature input is structurally invalid (bad base64, wrong length).
    #[error("malformed signature: {0}")]
    MalformedSignature(String),

    /// Asymmetric plaintext exceeds what the modulus can carry.
    #[error("payload too large: {len} bytes (maximum {max})")]
    PayloadTooLarge {
        /// Plaintext length in bytes.
        len: usize,
        /// Largest plaintext the key accepts.
        max: usize,
    },

    /// Authentication or padding failure: wrong password, wrong key,
    /// tampered or truncated ciphertext.
    #[error("decryption failed")]
    Decryption,

    /// A key generated for one purpose was supplied for the other.
    #[error("key usage mismatch: expected a {expected} key, got a {found} key")]
    KeyUsageMismatch {
        /// Usage the operation requires.
        expected: KeyUsage,
        /// Usage encoded in the supplied key.
        found: KeyUsage,
    },

    /// The crypto provider cannot perform the requested primitive
    /// (RNG failure, key generation failure, unsupported operation).
    #[error("crypto provider unavailable: {0}")]
    ProviderUnavailable(String),
}

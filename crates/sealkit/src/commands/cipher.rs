//! RSA-OAEP commands.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::{run_blocking, SharedProvider};
use crate::error::CommandError;

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct EncryptRequest {
    /// At most 190 bytes of UTF-8 for a 2048-bit key.
    pub plaintext: String,
    pub public_pem: String,
}

impl fmt::Debug for EncryptRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptRequest")
            .field("plaintext", &"***")
            .field("public_pem", &self.public_pem)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptResult {
    /// base64 ciphertext, one modulus long.
    pub ciphertext: String,
}

#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct DecryptRequest {
    pub ciphertext: String,
    pub private_pem: String,
}

impl fmt::Debug for DecryptRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecryptRequest")
            .field("ciphertext", &self.ciphertext)
            .field("private_pem", &"***")
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecryptResult {
    pub plaintext: String,
}

impl fmt::Debug for DecryptResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecryptResult")
            .field("plaintext", &"***")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Encrypt a short text for the holder of `public_pem`.
///
/// # Errors
///
/// Returns `payloadTooLarge` above the key's capacity, and `malformedKey`
/// or `keyUsageMismatch` for an unusable key.
pub async fn encrypt(
    provider: SharedProvider,
    request: EncryptRequest,
) -> Result<EncryptResult, CommandError> {
    let ciphertext = run_blocking("encrypt", move || {
        sealkit_core::cipher::encrypt(&*provider, &request.plaintext, &request.public_pem)
    })
    .await?;
    Ok(EncryptResult { ciphertext })
}

/// Decrypt a base64 ciphertext with `private_pem`.
///
/// # Errors
///
/// Returns `decryption` for any padding, key or encoding failure.
pub async fn decrypt(
    provider: SharedProvider,
    request: DecryptRequest,
) -> Result<DecryptResult, CommandError> {
    let plaintext = run_blocking("decrypt", move || {
        sealkit_core::cipher::decrypt(&*provider, &request.ciphertext, &request.private_pem)
    })
    .await?;
    Ok(DecryptResult { plaintext })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

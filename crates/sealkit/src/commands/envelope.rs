//! Symmetric envelope commands.
//!
//! Secrets in requests are zeroized when the request is dropped. Opened
//! plaintext is never logged.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use sealkit_core::KeyMode;

use super::{run_blocking, SharedProvider};
use crate::error::CommandError;

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Seal `plaintext` under a password or raw key.
#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct SealRequest {
    pub plaintext: String,
    /// Password, or base64 key in raw-key mode.
    pub secret: String,
    #[serde(default)]
    #[zeroize(skip)]
    pub mode: KeyMode,
}

impl fmt::Debug for SealRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SealRequest")
            .field("plaintext", &"***")
            .field("secret", &"***")
            .field("mode", &self.mode)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SealResult {
    /// base64 `salt? || nonce || ciphertext || tag`.
    pub envelope: String,
}

/// Open an envelope sealed with the same mode.
#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct OpenRequest {
    pub envelope: String,
    pub secret: String,
    #[serde(default)]
    #[zeroize(skip)]
    pub mode: KeyMode,
}

impl fmt::Debug for OpenRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenRequest")
            .field("envelope", &self.envelope)
            .field("secret", &"***")
            .field("mode", &self.mode)
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenResult {
    pub plaintext: String,
}

impl fmt::Debug for OpenResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenResult")
            .field("plaintext", &"***")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Seal text into a base64 envelope.
///
/// # Errors
///
/// Returns `malformedKey` for an unusable raw key and `providerUnavailable`
/// if randomness or derivation fails.
pub async fn seal(provider: SharedProvider, request: SealRequest) -> Result<SealResult, CommandError> {
    let mode = request.mode;
    let envelope = run_blocking("seal", move || {
        sealkit_core::seal(&*provider, &request.plaintext, &request.secret, request.mode)
    })
    .await?;

    tracing::debug!(?mode, "envelope sealed");
    Ok(SealResult { envelope })
}

/// Open a base64 envelope.
///
/// # Errors
///
/// Returns `decryption` for a wrong secret, a mode mismatch, tampering or a
/// truncated envelope, without saying which.
pub async fn open(provider: SharedProvider, request: OpenRequest) -> Result<OpenResult, CommandError> {
    let plaintext = run_blocking("open", move || {
        sealkit_core::open(&*provider, &request.envelope, &request.secret, request.mode)
    })
    .await?;
    Ok(OpenResult { plaintext })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

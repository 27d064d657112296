//! RSA-PSS commands.

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
pub struct SignRequest {
    pub message: String,
    pub private_pem: String,
}

impl fmt::Debug for SignRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignRequest")
            .field("message_len", &self.message.len())
            .field("private_pem", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignResult {
    /// base64 RSA-PSS signature.
    pub signature: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub message: String,
    pub signature: String,
    pub public_pem: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResult {
    pub valid: bool,
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Sign a message with `private_pem`.
///
/// # Errors
///
/// Returns `malformedKey` or `keyUsageMismatch` for an unusable key.
pub async fn sign(provider: SharedProvider, request: SignRequest) -> Result<SignResult, CommandError> {
    let signature = run_blocking("sign", move || {
        sealkit_core::signature::sign(&*provider, &request.message, &request.private_pem)
    })
    .await?;
    Ok(SignResult { signature })
}

/// Verify a signature.
///
/// A signature that does not match is `valid: false`, not an error.
///
/// # Errors
///
/// Returns `malformedSignature` for a signature that is not base64 or not
/// one modulus long, and `malformedKey` or `keyUsageMismatch` for an
/// unusable key.
pub async fn verify(
    provider: SharedProvider,
    request: VerifyRequest,
) -> Result<VerifyResult, CommandError> {
    let valid = run_blocking("verify", move || {
        sealkit_core::signature::verify(
            &*provider,
            &request.message,
            &request.signature,
            &request.public_pem,
        )
    })
    .await?;

    tracing::debug!(valid, "signature checked");
    Ok(VerifyResult { valid })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Key generation commands.
//!
//! RSA generation is the one operation slow enough to need a progress
//! indicator, so it is exposed as a [`KeygenJob`] the caller can poll.

use std::fmt;

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use zeroize::{Zeroize, ZeroizeOnDrop};

use sealkit_core::{
    generate_encryption_key_pair, generate_signing_key_pair, CryptoError, EncryptionPrivateKey,
    KeyUsage, PemKeyPair, SigningPrivateKey,
};

use super::{run_blocking, SharedProvider};
use crate::error::CommandError;

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// A freshly generated base64 symmetric key.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymmetricKeyResult {
    pub key: String,
}

impl fmt::Debug for SymmetricKeyResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymmetricKeyResult")
            .field("key", &"***")
            .finish()
    }
}

/// Request for a new RSA key pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateKeyPairRequest {
    pub usage: KeyUsage,
}

/// A key pair in PEM form.
///
/// `Debug` is manually implemented to mask the private key.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyPairResult {
    pub usage: KeyUsage,
    pub public_pem: String,
    pub private_pem: String,
}

impl fmt::Debug for KeyPairResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPairResult")
            .field("usage", &self.usage)
            .field("public_pem", &self.public_pem)
            .field("private_pem", &"***")
            .finish()
    }
}

impl From<PemKeyPair> for KeyPairResult {
    fn from(pair: PemKeyPair) -> Self {
        Self {
            usage: pair.usage,
            public_pem: pair.public_pem,
            private_pem: pair.private_pem,
        }
    }
}

/// Request to recover the public half of a private key.
#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyRequest {
    #[zeroize(skip)]
    pub usage: KeyUsage,
    pub private_pem: String,
}

impl fmt::Debug for PublicKeyRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicKeyRequest")
            .field("usage", &self.usage)
            .field("private_pem", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyResult {
    pub usage: KeyUsage,
    pub public_pem: String,
}

/// Progress of a [`KeygenJob`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KeygenStatus {
    Running,
    Finished,
}

// ---------------------------------------------------------------------------
// Keygen job
// ---------------------------------------------------------------------------

/// An RSA key pair being generated on the blocking pool.
#[derive(Debug)]
pub struct KeygenJob {
    usage: KeyUsage,
    handle: JoinHandle<Result<PemKeyPair, CryptoError>>,
}

impl KeygenJob {
    /// Start generating a key pair for `usage`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ErrorKind::Internal`] when called outside a
    /// Tokio runtime.
    pub fn spawn(provider: SharedProvider, usage: KeyUsage) -> Result<Self, CommandError> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| CommandError::internal(format!("no async runtime: {e}")))?;

        tracing::info!(%usage, "starting key pair generation");
        let handle = runtime.spawn_blocking(move || match usage {
            KeyUsage::Encrypt => generate_encryption_key_pair(&*provider)?.to_pem(),
            KeyUsage::Sign => generate_signing_key_pair(&*provider)?.to_pem(),
        });

        Ok(Self { usage, handle })
    }

    #[must_use]
    pub const fn usage(&self) -> KeyUsage {
        self.usage
    }

    /// Whether generation is still in progress.
    #[must_use]
    pub fn status(&self) -> KeygenStatus {
        if self.handle.is_finished() {
            KeygenStatus::Finished
        } else {
            KeygenStatus::Running
        }
    }

    /// Wait for the pair.
    ///
    /// # Errors
    ///
    /// Returns the mapped generation error, or an internal error if the
    /// blocking task panicked or was cancelled.
    pub async fn wait(self) -> Result<KeyPairResult, CommandError> {
        let usage = self.usage;
        let pair = self
            .handle
            .await
            .map_err(|e| {
                tracing::error!(%usage, "key generation task failed: {e}");
                CommandError::internal("key generation did not complete")
            })?
            .map_err(|e| {
                tracing::debug!(%usage, error = %e, "key generation failed");
                CommandError::from(e)
            })?;

        tracing::info!(%usage, "key pair generated");
        Ok(pair.into())
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Generate a random 256-bit symmetric key, base64-encoded.
///
/// The key is never logged.
///
/// # Errors
///
/// Returns `providerUnavailable` if the provider cannot produce randomness.
pub async fn generate_symmetric_key(
    provider: SharedProvider,
) -> Result<SymmetricKeyResult, CommandError> {
    let key = run_blocking("generate_symmetric_key", move || {
        sealkit_core::generate_symmetric_key(&*provider)
    })
    .await?;
    Ok(SymmetricKeyResult { key })
}

/// Generate a key pair and wait for it.
///
/// # Errors
///
/// See [`KeygenJob::spawn`] and [`KeygenJob::wait`].
pub async fn generate_key_pair(
    provider: SharedProvider,
    request: GenerateKeyPairRequest,
) -> Result<KeyPairResult, CommandError> {
    KeygenJob::spawn(provider, request.usage)?.wait().await
}

/// Recover the public PEM matching a private PEM of the given usage.
///
/// # Errors
///
/// Returns `malformedKey` or `keyUsageMismatch` for an unusable key.
pub async fn derive_public_key(request: PublicKeyRequest) -> Result<PublicKeyResult, CommandError> {
    let usage = request.usage;
    let public_pem = run_blocking("derive_public_key", move || match request.usage {
        KeyUsage::Encrypt => EncryptionPrivateKey::from_pem(&request.private_pem)?
            .public_key()
            .to_pem(),
        KeyUsage::Sign => SigningPrivateKey::from_pem(&request.private_pem)?
            .public_key()
            .to_pem(),
    })
    .await?;
    Ok(PublicKeyResult { usage, public_pem })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Command handlers for sealkit.
//!
//! Each submodule exposes `async fn` commands that take a request DTO and
//! return a result DTO or a [`CommandError`]. The crypto runs on tokio's
//! blocking pool so a caller's control thread never stalls on PBKDF2 or RSA.
//! All commands return dedicated DTOs, never core types.

pub mod cipher;
pub mod envelope;
pub mod keys;
pub mod preferences;
pub mod signature;

use std::sync::Arc;

use sealkit_core::{CryptoError, CryptoProvider, SystemProvider};

use crate::error::CommandError;

/// Provider shared by every command.
pub type SharedProvider = Arc<dyn CryptoProvider>;

/// The default provider.
#[must_use]
pub fn system_provider() -> SharedProvider {
    Arc::new(SystemProvider::new())
}

/// Run a crypto operation on the blocking pool and map its error.
///
/// `op` names the command in logs; the closure's error is logged at debug
/// level only, since its message may describe a decryption failure.
pub(crate) async fn run_blocking<T, F>(op: &'static str, f: F) -> Result<T, CommandError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, CryptoError> + Send + 'static,
{
    let result = tokio::task::spawn_blocking(f).await.map_err(|e| {
        tracing::error!(op, "blocking task failed: {e}");
        CommandError::internal(format!("{op} did not complete"))
    })?;

    result.map_err(|e| {
        tracing::debug!(op, error = %e, "command failed");
        CommandError::from(e)
    })
}

//! Error type returned across the command boundary.
//!
//! `CryptoError` carries Rust types; callers of the command layer get a
//! flat, serializable `{ kind, message }` pair instead.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use sealkit_core::CryptoError;

/// Stable, machine-readable error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    MalformedKey,
    MalformedSignature,
    PayloadTooLarge,
    Decryption,
    KeyUsageMismatch,
    ProviderUnavailable,
    /// The request itself is unusable (unreadable input file, bad argument).
    InvalidRequest,
    /// A failure of the command machinery, not of the crypto operation.
    Internal,
}

/// Error returned by every command.
///
/// A command that fails never returns partial output.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct CommandError {
    pub kind: ErrorKind,
    pub message: String,
}

impl CommandError {
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::InvalidRequest,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Internal,
            message: message.into(),
        }
    }
}

impl From<CryptoError> for CommandError {
    fn from(err: CryptoError) -> Self {
        let kind = match &err {
            CryptoError::MalformedKey(_) => ErrorKind::MalformedKey,
            CryptoError::MalformedSignature(_) => ErrorKind::MalformedSignature,
            CryptoError::PayloadTooLarge { .. } => ErrorKind::PayloadTooLarge,
            CryptoError::Decryption => ErrorKind::Decryption,
            CryptoError::KeyUsageMismatch { .. } => ErrorKind::KeyUsageMismatch,
            CryptoError::ProviderUnavailable(_) => ErrorKind::ProviderUnavailable,
        };
        Self {
            kind,
            message: err.to_string(),
        }
    }
}

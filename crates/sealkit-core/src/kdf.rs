//! PBKDF2-HMAC-SHA256 password stretching for password-mode envelopes.
//!
//! This module provides:
//! - [`derive`]: derive a 256-bit key from a password + salt via the provider
//! - [`generate_salt`]: draw a fresh 16-byte salt from the provider
//! - [`Pbkdf2Params`]: iteration count (the hash is fixed to SHA-256)
//!
//! The parameters are part of the envelope wire format: an envelope sealed
//! with one iteration count can only be opened with the same count, and the
//! count is not stored in the envelope. [`Pbkdf2Params::default`] is the only
//! value the envelope module uses.

use serde::{Deserialize, Serialize};

use crate::error::CryptoError;
use crate::provider::{CryptoProvider, SymmetricKey};

/// Salt length in bytes, fixed by the envelope layout.
pub const SALT_LEN: usize = 16;

/// Iteration count used for every password-mode envelope.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// PBKDF2 parameter set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pbkdf2Params {
    /// Number of HMAC-SHA256 iterations.
    pub iterations: u32,
}

impl Default for Pbkdf2Params {
    fn default() -> Self {
        Self {
            iterations: PBKDF2_ITERATIONS,
        }
    }
}

/// Derive a 256-bit key from `password` and `salt`.
///
/// # Errors
///
/// Returns [`CryptoError::ProviderUnavailable`] if the salt is not exactly
/// [`SALT_LEN`] bytes, the iteration count is zero, or the provider fails.
pub fn derive<P>(
    provider: &P,
    password: &[u8],
    salt: &[u8],
    params: &Pbkdf2Params,
) -> Result<SymmetricKey, CryptoError>
where
    P: CryptoProvider + ?Sized,
{
    if salt.len() != SALT_LEN {
        return Err(CryptoError::ProviderUnavailable(format!(
            "invalid PBKDF2 salt length: {} bytes (expected {SALT_LEN})",
            salt.len()
        )));
    }
    if params.iterations == 0 {
        return Err(CryptoError::ProviderUnavailable(
            "PBKDF2 iteration count must be non-zero".into(),
        ));
    }

    tracing::trace!(iterations = params.iterations, "deriving password key");
    provider.derive_key(password, salt, params)
}

/// Draw a fresh random salt from the provider.
///
/// # Errors
///
/// Propagates provider RNG failures.
pub fn generate_salt<P>(provider: &P) -> Result<[u8; SALT_LEN], CryptoError>
where
    P: CryptoProvider + ?Sized,
{
    let mut salt = [0u8; SALT_LEN];
    provider.fill_random(&mut salt)?;
    Ok(salt)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

//! Signature engine: RSA-PSS (SHA-256, 32-byte salt).
//!
//! This module provides:
//! - [`sign`] / [`verify`]: PEM keys and base64 signatures over UTF-8 text
//! - [`sign_with`] / [`verify_with`]: the same over typed keys and [`Signature`]
//! - [`Signature`]: raw signature bytes, no embedded metadata
//!
//! # Verification outcome
//!
//! [`verify`] separates two failure classes:
//! - `Ok(false)`: well-formed input, but the signature does not match the
//!   message and key (forged, tampered, or signed by someone else)
//! - `Err(..)`: caller error: malformed key, key of the wrong usage, or a
//!   signature that is not base64 or not one modulus long

use data_encoding::BASE64;
use serde::{Deserialize, Serialize};

use crate::error::CryptoError;
use crate::keys::{SigningPrivateKey, SigningPublicKey};
use crate::provider::CryptoProvider;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// An RSA-PSS signature (256 bytes for a 2048-bit key).
#[must_use = "signature must be stored or transmitted"]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature(Vec<u8>);

impl Signature {
    /// Wrap raw signature bytes.
    pub const fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Decode a base64 signature.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::MalformedSignature`] for invalid base64.
    pub fn from_base64(encoded: &str) -> Result<Self, CryptoError> {
        BASE64
            .decode(encoded.trim().as_bytes())
            .map(Self)
            .map_err(|e| CryptoError::MalformedSignature(format!("signature is not base64: {e}")))
    }

    /// Encode as standard base64.
    #[must_use]
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.0)
    }

    /// Raw signature bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Typed sign / verify
// ---------------------------------------------------------------------------

/// Sign `message` with a typed signing key.
///
/// # Errors
///
/// Returns [`CryptoError::ProviderUnavailable`] if signing fails.
pub fn sign_with<P>(
    provider: &P,
    message: &[u8],
    private_key: &SigningPrivateKey,
) -> Result<Signature, CryptoError>
where
    P: CryptoProvider + ?Sized,
{
    let bytes = provider.rsa_pss_sign(private_key.rsa(), message)?;
    tracing::debug!(len = message.len(), "signed message");
    Ok(Signature(bytes))
}

/// Verify `signature` over `message` with a typed verification key.
///
/// # Errors
///
/// Returns [`CryptoError::MalformedSignature`] if the signature is not
/// exactly one modulus long, and [`CryptoError::ProviderUnavailable`] if
/// verification cannot run.
pub fn verify_with<P>(
    provider: &P,
    message: &[u8],
    signature: &Signature,
    public_key: &SigningPublicKey,
) -> Result<bool, CryptoError>
where
    P: CryptoProvider + ?Sized,
{
    if signature.as_bytes().len() != public_key.size() {
        return Err(CryptoError::MalformedSignature(format!(
            "invalid signature length: {} bytes (expected {})",
            signature.as_bytes().len(),
            public_key.size()
        )));
    }

    let valid = provider.rsa_pss_verify(public_key.rsa(), message, signature.as_bytes())?;
    tracing::debug!(valid, "verified signature");
    Ok(valid)
}

// ---------------------------------------------------------------------------
// Text API
// ---------------------------------------------------------------------------

/// Sign UTF-8 `message` and return the base64 signature.
///
/// # Errors
///
/// Returns [`CryptoError::MalformedKey`] or [`CryptoError::KeyUsageMismatch`]
/// for an unusable key, plus the errors of [`sign_with`].
pub fn sign<P>(provider: &P, message: &str, private_key_pem: &str) -> Result<String, CryptoError>
where
    P: CryptoProvider + ?Sized,
{
    let private_key = SigningPrivateKey::from_pem(private_key_pem)?;
    Ok(sign_with(provider, message.as_bytes(), &private_key)?.to_base64())
}

/// Verify a base64 signature over UTF-8 `message`.
///
/// # Errors
///
/// Returns [`CryptoError::MalformedKey`] or [`CryptoError::KeyUsageMismatch`]
/// for an unusable key, and [`CryptoError::MalformedSignature`] for a
/// structurally invalid signature. A well-formed non-matching signature is
/// `Ok(false)`.
pub fn verify<P>(
    provider: &P,
    message: &str,
    signature: &str,
    public_key_pem: &str,
) -> Result<bool, CryptoError>
where
    P: CryptoProvider + ?Sized,
{
    let public_key = SigningPublicKey::from_pem(public_key_pem)?;
    let signature = Signature::from_base64(signature)?;
    verify_with(provider, message.as_bytes(), &signature, &public_key)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

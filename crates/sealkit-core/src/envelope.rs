//! Symmetric envelope: password-based or raw-key AES-256-GCM.
//!
//! This module provides:
//! - [`seal`] / [`open`]: text in, base64 envelope out (and back)
//! - [`seal_envelope`] / [`open_envelope`]: the same over bytes and [`Envelope`]
//! - [`Envelope`]: `salt? || nonce || ciphertext || tag` container
//! - [`KeyMode`]: password (PBKDF2-derived key) or raw base64 key
//!
//! # Wire format
//!
//! ```text
//! [salt (16 bytes, password mode only)] [nonce (12 bytes)] [ciphertext || tag (16 bytes)]
//! ```
//!
//! base64-encoded as one string. The envelope carries no mode flag, so it
//! must be opened with the mode it was sealed with. Every seal draws a fresh
//! nonce (and, in password mode, a fresh salt) from the provider.

use data_encoding::BASE64;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::codec::decode_symmetric_key;
use crate::error::CryptoError;
use crate::kdf::{self, Pbkdf2Params, SALT_LEN};
use crate::memory::SecretBuffer;
use crate::provider::{CryptoProvider, SymmetricKey, NONCE_LEN};

/// Minimum decoded envelope length in raw-key mode (nonce only).
pub const MIN_RAW_KEY_ENVELOPE_LEN: usize = NONCE_LEN;

/// Minimum decoded envelope length in password mode (salt + nonce).
pub const MIN_PASSWORD_ENVELOPE_LEN: usize = SALT_LEN + NONCE_LEN;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// How the caller's secret becomes the AES key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KeyMode {
    /// The secret is a password; the key is derived with PBKDF2-SHA256.
    #[default]
    Password,
    /// The secret is a base64-encoded 32-byte key.
    RawKey,
}

impl KeyMode {
    /// Minimum decoded envelope length for this mode.
    #[must_use]
    pub const fn min_envelope_len(self) -> usize {
        match self {
            Self::Password => MIN_PASSWORD_ENVELOPE_LEN,
            Self::RawKey => MIN_RAW_KEY_ENVELOPE_LEN,
        }
    }
}

/// A sealed message.
///
/// `ciphertext` includes the trailing 16-byte authentication tag.
#[must_use = "sealed data must be stored or transmitted"]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// PBKDF2 salt, present only for password-mode envelopes.
    pub salt: Option<[u8; SALT_LEN]>,
    /// 96-bit random nonce, unique per seal.
    pub nonce: [u8; NONCE_LEN],
    /// Ciphertext followed by the GCM tag.
    pub ciphertext: Vec<u8>,
}

impl Envelope {
    /// The mode implied by the presence of a salt.
    pub const fn mode(&self) -> KeyMode {
        if self.salt.is_some() {
            KeyMode::Password
        } else {
            KeyMode::RawKey
        }
    }

    /// Serialize to wire format: `salt? || nonce || ciphertext || tag`.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let capacity = self
            .mode()
            .min_envelope_len()
            .saturating_add(self.ciphertext.len());
        let mut out = Vec::with_capacity(capacity);
        if let Some(salt) = &self.salt {
            out.extend_from_slice(salt);
        }
        out.extend_from_slice(&self.nonce);
        out.extend_from_slice(&self.ciphertext);
        out
    }

    /// Deserialize from wire format, splitting according to `mode`.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Decryption`] if the input is shorter than the
    /// mode's salt + nonce prefix.
    pub fn from_bytes(bytes: &[u8], mode: KeyMode) -> Result<Self, CryptoError> {
        if bytes.len() < mode.min_envelope_len() {
            tracing::debug!(
                len = bytes.len(),
                min = mode.min_envelope_len(),
                ?mode,
                "envelope too short"
            );
            return Err(CryptoError::Decryption);
        }

        let (salt, rest) = match mode {
            KeyMode::Password => {
                let (salt_bytes, rest) = bytes.split_at(SALT_LEN);
                let mut salt = [0u8; SALT_LEN];
                salt.copy_from_slice(salt_bytes);
                (Some(salt), rest)
            }
            KeyMode::RawKey => (None, bytes),
        };

        let (nonce_bytes, ciphertext) = rest.split_at(NONCE_LEN);
        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(nonce_bytes);

        Ok(Self {
            salt,
            nonce,
            ciphertext: ciphertext.to_vec(),
        })
    }

    /// Encode the wire format as standard base64.
    #[must_use]
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.to_bytes())
    }

    /// Decode a base64 envelope, splitting according to `mode`.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Decryption`] for invalid base64 or short input.
    pub fn from_base64(encoded: &str, mode: KeyMode) -> Result<Self, CryptoError> {
        let bytes = BASE64.decode(encoded.trim().as_bytes()).map_err(|e| {
            tracing::debug!(error = %e, "envelope is not base64");
            CryptoError::Decryption
        })?;
        Self::from_bytes(&bytes, mode)
    }
}

// ---------------------------------------------------------------------------
// Key resolution
// ---------------------------------------------------------------------------

fn resolve_key<P>(
    provider: &P,
    secret: &str,
    salt: Option<&[u8; SALT_LEN]>,
) -> Result<SymmetricKey, CryptoError>
where
    P: CryptoProvider + ?Sized,
{
    match salt {
        Some(salt) => kdf::derive(provider, secret.as_bytes(), salt, &Pbkdf2Params::default()),
        None => decode_symmetric_key(secret),
    }
}

// ---------------------------------------------------------------------------
// Seal / open
// ---------------------------------------------------------------------------

/// Seal `plaintext` under `secret`, returning an [`Envelope`].
///
/// # Errors
///
/// Returns [`CryptoError::MalformedKey`] if raw-key mode is given a secret
/// that is not a base64 32-byte key, and [`CryptoError::ProviderUnavailable`]
/// if randomness, derivation or encryption fails.
pub fn seal_envelope<P>(
    provider: &P,
    plaintext: &[u8],
    secret: &str,
    mode: KeyMode,
) -> Result<Envelope, CryptoError>
where
    P: CryptoProvider + ?Sized,
{
    let salt = match mode {
        KeyMode::Password => Some(kdf::generate_salt(provider)?),
        KeyMode::RawKey => None,
    };
    let key = resolve_key(provider, secret, salt.as_ref())?;

    let mut nonce = [0u8; NONCE_LEN];
    provider.fill_random(&mut nonce)?;

    let ciphertext = provider.aes_gcm_seal(&key, &nonce, plaintext)?;
    tracing::debug!(?mode, len = plaintext.len(), "sealed envelope");

    Ok(Envelope {
        salt,
        nonce,
        ciphertext,
    })
}

/// Open an [`Envelope`] with `secret`, using the mode implied by its salt.
///
/// # Errors
///
/// Returns [`CryptoError::Decryption`] on any authentication failure and
/// [`CryptoError::MalformedKey`] for an unusable raw key.
pub fn open_envelope<P>(
    provider: &P,
    envelope: &Envelope,
    secret: &str,
) -> Result<SecretBuffer, CryptoError>
where
    P: CryptoProvider + ?Sized,
{
    let key = resolve_key(provider, secret, envelope.salt.as_ref())?;
    provider.aes_gcm_open(&key, &envelope.nonce, &envelope.ciphertext)
}

/// Seal UTF-8 `plaintext` and return the base64 envelope.
///
/// Empty plaintext is valid and yields a `salt? || nonce || tag` envelope.
///
/// # Errors
///
/// See [`seal_envelope`].
pub fn seal<P>(
    provider: &P,
    plaintext: &str,
    secret: &str,
    mode: KeyMode,
) -> Result<String, CryptoError>
where
    P: CryptoProvider + ?Sized,
{
    Ok(seal_envelope(provider, plaintext.as_bytes(), secret, mode)?.to_base64())
}

/// Open a base64 envelope sealed with the same `mode` and return the text.
///
/// # Errors
///
/// Returns [`CryptoError::Decryption`] for wrong secrets, tampering, short
/// or non-base64 envelopes, and plaintext that is not UTF-8. Never returns
/// partial output.
pub fn open<P>(
    provider: &P,
    envelope: &str,
    secret: &str,
    mode: KeyMode,
) -> Result<String, CryptoError>
where
    P: CryptoProvider + ?Sized,
{
    let envelope = Envelope::from_base64(envelope, mode)?;
    let plaintext = open_envelope(provider, &envelope, secret)?;

    String::from_utf8(plaintext.expose().to_vec()).map_err(|e| {
        let mut bytes = e.into_bytes();
        bytes.zeroize();
        tracing::debug!("opened envelope is not UTF-8");
        CryptoError::Decryption
    })
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

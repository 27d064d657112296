//! Asymmetric cipher: RSA-OAEP (SHA-256) over short UTF-8 payloads.
//!
//! This module provides:
//! - [`encrypt`] / [`decrypt`]: PEM keys in, base64 ciphertext out (and back)
//! - [`encrypt_with`] / [`decrypt_with`]: the same over typed keys
//! - [`max_plaintext_len`]: the OAEP capacity of a key
//!
//! Payloads are never chunked: anything over the key's capacity (190 bytes
//! for a 2048-bit modulus) fails with [`CryptoError::PayloadTooLarge`].

use data_encoding::BASE64;
use zeroize::Zeroize;

use crate::error::CryptoError;
use crate::keys::{EncryptionPrivateKey, EncryptionPublicKey};
use crate::memory::SecretBuffer;
use crate::provider::CryptoProvider;

/// SHA-256 output length, the OAEP hash length.
const OAEP_HASH_LEN: usize = 32;

/// Largest plaintext RSA-OAEP-SHA256 accepts for a modulus of `modulus_len`
/// bytes: `k - 2 * hLen - 2`.
#[must_use]
pub const fn max_plaintext_len(modulus_len: usize) -> usize {
    modulus_len
        .saturating_sub(OAEP_HASH_LEN.saturating_mul(2))
        .saturating_sub(2)
}

/// Encrypt `plaintext` bytes under a typed public key.
///
/// # Errors
///
/// Returns [`CryptoError::PayloadTooLarge`] if `plaintext` exceeds
/// [`max_plaintext_len`], and [`CryptoError::ProviderUnavailable`] if the
/// provider fails.
pub fn encrypt_with<P>(
    provider: &P,
    plaintext: &[u8],
    public_key: &EncryptionPublicKey,
) -> Result<Vec<u8>, CryptoError>
where
    P: CryptoProvider + ?Sized,
{
    let max = max_plaintext_len(public_key.size());
    if plaintext.len() > max {
        return Err(CryptoError::PayloadTooLarge {
            len: plaintext.len(),
            max,
        });
    }
    provider.rsa_oaep_encrypt(public_key.rsa(), plaintext)
}

/// Decrypt ciphertext bytes with a typed private key.
///
/// # Errors
///
/// Returns [`CryptoError::Decryption`] if the ciphertext length does not
/// match the modulus or the padding check fails.
pub fn decrypt_with<P>(
    provider: &P,
    ciphertext: &[u8],
    private_key: &EncryptionPrivateKey,
) -> Result<SecretBuffer, CryptoError>
where
    P: CryptoProvider + ?Sized,
{
    if ciphertext.len() != private_key.size() {
        tracing::debug!(
            len = ciphertext.len(),
            expected = private_key.size(),
            "RSA ciphertext length mismatch"
        );
        return Err(CryptoError::Decryption);
    }
    provider.rsa_oaep_decrypt(private_key.rsa(), ciphertext)
}

/// Encrypt UTF-8 `plaintext` for the holder of `public_key_pem`.
///
/// # Errors
///
/// Returns [`CryptoError::MalformedKey`] or [`CryptoError::KeyUsageMismatch`]
/// for an unusable key, plus the errors of [`encrypt_with`].
pub fn encrypt<P>(provider: &P, plaintext: &str, public_key_pem: &str) -> Result<String, CryptoError>
where
    P: CryptoProvider + ?Sized,
{
    let public_key = EncryptionPublicKey::from_pem(public_key_pem)?;
    let ciphertext = encrypt_with(provider, plaintext.as_bytes(), &public_key)?;
    Ok(BASE64.encode(&ciphertext))
}

/// Decrypt a base64 ciphertext with `private_key_pem` and return the text.
///
/// # Errors
///
/// Returns [`CryptoError::MalformedKey`] or [`CryptoError::KeyUsageMismatch`]
/// for an unusable key, and [`CryptoError::Decryption`] for non-base64
/// input, padding failures, key/ciphertext mismatch and non-UTF-8 output.
pub fn decrypt<P>(
    provider: &P,
    ciphertext: &str,
    private_key_pem: &str,
) -> Result<String, CryptoError>
where
    P: CryptoProvider + ?Sized,
{
    let private_key = EncryptionPrivateKey::from_pem(private_key_pem)?;
    let ciphertext = BASE64.decode(ciphertext.trim().as_bytes()).map_err(|e| {
        tracing::debug!(error = %e, "RSA ciphertext is not base64");
        CryptoError::Decryption
    })?;

    let plaintext = decrypt_with(provider, &ciphertext, &private_key)?;
    String::from_utf8(plaintext.expose().to_vec()).map_err(|e| {
        let mut bytes = e.into_bytes();
        bytes.zeroize();
        tracing::debug!("RSA plaintext is not UTF-8");
        CryptoError::Decryption
    })
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

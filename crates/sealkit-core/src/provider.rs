//! Cryptographic primitive provider.
//!
//! This module provides:
//! - [`CryptoProvider`]: the primitive contract every component consumes
//! - [`SystemProvider`]: the default implementation (`ring` for AES-GCM and
//!   PBKDF2, `rsa` for RSA-OAEP/PSS, `OsRng` for randomness)
//!
//! Components never call a primitive crate directly; they take a provider so
//! they can be exercised against a recording or failing implementation.

use std::num::NonZeroU32;

use rand::rngs::OsRng;
use rand::RngCore;
use ring::{aead, pbkdf2};
use rsa::{Oaep, Pss, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use crate::error::CryptoError;
use crate::kdf::Pbkdf2Params;
use crate::memory::{SecretBuffer, SecretBytes};

/// AES-256-GCM key length in bytes (256 bits).
pub const SYMMETRIC_KEY_LEN: usize = 32;

/// AES-256-GCM nonce length in bytes (96 bits).
pub const NONCE_LEN: usize = 12;

/// AES-256-GCM authentication tag length in bytes (128 bits).
pub const TAG_LEN: usize = 16;

/// RSA-PSS salt length in bytes (matches the SHA-256 output).
pub const PSS_SALT_LEN: usize = 32;

/// A 256-bit symmetric key held in zeroizing memory.
pub type SymmetricKey = SecretBytes<SYMMETRIC_KEY_LEN>;

/// The primitive operations sealkit consumes from its host platform.
///
/// Implementations must draw every random byte (nonces, salts, keys, RSA
/// padding) from a cryptographically secure source and report failure
/// rather than degrade to a weaker generator.
pub trait CryptoProvider: Send + Sync {
    /// Fill `dest` with cryptographically secure random bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::ProviderUnavailable`] if the secure source fails.
    fn fill_random(&self, dest: &mut [u8]) -> Result<(), CryptoError>;

    /// Generate a fresh 256-bit symmetric key.
    ///
    /// # Errors
    ///
    /// Propagates [`CryptoProvider::fill_random`] failures.
    fn generate_symmetric_key(&self) -> Result<SymmetricKey, CryptoError> {
        let mut bytes = [0u8; SYMMETRIC_KEY_LEN];
        if let Err(e) = self.fill_random(&mut bytes) {
            bytes.zeroize();
            return Err(e);
        }
        Ok(SymmetricKey::new(bytes))
    }

    /// Derive a 256-bit key with PBKDF2-HMAC-SHA256.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::ProviderUnavailable`] if the derivation cannot run.
    fn derive_key(
        &self,
        password: &[u8],
        salt: &[u8],
        params: &Pbkdf2Params,
    ) -> Result<SymmetricKey, CryptoError>;

    /// AES-256-GCM encrypt, returning `ciphertext || tag`.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::ProviderUnavailable`] if sealing fails.
    fn aes_gcm_seal(
        &self,
        key: &SymmetricKey,
        nonce: &[u8; NONCE_LEN],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, CryptoError>;

    /// AES-256-GCM decrypt and authenticate `ciphertext || tag`.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Decryption`] on any authentication failure.
    fn aes_gcm_open(
        &self,
        key: &SymmetricKey,
        nonce: &[u8; NONCE_LEN],
        ciphertext_and_tag: &[u8],
    ) -> Result<SecretBuffer, CryptoError>;

    /// Generate an RSA private key with a modulus of `bits` bits.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::ProviderUnavailable`] if generation fails.
    fn generate_rsa_key(&self, bits: usize) -> Result<RsaPrivateKey, CryptoError>;

    /// RSA-OAEP (SHA-256, MGF1-SHA-256) encryption.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::ProviderUnavailable`] if encryption fails.
    fn rsa_oaep_encrypt(&self, key: &RsaPublicKey, plaintext: &[u8])
        -> Result<Vec<u8>, CryptoError>;

    /// RSA-OAEP (SHA-256, MGF1-SHA-256) decryption.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Decryption`] on any padding or key mismatch.
    fn rsa_oaep_decrypt(
        &self,
        key: &RsaPrivateKey,
        ciphertext: &[u8],
    ) -> Result<SecretBuffer, CryptoError>;

    /// RSA-PSS (SHA-256, 32-byte salt) signature over `message`.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::ProviderUnavailable`] if signing fails.
    fn rsa_pss_sign(&self, key: &RsaPrivateKey, message: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// RSA-PSS (SHA-256, 32-byte salt) verification.
    ///
    /// Returns `Ok(false)` when the signature does not match.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::ProviderUnavailable`] if verification cannot run.
    fn rsa_pss_verify(
        &self,
        key: &RsaPublicKey,
        message: &[u8],
        signature: &[u8],
    ) -> Result<bool, CryptoError>;
}

// ---------------------------------------------------------------------------
// SystemProvider
// ---------------------------------------------------------------------------

/// Default provider backed by `ring`, `rsa` and the operating system RNG.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemProvider;

impl SystemProvider {
    /// Create the default provider.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn aes_key(key: &SymmetricKey) -> Result<aead::LessSafeKey, CryptoError> {
    let unbound = aead::UnboundKey::new(&aead::AES_256_GCM, key.expose()).map_err(|_| {
        CryptoError::ProviderUnavailable("failed to create AES-256-GCM key".into())
    })?;
    Ok(aead::LessSafeKey::new(unbound))
}

impl CryptoProvider for SystemProvider {
    fn fill_random(&self, dest: &mut [u8]) -> Result<(), CryptoError> {
        OsRng
            .try_fill_bytes(dest)
            .map_err(|e| CryptoError::ProviderUnavailable(format!("CSPRNG fill failed: {e}")))
    }

    fn derive_key(
        &self,
        password: &[u8],
        salt: &[u8],
        params: &Pbkdf2Params,
    ) -> Result<SymmetricKey, CryptoError> {
        let iterations = NonZeroU32::new(params.iterations).ok_or_else(|| {
            CryptoError::ProviderUnavailable("PBKDF2 iteration count must be non-zero".into())
        })?;

        let mut output = [0u8; SYMMETRIC_KEY_LEN];
        pbkdf2::derive(
            pbkdf2::PBKDF2_HMAC_SHA256,
            iterations,
            salt,
            password,
            &mut output,
        );
        Ok(SymmetricKey::new(output))
    }

    fn aes_gcm_seal(
        &self,
        key: &SymmetricKey,
        nonce: &[u8; NONCE_LEN],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        let key = aes_key(key)?;
        let nonce = aead::Nonce::assume_unique_for_key(*nonce);

        let mut in_out = Vec::with_capacity(plaintext.len().saturating_add(TAG_LEN));
        in_out.extend_from_slice(plaintext);
        if key
            .seal_in_place_append_tag(nonce, aead::Aad::empty(), &mut in_out)
            .is_err()
        {
            in_out.zeroize();
            return Err(CryptoError::ProviderUnavailable(
                "AES-256-GCM encryption failed".into(),
            ));
        }
        Ok(in_out)
    }

    fn aes_gcm_open(
        &self,
        key: &SymmetricKey,
        nonce: &[u8; NONCE_LEN],
        ciphertext_and_tag: &[u8],
    ) -> Result<SecretBuffer, CryptoError> {
        let key = aes_key(key)?;
        let nonce = aead::Nonce::assume_unique_for_key(*nonce);

        let mut in_out = ciphertext_and_tag.to_vec();
        let result = match key.open_in_place(nonce, aead::Aad::empty(), &mut in_out) {
            Ok(plaintext) => Ok(SecretBuffer::new(plaintext)),
            Err(_) => {
                tracing::debug!(len = ciphertext_and_tag.len(), "AES-GCM tag check failed");
                Err(CryptoError::Decryption)
            }
        };
        in_out.zeroize();
        result
    }

    fn generate_rsa_key(&self, bits: usize) -> Result<RsaPrivateKey, CryptoError> {
        tracing::debug!(bits, "generating RSA key");
        RsaPrivateKey::new(&mut OsRng, bits)
            .map_err(|e| CryptoError::ProviderUnavailable(format!("RSA key generation failed: {e}")))
    }

    fn rsa_oaep_encrypt(
        &self,
        key: &RsaPublicKey,
        plaintext: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        key.encrypt(&mut OsRng, Oaep::new::<Sha256>(), plaintext)
            .map_err(|e| CryptoError::ProviderUnavailable(format!("RSA-OAEP encryption failed: {e}")))
    }

    fn rsa_oaep_decrypt(
        &self,
        key: &RsaPrivateKey,
        ciphertext: &[u8],
    ) -> Result<SecretBuffer, CryptoError> {
        key.decrypt_blinded(&mut OsRng, Oaep::new::<Sha256>(), ciphertext)
            .map(SecretBuffer::from_vec)
            .map_err(|e| {
                tracing::debug!(error = %e, "RSA-OAEP decryption failed");
                CryptoError::Decryption
            })
    }

    fn rsa_pss_sign(&self, key: &RsaPrivateKey, message: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let digest = Sha256::digest(message);
        key.sign_with_rng(
            &mut OsRng,
            Pss::new_with_salt::<Sha256>(PSS_SALT_LEN),
            &digest,
        )
        .map_err(|e| CryptoError::ProviderUnavailable(format!("RSA-PSS signing failed: {e}")))
    }

    fn rsa_pss_verify(
        &self,
        key: &RsaPublicKey,
        message: &[u8],
        signature: &[u8],
    ) -> Result<bool, CryptoError> {
        let digest = Sha256::digest(message);
        match key.verify(
            Pss::new_with_salt::<Sha256>(PSS_SALT_LEN),
            &digest,
            signature,
        ) {
            Ok(()) => Ok(true),
            Err(rsa::Error::Verification) => Ok(false),
            Err(e) => Err(CryptoError::ProviderUnavailable(format!(
                "RSA-PSS verification failed to run: {e}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

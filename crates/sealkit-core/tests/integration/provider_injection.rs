//! Integration tests for provider injection.
//!
//! Every component draws randomness and primitives from the provider it is
//! handed. A recording provider observes the exact requests; an unavailable
//! provider proves no operation falls back to another source.

use std::sync::Mutex;

use rsa::{RsaPrivateKey, RsaPublicKey};
use sealkit_core::cipher::encrypt;
use sealkit_core::signature::sign;
use sealkit_core::{
    generate_encryption_key_pair, generate_symmetric_key, open, seal, seal_envelope,
    CryptoError, CryptoProvider, KeyMode, Pbkdf2Params, SecretBuffer, SymmetricKey,
    SystemProvider, NONCE_LEN, PBKDF2_ITERATIONS, RSA_MODULUS_BITS, SALT_LEN,
};

// ---------------------------------------------------------------------------
// Recording provider
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Random(usize),
    Derive { salt_len: usize, iterations: u32 },
    Seal,
    Open,
    RsaKeygen(usize),
    OaepEncrypt,
    OaepDecrypt,
    PssSign,
    PssVerify,
}

/// Delegates to [`SystemProvider`] and records each call.
#[derive(Default)]
struct RecordingProvider {
    calls: Mutex<Vec<Call>>,
}

impl RecordingProvider {
    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

impl CryptoProvider for RecordingProvider {
    fn fill_random(&self, dest: &mut [u8]) -> Result<(), CryptoError> {
        self.record(Call::Random(dest.len()));
        SystemProvider.fill_random(dest)
    }

    fn derive_key(
        &self,
        password: &[u8],
        salt: &[u8],
        params: &Pbkdf2Params,
    ) -> Result<SymmetricKey, CryptoError> {
        self.record(Call::Derive {
            salt_len: salt.len(),
            iterations: params.iterations,
        });
        SystemProvider.derive_key(password, salt, params)
    }

    fn aes_gcm_seal(
        &self,
        key: &SymmetricKey,
        nonce: &[u8; NONCE_LEN],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        self.record(Call::Seal);
        SystemProvider.aes_gcm_seal(key, nonce, plaintext)
    }

    fn aes_gcm_open(
        &self,
        key: &SymmetricKey,
        nonce: &[u8; NONCE_LEN],
        ciphertext_and_tag: &[u8],
    ) -> Result<SecretBuffer, CryptoError> {
        self.record(Call::Open);
        SystemProvider.aes_gcm_open(key, nonce, ciphertext_and_tag)
    }

    fn generate_rsa_key(&self, bits: usize) -> Result<RsaPrivateKey, CryptoError> {
        self.record(Call::RsaKeygen(bits));
        SystemProvider.generate_rsa_key(bits)
    }

    fn rsa_oaep_encrypt(
        &self,
        key: &RsaPublicKey,
        plaintext: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        self.record(Call::OaepEncrypt);
        SystemProvider.rsa_oaep_encrypt(key, plaintext)
    }

    fn rsa_oaep_decrypt(
        &self,
        key: &RsaPrivateKey,
        ciphertext: &[u8],
    ) -> Result<SecretBuffer, CryptoError> {
        self.record(Call::OaepDecrypt);
        SystemProvider.rsa_oaep_decrypt(key, ciphertext)
    }

    fn rsa_pss_sign(&self, key: &RsaPrivateKey, message: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.record(Call::PssSign);
        SystemProvider.rsa_pss_sign(key, message)
    }

    fn rsa_pss_verify(
        &self,
        key: &RsaPublicKey,
        message: &[u8],
        signature: &[u8],
    ) -> Result<bool, CryptoError> {
        self.record(Call::PssVerify);
        SystemProvider.rsa_pss_verify(key, message, signature)
    }
}

// ---------------------------------------------------------------------------
// Unavailable provider
// ---------------------------------------------------------------------------

/// Refuses every primitive.
struct UnavailableProvider;

fn unavailable<T>() -> Result<T, CryptoError> {
    Err(CryptoError::ProviderUnavailable("test provider is offline".into()))
}

impl CryptoProvider for UnavailableProvider {
    fn fill_random(&self, _dest: &mut [u8]) -> Result<(), CryptoError> {
        unavailable()
    }

    fn derive_key(
        &self,
        _password: &[u8],
        _salt: &[u8],
        _params: &Pbkdf2Params,
    ) -> Result<SymmetricKey, CryptoError> {
        unavailable()
    }

    fn aes_gcm_seal(
        &self,
        _key: &SymmetricKey,
        _nonce: &[u8; NONCE_LEN],
        _plaintext: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        unavailable()
    }

    fn aes_gcm_open(
        &self,
        _key: &SymmetricKey,
        _nonce: &[u8; NONCE_LEN],
        _ciphertext_and_tag: &[u8],
    ) -> Result<SecretBuffer, CryptoError> {
        unavailable()
    }

    fn generate_rsa_key(&self, _bits: usize) -> Result<RsaPrivateKey, CryptoError> {
        unavailable()
    }

    fn rsa_oaep_encrypt(
        &self,
        _key: &RsaPublicKey,
        _plaintext: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        unavailable()
    }

    fn rsa_oaep_decrypt(
        &self,
        _key: &RsaPrivateKey,
        _ciphertext: &[u8],
    ) -> Result<SecretBuffer, CryptoError> {
        unavailable()
    }

    fn rsa_pss_sign(&self, _key: &RsaPrivateKey, _message: &[u8]) -> Result<Vec<u8>, CryptoError> {
        unavailable()
    }

    fn rsa_pss_verify(
        &self,
        _key: &RsaPublicKey,
        _message: &[u8],
        _signature: &[u8],
    ) -> Result<bool, CryptoError> {
        unavailable()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn password_seal_requests_salt_then_nonce() {
    let provider = RecordingProvider::default();
    seal(&provider, "observed", "pw", KeyMode::Password).expect("seal");

    assert_eq!(
        provider.calls(),
        vec![
            Call::Random(SALT_LEN),
            Call::Derive {
                salt_len: SALT_LEN,
                iterations: PBKDF2_ITERATIONS,
            },
            Call::Random(NONCE_LEN),
            Call::Seal,
        ]
    );
}

#[test]
fn raw_key_seal_skips_derivation() {
    let key = generate_symmetric_key(&SystemProvider).expect("keygen");
    let provider = RecordingProvider::default();
    let envelope = seal(&provider, "observed", &key, KeyMode::RawKey).expect("seal");
    open(&provider, &envelope, &key, KeyMode::RawKey).expect("open");

    assert_eq!(
        provider.calls(),
        vec![Call::Random(NONCE_LEN), Call::Seal, Call::Open]
    );
}

#[test]
fn rsa_operations_route_through_provider() {
    let provider = RecordingProvider::default();
    let pair = generate_encryption_key_pair(&provider).expect("keygen");
    let pems = pair.to_pem().expect("export");
    let ciphertext = encrypt(&provider, "routed", &pems.public_pem).expect("encrypt");
    sealkit_core::cipher::decrypt(&provider, &ciphertext, &pems.private_pem).expect("decrypt");

    assert_eq!(
        provider.calls(),
        vec![
            Call::RsaKeygen(RSA_MODULUS_BITS),
            Call::OaepEncrypt,
            Call::OaepDecrypt,
        ]
    );
}

#[test]
fn signing_routes_through_provider() {
    let provider = RecordingProvider::default();
    let pems = sealkit_core::generate_signing_key_pair(&provider)
        .expect("keygen")
        .to_pem()
        .expect("export");
    let signature = sign(&provider, "routed", &pems.private_pem).expect("sign");
    sealkit_core::signature::verify(&provider, "routed", &signature, &pems.public_pem)
        .expect("verify");

    assert_eq!(
        provider.calls(),
        vec![
            Call::RsaKeygen(RSA_MODULUS_BITS),
            Call::PssSign,
            Call::PssVerify,
        ]
    );
}

#[test]
fn unavailable_provider_fails_every_generator() {
    assert!(matches!(
        generate_symmetric_key(&UnavailableProvider),
        Err(CryptoError::ProviderUnavailable(_))
    ));
    assert!(matches!(
        generate_encryption_key_pair(&UnavailableProvider),
        Err(CryptoError::ProviderUnavailable(_))
    ));
    assert!(matches!(
        sealkit_core::generate_signing_key_pair(&UnavailableProvider),
        Err(CryptoError::ProviderUnavailable(_))
    ));
}

#[test]
fn unavailable_provider_never_yields_an_envelope() {
    let result = seal_envelope(&UnavailableProvider, b"no fallback", "pw", KeyMode::Password);
    assert!(matches!(result, Err(CryptoError::ProviderUnavailable(_))));

    let key = generate_symmetric_key(&SystemProvider).expect("keygen");
    let result = seal_envelope(&UnavailableProvider, b"no fallback", &key, KeyMode::RawKey);
    assert!(matches!(result, Err(CryptoError::ProviderUnavailable(_))));
}

#[test]
fn unavailable_provider_blocks_rsa_with_valid_keys() {
    let pems = generate_encryption_key_pair(&SystemProvider)
        .expect("keygen")
        .to_pem()
        .expect("export");
    let result = encrypt(&UnavailableProvider, "no fallback", &pems.public_pem);
    assert!(matches!(result, Err(CryptoError::ProviderUnavailable(_))));
}

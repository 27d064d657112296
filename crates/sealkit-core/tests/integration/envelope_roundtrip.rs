//! Integration tests for the symmetric envelope.
//!
//! Covers the full text lifecycle in both key modes: seal → base64 → open,
//! wrong secrets, mode confusion, and tampering at the wire level.

use data_encoding::BASE64;
use sealkit_core::envelope::{MIN_PASSWORD_ENVELOPE_LEN, MIN_RAW_KEY_ENVELOPE_LEN};
use sealkit_core::{
    decode_symmetric_key, generate_symmetric_key, open, seal, CryptoError, KeyMode,
    SystemProvider, NONCE_LEN, SALT_LEN, TAG_LEN,
};

/// Password mode: seal "Hello" with "p@ss", open it, then fail with "wrong".
#[test]
fn password_envelope_lifecycle() {
    let envelope = seal(&SystemProvider, "Hello", "p@ss", KeyMode::Password)
        .expect("seal should succeed");

    let decoded = BASE64.decode(envelope.as_bytes()).expect("envelope is base64");
    assert_eq!(decoded.len(), SALT_LEN + NONCE_LEN + "Hello".len() + TAG_LEN);

    let opened = open(&SystemProvider, &envelope, "p@ss", KeyMode::Password)
        .expect("open should succeed");
    assert_eq!(opened, "Hello");

    let wrong = open(&SystemProvider, &envelope, "wrong", KeyMode::Password);
    assert!(matches!(wrong, Err(CryptoError::Decryption)));
}

/// Raw-key mode: generate a key, seal, open, and reject a different key.
#[test]
fn raw_key_envelope_lifecycle() {
    let key = generate_symmetric_key(&SystemProvider).expect("keygen should succeed");
    assert_eq!(decode_symmetric_key(&key).expect("decode").expose().len(), 32);

    let envelope =
        seal(&SystemProvider, "ünïcödé ✓", &key, KeyMode::RawKey).expect("seal should succeed");
    let opened = open(&SystemProvider, &envelope, &key, KeyMode::RawKey).expect("open");
    assert_eq!(opened, "ünïcödé ✓");

    let other = generate_symmetric_key(&SystemProvider).expect("keygen should succeed");
    let wrong = open(&SystemProvider, &envelope, &other, KeyMode::RawKey);
    assert!(matches!(wrong, Err(CryptoError::Decryption)));
}

/// Two seals of the same text differ (fresh salt and nonce each time).
#[test]
fn same_plaintext_never_yields_same_envelope() {
    let a = seal(&SystemProvider, "repeat", "pw", KeyMode::Password).expect("seal");
    let b = seal(&SystemProvider, "repeat", "pw", KeyMode::Password).expect("seal");
    assert_ne!(a, b);
}

/// Every byte of a password envelope is covered by authentication.
#[test]
fn tampering_anywhere_in_password_envelope_fails() {
    let envelope = seal(&SystemProvider, "integrity", "pw", KeyMode::Password).expect("seal");
    let bytes = BASE64.decode(envelope.as_bytes()).expect("base64");

    // Salt, nonce, ciphertext body and tag.
    for index in [0, SALT_LEN, SALT_LEN + NONCE_LEN, bytes.len() - 1] {
        let mut tampered = bytes.clone();
        tampered[index] ^= 0x80;
        let result = open(
            &SystemProvider,
            &BASE64.encode(&tampered),
            "pw",
            KeyMode::Password,
        );
        assert!(
            matches!(result, Err(CryptoError::Decryption)),
            "flip at byte {index} must be detected"
        );
    }
}

/// Truncated envelopes fail without panicking at every length.
#[test]
fn truncated_envelopes_fail_cleanly() {
    let key = generate_symmetric_key(&SystemProvider).expect("keygen");
    let envelope = seal(&SystemProvider, "truncate me", &key, KeyMode::RawKey).expect("seal");
    let bytes = BASE64.decode(envelope.as_bytes()).expect("base64");

    for len in 0..bytes.len() {
        let result = open(
            &SystemProvider,
            &BASE64.encode(&bytes[..len]),
            &key,
            KeyMode::RawKey,
        );
        assert!(
            matches!(result, Err(CryptoError::Decryption)),
            "truncation to {len} bytes must fail"
        );
    }
}

/// The minimum lengths match the salt and nonce prefixes.
#[test]
fn minimum_lengths_match_prefixes() {
    assert_eq!(MIN_PASSWORD_ENVELOPE_LEN, 28);
    assert_eq!(MIN_RAW_KEY_ENVELOPE_LEN, 12);
    assert_eq!(KeyMode::Password.min_envelope_len(), SALT_LEN + NONCE_LEN);
}

/// An empty password is accepted and still requires the same empty password.
#[test]
fn empty_password_is_a_valid_secret() {
    let envelope = seal(&SystemProvider, "open sesame", "", KeyMode::Password).expect("seal");
    assert_eq!(
        open(&SystemProvider, &envelope, "", KeyMode::Password).expect("open"),
        "open sesame"
    );
    assert!(open(&SystemProvider, &envelope, " ", KeyMode::Password).is_err());
}

//! Integration tests for the RSA-PSS signature engine.

use sealkit_core::signature::{sign, verify};
use sealkit_core::{
    generate_encryption_key_pair, generate_signing_key_pair, CryptoError, KeyUsage,
    SigningKeyPair, SystemProvider,
};

/// Sign "contract text"; it verifies, "contract TEXT" does not.
#[test]
fn signing_pair_lifecycle() {
    let pems = generate_signing_key_pair(&SystemProvider)
        .expect("keygen")
        .to_pem()
        .expect("export");

    let signature = sign(&SystemProvider, "contract text", &pems.private_pem).expect("sign");
    assert!(verify(&SystemProvider, "contract text", &signature, &pems.public_pem).expect("verify"));
    assert!(!verify(&SystemProvider, "contract TEXT", &signature, &pems.public_pem).expect("verify"));
}

/// A signature from one key does not verify under another.
#[test]
fn foreign_key_signature_is_false() {
    let ours = generate_signing_key_pair(&SystemProvider).expect("keygen").to_pem().expect("export");
    let theirs = generate_signing_key_pair(&SystemProvider).expect("keygen").to_pem().expect("export");

    let signature = sign(&SystemProvider, "msg", &theirs.private_pem).expect("sign");
    assert!(!verify(&SystemProvider, "msg", &signature, &ours.public_pem).expect("verify"));
}

/// Encryption keys are refused for signing and verification.
#[test]
fn encryption_keys_cannot_sign_or_verify() {
    let enc = generate_encryption_key_pair(&SystemProvider).expect("keygen").to_pem().expect("export");

    let result = sign(&SystemProvider, "msg", &enc.private_pem);
    assert!(matches!(
        result,
        Err(CryptoError::KeyUsageMismatch {
            expected: KeyUsage::Sign,
            found: KeyUsage::Encrypt,
        })
    ));

    let result = verify(&SystemProvider, "msg", "AAAA", &enc.public_pem);
    assert!(matches!(result, Err(CryptoError::KeyUsageMismatch { .. })));
}

/// The public half derived from a private key verifies its signatures.
#[test]
fn derived_public_key_verifies() {
    let pair = generate_signing_key_pair(&SystemProvider).expect("keygen");
    let pems = pair.to_pem().expect("export");
    let restored = SigningKeyPair::from_private(
        sealkit_core::SigningPrivateKey::from_pem(&pems.private_pem).expect("import"),
    );
    let derived_pem = restored.public().to_pem().expect("export");
    assert_eq!(derived_pem, pems.public_pem);

    let signature = sign(&SystemProvider, "derived", &pems.private_pem).expect("sign");
    assert!(verify(&SystemProvider, "derived", &signature, &derived_pem).expect("verify"));
}

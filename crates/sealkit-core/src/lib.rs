//! `sealkit-core`: single-shot envelope, RSA-OAEP and RSA-PSS operations.
//!
//! Every operation is stateless and takes a [`CryptoProvider`]; the crate
//! never implements a primitive itself. Zero async, zero I/O.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod error;
pub mod memory;

pub mod provider;

pub mod kdf;

pub mod codec;

pub mod keys;

pub mod envelope;

pub mod cipher;

pub mod signature;

pub use codec::{
    decode_symmetric_key, encode_symmetric_key, generate_symmetric_key, pem_kind, unwrap_pem,
    wrap_pem, PemKind, PEM_LINE_WIDTH,
};
pub use envelope::{open, open_envelope, seal, seal_envelope, Envelope, KeyMode};
pub use error::CryptoError;
pub use kdf::{Pbkdf2Params, PBKDF2_ITERATIONS, SALT_LEN};
pub use keys::{
    generate_encryption_key_pair, generate_key_pair, generate_signing_key_pair, Encryption,
    EncryptionKeyPair, EncryptionPrivateKey, EncryptionPublicKey, KeyPair, KeyUsage, PemKeyPair,
    PrivateKey, PublicKey, Signing, SigningKeyPair, SigningPrivateKey, SigningPublicKey, Usage,
    RSA_MODULUS_BITS,
};
pub use memory::{SecretBuffer, SecretBytes};
pub use provider::{
    CryptoProvider, SymmetricKey, SystemProvider, NONCE_LEN, PSS_SALT_LEN, SYMMETRIC_KEY_LEN,
    TAG_LEN,
};
pub use signature::Signature;

mod cipher_roundtrip;
mod envelope_roundtrip;
mod provider_injection;
mod signature_roundtrip;

//! Field-level encryption of individual string values.
//!
//! This module is intentionally free of HTTP and storage dependencies.
//! It protects single sensitive strings (passwords, connection strings,
//! note bodies) at rest, independent of where they end up being persisted.
//!
//! # Ciphertext format
//!
//! ```text
//! <base64(salt)>:<base64(nonce)>:<base64(tag)>:<base64(ciphertext)>
//! ```
//!
//! Every value is encrypted under its own AES-256 key, derived from the
//! process-wide master secret and the per-value salt via HKDF-SHA256. The
//! HKDF info label is versioned, so a future derivation scheme can coexist
//! with values already in storage.

pub mod cipher;
pub mod kdf;
pub mod policy;
pub mod secret;

pub use cipher::{CipherError, FieldCipher};
pub use secret::MasterSecret;

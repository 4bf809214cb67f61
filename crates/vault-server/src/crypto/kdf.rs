//! Per-value field-key derivation via HKDF-SHA256.

use hkdf::Hkdf;
use sha2::Sha256;

use super::cipher::{KEY_LEN, SALT_LEN};
use super::secret::MasterSecret;

/// Domain separation label for field-key derivation. Versioned so a future
/// derivation scheme can coexist with values already in storage.
const FIELD_KEY_INFO: &[u8] = b"vault-field-key-v1";

/// A derived 256-bit field key.
///
/// Exists only for the duration of a single encrypt or decrypt call and is
/// never persisted; it is recomputed on demand from the master secret and
/// the salt stored alongside the ciphertext. Zeroed on drop.
pub struct FieldKey([u8; KEY_LEN]);

impl FieldKey {
    /// Raw key bytes.
    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl Drop for FieldKey {
    fn drop(&mut self) {
        // Zero the key material on drop.
        self.0.iter_mut().for_each(|b| *b = 0);
    }
}

impl std::fmt::Debug for FieldKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material — not even in debug builds.
        f.write_str("FieldKey([REDACTED])")
    }
}

/// Derive the field key for one stored value from the master secret and the
/// value's salt.
///
/// Deterministic: identical `(secret, salt)` always yields the identical
/// key. No side effects.
pub fn derive_field_key(secret: &MasterSecret, salt: &[u8; SALT_LEN]) -> FieldKey {
    let hk = Hkdf::<Sha256>::new(Some(salt), secret.ikm());
    let mut key = [0u8; KEY_LEN];
    hk.expand(FIELD_KEY_INFO, &mut key)
        .expect("HKDF expand should not fail for a 32-byte output");
    FieldKey(key)
}

//! [`MasterSecret`]: the process-wide secret all field keys derive from.

use sha2::{Digest, Sha256};

use super::cipher::CipherError;

/// Byte length of the normalised secret (SHA-256 output).
const DIGEST_LEN: usize = 32;

/// The master secret, normalised to a fixed 256-bit value.
///
/// Operators may supply a secret of any length; it is hashed once at
/// startup so the derivation step always receives fixed-length input.
/// The raw secret string is not retained. When this type is dropped, the
/// buffer is overwritten with zeroes to minimise the window during which
/// secret material lives in RAM.
pub struct MasterSecret(Box<[u8; DIGEST_LEN]>);

impl MasterSecret {
    /// Normalise a raw secret string into a [`MasterSecret`].
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::MissingMasterSecret`] if the secret is empty
    /// or whitespace-only. This is fatal at process startup.
    pub fn new(raw: &str) -> Result<Self, CipherError> {
        if raw.trim().is_empty() {
            return Err(CipherError::MissingMasterSecret);
        }
        let digest: [u8; DIGEST_LEN] = Sha256::digest(raw.as_bytes()).into();
        Ok(Self(Box::new(digest)))
    }

    /// The fixed-length normalised secret, used as HKDF input keying material.
    pub(crate) fn ikm(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }
}

impl Drop for MasterSecret {
    fn drop(&mut self) {
        // Zero the secret material on drop.
        self.0.iter_mut().for_each(|b| *b = 0);
    }
}

impl std::fmt::Debug for MasterSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print secret material — not even in debug builds.
        f.write_str("MasterSecret([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_secret() {
        assert!(matches!(
            MasterSecret::new(""),
            Err(CipherError::MissingMasterSecret)
        ));
    }

    #[test]
    fn rejects_whitespace_only_secret() {
        assert!(matches!(
            MasterSecret::new("   \t\n"),
            Err(CipherError::MissingMasterSecret)
        ));
    }

    #[test]
    fn normalisation_is_deterministic() {
        let a = MasterSecret::new("correct horse battery staple").unwrap();
        let b = MasterSecret::new("correct horse battery staple").unwrap();
        assert_eq!(a.ikm(), b.ikm());
    }

    #[test]
    fn different_secrets_normalise_differently() {
        let a = MasterSecret::new("secret-a").unwrap();
        let b = MasterSecret::new("secret-b").unwrap();
        assert_ne!(a.ikm(), b.ikm());
    }

    #[test]
    fn secret_redacted_in_debug() {
        let secret = MasterSecret::new("hunter2").unwrap();
        assert!(format!("{secret:?}").contains("REDACTED"));
    }
}

//! AES-256-GCM encryption and decryption of individual string fields.
//!
//! Every value is encrypted under its own key, derived from the master
//! secret and a fresh random salt. A fresh random nonce is drawn for every
//! call as well, so a `(key, nonce)` pair is never reused — GCM requires
//! this absolutely; reuse breaks both confidentiality and authentication.

use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Key, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

use super::kdf::derive_field_key;
use super::secret::MasterSecret;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Byte length of the per-value key-derivation salt.
pub const SALT_LEN: usize = 16;

/// Byte length of an AES-GCM nonce (12 bytes = 96 bits).
pub const NONCE_LEN: usize = 12;

/// Byte length of the GCM authentication tag.
pub const TAG_LEN: usize = 16;

/// A parsed, encrypted field value.
///
/// The string representation is
/// `<base64(salt)>:<base64(nonce)>:<base64(tag)>:<base64(ciphertext)>`
/// with the standard base64 alphabet. Component order and delimiter are the
/// wire format and must stay stable so previously stored values remain
/// readable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedBlob {
    /// Key-derivation salt bytes.
    pub salt: Vec<u8>,
    /// Nonce bytes.
    pub nonce: Vec<u8>,
    /// Authentication tag bytes.
    pub tag: Vec<u8>,
    /// Encrypted payload bytes, tag excluded. Empty for an empty plaintext.
    pub ciphertext: Vec<u8>,
}

impl EncryptedBlob {
    /// Encode this value to its canonical string representation.
    pub fn to_string_repr(&self) -> String {
        format!(
            "{}:{}:{}:{}",
            STANDARD.encode(&self.salt),
            STANDARD.encode(&self.nonce),
            STANDARD.encode(&self.tag),
            STANDARD.encode(&self.ciphertext),
        )
    }

    /// Parse an encrypted field string back into an [`EncryptedBlob`].
    ///
    /// Component sizes are deliberately not checked here: a four-part
    /// base64 string is structurally a valid blob even when its components
    /// can never authenticate. Size checks happen in [`FieldCipher::decrypt`].
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidFormat`] if the string does not split
    /// into exactly four components or any component fails base64 decoding.
    pub fn from_str(s: &str) -> Result<Self, CipherError> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 4 {
            return Err(CipherError::InvalidFormat);
        }
        let decode = |part: &str| STANDARD.decode(part).map_err(|_| CipherError::InvalidFormat);
        Ok(Self {
            salt: decode(parts[0])?,
            nonce: decode(parts[1])?,
            tag: decode(parts[2])?,
            ciphertext: decode(parts[3])?,
        })
    }
}

/// Errors produced by the field cipher.
#[derive(Debug, Error)]
pub enum CipherError {
    /// The master secret is absent or empty. Fatal at process startup.
    #[error("master secret is missing or empty")]
    MissingMasterSecret,

    /// The stored value does not parse as a four-part encrypted blob, or
    /// decrypted to data that is not valid UTF-8.
    #[error("invalid encrypted field format")]
    InvalidFormat,

    /// Tag verification failed: tampering, corruption, or a value encrypted
    /// under a different master secret. No plaintext is returned.
    #[error("field authentication failed")]
    AuthenticationFailed,

    /// Internal AEAD failure on the encrypt path (unreachable with a valid
    /// key and nonce).
    #[error("aead operation failed")]
    AeadFailure,
}

/// Encrypts and decrypts individual field values under keys derived from
/// the process-wide master secret.
///
/// Stateless apart from the secret handle: every call is an independent,
/// synchronous computation, so a shared reference can be used freely from
/// concurrent tasks.
#[derive(Debug)]
pub struct FieldCipher {
    secret: MasterSecret,
}

impl FieldCipher {
    /// Create a cipher over the given master secret.
    pub fn new(secret: MasterSecret) -> Self {
        Self { secret }
    }

    /// Encrypt a plaintext string into an [`EncryptedBlob`].
    ///
    /// A fresh 16-byte salt and a fresh 12-byte nonce are drawn from the OS
    /// CSPRNG on every call; the two are independent random values, not
    /// derived from each other or from the plaintext.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::AeadFailure`] on an internal AEAD error
    /// (should be unreachable with a valid key and nonce).
    pub fn encrypt(&self, plaintext: &str) -> Result<EncryptedBlob, CipherError> {
        // Use OsRng for cryptographically secure salt and nonce draws.
        use aes_gcm::aead::rand_core::RngCore;
        let mut salt = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut salt);
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);

        let key = derive_field_key(&self.secret, &salt);
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));
        let nonce = Nonce::from_slice(&nonce_bytes);

        let mut sealed = cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|_| CipherError::AeadFailure)?;

        // The AEAD appends the 16-byte tag to the ciphertext; store it as
        // its own component.
        let tag = sealed.split_off(sealed.len() - TAG_LEN);

        Ok(EncryptedBlob {
            salt: salt.to_vec(),
            nonce: nonce_bytes.to_vec(),
            tag,
            ciphertext: sealed,
        })
    }

    /// Decrypt an [`EncryptedBlob`] back to the original plaintext string.
    ///
    /// Fail-closed: no partial plaintext is returned on any failure path,
    /// and no alternative key is ever tried.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::AuthenticationFailed`] if the tag does not
    /// verify or the component sizes make verification impossible, and
    /// [`CipherError::InvalidFormat`] if the authenticated plaintext is not
    /// valid UTF-8.
    pub fn decrypt(&self, blob: &EncryptedBlob) -> Result<String, CipherError> {
        // An off-sized salt, nonce, or tag can never authenticate; that is
        // an authentication failure, not a parse failure.
        let salt: [u8; SALT_LEN] = blob
            .salt
            .as_slice()
            .try_into()
            .map_err(|_| CipherError::AuthenticationFailed)?;
        if blob.nonce.len() != NONCE_LEN || blob.tag.len() != TAG_LEN {
            return Err(CipherError::AuthenticationFailed);
        }

        let key = derive_field_key(&self.secret, &salt);
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));
        let nonce = Nonce::from_slice(&blob.nonce);

        let mut sealed = Vec::with_capacity(blob.ciphertext.len() + TAG_LEN);
        sealed.extend_from_slice(&blob.ciphertext);
        sealed.extend_from_slice(&blob.tag);

        let plaintext = cipher
            .decrypt(nonce, sealed.as_slice())
            .map_err(|_| CipherError::AuthenticationFailed)?;

        String::from_utf8(plaintext).map_err(|_| CipherError::InvalidFormat)
    }

    /// Encrypt `plaintext` and return the canonical string form for storage.
    pub fn encrypt_field(&self, plaintext: &str) -> Result<String, CipherError> {
        Ok(self.encrypt(plaintext)?.to_string_repr())
    }

    /// Parse and decrypt a stored string previously produced by
    /// [`FieldCipher::encrypt_field`].
    pub fn decrypt_field(&self, stored: &str) -> Result<String, CipherError> {
        let blob = EncryptedBlob::from_str(stored)?;
        self.decrypt(&blob)
    }
}

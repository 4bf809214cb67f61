//! Boundary policy for optional values.
//!
//! Absent and empty strings mean "no value to protect" and never reach the
//! cipher; a null blob is stored in their place. The cipher itself stays
//! total over all strings — this is the one place where the "empty means
//! absent" business rule lives.

use super::cipher::{CipherError, FieldCipher};

/// Encrypt an optional value for storage.
///
/// `None` and the empty string short-circuit to `None` without invoking the
/// cipher.
pub fn seal_optional(
    cipher: &FieldCipher,
    value: Option<&str>,
) -> Result<Option<String>, CipherError> {
    match value {
        None | Some("") => Ok(None),
        Some(s) => cipher.encrypt_field(s).map(Some),
    }
}

/// Decrypt an optional stored value.
///
/// `None` short-circuits to `None`: a null blob means no value was ever
/// stored. Decryption failures propagate — a stored-but-unreadable value
/// must never collapse into `None`, since that would mask corruption or
/// tampering as a normal "no value" state.
pub fn open_optional(
    cipher: &FieldCipher,
    stored: Option<&str>,
) -> Result<Option<String>, CipherError> {
    match stored {
        None => Ok(None),
        Some(s) => cipher.decrypt_field(s).map(Some),
    }
}

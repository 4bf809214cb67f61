//! Sealing and opening of sensitive document fields.
//!
//! Each item kind designates a fixed set of dot-notation paths whose string
//! values are encrypted before the document is stored and decrypted when it
//! is read back. Array fields use the `[]` suffix before the dot separator,
//! e.g. `"columns[].cards[].notes"`.

use crate::crypto::cipher::{CipherError, FieldCipher};
use crate::crypto::policy;
use common::protocol::ItemKind;

/// Dot-notation paths of the sensitive fields for each item kind.
pub fn sensitive_paths(kind: ItemKind) -> &'static [&'static str] {
    match kind {
        ItemKind::Credential => &["password", "connection_string", "notes"],
        ItemKind::Note => &["body"],
        ItemKind::Board => &["columns[].cards[].notes"],
    }
}

/// Segments of a dot-notation field path.
enum PathSegment {
    /// Navigate into an object property by name.
    Key(String),
    /// Expand into every element of a JSON array.
    ArrayItem,
}

/// Parse a dot-notation field path into a list of [`PathSegment`]s.
///
/// Array fields use the `[]` suffix before the dot separator, e.g.
/// `"columns[].cards[].notes"` →
/// `[Key("columns"), ArrayItem, Key("cards"), ArrayItem, Key("notes")]`.
fn parse_path(path: &str) -> Vec<PathSegment> {
    let mut segments = Vec::new();
    for part in path.split('.') {
        if let Some(key) = part.strip_suffix("[]") {
            segments.push(PathSegment::Key(key.to_owned()));
            segments.push(PathSegment::ArrayItem);
        } else {
            segments.push(PathSegment::Key(part.to_owned()));
        }
    }
    segments
}

/// Recursively navigate `value` following `segments` and apply `leaf` to
/// the value found at the end of the path. Missing keys and non-matching
/// shapes are silently skipped.
fn apply_at_path(
    value: &mut serde_json::Value,
    segments: &[PathSegment],
    leaf: &mut dyn FnMut(&mut serde_json::Value) -> Result<(), CipherError>,
) -> Result<(), CipherError> {
    if segments.is_empty() {
        return leaf(value);
    }

    match &segments[0] {
        PathSegment::Key(key) => {
            if let serde_json::Value::Object(map) = value {
                if let Some(child) = map.get_mut(key) {
                    apply_at_path(child, &segments[1..], leaf)?;
                }
            }
        }
        PathSegment::ArrayItem => {
            if let serde_json::Value::Array(arr) = value {
                for item in arr.iter_mut() {
                    apply_at_path(item, &segments[1..], leaf)?;
                }
            }
        }
    }
    Ok(())
}

/// Encrypt every sensitive string field of `document` in place.
///
/// Empty strings are stored as null ("no value to protect"); absent fields
/// and non-string leaves are left untouched.
pub fn seal_document(
    cipher: &FieldCipher,
    kind: ItemKind,
    document: &mut serde_json::Value,
) -> Result<(), CipherError> {
    for path in sensitive_paths(kind) {
        let segments = parse_path(path);
        apply_at_path(document, &segments, &mut |leaf| {
            let value = match leaf {
                serde_json::Value::String(s) => Some(s.as_str()),
                _ => return Ok(()),
            };
            *leaf = match policy::seal_optional(cipher, value)? {
                Some(stored) => serde_json::Value::String(stored),
                None => serde_json::Value::Null,
            };
            Ok(())
        })?;
    }
    Ok(())
}

/// Decrypt every sensitive field of `document` in place.
///
/// Null fields stay null: no value was ever stored there. A field that
/// fails to parse or authenticate aborts the open with the cipher error so
/// the caller can surface the value as unreadable — never as absent.
pub fn open_document(
    cipher: &FieldCipher,
    kind: ItemKind,
    document: &mut serde_json::Value,
) -> Result<(), CipherError> {
    for path in sensitive_paths(kind) {
        let segments = parse_path(path);
        apply_at_path(document, &segments, &mut |leaf| {
            let stored = match leaf {
                serde_json::Value::Null => None,
                serde_json::Value::String(s) => Some(s.as_str()),
                _ => return Ok(()),
            };
            if let Some(plain) = policy::open_optional(cipher, stored)? {
                *leaf = serde_json::Value::String(plain);
            }
            Ok(())
        })?;
    }
    Ok(())
}

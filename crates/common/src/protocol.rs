//! Request and response types exchanged between the vault backend and its clients.
//!
//! These types are serialised as JSON over the HTTP API.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// The kind of a vault item. Determines which document fields are treated as
/// sensitive and encrypted before persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// A stored credential: login, password, connection string.
    Credential,
    /// A free-form shared note.
    Note,
    /// A kanban-style project board.
    Board,
}

/// Request body for `POST /items` and `PUT /items/{id}`.
///
/// The `data` field is an arbitrary JSON document. Fields designated as
/// sensitive for the item's kind are encrypted before the document is stored;
/// everything else is persisted as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemRequest {
    /// Kind of the item being stored.
    pub kind: ItemKind,
    /// Display name. Not encrypted; used for list views.
    pub name: String,
    /// Arbitrary JSON document with the item's contents.
    pub data: serde_json::Value,
}

/// Full item returned by `GET /items/{id}` with sensitive fields decrypted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemResponse {
    /// Server-assigned item identifier.
    pub id: Uuid,
    /// Kind of the item.
    pub kind: ItemKind,
    /// Display name.
    pub name: String,
    /// The item document. A `null` sensitive field means no value was ever
    /// stored there.
    pub data: serde_json::Value,
}

/// Abbreviated item returned by `GET /items`. Carries no document contents,
/// so listing never touches the cipher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemSummary {
    /// Server-assigned item identifier.
    pub id: Uuid,
    /// Kind of the item.
    pub kind: ItemKind,
    /// Display name.
    pub name: String,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"bad_request"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status: `"ok"` or `"degraded"`.
    pub status: String,
    /// Whether the item store is reachable.
    pub store_ready: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn item_request_round_trip() {
        let req = ItemRequest {
            kind: ItemKind::Credential,
            name: "prod database".into(),
            data: json!({"login": "admin", "password": "hunter2"}),
        };
        let json = serde_json::to_string(&req).unwrap();
        let decoded: ItemRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.kind, ItemKind::Credential);
        assert_eq!(decoded.data["login"], "admin");
    }

    #[test]
    fn item_kind_uses_snake_case() {
        let json = serde_json::to_string(&ItemKind::Credential).unwrap();
        assert_eq!(json, "\"credential\"");
        let kind: ItemKind = serde_json::from_str("\"board\"").unwrap();
        assert_eq!(kind, ItemKind::Board);
    }

    #[test]
    fn unknown_item_kind_rejected() {
        assert!(serde_json::from_str::<ItemKind>("\"diary\"").is_err());
    }

    #[test]
    fn error_response_new() {
        let e = ErrorResponse::new("bad_request", "missing identity header");
        assert_eq!(e.code, "bad_request");
        assert!(e.message.contains("missing identity header"));
    }

    #[test]
    fn health_response_serde() {
        let h = HealthResponse {
            status: "ok".into(),
            store_ready: true,
        };
        let json = serde_json::to_string(&h).unwrap();
        let decoded: HealthResponse = serde_json::from_str(&json).unwrap();
        assert!(decoded.store_ready);
    }
}

//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::crypto::FieldCipher;
use crate::store::ItemStore;

/// Application state shared across all request handlers.
///
/// All fields are cheaply cloneable (`Arc`-wrapped or already `Arc`-backed)
/// so that Axum can clone the state for each request without copying
/// expensive data.
#[derive(Clone)]
pub struct AppState {
    /// Field cipher over the process-wide master secret.
    pub cipher: Arc<FieldCipher>,
    /// Tenant-scoped item store.
    pub store: ItemStore,
    /// Name of the HTTP header carrying the verified user id.
    pub identity_header_name: Arc<String>,
}

impl AppState {
    /// Create a new [`AppState`] with the provided cipher, store, and
    /// identity header name.
    pub fn new(cipher: FieldCipher, store: ItemStore, identity_header_name: String) -> Self {
        Self {
            cipher: Arc::new(cipher),
            store,
            identity_header_name: Arc::new(identity_header_name),
        }
    }
}

#[cfg(test)]
impl Default for AppState {
    /// Creates an [`AppState`] over a fixed test secret, suitable for tests.
    fn default() -> Self {
        use crate::crypto::MasterSecret;
        Self::new(
            FieldCipher::new(MasterSecret::new("test-master-key-0123456789abcdef").unwrap()),
            ItemStore::new(),
            "X-Vault-User".into(),
        )
    }
}

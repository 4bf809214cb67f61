//! Axum request handlers for all service endpoints.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use common::protocol::{ErrorResponse, HealthResponse, ItemRequest, ItemResponse, ItemSummary};
use common::ServiceError;
use tracing::warn;
use uuid::Uuid;

use super::state::AppState;
use crate::crypto::cipher::CipherError;
use crate::store::{record, StoreError, StoredItem};

/// Render a [`ServiceError`] as its JSON response.
fn error_response(err: &ServiceError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = ErrorResponse::new(err.code(), err.to_string());
    (status, Json(body)).into_response()
}

/// Extract the verified user id from the configured identity header.
///
/// Identity verification is delegated upstream; by the time a request
/// reaches this service the header value is a trusted user id.
fn owner_from_headers(state: &AppState, headers: &HeaderMap) -> Result<String, ServiceError> {
    match headers.get(state.identity_header_name.as_str()) {
        Some(v) => match v.to_str() {
            Ok(s) if !s.is_empty() => Ok(s.to_owned()),
            Ok(_) => Err(ServiceError::Unauthenticated(format!(
                "{} header is empty",
                state.identity_header_name
            ))),
            Err(_) => Err(ServiceError::Unauthenticated(format!(
                "{} header contains non-ASCII characters",
                state.identity_header_name
            ))),
        },
        None => Err(ServiceError::Unauthenticated(format!(
            "missing {} header",
            state.identity_header_name
        ))),
    }
}

/// Map a cipher failure on read to the service-level error.
///
/// Malformed and unauthenticated blobs both surface to callers as "value
/// unreadable"; the distinct kind is logged for operators. Absent values
/// never reach this path — they are nulls, not errors.
fn unreadable(err: &CipherError) -> ServiceError {
    warn!(kind = %err, "stored field failed to decrypt");
    ServiceError::ValueUnreadable("a stored field could not be decrypted".into())
}

/// `POST /items` — create an item for the calling user.
///
/// Sensitive fields of the document are encrypted before anything is
/// persisted.
pub async fn create_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<ItemRequest>,
) -> Response {
    let owner = match owner_from_headers(&state, &headers) {
        Ok(o) => o,
        Err(e) => return error_response(&e),
    };

    if req.name.trim().is_empty() {
        return error_response(&ServiceError::BadRequest(
            "item name must not be empty".into(),
        ));
    }

    let mut document = req.data;
    if let Err(e) = record::seal_document(&state.cipher, req.kind, &mut document) {
        warn!(kind = %e, "sealing failed");
        return error_response(&ServiceError::Internal("encryption failed".into()));
    }

    let id = state
        .store
        .insert(
            &owner,
            StoredItem {
                kind: req.kind,
                name: req.name.clone(),
                document,
            },
        )
        .await;

    let body = ItemSummary {
        id,
        kind: req.kind,
        name: req.name,
    };
    (StatusCode::CREATED, Json(body)).into_response()
}

/// `GET /items` — list the calling user's items.
///
/// Returns summaries only; listing never touches the cipher.
pub async fn list_items(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let owner = match owner_from_headers(&state, &headers) {
        Ok(o) => o,
        Err(e) => return error_response(&e),
    };

    let items = state.store.list(&owner).await;
    let body: Vec<ItemSummary> = items
        .into_iter()
        .map(|(id, item)| ItemSummary {
            id,
            kind: item.kind,
            name: item.name,
        })
        .collect();
    (StatusCode::OK, Json(body)).into_response()
}

/// `GET /items/{id}` — fetch one item with sensitive fields decrypted.
///
/// A field stored as null comes back null: no value was ever stored there.
/// A field that fails authentication turns the request into a
/// `value_unreadable` error. The two cases must never be conflated.
pub async fn get_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Response {
    let owner = match owner_from_headers(&state, &headers) {
        Ok(o) => o,
        Err(e) => return error_response(&e),
    };

    let mut item = match state.store.get(&owner, id).await {
        Ok(i) => i,
        Err(StoreError::NotFound) => {
            return error_response(&ServiceError::NotFound(format!("no item {id}")));
        }
    };

    if let Err(e) = record::open_document(&state.cipher, item.kind, &mut item.document) {
        return error_response(&unreadable(&e));
    }

    let body = ItemResponse {
        id,
        kind: item.kind,
        name: item.name,
        data: item.document,
    };
    (StatusCode::OK, Json(body)).into_response()
}

/// `PUT /items/{id}` — replace an item wholesale with a re-sealed document.
pub async fn update_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(req): Json<ItemRequest>,
) -> Response {
    let owner = match owner_from_headers(&state, &headers) {
        Ok(o) => o,
        Err(e) => return error_response(&e),
    };

    if req.name.trim().is_empty() {
        return error_response(&ServiceError::BadRequest(
            "item name must not be empty".into(),
        ));
    }

    let mut document = req.data;
    if let Err(e) = record::seal_document(&state.cipher, req.kind, &mut document) {
        warn!(kind = %e, "sealing failed");
        return error_response(&ServiceError::Internal("encryption failed".into()));
    }

    let replaced = state
        .store
        .replace(
            &owner,
            id,
            StoredItem {
                kind: req.kind,
                name: req.name.clone(),
                document,
            },
        )
        .await;

    match replaced {
        Ok(()) => {
            let body = ItemSummary {
                id,
                kind: req.kind,
                name: req.name,
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(StoreError::NotFound) => {
            error_response(&ServiceError::NotFound(format!("no item {id}")))
        }
    }
}

/// `DELETE /items/{id}` — remove an item and its stored blobs.
pub async fn delete_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Response {
    let owner = match owner_from_headers(&state, &headers) {
        Ok(o) => o,
        Err(e) => return error_response(&e),
    };

    match state.store.remove(&owner, id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(StoreError::NotFound) => {
            error_response(&ServiceError::NotFound(format!("no item {id}")))
        }
    }
}

/// `GET /health` — liveness check.
pub async fn health(State(_state): State<AppState>) -> Response {
    // The in-memory store has no failure mode to report.
    let body = HealthResponse {
        status: "ok".into(),
        store_ready: true,
    };
    (StatusCode::OK, Json(body)).into_response()
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, Router};
    use common::protocol::ItemKind;
    use serde_json::json;
    use tower::ServiceExt;

    fn test_app(state: AppState) -> Router {
        crate::server::router::build(state)
    }

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_item(user: &str, body: &serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/items")
            .header("content-type", "application/json")
            .header("X-Vault-User", user)
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap()
    }

    fn get_path(user: &str, path: &str) -> Request<Body> {
        Request::builder()
            .uri(path)
            .header("X-Vault-User", user)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn health_returns_200() {
        let app = test_app(AppState::default());
        let resp = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_identity_header_is_rejected() {
        let app = test_app(AppState::default());
        let req = Request::builder()
            .method("POST")
            .uri("/items")
            .header("content-type", "application/json")
            .body(Body::from("{}"))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn blank_item_name_is_rejected() {
        let app = test_app(AppState::default());
        let resp = app
            .oneshot(post_item(
                "alice",
                &json!({"kind": "note", "name": "  ", "data": {"body": "x"}}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn create_encrypts_at_rest_and_get_decrypts() {
        let state = AppState::default();
        let app = test_app(state.clone());

        let resp = app
            .clone()
            .oneshot(post_item(
                "alice",
                &json!({
                    "kind": "credential",
                    "name": "prod db",
                    "data": {"login": "admin", "password": "hunter2"}
                }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created = body_json(resp).await;
        let id: Uuid = created["id"].as_str().unwrap().parse().unwrap();

        // At rest the password must be a sealed blob, not the plaintext.
        let raw = state.store.get("alice", id).await.unwrap();
        let stored = raw.document["password"].as_str().unwrap();
        assert_ne!(stored, "hunter2");
        assert_eq!(stored.split(':').count(), 4);
        assert_eq!(raw.document["login"], "admin");

        let resp = app
            .clone()
            .oneshot(get_path("alice", &format!("/items/{id}")))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let fetched = body_json(resp).await;
        assert_eq!(fetched["data"]["password"], "hunter2");
        assert_eq!(fetched["data"]["login"], "admin");
    }

    #[tokio::test]
    async fn items_are_scoped_to_their_owner() {
        let state = AppState::default();
        let app = test_app(state.clone());

        let resp = app
            .clone()
            .oneshot(post_item(
                "alice",
                &json!({"kind": "note", "name": "mine", "data": {"body": "private"}}),
            ))
            .await
            .unwrap();
        let id = body_json(resp).await["id"].as_str().unwrap().to_owned();

        let resp = app
            .clone()
            .oneshot(get_path("bob", &format!("/items/{id}")))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn empty_sensitive_field_reads_back_as_null() {
        let state = AppState::default();
        let app = test_app(state.clone());

        let resp = app
            .clone()
            .oneshot(post_item(
                "alice",
                &json!({"kind": "note", "name": "empty", "data": {"body": ""}}),
            ))
            .await
            .unwrap();
        let id = body_json(resp).await["id"].as_str().unwrap().to_owned();

        let resp = app
            .clone()
            .oneshot(get_path("alice", &format!("/items/{id}")))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let fetched = body_json(resp).await;
        assert!(fetched["data"]["body"].is_null());
    }

    #[tokio::test]
    async fn corrupted_blob_surfaces_as_value_unreadable() {
        let state = AppState::default();
        let app = test_app(state.clone());

        // Plant an item whose stored blob cannot authenticate.
        let id = state
            .store
            .insert(
                "alice",
                StoredItem {
                    kind: ItemKind::Note,
                    name: "broken".into(),
                    document: json!({"body": "QQ==:QQ==:QQ==:QQ=="}),
                },
            )
            .await;

        let resp = app
            .oneshot(get_path("alice", &format!("/items/{id}")))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(resp).await;
        assert_eq!(body["code"], "value_unreadable");
    }

    #[tokio::test]
    async fn update_replaces_document_wholesale() {
        let state = AppState::default();
        let app = test_app(state.clone());

        let resp = app
            .clone()
            .oneshot(post_item(
                "alice",
                &json!({"kind": "note", "name": "draft", "data": {"body": "v1"}}),
            ))
            .await
            .unwrap();
        let id = body_json(resp).await["id"].as_str().unwrap().to_owned();

        let req = Request::builder()
            .method("PUT")
            .uri(format!("/items/{id}"))
            .header("content-type", "application/json")
            .header("X-Vault-User", "alice")
            .body(Body::from(
                serde_json::to_vec(
                    &json!({"kind": "note", "name": "final", "data": {"body": "v2"}}),
                )
                .unwrap(),
            ))
            .unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = app
            .clone()
            .oneshot(get_path("alice", &format!("/items/{id}")))
            .await
            .unwrap();
        let fetched = body_json(resp).await;
        assert_eq!(fetched["name"], "final");
        assert_eq!(fetched["data"]["body"], "v2");
    }

    #[tokio::test]
    async fn delete_then_get_returns_404() {
        let state = AppState::default();
        let app = test_app(state.clone());

        let resp = app
            .clone()
            .oneshot(post_item(
                "alice",
                &json!({"kind": "note", "name": "gone", "data": {"body": "x"}}),
            ))
            .await
            .unwrap();
        let id = body_json(resp).await["id"].as_str().unwrap().to_owned();

        let req = Request::builder()
            .method("DELETE")
            .uri(format!("/items/{id}"))
            .header("X-Vault-User", "alice")
            .body(Body::empty())
            .unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let resp = app
            .clone()
            .oneshot(get_path("alice", &format!("/items/{id}")))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn list_returns_summaries_only() {
        let state = AppState::default();
        let app = test_app(state.clone());

        app.clone()
            .oneshot(post_item(
                "alice",
                &json!({"kind": "credential", "name": "db", "data": {"password": "pw"}}),
            ))
            .await
            .unwrap();

        let resp = app
            .clone()
            .oneshot(get_path("alice", "/items"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let listed = body_json(resp).await;
        let items = listed.as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["name"], "db");
        assert!(items[0].get("data").is_none());
    }
}

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use serde_json::{Value, json};

use docket_client::ApiClient;

/// Counters and switches for the in-process fake API.
#[derive(Default)]
pub struct FakeApi {
    pub refresh_ok: bool,
    pub refreshes: AtomicUsize,
    pub list_calls: AtomicUsize,
}

impl FakeApi {
    pub fn refreshes(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

fn error(status: StatusCode, kind: &str) -> Response {
    (status, Json(json!({ "kind": kind, "message": kind.to_lowercase() }))).into_response()
}

fn tokens(access: &str, refresh: &str) -> Json<Value> {
    Json(json!({
        "tokenType": "Bearer",
        "accessToken": access,
        "expiresIn": 3600,
        "refreshToken": refresh
    }))
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"] == "wrong" {
        return error(StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS");
    }
    // Hand out an access token the data routes will reject.
    tokens("stale", "r1").into_response()
}

async fn refresh(State(api): State<Arc<FakeApi>>, Json(body): Json<Value>) -> Response {
    api.refreshes.fetch_add(1, Ordering::SeqCst);
    if api.refresh_ok && body["refreshToken"] == "r1" {
        tokens("fresh", "r2").into_response()
    } else {
        error(StatusCode::UNAUTHORIZED, "INVALID_REFRESH_TOKEN")
    }
}

async fn list_documents(
    State(api): State<Arc<FakeApi>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    api.list_calls.fetch_add(1, Ordering::SeqCst);
    if bearer(&headers) != Some("fresh") {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let search = params.get("search").cloned().unwrap_or_default();
    Json(json!({
        "totalItems": 1,
        "totalPages": 1,
        "items": [{
            "id": 1, "type": "Invoice", "date": "2024-01-15",
            "firstName": "Jan", "lastName": search, "city": "Warszawa", "items": []
        }]
    }))
    .into_response()
}

async fn get_document(headers: HeaderMap) -> Response {
    if bearer(&headers) != Some("fresh") {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    error(StatusCode::NOT_FOUND, "DOCUMENT_NOT_FOUND")
}

async fn delete_all(Query(params): Query<HashMap<String, String>>) -> Response {
    if params.get("confirmation").map(String::as_str) != Some("CONFIRM") {
        return error(StatusCode::BAD_REQUEST, "CONFIRMATION_REQUIRED");
    }
    Json(json!({ "message": "deleted", "deleted": 4 })).into_response()
}

async fn always_unauthorized() -> StatusCode {
    StatusCode::UNAUTHORIZED
}

/// Start the fake API on an ephemeral port and return a client pointed at it.
pub async fn spawn(api: FakeApi) -> (ApiClient, Arc<FakeApi>) {
    let api = Arc::new(api);
    let router = Router::new()
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/documents/getDocuments", get(list_documents))
        .route("/documents/getDocument/{id}", get(get_document))
        .route("/documents/deleteAll", delete(delete_all))
        .route("/userData/getData", get(always_unauthorized))
        .with_state(Arc::clone(&api));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let client = ApiClient::new(&format!("http://{addr}")).unwrap();
    (client, api)
}

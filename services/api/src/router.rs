use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use docket_core::health::{healthz, readyz};
use docket_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    account::{login, logout, refresh, register},
    document::{
        add_document, delete_all_documents, delete_document, get_document, get_documents,
        update_document,
    },
    document_item::{
        add_item_to_document, delete_item, get_all_items, get_items_by_document, update_item,
    },
    user_data::{add_data, get_data, has_user_data, update_data},
};
use crate::middleware::record_activity;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        // Identity
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/logout", post(logout))
        // Documents
        .route("/documents/getDocuments", get(get_documents))
        .route("/documents/getDocument/{id}", get(get_document))
        .route("/documents/addDocument", post(add_document))
        .route("/documents/updateDocument/{id}", put(update_document))
        .route("/documents/deleteDocument/{id}", delete(delete_document))
        .route("/documents/deleteAll", delete(delete_all_documents))
        // Document items
        .route(
            "/documentItems/byDocument/{document_id}",
            get(get_items_by_document),
        )
        .route("/documentItems/allItems", get(get_all_items))
        .route(
            "/documentItems/addItemToDocument/{document_id}",
            post(add_item_to_document),
        )
        .route(
            "/documentItems/update/{document_id}/item/{ordinal}",
            put(update_item),
        )
        .route(
            "/documentItems/delete/{document_id}/item/{ordinal}",
            delete(delete_item),
        )
        // User data
        .route("/userData/getData", get(get_data))
        .route("/userData/addData", post(add_data))
        .route("/userData/hasUserData", post(has_user_data))
        .route("/userData/updateData", put(update_data));

    if state.track_activity {
        router = router.layer(from_fn_with_state(state.clone(), record_activity));
    }

    router
        // Health checks stay outside the activity middleware.
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz::<AppState>))
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(TraceLayer::new_for_http())
                .layer(propagate_request_id_layer()),
        )
        .with_state(state)
}

/// CORS for the SPA origin. Credentials are allowed so the refresh cookie travels.
pub fn cors_layer(origin: &str) -> anyhow::Result<CorsLayer> {
    let origin = HeaderValue::from_str(origin)?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .expose_headers([header::LOCATION]))
}

use std::sync::Arc;

use sea_orm::Database;
use tracing::info;

use docket_api::config::ApiConfig;
use docket_api::infra::seed::seed_if_empty;
use docket_api::router::{build_router, cors_layer};
use docket_api::state::AppState;
use docket_core::config::Config;
use docket_core::tracing::init_tracing;

#[tokio::main]
async fn main() {
    init_tracing("info");

    let config = ApiConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    if let (Some(documents), Some(items)) = (
        config.seed_documents_path.as_deref(),
        config.seed_document_items_path.as_deref(),
    ) {
        seed_if_empty(&db, documents, items)
            .await
            .expect("failed to seed database");
    }

    let state = AppState {
        db: Arc::new(db),
        jwt_secret: config.jwt_secret,
        cookie_domain: config.cookie_domain,
        track_activity: config.track_last_activity,
    };

    let cors = cors_layer(&config.cors_origin).expect("invalid CORS_ORIGIN");
    let router = build_router(state).layer(cors);

    let http_addr = format!("0.0.0.0:{}", config.api_port);
    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .expect("failed to bind");

    info!("api listening on {http_addr}");
    axum::serve(listener, router).await.expect("server error");
}

use std::path::PathBuf;

use serde::Deserialize;

use docket_core::config::Config;

/// API service configuration loaded from environment variables.
#[derive(Deserialize)]
pub struct ApiConfig {
    /// PostgreSQL connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// HS256 signing secret for access and refresh tokens. Env var: `JWT_SECRET`.
    pub jwt_secret: String,
    /// TCP port for the HTTP server (default 7197). Env var: `API_PORT`.
    #[serde(default = "default_api_port")]
    pub api_port: u16,
    /// Browser origin allowed by CORS. Env var: `CORS_ORIGIN`.
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
    /// Domain attribute for the refresh cookie; host-only when unset.
    #[serde(default)]
    pub cookie_domain: Option<String>,
    /// Stamp `last_active` on authenticated requests (default true).
    #[serde(default = "default_true")]
    pub track_last_activity: bool,
    #[serde(default)]
    pub seed_documents_path: Option<PathBuf>,
    #[serde(default)]
    pub seed_document_items_path: Option<PathBuf>,
}

impl Config for ApiConfig {}

fn default_api_port() -> u16 {
    7197
}

fn default_cors_origin() -> String {
    "https://localhost:5173".to_owned()
}

fn default_true() -> bool {
    true
}

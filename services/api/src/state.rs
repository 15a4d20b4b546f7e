use std::sync::Arc;

use sea_orm::DatabaseConnection;

use docket_auth_types::identity::JwtSecret;
use docket_core::health::ReadinessCheck;

use crate::infra::db::{
    DbAccountRepository, DbDocumentItemRepository, DbDocumentRepository, DbUserDataRepository,
};

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub jwt_secret: String,
    pub cookie_domain: Option<String>,
    /// Whether the activity-stamping middleware is installed.
    pub track_activity: bool,
}

impl AppState {
    pub fn document_repo(&self) -> DbDocumentRepository {
        DbDocumentRepository {
            db: Arc::clone(&self.db),
        }
    }

    pub fn document_item_repo(&self) -> DbDocumentItemRepository {
        DbDocumentItemRepository {
            db: Arc::clone(&self.db),
        }
    }

    pub fn user_data_repo(&self) -> DbUserDataRepository {
        DbUserDataRepository {
            db: Arc::clone(&self.db),
        }
    }

    pub fn account_repo(&self) -> DbAccountRepository {
        DbAccountRepository {
            db: Arc::clone(&self.db),
        }
    }
}

impl JwtSecret for AppState {
    fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }
}

impl ReadinessCheck for AppState {
    async fn ready(&self) -> bool {
        self.db.ping().await.is_ok()
    }
}

use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use validator::ValidationErrors;

/// API service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("document not found")]
    DocumentNotFound,
    #[error("document item not found")]
    DocumentItemNotFound,
    #[error("no items for document")]
    NoDocumentItems,
    #[error("no document items")]
    NoProducts,
    #[error("user data not found")]
    UserDataNotFound,
    #[error("document id mismatch")]
    DocumentIdMismatch,
    #[error("document item key mismatch")]
    ItemKeyMismatch,
    #[error("needs confirmation")]
    ConfirmationRequired,
    #[error("validation failed")]
    Validation(#[from] ValidationErrors),
    #[error("invalid request body: {0}")]
    InvalidBody(String),
    #[error("user data already exists")]
    UserDataExists,
    #[error("email already registered")]
    EmailTaken,
    #[error("unauthorized")]
    Unauthorized,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("invalid refresh token")]
    InvalidRefreshToken,
    #[error("user data missing")]
    UserDataMissing,
    #[error("write conflict")]
    WriteConflict,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DocumentNotFound => "DOCUMENT_NOT_FOUND",
            Self::DocumentItemNotFound => "DOCUMENT_ITEM_NOT_FOUND",
            Self::NoDocumentItems => "NO_DOCUMENT_ITEMS",
            Self::NoProducts => "NO_PRODUCTS",
            Self::UserDataNotFound => "USER_DATA_NOT_FOUND",
            Self::DocumentIdMismatch => "DOCUMENT_ID_MISMATCH",
            Self::ItemKeyMismatch => "ITEM_KEY_MISMATCH",
            Self::ConfirmationRequired => "CONFIRMATION_REQUIRED",
            Self::Validation(_) => "VALIDATION",
            Self::InvalidBody(_) => "INVALID_BODY",
            Self::UserDataExists => "USER_DATA_EXISTS",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidRefreshToken => "INVALID_REFRESH_TOKEN",
            Self::UserDataMissing => "USER_DATA_MISSING",
            Self::WriteConflict => "WRITE_CONFLICT",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::DocumentNotFound
            | Self::DocumentItemNotFound
            | Self::NoDocumentItems
            | Self::NoProducts
            | Self::UserDataNotFound => StatusCode::NOT_FOUND,
            Self::DocumentIdMismatch
            | Self::ItemKeyMismatch
            | Self::ConfirmationRequired
            | Self::Validation(_)
            | Self::InvalidBody(_)
            | Self::UserDataExists
            | Self::EmailTaken => StatusCode::BAD_REQUEST,
            Self::Unauthorized | Self::InvalidCredentials | Self::InvalidRefreshToken => {
                StatusCode::UNAUTHORIZED
            }
            Self::UserDataMissing | Self::WriteConflict | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Failed constraint codes per field, keyed by the JSON field name.
fn field_errors(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let codes = errs.iter().map(|e| e.code.to_string()).collect();
            (json_field_name(&field), codes)
        })
        .collect()
}

fn json_field_name(field: &str) -> String {
    // Document `kind` is serialized as `type`.
    if field == "kind" {
        return "type".to_owned();
    }
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::Internal(e) => {
                tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
            }
            Self::UserDataMissing | Self::WriteConflict => {
                tracing::error!(kind = self.kind(), "{self}");
            }
            _ => {}
        }
        let mut body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        if let Self::Validation(errors) = &self {
            body["fields"] = serde_json::json!(field_errors(errors));
        }
        (status, axum::Json(body)).into_response()
    }
}

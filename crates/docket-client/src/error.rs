use http::StatusCode;
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid url: {0}")]
    Url(String),
    #[error("encode body: {0}")]
    Encode(#[from] serde_json::Error),
    /// Non-success response carrying the API's `{ kind, message }` body.
    #[error("{status} {kind}: {message}")]
    Api {
        status: StatusCode,
        kind: String,
        message: String,
    },
    /// Refresh failed or the replay was rejected again. The session was cleared.
    #[error("session expired")]
    SessionExpired,
    #[error("not authenticated")]
    NotAuthenticated,
}

impl ClientError {
    /// API error kind, e.g. `DOCUMENT_NOT_FOUND`.
    pub fn kind(&self) -> Option<&str> {
        match self {
            Self::Api { kind, .. } => Some(kind),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::SessionExpired | Self::NotAuthenticated => Some(StatusCode::UNAUTHORIZED),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    kind: String,
    message: String,
}

/// Turn a non-success response into [`ClientError::Api`].
pub(crate) async fn api_error(response: reqwest::Response) -> ClientError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => ClientError::Api {
            status,
            kind: body.kind,
            message: body.message,
        },
        Err(_) => ClientError::Api {
            status,
            kind: String::new(),
            message: text,
        },
    }
}

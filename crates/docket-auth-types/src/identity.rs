//! Bearer-token identity extractor.

use axum::extract::FromRequestParts;
use http::request::Parts;
use http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use uuid::Uuid;

use crate::token::validate_access_token;

/// Application state that knows the JWT signing secret.
pub trait JwtSecret {
    fn jwt_secret(&self) -> &str;
}

/// Authenticated caller, taken from an `Authorization: Bearer <access token>` header.
///
/// Returns 401 if the header is absent, not a bearer credential, or the token
/// fails validation (bad signature, expired, refresh-typed, malformed).
#[derive(Debug, Clone)]
pub struct BearerIdentity {
    pub user_id: Uuid,
    pub access_token_exp: u64,
}

impl BearerIdentity {
    /// Resolve the caller from request headers, if a valid access token is present.
    pub fn from_headers(headers: &HeaderMap, secret: &str) -> Option<Self> {
        let token = bearer_token(headers)?;
        match validate_access_token(token, secret) {
            Ok(info) => Some(Self {
                user_id: info.user_id,
                access_token_exp: info.exp,
            }),
            Err(e) => {
                tracing::debug!(error = %e, "rejected bearer token");
                None
            }
        }
    }
}

/// Extract the raw token from an `Authorization: Bearer ...` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

impl<S> FromRequestParts<S> for BearerIdentity
where
    S: JwtSecret + Send + Sync,
{
    type Rejection = StatusCode;

    // Resolve synchronously so the returned future borrows neither `parts` nor `state`.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let identity = Self::from_headers(&parts.headers, state.jwt_secret());
        async move { identity.ok_or(StatusCode::UNAUTHORIZED) }
    }
}

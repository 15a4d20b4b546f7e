//! Mock auth helpers for integration tests.
//!
//! The API authenticates callers with `Authorization: Bearer <jwt>`. `MockAuth`
//! signs tokens with the test secret so requests pass the real extractor
//! without going through `/login`.

use std::time::{SystemTime, UNIX_EPOCH};

use docket_auth_types::token::{ACCESS_TOKEN_EXP, JwtClaims, REFRESH_TOKEN_EXP, TokenType};
use http::header::AUTHORIZATION;
use http::{HeaderMap, HeaderValue};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

/// Configurable identity injected into test requests.
pub struct MockAuth {
    pub user_id: Uuid,
    pub secret: String,
}

impl MockAuth {
    pub fn new(user_id: Uuid, secret: impl Into<String>) -> Self {
        Self {
            user_id,
            secret: secret.into(),
        }
    }

    fn sign(&self, typ: TokenType, exp: u64) -> String {
        let claims = JwtClaims {
            sub: self.user_id.to_string(),
            typ,
            exp,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .expect("sign test token")
    }

    /// A valid access token for this identity.
    pub fn access_token(&self) -> String {
        self.sign(TokenType::Access, now() + ACCESS_TOKEN_EXP)
    }

    /// A valid refresh token for this identity.
    pub fn refresh_token(&self) -> String {
        self.sign(TokenType::Refresh, now() + REFRESH_TOKEN_EXP)
    }

    /// An access token that expired an hour ago (outside the validation leeway).
    pub fn expired_access_token(&self) -> String {
        self.sign(TokenType::Access, now() - 3600)
    }

    /// `Authorization: Bearer ...` header value.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token())
    }

    /// Headers carrying a valid bearer token.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&self.bearer()).expect("bearer header"),
        );
        map
    }
}

fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

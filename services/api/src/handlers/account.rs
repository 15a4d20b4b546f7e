use axum::{Json, body::Bytes, extract::State, http::StatusCode};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use docket_auth_types::cookie::{
    clear_refresh_token_cookie, refresh_token_from_jar, set_refresh_token_cookie,
};
use docket_auth_types::identity::BearerIdentity;
use docket_auth_types::token::ACCESS_TOKEN_EXP;

use crate::error::ApiError;
use crate::extract::ValidatedJson;
use crate::state::AppState;
use crate::usecase::account::{
    Credentials, LoginUseCase, RefreshUseCase, RegisterUseCase, TokenPair,
};

#[derive(Debug, Deserialize, Validate)]
pub struct CredentialsRequest {
    #[validate(email)]
    #[serde(deserialize_with = "trimmed")]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
}

fn trimmed<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(String::deserialize(deserializer)?.trim().to_owned())
}

impl From<CredentialsRequest> for Credentials {
    fn from(req: CredentialsRequest) -> Self {
        Self {
            email: req.email,
            password: req.password,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token_type: String,
    pub access_token: String,
    /// Seconds until the access token expires.
    pub expires_in: u64,
    pub refresh_token: String,
}

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            token_type: "Bearer".to_owned(),
            access_token: pair.access_token,
            expires_in: ACCESS_TOKEN_EXP,
            refresh_token: pair.refresh_token,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

// ── POST /register ───────────────────────────────────────────────────────────

pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<CredentialsRequest>,
) -> Result<StatusCode, ApiError> {
    let usecase = RegisterUseCase {
        accounts: state.account_repo(),
    };
    usecase.execute(body.into()).await?;
    Ok(StatusCode::OK)
}

// ── POST /login ──────────────────────────────────────────────────────────────

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(body): ValidatedJson<CredentialsRequest>,
) -> Result<(CookieJar, Json<TokenResponse>), ApiError> {
    let usecase = LoginUseCase {
        accounts: state.account_repo(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let pair = usecase.execute(body.into()).await?;
    tracing::info!(user_id = %pair.user_id, "login");
    let jar = set_refresh_token_cookie(
        jar,
        pair.refresh_token.clone(),
        state.cookie_domain.clone(),
    );
    Ok((jar, Json(pair.into())))
}

// ── POST /refresh ────────────────────────────────────────────────────────────

/// The refresh token comes from the JSON body, falling back to the cookie.
/// An empty body is allowed.
pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Bytes,
) -> Result<(CookieJar, Json<TokenResponse>), ApiError> {
    let request: RefreshRequest = if body.iter().all(u8::is_ascii_whitespace) {
        RefreshRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| ApiError::InvalidBody(e.to_string()))?
    };
    let token = request
        .refresh_token
        .filter(|t| !t.is_empty())
        .or_else(|| refresh_token_from_jar(&jar))
        .ok_or(ApiError::InvalidRefreshToken)?;

    let usecase = RefreshUseCase {
        accounts: state.account_repo(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let pair = usecase.execute(&token).await?;
    let jar = set_refresh_token_cookie(
        jar,
        pair.refresh_token.clone(),
        state.cookie_domain.clone(),
    );
    Ok((jar, Json(pair.into())))
}

// ── POST /logout ─────────────────────────────────────────────────────────────

pub async fn logout(
    identity: BearerIdentity,
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, StatusCode) {
    tracing::info!(user_id = %identity.user_id, "logout");
    let jar = clear_refresh_token_cookie(jar, state.cookie_domain.clone());
    (jar, StatusCode::NO_CONTENT)
}

use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use docket_auth_types::token::{
    ACCESS_TOKEN_EXP, JwtClaims, REFRESH_TOKEN_EXP, TokenType, validate_refresh_token,
};

use crate::domain::repository::AccountRepository;
use crate::domain::types::Account;
use crate::error::ApiError;

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

fn sign(user_id: Uuid, typ: TokenType, exp: u64, secret: &str) -> Result<String, ApiError> {
    let claims = JwtClaims {
        sub: user_id.to_string(),
        typ,
        exp,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(e.into()))
}

/// Issue an access token. Returns the token and its expiry (epoch seconds).
pub fn issue_access_token(user_id: Uuid, secret: &str) -> Result<(String, u64), ApiError> {
    let exp = now_secs() + ACCESS_TOKEN_EXP;
    Ok((sign(user_id, TokenType::Access, exp, secret)?, exp))
}

pub fn issue_refresh_token(user_id: Uuid, secret: &str) -> Result<String, ApiError> {
    sign(
        user_id,
        TokenType::Refresh,
        now_secs() + REFRESH_TOKEN_EXP,
        secret,
    )
}

pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("password hashing failed: {e}")))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, ApiError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("invalid password hash: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Debug)]
pub struct TokenPair {
    pub user_id: Uuid,
    pub access_token: String,
    pub access_token_exp: u64,
    pub refresh_token: String,
}

fn issue_pair(user_id: Uuid, secret: &str) -> Result<TokenPair, ApiError> {
    let (access_token, access_token_exp) = issue_access_token(user_id, secret)?;
    let refresh_token = issue_refresh_token(user_id, secret)?;
    Ok(TokenPair {
        user_id,
        access_token,
        access_token_exp,
        refresh_token,
    })
}

// ── Register ─────────────────────────────────────────────────────────────────

pub struct Credentials {
    pub email: String,
    pub password: String,
}

pub struct RegisterUseCase<A: AccountRepository> {
    pub accounts: A,
}

impl<A: AccountRepository> RegisterUseCase<A> {
    pub async fn execute(&self, input: Credentials) -> Result<Uuid, ApiError> {
        let email = normalize_email(&input.email);
        if self.accounts.find_by_email(&email).await?.is_some() {
            return Err(ApiError::EmailTaken);
        }
        let account = Account {
            id: Uuid::now_v7(),
            email,
            password_hash: hash_password(&input.password)?,
            last_active: None,
            created_at: Utc::now(),
        };
        self.accounts.create(&account).await?;
        tracing::info!(user_id = %account.id, "account registered");
        Ok(account.id)
    }
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginUseCase<A: AccountRepository> {
    pub accounts: A,
    pub jwt_secret: String,
}

impl<A: AccountRepository> LoginUseCase<A> {
    pub async fn execute(&self, input: Credentials) -> Result<TokenPair, ApiError> {
        let account = self
            .accounts
            .find_by_email(&normalize_email(&input.email))
            .await?
            .ok_or(ApiError::InvalidCredentials)?;
        if !verify_password(&input.password, &account.password_hash)? {
            return Err(ApiError::InvalidCredentials);
        }
        issue_pair(account.id, &self.jwt_secret)
    }
}

// ── Refresh ──────────────────────────────────────────────────────────────────

pub struct RefreshUseCase<A: AccountRepository> {
    pub accounts: A,
    pub jwt_secret: String,
}

impl<A: AccountRepository> RefreshUseCase<A> {
    pub async fn execute(&self, refresh_token: &str) -> Result<TokenPair, ApiError> {
        let info = validate_refresh_token(refresh_token, &self.jwt_secret).map_err(|e| {
            tracing::debug!(error = %e, "refresh token rejected");
            ApiError::InvalidRefreshToken
        })?;
        if self.accounts.find_by_id(info.user_id).await?.is_none() {
            return Err(ApiError::InvalidRefreshToken);
        }
        issue_pair(info.user_id, &self.jwt_secret)
    }
}

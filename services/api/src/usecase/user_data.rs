use uuid::Uuid;

use crate::domain::repository::{AccountRepository, UserDataRepository};
use crate::domain::types::{UserData, UserDataFields};
use crate::error::ApiError;

// ── GetUserData ──────────────────────────────────────────────────────────────

pub struct GetUserDataUseCase<R: UserDataRepository> {
    pub repo: R,
}

impl<R: UserDataRepository> GetUserDataUseCase<R> {
    /// A caller without a profile is a server-side fault, not a 404.
    pub async fn execute(&self, user_id: Uuid) -> Result<UserData, ApiError> {
        self.repo
            .find_by_user(user_id)
            .await?
            .ok_or(ApiError::UserDataMissing)
    }
}

// ── AddUserData ──────────────────────────────────────────────────────────────

pub struct AddUserDataUseCase<U: UserDataRepository, A: AccountRepository> {
    pub user_data: U,
    pub accounts: A,
}

impl<U: UserDataRepository, A: AccountRepository> AddUserDataUseCase<U, A> {
    pub async fn execute(&self, user_id: Uuid, fields: UserDataFields) -> Result<UserData, ApiError> {
        if self.accounts.find_by_id(user_id).await?.is_none() {
            return Err(ApiError::Unauthorized);
        }
        if self.user_data.find_by_user(user_id).await?.is_some() {
            return Err(ApiError::UserDataExists);
        }
        let data = UserData {
            id: Uuid::now_v7(),
            first_name: fields.first_name,
            last_name: fields.last_name,
            city: fields.city,
            user_id: Some(user_id),
        };
        self.user_data.create(&data).await?;
        tracing::info!(%user_id, "user data created");
        Ok(data)
    }
}

// ── HasUserData ──────────────────────────────────────────────────────────────

pub struct HasUserDataUseCase<U: UserDataRepository, A: AccountRepository> {
    pub user_data: U,
    pub accounts: A,
}

impl<U: UserDataRepository, A: AccountRepository> HasUserDataUseCase<U, A> {
    /// An unknown account is [`ApiError::Unauthorized`].
    pub async fn execute(&self, user_id: Uuid) -> Result<bool, ApiError> {
        if self.accounts.find_by_id(user_id).await?.is_none() {
            return Err(ApiError::Unauthorized);
        }
        Ok(self.user_data.find_by_user(user_id).await?.is_some())
    }
}

// ── UpdateUserData ───────────────────────────────────────────────────────────

pub struct UpdateUserDataUseCase<R: UserDataRepository> {
    pub repo: R,
}

impl<R: UserDataRepository> UpdateUserDataUseCase<R> {
    pub async fn execute(&self, user_id: Uuid, fields: UserDataFields) -> Result<(), ApiError> {
        if !self.repo.update(user_id, &fields).await? {
            return Err(ApiError::UserDataNotFound);
        }
        Ok(())
    }
}

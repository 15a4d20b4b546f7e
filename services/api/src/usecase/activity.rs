use chrono::Utc;
use uuid::Uuid;

use docket_domain::role::Role;

use crate::domain::repository::AccountRepository;
use crate::error::ApiError;

// ── RecordActivity ───────────────────────────────────────────────────────────

pub struct RecordActivityUseCase<A: AccountRepository> {
    pub accounts: A,
}

impl<A: AccountRepository> RecordActivityUseCase<A> {
    /// Stamp the caller's last activity. The first stamp also grants [`Role::User`].
    ///
    /// An unknown user is logged and skipped.
    pub async fn execute(&self, user_id: Uuid) -> Result<(), ApiError> {
        let Some(account) = self.accounts.find_by_id(user_id).await? else {
            tracing::warn!(%user_id, "activity from unknown user");
            return Ok(());
        };
        if account.last_active.is_none() {
            let role_id = self.accounts.ensure_role(Role::User).await?;
            self.accounts.assign_role(user_id, role_id).await?;
            tracing::info!(%user_id, role = %Role::User, "first activity, role granted");
        }
        self.accounts.set_last_active(user_id, Utc::now()).await
    }
}

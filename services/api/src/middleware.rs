use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use docket_auth_types::identity::BearerIdentity;

use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::activity::RecordActivityUseCase;

/// Stamp `last_active` for requests carrying a valid access token.
///
/// Anonymous requests and invalid tokens pass through; the route's own
/// extractor decides whether they are allowed.
pub async fn record_activity(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(identity) = BearerIdentity::from_headers(request.headers(), &state.jwt_secret) {
        let usecase = RecordActivityUseCase {
            accounts: state.account_repo(),
        };
        usecase.execute(identity.user_id).await?;
    }
    Ok(next.run(request).await)
}

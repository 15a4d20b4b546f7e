use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use docket_auth_types::identity::BearerIdentity;

use crate::domain::types::{UserData, UserDataFields};
use crate::error::ApiError;
use crate::extract::ValidatedJson;
use crate::state::AppState;
use crate::usecase::user_data::{
    AddUserDataUseCase, GetUserDataUseCase, HasUserDataUseCase, UpdateUserDataUseCase,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDataResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub city: String,
    pub user_id: Option<Uuid>,
}

impl From<UserData> for UserDataResponse {
    fn from(d: UserData) -> Self {
        Self {
            id: d.id,
            first_name: d.first_name,
            last_name: d.last_name,
            city: d.city,
            user_id: d.user_id,
        }
    }
}

/// Profile fields. Any `id` or `userId` in the body is ignored.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserDataRequest {
    #[validate(length(min = 1, max = 30))]
    pub first_name: String,
    #[validate(length(min = 1, max = 30))]
    pub last_name: String,
    #[validate(length(min = 1, max = 100))]
    pub city: String,
}

impl From<UserDataRequest> for UserDataFields {
    fn from(req: UserDataRequest) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            city: req.city,
        }
    }
}

// ── GET /userData/getData ────────────────────────────────────────────────────

pub async fn get_data(
    identity: BearerIdentity,
    State(state): State<AppState>,
) -> Result<Json<UserDataResponse>, ApiError> {
    let usecase = GetUserDataUseCase {
        repo: state.user_data_repo(),
    };
    let data = usecase.execute(identity.user_id).await?;
    Ok(Json(data.into()))
}

// ── POST /userData/addData ───────────────────────────────────────────────────

pub async fn add_data(
    identity: BearerIdentity,
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<UserDataRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = AddUserDataUseCase {
        user_data: state.user_data_repo(),
        accounts: state.account_repo(),
    };
    let data = usecase.execute(identity.user_id, body.into()).await?;
    Ok((StatusCode::CREATED, Json(UserDataResponse::from(data))))
}

// ── POST /userData/hasUserData ───────────────────────────────────────────────

pub async fn has_user_data(
    identity: BearerIdentity,
    State(state): State<AppState>,
) -> Result<Json<bool>, ApiError> {
    let usecase = HasUserDataUseCase {
        user_data: state.user_data_repo(),
        accounts: state.account_repo(),
    };
    Ok(Json(usecase.execute(identity.user_id).await?))
}

// ── PUT /userData/updateData ─────────────────────────────────────────────────

pub async fn update_data(
    identity: BearerIdentity,
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<UserDataRequest>,
) -> Result<StatusCode, ApiError> {
    let usecase = UpdateUserDataUseCase {
        repo: state.user_data_repo(),
    };
    usecase.execute(identity.user_id, body.into()).await?;
    Ok(StatusCode::NO_CONTENT)
}

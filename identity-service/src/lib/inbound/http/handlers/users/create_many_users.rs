use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::user::models::NewUserInput;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateManyUsersRequest {
    pub users: Vec<NewUserInput>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CreateManyUsersResponseData {
    pub inserted_count: u64,
}

pub async fn create_many_users(
    State(state): State<AppState>,
    Json(body): Json<CreateManyUsersRequest>,
) -> Result<ApiSuccess<CreateManyUsersResponseData>, ApiError> {
    state
        .user_service
        .create_many(body.users)
        .await
        .map_err(ApiError::from)
        .map(|inserted_count| {
            ApiSuccess::new(
                StatusCode::CREATED,
                CreateManyUsersResponseData { inserted_count },
            )
        })
}

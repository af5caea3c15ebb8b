use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::UserData;
use crate::inbound::http::router::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserListResponseData {
    pub count: usize,
    pub users: Vec<UserData>,
}

/// Every user, newest first.
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<ApiSuccess<UserListResponseData>, ApiError> {
    let users = state
        .user_service
        .find_all()
        .await
        .map_err(ApiError::from)?;

    let users: Vec<UserData> = users.iter().map(UserData::from).collect();

    Ok(ApiSuccess::new(
        StatusCode::OK,
        UserListResponseData {
            count: users.len(),
            users,
        },
    ))
}

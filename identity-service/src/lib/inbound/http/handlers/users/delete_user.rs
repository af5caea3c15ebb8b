use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeleteResponseData {
    pub deleted_count: u64,
}

/// Deleting a missing user is success with a count of zero, not an error.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiSuccess<DeleteResponseData>, ApiError> {
    state
        .user_service
        .delete_one(&id)
        .await
        .map_err(ApiError::from)
        .map(|deleted_count| {
            ApiSuccess::new(StatusCode::OK, DeleteResponseData { deleted_count })
        })
}

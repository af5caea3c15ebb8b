use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::domain::user::models::UserFilter;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeleteManyResponseData {
    pub deleted_count: u64,
}

/// Deletes everything the filter matches; an omitted body means an empty
/// filter, which matches the whole collection.
pub async fn delete_many_users(
    State(state): State<AppState>,
    body: Option<Json<UserFilter>>,
) -> Result<ApiSuccess<DeleteManyResponseData>, ApiError> {
    let filter = body.map(|Json(filter)| filter).unwrap_or_default();

    state
        .user_service
        .delete_many(filter)
        .await
        .map_err(ApiError::from)
        .map(|deleted_count| {
            ApiSuccess::new(StatusCode::OK, DeleteManyResponseData { deleted_count })
        })
}

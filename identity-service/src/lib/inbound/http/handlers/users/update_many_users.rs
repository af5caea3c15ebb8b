use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::UpdateReportData;
use crate::domain::user::models::UpdateUserPayload;
use crate::domain::user::models::UserFilter;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;

/// Both halves stay optional here; the domain rejects an absent filter or
/// update as invalid input.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateManyUsersRequest {
    pub filter: Option<UserFilter>,
    pub update: Option<UpdateUserPayload>,
}

pub async fn update_many_users(
    State(state): State<AppState>,
    Json(body): Json<UpdateManyUsersRequest>,
) -> Result<ApiSuccess<UpdateReportData>, ApiError> {
    state
        .user_service
        .update_many(body.filter, body.update)
        .await
        .map_err(ApiError::from)
        .map(|report| ApiSuccess::new(StatusCode::OK, report.into()))
}

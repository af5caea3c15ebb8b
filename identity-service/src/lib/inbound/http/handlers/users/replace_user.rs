use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::UpdateReportData;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReplaceUserRequest {
    pub email: String,
    pub password: String,
}

/// Full replacement: the record's content is rebuilt from a fresh
/// normalized email and hash, keeping the identifier.
pub async fn replace_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ReplaceUserRequest>,
) -> Result<ApiSuccess<UpdateReportData>, ApiError> {
    state
        .user_service
        .replace_one(&id, &body.email, &body.password)
        .await
        .map_err(ApiError::from)
        .map(|report| ApiSuccess::new(StatusCode::OK, report.into()))
}

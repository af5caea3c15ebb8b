use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use super::UpdateReportData;
use crate::domain::user::models::UpdateUserPayload;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::router::AppState;

/// Partial update of one user. Whatever the payload claims for id, hash,
/// or timestamps is discarded before the write; matched/modified of zero
/// is a normal answer.
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateUserPayload>,
) -> Result<ApiSuccess<UpdateReportData>, ApiError> {
    state
        .user_service
        .update_one(&id, payload)
        .await
        .map_err(ApiError::from)
        .map(|report| ApiSuccess::new(StatusCode::OK, report.into()))
}

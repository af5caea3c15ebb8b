use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::UserData;
use crate::inbound::http::router::AppState;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CursorPageQuery {
    pub page_size: Option<i64>,
    pub after: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CursorPageResponseData {
    pub count: usize,
    pub next_cursor: Option<String>,
    pub users: Vec<UserData>,
}

/// Keyset pagination: ascending id, `after` being the last id of the
/// previous page. `next_cursor` is null exactly on the final page.
pub async fn list_users_page(
    State(state): State<AppState>,
    Query(query): Query<CursorPageQuery>,
) -> Result<ApiSuccess<CursorPageResponseData>, ApiError> {
    let page = state
        .user_service
        .find_by_cursor(query.page_size, query.after.as_deref())
        .await
        .map_err(ApiError::from)?;

    let users: Vec<UserData> = page.items.iter().map(UserData::from).collect();

    Ok(ApiSuccess::new(
        StatusCode::OK,
        CursorPageResponseData {
            count: users.len(),
            next_cursor: page.next_cursor.map(|id| id.to_string()),
            users,
        },
    ))
}

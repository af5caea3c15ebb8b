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
pub struct SearchUsersQuery {
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchUsersResponseData {
    pub count: usize,
    pub users: Vec<UserData>,
}

/// Exact-match lookup on the normalized email, or everything without one.
pub async fn search_users(
    State(state): State<AppState>,
    Query(query): Query<SearchUsersQuery>,
) -> Result<ApiSuccess<SearchUsersResponseData>, ApiError> {
    let users = state
        .user_service
        .find_by_query(query.email.as_deref())
        .await
        .map_err(ApiError::from)?;

    let users: Vec<UserData> = users.iter().map(UserData::from).collect();

    Ok(ApiSuccess::new(
        StatusCode::OK,
        SearchUsersResponseData {
            count: users.len(),
            users,
        },
    ))
}

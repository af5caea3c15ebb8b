use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;

use crate::domain::auth::models::Identity;
use crate::domain::auth::ports::AuthServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::UserData;
use crate::inbound::http::router::AppState;
use crate::inbound::http::router::SESSION_COOKIE;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityResponseData {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserData>,
}

/// Who the presented session belongs to. An absent or dead session is a
/// normal anonymous answer, never a failure.
pub async fn current_identity(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<ApiSuccess<IdentityResponseData>, ApiError> {
    let session_id = jar.get(SESSION_COOKIE).map(|c| c.value().to_string());

    let identity = state
        .auth_service
        .current_identity(session_id.as_deref())
        .await
        .map_err(ApiError::from)?;

    let data = match identity {
        Identity::Authenticated(user) => IdentityResponseData {
            authenticated: true,
            user: Some((&user).into()),
        },
        Identity::Anonymous => IdentityResponseData {
            authenticated: false,
            user: None,
        },
    };

    Ok(ApiSuccess::new(StatusCode::OK, data))
}

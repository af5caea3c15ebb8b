use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde::Serialize;

use super::session_cookie;
use crate::domain::auth::ports::AuthServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::UserData;
use crate::inbound::http::router::AppState;

/// HTTP request body for registration (raw JSON).
///
/// Fields default to empty; emptiness is rejected by the domain as invalid
/// input rather than by the deserializer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequestBody {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterResponseData {
    pub user: UserData,
}

/// A successful registration leaves the caller authenticated: the fresh
/// session identifier rides back on the cookie jar.
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<RegisterRequestBody>,
) -> Result<(CookieJar, ApiSuccess<RegisterResponseData>), ApiError> {
    let session = state
        .auth_service
        .register(&body.email, &body.password)
        .await
        .map_err(ApiError::from)?;

    let jar = jar.add(session_cookie(
        session.session_id.as_str().to_string(),
        state.session_ttl,
    ));

    Ok((
        jar,
        ApiSuccess::new(
            StatusCode::CREATED,
            RegisterResponseData {
                user: (&session.user).into(),
            },
        ),
    ))
}

use axum::extract::Request;
use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;

use crate::domain::auth::models::Identity;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::user::models::UserId;
use crate::inbound::http::router::AppState;
use crate::inbound::http::router::SESSION_COOKIE;

/// Extension type carrying the resolved identity into protected handlers.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub email: String,
}

/// Middleware gating the admin routes on a live session.
///
/// The session identifier travels in the `sid` cookie; anything that does
/// not resolve to a live user is rejected without saying why.
pub async fn authenticate_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let jar = CookieJar::from_headers(req.headers());
    let session_id = jar.get(SESSION_COOKIE).map(|c| c.value().to_string());

    let identity = state
        .auth_service
        .current_identity(session_id.as_deref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Session resolution failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Session resolution failed"
                })),
            )
                .into_response()
        })?;

    match identity {
        Identity::Authenticated(user) => {
            req.extensions_mut().insert(AuthenticatedUser {
                user_id: user.id,
                email: user.email,
            });
            Ok(next.run(req).await)
        }
        Identity::Anonymous => {
            tracing::warn!("Rejected unauthenticated request to protected route");
            Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "Authentication required"
                })),
            )
                .into_response())
        }
    }
}

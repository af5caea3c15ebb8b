use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::patch;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::auth::current_identity::current_identity;
use super::handlers::auth::login::login;
use super::handlers::auth::logout::logout;
use super::handlers::auth::register::register;
use super::handlers::users::create_many_users::create_many_users;
use super::handlers::users::create_user::create_user;
use super::handlers::users::delete_many_users::delete_many_users;
use super::handlers::users::delete_user::delete_user;
use super::handlers::users::list_users::list_users;
use super::handlers::users::list_users_page::list_users_page;
use super::handlers::users::replace_user::replace_user;
use super::handlers::users::search_users::search_users;
use super::handlers::users::update_many_users::update_many_users;
use super::handlers::users::update_user::update_user;
use super::handlers::users::user_stats::user_stats;
use super::middleware::authenticate_session;
use crate::domain::auth::service::AuthService;
use crate::domain::user::service::UserService;
use crate::outbound::repositories::user::PostgresUserRepository;
use crate::outbound::sessions::memory::InMemorySessionStore;

/// Name of the cookie carrying the opaque session identifier.
pub const SESSION_COOKIE: &str = "sid";

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService<PostgresUserRepository>>,
    pub auth_service: Arc<AuthService<PostgresUserRepository, InMemorySessionStore>>,
    pub session_ttl: Duration,
}

pub fn create_router(
    user_service: Arc<UserService<PostgresUserRepository>>,
    auth_service: Arc<AuthService<PostgresUserRepository, InMemorySessionStore>>,
    session_ttl: Duration,
) -> Router {
    let state = AppState {
        user_service,
        auth_service,
        session_ttl,
    };

    let public_routes = Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/me", get(current_identity));

    let protected_routes = Router::new()
        .route("/users", get(list_users))
        .route("/users/search", get(search_users))
        .route("/users/cursor", get(list_users_page))
        .route("/users/stats", get(user_stats))
        .route("/users/one", post(create_user))
        .route("/users/many", post(create_many_users))
        .route("/users/one/:id", patch(update_user))
        .route("/users/many", patch(update_many_users))
        .route("/users/replace/:id", put(replace_user))
        .route("/users/one/:id", delete(delete_user))
        .route("/users/many", delete(delete_many_users))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            authenticate_session,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

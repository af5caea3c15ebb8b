use std::time::Duration;

use axum_extra::extract::cookie::Cookie;
use axum_extra::extract::cookie::SameSite;

use crate::inbound::http::router::SESSION_COOKIE;

pub mod current_identity;
pub mod login;
pub mod logout;
pub mod register;

pub use current_identity::current_identity;
pub use login::login;
pub use logout::logout;
pub use register::register;

/// Session cookie as handed to the client: HTTP-only, same-site restricted,
/// fixed max age equal to the session TTL.
pub(crate) fn session_cookie(session_id: String, ttl: Duration) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, session_id);
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_path("/");
    cookie.set_max_age(time::Duration::seconds(ttl.as_secs() as i64));
    cookie
}

/// Expired-cookie counterpart used on logout; attributes must match the
/// cookie being cleared.
pub(crate) fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::from(SESSION_COOKIE);
    cookie.set_path("/");
    cookie
}

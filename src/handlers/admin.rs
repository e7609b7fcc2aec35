use axum::{Json, extract::State, response::IntoResponse};
use axum_extra::extract::cookie::{Cookie, PrivateCookieJar, SameSite};
use serde::Deserialize;
use serde_json::{Value, json};
use time::Duration;
use tracing::info;

use crate::error::CafeError;
use crate::middleware::auth::{SESSION_COOKIE, SESSION_MARKER, verify_credentials};
use crate::middleware::validation::{Shaped, ValidatedJson, as_object, require_string};
use crate::router::CafeState;

const SESSION_MAX_AGE: Duration = Duration::hours(12);

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub username: String,
    pub password: String,
}

impl Shaped for LoginPayload {
    fn check_shape(value: &Value) -> Result<(), CafeError> {
        let obj = as_object(value)?;
        require_string(obj, "username")?;
        require_string(obj, "password")
    }
}

/// POST /api/login -> establishes an encrypted admin session cookie.
pub async fn login(
    State(state): State<CafeState>,
    jar: PrivateCookieJar,
    ValidatedJson(payload): ValidatedJson<LoginPayload>,
) -> Result<impl IntoResponse, CafeError> {
    verify_credentials(&payload.username, &payload.password, &state.config)?;

    let jar = jar.add(build_session_cookie());
    info!("admin session established");
    Ok((jar, Json(json!({ "ok": true }))))
}

/// POST /api/logout -> clears the session cookie; fine to call when none
/// is present.
pub async fn logout(jar: PrivateCookieJar) -> impl IntoResponse {
    let jar = jar.remove(clear_session_cookie());
    (jar, Json(json!({ "ok": true })))
}

fn build_session_cookie() -> Cookie<'static> {
    Cookie::build(Cookie::new(SESSION_COOKIE, SESSION_MARKER))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(SESSION_MAX_AGE)
        .build()
}

fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build(Cookie::new(SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

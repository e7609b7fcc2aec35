use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Key, PrivateCookieJar};
use subtle::ConstantTimeEq;

use crate::config::Config;
use crate::error::CafeError;
use crate::router::CafeState;

pub const SESSION_COOKIE: &str = "cafe_session";
pub const SESSION_MARKER: &str = "admin";

/// Compare a submitted admin credential against the configured pair.
/// Constant-time on both fields; fails with `Configuration` when no
/// credential pair was configured at all.
pub fn verify_credentials(
    username: &str,
    password: &str,
    config: &Config,
) -> Result<(), CafeError> {
    let (Some(expected_user), Some(expected_pass)) = (
        config.admin_username.as_deref(),
        config.admin_password.as_deref(),
    ) else {
        return Err(CafeError::Configuration(
            "admin credentials are not configured".to_string(),
        ));
    };

    let user_ok = username.as_bytes().ct_eq(expected_user.as_bytes());
    let pass_ok = password.as_bytes().ct_eq(expected_pass.as_bytes());
    if bool::from(user_ok & pass_ok) {
        Ok(())
    } else {
        Err(CafeError::Unauthorized)
    }
}

/// Gate for management routes: requires the encrypted session cookie set
/// by a successful login.
#[derive(Debug, Clone, Copy)]
pub struct RequireAdmin;

impl FromRequestParts<CafeState> for RequireAdmin {
    type Rejection = CafeError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &CafeState,
    ) -> Result<Self, Self::Rejection> {
        let jar = match PrivateCookieJar::<Key>::from_request_parts(parts, state).await {
            Ok(jar) => jar,
            Err(err) => match err {},
        };
        match jar.get(SESSION_COOKIE) {
            Some(cookie) if cookie.value() == SESSION_MARKER => Ok(Self),
            _ => Err(CafeError::Unauthorized),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> Config {
        Config {
            admin_username: Some("owner".to_string()),
            admin_password: Some("espresso".to_string()),
            ..Config::default()
        }
    }

    #[test]
    fn accepts_matching_pair() {
        assert!(verify_credentials("owner", "espresso", &configured()).is_ok());
    }

    #[test]
    fn rejects_wrong_password() {
        assert!(matches!(
            verify_credentials("owner", "latte", &configured()),
            Err(CafeError::Unauthorized)
        ));
    }

    #[test]
    fn rejects_wrong_username() {
        assert!(matches!(
            verify_credentials("guest", "espresso", &configured()),
            Err(CafeError::Unauthorized)
        ));
    }

    #[test]
    fn unconfigured_credentials_are_a_configuration_error() {
        assert!(matches!(
            verify_credentials("owner", "espresso", &Config::default()),
            Err(CafeError::Configuration(_))
        ));
    }
}

//! # Acceso
//!
//! `acceso` is a terminal client for the portal's authentication and
//! profile API. It keeps the signed-in session on disk between
//! invocations and routes every backend call through a gateway that
//! attaches the access credential and transparently renews it once when
//! the backend reports it expired.
//!
//! ## Session model
//!
//! The backend issues a short-lived access token plus a longer-lived
//! refresh token on login and registration. Both are held together with
//! the cached profile: a session either has both credentials or it does
//! not exist. A persisted profile without credentials is treated as
//! signed out and healed away on startup.
//!
//! ## Renewal policy
//!
//! A 401 on a non-authentication route triggers exactly one refresh
//! round-trip and one redispatch of the original call. If the refresh
//! token is rejected the session is destroyed and the original 401 is
//! surfaced. There is no backoff and no second retry; the user can
//! re-run the command.

pub mod api;
pub mod cli;
pub mod gateway;
pub mod session;

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}

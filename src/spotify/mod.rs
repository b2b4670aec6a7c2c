//! # Spotify Integration Module
//!
//! Everything that talks to Spotify goes through here.
//!
//! ## Layout
//!
//! ```text
//! cli::* (commands)
//!      ↓
//! player / library / playlist / album / user   (one function per endpoint)
//!      ↓
//! Session   (bearer auth, status mapping, refresh-on-401)
//!      ↓
//! reqwest
//! ```
//!
//! [`auth`] is the exception: the authorize URL and the token endpoint are
//! used before a [`Session`] can exist, so they take the HTTP client and
//! credentials directly.
//!
//! ## Token rotation
//!
//! A [`Session`] is built once per invocation from the application
//! credentials and the user's tokens. When a call comes back `401`, the
//! session exchanges the refresh token for a new access token, hands it to
//! its [`TokenRefreshHandler`] (which persists it) and retries the call once.
//! Commands never see expired tokens.

use std::time::Duration;

use reqwest::Client;

use crate::Res;

pub mod album;
pub mod auth;
pub mod library;
pub mod player;
pub mod playlist;
mod session;
pub mod user;

pub use session::{Session, TokenRefreshHandler};

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Builds the HTTP client shared by the session and the callback listener.
pub fn http_client() -> Res<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

//! Configuration for shellify.
//!
//! Everything lives under one per-user config directory (by default
//! `$HOME/.config/shellify`):
//!
//! - `config.json` - Spotify application credentials (see [`crate::management::ConfigStore`])
//! - `spotify_user.json` - the authenticated user (see [`crate::management::CredentialStore`])
//! - `.env` - optional environment overrides, loaded by [`load_env`]
//!
//! Environment variables take precedence over `.env` values, which take
//! precedence over the built-in Spotify defaults.

use std::{
    env,
    path::{Path, PathBuf},
    time::Duration,
};

use reqwest::Url;

use crate::{Error, Res};

/// Application name used for the config directory
pub const APP_NAME: &str = "shellify";

/// File holding the application client id/secret
pub const CONFIG_FILE: &str = "config.json";

/// File holding the authenticated user and tokens
pub const USER_FILE: &str = "spotify_user.json";

/// Interface the OAuth callback listener binds to. The port comes from the
/// redirect URI, see [`Endpoints::callback_address`].
pub const CALLBACK_HOST: &str = "127.0.0.1";

pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:8888/callback";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";

/// Seconds to wait for the browser to hit the callback before giving up.
pub const DEFAULT_CALLBACK_TIMEOUT_SECS: u64 = 300;

/// Every permission shellify asks for during `authenticate`.
pub const SPOTIFY_AUTHORIZATION_SCOPES: &[&str] = &[
    "user-read-playback-state",
    "user-modify-playback-state",
    "user-read-currently-playing",
    "user-library-modify",
    "user-library-read",
    "playlist-modify-private",
    "playlist-read-collaborative",
    "playlist-read-private",
    "playlist-modify-public",
];

/// Space separated scope string as sent to the authorize and token endpoints.
pub fn spotify_scope() -> String {
    SPOTIFY_AUTHORIZATION_SCOPES.join(" ")
}

/// Returns the directory holding all shellify files.
///
/// `SHELLIFY_CONFIG_DIR` wins when set; otherwise `$HOME/.config/shellify`,
/// falling back to the current directory when no home directory is known.
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = env::var("SHELLIFY_CONFIG_DIR") {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }

    let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(".config");
    path.push(APP_NAME);
    path
}

/// Loads environment overrides from `<config_dir>/.env` when the file exists.
///
/// A missing file is not an error; a malformed one is.
pub async fn load_env(config_dir: &Path) -> Result<(), String> {
    let path = config_dir.join(".env");
    if !path.is_file() {
        return Ok(());
    }

    dotenv::from_path(&path).map_err(|e| format!("{}: {}", path.display(), e))
}

/// How long the callback listener waits for the browser redirect.
///
/// Reads `SHELLIFY_CALLBACK_TIMEOUT` (seconds); unparsable values fall back to
/// [`DEFAULT_CALLBACK_TIMEOUT_SECS`].
pub fn callback_timeout() -> Duration {
    let secs = env::var("SHELLIFY_CALLBACK_TIMEOUT")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_CALLBACK_TIMEOUT_SECS);
    Duration::from_secs(secs)
}

/// Remote endpoints used by the session and the callback listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    pub redirect_uri: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            auth_url: DEFAULT_AUTH_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
        }
    }
}

impl Endpoints {
    /// Spotify defaults with `SHELLIFY_AUTH_URL`, `SHELLIFY_TOKEN_URL`,
    /// `SHELLIFY_API_URL` and `SHELLIFY_REDIRECT_URI` applied on top.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            auth_url: env_or("SHELLIFY_AUTH_URL", defaults.auth_url),
            token_url: env_or("SHELLIFY_TOKEN_URL", defaults.token_url),
            api_url: env_or("SHELLIFY_API_URL", defaults.api_url),
            redirect_uri: env_or("SHELLIFY_REDIRECT_URI", defaults.redirect_uri),
        }
    }

    /// Endpoints pointing every remote call at `base`, used by tests that
    /// stand up a local stub server.
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            auth_url: format!("{base}/authorize"),
            token_url: format!("{base}/api/token"),
            api_url: format!("{base}/v1"),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
        }
    }

    /// Local address the callback listener binds to: [`CALLBACK_HOST`] on the
    /// port of `redirect_uri`, so an overridden redirect URI is still served.
    pub fn callback_address(&self) -> Res<String> {
        let url = Url::parse(&self.redirect_uri)
            .map_err(|e| Error::InvalidUrl(format!("{}: {}", self.redirect_uri, e)))?;
        let port = url
            .port_or_known_default()
            .ok_or_else(|| Error::InvalidUrl(format!("{} has no port", self.redirect_uri)))?;
        Ok(format!("{CALLBACK_HOST}:{port}"))
    }
}

fn env_or(key: &str, default: String) -> String {
    match env::var(key) {
        Ok(v) if !v.trim().is_empty() => v.trim_end_matches('/').to_string(),
        _ => default,
    }
}

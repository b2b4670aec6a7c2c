//! # CLI Module
//!
//! One function per shellify command. Each returns [`crate::Res`]; `main`
//! reports errors and sets the exit code.
//!
//! ## Command Categories
//!
//! ### Setup
//! - [`configure`] - store the Spotify client id and secret
//! - [`authenticate`] - run the OAuth flow and store the user's tokens
//!
//! ### Playback
//! - [`playing`], [`play`], [`next`], [`previous`], [`restart`], [`seek`],
//!   [`volume`], [`devices`], [`queue`]
//!
//! ### Library
//! - [`like`], [`unlike`], [`playlists`], [`add`], [`remove`]
//!
//! ## Early exits
//!
//! Predictable conditions are checked before any mutating call. "Nothing
//! playing" and "Playlist not found" just print and return; policy
//! restrictions (local tracks, playlists owned by someone else) go through
//! [`crate::notice!`] and exit with code 0.

use std::path::Path;

use crate::{
    Error, Res,
    config::Endpoints,
    management::{ConfigStore, CredentialStore},
    spotify::{self, Session},
};

mod auth;
mod configure;
mod library;
mod player;
mod playlist;

pub use auth::authenticate;
pub use configure::configure;
pub use library::{like, unlike};
pub use player::{devices, next, play, playing, previous, queue, restart, seek, volume};
pub use playlist::{add, playlists, remove};

/// The session every playback and library command runs against.
pub type SpotifySession = Session<CredentialStore>;

pub(crate) const LOCAL_TRACK_MESSAGE: &str = "Shellify can't perform this action for local tracks";
pub(crate) const NOT_OWNER_MESSAGE: &str =
    "Shellify can't perform this action for collaborative playlists you don't own";

/// Builds the API session, failing fast when configuration or
/// authentication is missing.
pub async fn connect(config: &ConfigStore, config_dir: &Path) -> Res<SpotifySession> {
    if !config.is_configured() {
        return Err(Error::NotConfigured);
    }

    let store = CredentialStore::load(config_dir).await?;
    if !store.is_authenticated() {
        return Err(Error::NotAuthenticated);
    }

    let user = store.user().clone();
    Ok(Session::new(
        spotify::http_client()?,
        Endpoints::from_env(),
        config.credentials().clone(),
        &user,
        store,
    ))
}

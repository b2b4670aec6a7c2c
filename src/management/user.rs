use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{
    Res,
    config::USER_FILE,
    spotify::TokenRefreshHandler,
    types::{OAuthTokens, UserSession},
};

use super::files;

/// Owns `spotify_user.json`, the authenticated user and their tokens.
///
/// Handed to [`crate::spotify::Session`] as its refresh handler, so a rotated
/// access token is on disk before the request that triggered the refresh is
/// retried.
pub struct CredentialStore {
    path: PathBuf,
    user: UserSession,
}

impl CredentialStore {
    /// Loads `<config_dir>/spotify_user.json`, creating it with empty values
    /// first if it does not exist yet.
    pub async fn load(config_dir: &Path) -> Res<Self> {
        let path = config_dir.join(USER_FILE);
        files::ensure_file::<UserSession>(&path).await?;
        let user = files::read_json(&path).await?;

        Ok(Self { path, user })
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_authenticated()
    }

    pub async fn save(&self) -> Res<()> {
        files::write_json(&self.path, &self.user).await
    }

    /// Stores freshly exchanged tokens. Only `authenticate` calls this; it
    /// does not save.
    pub fn set_tokens(&mut self, tokens: OAuthTokens) {
        self.user.access_token = tokens.access_token;
        self.user.refresh_token = tokens.refresh_token;
    }

    pub fn set_user_id(&mut self, id: &str) {
        self.user.id = id.to_string();
    }

    pub fn user(&self) -> &UserSession {
        &self.user
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenRefreshHandler for CredentialStore {
    async fn on_token_refreshed(&mut self, access_token: &str) -> Res<()> {
        debug!(path = %self.path.display(), "persisting refreshed access token");
        self.user.access_token = access_token.to_string();
        self.save().await
    }
}

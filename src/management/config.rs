use std::path::{Path, PathBuf};

use crate::{Res, config::CONFIG_FILE, types::AppCredentials};

use super::files;

/// Owns `config.json`, the Spotify application credentials.
pub struct ConfigStore {
    path: PathBuf,
    credentials: AppCredentials,
}

impl ConfigStore {
    /// Loads `<config_dir>/config.json`, creating it with empty values first
    /// if it does not exist yet.
    pub async fn load(config_dir: &Path) -> Res<Self> {
        let path = config_dir.join(CONFIG_FILE);
        files::ensure_file::<AppCredentials>(&path).await?;
        let credentials = files::read_json(&path).await?;

        Ok(Self { path, credentials })
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.is_configured()
    }

    /// Replaces both credentials and rewrites the file.
    pub async fn save(&mut self, client_id: &str, client_secret: &str) -> Res<()> {
        self.credentials = AppCredentials {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
        };
        files::write_json(&self.path, &self.credentials).await
    }

    pub fn credentials(&self) -> &AppCredentials {
        &self.credentials
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

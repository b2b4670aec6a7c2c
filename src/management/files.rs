//! JSON file helpers shared by the config and credential stores.
//!
//! Both stores keep a single pretty-printed JSON object on disk, create it
//! with empty values on first use and rewrite it completely on every save.
//! There is no locking: concurrent shellify processes race and the last
//! writer wins.

use std::path::Path;

use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::Res;

/// Creates `path` holding `T::default()` unless something is already there.
///
/// Existing files are never touched, so calling this repeatedly is safe.
pub async fn ensure_file<T: Serialize + Default>(path: &Path) -> Res<()> {
    if path.exists() {
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    debug!(path = %path.display(), "creating empty file");
    write_json(path, &T::default()).await
}

/// Reads `path` as JSON. Blank files yield `T::default()`.
pub async fn read_json<T: DeserializeOwned + Default>(path: &Path) -> Res<T> {
    let content = async_fs::read_to_string(path).await?;
    if content.trim().is_empty() {
        return Ok(T::default());
    }

    Ok(serde_json::from_str(&content)?)
}

/// Overwrites `path` with the pretty-printed JSON of `value`.
pub async fn write_json<T: Serialize>(path: &Path, value: &T) -> Res<()> {
    let json = serde_json::to_string_pretty(value)?;
    async_fs::write(path, json).await?;
    Ok(())
}

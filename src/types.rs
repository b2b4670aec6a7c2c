use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Spotify application credentials stored in `config.json`.
///
/// Missing keys deserialize to empty strings and unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl AppCredentials {
    pub fn is_configured(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }
}

/// The authenticated user stored in `spotify_user.json`.
///
/// On disk the access token is kept under the `token` key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSession {
    pub id: String,
    #[serde(rename = "token")]
    pub access_token: String,
    pub refresh_token: String,
}

impl UserSession {
    pub fn is_authenticated(&self) -> bool {
        !self.id.is_empty() && !self.access_token.is_empty() && !self.refresh_token.is_empty()
    }
}

/// Tokens obtained from the authorization-code exchange.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OAuthTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Token endpoint answer to a `refresh_token` grant.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshedToken {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Device {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub volume_percent: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DevicesResponse {
    pub devices: Vec<Device>,
}

#[derive(Tabled)]
pub struct DeviceTableRow {
    pub name: String,
    pub kind: String,
    pub volume: String,
    pub active: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimplifiedArtist {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimplifiedAlbum {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Show {
    pub name: String,
}

/// A track or an episode. Episodes carry a `show` instead of artists and album.
#[derive(Debug, Clone, Deserialize)]
pub struct PlayableItem {
    pub id: Option<String>,
    pub name: String,
    pub uri: String,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub artists: Vec<SimplifiedArtist>,
    #[serde(default)]
    pub album: Option<SimplifiedAlbum>,
    #[serde(default)]
    pub show: Option<Show>,
}

impl PlayableItem {
    /// First artist for tracks, show name for episodes.
    pub fn creator(&self) -> &str {
        self.artists
            .first()
            .map(|a| a.name.as_str())
            .or_else(|| self.show.as_ref().map(|s| s.name.as_str()))
            .unwrap_or("Unknown")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentlyPlaying {
    #[serde(default)]
    pub is_playing: bool,
    pub progress_ms: Option<u64>,
    pub item: Option<PlayableItem>,
    #[serde(default)]
    pub currently_playing_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Queue {
    pub currently_playing: Option<PlayableItem>,
    #[serde(default)]
    pub queue: Vec<PlayableItem>,
}

#[derive(Tabled)]
pub struct QueueTableRow {
    pub position: usize,
    pub name: String,
    pub artist: String,
    pub duration: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistOwner {
    pub id: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub owner: PlaylistOwner,
    #[serde(default)]
    pub collaborative: bool,
}

#[derive(Tabled)]
pub struct PlaylistTableRow {
    pub name: String,
    pub owner: String,
    pub collaborative: String,
}

/// One page of a Spotify paging object. `next` is an absolute URL.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlbumTrack {
    pub uri: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddTracksRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackUri {
    pub uri: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RemoveTracksRequest {
    pub tracks: Vec<TrackUri>,
}

//! Playback control endpoints under `/me/player`.

use crate::{
    Res,
    types::{CurrentlyPlaying, Device, DevicesResponse, Queue},
};

use super::{Session, TokenRefreshHandler};

/// `GET /me/player/devices`
pub async fn devices<H: TokenRefreshHandler>(session: &mut Session<H>) -> Res<Vec<Device>> {
    let response: DevicesResponse = session.get("me/player/devices", &[]).await?;
    Ok(response.devices)
}

/// `GET /me/player/currently-playing`, `None` when nothing is loaded.
pub async fn currently_playing<H: TokenRefreshHandler>(
    session: &mut Session<H>,
) -> Res<Option<CurrentlyPlaying>> {
    session
        .get_optional(
            "me/player/currently-playing",
            &[("additional_types", "track,episode".to_string())],
        )
        .await
}

/// `GET /me/player/queue`
pub async fn queue<H: TokenRefreshHandler>(session: &mut Session<H>) -> Res<Queue> {
    session.get("me/player/queue", &[]).await
}

/// `PUT /me/player/play`, optionally targeting a specific device.
pub async fn play<H: TokenRefreshHandler>(
    session: &mut Session<H>,
    device_id: Option<&str>,
) -> Res<()> {
    let query: Vec<(&str, String)> = device_id
        .map(|id| vec![("device_id", id.to_string())])
        .unwrap_or_default();
    session.put("me/player/play", &query, None).await
}

/// `PUT /me/player/pause`
pub async fn pause<H: TokenRefreshHandler>(session: &mut Session<H>) -> Res<()> {
    session.put("me/player/pause", &[], None).await
}

/// `POST /me/player/next`
pub async fn next<H: TokenRefreshHandler>(session: &mut Session<H>) -> Res<()> {
    session.post("me/player/next", &[], None).await
}

/// `POST /me/player/previous`
pub async fn previous<H: TokenRefreshHandler>(session: &mut Session<H>) -> Res<()> {
    session.post("me/player/previous", &[], None).await
}

/// `PUT /me/player/seek`
pub async fn seek<H: TokenRefreshHandler>(session: &mut Session<H>, position_ms: u64) -> Res<()> {
    session
        .put(
            "me/player/seek",
            &[("position_ms", position_ms.to_string())],
            None,
        )
        .await
}

/// `PUT /me/player/volume`
pub async fn volume<H: TokenRefreshHandler>(session: &mut Session<H>, percent: u8) -> Res<()> {
    session
        .put(
            "me/player/volume",
            &[("volume_percent", percent.to_string())],
            None,
        )
        .await
}

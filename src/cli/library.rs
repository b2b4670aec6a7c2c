use crate::{
    Error, Res, notice,
    spotify::{library, player},
    success,
    types::PlayableItem,
    utils,
};

use super::{LOCAL_TRACK_MESSAGE, SpotifySession};

/// Saves the current track to "Liked Songs".
pub async fn like(session: &mut SpotifySession) -> Res<()> {
    let (id, item) = current_catalog_track(session).await?;
    library::save_tracks(session, &[id]).await?;
    success!("Saved {} - {} to your library", item.name, item.creator());
    Ok(())
}

/// Removes the current track from "Liked Songs".
pub async fn unlike(session: &mut SpotifySession) -> Res<()> {
    let (id, item) = current_catalog_track(session).await?;
    library::remove_tracks(session, &[id]).await?;
    success!("Removed {} - {} from your library", item.name, item.creator());
    Ok(())
}

/// The playing track and its id; exits early for anything the library
/// endpoints cannot take.
async fn current_catalog_track(session: &mut SpotifySession) -> Res<(String, PlayableItem)> {
    let Some(current) = player::currently_playing(session).await? else {
        notice!("Nothing playing");
    };
    let Some(item) = current.item else {
        notice!("Nothing playing");
    };

    if utils::is_local_track(&item.uri) {
        notice!("{}", LOCAL_TRACK_MESSAGE);
    }
    if current.currently_playing_type != "track" {
        notice!("Shellify can only save tracks to your library");
    }

    let id = item
        .id
        .clone()
        .ok_or_else(|| Error::InvalidResponse(format!("{} has no track id", item.uri)))?;
    Ok((id, item))
}

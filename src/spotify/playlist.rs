use crate::{
    Res,
    types::{AddTracksRequest, Page, Playlist, RemoveTracksRequest, TrackUri},
};

use super::{Session, TokenRefreshHandler};

/// Spotify accepts at most this many tracks per add/remove call.
const TRACKS_PER_REQUEST: usize = 100;

/// All playlists of the current user, following pagination.
pub async fn list<H: TokenRefreshHandler>(session: &mut Session<H>) -> Res<Vec<Playlist>> {
    let mut playlists = Vec::new();
    // items can be null for playlists that were removed from the catalog
    let mut page: Page<Option<Playlist>> = session
        .get("me/playlists", &[("limit", "50".to_string())])
        .await?;

    loop {
        playlists.extend(page.items.into_iter().flatten());
        match page.next {
            Some(next) => page = session.get(&next, &[]).await?,
            None => break,
        }
    }

    Ok(playlists)
}

/// First playlist whose name matches exactly.
pub async fn find_by_name<H: TokenRefreshHandler>(
    session: &mut Session<H>,
    name: &str,
) -> Res<Option<Playlist>> {
    let playlists = list(session).await?;
    Ok(playlists.into_iter().find(|p| p.name == name))
}

/// `POST /playlists/{id}/tracks`
pub async fn add_tracks<H: TokenRefreshHandler>(
    session: &mut Session<H>,
    playlist_id: &str,
    uris: &[String],
) -> Res<()> {
    let path = format!("playlists/{playlist_id}/tracks");
    for chunk in uris.chunks(TRACKS_PER_REQUEST) {
        let body = serde_json::to_value(AddTracksRequest {
            uris: chunk.to_vec(),
        })?;
        session.post(&path, &[], Some(&body)).await?;
    }
    Ok(())
}

/// `DELETE /playlists/{id}/tracks`
pub async fn remove_tracks<H: TokenRefreshHandler>(
    session: &mut Session<H>,
    playlist_id: &str,
    uris: &[String],
) -> Res<()> {
    let path = format!("playlists/{playlist_id}/tracks");
    for chunk in uris.chunks(TRACKS_PER_REQUEST) {
        let body = serde_json::to_value(RemoveTracksRequest {
            tracks: chunk.iter().map(|uri| TrackUri { uri: uri.clone() }).collect(),
        })?;
        session.delete(&path, &[], Some(&body)).await?;
    }
    Ok(())
}

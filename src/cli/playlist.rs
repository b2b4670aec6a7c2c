use tabled::Table;

use crate::{
    Error, Res, notice,
    spotify::{album, player, playlist},
    success,
    types::PlaylistTableRow,
    utils,
};

use super::{LOCAL_TRACK_MESSAGE, NOT_OWNER_MESSAGE, SpotifySession};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Change {
    Add,
    Remove,
}

pub async fn playlists(session: &mut SpotifySession) -> Res<()> {
    let playlists = playlist::list(session).await?;
    if playlists.is_empty() {
        println!("  No playlists");
        return Ok(());
    }

    let rows: Vec<PlaylistTableRow> = playlists
        .into_iter()
        .map(|p| PlaylistTableRow {
            name: p.name,
            owner: p.owner.display_name.unwrap_or(p.owner.id),
            collaborative: if p.collaborative {
                "Collaborative".to_string()
            } else {
                String::new()
            },
        })
        .collect();

    println!("{}", Table::new(rows));
    Ok(())
}

/// Adds the current track, or with `album` its whole album, to a playlist.
pub async fn add(session: &mut SpotifySession, name: &str, album: bool) -> Res<()> {
    change_playlist(session, name, album, Change::Add).await
}

/// Removes the current track, or with `album` its whole album, from a playlist.
pub async fn remove(session: &mut SpotifySession, name: &str, album: bool) -> Res<()> {
    change_playlist(session, name, album, Change::Remove).await
}

async fn change_playlist(
    session: &mut SpotifySession,
    name: &str,
    whole_album: bool,
    change: Change,
) -> Res<()> {
    let Some(item) = player::currently_playing(session)
        .await?
        .filter(|c| c.is_playing)
        .and_then(|c| c.item)
    else {
        println!("  Nothing playing");
        return Ok(());
    };

    if utils::is_local_track(&item.uri) {
        notice!("{}", LOCAL_TRACK_MESSAGE);
    }

    let Some(target) = playlist::find_by_name(session, name).await? else {
        println!("  Playlist not found");
        return Ok(());
    };
    if target.owner.id != session.handler().user().id {
        notice!("{}", NOT_OWNER_MESSAGE);
    }

    let uris = if whole_album {
        let album_id = item
            .album
            .as_ref()
            .and_then(|a| a.id.clone())
            .ok_or_else(|| Error::InvalidResponse(format!("{} has no album", item.uri)))?;
        album::track_uris(session, &album_id).await?
    } else {
        vec![item.uri.clone()]
    };

    let what = if whole_album {
        item.album
            .as_ref()
            .map(|a| a.name.clone())
            .unwrap_or_else(|| item.name.clone())
    } else {
        item.name.clone()
    };

    match change {
        Change::Add => {
            playlist::add_tracks(session, &target.id, &uris).await?;
            success!("Added {} to {}", what, target.name);
        }
        Change::Remove => {
            playlist::remove_tracks(session, &target.id, &uris).await?;
            success!("Removed {} from {}", what, target.name);
        }
    }
    Ok(())
}

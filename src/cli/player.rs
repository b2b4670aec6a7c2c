use std::time::Duration;

use tabled::Table;
use tokio::time::sleep;
use tracing::debug;

use crate::{
    Error, Res,
    spotify::{library, player},
    success,
    types::{CurrentlyPlaying, DeviceTableRow, QueueTableRow},
    utils::{self, duration_to_s},
};

use super::SpotifySession;

/// Player commands are applied asynchronously on Spotify's side; give the
/// change a moment before reading the new state back.
const PLAYER_SETTLE_MS: u64 = 350;

pub async fn devices(session: &mut SpotifySession) -> Res<()> {
    let devices = player::devices(session).await?;
    if devices.is_empty() {
        println!("  No devices available");
        return Ok(());
    }

    let rows: Vec<DeviceTableRow> = devices
        .into_iter()
        .map(|d| DeviceTableRow {
            name: d.name,
            kind: d.kind,
            volume: d
                .volume_percent
                .map(|v| format!("{v}%"))
                .unwrap_or_default(),
            active: if d.is_active { "♪".to_string() } else { String::new() },
        })
        .collect();

    println!("{}", Table::new(rows));
    Ok(())
}

pub async fn playing(session: &mut SpotifySession) -> Res<()> {
    print_current_song(session).await
}

/// Toggles playback. When Spotify has no active device to resume on, retries
/// once on the first available device.
pub async fn play(session: &mut SpotifySession) -> Res<()> {
    let current = player::currently_playing(session).await?;
    if current.is_some_and(|c| c.is_playing) {
        return player::pause(session).await;
    }

    match player::play(session, None).await {
        Ok(()) => {}
        Err(Error::NotFound(reason)) => {
            debug!(%reason, "no active device, falling back to the first available one");
            let devices = player::devices(session).await?;
            let device_id = devices
                .into_iter()
                .find_map(|d| d.id)
                .ok_or(Error::NoDevices)?;
            player::play(session, Some(&device_id)).await?;
        }
        Err(e) => return Err(e),
    }

    settle().await;
    print_current_song(session).await
}

pub async fn next(session: &mut SpotifySession) -> Res<()> {
    player::next(session).await?;
    settle().await;
    print_current_song(session).await
}

pub async fn previous(session: &mut SpotifySession) -> Res<()> {
    player::previous(session).await?;
    settle().await;
    print_current_song(session).await
}

pub async fn restart(session: &mut SpotifySession) -> Res<()> {
    seek(session, 0).await
}

pub async fn seek(session: &mut SpotifySession, position_ms: u64) -> Res<()> {
    player::seek(session, position_ms).await?;
    settle().await;
    print_current_song(session).await
}

pub async fn volume(session: &mut SpotifySession, percent: u8) -> Res<()> {
    player::volume(session, percent).await?;
    success!("Volume set to {}%", percent);
    Ok(())
}

pub async fn queue(session: &mut SpotifySession) -> Res<()> {
    let queue = player::queue(session).await?;
    if queue.queue.is_empty() {
        println!("  Queue is empty");
        return Ok(());
    }

    let rows: Vec<QueueTableRow> = queue
        .queue
        .iter()
        .enumerate()
        .map(|(i, item)| QueueTableRow {
            position: i + 1,
            name: item.name.clone(),
            artist: item.creator().to_string(),
            duration: duration_to_s(item.duration_ms),
        })
        .collect();

    println!("{}", Table::new(rows));
    Ok(())
}

/// Prints the now-playing line, or "Nothing playing".
///
/// `  <name> - <artist> - <progress>/<duration>[ - ♥][ - local]`
pub async fn print_current_song(session: &mut SpotifySession) -> Res<()> {
    let Some(current) = player::currently_playing(session)
        .await?
        .filter(|c| c.is_playing && c.item.is_some())
    else {
        println!("  Nothing playing");
        return Ok(());
    };

    let liked = is_liked(session, &current).await?;
    println!("  Now Playing:");
    println!("  {}", now_playing_line(&current, liked));
    Ok(())
}

async fn is_liked(session: &mut SpotifySession, current: &CurrentlyPlaying) -> Res<bool> {
    let Some(item) = current.item.as_ref() else {
        return Ok(false);
    };
    if current.currently_playing_type != "track" || utils::is_local_track(&item.uri) {
        return Ok(false);
    }
    let Some(id) = item.id.clone() else {
        return Ok(false);
    };

    let flags = library::contains_tracks(session, &[id]).await?;
    Ok(flags.first().copied().unwrap_or(false))
}

pub(crate) fn now_playing_line(current: &CurrentlyPlaying, liked: bool) -> String {
    let Some(item) = current.item.as_ref() else {
        return String::new();
    };

    let mut line = format!(
        "{} - {} - {}/{}",
        item.name,
        item.creator(),
        duration_to_s(current.progress_ms.unwrap_or(0)),
        duration_to_s(item.duration_ms)
    );
    if liked {
        line.push_str(" - ♥");
    }
    if utils::is_local_track(&item.uri) {
        line.push_str(" - local");
    }
    line
}

async fn settle() {
    sleep(Duration::from_millis(PLAYER_SETTLE_MS)).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn current(json: &str) -> CurrentlyPlaying {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn formats_liked_catalog_track() {
        let c = current(
            r#"{"is_playing":true,"progress_ms":65000,"currently_playing_type":"track",
                "item":{"id":"1","name":"Song","uri":"spotify:track:1","duration_ms":3725000,
                        "artists":[{"id":"a","name":"Band"}]}}"#,
        );
        assert_eq!(now_playing_line(&c, true), "Song - Band - 01:05/01:02:05 - ♥");
    }

    #[test]
    fn marks_local_tracks() {
        let c = current(
            r#"{"is_playing":true,"progress_ms":0,"currently_playing_type":"track",
                "item":{"id":null,"name":"Demo","uri":"spotify:local:Me:Demo:Demo:120","duration_ms":120000,
                        "artists":[{"id":null,"name":"Me"}]}}"#,
        );
        assert_eq!(now_playing_line(&c, false), "Demo - Me - 00:00/02:00 - local");
    }

    #[test]
    fn episodes_show_the_show_name() {
        let c = current(
            r#"{"is_playing":true,"progress_ms":1000,"currently_playing_type":"episode",
                "item":{"id":"e","name":"Ep 1","uri":"spotify:episode:e","duration_ms":60000,
                        "show":{"name":"Podcast"}}}"#,
        );
        assert_eq!(now_playing_line(&c, false), "Ep 1 - Podcast - 00:01/01:00");
    }
}

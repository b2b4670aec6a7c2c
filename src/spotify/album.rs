use crate::{
    Res,
    types::{AlbumTrack, Page},
};

use super::{Session, TokenRefreshHandler};

/// Every track URI of an album, following pagination.
pub async fn track_uris<H: TokenRefreshHandler>(
    session: &mut Session<H>,
    album_id: &str,
) -> Res<Vec<String>> {
    let mut uris = Vec::new();
    let mut page: Page<AlbumTrack> = session
        .get(
            &format!("albums/{album_id}/tracks"),
            &[("limit", "50".to_string())],
        )
        .await?;

    loop {
        uris.extend(page.items.into_iter().map(|t| t.uri));
        match page.next {
            Some(next) => page = session.get(&next, &[]).await?,
            None => break,
        }
    }

    Ok(uris)
}

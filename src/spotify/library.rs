//! Saved tracks ("Liked Songs").

use crate::Res;

use super::{Session, TokenRefreshHandler};

/// `GET /me/tracks/contains` - one flag per id, in order.
pub async fn contains_tracks<H: TokenRefreshHandler>(
    session: &mut Session<H>,
    ids: &[String],
) -> Res<Vec<bool>> {
    session
        .get("me/tracks/contains", &[("ids", ids.join(","))])
        .await
}

/// `PUT /me/tracks`
pub async fn save_tracks<H: TokenRefreshHandler>(session: &mut Session<H>, ids: &[String]) -> Res<()> {
    session.put("me/tracks", &[("ids", ids.join(","))], None).await
}

/// `DELETE /me/tracks`
pub async fn remove_tracks<H: TokenRefreshHandler>(
    session: &mut Session<H>,
    ids: &[String],
) -> Res<()> {
    session.delete("me/tracks", &[("ids", ids.join(","))], None).await
}

use crate::{Res, types::User};

use super::{Session, TokenRefreshHandler};

/// `GET /me`
pub async fn current_user<H: TokenRefreshHandler>(session: &mut Session<H>) -> Res<User> {
    session.get("me", &[]).await
}

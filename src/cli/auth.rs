use std::{path::Path, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    Error, Res,
    config::{self, Endpoints},
    info,
    management::{ConfigStore, CredentialStore},
    server::CallbackListener,
    spotify::{self, Session},
    success, utils, warning,
};

/// Runs the OAuth authorization-code flow and stores the resulting user.
///
/// 1. Binds the callback listener on the redirect URI's port
/// 2. Prints the authorization URL and tries to open it in the browser
/// 3. Waits for the redirect and exchanges the code for tokens
/// 4. Looks up the user id with `GET /me`
/// 5. Writes `spotify_user.json`
pub async fn authenticate(config: &ConfigStore, config_dir: &Path) -> Res<()> {
    if !config.is_configured() {
        return Err(Error::NotConfigured);
    }

    let endpoints = Endpoints::from_env();
    let http = spotify::http_client()?;
    let state = utils::generate_state();
    let auth_url = spotify::auth::authorize_url(&endpoints, config.credentials(), &state)?;

    // bind before showing the URL so a fast redirect cannot miss the listener
    let listener = CallbackListener::bind(
        &endpoints.callback_address()?,
        http.clone(),
        endpoints.clone(),
        config.credentials().clone(),
    )
    .await?
    .expect_state(state)
    .with_timeout(config::callback_timeout());

    info!("Go to the link below to authorize Shellify.");
    println!("{auth_url}");
    if webbrowser::open(&auth_url).is_err() {
        warning!("Failed to open browser. Please open the link above manually.");
    }

    let pb = ProgressBar::new_spinner();
    pb.set_message("Waiting for authorization...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    let result = listener.run().await;
    pb.finish_and_clear();

    let tokens = result?.ok_or_else(|| {
        Error::AuthorizationFailed(
            "Spotify did not issue tokens. See the browser window for details.".to_string(),
        )
    })?;

    let mut store = CredentialStore::load(config_dir).await?;
    store.set_tokens(tokens);

    let user = store.user().clone();
    let mut session = Session::new(
        http,
        endpoints,
        config.credentials().clone(),
        &user,
        store,
    );
    let me = spotify::user::current_user(&mut session).await?;

    let mut store = session.into_handler();
    store.set_user_id(&me.id);
    store.save().await?;

    success!(
        "Authenticated as {}",
        me.display_name.as_deref().unwrap_or(&me.id)
    );
    Ok(())
}

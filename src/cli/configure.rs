use dialoguer::{Input, Password};

use crate::{Res, management::ConfigStore, success};

pub async fn configure(mut config: ConfigStore) -> Res<()> {
    let client_id: String = Input::new()
        .with_prompt("Spotify Client ID")
        .interact_text()?;
    let client_secret = Password::new()
        .with_prompt("Spotify Client Secret")
        .interact()?;

    config.save(client_id.trim(), client_secret.trim()).await?;
    success!("Configuration saved to {}", config.path().display());
    Ok(())
}

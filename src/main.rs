use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};
use tracing_subscriber::EnvFilter;

use shellify::{
    Res,
    cli::{self, SpotifySession},
    config, error,
    management::ConfigStore,
    utils, warning,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// Defaults to `playing`
    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Set the Spotify client_id and client_secret
    Configure,

    /// Authenticate with the Spotify API
    Authenticate,

    /// List available playback devices
    Devices,

    /// List information about the current song
    Playing,

    /// Set the volume of the current playback device
    Volume {
        #[clap(value_parser = clap::value_parser!(u8).range(0..=100))]
        level: u8,
    },

    /// Save the current song to your library
    Like,

    /// Remove the current song from your library
    Unlike,

    /// List your playlists
    Playlists,

    /// Add the current song to the provided playlist
    Add(PlaylistOptions),

    /// Remove the current song from the provided playlist
    Remove(PlaylistOptions),

    /// List the upcoming songs in the queue
    Queue,

    /// Play or pause on the currently playing device
    #[clap(visible_alias = "pause")]
    Play,

    /// Skip to the next song in the queue
    #[clap(visible_alias = "skip")]
    Next,

    /// Skip to the previous song in the queue
    #[clap(visible_alias = "back")]
    Previous,

    /// Restart the currently playing song
    Restart,

    /// Seek to the specified time (mm:ss or hh:mm:ss) in the current song
    Seek {
        #[clap(value_parser = utils::time_to_ms)]
        time: u64,
    },

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistOptions {
    /// Name of the playlist
    playlist: String,

    /// Use every track of the current song's album
    #[clap(long)]
    album: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_dir = config::config_dir();
    if let Err(e) = config::load_env(&config_dir).await {
        warning!("Cannot load environment overrides. Err: {}", e);
    }

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Playing);

    if let Command::Completions(ref opt) = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    let config = match ConfigStore::load(&config_dir).await {
        Ok(config) => config,
        Err(e) => error!("Cannot load configuration. Err: {}", e),
    };

    let result = match command {
        Command::Configure => cli::configure(config).await,
        Command::Authenticate => cli::authenticate(&config, &config_dir).await,
        other => match cli::connect(&config, &config_dir).await {
            Ok(mut session) => run(other, &mut session).await,
            Err(e) => Err(e),
        },
    };

    if let Err(e) = result {
        error!("{}", e);
    }
}

async fn run(command: Command, session: &mut SpotifySession) -> Res<()> {
    match command {
        Command::Devices => cli::devices(session).await,
        Command::Playing => cli::playing(session).await,
        Command::Volume { level } => cli::volume(session, level).await,
        Command::Like => cli::like(session).await,
        Command::Unlike => cli::unlike(session).await,
        Command::Playlists => cli::playlists(session).await,
        Command::Add(opt) => cli::add(session, &opt.playlist, opt.album).await,
        Command::Remove(opt) => cli::remove(session, &opt.playlist, opt.album).await,
        Command::Queue => cli::queue(session).await,
        Command::Play => cli::play(session).await,
        Command::Next => cli::next(session).await,
        Command::Previous => cli::previous(session).await,
        Command::Restart => cli::restart(session).await,
        Command::Seek { time } => cli::seek(session, time).await,
        Command::Configure | Command::Authenticate | Command::Completions(_) => {
            unreachable!("handled before a session is opened")
        }
    }
}

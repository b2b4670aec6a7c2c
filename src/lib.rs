//! Shellify: use Spotify from the command line.
//!
//! This library backs the `shellify` binary. It holds the local stores for
//! application and user credentials, the one-shot OAuth callback listener,
//! the Spotify Web API session, and the command implementations.
//!
//! # Modules
//!
//! - `api` - Request parsing and response framing for the OAuth callback
//! - `cli` - Command-line interface implementations
//! - `config` - Config directory, endpoints and environment overrides
//! - `error` - The crate-wide error type
//! - `management` - Persistent stores for `config.json` and `spotify_user.json`
//! - `server` - Local listener that receives the OAuth callback
//! - `spotify` - Spotify Web API session and endpoints
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

pub use error::Error;

/// Result alias used throughout the crate.
pub type Res<T> = std::result::Result<T, Error>;

/// Prints an informational message with a blue bullet point.
///
/// ```
/// info!("Found {} devices", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Terminates with exit code 1. Only use this for failures that should end
/// the command; anything after the call does not run.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a user-facing notice and ends the command with exit code 0.
///
/// Used for policy restrictions (local tracks, playlists owned by someone
/// else) which are not failures.
#[macro_export]
macro_rules! notice {
  ($($arg:tt)*) => ({
    println!("  {}", std::format_args!($($arg)*));
    std::process::exit(0);
  })
}

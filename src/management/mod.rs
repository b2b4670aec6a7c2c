mod config;
mod files;
mod user;

pub use config::ConfigStore;
pub use user::CredentialStore;

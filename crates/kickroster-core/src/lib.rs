pub mod app_config;
pub mod config;
pub mod players;
pub mod profile;
pub mod slug;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use players::{load_players, resolve_roster, PlayersFile, DEFAULT_PLAYERS};
pub use profile::{MergedProfile, Profile, SourceTag, Sources};
pub use slug::normalize_slug;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read players file {path}: {source}")]
    PlayersFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse players file: {0}")]
    PlayersFileParse(#[source] serde_yaml::Error),

    #[error("players validation failed: {0}")]
    Validation(String),
}

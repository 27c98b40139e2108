pub mod app_config;
pub mod config;
pub mod location;
pub mod media;
pub mod slug;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use location::{LocationKind, LocationRecord};
pub use media::LocalFile;
pub use slug::{slugs_match, to_display, to_slug};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

pub mod app_config;
pub mod config;
pub mod relative_time;
pub mod review;
pub mod targets;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env, parse_min_date};
pub use relative_time::{resolve, RelativeTimeError};
pub use review::{FailureKind, Review, RunSummary, Target, TargetOutcome};
pub use targets::{load_targets, parse_targets};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read target list {path}: {source}")]
    TargetList {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid date \"{value}\": expected YYYY-MM-DD")]
    InvalidDate { value: String },
}

pub mod app_config;
pub mod business;
pub mod config;
pub mod geo;

pub use app_config::{AppConfig, Environment};
pub use business::{
    load_business_snapshot, BusinessRecord, BusinessSnapshot, DayHours, LiveStatus,
    OperatingHours, WEEKDAY_NAMES,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::{distance_km, CoordinateError, Coordinates, EARTH_RADIUS_KM};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read business snapshot {path}: {source}")]
    SnapshotIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse business snapshot: {0}")]
    SnapshotParse(#[source] serde_json::Error),

    #[error("business snapshot validation failed: {0}")]
    Validation(String),
}

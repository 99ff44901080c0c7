//! Shared domain types and configuration for the pica workspace.
//!
//! Everything here is consumed by sibling crates: the availability
//! normalizer produces [`AvailabilityProgram`] values, the pricing engine
//! consumes them, the wizard resolves steps from [`CampaignDetail`], and the
//! API client decodes remote payloads into all of the above.

use thiserror::Error;

pub mod app_config;
pub mod campaign;
pub mod config;
pub mod month;
pub mod program;

pub use app_config::{AppConfig, Environment};
pub use campaign::{CampaignDetail, Category, CategoryState, InsertPrintType, SelectedProgram};
pub use config::{load_app_config, load_app_config_from_env};
pub use month::Month;
pub use program::{AvailabilityProgram, CheckType, FreightRange};

/// Errors from loading or parsing application configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// An environment variable is set but its value cannot be parsed.
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

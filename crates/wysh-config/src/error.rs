//! # Config Errors
//!
//! Failures while loading `pricing.toml` or JSON snapshots.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  std::io::Error      ─┐                                                 │
//! │  toml::de::Error     ─┼──► ConfigError::LoadFailed                      │
//! │  serde_json::Error   ─┘    (SnapshotFailed for JSON)                    │
//! │  toml::ser::Error    ────► ConfigError::SaveFailed                      │
//! │  PricingError        ────► ConfigError::Pricing  (rules/tiers rejected) │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;
use wysh_pricing::PricingError;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A setting has an unusable value.
    #[error("Invalid pricing configuration: {0}")]
    InvalidConfig(String),

    /// Reading or parsing the config file failed.
    #[error("Failed to load config: {0}")]
    LoadFailed(String),

    /// Writing the config file failed.
    #[error("Failed to save config: {0}")]
    SaveFailed(String),

    /// A JSON snapshot could not be read or parsed.
    #[error("Failed to read snapshot: {0}")]
    SnapshotFailed(String),

    /// Loaded rules, tiers or delivery bands failed engine validation.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Convenience type alias for Results with ConfigError.
pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Error Conversions
// =============================================================================

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::SaveFailed(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::SnapshotFailed(err.to_string())
    }
}

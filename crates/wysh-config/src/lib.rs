//! # wysh-config: Configuration for the Wyshkit Pricing Engine
//!
//! Loads engine settings and rule snapshots once at startup and hands them
//! to `wysh-pricing` as plain owned values.
//!
//! ## Startup Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  init_tracing()                                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  PricingConfig::load(None)                                              │
//! │    defaults ──► pricing.toml ──► WYSH_* env ──► validate()             │
//! │       │                                                                 │
//! │       ├──► estimate_settings()   GST rate, tier policy, delivery bands │
//! │       └──► commission_rules()    JSON snapshot, validated              │
//! │                                                                         │
//! │  Everything after this point is pure wysh-pricing calls.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`config`] - `PricingConfig` and its TOML sections
//! - [`snapshot`] - JSON rule and tier snapshots
//! - [`telemetry`] - tracing subscriber setup
//! - [`error`] - `ConfigError`

pub mod config;
pub mod error;
pub mod snapshot;
pub mod telemetry;

pub use config::PricingConfig;
pub use error::{ConfigError, ConfigResult};
pub use telemetry::init_tracing;

//! # Telemetry
//!
//! Structured logging setup for binaries and services embedding the engine.
//!
//! ## Log Levels
//! - `RUST_LOG=debug` - every tier resolution and rule selection
//! - `RUST_LOG=wysh_pricing=trace` - trace for the engine only
//! - Default: `info,wysh_pricing=debug,wysh_config=debug`

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info,wysh_pricing=debug,wysh_config=debug";

/// Initializes the tracing subscriber.
///
/// Returns `false` when a global subscriber was already installed (another
/// test or the embedding application got there first).
pub fn init_tracing() -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_harmless() {
        init_tracing();
        assert!(!init_tracing());
    }

    #[test]
    fn test_default_filter_parses() {
        assert!(DEFAULT_FILTER.parse::<EnvFilter>().is_ok());
    }
}

//! # JSON Snapshots
//!
//! Commission rules and tier sets exported from the storefront database as
//! JSON. Snapshots are validated on load so a broken rule set is caught at
//! startup, not at the first order.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use wysh_pricing::commission::ensure_valid_rules;
use wysh_pricing::tiers::{ensure_valid, TierPolicy};
use wysh_pricing::{CommissionRule, PricingTier, VendorOverride};

use crate::error::{ConfigError, ConfigResult};

/// Parses and validates a `CommissionRule[]` document.
pub fn parse_commission_rules(json: &str) -> ConfigResult<Vec<CommissionRule>> {
    let rules: Vec<CommissionRule> = serde_json::from_str(json)?;
    ensure_valid_rules(&rules)?;
    debug!(rules = rules.len(), "Parsed commission rules");
    Ok(rules)
}

/// Reads a commission rule snapshot from disk.
pub fn load_commission_rules(path: &Path) -> ConfigResult<Vec<CommissionRule>> {
    let json = read_snapshot(path)?;
    let rules = parse_commission_rules(&json)?;
    info!(?path, rules = rules.len(), "Loaded commission rules");
    Ok(rules)
}

/// Parses a `VendorOverride[]` document.
pub fn parse_vendor_overrides(json: &str) -> ConfigResult<Vec<VendorOverride>> {
    let overrides: Vec<VendorOverride> = serde_json::from_str(json)?;
    debug!(overrides = overrides.len(), "Parsed vendor overrides");
    Ok(overrides)
}

/// Reads a vendor override snapshot from disk.
pub fn load_vendor_overrides(path: &Path) -> ConfigResult<Vec<VendorOverride>> {
    let json = read_snapshot(path)?;
    let overrides = parse_vendor_overrides(&json)?;
    info!(?path, overrides = overrides.len(), "Loaded vendor overrides");
    Ok(overrides)
}

/// Parses and validates one product's `PricingTier[]`.
pub fn parse_tier_set(json: &str, policy: &TierPolicy) -> ConfigResult<Vec<PricingTier>> {
    let tiers: Vec<PricingTier> = serde_json::from_str(json)?;
    ensure_valid(&tiers, policy)?;
    Ok(tiers)
}

/// Reads a tier set snapshot from disk.
pub fn load_tier_set(path: &Path, policy: &TierPolicy) -> ConfigResult<Vec<PricingTier>> {
    let json = read_snapshot(path)?;
    parse_tier_set(&json, policy)
}

/// Writes any snapshot as pretty JSON.
pub fn write_snapshot<T: Serialize + ?Sized>(path: &Path, value: &T) -> ConfigResult<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)
        .map_err(|e| ConfigError::SnapshotFailed(format!("{}: {}", path.display(), e)))?;
    debug!(?path, "Wrote snapshot");
    Ok(())
}

fn read_snapshot(path: &Path) -> ConfigResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| ConfigError::SnapshotFailed(format!("{}: {}", path.display(), e)))
}

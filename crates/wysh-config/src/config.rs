//! # Pricing Configuration
//!
//! Engine settings loaded once at startup.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     WYSH_GST_RATE=12                                                   │
//! │     WYSH_FREE_DELIVERY_THRESHOLD=300000                                │
//! │     WYSH_COMMISSION_RULES=/srv/wysh/rules.json                         │
//! │     WYSH_VENDOR_OVERRIDES=/srv/wysh/overrides.json                     │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/pricing/pricing.toml (Linux)                             │
//! │     ~/Library/Application Support/com.wyshkit.pricing/pricing.toml     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     18% GST, storefront delivery bands, structural tier checks only    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # pricing.toml
//! [tax]
//! gst_rate_percent = 18
//!
//! [tiers]
//! require_first_tier_at_one = true
//! require_decreasing_prices = true
//! max_tiers = 5
//!
//! [delivery]
//! free_threshold_paise = 500000
//!
//! [[delivery.tiers]]
//! name = "Up to ₹999"
//! min_paise = 0
//! max_paise = 99999
//! fee_paise = 8000
//!
//! [commission]
//! rules_path = "/srv/wysh/commission-rules.json"
//! overrides_path = "/srv/wysh/vendor-overrides.json"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use wysh_pricing::delivery::{DeliveryFeeBand, DeliveryFeeSchedule};
use wysh_pricing::estimate::EstimateSettings;
use wysh_pricing::tiers::TierPolicy;
use wysh_pricing::{CommissionRule, Money, Percent, VendorOverride};

use crate::error::{ConfigError, ConfigResult};
use crate::snapshot;

const ENV_GST_RATE: &str = "WYSH_GST_RATE";
const ENV_FREE_DELIVERY_THRESHOLD: &str = "WYSH_FREE_DELIVERY_THRESHOLD";
const ENV_COMMISSION_RULES: &str = "WYSH_COMMISSION_RULES";
const ENV_VENDOR_OVERRIDES: &str = "WYSH_VENDOR_OVERRIDES";

// =============================================================================
// Tax Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxSettings {
    /// GST rate as a percent (18 = 18%).
    #[serde(default = "default_gst_rate")]
    pub gst_rate_percent: f64,
}

fn default_gst_rate() -> f64 {
    18.0
}

impl Default for TaxSettings {
    fn default() -> Self {
        TaxSettings {
            gst_rate_percent: default_gst_rate(),
        }
    }
}

// =============================================================================
// Delivery Settings
// =============================================================================

/// One `[[delivery.tiers]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryBandConfig {
    pub name: String,

    #[serde(default)]
    pub min_paise: i64,

    /// Omit for an open-ended band.
    #[serde(default)]
    pub max_paise: Option<i64>,

    pub fee_paise: i64,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl From<&DeliveryBandConfig> for DeliveryFeeBand {
    fn from(band: &DeliveryBandConfig) -> Self {
        DeliveryFeeBand {
            name: band.name.clone(),
            order_value_min: Money::from_paise(band.min_paise),
            order_value_max: band.max_paise.map(Money::from_paise),
            fee: Money::from_paise(band.fee_paise),
            is_active: band.is_active,
        }
    }
}

impl From<&DeliveryFeeBand> for DeliveryBandConfig {
    fn from(band: &DeliveryFeeBand) -> Self {
        DeliveryBandConfig {
            name: band.name.clone(),
            min_paise: band.order_value_min.paise(),
            max_paise: band.order_value_max.map(|m| m.paise()),
            fee_paise: band.fee.paise(),
            is_active: band.is_active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliverySettings {
    #[serde(default = "default_free_threshold")]
    pub free_threshold_paise: i64,

    /// Fee bands. An empty list falls back to the storefront defaults.
    #[serde(default)]
    pub tiers: Vec<DeliveryBandConfig>,
}

fn default_free_threshold() -> i64 {
    wysh_pricing::delivery::DEFAULT_FREE_DELIVERY_THRESHOLD.paise()
}

impl Default for DeliverySettings {
    fn default() -> Self {
        DeliverySettings {
            free_threshold_paise: default_free_threshold(),
            tiers: Vec::new(),
        }
    }
}

impl DeliverySettings {
    /// Builds the engine's fee schedule.
    pub fn schedule(&self) -> DeliveryFeeSchedule {
        let bands = if self.tiers.is_empty() {
            DeliveryFeeSchedule::default().bands
        } else {
            self.tiers.iter().map(DeliveryFeeBand::from).collect()
        };

        DeliveryFeeSchedule {
            free_threshold: Money::from_paise(self.free_threshold_paise),
            bands,
        }
    }
}

// =============================================================================
// Commission Settings
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionSettings {
    /// JSON snapshot of the admin console's `CommissionRule[]`.
    #[serde(default)]
    pub rules_path: Option<PathBuf>,

    /// JSON snapshot of negotiated `VendorOverride[]`.
    #[serde(default)]
    pub overrides_path: Option<PathBuf>,
}

// =============================================================================
// Main Pricing Configuration
// =============================================================================

/// Complete pricing engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    #[serde(default)]
    pub tax: TaxSettings,

    #[serde(default)]
    pub tiers: TierPolicy,

    #[serde(default)]
    pub delivery: DeliverySettings,

    #[serde(default)]
    pub commission: CommissionSettings,
}

impl PricingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (pricing.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading pricing config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load pricing config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses and validates a TOML document without touching the environment.
    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ConfigError::SaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::SaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| ConfigError::SaveFailed(e.to_string()))?;

        info!(?path, "Pricing config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        let rate = self.gst_rate()?;
        if rate.exceeds_hundred() {
            return Err(ConfigError::InvalidConfig(format!(
                "gst_rate_percent must be between 0 and 100, got {}",
                self.tax.gst_rate_percent
            )));
        }

        if self.tiers.max_tiers == Some(0) {
            return Err(ConfigError::InvalidConfig(
                "max_tiers must be greater than 0".into(),
            ));
        }

        self.delivery_schedule().ensure_valid()?;

        Ok(())
    }

    /// Applies `WYSH_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup.
    ///
    /// Unparseable values are logged and ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(rate) = lookup(ENV_GST_RATE) {
            match rate.trim().parse::<f64>() {
                Ok(parsed) => {
                    debug!(rate = parsed, "Overriding GST rate from environment");
                    self.tax.gst_rate_percent = parsed;
                }
                Err(_) => warn!(value = %rate, "Ignoring invalid {}", ENV_GST_RATE),
            }
        }

        if let Some(threshold) = lookup(ENV_FREE_DELIVERY_THRESHOLD) {
            match threshold.trim().parse::<i64>() {
                Ok(parsed) => {
                    debug!(paise = parsed, "Overriding free delivery threshold from environment");
                    self.delivery.free_threshold_paise = parsed;
                }
                Err(_) => {
                    warn!(value = %threshold, "Ignoring invalid {}", ENV_FREE_DELIVERY_THRESHOLD)
                }
            }
        }

        if let Some(path) = lookup(ENV_COMMISSION_RULES) {
            debug!(path = %path, "Overriding commission rules path from environment");
            self.commission.rules_path = Some(PathBuf::from(path));
        }

        if let Some(path) = lookup(ENV_VENDOR_OVERRIDES) {
            debug!(path = %path, "Overriding vendor overrides path from environment");
            self.commission.overrides_path = Some(PathBuf::from(path));
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "wyshkit", "pricing")
            .map(|dirs| dirs.config_dir().join("pricing.toml"))
    }

    // =========================================================================
    // Engine Settings
    // =========================================================================

    /// GST rate in basis points.
    pub fn gst_rate(&self) -> ConfigResult<Percent> {
        Percent::from_percentage(self.tax.gst_rate_percent)
            .map_err(|e| ConfigError::InvalidConfig(format!("gst_rate_percent: {}", e)))
    }

    pub fn tier_policy(&self) -> TierPolicy {
        self.tiers
    }

    pub fn delivery_schedule(&self) -> DeliveryFeeSchedule {
        self.delivery.schedule()
    }

    /// Everything `estimate_checkout` needs.
    pub fn estimate_settings(&self) -> ConfigResult<EstimateSettings> {
        Ok(EstimateSettings {
            gst_rate: self.gst_rate()?,
            tier_policy: self.tier_policy(),
            delivery: self.delivery_schedule(),
        })
    }

    /// Loads the configured commission rule snapshot.
    ///
    /// Returns an empty list when no path is configured.
    pub fn commission_rules(&self) -> ConfigResult<Vec<CommissionRule>> {
        match self.commission.rules_path.as_deref() {
            Some(path) => snapshot::load_commission_rules(path),
            None => {
                warn!("No commission rules path configured");
                Ok(Vec::new())
            }
        }
    }

    /// Loads the configured vendor override snapshot.
    ///
    /// Returns an empty list when no path is configured.
    pub fn vendor_overrides(&self) -> ConfigResult<Vec<VendorOverride>> {
        match self.commission.overrides_path.as_deref() {
            Some(path) => snapshot::load_vendor_overrides(path),
            None => Ok(Vec::new()),
        }
    }

    pub fn rules_path(&self) -> Option<&Path> {
        self.commission.rules_path.as_deref()
    }
}

//! # Domain Types
//!
//! Core records the engine consumes. They arrive from the storefront's
//! product forms, the admin commission console and checkout as plain data.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────────┐   ┌─────────────────┐  │
//! │  │  PricingTier    │   │   CommissionRule     │   │     AddOn       │  │
//! │  │  ─────────────  │   │  ──────────────────  │   │  ─────────────  │  │
//! │  │  min_qty        │   │  id, rule_type       │   │  name           │  │
//! │  │  max_qty?       │   │  segment (b2c/b2b)   │   │  price          │  │
//! │  │  price_per_item │   │  commission_percent  │   │  MOQ            │  │
//! │  │  discount %     │   │  platform_fee %?     │   │  proof of art   │  │
//! │  └─────────────────┘   │  value range         │   └─────────────────┘  │
//! │                        └──────────────────────┘                         │
//! │  ┌─────────────────┐   ┌──────────────────────┐                         │
//! │  │    Percent      │   │ MarketplaceSegment   │                         │
//! │  │  bps (u32)      │   │  B2c | B2b           │                         │
//! │  │  1800 = 18%     │   └──────────────────────┘                         │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All records serialize with camelCase keys so they round-trip with the
//! storefront's JSON unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Percent
// =============================================================================

/// A percentage represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1800 bps = 18% (GST), 700 bps = 7% (B2B commission)
///
/// Records carry percentages as JSON numbers (`12.5`); they are converted
/// to bps once, at deserialization, and all math stays in integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Percent(u32);

impl Percent {
    /// 100%.
    pub const HUNDRED: Percent = Percent(10_000);

    /// Creates a percentage from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Percent(bps)
    }

    /// Creates a percentage from a whole number of percent (`18` → 18%).
    #[inline]
    pub const fn from_whole(pct: u32) -> Self {
        Percent(pct * 100)
    }

    /// Creates a percentage from a decimal percent value, rounded to the
    /// nearest basis point.
    ///
    /// ```rust
    /// use wysh_pricing::types::Percent;
    ///
    /// assert_eq!(Percent::from_percentage(12.5).unwrap().bps(), 1250);
    /// assert!(Percent::from_percentage(-1.0).is_err());
    /// ```
    pub fn from_percentage(pct: f64) -> Result<Self, ValidationError> {
        if !pct.is_finite() {
            return Err(ValidationError::InvalidFormat {
                field: "percent".to_string(),
                reason: "must be a finite number".to_string(),
            });
        }
        if pct < 0.0 {
            return Err(ValidationError::MustBePositive {
                field: "percent".to_string(),
            });
        }
        let bps = (pct * 100.0).round();
        if bps > u32::MAX as f64 {
            return Err(ValidationError::OutOfRange {
                field: "percent".to_string(),
                min: 0,
                max: (u32::MAX / 100) as i64,
            });
        }
        Ok(Percent(bps as u32))
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Percent(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// True when the rate is above 100%.
    #[inline]
    pub const fn exceeds_hundred(&self) -> bool {
        self.0 > Self::HUNDRED.0
    }
}

impl TryFrom<f64> for Percent {
    type Error = ValidationError;

    fn try_from(pct: f64) -> Result<Self, Self::Error> {
        Percent::from_percentage(pct)
    }
}

impl From<Percent> for f64 {
    fn from(pct: Percent) -> f64 {
        pct.percentage()
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 100 == 0 {
            write!(f, "{}%", self.0 / 100)
        } else {
            write!(f, "{}%", self.percentage())
        }
    }
}

// =============================================================================
// Marketplace Segment
// =============================================================================

/// Which side of the marketplace an order belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum MarketplaceSegment {
    /// Consumer orders: commission only, no buyer-side fee.
    B2c,
    /// Business procurement: commission plus a buyer-side platform fee.
    B2b,
}

impl MarketplaceSegment {
    pub const ALL: [MarketplaceSegment; 2] = [MarketplaceSegment::B2c, MarketplaceSegment::B2b];
}

impl fmt::Display for MarketplaceSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketplaceSegment::B2c => write!(f, "b2c"),
            MarketplaceSegment::B2b => write!(f, "b2b"),
        }
    }
}

impl std::str::FromStr for MarketplaceSegment {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "b2c" => Ok(MarketplaceSegment::B2c),
            "b2b" => Ok(MarketplaceSegment::B2b),
            other => Err(ValidationError::InvalidFormat {
                field: "marketplace segment".to_string(),
                reason: format!("unknown segment '{}', expected b2c or b2b", other),
            }),
        }
    }
}

// =============================================================================
// Rule Type
// =============================================================================

/// Kind of commission rule.
///
/// Only `Default` has special meaning in resolution (it always loses to any
/// other matching rule); `Vendor` and `Category` rules may carry a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum RuleType {
    Default,
    Volume,
    Category,
    Vendor,
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleType::Default => write!(f, "default"),
            RuleType::Volume => write!(f, "volume"),
            RuleType::Category => write!(f, "category"),
            RuleType::Vendor => write!(f, "vendor"),
        }
    }
}

// =============================================================================
// Pricing Tier
// =============================================================================

/// One quantity band of a product's bulk pricing.
///
/// `price_per_item` is authoritative for billing. `discount_percent` is a
/// display value derived from the first tier's price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricingTier {
    pub min_qty: u32,

    /// `None` means unbounded ("50+").
    pub max_qty: Option<u32>,

    /// Absolute unit price in paise.
    pub price_per_item: Money,

    #[serde(default)]
    #[ts(as = "f64")]
    pub discount_percent: Percent,
}

impl PricingTier {
    pub fn new(min_qty: u32, max_qty: Option<u32>, price_per_item: Money) -> Self {
        PricingTier {
            min_qty,
            max_qty,
            price_per_item,
            discount_percent: Percent::zero(),
        }
    }

    /// Sets the display discount.
    pub fn with_discount(mut self, discount: Percent) -> Self {
        self.discount_percent = discount;
        self
    }

    #[inline]
    pub fn is_unbounded(&self) -> bool {
        self.max_qty.is_none()
    }

    /// True when `quantity` falls in `[min_qty, max_qty]` (inclusive).
    #[inline]
    pub fn contains(&self, quantity: u32) -> bool {
        quantity >= self.min_qty && self.max_qty.map_or(true, |max| quantity <= max)
    }

    /// Label shown on the product page: `"1-9"`, `"50+"`, or `"10"` for a
    /// single-quantity band.
    pub fn range_label(&self) -> String {
        match self.max_qty {
            None => format!("{}+", self.min_qty),
            Some(max) if max == self.min_qty => format!("{}", max),
            Some(max) => format!("{}-{}", self.min_qty, max),
        }
    }
}

// =============================================================================
// Commission Rule
// =============================================================================

/// A commission/platform-fee rule maintained in the admin console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CommissionRule {
    pub id: String,

    /// Label shown in the admin console.
    #[serde(default)]
    pub name: Option<String>,

    pub rule_type: RuleType,

    #[serde(alias = "marketplaceType")]
    pub marketplace_segment: MarketplaceSegment,

    /// Vendor-side deduction.
    #[ts(as = "f64")]
    pub commission_percent: Percent,

    /// Buyer-side fee, only charged on B2B orders.
    #[serde(default)]
    #[ts(as = "Option<f64>")]
    pub platform_fee_percent: Option<Percent>,

    #[serde(rename = "orderValueMinPaise", default)]
    pub order_value_min: Money,

    /// `None` means no upper bound.
    #[serde(rename = "orderValueMaxPaise", default)]
    pub order_value_max: Option<Money>,

    pub is_active: bool,

    /// Informational only; rules are never re-evaluated by date.
    #[ts(as = "String")]
    pub effective_from: DateTime<Utc>,

    /// Target vendor for `vendor` rules.
    #[serde(default)]
    pub vendor_id: Option<String>,

    /// Target category for `category` rules.
    #[serde(default)]
    pub category_id: Option<String>,
}

impl CommissionRule {
    /// Creates an active rule covering `[0, ∞)` with no platform fee and no
    /// target.
    pub fn new(
        id: impl Into<String>,
        rule_type: RuleType,
        marketplace_segment: MarketplaceSegment,
        commission_percent: Percent,
        effective_from: DateTime<Utc>,
    ) -> Self {
        CommissionRule {
            id: id.into(),
            name: None,
            rule_type,
            marketplace_segment,
            commission_percent,
            platform_fee_percent: None,
            order_value_min: Money::zero(),
            order_value_max: None,
            is_active: true,
            effective_from,
            vendor_id: None,
            category_id: None,
        }
    }

    pub fn with_platform_fee(mut self, fee: Percent) -> Self {
        self.platform_fee_percent = Some(fee);
        self
    }

    pub fn with_range(mut self, min: Money, max: Option<Money>) -> Self {
        self.order_value_min = min;
        self.order_value_max = max;
        self
    }

    pub fn for_vendor(mut self, vendor_id: impl Into<String>) -> Self {
        self.vendor_id = Some(vendor_id.into());
        self
    }

    pub fn for_category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    pub fn deactivated(mut self) -> Self {
        self.is_active = false;
        self
    }

    #[inline]
    pub fn is_default(&self) -> bool {
        self.rule_type == RuleType::Default
    }

    /// True when `value` lies in `[min, max]` inclusive, max unbounded if unset.
    #[inline]
    pub fn covers(&self, value: Money) -> bool {
        value >= self.order_value_min && self.order_value_max.map_or(true, |max| value <= max)
    }

    /// Width of the targeted value range, `None` for an unbounded range.
    ///
    /// Narrower ranges are more specific and win ties.
    #[inline]
    pub fn range_width(&self) -> Option<i64> {
        self.order_value_max
            .map(|max| max.paise() - self.order_value_min.paise())
    }
}

// =============================================================================
// Vendor Override
// =============================================================================

/// A negotiated commission rate for one vendor, set by an admin.
///
/// While in effect it replaces the commission percent of whatever rule would
/// otherwise apply. Unlike rules, overrides are windowed by date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct VendorOverride {
    pub id: String,
    pub vendor_id: String,

    #[ts(as = "f64")]
    pub commission_percent: Percent,

    /// Why the rate was negotiated, shown in the admin console.
    #[serde(default)]
    pub reason: Option<String>,

    pub is_active: bool,

    #[ts(as = "String")]
    pub effective_from: DateTime<Utc>,

    /// Exclusive end of the window; `None` runs until deactivated.
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub effective_until: Option<DateTime<Utc>>,
}

impl VendorOverride {
    /// Creates an active, open-ended override.
    pub fn new(
        id: impl Into<String>,
        vendor_id: impl Into<String>,
        commission_percent: Percent,
        effective_from: DateTime<Utc>,
    ) -> Self {
        VendorOverride {
            id: id.into(),
            vendor_id: vendor_id.into(),
            commission_percent,
            reason: None,
            is_active: true,
            effective_from,
            effective_until: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn until(mut self, effective_until: DateTime<Utc>) -> Self {
        self.effective_until = Some(effective_until);
        self
    }

    pub fn deactivated(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// True when active and `effective_from <= as_of < effective_until`.
    pub fn is_in_effect(&self, as_of: DateTime<Utc>) -> bool {
        self.is_active
            && self.effective_from <= as_of
            && self.effective_until.map_or(true, |until| as_of < until)
    }
}

// =============================================================================
// Add-On
// =============================================================================

/// An optional extra attached to a product (gift wrap, custom print, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AddOn {
    #[serde(default)]
    pub id: String,

    pub name: String,

    /// Price per unit of the line, in paise.
    #[serde(rename = "pricePaise")]
    pub price: Money,

    pub minimum_order_quantity: u32,

    /// The customer must approve a proof before production.
    #[serde(alias = "requiresProof")]
    pub requires_proof_of_art: bool,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_from_bps() {
        let rate = Percent::from_bps(1250);
        assert_eq!(rate.bps(), 1250);
        assert!((rate.percentage() - 12.5).abs() < 0.001);
        assert_eq!(Percent::from_whole(18).bps(), 1800);
    }

    #[test]
    fn test_percent_display() {
        assert_eq!(Percent::from_whole(18).to_string(), "18%");
        assert_eq!(Percent::from_bps(1250).to_string(), "12.5%");
    }

    #[test]
    fn test_percent_serde_as_number() {
        let pct: Percent = serde_json::from_str("7.5").unwrap();
        assert_eq!(pct.bps(), 750);
        assert_eq!(serde_json::to_string(&pct).unwrap(), "7.5");
        assert!(serde_json::from_str::<Percent>("-2").is_err());
    }

    #[test]
    fn test_segment_parsing() {
        assert_eq!("b2c".parse::<MarketplaceSegment>().unwrap(), MarketplaceSegment::B2c);
        assert_eq!(" B2B ".parse::<MarketplaceSegment>().unwrap(), MarketplaceSegment::B2b);
        assert!("retail".parse::<MarketplaceSegment>().is_err());
    }

    #[test]
    fn test_tier_contains_and_label() {
        let tier = PricingTier::new(10, Some(49), Money::from_paise(45_000));
        assert!(tier.contains(10));
        assert!(tier.contains(49));
        assert!(!tier.contains(9));
        assert!(!tier.contains(50));
        assert_eq!(tier.range_label(), "10-49");

        let open = PricingTier::new(50, None, Money::from_paise(40_000));
        assert!(open.contains(u32::MAX));
        assert_eq!(open.range_label(), "50+");
    }

    #[test]
    fn test_rule_deserializes_storefront_json() {
        let json = r#"{
            "id": "r-b2b-default",
            "ruleType": "default",
            "marketplaceType": "b2b",
            "commissionPercent": 7,
            "platformFeePercent": 2,
            "orderValueMinPaise": 0,
            "orderValueMaxPaise": null,
            "isActive": true,
            "effectiveFrom": "2025-01-01T00:00:00Z"
        }"#;
        let rule: CommissionRule = serde_json::from_str(json).unwrap();
        assert_eq!(rule.marketplace_segment, MarketplaceSegment::B2b);
        assert_eq!(rule.platform_fee_percent, Some(Percent::from_whole(2)));
        assert_eq!(rule.range_width(), None);
        assert!(rule.covers(Money::from_paise(i64::MAX)));
        assert!(rule.vendor_id.is_none());
    }

    #[test]
    fn test_override_window() {
        use chrono::TimeZone;

        let from = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let until = Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap();
        let promo = VendorOverride::new("o1", "v42", Percent::from_whole(8), from).until(until);

        assert!(!promo.is_in_effect(from - chrono::Duration::seconds(1)));
        assert!(promo.is_in_effect(from));
        assert!(promo.is_in_effect(until - chrono::Duration::seconds(1)));
        assert!(!promo.is_in_effect(until));
        assert!(!promo.clone().deactivated().is_in_effect(from));
    }

    #[test]
    fn test_override_deserializes_admin_json() {
        let json = r#"{
            "id": "o1",
            "vendorId": "v42",
            "commissionPercent": 9.5,
            "reason": "Launch partner",
            "isActive": true,
            "effectiveFrom": "2025-03-01T00:00:00Z"
        }"#;
        let promo: VendorOverride = serde_json::from_str(json).unwrap();
        assert_eq!(promo.commission_percent.bps(), 950);
        assert_eq!(promo.reason.as_deref(), Some("Launch partner"));
        assert_eq!(promo.effective_until, None);
    }

    #[test]
    fn test_add_on_accepts_requires_proof_alias() {
        let json = r#"{
            "name": "Logo print",
            "pricePaise": 2500,
            "minimumOrderQuantity": 25,
            "requiresProof": true
        }"#;
        let add_on: AddOn = serde_json::from_str(json).unwrap();
        assert!(add_on.requires_proof_of_art);
        assert!(add_on.is_active);
        assert_eq!(add_on.price.paise(), 2500);
    }
}

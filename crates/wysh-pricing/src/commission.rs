//! # Commission Resolver
//!
//! Picks the one applicable commission rule for an order and splits the
//! order value between vendor, platform and buyer.
//!
//! ## Selection
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Rule Selection                                      │
//! │                                                                         │
//! │  rules ──► filter: active, segment, min ≤ value ≤ max, target          │
//! │                │                                                        │
//! │                ▼  most specific first                                   │
//! │          1. non-default before default                                  │
//! │          2. narrower value range before wider (unbounded is widest)    │
//! │          3. rule id ascending                                           │
//! │                │                                                        │
//! │                ▼                                                        │
//! │          CommissionBreakdown   or   NoApplicableCommissionRule         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Money Split
//! ```text
//!   B2C  buyer pays v │ vendor gets v - c        │ platform earns c
//!   B2B  buyer pays v + f │ vendor gets v - c    │ platform earns c + f
//! ```
//! Commission `c` is vendor-side and platform fee `f` is buyer-side. Both
//! are computed from `v` independently and rounded half-up on their own.
//!
//! Rules are scanned linearly; admin consoles hold tens of rules.
//!
//! ## Vendor Overrides
//! A negotiated [`VendorOverride`] in effect at the caller's `as_of` beats
//! every rule. Rule dates stay informational; only overrides are windowed.

use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use ts_rs::TS;

use crate::error::{PricingError, PricingResult, RuleViolation};
use crate::money::Money;
use crate::types::{CommissionRule, MarketplaceSegment, Percent, RuleType, VendorOverride};
use crate::validation::validate_percent;

// =============================================================================
// Query & Breakdown
// =============================================================================

/// What an order looks like to the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionQuery {
    pub segment: MarketplaceSegment,

    #[serde(rename = "orderValuePaise")]
    pub order_value: Money,

    /// Vendor fulfilling the order; unlocks rules targeted at that vendor.
    #[serde(default)]
    pub vendor_id: Option<String>,

    /// Category of the order's items; unlocks rules targeted at it.
    #[serde(default)]
    pub category_id: Option<String>,
}

impl CommissionQuery {
    pub fn new(segment: MarketplaceSegment, order_value: Money) -> Self {
        CommissionQuery {
            segment,
            order_value,
            vendor_id: None,
            category_id: None,
        }
    }

    pub fn vendor(mut self, vendor_id: impl Into<String>) -> Self {
        self.vendor_id = Some(vendor_id.into());
        self
    }

    pub fn category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }
}

/// The resolved rule and every amount derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CommissionBreakdown {
    /// The winning rule, snapshotted for the commission record.
    pub rule: CommissionRule,

    pub order_value: Money,

    /// Deducted from the vendor's proceeds.
    pub commission_amount: Money,

    /// Charged to the buyer on top of the order value. Always zero for B2C.
    pub platform_fee_amount: Money,

    pub vendor_receives: Money,
    pub platform_earns: Money,
    pub buyer_pays: Money,
}

// =============================================================================
// Resolution
// =============================================================================

/// Resolves the applicable rule for an untargeted order.
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use wysh_pricing::commission::resolve_commission;
/// use wysh_pricing::money::Money;
/// use wysh_pricing::types::{CommissionRule, MarketplaceSegment, Percent, RuleType};
///
/// let since = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
/// let rules = vec![CommissionRule::new(
///     "b2b-default",
///     RuleType::Default,
///     MarketplaceSegment::B2b,
///     Percent::from_whole(7),
///     since,
/// )
/// .with_platform_fee(Percent::from_whole(2))];
///
/// let value = Money::from_paise(100_000);
/// let split = resolve_commission(&rules, MarketplaceSegment::B2b, value).unwrap();
/// assert_eq!(split.commission_amount.paise(), 7_000);
/// assert_eq!(split.platform_fee_amount.paise(), 2_000);
/// assert_eq!(split.vendor_receives.paise(), 93_000);
/// assert_eq!(split.buyer_pays.paise(), 102_000);
/// assert_eq!(split.platform_earns.paise(), 9_000);
/// ```
pub fn resolve_commission(
    rules: &[CommissionRule],
    segment: MarketplaceSegment,
    order_value: Money,
) -> PricingResult<CommissionBreakdown> {
    resolve_commission_for(rules, &CommissionQuery::new(segment, order_value))
}

/// Resolves the applicable rule with vendor/category targeting.
///
/// A rule carrying a `vendor_id` or `category_id` only matches queries
/// naming the same vendor or category. Untargeted rules match every order.
///
/// ## Errors
/// `NoApplicableCommissionRule` when no active rule covers the order. This
/// blocks order finalization; it is never treated as zero commission.
pub fn resolve_commission_for(
    rules: &[CommissionRule],
    query: &CommissionQuery,
) -> PricingResult<CommissionBreakdown> {
    let rule = select_rule(rules, query).ok_or_else(|| {
        warn!(
            segment = %query.segment,
            order_value = query.order_value.paise(),
            rules = rules.len(),
            "No applicable commission rule"
        );
        PricingError::NoApplicableCommissionRule {
            segment: query.segment,
            order_value: query.order_value,
        }
    })?;

    debug!(
        rule_id = %rule.id,
        rule_type = %rule.rule_type,
        segment = %query.segment,
        order_value = query.order_value.paise(),
        "Selected commission rule"
    );

    Ok(breakdown(rule, query.order_value))
}

/// Returns the most specific matching rule, if any.
pub fn select_rule<'a>(
    rules: &'a [CommissionRule],
    query: &CommissionQuery,
) -> Option<&'a CommissionRule> {
    rules
        .iter()
        .filter(|rule| {
            rule.is_active
                && rule.marketplace_segment == query.segment
                && rule.covers(query.order_value)
                && targets_match(rule, query)
        })
        .min_by(|a, b| compare_specificity(a, b))
}

/// Orders rules most specific first.
///
/// Non-default before default, then narrower range, then `id` ascending so
/// equally specific rules always resolve the same way.
pub fn compare_specificity(a: &CommissionRule, b: &CommissionRule) -> Ordering {
    // (unbounded, width): any finite width sorts before an unbounded range
    let width_key = |rule: &CommissionRule| {
        let width = rule.range_width();
        (width.is_none(), width.unwrap_or(0))
    };

    a.is_default()
        .cmp(&b.is_default())
        .then_with(|| width_key(a).cmp(&width_key(b)))
        .then_with(|| a.id.cmp(&b.id))
}

fn targets_match(rule: &CommissionRule, query: &CommissionQuery) -> bool {
    let matches = |target: &Option<String>, actual: &Option<String>| match target {
        Some(wanted) => actual.as_deref() == Some(wanted.as_str()),
        None => true,
    };

    matches(&rule.vendor_id, &query.vendor_id) && matches(&rule.category_id, &query.category_id)
}

fn breakdown(rule: &CommissionRule, order_value: Money) -> CommissionBreakdown {
    let commission_amount = order_value.percentage(rule.commission_percent);

    let platform_fee_amount = match rule.marketplace_segment {
        MarketplaceSegment::B2c => Money::zero(),
        MarketplaceSegment::B2b => rule
            .platform_fee_percent
            .map(|fee| order_value.percentage(fee))
            .unwrap_or_default(),
    };

    CommissionBreakdown {
        rule: rule.clone(),
        order_value,
        commission_amount,
        platform_fee_amount,
        vendor_receives: order_value - commission_amount,
        platform_earns: commission_amount + platform_fee_amount,
        buyer_pays: order_value + platform_fee_amount,
    }
}

// =============================================================================
// Vendor Overrides
// =============================================================================

/// Resolves commission with negotiated vendor overrides taking precedence.
///
/// An override applies when the query names its vendor and it is in effect
/// at `as_of`. Among several, the latest `effective_from` wins, then the
/// lowest `id`. The override replaces only the commission percent: the B2B
/// platform fee still comes from the rule that would otherwise apply, or is
/// zero when none does.
///
/// Without an applicable override this is [`resolve_commission_for`].
///
/// ## Errors
/// - `Validation` when the applicable override's percent exceeds 100
/// - `NoApplicableCommissionRule` as for [`resolve_commission_for`]
pub fn resolve_commission_with_overrides(
    rules: &[CommissionRule],
    overrides: &[VendorOverride],
    query: &CommissionQuery,
    as_of: DateTime<Utc>,
) -> PricingResult<CommissionBreakdown> {
    let vendor_override = query
        .vendor_id
        .as_deref()
        .and_then(|vendor_id| active_override(overrides, vendor_id, as_of));

    let vendor_override = match vendor_override {
        Some(found) => found,
        None => return resolve_commission_for(rules, query),
    };

    validate_percent("override commission", vendor_override.commission_percent)?;

    let platform_fee = select_rule(rules, query).and_then(|rule| rule.platform_fee_percent);
    let rule = override_rule(vendor_override, query.segment, platform_fee);

    debug!(
        override_id = %vendor_override.id,
        vendor_id = %vendor_override.vendor_id,
        segment = %query.segment,
        order_value = query.order_value.paise(),
        "Applied vendor commission override"
    );

    Ok(breakdown(&rule, query.order_value))
}

/// The override in effect for `vendor_id` at `as_of`, most recent first.
pub fn active_override<'a>(
    overrides: &'a [VendorOverride],
    vendor_id: &str,
    as_of: DateTime<Utc>,
) -> Option<&'a VendorOverride> {
    overrides
        .iter()
        .filter(|o| o.vendor_id == vendor_id && o.is_in_effect(as_of))
        .max_by(|a, b| {
            a.effective_from
                .cmp(&b.effective_from)
                .then_with(|| b.id.cmp(&a.id))
        })
}

/// Snapshots an override as the rule recorded on the commission record.
fn override_rule(
    vendor_override: &VendorOverride,
    segment: MarketplaceSegment,
    platform_fee: Option<Percent>,
) -> CommissionRule {
    let reason = vendor_override.reason.as_deref().unwrap_or("Custom rate");
    let mut rule = CommissionRule::new(
        vendor_override.id.clone(),
        RuleType::Vendor,
        segment,
        vendor_override.commission_percent,
        vendor_override.effective_from,
    )
    .for_vendor(vendor_override.vendor_id.clone());
    rule.name = Some(format!("Vendor override: {}", reason));
    rule.platform_fee_percent = platform_fee;
    rule
}

/// One volume band as shown to a vendor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct VolumeRate {
    pub rule_id: String,

    #[serde(rename = "orderValueMinPaise")]
    pub order_value_min: Money,

    #[serde(rename = "orderValueMaxPaise")]
    pub order_value_max: Option<Money>,

    #[ts(as = "f64")]
    pub rate: Percent,
}

/// A vendor-facing summary of the commission a vendor currently pays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveRate {
    pub segment: MarketplaceSegment,

    /// Rate before volume discounts. `None` when the segment has no rule
    /// for this vendor, which resolution would reject.
    #[ts(as = "Option<f64>")]
    pub base_rate: Option<Percent>,

    /// Volume bands by ascending order value. Empty under an override.
    pub volume_rates: Vec<VolumeRate>,

    pub vendor_override: Option<VendorOverride>,
}

impl EffectiveRate {
    pub fn has_override(&self) -> bool {
        self.vendor_override.is_some()
    }
}

/// Summarizes the rates that apply to a vendor at `as_of`.
///
/// An override in effect is the whole answer. Otherwise the base rate comes
/// from the vendor's own rule, then its category's rule, then the default,
/// and every active volume rule of the segment is listed.
pub fn effective_rate(
    rules: &[CommissionRule],
    overrides: &[VendorOverride],
    segment: MarketplaceSegment,
    vendor_id: &str,
    category_id: Option<&str>,
    as_of: DateTime<Utc>,
) -> EffectiveRate {
    if let Some(found) = active_override(overrides, vendor_id, as_of) {
        return EffectiveRate {
            segment,
            base_rate: Some(found.commission_percent),
            volume_rates: Vec::new(),
            vendor_override: Some(found.clone()),
        };
    }

    let query = CommissionQuery {
        segment,
        order_value: Money::zero(),
        vendor_id: Some(vendor_id.to_string()),
        category_id: category_id.map(str::to_string),
    };
    let in_segment = |rule: &&CommissionRule| rule.is_active && rule.marketplace_segment == segment;

    let base_rate = rules
        .iter()
        .filter(in_segment)
        .filter(|rule| rule.rule_type != RuleType::Volume && targets_match(rule, &query))
        .min_by(|a, b| {
            base_rank(a.rule_type)
                .cmp(&base_rank(b.rule_type))
                .then_with(|| compare_specificity(a, b))
        })
        .map(|rule| rule.commission_percent);

    let mut volume_rates: Vec<VolumeRate> = rules
        .iter()
        .filter(in_segment)
        .filter(|rule| rule.rule_type == RuleType::Volume)
        .map(|rule| VolumeRate {
            rule_id: rule.id.clone(),
            order_value_min: rule.order_value_min,
            order_value_max: rule.order_value_max,
            rate: rule.commission_percent,
        })
        .collect();
    volume_rates.sort_by(|a, b| {
        a.order_value_min
            .cmp(&b.order_value_min)
            .then_with(|| a.rule_id.cmp(&b.rule_id))
    });

    EffectiveRate {
        segment,
        base_rate,
        volume_rates,
        vendor_override: None,
    }
}

fn base_rank(rule_type: RuleType) -> u8 {
    match rule_type {
        RuleType::Vendor => 0,
        RuleType::Category => 1,
        RuleType::Volume | RuleType::Default => 2,
    }
}

// =============================================================================
// Rule Set Validation
// =============================================================================

/// Reports configuration defects in an admin-maintained rule set.
///
/// Only segments that have at least one rule are checked for a default, so
/// a B2C-only marketplace is not flagged for lacking a B2B default.
pub fn validate_rules(rules: &[CommissionRule]) -> Vec<RuleViolation> {
    let mut violations = Vec::new();

    if rules.is_empty() {
        violations.push(RuleViolation::Empty);
        return violations;
    }

    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    for rule in rules {
        if !seen.insert(rule.id.as_str()) && reported.insert(rule.id.as_str()) {
            violations.push(RuleViolation::DuplicateId {
                rule_id: rule.id.clone(),
            });
        }
    }

    for rule in rules {
        if validate_percent("commission", rule.commission_percent).is_err() {
            violations.push(RuleViolation::PercentOutOfRange {
                rule_id: rule.id.clone(),
                field: "commission",
            });
        }
        let fee = rule.platform_fee_percent.unwrap_or_default();
        if validate_percent("platform fee", fee).is_err() {
            violations.push(RuleViolation::PercentOutOfRange {
                rule_id: rule.id.clone(),
                field: "platform fee",
            });
        }
        if rule.order_value_min.is_negative() {
            violations.push(RuleViolation::NegativeMinimum {
                rule_id: rule.id.clone(),
            });
        }
        if rule.order_value_max.is_some_and(|max| max < rule.order_value_min) {
            violations.push(RuleViolation::InvertedRange {
                rule_id: rule.id.clone(),
            });
        }

        let missing_target = match rule.rule_type {
            RuleType::Vendor => rule.vendor_id.is_none(),
            RuleType::Category => rule.category_id.is_none(),
            RuleType::Default | RuleType::Volume => false,
        };
        if missing_target {
            violations.push(RuleViolation::MissingTarget {
                rule_id: rule.id.clone(),
                rule_type: rule.rule_type,
            });
        }
    }

    for segment in MarketplaceSegment::ALL {
        if !rules.iter().any(|r| r.marketplace_segment == segment) {
            continue;
        }

        let defaults: Vec<&CommissionRule> = rules
            .iter()
            .filter(|r| r.is_active && r.is_default() && r.marketplace_segment == segment)
            .collect();

        match defaults.len() {
            0 => violations.push(RuleViolation::MissingDefault { segment }),
            1 => {}
            count => violations.push(RuleViolation::DuplicateDefault { segment, count }),
        }

        for rule in defaults {
            if !rule.order_value_min.is_zero() || rule.order_value_max.is_some() {
                violations.push(RuleViolation::DefaultNotCatchAll {
                    rule_id: rule.id.clone(),
                });
            }
        }
    }

    for violation in &violations {
        warn!(%violation, "Commission rule set problem");
    }
    violations
}

/// Validates and converts violations into a single error.
pub fn ensure_valid_rules(rules: &[CommissionRule]) -> PricingResult<()> {
    let violations = validate_rules(rules);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(PricingError::InvalidRuleSet { violations })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn since() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    fn day(month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, month, day, 0, 0, 0).unwrap()
    }

    fn rule(
        id: &str,
        rule_type: RuleType,
        segment: MarketplaceSegment,
        pct: u32,
    ) -> CommissionRule {
        CommissionRule::new(id, rule_type, segment, Percent::from_whole(pct), since())
    }

    fn resolve(
        rules: &[CommissionRule],
        segment: MarketplaceSegment,
        paise: i64,
    ) -> CommissionBreakdown {
        resolve_commission(rules, segment, Money::from_paise(paise)).unwrap()
    }

    fn b2c_rules() -> Vec<CommissionRule> {
        vec![
            rule("b2c-default", RuleType::Default, MarketplaceSegment::B2c, 18),
            rule("b2c-volume", RuleType::Volume, MarketplaceSegment::B2c, 12)
                .with_range(Money::from_paise(5_000_000), None),
        ]
    }

    #[test]
    fn test_volume_rule_beats_default() {
        let split = resolve(&b2c_rules(), MarketplaceSegment::B2c, 6_000_000);
        assert_eq!(split.rule.id, "b2c-volume");
        assert_eq!(split.commission_amount.paise(), 720_000);

        let split = resolve(&b2c_rules(), MarketplaceSegment::B2c, 4_999_999);
        assert_eq!(split.rule.id, "b2c-default");
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let rules = vec![
            rule("d", RuleType::Default, MarketplaceSegment::B2c, 18),
            rule("v", RuleType::Volume, MarketplaceSegment::B2c, 10)
                .with_range(Money::from_paise(1_000), Some(Money::from_paise(2_000))),
        ];
        for paise in [1_000, 2_000] {
            assert_eq!(resolve(&rules, MarketplaceSegment::B2c, paise).rule.id, "v");
        }
        assert_eq!(resolve(&rules, MarketplaceSegment::B2c, 2_001).rule.id, "d");
    }

    #[test]
    fn test_b2c_split_has_no_platform_fee() {
        let rules = vec![rule("d", RuleType::Default, MarketplaceSegment::B2c, 18)
            .with_platform_fee(Percent::from_whole(2))];
        let split = resolve(&rules, MarketplaceSegment::B2c, 100_000);
        assert_eq!(split.commission_amount.paise(), 18_000);
        assert_eq!(split.platform_fee_amount, Money::zero());
        assert_eq!(split.vendor_receives.paise(), 82_000);
        assert_eq!(split.platform_earns.paise(), 18_000);
        assert_eq!(split.buyer_pays.paise(), 100_000);
    }

    #[test]
    fn test_b2b_fee_is_independent_of_commission() {
        let rules = vec![rule("d", RuleType::Default, MarketplaceSegment::B2b, 7)
            .with_platform_fee(Percent::from_whole(2))];
        let split = resolve(&rules, MarketplaceSegment::B2b, 100_000);
        assert_eq!(split.commission_amount.paise(), 7_000);
        assert_eq!(split.platform_fee_amount.paise(), 2_000);
        assert_eq!(split.vendor_receives.paise(), 93_000);
        assert_eq!(split.buyer_pays.paise(), 102_000);
        assert_eq!(split.platform_earns.paise(), 9_000);
    }

    #[test]
    fn test_b2b_missing_fee_is_zero() {
        let rules = vec![rule("d", RuleType::Default, MarketplaceSegment::B2b, 7)];
        let split = resolve(&rules, MarketplaceSegment::B2b, 100_000);
        assert_eq!(split.platform_fee_amount, Money::zero());
        assert_eq!(split.buyer_pays.paise(), 100_000);
    }

    #[test]
    fn test_each_amount_rounds_independently() {
        // 333 × 7.5% = 24.975 → 25; 333 × 2.5% = 8.325 → 8
        let rules = vec![CommissionRule::new(
            "d",
            RuleType::Default,
            MarketplaceSegment::B2b,
            Percent::from_bps(750),
            since(),
        )
        .with_platform_fee(Percent::from_bps(250))];
        let split = resolve(&rules, MarketplaceSegment::B2b, 333);
        assert_eq!(split.commission_amount.paise(), 25);
        assert_eq!(split.platform_fee_amount.paise(), 8);
        assert_eq!(split.platform_earns.paise(), 33);
    }

    #[test]
    fn test_no_match_is_an_error_not_zero() {
        let rules = vec![rule("v", RuleType::Volume, MarketplaceSegment::B2c, 10)
            .with_range(Money::from_paise(10_000), None)];
        assert_eq!(
            resolve_commission(&rules, MarketplaceSegment::B2c, Money::from_paise(500)),
            Err(PricingError::NoApplicableCommissionRule {
                segment: MarketplaceSegment::B2c,
                order_value: Money::from_paise(500),
            })
        );

        // Rules for the other segment never apply
        let other = resolve_commission(&b2c_rules(), MarketplaceSegment::B2b, Money::zero());
        assert!(other.is_err());
    }

    #[test]
    fn test_inactive_rules_are_skipped() {
        let mut rules = b2c_rules();
        rules[1] = rules[1].clone().deactivated();
        let split = resolve(&rules, MarketplaceSegment::B2c, 6_000_000);
        assert_eq!(split.rule.id, "b2c-default");
    }

    #[test]
    fn test_narrower_range_wins_then_id() {
        let rules = vec![
            rule("wide", RuleType::Volume, MarketplaceSegment::B2c, 10)
                .with_range(Money::zero(), Some(Money::from_paise(100_000))),
            rule("narrow", RuleType::Volume, MarketplaceSegment::B2c, 9)
                .with_range(Money::from_paise(40_000), Some(Money::from_paise(60_000))),
            rule("open", RuleType::Volume, MarketplaceSegment::B2c, 8)
                .with_range(Money::from_paise(45_000), None),
        ];
        assert_eq!(resolve(&rules, MarketplaceSegment::B2c, 50_000).rule.id, "narrow");

        let tied = vec![
            rule("b", RuleType::Volume, MarketplaceSegment::B2c, 10)
                .with_range(Money::zero(), Some(Money::from_paise(100))),
            rule("a", RuleType::Category, MarketplaceSegment::B2c, 11)
                .with_range(Money::from_paise(50), Some(Money::from_paise(150))),
        ];
        assert_eq!(resolve(&tied, MarketplaceSegment::B2c, 75).rule.id, "a");
    }

    #[test]
    fn test_selection_ignores_input_order() {
        let mut rules = b2c_rules();
        let forward = resolve(&rules, MarketplaceSegment::B2c, 6_000_000);
        rules.reverse();
        let reversed = resolve(&rules, MarketplaceSegment::B2c, 6_000_000);
        assert_eq!(forward, reversed);
    }

    fn targeted_rules() -> Vec<CommissionRule> {
        vec![
            rule("default", RuleType::Default, MarketplaceSegment::B2c, 18),
            rule("vendor-42", RuleType::Vendor, MarketplaceSegment::B2c, 10).for_vendor("v42"),
            rule("cakes", RuleType::Category, MarketplaceSegment::B2c, 15).for_category("cakes"),
        ]
    }

    #[test]
    fn test_targeted_rules() {
        let rules = targeted_rules();
        let value = Money::from_paise(100_000);

        assert_eq!(resolve(&rules, MarketplaceSegment::B2c, 100_000).rule.id, "default");

        let query = CommissionQuery::new(MarketplaceSegment::B2c, value).vendor("v42");
        assert_eq!(resolve_commission_for(&rules, &query).unwrap().rule.id, "vendor-42");

        let query = CommissionQuery::new(MarketplaceSegment::B2c, value).category("cakes");
        assert_eq!(resolve_commission_for(&rules, &query).unwrap().rule.id, "cakes");

        let query = CommissionQuery::new(MarketplaceSegment::B2c, value).vendor("v7");
        assert_eq!(resolve_commission_for(&rules, &query).unwrap().rule.id, "default");
    }

    #[test]
    fn test_override_takes_precedence_over_rules() {
        let rules = targeted_rules();
        let overrides = vec![VendorOverride::new("o1", "v42", Percent::from_whole(5), day(3, 1))
            .with_reason("Launch partner")];
        let query =
            CommissionQuery::new(MarketplaceSegment::B2c, Money::from_paise(100_000)).vendor("v42");

        let split =
            resolve_commission_with_overrides(&rules, &overrides, &query, day(3, 15)).unwrap();
        assert_eq!(split.rule.id, "o1");
        assert_eq!(split.rule.name.as_deref(), Some("Vendor override: Launch partner"));
        assert_eq!(split.commission_amount.paise(), 5_000);
        assert_eq!(split.vendor_receives.paise(), 95_000);

        // Other vendors and untargeted orders fall through to the rules
        let other = CommissionQuery::new(MarketplaceSegment::B2c, Money::from_paise(100_000));
        let split =
            resolve_commission_with_overrides(&rules, &overrides, &other, day(3, 15)).unwrap();
        assert_eq!(split.rule.id, "default");
    }

    #[test]
    fn test_override_date_window() {
        let rules = targeted_rules();
        let overrides = vec![
            VendorOverride::new("o1", "v42", Percent::from_whole(5), day(3, 1)).until(day(4, 1)),
            VendorOverride::new("o2", "v42", Percent::from_whole(3), day(1, 1)).deactivated(),
        ];
        let query =
            CommissionQuery::new(MarketplaceSegment::B2c, Money::from_paise(100_000)).vendor("v42");
        let resolve_at = |as_of| {
            resolve_commission_with_overrides(&rules, &overrides, &query, as_of)
                .unwrap()
                .rule
                .id
        };

        assert_eq!(resolve_at(day(2, 28)), "vendor-42");
        assert_eq!(resolve_at(day(3, 1)), "o1");
        assert_eq!(resolve_at(day(4, 1)), "vendor-42");
    }

    #[test]
    fn test_most_recent_override_wins() {
        let overrides = vec![
            VendorOverride::new("b-old", "v42", Percent::from_whole(9), day(1, 15)),
            VendorOverride::new("c-new", "v42", Percent::from_whole(6), day(2, 1)),
            VendorOverride::new("a-new", "v42", Percent::from_whole(7), day(2, 1)),
            VendorOverride::new("other", "v7", Percent::from_whole(1), day(3, 1)),
        ];
        let found = active_override(&overrides, "v42", day(3, 1)).unwrap();
        assert_eq!(found.id, "a-new");

        let mut reversed = overrides.clone();
        reversed.reverse();
        assert_eq!(active_override(&reversed, "v42", day(3, 1)).unwrap().id, "a-new");

        assert_eq!(active_override(&overrides, "v42", day(1, 20)).unwrap().id, "b-old");
        assert!(active_override(&overrides, "v42", day(1, 1)).is_none());
    }

    #[test]
    fn test_override_keeps_b2b_platform_fee() {
        let rules = vec![rule("d", RuleType::Default, MarketplaceSegment::B2b, 7)
            .with_platform_fee(Percent::from_whole(2))];
        let overrides = vec![VendorOverride::new("o1", "v42", Percent::from_whole(4), since())];
        let query =
            CommissionQuery::new(MarketplaceSegment::B2b, Money::from_paise(100_000)).vendor("v42");

        let split =
            resolve_commission_with_overrides(&rules, &overrides, &query, day(6, 1)).unwrap();
        assert_eq!(split.commission_amount.paise(), 4_000);
        assert_eq!(split.platform_fee_amount.paise(), 2_000);
        assert_eq!(split.buyer_pays.paise(), 102_000);
        assert_eq!(split.platform_earns.paise(), 6_000);

        // An override applies even when no rule covers the order
        let split = resolve_commission_with_overrides(&[], &overrides, &query, day(6, 1)).unwrap();
        assert_eq!(split.platform_fee_amount, Money::zero());
        assert_eq!(split.commission_amount.paise(), 4_000);
    }

    #[test]
    fn test_override_above_hundred_rejected() {
        let overrides = vec![VendorOverride::new("o1", "v42", Percent::from_whole(150), since())];
        let query =
            CommissionQuery::new(MarketplaceSegment::B2c, Money::from_paise(100_000)).vendor("v42");
        assert!(matches!(
            resolve_commission_with_overrides(&targeted_rules(), &overrides, &query, day(6, 1)),
            Err(PricingError::Validation(_))
        ));
    }

    #[test]
    fn test_effective_rate_without_override() {
        let mut rules = targeted_rules();
        rules.push(
            rule("bulk-b", RuleType::Volume, MarketplaceSegment::B2c, 12)
                .with_range(Money::from_paise(5_000_000), None),
        );
        rules.push(
            rule("bulk-a", RuleType::Volume, MarketplaceSegment::B2c, 14)
                .with_range(Money::from_paise(1_000_000), Some(Money::from_paise(4_999_999))),
        );
        rules.push(rule("b2b", RuleType::Default, MarketplaceSegment::B2b, 7));

        let rate = effective_rate(&rules, &[], MarketplaceSegment::B2c, "v42", None, day(6, 1));
        assert!(!rate.has_override());
        assert_eq!(rate.base_rate, Some(Percent::from_whole(10)));
        let ids: Vec<&str> = rate.volume_rates.iter().map(|v| v.rule_id.as_str()).collect();
        assert_eq!(ids, vec!["bulk-a", "bulk-b"]);

        let rate =
            effective_rate(&rules, &[], MarketplaceSegment::B2c, "v7", Some("cakes"), day(6, 1));
        assert_eq!(rate.base_rate, Some(Percent::from_whole(15)));

        let rate = effective_rate(&rules, &[], MarketplaceSegment::B2c, "v7", None, day(6, 1));
        assert_eq!(rate.base_rate, Some(Percent::from_whole(18)));

        let rate = effective_rate(&[], &[], MarketplaceSegment::B2c, "v7", None, day(6, 1));
        assert_eq!(rate.base_rate, None);
    }

    #[test]
    fn test_effective_rate_with_override() {
        let overrides = vec![VendorOverride::new("o1", "v42", Percent::from_whole(5), day(3, 1))
            .until(day(4, 1))];

        let rate = effective_rate(
            &targeted_rules(),
            &overrides,
            MarketplaceSegment::B2c,
            "v42",
            None,
            day(3, 10),
        );
        assert!(rate.has_override());
        assert_eq!(rate.base_rate, Some(Percent::from_whole(5)));
        assert!(rate.volume_rates.is_empty());

        let expired = effective_rate(
            &targeted_rules(),
            &overrides,
            MarketplaceSegment::B2c,
            "v42",
            None,
            day(4, 10),
        );
        assert!(!expired.has_override());
        assert_eq!(expired.base_rate, Some(Percent::from_whole(10)));
    }

    #[test]
    fn test_validate_rules_clean_set() {
        assert!(validate_rules(&b2c_rules()).is_empty());
        assert!(ensure_valid_rules(&b2c_rules()).is_ok());
    }

    #[test]
    fn test_validate_rules_reports_defects() {
        let rules = vec![
            rule("d1", RuleType::Default, MarketplaceSegment::B2c, 18),
            rule("d2", RuleType::Default, MarketplaceSegment::B2c, 17)
                .with_range(Money::from_paise(100), None),
            rule("d1", RuleType::Vendor, MarketplaceSegment::B2c, 120),
            rule("bad-range", RuleType::Volume, MarketplaceSegment::B2b, 5)
                .with_range(Money::from_paise(500), Some(Money::from_paise(100))),
        ];
        let violations = validate_rules(&rules);
        assert_eq!(
            violations,
            vec![
                RuleViolation::DuplicateId {
                    rule_id: "d1".to_string()
                },
                RuleViolation::PercentOutOfRange {
                    rule_id: "d1".to_string(),
                    field: "commission"
                },
                RuleViolation::MissingTarget {
                    rule_id: "d1".to_string(),
                    rule_type: RuleType::Vendor
                },
                RuleViolation::InvertedRange {
                    rule_id: "bad-range".to_string()
                },
                RuleViolation::DuplicateDefault {
                    segment: MarketplaceSegment::B2c,
                    count: 2
                },
                RuleViolation::DefaultNotCatchAll {
                    rule_id: "d2".to_string()
                },
                RuleViolation::MissingDefault {
                    segment: MarketplaceSegment::B2b
                },
            ]
        );
        assert!(matches!(
            ensure_valid_rules(&rules),
            Err(PricingError::InvalidRuleSet { .. })
        ));
        assert_eq!(validate_rules(&[]), vec![RuleViolation::Empty]);
    }

    #[test]
    fn test_validate_rules_flags_platform_fee_over_hundred() {
        let rules = vec![rule("d", RuleType::Default, MarketplaceSegment::B2b, 7)
            .with_platform_fee(Percent::from_whole(101))];
        assert_eq!(
            validate_rules(&rules),
            vec![RuleViolation::PercentOutOfRange {
                rule_id: "d".to_string(),
                field: "platform fee"
            }]
        );
    }
}

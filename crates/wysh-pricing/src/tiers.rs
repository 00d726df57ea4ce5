//! # Tiered Pricing
//!
//! Validation and resolution of a product's quantity tiers.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Tier Lifecycle                                      │
//! │                                                                         │
//! │  Partner product form                                                   │
//! │       │  ProductPricingDraft (price- or discount-authoritative rows)   │
//! │       ▼                                                                 │
//! │  finalize() ──► validate() ──► Vec<TierViolation> (all of them)        │
//! │       │                                                                 │
//! │       ▼  valid Vec<PricingTier> stored with the product                 │
//! │                                                                         │
//! │  Checkout                                                               │
//! │       │  quantity from cart                                             │
//! │       ▼                                                                 │
//! │  resolve_price() ──► PriceQuote { tier, unit, line total, discount }   │
//! │                  └─► OutOfRangeQuantity                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use wysh_pricing::money::Money;
//! use wysh_pricing::tiers::{resolve_price, validate};
//! use wysh_pricing::types::PricingTier;
//!
//! let tiers = vec![
//!     PricingTier::new(1, Some(9), Money::from_paise(50_000)),
//!     PricingTier::new(10, Some(49), Money::from_paise(46_500)),
//!     PricingTier::new(50, None, Money::from_paise(43_500)),
//! ];
//! assert!(validate(&tiers).is_empty());
//!
//! let quote = resolve_price(&tiers, 12).unwrap();
//! assert_eq!(quote.unit_price.paise(), 46_500);
//! assert_eq!(quote.line_total.paise(), 558_000);
//! assert_eq!(quote.discount_applied_percent, 7);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::error::{PricingError, PricingResult, TierViolation};
use crate::money::{round_half_up, Money};
use crate::types::{Percent, PricingTier};
use crate::validation::{validate_percent, validate_price, validate_quantity};

// =============================================================================
// Tier Policy
// =============================================================================

/// Extra product-form rules on top of the structural checks.
///
/// The default policy enables none of them. The storefront's partner form
/// uses [`TierPolicy::storefront`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TierPolicy {
    /// First tier must start at quantity 1.
    pub require_first_tier_at_one: bool,

    /// Each tier must be strictly cheaper than the one before it.
    pub require_decreasing_prices: bool,

    /// Maximum number of tiers per product.
    pub max_tiers: Option<usize>,
}

impl TierPolicy {
    /// Rules enforced by the partner bulk-pricing form.
    pub const fn storefront() -> Self {
        TierPolicy {
            require_first_tier_at_one: true,
            require_decreasing_prices: true,
            max_tiers: Some(5),
        }
    }
}

// =============================================================================
// Validation
// =============================================================================

/// Validates a tier set with the default (structural-only) policy.
///
/// Returns every violation found; an empty vector means the set is valid.
///
/// ```rust
/// use wysh_pricing::error::TierViolation;
/// use wysh_pricing::money::Money;
/// use wysh_pricing::tiers::validate;
/// use wysh_pricing::types::PricingTier;
///
/// let gapped = vec![
///     PricingTier::new(1, Some(9), Money::from_paise(500)),
///     PricingTier::new(11, Some(49), Money::from_paise(450)),
/// ];
/// assert_eq!(
///     validate(&gapped),
///     vec![TierViolation::Gap { tier: 1, next: 2, from: 10, to: 10 }]
/// );
/// ```
pub fn validate(tiers: &[PricingTier]) -> Vec<TierViolation> {
    validate_with_policy(tiers, &TierPolicy::default())
}

/// Validates a tier set, applying `policy` after the structural checks.
///
/// ## Check Order
/// 1. non-empty
/// 2. per tier: `min_qty ≥ 1`, `min_qty ≤ max_qty`
/// 3. consecutive pairs: ascending, `max + 1 == next.min`
/// 4. at most one unbounded tier, and only in last position
/// 5. per tier: price ≥ 0, discount within 0-100%
/// 6. policy rules
pub fn validate_with_policy(tiers: &[PricingTier], policy: &TierPolicy) -> Vec<TierViolation> {
    let mut violations = Vec::new();

    if tiers.is_empty() {
        violations.push(TierViolation::Empty);
        return violations;
    }

    for (i, tier) in tiers.iter().enumerate() {
        if tier.min_qty < 1 {
            violations.push(TierViolation::MinBelowOne { tier: i + 1 });
        }
        if let Some(max_qty) = tier.max_qty {
            if max_qty < tier.min_qty {
                violations.push(TierViolation::MaxBelowMin {
                    tier: i + 1,
                    min_qty: tier.min_qty,
                    max_qty,
                });
            }
        }
    }

    for (i, pair) in tiers.windows(2).enumerate() {
        let (current, next) = (&pair[0], &pair[1]);
        // An unbounded tier before the end is reported by the unbounded check.
        let Some(max_qty) = current.max_qty else {
            continue;
        };

        if next.min_qty < current.min_qty {
            violations.push(TierViolation::NotAscending {
                tier: i + 1,
                next: i + 2,
            });
        } else if next.min_qty <= max_qty {
            let overlap_end = next.max_qty.map_or(max_qty, |m| m.min(max_qty));
            violations.push(TierViolation::Overlap {
                tier: i + 1,
                next: i + 2,
                from: next.min_qty,
                to: overlap_end.max(next.min_qty),
            });
        } else if next.min_qty - max_qty > 1 {
            violations.push(TierViolation::Gap {
                tier: i + 1,
                next: i + 2,
                from: max_qty + 1,
                to: next.min_qty - 1,
            });
        }
    }

    let unbounded: Vec<usize> = tiers
        .iter()
        .enumerate()
        .filter(|(_, t)| t.is_unbounded())
        .map(|(i, _)| i)
        .collect();
    if unbounded.len() > 1 {
        violations.push(TierViolation::MultipleUnbounded {
            count: unbounded.len(),
        });
    }
    for &i in unbounded.iter().filter(|&&i| i != tiers.len() - 1) {
        violations.push(TierViolation::UnboundedNotLast { tier: i + 1 });
    }

    for (i, tier) in tiers.iter().enumerate() {
        if validate_price(tier.price_per_item).is_err() {
            violations.push(TierViolation::NegativePrice { tier: i + 1 });
        }
        if validate_percent("discount", tier.discount_percent).is_err() {
            violations.push(TierViolation::DiscountOutOfRange { tier: i + 1 });
        }
    }

    if policy.require_first_tier_at_one && tiers[0].min_qty != 1 {
        violations.push(TierViolation::FirstTierNotAtOne {
            min_qty: tiers[0].min_qty,
        });
    }
    if policy.require_decreasing_prices {
        for (i, pair) in tiers.windows(2).enumerate() {
            if pair[1].price_per_item >= pair[0].price_per_item {
                violations.push(TierViolation::PriceNotDecreasing { tier: i + 2 });
            }
        }
    }
    if let Some(max) = policy.max_tiers {
        if tiers.len() > max {
            violations.push(TierViolation::TooManyTiers {
                count: tiers.len(),
                max,
            });
        }
    }

    if !violations.is_empty() {
        debug!(tiers = tiers.len(), violations = violations.len(), "Tier set rejected");
    }
    violations
}

/// Validates and converts violations into a single error.
pub fn ensure_valid(tiers: &[PricingTier], policy: &TierPolicy) -> PricingResult<()> {
    let violations = validate_with_policy(tiers, policy);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(PricingError::InvalidTiers { violations })
    }
}

// =============================================================================
// Resolution
// =============================================================================

/// The price of one cart line under a tier set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    /// The matched tier (a snapshot, safe to persist with the order).
    pub tier: PricingTier,

    pub quantity: u32,

    #[serde(rename = "unitPricePaise")]
    pub unit_price: Money,

    /// `unit_price × quantity`, exact.
    #[serde(rename = "lineTotalPaise")]
    pub line_total: Money,

    /// Discount versus the first tier, whole percent, display only.
    pub discount_applied_percent: i64,

    /// What the line would cost at first-tier price minus what it costs now.
    #[serde(rename = "savingsPaise")]
    pub savings: Money,
}

/// Resolves the unit price and line total for `quantity`.
///
/// Scans tiers in order and takes the first whose range contains the
/// quantity. Tiers are assumed validated; on an unvalidated set the first
/// match still wins.
///
/// ## Errors
/// - `InvalidQuantity` when `quantity` is 0
/// - `OutOfRangeQuantity` when no tier contains `quantity`
pub fn resolve_price(tiers: &[PricingTier], quantity: u32) -> PricingResult<PriceQuote> {
    validate_quantity(quantity).map_err(|_| PricingError::InvalidQuantity { quantity })?;

    let tier = tiers
        .iter()
        .find(|t| t.contains(quantity))
        .ok_or_else(|| PricingError::OutOfRangeQuantity {
            quantity,
            lowest_min_qty: tiers.iter().map(|t| t.min_qty).min(),
        })?;

    let unit_price = tier.price_per_item;
    let line_total = unit_price.multiply_quantity(quantity);

    let (discount_applied_percent, savings) = match tiers.first() {
        Some(base) => (
            derive_discount_percent(base.price_per_item, unit_price),
            (base.price_per_item.multiply_quantity(quantity) - line_total).floor_zero(),
        ),
        None => (0, Money::zero()),
    };

    debug!(
        quantity,
        tier = %tier.range_label(),
        unit_price = unit_price.paise(),
        line_total = line_total.paise(),
        "Resolved tier price"
    );

    Ok(PriceQuote {
        tier: tier.clone(),
        quantity,
        unit_price,
        line_total,
        discount_applied_percent,
        savings,
    })
}

/// Validates the tier set first, then resolves.
///
/// Live order flows use this; previews on a half-edited form use
/// [`resolve_price`] directly.
pub fn resolve_validated_price(
    tiers: &[PricingTier],
    quantity: u32,
    policy: &TierPolicy,
) -> PricingResult<PriceQuote> {
    ensure_valid(tiers, policy)?;
    resolve_price(tiers, quantity)
}

/// `round((base - price) / base × 100)`, or 0 when `base` is 0.
///
/// ```rust
/// use wysh_pricing::money::Money;
/// use wysh_pricing::tiers::derive_discount_percent;
///
/// assert_eq!(derive_discount_percent(Money::from_paise(500), Money::from_paise(435)), 13);
/// assert_eq!(derive_discount_percent(Money::zero(), Money::zero()), 0);
/// ```
pub fn derive_discount_percent(base: Money, price: Money) -> i64 {
    if base.paise() <= 0 {
        return 0;
    }
    round_half_up(
        (base.paise() as i128 - price.paise() as i128) * 100,
        base.paise() as i128,
    ) as i64
}

// =============================================================================
// Display Helpers
// =============================================================================

/// "Add N more to unlock X%" prompt for the product page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NextTierHint {
    pub tier: PricingTier,
    pub quantity_needed: u32,
    pub discount_percent: i64,
}

impl NextTierHint {
    pub fn message(&self) -> String {
        format!(
            "Add {} more item{} to unlock {}% discount!",
            self.quantity_needed,
            if self.quantity_needed > 1 { "s" } else { "" },
            self.discount_percent
        )
    }
}

/// Finds the next cheaper tier above `quantity`.
///
/// Returns `None` when `quantity` matches no tier or is already in the
/// cheapest reachable band.
pub fn next_tier_hint(tiers: &[PricingTier], quantity: u32) -> Option<NextTierHint> {
    let current = tiers.iter().find(|t| t.contains(quantity))?;
    let base = tiers.first()?;

    tiers
        .iter()
        .find(|t| t.min_qty > quantity && t.price_per_item < current.price_per_item)
        .map(|next| NextTierHint {
            tier: next.clone(),
            quantity_needed: next.min_qty - quantity,
            discount_percent: derive_discount_percent(base.price_per_item, next.price_per_item),
        })
}

/// Default four-band ladder offered during partner onboarding.
///
/// `1-9` at base price, then 7%, 13% and 20% off.
pub fn default_tiers(base_price: Money) -> Vec<PricingTier> {
    let band = |min_qty, max_qty, off: u32| {
        let discount = Percent::from_whole(off);
        PricingTier::new(min_qty, max_qty, discounted_price(base_price, discount))
            .with_discount(discount)
    };

    vec![
        band(1, Some(9), 0),
        band(10, Some(49), 7),
        band(50, Some(99), 13),
        band(100, None, 20),
    ]
}

/// `round(base × (1 - discount / 100))`, floored at 0.
fn discounted_price(base: Money, discount: Percent) -> Money {
    let remaining = Percent::HUNDRED.bps() as i128 - discount.bps() as i128;
    Money::from_paise(round_half_up(base.paise() as i128 * remaining, 10_000) as i64).floor_zero()
}

// =============================================================================
// Product Pricing Draft
// =============================================================================

/// How a tier row's price was entered in the product form.
///
/// Exactly one of price or discount is authoritative per row. The first
/// row resolves against the draft's base price; every later row resolves
/// against the first row's price, the same baseline `resolve_price` uses
/// for `discount_applied_percent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum TierPriceInput {
    /// The partner typed a unit price.
    Price {
        #[serde(rename = "pricePaise")]
        price: Money,
    },
    /// The partner typed a discount off the row's baseline.
    Discount {
        #[ts(as = "f64")]
        discount: Percent,
    },
}

/// One row of the bulk-pricing form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TierDraft {
    pub min_qty: u32,
    pub max_qty: Option<u32>,
    pub input: TierPriceInput,
}

/// Immutable pricing draft carried through the multi-step product wizard.
///
/// Each step returns a new draft; the engine only runs in
/// [`ProductPricingDraft::finalize`] at submit time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductPricingDraft {
    /// Regular single-unit price; the first row's discount is relative to it.
    #[serde(rename = "basePricePaise")]
    pub base_price: Money,
    pub tiers: Vec<TierDraft>,
}

impl ProductPricingDraft {
    pub fn new(base_price: Money) -> Self {
        ProductPricingDraft {
            base_price,
            tiers: Vec::new(),
        }
    }

    pub fn with_base_price(self, base_price: Money) -> Self {
        ProductPricingDraft { base_price, ..self }
    }

    pub fn with_tier(mut self, tier: TierDraft) -> Self {
        self.tiers.push(tier);
        self
    }

    /// Replaces the row at `index`; out-of-range indexes leave the draft as is.
    pub fn replace_tier(mut self, index: usize, tier: TierDraft) -> Self {
        if let Some(slot) = self.tiers.get_mut(index) {
            *slot = tier;
        }
        self
    }

    pub fn without_tier(mut self, index: usize) -> Self {
        if index < self.tiers.len() {
            self.tiers.remove(index);
        }
        self
    }

    /// Derives every row's price and display discount, then validates.
    ///
    /// The first row always carries a 0% discount. Stored discounts are
    /// re-derived from the resolved prices, so they match what
    /// [`resolve_price`] quotes.
    pub fn finalize(&self, policy: &TierPolicy) -> PricingResult<Vec<PricingTier>> {
        let first_price = match self.tiers.first() {
            Some(row) => row_price(row.input, self.base_price),
            None => self.base_price,
        };

        let tiers: Vec<PricingTier> = self
            .tiers
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let price = if index == 0 {
                    first_price
                } else {
                    row_price(row.input, first_price)
                };
                let derived = derive_discount_percent(first_price, price).clamp(0, 100);
                PricingTier::new(row.min_qty, row.max_qty, price)
                    .with_discount(Percent::from_whole(derived as u32))
            })
            .collect();

        ensure_valid(&tiers, policy)?;
        Ok(tiers)
    }
}

fn row_price(input: TierPriceInput, baseline: Money) -> Money {
    match input {
        TierPriceInput::Price { price } => price,
        TierPriceInput::Discount { discount } => discounted_price(baseline, discount),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

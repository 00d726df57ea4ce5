//! # Delivery Fees
//!
//! Order-value fee bands with a free-delivery threshold and an optional
//! distance surcharge.
//!
//! ## Default Schedule
//! ```text
//! ┌────────────────────────┬──────────┐
//! │  Cart subtotal         │  Fee     │
//! ├────────────────────────┼──────────┤
//! │  ₹0 - ₹999.99          │  ₹80     │
//! │  ₹1,000 - ₹2,499.99    │  ₹50     │
//! │  ₹2,500 - ₹4,999.99    │  ₹30     │
//! │  ₹5,000+               │  FREE    │
//! └────────────────────────┴──────────┘
//!   distance: ≤5 km free, ≤10 km ₹30, ≤20 km ₹70, beyond ₹150
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::error::{BandViolation, PricingError, PricingResult};
use crate::money::Money;

/// Free delivery from ₹5,000.
pub const DEFAULT_FREE_DELIVERY_THRESHOLD: Money = Money::from_paise(500_000);

// =============================================================================
// Schedule
// =============================================================================

/// One order-value band of the delivery fee schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryFeeBand {
    pub name: String,

    #[serde(rename = "orderValueMinPaise", default)]
    pub order_value_min: Money,

    /// `None` means no upper bound.
    #[serde(rename = "orderValueMaxPaise", default)]
    pub order_value_max: Option<Money>,

    #[serde(rename = "feePaise")]
    pub fee: Money,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl DeliveryFeeBand {
    pub fn new(name: impl Into<String>, min: Money, max: Option<Money>, fee: Money) -> Self {
        DeliveryFeeBand {
            name: name.into(),
            order_value_min: min,
            order_value_max: max,
            fee,
            is_active: true,
        }
    }

    #[inline]
    pub fn covers(&self, subtotal: Money) -> bool {
        subtotal >= self.order_value_min && self.order_value_max.map_or(true, |max| subtotal <= max)
    }
}

/// Fee bands plus the free-delivery threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryFeeSchedule {
    #[serde(rename = "freeThresholdPaise")]
    pub free_threshold: Money,
    pub bands: Vec<DeliveryFeeBand>,
}

impl Default for DeliveryFeeSchedule {
    fn default() -> Self {
        let rupees = Money::from_rupees;
        DeliveryFeeSchedule {
            free_threshold: DEFAULT_FREE_DELIVERY_THRESHOLD,
            bands: vec![
                DeliveryFeeBand::new(
                    "Up to ₹999",
                    Money::zero(),
                    Some(Money::from_paise(99_999)),
                    rupees(80),
                ),
                DeliveryFeeBand::new(
                    "₹1,000 - ₹2,499",
                    rupees(1_000),
                    Some(Money::from_paise(249_999)),
                    rupees(50),
                ),
                DeliveryFeeBand::new(
                    "₹2,500 - ₹4,999",
                    rupees(2_500),
                    Some(Money::from_paise(499_999)),
                    rupees(30),
                ),
                DeliveryFeeBand::new("₹5,000+", rupees(5_000), None, Money::zero()),
            ],
        }
    }
}

impl DeliveryFeeSchedule {
    /// Checks the active bands for gaps, overlaps and bad amounts.
    ///
    /// Bands are compared after sorting by minimum order value.
    pub fn validate(&self) -> Vec<BandViolation> {
        let mut violations = Vec::new();

        if self.free_threshold.is_negative() {
            violations.push(BandViolation::NegativeFreeThreshold);
        }

        let mut bands: Vec<&DeliveryFeeBand> = self.bands.iter().filter(|b| b.is_active).collect();
        if bands.is_empty() {
            violations.push(BandViolation::Empty);
            return violations;
        }
        bands.sort_by_key(|b| b.order_value_min);

        for band in &bands {
            if band.fee.is_negative() {
                violations.push(BandViolation::NegativeFee {
                    name: band.name.clone(),
                });
            }
            if band.order_value_max.is_some_and(|max| max < band.order_value_min) {
                violations.push(BandViolation::MaxBelowMin {
                    name: band.name.clone(),
                });
            }
        }

        for pair in bands.windows(2) {
            let (current, next) = (pair[0], pair[1]);
            let Some(max) = current.order_value_max else {
                violations.push(BandViolation::Overlap {
                    band: current.name.clone(),
                    next: next.name.clone(),
                });
                continue;
            };

            if next.order_value_min <= max {
                violations.push(BandViolation::Overlap {
                    band: current.name.clone(),
                    next: next.name.clone(),
                });
            } else if next.order_value_min > max + Money::from_paise(1) {
                violations.push(BandViolation::Gap {
                    band: current.name.clone(),
                    next: next.name.clone(),
                });
            }
        }

        violations
    }

    /// Validates and converts violations into a single error.
    pub fn ensure_valid(&self) -> PricingResult<()> {
        let violations = self.validate();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(PricingError::InvalidDeliverySchedule { violations })
        }
    }

    /// The first active band, by minimum order value, covering `subtotal`.
    pub fn band_for(&self, subtotal: Money) -> Option<&DeliveryFeeBand> {
        self.bands
            .iter()
            .filter(|b| b.is_active && b.covers(subtotal))
            .min_by_key(|b| b.order_value_min)
    }

    /// The next active band above `subtotal` with a lower fee, and how much
    /// more the cart needs to reach it.
    pub fn next_cheaper_band(&self, subtotal: Money) -> Option<(&DeliveryFeeBand, Money)> {
        let current = self.band_for(subtotal)?;
        self.bands
            .iter()
            .filter(|b| b.is_active && b.order_value_min > subtotal && b.fee < current.fee)
            .min_by_key(|b| b.order_value_min)
            .map(|b| (b, b.order_value_min - subtotal))
    }
}

// =============================================================================
// Calculation
// =============================================================================

/// Delivery charge for one cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryQuote {
    /// Band fee plus distance surcharge.
    #[serde(rename = "feePaise")]
    pub fee: Money,

    #[serde(rename = "distanceSurchargePaise")]
    pub distance_surcharge: Money,

    pub is_free: bool,

    /// Zero once the free threshold is met.
    #[serde(rename = "amountNeededForFreePaise")]
    pub amount_needed_for_free: Money,

    pub message: String,
}

/// Surcharge for the delivery distance.
///
/// ```rust
/// use wysh_pricing::delivery::distance_surcharge;
///
/// assert_eq!(distance_surcharge(5.0).paise(), 0);
/// assert_eq!(distance_surcharge(5.1).paise(), 3_000);
/// assert_eq!(distance_surcharge(20.0).paise(), 7_000);
/// assert_eq!(distance_surcharge(42.0).paise(), 15_000);
/// ```
pub fn distance_surcharge(distance_km: f64) -> Money {
    if distance_km <= 5.0 {
        Money::zero()
    } else if distance_km <= 10.0 {
        Money::from_rupees(30)
    } else if distance_km <= 20.0 {
        Money::from_rupees(70)
    } else {
        Money::from_rupees(150)
    }
}

/// Computes the delivery fee for a cart subtotal.
///
/// Carts at or above the free threshold pay nothing, distance included.
///
/// ## Errors
/// `NoDeliveryTier` when no active band covers the subtotal.
pub fn calculate_delivery_fee(
    schedule: &DeliveryFeeSchedule,
    subtotal: Money,
    distance_km: Option<f64>,
) -> PricingResult<DeliveryQuote> {
    if subtotal >= schedule.free_threshold {
        return Ok(DeliveryQuote {
            fee: Money::zero(),
            distance_surcharge: Money::zero(),
            is_free: true,
            amount_needed_for_free: Money::zero(),
            message: "FREE Delivery".to_string(),
        });
    }

    let band = schedule
        .band_for(subtotal)
        .ok_or(PricingError::NoDeliveryTier { subtotal })?;

    let surcharge = distance_km.map(distance_surcharge).unwrap_or_default();
    let fee = band.fee + surcharge;
    let amount_needed = schedule.free_threshold - subtotal;

    debug!(
        subtotal = subtotal.paise(),
        band = %band.name,
        fee = fee.paise(),
        "Computed delivery fee"
    );

    Ok(DeliveryQuote {
        fee,
        distance_surcharge: surcharge,
        is_free: fee.is_zero(),
        amount_needed_for_free: amount_needed,
        message: format!("Add {} more for FREE delivery!", amount_needed),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Bulk Price Adjustment
//!
//! Previews of partner-initiated price changes across many products.
//!
//! ```text
//!   percentage  new = round(base × (1 ± value / 100))
//!   flat        new = base ± round(value × 100)
//!   both        floored at ₹0; no minimum sellable price here
//! ```
//!
//! A minimum sellable price is a caller policy; apply it on the rows this
//! module returns.

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::error::{PricingError, PricingResult, ValidationError};
use crate::money::{round_half_up, Money};
use crate::types::Percent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum AdjustOperation {
    Increase,
    Decrease,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum AdjustMode {
    /// `value` is a percent of the base price.
    Percentage,
    /// `value` is an amount in rupees.
    Flat,
}

/// Previews one adjusted price.
///
/// `value` comes straight from the form field: a percent in percentage mode,
/// rupees in flat mode. Non-finite or negative values are rejected, as are
/// values whose result does not fit in paise.
///
/// ```rust
/// use wysh_pricing::adjust::{preview_bulk_price_adjustment, AdjustMode, AdjustOperation};
/// use wysh_pricing::money::Money;
///
/// let base = Money::from_paise(50_000);
/// let up = preview_bulk_price_adjustment(
///     base,
///     AdjustOperation::Increase,
///     AdjustMode::Percentage,
///     10.0,
/// )
/// .unwrap();
/// assert_eq!(up.paise(), 55_000);
///
/// let down =
///     preview_bulk_price_adjustment(base, AdjustOperation::Decrease, AdjustMode::Flat, 600.0)
///         .unwrap();
/// assert_eq!(down.paise(), 0); // floored
/// ```
pub fn preview_bulk_price_adjustment(
    base: Money,
    operation: AdjustOperation,
    mode: AdjustMode,
    value: f64,
) -> PricingResult<Money> {
    let adjusted = match mode {
        AdjustMode::Percentage => {
            let rate = Percent::from_percentage(value)?;
            let hundred = Percent::HUNDRED.bps() as i128;
            let factor = match operation {
                AdjustOperation::Increase => hundred + rate.bps() as i128,
                AdjustOperation::Decrease => hundred - rate.bps() as i128,
            };
            let paise = round_half_up(base.paise() as i128 * factor, hundred);
            i64::try_from(paise)
                .map(Money::from_paise)
                .map_err(|_| out_of_range())?
        }
        AdjustMode::Flat => {
            let delta = Money::from_display_amount(value)?;
            if delta.is_negative() {
                return Err(ValidationError::MustBePositive {
                    field: "value".to_string(),
                }
                .into());
            }
            match operation {
                AdjustOperation::Increase => base.checked_add(delta),
                AdjustOperation::Decrease => base.checked_sub(delta),
            }
            .ok_or_else(out_of_range)?
        }
    };

    Ok(adjusted.floor_zero())
}

fn out_of_range() -> PricingError {
    ValidationError::OutOfRange {
        field: "value".to_string(),
        min: 0,
        max: i64::MAX,
    }
    .into()
}

// =============================================================================
// Bulk Update Over Products
// =============================================================================

/// Which price column a bulk update touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PriceTarget {
    Retail,
    Wholesale,
    Both,
}

impl PriceTarget {
    fn retail(self) -> bool {
        matches!(self, PriceTarget::Retail | PriceTarget::Both)
    }

    fn wholesale(self) -> bool {
        matches!(self, PriceTarget::Wholesale | PriceTarget::Both)
    }
}

/// Current prices of one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductPrices {
    pub product_id: String,
    pub name: String,
    #[serde(rename = "retailPaise")]
    pub retail: Money,
    #[serde(rename = "wholesalePaise", default)]
    pub wholesale: Option<Money>,
}

/// A partner's bulk price change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BulkPriceUpdate {
    pub operation: AdjustOperation,
    #[serde(rename = "type")]
    pub mode: AdjustMode,
    pub value: f64,
    pub apply_to: PriceTarget,
}

/// Before/after prices for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricePreviewRow {
    pub product_id: String,
    pub old_retail: Money,
    pub new_retail: Money,
    pub old_wholesale: Option<Money>,
    pub new_wholesale: Option<Money>,
}

/// A product the update could not be applied to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BulkUpdateFailure {
    pub product_id: String,
    pub product_name: String,
    pub error: String,
}

/// Outcome of previewing an update over a product selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BulkUpdatePreview {
    pub rows: Vec<PricePreviewRow>,
    pub failed: Vec<BulkUpdateFailure>,
}

impl BulkPriceUpdate {
    /// Previews the update over every product.
    ///
    /// A product without a wholesale price adjusts from its retail price when
    /// wholesale is targeted. Products whose new wholesale price would not be
    /// below retail are reported in `failed` instead of `rows`.
    ///
    /// ## Errors
    /// Fails up front (no partial preview) when `value` itself is invalid.
    pub fn preview(&self, products: &[ProductPrices]) -> PricingResult<BulkUpdatePreview> {
        // Rejects a bad value even for an empty selection
        self.adjust(Money::zero())?;

        let mut preview = BulkUpdatePreview::default();
        for product in products {
            let new_retail = if self.apply_to.retail() {
                self.adjust(product.retail)?
            } else {
                product.retail
            };

            let new_wholesale = if self.apply_to.wholesale() {
                Some(self.adjust(product.wholesale.unwrap_or(product.retail))?)
            } else {
                product.wholesale
            };

            if new_wholesale.is_some_and(|w| w >= new_retail) {
                preview.failed.push(BulkUpdateFailure {
                    product_id: product.product_id.clone(),
                    product_name: product.name.clone(),
                    error: "Wholesale price cannot be greater than or equal to retail price"
                        .to_string(),
                });
                continue;
            }

            preview.rows.push(PricePreviewRow {
                product_id: product.product_id.clone(),
                old_retail: product.retail,
                new_retail,
                old_wholesale: product.wholesale,
                new_wholesale,
            });
        }

        debug!(
            products = products.len(),
            updated = preview.rows.len(),
            failed = preview.failed.len(),
            "Previewed bulk price update"
        );
        Ok(preview)
    }

    fn adjust(&self, base: Money) -> PricingResult<Money> {
        preview_bulk_price_adjustment(base, self.operation, self.mode, self.value)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Checkout Estimate
//!
//! Assembles the numbers shown on the checkout sheet and printed on a
//! GST estimate.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Estimate Assembly                                   │
//! │                                                                         │
//! │  for each CartLine                                                      │
//! │     tiers + quantity ──► resolve_validated_price ──► items subtotal    │
//! │     selected add-ons ──► price_add_ons            ──► add-ons total    │
//! │                                                                         │
//! │  subtotal = items + add-ons                                             │
//! │  gst      = compute_gst(subtotal, rate)                                 │
//! │  delivery = calculate_delivery_fee(schedule, subtotal, distance)        │
//! │  total    = subtotal + gst.total + delivery.fee                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Delivery is charged on the goods subtotal and is not itself taxed.

use serde::{Deserialize, Serialize};
use tracing::info;
use ts_rs::TS;

use crate::addons::{price_add_ons, AddOnSelection};
use crate::delivery::{calculate_delivery_fee, DeliveryFeeSchedule, DeliveryQuote};
use crate::error::PricingResult;
use crate::money::Money;
use crate::tax::{compute_gst, GstBreakdown};
use crate::tiers::{resolve_validated_price, PriceQuote, TierPolicy};
use crate::types::{AddOn, Percent, PricingTier};
use crate::validation::validate_gstin;
use crate::{DEFAULT_GST_RATE, DEFAULT_HSN_CODE};

/// One product line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: String,
    pub tiers: Vec<PricingTier>,
    pub quantity: u32,

    /// Add-ons the customer picked for this line.
    #[serde(default)]
    pub add_ons: Vec<AddOn>,
}

/// Engine settings an estimate runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EstimateSettings {
    pub gst_rate: Percent,
    pub tier_policy: TierPolicy,
    pub delivery: DeliveryFeeSchedule,
}

impl Default for EstimateSettings {
    fn default() -> Self {
        EstimateSettings {
            gst_rate: DEFAULT_GST_RATE,
            tier_policy: TierPolicy::default(),
            delivery: DeliveryFeeSchedule::default(),
        }
    }
}

/// Priced cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineEstimate {
    pub product_id: String,
    pub hsn: String,
    pub price: PriceQuote,
    pub add_ons: AddOnSelection,

    /// Tier line total plus add-ons.
    #[serde(rename = "totalPaise")]
    pub total: Money,
}

/// Everything checkout displays before payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutEstimate {
    pub lines: Vec<LineEstimate>,

    #[serde(rename = "itemsSubtotalPaise")]
    pub items_subtotal: Money,

    #[serde(rename = "addOnsTotalPaise")]
    pub add_ons_total: Money,

    /// Taxable goods value: items plus add-ons.
    #[serde(rename = "subtotalPaise")]
    pub subtotal: Money,

    pub gst: GstBreakdown,
    pub delivery: DeliveryQuote,

    #[serde(rename = "grandTotalPaise")]
    pub grand_total: Money,

    /// Normalized buyer GSTIN for a business invoice.
    pub gstin: Option<String>,

    /// Some line needs an approved art proof before production.
    pub requires_proof_of_art: bool,
}

/// Builds a checkout estimate.
///
/// ## Errors
/// The first failing line aborts the estimate: `InvalidTiers`,
/// `OutOfRangeQuantity`, `InvalidQuantity` or `AddOnNotAvailable`. A
/// malformed GSTIN yields `Validation`; an uncovered subtotal yields
/// `NoDeliveryTier`.
pub fn estimate_checkout(
    lines: &[CartLine],
    settings: &EstimateSettings,
    distance_km: Option<f64>,
    gstin: Option<&str>,
) -> PricingResult<CheckoutEstimate> {
    let gstin = gstin.map(validate_gstin).transpose()?;

    let mut priced = Vec::with_capacity(lines.len());
    for line in lines {
        let price = resolve_validated_price(&line.tiers, line.quantity, &settings.tier_policy)?;
        let add_ons = price_add_ons(&line.add_ons, line.quantity)?;
        priced.push(LineEstimate {
            product_id: line.product_id.clone(),
            hsn: DEFAULT_HSN_CODE.to_string(),
            total: price.line_total + add_ons.total,
            price,
            add_ons,
        });
    }

    let items_subtotal: Money = priced.iter().map(|l| l.price.line_total).sum();
    let add_ons_total: Money = priced.iter().map(|l| l.add_ons.total).sum();
    let subtotal = items_subtotal + add_ons_total;

    let gst = compute_gst(subtotal, settings.gst_rate);
    let delivery = calculate_delivery_fee(&settings.delivery, subtotal, distance_km)?;
    let grand_total = subtotal + gst.total + delivery.fee;
    let requires_proof_of_art = priced.iter().any(|l| l.add_ons.requires_proof_of_art);

    info!(
        lines = priced.len(),
        subtotal = subtotal.paise(),
        gst = gst.total.paise(),
        delivery = delivery.fee.paise(),
        grand_total = grand_total.paise(),
        business_invoice = gstin.is_some(),
        "Built checkout estimate"
    );

    Ok(CheckoutEstimate {
        lines: priced,
        items_subtotal,
        add_ons_total,
        subtotal,
        gst,
        delivery,
        grand_total,
        gstin,
        requires_proof_of_art,
    })
}

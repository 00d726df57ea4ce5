//! # wysh-pricing: Pricing & Commission Engine for Wyshkit
//!
//! Tier pricing, commission resolution, GST and checkout math for the
//! Wyshkit gifting marketplace, as pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Wyshkit Marketplace                              │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌──────────────────┐  ┌──────────────────────┐   │
//! │  │ Partner forms   │  │ Admin console    │  │ Checkout             │   │
//! │  │ bulk tiers,     │  │ commission rules │  │ quantity, add-ons,   │   │
//! │  │ bulk updates    │  │                  │  │ GSTIN, distance      │   │
//! │  └────────┬────────┘  └────────┬─────────┘  └──────────┬───────────┘   │
//! │           │    plain data (tiers, rules, add-ons)      │               │
//! │  ┌────────▼───────────────────▼────────────────────────▼───────────┐   │
//! │  │               ★ wysh-pricing (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   tiers      commission     tax      adjust    delivery         │   │
//! │  │   addons     estimate       money    validation                 │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                ▲                                        │
//! │  ┌─────────────────────────────┴───────────────────────────────────┐   │
//! │  │  wysh-config: pricing.toml, JSON rule snapshots, tracing init   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money in integer paise, half-up rounding, Indian formatting
//! - [`types`] - Domain records (PricingTier, CommissionRule, VendorOverride, AddOn)
//! - [`tiers`] - Tier validation and quantity → unit price resolution
//! - [`commission`] - Rule selection, vendor overrides and money split
//! - [`tax`] - CGST/SGST split
//! - [`adjust`] - Bulk price adjustment previews
//! - [`addons`] - MOQ gating and add-on pricing
//! - [`delivery`] - Delivery fee bands and distance surcharge
//! - [`estimate`] - Checkout estimate assembly
//! - [`validation`] - Field-level checks (quantity, percent, GSTIN)
//! - [`error`] - Typed errors and violations
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input, same output; safe from any thread
//! 2. **Integer Money**: paise in i64, rates in basis points
//! 3. **Explicit Errors**: every failure is a typed `Err`, never a panic
//! 4. **Snapshots In**: callers pass `&[T]`; the engine never mutates them
//!
//! ## Example Usage
//!
//! ```rust
//! use wysh_pricing::money::Money;
//! use wysh_pricing::tax::compute_default_gst;
//!
//! let subtotal = Money::from_paise(100_000); // ₹1,000.00
//! let gst = compute_default_gst(subtotal);
//!
//! assert_eq!(gst.total.paise(), 18_000);
//! assert_eq!(gst.cgst.paise(), 9_000);
//! assert_eq!(gst.total.to_string(), "₹180.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod addons;
pub mod adjust;
pub mod commission;
pub mod delivery;
pub mod error;
pub mod estimate;
pub mod money;
pub mod tax;
pub mod tiers;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{
    BandViolation, PricingError, PricingResult, RuleViolation, TierViolation, ValidationError,
};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Standard GST rate for the marketplace's goods.
pub const DEFAULT_GST_RATE: Percent = Percent::from_whole(18);

/// HSN/SAC code printed on estimates.
pub const DEFAULT_HSN_CODE: &str = "9985";

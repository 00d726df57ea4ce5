//! # Error Types
//!
//! Domain-specific error types for wysh-pricing.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  wysh-pricing errors (this file)                                       │
//! │  ├── PricingError     - Resolution failures (what callers match on)    │
//! │  ├── ValidationError  - Field-level input failures                     │
//! │  ├── TierViolation    - One structural problem in a tier set           │
//! │  ├── RuleViolation    - One configuration problem in a rule set        │
//! │  └── BandViolation    - One problem in a delivery fee schedule         │
//! │                                                                         │
//! │  wysh-config errors (separate crate)                                   │
//! │  └── ConfigError      - File, TOML and JSON failures                   │
//! │                                                                         │
//! │  Flow: TierViolation[] → PricingError::InvalidTiers → partner form     │
//! │        NoApplicableCommissionRule → admin alert, order blocked         │
//! │        OutOfRangeQuantity → checkout "quantity not orderable"          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (tier index, rule ID, amounts)
//! 3. Errors are enum variants, never String
//! 4. Violations are collected, not short-circuited, so a form can show
//!    every problem at once

use thiserror::Error;

use crate::money::Money;
use crate::types::{MarketplaceSegment, RuleType};

// =============================================================================
// Pricing Error
// =============================================================================

/// Pricing engine errors.
///
/// Every failure of the engine is one of these variants, returned as an
/// explicit `Err`. Callers pattern-match to render a context-appropriate
/// message instead of relying on a generic catch-all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    /// The tier set failed structural validation.
    ///
    /// ## When This Occurs
    /// - A partner saved tiers with a gap or an overlap
    /// - A finalized product draft is submitted with broken tiers
    #[error("Invalid pricing tiers: {}", join_messages(.violations))]
    InvalidTiers { violations: Vec<TierViolation> },

    /// Quantity is zero.
    #[error("Quantity must be at least 1, got {quantity}")]
    InvalidQuantity { quantity: u32 },

    /// Requested quantity falls outside every tier's range.
    ///
    /// ## User Workflow
    /// ```text
    /// Checkout: qty 2 on a product whose tiers start at 10
    ///      │
    ///      ▼
    /// resolve_price() → OutOfRangeQuantity { quantity: 2, lowest_min_qty: Some(10) }
    ///      │
    ///      ▼
    /// UI shows: "Minimum order is 10" and blocks submission
    /// ```
    #[error("Quantity {quantity} is not orderable for this product")]
    OutOfRangeQuantity {
        quantity: u32,
        lowest_min_qty: Option<u32>,
    },

    /// No active rule matched the segment and order value.
    ///
    /// This is an admin configuration defect (missing catch-all default),
    /// never silently treated as zero commission.
    #[error("No applicable {segment} commission rule for order value {order_value}")]
    NoApplicableCommissionRule {
        segment: MarketplaceSegment,
        order_value: Money,
    },

    /// The commission rule set failed configuration checks.
    #[error("Invalid commission rules: {}", join_messages(.violations))]
    InvalidRuleSet { violations: Vec<RuleViolation> },

    /// No delivery fee band covers the cart subtotal.
    #[error("No delivery fee tier covers subtotal {subtotal}")]
    NoDeliveryTier { subtotal: Money },

    /// The delivery fee schedule has gaps, overlaps or bad amounts.
    #[error("Invalid delivery fee schedule: {}", join_messages(.violations))]
    InvalidDeliverySchedule { violations: Vec<BandViolation> },

    /// A selected add-on is inactive or its minimum order quantity is not met.
    #[error("Add-on '{name}' needs at least {minimum_order_quantity} items, line has {quantity}")]
    AddOnNotAvailable {
        name: String,
        quantity: u32,
        minimum_order_quantity: u32,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Field-level checks on individual values (percentages, GSTIN, amounts).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., malformed GSTIN, non-finite amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Tier Violations
// =============================================================================

/// A single structural problem in a pricing tier set.
///
/// Tier positions are 1-based so messages match what the partner sees in
/// the product form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TierViolation {
    #[error("At least one pricing tier is required")]
    Empty,

    #[error("Tier {tier}: minimum quantity must be at least 1")]
    MinBelowOne { tier: usize },

    #[error("Tier {tier}: max quantity {max_qty} is below min quantity {min_qty}")]
    MaxBelowMin {
        tier: usize,
        min_qty: u32,
        max_qty: u32,
    },

    #[error("Tier {next} starts below tier {tier}; tiers must be sorted by minimum quantity")]
    NotAscending { tier: usize, next: usize },

    /// Quantities `from..=to` are not covered by any tier.
    #[error("Gap between tier {tier} and tier {next}: quantities {from}-{to} are not covered")]
    Gap {
        tier: usize,
        next: usize,
        from: u32,
        to: u32,
    },

    /// Quantities `from..=to` are covered by both tiers.
    #[error(
        "Overlap between tier {tier} and tier {next}: quantities {from}-{to} are covered twice"
    )]
    Overlap {
        tier: usize,
        next: usize,
        from: u32,
        to: u32,
    },

    #[error("Only one tier may have no maximum quantity, found {count}")]
    MultipleUnbounded { count: usize },

    #[error("Tier {tier}: only the last tier may have no maximum quantity")]
    UnboundedNotLast { tier: usize },

    #[error("Tier {tier}: price cannot be negative")]
    NegativePrice { tier: usize },

    #[error("Tier {tier}: discount must be between 0% and 100%")]
    DiscountOutOfRange { tier: usize },

    // Policy checks (opt-in, see `TierPolicy`)
    #[error("First pricing tier must start at quantity 1, starts at {min_qty}")]
    FirstTierNotAtOne { min_qty: u32 },

    #[error("Tier {tier}: price should be lower than the previous tier for bulk discount")]
    PriceNotDecreasing { tier: usize },

    #[error("Maximum {max} tiers allowed, found {count}")]
    TooManyTiers { count: usize, max: usize },
}

// =============================================================================
// Rule Violations
// =============================================================================

/// A single configuration problem in a commission rule set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleViolation {
    #[error("At least one commission rule is required")]
    Empty,

    #[error("Segment {segment} has no active default commission rule")]
    MissingDefault { segment: MarketplaceSegment },

    #[error("Segment {segment} has {count} active default rules, expected exactly one")]
    DuplicateDefault {
        segment: MarketplaceSegment,
        count: usize,
    },

    #[error("Default rule {rule_id} must cover every order value from 0 with no maximum")]
    DefaultNotCatchAll { rule_id: String },

    #[error("Rule {rule_id}: {field} percent must be between 0 and 100")]
    PercentOutOfRange {
        rule_id: String,
        field: &'static str,
    },

    #[error("Rule {rule_id}: order value max must not be below min")]
    InvertedRange { rule_id: String },

    #[error("Rule {rule_id}: order value min cannot be negative")]
    NegativeMinimum { rule_id: String },

    #[error("Rule {rule_id}: {rule_type} rule must name its target")]
    MissingTarget { rule_id: String, rule_type: RuleType },

    #[error("Rule id {rule_id} is used more than once")]
    DuplicateId { rule_id: String },
}

// =============================================================================
// Delivery Band Violations
// =============================================================================

/// A single problem in a delivery fee schedule, naming the bands involved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BandViolation {
    #[error("At least one delivery fee tier is required")]
    Empty,

    #[error("Delivery band \"{name}\": fee cannot be negative")]
    NegativeFee { name: String },

    #[error("Delivery band \"{name}\": max value must not be below min value")]
    MaxBelowMin { name: String },

    #[error("Gap between delivery bands \"{band}\" and \"{next}\"")]
    Gap { band: String, next: String },

    #[error("Overlap between delivery bands \"{band}\" and \"{next}\"")]
    Overlap { band: String, next: String },

    #[error("Free delivery threshold cannot be negative")]
    NegativeFreeThreshold,
}

fn join_messages<T: ToString>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with PricingError.
pub type PricingResult<T> = Result<T, PricingError>;

// =============================================================================
// Unit Tests
// =============================================================================

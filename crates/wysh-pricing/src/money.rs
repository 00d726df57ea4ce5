//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Paise?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    500.00 × 0.18 = 90.00000000000001  ❌ WRONG!                         │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Paise                                            │
//! │    50000 paise × 1800 bps / 10000 = 9000 paise                          │
//! │    Rounding happens once, explicitly, half-up                           │
//! │                                                                         │
//! │  Display conversion (÷100, lakh grouping) only at the UI boundary      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use wysh_pricing::money::Money;
//!
//! // Create from paise (preferred)
//! let price = Money::from_paise(49_900); // ₹499.00
//!
//! // Arithmetic operations
//! let doubled = price * 2;                        // ₹998.00
//! let total = price + Money::from_paise(5_000);   // ₹549.00
//! assert_eq!(total.paise(), 54_900);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::Percent;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in paise (1/100 of a rupee).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative deltas (price decreases, refunds)
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Transparent serde**: Serializes as a bare integer, matching the
///   `...Paise` columns the storefront already stores
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[serde(transparent)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise.
    ///
    /// ```rust
    /// use wysh_pricing::money::Money;
    ///
    /// let price = Money::from_paise(1099); // ₹10.99
    /// assert_eq!(price.paise(), 1099);
    /// ```
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Creates a Money value from whole rupees.
    #[inline]
    pub const fn from_rupees(rupees: i64) -> Self {
        Money(rupees * 100)
    }

    /// Returns the value in paise.
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns the whole-rupee portion (truncated toward zero).
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the paise portion (always 0-99).
    #[inline]
    pub const fn paise_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Clamps negative values to zero.
    #[inline]
    pub const fn floor_zero(&self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            *self
        }
    }

    /// `self + other`, or `None` on overflow.
    #[inline]
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// `self - other`, or `None` on overflow.
    #[inline]
    pub fn checked_sub(self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }

    /// Returns `rate` percent of this amount, rounded half-up to the paisa.
    ///
    /// ## Implementation
    /// Integer math over basis points: `round(paise × bps / 10000)`.
    /// Intermediates are i128 so large order values cannot overflow.
    ///
    /// ```rust
    /// use wysh_pricing::money::Money;
    /// use wysh_pricing::types::Percent;
    ///
    /// let order = Money::from_paise(100_000);
    /// assert_eq!(order.percentage(Percent::from_bps(700)).paise(), 7_000);
    ///
    /// // 0.5 paisa rounds up
    /// assert_eq!(Money::from_paise(50).percentage(Percent::from_bps(100)).paise(), 1);
    /// ```
    pub fn percentage(&self, rate: Percent) -> Money {
        let scaled = round_half_up(self.0 as i128 * rate.bps() as i128, 10_000);
        Money(scaled as i64)
    }

    /// Multiplies money by a quantity.
    ///
    /// ```rust
    /// use wysh_pricing::money::Money;
    ///
    /// let unit_price = Money::from_paise(50_000);
    /// assert_eq!(unit_price.multiply_quantity(3).paise(), 150_000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0 * qty as i64)
    }

    /// Converts a display amount in rupees to paise.
    ///
    /// Rounds to the nearest paisa rather than truncating, so `10.999`
    /// becomes 1100 paise, not 1099.
    ///
    /// ```rust
    /// use wysh_pricing::money::Money;
    ///
    /// assert_eq!(Money::from_display_amount(10.99).unwrap().paise(), 1099);
    /// assert!(Money::from_display_amount(f64::NAN).is_err());
    /// assert!(Money::from_display_amount(1e17).is_err());
    /// ```
    pub fn from_display_amount(amount: f64) -> Result<Money, ValidationError> {
        if !amount.is_finite() {
            return Err(ValidationError::InvalidFormat {
                field: "amount".to_string(),
                reason: "must be a finite number".to_string(),
            });
        }

        let paise = (amount * 100.0).round();
        // i64::MAX as f64 rounds up to 2^63, which itself does not fit
        if paise.abs() >= i64::MAX as f64 {
            return Err(ValidationError::OutOfRange {
                field: "amount".to_string(),
                min: i64::MIN / 100,
                max: i64::MAX / 100,
            });
        }
        Ok(Money(paise as i64))
    }

    /// Converts paise to a rupee amount for display.
    #[inline]
    pub fn to_display_amount(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

/// Integer division rounding half toward positive infinity.
///
/// `den` must be positive. This is the engine's single rounding rule:
/// every computed amount goes through here independently.
pub(crate) fn round_half_up(num: i128, den: i128) -> i128 {
    debug_assert!(den > 0);
    (2 * num + den).div_euclid(2 * den)
}

/// Groups whole rupees the Indian way: last three digits, then pairs.
///
/// `252000` → `2,52,000`; `12345678` → `1,23,45,678`.
fn group_indian(rupees: u64) -> String {
    let digits = rupees.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Rupee formatting with Indian digit grouping, e.g. `₹2,52,000.00`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}₹{}.{:02}", sign, group_indian(abs / 100), abs % 100)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_paise() {
        let money = Money::from_paise(1099);
        assert_eq!(money.paise(), 1099);
        assert_eq!(money.rupees(), 10);
        assert_eq!(money.paise_part(), 99);
        assert_eq!(Money::from_rupees(5).paise(), 500);
    }

    #[test]
    fn test_display_uses_indian_grouping() {
        assert_eq!(Money::from_paise(0).to_string(), "₹0.00");
        assert_eq!(Money::from_paise(99_900).to_string(), "₹999.00");
        assert_eq!(Money::from_paise(500_000).to_string(), "₹5,000.00");
        assert_eq!(Money::from_paise(25_200_000).to_string(), "₹2,52,000.00");
        assert_eq!(Money::from_paise(1_234_567_899).to_string(), "₹1,23,45,678.99");
        assert_eq!(Money::from_paise(-550).to_string(), "-₹5.50");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_paise(1000);
        let b = Money::from_paise(500);

        assert_eq!((a + b).paise(), 1500);
        assert_eq!((a - b).paise(), 500);
        assert_eq!((a * 3).paise(), 3000);
        assert_eq!(vec![a, b, b].into_iter().sum::<Money>().paise(), 2000);
    }

    #[test]
    fn test_checked_arithmetic() {
        let a = Money::from_paise(1000);
        assert_eq!(a.checked_add(a), Some(Money::from_paise(2000)));
        assert_eq!(a.checked_sub(a), Some(Money::zero()));
        assert_eq!(Money::from_paise(i64::MAX).checked_add(Money::from_paise(1)), None);
        assert_eq!(Money::from_paise(i64::MIN).checked_sub(Money::from_paise(1)), None);
    }

    #[test]
    fn test_percentage_rounds_half_up() {
        // 1000 × 8.25% = 82.5 → 83
        let tax = Money::from_paise(1000).percentage(Percent::from_bps(825));
        assert_eq!(tax.paise(), 83);

        // 1001 × 18% = 180.18 → 180
        let tax = Money::from_paise(1001).percentage(Percent::from_bps(1800));
        assert_eq!(tax.paise(), 180);
    }

    #[test]
    fn test_round_half_up_helper() {
        assert_eq!(round_half_up(5, 2), 3); // 2.5 → 3
        assert_eq!(round_half_up(7, 2), 4); // 3.5 → 4
        assert_eq!(round_half_up(4, 3), 1); // 1.33 → 1
        assert_eq!(round_half_up(-5, 2), -2); // -2.5 → -2 (toward +∞)
    }

    #[test]
    fn test_display_amount_conversion() {
        assert_eq!(Money::from_display_amount(499.0).unwrap().paise(), 49_900);
        assert_eq!(Money::from_display_amount(10.999).unwrap().paise(), 1_100);
        assert_eq!(Money::from_display_amount(0.005).unwrap().paise(), 1);
        assert!(Money::from_display_amount(f64::INFINITY).is_err());
        assert!(matches!(
            Money::from_display_amount(1e17),
            Err(ValidationError::OutOfRange { .. })
        ));

        assert_eq!(Money::from_paise(1099).to_display_amount(), 10.99);
    }

    #[test]
    fn test_floor_zero() {
        assert_eq!(Money::from_paise(-1).floor_zero(), Money::zero());
        assert_eq!(Money::from_paise(7).floor_zero().paise(), 7);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        assert!(Money::from_paise(100).is_positive());
        assert!(Money::from_paise(-100).is_negative());
    }
}

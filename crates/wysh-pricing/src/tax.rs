//! # GST Calculations
//!
//! Splits Goods and Services Tax into its central (CGST) and state (SGST)
//! halves for intra-state invoices.
//!
//! ## Rounding
//! ```text
//!   total = round(subtotal × rate / 100)      half-up, to the paisa
//!   cgst  = round(total / 2)                  odd paisa lands here
//!   sgst  = total - cgst                      halves always sum to total
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::money::{round_half_up, Money};
use crate::types::Percent;
use crate::DEFAULT_GST_RATE;

/// GST on one subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct GstBreakdown {
    #[ts(as = "f64")]
    pub rate: Percent,
    pub cgst: Money,
    pub sgst: Money,
    pub total: Money,
}

/// Computes GST on `subtotal` at `rate`.
///
/// ```rust
/// use wysh_pricing::money::Money;
/// use wysh_pricing::tax::compute_gst;
/// use wysh_pricing::types::Percent;
///
/// let gst = compute_gst(Money::from_paise(100_000), Percent::from_whole(18));
/// assert_eq!(gst.total.paise(), 18_000);
/// assert_eq!(gst.cgst.paise(), 9_000);
/// assert_eq!(gst.sgst.paise(), 9_000);
/// ```
pub fn compute_gst(subtotal: Money, rate: Percent) -> GstBreakdown {
    let total = subtotal.percentage(rate);
    let cgst = Money::from_paise(round_half_up(total.paise() as i128, 2) as i64);
    let sgst = total - cgst;

    debug!(
        subtotal = subtotal.paise(),
        rate = %rate,
        total = total.paise(),
        "Computed GST"
    );

    GstBreakdown {
        rate,
        cgst,
        sgst,
        total,
    }
}

/// [`compute_gst`] at the standard 18% rate.
pub fn compute_default_gst(subtotal: Money) -> GstBreakdown {
    compute_gst(subtotal, DEFAULT_GST_RATE)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_total_splits_evenly() {
        let gst = compute_default_gst(Money::from_paise(100_000));
        assert_eq!(gst.total.paise(), 18_000);
        assert_eq!(gst.cgst.paise(), 9_000);
        assert_eq!(gst.sgst.paise(), 9_000);
        assert_eq!(gst.rate, Percent::from_whole(18));

        // 100001 × 18% = 18000.18 → 18000, still even
        let gst = compute_default_gst(Money::from_paise(100_001));
        assert_eq!(gst.total.paise(), 18_000);
        assert_eq!(gst.cgst, gst.sgst);
    }

    #[test]
    fn test_odd_total_extra_paisa_goes_to_cgst() {
        // 100005 × 18% = 18000.9 → 18001
        for _ in 0..100 {
            let gst = compute_default_gst(Money::from_paise(100_005));
            assert_eq!(gst.total.paise(), 18_001);
            assert_eq!(gst.cgst.paise(), 9_001);
            assert_eq!(gst.sgst.paise(), 9_000);
        }
    }

    #[test]
    fn test_zero_rate_and_zero_subtotal() {
        let gst = compute_gst(Money::from_paise(12_345), Percent::zero());
        assert_eq!(gst.total, Money::zero());
        assert_eq!(gst.cgst, Money::zero());

        let gst = compute_default_gst(Money::zero());
        assert_eq!(gst.total, Money::zero());
    }

    #[test]
    fn test_fractional_rate() {
        // 1000 × 12.5% = 125 → 63 + 62
        let gst = compute_gst(Money::from_paise(1_000), Percent::from_bps(1_250));
        assert_eq!(gst.total.paise(), 125);
        assert_eq!(gst.cgst.paise(), 63);
        assert_eq!(gst.sgst.paise(), 62);
    }
}

//! # Validation Module
//!
//! Field-level input validation shared by the calculators.
//!
//! Structural checks on whole tier sets and rule sets live next to the
//! resolvers that depend on them (`tiers::validate`,
//! `commission::validate_rules`); this module covers single values.
//!
//! ## Usage
//! ```rust
//! use wysh_pricing::validation::{validate_gstin, validate_quantity};
//!
//! validate_quantity(5).unwrap();
//! assert!(validate_gstin("27AAPFU0939F1ZV").is_ok());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::Percent;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const GSTIN_ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates an order quantity.
///
/// ## Rules
/// - Must be at least 1
pub fn validate_quantity(qty: u32) -> ValidationResult<()> {
    if qty == 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a price in paise.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free samples)
///
/// ```rust
/// use wysh_pricing::money::Money;
/// use wysh_pricing::validation::validate_price;
///
/// assert!(validate_price(Money::from_paise(49_900)).is_ok());
/// assert!(validate_price(Money::zero()).is_ok());
/// assert!(validate_price(Money::from_paise(-100)).is_err());
/// ```
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a percentage field (commission, discount, GST rate).
///
/// ## Rules
/// - Must be between 0% and 100%
pub fn validate_percent(field: &str, pct: Percent) -> ValidationResult<()> {
    if pct.exceeds_hundred() {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: 100,
        });
    }

    Ok(())
}

// =============================================================================
// GSTIN
// =============================================================================

/// Validates a GSTIN entered at checkout for a business invoice.
///
/// ## Format (15 characters)
/// ```text
///   27  AAPFU0939F  1  Z  V
///   │   │           │  │  └── checksum (mod-36)
///   │   │           │  └───── always 'Z'
///   │   │           └──────── entity number (1-9, A-Z)
///   │   └──────────────────── PAN: 5 letters, 4 digits, 1 letter
///   └──────────────────────── state code 01-38
/// ```
///
/// Input is trimmed and upper-cased; the normalized GSTIN is returned.
///
/// ```rust
/// use wysh_pricing::validation::validate_gstin;
///
/// assert_eq!(validate_gstin(" 27aapfu0939f1zv ").unwrap(), "27AAPFU0939F1ZV");
/// assert!(validate_gstin("27AAPFU0939F1ZX").is_err()); // bad checksum
/// ```
pub fn validate_gstin(gstin: &str) -> ValidationResult<String> {
    let gstin = gstin.trim().to_ascii_uppercase();

    if gstin.is_empty() {
        return Err(ValidationError::Required {
            field: "gstin".to_string(),
        });
    }

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "gstin".to_string(),
        reason: reason.to_string(),
    };

    let bytes = gstin.as_bytes();
    if bytes.len() != 15 || !bytes.iter().all(u8::is_ascii_alphanumeric) {
        return Err(invalid("must be 15 letters and digits"));
    }

    let state_code = gstin[0..2]
        .parse::<u8>()
        .map_err(|_| invalid("must start with a two-digit state code"))?;
    if !(1..=38).contains(&state_code) {
        return Err(invalid("state code must be between 01 and 38"));
    }

    let pan = &bytes[2..12];
    let pan_ok = pan[..5].iter().all(u8::is_ascii_alphabetic)
        && pan[5..9].iter().all(u8::is_ascii_digit)
        && pan[9].is_ascii_alphabetic();
    if !pan_ok {
        return Err(invalid("characters 3-12 must be a valid PAN"));
    }

    if bytes[12] == b'0' {
        return Err(invalid("entity number cannot be 0"));
    }

    if bytes[13] != b'Z' {
        return Err(invalid("character 14 must be 'Z'"));
    }

    if gstin_check_char(&bytes[..14]) != bytes[14] {
        return Err(invalid("checksum does not match"));
    }

    Ok(gstin)
}

/// Mod-36 check character over the first 14 characters.
fn gstin_check_char(body: &[u8]) -> u8 {
    let sum: u32 = body
        .iter()
        .enumerate()
        .map(|(i, ch)| {
            let value = GSTIN_ALPHABET
                .iter()
                .position(|c| c == ch)
                .unwrap_or(0) as u32;
            let product = value * if i % 2 == 0 { 1 } else { 2 };
            product / 36 + product % 36
        })
        .sum();

    GSTIN_ALPHABET[((36 - sum % 36) % 36) as usize]
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(10_000).is_ok());
        assert!(validate_quantity(0).is_err());
    }

    #[test]
    fn test_validate_percent() {
        assert!(validate_percent("commission", Percent::zero()).is_ok());
        assert!(validate_percent("commission", Percent::HUNDRED).is_ok());
        let err = validate_percent("commission", Percent::from_bps(10_001)).unwrap_err();
        assert_eq!(err.to_string(), "commission must be between 0 and 100");
    }

    #[test]
    fn test_validate_gstin() {
        assert!(validate_gstin("27AAPFU0939F1ZV").is_ok());
        assert!(validate_gstin("29AAGCB7383J1Z4").is_ok());

        assert!(validate_gstin("").is_err());
        assert!(validate_gstin("27AAPFU0939F1Z").is_err()); // too short
        assert!(validate_gstin("99AAPFU0939F1ZV").is_err()); // state code
        assert!(validate_gstin("27AAPF10939F1ZV").is_err()); // PAN shape
        assert!(validate_gstin("27AAPFU0939F1YV").is_err()); // missing Z
        assert!(validate_gstin("29ABCDE1234F1Z5").is_err()); // checksum
    }
}

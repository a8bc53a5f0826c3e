//! Money calculation utilities using rust_decimal for precision
//!
//! Prices are stored as `f64` (2-decimal currency); all arithmetic is done
//! through `Decimal` and converted back for storage/serialization.

use rust_decimal::prelude::*;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for gateway amount comparisons (1 currency unit)
pub const AMOUNT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 0);

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Line total: unit price x quantity
pub fn line_total(price: f64, qty: i64) -> Decimal {
    (to_decimal(price) * Decimal::from(qty))
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Order total: sum of line totals, as a storable f64
pub fn order_total<I>(lines: I) -> f64
where
    I: IntoIterator<Item = (f64, i64)>,
{
    let total: Decimal = lines.into_iter().map(|(price, qty)| line_total(price, qty)).sum();
    to_f64(total)
}

/// Whether a caller-supplied amount matches the computed total within
/// [`AMOUNT_TOLERANCE`]
pub fn amount_matches(expected: f64, actual: f64) -> bool {
    (to_decimal(expected) - to_decimal(actual)).abs() <= AMOUNT_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_decimal_precision() {
        // Classic floating point problem: 0.1 + 0.2 != 0.3
        let sum_f64 = 0.1_f64 + 0.2_f64;
        assert_ne!(sum_f64, 0.3);

        let sum_dec = to_decimal(0.1) + to_decimal(0.2);
        assert_eq!(to_f64(sum_dec), 0.3);
    }

    #[test]
    fn test_line_total() {
        assert_eq!(to_f64(line_total(100.0, 3)), 300.0);
        assert_eq!(to_f64(line_total(10.99, 3)), 32.97);
        assert_eq!(to_f64(line_total(0.0, 5)), 0.0);
    }

    #[test]
    fn test_order_total_accumulation() {
        // 100 lines at 0.01 each
        let lines = (0..100).map(|_| (0.01, 1));
        assert_eq!(order_total(lines), 1.0);
    }

    #[test]
    fn test_order_total_mixed() {
        let total = order_total(vec![(100.0, 3), (49.5, 2)]);
        assert_eq!(total, 399.0);
    }

    #[test]
    fn test_amount_matches_within_tolerance() {
        assert!(amount_matches(300.0, 300.0));
        assert!(amount_matches(301.0, 300.0));
        assert!(amount_matches(299.0, 300.0));
        assert!(!amount_matches(310.0, 300.0));
        assert!(!amount_matches(298.5, 300.0));
    }

    #[test]
    fn test_nan_becomes_zero() {
        assert_eq!(to_decimal(f64::NAN), Decimal::ZERO);
        assert_eq!(to_decimal(f64::INFINITY), Decimal::ZERO);
    }
}

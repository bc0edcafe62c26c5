//! Type-safe price representation using decimal arithmetic.

use core::fmt;

use rust_decimal::{Decimal, RoundingStrategy};

/// Symbol of the store currency. The upstream API has no other.
pub const CURRENCY_SYMBOL: &str = "$";

/// A price in the store currency.
///
/// The upstream API sends bare numbers with arbitrary precision; display
/// rounds half away from zero to cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Price(Decimal);

impl Price {
    /// Create a price from an amount in the currency's standard unit.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// The amount rounded to cents.
    #[must_use]
    pub fn rounded(&self) -> Decimal {
        self.0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }
}

/// Formats as symbol plus amount rounded to two decimal places (e.g., `$19.99`).
impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{CURRENCY_SYMBOL}{:.2}", self.rounded())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_pads_to_two_decimals() {
        assert_eq!(Price::new(Decimal::new(20, 0)).to_string(), "$20.00");
        assert_eq!(Price::new(Decimal::new(895, 1)).to_string(), "$89.50");
        assert_eq!(Price::new(Decimal::new(1999, 2)).to_string(), "$19.99");
    }

    #[test]
    fn test_display_rounds_extra_precision() {
        assert_eq!(Price::new(Decimal::new(9999, 3)).to_string(), "$10.00");
        assert_eq!(Price::new(Decimal::new(12345, 3)).to_string(), "$12.35");
        assert_eq!(Price::new(Decimal::new(12344, 3)).to_string(), "$12.34");
    }

    #[test]
    fn test_rounded_amount() {
        let price = Price::new(Decimal::new(9999, 3));
        assert_eq!(price.rounded(), Decimal::new(1000, 2));
    }
}

//! Type-safe price representation using decimal arithmetic.

use core::fmt;
use core::ops::Add;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price with currency information.
///
/// Amounts are in the currency's standard unit (dollars, not cents) and are
/// never stored as floating point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit.
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a price in the default currency (USD).
    #[must_use]
    pub const fn usd(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::USD)
    }

    /// Zero in the given currency.
    #[must_use]
    pub const fn zero(currency_code: CurrencyCode) -> Self {
        Self::new(Decimal::ZERO, currency_code)
    }

    /// Whether the amount is strictly greater than zero.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    /// Multiply by a line quantity.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self::new(self.amount * Decimal::from(quantity), self.currency_code)
    }

    /// Round half away from zero to whole cents.
    #[must_use]
    pub fn round_to_cents(self) -> Self {
        Self::new(
            self.amount
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
            self.currency_code,
        )
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self.round_to_cents().amount;
        format!("{}{rounded:.2}", self.currency_code.symbol())
    }
}

impl Add for Price {
    type Output = Self;

    /// Adds two prices. The left-hand currency wins; mixing currencies is a
    /// caller bug and is not converted.
    fn add(self, rhs: Self) -> Self::Output {
        debug_assert_eq!(self.currency_code, rhs.currency_code);
        Self::new(self.amount + rhs.amount, self.currency_code)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    /// Three-letter ISO code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_formats_two_places() {
        assert_eq!(Price::usd(Decimal::new(1999, 2)).display(), "$19.99");
        assert_eq!(Price::usd(Decimal::from(20)).display(), "$20.00");
        assert_eq!(
            Price::new(Decimal::new(5, 1), CurrencyCode::GBP).to_string(),
            "£0.50"
        );
    }

    #[test]
    fn test_times_and_add() {
        let unit = Price::usd(Decimal::new(8999, 2));
        let line = unit.times(2);
        assert_eq!(line.amount, Decimal::new(17998, 2));

        let total = line + Price::usd(Decimal::new(3999, 2));
        assert_eq!(total.amount, Decimal::new(21997, 2));
    }

    #[test]
    fn test_round_to_cents_half_away_from_zero() {
        let price = Price::usd(Decimal::new(12345, 3)); // 12.345
        assert_eq!(price.round_to_cents().amount, Decimal::new(1235, 2));
    }

    #[test]
    fn test_is_positive() {
        assert!(Price::usd(Decimal::ONE).is_positive());
        assert!(!Price::zero(CurrencyCode::USD).is_positive());
    }
}

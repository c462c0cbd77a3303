//! Money type for representing monetary values.
//!
//! Uses a fixed-point integer representation (millionths of the major unit)
//! so subtotals and totals are exact. Decimal numbers appear only where the backend API and
//! the persisted cart expect them.

use crate::error::CommerceError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Basis points in one whole (100%).
const BPS_SCALE: i128 = 10_000;

/// Internal units per major unit.
const MICROS_PER_UNIT: i64 = 1_000_000;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    /// Bangladeshi taka, the storefront's home currency.
    #[default]
    BDT,
    USD,
    EUR,
    GBP,
    INR,
}

impl Currency {
    /// Get the currency code (e.g., "BDT").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::BDT => "BDT",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::INR => "INR",
        }
    }

    /// Get the display symbol (e.g., "Tk").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::BDT => "Tk",
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
            Currency::GBP => "\u{00a3}",
            Currency::INR => "\u{20b9}",
        }
    }

    /// Get the number of decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        2
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "BDT" => Some(Currency::BDT),
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            "INR" => Some(Currency::INR),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary value with currency.
///
/// Amounts are held in millionths of the major unit, so a unit price such as
/// `0.125` survives exactly. Rounding to the currency's minor unit happens
/// only where a value is displayed or a rate is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in millionths of the major unit.
    pub amount_micros: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value from minor units (cents, paisa).
    ///
    /// Saturates at the representable range.
    pub fn new(minor_units: i64, currency: Currency) -> Self {
        Self::from_micros(minor_units.saturating_mul(micros_per_minor(currency)), currency)
    }

    /// Create a Money value from millionths of the major unit.
    pub fn from_micros(amount_micros: i64, currency: Currency) -> Self {
        Self {
            amount_micros,
            currency,
        }
    }

    /// Create a Money value from a decimal amount, kept to six decimal
    /// places.
    ///
    /// ```
    /// use shop_commerce::money::{Currency, Money};
    /// let price = Money::from_decimal(49.99, Currency::BDT);
    /// assert_eq!(price.minor_units(), 4999);
    /// assert_eq!(Money::from_decimal(0.125, Currency::BDT).amount_micros, 125_000);
    /// ```
    pub fn from_decimal(amount: f64, currency: Currency) -> Self {
        let amount_micros = (amount * MICROS_PER_UNIT as f64).round() as i64;
        Self::from_micros(amount_micros, currency)
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::from_micros(0, currency)
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount_micros == 0
    }

    /// Check if this is negative.
    pub fn is_negative(&self) -> bool {
        self.amount_micros < 0
    }

    /// The amount in minor units, rounded half away from zero.
    pub fn minor_units(&self) -> i64 {
        let rounded = div_round_half(
            i128::from(self.amount_micros),
            i128::from(micros_per_minor(self.currency)),
        );
        // |rounded| never exceeds |amount_micros|.
        rounded as i64
    }

    /// Convert to a decimal value at full precision.
    pub fn to_decimal(&self) -> f64 {
        self.amount_micros as f64 / MICROS_PER_UNIT as f64
    }

    /// Format as a display string (e.g., "Tk 157.50", "$49.99").
    pub fn display(&self) -> String {
        let symbol = self.currency.symbol();
        if symbol.chars().all(|c| c.is_ascii_alphabetic()) {
            format!("{} {}", symbol, self.display_amount())
        } else {
            format!("{}{}", symbol, self.display_amount())
        }
    }

    /// Format as a display string without symbol (e.g., "157.50").
    pub fn display_amount(&self) -> String {
        let places = self.currency.decimal_places();
        let divisor = 10_u64.pow(places);
        let minor = self.minor_units();
        let sign = if minor < 0 { "-" } else { "" };
        let abs = minor.unsigned_abs();
        format!(
            "{sign}{}.{:0width$}",
            abs / divisor,
            abs % divisor,
            width = places as usize
        )
    }

    /// Add another Money value, failing on currency mismatch or overflow.
    pub fn try_add(&self, other: &Money) -> Result<Money, CommerceError> {
        self.ensure_same_currency(other)?;
        self.amount_micros
            .checked_add(other.amount_micros)
            .map(|amount| Money::from_micros(amount, self.currency))
            .ok_or(CommerceError::Overflow)
    }

    /// Multiply by a quantity.
    pub fn try_multiply(&self, factor: i64) -> Result<Money, CommerceError> {
        self.amount_micros
            .checked_mul(factor)
            .map(|amount| Money::from_micros(amount, self.currency))
            .ok_or(CommerceError::Overflow)
    }

    /// Apply a rate given in basis points, rounding the result half-up to
    /// the nearest minor unit.
    ///
    /// The product is computed exactly, so `1500` bps of `50.00` is `7.50`
    /// and of `0.03` is `0.00` (0.0045 rounds down) while of `0.10` it is
    /// `0.02` (0.015 rounds up).
    pub fn apply_rate_bps(&self, bps: u32) -> Result<Money, CommerceError> {
        let per_minor = i128::from(micros_per_minor(self.currency));
        let exact = i128::from(self.amount_micros) * i128::from(bps);
        let minor = div_round_half(exact, BPS_SCALE * per_minor);
        i64::try_from(minor * per_minor)
            .map(|amount| Money::from_micros(amount, self.currency))
            .map_err(|_| CommerceError::Overflow)
    }

    /// Sum Money values in a single currency.
    pub fn try_sum<'a>(
        iter: impl IntoIterator<Item = &'a Money>,
        currency: Currency,
    ) -> Result<Money, CommerceError> {
        iter.into_iter()
            .try_fold(Money::zero(currency), |acc, m| acc.try_add(m))
    }

    fn ensure_same_currency(&self, other: &Money) -> Result<(), CommerceError> {
        if self.currency == other.currency {
            Ok(())
        } else {
            Err(CommerceError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: other.currency.code().to_string(),
            })
        }
    }
}

fn micros_per_minor(currency: Currency) -> i64 {
    MICROS_PER_UNIT / 10_i64.pow(currency.decimal_places())
}

/// `n / d` rounded half away from zero; `d` is positive.
fn div_round_half(n: i128, d: i128) -> i128 {
    let half = d / 2;
    if n >= 0 {
        (n + half) / d
    } else {
        -((-n + half) / d)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Serialize a [`Money`] as a bare decimal number, the shape the backend
/// API and the persisted cart use for prices.
pub mod decimal {
    use super::Money;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(money: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(money.to_decimal())
    }
}

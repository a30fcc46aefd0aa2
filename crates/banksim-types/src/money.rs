use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::MoneyError;

/// Number of nanos in one whole unit (10^9)
pub const NANOS_PER_UNIT: i32 = 1_000_000_000;

const SCALE: i64 = NANOS_PER_UNIT as i64;

/// Fixed-point currency amount: `units + nanos / 10^9` in `currency`.
///
/// Values coming off the wire are not necessarily canonical; arithmetic
/// always returns the normalized form where `0 <= nanos < 10^9`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub units: i64,
    #[serde(default)]
    pub nanos: i32,
}

impl Money {
    pub fn new(currency: impl Into<String>, units: i64, nanos: i32) -> Self {
        Money {
            currency: currency.into(),
            units,
            nanos,
        }
    }

    /// Create from whole units
    pub fn from_units(currency: impl Into<String>, units: i64) -> Self {
        Self::new(currency, units, 0)
    }

    /// Zero amount in the given currency
    pub fn zero(currency: impl Into<String>) -> Self {
        Self::new(currency, 0, 0)
    }

    /// True when both components are zero, regardless of currency
    pub const fn is_zero(&self) -> bool {
        self.units == 0 && self.nanos == 0
    }

    /// Canonical form of this value.
    ///
    /// Whole units hidden in `nanos` are carried first (truncating toward
    /// zero), then a negative remainder borrows one unit. `nanos = -1`
    /// therefore becomes `units - 1, nanos = 999_999_999`.
    pub fn normalize(&self) -> Result<Self, MoneyError> {
        normalize_parts(&self.currency, self.units, i64::from(self.nanos))
    }

    /// Checked addition of two values in the same currency
    pub fn checked_add(&self, other: &Money) -> Result<Self, MoneyError> {
        self.ensure_same_currency(other)?;
        let units = self
            .units
            .checked_add(other.units)
            .ok_or(MoneyError::Overflow)?;
        let nanos = i64::from(self.nanos) + i64::from(other.nanos);
        normalize_parts(&self.currency, units, nanos)
    }

    /// Checked subtraction; refuses to go below the subtrahend.
    ///
    /// Both operands are normalized first, so the lexicographic
    /// `(units, nanos)` funds check sees canonical values.
    pub fn checked_sub(&self, other: &Money) -> Result<Self, MoneyError> {
        self.ensure_same_currency(other)?;
        let lhs = self.normalize()?;
        let rhs = other.normalize()?;
        if (lhs.units, lhs.nanos) < (rhs.units, rhs.nanos) {
            return Err(MoneyError::InsufficientFunds);
        }
        let units = lhs
            .units
            .checked_sub(rhs.units)
            .ok_or(MoneyError::Overflow)?;
        let nanos = i64::from(lhs.nanos) - i64::from(rhs.nanos);
        normalize_parts(&self.currency, units, nanos)
    }

    /// True when the represented value is below zero, normalized or not
    pub fn is_negative(&self) -> bool {
        i128::from(self.units) * i128::from(SCALE) + i128::from(self.nanos) < 0
    }

    fn ensure_same_currency(&self, other: &Money) -> Result<(), MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch(
                self.currency.clone(),
                other.currency.clone(),
            ));
        }
        Ok(())
    }
}

fn normalize_parts(currency: &str, units: i64, nanos: i64) -> Result<Money, MoneyError> {
    let mut units = units;
    let mut nanos = nanos;

    if nanos.abs() >= SCALE {
        units = units
            .checked_add(nanos / SCALE)
            .ok_or(MoneyError::Overflow)?;
        nanos %= SCALE;
    }
    if nanos < 0 {
        units = units.checked_sub(1).ok_or(MoneyError::Overflow)?;
        nanos += SCALE;
    }

    Ok(Money {
        currency: currency.to_string(),
        units,
        nanos: i32::try_from(nanos).map_err(|_| MoneyError::Overflow)?,
    })
}

/// Add two optional amounts.
///
/// An absent operand is the identity: the other operand comes back
/// unchanged (not normalized).
pub fn add(a: Option<&Money>, b: Option<&Money>) -> Result<Option<Money>, MoneyError> {
    match (a, b) {
        (None, other) | (other, None) => Ok(other.cloned()),
        (Some(a), Some(b)) => a.checked_add(b).map(Some),
    }
}

/// Subtract `b` from `a`; see [`Money::checked_sub`].
pub fn subtract(a: &Money, b: &Money) -> Result<Money, MoneyError> {
    a.checked_sub(b)
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09} {}", self.units, self.nanos, self.currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_borrows_for_negative_nanos() {
        let m = Money::new("USD", 5, -1).normalize().unwrap();
        assert_eq!(m, Money::new("USD", 4, 999_999_999));
    }

    #[test]
    fn test_normalize_carries_overflowing_nanos() {
        let m = Money::new("USD", 1, 1_500_000_000).normalize().unwrap();
        assert_eq!(m, Money::new("USD", 2, 500_000_000));

        let m = Money::new("USD", 1, -1_500_000_000).normalize().unwrap();
        // -1.5e9 carries to units 0, nanos -5e8, then borrows
        assert_eq!(m, Money::new("USD", -1, 500_000_000));
    }

    #[test]
    fn test_add_with_absent_operand() {
        let a = Money::new("EUR", 3, -7);
        assert_eq!(add(Some(&a), None).unwrap(), Some(a.clone()));
        assert_eq!(add(None, Some(&a)).unwrap(), Some(a));
        assert_eq!(add(None, None).unwrap(), None);
    }

    #[test]
    fn test_add_carries_nanos() {
        let a = Money::new("USD", 1, 600_000_000);
        let b = Money::new("USD", 2, 700_000_000);
        assert_eq!(a.checked_add(&b).unwrap(), Money::new("USD", 4, 300_000_000));
    }

    #[test]
    fn test_currency_mismatch() {
        let usd = Money::from_units("USD", 1);
        let eur = Money::from_units("EUR", 1);
        assert_eq!(
            usd.checked_add(&eur),
            Err(MoneyError::CurrencyMismatch("USD".into(), "EUR".into()))
        );
        assert!(matches!(
            subtract(&usd, &eur),
            Err(MoneyError::CurrencyMismatch(_, _))
        ));
    }

    #[test]
    fn test_subtract_borrows() {
        let a = Money::new("USD", 10, 100);
        let b = Money::new("USD", 3, 200);
        assert_eq!(subtract(&a, &b).unwrap(), Money::new("USD", 6, 999_999_900));
    }

    #[test]
    fn test_subtract_insufficient() {
        let a = Money::from_units("USD", 100);
        assert_eq!(
            subtract(&a, &Money::from_units("USD", 101)),
            Err(MoneyError::InsufficientFunds)
        );
        assert_eq!(
            subtract(&a, &Money::new("USD", 100, 1)),
            Err(MoneyError::InsufficientFunds)
        );
        assert_eq!(subtract(&a, &a).unwrap(), Money::zero("USD"));
    }

    #[test]
    fn test_subtract_checks_funds_on_normalized_amount() {
        // 1.5 written with overflowing nanos
        let amount = Money::new("USD", 0, 1_500_000_000);
        assert_eq!(
            subtract(&Money::from_units("USD", 1), &amount),
            Err(MoneyError::InsufficientFunds)
        );
        assert_eq!(
            subtract(&Money::from_units("USD", 2), &amount).unwrap(),
            Money::new("USD", 0, 500_000_000)
        );
    }

    #[test]
    fn test_is_negative() {
        assert!(Money::new("USD", 0, -1).is_negative());
        assert!(Money::new("USD", -1, 500_000_000).is_negative());
        assert!(!Money::new("USD", 1, -999_999_999).is_negative());
        assert!(!Money::zero("USD").is_negative());
    }

    #[test]
    fn test_overflow_is_reported() {
        let a = Money::from_units("USD", i64::MAX);
        assert_eq!(
            a.checked_add(&Money::from_units("USD", 1)),
            Err(MoneyError::Overflow)
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::new("USD", 12, 5).to_string(), "12.000000005 USD");
    }
}

//! # Money Module
//!
//! Provides the `Money` type for menu prices, ticket lines and order totals.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  A ticket with 3 × 8.90 in floating point:                              │
//! │    8.9 * 3 = 26.700000000000003  ❌                                     │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    890 cents * 3 = 2670 cents                                           │
//! │    The ticket total always equals the sum of its lines                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use nova_core::money::Money;
//!
//! let pizza = Money::from_cents(1250); // 12.50
//! let line = pizza.multiply_quantity(2);
//! assert_eq!(line.cents(), 2500);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Where Money Flows
/// ```text
/// MenuItem.price_cents ──► OrderItem.unit_price_cents ──► line total
///                                                            │
///                                 Order.total ◄── Σ lines ◄──┘
///                                     │
///                                     └──► split_inclusive_tax ──► ticket footer
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// ## Example
    /// ```rust
    /// use nova_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(12, 50).cents(), 1250);
    /// assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
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
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit price by a line quantity, saturating at the
    /// `i64` bounds.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Splits a tax-inclusive amount into `(net, tax)`.
    ///
    /// Menu prices already include VAT, so the tax is extracted rather than
    /// added: `tax = round(total × bps / (10000 + bps))`.
    ///
    /// ## Example
    /// ```rust
    /// use nova_core::money::{Money, TaxRate};
    ///
    /// let total = Money::from_cents(2500);
    /// let (net, tax) = total.split_inclusive_tax(TaxRate::from_bps(2000));
    /// assert_eq!(tax.cents(), 417);
    /// assert_eq!(net.cents(), 2083);
    /// ```
    pub fn split_inclusive_tax(&self, rate: TaxRate) -> (Money, Money) {
        let bps = rate.bps() as i128;
        let divisor = 10_000 + bps;
        // Half-up rounding on the absolute value keeps refunds symmetric
        let magnitude = ((self.0 as i128).abs() * bps * 2 + divisor) / (divisor * 2);
        let tax = if self.0 < 0 { -magnitude } else { magnitude } as i64;
        (Money(self.0 - tax), Money(tax))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().unsigned_abs(), self.minor())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Tax Rate
// =============================================================================

/// VAT rate in basis points (2000 = 20%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a rate from a percentage (configuration input only).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl Default for TaxRate {
    /// French standard VAT.
    fn default() -> Self {
        TaxRate(2000)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1250).to_string(), "12.50");
        assert_eq!(Money::from_cents(600).to_string(), "6.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_sum_of_lines() {
        let lines = [
            Money::from_cents(1250).multiply_quantity(2),
            Money::from_cents(890).multiply_quantity(3),
        ];
        let total: Money = lines.iter().sum();
        assert_eq!(total.cents(), 2500 + 2670);
    }

    #[test]
    fn test_arithmetic_saturates() {
        let huge = Money::from_cents(i64::MAX / 2);
        assert_eq!(huge.multiply_quantity(999).cents(), i64::MAX);
        assert_eq!((huge + huge + huge).cents(), i64::MAX);
        assert_eq!((Money::from_cents(i64::MIN) - huge).cents(), i64::MIN);

        let total: Money = [huge, huge, Money::from_cents(1)].iter().sum();
        assert_eq!(total.cents(), i64::MAX);

        let (net, tax) = Money::from_cents(i64::MIN).split_inclusive_tax(TaxRate::from_bps(2000));
        assert!(tax.is_negative());
        assert!(net.is_negative());
    }

    #[test]
    fn test_split_inclusive_tax() {
        let (net, tax) = Money::from_cents(3750).split_inclusive_tax(TaxRate::default());
        assert_eq!(tax.cents(), 625);
        assert_eq!(net.cents(), 3125);
        assert_eq!((net + tax).cents(), 3750);
    }

    #[test]
    fn test_split_inclusive_tax_zero_rate() {
        let (net, tax) = Money::from_cents(999).split_inclusive_tax(TaxRate::from_bps(0));
        assert!(tax.is_zero());
        assert_eq!(net.cents(), 999);
    }

    #[test]
    fn test_split_inclusive_tax_negative() {
        let (net, tax) = Money::from_cents(-2500).split_inclusive_tax(TaxRate::default());
        assert_eq!(tax.cents(), -417);
        assert_eq!(net.cents(), -2083);
    }

    #[test]
    fn test_tax_rate_from_percentage() {
        assert_eq!(TaxRate::from_percentage(5.5).bps(), 550);
        assert!((TaxRate::from_bps(2000).percentage() - 20.0).abs() < f64::EPSILON);
    }
}

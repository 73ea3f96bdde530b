//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  On a ticket that feeds an end-of-day report, a cent that drifts       │
//! │  during entry shows up as a drawer that will not balance at close.     │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Every stored and transmitted amount is an i64 number of cents.      │
//! │    Conversion to dollars happens only at display time.                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rounding Policy
//! All fractional-cent results round half-up: `round(x) = floor(x + 0.5)`,
//! implemented in pure integer arithmetic. The same policy is used for tax
//! ([`Money::calculate_tax`]) and for the layaway inverse
//! ([`Money::strip_tax`]) so round trips stay deterministic. Both helpers
//! are defined over non-negative amounts; return-sign inversion is applied
//! by callers after rounding.
//!
//! ## Usage
//! ```rust
//! use bayou_core::money::Money;
//!
//! // Create from cents (preferred)
//! let price = Money::from_cents(1099); // $10.99
//!
//! // Arithmetic operations
//! let doubled = price * 2;            // $21.98
//! let total = price + Money::from_cents(500); // $15.99
//!
//! // NEVER do this:
//! // let bad = Money::from_float(10.99); // NO SUCH METHOD EXISTS!
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents for USD).
///
/// ## Design Decisions
/// - **i64 (signed)**: Return line items carry negative derived amounts
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support, so it serializes as a bare integer
///
/// ## Where Money Flows
/// ```text
/// LineItem.unit_price ──► pretax ──► tax ──► line total
///                                              │
/// Tender.amount ──► total paid ──► balance ◄───┘
///                                    │
///                          EOD report aggregation
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use bayou_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use bayou_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299); // $2.99
    /// let pretax = unit_price.multiply_quantity(3);
    /// assert_eq!(pretax.cents(), 897); // $8.97
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Calculates tax on this amount, rounding half-up to the nearest cent.
    ///
    /// ## Implementation
    /// Integer math with an i128 intermediate to prevent overflow:
    /// `(amount * bps + 5000) / 10000`. The +5000 term is the half-up
    /// rounding bias (5000/10000 = 0.5).
    ///
    /// Defined for non-negative amounts. The line item evaluator computes
    /// tax on the positive pretax amount and applies the return sign last,
    /// so a sale and its return always mirror to the cent.
    ///
    /// ## Example
    /// ```rust
    /// use bayou_core::money::Money;
    /// use bayou_core::types::TaxRate;
    ///
    /// let pretax = Money::from_cents(10000); // $100.00
    /// let rate = TaxRate::from_bps(825);     // 8.25%
    ///
    /// // $100.00 × 8.25% = $8.25
    /// assert_eq!(pretax.calculate_tax(rate).cents(), 825);
    ///
    /// // $10.00 × 8.25% = $0.825 → rounds up to $0.83
    /// let small = Money::from_cents(1000);
    /// assert_eq!(small.calculate_tax(rate).cents(), 83);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        let tax_cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(tax_cents as i64)
    }

    /// Back-computes the pretax portion of a tax-inclusive amount,
    /// rounding half-up: `round(amount / (1 + rate))`.
    ///
    /// This is the mathematical inverse of [`Money::calculate_tax`] and is
    /// what layaway deposits use: the customer names the post-tax total
    /// they want a payment to eventually cover, and the stored tender
    /// amount is the pretax figure derived here.
    ///
    /// ## One-cent tolerance
    /// Rounding is not exactly invertible for every rate. Re-applying
    /// `calculate_tax` to the result reproduces the original inclusive
    /// amount within ±1 cent; that is accepted behavior, not a defect.
    ///
    /// ## Example
    /// ```rust
    /// use bayou_core::money::Money;
    /// use bayou_core::types::TaxRate;
    ///
    /// let desired = Money::from_cents(5000); // customer puts down $50.00
    /// let rate = TaxRate::from_bps(825);
    ///
    /// // round(5000 / 1.0825) = 4619
    /// assert_eq!(desired.strip_tax(rate).cents(), 4619);
    /// ```
    pub fn strip_tax(&self, rate: TaxRate) -> Money {
        // round(a/b) half-up == floor((2a + b) / 2b), all in integers
        let denom = 10000i128 + rate.bps() as i128;
        let numer = self.0 as i128 * 10000;
        let pretax = (numer * 2 + denom) / (denom * 2);
        Money::from_cents(pretax as i64)
    }

    /// Splits a tax-inclusive amount into (pretax, tax) parts.
    ///
    /// The pretax part comes from [`Money::strip_tax`]; tax is the exact
    /// remainder, so the parts always re-add to the original amount.
    pub fn split_inclusive(&self, rate: TaxRate) -> (Money, Money) {
        let pretax = self.strip_tax(rate);
        (pretax, *self - pretax)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is the boundary formatting helper. Nothing inside the engine
/// parses or recomputes from the formatted string; use frontend
/// formatting for localized UI display.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Sign inversion. Return line items negate pretax, tax, and total
/// through this after the positive-side math is done.
impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

/// Multiplication by integer (for quantity calculations).
impl Mul<i32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i32) -> Self {
        Money(self.0 * qty as i64)
    }
}

/// Multiplication by i64.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Summation over unordered item/tender sets. Addition is commutative,
/// so aggregate totals are independent of iteration order.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

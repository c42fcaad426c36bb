//! Money in integer centavos.
//!
//! Amounts never touch floating point once they are recorded. Quantities can
//! be fractional (2.5 KG of meat), so multiplication rounds back to the
//! nearest centavo.
//!
//! Recorded amounts stay within [`Money::MAX`] either side of zero. Sums of
//! many such amounts still fit an `i64`, and the engine checks its own
//! accumulations anyway.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// A signed amount of Brazilian reais, stored as centavos.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero reais.
    pub const ZERO: Money = Money(0);

    /// Largest amount the club records: ten billion reais.
    pub const MAX: Money = Money(1_000_000_000_000);

    /// Create from centavos.
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Amount in centavos.
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Create from a reais value, rounded to the nearest centavo.
    pub fn from_reais(reais: f64) -> Result<Self> {
        Self::from_rounded(reais * 100.0).ok_or_else(|| Error::InvalidAmount(reais.to_string()))
    }

    /// Amount in reais (for display and percentages only).
    pub fn as_reais(self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub const fn abs(self) -> Self {
        Self(self.0.abs())
    }

    /// Unit price times a (possibly fractional) quantity.
    ///
    /// Fails when the quantity is not finite or the product leaves
    /// [`Money::MAX`].
    pub fn times(self, quantity: f64) -> Result<Self> {
        Self::from_rounded(self.0 as f64 * quantity)
            .ok_or_else(|| Error::InvalidAmount(format!("{} x {}", self, quantity)))
    }

    fn from_rounded(cents: f64) -> Option<Self> {
        let cents = cents.round();
        if cents.is_finite() && cents.abs() <= Self::MAX.0 as f64 {
            Some(Self(cents as i64))
        } else {
            None
        }
    }

    /// `self` if it lies within [`Money::MAX`] either side of zero.
    pub fn in_range(self) -> Result<Self> {
        if self.0.unsigned_abs() > Self::MAX.0.unsigned_abs() {
            return Err(Error::InvalidAmount(self.to_string()));
        }
        Ok(self)
    }

    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).map(Money)
    }

    /// Divide evenly among `parts`, rounding half away from zero.
    ///
    /// Dividing by zero parts yields zero: nobody shares the amount.
    pub fn split(self, parts: usize) -> Self {
        if parts == 0 {
            return Self::ZERO;
        }
        let n = parts as i64;
        let quotient = self.0 / n;
        let remainder = self.0 % n;
        if 2 * remainder.abs() >= n {
            Self(quotient + self.0.signum())
        } else {
            Self(quotient)
        }
    }

    /// Parse a typed amount.
    ///
    /// Accepts the formats people actually type into the forms: `12,50`,
    /// `12.50`, `1.234,56`, `1.234`, `R$ 10`, `-3,5`. When a comma is present
    /// it is the decimal separator and dots group thousands. Without a comma,
    /// a dot followed by exactly three digits groups thousands and any other
    /// single dot is the decimal separator. More than two decimal places is
    /// rejected, and so is anything beyond [`Money::MAX`].
    pub fn parse(input: &str) -> Result<Self> {
        let invalid = || Error::InvalidAmount(input.to_string());

        let mut text = input.trim();
        let negative = text.starts_with('-');
        if negative {
            text = text[1..].trim_start();
        }
        text = text.strip_prefix("R$").unwrap_or(text).trim();
        if text.is_empty() {
            return Err(invalid());
        }

        let (whole, fraction) = if text.contains(',') {
            let mut parts = text.splitn(2, ',');
            let whole = parts.next().unwrap_or_default().replace('.', "");
            let fraction = parts.next().unwrap_or_default().to_string();
            (whole, fraction)
        } else if text.matches('.').count() > 1 || groups_thousands(text) {
            (text.replace('.', ""), String::new())
        } else {
            let mut parts = text.splitn(2, '.');
            let whole = parts.next().unwrap_or_default().to_string();
            let fraction = parts.next().unwrap_or_default().to_string();
            (whole, fraction)
        };

        if fraction.len() > 2
            || !whole.chars().all(|c| c.is_ascii_digit())
            || !fraction.chars().all(|c| c.is_ascii_digit())
            || (whole.is_empty() && fraction.is_empty())
        {
            return Err(invalid());
        }

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let fraction: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => fraction.parse().map_err(|_| invalid())?,
        };

        let cents = whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(fraction))
            .ok_or_else(invalid)?;

        Self(if negative { -cents } else { cents }).in_range()
    }
}

/// `1.234`: a lone dot with exactly three digits after it.
fn groups_thousands(text: &str) -> bool {
    match text.split_once('.') {
        Some((whole, tail)) => {
            !whole.is_empty() && tail.len() == 3 && tail.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

/// Formats as `R$ 1.234,56`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let cents = self.0.unsigned_abs();
        let whole = (cents / 100).to_string();

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, digit) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(digit);
        }

        write!(f, "{}R$ {},{:02}", sign, grouped, cents % 100)
    }
}

//! Percentage rates with exact, truncating application.
//!
//! RULE: every money computation truncates toward negative infinity.
//! Rates are held as integer ten-thousandths of a percent so that
//! `floor(amount × rate / 100)` is computed in integer arithmetic and
//! never drifts the way `f64` products do near whole numbers.

use crate::{
    error::{PayoutError, PayoutResult},
    types::Yen,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ten-thousandths of a percent per whole percent.
const SCALE: i128 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Rate(i64);

impl Rate {
    pub const ZERO: Rate = Rate(0);

    /// `hundredths` of a percent: `from_hundredths(1021)` is 10.21%.
    pub const fn from_hundredths(hundredths: i64) -> Self {
        Rate(hundredths * 100)
    }

    /// Build from a percentage such as `10.21`. Precision beyond four
    /// fractional digits is rounded away.
    pub fn from_percent(percent: f64) -> PayoutResult<Self> {
        if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
            return Err(PayoutError::InvalidRate { value: percent });
        }
        Ok(Rate((percent * SCALE as f64).round() as i64))
    }

    pub fn as_percent(&self) -> f64 {
        self.0 as f64 / SCALE as f64
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// floor(amount × rate / 100)
    pub fn apply(&self, amount: Yen) -> Yen {
        self.apply_ratio(amount, 1, 1)
    }

    /// floor(amount × rate / 100 × numer / denom)
    pub fn apply_ratio(&self, amount: Yen, numer: i64, denom: i64) -> Yen {
        debug_assert!(denom > 0, "denominator must be positive");
        let product = amount as i128 * self.0 as i128 * numer as i128;
        let divisor = 100 * SCALE * denom as i128;
        product.div_euclid(divisor) as Yen
    }
}

impl TryFrom<f64> for Rate {
    type Error = PayoutError;

    fn try_from(value: f64) -> PayoutResult<Self> {
        Rate::from_percent(value)
    }
}

impl From<Rate> for f64 {
    fn from(rate: Rate) -> f64 {
        rate.as_percent()
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percent())
    }
}

//! X18 fixed-point values.
//!
//! The venue reports balances, health figures, and order amounts as
//! integers scaled by 10^18. They stay in that representation until the
//! presentation boundary, where they are divided down and rounded to a
//! fixed 4 decimal places. Uses `rust_decimal` for the exact conversion,
//! avoiding floating-point rounding errors in monetary math.

use crate::error::{CoreError, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Number of fractional digits kept when an X18 value crosses into the UI.
pub const DISPLAY_DECIMALS: u32 = 4;

const SCALE: u32 = 18;

/// A venue integer scaled by 10^18.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct X18(pub i128);

impl X18 {
    pub const ZERO: Self = Self(0);

    #[inline]
    #[must_use]
    pub fn new(raw: i128) -> Self {
        Self(raw)
    }

    #[inline]
    #[must_use]
    pub fn raw(&self) -> i128 {
        self.0
    }

    /// Exact conversion to a decimal (÷10^18).
    ///
    /// # Errors
    /// Returns `CoreError::FixedPointOverflow` if the raw value exceeds
    /// `Decimal`'s 96-bit mantissa.
    pub fn to_decimal(&self) -> Result<Decimal> {
        Decimal::try_from_i128_with_scale(self.0, SCALE)
            .map_err(|e| CoreError::FixedPointOverflow(e.to_string()))
    }

    /// Presentation-boundary conversion: ÷10^18 rounded half-up to 4
    /// decimal places.
    pub fn display_rounded(&self) -> Result<Decimal> {
        Ok(self
            .to_decimal()?
            .round_dp_with_strategy(DISPLAY_DECIMALS, RoundingStrategy::MidpointAwayFromZero))
    }

    /// Scale a decimal up to the venue representation (×10^18, truncated).
    ///
    /// # Errors
    /// Returns `CoreError::FixedPointOverflow` if the scaled value does
    /// not fit.
    pub fn from_decimal(value: Decimal) -> Result<Self> {
        let scale = Decimal::from(1_000_000_000_000_000_000_u64);
        let scaled = value
            .checked_mul(scale)
            .ok_or_else(|| CoreError::FixedPointOverflow(value.to_string()))?;
        scaled
            .trunc()
            .to_i128()
            .map(Self)
            .ok_or_else(|| CoreError::FixedPointOverflow(value.to_string()))
    }
}

impl fmt::Display for X18 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for X18 {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

// The venue sends X18 values as JSON strings; some endpoints use bare
// integers. Accept both, always emit strings.
impl Serialize for X18 {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for X18 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Str(String),
            Int(i128),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Str(s) => s.parse().map_err(serde::de::Error::custom),
            Raw::Int(i) => Ok(Self(i)),
        }
    }
}

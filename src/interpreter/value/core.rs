use std::fmt;

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::{
            float::{Float, Rounding},
            format::{DEFAULT_DIGITS, OutputMode, format_number},
        },
    },
};

/// Precision an integer is treated as having when it is converted to a
/// float.
pub const INTEGER_PRECISION: u32 = 2048;
/// Default precision of float results, in bits.
pub const DEFAULT_PRECISION: u32 = 256;

/// Numeric settings shared by every operation of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Precision of newly created floats, in bits. Conversions never produce
    /// floats below this precision.
    pub precision: u32,
    /// How floats are turned into integers when an operator needs one.
    pub rounding:  Rounding,
}

impl Default for Settings {
    fn default() -> Self {
        Self { precision: DEFAULT_PRECISION,
               rounding:  Rounding::Nearest, }
    }
}

/// A number of the calculator: an unbounded integer or an arbitrary-precision
/// binary float.
///
/// Numbers are never mutated once created; every operator produces a new
/// value.
#[derive(Debug, Clone, PartialEq)]
pub enum Num {
    /// An integer of unbounded size.
    Integer(BigInt),
    /// A binary float carrying its own precision.
    Float(Float),
}

impl From<i64> for Num {
    fn from(v: i64) -> Self {
        Self::Integer(BigInt::from(v))
    }
}

impl From<BigInt> for Num {
    fn from(v: BigInt) -> Self {
        Self::Integer(v)
    }
}

impl From<Float> for Num {
    fn from(v: Float) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Num {
    fn from(v: bool) -> Self {
        Self::from(i64::from(v))
    }
}

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_number(self, OutputMode::Decimal, DEFAULT_DIGITS))
    }
}

impl Num {
    /// Precision of the value in bits. Integers report
    /// [`INTEGER_PRECISION`].
    #[must_use]
    pub const fn precision(&self) -> u32 {
        match self {
            Self::Integer(_) => INTEGER_PRECISION,
            Self::Float(f) => f.precision(),
        }
    }

    /// Returns `true` for integers and for floats without a fractional part.
    ///
    /// # Example
    /// ```
    /// use mpcalc::interpreter::value::{core::Num, float::Float};
    ///
    /// assert!(Num::from(3).is_integral());
    /// assert!(Num::Float(Float::from_i64(3, 64)).is_integral());
    /// ```
    #[must_use]
    pub fn is_integral(&self) -> bool {
        match self {
            Self::Integer(_) => true,
            Self::Float(f) => f.is_integer(),
        }
    }

    /// Returns `true` for zero of either kind.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Integer(n) => n.is_zero(),
            Self::Float(f) => f.is_zero(),
        }
    }

    /// Returns `true` for values below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        match self {
            Self::Integer(n) => n.is_negative(),
            Self::Float(f) => f.is_negative(),
        }
    }

    /// Converts to an integer, rounding floats with `rounding`.
    #[must_use]
    pub fn to_integer(&self, rounding: Rounding) -> BigInt {
        match self {
            Self::Integer(n) => n.clone(),
            Self::Float(f) => f.to_bigint(rounding),
        }
    }

    /// Converts to a float whose precision is the larger of the session
    /// default and the value's own precision.
    #[must_use]
    pub fn to_float(&self, settings: &Settings) -> Float {
        let precision = settings.precision.max(self.precision());
        match self {
            Self::Integer(n) => Float::from_bigint(n, precision),
            Self::Float(f) => f.with_precision(precision),
        }
    }

    /// Converts to an unsigned machine word.
    ///
    /// Fails with [`RuntimeError::NotRepresentable`], naming `what`, when the
    /// value is negative or too large.
    ///
    /// # Example
    /// ```
    /// use mpcalc::interpreter::value::core::{Num, Settings};
    ///
    /// let settings = Settings::default();
    /// assert_eq!(Num::from(7).to_word(&settings, "count").unwrap(), 7);
    /// assert!(Num::from(-1).to_word(&settings, "count").is_err());
    /// ```
    pub fn to_word(&self, settings: &Settings, what: &str) -> EvalResult<u64> {
        self.to_integer(settings.rounding)
            .to_u64()
            .ok_or_else(|| RuntimeError::not_representable(what))
    }

    /// Returns the value with its sign flipped, keeping its kind and
    /// precision.
    #[must_use]
    pub fn negated(&self) -> Self {
        match self {
            Self::Integer(n) => Self::Integer(-n),
            Self::Float(f) => Self::Float(f.neg()),
        }
    }
}

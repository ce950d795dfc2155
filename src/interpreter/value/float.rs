use std::cmp::Ordering;

use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::{error::RuntimeError, interpreter::evaluator::core::EvalResult, util::num::shift_amount};

/// Smallest precision a float may carry.
pub const MIN_PRECISION: u32 = 2;

/// `log10(2)`, used to estimate decimal exponents.
const LOG10_2: f64 = 0.301_029_995_663_981_2;

/// Direction used when a float is converted to an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// Round to nearest, ties to even.
    Nearest,
    /// Truncate.
    TowardZero,
    /// Round toward negative infinity.
    Floor,
    /// Round toward positive infinity.
    Ceil,
    /// Round to nearest, ties away from zero.
    HalfAway,
}

/// A binary floating-point number of arbitrary precision.
///
/// The value is `mantissa * 2^exponent`. The mantissa never has more than
/// `precision` significant bits and is kept odd (or zero), so every value has
/// exactly one representation. All arithmetic rounds to nearest, ties to
/// even, at the precision requested by the caller.
///
/// # Example
/// ```
/// use mpcalc::interpreter::value::float::Float;
///
/// let one = Float::from_i64(1, 64);
/// let three = Float::from_i64(3, 64);
/// let third = one.div(&three, 64).unwrap();
///
/// assert!(!third.is_integer());
/// assert_eq!(third.mul(&three, 64), one);
/// ```
#[derive(Debug, Clone)]
pub struct Float {
    mantissa:  BigInt,
    exponent:  i64,
    precision: u32,
}

impl Float {
    /// The value zero.
    #[must_use]
    pub fn zero(precision: u32) -> Self {
        Self { mantissa:  BigInt::zero(),
               exponent:  0,
               precision: precision.max(MIN_PRECISION), }
    }

    /// The value one.
    #[must_use]
    pub fn one(precision: u32) -> Self {
        Self::from_i64(1, precision)
    }

    /// Converts a machine integer, rounding to `precision` bits.
    #[must_use]
    pub fn from_i64(value: i64, precision: u32) -> Self {
        Self::from_parts(BigInt::from(value), 0, precision)
    }

    /// Converts a big integer, rounding to `precision` bits.
    #[must_use]
    pub fn from_bigint(value: &BigInt, precision: u32) -> Self {
        Self::from_parts(value.clone(), 0, precision)
    }

    /// Builds `mantissa * 2^exponent` rounded to `precision` bits.
    #[must_use]
    pub fn from_parts(mantissa: BigInt, exponent: i64, precision: u32) -> Self {
        let precision = precision.max(MIN_PRECISION);
        let (sign, magnitude) = mantissa.into_parts();
        let bits = magnitude.bits();

        if bits <= u64::from(precision) {
            return Self::normalized(sign, magnitude, exponent, precision);
        }

        let shift = bits - u64::from(precision);
        let kept = &magnitude >> shift;
        let dropped = magnitude - (&kept << shift);
        let half = BigUint::one() << (shift - 1);
        let kept = if dropped > half || (dropped == half && kept.bit(0)) {
            kept + 1u32
        } else {
            kept
        };

        Self::normalized(sign, kept, exponent + to_i64(shift), precision)
    }

    fn normalized(sign: Sign, magnitude: BigUint, exponent: i64, precision: u32) -> Self {
        match magnitude.trailing_zeros() {
            None => Self::zero(precision),
            Some(zeros) => Self { mantissa: BigInt::from_biguint(sign, magnitude >> zeros),
                                  exponent: exponent + to_i64(zeros),
                                  precision },
        }
    }

    /// Precision of this value in bits.
    #[must_use]
    pub const fn precision(&self) -> u32 {
        self.precision
    }

    /// Returns the same value rounded to `precision` bits.
    #[must_use]
    pub fn with_precision(&self, precision: u32) -> Self {
        Self::from_parts(self.mantissa.clone(), self.exponent, precision)
    }

    /// Returns `true` for zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.mantissa.is_zero()
    }

    /// Returns `true` for values below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.mantissa.is_negative()
    }

    /// Returns `true` for values above zero.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.mantissa.is_positive()
    }

    /// Returns `true` when the value has no fractional part.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        self.exponent >= 0 || self.mantissa.is_zero()
    }

    /// Returns `true` if the value is `2^k` for some integer `k`.
    #[must_use]
    pub fn is_power_of_two(&self) -> bool {
        self.mantissa.is_one()
    }

    /// The binary order `k` with `2^(k-1) <= |x| < 2^k`, or `None` for zero.
    #[must_use]
    pub fn order(&self) -> Option<i64> {
        if self.is_zero() {
            None
        } else {
            Some(self.exponent + to_i64(self.mantissa.bits()))
        }
    }

    /// Negation. Exact.
    #[must_use]
    pub fn neg(&self) -> Self {
        Self { mantissa:  -&self.mantissa,
               exponent:  self.exponent,
               precision: self.precision, }
    }

    /// Absolute value. Exact.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self { mantissa:  self.mantissa.abs(),
               exponent:  self.exponent,
               precision: self.precision, }
    }

    /// Multiplies by `2^k`. Exact.
    #[must_use]
    pub fn mul_pow2(&self, k: i64) -> Self {
        if self.is_zero() {
            return self.clone();
        }
        Self { mantissa:  self.mantissa.clone(),
               exponent:  self.exponent + k,
               precision: self.precision, }
    }

    /// `self + rhs` rounded to `precision` bits.
    #[must_use]
    pub fn add(&self, rhs: &Self, precision: u32) -> Self {
        let (Some(lhs_order), Some(rhs_order)) = (self.order(), rhs.order()) else {
            return if self.is_zero() {
                rhs.with_precision(precision)
            } else {
                self.with_precision(precision)
            };
        };

        let (big, small, gap) = if lhs_order >= rhs_order {
            (self, rhs, lhs_order - rhs_order)
        } else {
            (rhs, self, rhs_order - lhs_order)
        };

        // The smaller operand only decides the direction of rounding.
        if gap > i64::from(precision) + 3 {
            let spread = u64::from(precision) + 2;
            let sticky = if small.is_negative() { -1 } else { 1 };
            let mantissa = (&big.mantissa << spread) + sticky;
            return Self::from_parts(mantissa, big.exponent - to_i64(spread), precision);
        }

        let exponent = self.exponent.min(rhs.exponent);
        let lhs = &self.mantissa << shift_amount(self.exponent - exponent);
        let rhs = &rhs.mantissa << shift_amount(rhs.exponent - exponent);
        Self::from_parts(lhs + rhs, exponent, precision)
    }

    /// `self - rhs` rounded to `precision` bits.
    #[must_use]
    pub fn sub(&self, rhs: &Self, precision: u32) -> Self {
        self.add(&rhs.neg(), precision)
    }

    /// `self * rhs` rounded to `precision` bits.
    #[must_use]
    pub fn mul(&self, rhs: &Self, precision: u32) -> Self {
        Self::from_parts(&self.mantissa * &rhs.mantissa,
                         self.exponent + rhs.exponent,
                         precision)
    }

    /// `self / rhs` rounded to `precision` bits.
    pub fn div(&self, rhs: &Self, precision: u32) -> EvalResult<Self> {
        if rhs.is_zero() {
            return Err(RuntimeError::DivisionByZero);
        }
        if self.is_zero() {
            return Ok(Self::zero(precision));
        }

        let wanted = i64::from(precision) + 2 + to_i64(rhs.mantissa.bits())
                     - to_i64(self.mantissa.bits());
        let shift = wanted.max(0);
        let numerator = &self.mantissa << shift_amount(shift);
        let (quotient, remainder) = numerator.div_rem(&rhs.mantissa);
        let exponent = self.exponent - rhs.exponent - shift;

        if remainder.is_zero() {
            return Ok(Self::from_parts(quotient, exponent, precision));
        }
        let sticky = if quotient.is_negative() { -1 } else { 1 };
        Ok(Self::from_parts((quotient << 1u32) + sticky, exponent - 1, precision))
    }

    /// Divides by a small positive integer.
    #[must_use]
    pub(crate) fn div_u64(&self, divisor: u64, precision: u32) -> Self {
        let divisor = Self::from_parts(BigInt::from(divisor.max(1)), 0, 64);
        self.div(&divisor, precision)
            .unwrap_or_else(|_| Self::zero(precision))
    }

    /// Multiplies by a small integer.
    #[must_use]
    pub(crate) fn mul_i64(&self, factor: i64, precision: u32) -> Self {
        Self::from_parts(&self.mantissa * factor, self.exponent, precision)
    }

    /// Remainder of truncating division; the result has the sign of `self`.
    pub fn rem(&self, rhs: &Self, precision: u32) -> EvalResult<Self> {
        if rhs.is_zero() {
            return Err(RuntimeError::DivisionByZero);
        }
        let exponent = self.exponent.min(rhs.exponent);
        let lhs = &self.mantissa << shift_amount(self.exponent - exponent);
        let rhs = &rhs.mantissa << shift_amount(rhs.exponent - exponent);
        Ok(Self::from_parts(lhs % rhs, exponent, precision))
    }

    /// Converts to an integer using `rounding`.
    #[must_use]
    pub fn to_bigint(&self, rounding: Rounding) -> BigInt {
        if self.exponent >= 0 {
            return &self.mantissa << shift_amount(self.exponent);
        }

        let shift = self.exponent.unsigned_abs();
        let negative = self.mantissa.is_negative();
        let magnitude = self.mantissa.magnitude();
        let kept = magnitude >> shift;
        let dropped = magnitude - (&kept << shift);
        let half = BigUint::one() << (shift - 1);

        let bump = match rounding {
            Rounding::TowardZero => false,
            Rounding::Nearest => dropped > half || (dropped == half && kept.bit(0)),
            Rounding::HalfAway => dropped >= half,
            Rounding::Floor => negative && !dropped.is_zero(),
            Rounding::Ceil => !negative && !dropped.is_zero(),
        };
        let kept = BigInt::from(if bump { kept + 1u32 } else { kept });

        if negative { -kept } else { kept }
    }

    /// Square root rounded to `precision` bits.
    pub fn sqrt(&self, precision: u32) -> EvalResult<Self> {
        if self.is_negative() {
            return Err(RuntimeError::domain("sqrt", "argument is negative"));
        }
        Ok(self.root_of_magnitude(2, precision))
    }

    /// Real `n`-th root rounded to `precision` bits. Odd roots accept
    /// negative arguments.
    pub fn root(&self, n: u32, precision: u32) -> EvalResult<Self> {
        if n == 0 {
            return Err(RuntimeError::domain("root", "the zeroth root is undefined"));
        }
        if self.is_negative() && n % 2 == 0 {
            return Err(RuntimeError::domain("root", "even root of a negative number"));
        }
        let root = self.root_of_magnitude(n, precision);
        Ok(if self.is_negative() { root.neg() } else { root })
    }

    fn root_of_magnitude(&self, n: u32, precision: u32) -> Self {
        if self.is_zero() {
            return Self::zero(precision);
        }
        let degree = i64::from(n);
        let magnitude = self.mantissa.magnitude();
        let wanted = u64::from(n) * (u64::from(precision) + 2);
        let mut shift = to_i64(wanted.saturating_sub(magnitude.bits()));
        shift += (self.exponent - shift).rem_euclid(degree);

        let scaled = magnitude << shift_amount(shift);
        let root = scaled.nth_root(n);
        let exact = root.pow(n) == scaled;
        let exponent = (self.exponent - shift) / degree;
        let root = BigInt::from(root);

        if exact {
            Self::from_parts(root, exponent, precision)
        } else {
            Self::from_parts((root << 1u32) + 1, exponent - 1, precision)
        }
    }

    /// Approximates the value as an `f64`. Used for range estimates only.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        let magnitude = self.mantissa.magnitude();
        let shift = magnitude.bits().saturating_sub(53);
        let top = (magnitude >> shift).to_f64().unwrap_or(0.0);
        let exponent = (self.exponent + to_i64(shift)).clamp(-1100, 1100);
        let value = top * 2f64.powi(i32::try_from(exponent).unwrap_or(0));
        if self.is_negative() { -value } else { value }
    }

    /// Produces `digits` significant decimal digits of `|self|`.
    ///
    /// Returns the digit string together with the decimal exponent of its
    /// first digit, so the value is `0.d1d2d3... * 10^(exponent + 1)`. Zero
    /// yields `("0", 0)`.
    #[must_use]
    pub fn to_decimal(&self, digits: usize) -> (String, i64) {
        let Some(order) = self.order() else {
            return ("0".to_string(), 0);
        };
        let digits = digits.max(1);
        let wide = i64::try_from(digits).unwrap_or(i64::MAX);

        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
        let mut exponent = ((order - 1) as f64 * LOG10_2).floor() as i64;
        let lower = pow10(wide - 1);
        let upper = pow10(wide);

        let mut scaled = self.scaled_decimal(wide - 1 - exponent);
        for _ in 0..4 {
            if scaled >= upper {
                exponent += 1;
            } else if scaled < lower {
                exponent -= 1;
            } else {
                break;
            }
            scaled = self.scaled_decimal(wide - 1 - exponent);
        }

        (scaled.to_string(), exponent)
    }

    /// `round(|self| * 10^scale)`, ties to even.
    fn scaled_decimal(&self, scale: i64) -> BigUint {
        let mut numerator = self.mantissa.magnitude().clone();
        let mut denominator = BigUint::one();

        if self.exponent >= 0 {
            numerator <<= shift_amount(self.exponent);
        } else {
            denominator <<= self.exponent.unsigned_abs();
        }
        if scale >= 0 {
            numerator *= pow10(scale);
        } else {
            denominator *= pow10(-scale);
        }

        let (quotient, remainder) = numerator.div_rem(&denominator);
        let twice = remainder << 1u32;
        match twice.cmp(&denominator) {
            Ordering::Greater => quotient + 1u32,
            Ordering::Equal if quotient.bit(0) => quotient + 1u32,
            _ => quotient,
        }
    }
}

impl PartialEq for Float {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Float {}

impl PartialOrd for Float {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Float {
    fn cmp(&self, other: &Self) -> Ordering {
        let sign = self.mantissa.sign();
        if sign != other.mantissa.sign() {
            return sign.cmp(&other.mantissa.sign());
        }

        let by_magnitude = match (self.order(), other.order()) {
            (None, _) | (_, None) => return Ordering::Equal,
            (Some(lhs), Some(rhs)) if lhs != rhs => lhs.cmp(&rhs),
            _ => {
                let exponent = self.exponent.min(other.exponent);
                let lhs = self.mantissa.magnitude() << shift_amount(self.exponent - exponent);
                let rhs = other.mantissa.magnitude() << shift_amount(other.exponent - exponent);
                lhs.cmp(&rhs)
            },
        };

        if sign == Sign::Minus {
            by_magnitude.reverse()
        } else {
            by_magnitude
        }
    }
}

/// `10^n` for non-negative `n`.
fn pow10(n: i64) -> BigUint {
    BigUint::from(10u32).pow(u32::try_from(n.max(0)).unwrap_or(u32::MAX))
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

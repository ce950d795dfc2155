//! Elementary and special functions on [`Float`].
//!
//! Every function evaluates its series at the requested precision plus
//! [`GUARD_BITS`] and rounds the result once at the end. Arguments close to
//! zero get additional working bits so the result keeps its relative accuracy.
//! Results are faithful to the working precision but not correctly rounded.

use std::f64::consts::{LN_2, LOG2_E};

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, ToPrimitive};

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::float::{Float, Rounding},
    },
};

/// Extra bits carried through every series evaluation.
pub const GUARD_BITS: u32 = 32;

/// Number of argument halvings before the arctangent series.
const ATAN_HALVINGS: i64 = 8;

/// Number of argument halvings before the exponential series.
const EXP_HALVINGS: i64 = 12;

/// Arguments of `exp` beyond `2^EXP_LIMIT` overflow the exponent range.
const EXP_LIMIT: i64 = 40;

/// Working precision for `precision` bits and an argument `x`.
fn working_precision(precision: u32, x: &Float) -> u32 {
    let small = x.order().map_or(0, |order| (-order).clamp(0, 1 << 20));
    precision + GUARD_BITS + u32::try_from(small).unwrap_or(0)
}

/// Returns `true` once `term` no longer affects `sum` at `precision` bits.
fn negligible(term: &Float, sum: &Float, precision: u32) -> bool {
    match (term.order(), sum.order()) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(term), Some(sum)) => term < sum - i64::from(precision) - 2,
    }
}

/// `atan(1/n)` by its Taylor series.
fn atan_inverse(n: u64, precision: u32) -> Float {
    let mut power = Float::one(precision).div_u64(n, precision);
    let mut sum = power.clone();
    let n_squared = n * n;

    for k in 1u64.. {
        power = power.div_u64(n_squared, precision);
        let term = power.div_u64(2 * k + 1, precision);
        if negligible(&term, &sum, precision) {
            break;
        }
        sum = if k % 2 == 1 {
            sum.sub(&term, precision)
        } else {
            sum.add(&term, precision)
        };
    }
    sum
}

/// Archimedes' constant, by Machin's formula.
///
/// # Example
/// ```
/// use mpcalc::interpreter::value::{float::Float, transcend::pi};
///
/// let pi = pi(128);
/// assert!(pi > Float::from_i64(3, 128));
/// assert!(pi < Float::from_i64(4, 128));
/// ```
#[must_use]
pub fn pi(precision: u32) -> Float {
    let wp = precision + GUARD_BITS;
    let first = atan_inverse(5, wp).mul_i64(16, wp);
    let second = atan_inverse(239, wp).mul_i64(4, wp);
    first.sub(&second, wp).with_precision(precision)
}

/// The natural logarithm of two.
#[must_use]
pub fn ln2(precision: u32) -> Float {
    let wp = precision + GUARD_BITS;
    let mut power = Float::one(wp).mul_pow2(-1);
    let mut sum = power.clone();

    for k in 2u64.. {
        power = power.mul_pow2(-1);
        let term = power.div_u64(k, wp);
        if negligible(&term, &sum, wp) {
            break;
        }
        sum = sum.add(&term, wp);
    }
    sum.with_precision(precision)
}

/// Euler's number.
pub fn euler(precision: u32) -> EvalResult<Float> {
    exp(&Float::one(precision), precision)
}

/// Catalan's constant.
///
/// Uses `G = pi/8 * ln(2 + sqrt 3) + 3/8 * sum 1 / ((2k+1)^2 * C(2k, k))`.
pub fn catalan(precision: u32) -> EvalResult<Float> {
    let wp = precision + GUARD_BITS;
    let one = Float::one(wp);

    let root = Float::from_i64(3, wp).sqrt(wp)?;
    let log = ln(&Float::from_i64(2, wp).add(&root, wp), wp)?;
    let first = pi(wp).mul(&log, wp).mul_pow2(-3);

    let mut central = BigInt::one();
    let mut sum = Float::zero(wp);
    for k in 0u64.. {
        let odd = BigInt::from(2 * k + 1);
        let denominator = Float::from_bigint(&(&odd * &odd * &central), wp);
        let term = one.div(&denominator, wp)?;
        if negligible(&term, &sum, wp) {
            break;
        }
        sum = sum.add(&term, wp);

        let next = k + 1;
        central = central * (2 * next) * (2 * next - 1) / (next * next);
    }

    let second = sum.mul_i64(3, wp).mul_pow2(-3);
    Ok(first.add(&second, wp).with_precision(precision))
}

/// The exponential function.
pub fn exp(x: &Float, precision: u32) -> EvalResult<Float> {
    let Some(order) = x.order() else {
        return Ok(Float::one(precision));
    };
    if order > EXP_LIMIT {
        if x.is_negative() {
            return Ok(Float::zero(precision));
        }
        return Err(RuntimeError::Overflow { details: "exp argument is too large".to_string() });
    }

    let wp = precision + GUARD_BITS + u32::try_from(order.max(0)).unwrap_or(0);
    let log2 = ln2(wp + 64);
    let k = x.div(&log2, wp)?.to_bigint(Rounding::Nearest);
    let reduced = x.sub(&log2.mul(&Float::from_bigint(&k, wp + 64), wp + 64), wp);
    let k = k.to_i64()
             .ok_or_else(|| RuntimeError::Overflow { details: "exp argument is too large".to_string() })?;

    let halvings = EXP_HALVINGS;
    let wp = wp + u32::try_from(halvings).unwrap_or(0);
    let r = reduced.mul_pow2(-halvings);

    let mut term = Float::one(wp);
    let mut sum = Float::one(wp);
    for n in 1u64.. {
        term = term.mul(&r, wp).div_u64(n, wp);
        if negligible(&term, &sum, wp) {
            break;
        }
        sum = sum.add(&term, wp);
    }
    for _ in 0..halvings {
        sum = sum.mul(&sum, wp);
    }

    Ok(sum.mul_pow2(k).with_precision(precision))
}

/// The natural logarithm.
pub fn ln(x: &Float, precision: u32) -> EvalResult<Float> {
    let Some(order) = x.order() else {
        return Err(RuntimeError::domain("ln", "logarithm of zero"));
    };
    if x.is_negative() {
        return Err(RuntimeError::domain("ln", "logarithm of a negative number"));
    }

    let wp = precision + GUARD_BITS;
    let one = Float::one(wp);
    let half = one.mul_pow2(-1);

    // x = f * 2^k with f in [sqrt(1/2), sqrt(2)).
    let mut k = order;
    let mut f = x.mul_pow2(-order);
    if f.mul(&f, wp) < half {
        f = f.mul_pow2(1);
        k -= 1;
    }

    let numerator = f.sub(&one, wp + 8);
    let wp = working_precision(precision, &numerator);
    let z = numerator.div(&f.add(&one, wp), wp)?;
    let z_squared = z.mul(&z, wp);

    let mut power = z.clone();
    let mut sum = z;
    for n in 1u64.. {
        power = power.mul(&z_squared, wp);
        let term = power.div_u64(2 * n + 1, wp);
        if negligible(&term, &sum, wp) {
            break;
        }
        sum = sum.add(&term, wp);
    }
    let mut result = sum.mul_pow2(1);

    if k != 0 {
        let scale = Float::from_i64(k, 64);
        result = result.add(&ln2(wp + 64).mul(&scale, wp + 64), wp);
    }
    Ok(result.with_precision(precision))
}

/// Logarithm to base two. Exact for powers of two.
pub fn log2(x: &Float, precision: u32) -> EvalResult<Float> {
    if x.is_positive()
       && x.is_power_of_two()
       && let Some(order) = x.order()
    {
        return Ok(Float::from_i64(order - 1, precision));
    }
    let wp = precision + GUARD_BITS;
    ln(x, wp)?.div(&ln2(wp), precision)
}

/// Logarithm to base ten.
pub fn log10(x: &Float, precision: u32) -> EvalResult<Float> {
    let wp = precision + GUARD_BITS;
    ln(x, wp)?.div(&ln(&Float::from_i64(10, wp), wp)?, precision)
}

/// Reduces `x` modulo `pi/2`, returning the remainder and the quadrant.
fn reduce_half_pi(x: &Float, wp: u32) -> EvalResult<(Float, u8)> {
    let order = x.order().unwrap_or(0);
    if order > 1 << 20 {
        return Err(RuntimeError::Overflow { details:
                                                "argument too large for trigonometric reduction".to_string(), });
    }
    let wide = wp + 8 + u32::try_from(order.max(0)).unwrap_or(0);
    let half_pi = pi(wide).mul_pow2(-1);
    let k = x.div(&half_pi, wide)?.to_bigint(Rounding::Nearest);
    let reduced = x.sub(&half_pi.mul(&Float::from_bigint(&k, wide), wide), wide);
    let quadrant = k.mod_floor(&BigInt::from(4)).to_u8().unwrap_or(0);
    Ok((reduced.with_precision(wp), quadrant))
}

fn sin_series(r: &Float, wp: u32) -> Float {
    let r_squared = r.mul(r, wp);
    let mut term = r.clone();
    let mut sum = r.clone();
    for n in 1u64.. {
        term = term.mul(&r_squared, wp).div_u64((2 * n) * (2 * n + 1), wp).neg();
        if negligible(&term, &sum, wp) {
            break;
        }
        sum = sum.add(&term, wp);
    }
    sum
}

fn cos_series(r: &Float, wp: u32) -> Float {
    let r_squared = r.mul(r, wp);
    let mut term = Float::one(wp);
    let mut sum = Float::one(wp);
    for n in 1u64.. {
        term = term.mul(&r_squared, wp).div_u64((2 * n - 1) * (2 * n), wp).neg();
        if negligible(&term, &sum, wp) {
            break;
        }
        sum = sum.add(&term, wp);
    }
    sum
}

/// Sine and cosine of `x` at working precision `wp`.
fn sin_cos(x: &Float, wp: u32) -> EvalResult<(Float, Float)> {
    if x.is_zero() {
        return Ok((Float::zero(wp), Float::one(wp)));
    }
    let (r, quadrant) = reduce_half_pi(x, wp)?;
    let (sin, cos) = (sin_series(&r, wp), cos_series(&r, wp));
    Ok(match quadrant {
        0 => (sin, cos),
        1 => (cos, sin.neg()),
        2 => (sin.neg(), cos.neg()),
        _ => (cos.neg(), sin),
    })
}

/// The sine function.
pub fn sin(x: &Float, precision: u32) -> EvalResult<Float> {
    let (sin, _) = sin_cos(x, working_precision(precision, x))?;
    Ok(sin.with_precision(precision))
}

/// The cosine function.
pub fn cos(x: &Float, precision: u32) -> EvalResult<Float> {
    let (_, cos) = sin_cos(x, working_precision(precision, x))?;
    Ok(cos.with_precision(precision))
}

/// The tangent function.
pub fn tan(x: &Float, precision: u32) -> EvalResult<Float> {
    let (sin, cos) = sin_cos(x, working_precision(precision, x))?;
    sin.div(&cos, precision)
}

/// The secant, `1 / cos x`.
pub fn sec(x: &Float, precision: u32) -> EvalResult<Float> {
    let (_, cos) = sin_cos(x, working_precision(precision, x))?;
    Float::one(precision).div(&cos, precision)
}

/// The cosecant, `1 / sin x`.
pub fn csc(x: &Float, precision: u32) -> EvalResult<Float> {
    let (sin, _) = sin_cos(x, working_precision(precision, x))?;
    Float::one(precision).div(&sin, precision)
}

/// The cotangent, `cos x / sin x`.
pub fn cot(x: &Float, precision: u32) -> EvalResult<Float> {
    let (sin, cos) = sin_cos(x, working_precision(precision, x))?;
    cos.div(&sin, precision)
}

/// Arctangent at working precision, without the final rounding.
fn atan_raw(x: &Float, wp: u32) -> EvalResult<Float> {
    if x.is_zero() {
        return Ok(Float::zero(wp));
    }
    let one = Float::one(wp);
    let magnitude = x.abs();
    let complement = magnitude > one;
    let mut y = if complement {
        one.div(&magnitude, wp)?
    } else {
        magnitude
    };

    // atan(y) = 2 atan(y / (1 + sqrt(1 + y^2)))
    for _ in 0..ATAN_HALVINGS {
        let root = one.add(&y.mul(&y, wp), wp).sqrt(wp)?;
        y = y.div(&one.add(&root, wp), wp)?;
    }

    let y_squared = y.mul(&y, wp);
    let mut power = y.clone();
    let mut sum = y;
    for n in 1u64.. {
        power = power.mul(&y_squared, wp).neg();
        let term = power.div_u64(2 * n + 1, wp);
        if negligible(&term, &sum, wp) {
            break;
        }
        sum = sum.add(&term, wp);
    }

    let mut result = sum.mul_pow2(ATAN_HALVINGS);
    if complement {
        result = pi(wp).mul_pow2(-1).sub(&result, wp);
    }
    Ok(if x.is_negative() { result.neg() } else { result })
}

/// The arctangent.
pub fn atan(x: &Float, precision: u32) -> EvalResult<Float> {
    Ok(atan_raw(x, working_precision(precision, x))?.with_precision(precision))
}

/// The two-argument arctangent of `y / x`, in `(-pi, pi]`.
pub fn atan2(y: &Float, x: &Float, precision: u32) -> EvalResult<Float> {
    let wp = precision + GUARD_BITS;
    if x.is_zero() {
        return Ok(if y.is_zero() {
            Float::zero(precision)
        } else if y.is_negative() {
            pi(precision).mul_pow2(-1).neg()
        } else {
            pi(precision).mul_pow2(-1)
        });
    }

    let ratio = y.div(x, wp)?;
    let angle = atan_raw(&ratio, working_precision(precision, &ratio))?;
    if x.is_positive() {
        return Ok(angle.with_precision(precision));
    }
    let half_turn = pi(wp);
    let angle = if y.is_negative() {
        angle.sub(&half_turn, wp)
    } else {
        angle.add(&half_turn, wp)
    };
    Ok(angle.with_precision(precision))
}

/// The arcsine.
pub fn asin(x: &Float, precision: u32) -> EvalResult<Float> {
    let wp = working_precision(precision, x);
    let one = Float::one(wp);
    let magnitude = x.abs();
    if magnitude > one {
        return Err(RuntimeError::domain("asin", "argument is outside [-1, 1]"));
    }
    if magnitude == one {
        let quarter = pi(precision).mul_pow2(-1);
        return Ok(if x.is_negative() { quarter.neg() } else { quarter });
    }
    let cosine = one.sub(x, wp).mul(&one.add(x, wp), wp).sqrt(wp)?;
    Ok(atan_raw(&x.div(&cosine, wp)?, wp)?.with_precision(precision))
}

/// The arccosine.
pub fn acos(x: &Float, precision: u32) -> EvalResult<Float> {
    let wp = precision + GUARD_BITS;
    let one = Float::one(wp);
    if x.abs() > one {
        return Err(RuntimeError::domain("acos", "argument is outside [-1, 1]"));
    }
    if x.neg() == one {
        return Ok(pi(precision));
    }
    // acos(x) = 2 atan(sqrt((1 - x) / (1 + x)))
    let ratio = one.sub(x, wp).div(&one.add(x, wp), wp)?.sqrt(wp)?;
    let wp = working_precision(precision, &ratio);
    Ok(atan_raw(&ratio, wp)?.mul_pow2(1).with_precision(precision))
}

/// `(e^x, e^-x)` at working precision.
fn exp_pair(x: &Float, wp: u32) -> EvalResult<(Float, Float)> {
    let positive = exp(x, wp)?;
    let negative = Float::one(wp).div(&positive, wp)?;
    Ok((positive, negative))
}

/// The hyperbolic sine.
pub fn sinh(x: &Float, precision: u32) -> EvalResult<Float> {
    let wp = working_precision(precision, x);
    if x.order().unwrap_or(0) <= 0 {
        // |x| < 1: sum x^(2n+1) / (2n+1)!
        let x_squared = x.mul(x, wp);
        let mut term = x.clone();
        let mut sum = x.clone();
        for n in 1u64.. {
            term = term.mul(&x_squared, wp).div_u64((2 * n) * (2 * n + 1), wp);
            if negligible(&term, &sum, wp) {
                break;
            }
            sum = sum.add(&term, wp);
        }
        return Ok(sum.with_precision(precision));
    }
    let (positive, negative) = exp_pair(x, wp)?;
    Ok(positive.sub(&negative, wp).mul_pow2(-1).with_precision(precision))
}

/// The hyperbolic cosine.
pub fn cosh(x: &Float, precision: u32) -> EvalResult<Float> {
    let wp = precision + GUARD_BITS;
    let (positive, negative) = exp_pair(x, wp)?;
    Ok(positive.add(&negative, wp).mul_pow2(-1).with_precision(precision))
}

/// The hyperbolic tangent.
pub fn tanh(x: &Float, precision: u32) -> EvalResult<Float> {
    if x.order().unwrap_or(0) > 16 {
        let one = Float::one(precision);
        return Ok(if x.is_negative() { one.neg() } else { one });
    }
    let wp = working_precision(precision, x);
    sinh(x, wp)?.div(&cosh(x, wp)?, precision)
}

/// The hyperbolic secant.
pub fn sech(x: &Float, precision: u32) -> EvalResult<Float> {
    let wp = precision + GUARD_BITS;
    Float::one(wp).div(&cosh(x, wp)?, precision)
}

/// The hyperbolic cosecant.
pub fn csch(x: &Float, precision: u32) -> EvalResult<Float> {
    let wp = working_precision(precision, x);
    Float::one(wp).div(&sinh(x, wp)?, precision)
}

/// The hyperbolic cotangent.
pub fn coth(x: &Float, precision: u32) -> EvalResult<Float> {
    let wp = working_precision(precision, x);
    cosh(x, wp)?.div(&sinh(x, wp)?, precision)
}

/// The inverse hyperbolic sine.
pub fn asinh(x: &Float, precision: u32) -> EvalResult<Float> {
    if x.is_zero() {
        return Ok(Float::zero(precision));
    }
    let wp = working_precision(precision, x);
    let magnitude = x.abs();
    let root = magnitude.mul(&magnitude, wp)
                        .add(&Float::one(wp), wp)
                        .sqrt(wp)?;
    let result = ln(&magnitude.add(&root, wp), wp)?;
    Ok(if x.is_negative() { result.neg() } else { result }.with_precision(precision))
}

/// The inverse hyperbolic cosine.
pub fn acosh(x: &Float, precision: u32) -> EvalResult<Float> {
    let wp = precision + GUARD_BITS;
    let one = Float::one(wp);
    if *x < one {
        return Err(RuntimeError::domain("acosh", "argument is less than 1"));
    }
    let root = x.mul(x, wp).sub(&one, wp).sqrt(wp)?;
    Ok(ln(&x.add(&root, wp), wp)?.with_precision(precision))
}

/// The inverse hyperbolic tangent.
pub fn atanh(x: &Float, precision: u32) -> EvalResult<Float> {
    let wp = working_precision(precision, x);
    let one = Float::one(wp);
    if x.abs() >= one {
        return Err(RuntimeError::domain("atanh", "argument is outside (-1, 1)"));
    }
    let ratio = one.add(x, wp).div(&one.sub(x, wp), wp)?;
    Ok(ln(&ratio, wp)?.mul_pow2(-1).with_precision(precision))
}

/// `2 / sqrt(pi) * sum (-1)^n x^(2n+1) / (n! (2n+1))` at working precision.
fn erf_series(x: &Float, wp: u32) -> EvalResult<Float> {
    let x_squared = x.mul(x, wp);
    let mut power = x.clone();
    let mut sum = x.clone();
    for n in 1u64.. {
        power = power.mul(&x_squared, wp).div_u64(n, wp).neg();
        let term = power.div_u64(2 * n + 1, wp);
        if negligible(&term, &sum, wp) {
            break;
        }
        sum = sum.add(&term, wp);
    }
    let scale = pi(wp).sqrt(wp)?;
    sum.mul_pow2(1).div(&scale, wp)
}

/// Bits lost to cancellation when summing the `erf` series at `x`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn erf_cancellation(x: &Float) -> u32 {
    let x = x.to_f64();
    (x * x * LOG2_E).min(f64::from(1u32 << 24)) as u32 + 8
}

/// The error function.
pub fn erf(x: &Float, precision: u32) -> EvalResult<Float> {
    if x.is_zero() {
        return Ok(Float::zero(precision));
    }
    let approx = x.to_f64();
    if approx * approx > f64::from(precision + 8) * LN_2 + 4.0 {
        let one = Float::one(precision);
        return Ok(if x.is_negative() { one.neg() } else { one });
    }
    let wp = working_precision(precision, x) + erf_cancellation(x);
    Ok(erf_series(x, wp)?.with_precision(precision))
}

/// The complementary error function, `1 - erf x`.
pub fn erfc(x: &Float, precision: u32) -> EvalResult<Float> {
    let wp = precision + GUARD_BITS;
    if !x.is_positive() {
        return Ok(Float::one(wp).sub(&erf(x, wp)?, wp).with_precision(precision));
    }

    let approx = x.to_f64();
    if approx * approx > f64::from(wp) * LN_2 {
        return erfc_asymptotic(x, precision);
    }
    // The result is about e^(-x^2), so the series needs that many more bits.
    let wp = wp + 2 * erf_cancellation(x);
    let erf = erf_series(x, wp)?;
    Ok(Float::one(wp).sub(&erf, wp).with_precision(precision))
}

/// `e^(-x^2) / (x sqrt pi) * sum (-1)^n (2n-1)!! / (2x^2)^n` for large `x`.
fn erfc_asymptotic(x: &Float, precision: u32) -> EvalResult<Float> {
    let wp = precision + GUARD_BITS;
    let x_squared = x.mul(x, wp);
    let twice = x_squared.mul_pow2(1);

    let mut term = Float::one(wp);
    let mut sum = Float::one(wp);
    for n in 1u64.. {
        let next = term.mul_i64(-(2 * i64::try_from(n).unwrap_or(i64::MAX) - 1), wp)
                       .div(&twice, wp)?;
        if negligible(&next, &sum, wp) || next.abs() > term.abs() {
            break;
        }
        sum = sum.add(&next, wp);
        term = next;
    }

    let scale = exp(&x_squared.neg(), wp)?;
    let denominator = x.mul(&pi(wp).sqrt(wp)?, wp);
    Ok(sum.mul(&scale, wp).div(&denominator, wp)?.with_precision(precision))
}

/// `sqrt(x^2 + y^2)`.
pub fn hypot(x: &Float, y: &Float, precision: u32) -> EvalResult<Float> {
    let wp = precision + GUARD_BITS;
    x.mul(x, wp).add(&y.mul(y, wp), wp).sqrt(precision)
}

/// `base ^ exponent`.
///
/// Integral exponents up to `2^24` in magnitude use repeated squaring, so
/// exact results stay exact. Other exponents go through `exp(b * ln a)`.
pub fn pow(base: &Float, exponent: &Float, precision: u32) -> EvalResult<Float> {
    if exponent.is_zero() {
        return Ok(Float::one(precision));
    }

    if exponent.is_integer()
       && let Some(n) = exponent.to_bigint(Rounding::TowardZero).to_i64()
       && n.unsigned_abs() <= 1 << 24
    {
        return pow_integer(base, n, precision);
    }

    if base.is_zero() {
        return if exponent.is_positive() {
            Ok(Float::zero(precision))
        } else {
            Err(RuntimeError::DivisionByZero)
        };
    }

    let odd_integer = exponent.is_integer()
                      && exponent.to_bigint(Rounding::TowardZero).is_odd();
    if base.is_negative() && !exponent.is_integer() {
        return Err(RuntimeError::domain("pow", "negative base with a fractional exponent"));
    }

    let wp = precision + GUARD_BITS;
    let logarithm = ln(&base.abs(), wp + 64)?;
    let product = exponent.mul(&logarithm, wp + 64);
    let extra = u32::try_from(product.order().unwrap_or(0).max(0)).unwrap_or(0);
    let result = exp(&product, wp + extra)?;

    let result = if base.is_negative() && odd_integer {
        result.neg()
    } else {
        result
    };
    Ok(result.with_precision(precision))
}

/// `base^n` by repeated squaring, rounded to `precision` bits.
pub(crate) fn pow_integer(base: &Float, n: i64, precision: u32) -> EvalResult<Float> {
    let bits = 64 - n.unsigned_abs().leading_zeros();
    let wp = precision + GUARD_BITS + bits;

    let mut result = Float::one(wp);
    let mut square = base.with_precision(wp.max(base.precision()));
    let mut remaining = n.unsigned_abs();
    while remaining > 0 {
        if remaining & 1 == 1 {
            result = result.mul(&square, wp);
        }
        remaining >>= 1;
        if remaining > 0 {
            square = square.mul(&square, wp);
        }
    }

    if n < 0 {
        Float::one(wp).div(&result, precision)
    } else {
        Ok(result.with_precision(precision))
    }
}

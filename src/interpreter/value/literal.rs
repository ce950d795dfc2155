use num_bigint::BigInt;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::{
            core::Num,
            float::Float,
            transcend::{GUARD_BITS, pow_integer},
        },
    },
    util::num::u64_to_u32_saturating,
};

/// What the lexer believed a numeric token to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    /// Digits with an optional radix prefix.
    Integer,
    /// Digits with a fractional part, an exponent or an SI suffix.
    Float,
}

/// Largest decimal exponent a float literal may carry.
const MAX_DECIMAL_EXPONENT: u64 = 1 << 40;

/// Decimal exponent of an SI multiplier suffix.
const fn suffix_exponent(suffix: char) -> Option<i64> {
    match suffix {
        'k' => Some(3),
        'M' => Some(6),
        'G' => Some(9),
        'T' => Some(12),
        'P' => Some(15),
        'E' => Some(18),
        'm' => Some(-3),
        'u' => Some(-6),
        'n' => Some(-9),
        'p' => Some(-12),
        'f' => Some(-15),
        'a' => Some(-18),
        _ => None,
    }
}

impl Num {
    /// Parses a numeric literal.
    ///
    /// A leading `0d` forces base 10. Otherwise integers follow the usual
    /// prefixes: `0x` hexadecimal, `0b` binary and a leading `0` octal. A
    /// literal hinted as a float that consists of digits only becomes an
    /// integer. Floats may end in one SI multiplier suffix; any other suffix
    /// is rejected with the fatal [`RuntimeError::UnknownSuffix`].
    ///
    /// # Example
    /// ```
    /// use mpcalc::interpreter::value::{core::Num, literal::LiteralKind};
    ///
    /// let hex = Num::from_literal("0x1f", LiteralKind::Integer, 256).unwrap();
    /// assert_eq!(hex, Num::from(31));
    ///
    /// let octal = Num::from_literal("010", LiteralKind::Integer, 256).unwrap();
    /// let decimal = Num::from_literal("0d010", LiteralKind::Integer, 256).unwrap();
    /// assert_eq!((octal, decimal), (Num::from(8), Num::from(10)));
    ///
    /// let kilo = Num::from_literal("1.5k", LiteralKind::Float, 256).unwrap();
    /// assert_eq!(kilo.to_string(), "1500");
    ///
    /// assert!(Num::from_literal("1.5q", LiteralKind::Float, 256).unwrap_err().is_fatal());
    /// ```
    pub fn from_literal(text: &str, kind: LiteralKind, precision: u32) -> EvalResult<Self> {
        let (body, force_decimal) = match text.strip_prefix("0d") {
            Some(rest) if !rest.is_empty() => (rest, true),
            _ => (text, false),
        };

        let kind = if kind == LiteralKind::Float && body.bytes().all(|b| b.is_ascii_digit()) {
            LiteralKind::Integer
        } else {
            kind
        };

        match kind {
            LiteralKind::Integer => parse_integer(text, body, force_decimal),
            LiteralKind::Float => parse_float(text, body, precision),
        }
    }
}

fn parse_integer(text: &str, body: &str, force_decimal: bool) -> EvalResult<Num> {
    let (digits, radix) = if force_decimal {
        (body, 10)
    } else if let Some(rest) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        (rest, 16)
    } else if let Some(rest) = body.strip_prefix("0b").or_else(|| body.strip_prefix("0B")) {
        (rest, 2)
    } else if body.len() > 1
              && let Some(rest) = body.strip_prefix('0')
    {
        (rest, 8)
    } else {
        (body, 10)
    };

    BigInt::parse_bytes(digits.as_bytes(), radix).map(Num::Integer)
                                                 .ok_or_else(|| RuntimeError::InvalidLiteral { literal:
                                                                                                   text.to_string(), })
}

fn parse_float(text: &str, body: &str, precision: u32) -> EvalResult<Num> {
    let invalid = || RuntimeError::InvalidLiteral { literal: text.to_string() };

    let (number, scale) = match body.chars().last() {
        Some(last) if last.is_ascii_alphabetic() => {
            let exponent = suffix_exponent(last).ok_or(RuntimeError::UnknownSuffix { literal:
                                                                                          text.to_string(),
                                                                                      suffix: last, })?;
            (&body[..body.len() - last.len_utf8()], exponent)
        },
        _ => (body, 0),
    };

    let (mantissa, exponent) = match number.find(['e', 'E']) {
        Some(index) => {
            let exponent = number[index + 1..].parse::<i64>().map_err(|_| invalid())?;
            (&number[..index], exponent)
        },
        None => (number, 0),
    };

    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    let digits = format!("{whole}{fraction}");
    let significand = BigInt::parse_bytes(digits.as_bytes(), 10).ok_or_else(invalid)?;

    let fraction_len = i64::try_from(fraction.len()).map_err(|_| invalid())?;
    let power = exponent.checked_add(scale)
                        .and_then(|e| e.checked_sub(fraction_len))
                        .ok_or_else(invalid)?;

    if power.unsigned_abs() > MAX_DECIMAL_EXPONENT {
        return Err(RuntimeError::Overflow { details: format!("exponent of '{text}' is out of range") });
    }

    let wp = precision + GUARD_BITS;
    let bits = u64_to_u32_saturating(significand.bits());
    let significand = Float::from_bigint(&significand, wp.max(bits));
    let value = if power == 0 {
        significand.with_precision(precision)
    } else {
        significand.mul(&pow_integer(&Float::from_i64(10, wp), power, wp)?, precision)
    };
    Ok(Num::Float(value))
}

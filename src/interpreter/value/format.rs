use std::fmt;

use num_bigint::BigInt;
use num_traits::Signed;

use crate::interpreter::value::{core::Num, float::Rounding};

/// Significant decimal digits printed for floats unless configured otherwise.
pub const DEFAULT_DIGITS: usize = 20;

/// Radix and notation used when printing results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Base 2 with a `0b` prefix.
    Binary,
    /// Base 10; floats use fixed or exponent notation, whichever is shorter.
    #[default]
    Decimal,
    /// Base 10; floats always use exponent notation.
    Scientific,
    /// Base 16 with a `0x` prefix.
    Hex,
    /// Base 8 with a `0` prefix.
    Octal,
}

impl OutputMode {
    /// Parses a mode name as accepted by the `mode` command.
    ///
    /// # Example
    /// ```
    /// use mpcalc::interpreter::value::format::OutputMode;
    ///
    /// assert_eq!(OutputMode::from_name("x"), Some(OutputMode::Hex));
    /// assert_eq!(OutputMode::from_name("dec"), Some(OutputMode::Decimal));
    /// assert_eq!(OutputMode::from_name("q"), None);
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "b" | "bin" | "binary" => Some(Self::Binary),
            "d" | "dec" | "decimal" => Some(Self::Decimal),
            "s" | "sci" | "scientific" => Some(Self::Scientific),
            "h" | "x" | "hex" => Some(Self::Hex),
            "o" | "oct" | "octal" => Some(Self::Octal),
            _ => None,
        }
    }

    /// Rounding used to coerce floats to integers while this mode is active.
    #[must_use]
    pub const fn rounding(self) -> Rounding {
        match self {
            Self::Decimal | Self::Scientific => Rounding::Nearest,
            Self::Binary | Self::Hex | Self::Octal => Rounding::TowardZero,
        }
    }

    const fn radix(self) -> (u32, &'static str) {
        match self {
            Self::Binary => (2, "0b"),
            Self::Decimal | Self::Scientific => (10, ""),
            Self::Hex => (16, "0x"),
            Self::Octal => (8, "0"),
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Binary => "binary",
            Self::Decimal => "decimal",
            Self::Scientific => "scientific",
            Self::Hex => "hex",
            Self::Octal => "octal",
        };
        write!(f, "{name}")
    }
}

/// Renders a number for display.
///
/// Integers are printed in the radix of `mode` with its prefix. Floats are
/// printed with `digits` significant digits in the decimal modes and
/// converted to integers first in the other modes.
///
/// # Example
/// ```
/// use mpcalc::interpreter::value::{
///     core::Num,
///     format::{OutputMode, format_number},
/// };
///
/// assert_eq!(format_number(&Num::from(255), OutputMode::Hex, 20), "0xff");
/// assert_eq!(format_number(&Num::from(-5), OutputMode::Binary, 20), "-0b101");
/// assert_eq!(format_number(&Num::from(8), OutputMode::Octal, 20), "010");
/// ```
#[must_use]
pub fn format_number(num: &Num, mode: OutputMode, digits: usize) -> String {
    match (num, mode) {
        (Num::Integer(n), _) => format_integer(n, mode),
        (Num::Float(f), OutputMode::Decimal | OutputMode::Scientific) => {
            let (mantissa, exponent) = f.to_decimal(digits);
            let body = format_decimal(&mantissa,
                                      exponent,
                                      digits,
                                      mode == OutputMode::Scientific);
            if f.is_negative() { format!("-{body}") } else { body }
        },
        (Num::Float(f), _) => format_integer(&f.to_bigint(mode.rounding()), mode),
    }
}

fn format_integer(n: &BigInt, mode: OutputMode) -> String {
    let (radix, prefix) = mode.radix();
    let digits = n.abs().to_str_radix(radix);
    let prefix = if radix == 8 && digits == "0" { "" } else { prefix };
    let sign = if n.is_negative() { "-" } else { "" };
    format!("{sign}{prefix}{digits}")
}

/// Lays out significant digits `mantissa` whose first digit has decimal
/// exponent `exponent`, in the style of C's `%g` (or `%e` when `scientific`).
fn format_decimal(mantissa: &str, exponent: i64, digits: usize, scientific: bool) -> String {
    let trimmed = mantissa.trim_end_matches('0');
    let trimmed = if trimmed.is_empty() { "0" } else { trimmed };
    let wide = i64::try_from(digits).unwrap_or(i64::MAX);

    if scientific || exponent < -4 || exponent >= wide {
        let (first, rest) = trimmed.split_at(1);
        let sign = if exponent < 0 { '-' } else { '+' };
        let fraction = if rest.is_empty() {
            String::new()
        } else {
            format!(".{rest}")
        };
        return format!("{first}{fraction}e{sign}{:02}", exponent.unsigned_abs());
    }

    if exponent < 0 {
        let zeros = "0".repeat(usize::try_from(-exponent - 1).unwrap_or(0));
        return format!("0.{zeros}{trimmed}");
    }

    let whole = usize::try_from(exponent + 1).unwrap_or(0);
    if trimmed.len() <= whole {
        format!("{trimmed}{}", "0".repeat(whole - trimmed.len()))
    } else {
        let (integer, fraction) = trimmed.split_at(whole);
        format!("{integer}.{fraction}")
    }
}

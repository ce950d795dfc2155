/// The numeric value type.
///
/// Defines [`core::Num`], the integer-or-float number every expression
/// evaluates to, together with the session-wide numeric [`core::Settings`]
/// and the promotion helpers used by the operators.
pub mod core;
/// Arbitrary-precision binary floats.
///
/// Implements [`float::Float`], a `mantissa * 2^exponent` number rounded to
/// a configurable number of bits, with exact comparison, integer conversion
/// under several rounding directions, roots and decimal digit generation.
pub mod float;
/// Rendering numbers as text.
///
/// Provides the output modes (binary, decimal, scientific, hex, octal) and
/// [`format::format_number`].
pub mod format;
/// Numeric literal parsing.
///
/// Turns the text of a numeric token into a [`core::Num`], honouring radix
/// prefixes, the decimal-forcing `0d` prefix and SI multiplier suffixes.
pub mod literal;
/// Elementary and special functions.
///
/// Series evaluations of the constants, exponential, logarithm,
/// trigonometric, hyperbolic and error functions, plus general powers.
pub mod transcend;

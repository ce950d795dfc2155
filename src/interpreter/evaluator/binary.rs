/// Arithmetic and bitwise operators.
///
/// Implements the promotion rule for `+ - * / % **` and the integer-only
/// operators `& | ^ << >>`.
pub mod core;

/// Comparison operators.
///
/// Compares in the integer domain when both operands are integral and in the
/// float domain otherwise.
pub mod comparison;

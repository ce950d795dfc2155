/// Numeric conversion helpers.
///
/// Small conversions between machine words and the big-integer types that
/// would otherwise be repeated at every call site: clamped shift counts,
/// saturating narrowing and an arithmetic right shift on `BigInt`.
pub mod num;

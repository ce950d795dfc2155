use num_bigint::BigInt;
use num_traits::Signed;

/// Converts a signed shift count into the unsigned amount expected by the
/// big-integer shift operators. Negative counts become zero.
///
/// ## Example
/// ```
/// use mpcalc::util::num::shift_amount;
///
/// assert_eq!(shift_amount(12), 12);
/// assert_eq!(shift_amount(-3), 0);
/// ```
#[must_use]
pub fn shift_amount(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

/// Converts a machine word into a `u32`, saturating at `u32::MAX`.
///
/// ## Example
/// ```
/// use mpcalc::util::num::u64_to_u32_saturating;
///
/// assert_eq!(u64_to_u32_saturating(7), 7);
/// assert_eq!(u64_to_u32_saturating(u64::MAX), u32::MAX);
/// ```
#[must_use]
pub fn u64_to_u32_saturating(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Converts an argument count into a `u64` for averaging.
#[must_use]
pub fn usize_to_u64(value: usize) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

/// Shifts `value` right by `shift` bits, rounding toward negative infinity
/// as a two's-complement arithmetic shift does.
///
/// ## Example
/// ```
/// use mpcalc::util::num::shr_floor;
/// use num_bigint::BigInt;
///
/// assert_eq!(shr_floor(&BigInt::from(-5), 1), BigInt::from(-3));
/// assert_eq!(shr_floor(&BigInt::from(5), 1), BigInt::from(2));
/// ```
#[must_use]
pub fn shr_floor(value: &BigInt, shift: u64) -> BigInt {
    if value.is_negative() {
        let magnitude: BigInt = -value - 1u32;
        -(magnitude >> shift) - 1u32
    } else {
        value >> shift
    }
}

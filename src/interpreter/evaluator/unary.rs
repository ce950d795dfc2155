use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive};

use crate::{
    ast::{Expr, PartSelectKind, UnaryOperator},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::{Num, Settings},
    },
    memory::pool::Handle,
    table::vars::VarTable,
    util::num::shr_floor,
};

/// Below this many factors the factorial product is taken directly.
const SPLIT_THRESHOLD: u64 = 32;

impl Context {
    /// Evaluates the operand and applies a unary operator to it.
    pub(crate) fn eval_unary(&mut self,
                             op: UnaryOperator,
                             operand: &Expr,
                             scope: Option<&mut VarTable>)
                             -> EvalResult<Handle> {
        let handle = self.eval(operand, scope)?;
        let result = apply_unary(op, self.value(handle)?, &self.settings)?;
        Ok(self.scratch(result))
    }

    /// Evaluates the value and the bounds of a part-select, left to right.
    pub(crate) fn eval_part_select(&mut self,
                                   kind: PartSelectKind,
                                   value: &Expr,
                                   high: &Expr,
                                   low: Option<&Expr>,
                                   mut scope: Option<&mut VarTable>)
                                   -> EvalResult<Handle> {
        let value = self.eval(value, scope.as_deref_mut())?;
        let high = self.eval(high, scope.as_deref_mut())?;
        let low = match low {
            Some(low) => Some(self.eval(low, scope)?),
            None => None,
        };

        let low = match low {
            Some(handle) => Some(self.value(handle)?),
            None => None,
        };
        let result = part_select(kind, self.value(value)?, self.value(high)?, low, &self.settings)?;
        Ok(self.scratch(result))
    }
}

/// Applies a unary operator.
///
/// Negation keeps the kind and precision of its operand. `~` and `!` work on
/// integers; `!` requires an operand that fits an unsigned 64-bit word.
///
/// # Example
/// ```
/// use mpcalc::{
///     ast::UnaryOperator,
///     interpreter::{
///         evaluator::unary::apply_unary,
///         value::core::{Num, Settings},
///     },
/// };
///
/// let settings = Settings::default();
/// let fact = apply_unary(UnaryOperator::Factorial, &Num::from(5), &settings).unwrap();
/// assert_eq!(fact, Num::from(120));
///
/// let inverted = apply_unary(UnaryOperator::Invert, &Num::from(0), &settings).unwrap();
/// assert_eq!(inverted, Num::from(-1));
///
/// assert!(apply_unary(UnaryOperator::Factorial, &Num::from(-1), &settings).is_err());
/// ```
pub fn apply_unary(op: UnaryOperator, value: &Num, settings: &Settings) -> EvalResult<Num> {
    match op {
        UnaryOperator::Negate => Ok(value.negated()),
        UnaryOperator::Invert => Ok(Num::Integer(-value.to_integer(settings.rounding) - 1u32)),
        UnaryOperator::Factorial => {
            let n = value.to_word(settings, "Argument to factorial")?;
            Ok(Num::Integer(factorial(n)))
        },
    }
}

/// `n!` by binary splitting.
#[must_use]
pub fn factorial(n: u64) -> BigInt {
    product(1, n)
}

/// Product of the integers in `low..=high`; one for an empty range.
fn product(low: u64, high: u64) -> BigInt {
    if high < low {
        return BigInt::one();
    }
    if high - low < SPLIT_THRESHOLD {
        return (low..=high).fold(BigInt::one(), |acc, k| acc * k);
    }
    let middle = low + (high - low) / 2;
    product(low, middle) * product(middle + 1, high)
}

/// Extracts a bit field from the two's-complement representation of `value`.
///
/// `high` is the top bit. For [`PartSelectKind::Fixed`] `low` is the bottom
/// bit; for [`PartSelectKind::Descending`] it is the width of the field,
/// ending at `high`. A single-bit select takes no `low`.
///
/// # Example
/// ```
/// use mpcalc::{
///     ast::PartSelectKind,
///     interpreter::{
///         evaluator::unary::part_select,
///         value::core::{Num, Settings},
///     },
/// };
///
/// let settings = Settings::default();
/// let v = Num::from(0xabcd);
///
/// let byte = part_select(PartSelectKind::Fixed, &v, &Num::from(15), Some(&Num::from(8)), &settings);
/// assert_eq!(byte.unwrap(), Num::from(0xab));
///
/// let nibble = part_select(PartSelectKind::Descending, &v, &Num::from(7), Some(&Num::from(4)), &settings);
/// assert_eq!(nibble.unwrap(), Num::from(0xc));
///
/// assert!(part_select(PartSelectKind::Fixed, &v, &Num::from(3), Some(&Num::from(-1)), &settings).is_err());
/// ```
pub fn part_select(kind: PartSelectKind,
                   value: &Num,
                   high: &Num,
                   low: Option<&Num>,
                   settings: &Settings)
                   -> EvalResult<Num> {
    let high = bit_index(high, "high bound", settings)?;
    let low = match (kind, low) {
        (PartSelectKind::Single, _) => high,
        (PartSelectKind::Fixed, Some(low)) => {
            let low = bit_index(low, "low bound", settings)?;
            if low > high {
                return Err(invalid_part_select("low bound is above the high bound"));
            }
            low
        },
        (PartSelectKind::Descending, Some(width)) => {
            let width = bit_index(width, "width", settings)?;
            if width == 0 {
                return Err(invalid_part_select("width is zero"));
            }
            high.checked_sub(width - 1)
                .ok_or_else(|| invalid_part_select("range extends below bit 0"))?
        },
        (_, None) => return Err(invalid_part_select("missing low bound")),
    };

    let width = (high - low).checked_add(1)
                            .ok_or_else(|| RuntimeError::not_representable("Part-select width"))?;
    let value = value.to_integer(settings.rounding);
    let shifted = shr_floor(&value, low);

    if !shifted.is_negative() && shifted.bits() <= width {
        return Ok(Num::Integer(shifted));
    }
    let mask = (BigInt::one() << width) - 1u32;
    Ok(Num::Integer(shifted & mask))
}

fn bit_index(bound: &Num, what: &str, settings: &Settings) -> EvalResult<u64> {
    let bound = bound.to_integer(settings.rounding);
    if bound.is_negative() {
        return Err(invalid_part_select(&format!("{what} is negative")));
    }
    bound.to_u64()
         .ok_or_else(|| RuntimeError::not_representable(format!("Part-select {what}")))
}

fn invalid_part_select(details: &str) -> RuntimeError {
    RuntimeError::InvalidPartSelect { details: details.to_string() }
}

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, ToPrimitive, Zero};

use crate::{
    ast::{BinaryOperator, Expr},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::{
            core::{Num, Settings},
            float::Float,
            transcend,
        },
    },
    memory::pool::Handle,
    table::vars::VarTable,
    util::num::shr_floor,
};

impl Context {
    /// Evaluates both operands left to right and applies `op`.
    pub(crate) fn eval_binary(&mut self,
                              op: BinaryOperator,
                              left: &Expr,
                              right: &Expr,
                              mut scope: Option<&mut VarTable>)
                              -> EvalResult<Handle> {
        let lhs = self.eval(left, scope.as_deref_mut())?;
        let rhs = self.eval(right, scope)?;
        let result = apply_binary(op, self.value(lhs)?, self.value(rhs)?, &self.settings)?;
        Ok(self.scratch(result))
    }
}

/// Applies a binary operator to two numbers.
///
/// `+ - * / %` run in the integer domain when both operands are integral:
/// `+ - *` always stay integers, `/` stays an integer only when the division
/// is exact and `%` always does. Everything else, and `**` in every case,
/// runs in the float domain at the larger operand precision. The bitwise
/// operators convert both operands to integers first.
///
/// # Example
/// ```
/// use mpcalc::{
///     ast::BinaryOperator,
///     interpreter::{
///         evaluator::binary::core::apply_binary,
///         value::core::{Num, Settings},
///     },
/// };
///
/// let settings = Settings::default();
/// let exact = apply_binary(BinaryOperator::Div, &Num::from(10), &Num::from(5), &settings);
/// assert_eq!(exact.unwrap(), Num::from(2));
///
/// let inexact = apply_binary(BinaryOperator::Div, &Num::from(10), &Num::from(4), &settings);
/// assert!(matches!(inexact.unwrap(), Num::Float(_)));
/// ```
pub fn apply_binary(op: BinaryOperator,
                    lhs: &Num,
                    rhs: &Num,
                    settings: &Settings)
                    -> EvalResult<Num> {
    match op {
        BinaryOperator::Add => promoted(lhs,
                                        rhs,
                                        settings,
                                        |a, b| Some(Ok(a + b)),
                                        |x, y, p| Ok(x.add(y, p))),
        BinaryOperator::Sub => promoted(lhs,
                                        rhs,
                                        settings,
                                        |a, b| Some(Ok(a - b)),
                                        |x, y, p| Ok(x.sub(y, p))),
        BinaryOperator::Mul => promoted(lhs,
                                        rhs,
                                        settings,
                                        |a, b| Some(Ok(a * b)),
                                        |x, y, p| Ok(x.mul(y, p))),
        BinaryOperator::Div => promoted(lhs, rhs, settings, exact_quotient, Float::div),
        BinaryOperator::Mod => promoted(lhs, rhs, settings, |a, b| Some(modulo(a, b)), Float::rem),
        BinaryOperator::Pow => float_domain(lhs, rhs, settings, transcend::pow),
        BinaryOperator::And => bitwise(lhs, rhs, settings, |a, b| Ok(a & b)),
        BinaryOperator::Or => bitwise(lhs, rhs, settings, |a, b| Ok(a | b)),
        BinaryOperator::Xor => bitwise(lhs, rhs, settings, |a, b| Ok(a ^ b)),
        BinaryOperator::Shl => bitwise(lhs, rhs, settings, |a, b| Ok(a << shift_count(&b)?)),
        BinaryOperator::Shr => bitwise(lhs, rhs, settings, |a, b| Ok(shr_floor(&a, shift_count(&b)?))),
    }
}

/// Runs `integer` when both operands are integral and falls back to `float`
/// when they are not or when `integer` declines with `None`.
fn promoted<I, F>(lhs: &Num,
                  rhs: &Num,
                  settings: &Settings,
                  integer: I,
                  float: F)
                  -> EvalResult<Num>
    where I: FnOnce(&BigInt, &BigInt) -> Option<EvalResult<BigInt>>,
          F: FnOnce(&Float, &Float, u32) -> EvalResult<Float>
{
    if lhs.is_integral() && rhs.is_integral() {
        let a = lhs.to_integer(settings.rounding);
        let b = rhs.to_integer(settings.rounding);
        if let Some(result) = integer(&a, &b) {
            return result.map(Num::Integer);
        }
    }
    float_domain(lhs, rhs, settings, float)
}

/// Converts both operands to floats and applies `float` at the larger of
/// their precisions.
fn float_domain<F>(lhs: &Num, rhs: &Num, settings: &Settings, float: F) -> EvalResult<Num>
    where F: FnOnce(&Float, &Float, u32) -> EvalResult<Float>
{
    let x = lhs.to_float(settings);
    let y = rhs.to_float(settings);
    let precision = x.precision().max(y.precision());
    float(&x, &y, precision).map(Num::Float)
}

fn bitwise<F>(lhs: &Num, rhs: &Num, settings: &Settings, op: F) -> EvalResult<Num>
    where F: FnOnce(BigInt, BigInt) -> EvalResult<BigInt>
{
    let a = lhs.to_integer(settings.rounding);
    let b = rhs.to_integer(settings.rounding);
    op(a, b).map(Num::Integer)
}

fn exact_quotient(a: &BigInt, b: &BigInt) -> Option<EvalResult<BigInt>> {
    if b.is_zero() {
        return Some(Err(RuntimeError::DivisionByZero));
    }
    let (quotient, remainder) = a.div_rem(b);
    remainder.is_zero().then_some(Ok(quotient))
}

/// Integer remainder in `[0, |b|)`.
fn modulo(a: &BigInt, b: &BigInt) -> EvalResult<BigInt> {
    if b.is_zero() {
        return Err(RuntimeError::DivisionByZero);
    }
    Ok(a.mod_floor(&b.abs()))
}

fn shift_count(amount: &BigInt) -> EvalResult<u64> {
    amount.to_u64()
          .ok_or_else(|| RuntimeError::not_representable("Second argument to shift"))
}

use std::cmp::Ordering;

use crate::{
    ast::{Comparison, Expr},
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::{Num, Settings},
    },
    memory::pool::Handle,
    table::vars::VarTable,
};

impl Context {
    /// Evaluates both operands left to right and compares them.
    pub(crate) fn eval_compare(&mut self,
                               op: Comparison,
                               left: &Expr,
                               right: &Expr,
                               mut scope: Option<&mut VarTable>)
                               -> EvalResult<Handle> {
        let lhs = self.eval(left, scope.as_deref_mut())?;
        let rhs = self.eval(right, scope)?;
        let result = compare(op, self.value(lhs)?, self.value(rhs)?, &self.settings);
        Ok(self.scratch(result))
    }
}

/// Orders two numbers, exactly in the integer domain when both are integral
/// and in the float domain otherwise.
#[must_use]
pub fn order(lhs: &Num, rhs: &Num, settings: &Settings) -> Ordering {
    if lhs.is_integral() && rhs.is_integral() {
        lhs.to_integer(settings.rounding)
           .cmp(&rhs.to_integer(settings.rounding))
    } else {
        lhs.to_float(settings).cmp(&rhs.to_float(settings))
    }
}

/// Applies a comparison and returns the integer `1` when it holds, `0`
/// otherwise.
///
/// # Example
/// ```
/// use mpcalc::{
///     ast::Comparison,
///     interpreter::{
///         evaluator::binary::comparison::compare,
///         value::{core::{Num, Settings}, float::Float},
///     },
/// };
///
/// let settings = Settings::default();
/// let half = Num::Float(Float::from_i64(1, 64).mul_pow2(-1));
///
/// assert_eq!(compare(Comparison::Lt, &half, &Num::from(1), &settings), Num::from(1));
/// assert_eq!(compare(Comparison::Eq, &Num::from(2), &Num::from(3), &settings), Num::from(0));
/// ```
#[must_use]
pub fn compare(op: Comparison, lhs: &Num, rhs: &Num, settings: &Settings) -> Num {
    let ordering = order(lhs, rhs, settings);
    let holds = match op {
        Comparison::Ge => ordering != Ordering::Less,
        Comparison::Le => ordering != Ordering::Greater,
        Comparison::Ne => ordering != Ordering::Equal,
        Comparison::Eq => ordering == Ordering::Equal,
        Comparison::Gt => ordering == Ordering::Greater,
        Comparison::Lt => ordering == Ordering::Less,
    };
    Num::from(holds)
}

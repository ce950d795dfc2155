use std::{cmp::Ordering, io::Write};

use crate::{
    ast::{BinaryOperator, Expr},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            binary::{comparison::order, core::apply_binary},
            core::{Context, EvalResult},
        },
        value::core::Num,
    },
    memory::pool::Handle,
    table::vars::VarTable,
};

/// What a loop does with the value of its body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fold {
    Sum,
    Product,
    Table,
}

/// `sum(expr, var, from, to[, step])`: the sum of `expr` for `var` running
/// from `from` to `to`.
///
/// # Example
/// ```
/// use mpcalc::interpreter::{evaluator::core::Context, value::core::Num};
///
/// let mut ctx = Context::silent();
/// assert_eq!(ctx.run_source("sum(k * k, k, 1, 4)").unwrap(), Some(Num::from(30)));
/// ```
pub fn sum(context: &mut Context, args: &[Expr], scope: Option<&mut VarTable>) -> EvalResult<Handle> {
    run_loop(context, args, scope, Fold::Sum)
}

/// `prod(expr, var, from, to[, step])`: the product of `expr` for `var`
/// running from `from` to `to`.
pub fn prod(context: &mut Context, args: &[Expr], scope: Option<&mut VarTable>) -> EvalResult<Handle> {
    run_loop(context, args, scope, Fold::Product)
}

/// `tab(expr, var, from, to[, step])`: prints `var` and `expr` for every
/// step and returns the last value of `expr`.
pub fn tab(context: &mut Context, args: &[Expr], scope: Option<&mut VarTable>) -> EvalResult<Handle> {
    run_loop(context, args, scope, Fold::Table)
}

/// Shared loop of the tabulating builtins.
///
/// The bounds and the step are evaluated once in the caller's scope. The
/// body runs in a child scope that borrows every caller variable and owns
/// the loop variable, so nothing the body assigns leaks out of the loop.
fn run_loop(context: &mut Context,
            args: &[Expr],
            mut scope: Option<&mut VarTable>,
            fold: Fold)
            -> EvalResult<Handle> {
    let [body, variable, from, to, rest @ ..] = args else {
        return Err(RuntimeError::arity("sum", 4, 5));
    };
    let Expr::Variable { name } = variable else {
        return Err(RuntimeError::InvalidArgument { details: "second argument must be a variable name".to_string() });
    };

    let from = context.eval_num(from, scope.as_deref_mut())?;
    let to = context.eval_num(to, scope.as_deref_mut())?;
    let step = match rest.first() {
        Some(step) => context.eval_num(step, scope.as_deref_mut())?,
        None => Num::from(1),
    };
    let direction = order(&step, &Num::from(0), &context.settings);
    if direction == Ordering::Equal {
        return Err(RuntimeError::InvalidArgument { details: "step must not be zero".to_string() });
    }

    let mut local = match scope {
        Some(parent) => VarTable::child_of(parent),
        None => VarTable::local(),
    };
    let outcome = iterate(context, body, name, (from, to, step, direction), &mut local, fold);
    local.destroy(&mut context.numbers)?;

    let result = outcome?;
    Ok(context.scratch(result))
}

fn iterate(context: &mut Context,
           body: &Expr,
           name: &str,
           (from, to, step, direction): (Num, Num, Num, Ordering),
           local: &mut VarTable,
           fold: Fold)
           -> EvalResult<Num> {
    let mut accumulator = match fold {
        Fold::Sum | Fold::Table => Num::from(0),
        Fold::Product => Num::from(1),
    };

    let mut current = from;
    while order(&current, &to, &context.settings) != direction {
        local.assign(name, current.clone(), &mut context.numbers)?;
        let value = context.eval_num(body, Some(&mut *local))?;

        accumulator = match fold {
            Fold::Sum => apply_binary(BinaryOperator::Add, &accumulator, &value, &context.settings)?,
            Fold::Product => apply_binary(BinaryOperator::Mul, &accumulator, &value, &context.settings)?,
            Fold::Table => {
                let row = format!("{name} = {}\t{}", context.format(&current), context.format(&value));
                writeln!(context.out, "{row}")?;
                value
            },
        };

        let next = apply_binary(BinaryOperator::Add, &current, &step, &context.settings)?;
        if order(&next, &current, &context.settings) == Ordering::Equal {
            return Err(RuntimeError::InvalidArgument { details: "step is too small to advance the loop variable".to_string() });
        }
        current = next;
    }
    Ok(accumulator)
}

use crate::{
    ast::Expr,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Num,
    },
    memory::pool::Handle,
    table::vars::VarTable,
};

impl Context {
    /// Evaluates `first` for its effects and returns the value of `second`.
    pub(crate) fn eval_sequence(&mut self,
                                first: &Expr,
                                second: &Expr,
                                mut scope: Option<&mut VarTable>)
                                -> EvalResult<Handle> {
        self.eval(first, scope.as_deref_mut())?;
        self.eval(second, scope)
    }

    /// Evaluates a conditional. A missing else-branch yields `0`.
    pub(crate) fn eval_if(&mut self,
                          condition: &Expr,
                          then_branch: &Expr,
                          else_branch: Option<&Expr>,
                          mut scope: Option<&mut VarTable>)
                          -> EvalResult<Handle> {
        if self.eval_condition(condition, scope.as_deref_mut())? {
            self.eval(then_branch, scope)
        } else if let Some(else_branch) = else_branch {
            self.eval(else_branch, scope)
        } else {
            Ok(self.scratch(Num::from(0)))
        }
    }

    /// Evaluates a loop.
    ///
    /// The condition is evaluated before every iteration. The loop yields the
    /// value of the last body evaluation, or `0` when the body never ran.
    /// There is no iteration limit.
    pub(crate) fn eval_while(&mut self,
                             condition: &Expr,
                             body: &Expr,
                             mut scope: Option<&mut VarTable>)
                             -> EvalResult<Handle> {
        let mut last = None;
        while self.eval_condition(condition, scope.as_deref_mut())? {
            last = Some(self.eval(body, scope.as_deref_mut())?);
        }
        match last {
            Some(handle) => Ok(handle),
            None => Ok(self.scratch(Num::from(0))),
        }
    }

    /// Any nonzero value is true.
    fn eval_condition(&mut self, condition: &Expr, scope: Option<&mut VarTable>) -> EvalResult<bool> {
        let handle = self.eval(condition, scope)?;
        Ok(!self.value(handle)?.is_zero())
    }
}

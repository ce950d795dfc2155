use std::io::{self, Write};

use tracing::{debug, error};

use crate::{
    ast::Expr,
    config::Config,
    error::RuntimeError,
    interpreter::{
        evaluator::function::core::register_builtins,
        value::{
            core::{Num, Settings},
            format::OutputMode,
            transcend,
        },
    },
    memory::pool::{Bucket, Handle, Pool},
    table::{funcs::FunctionTable, vars::VarTable},
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// Stores the runtime evaluation context.
///
/// This struct holds the whole interpreter state: the number pool, the global
/// variables, the function table and the output settings. Nothing is global;
/// every evaluation goes through a `Context`.
///
/// ## Usage
///
/// `Context` is created once per session and reused for every statement.
/// [`Context::eval`] evaluates one expression into the scratch bucket of the
/// pool; [`Context::evaluate_statement`] is the top-level entry point that
/// prints the result, stores it in `ans` and releases the scratch bucket.
///
/// # Example
/// ```
/// use mpcalc::{
///     ast::{BinaryOperator, Expr},
///     interpreter::{evaluator::core::Context, value::core::Num},
/// };
///
/// let mut ctx = Context::silent();
/// let expr = Expr::binary(BinaryOperator::Add,
///                         Expr::number(Num::from(2)),
///                         Expr::number(Num::from(3)));
///
/// assert_eq!(ctx.evaluate_statement(&expr).unwrap(), Num::from(5));
/// assert_eq!(ctx.lookup_variable("ans"), Some(Num::from(5)));
/// ```
pub struct Context {
    /// Every number the session holds, persistent or scratch.
    pub(crate) numbers:   Pool<Num>,
    /// The global variable table.
    pub(crate) globals:   VarTable,
    /// Builtins and user-defined functions.
    pub(crate) functions: FunctionTable,
    /// Precision and rounding for new values.
    pub(crate) settings:  Settings,
    /// Radix used when printing results.
    pub(crate) mode:      OutputMode,
    /// Significant digits printed for floats.
    pub(crate) digits:    usize,
    /// Where results and listings are written.
    pub(crate) out:       Box<dyn Write>,
    /// Set by the `quit` command.
    pub(crate) quit:      bool,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// Creates a context with the default configuration, writing to standard
    /// output.
    #[must_use]
    pub fn new() -> Self {
        Self::with_output(Config::default(), Box::new(io::stdout()))
    }

    /// Creates a context with the default configuration that discards its
    /// output.
    #[must_use]
    pub fn silent() -> Self {
        Self::with_output(Config::default(), Box::new(io::sink()))
    }

    /// Creates a context from `config`, writing results to `out`.
    ///
    /// Registers the builtin functions and defines the constants `pi`, `e`
    /// and `G` at the configured precision.
    #[must_use]
    pub fn with_output(config: Config, out: Box<dyn Write>) -> Self {
        let mut functions = FunctionTable::new();
        register_builtins(&mut functions);

        let mut context = Self { numbers: Pool::new(),
                                 globals: VarTable::global(),
                                 functions,
                                 settings: config.settings(),
                                 mode: config.mode,
                                 digits: config.digits,
                                 out,
                                 quit: false };

        if let Err(e) = context.define_constants() {
            error!("failed to define constants: {e}");
        }
        debug!(precision = context.settings.precision,
               mode = %context.mode,
               builtins = context.functions.len(),
               "context ready");
        context
    }

    fn define_constants(&mut self) -> EvalResult<()> {
        let precision = self.settings.precision;
        let constants = [("pi", transcend::pi(precision)),
                         ("e", transcend::euler(precision)?),
                         ("G", transcend::catalan(precision)?)];
        for (name, value) in constants {
            self.globals.assign(name, Num::Float(value), &mut self.numbers)?;
        }
        Ok(())
    }

    /// Evaluates an expression into the scratch bucket.
    ///
    /// This is the recursive core of the interpreter. Variables are resolved
    /// in `scope` first and in the global table second, at the moment they
    /// are evaluated. Assignments go to `scope` when present, otherwise to
    /// the global table.
    ///
    /// # Parameters
    /// - `expr`: Expression to evaluate.
    /// - `scope`: The local table of the running function call, if any.
    ///
    /// # Returns
    /// A handle to a scratch copy of the result, valid until the scratch
    /// bucket is released at the end of the statement.
    pub fn eval(&mut self, expr: &Expr, scope: Option<&mut VarTable>) -> EvalResult<Handle> {
        match expr {
            Expr::Number(value) => Ok(self.scratch(value.clone())),
            Expr::Variable { name } => self.eval_variable(name, scope.as_deref()),
            Expr::Assign { name, value } => self.eval_assign(name, value, scope),
            Expr::Binary { op, left, right } => self.eval_binary(*op, left, right, scope),
            Expr::Unary { op, operand } => self.eval_unary(*op, operand, scope),
            Expr::Compare { op, left, right } => self.eval_compare(*op, left, right, scope),
            Expr::PartSelect { kind,
                               value,
                               high,
                               low, } => {
                self.eval_part_select(*kind, value, high, low.as_deref(), scope)
            },
            Expr::Sequence { first, second } => self.eval_sequence(first, second, scope),
            Expr::If { condition,
                       then_branch,
                       else_branch, } => {
                self.eval_if(condition, then_branch, else_branch.as_deref(), scope)
            },
            Expr::While { condition, body } => self.eval_while(condition, body, scope),
            Expr::Call { name, arguments } => self.call_function(name, arguments, scope),
        }
    }

    /// Evaluates an expression and returns a copy of its value.
    pub fn eval_num(&mut self, expr: &Expr, scope: Option<&mut VarTable>) -> EvalResult<Num> {
        let handle = self.eval(expr, scope)?;
        Ok(self.value(handle)?.clone())
    }

    /// Stores `value` in the scratch bucket.
    pub(crate) fn scratch(&mut self, value: Num) -> Handle {
        self.numbers.allocate(Bucket::Scratch, value)
    }

    /// The number behind `handle`.
    pub(crate) fn value(&self, handle: Handle) -> EvalResult<&Num> {
        Ok(self.numbers.get(handle)?)
    }

    fn eval_variable(&mut self, name: &str, scope: Option<&VarTable>) -> EvalResult<Handle> {
        let handle = scope.and_then(|local| local.handle(name))
                          .or_else(|| self.globals.handle(name))
                          .ok_or_else(|| RuntimeError::UnknownVariable { name: name.to_string() })?;
        let value = self.value(handle)?.clone();
        Ok(self.scratch(value))
    }

    fn eval_assign(&mut self,
                   name: &str,
                   value: &Expr,
                   mut scope: Option<&mut VarTable>)
                   -> EvalResult<Handle> {
        let handle = self.eval(value, scope.as_deref_mut())?;
        let value = self.value(handle)?.clone();

        let table = match scope {
            Some(local) => local,
            None => &mut self.globals,
        };
        table.assign(name, value, &mut self.numbers)?;
        Ok(handle)
    }

    /// Settings used for new values.
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The active output mode.
    #[must_use]
    pub const fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Switches the output mode. The rounding used to coerce floats to
    /// integers follows the mode.
    pub fn set_mode(&mut self, mode: OutputMode) {
        self.mode = mode;
        self.settings.rounding = mode.rounding();
        debug!(%mode, "output mode changed");
    }

    /// Returns `true` once the `quit` command has run.
    #[must_use]
    pub const fn should_quit(&self) -> bool {
        self.quit
    }

    /// Read access to the number pool.
    #[must_use]
    pub const fn pool(&self) -> &Pool<Num> {
        &self.numbers
    }
}

use std::io::Write;

use tracing::{debug, trace, warn};

use crate::{
    ast::{Command, Expr, NameList, Statement},
    error::Error,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        lexer::{Token, tokenize},
        parser::statement::parse_statement,
        value::{core::Num, format::format_number},
    },
    memory::pool::Bucket,
    table::funcs::FunctionKind,
};

/// Name of the variable holding the last result.
pub const ANSWER: &str = "ans";

const HELP: &str = "\
Enter an expression to evaluate it; the result is stored in 'ans'.
  x = expr              assign a variable
  f(a, b) = expr        define a function
  if (c) a else b       conditional, while (c) body   loop, { a; b }   block
  v[hi:lo] v[hi-:w] v[i]  bit fields
Commands:
  ls                    list variables
  lsfn                  list functions
  mode b|d|s|x|o        binary, decimal, scientific, hex or octal output
  quit                  leave";

impl Context {
    /// Evaluates a top-level expression.
    ///
    /// On success the result is printed as `ans = <value>`, stored in the
    /// global `ans` (releasing the previous value) and returned. On failure
    /// `ans` is left untouched. Either way the scratch bucket is released
    /// before returning.
    ///
    /// # Example
    /// ```
    /// use mpcalc::{
    ///     ast::Expr,
    ///     interpreter::{evaluator::core::Context, value::core::Num},
    /// };
    ///
    /// let mut ctx = Context::silent();
    /// ctx.evaluate_statement(&Expr::number(Num::from(7))).unwrap();
    /// assert!(ctx.evaluate_statement(&Expr::variable("nope")).is_err());
    ///
    /// assert_eq!(ctx.lookup_variable("ans"), Some(Num::from(7)));
    /// ```
    pub fn evaluate_statement(&mut self, expr: &Expr) -> EvalResult<Num> {
        let outcome = self.eval_num(expr, None);
        let released = self.numbers.release_all(Bucket::Scratch);
        trace!(released, "statement finished");

        let value = outcome?;
        let text = self.format(&value);
        writeln!(self.out, "{ANSWER} = {text}")?;
        self.globals.assign(ANSWER, value.clone(), &mut self.numbers)?;
        Ok(value)
    }

    /// Executes one parsed statement, consuming it.
    ///
    /// # Returns
    /// The value of an expression statement, `None` for definitions and
    /// commands.
    pub fn execute(&mut self, statement: Statement) -> EvalResult<Option<Num>> {
        match statement {
            Statement::Expression { expr, .. } => self.evaluate_statement(&expr).map(Some),
            Statement::Function(def) => {
                self.define_function(&def.name, def.params, def.body);
                Ok(None)
            },
            Statement::Command { command, .. } => {
                self.run_command(command)?;
                Ok(None)
            },
        }
    }

    /// Lexes, parses and executes every statement in `source`.
    ///
    /// Execution stops at the first error or after `quit`.
    ///
    /// # Returns
    /// The value of the last expression statement, if any.
    ///
    /// # Example
    /// ```
    /// use mpcalc::interpreter::{evaluator::core::Context, value::core::Num};
    ///
    /// let mut ctx = Context::silent();
    /// let result = ctx.run_source("x = 5\nsq(a) = a * a\nsq(x) + 1").unwrap();
    ///
    /// assert_eq!(result, Some(Num::from(26)));
    /// ```
    pub fn run_source(&mut self, source: &str) -> Result<Option<Num>, Error> {
        let tokens = tokenize(source, self.settings.precision)?;
        let mut iter = tokens.iter().peekable();
        let mut result = None;

        loop {
            while let Some((Token::NewLine, _)) = iter.peek() {
                iter.next();
            }
            if iter.peek().is_none() || self.quit {
                break;
            }

            let statement = parse_statement(&mut iter)?;
            let line = statement.line_number();
            if let Some(value) = self.execute(statement)
                                     .map_err(|source| Error::Runtime { source, line })?
            {
                result = Some(value);
            }
        }

        Ok(result)
    }

    /// Defines or replaces the user function `name`.
    pub fn define_function(&mut self, name: &str, params: NameList, body: Expr) {
        let arity = params.len();
        if let Some(previous) = self.functions.define(name, params, body)
           && previous.kind() == FunctionKind::Builtin
        {
            warn!(function = name, "builtin replaced by a user definition");
        }
        debug!(function = name, arity, "function defined");
    }

    /// A copy of the global variable `name`.
    #[must_use]
    pub fn lookup_variable(&self, name: &str) -> Option<Num> {
        self.globals
            .handle(name)
            .and_then(|handle| self.numbers.get(handle).ok())
            .cloned()
    }

    /// Names of all global variables, sorted.
    #[must_use]
    pub fn list_variables(&self) -> Vec<String> {
        self.globals.names()
    }

    /// Names of all functions with their kind, sorted.
    #[must_use]
    pub fn list_functions(&self) -> Vec<(String, FunctionKind)> {
        self.functions.list()
    }

    /// Formats `value` in the active output mode.
    #[must_use]
    pub fn format(&self, value: &Num) -> String {
        format_number(value, self.mode, self.digits)
    }

    fn run_command(&mut self, command: Command) -> EvalResult<()> {
        match command {
            Command::ListVariables => {
                for name in self.list_variables() {
                    if let Some(value) = self.lookup_variable(&name) {
                        let text = self.format(&value);
                        writeln!(self.out, "{name} = {text}")?;
                    }
                }
            },
            Command::ListFunctions => {
                for (name, kind) in self.list_functions() {
                    writeln!(self.out, "{name} {kind}")?;
                }
            },
            Command::SetMode(mode) => self.set_mode(mode),
            Command::Help => writeln!(self.out, "{HELP}")?,
            Command::Quit => self.quit = true,
        }
        Ok(())
    }
}

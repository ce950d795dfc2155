use tracing::trace;

use crate::{
    ast::Expr,
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            function::{aggregate, builtin, integer, tabulate},
        },
        value::{float::Float, transcend},
    },
    memory::pool::Handle,
    table::{
        funcs::{
            Builtin, Function, FunctionTable,
            Handler::{Evaluated, Raw},
            Primitive::{
                Aggregate, FloatBinary, FloatUnary, FloatWord, IntBinary, IntBinaryWord, IntUnary,
                IntWord,
            },
            UserFunction,
        },
        vars::VarTable,
    },
};

/// Largest argument count accepted by the variadic builtins.
pub const MAX_VARIADIC: usize = 1000;

/// Defines builtin functions by generating a lookup table.
///
/// Each entry provides:
/// - a string name,
/// - the accepted argument counts,
/// - the handler implementing the builtin.
///
/// The macro produces `BUILTIN_TABLE`, the static table registered into
/// every context.
macro_rules! builtin_functions {
    (
        $(
            $name:literal => {
                args: $min:literal ..= $max:expr,
                handler: $handler:expr $(,)?
            }
        ),* $(,)?
    ) => {
        static BUILTIN_TABLE: &[(&str, Builtin)] = &[
            $(
                ($name, Builtin { handler: $handler, min_args: $min, max_args: $max }),
            )*
        ];
    };
}

builtin_functions! {
    "sqrt"      => { args: 1..=1, handler: Evaluated(FloatUnary(Float::sqrt)) },
    "cbrt"      => { args: 1..=1, handler: Evaluated(FloatUnary(builtin::cbrt)) },
    "root"      => { args: 2..=2, handler: Evaluated(FloatWord(builtin::root)) },
    "abs"       => { args: 1..=1, handler: Evaluated(FloatUnary(builtin::abs)) },
    "ln"        => { args: 1..=1, handler: Evaluated(FloatUnary(transcend::ln)) },
    "log2"      => { args: 1..=1, handler: Evaluated(FloatUnary(transcend::log2)) },
    "log10"     => { args: 1..=1, handler: Evaluated(FloatUnary(transcend::log10)) },
    "exp"       => { args: 1..=1, handler: Evaluated(FloatUnary(transcend::exp)) },
    "sec"       => { args: 1..=1, handler: Evaluated(FloatUnary(transcend::sec)) },
    "csc"       => { args: 1..=1, handler: Evaluated(FloatUnary(transcend::csc)) },
    "cot"       => { args: 1..=1, handler: Evaluated(FloatUnary(transcend::cot)) },
    "cos"       => { args: 1..=1, handler: Evaluated(FloatUnary(transcend::cos)) },
    "sin"       => { args: 1..=1, handler: Evaluated(FloatUnary(transcend::sin)) },
    "tan"       => { args: 1..=1, handler: Evaluated(FloatUnary(transcend::tan)) },
    "acos"      => { args: 1..=1, handler: Evaluated(FloatUnary(transcend::acos)) },
    "asin"      => { args: 1..=1, handler: Evaluated(FloatUnary(transcend::asin)) },
    "atan"      => { args: 1..=1, handler: Evaluated(FloatUnary(transcend::atan)) },
    "atan2"     => { args: 2..=2, handler: Evaluated(FloatBinary(transcend::atan2)) },
    "cosh"      => { args: 1..=1, handler: Evaluated(FloatUnary(transcend::cosh)) },
    "sinh"      => { args: 1..=1, handler: Evaluated(FloatUnary(transcend::sinh)) },
    "tanh"      => { args: 1..=1, handler: Evaluated(FloatUnary(transcend::tanh)) },
    "sech"      => { args: 1..=1, handler: Evaluated(FloatUnary(transcend::sech)) },
    "csch"      => { args: 1..=1, handler: Evaluated(FloatUnary(transcend::csch)) },
    "coth"      => { args: 1..=1, handler: Evaluated(FloatUnary(transcend::coth)) },
    "acosh"     => { args: 1..=1, handler: Evaluated(FloatUnary(transcend::acosh)) },
    "asinh"     => { args: 1..=1, handler: Evaluated(FloatUnary(transcend::asinh)) },
    "atanh"     => { args: 1..=1, handler: Evaluated(FloatUnary(transcend::atanh)) },
    "erf"       => { args: 1..=1, handler: Evaluated(FloatUnary(transcend::erf)) },
    "erfc"      => { args: 1..=1, handler: Evaluated(FloatUnary(transcend::erfc)) },
    "hypot"     => { args: 2..=2, handler: Evaluated(FloatBinary(transcend::hypot)) },
    "round"     => { args: 1..=1, handler: Evaluated(FloatUnary(builtin::round)) },
    "ceil"      => { args: 1..=1, handler: Evaluated(FloatUnary(builtin::ceil)) },
    "floor"     => { args: 1..=1, handler: Evaluated(FloatUnary(builtin::floor)) },
    "trunc"     => { args: 1..=1, handler: Evaluated(FloatUnary(builtin::trunc)) },
    "int"       => { args: 1..=1, handler: Evaluated(FloatUnary(builtin::trunc)) },
    "nextprime" => { args: 1..=1, handler: Evaluated(IntUnary(integer::next_prime)) },
    "gcd"       => { args: 2..=2, handler: Evaluated(IntBinary(integer::gcd)) },
    "lcm"       => { args: 2..=2, handler: Evaluated(IntBinary(integer::lcm)) },
    "remfac"    => { args: 2..=2, handler: Evaluated(IntBinary(integer::remove_factor)) },
    "bin"       => { args: 2..=2, handler: Evaluated(IntBinaryWord(integer::binomial)) },
    "fib"       => { args: 1..=1, handler: Evaluated(IntWord(integer::fibonacci)) },
    "invert"    => { args: 2..=2, handler: Evaluated(IntBinary(integer::mod_inverse)) },
    "inv"       => { args: 2..=2, handler: Evaluated(IntBinary(integer::mod_inverse)) },
    "hamdist"   => { args: 2..=2, handler: Evaluated(IntBinary(integer::hamming_distance)) },
    "countones" => { args: 1..=1, handler: Evaluated(IntUnary(integer::popcount)) },
    "popcount"  => { args: 1..=1, handler: Evaluated(IntUnary(integer::popcount)) },
    "popcnt"    => { args: 1..=1, handler: Evaluated(IntUnary(integer::popcount)) },
    "min"       => { args: 2..=MAX_VARIADIC, handler: Evaluated(Aggregate(aggregate::min)) },
    "max"       => { args: 2..=MAX_VARIADIC, handler: Evaluated(Aggregate(aggregate::max)) },
    "avg"       => { args: 2..=MAX_VARIADIC, handler: Evaluated(Aggregate(aggregate::avg)) },
    "sum"       => { args: 4..=5, handler: Raw(tabulate::sum) },
    "prod"      => { args: 4..=5, handler: Raw(tabulate::prod) },
    "tab"       => { args: 4..=5, handler: Raw(tabulate::tab) },
}

/// Registers every builtin in `functions`.
pub fn register_builtins(functions: &mut FunctionTable) {
    for (name, builtin) in BUILTIN_TABLE {
        functions.register_builtin(name, *builtin);
    }
}

impl Context {
    /// Evaluates a function call.
    ///
    /// The function is looked up by name and the argument count checked
    /// against its arity before anything is evaluated. Evaluated builtins
    /// and user functions receive their arguments evaluated left to right in
    /// the caller's scope; raw builtins receive the expressions and the scope.
    ///
    /// # Parameters
    /// - `name`: Function name.
    /// - `arguments`: Argument expressions.
    /// - `scope`: The caller's local table, if any.
    ///
    /// # Returns
    /// A scratch handle to the function's result.
    pub fn call_function(&mut self,
                         name: &str,
                         arguments: &[Expr],
                         scope: Option<&mut VarTable>)
                         -> EvalResult<Handle> {
        let function = self.functions
                           .lookup(name)
                           .cloned()
                           .ok_or_else(|| RuntimeError::UnknownFunction { name: name.to_string() })?;

        let (min, max) = function.arity();
        if !(min..=max).contains(&arguments.len()) {
            return Err(RuntimeError::arity(name, min, max));
        }

        match function {
            Function::Builtin(Builtin { handler: Raw(raw), .. }) => raw(self, arguments, scope),
            Function::Builtin(Builtin { handler: Evaluated(primitive),
                                        .. }) => {
                let handles = self.eval_arguments(arguments, scope)?;
                let args = handles.iter()
                                  .map(|handle| self.value(*handle))
                                  .collect::<EvalResult<Vec<_>>>()?;
                let result = primitive.apply(name, &args, &self.settings)?;
                Ok(self.scratch(result))
            },
            Function::User(user) => self.call_user_function(name, &user, arguments, scope),
        }
    }

    /// Evaluates argument expressions left to right; the first failure aborts.
    fn eval_arguments(&mut self,
                      arguments: &[Expr],
                      mut scope: Option<&mut VarTable>)
                      -> EvalResult<Vec<Handle>> {
        let mut handles = Vec::with_capacity(arguments.len());
        for argument in arguments {
            handles.push(self.eval(argument, scope.as_deref_mut())?);
        }
        Ok(handles)
    }

    /// Executes a user-defined function.
    ///
    /// Parameters are bound as borrowed values in a fresh local table, so
    /// destroying the table at the end of the call releases only what the
    /// body assigned itself.
    fn call_user_function(&mut self,
                          name: &str,
                          function: &UserFunction,
                          arguments: &[Expr],
                          scope: Option<&mut VarTable>)
                          -> EvalResult<Handle> {
        let handles = self.eval_arguments(arguments, scope)?;

        let mut local = VarTable::local();
        for (param, handle) in function.params.iter().zip(handles) {
            local.bind_borrowed(param, handle, &mut self.numbers)?;
        }

        trace!(function = name, "calling user function");
        let result = self.eval(&function.body, Some(&mut local));
        local.destroy(&mut self.numbers)?;
        result
    }
}

use std::{fmt, rc::Rc};

use num_bigint::BigInt;

use crate::{
    ast::{Expr, NameList},
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::{
            core::{Num, Settings},
            float::Float,
        },
    },
    memory::pool::Handle,
    table::{hashtable::{GLOBAL_BUCKETS, HashTable}, vars::VarTable},
};

/// A builtin that receives its arguments unevaluated, together with the
/// caller's scope.
pub type RawFn = fn(&mut Context, &[Expr], Option<&mut VarTable>) -> EvalResult<Handle>;

/// The primitive operation a builtin performs on its evaluated arguments.
///
/// One dispatcher serves every builtin: the variant says how the arguments
/// are converted and the function pointer does the arithmetic.
#[derive(Clone, Copy)]
pub enum Primitive {
    /// Float in, float out.
    FloatUnary(fn(&Float, u32) -> EvalResult<Float>),
    /// Two floats in, float out.
    FloatBinary(fn(&Float, &Float, u32) -> EvalResult<Float>),
    /// A float and a machine word in, float out.
    FloatWord(fn(&Float, u64, u32) -> EvalResult<Float>),
    /// Integer in, integer out.
    IntUnary(fn(&BigInt) -> EvalResult<BigInt>),
    /// A machine word in, integer out.
    IntWord(fn(u64) -> EvalResult<BigInt>),
    /// Two integers in, integer out.
    IntBinary(fn(&BigInt, &BigInt) -> EvalResult<BigInt>),
    /// An integer and a machine word in, integer out.
    IntBinaryWord(fn(&BigInt, u64) -> EvalResult<BigInt>),
    /// Numbers in, number out, without conversion.
    Aggregate(fn(&[&Num], &Settings) -> EvalResult<Num>),
}

/// How a builtin receives its arguments.
#[derive(Clone, Copy)]
pub enum Handler {
    /// Arguments are evaluated in the caller's scope and handed to the
    /// primitive.
    Evaluated(Primitive),
    /// The argument expressions are handed over as they are.
    Raw(RawFn),
}

/// A function implemented by the interpreter.
#[derive(Clone, Copy)]
pub struct Builtin {
    /// How the builtin is invoked.
    pub handler:  Handler,
    /// Smallest accepted argument count.
    pub min_args: usize,
    /// Largest accepted argument count.
    pub max_args: usize,
}

/// A function defined in the language.
#[derive(Debug, Clone)]
pub struct UserFunction {
    /// Parameter names, in order.
    pub params: NameList,
    /// The body, shared with running calls so a redefinition cannot pull it
    /// from under them.
    pub body:   Rc<Expr>,
}

/// An entry of the function table.
#[derive(Clone)]
pub enum Function {
    /// Implemented by the interpreter.
    Builtin(Builtin),
    /// Defined by the user.
    User(UserFunction),
}

/// Whether a function is a builtin or user-defined, for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    /// Implemented by the interpreter.
    Builtin,
    /// Defined by the user.
    UserDefined,
}

impl fmt::Display for FunctionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin => write!(f, "[builtin]"),
            Self::UserDefined => write!(f, "[user-defined]"),
        }
    }
}

impl Function {
    /// Accepted argument counts as `(min, max)`.
    #[must_use]
    pub fn arity(&self) -> (usize, usize) {
        match self {
            Self::Builtin(builtin) => (builtin.min_args, builtin.max_args),
            Self::User(user) => (user.params.len(), user.params.len()),
        }
    }

    /// The kind of this function.
    #[must_use]
    pub const fn kind(&self) -> FunctionKind {
        match self {
            Self::Builtin(_) => FunctionKind::Builtin,
            Self::User(_) => FunctionKind::UserDefined,
        }
    }
}

/// The table of all callable functions.
pub struct FunctionTable {
    table: HashTable<Function>,
}

impl Default for FunctionTable {
    fn default() -> Self {
        Self::new()
    }
}

impl FunctionTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self { table: HashTable::with_buckets(GLOBAL_BUCKETS) }
    }

    /// Returns the function called `name`.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Function> {
        self.table.get(name)
    }

    /// Registers a builtin under `name`.
    pub fn register_builtin(&mut self, name: &str, builtin: Builtin) {
        self.table.insert(name, Function::Builtin(builtin));
    }

    /// Defines or redefines a user function. The previous definition, if
    /// any, is returned so its body and parameters are dropped together.
    pub fn define(&mut self, name: &str, params: NameList, body: Expr) -> Option<Function> {
        self.table.insert(name,
                          Function::User(UserFunction { params,
                                                        body: Rc::new(body) }))
    }

    /// All function names with their kind, sorted by name.
    #[must_use]
    pub fn list(&self) -> Vec<(String, FunctionKind)> {
        self.table
            .sorted_keys()
            .into_iter()
            .filter_map(|name| self.table.get(name).map(|f| (name.to_string(), f.kind())))
            .collect()
    }

    /// Number of functions.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if no function is defined.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

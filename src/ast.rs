use std::fmt;

use crate::interpreter::value::{core::Num, format::OutputMode};

/// A list of argument expressions, as passed to a function call.
pub type ExprList = Vec<Expr>;
/// A list of parameter names, as declared by a function definition.
pub type NameList = Vec<String>;

/// An abstract syntax tree (AST) node representing an expression.
///
/// Every construct of the language is an expression, including assignment,
/// sequencing and loops. Children are boxed and owned by their parent, so
/// dropping a node releases its whole subtree exactly once.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A numeric literal.
    Number(Num),
    /// Reference to a variable by name, resolved when evaluated.
    Variable {
        /// Name of the variable.
        name: String,
    },
    /// Assignment of a value to a variable in the active scope.
    Assign {
        /// Name of the target variable.
        name:  String,
        /// Expression producing the value.
        value: Box<Self>,
    },
    /// An arithmetic or bitwise operation with two operands.
    Binary {
        /// The operator.
        op:    BinaryOperator,
        /// Left operand.
        left:  Box<Self>,
        /// Right operand.
        right: Box<Self>,
    },
    /// An operation with one operand.
    Unary {
        /// The operator.
        op:      UnaryOperator,
        /// The operand.
        operand: Box<Self>,
    },
    /// A comparison producing the integer 0 or 1.
    Compare {
        /// The relation tested.
        op:    Comparison,
        /// Left operand.
        left:  Box<Self>,
        /// Right operand.
        right: Box<Self>,
    },
    /// Extraction of a bit field, such as `x[7:0]`.
    PartSelect {
        /// How the bounds are interpreted.
        kind:  PartSelectKind,
        /// The value bits are taken from.
        value: Box<Self>,
        /// High bit index, or the only index for a single-bit select.
        high:  Box<Self>,
        /// Low bit index or width; absent for a single-bit select.
        low:   Option<Box<Self>>,
    },
    /// `first; second`: evaluates `first` for its effects, yields `second`.
    Sequence {
        /// Evaluated first, value discarded.
        first:  Box<Self>,
        /// Evaluated second, value returned.
        second: Box<Self>,
    },
    /// `if (condition) then_branch else else_branch`.
    If {
        /// Any nonzero value selects the then-branch.
        condition:   Box<Self>,
        /// Branch taken when the condition is nonzero.
        then_branch: Box<Self>,
        /// Branch taken otherwise; yields 0 when absent.
        else_branch: Option<Box<Self>>,
    },
    /// `while (condition) body`.
    While {
        /// Re-evaluated before every iteration.
        condition: Box<Self>,
        /// The loop body.
        body:      Box<Self>,
    },
    /// A call of a builtin or user-defined function.
    Call {
        /// Name of the function.
        name:      String,
        /// Argument expressions, evaluated or passed raw depending on the
        /// function.
        arguments: ExprList,
    },
}

impl Expr {
    /// Builds a literal node.
    #[must_use]
    pub const fn number(value: Num) -> Self {
        Self::Number(value)
    }

    /// Builds a variable reference.
    #[must_use]
    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable { name: name.into() }
    }

    /// Builds an assignment.
    #[must_use]
    pub fn assign(name: impl Into<String>, value: Self) -> Self {
        Self::Assign { name:  name.into(),
                       value: Box::new(value), }
    }

    /// Builds a binary operation.
    #[must_use]
    pub fn binary(op: BinaryOperator, left: Self, right: Self) -> Self {
        Self::Binary { op,
                       left: Box::new(left),
                       right: Box::new(right) }
    }

    /// Builds a unary operation.
    #[must_use]
    pub fn unary(op: UnaryOperator, operand: Self) -> Self {
        Self::Unary { op,
                      operand: Box::new(operand) }
    }

    /// Builds a comparison.
    #[must_use]
    pub fn compare(op: Comparison, left: Self, right: Self) -> Self {
        Self::Compare { op,
                        left: Box::new(left),
                        right: Box::new(right) }
    }

    /// Builds a part-select.
    #[must_use]
    pub fn part_select(kind: PartSelectKind, value: Self, high: Self, low: Option<Self>) -> Self {
        Self::PartSelect { kind,
                           value: Box::new(value),
                           high: Box::new(high),
                           low: low.map(Box::new) }
    }

    /// Builds a sequence.
    #[must_use]
    pub fn sequence(first: Self, second: Self) -> Self {
        Self::Sequence { first:  Box::new(first),
                         second: Box::new(second), }
    }

    /// Builds a conditional.
    #[must_use]
    pub fn if_else(condition: Self, then_branch: Self, else_branch: Option<Self>) -> Self {
        Self::If { condition:   Box::new(condition),
                   then_branch: Box::new(then_branch),
                   else_branch: else_branch.map(Box::new), }
    }

    /// Builds a loop.
    #[must_use]
    pub fn while_loop(condition: Self, body: Self) -> Self {
        Self::While { condition: Box::new(condition),
                      body:      Box::new(body), }
    }

    /// Builds a function call.
    #[must_use]
    pub fn call(name: impl Into<String>, arguments: ExprList) -> Self {
        Self::Call { name: name.into(),
                     arguments }
    }
}

/// A user function definition: `name(params) = body`.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    /// Name of the function.
    pub name:   String,
    /// Parameter names, bound in order to the call's arguments.
    pub params: NameList,
    /// Expression evaluated on every call.
    pub body:   Expr,
    /// Line number in the source code.
    pub line:   usize,
}

/// Session commands that are not expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `ls`: print every variable and its value.
    ListVariables,
    /// `lsfn`: print every function and its kind.
    ListFunctions,
    /// `mode <m>`: switch the output mode.
    SetMode(OutputMode),
    /// `help`: print a short usage summary.
    Help,
    /// `quit`: end the session.
    Quit,
}

/// A top-level statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// An expression whose value is printed and stored in `ans`.
    Expression {
        /// The expression.
        expr: Expr,
        /// Line number in the source code.
        line: usize,
    },
    /// A function definition.
    Function(FunctionDef),
    /// A session command.
    Command {
        /// The command.
        command: Command,
        /// Line number in the source code.
        line:    usize,
    },
}

impl Statement {
    /// Line on which the statement starts.
    #[must_use]
    pub const fn line_number(&self) -> usize {
        match self {
            Self::Expression { line, .. } | Self::Command { line, .. } => *line,
            Self::Function(def) => def.line,
        }
    }
}

/// Represents the binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Mod,
    /// `**`
    Pow,
    /// `&`
    And,
    /// `|`
    Or,
    /// `^`
    Xor,
    /// `<<`
    Shl,
    /// `>>`
    Shr,
}

impl BinaryOperator {
    /// Returns `true` for the operators that work on integers only.
    #[must_use]
    pub const fn is_bitwise(self) -> bool {
        matches!(self, Self::And | Self::Or | Self::Xor | Self::Shl | Self::Shr)
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Pow => "**",
            Self::And => "&",
            Self::Or => "|",
            Self::Xor => "^",
            Self::Shl => "<<",
            Self::Shr => ">>",
        };
        write!(f, "{symbol}")
    }
}

/// Represents the unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    /// `-x`
    Negate,
    /// `~x`, bitwise complement.
    Invert,
    /// `x!`
    Factorial,
}

/// Represents the comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// `>=`
    Ge,
    /// `<=`
    Le,
    /// `!=`
    Ne,
    /// `==`
    Eq,
    /// `>`
    Gt,
    /// `<`
    Lt,
}

/// The three forms of bit-field extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartSelectKind {
    /// `x[i]`: a single bit.
    Single,
    /// `x[hi:lo]`: the bits from `hi` down to `lo`.
    Fixed,
    /// `x[hi-:w]`: `w` bits ending at `hi`.
    Descending,
}

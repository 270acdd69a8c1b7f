// ---------------------------------------------------------------------------
// Operators
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum BinOp {
    And,
    Or,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    /// Whether this operator produces a boolean result.
    pub fn is_boolean(self) -> bool {
        matches!(
            self,
            BinOp::And | BinOp::Or | BinOp::Eq | BinOp::Ne | BinOp::Lt | BinOp::Gt | BinOp::Le | BinOp::Ge
        )
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::And => "&&",
            BinOp::Or => "||",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::Le => "<=",
            BinOp::Ge => ">=",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
        }
    }
}

// ---------------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------------

/// A parsed formula expression. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Expr {
    /// Number literal (integer or float).
    Number(f64),
    /// String literal, single- or double-quoted.
    Str(String),
    /// Index field reference, e.g. `bytes` or `"response.time"`.
    Field(String),
    /// Unary negation.
    Neg(Box<Expr>),
    /// Binary operation.
    BinOp {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Builtin function call.
    Call(FuncCall),
}

impl Expr {
    /// Whether any function call appears in this expression tree.
    pub fn has_call(&self) -> bool {
        match self {
            Expr::Number(_) | Expr::Str(_) | Expr::Field(_) => false,
            Expr::Neg(inner) => inner.has_call(),
            Expr::BinOp { left, right, .. } => left.has_call() || right.has_call(),
            Expr::Call(_) => true,
        }
    }
}

// ---------------------------------------------------------------------------
// Function calls
// ---------------------------------------------------------------------------

/// `name(arg, arg, key=value, ...)` — positional arguments first, named
/// arguments after, named order insignificant.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncCall {
    pub name: String,
    pub args: Vec<Expr>,
    pub named: Vec<NamedArg>,
}

impl FuncCall {
    /// Value of a named argument, if present.
    pub fn named_value(&self, key: &str) -> Option<&Expr> {
        self.named.iter().find(|a| a.key == key).map(|a| &a.value)
    }
}

/// A `key=value` argument.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedArg {
    pub key: String,
    pub value: Expr,
}

//! Expression AST nodes

use super::{Spanned, Type};
use serde::{Deserialize, Serialize};

/// Expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Integer literal
    IntLit(i64),
    /// Float literal
    FloatLit(f64),
    /// String literal (raw text between the quotes)
    StringLit(String),
    /// Boolean literal
    BoolLit(bool),
    /// Unit value
    Unit,

    /// Variable reference
    Var(String),

    /// Return value reference (for post conditions)
    Ret,

    /// Refinement self-reference
    It,

    /// Binary operation
    Binary {
        left: Box<Spanned<Expr>>,
        op: BinOp,
        right: Box<Spanned<Expr>>,
    },

    /// Unary operation
    Unary {
        op: UnOp,
        expr: Box<Spanned<Expr>>,
    },

    /// Conditional: if cond then then_branch else else_branch
    If {
        cond: Box<Spanned<Expr>>,
        then_branch: Box<Spanned<Expr>>,
        else_branch: Box<Spanned<Expr>>,
    },

    /// Let binding: let [mut] name [: ty] = value; body
    Let {
        mutable: bool,
        name: Spanned<String>,
        ty: Option<Spanned<Type>>,
        value: Box<Spanned<Expr>>,
        body: Box<Spanned<Expr>>,
    },

    /// Match expression
    Match {
        expr: Box<Spanned<Expr>>,
        arms: Vec<MatchArm>,
    },

    /// While loop: while cond { body }
    While {
        cond: Box<Spanned<Expr>>,
        body: Box<Spanned<Expr>>,
    },

    /// For loop: for var in iter { body }
    For {
        var: Spanned<String>,
        iter: Box<Spanned<Expr>>,
        body: Box<Spanned<Expr>>,
    },

    /// Block: { stmt1; stmt2; ...; tail }. Without a tail the block is unit.
    Block {
        stmts: Vec<Spanned<Expr>>,
        tail: Option<Box<Spanned<Expr>>>,
    },

    /// Assignment: name = value. Only appears as a block statement.
    Assign {
        name: Spanned<String>,
        value: Box<Spanned<Expr>>,
    },

    /// Method call: receiver.method(args)
    MethodCall {
        receiver: Box<Spanned<Expr>>,
        method: Spanned<String>,
        args: Vec<Spanned<Expr>>,
    },

    /// Field access: expr.field
    FieldAccess {
        expr: Box<Spanned<Expr>>,
        field: Spanned<String>,
    },

    /// Index access: expr[index]
    Index {
        expr: Box<Spanned<Expr>>,
        index: Box<Spanned<Expr>>,
    },

    /// State reference in contracts: expr.pre / expr.post
    StateRef {
        expr: Box<Spanned<Expr>>,
        state: StateKind,
    },

    /// Function call
    Call {
        func: Spanned<String>,
        args: Vec<Spanned<Expr>>,
    },

    /// Enum variant: EnumName::Variant or EnumName::Variant(args).
    /// `args` is `None` when no parentheses were written.
    EnumVariant {
        enum_name: Spanned<String>,
        variant: Spanned<String>,
        args: Option<Vec<Spanned<Expr>>>,
    },

    /// Struct initialization: new StructName { field1: value1, field2: value2 }
    StructInit {
        name: Spanned<String>,
        fields: Vec<(Spanned<String>, Spanned<Expr>)>,
    },

    /// Array literal: [a, b, c]
    ArrayLit(Vec<Spanned<Expr>>),

    /// Parenthesized expression
    Paren(Box<Spanned<Expr>>),
}

impl Expr {
    /// Control constructs are parsed before the operator ladder and never
    /// appear as a bare binary operand.
    pub fn is_control(&self) -> bool {
        matches!(
            self,
            Expr::If { .. }
                | Expr::Let { .. }
                | Expr::Match { .. }
                | Expr::While { .. }
                | Expr::For { .. }
                | Expr::Block { .. }
        )
    }
}

/// A single arm in a match expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchArm {
    pub pattern: Spanned<Pattern>,
    pub body: Spanned<Expr>,
}

/// Pattern for match expressions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Pattern {
    /// Wildcard pattern: _
    Wildcard,
    /// Variable binding: name
    Var(String),
    /// Literal pattern: 42, true, "text", etc.
    Literal(LiteralPattern),
    /// Enum variant pattern: EnumName::Variant or EnumName::Variant(bindings).
    /// `bindings` is `None` without parentheses and `Some` with them.
    EnumVariant {
        enum_name: Spanned<String>,
        variant: Spanned<String>,
        bindings: Option<Vec<Spanned<String>>>,
    },
}

/// Literal patterns for match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LiteralPattern {
    Int(i64),
    Float(f64),
    String(String),
    Bool(bool),
}

/// Which program state a contract expression refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateKind {
    Pre,
    Post,
}

impl std::fmt::Display for StateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateKind::Pre => write!(f, "pre"),
            StateKind::Post => write!(f, "post"),
        }
    }
}

/// Binary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    // Logical
    Or,
    And,

    // Comparison
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,

    // Range
    /// a..b
    Range,
    /// a..<b
    RangeExclusive,
    /// a..=b
    RangeInclusive,

    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinOp {
    /// Binding power, loosest (1) to tightest (6). Unary is 7, postfix 8.
    pub fn precedence(self) -> u8 {
        match self {
            BinOp::Or => 1,
            BinOp::And => 2,
            BinOp::Eq | BinOp::Ne | BinOp::Lt | BinOp::Gt | BinOp::Le | BinOp::Ge => 3,
            BinOp::Range | BinOp::RangeExclusive | BinOp::RangeInclusive => 4,
            BinOp::Add | BinOp::Sub => 5,
            BinOp::Mul | BinOp::Div | BinOp::Mod => 6,
        }
    }
}

impl std::fmt::Display for BinOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinOp::Or => write!(f, "or"),
            BinOp::And => write!(f, "and"),
            BinOp::Eq => write!(f, "=="),
            BinOp::Ne => write!(f, "!="),
            BinOp::Lt => write!(f, "<"),
            BinOp::Gt => write!(f, ">"),
            BinOp::Le => write!(f, "<="),
            BinOp::Ge => write!(f, ">="),
            BinOp::Range => write!(f, ".."),
            BinOp::RangeExclusive => write!(f, "..<"),
            BinOp::RangeInclusive => write!(f, "..="),
            BinOp::Add => write!(f, "+"),
            BinOp::Sub => write!(f, "-"),
            BinOp::Mul => write!(f, "*"),
            BinOp::Div => write!(f, "/"),
            BinOp::Mod => write!(f, "%"),
        }
    }
}

/// Unary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnOp {
    /// Negation (-)
    Neg,
    /// Logical not
    Not,
    /// Shared reference (&)
    Ref,
    /// Mutable reference (&mut)
    RefMut,
    /// Dereference (*)
    Deref,
}

impl std::fmt::Display for UnOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnOp::Neg => write!(f, "-"),
            UnOp::Not => write!(f, "not "),
            UnOp::Ref => write!(f, "&"),
            UnOp::RefMut => write!(f, "&mut "),
            UnOp::Deref => write!(f, "*"),
        }
    }
}

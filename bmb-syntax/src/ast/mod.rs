//! Abstract Syntax Tree definitions

mod expr;
mod printer;
mod span;
mod types;

pub use expr::*;
pub use span::*;
pub use types::*;

use serde::{Deserialize, Serialize};

/// A program is a sequence of top-level items
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Program {
    pub items: Vec<Item>,
}

impl Program {
    pub fn functions(&self) -> impl Iterator<Item = &FnDef> {
        self.items.iter().filter_map(|item| match item {
            Item::FnDef(f) => Some(f),
            _ => None,
        })
    }
}

/// Top-level item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Item {
    Use(UseStmt),
    StructDef(StructDef),
    EnumDef(EnumDef),
    FnDef(FnDef),
}

impl Item {
    pub fn span(&self) -> Span {
        match self {
            Item::Use(u) => u.span,
            Item::StructDef(s) => s.span,
            Item::EnumDef(e) => e.span,
            Item::FnDef(f) => f.span,
        }
    }

    /// Declared name; `None` for `use` statements
    pub fn name(&self) -> Option<&str> {
        match self {
            Item::Use(_) => None,
            Item::StructDef(s) => Some(&s.name.node),
            Item::EnumDef(e) => Some(&e.name.node),
            Item::FnDef(f) => Some(&f.name.node),
        }
    }
}

/// Item visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Visibility {
    #[default]
    Private,
    Public,
}

/// Attribute: @name or @name(args)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: Spanned<String>,
    /// `None` when written without parentheses
    pub args: Option<Vec<Spanned<Expr>>>,
    pub span: Span,
}

/// Use statement: use a::b::c;
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UseStmt {
    pub path: Vec<Spanned<String>>,
    pub span: Span,
}

/// Struct definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructDef {
    pub attributes: Vec<Attribute>,
    pub visibility: Visibility,
    pub name: Spanned<String>,
    pub fields: Vec<StructField>,
    pub span: Span,
}

/// Struct field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructField {
    pub name: Spanned<String>,
    pub ty: Spanned<Type>,
}

/// Enum definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumDef {
    pub attributes: Vec<Attribute>,
    pub visibility: Visibility,
    pub name: Spanned<String>,
    pub variants: Vec<EnumVariant>,
    pub span: Span,
}

/// Enum variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumVariant {
    pub name: Spanned<String>,
    /// Associated types; `None` for a variant written without parentheses
    pub fields: Option<Vec<Spanned<Type>>>,
}

/// Function definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FnDef {
    pub attributes: Vec<Attribute>,
    pub visibility: Visibility,
    pub name: Spanned<String>,
    pub params: Vec<Param>,
    /// Named return value: `-> r: i64`
    pub ret_name: Option<Spanned<String>>,
    pub ret_ty: Spanned<Type>,
    pub contract: Option<Contract>,
    pub body: Spanned<Expr>,
    pub span: Span,
}

impl FnDef {
    /// Legacy precondition, if the function uses `pre`
    pub fn pre(&self) -> Option<&Spanned<Expr>> {
        match &self.contract {
            Some(Contract::Legacy { pre, .. }) => pre.as_ref(),
            _ => None,
        }
    }

    /// Legacy postcondition, if the function uses `post`
    pub fn post(&self) -> Option<&Spanned<Expr>> {
        match &self.contract {
            Some(Contract::Legacy { post, .. }) => post.as_ref(),
            _ => None,
        }
    }
}

/// Function parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: Spanned<String>,
    pub ty: Spanned<Type>,
}

/// Contract clause attached to a function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Contract {
    /// where { name: cond, cond, ... }
    Where(Vec<NamedContract>),
    /// pre cond post cond. At least one of the two is present.
    Legacy {
        pre: Option<Spanned<Expr>>,
        post: Option<Spanned<Expr>>,
    },
}

/// One condition of a `where` block, optionally labeled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedContract {
    pub name: Option<Spanned<String>>,
    pub condition: Spanned<Expr>,
}

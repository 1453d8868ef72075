//! Type AST nodes

use super::{Expr, Spanned};
use serde::{Deserialize, Serialize};

/// Built-in scalar types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveType {
    /// 32-bit signed integer
    I32,
    /// 64-bit signed integer
    I64,
    /// 64-bit floating point
    F64,
    /// Boolean
    Bool,
    /// String
    String,
}

impl PrimitiveType {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "i32" => Some(Self::I32),
            "i64" => Some(Self::I64),
            "f64" => Some(Self::F64),
            "bool" => Some(Self::Bool),
            "String" => Some(Self::String),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::F64 => "f64",
            Self::Bool => "bool",
            Self::String => "String",
        }
    }

    /// Whether `T { ... }` refinements may be attached. `String` cannot be refined.
    pub fn is_refinable(self) -> bool {
        !matches!(self, Self::String)
    }
}

impl std::fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Type representation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Type {
    Primitive(PrimitiveType),
    /// Unit type ()
    Unit,
    /// Shared reference: &T
    Ref(Box<Type>),
    /// Mutable reference: &mut T
    RefMut(Box<Type>),
    /// Fixed-size array: [T; N]
    Array(Box<Type>, u64),
    /// Refinement type: i64{it > 0, it < 100}
    Refined {
        base: PrimitiveType,
        constraints: Vec<Spanned<Expr>>,
    },
    /// User-defined struct or enum name
    Named(String),
}

impl Type {
    /// The primitive underneath a refinement, or the primitive itself
    pub fn base_primitive(&self) -> Option<PrimitiveType> {
        match self {
            Type::Primitive(p) => Some(*p),
            Type::Refined { base, .. } => Some(*base),
            _ => None,
        }
    }

    /// True for everything except a refinement with at least one constraint.
    /// `i32{}` is as unconstrained as a bare `i32`.
    pub fn is_unconstrained(&self) -> bool {
        match self {
            Type::Refined { constraints, .. } => constraints.is_empty(),
            _ => true,
        }
    }
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Primitive(p) => write!(f, "{p}"),
            Type::Unit => write!(f, "()"),
            Type::Ref(inner) => write!(f, "&{inner}"),
            Type::RefMut(inner) => write!(f, "&mut {inner}"),
            Type::Array(elem, len) => write!(f, "[{elem}; {len}]"),
            Type::Refined { base, constraints } => {
                write!(f, "{base}{{")?;
                for (i, c) in constraints.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, " {}", c.node)?;
                }
                if constraints.is_empty() {
                    write!(f, "}}")
                } else {
                    write!(f, " }}")
                }
            }
            Type::Named(name) => write!(f, "{name}"),
        }
    }
}

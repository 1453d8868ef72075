//! Source re-serialization
//!
//! `Display` impls that print a tree back as BMB source. Parentheses are
//! inserted only where the tree shape differs from what operator precedence
//! would produce, so printing a parsed tree and parsing the output again
//! yields the same shape.

use super::{
    Attribute, BinOp, Contract, EnumDef, Expr, FnDef, Item, LiteralPattern, MatchArm, Pattern,
    Program, Spanned, StructDef, UseStmt, Visibility,
};
use std::fmt::{self, Display, Formatter};

/// Tightest binding power of a unary operand position
const UNARY_PREC: u8 = 7;

fn comma_list<T: Display>(
    f: &mut Formatter<'_>,
    items: impl IntoIterator<Item = T>,
) -> fmt::Result {
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn nodes<T>(items: &[Spanned<T>]) -> impl Iterator<Item = &T> {
    items.iter().map(|s| &s.node)
}

/// Binding power of the expression when it appears as an operand.
/// Control constructs bind loosest of all.
fn operand_prec(expr: &Expr) -> u8 {
    match expr {
        Expr::Binary { op, .. } => op.precedence(),
        Expr::Unary { .. } => UNARY_PREC,
        // only `i64::MIN` prints with a sign
        Expr::IntLit(n) if *n < 0 => UNARY_PREC,
        e if e.is_control() || matches!(e, Expr::Assign { .. }) => 0,
        _ => UNARY_PREC + 1,
    }
}

fn write_operand(f: &mut Formatter<'_>, expr: &Expr, min_prec: u8) -> fmt::Result {
    if operand_prec(expr) < min_prec {
        write!(f, "({expr})")
    } else {
        write!(f, "{expr}")
    }
}

fn write_float(f: &mut Formatter<'_>, value: f64) -> fmt::Result {
    let text = value.to_string();
    if text.contains('.') || !value.is_finite() {
        f.write_str(&text)
    } else {
        write!(f, "{text}.0")
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expr::IntLit(n) => write!(f, "{n}"),
            Expr::FloatLit(x) => write_float(f, *x),
            Expr::StringLit(s) => write!(f, "\"{s}\""),
            Expr::BoolLit(b) => write!(f, "{b}"),
            Expr::Unit => write!(f, "()"),
            Expr::Var(name) => write!(f, "{name}"),
            Expr::Ret => write!(f, "ret"),
            Expr::It => write!(f, "it"),

            Expr::Binary { left, op, right } => {
                let prec = op.precedence();
                write_operand(f, &left.node, prec)?;
                write!(f, " {op} ")?;
                // left associative: an equal-precedence right operand needs parens
                write_operand(f, &right.node, prec + 1)
            }
            Expr::Unary { op, expr } => {
                write!(f, "{op}")?;
                write_operand(f, &expr.node, UNARY_PREC)
            }

            Expr::If {
                cond,
                then_branch,
                else_branch,
            } => write!(
                f,
                "if {} then {} else {}",
                cond.node, then_branch.node, else_branch.node
            ),
            Expr::Let {
                mutable,
                name,
                ty,
                value,
                body,
            } => {
                write!(f, "let ")?;
                if *mutable {
                    write!(f, "mut ")?;
                }
                write!(f, "{}", name.node)?;
                if let Some(ty) = ty {
                    write!(f, ": {}", ty.node)?;
                }
                write!(f, " = {}; {}", value.node, body.node)
            }
            Expr::Match { expr, arms } => {
                write!(f, "match {} {{ ", expr.node)?;
                comma_list(f, arms)?;
                if arms.is_empty() {
                    write!(f, "}}")
                } else {
                    write!(f, " }}")
                }
            }
            Expr::While { cond, body } => write!(f, "while {} {{ {} }}", cond.node, body.node),
            Expr::For { var, iter, body } => {
                write!(f, "for {} in {} {{ {} }}", var.node, iter.node, body.node)
            }
            Expr::Block { stmts, tail } => {
                write!(f, "{{")?;
                for stmt in stmts {
                    write!(f, " {};", stmt.node)?;
                }
                if let Some(tail) = tail {
                    write!(f, " {}", tail.node)?;
                }
                if stmts.is_empty() && tail.is_none() {
                    write!(f, "}}")
                } else {
                    write!(f, " }}")
                }
            }
            Expr::Assign { name, value } => write!(f, "{} = {}", name.node, value.node),

            Expr::MethodCall {
                receiver,
                method,
                args,
            } => {
                write_operand(f, &receiver.node, UNARY_PREC + 1)?;
                write!(f, ".{}(", method.node)?;
                comma_list(f, nodes(args))?;
                write!(f, ")")
            }
            Expr::FieldAccess { expr, field } => {
                write_operand(f, &expr.node, UNARY_PREC + 1)?;
                write!(f, ".{}", field.node)
            }
            Expr::Index { expr, index } => {
                write_operand(f, &expr.node, UNARY_PREC + 1)?;
                write!(f, "[{}]", index.node)
            }
            Expr::StateRef { expr, state } => {
                write_operand(f, &expr.node, UNARY_PREC + 1)?;
                write!(f, ".{state}")
            }
            Expr::Call { func, args } => {
                write!(f, "{}(", func.node)?;
                comma_list(f, nodes(args))?;
                write!(f, ")")
            }
            Expr::EnumVariant {
                enum_name,
                variant,
                args,
            } => {
                write!(f, "{}::{}", enum_name.node, variant.node)?;
                if let Some(args) = args {
                    write!(f, "(")?;
                    comma_list(f, nodes(args))?;
                    write!(f, ")")?;
                }
                Ok(())
            }
            Expr::StructInit { name, fields } => {
                write!(f, "new {} {{", name.node)?;
                for (i, (field, value)) in fields.iter().enumerate() {
                    let sep = if i > 0 { "," } else { "" };
                    write!(f, "{sep} {}: {}", field.node, value.node)?;
                }
                if fields.is_empty() {
                    write!(f, "}}")
                } else {
                    write!(f, " }}")
                }
            }
            Expr::ArrayLit(elems) => {
                write!(f, "[")?;
                comma_list(f, nodes(elems))?;
                write!(f, "]")
            }
            Expr::Paren(inner) => write!(f, "({})", inner.node),
        }
    }
}

impl Display for MatchArm {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {}", self.pattern.node, self.body.node)
    }
}

impl Display for Pattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Wildcard => write!(f, "_"),
            Pattern::Var(name) => write!(f, "{name}"),
            Pattern::Literal(lit) => write!(f, "{lit}"),
            Pattern::EnumVariant {
                enum_name,
                variant,
                bindings,
            } => {
                write!(f, "{}::{}", enum_name.node, variant.node)?;
                if let Some(bindings) = bindings {
                    write!(f, "(")?;
                    comma_list(f, nodes(bindings))?;
                    write!(f, ")")?;
                }
                Ok(())
            }
        }
    }
}

impl Display for LiteralPattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LiteralPattern::Int(n) => write!(f, "{n}"),
            LiteralPattern::Float(x) => write_float(f, *x),
            LiteralPattern::String(s) => write!(f, "\"{s}\""),
            LiteralPattern::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl Display for Contract {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Contract::Where(conds) => {
                write!(f, "where {{")?;
                for (i, c) in conds.iter().enumerate() {
                    write!(f, "{}", if i > 0 { ", " } else { " " })?;
                    if let Some(name) = &c.name {
                        write!(f, "{}: ", name.node)?;
                    }
                    write!(f, "{}", c.condition.node)?;
                }
                if conds.is_empty() {
                    write!(f, "}}")
                } else {
                    write!(f, " }}")
                }
            }
            Contract::Legacy { pre, post } => {
                let mut sep = "";
                if let Some(pre) = pre {
                    write!(f, "pre {}", pre.node)?;
                    sep = " ";
                }
                if let Some(post) = post {
                    write!(f, "{sep}post {}", post.node)?;
                }
                Ok(())
            }
        }
    }
}

impl Display for Attribute {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name.node)?;
        if let Some(args) = &self.args {
            write!(f, "(")?;
            comma_list(f, nodes(args))?;
            write!(f, ")")?;
        }
        Ok(())
    }
}

fn write_header(
    f: &mut Formatter<'_>,
    attributes: &[Attribute],
    visibility: Visibility,
) -> fmt::Result {
    for attr in attributes {
        writeln!(f, "{attr}")?;
    }
    if visibility == Visibility::Public {
        write!(f, "pub ")?;
    }
    Ok(())
}

impl Display for UseStmt {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "use ")?;
        for (i, seg) in self.path.iter().enumerate() {
            if i > 0 {
                write!(f, "::")?;
            }
            write!(f, "{}", seg.node)?;
        }
        write!(f, ";")
    }
}

impl Display for StructDef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_header(f, &self.attributes, self.visibility)?;
        write!(f, "struct {} {{", self.name.node)?;
        for (i, field) in self.fields.iter().enumerate() {
            let sep = if i > 0 { "," } else { "" };
            write!(f, "{sep} {}: {}", field.name.node, field.ty.node)?;
        }
        if self.fields.is_empty() {
            write!(f, "}}")
        } else {
            write!(f, " }}")
        }
    }
}

impl Display for EnumDef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_header(f, &self.attributes, self.visibility)?;
        write!(f, "enum {} {{", self.name.node)?;
        for (i, variant) in self.variants.iter().enumerate() {
            let sep = if i > 0 { "," } else { "" };
            write!(f, "{sep} {}", variant.name.node)?;
            if let Some(fields) = &variant.fields {
                write!(f, "(")?;
                comma_list(f, nodes(fields))?;
                write!(f, ")")?;
            }
        }
        if self.variants.is_empty() {
            write!(f, "}}")
        } else {
            write!(f, " }}")
        }
    }
}

impl Display for FnDef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_header(f, &self.attributes, self.visibility)?;
        write!(f, "fn {}(", self.name.node)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", param.name.node, param.ty.node)?;
        }
        write!(f, ") -> ")?;
        if let Some(ret_name) = &self.ret_name {
            write!(f, "{}: ", ret_name.node)?;
        }
        write!(f, "{}", self.ret_ty.node)?;
        if let Some(contract) = &self.contract {
            write!(f, " {contract}")?;
        }
        write!(f, " = {};", self.body.node)
    }
}

impl Display for Item {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Item::Use(u) => write!(f, "{u}"),
            Item::StructDef(s) => write!(f, "{s}"),
            Item::EnumDef(e) => write!(f, "{e}"),
            Item::FnDef(func) => write!(f, "{func}"),
        }
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for item in &self.items {
            writeln!(f, "{item}")?;
        }
        Ok(())
    }
}

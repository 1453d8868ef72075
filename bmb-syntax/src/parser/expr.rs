//! Expressions
//!
//! Control constructs (`if`, `let`, `match`, `while`, `for`, blocks) form a
//! tier above the operator ladder; everything else goes through precedence
//! climbing over [`BinOp::precedence`], then unary, postfix and primary.

use super::Parser;
use crate::ast::{BinOp, Expr, MatchArm, Span, Spanned, StateKind, UnOp};
use crate::error::Result;
use crate::lexer::Token;

/// Loosest binary precedence (`or`)
const MIN_PREC: u8 = 1;

impl Parser<'_> {
    /// Parse a full expression
    pub fn parse_expr(&mut self) -> Result<Spanned<Expr>> {
        self.nested(|p| p.parse_expr_inner())
    }

    fn parse_expr_inner(&mut self) -> Result<Spanned<Expr>> {
        match self.peek_keyword() {
            Some("if") => self.parse_if(),
            Some("let") => self.parse_let(false),
            Some("match") => self.parse_match(),
            Some("while") => self.parse_while(),
            Some("for") => self.parse_for(),
            _ if self.at(&Token::LBrace) => self.parse_block(),
            _ => self.parse_binary(MIN_PREC),
        }
    }

    // ---------------------------------------------------------------
    // Control constructs
    // ---------------------------------------------------------------

    fn parse_if(&mut self) -> Result<Spanned<Expr>> {
        let start = self.expect_keyword("if")?;
        let cond = self.parse_expr()?;
        self.expect_keyword("then")?;
        let then_branch = self.parse_expr()?;
        self.expect_keyword("else")?;
        let else_branch = self.parse_expr()?;

        let span = start.merge(else_branch.span);
        let expr = Expr::If {
            cond: Box::new(cond),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        };
        Ok(Spanned::new(expr, span))
    }

    /// `let [mut] name [: T] = value; body`. Inside a block the body is the
    /// rest of that block, so statements may follow the binding.
    fn parse_let(&mut self, rest_of_block: bool) -> Result<Spanned<Expr>> {
        let start = self.expect_keyword("let")?;
        let mutable = self.eat_keyword("mut").is_some();
        let name = self.expect_ident("variable name")?;
        let ty = if self.eat(&Token::Colon).is_some() {
            Some(self.parse_type()?)
        } else {
            None
        };
        self.expect(&Token::Eq)?;
        let value = self.parse_expr()?;
        self.expect(&Token::Semi)?;

        let body = if rest_of_block {
            self.parse_block_rest()?
        } else {
            self.parse_expr()?
        };

        log::trace!("let {} (mut: {mutable})", name.node);
        let span = start.merge(body.span);
        let expr = Expr::Let {
            mutable,
            name,
            ty,
            value: Box::new(value),
            body: Box::new(body),
        };
        Ok(Spanned::new(expr, span))
    }

    fn parse_match(&mut self) -> Result<Spanned<Expr>> {
        let start = self.expect_keyword("match")?;
        let scrutinee = self.parse_expr()?;
        self.expect(&Token::LBrace)?;
        let (arms, end) = self.delimited_list(&Token::RBrace, |p| p.parse_match_arm())?;

        let expr = Expr::Match {
            expr: Box::new(scrutinee),
            arms,
        };
        Ok(Spanned::new(expr, start.merge(end)))
    }

    fn parse_match_arm(&mut self) -> Result<MatchArm> {
        let pattern = self.parse_pattern()?;
        self.expect(&Token::FatArrow)?;
        let body = self.parse_expr()?;
        Ok(MatchArm { pattern, body })
    }

    fn parse_while(&mut self) -> Result<Spanned<Expr>> {
        let start = self.expect_keyword("while")?;
        let cond = self.parse_expr()?;
        self.expect(&Token::LBrace)?;
        let body = self.parse_expr()?;
        let end = self.expect(&Token::RBrace)?;

        let expr = Expr::While {
            cond: Box::new(cond),
            body: Box::new(body),
        };
        Ok(Spanned::new(expr, start.merge(end)))
    }

    fn parse_for(&mut self) -> Result<Spanned<Expr>> {
        let start = self.expect_keyword("for")?;
        let var = self.expect_ident("loop variable")?;
        self.expect_keyword("in")?;
        let iter = self.parse_expr()?;
        self.expect(&Token::LBrace)?;
        let body = self.parse_expr()?;
        let end = self.expect(&Token::RBrace)?;

        let expr = Expr::For {
            var,
            iter: Box::new(iter),
            body: Box::new(body),
        };
        Ok(Spanned::new(expr, start.merge(end)))
    }

    fn parse_block(&mut self) -> Result<Spanned<Expr>> {
        let start = self.expect(&Token::LBrace)?;
        let (stmts, tail) = self.parse_block_items()?;
        let end = self.expect(&Token::RBrace)?;

        let expr = Expr::Block {
            stmts,
            tail: tail.map(Box::new),
        };
        Ok(Spanned::new(expr, start.merge(end)))
    }

    /// Body of a `let` inside a block: everything up to the closing `}`.
    /// A lone tail expression is returned as is; anything else is wrapped in
    /// a block node.
    fn parse_block_rest(&mut self) -> Result<Spanned<Expr>> {
        let start = self.peek_span().start;
        let (stmts, tail) = self.parse_block_items()?;
        match tail {
            Some(tail) if stmts.is_empty() => Ok(tail),
            tail => {
                let end = self.prev_end().max(start);
                let expr = Expr::Block {
                    stmts,
                    tail: tail.map(Box::new),
                };
                Ok(Spanned::new(expr, Span::new(start, end)))
            }
        }
    }

    /// Statements and optional tail of a block, stopping before `}`
    fn parse_block_items(&mut self) -> Result<(Vec<Spanned<Expr>>, Option<Spanned<Expr>>)> {
        let mut stmts = Vec::new();

        while !self.at(&Token::RBrace) && !self.at_eof() {
            if self.at_keyword("let") {
                let binding = self.nested(|p| p.parse_let(true))?;
                return Ok((stmts, Some(binding)));
            }

            if self.at_ident_followed_by(&Token::Eq) {
                let assign = self.parse_assign()?;
                self.expect(&Token::Semi)?;
                stmts.push(assign);
                continue;
            }

            let expr = self.parse_expr()?;
            if self.eat(&Token::Semi).is_some() {
                stmts.push(expr);
                continue;
            }
            if !self.at(&Token::RBrace) {
                return Err(self.error_expected(&["`;`", "`}`"]));
            }
            return Ok((stmts, Some(expr)));
        }

        Ok((stmts, None))
    }

    /// `name = value`, only valid as a block statement
    fn parse_assign(&mut self) -> Result<Spanned<Expr>> {
        let name = self.expect_ident("assignment target")?;
        self.expect(&Token::Eq)?;
        let value = self.parse_expr()?;

        let span = name.span.merge(value.span);
        let expr = Expr::Assign {
            name,
            value: Box::new(value),
        };
        Ok(Spanned::new(expr, span))
    }

    // ---------------------------------------------------------------
    // Operator ladder
    // ---------------------------------------------------------------

    fn peek_binop(&self) -> Option<BinOp> {
        let op = match self.peek()? {
            Token::Ident(s) if s == "or" => BinOp::Or,
            Token::Ident(s) if s == "and" => BinOp::And,
            Token::EqEq => BinOp::Eq,
            Token::NotEq => BinOp::Ne,
            Token::Lt => BinOp::Lt,
            Token::Gt => BinOp::Gt,
            Token::LtEq => BinOp::Le,
            Token::GtEq => BinOp::Ge,
            Token::DotDot => BinOp::Range,
            Token::DotDotLt => BinOp::RangeExclusive,
            Token::DotDotEq => BinOp::RangeInclusive,
            Token::Plus => BinOp::Add,
            Token::Minus => BinOp::Sub,
            Token::Star => BinOp::Mul,
            Token::Slash => BinOp::Div,
            Token::Percent => BinOp::Mod,
            _ => return None,
        };
        Some(op)
    }

    /// Precedence climbing; every level is left associative
    fn parse_binary(&mut self, min_prec: u8) -> Result<Spanned<Expr>> {
        self.chain(|p| p.parse_binary_chain(min_prec))
    }

    fn parse_binary_chain(&mut self, min_prec: u8) -> Result<Spanned<Expr>> {
        let mut left = self.parse_unary()?;

        while let Some(op) = self.peek_binop() {
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            self.fold()?;
            self.bump();
            let right = self.parse_binary(prec + 1)?;

            let span = left.span.merge(right.span);
            left = Spanned::new(
                Expr::Binary {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                },
                span,
            );
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Spanned<Expr>> {
        let op = match self.peek() {
            Some(Token::Minus) => UnOp::Neg,
            Some(Token::Star) => UnOp::Deref,
            Some(Token::Ampersand) => UnOp::Ref,
            Some(t) if t.is_keyword("not") => UnOp::Not,
            _ => return self.parse_postfix(),
        };
        let start = self.bump();
        let op = if op == UnOp::Ref && self.eat_keyword("mut").is_some() {
            UnOp::RefMut
        } else {
            op
        };

        if op == UnOp::Neg {
            if let Some(min) = self.i64_min_literal(start) {
                return Ok(min);
            }
        }

        let operand = self.nested(|p| p.parse_unary())?;
        let span = start.merge(operand.span);
        let expr = Expr::Unary {
            op,
            expr: Box::new(operand),
        };
        Ok(Spanned::new(expr, span))
    }

    /// `-9223372036854775808` is `i64::MIN`, whose magnitude alone does not
    /// fit in an `i64`. It folds into one literal spanning the minus sign,
    /// unless a postfix suffix follows and binds to the magnitude first.
    fn i64_min_literal(&mut self, minus: Span) -> Option<Spanned<Expr>> {
        const MAGNITUDE: &str = "9223372036854775808";

        let Some((Token::IntLit(text), span)) = self.current() else {
            return None;
        };
        if text != MAGNITUDE || matches!(self.peek_at(1), Some(Token::Dot | Token::LBracket)) {
            return None;
        }
        self.bump();
        Some(Spanned::new(Expr::IntLit(i64::MIN), minus.merge(span)))
    }

    // ---------------------------------------------------------------
    // Postfix chains
    // ---------------------------------------------------------------

    /// `.pre`/`.post`, `.method(args)`, `.field` and `[index]`, applied left
    /// to right to the receiver built so far
    fn parse_postfix(&mut self) -> Result<Spanned<Expr>> {
        self.chain(|p| p.parse_postfix_chain())
    }

    fn parse_postfix_chain(&mut self) -> Result<Spanned<Expr>> {
        let mut expr = self.parse_primary()?;

        loop {
            if self.at(&Token::Dot) || self.at(&Token::LBracket) {
                self.fold()?;
            }
            if self.eat(&Token::Dot).is_some() {
                expr = self.parse_dot_suffix(expr)?;
            } else if self.eat(&Token::LBracket).is_some() {
                let index = self.parse_expr()?;
                let end = self.expect(&Token::RBracket)?;
                let span = expr.span.merge(end);
                expr = Spanned::new(
                    Expr::Index {
                        expr: Box::new(expr),
                        index: Box::new(index),
                    },
                    span,
                );
            } else {
                return Ok(expr);
            }
        }
    }

    fn parse_dot_suffix(&mut self, receiver: Spanned<Expr>) -> Result<Spanned<Expr>> {
        let state = if let Some(end) = self.eat_keyword("pre") {
            Some((StateKind::Pre, end))
        } else {
            self.eat_keyword("post").map(|end| (StateKind::Post, end))
        };
        if let Some((state, end)) = state {
            let span = receiver.span.merge(end);
            let expr = Expr::StateRef {
                expr: Box::new(receiver),
                state,
            };
            return Ok(Spanned::new(expr, span));
        }

        let name = match self.expect_ident("field or method name") {
            Ok(name) => name,
            Err(_) => return Err(self.error_expected(&["field or method name", "`pre`", "`post`"])),
        };

        if self.eat(&Token::LParen).is_some() {
            let (args, end) = self.delimited_list(&Token::RParen, |p| p.parse_expr())?;
            let span = receiver.span.merge(end);
            let expr = Expr::MethodCall {
                receiver: Box::new(receiver),
                method: name,
                args,
            };
            return Ok(Spanned::new(expr, span));
        }

        let span = receiver.span.merge(name.span);
        let expr = Expr::FieldAccess {
            expr: Box::new(receiver),
            field: name,
        };
        Ok(Spanned::new(expr, span))
    }

    // ---------------------------------------------------------------
    // Primaries
    // ---------------------------------------------------------------

    fn parse_primary(&mut self) -> Result<Spanned<Expr>> {
        const EXPECTED: &[&str] = &["expression"];

        let Some((token, span)) = self.current() else {
            return Err(self.error_expected(EXPECTED));
        };

        let expr = match &token {
            Token::IntLit(text) => Expr::IntLit(self.int_literal(text, &token, span)?),
            Token::FloatLit(text) => Expr::FloatLit(self.float_literal(text, &token, span)?),
            Token::StringLit(s) => Expr::StringLit(s.clone()),
            Token::LParen => return self.parse_paren(),
            Token::LBracket => {
                self.bump();
                let (elems, end) = self.delimited_list(&Token::RBracket, |p| p.parse_expr())?;
                return Ok(Spanned::new(Expr::ArrayLit(elems), span.merge(end)));
            }
            Token::Ident(name) => match self.peek_keyword() {
                Some("true") => Expr::BoolLit(true),
                Some("false") => Expr::BoolLit(false),
                Some("ret") => Expr::Ret,
                Some("it") => Expr::It,
                Some("new") => return self.parse_struct_init(),
                Some(_) => return Err(self.error_expected(EXPECTED)),
                None => return self.parse_name(Spanned::new(name.clone(), span)),
            },
            _ => return Err(self.error_expected(EXPECTED)),
        };

        self.bump();
        Ok(Spanned::new(expr, span))
    }

    /// `()` is the unit value; anything else in parentheses is kept as a
    /// parenthesized node
    fn parse_paren(&mut self) -> Result<Spanned<Expr>> {
        let start = self.expect(&Token::LParen)?;
        if let Some(end) = self.eat(&Token::RParen) {
            return Ok(Spanned::new(Expr::Unit, start.merge(end)));
        }
        let inner = self.parse_expr()?;
        let end = self.expect(&Token::RParen)?;
        Ok(Spanned::new(Expr::Paren(Box::new(inner)), start.merge(end)))
    }

    /// Identifier-led primaries: `f(args)` is a call, `E::V[(args)]` an enum
    /// variant, and a bare name a variable reference
    fn parse_name(&mut self, name: Spanned<String>) -> Result<Spanned<Expr>> {
        self.bump();

        if self.eat(&Token::LParen).is_some() {
            let (args, end) = self.delimited_list(&Token::RParen, |p| p.parse_expr())?;
            let span = name.span.merge(end);
            return Ok(Spanned::new(Expr::Call { func: name, args }, span));
        }

        if self.eat(&Token::ColonColon).is_some() {
            let variant = self.expect_ident("variant name")?;
            let mut end = variant.span;
            let args = if self.eat(&Token::LParen).is_some() {
                let (args, close) = self.delimited_list(&Token::RParen, |p| p.parse_expr())?;
                end = close;
                Some(args)
            } else {
                None
            };
            let span = name.span.merge(end);
            let expr = Expr::EnumVariant {
                enum_name: name,
                variant,
                args,
            };
            return Ok(Spanned::new(expr, span));
        }

        let span = name.span;
        Ok(Spanned::new(Expr::Var(name.node), span))
    }

    /// `new Name { field: value, ... }`
    fn parse_struct_init(&mut self) -> Result<Spanned<Expr>> {
        let start = self.expect_keyword("new")?;
        let name = self.expect_ident("struct name")?;
        self.expect(&Token::LBrace)?;
        let (fields, end) = self.delimited_list(&Token::RBrace, |p| {
            let field = p.expect_ident("field name")?;
            p.expect(&Token::Colon)?;
            let value = p.parse_expr()?;
            Ok((field, value))
        })?;

        Ok(Spanned::new(Expr::StructInit { name, fields }, start.merge(end)))
    }
}

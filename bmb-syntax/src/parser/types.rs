//! Type expressions

use super::Parser;
use crate::ast::{PrimitiveType, Spanned, Type};
use crate::error::Result;
use crate::lexer::{self, Token};

impl Parser<'_> {
    /// Parse a type: primitive, unit, `&T`, `&mut T`, `[T; N]`, refined
    /// `i64{ ... }`, or a named struct/enum type.
    pub fn parse_type(&mut self) -> Result<Spanned<Type>> {
        self.nested(|p| p.parse_type_inner())
    }

    fn parse_type_inner(&mut self) -> Result<Spanned<Type>> {
        let Some((token, span)) = self.current() else {
            return Err(self.error_expected(&["type"]));
        };

        match token {
            Token::Ampersand => {
                self.bump();
                let mutable = self.eat_keyword("mut").is_some();
                let inner = self.parse_type()?;
                let span = span.merge(inner.span);
                let inner = Box::new(inner.node);
                let ty = if mutable { Type::RefMut(inner) } else { Type::Ref(inner) };
                Ok(Spanned::new(ty, span))
            }
            Token::LBracket => {
                self.bump();
                let elem = self.parse_type()?;
                self.expect(&Token::Semi)?;
                let len = self.parse_array_len()?;
                let end = self.expect(&Token::RBracket)?;
                Ok(Spanned::new(Type::Array(Box::new(elem.node), len), span.merge(end)))
            }
            Token::LParen => {
                self.bump();
                let end = self.expect(&Token::RParen)?;
                Ok(Spanned::new(Type::Unit, span.merge(end)))
            }
            Token::Ident(name) => {
                if let Some(prim) = PrimitiveType::from_name(&name) {
                    self.bump();
                    if prim.is_refinable() && self.eat(&Token::LBrace).is_some() {
                        let (constraints, end) =
                            self.delimited_list(&Token::RBrace, |p| p.parse_expr())?;
                        log::trace!("refined {prim} with {} constraints", constraints.len());
                        let ty = Type::Refined {
                            base: prim,
                            constraints,
                        };
                        return Ok(Spanned::new(ty, span.merge(end)));
                    }
                    return Ok(Spanned::new(Type::Primitive(prim), span));
                }
                if lexer::is_keyword(&name) {
                    return Err(self.error_expected(&["type"]));
                }
                self.bump();
                Ok(Spanned::new(Type::Named(name), span))
            }
            _ => Err(self.error_expected(&["type"])),
        }
    }

    fn parse_array_len(&mut self) -> Result<u64> {
        match self.current() {
            Some((Token::IntLit(text), span)) => {
                self.bump();
                text.parse::<u64>().map_err(|_| {
                    let message = format!("malformed literal: array length `{text}` out of range");
                    self.error_malformed(message, &Token::IntLit(text.clone()), span)
                })
            }
            _ => Err(self.error_expected(&["array length"])),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{BinOp, Expr, PrimitiveType, Type};
    use crate::parser::parse_type_str;

    fn ty(source: &str) -> Type {
        parse_type_str(source).expect("type should parse").node
    }

    #[test]
    fn test_primitive_types() {
        assert_eq!(ty("i32"), Type::Primitive(PrimitiveType::I32));
        assert_eq!(ty("i64"), Type::Primitive(PrimitiveType::I64));
        assert_eq!(ty("f64"), Type::Primitive(PrimitiveType::F64));
        assert_eq!(ty("bool"), Type::Primitive(PrimitiveType::Bool));
        assert_eq!(ty("String"), Type::Primitive(PrimitiveType::String));
    }

    #[test]
    fn test_unit_and_named() {
        assert_eq!(ty("()"), Type::Unit);
        assert_eq!(ty("Point"), Type::Named("Point".to_string()));
    }

    #[test]
    fn test_references() {
        assert_eq!(ty("&i64"), Type::Ref(Box::new(Type::Primitive(PrimitiveType::I64))));
        assert_eq!(ty("&mut Point"), Type::RefMut(Box::new(Type::Named("Point".to_string()))));
        assert_eq!(
            ty("&&bool"),
            Type::Ref(Box::new(Type::Ref(Box::new(Type::Primitive(PrimitiveType::Bool)))))
        );
    }

    #[test]
    fn test_array_type() {
        let i32_ty = Box::new(Type::Primitive(PrimitiveType::I32));
        assert_eq!(ty("[i32; 4]"), Type::Array(i32_ty, 4));
        let f64_ty = Box::new(Type::Primitive(PrimitiveType::F64));
        assert_eq!(ty("[[f64; 2]; 3]"), Type::Array(Box::new(Type::Array(f64_ty, 2)), 3));
    }

    #[test]
    fn test_refined_type_constraints() {
        let Type::Refined { base, constraints } = ty("i32{ it > 0, it < 100 }") else {
            panic!("expected refined type");
        };
        assert_eq!(base, PrimitiveType::I32);
        assert_eq!(constraints.len(), 2);
        assert!(matches!(
            &constraints[0].node,
            Expr::Binary { left, op: BinOp::Gt, right }
                if left.node == Expr::It && right.node == Expr::IntLit(0)
        ));
        assert!(matches!(&constraints[1].node, Expr::Binary { op: BinOp::Lt, .. }));
    }

    #[test]
    fn test_refined_type_trailing_comma() {
        let t = ty("f64{ it >= 0.0, }");
        assert!(matches!(t, Type::Refined { ref constraints, .. } if constraints.len() == 1));
    }

    #[test]
    fn test_empty_refinement_is_unconstrained() {
        let t = ty("bool{}");
        assert!(matches!(
            t,
            Type::Refined { base: PrimitiveType::Bool, ref constraints } if constraints.is_empty()
        ));
        assert!(t.is_unconstrained());
        assert_eq!(t.base_primitive(), Some(PrimitiveType::Bool));
    }

    #[test]
    fn test_string_is_not_refinable() {
        // `String` followed by `{` leaves the brace unconsumed
        assert!(parse_type_str("String{ it }").is_err());
    }

    #[test]
    fn test_keyword_is_not_a_named_type() {
        let err = parse_type_str("let").unwrap_err();
        assert_eq!(err.message(), "expected type, found keyword `let`");
    }

    #[test]
    fn test_array_requires_length() {
        let err = parse_type_str("[i32; n]").unwrap_err();
        assert_eq!(err.message(), "expected array length, found identifier `n`");
    }

    #[test]
    fn test_unit_type_requires_close_paren() {
        assert!(parse_type_str("(i32)").is_err());
    }

    #[test]
    fn test_type_spans() {
        let t = parse_type_str("  &mut [i32; 2]").unwrap();
        assert_eq!((t.span.start, t.span.end), (2, 15));
    }

    #[test]
    fn test_nested_types_within_limit() {
        let depth = 100;
        let refs = format!("{}i32", "&".repeat(depth));
        assert_eq!(ty(&refs).to_string(), refs);
        let arrays = format!("{}bool{}", "[".repeat(depth), "; 1]".repeat(depth));
        assert_eq!(ty(&arrays).to_string(), arrays);
    }

    #[test]
    fn test_pathological_type_nesting_is_an_error() {
        let depth = 200_000;
        let err = parse_type_str(&format!("{}i32", "&".repeat(depth))).unwrap_err();
        assert!(err.message().starts_with("nesting deeper than"));
        let arrays = format!("{}i32{}", "[".repeat(depth), "; 1]".repeat(depth));
        assert!(parse_type_str(&arrays).is_err());
        let source = format!("fn f(x: {}i32) -> i32 = 0;", "&mut ".repeat(depth));
        assert!(crate::parse_source("test.bmb", &source).is_err());
    }

    #[test]
    fn test_refined_type_display() {
        assert_eq!(ty("i32{ it > 0, it < 100 }").to_string(), "i32{ it > 0, it < 100 }");
        assert_eq!(ty("&mut [i64; 3]").to_string(), "&mut [i64; 3]");
    }
}

//! Match-arm patterns

use super::Parser;
use crate::ast::{LiteralPattern, Pattern, Spanned};
use crate::error::Result;
use crate::lexer::{self, Token};

impl Parser<'_> {
    /// Parse a match pattern. An identifier followed by `::` starts an enum
    /// variant pattern; a lone identifier binds a variable.
    pub fn parse_pattern(&mut self) -> Result<Spanned<Pattern>> {
        const EXPECTED: &[&str] = &["pattern"];

        let Some((token, span)) = self.current() else {
            return Err(self.error_expected(EXPECTED));
        };

        let literal = match &token {
            Token::IntLit(text) => {
                Some(LiteralPattern::Int(self.int_literal(text, &token, span)?))
            }
            Token::FloatLit(text) => {
                Some(LiteralPattern::Float(self.float_literal(text, &token, span)?))
            }
            Token::StringLit(s) => Some(LiteralPattern::String(s.clone())),
            Token::Ident(s) if s == "true" => Some(LiteralPattern::Bool(true)),
            Token::Ident(s) if s == "false" => Some(LiteralPattern::Bool(false)),
            _ => None,
        };
        if let Some(lit) = literal {
            self.bump();
            return Ok(Spanned::new(Pattern::Literal(lit), span));
        }

        let Token::Ident(name) = token else {
            return Err(self.error_expected(EXPECTED));
        };
        if name == "_" {
            self.bump();
            return Ok(Spanned::new(Pattern::Wildcard, span));
        }
        if lexer::is_keyword(&name) {
            return Err(self.error_expected(EXPECTED));
        }
        self.bump();

        if self.eat(&Token::ColonColon).is_none() {
            return Ok(Spanned::new(Pattern::Var(name), span));
        }

        let variant = self.expect_ident("variant name")?;
        let mut end = variant.span;
        let bindings = if self.eat(&Token::LParen).is_some() {
            let (bindings, close) =
                self.delimited_list(&Token::RParen, |p| p.expect_ident("binding name"))?;
            end = close;
            Some(bindings)
        } else {
            None
        };

        let pattern = Pattern::EnumVariant {
            enum_name: Spanned::new(name, span),
            variant,
            bindings,
        };
        Ok(Spanned::new(pattern, span.merge(end)))
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{LiteralPattern, Pattern, Span};
    use crate::parser::parse_pattern_str;

    fn pat(source: &str) -> Pattern {
        parse_pattern_str(source).expect("pattern should parse").node
    }

    #[test]
    fn test_wildcard() {
        assert_eq!(pat("_"), Pattern::Wildcard);
    }

    #[test]
    fn test_variable() {
        assert_eq!(pat("value"), Pattern::Var("value".to_string()));
        // a leading underscore is still a plain identifier
        assert_eq!(pat("_rest"), Pattern::Var("_rest".to_string()));
    }

    #[test]
    fn test_literals() {
        assert_eq!(pat("42"), Pattern::Literal(LiteralPattern::Int(42)));
        assert_eq!(pat("2.5"), Pattern::Literal(LiteralPattern::Float(2.5)));
        assert_eq!(pat("\"hi\""), Pattern::Literal(LiteralPattern::String("hi".to_string())));
        assert_eq!(pat("true"), Pattern::Literal(LiteralPattern::Bool(true)));
        assert_eq!(pat("false"), Pattern::Literal(LiteralPattern::Bool(false)));
    }

    #[test]
    fn test_unit_enum_variant() {
        let Pattern::EnumVariant { enum_name, variant, bindings } = pat("Color::Red") else {
            panic!("expected enum variant pattern");
        };
        assert_eq!(enum_name.node, "Color");
        assert_eq!(variant.node, "Red");
        assert!(bindings.is_none());
    }

    #[test]
    fn test_empty_bindings_differ_from_none() {
        let bare = pat("Color::Red");
        let empty = pat("Color::Red()");
        assert!(matches!(&empty, Pattern::EnumVariant { bindings: Some(b), .. } if b.is_empty()));
        assert_ne!(bare, empty);
        assert_eq!(bare.to_string(), "Color::Red");
        assert_eq!(empty.to_string(), "Color::Red()");
        assert_eq!(pat(&empty.to_string()), empty);
    }

    #[test]
    fn test_enum_variant_bindings() {
        let Pattern::EnumVariant { bindings, .. } = pat("Shape::Rect(w, h,)") else {
            panic!("expected enum variant pattern");
        };
        let names: Vec<_> = bindings.iter().flatten().map(|b| b.node.as_str()).collect();
        assert_eq!(names, vec!["w", "h"]);
    }

    #[test]
    fn test_enum_variant_span_covers_bindings() {
        let p = parse_pattern_str("Opt::Some(x)").unwrap();
        assert_eq!(p.span, Span::new(0, 12));
    }

    #[test]
    fn test_nested_patterns_are_rejected() {
        let err = parse_pattern_str("Opt::Some(Opt::None)").unwrap_err();
        assert!(err.message().starts_with("expected one of `,`, `)`"));
        assert!(parse_pattern_str("Opt::Some(1)").is_err());
    }

    #[test]
    fn test_keyword_is_not_a_pattern() {
        let err = parse_pattern_str("if").unwrap_err();
        assert_eq!(err.message(), "expected pattern, found keyword `if`");
    }

    #[test]
    fn test_negative_literal_is_not_a_pattern() {
        assert!(parse_pattern_str("-1").is_err());
    }
}

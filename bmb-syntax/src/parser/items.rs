//! Top-level items: `use`, `struct`, `enum` and `fn`

use super::Parser;
use crate::ast::{
    Attribute, EnumDef, EnumVariant, FnDef, Item, Param, Span, StructDef, StructField, UseStmt,
    Visibility,
};
use crate::error::Result;
use crate::lexer::Token;

impl Parser<'_> {
    /// Parse one item with its leading attributes and visibility
    pub fn parse_item(&mut self) -> Result<Item> {
        let start = self.peek_span();
        let attributes = self.parse_attributes()?;
        let visibility = if self.eat_keyword("pub").is_some() {
            Visibility::Public
        } else {
            Visibility::Private
        };

        let item = match self.peek_keyword() {
            Some("use") if attributes.is_empty() && visibility == Visibility::Private => {
                Item::Use(self.parse_use()?)
            }
            Some("use") => {
                let span = self.peek_span();
                return Err(self.error_malformed(
                    "`use` cannot have attributes or visibility",
                    &Token::Ident("use".to_string()),
                    span,
                ));
            }
            Some("struct") => Item::StructDef(self.parse_struct(start, attributes, visibility)?),
            Some("enum") => Item::EnumDef(self.parse_enum(start, attributes, visibility)?),
            Some("fn") => Item::FnDef(self.parse_fn(start, attributes, visibility)?),
            _ => return Err(self.error_expected(&["`fn`", "`struct`", "`enum`", "`use`"])),
        };

        log::debug!(
            "parsed item {} at {}",
            item.name().unwrap_or("use"),
            self.position(item.span().start)
        );
        Ok(item)
    }

    /// `@name` or `@name(args)`, repeated
    fn parse_attributes(&mut self) -> Result<Vec<Attribute>> {
        let mut attributes = Vec::new();
        while let Some(start) = self.eat(&Token::At) {
            let name = self.expect_ident("attribute name")?;
            let mut end = name.span;
            let args = if self.eat(&Token::LParen).is_some() {
                let (args, close) = self.delimited_list(&Token::RParen, |p| p.parse_expr())?;
                end = close;
                Some(args)
            } else {
                None
            };
            attributes.push(Attribute {
                name,
                args,
                span: start.merge(end),
            });
        }
        Ok(attributes)
    }

    /// `use a::b::c;`
    fn parse_use(&mut self) -> Result<UseStmt> {
        let start = self.expect_keyword("use")?;
        let mut path = vec![self.expect_ident("module path")?];
        while self.eat(&Token::ColonColon).is_some() {
            path.push(self.expect_ident("module path")?);
        }
        let end = self.expect(&Token::Semi)?;
        Ok(UseStmt {
            path,
            span: start.merge(end),
        })
    }

    fn parse_struct(
        &mut self,
        start: Span,
        attributes: Vec<Attribute>,
        visibility: Visibility,
    ) -> Result<StructDef> {
        self.expect_keyword("struct")?;
        let name = self.expect_ident("struct name")?;
        self.expect(&Token::LBrace)?;
        let (fields, end) = self.delimited_list(&Token::RBrace, |p| {
            let name = p.expect_ident("field name")?;
            p.expect(&Token::Colon)?;
            let ty = p.parse_type()?;
            Ok(StructField { name, ty })
        })?;

        Ok(StructDef {
            attributes,
            visibility,
            name,
            fields,
            span: start.merge(end),
        })
    }

    fn parse_enum(
        &mut self,
        start: Span,
        attributes: Vec<Attribute>,
        visibility: Visibility,
    ) -> Result<EnumDef> {
        self.expect_keyword("enum")?;
        let name = self.expect_ident("enum name")?;
        self.expect(&Token::LBrace)?;
        let (variants, end) = self.delimited_list(&Token::RBrace, |p| {
            let name = p.expect_ident("variant name")?;
            let fields = if p.eat(&Token::LParen).is_some() {
                Some(p.delimited_list(&Token::RParen, |p| p.parse_type())?.0)
            } else {
                None
            };
            Ok(EnumVariant { name, fields })
        })?;

        Ok(EnumDef {
            attributes,
            visibility,
            name,
            variants,
            span: start.merge(end),
        })
    }

    /// `fn name(params) -> [binder:] Type [contract] = body;`
    fn parse_fn(
        &mut self,
        start: Span,
        attributes: Vec<Attribute>,
        visibility: Visibility,
    ) -> Result<FnDef> {
        self.expect_keyword("fn")?;
        let name = self.expect_ident("function name")?;
        self.expect(&Token::LParen)?;
        let (params, _) = self.delimited_list(&Token::RParen, |p| p.parse_param())?;
        self.expect(&Token::Arrow)?;

        let ret_name = if self.at_ident_followed_by(&Token::Colon) {
            let binder = self.expect_ident("return binder")?;
            self.bump();
            Some(binder)
        } else {
            None
        };
        let ret_ty = self.parse_type()?;
        let contract = self.parse_contract()?;

        self.expect(&Token::Eq)?;
        let body = self.parse_expr()?;
        let end = self.expect(&Token::Semi)?;

        Ok(FnDef {
            attributes,
            visibility,
            name,
            params,
            ret_name,
            ret_ty,
            contract,
            body,
            span: start.merge(end),
        })
    }

    fn parse_param(&mut self) -> Result<Param> {
        let name = self.expect_ident("parameter name")?;
        self.expect(&Token::Colon)?;
        let ty = self.parse_type()?;
        Ok(Param { name, ty })
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{Contract, Expr, Item, Span, Type, Visibility};
    use crate::parse_source;

    fn item(source: &str) -> Item {
        let mut program = parse_source("test.bmb", source).expect("item should parse");
        assert_eq!(program.items.len(), 1);
        program.items.remove(0)
    }

    #[test]
    fn test_use_path() {
        let Item::Use(u) = item("use std::io::print;") else {
            panic!("expected use");
        };
        let path: Vec<_> = u.path.iter().map(|s| s.node.as_str()).collect();
        assert_eq!(path, vec!["std", "io", "print"]);
        assert_eq!(u.span, Span::new(0, 19));
    }

    #[test]
    fn test_use_rejects_attributes_and_visibility() {
        let err = parse_source("test.bmb", "pub use a;").unwrap_err();
        assert_eq!(err.message(), "`use` cannot have attributes or visibility");
        assert!(parse_source("test.bmb", "@inline use a;").is_err());
    }

    #[test]
    fn test_struct_fields() {
        let Item::StructDef(s) = item("pub struct Point { x: i64, y: &mut f64, }") else {
            panic!("expected struct");
        };
        assert_eq!(s.visibility, Visibility::Public);
        assert_eq!(s.name.node, "Point");
        let fields: Vec<_> = s
            .fields
            .iter()
            .map(|f| (f.name.node.as_str(), f.ty.node.to_string()))
            .collect();
        assert_eq!(fields, vec![("x", "i64".to_string()), ("y", "&mut f64".to_string())]);
    }

    #[test]
    fn test_enum_variants() {
        let source = "enum Shape { Empty, Unit(), Circle(f64), Rect(f64, f64,) }";
        let Item::EnumDef(e) = item(source) else {
            panic!("expected enum");
        };
        assert_eq!(e.visibility, Visibility::Private);
        let arity: Vec<_> = e.variants.iter().map(|v| v.fields.as_ref().map(Vec::len)).collect();
        assert_eq!(arity, vec![None, Some(0), Some(1), Some(2)]);
    }

    #[test]
    fn test_attributes() {
        let Item::FnDef(f) = item("@inline @trust(\"audited\", 2) fn f() -> () = ();") else {
            panic!("expected fn");
        };
        assert_eq!(f.attributes.len(), 2);
        assert_eq!(f.attributes[0].name.node, "inline");
        assert!(f.attributes[0].args.is_none());
        assert_eq!(f.attributes[1].args.as_ref().map(Vec::len), Some(2));
        // item span starts at the first attribute
        assert_eq!(f.span.start, 0);
    }

    #[test]
    fn test_fn_signature() {
        let Item::FnDef(f) = item("fn add(a: i64, b: i64,) -> i64 = a + b;") else {
            panic!("expected fn");
        };
        assert_eq!(f.name.node, "add");
        let params: Vec<_> = f.params.iter().map(|p| p.name.node.as_str()).collect();
        assert_eq!(params, vec!["a", "b"]);
        assert!(f.ret_name.is_none());
        assert!(f.contract.is_none());
        assert!(matches!(f.body.node, Expr::Binary { .. }));
    }

    #[test]
    fn test_return_binder() {
        let source = "fn abs(x: i64) -> r: i64 post r >= 0 = if x < 0 then -x else x;";
        let Item::FnDef(f) = item(source) else {
            panic!("expected fn");
        };
        assert_eq!(f.ret_name.as_ref().map(|r| r.node.as_str()), Some("r"));
        assert!(f.post().is_some());
        assert!(f.pre().is_none());
    }

    #[test]
    fn test_named_return_type_is_not_a_binder() {
        let Item::FnDef(f) = item("fn origin() -> Point = new Point { x: 0, y: 0 };") else {
            panic!("expected fn");
        };
        assert!(f.ret_name.is_none());
        assert_eq!(f.ret_ty.node, Type::Named("Point".to_string()));
    }

    #[test]
    fn test_where_contract_has_no_legacy_fields() {
        let Item::FnDef(f) = item("fn f(x: i64) -> i64 where { pos: x > 0 } = x;") else {
            panic!("expected fn");
        };
        assert!(matches!(f.contract, Some(Contract::Where(ref c)) if c.len() == 1));
        assert!(f.pre().is_none() && f.post().is_none());
    }

    #[test]
    fn test_missing_body_semicolon() {
        let err = parse_source("test.bmb", "fn f() -> i64 = 1").unwrap_err();
        assert_eq!(err.message(), "expected `;`, found end of input");
    }

    #[test]
    fn test_not_an_item() {
        let err = parse_source("test.bmb", "let x = 1;").unwrap_err();
        assert_eq!(
            err.message(),
            "expected one of `fn`, `struct`, `enum`, `use`, found keyword `let`"
        );
    }
}

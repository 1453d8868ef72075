//! Function contracts
//!
//! Two mutually exclusive forms, selected by the first token:
//! `where { label: cond, cond, ... }` or the legacy `pre e post e` pair.

use super::Parser;
use crate::ast::{Contract, NamedContract};
use crate::error::Result;
use crate::lexer::Token;

impl Parser<'_> {
    /// Parse an optional contract clause. `None` when neither `where`, `pre`
    /// nor `post` follows.
    pub fn parse_contract(&mut self) -> Result<Option<Contract>> {
        if self.eat_keyword("where").is_some() {
            self.expect(&Token::LBrace)?;
            let (conditions, _) =
                self.delimited_list(&Token::RBrace, |p| p.parse_named_contract())?;
            log::trace!("where block with {} conditions", conditions.len());
            return Ok(Some(Contract::Where(conditions)));
        }

        let pre = match self.eat_keyword("pre") {
            Some(_) => Some(self.parse_expr()?),
            None => None,
        };
        let post = match self.eat_keyword("post") {
            Some(_) => Some(self.parse_expr()?),
            None => None,
        };

        if pre.is_none() && post.is_none() {
            Ok(None)
        } else {
            Ok(Some(Contract::Legacy { pre, post }))
        }
    }

    fn parse_named_contract(&mut self) -> Result<NamedContract> {
        let name = if self.at_ident_followed_by(&Token::Colon) {
            let label = self.expect_ident("contract label")?;
            self.bump();
            Some(label)
        } else {
            None
        };
        let condition = self.parse_expr()?;
        Ok(NamedContract { name, condition })
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{BinOp, Contract, Expr, StateKind};
    use crate::error::Result;
    use crate::lexer::tokenize;
    use crate::parser::Parser;

    fn contract(source: &str) -> Result<Option<Contract>> {
        let mut parser = Parser::new(source, tokenize(source)?);
        let contract = parser.parse_contract()?;
        parser.expect_eof()?;
        Ok(contract)
    }

    #[test]
    fn test_no_contract() {
        assert_eq!(contract("").unwrap(), None);
    }

    #[test]
    fn test_where_block_labels() {
        let parsed = contract("where { positive: x > 0, x < 10, }").unwrap();
        let Some(Contract::Where(conditions)) = parsed else {
            panic!("expected where block");
        };
        assert_eq!(conditions.len(), 2);
        assert_eq!(conditions[0].name.as_ref().map(|n| n.node.as_str()), Some("positive"));
        assert!(conditions[1].name.is_none());
        assert!(matches!(conditions[1].condition.node, Expr::Binary { op: BinOp::Lt, .. }));
    }

    #[test]
    fn test_empty_where_block() {
        assert_eq!(contract("where {}").unwrap(), Some(Contract::Where(vec![])));
    }

    #[test]
    fn test_legacy_pre_and_post() {
        let parsed = contract("pre n >= 0 post ret > n.pre").unwrap();
        let Some(Contract::Legacy { pre, post }) = parsed else {
            panic!("expected legacy contract");
        };
        assert!(matches!(pre.map(|p| p.node), Some(Expr::Binary { op: BinOp::Ge, .. })));
        let Some(Expr::Binary { left, right, .. }) = post.map(|p| p.node) else {
            panic!("expected binary postcondition");
        };
        assert_eq!(left.node, Expr::Ret);
        assert!(matches!(right.node, Expr::StateRef { state: StateKind::Pre, .. }));
    }

    #[test]
    fn test_legacy_clauses_are_independent() {
        assert!(matches!(
            contract("post ret == 0").unwrap(),
            Some(Contract::Legacy { pre: None, post: Some(_) })
        ));
        assert!(matches!(
            contract("pre x").unwrap(),
            Some(Contract::Legacy { pre: Some(_), post: None })
        ));
    }

    #[test]
    fn test_forms_are_exclusive() {
        assert!(contract("where { x } pre y").is_err());
        assert!(contract("pre y where { x }").is_err());
    }

    #[test]
    fn test_post_before_pre_is_rejected() {
        assert!(contract("post a pre b").is_err());
    }

    #[test]
    fn test_label_needs_condition() {
        let err = contract("where { bounded: }").unwrap_err();
        assert_eq!(err.message(), "expected expression, found `}`");
    }
}

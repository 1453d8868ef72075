//! Recursive-descent parser
//!
//! One [`Parser`] owns the token stream of a single source unit and a
//! cursor into it. The grammar is split across `impl Parser` blocks:
//! types, patterns, expressions, contracts and items each live in their own
//! module. Every decision is made with at most two tokens of lookahead.

mod contract;
mod expr;
mod items;
mod pattern;
mod types;


use crate::ast::{Expr, LineIndex, Pattern, Position, Program, Span, Spanned, Type};
use crate::config::ParseOptions;
use crate::error::{CompileError, Diagnostics, Result};
use crate::lexer::{self, KEYWORDS, Token, TokenKind};

/// Tokens that can only appear at the start of an item; error recovery
/// resumes at the next one of these.
const ITEM_START_KEYWORDS: &[&str] = &["fn", "struct", "enum", "use", "pub"];

const STACK_RED_ZONE: usize = 128 * 1024; // grow when less than this remains
const STACK_GROW_SIZE: usize = 4 * 1024 * 1024;

/// Deepest nesting the parser accepts. Every tree it returns stays within
/// roughly twice this many levels, so dropping, printing and comparing
/// trees is safe on a default thread stack.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Parser state for one source unit
pub struct Parser<'src> {
    tokens: Vec<(Token, Span)>,
    pos: usize,
    index: LineIndex<'src>,
    source_len: usize,
    /// Nesting level of the node being parsed
    depth: usize,
    /// Deepest level reached inside the current subtree
    peak: usize,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str, tokens: Vec<(Token, Span)>) -> Self {
        Self {
            tokens,
            pos: 0,
            index: LineIndex::new(source),
            source_len: source.len(),
            depth: 0,
            peak: 0,
        }
    }

    // ---------------------------------------------------------------
    // Program assembler
    // ---------------------------------------------------------------

    /// Parse items until end of input, failing on the first error
    pub fn parse_program(&mut self) -> Result<Program> {
        let mut items = Vec::new();
        while !self.at_eof() {
            items.push(self.parse_item()?);
        }
        Ok(Program { items })
    }

    /// Parse items until end of input. In collect mode an item that fails is
    /// skipped and parsing resumes at the next item start; the result is an
    /// error whenever anything was recorded.
    pub fn parse_program_with(
        &mut self,
        options: &ParseOptions,
    ) -> std::result::Result<Program, Diagnostics> {
        let limit = options.error_limit();
        let mut items = Vec::new();
        let mut errors = Vec::new();

        while !self.at_eof() {
            let item_start = self.pos;
            match self.parse_item() {
                Ok(item) => items.push(item),
                Err(e) => {
                    log::debug!("item at token {item_start} failed: {e}");
                    errors.push(e);
                    if errors.len() >= limit {
                        break;
                    }
                    self.recover_to_item(item_start);
                }
            }
        }

        if errors.is_empty() {
            Ok(Program { items })
        } else {
            Err(Diagnostics { errors })
        }
    }

    fn recover_to_item(&mut self, item_start: usize) {
        if self.pos == item_start {
            self.pos += 1;
        }
        while let Some(token) = self.peek() {
            if *token == Token::At || ITEM_START_KEYWORDS.iter().any(|kw| token.is_keyword(kw)) {
                break;
            }
            self.pos += 1;
        }
        log::trace!("recovered at token {}", self.pos);
    }

    /// Fail unless every token was consumed
    pub fn expect_eof(&self) -> Result<()> {
        if self.at_eof() {
            Ok(())
        } else {
            Err(self.error_expected(&[TokenKind::Eof.to_string().as_str()]))
        }
    }

    // ---------------------------------------------------------------
    // Cursor helpers
    // ---------------------------------------------------------------

    fn peek(&self) -> Option<&Token> {
        self.peek_at(0)
    }

    fn peek_at(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.pos + n).map(|(t, _)| t)
    }

    /// Current token and span, cloned so the cursor can move afterwards
    fn current(&self) -> Option<(Token, Span)> {
        self.tokens.get(self.pos).cloned()
    }

    /// Span of the current token, or an empty span at end of input
    fn peek_span(&self) -> Span {
        self.tokens
            .get(self.pos)
            .map(|(_, s)| *s)
            .unwrap_or_else(|| Span::point(self.source_len))
    }

    /// End offset of the last consumed token
    fn prev_end(&self) -> usize {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|(_, s)| s.end)
            .unwrap_or(0)
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn at(&self, token: &Token) -> bool {
        self.peek() == Some(token)
    }

    fn at_keyword(&self, kw: &str) -> bool {
        self.peek().is_some_and(|t| t.is_keyword(kw))
    }

    /// The reserved word under the cursor, if any
    fn peek_keyword(&self) -> Option<&'static str> {
        match self.peek() {
            Some(Token::Ident(s)) => KEYWORDS.iter().copied().find(|kw| *kw == s.as_str()),
            _ => None,
        }
    }

    fn bump(&mut self) -> Span {
        let span = self.peek_span();
        if !self.at_eof() {
            self.pos += 1;
        }
        span
    }

    fn eat(&mut self, token: &Token) -> Option<Span> {
        if self.at(token) { Some(self.bump()) } else { None }
    }

    fn eat_keyword(&mut self, kw: &str) -> Option<Span> {
        if self.at_keyword(kw) { Some(self.bump()) } else { None }
    }

    fn expect(&mut self, token: &Token) -> Result<Span> {
        match self.eat(token) {
            Some(span) => Ok(span),
            None => Err(self.error_expected(&[format!("`{token}`").as_str()])),
        }
    }

    fn expect_keyword(&mut self, kw: &str) -> Result<Span> {
        match self.eat_keyword(kw) {
            Some(span) => Ok(span),
            None => Err(self.error_expected(&[format!("`{kw}`").as_str()])),
        }
    }

    /// Consume a non-reserved identifier
    fn expect_ident(&mut self, what: &str) -> Result<Spanned<String>> {
        match self.current() {
            Some((Token::Ident(name), span)) if !lexer::is_keyword(&name) => {
                self.pos += 1;
                Ok(Spanned::new(name, span))
            }
            _ => Err(self.error_expected(&[what])),
        }
    }

    /// Identifier directly followed by `token`, e.g. a `label:` prefix
    fn at_ident_followed_by(&self, token: &Token) -> bool {
        self.peek().and_then(Token::as_ident).is_some() && self.peek_at(1) == Some(token)
    }

    /// Comma-separated list up to and including `close`. A trailing comma is
    /// allowed and the list may be empty. Returns the span of `close`.
    fn delimited_list<T>(
        &mut self,
        close: &Token,
        mut item: impl FnMut(&mut Self) -> Result<T>,
    ) -> Result<(Vec<T>, Span)> {
        let mut items = Vec::new();
        loop {
            if let Some(end) = self.eat(close) {
                return Ok((items, end));
            }
            items.push(item(self)?);
            if self.eat(&Token::Comma).is_some() {
                continue;
            }
            return match self.eat(close) {
                Some(end) => Ok((items, end)),
                None => Err(self.error_expected(&["`,`", format!("`{close}`").as_str()])),
            };
        }
    }

    // ---------------------------------------------------------------
    // Nesting
    // ---------------------------------------------------------------

    /// Run `f` one level deeper, growing the stack when it runs low
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let (depth, peak) = (self.depth, self.peak);
        self.descend()?;
        self.peak = self.depth;
        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || f(self));
        self.depth = depth;
        self.peak = self.peak.max(peak);
        result
    }

    /// Run an operator chain. Each [`fold`](Self::fold) inside it wraps the
    /// whole chain built so far, so the chain's depth is tracked separately
    /// from the depth of its siblings.
    fn chain<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let (depth, peak) = (self.depth, self.peak);
        self.peak = depth;
        let result = f(self);
        self.depth = depth;
        self.peak = self.peak.max(peak);
        result
    }

    /// One more node on top of the deepest point of the current chain
    fn fold(&mut self) -> Result<()> {
        self.depth = self.peak;
        self.descend()
    }

    fn descend(&mut self) -> Result<()> {
        if self.depth >= MAX_NESTING_DEPTH {
            let span = self.peek_span();
            return Err(CompileError::parser(
                format!("nesting deeper than {MAX_NESTING_DEPTH} levels"),
                self.found(),
                span,
                self.position(span.start),
            ));
        }
        self.depth += 1;
        self.peak = self.peak.max(self.depth);
        Ok(())
    }

    // ---------------------------------------------------------------
    // Diagnostics
    // ---------------------------------------------------------------

    fn position(&self, offset: usize) -> Position {
        self.index.position(offset)
    }

    /// What the cursor is on, for "found ..." in messages
    fn found(&self) -> String {
        match self.peek() {
            Some(token) => token.describe(),
            None => TokenKind::Eof.to_string(),
        }
    }

    /// Error at the current token
    fn error_expected(&self, expected: &[&str]) -> CompileError {
        let span = self.peek_span();
        CompileError::unexpected(
            expected.iter().map(|s| s.to_string()).collect(),
            self.found(),
            span,
            self.position(span.start),
        )
    }

    /// Error for a token that is in the right place but malformed
    fn error_malformed(
        &self,
        message: impl Into<String>,
        token: &Token,
        span: Span,
    ) -> CompileError {
        CompileError::parser(message, token.describe(), span, self.position(span.start))
    }

    fn int_literal(&self, text: &str, token: &Token, span: Span) -> Result<i64> {
        text.parse::<i64>().map_err(|_| {
            let message = format!("malformed literal: integer `{text}` out of range");
            self.error_malformed(message, token, span)
        })
    }

    fn float_literal(&self, text: &str, token: &Token, span: Span) -> Result<f64> {
        match text.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => {
                let message = format!("malformed literal: float `{text}` out of range");
                Err(self.error_malformed(message, token, span))
            }
        }
    }
}

/// Parse tokens into AST, stopping at the first syntax error
pub fn parse(filename: &str, source: &str, tokens: Vec<(Token, Span)>) -> Result<Program> {
    log::debug!("parsing {filename} ({} tokens)", tokens.len());
    let mut parser = Parser::new(source, tokens);
    let program = parser.parse_program()?;
    log::debug!("parsed {filename}: {} items", program.items.len());
    Ok(program)
}

/// Parse tokens into AST under `options`; in collect mode every item-level
/// error up to the limit is reported together.
pub fn parse_with_options(
    filename: &str,
    source: &str,
    tokens: Vec<(Token, Span)>,
    options: &ParseOptions,
) -> std::result::Result<Program, Diagnostics> {
    log::debug!("parsing {filename} ({} tokens, {:?})", tokens.len(), options.error_mode);
    let mut parser = Parser::new(source, tokens);
    parser.parse_program_with(options)
}

/// Parse one standalone expression; the whole input must be consumed
pub fn parse_expression(source: &str) -> Result<Spanned<Expr>> {
    let mut parser = Parser::new(source, lexer::tokenize(source)?);
    let expr = parser.parse_expr()?;
    parser.expect_eof()?;
    Ok(expr)
}

/// Parse one standalone type; the whole input must be consumed
pub fn parse_type_str(source: &str) -> Result<Spanned<Type>> {
    let mut parser = Parser::new(source, lexer::tokenize(source)?);
    let ty = parser.parse_type()?;
    parser.expect_eof()?;
    Ok(ty)
}

/// Parse one standalone match pattern; the whole input must be consumed
pub fn parse_pattern_str(source: &str) -> Result<Spanned<Pattern>> {
    let mut parser = Parser::new(source, lexer::tokenize(source)?);
    let pattern = parser.parse_pattern()?;
    parser.expect_eof()?;
    Ok(pattern)
}

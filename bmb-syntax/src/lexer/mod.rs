//! Lexer implementation using logos

mod token;

pub use token::{KEYWORDS, Token, TokenKind, is_keyword};

use crate::ast::{LineIndex, Span};
use crate::error::{CompileError, Result};
use logos::Logos;

/// Tokenize source code
pub fn tokenize(source: &str) -> Result<Vec<(Token, Span)>> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);

    while let Some(result) = lexer.next() {
        let span = Span::new(lexer.span().start, lexer.span().end);
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(()) => return Err(lex_error(source, lexer.slice(), span)),
        }
    }

    log::trace!("tokenized {} bytes into {} tokens", source.len(), tokens.len());
    Ok(tokens)
}

fn lex_error(source: &str, slice: &str, span: Span) -> CompileError {
    let position = LineIndex::new(source).position(span.start);
    if slice.starts_with('"') {
        // Only an opening quote with no closing one fails the string rule
        let span = Span::new(span.start, source.len());
        CompileError::lexer("unterminated string literal", span, position)
    } else {
        let ch = slice.chars().next().unwrap_or_default();
        let span = Span::new(span.start, span.start + ch.len_utf8());
        CompileError::lexer(format!("unexpected character: {ch:?}"), span, position)
    }
}

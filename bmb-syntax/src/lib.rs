//! BMB syntax front end
//!
//! Lexer and recursive-descent parser turning BMB source text into a spanned
//! syntax tree: items, refinement types, contracts and expressions.

pub mod ast;
pub mod config;
pub mod error;
pub mod lexer;
pub mod parser;

pub use ast::{Program, Span, Spanned};
pub use config::{ErrorMode, ParseOptions};
pub use error::{CompileError, Diagnostics, Result};

/// Tokenize and parse one source unit, stopping at the first error
pub fn parse_source(filename: &str, source: &str) -> Result<Program> {
    let tokens = lexer::tokenize(source)?;
    parser::parse(filename, source, tokens)
}

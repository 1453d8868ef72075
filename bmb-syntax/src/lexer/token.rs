//! Token definitions

use logos::Logos;
use serde::Serialize;

/// Reserved words. They are lexed as identifiers and only treated as
/// keywords by the parser, which keeps the lexer context-free.
pub const KEYWORDS: &[&str] = &[
    "fn", "let", "mut", "if", "then", "else", "match", "while", "for", "in", "pre", "post",
    "where", "ret", "it", "new", "true", "false", "and", "or", "not", "pub", "use", "struct",
    "enum", "_", "i32", "i64", "f64", "bool", "String",
];

pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

/// Token classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    Identifier,
    Keyword,
    IntLiteral,
    FloatLiteral,
    StringLiteral,
    Operator,
    Punctuation,
    Eof,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TokenKind::Identifier => "identifier",
            TokenKind::Keyword => "keyword",
            TokenKind::IntLiteral => "integer literal",
            TokenKind::FloatLiteral => "float literal",
            TokenKind::StringLiteral => "string literal",
            TokenKind::Operator => "operator",
            TokenKind::Punctuation => "punctuation",
            TokenKind::Eof => "end of input",
        };
        f.write_str(name)
    }
}

/// BMB Token
#[derive(Logos, Debug, Clone, PartialEq, Serialize)]
#[logos(skip r"[\s\u{FEFF}]+")] // Unicode whitespace and byte order marks
#[logos(skip r"//[^\n]*")]
pub enum Token {
    // Literals keep their source text; the parser converts numbers so that
    // overflow is reported as a malformed literal.
    #[regex(r"[0-9]+\.[0-9]+", |lex| lex.slice().to_string(), priority = 3)]
    FloatLit(String),

    #[regex(r"[0-9]+", |lex| lex.slice().to_string(), priority = 2)]
    IntLit(String),

    // No escape processing: the content is everything between the quotes.
    #[regex(r#""[^"]*""#, |lex| {
        let s = lex.slice();
        s[1..s.len() - 1].to_string()
    })]
    StringLit(String),

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string(), priority = 1)]
    Ident(String),

    // Symbols (longer first)
    #[token("::")]
    ColonColon,
    #[token(":")]
    Colon,
    #[token("->")]
    Arrow,
    #[token("=>")]
    FatArrow,
    #[token("..<")]
    DotDotLt,
    #[token("..=")]
    DotDotEq,
    #[token("..")]
    DotDot,
    #[token(".")]
    Dot,
    #[token(";")]
    Semi,
    #[token(",")]
    Comma,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("@")]
    At,

    // Operators
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("=")]
    Eq,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("&")]
    Ampersand,
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Ident(s) if is_keyword(s) => TokenKind::Keyword,
            Token::Ident(_) => TokenKind::Identifier,
            Token::IntLit(_) => TokenKind::IntLiteral,
            Token::FloatLit(_) => TokenKind::FloatLiteral,
            Token::StringLit(_) => TokenKind::StringLiteral,
            Token::EqEq
            | Token::NotEq
            | Token::LtEq
            | Token::GtEq
            | Token::Lt
            | Token::Gt
            | Token::Eq
            | Token::Plus
            | Token::Minus
            | Token::Star
            | Token::Slash
            | Token::Percent
            | Token::Ampersand
            | Token::DotDotLt
            | Token::DotDotEq
            | Token::DotDot
            | Token::Arrow
            | Token::FatArrow => TokenKind::Operator,
            Token::ColonColon
            | Token::Colon
            | Token::Dot
            | Token::Semi
            | Token::Comma
            | Token::LParen
            | Token::RParen
            | Token::LBrace
            | Token::RBrace
            | Token::LBracket
            | Token::RBracket
            | Token::At => TokenKind::Punctuation,
        }
    }

    /// True if this is the reserved word `kw`
    pub fn is_keyword(&self, kw: &str) -> bool {
        matches!(self, Token::Ident(s) if s == kw && is_keyword(kw))
    }

    /// A non-reserved identifier
    pub fn as_ident(&self) -> Option<&str> {
        match self {
            Token::Ident(s) if !is_keyword(s) => Some(s),
            _ => None,
        }
    }

    /// Human-readable description used in diagnostics
    pub fn describe(&self) -> String {
        match self.kind() {
            TokenKind::Identifier | TokenKind::Keyword => format!("{} `{self}`", self.kind()),
            TokenKind::IntLiteral | TokenKind::FloatLiteral | TokenKind::StringLiteral => {
                format!("{} {self}", self.kind())
            }
            _ => format!("`{self}`"),
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Ident(s) => write!(f, "{s}"),
            Token::IntLit(s) => write!(f, "{s}"),
            Token::FloatLit(s) => write!(f, "{s}"),
            Token::StringLit(s) => write!(f, "\"{s}\""),
            Token::ColonColon => write!(f, "::"),
            Token::Colon => write!(f, ":"),
            Token::Arrow => write!(f, "->"),
            Token::FatArrow => write!(f, "=>"),
            Token::DotDotLt => write!(f, "..<"),
            Token::DotDotEq => write!(f, "..="),
            Token::DotDot => write!(f, ".."),
            Token::Dot => write!(f, "."),
            Token::Semi => write!(f, ";"),
            Token::Comma => write!(f, ","),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::At => write!(f, "@"),
            Token::EqEq => write!(f, "=="),
            Token::NotEq => write!(f, "!="),
            Token::LtEq => write!(f, "<="),
            Token::GtEq => write!(f, ">="),
            Token::Lt => write!(f, "<"),
            Token::Gt => write!(f, ">"),
            Token::Eq => write!(f, "="),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Percent => write!(f, "%"),
            Token::Ampersand => write!(f, "&"),
        }
    }
}

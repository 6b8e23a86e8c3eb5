//! Token definitions for the contract expression grammar.
//!
//! Tokenization is handled by a `logos`-derived lexer. Whitespace is
//! insignificant everywhere. Numeric literals carry an optional sign;
//! the grammar has no arithmetic, so a bare `-` can only start a number.

use logos::Logos;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
pub enum Token {
    #[token(",")]
    Comma,
    #[token("|")]
    Pipe,
    #[token("!")]
    Bang,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(":")]
    Colon,
    #[token("*")]
    Star,

    #[token("<=")]
    Le,
    #[token(">=")]
    Ge,
    #[token("==")]
    EqEq,
    #[token("=")]
    Eq,
    #[token("!=")]
    Ne,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,

    #[regex(r"-?[0-9]+\.[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    Float(f64),
    #[regex(r"-?[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    Int(i64),
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),
}

impl Token {
    /// Short description for error messages.
    pub fn describe(&self) -> String {
        match self {
            Token::Comma => "','".into(),
            Token::Pipe => "'|'".into(),
            Token::Bang => "'!'".into(),
            Token::LParen => "'('".into(),
            Token::RParen => "')'".into(),
            Token::LBracket => "'['".into(),
            Token::RBracket => "']'".into(),
            Token::Colon => "':'".into(),
            Token::Star => "'*'".into(),
            Token::Le | Token::Ge | Token::EqEq | Token::Eq | Token::Ne | Token::Lt | Token::Gt => {
                "comparison operator".into()
            }
            Token::Float(_) | Token::Int(_) => "number".into(),
            Token::Ident(name) => format!("identifier '{}'", name),
        }
    }
}

//! Token kinds produced by the lexer.

use velac_util::{Span, Symbol};

/// A lexical unit together with the span it was read from.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    // Literals
    IntLit(i64),
    FloatLit(f64),
    StringLit(String),
    Ident(Symbol),

    // Type keywords
    KwInt,
    KwBool,
    KwFloat,
    KwString,
    KwVoid,

    // Control-flow keywords
    KwIf,
    KwElif,
    KwElse,
    KwWhile,
    KwFor,
    KwReturn,

    // Built-in operations spelled as keywords
    KwPrint,
    KwSize,
    KwToString,
    KwDiv,
    KwMod,
    KwNRoot,

    // Boolean literals
    KwTrue,
    KwFalse,

    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Semicolon,
    Colon,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    Eq,
    EqEq,
    BangEq,
    Bang,
    Lt,
    LtEq,
    Gt,
    GtEq,
    AmpAmp,
    PipePipe,

    Eof,
}

impl TokenKind {
    /// Human-readable name, used in parser diagnostics (`expected X, found Y`).
    pub fn describe(&self) -> String {
        use TokenKind::*;
        match self {
            IntLit(_) => "integer literal".into(),
            FloatLit(_) => "float literal".into(),
            StringLit(_) => "string literal".into(),
            Ident(sym) => format!("identifier `{sym}`"),
            KwInt => "`Int`".into(),
            KwBool => "`Bool`".into(),
            KwFloat => "`Float`".into(),
            KwString => "`String`".into(),
            KwVoid => "`Void`".into(),
            KwIf => "`if`".into(),
            KwElif => "`elif`".into(),
            KwElse => "`else`".into(),
            KwWhile => "`while`".into(),
            KwFor => "`for`".into(),
            KwReturn => "`return`".into(),
            KwPrint => "`print`".into(),
            KwSize => "`size`".into(),
            KwToString => "`toString`".into(),
            KwDiv => "`div`".into(),
            KwMod => "`mod`".into(),
            KwNRoot => "`nroot`".into(),
            KwTrue => "`True`".into(),
            KwFalse => "`False`".into(),
            LParen => "`(`".into(),
            RParen => "`)`".into(),
            LBrace => "`{`".into(),
            RBrace => "`}`".into(),
            LBracket => "`[`".into(),
            RBracket => "`]`".into(),
            Comma => "`,`".into(),
            Semicolon => "`;`".into(),
            Colon => "`:`".into(),
            Plus => "`+`".into(),
            Minus => "`-`".into(),
            Star => "`*`".into(),
            Slash => "`/`".into(),
            Caret => "`^`".into(),
            Eq => "`=`".into(),
            EqEq => "`==`".into(),
            BangEq => "`!=`".into(),
            Bang => "`!`".into(),
            Lt => "`<`".into(),
            LtEq => "`<=`".into(),
            Gt => "`>`".into(),
            GtEq => "`>=`".into(),
            AmpAmp => "`&&`".into(),
            PipePipe => "`||`".into(),
            Eof => "end of input".into(),
        }
    }
}

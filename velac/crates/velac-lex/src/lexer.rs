//! Lexer: turns source text into a stream of [`Token`]s.
//!
//! Dispatch is by current character, same shape as a hand-written recursive
//! descent scanner: whitespace and `//` comments are skipped before every
//! token, then one `match` on the current char picks the token-specific
//! sub-lexer.

use velac_util::{DiagnosticBuilder, Handler, Span, Symbol};

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};

pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    handler: &'a mut Handler,
    token_start: usize,
    token_start_line: u32,
    token_start_column: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, handler: &'a mut Handler) -> Self {
        Self {
            cursor: Cursor::new(source),
            handler,
            token_start: 0,
            token_start_line: 1,
            token_start_column: 1,
        }
    }

    /// Lexes the whole input into a flat token vector, ending with `Eof`.
    /// Used by the parser, which needs lookahead over an indexable buffer
    /// rather than a lazy iterator.
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token();
            let is_eof = tok.kind == TokenKind::Eof;
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        tokens
    }

    fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();

        self.token_start = self.cursor.position();
        self.token_start_line = self.cursor.line();
        self.token_start_column = self.cursor.column();

        if self.cursor.is_at_end() {
            return self.make(TokenKind::Eof);
        }

        let kind = match self.cursor.current_char() {
            '(' => self.advance_with(TokenKind::LParen),
            ')' => self.advance_with(TokenKind::RParen),
            '{' => self.advance_with(TokenKind::LBrace),
            '}' => self.advance_with(TokenKind::RBrace),
            '[' => self.advance_with(TokenKind::LBracket),
            ']' => self.advance_with(TokenKind::RBracket),
            ',' => self.advance_with(TokenKind::Comma),
            ';' => self.advance_with(TokenKind::Semicolon),
            ':' => self.advance_with(TokenKind::Colon),
            '+' => self.advance_with(TokenKind::Plus),
            '-' => self.advance_with(TokenKind::Minus),
            '*' => self.advance_with(TokenKind::Star),
            '/' => self.advance_with(TokenKind::Slash),
            '^' => self.advance_with(TokenKind::Caret),
            '=' => self.lex_one_or_two('=', TokenKind::Eq, TokenKind::EqEq),
            '!' => self.lex_one_or_two('=', TokenKind::Bang, TokenKind::BangEq),
            '<' => self.lex_one_or_two('=', TokenKind::Lt, TokenKind::LtEq),
            '>' => self.lex_one_or_two('=', TokenKind::Gt, TokenKind::GtEq),
            '&' => self.lex_doubled('&', TokenKind::AmpAmp, "expected `&&`, found a single `&`"),
            '|' => self.lex_doubled('|', TokenKind::PipePipe, "expected `||`, found a single `|`"),
            '"' => self.lex_string(),
            c if c.is_ascii_digit() => self.lex_number(),
            c if is_ident_start(c) => self.lex_ident_or_keyword(),
            c => {
                self.report_error(format!("unexpected character '{c}'"));
                self.cursor.advance();
                TokenKind::Eof
            }
        };
        self.make(kind)
    }

    fn make(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.current_span())
    }

    fn current_span(&self) -> Span {
        Span::new(
            self.token_start,
            self.cursor.position(),
            self.token_start_line,
            self.token_start_column,
        )
    }

    fn advance_with(&mut self, kind: TokenKind) -> TokenKind {
        self.cursor.advance();
        kind
    }

    fn lex_one_or_two(&mut self, follow: char, single: TokenKind, double: TokenKind) -> TokenKind {
        self.cursor.advance();
        if self.cursor.match_char(follow) {
            double
        } else {
            single
        }
    }

    fn lex_doubled(&mut self, c: char, double: TokenKind, err: &str) -> TokenKind {
        self.cursor.advance();
        if self.cursor.match_char(c) {
            double
        } else {
            self.report_error(err.to_string());
            double
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.cursor.current_char() {
                c if c.is_whitespace() => self.cursor.advance(),
                '/' if self.cursor.peek_char(1) == '/' => {
                    while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
                        self.cursor.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn lex_number(&mut self) -> TokenKind {
        let start = self.cursor.position();
        while self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }
        let mut is_float = false;
        if self.cursor.current_char() == '.' && self.cursor.peek_char(1).is_ascii_digit() {
            is_float = true;
            self.cursor.advance();
            while self.cursor.current_char().is_ascii_digit() {
                self.cursor.advance();
            }
        }
        let text = self.cursor.slice_from(start);
        if is_float {
            match text.parse::<f64>() {
                Ok(v) => TokenKind::FloatLit(v),
                Err(_) => {
                    self.report_error(format!("invalid float literal `{text}`"));
                    TokenKind::FloatLit(0.0)
                }
            }
        } else {
            match text.parse::<i64>() {
                Ok(v) => TokenKind::IntLit(v),
                Err(_) => {
                    self.report_error(format!("invalid integer literal `{text}`"));
                    TokenKind::IntLit(0)
                }
            }
        }
    }

    fn lex_string(&mut self) -> TokenKind {
        self.cursor.advance(); // opening quote
        let mut value = String::new();
        loop {
            if self.cursor.is_at_end() {
                self.report_error("unterminated string literal".to_string());
                break;
            }
            match self.cursor.current_char() {
                '"' => {
                    self.cursor.advance();
                    break;
                }
                '\\' => {
                    self.cursor.advance();
                    let escaped = match self.cursor.current_char() {
                        'n' => '\n',
                        't' => '\t',
                        '"' => '"',
                        '\\' => '\\',
                        other => {
                            self.report_error(format!("unknown escape sequence '\\{other}'"));
                            other
                        }
                    };
                    value.push(escaped);
                    self.cursor.advance();
                }
                c => {
                    value.push(c);
                    self.cursor.advance();
                }
            }
        }
        TokenKind::StringLit(value)
    }

    fn lex_ident_or_keyword(&mut self) -> TokenKind {
        let start = self.cursor.position();
        while is_ident_continue(self.cursor.current_char()) {
            self.cursor.advance();
        }
        let text = self.cursor.slice_from(start);
        keyword_kind(text).unwrap_or_else(|| TokenKind::Ident(Symbol::intern(text)))
    }

    fn report_error(&mut self, message: String) {
        let span = self.current_span();
        DiagnosticBuilder::error(message).span(span).emit(self.handler);
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn keyword_kind(text: &str) -> Option<TokenKind> {
    Some(match text {
        "Int" => TokenKind::KwInt,
        "Bool" => TokenKind::KwBool,
        "Float" => TokenKind::KwFloat,
        "String" => TokenKind::KwString,
        "Void" => TokenKind::KwVoid,
        "if" => TokenKind::KwIf,
        "elif" => TokenKind::KwElif,
        "else" => TokenKind::KwElse,
        "while" => TokenKind::KwWhile,
        "for" => TokenKind::KwFor,
        "return" => TokenKind::KwReturn,
        "print" => TokenKind::KwPrint,
        "size" => TokenKind::KwSize,
        "toString" => TokenKind::KwToString,
        "div" => TokenKind::KwDiv,
        "mod" => TokenKind::KwMod,
        "nroot" => TokenKind::KwNRoot,
        "True" => TokenKind::KwTrue,
        "False" => TokenKind::KwFalse,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let mut handler = Handler::new();
        let tokens = Lexer::new(src, &mut handler).tokenize();
        tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lexes_a_simple_assignment() {
        let got = kinds("Int: x = 1 + 2 * 3;");
        assert_eq!(
            got,
            vec![
                TokenKind::KwInt,
                TokenKind::Colon,
                TokenKind::Ident(Symbol::intern("x")),
                TokenKind::Eq,
                TokenKind::IntLit(1),
                TokenKind::Plus,
                TokenKind::IntLit(2),
                TokenKind::Star,
                TokenKind::IntLit(3),
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn distinguishes_eq_and_eqeq() {
        assert_eq!(kinds("="), vec![TokenKind::Eq, TokenKind::Eof]);
        assert_eq!(kinds("=="), vec![TokenKind::EqEq, TokenKind::Eof]);
    }

    #[test]
    fn lexes_float_literal() {
        assert_eq!(kinds("3.0"), vec![TokenKind::FloatLit(3.0), TokenKind::Eof]);
    }

    #[test]
    fn lexes_string_with_escapes() {
        assert_eq!(
            kinds(r#""ab\ncd""#),
            vec![TokenKind::StringLit("ab\ncd".to_string()), TokenKind::Eof]
        );
    }

    #[test]
    fn skips_line_comments() {
        assert_eq!(kinds("1 // comment\n;"), vec![TokenKind::IntLit(1), TokenKind::Semicolon, TokenKind::Eof]);
    }

    #[test]
    fn negative_numbers_lex_as_minus_then_literal() {
        // Unary minus is a parser concern, not a lexer one.
        assert_eq!(kinds("-7"), vec![TokenKind::Minus, TokenKind::IntLit(7), TokenKind::Eof]);
    }

    #[test]
    fn recognizes_all_keywords() {
        for (text, _) in velac_util::symbol::KEYWORDS {
            let got = kinds(text);
            assert_ne!(got[0], TokenKind::Ident(Symbol::intern(text)), "`{text}` should lex as a keyword");
        }
    }
}

//! Recursive-descent statement/declaration parsing plus a Pratt expression
//! parser, producing the AST in [`ast`] from the token stream lexed by
//! `velac-lex`.
//!
//! A parse failure emits a `ParseError` diagnostic through the shared
//! [`Handler`] and the parser recovers at statement boundaries (skipping to
//! the next `;`), matching how the driver treats a bad top-level unit: abort
//! it, keep persistent REPL state intact.

pub mod ast;
mod expr;
mod stmt;
mod types;

use velac_lex::{Lexer, Token, TokenKind};
use velac_util::{DiagnosticBuilder, Handler, Span};

pub use ast::{BinOp, Expr, FunDecl, Param, Program, Stmt, Type, UnOp};

pub struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    handler: &'a mut Handler,
}

/// Parses `source` into a [`Program`]. Returns `None` if any parse error was
/// emitted to `handler`; the caller inspects `handler` for the diagnostics.
pub fn parse(source: &str, handler: &mut Handler) -> Option<Program> {
    let tokens = Lexer::new(source, handler).tokenize();
    let mut parser = Parser::new(tokens, handler);
    parser.parse_program()
}

impl<'a> Parser<'a> {
    pub fn new(tokens: Vec<Token>, handler: &'a mut Handler) -> Self {
        Self { tokens, pos: 0, handler }
    }

    pub fn parse_program(&mut self) -> Option<Program> {
        let mut stmts = Vec::new();
        while !self.is_at_end() {
            match self.parse_stmt() {
                Some(stmt) => stmts.push(stmt),
                None => self.recover_to_next_stmt(),
            }
        }
        if self.handler.has_errors() {
            None
        } else {
            Some(stmts)
        }
    }

    fn recover_to_next_stmt(&mut self) {
        while !self.is_at_end() && self.current_kind() != &TokenKind::Semicolon {
            self.advance();
        }
        if !self.is_at_end() {
            self.advance(); // consume the `;`
        }
    }

    fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn current_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    fn current_span(&self) -> Span {
        self.current().span
    }

    fn peek_kind(&self, offset: usize) -> &TokenKind {
        let idx = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[idx].kind
    }

    fn is_at_end(&self) -> bool {
        self.current_kind() == &TokenKind::Eof
    }

    fn advance(&mut self) {
        if !self.is_at_end() {
            self.pos += 1;
        }
    }

    /// Consumes the current token if it matches `kind`, returning whether it did.
    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.current_kind() == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes the current token if it matches `kind`, else emits a
    /// `ParseError` diagnostic naming what was expected.
    fn expect(&mut self, kind: &TokenKind, what: &str) -> Option<()> {
        if self.eat(kind) {
            Some(())
        } else {
            self.error_at_current(format!("expected {what}, found {}", self.current_kind().describe()));
            None
        }
    }

    fn error_at_current(&mut self, message: String) {
        let span = self.current_span();
        DiagnosticBuilder::error(message).span(span).emit(self.handler);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(src: &str) -> Program {
        let mut handler = Handler::new();
        let result = parse(src, &mut handler);
        assert!(result.is_some(), "expected a clean parse of {src:?}, got {:?}", handler.diagnostics());
        result.unwrap()
    }

    fn parse_err(src: &str) {
        let mut handler = Handler::new();
        assert!(parse(src, &mut handler).is_none(), "expected a parse error for {src:?}");
    }

    #[test]
    fn parses_int_var_decl() {
        let program = parse_ok("Int: x = 1 + 2 * 3;");
        assert_eq!(program.len(), 1);
    }

    #[test]
    fn parses_factorial_function() {
        let program = parse_ok(
            "Int: fact(Int: n) { if (n <= 1) { Int: r = 1; } else { Int: r = n * fact(n - 1); } return r; } print(fact(5));",
        );
        assert_eq!(program.len(), 2);
    }

    #[test]
    fn rejects_missing_semicolon() {
        parse_err("Int: x = 1");
    }

    #[test]
    fn rejects_unmatched_brace() {
        parse_err("while (True) { print(1);");
    }
}

//! Statement and declaration parsing: var decls, function decls, assignment,
//! and bare expression statements.

use velac_lex::TokenKind;
use velac_util::Symbol;

use crate::ast::{FunDecl, Param, Stmt};
use crate::Parser;

impl<'a> Parser<'a> {
    /// A statement ending in a `{ ... }` block doesn't need a trailing `;`
    /// in this grammar (see the end-to-end scenarios); everything else does.
    pub fn parse_stmt(&mut self) -> Option<Stmt> {
        let stmt = self.parse_stmt_inner()?;
        let needs_semi = !matches!(
            stmt,
            Stmt::FunDecl(_) | Stmt::Expr(crate::ast::Expr::If { .. } | crate::ast::Expr::While { .. } | crate::ast::Expr::For { .. })
        );
        if needs_semi {
            self.expect(&TokenKind::Semicolon, "`;` terminating a statement")?;
        } else {
            self.eat(&TokenKind::Semicolon);
        }
        Some(stmt)
    }

    fn parse_stmt_inner(&mut self) -> Option<Stmt> {
        match self.current_kind() {
            TokenKind::KwInt | TokenKind::KwBool | TokenKind::KwFloat | TokenKind::KwString => {
                self.parse_typed_decl()
            }
            TokenKind::KwVoid => self.parse_void_fun_decl(),
            TokenKind::Ident(_) if self.peek_kind(1) == &TokenKind::Eq => self.parse_assign(),
            _ => self.parse_expr().map(Stmt::Expr),
        }
    }

    /// `type ":" ID "=" expr` (variable) or `type ":" ID "(" params ")" ...` (function).
    fn parse_typed_decl(&mut self) -> Option<Stmt> {
        let ty = self.parse_type()?;
        self.expect(&TokenKind::Colon, "`:` after a type in a declaration")?;
        let span_start = self.current_span();
        let name = self.parse_ident()?;

        if self.eat(&TokenKind::Eq) {
            let value = self.parse_expr()?;
            return Some(Stmt::VarDecl {
                ty,
                name,
                value,
                span: span_start,
            });
        }

        self.parse_fun_decl_tail(name, Some(ty), span_start)
    }

    /// `"Void" ":" ID "(" params ")" "{" program "}"`.
    fn parse_void_fun_decl(&mut self) -> Option<Stmt> {
        let span_start = self.current_span();
        self.advance(); // Void
        self.expect(&TokenKind::Colon, "`:` after `Void` in a function declaration")?;
        let name = self.parse_ident()?;
        self.parse_fun_decl_tail(name, None, span_start)
    }

    fn parse_fun_decl_tail(&mut self, name: Symbol, ret: Option<crate::ast::Type>, span_start: velac_util::Span) -> Option<Stmt> {
        self.expect(&TokenKind::LParen, "`(` opening a parameter list")?;
        let params = self.parse_params()?;
        self.expect(&TokenKind::RParen, "`)` closing a parameter list")?;
        self.expect(&TokenKind::LBrace, "`{` opening a function body")?;

        let mut body = Vec::new();
        while !self.at_return_or_close() {
            body.push(self.parse_stmt()?);
        }

        let ret_expr = if ret.is_some() {
            self.expect(&TokenKind::KwReturn, "`return` in a non-Void function body")?;
            let e = self.parse_expr()?;
            self.expect(&TokenKind::Semicolon, "`;` after a `return` expression")?;
            Some(e)
        } else {
            None
        };

        self.expect(&TokenKind::RBrace, "`}` closing a function body")?;

        Some(Stmt::FunDecl(FunDecl {
            name,
            ret,
            params,
            body,
            ret_expr,
            span: span_start,
        }))
    }

    fn at_return_or_close(&self) -> bool {
        matches!(self.current_kind(), TokenKind::KwReturn | TokenKind::RBrace)
    }

    fn parse_params(&mut self) -> Option<Vec<Param>> {
        let mut params = Vec::new();
        if self.current_kind() == &TokenKind::RParen {
            return Some(params);
        }
        loop {
            let ty = self.parse_type()?;
            self.expect(&TokenKind::Colon, "`:` after a parameter's type")?;
            let name = self.parse_ident()?;
            params.push(Param { ty, name });
            if !self.eat(&TokenKind::Semicolon) {
                break;
            }
        }
        Some(params)
    }

    /// `ID "=" expr`, used both as a top-level statement and as the `for`
    /// loop's step clause (where the caller consumes the closing `)` itself).
    pub(crate) fn parse_assign(&mut self) -> Option<Stmt> {
        let span = self.current_span();
        let name = self.parse_ident()?;
        self.expect(&TokenKind::Eq, "`=` in an assignment")?;
        let value = self.parse_expr()?;
        Some(Stmt::Assign { name, value, span })
    }

    /// `type ":" ID "=" expr`, used by the `for` loop's init clause.
    pub(crate) fn parse_var_decl(&mut self) -> Option<Stmt> {
        let span = self.current_span();
        let ty = self.parse_type()?;
        self.expect(&TokenKind::Colon, "`:` after a type in a declaration")?;
        let name = self.parse_ident()?;
        self.expect(&TokenKind::Eq, "`=` in a variable declaration")?;
        let value = self.parse_expr()?;
        Some(Stmt::VarDecl { ty, name, value, span })
    }

    pub(crate) fn parse_ident(&mut self) -> Option<Symbol> {
        match self.current_kind().clone() {
            TokenKind::Ident(sym) => {
                self.advance();
                Some(sym)
            }
            other => {
                self.error_at_current(format!("expected an identifier, found {}", other.describe()));
                None
            }
        }
    }

    pub(crate) fn parse_block(&mut self) -> Option<Vec<Stmt>> {
        self.expect(&TokenKind::LBrace, "`{` opening a block")?;
        let mut stmts = Vec::new();
        while self.current_kind() != &TokenKind::RBrace && self.current_kind() != &TokenKind::Eof {
            stmts.push(self.parse_stmt()?);
        }
        self.expect(&TokenKind::RBrace, "`}` closing a block")?;
        Some(stmts)
    }
}

//! Pratt (operator-precedence) expression parsing.
//!
//! Binding powers, loosest to tightest: `||`, `&&`, `==`/`!=`, comparisons,
//! `+`/`-`, `*`/`/`/`div`/`mod`, `^` (right-associative). Postfix `[..]`
//! indexing binds tighter than everything and is handled directly after
//! parsing a primary expression rather than through the infix loop.

use velac_lex::TokenKind;

use crate::ast::{BinOp, Expr, UnOp};
use crate::Parser;

#[doc(hidden)]
mod bp {
    pub const OR: u8 = 2;
    pub const AND: u8 = 4;
    pub const EQUALITY: u8 = 6;
    pub const COMPARISON: u8 = 8;
    pub const ADDITIVE: u8 = 10;
    pub const MULTIPLICATIVE: u8 = 12;
    pub const POWER: u8 = 14;
}

impl<'a> Parser<'a> {
    pub fn parse_expr(&mut self) -> Option<Expr> {
        self.parse_expr_bp(0)
    }

    fn parse_expr_bp(&mut self, min_bp: u8) -> Option<Expr> {
        let mut lhs = self.parse_prefix()?;

        loop {
            let Some((op, left_bp, right_bp)) = self.peek_binop() else { break };
            if left_bp < min_bp {
                break;
            }
            self.advance();
            let rhs = self.parse_expr_bp(right_bp)?;
            let span = lhs.span().merge(rhs.span());
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs), span);
        }

        Some(lhs)
    }

    /// Returns `(op, left_bp, right_bp)` for the current token if it is a
    /// binary operator. Right-associative `^` uses `right_bp == left_bp`.
    fn peek_binop(&self) -> Option<(BinOp, u8, u8)> {
        Some(match self.current_kind() {
            TokenKind::PipePipe => (BinOp::Or, bp::OR, bp::OR + 1),
            TokenKind::AmpAmp => (BinOp::And, bp::AND, bp::AND + 1),
            TokenKind::EqEq => (BinOp::Eq, bp::EQUALITY, bp::EQUALITY + 1),
            TokenKind::BangEq => (BinOp::Ne, bp::EQUALITY, bp::EQUALITY + 1),
            TokenKind::Lt => (BinOp::Lt, bp::COMPARISON, bp::COMPARISON + 1),
            TokenKind::LtEq => (BinOp::Le, bp::COMPARISON, bp::COMPARISON + 1),
            TokenKind::Gt => (BinOp::Gt, bp::COMPARISON, bp::COMPARISON + 1),
            TokenKind::GtEq => (BinOp::Ge, bp::COMPARISON, bp::COMPARISON + 1),
            TokenKind::Plus => (BinOp::Add, bp::ADDITIVE, bp::ADDITIVE + 1),
            TokenKind::Minus => (BinOp::Sub, bp::ADDITIVE, bp::ADDITIVE + 1),
            TokenKind::Star => (BinOp::Mul, bp::MULTIPLICATIVE, bp::MULTIPLICATIVE + 1),
            TokenKind::Slash => (BinOp::Div, bp::MULTIPLICATIVE, bp::MULTIPLICATIVE + 1),
            TokenKind::KwDiv => (BinOp::IDiv, bp::MULTIPLICATIVE, bp::MULTIPLICATIVE + 1),
            TokenKind::KwMod => (BinOp::Mod, bp::MULTIPLICATIVE, bp::MULTIPLICATIVE + 1),
            TokenKind::Caret => (BinOp::Pow, bp::POWER, bp::POWER),
            _ => return None,
        })
    }

    fn parse_prefix(&mut self) -> Option<Expr> {
        match self.current_kind().clone() {
            TokenKind::Minus => {
                let span = self.current_span();
                self.advance();
                let operand = self.parse_expr_bp(bp::POWER + 1)?;
                let span = span.merge(operand.span());
                Some(Expr::Unary(UnOp::Neg, Box::new(operand), span))
            }
            TokenKind::Bang => {
                let span = self.current_span();
                self.advance();
                let operand = self.parse_expr_bp(bp::POWER + 1)?;
                let span = span.merge(operand.span());
                Some(Expr::Unary(UnOp::Not, Box::new(operand), span))
            }
            _ => self.parse_postfix(),
        }
    }

    fn parse_postfix(&mut self) -> Option<Expr> {
        let mut expr = self.parse_atom()?;
        while self.current_kind() == &TokenKind::LBracket {
            let start = expr.span();
            self.advance();
            let index = self.parse_expr()?;
            self.expect(&TokenKind::RBracket, "`]` closing an index expression")?;
            let span = start.merge(index.span());
            expr = Expr::Index(Box::new(expr), Box::new(index), span);
        }
        Some(expr)
    }

    fn parse_atom(&mut self) -> Option<Expr> {
        let span = self.current_span();
        match self.current_kind().clone() {
            TokenKind::IntLit(v) => {
                self.advance();
                Some(Expr::IntLit(v, span))
            }
            TokenKind::FloatLit(v) => {
                self.advance();
                Some(Expr::FloatLit(v, span))
            }
            TokenKind::StringLit(s) => {
                self.advance();
                Some(Expr::StringLit(s, span))
            }
            TokenKind::KwTrue => {
                self.advance();
                Some(Expr::BoolLit(true, span))
            }
            TokenKind::KwFalse => {
                self.advance();
                Some(Expr::BoolLit(false, span))
            }
            TokenKind::Ident(name) => {
                self.advance();
                if self.current_kind() == &TokenKind::LParen {
                    self.advance();
                    let args = self.parse_semi_separated(&TokenKind::RParen)?;
                    let end = self.current_span();
                    self.expect(&TokenKind::RParen, "`)` closing a call's argument list")?;
                    Some(Expr::Call(name, args, span.merge(end)))
                } else {
                    Some(Expr::Var(name, span))
                }
            }
            TokenKind::LBracket => {
                self.advance();
                let elems = self.parse_semi_separated(&TokenKind::RBracket)?;
                let end = self.current_span();
                self.expect(&TokenKind::RBracket, "`]` closing a list literal")?;
                Some(Expr::ListLit(elems, span.merge(end)))
            }
            TokenKind::LParen => {
                self.advance();
                let first = self.parse_expr()?;
                if self.eat(&TokenKind::Semicolon) {
                    let mut elems = vec![first];
                    elems.extend(self.parse_semi_separated(&TokenKind::RParen)?);
                    let end = self.current_span();
                    self.expect(&TokenKind::RParen, "`)` closing a tuple literal")?;
                    Some(Expr::TupleLit(elems, span.merge(end)))
                } else {
                    self.expect(&TokenKind::RParen, "`)` closing a parenthesized expression")?;
                    Some(first)
                }
            }
            TokenKind::KwPrint => self.parse_builtin_unary_call(Expr::Print as fn(_, _) -> _),
            TokenKind::KwSize => self.parse_builtin_unary_call(Expr::Size as fn(_, _) -> _),
            TokenKind::KwToString => self.parse_builtin_unary_call(Expr::ToString as fn(_, _) -> _),
            TokenKind::KwNRoot => self.parse_nroot(),
            TokenKind::KwIf => self.parse_if_expr(),
            TokenKind::KwWhile => self.parse_while_expr(),
            TokenKind::KwFor => self.parse_for_expr(),
            other => {
                self.error_at_current(format!("expected an expression, found {}", other.describe()));
                None
            }
        }
    }

    /// Parses `keyword "(" expr ")"` for `print`, `size`, `toString`.
    fn parse_builtin_unary_call(&mut self, make: fn(Box<Expr>, velac_util::Span) -> Expr) -> Option<Expr> {
        let span = self.current_span();
        self.advance();
        self.expect(&TokenKind::LParen, "`(` after a built-in call")?;
        let inner = self.parse_expr()?;
        let end = self.current_span();
        self.expect(&TokenKind::RParen, "`)` closing a built-in call")?;
        Some(make(Box::new(inner), span.merge(end)))
    }

    /// `"nroot" "(" expr ";" expr ")"`.
    fn parse_nroot(&mut self) -> Option<Expr> {
        let span = self.current_span();
        self.advance();
        self.expect(&TokenKind::LParen, "`(` after `nroot`")?;
        let x = self.parse_expr()?;
        self.expect(&TokenKind::Semicolon, "`;` separating `nroot`'s arguments")?;
        let n = self.parse_expr()?;
        let end = self.current_span();
        self.expect(&TokenKind::RParen, "`)` closing `nroot`")?;
        Some(Expr::NRoot(Box::new(x), Box::new(n), span.merge(end)))
    }

    /// `"if" "(" expr ")" "{" program "}" ("elif" ...)* ("else" ...)?`.
    fn parse_if_expr(&mut self) -> Option<Expr> {
        let span = self.current_span();
        self.advance();
        let mut arms = Vec::new();
        arms.push(self.parse_if_arm()?);

        while self.current_kind() == &TokenKind::KwElif {
            self.advance();
            arms.push(self.parse_if_arm()?);
        }

        let else_branch = if self.eat(&TokenKind::KwElse) {
            Some(self.parse_block()?)
        } else {
            None
        };

        Some(Expr::If { arms, else_branch, span })
    }

    fn parse_if_arm(&mut self) -> Option<(Expr, Vec<crate::ast::Stmt>)> {
        self.expect(&TokenKind::LParen, "`(` after `if`/`elif`")?;
        let cond = self.parse_expr()?;
        self.expect(&TokenKind::RParen, "`)` closing an `if`/`elif` condition")?;
        let body = self.parse_block()?;
        Some((cond, body))
    }

    /// `"while" "(" expr ")" "{" program "}"`.
    fn parse_while_expr(&mut self) -> Option<Expr> {
        let span = self.current_span();
        self.advance();
        self.expect(&TokenKind::LParen, "`(` after `while`")?;
        let cond = self.parse_expr()?;
        self.expect(&TokenKind::RParen, "`)` closing a `while` condition")?;
        let body = self.parse_block()?;
        Some(Expr::While { cond: Box::new(cond), body, span })
    }

    /// `"for" "(" decl ";" expr ";" assign ")" "{" program "}"`.
    fn parse_for_expr(&mut self) -> Option<Expr> {
        let span = self.current_span();
        self.advance();
        self.expect(&TokenKind::LParen, "`(` after `for`")?;
        let init = self.parse_var_decl()?;
        self.expect(&TokenKind::Semicolon, "`;` after a `for` loop's initializer")?;
        let cond = self.parse_expr()?;
        self.expect(&TokenKind::Semicolon, "`;` after a `for` loop's condition")?;
        let step = self.parse_assign()?;
        self.expect(&TokenKind::RParen, "`)` closing a `for` loop header")?;
        let body = self.parse_block()?;
        Some(Expr::For {
            init: Box::new(init),
            cond: Box::new(cond),
            step: Box::new(step),
            body,
            span,
        })
    }

    /// Parses zero or more `;`-separated expressions up to (but not
    /// consuming) `terminator`.
    fn parse_semi_separated(&mut self, terminator: &TokenKind) -> Option<Vec<Expr>> {
        let mut elems = Vec::new();
        if self.current_kind() == terminator {
            return Some(elems);
        }
        loop {
            elems.push(self.parse_expr()?);
            if !self.eat(&TokenKind::Semicolon) {
                break;
            }
        }
        Some(elems)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use velac_util::Handler;

    fn parse_expr_str(src: &str) -> Expr {
        let mut handler = Handler::new();
        let tokens = velac_lex::Lexer::new(src, &mut handler).tokenize();
        let mut parser = Parser::new(tokens, &mut handler);
        let expr = parser.parse_expr().expect("parse failed");
        assert!(!handler.has_errors(), "{:?}", handler.diagnostics());
        expr
    }

    #[test]
    fn mul_binds_tighter_than_add() {
        let expr = parse_expr_str("1 + 2 * 3");
        match expr {
            Expr::Binary(BinOp::Add, lhs, rhs, _) => {
                assert!(matches!(*lhs, Expr::IntLit(1, _)));
                assert!(matches!(*rhs, Expr::Binary(BinOp::Mul, ..)));
            }
            other => panic!("expected Add at the top, got {other:?}"),
        }
    }

    #[test]
    fn power_is_right_associative() {
        // 2 ^ 3 ^ 2 == 2 ^ (3 ^ 2)
        let expr = parse_expr_str("2 ^ 3 ^ 2");
        match expr {
            Expr::Binary(BinOp::Pow, lhs, rhs, _) => {
                assert!(matches!(*lhs, Expr::IntLit(2, _)));
                assert!(matches!(*rhs, Expr::Binary(BinOp::Pow, ..)));
            }
            other => panic!("expected Pow at the top, got {other:?}"),
        }
    }

    #[test]
    fn negative_index_parses() {
        let expr = parse_expr_str("xs[-1]");
        assert!(matches!(expr, Expr::Index(..)));
    }

    #[test]
    fn tuple_vs_parenthesized_expr() {
        assert!(matches!(parse_expr_str("(1 + 2)"), Expr::Binary(BinOp::Add, ..)));
        assert!(matches!(parse_expr_str("(1;2;3)"), Expr::TupleLit(..)));
    }
}

//! Type annotation parsing: `Int`, `Bool`, `Float`, `String`, `T[]`, `(T; T; ...)`.

use velac_lex::TokenKind;

use crate::ast::Type;
use crate::Parser;

impl<'a> Parser<'a> {
    pub fn parse_type(&mut self) -> Option<Type> {
        let mut ty = match self.current_kind().clone() {
            TokenKind::KwInt => {
                self.advance();
                Type::Int
            }
            TokenKind::KwBool => {
                self.advance();
                Type::Bool
            }
            TokenKind::KwFloat => {
                self.advance();
                Type::Float
            }
            TokenKind::KwString => {
                self.advance();
                Type::String
            }
            TokenKind::LParen => {
                self.advance();
                let mut elems = Vec::new();
                if self.current_kind() != &TokenKind::RParen {
                    loop {
                        elems.push(self.parse_type()?);
                        if !self.eat(&TokenKind::Semicolon) {
                            break;
                        }
                    }
                }
                self.expect(&TokenKind::RParen, "`)` closing a tuple type")?;
                Type::Tuple(elems)
            }
            other => {
                self.error_at_current(format!("expected a type, found {}", other.describe()));
                return None;
            }
        };

        while self.current_kind() == &TokenKind::LBracket {
            self.advance();
            self.expect(&TokenKind::RBracket, "`]` completing a list type suffix (`T[]`)")?;
            ty = Type::List(Box::new(ty));
        }

        Some(ty)
    }
}

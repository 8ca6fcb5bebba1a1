//! Abstract syntax tree produced by the parser and consumed by both the
//! type checker (`velac-sem`) and the evaluator (`velac-eval`).
//!
//! `if`/`while`/`for`/`print`/`size`/`toString`/`nroot` sit in expression
//! position in the grammar, so they are `Expr` variants rather than a
//! separate statement kind — the checker and evaluator each get a single
//! tree-walk over one enum family instead of two parallel ones.

use velac_util::{Span, Symbol};

#[derive(Clone, Debug, PartialEq)]
pub enum Type {
    Int,
    Bool,
    Float,
    String,
    List(Box<Type>),
    Tuple(Vec<Type>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnOp {
    Neg,
    Not,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Mod,
    IDiv,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub ty: Type,
    pub name: Symbol,
}

/// A user-defined function. `ret` is `None` for a `Void` function, in which
/// case `ret_expr` is always `None` too. `body` is the statement list
/// inside the braces, not including the trailing `return`.
#[derive(Clone, Debug, PartialEq)]
pub struct FunDecl {
    pub name: Symbol,
    pub ret: Option<Type>,
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
    pub ret_expr: Option<Expr>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    VarDecl {
        ty: Type,
        name: Symbol,
        value: Expr,
        span: Span,
    },
    Assign {
        name: Symbol,
        value: Expr,
        span: Span,
    },
    FunDecl(FunDecl),
    Expr(Expr),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::VarDecl { span, .. } | Stmt::Assign { span, .. } => *span,
            Stmt::FunDecl(f) => f.span,
            Stmt::Expr(e) => e.span(),
        }
    }
}

pub type Program = Vec<Stmt>;

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    IntLit(i64, Span),
    FloatLit(f64, Span),
    BoolLit(bool, Span),
    StringLit(String, Span),
    ListLit(Vec<Expr>, Span),
    TupleLit(Vec<Expr>, Span),
    Var(Symbol, Span),
    Unary(UnOp, Box<Expr>, Span),
    Binary(BinOp, Box<Expr>, Box<Expr>, Span),
    Index(Box<Expr>, Box<Expr>, Span),
    Call(Symbol, Vec<Expr>, Span),
    Size(Box<Expr>, Span),
    ToString(Box<Expr>, Span),
    Print(Box<Expr>, Span),
    NRoot(Box<Expr>, Box<Expr>, Span),
    If {
        arms: Vec<(Expr, Vec<Stmt>)>,
        else_branch: Option<Vec<Stmt>>,
        span: Span,
    },
    While {
        cond: Box<Expr>,
        body: Vec<Stmt>,
        span: Span,
    },
    For {
        init: Box<Stmt>,
        cond: Box<Expr>,
        step: Box<Stmt>,
        body: Vec<Stmt>,
        span: Span,
    },
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::IntLit(_, s)
            | Expr::FloatLit(_, s)
            | Expr::BoolLit(_, s)
            | Expr::StringLit(_, s)
            | Expr::ListLit(_, s)
            | Expr::TupleLit(_, s)
            | Expr::Var(_, s)
            | Expr::Unary(_, _, s)
            | Expr::Binary(_, _, _, s)
            | Expr::Index(_, _, s)
            | Expr::Call(_, _, s)
            | Expr::Size(_, s)
            | Expr::ToString(_, s)
            | Expr::Print(_, s)
            | Expr::NRoot(_, _, s)
            | Expr::If { span: s, .. }
            | Expr::While { span: s, .. }
            | Expr::For { span: s, .. } => *s,
        }
    }
}

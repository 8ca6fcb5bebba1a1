//! The type checker: walks the AST produced by `velac-par`, assigns a
//! [`TypeDescriptor`] to every expression, and fails fast with an
//! `InterpretError` at the first violation (unlike the lexer/parser, which
//! accumulate diagnostics through a `Handler` — a single ill-typed program
//! has nothing useful left to check once the first node fails).

use velac_par::{BinOp, Expr, FunDecl, Program, Stmt, UnOp};
use velac_util::{Environment, InterpretError, InterpretResult, Symbol};

use crate::types::{check, edit, TypeDescriptor};

/// A function's signature plus the AST it needs to re-check the body against
/// fresh argument types at every call site (monomorphic-per-call checking).
#[derive(Clone, Debug)]
pub struct FunctionSignature {
    pub ret: Option<TypeDescriptor>,
    pub params: Vec<(TypeDescriptor, Symbol)>,
    pub body: Vec<Stmt>,
    pub ret_expr: Option<Expr>,
}

pub type CheckerEnv = Environment<TypeDescriptor, FunctionSignature>;

pub struct TypeChecker {
    pub env: CheckerEnv,
}

impl TypeChecker {
    pub fn new() -> Self {
        Self { env: CheckerEnv::fresh() }
    }

    pub fn with_env(env: CheckerEnv) -> Self {
        Self { env }
    }

    pub fn check_program(&mut self, program: &Program) -> InterpretResult<()> {
        for stmt in program {
            self.check_stmt(stmt)?;
        }
        Ok(())
    }

    pub fn check_stmt(&mut self, stmt: &Stmt) -> InterpretResult<()> {
        match stmt {
            Stmt::VarDecl { ty, name, value, span } => {
                let declared = TypeDescriptor::from_ast(ty);
                let actual = self.check_expr(value)?;
                if !check(&declared, &actual) {
                    return Err(InterpretError::TypeError {
                        expected: declared.describe(),
                        found: actual.describe(),
                        span: *span,
                    });
                }
                self.env.add_var(*name, declared);
                Ok(())
            }
            Stmt::Assign { name, value, span } => {
                let declared = self.lookup_var(*name, *span)?.clone();
                let actual = self.check_expr(value)?;
                if !check(&declared, &actual) {
                    return Err(InterpretError::TypeError {
                        expected: declared.describe(),
                        found: actual.describe(),
                        span: *span,
                    });
                }
                self.env.set_var(*name, declared);
                Ok(())
            }
            Stmt::FunDecl(decl) => self.check_fun_decl(decl),
            Stmt::Expr(expr) => self.check_expr(expr).map(|_| ()),
        }
    }

    fn check_fun_decl(&mut self, decl: &FunDecl) -> InterpretResult<()> {
        let sig = FunctionSignature {
            ret: decl.ret.as_ref().map(TypeDescriptor::from_ast),
            params: decl
                .params
                .iter()
                .map(|p| (TypeDescriptor::from_ast(&p.ty), p.name))
                .collect(),
            body: decl.body.clone(),
            ret_expr: decl.ret_expr.clone(),
        };
        self.env.add_fun(decl.name, sig);
        Ok(())
    }

    fn lookup_var(&self, name: Symbol, span: velac_util::Span) -> InterpretResult<&TypeDescriptor> {
        self.env.get_var(name).ok_or_else(|| InterpretError::UndefinedName {
            name: name.as_str().to_string(),
            span,
        })
    }

    pub fn check_expr(&mut self, expr: &Expr) -> InterpretResult<TypeDescriptor> {
        use TypeDescriptor::*;
        match expr {
            Expr::IntLit(..) => Ok(Int),
            Expr::FloatLit(..) => Ok(Float),
            Expr::BoolLit(..) => Ok(Bool),
            Expr::StringLit(..) => Ok(String),
            Expr::Var(name, span) => self.lookup_var(*name, *span).cloned(),
            Expr::ListLit(elems, span) => {
                let mut acc = Void;
                for e in elems {
                    let t = self.check_expr(e)?;
                    acc = edit(&acc, &t).ok_or_else(|| InterpretError::TypeError {
                        expected: acc.describe(),
                        found: t.describe(),
                        span: *span,
                    })?;
                }
                Ok(List(Box::new(acc)))
            }
            Expr::TupleLit(elems, _) => {
                let mut types = Vec::with_capacity(elems.len());
                for e in elems {
                    types.push(self.check_expr(e)?);
                }
                Ok(Tuple(types))
            }
            Expr::Unary(op, operand, span) => self.check_unary(*op, operand, *span),
            Expr::Binary(op, lhs, rhs, span) => self.check_binary(*op, lhs, rhs, *span),
            Expr::Index(base, index, span) => self.check_index(base, index, *span),
            Expr::Size(inner, span) => {
                let t = self.check_expr(inner)?;
                match t {
                    List(_) | Tuple(_) | String => Ok(Int),
                    other => Err(InterpretError::TypeError {
                        expected: "List, Tuple, or String".into(),
                        found: other.describe(),
                        span: *span,
                    }),
                }
            }
            Expr::ToString(inner, _) => {
                self.check_expr(inner)?;
                Ok(String)
            }
            Expr::Print(inner, _) => {
                self.check_expr(inner)?;
                Ok(Void)
            }
            Expr::NRoot(x, n, span) => {
                let tx = self.check_expr(x)?;
                let tn = self.check_expr(n)?;
                self.require_numeric(&tx, *span)?;
                self.require_numeric(&tn, *span)?;
                Ok(Float)
            }
            Expr::Call(name, args, span) => self.check_call(*name, args, *span),
            Expr::If { arms, else_branch, span } => self.check_if(arms, else_branch, *span),
            Expr::While { cond, body, span } => self.check_while(cond, body, *span),
            Expr::For { init, cond, step, body, span } => self.check_for(init, cond, step, body, *span),
        }
    }

    fn check_unary(&mut self, op: UnOp, operand: &Expr, span: velac_util::Span) -> InterpretResult<TypeDescriptor> {
        use TypeDescriptor::*;
        let t = self.check_expr(operand)?;
        match op {
            UnOp::Neg => {
                self.require_numeric(&t, span)?;
                Ok(t)
            }
            UnOp::Not => {
                if t == Bool {
                    Ok(Bool)
                } else {
                    Err(InterpretError::TypeError { expected: "Bool".into(), found: t.describe(), span })
                }
            }
        }
    }

    fn check_binary(&mut self, op: BinOp, lhs: &Expr, rhs: &Expr, span: velac_util::Span) -> InterpretResult<TypeDescriptor> {
        use TypeDescriptor::*;
        let l = self.check_expr(lhs)?;
        let r = self.check_expr(rhs)?;
        match op {
            BinOp::Add => {
                if l == String && r == String {
                    Ok(String)
                } else if let (List(_), List(_)) = (&l, &r) {
                    edit(&l, &r).ok_or_else(|| InterpretError::TypeError {
                        expected: l.describe(),
                        found: r.describe(),
                        span,
                    })
                } else {
                    self.require_numeric(&l, span)?;
                    self.require_numeric(&r, span)?;
                    Ok(if l == Int && r == Int { Int } else { Float })
                }
            }
            BinOp::Sub => {
                self.require_numeric(&l, span)?;
                self.require_numeric(&r, span)?;
                Ok(if l == Int && r == Int { Int } else { Float })
            }
            BinOp::Mul => {
                self.require_numeric(&l, span)?;
                self.require_numeric(&r, span)?;
                Ok(if l == Int && r == Int { Int } else { Float })
            }
            BinOp::Div => {
                self.require_numeric(&l, span)?;
                self.require_numeric(&r, span)?;
                Ok(Float)
            }
            BinOp::Pow => {
                self.require_numeric(&l, span)?;
                self.require_numeric(&r, span)?;
                Ok(Float)
            }
            BinOp::Mod => {
                self.require_numeric(&l, span)?;
                self.require_numeric(&r, span)?;
                Ok(if l == Int && r == Int { Int } else { Float })
            }
            BinOp::IDiv => {
                self.require_numeric(&l, span)?;
                self.require_numeric(&r, span)?;
                Ok(Int)
            }
            BinOp::Eq | BinOp::Ne => Ok(Bool),
            BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => {
                self.require_numeric(&l, span)?;
                self.require_numeric(&r, span)?;
                Ok(Bool)
            }
            BinOp::And | BinOp::Or => {
                if l == Bool && r == Bool {
                    Ok(Bool)
                } else {
                    Err(InterpretError::TypeError { expected: "Bool".into(), found: if l != Bool { l.describe() } else { r.describe() }, span })
                }
            }
        }
    }

    fn check_index(&mut self, base: &Expr, index: &Expr, span: velac_util::Span) -> InterpretResult<TypeDescriptor> {
        use TypeDescriptor::*;
        let tb = self.check_expr(base)?;
        let ti = self.check_expr(index)?;
        if !check(&Int, &ti) {
            return Err(InterpretError::TypeError { expected: "Int".into(), found: ti.describe(), span });
        }
        match tb {
            List(inner) => Ok(*inner),
            Tuple(_) => Ok(Void),
            String => Ok(String),
            other => Err(InterpretError::TypeError { expected: "List, Tuple, or String".into(), found: other.describe(), span }),
        }
    }

    fn check_if(
        &mut self,
        arms: &[(Expr, Vec<Stmt>)],
        else_branch: &Option<Vec<Stmt>>,
        span: velac_util::Span,
    ) -> InterpretResult<TypeDescriptor> {
        for (guard, body) in arms {
            let tg = self.check_expr(guard)?;
            if tg != TypeDescriptor::Bool {
                return Err(InterpretError::TypeError { expected: "Bool".into(), found: tg.describe(), span });
            }
            self.check_block(body)?;
        }
        if let Some(body) = else_branch {
            self.check_block(body)?;
        }
        Ok(TypeDescriptor::Void)
    }

    fn check_while(&mut self, cond: &Expr, body: &[Stmt], span: velac_util::Span) -> InterpretResult<TypeDescriptor> {
        let tc = self.check_expr(cond)?;
        if tc != TypeDescriptor::Bool {
            return Err(InterpretError::TypeError { expected: "Bool".into(), found: tc.describe(), span });
        }
        self.check_block(body)?;
        Ok(TypeDescriptor::Void)
    }

    fn check_for(
        &mut self,
        init: &Stmt,
        cond: &Expr,
        step: &Stmt,
        body: &[Stmt],
        span: velac_util::Span,
    ) -> InterpretResult<TypeDescriptor> {
        let mut iter_checker = TypeChecker::with_env(CheckerEnv::child(&self.env));
        iter_checker.check_stmt(init)?;

        let tc = iter_checker.check_expr(cond)?;
        if tc != TypeDescriptor::Bool {
            return Err(InterpretError::TypeError { expected: "Bool".into(), found: tc.describe(), span });
        }

        let mut body_checker = TypeChecker::with_env(CheckerEnv::child(&iter_checker.env));
        body_checker.check_program(body)?;
        iter_checker.env.merge_from(&body_checker.env);

        iter_checker.check_stmt(step)?;

        self.env.merge_from(&iter_checker.env);
        Ok(TypeDescriptor::Void)
    }

    fn check_block(&mut self, body: &[Stmt]) -> InterpretResult<()> {
        let mut child = TypeChecker::with_env(CheckerEnv::child(&self.env));
        child.check_program(body)?;
        self.env.merge_from(&child.env);
        Ok(())
    }

    fn check_call(&mut self, name: Symbol, args: &[Expr], span: velac_util::Span) -> InterpretResult<TypeDescriptor> {
        let sig = self
            .env
            .get_fun(name)
            .cloned()
            .ok_or_else(|| InterpretError::UndefinedName { name: name.as_str().to_string(), span })?;

        if args.len() != sig.params.len() {
            return Err(InterpretError::ArityMismatch {
                name: name.as_str().to_string(),
                expected: sig.params.len(),
                found: args.len(),
            });
        }

        let mut call_checker = TypeChecker::with_env(CheckerEnv::child(&self.env));
        for (arg, (param_ty, param_name)) in args.iter().zip(&sig.params) {
            let actual = self.check_expr(arg)?;
            if !check(param_ty, &actual) {
                return Err(InterpretError::TypeError {
                    expected: param_ty.describe(),
                    found: actual.describe(),
                    span,
                });
            }
            call_checker.env.add_var(*param_name, param_ty.clone());
        }

        call_checker.check_program(&sig.body)?;
        self.env.merge_from(&call_checker.env);

        match (&sig.ret, &sig.ret_expr) {
            (Some(declared), Some(ret_expr)) => {
                let returned = call_checker.check_expr(ret_expr)?;
                if !check(declared, &returned) {
                    return Err(InterpretError::TypeError {
                        expected: declared.describe(),
                        found: returned.describe(),
                        span,
                    });
                }
                Ok(declared.clone())
            }
            (None, None) => Ok(TypeDescriptor::Void),
            _ => unreachable!("parser guarantees ret and ret_expr are both Some or both None"),
        }
    }

    fn require_numeric(&self, t: &TypeDescriptor, span: velac_util::Span) -> InterpretResult<()> {
        if t.is_numeric() {
            Ok(())
        } else {
            Err(InterpretError::TypeError { expected: "Int or Float".into(), found: t.describe(), span })
        }
    }
}

impl Default for TypeChecker {
    fn default() -> Self {
        Self::new()
    }
}

//! Tree-walking evaluator. Mirrors `velac-sem::checker::TypeChecker`'s shape
//! node-for-node, but produces [`Value`]s instead of type descriptors and
//! actually performs control flow and function calls rather than just
//! checking them.

use velac_par::{BinOp, Expr, FunDecl, Program, Stmt, UnOp};
use velac_util::{Environment, InterpretError, InterpretResult, Symbol};

use crate::value::{FunctionRecord, Value};

pub type EvalEnv = Environment<Value, FunctionRecord>;

pub struct Evaluator {
    pub env: EvalEnv,
}

impl Evaluator {
    pub fn new() -> Self {
        Self { env: EvalEnv::fresh() }
    }

    pub fn with_env(env: EvalEnv) -> Self {
        Self { env }
    }

    pub fn eval_program(&mut self, program: &Program) -> InterpretResult<()> {
        for stmt in program {
            self.eval_stmt(stmt)?;
        }
        Ok(())
    }

    pub fn eval_stmt(&mut self, stmt: &Stmt) -> InterpretResult<()> {
        match stmt {
            Stmt::VarDecl { name, value, .. } => {
                let v = self.eval_expr(value)?;
                self.env.add_var(*name, v);
                Ok(())
            }
            Stmt::Assign { name, value, .. } => {
                let v = self.eval_expr(value)?;
                self.env.set_var(*name, v);
                Ok(())
            }
            Stmt::FunDecl(decl) => {
                self.eval_fun_decl(decl);
                Ok(())
            }
            Stmt::Expr(expr) => self.eval_expr(expr).map(|_| ()),
        }
    }

    fn eval_fun_decl(&mut self, decl: &FunDecl) {
        let record = FunctionRecord {
            params: decl.params.iter().map(|p| p.name).collect(),
            body: decl.body.clone(),
            ret_expr: decl.ret_expr.clone(),
        };
        self.env.add_fun(decl.name, record);
    }

    fn lookup_var(&self, name: Symbol, span: velac_util::Span) -> InterpretResult<Value> {
        self.env
            .get_var(name)
            .cloned()
            .ok_or_else(|| InterpretError::UndefinedName { name: name.as_str().to_string(), span })
    }

    pub fn eval_expr(&mut self, expr: &Expr) -> InterpretResult<Value> {
        match expr {
            Expr::IntLit(v, _) => Ok(Value::Integer(*v)),
            Expr::FloatLit(v, _) => Ok(Value::Float(*v)),
            Expr::BoolLit(v, _) => Ok(Value::Boolean(*v)),
            Expr::StringLit(s, _) => Ok(Value::String(s.clone())),
            Expr::Var(name, span) => self.lookup_var(*name, *span),
            Expr::ListLit(elems, _) => {
                let items = elems.iter().map(|e| self.eval_expr(e)).collect::<InterpretResult<_>>()?;
                Ok(Value::List(items))
            }
            Expr::TupleLit(elems, _) => {
                let items = elems.iter().map(|e| self.eval_expr(e)).collect::<InterpretResult<_>>()?;
                Ok(Value::Tuple(items))
            }
            Expr::Unary(op, operand, span) => self.eval_unary(*op, operand, *span),
            Expr::Binary(op, lhs, rhs, span) => self.eval_binary(*op, lhs, rhs, *span),
            Expr::Index(base, index, span) => self.eval_index(base, index, *span),
            Expr::Size(inner, span) => self.eval_size(inner, *span),
            Expr::ToString(inner, _) => {
                let v = self.eval_expr(inner)?;
                Ok(Value::String(v.to_display_string()))
            }
            Expr::Print(inner, _) => {
                let v = self.eval_expr(inner)?;
                println!("{}", v.to_display_string());
                Ok(Value::Void)
            }
            Expr::NRoot(x, n, span) => {
                let vx = self.eval_expr(x)?;
                let vn = self.eval_expr(n)?;
                let (fx, fn_) = self.require_numeric_pair(&vx, &vn, *span)?;
                Ok(Value::Float(fx.powf(1.0 / fn_)))
            }
            Expr::Call(name, args, span) => self.eval_call(*name, args, *span),
            Expr::If { arms, else_branch, span } => self.eval_if(arms, else_branch, *span),
            Expr::While { cond, body, span } => self.eval_while(cond, body, *span),
            Expr::For { init, cond, step, body, span } => self.eval_for(init, cond, step, body, *span),
        }
    }

    fn eval_unary(&mut self, op: UnOp, operand: &Expr, span: velac_util::Span) -> InterpretResult<Value> {
        let v = self.eval_expr(operand)?;
        match op {
            UnOp::Neg => match v {
                Value::Integer(i) => Ok(Value::Integer(-i)),
                Value::Float(f) => Ok(Value::Float(-f)),
                other => Err(InterpretError::TypeError {
                    expected: "Int or Float".into(),
                    found: other.type_name().into(),
                    span,
                }),
            },
            UnOp::Not => {
                let b = v.as_bool().ok_or_else(|| InterpretError::NotBoolean { found: v.type_name().into() })?;
                Ok(Value::Boolean(!b))
            }
        }
    }

    fn eval_binary(&mut self, op: BinOp, lhs: &Expr, rhs: &Expr, span: velac_util::Span) -> InterpretResult<Value> {
        let l = self.eval_expr(lhs)?;
        let r = self.eval_expr(rhs)?;
        match op {
            BinOp::Add => self.eval_add(l, r, span),
            BinOp::Sub => self.eval_numeric_preserving(l, r, span, |a, b| a - b, |a, b| a - b),
            BinOp::Mul => self.eval_numeric_preserving(l, r, span, |a, b| a * b, |a, b| a * b),
            BinOp::Div => {
                let (a, b) = self.require_numeric_pair(&l, &r, span)?;
                Ok(Value::Float(a / b))
            }
            BinOp::Pow => {
                let (a, b) = self.require_numeric_pair(&l, &r, span)?;
                Ok(Value::Float(a.powf(b)))
            }
            BinOp::IDiv => {
                let (a, b) = self.require_numeric_pair(&l, &r, span)?;
                Ok(Value::Integer((a / b).floor() as i64))
            }
            BinOp::Mod => {
                let (a, b) = self.require_numeric_pair(&l, &r, span)?;
                let result = a - b * (a / b).floor();
                match (&l, &r) {
                    (Value::Integer(_), Value::Integer(_)) => Ok(Value::Integer(result.round() as i64)),
                    _ => Ok(Value::Float(result)),
                }
            }
            BinOp::Eq => Ok(Value::Boolean(l == r)),
            BinOp::Ne => Ok(Value::Boolean(l != r)),
            BinOp::Lt => self.eval_comparison(l, r, span, |a, b| a < b),
            BinOp::Le => self.eval_comparison(l, r, span, |a, b| a <= b),
            BinOp::Gt => self.eval_comparison(l, r, span, |a, b| a > b),
            BinOp::Ge => self.eval_comparison(l, r, span, |a, b| a >= b),
            BinOp::And => {
                let a = l.as_bool().ok_or_else(|| InterpretError::NotBoolean { found: l.type_name().into() })?;
                let b = r.as_bool().ok_or_else(|| InterpretError::NotBoolean { found: r.type_name().into() })?;
                Ok(Value::Boolean(a && b))
            }
            BinOp::Or => {
                let a = l.as_bool().ok_or_else(|| InterpretError::NotBoolean { found: l.type_name().into() })?;
                let b = r.as_bool().ok_or_else(|| InterpretError::NotBoolean { found: r.type_name().into() })?;
                Ok(Value::Boolean(a || b))
            }
        }
    }

    fn eval_add(&mut self, l: Value, r: Value, span: velac_util::Span) -> InterpretResult<Value> {
        match (l, r) {
            (Value::String(a), Value::String(b)) => Ok(Value::String(a + &b)),
            (Value::List(mut a), Value::List(b)) => {
                a.extend(b);
                Ok(Value::List(a))
            }
            (a, b) => self.eval_numeric_preserving(a, b, span, |x, y| x + y, |x, y| x + y),
        }
    }

    /// Integer arithmetic that stays `Int` when both operands are `Int`,
    /// widening to `Float` the moment either side is.
    fn eval_numeric_preserving(
        &self,
        l: Value,
        r: Value,
        span: velac_util::Span,
        int_op: impl Fn(i64, i64) -> i64,
        float_op: impl Fn(f64, f64) -> f64,
    ) -> InterpretResult<Value> {
        match (&l, &r) {
            (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(int_op(*a, *b))),
            _ => {
                let (a, b) = self.require_numeric_pair(&l, &r, span)?;
                Ok(Value::Float(float_op(a, b)))
            }
        }
    }

    fn eval_comparison(&self, l: Value, r: Value, span: velac_util::Span, cmp: impl Fn(f64, f64) -> bool) -> InterpretResult<Value> {
        let (a, b) = self.require_numeric_pair(&l, &r, span)?;
        Ok(Value::Boolean(cmp(a, b)))
    }

    fn require_numeric_pair(&self, l: &Value, r: &Value, span: velac_util::Span) -> InterpretResult<(f64, f64)> {
        let a = l.as_f64().ok_or_else(|| InterpretError::TypeError {
            expected: "Int or Float".into(),
            found: l.type_name().into(),
            span,
        })?;
        let b = r.as_f64().ok_or_else(|| InterpretError::TypeError {
            expected: "Int or Float".into(),
            found: r.type_name().into(),
            span,
        })?;
        Ok((a, b))
    }

    fn eval_index(&mut self, base: &Expr, index: &Expr, span: velac_util::Span) -> InterpretResult<Value> {
        let base_val = self.eval_expr(base)?;
        let index_val = self.eval_expr(index)?;
        let idx = match index_val {
            Value::Integer(i) => i,
            other => {
                return Err(InterpretError::TypeError {
                    expected: "Int".into(),
                    found: other.type_name().into(),
                    span,
                })
            }
        };

        match base_val {
            Value::List(items) => Ok(index_into(&items, idx)?.clone()),
            Value::Tuple(items) => Ok(index_into(&items, idx)?.clone()),
            Value::String(s) => {
                let chars: Vec<char> = s.chars().collect();
                let c = index_into(&chars, idx)?;
                Ok(Value::String(c.to_string()))
            }
            other => Err(InterpretError::TypeError {
                expected: "List, Tuple, or String".into(),
                found: other.type_name().into(),
                span,
            }),
        }
    }

    fn eval_size(&mut self, inner: &Expr, span: velac_util::Span) -> InterpretResult<Value> {
        let v = self.eval_expr(inner)?;
        let len = match &v {
            Value::List(items) => items.len(),
            Value::Tuple(items) => items.len(),
            Value::String(s) => s.chars().count(),
            other => {
                return Err(InterpretError::TypeError {
                    expected: "List, Tuple, or String".into(),
                    found: other.type_name().into(),
                    span,
                })
            }
        };
        Ok(Value::Integer(len as i64))
    }

    fn eval_if(&mut self, arms: &[(Expr, Vec<Stmt>)], else_branch: &Option<Vec<Stmt>>, span: velac_util::Span) -> InterpretResult<Value> {
        for (guard, body) in arms {
            let g = self.eval_expr(guard)?;
            let taken = g.as_bool().ok_or_else(|| InterpretError::NotBoolean { found: g.type_name().into() })?;
            if taken {
                self.eval_block(body)?;
                return Ok(Value::Void);
            }
        }
        if let Some(body) = else_branch {
            self.eval_block(body)?;
        }
        let _ = span;
        Ok(Value::Void)
    }

    fn eval_while(&mut self, cond: &Expr, body: &[Stmt], _span: velac_util::Span) -> InterpretResult<Value> {
        loop {
            let g = self.eval_expr(cond)?;
            let keep_going = g.as_bool().ok_or_else(|| InterpretError::NotBoolean { found: g.type_name().into() })?;
            if !keep_going {
                break;
            }
            self.eval_block(body)?;
        }
        Ok(Value::Void)
    }

    fn eval_for(&mut self, init: &Stmt, cond: &Expr, step: &Stmt, body: &[Stmt], _span: velac_util::Span) -> InterpretResult<Value> {
        let mut iter_eval = Evaluator::with_env(EvalEnv::child(&self.env));
        iter_eval.eval_stmt(init)?;

        loop {
            let g = iter_eval.eval_expr(cond)?;
            let keep_going = g.as_bool().ok_or_else(|| InterpretError::NotBoolean { found: g.type_name().into() })?;
            if !keep_going {
                break;
            }

            let mut body_eval = Evaluator::with_env(EvalEnv::child(&iter_eval.env));
            body_eval.eval_program(body)?;
            iter_eval.env.merge_from(&body_eval.env);

            iter_eval.eval_stmt(step)?;
        }

        self.env.merge_from(&iter_eval.env);
        Ok(Value::Void)
    }

    fn eval_block(&mut self, body: &[Stmt]) -> InterpretResult<()> {
        let mut child = Evaluator::with_env(EvalEnv::child(&self.env));
        child.eval_program(body)?;
        self.env.merge_from(&child.env);
        Ok(())
    }

    fn eval_call(&mut self, name: Symbol, args: &[Expr], span: velac_util::Span) -> InterpretResult<Value> {
        let record = self
            .env
            .get_fun(name)
            .cloned()
            .ok_or_else(|| InterpretError::UndefinedName { name: name.as_str().to_string(), span })?;

        if args.len() != record.params.len() {
            return Err(InterpretError::ArityMismatch {
                name: name.as_str().to_string(),
                expected: record.params.len(),
                found: args.len(),
            });
        }

        let mut arg_values = Vec::with_capacity(args.len());
        for arg in args {
            arg_values.push(self.eval_expr(arg)?);
        }

        let mut call_eval = Evaluator::with_env(EvalEnv::child(&self.env));
        for (param, value) in record.params.iter().zip(arg_values) {
            call_eval.env.add_var(*param, value);
        }

        call_eval.eval_program(&record.body)?;
        self.env.merge_from(&call_eval.env);

        match &record.ret_expr {
            Some(ret_expr) => call_eval.eval_expr(ret_expr),
            None => Ok(Value::Void),
        }
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves a (possibly negative, Python-style) index into `items`,
/// raising `IndexOutOfBounds` if it falls outside `[-len, len)`.
fn index_into<T>(items: &[T], idx: i64) -> InterpretResult<&T> {
    let len = items.len();
    let resolved = if idx < 0 { idx + len as i64 } else { idx };
    if resolved < 0 || resolved as usize >= len {
        return Err(InterpretError::IndexOutOfBounds { index: idx, length: len });
    }
    Ok(&items[resolved as usize])
}

//! Runtime values.

use velac_par::Stmt;
use velac_util::Symbol;

/// A function as stored in the evaluator's environment: the AST needed to
/// re-execute the body in a fresh frame on every call, mirroring how the
/// checker's `FunctionSignature` keeps the declaration around for
/// monomorphic-per-call checking.
#[derive(Clone, Debug)]
pub struct FunctionRecord {
    pub params: Vec<Symbol>,
    pub body: Vec<Stmt>,
    pub ret_expr: Option<velac_par::Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    /// A genuine two-state variant rather than a string marker — see
    /// SPEC_FULL.md §3. `toString`/`print` still render exactly `"True"`/
    /// `"False"`.
    Boolean(bool),
    String(String),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    /// Result of a `Void` function call, or an unevaluated branch of
    /// control flow. Never observable through `print`/`toString` in a
    /// well-typed program.
    Void,
}

impl Value {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "Int",
            Value::Float(_) => "Float",
            Value::Boolean(_) => "Bool",
            Value::String(_) => "String",
            Value::List(_) => "List",
            Value::Tuple(_) => "Tuple",
            Value::Void => "Void",
        }
    }

    /// Canonical textual form: booleans render as `True`/`False`, floats
    /// always carry a decimal point, strings render without quotes,
    /// containers are rendered element-wise with `;` separators matching
    /// the language's own literal syntax.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => {
                if f.fract() == 0.0 && f.is_finite() {
                    format!("{f:.1}")
                } else {
                    f.to_string()
                }
            }
            Value::Boolean(true) => "True".to_string(),
            Value::Boolean(false) => "False".to_string(),
            Value::String(s) => s.clone(),
            Value::List(items) => {
                let inner: Vec<String> = items.iter().map(Value::to_display_string).collect();
                format!("[{}]", inner.join(";"))
            }
            Value::Tuple(items) => {
                let inner: Vec<String> = items.iter().map(Value::to_display_string).collect();
                format!("({})", inner.join(";"))
            }
            Value::Void => String::new(),
        }
    }
}

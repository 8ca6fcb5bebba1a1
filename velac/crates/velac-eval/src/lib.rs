//! Tree-walking evaluator over the AST produced by `velac-lex`/`velac-par`,
//! executing programs the `velac-sem::checker::TypeChecker` has already
//! accepted.
//!
//! Shares the generic `Environment<V, F>` scope chain from `velac-util` with
//! the type checker, instantiated here over runtime [`Value`]s and
//! [`value::FunctionRecord`]s instead of type descriptors and signatures.

pub mod evaluator;
pub mod value;

pub use evaluator::{EvalEnv, Evaluator};
pub use value::{FunctionRecord, Value};

#[cfg(test)]
mod tests {
    use super::*;
    use velac_util::Handler;

    fn eval_ok(src: &str) -> Evaluator {
        let mut handler = Handler::new();
        let program = velac_par::parse(src, &mut handler).expect("parse failed");
        let mut checker = velac_sem::TypeChecker::new();
        checker.check_program(&program).expect("type check failed");
        let mut evaluator = Evaluator::new();
        evaluator.eval_program(&program).expect("eval failed");
        evaluator
    }

    fn var(evaluator: &Evaluator, name: &str) -> Value {
        evaluator.env.get_var(velac_util::Symbol::intern(name)).cloned().expect("var not bound")
    }

    #[test]
    fn arithmetic_widens_on_float() {
        let e = eval_ok("Float: x = 1 + 2.5;");
        assert_eq!(var(&e, "x"), Value::Float(3.5));
    }

    #[test]
    fn floor_division_rounds_toward_negative_infinity() {
        let e = eval_ok("Int: x = (0 - 7) div 2;");
        assert_eq!(var(&e, "x"), Value::Integer(-4));
    }

    #[test]
    fn mod_follows_divisor_sign() {
        let e = eval_ok("Int: x = (0 - 7) mod 2;");
        assert_eq!(var(&e, "x"), Value::Integer(1));
    }

    #[test]
    fn factorial_of_five_is_120() {
        let e = eval_ok(
            "Int: fact(Int: n) { if (n <= 1) { Int: r = 1; } else { Int: r = n * fact(n - 1); } return r; } Int: answer = fact(5);",
        );
        assert_eq!(var(&e, "answer"), Value::Integer(120));
    }

    #[test]
    fn negative_index_counts_from_the_end() {
        let e = eval_ok("Int[]: xs = [1;2;3]; Int: last = xs[-1];");
        assert_eq!(var(&e, "last"), Value::Integer(3));
    }

    #[test]
    fn while_loop_mutation_is_visible_after_merge() {
        let e = eval_ok("Int: x = 0; while (x < 5) { x = x + 1; }");
        assert_eq!(var(&e, "x"), Value::Integer(5));
    }

    #[test]
    fn boolean_renders_as_true_false() {
        assert_eq!(Value::Boolean(true).to_display_string(), "True");
        assert_eq!(Value::Boolean(false).to_display_string(), "False");
    }

    #[test]
    fn float_display_always_has_a_decimal_point() {
        assert_eq!(Value::Float(3.0).to_display_string(), "3.0");
    }
}

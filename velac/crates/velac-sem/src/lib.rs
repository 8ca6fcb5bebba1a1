//! Structural type checking over the AST produced by `velac-lex`/`velac-par`.
//!
//! Two total operations drive everything: [`types::check`] (directional
//! assignability, "can a value of type R sit in a slot of type L") and
//! [`types::edit`] (symmetric join, used to unify heterogeneous list
//! elements and binary operator operands). [`checker::TypeChecker`] walks the
//! program once, producing a [`types::TypeDescriptor`] for every expression
//! and nothing for statements, using the same `Environment<V, F>` scope
//! chain the evaluator instantiates over runtime values.
//!
pub mod checker;
pub mod types;

pub use checker::{CheckerEnv, FunctionSignature, TypeChecker};
pub use types::{check, edit, TypeDescriptor};

#[cfg(test)]
mod tests {
    use super::*;
    use velac_util::Handler;

    fn check_ok(src: &str) {
        let mut handler = Handler::new();
        let program = velac_par::parse(src, &mut handler).expect("parse failed");
        let mut checker = TypeChecker::new();
        checker.check_program(&program).expect("type check failed");
    }

    fn check_err(src: &str) {
        let mut handler = Handler::new();
        let program = velac_par::parse(src, &mut handler).expect("parse failed");
        let mut checker = TypeChecker::new();
        assert!(checker.check_program(&program).is_err());
    }

    #[test]
    fn var_decl_with_matching_type_passes() {
        check_ok("Int: x = 1 + 2 * 3;");
    }

    #[test]
    fn var_decl_with_mismatched_type_fails() {
        check_err("Int: x = \"oops\";");
    }

    #[test]
    fn int_widens_into_float_slot() {
        check_ok("Float: x = 1;");
    }

    #[test]
    fn factorial_function_type_checks() {
        check_ok(
            "Int: fact(Int: n) { if (n <= 1) { Int: r = 1; } else { Int: r = n * fact(n - 1); } return r; } print(fact(5));",
        );
    }

    #[test]
    fn calling_undefined_function_fails() {
        check_err("print(nope(1));");
    }

    #[test]
    fn arity_mismatch_fails() {
        check_err("Int: f(Int: a) { return a; } print(f(1;2));");
    }

    #[test]
    fn mutation_in_while_body_merges_back() {
        check_ok("Int: x = 0; while (x < 10) { x = x + 1; } print(x);");
    }

    #[test]
    fn tuple_index_yields_void() {
        check_ok("(Int; Bool): t = (1; True); Int: x = t[0];");
    }
}

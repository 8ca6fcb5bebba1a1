//! End-to-end CLI tests driving the `velac` binary exactly as a user would:
//! writing a source file to a temp dir and invoking `velac interpret`, or
//! piping lines into the REPL.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn interpret(source: &str) -> assert_cmd::assert::Assert {
    let mut file = NamedTempFile::new().expect("create temp file");
    write!(file, "{source}").expect("write source");
    Command::cargo_bin("velac").unwrap().arg("interpret").arg(file.path()).assert()
}

#[test]
fn scenario_arithmetic_precedence() {
    interpret("Int: x = 1 + 2 * 3; print(x);").success().stdout("7\n");
}

#[test]
fn scenario_list_size_and_negative_index() {
    interpret("Int[]: xs = [1;2;3]; Int: s = size(xs); print(xs[-1] + s);").success().stdout("6\n");
}

#[test]
fn scenario_recursive_factorial() {
    interpret(
        "Int: fact(Int: n) { if (n <= 1) { Int: r = 1; } else { Int: r = n * fact(n - 1); } return r; } print(fact(5));",
    )
    .success()
    .stdout("120\n");
}

#[test]
fn scenario_nroot() {
    interpret("Float: f = nroot(27; 3); print(f);").success().stdout("3.0\n");
}

#[test]
fn scenario_string_concat_and_size() {
    interpret("String: s = \"ab\" + \"cd\"; print(size(s));").success().stdout("4\n");
}

#[test]
fn scenario_for_loop_accumulation() {
    interpret("Int: n = 0; for (Int: i = 0; i < 5; i = i + 1) { n = n + i; } print(n);").success().stdout("10\n");
}

#[test]
fn scenario_floor_division_rounds_down() {
    interpret("Int: q = (0 - 7) div 2; print(q);").success().stdout("-4\n");
}

#[test]
fn scenario_mod_follows_divisor_sign() {
    interpret("Int: r = (0 - 7) mod 2; print(r);").success().stdout("1\n");
}

#[test]
fn scenario_syntax_error_exits_nonzero_with_no_stdout() {
    interpret("Int: x = ;").failure().stdout("").stderr(predicate::str::contains("error"));
}

#[test]
fn scenario_repl_quit_terminates_cleanly_with_no_output() {
    Command::cargo_bin("velac")
        .unwrap()
        .arg("repl")
        .write_stdin("Int: a = 1;\nquit()\n")
        .assert()
        .success()
        .stdout("");
}

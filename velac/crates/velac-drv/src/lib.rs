//! Driver: pure orchestration glueing the lexer/parser, type checker, and
//! evaluator together behind a single entry point, plus the `clap` CLI and
//! `rustyline` REPL that sit on top of it.
//!
//! `run` is the one public function both modes funnel through: file mode
//! builds a fresh pair of root environments per invocation; the REPL keeps
//! one persistent pair alive across lines, feeding each line through the
//! same checker-then-evaluator pipeline and merging survivors back into the
//! persistent state only when that line was accepted clean.

use std::fs;
use std::path::PathBuf;

use clap::{Parser as ClapParser, Subcommand};
use tracing::{debug, info, instrument};

use velac_eval::{EvalEnv, Evaluator};
use velac_sem::{CheckerEnv, TypeChecker};
use velac_util::{Handler, InterpretError, InterpretResult};

/// The REPL sentinel that ends an interactive session cleanly.
pub const QUIT_SENTINEL: &str = "quit()";

#[derive(Debug, ClapParser)]
#[command(name = "velac", about = "A structurally-typed tree-walking interpreter", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interpret a source file.
    Interpret {
        /// Path to the source file to run.
        file: PathBuf,
    },
    /// Start an interactive REPL. This is also the default when no
    /// subcommand is given.
    Repl,
}

/// Initializes `tracing-subscriber` at a verbosity derived from `-v` count,
/// defaulting to `warn` so a plain `velac interpret foo.vl` stays quiet.
pub fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| level.into());
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Some(Command::Interpret { file }) => run_file(&file),
        Some(Command::Repl) | None => run_repl(),
    }
}

/// Runs a single source file through lex → parse → check → evaluate with a
/// fresh pair of root environments, reporting any failure to stderr.
#[instrument(skip_all, fields(path = %path.display()))]
fn run_file(path: &PathBuf) -> anyhow::Result<()> {
    let source = fs::read_to_string(path)?;
    info!("interpreting {}", path.display());
    match run(&source, &mut CheckerEnv::fresh(), &mut EvalEnv::fresh()) {
        Ok(()) => Ok(()),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}

/// Interactive loop: one persistent checker/evaluator environment pair lives
/// for the whole session. Each line gets its own child scope; on success the
/// child's mutations merge back, on failure the line is discarded and the
/// persistent state is untouched.
fn run_repl() -> anyhow::Result<()> {
    let mut rl = rustyline::DefaultEditor::new()?;
    let mut checker_env = CheckerEnv::fresh();
    let mut eval_env = EvalEnv::fresh();

    loop {
        let line = match rl.readline(">> ") {
            Ok(line) => line,
            Err(rustyline::error::ReadlineError::Eof) | Err(rustyline::error::ReadlineError::Interrupted) => break,
            Err(e) => return Err(e.into()),
        };

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(trimmed);
        if trimmed == QUIT_SENTINEL {
            break;
        }

        let source = if trimmed.ends_with(';') || trimmed.ends_with('}') {
            trimmed.to_string()
        } else {
            format!("{trimmed};")
        };

        if let Err(e) = run(&source, &mut checker_env, &mut eval_env) {
            eprintln!("error: {e}");
        }
    }

    Ok(())
}

/// Lexes and parses `source`, type-checks it against `checker_env`, and on
/// success evaluates it against `eval_env`. Both environments are mutated in
/// place only when every stage succeeds — the single public entry point
/// file-mode and REPL-mode both funnel through.
#[instrument(skip_all)]
pub fn run(source: &str, checker_env: &mut CheckerEnv, eval_env: &mut EvalEnv) -> InterpretResult<()> {
    let mut handler = Handler::new();
    let program = velac_par::parse(source, &mut handler).ok_or_else(|| {
        let message = handler
            .diagnostics()
            .first()
            .map(|d| d.message.clone())
            .unwrap_or_else(|| "parse failed".to_string());
        let span = handler.diagnostics().first().map(|d| d.span).unwrap_or(velac_util::Span::DUMMY);
        InterpretError::ParseError { message, span }
    })?;
    debug!(statements = program.len(), "parsed program");

    let mut checker = TypeChecker::with_env(checker_env.clone());
    let check_result = checker.check_program(&program);
    if check_result.is_ok() {
        *checker_env = checker.env;
    }
    check_result?;

    let mut evaluator = Evaluator::with_env(eval_env.clone());
    let eval_result = evaluator.eval_program(&program);
    if eval_result.is_ok() {
        *eval_env = evaluator.env;
    }
    eval_result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_accepts_a_well_typed_program() {
        let mut checker_env = CheckerEnv::fresh();
        let mut eval_env = EvalEnv::fresh();
        assert!(run("Int: x = 1 + 2;", &mut checker_env, &mut eval_env).is_ok());
    }

    #[test]
    fn run_rejects_a_type_error_without_mutating_state() {
        let mut checker_env = CheckerEnv::fresh();
        let mut eval_env = EvalEnv::fresh();
        assert!(run("Int: x = \"oops\";", &mut checker_env, &mut eval_env).is_err());
        assert!(checker_env.get_var(velac_util::Symbol::intern("x")).is_none());
    }

    #[test]
    fn persistent_env_survives_across_calls() {
        let mut checker_env = CheckerEnv::fresh();
        let mut eval_env = EvalEnv::fresh();
        run("Int: x = 1;", &mut checker_env, &mut eval_env).unwrap();
        run("x = x + 1;", &mut checker_env, &mut eval_env).unwrap();
        assert_eq!(
            eval_env.get_var(velac_util::Symbol::intern("x")),
            Some(&velac_eval::Value::Integer(2))
        );
    }
}

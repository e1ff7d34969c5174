//! Shared test helpers for integration tests

#![allow(dead_code)]

use std::sync::Once;

use cinnabar::ast::{Expression, Program, Statement};
use cinnabar::{parse_module, parse_script, Error, Options};

static TRACING: Once = Once::new();

/// Install a tracing subscriber honoring `RUST_LOG`, once per test binary,
/// so failing parses can be rerun with scanner and parser traces visible
fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Parse source under the script goal with default options
pub fn script(source: &str) -> Program {
    init_tracing();
    parse_script(source, Options::default()).unwrap()
}

/// Parse source under the script goal, expecting failure
pub fn script_err(source: &str) -> Error {
    init_tracing();
    parse_script(source, Options::default()).unwrap_err()
}

/// Parse source under the module goal with default options
pub fn module(source: &str) -> Program {
    init_tracing();
    parse_module(source, Options::default()).unwrap()
}

/// Parse source under the module goal, expecting failure
pub fn module_err(source: &str) -> Error {
    init_tracing();
    parse_module(source, Options::default()).unwrap_err()
}

/// Parse a script with explicit options
pub fn script_with(source: &str, options: Options) -> Program {
    init_tracing();
    parse_script(source, options).unwrap()
}

/// Options with recent-standard features enabled
pub fn next_options() -> Options {
    Options {
        next: true,
        ..Options::default()
    }
}

/// Parse a script and return the expression of its first statement
pub fn expression(source: &str) -> Expression {
    let program = script(source);
    let Some(Statement::Expression(statement)) = program.body.into_iter().next() else {
        panic!("expected an expression statement in: {}", source);
    };
    statement.expression
}

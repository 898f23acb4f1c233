//! Scenario tests: whole programs built with `AstBuilder` and run against a
//! buffered print handler, a manual clock and a seeded random source.

mod control_tests;
mod operators_tests;

use ember_ir::{AstBuilder, NodeId, SharedAst};

use crate::{buffer_handler, Clock, EvalResult, InputSource, Interpreter, InterpreterBuilder};

/// Manual clock start, in epoch milliseconds.
pub(crate) const START_MS: f64 = 1_000.0;

pub(crate) fn builder() -> InterpreterBuilder {
    Interpreter::builder()
        .print_handler(buffer_handler())
        .clock(Clock::manual(START_MS))
        .input(InputSource::scripted(Vec::<String>::new()))
        .seed(7)
}

pub(crate) fn program(build: impl FnOnce(&mut AstBuilder) -> NodeId) -> SharedAst {
    let mut b = AstBuilder::new();
    let root = build(&mut b);
    b.finish(root).into_shared()
}

/// Run a program to completion (event loop included) on a fresh test
/// interpreter; returns the result and everything printed.
pub(crate) fn run(build: impl FnOnce(&mut AstBuilder) -> NodeId) -> (EvalResult, String) {
    run_with(builder().build(), build)
}

pub(crate) fn run_with(
    mut interpreter: Interpreter,
    build: impl FnOnce(&mut AstBuilder) -> NodeId,
) -> (EvalResult, String) {
    let ast = program(build);
    let result = interpreter.run(&ast);
    (result, interpreter.print_handler().output())
}

/// Kind label of the error a program fails with.
pub(crate) fn error_kind(result: &EvalResult) -> Option<&'static str> {
    result.as_ref().err().map(crate::EvalError::kind_name)
}

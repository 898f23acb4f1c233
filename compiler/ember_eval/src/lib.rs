//! Ember Eval - tree-walking interpreter for Ember programs.
//!
//! # Architecture
//!
//! - `ScopeArena`: the scope chain as an arena of records addressed by
//!   `ScopeId`, with per-scope control-flow signals
//! - `Interpreter::evaluate`: the dispatcher over `ember_ir::NodeKind`
//! - `evaluate_binary`: explicit operator table over operand variant pairs
//! - `builtins`: the fixed registry of host primitives (`print`, `time`,
//!   `input`, `rand`, `setTimeout`, `len`, `append`)
//! - `EventLoop`: callbacks deferred by `setTimeout` and `input`, drained by
//!   `Interpreter::run`
//!
//! # Example
//!
//! ```text
//! let mut b = AstBuilder::new();
//! let one = b.number(1.0);
//! let root = b.ret(Some(one));
//! let ast = b.finish(root).into_shared();
//! let value = Interpreter::builder().print_handler(buffer_handler()).build().run(&ast)?;
//! ```

mod builtins;
mod callable;
mod clock;
pub mod errors;
mod event_loop;
mod input;
mod interpreter;
mod operators;
mod print_handler;
mod random;
mod scope;
mod stack;
mod value;

pub use builtins::{builtin_names, lookup_builtin};
pub use callable::{Callable, Closure, Primitive, PrimitiveFn};
pub use clock::Clock;
pub use errors::{EvalError, EvalResult};
pub use event_loop::{EventLoop, Task};
pub use input::InputSource;
pub use interpreter::{
    Interpreter, InterpreterBuilder, DEFAULT_COLLECT_THRESHOLD, DEFAULT_MAX_CALL_DEPTH,
};
pub use operators::{evaluate_binary, evaluate_not};
pub use print_handler::{
    buffer_handler, silent_handler, stdout_handler, BufferPrintHandler, PrintHandlerImpl,
    SharedPrintHandler, StdoutPrintHandler,
};
pub use random::RandomSource;
pub use scope::{Scope, ScopeArena, ScopeId, Signal, Signals};
pub use value::{Array, Container, Map, Shared, Value};

#[cfg(test)]
mod tests;

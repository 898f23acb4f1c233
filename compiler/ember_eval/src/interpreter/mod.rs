//! Tree-walking interpreter.
//!
//! `Interpreter::evaluate` is the dispatcher: one `match` over [`NodeKind`]
//! that routes each node to its handler in `expr`, `assign`, `control` or
//! `call`. Every handler receives the arena the node lives in and the scope
//! to evaluate it in.
//!
//! The guard at the top of `evaluate` is what makes `return`, `break` and
//! `continue` work without unwinding: once a signal is set on a scope, every
//! later evaluation in that scope returns the signal's value immediately.
//!
//! Scope collection may run in the middle of an evaluation (at call
//! boundaries), so the interpreter keeps its own roots: the scopes of active
//! frames and blocks, and any value a handler holds while it evaluates
//! another node.

mod assign;
mod builder;
mod call;
mod control;
mod expr;

pub use builder::{InterpreterBuilder, DEFAULT_COLLECT_THRESHOLD, DEFAULT_MAX_CALL_DEPTH};

use ember_ir::{Ast, Node, NodeId, NodeKind, SharedAst, Slot};

use crate::clock::Clock;
use crate::errors::{dangling_node, malformed_node};
use crate::event_loop::{EventLoop, Task};
use crate::input::InputSource;
use crate::random::RandomSource;
use crate::stack::ensure_sufficient_stack;
use crate::{Callable, EvalResult, ScopeArena, ScopeId, SharedPrintHandler, Signal, Value};

pub struct Interpreter {
    scopes: ScopeArena,
    events: EventLoop,
    print_handler: SharedPrintHandler,
    input: InputSource,
    clock: Clock,
    random: RandomSource,
    max_call_depth: usize,
    call_depth: usize,
    /// Frame and block scopes currently being evaluated in.
    active_scopes: Vec<ScopeId>,
    /// Values held by handlers across a nested evaluation.
    temporaries: Vec<Value>,
    collect_threshold: usize,
    next_collection: usize,
}

impl Interpreter {
    /// An interpreter with stdout output, stdin input and the system clock.
    pub fn new() -> Self {
        InterpreterBuilder::new().build()
    }

    pub fn builder() -> InterpreterBuilder {
        InterpreterBuilder::new()
    }

    #[inline]
    pub fn scopes(&self) -> &ScopeArena {
        &self.scopes
    }

    #[inline]
    pub fn scopes_mut(&mut self) -> &mut ScopeArena {
        &mut self.scopes
    }

    #[inline]
    pub fn root_scope(&self) -> ScopeId {
        self.scopes.root()
    }

    #[inline]
    pub fn print_handler(&self) -> &SharedPrintHandler {
        &self.print_handler
    }

    #[inline]
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    #[inline]
    pub fn events(&self) -> &EventLoop {
        &self.events
    }

    #[inline]
    pub fn events_mut(&mut self) -> &mut EventLoop {
        &mut self.events
    }

    #[inline]
    pub fn random_mut(&mut self) -> &mut RandomSource {
        &mut self.random
    }

    /// Run a program in `scope` (the root scope if `None`).
    ///
    /// Returns the scope's effective signal if the program set one (a
    /// top-level `return`), otherwise the value of the last evaluation.
    /// Deferred callbacks are queued, not run; see [`Interpreter::run`].
    pub fn execute(&mut self, ast: &SharedAst, scope: Option<ScopeId>) -> EvalResult {
        let scope = scope.unwrap_or_else(|| self.scopes.root());
        self.scopes.reset_signals(scope);
        let value = self.with_active_scope(scope, |this| this.evaluate(ast, ast.root(), scope))?;
        Ok(self.scopes.effective_signal(scope).unwrap_or(value))
    }

    /// Execute a program in the root scope, then drain the event loop.
    ///
    /// The program's result is returned once every deferred callback has run,
    /// and stays a root until then: a closure returned this way can still be
    /// invoked by the host.
    pub fn run(&mut self, ast: &SharedAst) -> EvalResult {
        let value = self.execute(ast, None)?;
        self.with_temporaries(|this| {
            this.hold(&value);
            this.collect_scopes(&[]);
            this.run_event_loop()
        })?;
        Ok(value)
    }

    /// Run queued callbacks until none remain.
    ///
    /// Callbacks may queue further work, which is run in turn. A failing
    /// callback aborts the loop with its error; remaining tasks stay queued.
    pub fn run_event_loop(&mut self) -> EvalResult<()> {
        while let Some(task) = self.events.next_task() {
            match task {
                Task::ReadLine { callback } => {
                    let line = self.input.read_line()?;
                    tracing::debug!(callback = %callback, eof = line.is_none(), "running line callback");
                    let arg = line.map_or(Value::Null, Value::string);
                    self.invoke(&callback, vec![arg])?;
                }
                Task::Timer { due_ms, callback } => {
                    self.clock.sleep_until(due_ms);
                    tracing::debug!(callback = %callback, due_ms, "running timer callback");
                    self.invoke(&callback, Vec::new())?;
                }
            }
            self.collect_scopes(&[]);
        }
        Ok(())
    }

    /// Reclaim scopes nothing can reach anymore.
    ///
    /// Roots are the root scope, `extra_roots`, the scopes captured by queued
    /// callbacks, the scopes of active frames and blocks, and the values the
    /// evaluator is holding. Values the host keeps outside the interpreter are
    /// not roots; a closure among them fails with `StaleScope` once its scope
    /// is gone. Returns the number reclaimed.
    pub fn collect_scopes(&mut self, extra_roots: &[ScopeId]) -> usize {
        let roots: Vec<ScopeId> = extra_roots
            .iter()
            .copied()
            .chain(self.active_scopes.iter().copied())
            .chain(self.events.callbacks().filter_map(Callable::captured_scope))
            .collect();
        let freed = self.scopes.collect_with_values(roots, &self.temporaries);
        let live = self.scopes.live_count();
        self.next_collection = live.saturating_mul(2).max(self.collect_threshold);
        if freed > 0 {
            tracing::debug!(freed, live, "reclaimed scopes");
        }
        freed
    }

    /// Collect if the arena has grown past the threshold since the last
    /// sweep. `result` is the value in flight at the call boundary.
    fn maybe_collect(&mut self, result: &Value) {
        if self.scopes.live_count() < self.next_collection {
            return;
        }
        self.with_temporaries(|this| {
            this.hold(result);
            this.collect_scopes(&[]);
        });
    }

    /// Run `f` with `scope` counted as a root.
    fn with_active_scope<R>(&mut self, scope: ScopeId, f: impl FnOnce(&mut Self) -> R) -> R {
        self.active_scopes.push(scope);
        let result = f(self);
        self.active_scopes.pop();
        result
    }

    /// Run `f`; everything it [`hold`](Self::hold)s is released afterwards.
    fn with_temporaries<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let mark = self.temporaries.len();
        let result = f(self);
        self.temporaries.truncate(mark);
        result
    }

    /// Keep the scopes `value` may capture alive until the enclosing
    /// `with_temporaries` returns.
    fn hold(&mut self, value: &Value) {
        if matches!(value, Value::Array(_) | Value::Map(_) | Value::Callable(_)) {
            self.temporaries.push(value.clone());
        }
    }

    /// Evaluate one node in `scope`.
    ///
    /// Short-circuits with the scope's effective signal if one is already set.
    pub fn evaluate(&mut self, ast: &SharedAst, id: NodeId, scope: ScopeId) -> EvalResult {
        if let Some(signal) = self.scopes.effective_signal(scope) {
            return Ok(signal);
        }
        ensure_sufficient_stack(|| self.dispatch(ast, id, scope))
    }

    fn dispatch(&mut self, ast: &SharedAst, id: NodeId, scope: ScopeId) -> EvalResult {
        let node = ast.get(id).ok_or_else(|| dangling_node(id))?;
        tracing::trace!(kind = node.kind.as_tag(), ?id, "evaluate");
        match &node.kind {
            // Literals
            NodeKind::Str => Ok(Value::string(text(node, 2)?)),
            NodeKind::Number => node
                .slot(2)
                .as_number()
                .map(Value::Number)
                .ok_or_else(|| malformed_node(&node.kind, 2, "a number")),
            NodeKind::Bool => node
                .slot(2)
                .as_bool()
                .map(Value::Bool)
                .ok_or_else(|| malformed_node(&node.kind, 2, "a boolean")),
            NodeKind::Null => Ok(Value::Null),

            // Expressions
            NodeKind::Binary(op) => self.eval_binary(ast, node, *op, scope),
            NodeKind::Not => self.eval_not(ast, node, scope),
            NodeKind::Member => self.eval_member(ast, node, scope),
            NodeKind::Array => self.eval_array(ast, node, scope),
            NodeKind::Map => self.eval_map(ast, node, scope),
            NodeKind::ArrayGet => self.eval_index(ast, node, scope),
            NodeKind::Ident => Ok(self.scopes.lookup(scope, text(node, 2)?)?.0),

            // Bindings
            NodeKind::DeclareVar => self.eval_declare(node, scope),
            NodeKind::DeclareVarInitial => self.eval_declare_initial(ast, node, scope),
            NodeKind::SetValue => self.eval_assign(ast, node, scope),
            NodeKind::SetArrayValue => self.eval_index_assign(ast, node, scope),
            NodeKind::CompoundAssign(op) => self.eval_compound_assign(ast, node, *op, scope),

            // Control flow
            NodeKind::If => self.eval_if(ast, node, scope),
            NodeKind::While => self.eval_while(ast, node, scope),
            NodeKind::Return => self.eval_signal(ast, node, Signal::Exit, scope),
            NodeKind::Break => self.eval_signal(ast, node, Signal::Break, scope),
            NodeKind::Continue => self.eval_signal(ast, node, Signal::Continue, scope),
            NodeKind::Seq => self.eval_seq(ast, node, scope),

            // Functions
            NodeKind::FunctionDeclare => self.eval_function_declare(ast, node, scope),
            NodeKind::FunctionCall => self.eval_call(ast, node, scope),

            // Only meaningful inside their owner.
            NodeKind::Pair | NodeKind::List => Ok(Value::Null),

            NodeKind::Unknown(tag) => {
                tracing::debug!(tag = %tag, "skipping unknown node kind");
                Ok(Value::Null)
            }
        }
    }

    /// Evaluate an optional child, yielding null when the slot is empty.
    fn evaluate_optional(&mut self, ast: &SharedAst, slot: &Slot, scope: ScopeId) -> EvalResult {
        match slot.as_node() {
            Some(id) => self.evaluate(ast, id, scope),
            None => Ok(Value::Null),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

// Slot decoding

/// The child node a kind requires at `position`.
fn child(node: &Node, position: u8) -> EvalResult<NodeId> {
    node.slot(position)
        .as_node()
        .ok_or_else(|| malformed_node(&node.kind, position, "a node"))
}

/// The identifier or literal text a kind requires at `position`.
fn text(node: &Node, position: u8) -> EvalResult<&str> {
    node.slot(position)
        .as_text()
        .ok_or_else(|| malformed_node(&node.kind, position, "text"))
}

/// Element slots of the right-recursive list starting at `head`.
fn list_elements<'a>(ast: &'a Ast, head: &'a Slot) -> EvalResult<Vec<&'a Slot>> {
    let mut elements = Vec::new();
    let mut cursor = head;
    while let Some(id) = cursor.as_node() {
        let cell = ast.get(id).ok_or_else(|| dangling_node(id))?;
        elements.push(cell.slot(2));
        cursor = cell.slot(3);
    }
    Ok(elements)
}

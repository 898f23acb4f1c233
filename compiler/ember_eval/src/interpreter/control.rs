//! Control flow: conditionals, loops, signal statements and sequences.
//!
//! Signals are state on scopes, not Rust-level unwinding. A `return` sets
//! the exit slot of the scope it runs in; the dispatcher's guard then skips
//! everything else evaluated in that scope, and each enclosing construct
//! decides whether to pass the signal outward (`if`), consume it (`while`
//! for `break`/`continue`), or turn it into a result (a call frame).

use ember_ir::{Node, SharedAst};

use super::{child, Interpreter};
use crate::{EvalResult, ScopeId, Signal, Value};

impl Interpreter {
    /// `if (cond) { then } else { otherwise }`
    ///
    /// The condition runs in `scope`; the chosen branch runs in a fresh child
    /// whose signals are copied back to `scope` afterwards.
    pub(super) fn eval_if(&mut self, ast: &SharedAst, node: &Node, scope: ScopeId) -> EvalResult {
        let condition = self.evaluate(ast, child(node, 2)?, scope)?;
        let branch = if condition.is_truthy() {
            node.slot(3).as_node()
        } else {
            node.slot(4).as_node()
        };
        if let Some(body) = branch {
            let block = self.scopes.make_child(scope);
            self.with_active_scope(block, |this| this.evaluate(ast, body, block))?;
            self.scopes.propagate_signals(block, scope);
            self.scopes.release(block);
        }
        Ok(Value::Null)
    }

    /// `while (cond) { body }`
    ///
    /// The condition is evaluated in the enclosing scope each pass. The body
    /// gets one child scope for the whole loop, so its locals carry over from
    /// one iteration to the next.
    pub(super) fn eval_while(
        &mut self,
        ast: &SharedAst,
        node: &Node,
        scope: ScopeId,
    ) -> EvalResult {
        let condition = child(node, 2)?;
        let body = node.slot(3).as_node();
        let block = self.scopes.make_child(scope);
        self.with_active_scope(block, |this| -> EvalResult<()> {
            loop {
                if !this.evaluate(ast, condition, scope)?.is_truthy() {
                    return Ok(());
                }
                if let Some(body) = body {
                    this.evaluate(ast, body, block)?;
                }
                if let Some(value) = this.scopes.take_signal(block, Signal::Exit) {
                    this.scopes.set_signal(scope, Signal::Exit, value);
                    return Ok(());
                }
                if this.scopes.take_signal(block, Signal::Break).is_some() {
                    return Ok(());
                }
                this.scopes.take_signal(block, Signal::Continue);
            }
        })?;
        self.scopes.reset_signals(block);
        self.scopes.release(block);
        Ok(Value::Null)
    }

    /// `return`, `break` and `continue`: evaluate the optional operand and
    /// set the matching signal on `scope`.
    pub(super) fn eval_signal(
        &mut self,
        ast: &SharedAst,
        node: &Node,
        signal: Signal,
        scope: ScopeId,
    ) -> EvalResult {
        let value = self.evaluate_optional(ast, node.slot(2), scope)?;
        self.scopes.set_signal(scope, signal, value.clone());
        Ok(value)
    }

    /// `first; second`. The second statement is skipped once the first has
    /// set a signal; an absent statement is a no-op.
    pub(super) fn eval_seq(&mut self, ast: &SharedAst, node: &Node, scope: ScopeId) -> EvalResult {
        let first = self.evaluate_optional(ast, node.slot(2), scope)?;
        if let Some(signal) = self.scopes.effective_signal(scope) {
            return Ok(signal);
        }
        match node.slot(3).as_node() {
            Some(second) => self.evaluate(ast, second, scope),
            None => Ok(first),
        }
    }
}

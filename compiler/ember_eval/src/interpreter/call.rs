//! Function declaration and invocation.

use std::sync::Arc;

use ember_ir::{Node, SharedAst};

use super::{list_elements, text, Interpreter};
use crate::builtins::lookup_builtin;
use crate::callable::Closure;
use crate::errors::{malformed_node, not_callable, recursion_limit, stale_scope};
use crate::{Callable, EvalResult, ScopeId, Value};

impl Interpreter {
    /// `function name(params) { body }`
    ///
    /// The closure captures a new child of the declaring scope, so locals of
    /// its calls never leak into the declaring scope, while writes to outer
    /// variables still reach them.
    pub(super) fn eval_function_declare(
        &mut self,
        ast: &SharedAst,
        node: &Node,
        scope: ScopeId,
    ) -> EvalResult {
        let name = text(node, 2)?;
        let params = list_elements(ast, node.slot(3))?
            .into_iter()
            .map(|slot| {
                slot.as_text()
                    .map(str::to_owned)
                    .ok_or_else(|| malformed_node(&node.kind, 3, "a list of parameter names"))
            })
            .collect::<EvalResult<Vec<_>>>()?;

        let captured = self.scopes.make_child(scope);
        self.scopes.retain(captured);
        let function = Value::Callable(Callable::closure(Closure {
            name: name.to_owned(),
            params,
            body: node.slot(4).as_node(),
            ast: Arc::clone(ast),
            scope: captured,
        }));
        self.scopes.declare(scope, name, function.clone());
        Ok(function)
    }

    /// `name(args)`
    ///
    /// The callee is resolved before any argument is evaluated: built-ins
    /// first, then the scope chain. Arguments are evaluated left to right in
    /// the caller's scope.
    pub(super) fn eval_call(&mut self, ast: &SharedAst, node: &Node, scope: ScopeId) -> EvalResult {
        let name = text(node, 2)?;
        let callee = match lookup_builtin(name) {
            Some(primitive) => Callable::Primitive(primitive),
            None => match self.scopes.lookup(scope, name)?.0 {
                Value::Callable(callable) => callable,
                other => return Err(not_callable(name, &other)),
            },
        };

        let elements = list_elements(ast, node.slot(3))?;
        self.with_temporaries(|this| {
            this.hold(&Value::Callable(callee.clone()));
            let mut args = Vec::with_capacity(elements.len());
            for element in elements {
                let id = element
                    .as_node()
                    .ok_or_else(|| malformed_node(&node.kind, 3, "a list of expression nodes"))?;
                let arg = this.evaluate(ast, id, scope)?;
                this.hold(&arg);
                args.push(arg);
            }
            this.invoke(&callee, args)
        })
    }

    /// Invoke a callable with already-evaluated arguments.
    ///
    /// Used by the dispatcher and by the event loop for deferred callbacks.
    #[tracing::instrument(level = "debug", skip_all, fields(callee = %callable))]
    pub fn invoke(&mut self, callable: &Callable, args: Vec<Value>) -> EvalResult {
        match callable {
            Callable::Primitive(primitive) => primitive.call(self, args),
            Callable::Closure(closure) => self.call_closure(closure, args),
        }
    }

    /// Run a closure body in a fresh frame.
    ///
    /// The frame is a child of the captured scope holding the parameters
    /// (missing arguments bind to null, extra ones are dropped). The result
    /// is the frame's effective signal if the body set one, else the body's
    /// last value. Fails with `StaleScope` if the captured scope was
    /// reclaimed while the host held the closure.
    fn call_closure(&mut self, closure: &Closure, args: Vec<Value>) -> EvalResult {
        if self.call_depth >= self.max_call_depth {
            return Err(recursion_limit(self.max_call_depth));
        }
        if !self.scopes.contains(closure.scope) {
            return Err(stale_scope(&closure.name));
        }
        let frame = self.scopes.make_child(closure.scope);
        self.scopes.reset_signals(frame);
        let mut args = args.into_iter();
        for param in &closure.params {
            self.scopes
                .declare(frame, param.as_str(), args.next().unwrap_or_default());
        }

        let Some(body) = closure.body else {
            self.scopes.release(frame);
            return Ok(Value::Null);
        };
        self.call_depth += 1;
        let result = self.with_active_scope(frame, |this| this.evaluate(&closure.ast, body, frame));
        self.call_depth -= 1;

        let value = result?;
        let value = self.scopes.effective_signal(frame).unwrap_or(value);
        self.scopes.reset_signals(frame);
        self.scopes.release(frame);
        self.maybe_collect(&value);
        Ok(value)
    }
}

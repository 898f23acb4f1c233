//! Declarations and assignments.

use ember_ir::{BinaryOp, Node, SharedAst};

use super::{child, text, Interpreter};
use crate::errors::{invalid_array_index, null_target, type_mismatch};
use crate::operators::evaluate_binary;
use crate::{EvalError, EvalResult, ScopeId, Value};

/// Largest gap a single indexed write may fill with nulls.
const MAX_ARRAY_GROWTH: usize = 1 << 24;

impl Interpreter {
    /// `let name;`
    pub(super) fn eval_declare(&mut self, node: &Node, scope: ScopeId) -> EvalResult {
        self.scopes.declare(scope, text(node, 2)?, Value::Null);
        Ok(Value::Null)
    }

    /// `let name = init;`
    pub(super) fn eval_declare_initial(
        &mut self,
        ast: &SharedAst,
        node: &Node,
        scope: ScopeId,
    ) -> EvalResult {
        let name = text(node, 2)?;
        let value = self.evaluate(ast, child(node, 3)?, scope)?;
        self.scopes.declare(scope, name, value.clone());
        Ok(value)
    }

    /// `name = value;` writes to whichever scope owns `name`.
    pub(super) fn eval_assign(&mut self, ast: &SharedAst, node: &Node, scope: ScopeId) -> EvalResult {
        let name = text(node, 2)?;
        let value = self.evaluate(ast, child(node, 3)?, scope)?;
        self.scopes.assign(scope, name, value.clone())?;
        Ok(value)
    }

    /// `name op= value;`
    pub(super) fn eval_compound_assign(
        &mut self,
        ast: &SharedAst,
        node: &Node,
        op: BinaryOp,
        scope: ScopeId,
    ) -> EvalResult {
        let name = text(node, 2)?;
        let (current, owner) = self.scopes.lookup(scope, name)?;
        let rhs = self.with_temporaries(|this| {
            this.hold(&current);
            this.evaluate(ast, child(node, 3)?, scope)
        })?;
        let result = evaluate_binary(&current, &rhs, op)?;
        self.scopes.declare(owner, name, result.clone());
        Ok(result)
    }

    /// `name[index] = value;` mutates the container in place.
    ///
    /// Arrays grow to fit, filling the gap with nulls. Map keys are
    /// stringified.
    pub(super) fn eval_index_assign(
        &mut self,
        ast: &SharedAst,
        node: &Node,
        scope: ScopeId,
    ) -> EvalResult {
        let name = text(node, 2)?;
        let (target, _) = self.scopes.lookup(scope, name)?;
        if target.is_null() {
            return Err(null_target(name));
        }
        let (index, value) = self.with_temporaries(|this| {
            this.hold(&target);
            let index = this.evaluate(ast, child(node, 3)?, scope)?;
            let value = this.evaluate(ast, child(node, 4)?, scope)?;
            Ok::<_, EvalError>((index, value))
        })?;
        match &target {
            Value::Map(entries) => {
                entries.borrow_mut().insert(index.to_key(), value.clone());
            }
            Value::Array(items) => {
                let i = index
                    .as_index()
                    .ok_or_else(|| invalid_array_index(&index))?;
                let mut items = items.borrow_mut();
                if i >= items.len() {
                    if i - items.len() > MAX_ARRAY_GROWTH {
                        return Err(type_mismatch(format!(
                            "array index {i} is too far past the end (length {})",
                            items.len()
                        )));
                    }
                    items.resize(i + 1, Value::Null);
                }
                items[i] = value.clone();
            }
            other => {
                return Err(type_mismatch(format!(
                    "cannot assign an index of `{name}` ({})",
                    other.type_name()
                )))
            }
        }
        Ok(value)
    }
}

//! Expression nodes: operators, member access, literals of containers,
//! indexing.

use std::collections::BTreeMap;

use ember_ir::{BinaryOp, Node, SharedAst};

use super::{child, list_elements, text, Interpreter};
use crate::errors::{
    dangling_node, empty_identifier, malformed_node, no_member, not_indexable, null_reference,
};
use crate::operators::{evaluate_binary, evaluate_not};
use crate::{EvalResult, ScopeId, Value};

impl Interpreter {
    pub(super) fn eval_binary(
        &mut self,
        ast: &SharedAst,
        node: &Node,
        op: BinaryOp,
        scope: ScopeId,
    ) -> EvalResult {
        self.with_temporaries(|this| {
            let left = this.evaluate(ast, child(node, 2)?, scope)?;
            this.hold(&left);
            let right = this.evaluate(ast, child(node, 3)?, scope)?;
            evaluate_binary(&left, &right, op)
        })
    }

    pub(super) fn eval_not(&mut self, ast: &SharedAst, node: &Node, scope: ScopeId) -> EvalResult {
        let operand = self.evaluate(ast, child(node, 2)?, scope)?;
        Ok(evaluate_not(&operand))
    }

    /// `target.field`. The field name is never evaluated, only read from
    /// the identifier node in slot 3.
    pub(super) fn eval_member(
        &mut self,
        ast: &SharedAst,
        node: &Node,
        scope: ScopeId,
    ) -> EvalResult {
        let target = self.evaluate(ast, child(node, 2)?, scope)?;
        let field_id = child(node, 3)?;
        let field_node = ast.get(field_id).ok_or_else(|| dangling_node(field_id))?;
        let field = text(field_node, 2)?;
        if target.is_null() {
            return Err(null_reference(field));
        }
        if field.is_empty() {
            return Err(empty_identifier());
        }
        read_member(&target, field)
    }

    pub(super) fn eval_array(&mut self, ast: &SharedAst, node: &Node, scope: ScopeId) -> EvalResult {
        let elements = list_elements(ast, node.slot(2))?;
        self.with_temporaries(|this| {
            let mut items = Vec::with_capacity(elements.len());
            for element in elements {
                let id = element
                    .as_node()
                    .ok_or_else(|| malformed_node(&node.kind, 2, "a list of expression nodes"))?;
                let item = this.evaluate(ast, id, scope)?;
                this.hold(&item);
                items.push(item);
            }
            Ok(Value::array(items))
        })
    }

    /// Map literal. Keys are evaluated then stringified; a later duplicate key
    /// overwrites an earlier one.
    pub(super) fn eval_map(&mut self, ast: &SharedAst, node: &Node, scope: ScopeId) -> EvalResult {
        let elements = list_elements(ast, node.slot(2))?;
        self.with_temporaries(|this| {
            let mut entries = BTreeMap::new();
            for element in elements {
                let pair = element
                    .as_node()
                    .and_then(|id| ast.get(id))
                    .ok_or_else(|| malformed_node(&node.kind, 2, "a list of PAIR nodes"))?;
                let key = this.evaluate(ast, child(pair, 2)?, scope)?.to_key();
                let value = this.evaluate(ast, child(pair, 3)?, scope)?;
                this.hold(&value);
                entries.insert(key, value);
            }
            Ok(Value::map(entries))
        })
    }

    /// `name[index]`. Missing keys and out-of-range positions read as null.
    pub(super) fn eval_index(&mut self, ast: &SharedAst, node: &Node, scope: ScopeId) -> EvalResult {
        let name = text(node, 2)?;
        let index = self.evaluate(ast, child(node, 3)?, scope)?;
        let (target, _) = self.scopes.lookup(scope, name)?;
        match &target {
            Value::Array(items) => Ok(index
                .as_index()
                .and_then(|i| items.borrow().get(i).cloned())
                .unwrap_or_default()),
            Value::Map(entries) => Ok(entries
                .borrow()
                .get(&index.to_key())
                .cloned()
                .unwrap_or_default()),
            other => Err(not_indexable(name, other)),
        }
    }
}

/// Read a named member. Maps yield the entry (null if absent); arrays and
/// strings expose `length`.
fn read_member(target: &Value, field: &str) -> EvalResult {
    match target {
        Value::Map(entries) => Ok(entries.borrow().get(field).cloned().unwrap_or_default()),
        Value::Array(items) if field == "length" => Ok(Value::count(items.borrow().len())),
        Value::Str(s) if field == "length" => Ok(Value::count(s.chars().count())),
        Value::Array(_) | Value::Str(_) => Ok(Value::Null),
        other => Err(no_member(field, other)),
    }
}

#![expect(clippy::unwrap_used, reason = "tests unwrap lookups that must succeed")]

use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn lookup_walks_to_parent() {
    let mut arena = ScopeArena::new();
    let root = arena.root();
    arena.declare(root, "x", Value::Number(1.0));
    let child = arena.make_child(root);
    let grandchild = arena.make_child(child);

    let (value, owner) = arena.lookup(grandchild, "x").unwrap();
    assert_eq!(value, Value::Number(1.0));
    assert_eq!(owner, root);
}

#[test]
fn unbound_name_fails() {
    let arena = ScopeArena::new();
    let err = arena.lookup(arena.root(), "missing").unwrap_err();
    assert_eq!(err.kind_name(), "UnboundName");
}

#[test]
fn declare_shadows_without_touching_outer() {
    let mut arena = ScopeArena::new();
    let root = arena.root();
    arena.declare(root, "x", Value::Number(1.0));
    let child = arena.make_child(root);
    arena.declare(child, "x", Value::Number(2.0));

    assert_eq!(arena.lookup(child, "x").unwrap().0, Value::Number(2.0));
    assert_eq!(arena.lookup(root, "x").unwrap().0, Value::Number(1.0));
}

#[test]
fn assign_writes_to_owner() {
    let mut arena = ScopeArena::new();
    let root = arena.root();
    arena.declare(root, "x", Value::Number(1.0));
    let child = arena.make_child(root);

    let owner = arena.assign(child, "x", Value::Number(5.0)).unwrap();
    assert_eq!(owner, root);
    assert_eq!(arena.lookup(root, "x").unwrap().0, Value::Number(5.0));
    assert!(arena.scope(child).get("x").is_none());
}

#[test]
fn assign_to_unbound_fails() {
    let mut arena = ScopeArena::new();
    let root = arena.root();
    assert!(arena.assign(root, "nope", Value::Null).is_err());
}

#[test]
fn signal_priority() {
    let mut arena = ScopeArena::new();
    let root = arena.root();
    assert_eq!(arena.effective_signal(root), None);

    arena.set_signal(root, Signal::Continue, Value::Number(3.0));
    arena.set_signal(root, Signal::Break, Value::Number(2.0));
    assert_eq!(arena.effective_signal(root), Some(Value::Number(2.0)));

    arena.set_signal(root, Signal::Exit, Value::Null);
    // Set-with-null still wins over break.
    assert_eq!(arena.effective_signal(root), Some(Value::Null));

    arena.reset_signals(root);
    assert_eq!(arena.effective_signal(root), None);
}

#[test]
fn propagate_copies_every_signal() {
    let mut arena = ScopeArena::new();
    let root = arena.root();
    let child = arena.make_child(root);
    arena.set_signal(child, Signal::Break, Value::Null);
    arena.set_signal(child, Signal::Continue, Value::Bool(true));

    arena.propagate_signals(child, root);
    assert_eq!(arena.signals(root).get(Signal::Break), Some(&Value::Null));
    assert_eq!(
        arena.signals(root).get(Signal::Continue),
        Some(&Value::Bool(true))
    );
    assert_eq!(arena.signals(root).get(Signal::Exit), None);
}

#[test]
fn release_frees_unretained_scopes() {
    let mut arena = ScopeArena::new();
    let root = arena.root();
    let child = arena.make_child(root);
    let _grandchild = arena.make_child(child);
    assert_eq!(arena.live_count(), 3);

    assert!(arena.release(child));
    assert_eq!(arena.live_count(), 1);
    assert!(!arena.contains(child));
    assert!(arena.scope(root).children().is_empty());
}

#[test]
fn release_keeps_retained_chain() {
    let mut arena = ScopeArena::new();
    let root = arena.root();
    let block = arena.make_child(root);
    let captured = arena.make_child(block);
    arena.retain(captured);

    assert!(!arena.release(block));
    assert!(arena.contains(block));
    assert!(arena.scope(block).is_retained());
    assert!(!arena.release(root));
}

#[test]
fn freed_slots_are_reused() {
    let mut arena = ScopeArena::new();
    let root = arena.root();
    let first = arena.make_child(root);
    arena.release(first);
    let second = arena.make_child(root);
    assert_eq!(first.raw(), second.raw());
    assert_eq!(arena.live_count(), 2);
}

#[test]
fn stale_handles_do_not_alias_reused_slots() {
    let mut arena = ScopeArena::new();
    let root = arena.root();
    let first = arena.make_child(root);
    arena.declare(first, "x", Value::Number(1.0));
    arena.release(first);
    let second = arena.make_child(root);

    assert_ne!(first, second);
    assert!(!arena.contains(first));
    assert!(arena.get(first).is_none());
    assert!(arena.contains(second));
    assert!(arena.scope(second).get("x").is_none());
}

#[test]
fn collect_keeps_scopes_captured_by_extra_values() {
    use std::sync::Arc;

    use crate::callable::Closure;
    use crate::Callable;

    let mut builder = ember_ir::AstBuilder::new();
    let body = builder.null();
    let ast = Arc::new(builder.finish(body));

    let mut arena = ScopeArena::new();
    let root = arena.root();
    let frame = arena.make_child(root);
    let captured = arena.make_child(frame);
    arena.retain(captured);
    let held = Value::array(vec![Value::Callable(Callable::closure(Closure {
        name: "inner".into(),
        params: Vec::new(),
        body: None,
        ast,
        scope: captured,
    }))]);

    assert_eq!(arena.collect_with_values([], std::slice::from_ref(&held)), 0);
    assert!(arena.contains(captured));
    assert!(arena.contains(frame));

    assert_eq!(arena.collect([]), 2);
    assert!(!arena.contains(captured));
}

#[test]
fn collect_sweeps_unreachable_retained_scopes() {
    let mut arena = ScopeArena::new();
    let root = arena.root();
    let captured = arena.make_child(root);
    arena.retain(captured);
    // Nothing refers to `captured` anymore.
    assert_eq!(arena.collect([]), 1);
    assert!(!arena.contains(captured));
    assert!(arena.scope(root).children().is_empty());
}

#[test]
fn collect_honors_extra_roots_and_ancestors() {
    let mut arena = ScopeArena::new();
    let root = arena.root();
    let outer = arena.make_child(root);
    let inner = arena.make_child(outer);
    let stray = arena.make_child(root);

    assert_eq!(arena.collect([inner]), 1);
    assert!(arena.contains(outer));
    assert!(arena.contains(inner));
    assert!(!arena.contains(stray));
}

proptest! {
    #[test]
    fn declared_values_visible_from_descendants(
        names in prop::collection::vec("[a-z]{1,6}", 1..8),
        depth in 0usize..6,
        n in -1e6f64..1e6,
    ) {
        let mut arena = ScopeArena::new();
        let root = arena.root();
        for name in &names {
            arena.declare(root, name.as_str(), Value::Number(n));
        }
        let mut scope = root;
        for _ in 0..depth {
            scope = arena.make_child(scope);
        }
        for name in &names {
            let (value, owner) = arena.lookup(scope, name).unwrap();
            prop_assert_eq!(value, Value::Number(n));
            prop_assert_eq!(owner, root);
        }
    }

    #[test]
    fn assignment_through_child_mutates_ancestor(
        depth in 1usize..6,
        before in -1e6f64..1e6,
        after in -1e6f64..1e6,
    ) {
        let mut arena = ScopeArena::new();
        let root = arena.root();
        arena.declare(root, "n", Value::Number(before));
        let mut scope = root;
        for _ in 0..depth {
            scope = arena.make_child(scope);
        }
        arena.assign(scope, "n", Value::Number(after)).unwrap();
        prop_assert_eq!(arena.lookup(root, "n").unwrap().0, Value::Number(after));
    }
}

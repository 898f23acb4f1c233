//! The scope chain, stored in an arena.
//!
//! Scopes are records in a slot vector addressed by [`ScopeId`]. A record
//! holds its bindings, a parent handle used only for lookup, the ids of the
//! children created from it, and its control-flow signals. Because handles
//! are plain indices, parent back-references and closure captures never form
//! ownership cycles. Handles carry the generation of their slot, so a handle
//! to a reclaimed scope never aliases the scope that reuses the slot.
//!
//! # Reclamation
//!
//! Block and call scopes are released eagerly when the construct that made
//! them finishes, unless a closure captured them (directly or through a
//! descendant), which marks the whole chain *retained*. Retained scopes are
//! reclaimed by [`ScopeArena::collect`], a mark-and-sweep from the root and
//! any extra roots the host supplies (pending callbacks, active frames).

mod signal;

pub use signal::{Signal, Signals};

use std::fmt;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::errors::unbound_name;
use crate::{EvalResult, Value};

/// Handle to a scope record in a [`ScopeArena`].
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct ScopeId {
    index: u32,
    generation: u32,
}

impl ScopeId {
    #[inline]
    const fn index(self) -> usize {
        self.index as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.index
    }

    #[inline]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScopeId({}v{})", self.index, self.generation)
    }
}

/// A single scope: bindings, lineage and signals.
#[derive(Debug)]
pub struct Scope {
    bindings: FxHashMap<String, Value>,
    parent: Option<ScopeId>,
    children: Vec<ScopeId>,
    signals: Signals,
    retained: bool,
}

impl Scope {
    fn new(parent: Option<ScopeId>) -> Self {
        Scope {
            bindings: FxHashMap::default(),
            parent,
            children: Vec::new(),
            signals: Signals::default(),
            retained: false,
        }
    }

    #[inline]
    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    #[inline]
    pub fn children(&self) -> &[ScopeId] {
        &self.children
    }

    #[inline]
    pub fn signals(&self) -> &Signals {
        &self.signals
    }

    /// Local binding only; does not walk the chain.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    #[inline]
    pub fn is_retained(&self) -> bool {
        self.retained
    }
}

/// One arena slot. `generation` is bumped every time the slot is freed.
struct Entry {
    generation: u32,
    scope: Option<Scope>,
}

/// Owner of every scope of one interpreter.
pub struct ScopeArena {
    slots: Vec<Entry>,
    free: Vec<u32>,
    root: ScopeId,
}

impl ScopeArena {
    /// An arena holding only the root scope.
    pub fn new() -> Self {
        let mut root = Scope::new(None);
        root.retained = true;
        ScopeArena {
            slots: vec![Entry {
                generation: 0,
                scope: Some(root),
            }],
            free: Vec::new(),
            root: ScopeId {
                index: 0,
                generation: 0,
            },
        }
    }

    #[inline]
    pub fn root(&self) -> ScopeId {
        self.root
    }

    /// Number of scopes currently allocated.
    pub fn live_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// True if `id` refers to a scope that has not been reclaimed.
    pub fn contains(&self, id: ScopeId) -> bool {
        self.get(id).is_some()
    }

    /// The record behind `id`, or `None` if it was reclaimed.
    pub fn get(&self, id: ScopeId) -> Option<&Scope> {
        self.slots
            .get(id.index())
            .filter(|entry| entry.generation == id.generation)
            .and_then(|entry| entry.scope.as_ref())
    }

    fn get_mut(&mut self, id: ScopeId) -> Option<&mut Scope> {
        self.slots
            .get_mut(id.index())
            .filter(|entry| entry.generation == id.generation)
            .and_then(|entry| entry.scope.as_mut())
    }

    /// The record behind `id`.
    ///
    /// # Panics
    /// Panics if `id` was reclaimed. Handles held by live closures and active
    /// frames are never reclaimed, so this indicates an engine bug.
    pub fn scope(&self, id: ScopeId) -> &Scope {
        self.get(id)
            .unwrap_or_else(|| panic!("use of reclaimed scope {id:?}"))
    }

    fn scope_mut(&mut self, id: ScopeId) -> &mut Scope {
        self.get_mut(id)
            .unwrap_or_else(|| panic!("use of reclaimed scope {id:?}"))
    }

    /// Allocate a new scope whose parent is `parent`.
    ///
    /// # Panics
    /// Panics if `parent` was reclaimed.
    pub fn make_child(&mut self, parent: ScopeId) -> ScopeId {
        let scope = Scope::new(Some(parent));
        let id = if let Some(index) = self.free.pop() {
            let entry = &mut self.slots[index as usize];
            entry.scope = Some(scope);
            ScopeId {
                index,
                generation: entry.generation,
            }
        } else {
            let index = u32::try_from(self.slots.len())
                .unwrap_or_else(|_| panic!("scope arena exceeded {} scopes", u32::MAX));
            self.slots.push(Entry {
                generation: 0,
                scope: Some(scope),
            });
            ScopeId {
                index,
                generation: 0,
            }
        };
        self.scope_mut(parent).children.push(id);
        id
    }

    /// Free the slot behind `id`, returning its record.
    fn free_slot(&mut self, id: ScopeId) -> Option<Scope> {
        let entry = self
            .slots
            .get_mut(id.index())
            .filter(|entry| entry.generation == id.generation)?;
        let scope = entry.scope.take()?;
        entry.generation = entry.generation.wrapping_add(1);
        self.free.push(id.index);
        Some(scope)
    }

    /// Bind `name` in `id` itself, shadowing any outer binding.
    pub fn declare(&mut self, id: ScopeId, name: impl Into<String>, value: Value) {
        self.scope_mut(id).bindings.insert(name.into(), value);
    }

    /// The scope on the chain from `id` that binds `name`.
    pub fn resolve(&self, id: ScopeId, name: &str) -> EvalResult<ScopeId> {
        let mut current = Some(id);
        while let Some(scope_id) = current {
            let scope = self.scope(scope_id);
            if scope.bindings.contains_key(name) {
                return Ok(scope_id);
            }
            current = scope.parent;
        }
        Err(unbound_name(name))
    }

    /// Look `name` up along the chain, returning the value and its owner.
    pub fn lookup(&self, id: ScopeId, name: &str) -> EvalResult<(Value, ScopeId)> {
        let owner = self.resolve(id, name)?;
        let value = self.scope(owner).get(name).cloned().unwrap_or_default();
        Ok((value, owner))
    }

    /// Overwrite `name` in the scope that owns it.
    pub fn assign(&mut self, id: ScopeId, name: &str, value: Value) -> EvalResult<ScopeId> {
        let owner = self.resolve(id, name)?;
        self.declare(owner, name, value);
        Ok(owner)
    }

    // Signals

    pub fn signals(&self, id: ScopeId) -> &Signals {
        &self.scope(id).signals
    }

    /// The scope's collapsed control-flow state.
    pub fn effective_signal(&self, id: ScopeId) -> Option<Value> {
        self.scope(id).signals.effective().cloned()
    }

    pub fn set_signal(&mut self, id: ScopeId, signal: Signal, value: Value) {
        self.scope_mut(id).signals.set(signal, value);
    }

    pub fn take_signal(&mut self, id: ScopeId, signal: Signal) -> Option<Value> {
        self.scope_mut(id).signals.take(signal)
    }

    pub fn reset_signals(&mut self, id: ScopeId) {
        self.scope_mut(id).signals.reset();
    }

    /// Copy every signal set on `child` onto `parent`.
    pub fn propagate_signals(&mut self, child: ScopeId, parent: ScopeId) {
        for signal in Signal::ALL {
            if let Some(value) = self.scope(child).signals.get(signal).cloned() {
                self.set_signal(parent, signal, value);
            }
        }
    }

    // Reclamation

    /// Keep `id` and all its ancestors alive past eager release.
    pub fn retain(&mut self, id: ScopeId) {
        let mut current = Some(id);
        while let Some(scope_id) = current {
            let scope = self.scope_mut(scope_id);
            if scope.retained {
                break;
            }
            scope.retained = true;
            current = scope.parent;
        }
    }

    /// Eagerly reclaim a finished block or call scope.
    ///
    /// Does nothing for the root or a retained scope. Any children left
    /// behind (by an aborted evaluation) go with it. Returns whether the scope
    /// was reclaimed.
    pub fn release(&mut self, id: ScopeId) -> bool {
        let scope = self.scope(id);
        if id == self.root || scope.retained {
            return false;
        }
        let parent = scope.parent;
        if let Some(parent) = parent.and_then(|p| self.get_mut(p)) {
            parent.children.retain(|&child| child != id);
        }
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(scope) = self.free_slot(next) {
                pending.extend(scope.children);
            }
        }
        true
    }

    /// Reclaim every scope unreachable from the root or `extra_roots`.
    ///
    /// A scope is reachable if it is a root, the parent of a reachable scope,
    /// or captured by a closure stored (at any depth) in a reachable scope's
    /// bindings or signals. Returns the number of scopes reclaimed.
    pub fn collect(&mut self, extra_roots: impl IntoIterator<Item = ScopeId>) -> usize {
        self.collect_with_values(extra_roots, &[])
    }

    /// [`ScopeArena::collect`], also keeping alive every scope captured by a
    /// closure inside `extra_values` (values the host holds outside any
    /// scope).
    pub fn collect_with_values(
        &mut self,
        extra_roots: impl IntoIterator<Item = ScopeId>,
        extra_values: &[Value],
    ) -> usize {
        let mut marked = vec![false; self.slots.len()];
        let mut visited_containers = FxHashSet::default();
        let mut pending: Vec<ScopeId> = extra_roots.into_iter().collect();
        pending.push(self.root);
        for value in extra_values {
            trace_value(value, &mut pending, &mut visited_containers);
        }

        while let Some(id) = pending.pop() {
            let Some(scope) = self.get(id) else {
                continue;
            };
            if std::mem::replace(&mut marked[id.index()], true) {
                continue;
            }
            pending.extend(scope.parent);
            for value in scope.bindings.values().chain(scope.signals.values()) {
                trace_value(value, &mut pending, &mut visited_containers);
            }
        }

        let mut freed = 0;
        for (index, entry) in self.slots.iter_mut().enumerate() {
            let Some(scope) = &mut entry.scope else {
                continue;
            };
            if marked[index] {
                scope.children.retain(|child| marked[child.index()]);
            } else {
                entry.scope = None;
                entry.generation = entry.generation.wrapping_add(1);
                // Slot count never exceeds u32::MAX (checked in make_child).
                self.free.push(u32::try_from(index).unwrap_or(u32::MAX));
                freed += 1;
            }
        }
        freed
    }
}

impl Default for ScopeArena {
    fn default() -> Self {
        Self::new()
    }
}

/// Push every scope captured by closures inside `value`.
fn trace_value(value: &Value, pending: &mut Vec<ScopeId>, visited: &mut FxHashSet<*const ()>) {
    let mut stack = vec![value.clone()];
    while let Some(value) = stack.pop() {
        match &value {
            Value::Callable(callable) => pending.extend(callable.captured_scope()),
            Value::Array(items) => {
                if visited.insert(items.addr()) {
                    stack.extend(items.borrow().iter().cloned());
                }
            }
            Value::Map(entries) => {
                if visited.insert(entries.addr()) {
                    stack.extend(entries.borrow().values().cloned());
                }
            }
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::Str(_) => {}
        }
    }
}

#[cfg(test)]
mod tests;

//! Callables: user closures and host primitives behind one type.
//!
//! Both variants are invoked through `Interpreter::invoke`; the dispatcher
//! never needs to know which one it holds.

use std::fmt;
use std::rc::Rc;

use ember_ir::{NodeId, SharedAst};

use crate::{EvalResult, Interpreter, ScopeId, Value};

/// Signature of a host primitive.
pub type PrimitiveFn = fn(&mut Interpreter, Vec<Value>) -> EvalResult;

/// A named host function.
#[derive(Clone, Copy)]
pub struct Primitive {
    name: &'static str,
    func: PrimitiveFn,
}

impl Primitive {
    pub const fn new(name: &'static str, func: PrimitiveFn) -> Self {
        Primitive { name, func }
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn call(&self, interpreter: &mut Interpreter, args: Vec<Value>) -> EvalResult {
        (self.func)(interpreter, args)
    }
}

/// A user function together with the scope it closes over.
pub struct Closure {
    pub name: String,
    pub params: Vec<String>,
    /// `None` for an empty body.
    pub body: Option<NodeId>,
    /// The arena `body` indexes into.
    pub ast: SharedAst,
    /// Child of the declaration-site scope, created when the function was
    /// declared. Call frames are children of this scope.
    pub scope: ScopeId,
}

#[derive(Clone)]
pub enum Callable {
    Closure(Rc<Closure>),
    Primitive(Primitive),
}

impl Callable {
    pub fn closure(closure: Closure) -> Self {
        Callable::Closure(Rc::new(closure))
    }

    pub fn name(&self) -> &str {
        match self {
            Callable::Closure(c) => &c.name,
            Callable::Primitive(p) => p.name,
        }
    }

    /// The scope a closure keeps alive. Primitives have none.
    pub fn captured_scope(&self) -> Option<ScopeId> {
        match self {
            Callable::Closure(c) => Some(c.scope),
            Callable::Primitive(_) => None,
        }
    }

    /// Identity comparison: the same closure object, or the same primitive.
    pub fn ptr_eq(&self, other: &Callable) -> bool {
        match (self, other) {
            (Callable::Closure(a), Callable::Closure(b)) => Rc::ptr_eq(a, b),
            (Callable::Primitive(a), Callable::Primitive(b)) => a.name == b.name,
            _ => false,
        }
    }
}

impl fmt::Display for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callable::Closure(c) => write!(f, "<function {}>", c.name),
            Callable::Primitive(p) => write!(f, "<builtin {}>", p.name),
        }
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

//! Runtime values.
//!
//! Scalars and strings behave as values. Arrays, maps and callables are
//! shared handles: a mutation through one binding is visible through every
//! other binding of the same container. Scripts may build self-referential
//! containers; nothing here relies on the graph being acyclic, and `Display`
//! guards against cycles.
//!
//! Containers may also nest arbitrarily deep. Dropping the last handle tears
//! the tree down with a work list, and printing and structural equality grow
//! the stack on demand.

use std::cell::{Ref, RefCell, RefMut};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashSet;

use crate::stack::ensure_sufficient_stack;
use crate::Callable;

/// Element storage of a container value.
pub trait Container {
    /// Move every element out into `out`.
    fn drain_into(&mut self, out: &mut Vec<Value>);
}

impl Container for Vec<Value> {
    fn drain_into(&mut self, out: &mut Vec<Value>) {
        out.append(self);
    }
}

impl Container for BTreeMap<String, Value> {
    fn drain_into(&mut self, out: &mut Vec<Value>) {
        out.extend(std::mem::take(self).into_values());
    }
}

/// Single-threaded shared, mutable cell for container values.
///
/// Wraps `Rc<RefCell<T>>` so every container allocation goes through
/// [`Shared::new`], and identity comparisons go through [`Shared::ptr_eq`].
#[repr(transparent)]
pub struct Shared<T: Container>(Rc<RefCell<T>>);

impl<T: Container> Shared<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        Shared(Rc::new(RefCell::new(value)))
    }

    #[inline]
    pub fn borrow(&self) -> Ref<'_, T> {
        self.0.borrow()
    }

    #[inline]
    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.0.borrow_mut()
    }

    /// True if both handles point at the same container.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Address of the container, for identity sets.
    #[inline]
    pub fn addr(&self) -> *const () {
        Rc::as_ptr(&self.0).cast::<()>()
    }

    /// If this is the last handle, move the elements out into `out`.
    fn drain_if_last(&self, out: &mut Vec<Value>) {
        if Rc::strong_count(&self.0) == 1 {
            if let Ok(mut contents) = self.0.try_borrow_mut() {
                contents.drain_into(out);
            }
        }
    }
}

impl<T: Container> Clone for Shared<T> {
    #[inline]
    fn clone(&self) -> Self {
        Shared(Rc::clone(&self.0))
    }
}

/// Releasing the last handle empties the container before it is freed, and
/// nested containers it owned are emptied from the same work list, so
/// teardown depth does not follow nesting depth.
impl<T: Container> Drop for Shared<T> {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.drain_if_last(&mut pending);
        while let Some(value) = pending.pop() {
            match &value {
                Value::Array(items) => items.drain_if_last(&mut pending),
                Value::Map(entries) => entries.drain_if_last(&mut pending),
                _ => {}
            }
        }
    }
}

impl<T: Container + Default> Default for Shared<T> {
    fn default() -> Self {
        Shared::new(T::default())
    }
}

pub type Array = Shared<Vec<Value>>;
pub type Map = Shared<BTreeMap<String, Value>>;

/// A runtime value.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Str(Rc<str>),
    Array(Array),
    Map(Map),
    Callable(Callable),
}

impl Value {
    pub fn string(text: impl AsRef<str>) -> Self {
        Value::Str(Rc::from(text.as_ref()))
    }

    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Shared::new(items))
    }

    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Map(Shared::new(
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    /// A count as a number value.
    #[expect(
        clippy::cast_precision_loss,
        reason = "container sizes stay far below 2^53"
    )]
    pub fn count(n: usize) -> Self {
        Value::Number(n as f64)
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Null, booleans and numbers: the operands `+` will splice into a string.
    #[inline]
    pub fn is_scalar(&self) -> bool {
        matches!(self, Value::Null | Value::Bool(_) | Value::Number(_))
    }

    /// Boolean coercion used by conditions and `!`.
    ///
    /// Falsy: null, `false`, `0`, `NaN` and the empty string. Everything
    /// else, including empty containers, is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Str(s) => !s.is_empty(),
            Value::Array(_) | Value::Map(_) | Value::Callable(_) => true,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
            Value::Callable(_) => "function",
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_ref()),
            _ => None,
        }
    }

    pub fn as_callable(&self) -> Option<&Callable> {
        match self {
            Value::Callable(c) => Some(c),
            _ => None,
        }
    }

    /// Language-level `==`.
    ///
    /// Values of different types are never equal. Scalars and strings compare
    /// by value; arrays, maps and callables compare by identity.
    pub fn strict_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a.ptr_eq(b),
            (Value::Map(a), Value::Map(b)) => a.ptr_eq(b),
            (Value::Callable(a), Value::Callable(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// The string used when this value is a map key.
    pub fn to_key(&self) -> String {
        match self {
            Value::Str(s) => s.to_string(),
            other => other.to_string(),
        }
    }

    /// The value as a non-negative integer array position, if it is one.
    ///
    /// Strings count only in the form a number key is stringified to (`"3"`,
    /// never `"+3"` or `"03"`).
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Value::Number(n) => number_to_index(*n),
            Value::Str(s) => string_to_index(s),
            _ => None,
        }
    }
}

fn string_to_index(s: &str) -> Option<usize> {
    let canonical = match s.as_bytes() {
        [] => false,
        [b'0'] => true,
        [b'0', ..] => false,
        digits => digits.iter().all(u8::is_ascii_digit),
    };
    if canonical {
        s.parse().ok()
    } else {
        None
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "range and integrality are checked first"
)]
fn number_to_index(n: f64) -> Option<usize> {
    // 2^53: beyond this f64 no longer holds every integer
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    (n >= 0.0 && n.fract() == 0.0 && n < MAX_EXACT).then(|| n as usize)
}

/// Structural equality for host code and tests.
///
/// Containers compare by contents; use [`Value::strict_eq`] for the
/// language's identity semantics. Comparing two distinct cyclic containers
/// does not terminate.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Array(a), Value::Array(b)) => {
                a.ptr_eq(b) || ensure_sufficient_stack(|| *a.borrow() == *b.borrow())
            }
            (Value::Map(a), Value::Map(b)) => {
                a.ptr_eq(b) || ensure_sufficient_stack(|| *a.borrow() == *b.borrow())
            }
            _ => self.strict_eq(other),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<Callable> for Value {
    fn from(c: Callable) -> Self {
        Value::Callable(c)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(f, self, &mut FxHashSet::default(), false)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Number(n) => write!(f, "Number({n})"),
            Value::Str(s) => write!(f, "Str({s:?})"),
            Value::Array(_) => write!(f, "Array({})", DisplayNested(self)),
            Value::Map(_) => write!(f, "Map({})", DisplayNested(self)),
            Value::Callable(c) => write!(f, "Callable({c})"),
        }
    }
}

/// Formats with nested quoting so strings inside `Debug` output stay quoted.
struct DisplayNested<'a>(&'a Value);

impl fmt::Display for DisplayNested<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(f, self.0, &mut FxHashSet::default(), true)
    }
}

/// Write `value`. `seen` holds the containers currently being written, so a
/// container reached again through itself prints as `[...]` / `{...}`.
fn write_value(
    f: &mut fmt::Formatter<'_>,
    value: &Value,
    seen: &mut FxHashSet<*const ()>,
    nested: bool,
) -> fmt::Result {
    match value {
        Value::Null => f.write_str("null"),
        Value::Bool(b) => write!(f, "{b}"),
        Value::Number(n) => write_number(f, *n),
        Value::Str(s) if nested => write!(f, "{s:?}"),
        Value::Str(s) => f.write_str(s),
        Value::Array(items) => {
            if !seen.insert(items.addr()) {
                return f.write_str("[...]");
            }
            f.write_str("[")?;
            for (i, item) in items.borrow().iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                ensure_sufficient_stack(|| write_value(f, item, seen, true))?;
            }
            seen.remove(&items.addr());
            f.write_str("]")
        }
        Value::Map(entries) => {
            if !seen.insert(entries.addr()) {
                return f.write_str("{...}");
            }
            f.write_str("{")?;
            for (i, (key, item)) in entries.borrow().iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{key:?}: ")?;
                ensure_sufficient_stack(|| write_value(f, item, seen, true))?;
            }
            seen.remove(&entries.addr());
            f.write_str("}")
        }
        Value::Callable(c) => write!(f, "{c}"),
    }
}

/// Integral numbers print without a fractional part (`3`, not `3.0`).
fn write_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_nan() {
        f.write_str("NaN")
    } else if n.is_infinite() {
        f.write_str(if n > 0.0 { "Infinity" } else { "-Infinity" })
    } else if n == 0.0 {
        // -0 prints as 0
        f.write_str("0")
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        write!(f, "{n:.0}")
    } else {
        write!(f, "{n}")
    }
}

//! Control-flow signals.
//!
//! A scope carries three independent slots, one per signal kind. Each slot
//! is either unset or set with a value; "set with null" is distinct from
//! unset.

use crate::Value;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Signal {
    /// `return`
    Exit,
    Break,
    Continue,
}

impl Signal {
    pub const ALL: [Signal; 3] = [Signal::Exit, Signal::Break, Signal::Continue];
}

#[derive(Clone, Debug, Default)]
pub struct Signals {
    exit: Option<Value>,
    brk: Option<Value>,
    cont: Option<Value>,
}

impl Signals {
    /// The collapsed state: exit, else break, else continue.
    pub fn effective(&self) -> Option<&Value> {
        self.exit
            .as_ref()
            .or(self.brk.as_ref())
            .or(self.cont.as_ref())
    }

    pub fn is_set(&self) -> bool {
        self.effective().is_some()
    }

    pub fn get(&self, signal: Signal) -> Option<&Value> {
        self.slot(signal).as_ref()
    }

    pub fn set(&mut self, signal: Signal, value: Value) {
        *self.slot_mut(signal) = Some(value);
    }

    /// Clear one slot, returning what it held.
    pub fn take(&mut self, signal: Signal) -> Option<Value> {
        self.slot_mut(signal).take()
    }

    pub fn reset(&mut self) {
        *self = Signals::default();
    }

    /// Every carried value, for reachability tracing.
    pub(crate) fn values(&self) -> impl Iterator<Item = &Value> {
        [&self.exit, &self.brk, &self.cont]
            .into_iter()
            .filter_map(Option::as_ref)
    }

    fn slot(&self, signal: Signal) -> &Option<Value> {
        match signal {
            Signal::Exit => &self.exit,
            Signal::Break => &self.brk,
            Signal::Continue => &self.cont,
        }
    }

    fn slot_mut(&mut self, signal: Signal) -> &mut Option<Value> {
        match signal {
            Signal::Exit => &mut self.exit,
            Signal::Break => &mut self.brk,
            Signal::Continue => &mut self.cont,
        }
    }
}

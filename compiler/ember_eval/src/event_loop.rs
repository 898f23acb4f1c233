//! Deferred work queued by `setTimeout` and `input`.
//!
//! The evaluator never blocks on these built-ins: they enqueue a callback and
//! return null. The host drains the queue after the program finishes (see
//! `Interpreter::run_event_loop`), one task at a time on the same thread.
//!
//! Ordering: pending line requests run first, in request order, then timers
//! by due time, ties broken by scheduling order.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

use crate::Callable;

/// A unit of deferred work, ready to run.
pub enum Task {
    /// Invoke `callback` with the next line of input.
    ReadLine { callback: Callable },
    /// Invoke `callback` with no arguments once `due_ms` has passed.
    Timer { due_ms: f64, callback: Callable },
}

struct Timer {
    due_ms: f64,
    seq: u64,
    callback: Callable,
}

impl PartialEq for Timer {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Timer {}

impl PartialOrd for Timer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timer {
    /// Reversed, so the max-heap pops the earliest timer.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due_ms
            .total_cmp(&self.due_ms)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[derive(Default)]
pub struct EventLoop {
    timers: BinaryHeap<Timer>,
    line_requests: VecDeque<Callable>,
    next_seq: u64,
}

impl EventLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule_timer(&mut self, due_ms: f64, callback: Callable) {
        tracing::debug!(due_ms, callback = %callback, "timer scheduled");
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.push(Timer {
            due_ms,
            seq,
            callback,
        });
    }

    pub fn request_line(&mut self, callback: Callable) {
        tracing::debug!(callback = %callback, "line requested");
        self.line_requests.push_back(callback);
    }

    /// Number of tasks waiting to run.
    pub fn pending(&self) -> usize {
        self.timers.len() + self.line_requests.len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending() == 0
    }

    /// Remove the next task to run.
    pub fn next_task(&mut self) -> Option<Task> {
        if let Some(callback) = self.line_requests.pop_front() {
            return Some(Task::ReadLine { callback });
        }
        self.timers.pop().map(|timer| Task::Timer {
            due_ms: timer.due_ms,
            callback: timer.callback,
        })
    }

    /// Every queued callback, for reachability tracing.
    pub fn callbacks(&self) -> impl Iterator<Item = &Callable> {
        self.line_requests
            .iter()
            .chain(self.timers.iter().map(|timer| &timer.callback))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::lookup_builtin;
    use pretty_assertions::assert_eq;

    fn callback(name: &str) -> Callable {
        match lookup_builtin(name) {
            Some(primitive) => Callable::Primitive(primitive),
            None => panic!("no builtin {name}"),
        }
    }

    fn drain(events: &mut EventLoop) -> Vec<String> {
        std::iter::from_fn(|| events.next_task())
            .map(|task| match task {
                Task::ReadLine { callback } => format!("line:{}", callback.name()),
                Task::Timer { due_ms, callback } => format!("{due_ms}:{}", callback.name()),
            })
            .collect()
    }

    #[test]
    fn timers_run_by_due_time_then_order() {
        let mut events = EventLoop::new();
        events.schedule_timer(30.0, callback("print"));
        events.schedule_timer(10.0, callback("len"));
        events.schedule_timer(30.0, callback("time"));
        events.schedule_timer(20.0, callback("rand"));
        assert_eq!(events.pending(), 4);
        assert_eq!(
            drain(&mut events),
            vec!["10:len", "20:rand", "30:print", "30:time"]
        );
        assert!(events.is_idle());
    }

    #[test]
    fn line_requests_run_first() {
        let mut events = EventLoop::new();
        events.schedule_timer(0.0, callback("time"));
        events.request_line(callback("print"));
        events.request_line(callback("len"));
        assert_eq!(
            drain(&mut events),
            vec!["line:print", "line:len", "0:time"]
        );
    }

    #[test]
    fn callbacks_lists_everything_queued() {
        let mut events = EventLoop::new();
        events.schedule_timer(5.0, callback("time"));
        events.request_line(callback("print"));
        let mut names: Vec<&str> = events.callbacks().map(Callable::name).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["print", "time"]);
    }
}

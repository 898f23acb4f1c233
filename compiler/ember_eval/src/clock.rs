//! Time source for `time` and `setTimeout`.
//!
//! Timestamps are epoch milliseconds as `f64`, the unit scripts see. The
//! manual clock never sleeps: waiting for a timer advances it to the due
//! time, which makes timer-driven programs deterministic in tests.

use std::cell::Cell;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[derive(Default)]
pub enum Clock {
    /// Wall-clock time; waiting sleeps the thread.
    #[default]
    System,
    /// Virtual time in epoch milliseconds.
    Manual(Cell<f64>),
}

impl Clock {
    pub fn system() -> Self {
        Clock::System
    }

    pub fn manual(start_ms: f64) -> Self {
        Clock::Manual(Cell::new(start_ms))
    }

    /// Current time in epoch milliseconds.
    pub fn now_ms(&self) -> f64 {
        match self {
            Clock::System => SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map_or(0.0, |elapsed| elapsed.as_secs_f64() * 1000.0),
            Clock::Manual(now) => now.get(),
        }
    }

    /// Block until `due_ms`. Returns immediately if it has already passed.
    pub fn sleep_until(&self, due_ms: f64) {
        match self {
            Clock::System => {
                let remaining = due_ms - self.now_ms();
                if remaining > 0.0 {
                    std::thread::sleep(Duration::from_secs_f64(remaining / 1000.0));
                }
            }
            Clock::Manual(now) => {
                if due_ms > now.get() {
                    now.set(due_ms);
                }
            }
        }
    }

    /// Move a manual clock forward. No effect on the system clock.
    pub fn advance(&self, ms: f64) {
        if let Clock::Manual(now) = self {
            now.set(now.get() + ms);
        }
    }
}

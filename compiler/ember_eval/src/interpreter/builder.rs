//! `InterpreterBuilder` for configuring an [`Interpreter`].

use super::Interpreter;
use crate::clock::Clock;
use crate::event_loop::EventLoop;
use crate::input::InputSource;
use crate::random::RandomSource;
use crate::{stdout_handler, ScopeArena, SharedPrintHandler};

/// Script-level call depth at which evaluation fails with `RecursionLimit`.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 10_000;

/// Live scope count below which call boundaries never trigger a collection.
pub const DEFAULT_COLLECT_THRESHOLD: usize = 256;

/// Builder for creating Interpreter instances with various configurations.
///
/// Every host capability defaults to the real thing (stdout, stdin, the
/// system clock, OS entropy); tests swap in buffers, scripted lines, a manual
/// clock and a seed.
pub struct InterpreterBuilder {
    print_handler: Option<SharedPrintHandler>,
    input: InputSource,
    clock: Clock,
    seed: Option<u64>,
    max_call_depth: usize,
    collect_threshold: usize,
}

impl InterpreterBuilder {
    pub fn new() -> Self {
        Self {
            print_handler: None,
            input: InputSource::default(),
            clock: Clock::default(),
            seed: None,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            collect_threshold: DEFAULT_COLLECT_THRESHOLD,
        }
    }

    /// Where `print` and `input` prompts go. Default is stdout.
    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = Some(handler);
        self
    }

    /// Where `input` reads lines from. Default is stdin.
    #[must_use]
    pub fn input(mut self, input: InputSource) -> Self {
        self.input = input;
        self
    }

    /// Time source for `time` and timers. Default is the system clock.
    #[must_use]
    pub fn clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Make `rand` reproducible.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    /// Minimum live scope count before a call boundary collects. A small
    /// value makes collection run at nearly every call.
    #[must_use]
    pub fn collect_threshold(mut self, threshold: usize) -> Self {
        self.collect_threshold = threshold.max(1);
        self
    }

    pub fn build(self) -> Interpreter {
        Interpreter {
            scopes: ScopeArena::new(),
            events: EventLoop::new(),
            print_handler: self.print_handler.unwrap_or_else(stdout_handler),
            input: self.input,
            clock: self.clock,
            random: self
                .seed
                .map_or_else(RandomSource::from_entropy, RandomSource::seeded),
            max_call_depth: self.max_call_depth,
            call_depth: 0,
            active_scopes: Vec::new(),
            temporaries: Vec::new(),
            collect_threshold: self.collect_threshold,
            next_collection: self.collect_threshold,
        }
    }
}

impl Default for InterpreterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

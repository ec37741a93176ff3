//! Timestamped action log for editor operations.
//!
//! The grid writes one human-readable line per add / remove / clear. Time comes
//! from a `Clock` and lines go to a `LogSink`, both supplied by the caller.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Instant;

pub trait Clock {
    /// Seconds since some fixed origin.
    fn now(&self) -> f64;
}

pub trait LogSink {
    fn write_line(&mut self, line: &str);
}

/// Wall-clock seconds since construction.
#[derive(Debug)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// Clock driven by whoever holds a clone of the handle (the replay loop).
#[derive(Debug, Clone, Default)]
pub struct ManualClock(Rc<Cell<f64>>);

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, seconds: f64) {
        self.0.set(seconds);
    }

    pub fn advance(&self, seconds: f64) {
        self.0.set(self.0.get() + seconds);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.0.get()
    }
}

/// Forwards action lines to the `log` facade.
#[derive(Debug, Default)]
pub struct LogCrateSink;

impl LogSink for LogCrateSink {
    fn write_line(&mut self, line: &str) {
        log::info!(target: "gridplace::actions", "{line}");
    }
}

/// Shared in-memory buffer; clones see the same lines.
#[derive(Debug, Clone, Default)]
pub struct MemorySink(Rc<RefCell<Vec<String>>>);

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

impl LogSink for MemorySink {
    fn write_line(&mut self, line: &str) {
        self.0.borrow_mut().push(line.to_string());
    }
}

pub struct ActionLog {
    clock: Box<dyn Clock>,
    sink: Box<dyn LogSink>,
}

impl ActionLog {
    pub fn new(clock: impl Clock + 'static, sink: impl LogSink + 'static) -> Self {
        Self {
            clock: Box::new(clock),
            sink: Box::new(sink),
        }
    }

    pub fn write(&mut self, action: &str) {
        let line = format!("{action}  time = {:.3}", self.clock.now());
        self.sink.write_line(&line);
    }
}

impl Default for ActionLog {
    fn default() -> Self {
        Self::new(SystemClock::new(), LogCrateSink)
    }
}

impl std::fmt::Debug for ActionLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionLog")
            .field("now", &self.clock.now())
            .finish_non_exhaustive()
    }
}

// Time sources for step and suite timing

use serde::Serializer;
use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Source of elapsed time for the aggregator.
///
/// `now` returns the time elapsed since an arbitrary, clock-specific epoch.
/// Only differences between two readings are meaningful.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Monotonic wall clock
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        #[cfg(miri)]
        {
            Duration::ZERO
        }
        #[cfg(not(miri))]
        {
            self.origin.elapsed()
        }
    }
}

/// Settable clock shared between clones.
///
/// Used to replay recorded event logs and to drive deterministic tests:
/// every clone observes the same reading.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    current: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward by `delta`
    pub fn advance(&self, delta: Duration) {
        self.current.set(self.current.get() + delta);
    }

    /// Jump to an absolute reading. Readings never move backwards.
    pub fn set(&self, at: Duration) {
        if at > self.current.get() {
            self.current.set(at);
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.current.get()
    }
}

/// Render a duration as `<minutes>m<seconds>s`, e.g. `1m2.500s`
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs_f64();
    let minutes = (total / 60.0).floor();
    let seconds = total - minutes * 60.0;
    format!("{}m{:.3}s", minutes as u64, seconds)
}

/// Serialize a duration as fractional seconds
pub fn serialize_secs<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64(duration.as_secs_f64())
}

//! Time sources.

use std::time::{SystemTime, UNIX_EPOCH};

/// A source of "now", in the same unit as token end of life values.
///
/// Implementations must be safe to call from several threads at once; the
/// service adds no synchronization of its own.
pub trait Clock: Send + Sync {
    /// Current time, milliseconds since the Unix epoch by convention.
    fn now_millis(&self) -> i64;
}

impl<F> Clock for F
where
    F: Fn() -> i64 + Send + Sync,
{
    fn now_millis(&self) -> i64 {
        self()
    }
}

/// The system wall clock, millisecond precision.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(elapsed) => elapsed.as_millis() as i64,
            Err(before) => -(before.duration().as_millis() as i64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_after_2020() {
        assert!(SystemClock.now_millis() > 1_577_836_800_000);
    }

    #[test]
    fn test_closure_clock() {
        let clock = || 1267833600000i64;
        assert_eq!(clock.now_millis(), 1267833600000);
    }
}

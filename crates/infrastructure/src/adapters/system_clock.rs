//! System clock adapter

use chrono::{DateTime, Utc};
use nimbus_application::Clock;

/// `Clock` implementation backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Creates a new system clock.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_advances() {
        let clock = SystemClock::new();
        let ms = clock.now_ms();
        assert!(ms > 1_600_000_000_000);
        assert!(clock.now_ms() >= ms);
    }
}

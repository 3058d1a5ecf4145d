use std::time::{SystemTime, UNIX_EPOCH};

use pc_core::ports::ClockPort;

pub struct SystemClock;

impl ClockPort for SystemClock {
    /// Milliseconds since the Unix epoch; a clock set before 1970 reads as 0.
    fn now_ms(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as i64)
            .unwrap_or(0)
    }
}

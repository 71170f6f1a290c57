use crate::ports::Clock;

/// Real time via chrono (uses `Date.now()` under wasm32 with `wasmbind`).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        chrono::Utc::now().timestamp_millis().max(0) as u64
    }
}

//! Politeness delay: a uniform random pause between consecutive network
//! operations. The paginator and flattener are delay-agnostic; the
//! orchestrator owns when pauses happen.

use rand::Rng;
use std::time::Duration;

#[derive(Clone, Copy, Debug)]
pub struct JitterDelay {
    min_s: f64,
    max_s: f64,
}

impl JitterDelay {
    pub fn new(min_s: f64, max_s: f64) -> Self {
        let min_s = min_s.max(0.0);
        Self { min_s, max_s: max_s.max(min_s) }
    }

    /// Sleep for a uniformly random duration in `[min_s, max_s]` seconds.
    /// A zero upper bound disables sleeping entirely (used by tests).
    pub fn pause(&self) {
        if self.max_s <= 0.0 {
            return;
        }
        let delay = rand::thread_rng().gen_range(self.min_s..=self.max_s);
        tracing::debug!("sleeping {:.2}s", delay);
        std::thread::sleep(Duration::from_secs_f64(delay));
    }
}

//! Fixed-interval throttle with a trailing call.
//!
//! Time is passed in by the caller (milliseconds, any monotonic origin) so the
//! same logic runs under the browser clock and in tests. A call inside the
//! interval doesn't run; it arms a single trailing run at the end of the
//! interval, which the owner fires from its tick via [`Throttle::poll`].

#[cfg(test)]
#[path = "throttle_test.rs"]
mod throttle_test;

#[derive(Debug, Clone)]
pub struct Throttle {
    interval_ms: f64,
    last_run_ms: Option<f64>,
    trailing_due_ms: Option<f64>,
}

impl Throttle {
    #[must_use]
    pub fn new(interval_ms: f64) -> Self {
        Self { interval_ms: interval_ms.max(0.0), last_run_ms: None, trailing_due_ms: None }
    }

    /// Register a call at `now_ms`. Returns `true` if it should run right away.
    pub fn call(&mut self, now_ms: f64) -> bool {
        match self.last_run_ms {
            Some(last) if now_ms - last < self.interval_ms => {
                if self.trailing_due_ms.is_none() {
                    self.trailing_due_ms = Some(last + self.interval_ms);
                }
                false
            }
            _ => {
                self.last_run_ms = Some(now_ms);
                self.trailing_due_ms = None;
                true
            }
        }
    }

    /// Returns `true` (once) when an armed trailing run has come due.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        match self.trailing_due_ms {
            Some(due) if now_ms >= due => {
                self.trailing_due_ms = None;
                self.last_run_ms = Some(now_ms);
                true
            }
            _ => false,
        }
    }

    /// Drop any armed trailing run.
    pub fn cancel(&mut self) {
        self.trailing_due_ms = None;
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.trailing_due_ms.is_some()
    }
}

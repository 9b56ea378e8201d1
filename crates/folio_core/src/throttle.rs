//! Rate limiting for high-frequency page events
//!
//! Scroll and resize fire far more often than the page needs to recompute
//! anything. Both limiters are pure functions of the timestamps they are
//! given, so they work with the virtual clock.

/// Leading-edge throttle: the first call runs, calls inside the following
/// `limit_ms` window are dropped.
#[derive(Clone, Debug)]
pub struct Throttle {
    limit_ms: u64,
    open_at: Option<u64>,
}

impl Throttle {
    pub fn new(limit_ms: u64) -> Self {
        Self {
            limit_ms,
            open_at: None,
        }
    }

    pub fn limit_ms(&self) -> u64 {
        self.limit_ms
    }

    /// Whether a call at `now_ms` may run. Accepting a call closes the window.
    pub fn try_acquire(&mut self, now_ms: u64) -> bool {
        match self.open_at {
            Some(open_at) if now_ms < open_at => false,
            _ => {
                self.open_at = Some(now_ms.saturating_add(self.limit_ms));
                true
            }
        }
    }
}

/// Trailing-edge debounce: fires once `wait_ms` after the most recent call.
#[derive(Clone, Debug)]
pub struct Debounce {
    wait_ms: u64,
    due_at: Option<u64>,
}

impl Debounce {
    pub fn new(wait_ms: u64) -> Self {
        Self {
            wait_ms,
            due_at: None,
        }
    }

    /// Record a call at `now_ms`, pushing the deadline back
    pub fn call(&mut self, now_ms: u64) {
        self.due_at = Some(now_ms.saturating_add(self.wait_ms));
    }

    /// Deadline of the pending call, if any
    pub fn due_at(&self) -> Option<u64> {
        self.due_at
    }

    /// Whether the pending call fires at `now_ms`. Firing clears it.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        match self.due_at {
            Some(due) if now_ms >= due => {
                self.due_at = None;
                true
            }
            _ => false,
        }
    }
}

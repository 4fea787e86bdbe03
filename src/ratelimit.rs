//! Fixed-window request limiter, owned by whoever serves the endpoint.

use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug)]
struct Window {
    started: Instant,
    count: u32,
}

/// Allows at most `max` requests per `window`. The count resets when a window elapses.
#[derive(Debug)]
pub struct WindowLimiter {
    max: u32,
    window: Duration,
    state: Mutex<Option<Window>>,
}

impl WindowLimiter {
    pub fn new(max: u32, window: Duration) -> Self {
        Self {
            max,
            window,
            state: Mutex::new(None),
        }
    }

    /// Count a request now; `false` means it is over the limit.
    pub fn try_acquire(&self) -> bool {
        self.try_acquire_at(Instant::now())
    }

    pub fn try_acquire_at(&self, now: Instant) -> bool {
        let mut g = match self.state.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(w) = g.as_mut() {
            if now.duration_since(w.started) <= self.window {
                w.count = w.count.saturating_add(1);
                return w.count <= self.max;
            }
        }
        *g = Some(Window {
            started: now,
            count: 1,
        });
        self.max > 0
    }
}

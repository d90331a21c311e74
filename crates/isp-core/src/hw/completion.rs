//! Frame-valid flag shared between the interrupt context and waiters.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Set at frame start, cleared at frame end. Waiters block until it clears.
#[derive(Debug, Default)]
pub struct CompletionChannel {
    valid: Mutex<bool>,
    cond: Condvar,
}

impl CompletionChannel {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, bool> {
        self.valid.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_valid(&self) {
        *self.lock() = true;
    }

    /// Clear the flag and wake every waiter.
    pub fn clear(&self) {
        *self.lock() = false;
        self.cond.notify_all();
    }

    pub fn is_valid(&self) -> bool {
        *self.lock()
    }

    /// Wait until the flag is clear. Returns `false` on timeout.
    pub fn wait_clear(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut valid = self.lock();
        while *valid {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            valid = self
                .cond
                .wait_timeout(valid, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn clear_flag_returns_immediately() {
        let c = CompletionChannel::new();
        assert!(c.wait_clear(Duration::ZERO));
    }

    #[test]
    fn times_out_while_valid() {
        let c = CompletionChannel::new();
        c.set_valid();
        assert!(!c.wait_clear(Duration::from_millis(10)));
        assert!(c.is_valid());
    }

    #[test]
    fn woken_by_clear() {
        let c = Arc::new(CompletionChannel::new());
        c.set_valid();
        let irq = {
            let c = Arc::clone(&c);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(5));
                c.clear();
            })
        };
        assert!(c.wait_clear(Duration::from_secs(5)));
        irq.join().unwrap();
    }
}

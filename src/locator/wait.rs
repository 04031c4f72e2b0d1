use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::browser::error::BrowserError;

// ============================================================================
// Wait policy
// ============================================================================

/// Default time to wait for an element before giving up.
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 10_000;

/// Default delay between two probes of the page.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Explicit-wait settings applied to every element resolution in a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitOptions {
    pub timeout_ms: u64,
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    pub fn new(timeout_ms: u64, poll_interval_ms: u64) -> Self {
        Self {
            timeout_ms,
            poll_interval_ms,
        }
    }

    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

// ============================================================================
// Polling
// ============================================================================

/// Repeatedly run `probe` until it yields a value or the timeout elapses.
///
/// The probe always runs at least once, even with a zero timeout. Returns
/// `Ok(None)` on timeout so callers can pick the error that describes what
/// they were waiting for. Errors from the probe abort the wait immediately.
pub fn poll_until<T, F>(options: &WaitOptions, mut probe: F) -> Result<Option<T>, BrowserError>
where
    F: FnMut() -> Result<Option<T>, BrowserError>,
{
    // A timeout too large to represent never expires.
    let deadline = Instant::now().checked_add(options.timeout());
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;
        if let Some(value) = probe()? {
            return Ok(Some(value));
        }

        let pause = match deadline {
            Some(deadline) => {
                let now = Instant::now();
                if now >= deadline {
                    tracing::trace!(attempts, "wait timed out");
                    return Ok(None);
                }
                options.poll_interval().min(deadline - now)
            }
            None => options.poll_interval(),
        };

        std::thread::sleep(pause);
    }
}

//! Settings-apply convergence policy.
//!
//! After a settings change the backend restarts the dependent service
//! asynchronously. The watcher in `console-client` probes service status on a
//! fixed cadence until the service reports healthy or the attempt cap is
//! reached. The policy values live here so the cap and window are testable
//! without any I/O.

use std::time::Duration;

/// Fixed-cadence poll parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay between probes.
    pub interval: Duration,
    /// Hard cap on probes; reaching it ends the watch with
    /// [`PollOutcome::TimedOut`].
    pub max_attempts: u32,
    /// Pause after a terminal outcome before resyncing authoritative
    /// settings, giving the service a moment to finish coming up.
    pub settle_delay: Duration,
}

impl Default for PollPolicy {
    /// Probe every 3 seconds, up to 20 attempts (a 60 second window), then
    /// settle for 3 more seconds before resync.
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
            max_attempts: 20,
            settle_delay: Duration::from_secs(3),
        }
    }
}

impl PollPolicy {
    /// Total time the watch can spend probing before it times out.
    pub fn window(&self) -> Duration {
        self.interval * self.max_attempts
    }
}

/// Terminal result of a settle watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The dependent service reported healthy on probe `attempts`.
    Converged { attempts: u32 },
    /// The attempt cap elapsed without a healthy report. Not an error: the
    /// change was accepted, the restart is just slow.
    TimedOut,
    /// The watch was cancelled before reaching a verdict.
    Aborted,
}

impl PollOutcome {
    pub fn is_converged(self) -> bool {
        matches!(self, PollOutcome::Converged { .. })
    }
}

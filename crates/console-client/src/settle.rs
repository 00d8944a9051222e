//! Settings-apply convergence watch.
//!
//! A server-settings change is accepted immediately, but the dependent
//! service restarts in the background. [`settle_after_apply`] probes service
//! status on a fixed cadence until the service reports healthy, the attempt
//! cap elapses, or the watch is cancelled. It is an explicit task with a
//! tri-state verdict instead of nested timers, so cap and cancellation are
//! testable in isolation.

use crate::client::AdminClient;
use crate::error::{ClientError, Result};
use console_core::api::{SettingKind, UpdateSettingsRequest, UpdateSettingsResponse};
use console_core::health::ServiceHealth;
use console_core::poll::{PollOutcome, PollPolicy};
use std::future::pending;
use tokio::sync::watch;
use tokio::time::{interval, sleep, MissedTickBehavior};
use tracing::{debug, warn};

/// Sender half of a watch cancellation.
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

/// Receiver half handed to the watch. [`CancelToken::never`] builds a token
/// that cannot fire, for callers without a cancellation source.
#[derive(Clone)]
pub struct CancelToken {
    rx: Option<watch::Receiver<bool>>,
}

impl CancelToken {
    pub fn never() -> Self {
        Self { rx: None }
    }

    async fn cancelled(&mut self) {
        match &mut self.rx {
            None => pending().await,
            Some(rx) => loop {
                if *rx.borrow() {
                    return;
                }
                if rx.changed().await.is_err() {
                    // Handle dropped without firing: this watch can no longer
                    // be cancelled.
                    pending::<()>().await;
                }
            },
        }
    }
}

/// Build a linked cancellation pair.
pub fn cancellation() -> (CancelHandle, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelToken { rx: Some(rx) })
}

/// Probe `service` until it reports healthy or the policy cap elapses.
///
/// Probe failures are swallowed and counted as ordinary attempts; the
/// service flapping mid-restart routinely drops a status call or two. The
/// one exception is a 401: the session is gone, further polling cannot
/// succeed, and the response must not be processed.
pub async fn settle_after_apply(
    client: &AdminClient,
    service: &str,
    policy: PollPolicy,
    mut cancel: CancelToken,
) -> Result<PollOutcome> {
    let mut ticker = interval(policy.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // interval yields immediately; consume that so the first probe waits a
    // full period, giving the restart a head start.
    ticker.tick().await;

    for attempt in 1..=policy.max_attempts {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!(attempt, "settle watch cancelled");
                return Ok(PollOutcome::Aborted);
            }
            _ = ticker.tick() => {}
        }

        match client.status().await {
            Ok(listing) => {
                let healthy = listing
                    .service(service)
                    .map(|s| ServiceHealth::classify(&s.state).is_running())
                    .unwrap_or(false);
                if healthy {
                    debug!(attempt, service, "service reported healthy");
                    return Ok(PollOutcome::Converged { attempts: attempt });
                }
            }
            Err(ClientError::Unauthorized) => return Err(ClientError::Unauthorized),
            Err(err) => {
                warn!(attempt, error = %err, "status probe failed; counting as a normal attempt");
            }
        }
    }

    Ok(PollOutcome::TimedOut)
}

/// Result of a full apply-and-settle pass.
#[derive(Debug)]
pub struct ApplyReport {
    /// The backend's verdict on the settings change itself.
    pub response: UpdateSettingsResponse,
    /// Settle watch verdict; `None` when the change was rejected and the
    /// watch never started.
    pub outcome: Option<PollOutcome>,
}

impl ApplyReport {
    pub fn accepted(&self) -> bool {
        self.response.success
    }
}

/// Submit a single-flag settings change and, if the backend accepts it, run
/// the settle watch for `service`.
///
/// The watch only starts on an accepted change. After a converged or
/// timed-out watch the policy's settle delay is honored before returning, so
/// the caller's follow-up resync reads post-restart state. Callers are
/// expected to resync authoritative settings after every apply (accepted,
/// rejected, or errored) and render only that.
pub async fn apply_server_setting(
    client: &AdminClient,
    kind: SettingKind,
    value: bool,
    service: &str,
    policy: PollPolicy,
    cancel: CancelToken,
) -> Result<ApplyReport> {
    let response = client
        .update_server_settings(UpdateSettingsRequest::toggle(kind, value))
        .await?;

    if !response.success {
        debug!(%kind, value, "settings change rejected; skipping settle watch");
        return Ok(ApplyReport {
            response,
            outcome: None,
        });
    }

    let outcome = settle_after_apply(client, service, policy, cancel).await?;
    match outcome {
        PollOutcome::Converged { .. } | PollOutcome::TimedOut => sleep(policy.settle_delay).await,
        PollOutcome::Aborted => {}
    }

    Ok(ApplyReport {
        response,
        outcome: Some(outcome),
    })
}

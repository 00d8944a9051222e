//! HTTP client for the stack management API, plus the settings-apply settle
//! watcher.
//!
//! [`AdminClient`] covers every endpoint the console uses; [`settle`] holds
//! the cancellable convergence watch that runs after a server-settings
//! change.

pub mod client;
pub mod error;
pub mod settle;

pub use client::AdminClient;
pub use error::{ClientError, Result};
pub use settle::{apply_server_setting, cancellation, settle_after_apply, ApplyReport, CancelHandle, CancelToken};

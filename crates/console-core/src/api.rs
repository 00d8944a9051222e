//! Wire types for the management API.
//!
//! The backend wraps everything in small JSON envelopes: a `success` flag plus
//! whichever of `output`, `message`, `warning`, `error` the operation
//! produces. Fields are optional on the wire, so envelopes carry helpers that
//! collapse them into `Result`s the way callers actually consume them.

use crate::schedule::TaskKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One row of `GET /api/status`.
///
/// `state` is the compose-reported lifecycle state (`running`, `exited`,
/// sometimes a human string like `Up 3 hours` depending on the compose
/// version); `status` is the longer human description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub name: String,
    pub state: String,
    pub status: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub services: Vec<ServiceStatus>,
}

impl StatusResponse {
    /// Look up a service row by exact name.
    pub fn service(&self, name: &str) -> Option<&ServiceStatus> {
        self.services.iter().find(|s| s.name == name)
    }
}

/// Envelope for command-style operations (repo pull, image pull, service
/// start/stop/restart): `success` plus captured command output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResponse {
    pub success: bool,
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ActionResponse {
    /// Collapse into the command output on success, or the best available
    /// failure text (`error`, falling back to `output`) otherwise.
    pub fn into_outcome(self) -> Result<String, String> {
        if self.success {
            Ok(self.output.unwrap_or_default())
        } else {
            Err(self
                .error
                .or(self.output)
                .unwrap_or_else(|| "unknown error".to_string()))
        }
    }
}

/// Body for endpoints that optionally target a single service; an empty
/// object means "all services".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceSelector {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
}

impl ServiceSelector {
    pub fn all() -> Self {
        Self { service: None }
    }

    pub fn one(service: impl Into<String>) -> Self {
        Self {
            service: Some(service.into()),
        }
    }
}

/// Lifecycle actions accepted by `POST /api/service/<action>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceAction {
    Start,
    Stop,
    Restart,
}

impl ServiceAction {
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceAction::Start => "start",
            ServiceAction::Stop => "stop",
            ServiceAction::Restart => "restart",
        }
    }
}

impl fmt::Display for ServiceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsResponse {
    pub success: bool,
    #[serde(default)]
    pub logs: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl LogsResponse {
    pub fn into_outcome(self) -> Result<String, String> {
        if self.success {
            Ok(self.logs.unwrap_or_default())
        } else {
            Err(self.error.unwrap_or_else(|| "unknown error".to_string()))
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    /// Backup archive name, when the backend reports one.
    #[serde(default)]
    pub filename: Option<String>,
    /// Local path, only set when the backup was not shipped to object storage.
    #[serde(default)]
    pub path: Option<String>,
}

/// A persisted schedule entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub id: String,
    #[serde(rename = "type")]
    pub task: TaskKind,
    /// Raw schedule expression as stored by the backend (`daily`, `weekly`,
    /// `monthly`, or a 5-field cron line).
    pub schedule: String,
    pub enabled: bool,
    /// Creation stamp. The backend writes a naive local timestamp, so this is
    /// kept as an opaque string.
    #[serde(default)]
    pub created: Option<String>,
}

/// A job currently registered with the backend scheduler. Paired with
/// [`Schedule`] rows by `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveJob {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub next_run: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchedulesResponse {
    #[serde(default)]
    pub schedules: Vec<Schedule>,
    #[serde(default)]
    pub active_jobs: Vec<ActiveJob>,
}

impl SchedulesResponse {
    /// Next firing time for a schedule, if its job is live in the scheduler.
    pub fn next_run(&self, schedule_id: &str) -> Option<DateTime<Utc>> {
        self.active_jobs
            .iter()
            .find(|j| j.id == schedule_id)
            .and_then(|j| j.next_run)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddScheduleRequest {
    #[serde(rename = "type")]
    pub task: TaskKind,
    pub schedule: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddScheduleResponse {
    pub success: bool,
    #[serde(default)]
    pub schedule_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Bare `{success}` envelope (schedule deletion).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimpleResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// The two server flags the console can toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKind {
    Registration,
    Federation,
}

impl SettingKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SettingKind::Registration => "registration",
            SettingKind::Federation => "federation",
        }
    }
}

impl fmt::Display for SettingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authoritative server settings as reported by the backend.
///
/// The `actual_*` fields are the backend's best effort at reading the live
/// homeserver config, which can lag the requested flags while a restart is in
/// flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    pub enable_registration: bool,
    pub enable_federation: bool,
    #[serde(default)]
    pub actual_registration: Option<bool>,
    #[serde(default)]
    pub actual_federation_enabled: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsEnvelope {
    pub success: bool,
    #[serde(default)]
    pub settings: Option<ServerSettings>,
    #[serde(default)]
    pub error: Option<String>,
}

impl SettingsEnvelope {
    pub fn into_outcome(self) -> Result<ServerSettings, String> {
        match (self.success, self.settings) {
            (true, Some(s)) => Ok(s),
            (_, _) => Err(self.error.unwrap_or_else(|| "unknown error".to_string())),
        }
    }
}

/// Body for `POST /api/config/server-settings`. Exactly one flag is set per
/// request; the other is omitted so the backend leaves it untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSettingsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_registration: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_federation: Option<bool>,
}

impl UpdateSettingsRequest {
    pub fn toggle(kind: SettingKind, value: bool) -> Self {
        match kind {
            SettingKind::Registration => Self {
                enable_registration: Some(value),
                ..Self::default()
            },
            SettingKind::Federation => Self {
                enable_federation: Some(value),
                ..Self::default()
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSettingsResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    /// Set when the flags were persisted but the dependent service restart
    /// failed; the change is on disk but not yet live.
    #[serde(default)]
    pub warning: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl UpdateSettingsResponse {
    /// Failure text in the order the backend populates it.
    pub fn failure_message(&self) -> String {
        self.error
            .clone()
            .or_else(|| self.warning.clone())
            .unwrap_or_else(|| "unknown error".to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

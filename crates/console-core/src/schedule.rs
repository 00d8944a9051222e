//! Schedule task kinds and expression validation.
//!
//! The backend accepts three keyword schedules (`daily`, `weekly`, `monthly`)
//! or a 5-field cron line, and rejects anything else with an HTTP 400.
//! Validating here lets the console refuse a bad expression before issuing
//! the request.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// What a schedule runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// `docker compose pull && up -d`
    Update,
    /// `docker compose restart`
    Restart,
    /// Archive state and ship to object storage.
    Backup,
}

impl TaskKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskKind::Update => "update",
            TaskKind::Restart => "restart",
            TaskKind::Backup => "backup",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskKind {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "update" => Ok(TaskKind::Update),
            "restart" => Ok(TaskKind::Restart),
            "backup" => Ok(TaskKind::Backup),
            other => Err(ScheduleError::UnknownTask(other.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("unknown task type: {0} (expected update, restart or backup)")]
    UnknownTask(String),
    #[error(
        "invalid schedule: {0:?} (expected daily, weekly, monthly or a 5-field cron expression)"
    )]
    InvalidExpression(String),
}

/// A validated schedule expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleSpec {
    Daily,
    Weekly,
    Monthly,
    /// A 5-field cron line, kept verbatim; field-level validation is the
    /// backend's job.
    Cron(String),
}

impl ScheduleSpec {
    /// The string sent over the wire.
    pub fn to_wire(&self) -> String {
        match self {
            ScheduleSpec::Daily => "daily".to_string(),
            ScheduleSpec::Weekly => "weekly".to_string(),
            ScheduleSpec::Monthly => "monthly".to_string(),
            ScheduleSpec::Cron(expr) => expr.clone(),
        }
    }
}

impl fmt::Display for ScheduleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire())
    }
}

/// Validate a schedule expression the way the backend will.
pub fn parse_schedule(input: &str) -> Result<ScheduleSpec, ScheduleError> {
    let trimmed = input.trim();
    match trimmed {
        "daily" => return Ok(ScheduleSpec::Daily),
        "weekly" => return Ok(ScheduleSpec::Weekly),
        "monthly" => return Ok(ScheduleSpec::Monthly),
        _ => {}
    }
    if trimmed.split_whitespace().count() == 5 {
        return Ok(ScheduleSpec::Cron(trimmed.to_string()));
    }
    Err(ScheduleError::InvalidExpression(input.to_string()))
}

//! Shared types and pure policy logic for the stack admin console.
//!
//! Everything here is I/O-free: wire types for the management API, the
//! service-health classifier, the settings-apply poll policy, and schedule
//! expression validation. The HTTP client lives in `console-client`.

pub mod api;
pub mod health;
pub mod poll;
pub mod schedule;

pub use api::{
    ActionResponse, ActiveJob, AddScheduleRequest, AddScheduleResponse, BackupResponse,
    LoginRequest, LoginResponse, LogsResponse, Schedule, SchedulesResponse, ServerSettings,
    ServiceAction, ServiceSelector, ServiceStatus, SettingKind, SettingsEnvelope, SimpleResponse,
    StatusResponse, UpdateSettingsRequest, UpdateSettingsResponse,
};
pub use health::ServiceHealth;
pub use poll::{PollOutcome, PollPolicy};
pub use schedule::{parse_schedule, ScheduleError, ScheduleSpec, TaskKind};

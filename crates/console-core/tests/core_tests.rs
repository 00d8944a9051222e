//! Integration tests for the core crate: wire shapes as the backend emits
//! them.

use console_core::{
    ActionResponse, AddScheduleRequest, ScheduleSpec, SchedulesResponse, ServiceAction,
    ServiceHealth, SettingsEnvelope, StatusResponse, TaskKind, UpdateSettingsResponse,
};

#[test]
fn status_response_parses_compose_rows() {
    let raw = r#"{
        "services": [
            {"name": "synapse", "state": "running", "status": "Up 3 hours"},
            {"name": "postgres", "state": "running", "status": "Up 3 hours (healthy)"},
            {"name": "coturn", "state": "exited", "status": "Exited (0) 2 days ago"}
        ]
    }"#;
    let resp: StatusResponse = serde_json::from_str(raw).unwrap();
    assert_eq!(resp.services.len(), 3);
    assert_eq!(resp.service("synapse").unwrap().state, "running");
    assert!(resp.service("traefik").is_none());

    let running = resp
        .services
        .iter()
        .filter(|s| ServiceHealth::classify(&s.state).is_running())
        .count();
    assert_eq!(running, 2);
}

#[test]
fn empty_status_body_is_an_empty_listing() {
    let resp: StatusResponse = serde_json::from_str("{}").unwrap();
    assert!(resp.services.is_empty());
}

#[test]
fn action_response_tolerates_missing_fields() {
    let resp: ActionResponse = serde_json::from_str(r#"{"success": true}"#).unwrap();
    assert_eq!(resp.into_outcome(), Ok(String::new()));

    let resp: ActionResponse =
        serde_json::from_str(r#"{"success": false, "error": "invalid service name"}"#).unwrap();
    assert_eq!(resp.into_outcome(), Err("invalid service name".to_string()));
}

#[test]
fn service_action_serializes_snake_case() {
    assert_eq!(serde_json::to_string(&ServiceAction::Restart).unwrap(), r#""restart""#);
    assert_eq!(ServiceAction::Start.to_string(), "start");
}

#[test]
fn add_schedule_request_uses_type_key() {
    let req = AddScheduleRequest {
        task: TaskKind::Backup,
        schedule: ScheduleSpec::Weekly.to_wire(),
        enabled: true,
    };
    let body = serde_json::to_string(&req).unwrap();
    assert_eq!(body, r#"{"type":"backup","schedule":"weekly","enabled":true}"#);
}

#[test]
fn schedules_response_tolerates_missing_job_list() {
    let resp: SchedulesResponse = serde_json::from_str(
        r#"{"schedules": [{"id": "update_20260801", "type": "update", "schedule": "0 4 * * *", "enabled": false}]}"#,
    )
    .unwrap();
    assert_eq!(resp.schedules.len(), 1);
    assert!(resp.active_jobs.is_empty());
    assert_eq!(resp.schedules[0].task, TaskKind::Update);
    assert!(!resp.schedules[0].enabled);
}

#[test]
fn settings_envelope_outcome() {
    let env: SettingsEnvelope = serde_json::from_str(
        r#"{
            "success": true,
            "settings": {
                "enable_registration": false,
                "enable_federation": true,
                "actual_registration": false,
                "actual_federation_enabled": null
            }
        }"#,
    )
    .unwrap();
    let settings = env.into_outcome().unwrap();
    assert!(settings.enable_federation);
    assert!(!settings.enable_registration);
    assert_eq!(settings.actual_federation_enabled, None);

    let env: SettingsEnvelope =
        serde_json::from_str(r#"{"success": false, "error": "boom"}"#).unwrap();
    assert_eq!(env.into_outcome(), Err("boom".to_string()));

    // success flag set but settings missing still counts as a failure
    let env: SettingsEnvelope = serde_json::from_str(r#"{"success": true}"#).unwrap();
    assert!(env.into_outcome().is_err());
}

#[test]
fn update_settings_response_surfaces_backend_warning() {
    let resp: UpdateSettingsResponse = serde_json::from_str(
        r#"{
            "success": false,
            "warning": "Settings updated in .env but the restart failed. Please restart manually.",
            "error": "exit status 1"
        }"#,
    )
    .unwrap();
    assert!(!resp.success);
    assert_eq!(resp.failure_message(), "exit status 1");
}

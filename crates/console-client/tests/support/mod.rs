//! In-process mock of the management API for client tests.
//!
//! Each test configures a [`MockBackend`], spawns it on an ephemeral port and
//! points an `AdminClient` at it. Response scripting is intentionally dumb:
//! status replies are consumed in order, with the last entry repeating.

#![allow(dead_code)]

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "s3cret";

/// One scripted reply for `GET /api/status`.
pub enum StatusReply {
    /// Service rows as (name, state) pairs.
    Services(Vec<(String, String)>),
    /// Transport-level failure (a 500 with a non-envelope body).
    Http500,
}

impl StatusReply {
    pub fn one(name: &str, state: &str) -> Self {
        StatusReply::Services(vec![(name.to_string(), state.to_string())])
    }
}

#[derive(Default)]
pub struct MockState {
    /// When set, every `/api` route replies 401.
    pub require_auth: bool,

    pub status_script: Vec<StatusReply>,
    pub status_cursor: usize,
    pub status_calls: u32,

    /// Scripted reply for `POST /api/config/server-settings`; defaults to an
    /// accepted change.
    pub update_reply: Option<Value>,
    pub update_calls: u32,

    pub settings: Option<Value>,
    pub settings_calls: u32,

    pub schedules: Vec<Value>,
    pub active_jobs: Vec<Value>,
    pub deleted_ids: Vec<String>,

    pub repo_fail: bool,
    pub images_bodies: Vec<Value>,
    pub service_posts: Vec<(String, Value)>,
    pub logs_requests: Vec<(String, String)>,
}

#[derive(Clone, Default)]
pub struct MockBackend {
    pub state: Arc<Mutex<MockState>>,
}

impl MockBackend {
    pub fn with_status_script(script: Vec<StatusReply>) -> Self {
        let backend = MockBackend::default();
        backend.state.lock().unwrap().status_script = script;
        backend
    }

    pub fn status_calls(&self) -> u32 {
        self.state.lock().unwrap().status_calls
    }

    pub fn settings_calls(&self) -> u32 {
        self.state.lock().unwrap().settings_calls
    }

    pub fn update_calls(&self) -> u32 {
        self.state.lock().unwrap().update_calls
    }
}

/// Bind on an ephemeral port and serve in the background; returns the base
/// URL.
pub async fn spawn(backend: MockBackend) -> String {
    let app = Router::new()
        .route("/login", post(login))
        .route("/api/status", get(status_listing))
        .route("/api/update-repo", post(update_repo))
        .route("/api/update-images", post(update_images))
        .route("/api/service/{action}", post(service_action))
        .route("/api/logs/{service}", get(service_logs))
        .route("/api/backup", post(backup))
        .route("/api/schedules", get(list_schedules).post(add_schedule))
        .route("/api/schedules/{id}", delete(remove_schedule))
        .route(
            "/api/config/server-settings",
            get(get_settings).post(post_settings),
        )
        .with_state(backend);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"error": "Authentication required"})),
    )
        .into_response()
}

async fn login(Json(body): Json<Value>) -> Response {
    let ok = body["username"] == USERNAME && body["password"] == PASSWORD;
    if ok {
        Json(json!({"success": true})).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"success": false, "error": "Invalid credentials"})),
        )
            .into_response()
    }
}

async fn status_listing(State(backend): State<MockBackend>) -> Response {
    let mut state = backend.state.lock().unwrap();
    if state.require_auth {
        return unauthorized();
    }
    state.status_calls += 1;

    if state.status_script.is_empty() {
        return Json(json!({"services": []})).into_response();
    }
    let idx = state.status_cursor.min(state.status_script.len() - 1);
    state.status_cursor += 1;

    match &state.status_script[idx] {
        StatusReply::Http500 => {
            (StatusCode::INTERNAL_SERVER_ERROR, "compose unavailable").into_response()
        }
        StatusReply::Services(rows) => {
            let services: Vec<Value> = rows
                .iter()
                .map(|(name, svc_state)| {
                    json!({"name": name, "state": svc_state, "status": svc_state})
                })
                .collect();
            Json(json!({"services": services})).into_response()
        }
    }
}

async fn update_repo(State(backend): State<MockBackend>) -> Response {
    let state = backend.state.lock().unwrap();
    if state.require_auth {
        return unauthorized();
    }
    if state.repo_fail {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"success": false, "error": "Git fetch failed: network unreachable"})),
        )
            .into_response()
    } else {
        Json(json!({"success": true, "output": "Already up to date.\n"})).into_response()
    }
}

async fn update_images(State(backend): State<MockBackend>, Json(body): Json<Value>) -> Response {
    let mut state = backend.state.lock().unwrap();
    if state.require_auth {
        return unauthorized();
    }
    state.images_bodies.push(body.clone());
    let target = body["service"].as_str().unwrap_or("all");
    Json(json!({"success": true, "output": format!("pulled {target}\n")})).into_response()
}

async fn service_action(
    State(backend): State<MockBackend>,
    Path(action): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = backend.state.lock().unwrap();
    if state.require_auth {
        return unauthorized();
    }
    if !["start", "stop", "restart"].contains(&action.as_str()) {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "Invalid action"}))).into_response();
    }
    state.service_posts.push((action.clone(), body));
    Json(json!({"success": true, "output": format!("{action} ok\n")})).into_response()
}

async fn service_logs(
    State(backend): State<MockBackend>,
    Path(service): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let mut state = backend.state.lock().unwrap();
    if state.require_auth {
        return unauthorized();
    }
    let lines = params.get("lines").cloned().unwrap_or_default();
    state.logs_requests.push((service.clone(), lines));
    Json(json!({"success": true, "logs": format!("{service} log tail\n")})).into_response()
}

async fn backup(State(backend): State<MockBackend>) -> Response {
    let state = backend.state.lock().unwrap();
    if state.require_auth {
        return unauthorized();
    }
    Json(json!({
        "success": true,
        "message": "Backup uploaded to S3: stack-backup-20260806.tar.gz",
        "filename": "stack-backup-20260806.tar.gz"
    }))
    .into_response()
}

async fn list_schedules(State(backend): State<MockBackend>) -> Response {
    let state = backend.state.lock().unwrap();
    if state.require_auth {
        return unauthorized();
    }
    Json(json!({
        "schedules": state.schedules,
        "active_jobs": state.active_jobs
    }))
    .into_response()
}

async fn add_schedule(State(backend): State<MockBackend>, Json(body): Json<Value>) -> Response {
    let mut state = backend.state.lock().unwrap();
    if state.require_auth {
        return unauthorized();
    }
    let task = body["type"].as_str().unwrap_or_default().to_string();
    let schedule = body["schedule"].as_str().unwrap_or_default().to_string();
    if task.is_empty() || schedule.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Missing required fields"})),
        )
            .into_response();
    }
    let id = format!("{}_{}", task, state.schedules.len() + 1);
    let job_name = format!("{task} - {schedule}");
    state.schedules.push(json!({
        "id": id.clone(),
        "type": task,
        "schedule": schedule,
        "enabled": body["enabled"].as_bool().unwrap_or(true)
    }));
    state.active_jobs.push(json!({
        "id": id.clone(),
        "name": job_name,
        "next_run": "2026-08-07T03:00:00+00:00"
    }));
    Json(json!({"success": true, "schedule_id": id})).into_response()
}

async fn remove_schedule(State(backend): State<MockBackend>, Path(id): Path<String>) -> Response {
    let mut state = backend.state.lock().unwrap();
    if state.require_auth {
        return unauthorized();
    }
    state.schedules.retain(|s| s["id"] != id.as_str());
    state.active_jobs.retain(|j| j["id"] != id.as_str());
    state.deleted_ids.push(id);
    Json(json!({"success": true})).into_response()
}

async fn get_settings(State(backend): State<MockBackend>) -> Response {
    let mut state = backend.state.lock().unwrap();
    if state.require_auth {
        return unauthorized();
    }
    state.settings_calls += 1;
    let settings = state.settings.clone().unwrap_or_else(|| {
        json!({"enable_registration": true, "enable_federation": false})
    });
    Json(json!({"success": true, "settings": settings})).into_response()
}

async fn post_settings(State(backend): State<MockBackend>, Json(body): Json<Value>) -> Response {
    let mut state = backend.state.lock().unwrap();
    if state.require_auth {
        return unauthorized();
    }
    state.update_calls += 1;

    // Mirror the change into the reported settings so a follow-up resync sees
    // the new flags.
    let mut settings = state.settings.clone().unwrap_or_else(|| {
        json!({"enable_registration": true, "enable_federation": false})
    });
    for key in ["enable_registration", "enable_federation"] {
        if let Some(v) = body.get(key).and_then(Value::as_bool) {
            settings[key] = json!(v);
        }
    }
    state.settings = Some(settings);

    match state.update_reply.clone() {
        Some(reply) => Json(reply).into_response(),
        None => Json(json!({
            "success": true,
            "message": "Settings updated successfully. Restart in progress..."
        }))
        .into_response(),
    }
}

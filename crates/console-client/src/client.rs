use crate::error::{ClientError, Result};
use console_core::api::{
    ActionResponse, AddScheduleRequest, AddScheduleResponse, BackupResponse, LoginRequest,
    LoginResponse, LogsResponse, SchedulesResponse, ServerSettings, ServiceAction,
    ServiceSelector, SettingsEnvelope, SimpleResponse, StatusResponse, UpdateSettingsRequest,
    UpdateSettingsResponse,
};
use console_core::schedule::{ScheduleSpec, TaskKind};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Typed client for the management API.
///
/// Holds a cookie jar so the session established by [`AdminClient::login`]
/// rides along on every subsequent call. The backend reports application
/// failures inside 200/4xx/5xx JSON envelopes alike, so responses are decoded
/// regardless of HTTP status. The exception is 401, which short-circuits to
/// [`ClientError::Unauthorized`] without reading the body.
pub struct AdminClient {
    http: reqwest::Client,
    base: String,
}

impl AdminClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        let base = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn send<T: DeserializeOwned>(&self, req: reqwest::RequestBuilder) -> Result<T> {
        let resp = req.send().await?;
        if resp.status() == StatusCode::UNAUTHORIZED {
            return Err(ClientError::Unauthorized);
        }
        Ok(resp.json::<T>().await?)
    }

    /// Establish a session. Invalid credentials come back as a 401 with a
    /// JSON body, which is reported as an [`ClientError::Api`] rather than
    /// `Unauthorized` so the caller can tell "wrong password" apart from
    /// "no session".
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        debug!(username, "logging in");
        let resp = self
            .http
            .post(self.url("/login"))
            .json(&LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;
        let body: LoginResponse = resp.json().await?;
        if body.success {
            Ok(())
        } else {
            Err(ClientError::Api(
                body.error.unwrap_or_else(|| "invalid credentials".to_string()),
            ))
        }
    }

    pub async fn status(&self) -> Result<StatusResponse> {
        self.send(self.http.get(self.url("/api/status"))).await
    }

    pub async fn update_repo(&self) -> Result<ActionResponse> {
        debug!("pulling repository");
        self.send(
            self.http
                .post(self.url("/api/update-repo"))
                .json(&ServiceSelector::all()),
        )
        .await
    }

    /// Pull images for one service, or all services when `service` is `None`.
    pub async fn update_images(&self, service: Option<&str>) -> Result<ActionResponse> {
        debug!(service = service.unwrap_or("all"), "pulling images");
        let body = match service {
            Some(name) => ServiceSelector::one(name),
            None => ServiceSelector::all(),
        };
        self.send(self.http.post(self.url("/api/update-images")).json(&body))
            .await
    }

    pub async fn service_action(
        &self,
        action: ServiceAction,
        service: Option<&str>,
    ) -> Result<ActionResponse> {
        debug!(%action, service = service.unwrap_or("all"), "service action");
        let body = match service {
            Some(name) => ServiceSelector::one(name),
            None => ServiceSelector::all(),
        };
        self.send(
            self.http
                .post(self.url(&format!("/api/service/{action}")))
                .json(&body),
        )
        .await
    }

    pub async fn logs(&self, service: &str, lines: u32) -> Result<LogsResponse> {
        self.send(
            self.http
                .get(self.url(&format!("/api/logs/{service}")))
                .query(&[("lines", lines)]),
        )
        .await
    }

    pub async fn backup(&self) -> Result<BackupResponse> {
        debug!("requesting backup");
        self.send(
            self.http
                .post(self.url("/api/backup"))
                .json(&ServiceSelector::all()),
        )
        .await
    }

    pub async fn schedules(&self) -> Result<SchedulesResponse> {
        self.send(self.http.get(self.url("/api/schedules"))).await
    }

    /// Register a schedule. New schedules are always enabled, matching the
    /// console's add form.
    pub async fn add_schedule(
        &self,
        task: TaskKind,
        spec: &ScheduleSpec,
    ) -> Result<AddScheduleResponse> {
        debug!(%task, schedule = %spec, "adding schedule");
        self.send(
            self.http
                .post(self.url("/api/schedules"))
                .json(&AddScheduleRequest {
                    task,
                    schedule: spec.to_wire(),
                    enabled: true,
                }),
        )
        .await
    }

    pub async fn delete_schedule(&self, id: &str) -> Result<SimpleResponse> {
        debug!(id, "deleting schedule");
        self.send(self.http.delete(self.url(&format!("/api/schedules/{id}"))))
            .await
    }

    /// Fetch authoritative server settings, unwrapping the envelope.
    pub async fn server_settings(&self) -> Result<ServerSettings> {
        let env: SettingsEnvelope = self
            .send(self.http.get(self.url("/api/config/server-settings")))
            .await?;
        env.into_outcome().map_err(ClientError::Api)
    }

    /// Submit a settings change. The raw envelope is returned so callers can
    /// inspect `success`, `message` and `warning` individually; the settle
    /// watch in [`crate::settle`] decides what happens next.
    pub async fn update_server_settings(
        &self,
        req: UpdateSettingsRequest,
    ) -> Result<UpdateSettingsResponse> {
        debug!(?req, "updating server settings");
        self.send(
            self.http
                .post(self.url("/api/config/server-settings"))
                .json(&req),
        )
        .await
    }
}

//! Command handlers. Each is one request/render pair; the only multi-step
//! flow is [`settings_set`], which runs the settle watch after an accepted
//! change and always resyncs the settings display afterwards.

use crate::render;
use anyhow::{anyhow, bail, Result};
use console_client::{apply_server_setting, cancellation, AdminClient, ClientError};
use console_core::api::{ServiceAction, SettingKind};
use console_core::poll::{PollOutcome, PollPolicy};
use console_core::schedule::{ScheduleSpec, TaskKind};
use indicatif::ProgressBar;
use std::time::Duration;

/// Cadence of `status --watch`.
const WATCH_INTERVAL: Duration = Duration::from_secs(30);

/// Grace period between a service action and the follow-up status fetch; the
/// stack needs a moment before its new state shows up in the listing.
const ACTION_REFRESH_DELAY: Duration = Duration::from_secs(2);

pub async fn show_status(client: &AdminClient) -> Result<()> {
    let listing = client.status().await?;
    if listing.services.is_empty() {
        render::info("No services found");
    } else {
        println!("{}", render::status_table(&listing.services));
    }
    Ok(())
}

/// Re-render the status listing on a fixed cadence until interrupted. Fetch
/// errors are shown and the loop keeps going, except for a 401, which ends
/// the watch: the session is gone and every further fetch would fail the
/// same way.
pub async fn watch_status(client: &AdminClient) -> Result<()> {
    let mut ticker = tokio::time::interval(WATCH_INTERVAL);
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                println!();
                render::info("watch stopped");
                return Ok(());
            }
            _ = ticker.tick() => {
                render::info(&chrono::Local::now().format("%H:%M:%S").to_string());
                if let Err(err) = show_status(client).await {
                    if err.downcast_ref::<ClientError>().is_some_and(|e| e.is_unauthorized()) {
                        return Err(err);
                    }
                    render::error(&format!("Error loading status: {err:#}"));
                }
            }
        }
    }
}

pub async fn update_repo(client: &AdminClient) -> Result<()> {
    render::info("Updating repository...");
    let output = client.update_repo().await?.into_outcome().map_err(|e| anyhow!(e))?;
    println!("{}", output.trim_end());
    Ok(())
}

pub async fn update_images(client: &AdminClient, service: Option<&str>) -> Result<()> {
    match service {
        Some(name) => render::info(&format!("Updating {name} image...")),
        None => render::info("Updating all images..."),
    }
    let output = client
        .update_images(service)
        .await?
        .into_outcome()
        .map_err(|e| anyhow!(e))?;
    println!("{}", output.trim_end());
    Ok(())
}

pub async fn service_action(
    client: &AdminClient,
    action: ServiceAction,
    service: Option<&str>,
) -> Result<()> {
    let target = service.unwrap_or("all services");
    render::info(&format!("Running {action} on {target}..."));
    let output = client
        .service_action(action, service)
        .await?
        .into_outcome()
        .map_err(|e| anyhow!(e))?;
    if !output.trim().is_empty() {
        println!("{}", output.trim_end());
    }
    tokio::time::sleep(ACTION_REFRESH_DELAY).await;
    show_status(client).await
}

pub async fn logs(client: &AdminClient, service: &str, lines: u32) -> Result<()> {
    let logs = client
        .logs(service, lines)
        .await?
        .into_outcome()
        .map_err(|e| anyhow!("error loading logs: {e}"))?;
    print!("{logs}");
    Ok(())
}

pub async fn backup(client: &AdminClient) -> Result<()> {
    render::info("Creating backup...");
    let resp = client.backup().await?;
    if !resp.success {
        bail!(resp.error.unwrap_or_else(|| "backup failed".to_string()));
    }
    render::success(
        resp.message
            .as_deref()
            .unwrap_or("Backup complete"),
    );
    Ok(())
}

pub async fn schedule_list(client: &AdminClient) -> Result<()> {
    let listing = client.schedules().await?;
    if listing.schedules.is_empty() {
        render::info("No scheduled tasks");
    } else {
        println!("{}", render::schedules_table(&listing));
    }
    Ok(())
}

pub async fn schedule_add(client: &AdminClient, task: TaskKind, spec: &ScheduleSpec) -> Result<()> {
    let resp = client.add_schedule(task, spec).await?;
    if !resp.success {
        bail!(resp
            .error
            .unwrap_or_else(|| "failed to add schedule".to_string()));
    }
    render::success(&format!(
        "Schedule added: {}",
        resp.schedule_id.unwrap_or_default()
    ));
    schedule_list(client).await
}

/// Delete a schedule. `confirmed` is the prompt verdict (or `--yes`);
/// declining issues no request at all.
pub async fn schedule_delete(client: &AdminClient, id: &str, confirmed: bool) -> Result<()> {
    if !confirmed {
        render::info("Deletion cancelled; no changes made.");
        return Ok(());
    }
    let resp = client.delete_schedule(id).await?;
    if !resp.success {
        bail!(resp
            .error
            .unwrap_or_else(|| "failed to delete schedule".to_string()));
    }
    render::success("Schedule deleted");
    schedule_list(client).await
}

pub async fn settings_show(client: &AdminClient) -> Result<()> {
    let settings = client.server_settings().await?;
    print!("{}", render::settings_view(&settings));
    Ok(())
}

/// Resync the settings display from the authoritative source. Runs after
/// every settings mutation regardless of how it went, so the console never
/// keeps an optimistic value on screen.
async fn resync_settings(client: &AdminClient) {
    match client.server_settings().await {
        Ok(settings) => print!("{}", render::settings_view(&settings)),
        Err(err) => render::error(&format!("Error loading settings: {err}")),
    }
}

pub async fn settings_set(
    client: &AdminClient,
    kind: SettingKind,
    value: bool,
    service: &str,
) -> Result<()> {
    render::info(&format!(
        "Setting {kind} to {} and restarting {service}...",
        render::toggle_label(value)
    ));

    let (handle, token) = cancellation();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            handle.cancel();
        }
    });

    let spinner = ProgressBar::new_spinner();
    spinner.set_message(format!("waiting for {service} to come back up"));
    spinner.enable_steady_tick(Duration::from_millis(120));

    let result =
        apply_server_setting(client, kind, value, service, PollPolicy::default(), token).await;
    spinner.finish_and_clear();

    let report = match result {
        Ok(report) => report,
        Err(err) => {
            resync_settings(client).await;
            return Err(err.into());
        }
    };

    if !report.accepted() {
        resync_settings(client).await;
        bail!(
            "settings update failed: {}",
            report.response.failure_message()
        );
    }

    match report.outcome {
        Some(PollOutcome::Converged { .. }) => {
            render::success(&format!(
                "Settings applied successfully. {service} is running."
            ));
        }
        Some(PollOutcome::TimedOut) => {
            render::success(&format!(
                "Settings updated, but the {service} restart is taking longer than expected. Check service status."
            ));
        }
        Some(PollOutcome::Aborted) => {
            render::info("Watch cancelled; the change may still be applying.");
        }
        None => {}
    }

    resync_settings(client).await;
    Ok(())
}

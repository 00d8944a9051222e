//! Terminal rendering: tables, toggle labels, styled messages and the
//! deletion prompt.

use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, Color, ContentArrangement, Table};
use console::style;
use console_core::api::{SchedulesResponse, ServerSettings, ServiceStatus};
use console_core::health::ServiceHealth;
use std::io::{self, BufRead, Write};

pub fn status_table(services: &[ServiceStatus]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Service", "State", "Status"]);
    for service in services {
        let color = if ServiceHealth::classify(&service.state).is_running() {
            Color::Green
        } else {
            Color::Red
        };
        table.add_row(vec![
            Cell::new(&service.name),
            Cell::new(&service.state).fg(color),
            Cell::new(&service.status),
        ]);
    }
    table
}

pub fn schedules_table(listing: &SchedulesResponse) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["ID", "Task", "Schedule", "Enabled", "Next run"]);
    for schedule in &listing.schedules {
        let next_run = listing
            .next_run(&schedule.id)
            .map(|t| {
                t.with_timezone(&chrono::Local)
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string()
            })
            .unwrap_or_else(|| "Not scheduled".to_string());
        table.add_row(vec![
            Cell::new(&schedule.id),
            Cell::new(schedule.task.as_str()),
            Cell::new(&schedule.schedule),
            Cell::new(toggle_label(schedule.enabled)),
            Cell::new(next_run),
        ]);
    }
    table
}

/// Label shown next to a settings toggle.
pub fn toggle_label(enabled: bool) -> &'static str {
    if enabled {
        "Enabled"
    } else {
        "Disabled"
    }
}

fn checkbox(enabled: bool) -> &'static str {
    if enabled {
        "[x]"
    } else {
        "[ ]"
    }
}

/// Render the settings panel: one toggle line per flag, plus the live values
/// the backend managed to read, when they disagree with the requested flags.
pub fn settings_view(settings: &ServerSettings) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "registration  {} {}\n",
        checkbox(settings.enable_registration),
        toggle_label(settings.enable_registration)
    ));
    out.push_str(&format!(
        "federation    {} {}\n",
        checkbox(settings.enable_federation),
        toggle_label(settings.enable_federation)
    ));
    if let Some(live) = settings.actual_registration {
        if live != settings.enable_registration {
            out.push_str(&format!(
                "  (live homeserver registration is still {})\n",
                toggle_label(live)
            ));
        }
    }
    if let Some(live) = settings.actual_federation_enabled {
        if live != settings.enable_federation {
            out.push_str(&format!(
                "  (live homeserver federation is still {})\n",
                toggle_label(live)
            ));
        }
    }
    out
}

pub fn success(msg: &str) {
    println!("{}", style(msg).green());
}

pub fn error(msg: &str) {
    eprintln!("{}", style(msg).red());
}

pub fn info(msg: &str) {
    println!("{}", style(msg).dim());
}

/// `y`/`yes`, case-insensitive.
pub fn is_affirmative(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Interactive yes/no prompt, defaulting to no.
pub fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(is_affirmative(&line))
}

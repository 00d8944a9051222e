use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use console_client::AdminClient;
use console_core::api::{ServiceAction, SettingKind};
use console_core::schedule::{parse_schedule, TaskKind};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use consolectl::config::{self, CliOverrides, ConsoleConfig};
use consolectl::{ops, render};

#[derive(Debug, Parser)]
#[command(
    name = "consolectl",
    version,
    about = "Terminal admin console for a self-hosted service stack"
)]
struct Cli {
    /// Management API base URL (default http://127.0.0.1:5000)
    #[arg(long)]
    url: Option<String>,

    /// Config file path (default: ./console.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Admin username
    #[arg(long)]
    username: Option<String>,

    /// Admin password; prefer the STACK_CONSOLE_PASSWORD environment variable
    #[arg(long)]
    password: Option<String>,

    /// Dependent service watched after settings changes (default: synapse)
    #[arg(long)]
    service: Option<String>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Verify credentials against the backend
    Login,

    /// Show service status
    Status {
        /// Keep refreshing every 30 seconds until interrupted
        #[arg(long)]
        watch: bool,
    },

    /// Pull the latest deployment repository or images
    Update {
        #[command(subcommand)]
        what: UpdateCmd,
    },

    /// Start, stop or restart services
    Service {
        #[arg(value_enum)]
        action: ServiceActionArg,
        /// Target a single service; all services when omitted
        #[arg(long)]
        service: Option<String>,
    },

    /// Show the log tail for a service
    Logs {
        service: String,
        #[arg(long, default_value_t = 200)]
        lines: u32,
    },

    /// Create a backup and ship it to object storage when configured
    Backup,

    /// Manage scheduled tasks
    Schedule {
        #[command(subcommand)]
        cmd: ScheduleCmd,
    },

    /// Show or change server settings
    Settings {
        #[command(subcommand)]
        cmd: SettingsCmd,
    },
}

#[derive(Debug, Subcommand)]
enum UpdateCmd {
    /// git pull the deployment repository
    Repo,
    /// Pull container images
    Images {
        /// Pull a single service's image; all images when omitted
        #[arg(long)]
        service: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
enum ScheduleCmd {
    List,
    Add {
        /// Task to run
        #[arg(long, value_enum)]
        task: TaskArg,
        /// daily, weekly, monthly or a 5-field cron expression
        #[arg(long)]
        at: String,
    },
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
enum SettingsCmd {
    Show,
    Set {
        #[arg(value_enum)]
        setting: SettingArg,
        #[arg(value_enum)]
        state: OnOff,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ServiceActionArg {
    Start,
    Stop,
    Restart,
}

impl From<ServiceActionArg> for ServiceAction {
    fn from(arg: ServiceActionArg) -> Self {
        match arg {
            ServiceActionArg::Start => ServiceAction::Start,
            ServiceActionArg::Stop => ServiceAction::Stop,
            ServiceActionArg::Restart => ServiceAction::Restart,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TaskArg {
    Update,
    Restart,
    Backup,
}

impl From<TaskArg> for TaskKind {
    fn from(arg: TaskArg) -> Self {
        match arg {
            TaskArg::Update => TaskKind::Update,
            TaskArg::Restart => TaskKind::Restart,
            TaskArg::Backup => TaskKind::Backup,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SettingArg {
    Registration,
    Federation,
}

impl From<SettingArg> for SettingKind {
    fn from(arg: SettingArg) -> Self {
        match arg {
            SettingArg::Registration => SettingKind::Registration,
            SettingArg::Federation => SettingKind::Federation,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OnOff {
    On,
    Off,
}

impl From<OnOff> for bool {
    fn from(arg: OnOff) -> Self {
        matches!(arg, OnOff::On)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let overrides = CliOverrides {
        url: cli.url.clone(),
        username: cli.username.clone(),
        password: cli.password.clone(),
        service: cli.service.clone(),
    };
    let cfg = ConsoleConfig::resolve(overrides, cli.config.as_deref())?;
    tracing::debug!(url = %cfg.url, service = %cfg.service, "resolved configuration");

    let client = AdminClient::new(&cfg.url)?;
    if let Some(password) = cfg.password.as_deref() {
        client
            .login(&cfg.username, password)
            .await
            .with_context(|| format!("login to {} failed", cfg.url))?;
    }

    match cli.cmd {
        Command::Login => {
            if cfg.password.is_none() {
                bail!(
                    "no password provided; set {} or pass --password",
                    config::ENV_PASSWORD
                );
            }
            render::success(&format!("Logged in to {} as {}", cfg.url, cfg.username));
        }
        Command::Status { watch } => {
            if watch {
                ops::watch_status(&client).await?;
            } else {
                ops::show_status(&client).await?;
            }
        }
        Command::Update { what } => match what {
            UpdateCmd::Repo => ops::update_repo(&client).await?,
            UpdateCmd::Images { service } => {
                ops::update_images(&client, service.as_deref()).await?
            }
        },
        Command::Service { action, service } => {
            ops::service_action(&client, action.into(), service.as_deref()).await?
        }
        Command::Logs { service, lines } => ops::logs(&client, &service, lines).await?,
        Command::Backup => ops::backup(&client).await?,
        Command::Schedule { cmd } => match cmd {
            ScheduleCmd::List => ops::schedule_list(&client).await?,
            ScheduleCmd::Add { task, at } => {
                let spec = parse_schedule(&at)?;
                ops::schedule_add(&client, task.into(), &spec).await?
            }
            ScheduleCmd::Delete { id, yes } => {
                let confirmed = yes || render::confirm(&format!("Delete schedule {id}?"))?;
                ops::schedule_delete(&client, &id, confirmed).await?
            }
        },
        Command::Settings { cmd } => match cmd {
            SettingsCmd::Show => ops::settings_show(&client).await?,
            SettingsCmd::Set { setting, state } => {
                ops::settings_set(&client, setting.into(), state.into(), &cfg.service).await?
            }
        },
    }

    Ok(())
}

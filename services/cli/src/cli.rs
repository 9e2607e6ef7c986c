use clap::{Parser, Subcommand};
use jobtrack::config::AppConfig;
use jobtrack::error::AppError;
use jobtrack::telemetry;
use jobtrack::tracker::applications::ApiError;
use tracing::debug;

use crate::commands::{
    self, AddArgs, DeleteArgs, EditArgs, ExportArgs, ListArgs, LoginArgs, ShowArgs, StatsArgs,
};

#[derive(Parser, Debug)]
#[command(
    name = "jobtrack",
    about = "Track job applications against a remote tracker API",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List tracked applications (default command)
    List(ListArgs),
    /// Show one application in full
    Show(ShowArgs),
    /// Submit a new application
    Add(AddArgs),
    /// Update an application by resubmitting all of its fields
    Edit(EditArgs),
    /// Delete an application
    Delete(DeleteArgs),
    /// Summarize the application funnel
    Stats(StatsArgs),
    /// Export applications as CSV
    Export(ExportArgs),
    /// Sign in and store the session cookie
    Login(LoginArgs),
    /// Sign out and discard the session cookie
    Logout,
    /// Show who the stored session belongs to
    Whoami,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::List(ListArgs::default()));

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    debug!(?config.environment, api = %config.api.base_url, "configuration loaded");

    let result = dispatch(command, &config).await;
    if let Err(AppError::Api(ApiError::Unauthorized)) = &result {
        eprintln!("Session missing or expired; run `jobtrack login` first.");
    }
    result
}

async fn dispatch(command: Command, config: &AppConfig) -> Result<(), AppError> {
    match command {
        Command::List(args) => commands::run_list(config, args).await,
        Command::Show(args) => commands::run_show(config, args).await,
        Command::Add(args) => commands::run_add(config, args).await,
        Command::Edit(args) => commands::run_edit(config, args).await,
        Command::Delete(args) => commands::run_delete(config, args).await,
        Command::Stats(args) => commands::run_stats(config, args).await,
        Command::Export(args) => commands::run_export(config, args).await,
        Command::Login(args) => commands::run_login(config, args).await,
        Command::Logout => commands::run_logout(config).await,
        Command::Whoami => commands::run_whoami(config).await,
    }
}

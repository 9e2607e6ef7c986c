use std::io;
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::Args;
use jobtrack::config::AppConfig;
use jobtrack::error::AppError;
use jobtrack::tracker::applications::{
    ApplicationDraft, ApplicationRecord, SessionStore, TrackerClient,
};
use jobtrack::tracker::stats::aggregate;
use serde_json::json;
use tracing::warn;

use crate::render;

#[derive(Args, Debug, Default)]
pub(crate) struct ListArgs {
    /// Only include applications whose stored status equals this value
    #[arg(long)]
    pub(crate) status: Option<String>,
    /// Emit the raw JSON payload instead of formatted lines
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ShowArgs {
    /// Application id
    pub(crate) id: String,
    /// Emit the raw JSON payload instead of formatted lines
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct AddArgs {
    /// Company the application was sent to
    #[arg(long)]
    pub(crate) company: String,
    /// Position applied for
    #[arg(long)]
    pub(crate) position: String,
    /// Date applied (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) date_applied: Option<NaiveDate>,
    /// Stored status string
    #[arg(long, default_value = "Applied")]
    pub(crate) status: String,
    /// Free-text notes
    #[arg(long)]
    pub(crate) notes: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct EditArgs {
    /// Application id
    pub(crate) id: String,
    /// Replace the company
    #[arg(long)]
    pub(crate) company: Option<String>,
    /// Replace the position
    #[arg(long)]
    pub(crate) position: Option<String>,
    /// Replace the date applied (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) date_applied: Option<NaiveDate>,
    /// Replace the stored status string
    #[arg(long)]
    pub(crate) status: Option<String>,
    /// Replace the notes
    #[arg(long)]
    pub(crate) notes: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct DeleteArgs {
    /// Application id
    pub(crate) id: String,
    /// Actually delete; without this flag the command refuses
    #[arg(long)]
    pub(crate) yes: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct StatsArgs {
    /// Emit the summary as JSON instead of formatted lines
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ExportArgs {
    /// Only export applications whose stored status equals this value
    #[arg(long)]
    pub(crate) status: Option<String>,
    /// Write the CSV here instead of stdout
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct LoginArgs {
    /// Account name
    #[arg(long)]
    pub(crate) username: String,
    /// Account password
    #[arg(long)]
    pub(crate) password: String,
}

pub(crate) async fn run_list(config: &AppConfig, args: ListArgs) -> Result<(), AppError> {
    let client = client(config)?;
    let records = client.list(args.status.as_deref()).await?;
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&records).map_err(io::Error::from)?
        );
    } else {
        render::application_list(&records);
    }
    Ok(())
}

pub(crate) async fn run_show(config: &AppConfig, args: ShowArgs) -> Result<(), AppError> {
    let client = client(config)?;
    let record = client.fetch(&args.id).await?;
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&record).map_err(io::Error::from)?
        );
    } else {
        render::application_detail(&record);
    }
    Ok(())
}

pub(crate) async fn run_add(config: &AppConfig, args: AddArgs) -> Result<(), AppError> {
    let AddArgs {
        company,
        position,
        date_applied,
        status,
        notes,
    } = args;

    let draft = ApplicationDraft {
        id: None,
        company,
        position,
        date_applied: date_applied.unwrap_or_else(|| Local::now().date_naive()),
        status,
        notes,
    };
    draft.validate()?;

    let client = client(config)?;
    let record = client.create(&draft).await?;
    println!("Added application {}", record.id);
    render::application(&record);
    Ok(())
}

pub(crate) async fn run_edit(config: &AppConfig, args: EditArgs) -> Result<(), AppError> {
    let client = client(config)?;
    let mut draft = client.fetch(&args.id).await?.to_draft();

    if let Some(company) = args.company {
        draft.company = company;
    }
    if let Some(position) = args.position {
        draft.position = position;
    }
    if let Some(date_applied) = args.date_applied {
        draft.date_applied = date_applied;
    }
    if let Some(status) = args.status {
        draft.status = status;
    }
    if let Some(notes) = args.notes {
        draft.notes = Some(notes);
    }
    draft.validate()?;

    let record = client.update(&args.id, &draft).await?;
    println!("Updated application {}", record.id);
    render::application(&record);
    Ok(())
}

pub(crate) async fn run_delete(config: &AppConfig, args: DeleteArgs) -> Result<(), AppError> {
    if !args.yes {
        println!("Refusing to delete {} without --yes.", args.id);
        return Ok(());
    }

    let client = client(config)?;
    client.delete(&args.id).await?;
    println!("Deleted application {}.", args.id);
    Ok(())
}

pub(crate) async fn run_stats(config: &AppConfig, args: StatsArgs) -> Result<(), AppError> {
    let client = client(config)?;
    let snapshot = client.statistics().await?;
    let totals = aggregate(&snapshot.status_counts)?;

    if !totals.matches_reported_total(snapshot.total_applications) {
        warn!(
            reported = snapshot.total_applications,
            counted = totals.total,
            "status counts do not add up to the reported total"
        );
    }

    if args.json {
        let payload = json!({
            "reported_total": snapshot.total_applications,
            "totals": totals,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).map_err(io::Error::from)?
        );
    } else {
        render::funnel(&snapshot, &totals);
    }
    Ok(())
}

pub(crate) async fn run_export(config: &AppConfig, args: ExportArgs) -> Result<(), AppError> {
    let client = client(config)?;
    let records = client.list(args.status.as_deref()).await?;

    match args.output {
        Some(path) => {
            let writer = csv::Writer::from_path(&path).map_err(csv_error)?;
            write_csv(&records, writer)?;
            println!("Exported {} application(s) to {}.", records.len(), path.display());
        }
        None => {
            let writer = csv::Writer::from_writer(io::stdout());
            write_csv(&records, writer)?;
        }
    }
    Ok(())
}

pub(crate) async fn run_login(config: &AppConfig, args: LoginArgs) -> Result<(), AppError> {
    let client = client(config)?;
    client.login(&args.username, &args.password).await?;
    println!("Signed in as {}.", args.username);
    Ok(())
}

pub(crate) async fn run_logout(config: &AppConfig) -> Result<(), AppError> {
    let client = client(config)?;
    client.logout().await?;
    println!("Signed out.");
    Ok(())
}

pub(crate) async fn run_whoami(config: &AppConfig) -> Result<(), AppError> {
    let client = client(config)?;
    let identity = client.whoami().await?;
    match identity.username {
        Some(username) => println!("Signed in as {username}."),
        None => println!("Signed in."),
    }
    Ok(())
}

fn client(config: &AppConfig) -> Result<TrackerClient, AppError> {
    let session = SessionStore::new(config.session.file.clone());
    Ok(TrackerClient::new(&config.api, session)?)
}

fn write_csv<W: io::Write>(
    records: &[ApplicationRecord],
    mut writer: csv::Writer<W>,
) -> Result<(), AppError> {
    for record in records {
        writer.serialize(record).map_err(csv_error)?;
    }
    writer.flush()?;
    Ok(())
}

fn csv_error(err: csv::Error) -> AppError {
    AppError::Io(io::Error::new(io::ErrorKind::Other, err))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

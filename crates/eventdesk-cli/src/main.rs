//! eventdesk - check main-organizer eligibility and render backend records
//! from the command line.

mod commands;
mod output;

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{ArgGroup, Args, Parser, Subcommand};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use eventdesk_core::config::Config;
use eventdesk_core::Locale;

/// Log file prefix inside the log directory
const LOG_FILE_PREFIX: &str = "eventdesk.log";

#[derive(Parser, Debug)]
#[command(
    name = "eventdesk",
    about = "Check event organizers and render backend records",
    version
)]
struct Cli {
    /// Output language (cs or en); defaults to the configured locale
    #[arg(long, global = true, value_parser = parse_locale)]
    locale: Option<Locale>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the qualifications a main organizer of an event needs
    Requirements {
        /// Event JSON as returned by the backend
        #[arg(long)]
        event: PathBuf,
    },
    /// Check whether a user may be an event's main organizer
    Check(CheckArgs),
    /// Render a backend record with translated labels
    Render(RenderArgs),
    /// Log in to the backend and store the session
    Login {
        #[arg(long)]
        email: String,
    },
    /// Forget the stored session, password and cached data
    Logout,
    /// Fetch event, user and categories from the backend and check them
    CheckRemote(CheckRemoteArgs),
}

#[derive(Args, Debug)]
struct CheckArgs {
    #[arg(long)]
    event: PathBuf,
    #[arg(long)]
    user: PathBuf,
    /// Qualification categories, as a list or a paginated response
    #[arg(long)]
    categories: PathBuf,
    /// Evaluation date (YYYY-MM-DD), defaults to today
    #[arg(long, value_parser = parse_date)]
    today: Option<NaiveDate>,
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("source").required(true).args(["data", "event_id", "user_id"])))]
struct RenderArgs {
    /// JSON record to render
    #[arg(long)]
    data: Option<PathBuf>,
    /// Fetch this event from the backend instead
    #[arg(long)]
    event_id: Option<i64>,
    /// Fetch this user from the backend instead
    #[arg(long)]
    user_id: Option<i64>,
    /// Model translation files (`model -> tree`), merged in order
    #[arg(long)]
    translations: Vec<PathBuf>,
    /// Flat generic translation file (`key -> label`)
    #[arg(long)]
    generic: Option<PathBuf>,
    /// Model name whose translation tree labels the record (e.g. `event`)
    #[arg(long)]
    model: Option<String>,
    /// Emit an HTML fragment instead of plain text
    #[arg(long)]
    html: bool,
}

#[derive(Args, Debug)]
struct CheckRemoteArgs {
    #[arg(long)]
    event_id: i64,
    #[arg(long)]
    user_id: i64,
    /// Ignore cached qualification categories
    #[arg(long)]
    refresh: bool,
    #[arg(long, value_parser = parse_date)]
    today: Option<NaiveDate>,
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn parse_locale(raw: &str) -> Result<Locale, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "cs" => Ok(Locale::Cs),
        "en" => Ok(Locale::En),
        _ => Err(format!("unsupported locale '{raw}', expected cs or en")),
    }
}

/// Initialize the tracing subscriber for logging.
///
/// `RUST_LOG` controls the level (default `warn`). Logs go to stderr, or to
/// a daily rotated file when the config asks for it; the returned guard
/// flushes that file on drop.
fn init_tracing(config: &Config) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let log_dir = config.log_to_file.then(|| config.log_dir().ok()).flatten();
    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .with(filter)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::stderr))
                .with(filter)
                .init();
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let mut config = Config::load()?;
    let log_guard = init_tracing(&config);

    let locale = cli.locale.unwrap_or_else(|| config.locale());
    info!(%locale, command = ?cli.command, "eventdesk starting");

    let eligible = match cli.command {
        Command::Requirements { event } => commands::requirements(&event).map(|_| true)?,
        Command::Check(args) => commands::check(
            &args.event,
            &args.user,
            &args.categories,
            args.today,
            locale,
        )?,
        Command::Render(args) => {
            let source = match (args.data, args.event_id, args.user_id) {
                (Some(path), _, _) => commands::RecordSource::File(path),
                (None, Some(id), _) => commands::RecordSource::Event(id),
                (None, None, Some(id)) => commands::RecordSource::User(id),
                (None, None, None) => anyhow::bail!("Nothing to render"),
            };
            let options = commands::RenderOptions {
                translations: args.translations,
                generic: args.generic,
                model: args.model,
                html: args.html,
            };
            commands::render(&config, source, options, locale).await.map(|_| true)?
        }
        Command::Login { email } => commands::login(&mut config, &email).await.map(|_| true)?,
        Command::Logout => commands::logout(&mut config).map(|_| true)?,
        Command::CheckRemote(args) => {
            commands::check_remote(
                &config,
                args.event_id,
                args.user_id,
                args.refresh,
                args.today,
                locale,
            )
            .await?
        }
    };

    if !eligible {
        drop(log_guard);
        std::process::exit(1);
    }
    Ok(())
}

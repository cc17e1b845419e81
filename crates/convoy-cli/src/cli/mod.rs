//! CLI entry and dispatch.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate, Utc};
use clap::Parser;
use convoy_core::config::Config;
use convoy_core::session::SessionStore;
use convoy_core::types::{DeliveryStatus, Filter, SortOrder};
use convoy_core::{Gateway, logging};

mod commands;

#[derive(Parser)]
#[command(name = "convoy")]
#[command(version)]
#[command(about = "Convoy webhook-delivery dashboard, in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Common list arguments shared by the paginated endpoints.
#[derive(clap::Args, Debug, Clone, Default)]
struct ListArgs {
    /// Page to fetch
    #[arg(long, default_value_t = 1)]
    page: u32,

    /// Items per page
    #[arg(long, value_name = "N")]
    per_page: Option<u32>,

    /// Sort by creation time: asc or desc
    #[arg(long, default_value = "desc")]
    sort: String,

    /// Only items created on or after this date (YYYY-MM-DD or RFC 3339)
    #[arg(long, value_name = "DATE")]
    start_date: Option<String>,

    /// Only items created on or before this date (YYYY-MM-DD or RFC 3339)
    #[arg(long, value_name = "DATE")]
    end_date: Option<String>,

    /// Free-text search over payloads
    #[arg(long)]
    query: Option<String>,

    /// Restrict to a single app (source)
    #[arg(long, value_name = "APP_ID")]
    app: Option<String>,
}

impl ListArgs {
    fn to_filter(&self, statuses: &[String]) -> Result<Filter> {
        let mut parsed_statuses = Vec::new();
        for status in statuses {
            let status: DeliveryStatus = status
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))
                .context("parse --status")?;
            parsed_statuses.push(status);
        }

        Ok(Filter {
            start_date: self
                .start_date
                .as_deref()
                .map(|d| parse_date(d, false))
                .transpose()
                .context("parse --start-date")?,
            end_date: self
                .end_date
                .as_deref()
                .map(|d| parse_date(d, true))
                .transpose()
                .context("parse --end-date")?,
            query: self.query.clone(),
            statuses: parsed_statuses,
            app_id: self.app.clone(),
            sort: self
                .sort
                .parse::<SortOrder>()
                .map_err(|e| anyhow::anyhow!(e))
                .context("parse --sort")?,
            per_page: self.per_page,
        })
    }
}

/// Parses a date flag: full RFC 3339, or a bare day that expands to the
/// start (for `--start-date`) or end (for `--end-date`) of that UTC day.
fn parse_date(value: &str, end_of_day: bool) -> Result<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }

    let day: NaiveDate = value
        .parse()
        .with_context(|| format!("Invalid date '{value}', expected YYYY-MM-DD or RFC 3339"))?;
    let time = if end_of_day {
        day.and_hms_opt(23, 59, 59)
    } else {
        day.and_hms_opt(0, 0, 0)
    };
    // Both fixed times are always valid for a NaiveDate.
    let time = time.context("construct day boundary")?;
    Ok(time.and_utc())
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Store a session (API token + project) for subsequent commands
    Login {
        /// Personal access token
        #[arg(long, env = "CONVOY_TOKEN")]
        token: String,

        /// Project (group) ID to scope requests to
        #[arg(long, value_name = "PROJECT_ID")]
        project: String,
    },

    /// Clear the stored session
    Logout,

    /// Browse ingested events
    Events {
        #[command(subcommand)]
        command: EventCommands,
    },

    /// Browse and retry event deliveries
    Deliveries {
        #[command(subcommand)]
        command: DeliveryCommands,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum EventCommands {
    /// Lists events grouped by day
    List {
        #[command(flatten)]
        list: ListArgs,
    },
    /// Shows one event in detail
    Show {
        /// The ID of the event
        #[arg(value_name = "EVENT_ID")]
        id: String,
    },
    /// Shows the deliveries fanned out from an event
    Deliveries {
        /// The ID of the event
        #[arg(value_name = "EVENT_ID")]
        id: String,
    },
}

#[derive(clap::Subcommand)]
enum DeliveryCommands {
    /// Lists event deliveries grouped by day
    List {
        #[command(flatten)]
        list: ListArgs,

        /// Delivery status to include (repeatable)
        #[arg(long, value_name = "STATUS")]
        status: Vec<String>,
    },
    /// Shows one delivery in detail
    Show {
        /// The ID of the delivery
        #[arg(value_name = "DELIVERY_ID")]
        id: String,
    },
    /// Shows a delivery's most recent attempt
    Attempts {
        /// The ID of the delivery
        #[arg(value_name = "DELIVERY_ID")]
        id: String,
    },
    /// Re-dispatches one delivery, then refreshes the list
    Retry {
        /// The ID of the delivery to resend
        #[arg(value_name = "DELIVERY_ID")]
        id: String,

        #[command(flatten)]
        list: ListArgs,
    },
    /// Re-dispatches a batch of deliveries, then refreshes the list
    BatchRetry {
        /// Delivery IDs to retry
        #[arg(value_name = "DELIVERY_ID", required = true)]
        ids: Vec<String>,

        #[command(flatten)]
        list: ListArgs,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Show the effective configuration
    Show,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init() {
        // Logging is best-effort; the command itself still runs.
        eprintln!("warning: {e:#}");
    }

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let config = Config::load().context("load config")?;

    match cli.command {
        Commands::Login { token, project } => commands::auth::login(&token, &project),
        Commands::Logout => commands::auth::logout(),
        Commands::Events { command } => {
            let gateway = open_gateway(&config)?;
            match command {
                EventCommands::List { list } => {
                    let filter = effective_filter(&config, &list, &[])?;
                    commands::events::list(&gateway, list.page, &filter).await
                }
                EventCommands::Show { id } => commands::events::show(&gateway, &id).await,
                EventCommands::Deliveries { id } => {
                    commands::events::deliveries(&gateway, &id).await
                }
            }
        }
        Commands::Deliveries { command } => {
            let gateway = open_gateway(&config)?;
            match command {
                DeliveryCommands::List { list, status } => {
                    let filter = effective_filter(&config, &list, &status)?;
                    commands::deliveries::list(&gateway, list.page, &filter).await
                }
                DeliveryCommands::Show { id } => {
                    commands::deliveries::show(&gateway, &id).await
                }
                DeliveryCommands::Attempts { id } => {
                    commands::deliveries::attempts(&gateway, &id).await
                }
                DeliveryCommands::Retry { id, list } => {
                    let filter = effective_filter(&config, &list, &[])?;
                    commands::deliveries::retry(&gateway, &id, list.page, &filter).await
                }
                DeliveryCommands::BatchRetry { ids, list } => {
                    let filter = effective_filter(&config, &list, &[])?;
                    commands::deliveries::batch_retry(&gateway, &ids, list.page, &filter).await
                }
            }
        }
        Commands::Config { command } => match command {
            ConfigCommands::Path => commands::config::path(),
            ConfigCommands::Show => commands::config::show(&config),
        },
    }
}

/// Builds a filter from flags, falling back to the configured page size.
fn effective_filter(config: &Config, list: &ListArgs, statuses: &[String]) -> Result<Filter> {
    let mut filter = list.to_filter(statuses)?;
    if filter.per_page.is_none() {
        filter.per_page = Some(config.per_page);
    }
    Ok(filter)
}

/// Opens a gateway from the stored session, or fails with a login hint.
fn open_gateway(config: &Config) -> Result<Gateway> {
    let store = SessionStore::new();
    let Some(session) = store.load().context("load session")? else {
        bail!("Not logged in. Run `convoy login --token <TOKEN> --project <PROJECT_ID>` first.");
    };
    let base_url = config.resolve_base_url()?;
    Ok(Gateway::new(
        base_url,
        session,
        config.timeout_secs,
        Some(store),
    ))
}

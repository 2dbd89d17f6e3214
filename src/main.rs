//! CLI entry point for the meteor tracker.
//!
//! Provides subcommands for the upcoming-week dashboard, today's approaches,
//! hazardous objects, the astronomy picture of the day, and single-object
//! lookup.

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use meteor_tracker::nasa::{Dashboard, NasaClient, NasaConfig};
use meteor_tracker::view::{self, HazardFilter, SortKey};
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "meteor_tracker")]
#[command(about = "Track Near Earth Objects approaching our planet", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show meteors for the next week, with the picture of the day
    Upcoming {
        /// Only show potentially hazardous objects
        #[arg(long, default_value_t = false)]
        hazardous_only: bool,

        /// Sort order for the list
        #[arg(short, long, value_enum, default_value_t = SortKey::Date)]
        sort: SortKey,

        /// Emit JSON instead of rendered cards
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Show meteors approaching today
    Today {
        /// Only show potentially hazardous objects
        #[arg(long, default_value_t = false)]
        hazardous_only: bool,

        /// Sort order for the list
        #[arg(short, long, value_enum, default_value_t = SortKey::Date)]
        sort: SortKey,

        /// Emit JSON instead of rendered cards
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// List potentially hazardous objects over the next week
    Hazardous {
        /// Emit JSON instead of a name/id listing
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Show the astronomy picture of the day
    Apod {
        /// Picture date (YYYY-MM-DD); defaults to today
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// Look up a single object by its NeoWs id
    Lookup {
        /// NeoWs object id
        #[arg(value_name = "NEO_ID")]
        id: String,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/meteor_tracker.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("meteor_tracker.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{e}");
        eprintln!("Check your connection and try again.");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let client = NasaClient::new(NasaConfig::from_env())?;

    match cli.command {
        Commands::Upcoming {
            hazardous_only,
            sort,
            json,
        } => {
            let dashboard = client.dashboard().await?;
            let out = upcoming_output(&dashboard, hazard_filter(hazardous_only), sort, json)?;
            println!("{out}");
        }
        Commands::Today {
            hazardous_only,
            sort,
            json,
        } => {
            let meteors = client.todays_meteors().await?;
            let events = view::filter_and_sort(&meteors, hazard_filter(hazardous_only), sort);

            if json {
                println!("{}", serde_json::to_string_pretty(&events)?);
            } else {
                println!("{}", view::render_list("Today's meteors", &events));
            }
        }
        Commands::Hazardous { json } => {
            let objects = client.fetch_hazardous_objects().await?;
            info!(count = objects.len(), "hazardous objects fetched");

            if json {
                println!("{}", serde_json::to_string_pretty(&objects)?);
            } else if objects.is_empty() {
                println!("No potentially hazardous meteors found in this time period.");
            } else {
                for neo in &objects {
                    println!("{}  (id {})", neo.name, neo.id);
                }
            }
        }
        Commands::Apod { date } => {
            let apod = client.fetch_picture_of_day(date).await?;
            match view::render_apod(&apod) {
                Some(section) => println!("{section}"),
                None => println!(
                    "Today's picture is {} media, not an image: {}",
                    apod.media_type, apod.url
                ),
            }
        }
        Commands::Lookup { id } => {
            let neo = client.fetch_object(&id).await?;
            println!("{}", serde_json::to_string_pretty(&neo)?);
        }
    }

    Ok(())
}

fn hazard_filter(hazardous_only: bool) -> HazardFilter {
    if hazardous_only {
        HazardFilter::Hazardous
    } else {
        HazardFilter::All
    }
}

/// Builds the `upcoming` command's output. The filter and sort controls
/// apply to both the rendered and the JSON form.
fn upcoming_output(
    dashboard: &Dashboard,
    filter: HazardFilter,
    sort: SortKey,
    json: bool,
) -> Result<String> {
    let events = view::filter_and_sort(&dashboard.meteors, filter, sort);

    if json {
        let selected = Dashboard {
            meteors: events,
            picture: dashboard.picture.clone(),
        };
        return Ok(serde_json::to_string_pretty(&selected)?);
    }

    let mut out = String::new();
    if let Some(section) = dashboard.picture.as_ref().and_then(view::render_apod) {
        out.push_str(&section);
        out.push_str("\n\n");
    }
    out.push_str(&view::render_list("Upcoming meteors", &events));
    Ok(out)
}

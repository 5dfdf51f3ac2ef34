// Week Grid
// Command-line entry point: lay out one week of events and print it as JSON

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::Parser;

use week_grid::services::clock::{Clock, SystemClock};
use week_grid::services::layout::layout;
use week_grid::services::settings::SettingsService;
use week_grid::services::source::{collect_sources, FetchWindow, JsonFileProvider};

#[derive(Parser, Debug)]
#[command(name = "week-grid", version, about = "Lay out a week of calendar events on a time grid")]
struct Cli {
    /// Configuration file (TOML). Defaults to the platform config directory.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Events file: JSON object mapping entity ids to event lists
    #[arg(short, long)]
    events: PathBuf,

    /// Any date inside the week to show (YYYY-MM-DD). Defaults to today.
    #[arg(short, long)]
    week: Option<NaiveDate>,

    /// Instant used for the current-time indicator (RFC 3339). Defaults to now.
    #[arg(long, value_parser = parse_instant)]
    now: Option<DateTime<Utc>>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

fn parse_instant(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|err| format!("expected an RFC 3339 timestamp: {}", err))
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => SettingsService::new(path.clone()),
        None => SettingsService::with_default_path()?,
    };
    let config = settings.load()?;
    let timezone = config.timezone()?;

    let now = cli.now.unwrap_or_else(|| SystemClock.now());
    let week = cli
        .week
        .unwrap_or_else(|| now.with_timezone(&timezone).date_naive());
    let grid = config.grid_for(week)?;

    log::info!(
        "Laying out week of {} ({}:00-{}:00, {})",
        grid.week_start(),
        grid.start_hour(),
        grid.end_hour(),
        timezone
    );

    let provider = JsonFileProvider::from_path(&cli.events, timezone)?;
    let entities = if config.entities.is_empty() {
        provider.entities().map(str::to_string).collect()
    } else {
        config.entity_order()
    };

    let window = FetchWindow::for_grid(&grid, &timezone);
    let sources = collect_sources(&provider, &entities, &window);
    let week_layout = layout(&sources, &grid, &timezone, now, &config.layout_options());

    let output = if cli.pretty {
        serde_json::to_string_pretty(&week_layout)
    } else {
        serde_json::to_string(&week_layout)
    }
    .context("Failed to serialize layout")?;
    println!("{}", output);

    Ok(())
}

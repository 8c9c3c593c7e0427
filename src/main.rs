use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cronfind::parser::CronParser;

const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Print the next occurrences of a seven-field cron expression.
#[derive(Parser, Debug)]
#[command(name = "cronfind", version, about)]
struct Cli {
    /// Expression: "second minute hour day-of-month month day-of-week year".
    expression: String,

    /// Reference instant (YYYY-MM-DDTHH:MM:SS), defaults to the local time.
    #[arg(long, env = "CRONFIND_FROM")]
    from: Option<String>,

    /// Number of occurrences to print.
    #[arg(long, env = "CRONFIND_COUNT", default_value_t = 5)]
    count: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let from = match &cli.from {
        Some(text) => NaiveDateTime::parse_from_str(text, TIME_FORMAT)
            .with_context(|| format!("invalid --from '{}', expected {}", text, TIME_FORMAT))?,
        None => Local::now().naive_local(),
    };

    let schedule = CronParser::new()
        .parse(&cli.expression)
        .with_context(|| format!("failed to parse '{}'", cli.expression))?;

    let mut printed = 0;
    for when in schedule.occurrences(from).take(cli.count) {
        println!("{}", when.format(TIME_FORMAT));
        printed += 1;
    }
    if printed == 0 {
        println!("no upcoming occurrence");
    }
    Ok(())
}

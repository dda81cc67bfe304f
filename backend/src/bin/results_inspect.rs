//! Print the stored assessment results as a JSON report.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::io;
use std::path::PathBuf;

use camino::Utf8PathBuf;
use clap::Parser;
use tokio::runtime::Builder;

use cogbattery::domain::ResultsReport;
use cogbattery::domain::ports::ResultsRepository;
use cogbattery::outbound::json_file::JsonFileResultsRepository;
use cogbattery::outbound::persistence::{DbPool, DieselResultsRepository, PoolConfig};

const DATABASE_URL_ENV: &str = "BATTERY_DATABASE_URL";
const DEFAULT_RESULTS_FILE: &str = "results.json";

/// `results-inspect` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "results-inspect",
    about = "Print stored battery results as the admin JSON report",
    version
)]
struct CliArgs {
    /// JSON results file. Ignored when a database URL is given.
    #[arg(long = "results-file", value_name = "path")]
    results_file: Option<PathBuf>,
    /// Database connection URL. Falls back to `BATTERY_DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
    /// Print only the sequence-memory rows.
    #[arg(long = "sequence-only")]
    sequence_only: bool,
}

fn main() -> io::Result<()> {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let records = match args
        .database_url
        .clone()
        .or_else(|| env::var(DATABASE_URL_ENV).ok())
    {
        Some(url) => {
            let pool = DbPool::new(PoolConfig::new(url))
                .await
                .map_err(|error| io::Error::other(format!("connect to database: {error}")))?;
            DieselResultsRepository::new(pool).list().await
        }
        None => {
            let path = args
                .results_file
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_RESULTS_FILE));
            let path = Utf8PathBuf::from_path_buf(path).map_err(|path| {
                io::Error::other(format!("results path is not UTF-8: {}", path.display()))
            })?;
            JsonFileResultsRepository::open(&path)
                .map_err(io::Error::other)?
                .list()
                .await
        }
    }
    .map_err(|error| io::Error::other(format!("read results: {error}")))?;

    let report = ResultsReport::build(&records);
    let json = if args.sequence_only {
        serde_json::to_string_pretty(&report.sequence)
    } else {
        serde_json::to_string_pretty(&report)
    }
    .map_err(io::Error::other)?;
    println!("{json}");
    Ok(())
}

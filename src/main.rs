use std::{io::Write, path::PathBuf, process::ExitCode, time::Duration};

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use irclog::{
    ingest::{
        driver::{IngestConfig, Ingestor},
        input::read_log,
        progress::{IngestSummary, Progress},
    },
    parse::timestamp::TimeZoneMode,
    persist::sqlite::SqliteLogStore,
};

/// Convert a plain-text IRC log into an SQLite database.
#[derive(Debug, Parser)]
#[command(name = "irclog", version)]
struct Cli {
    /// Text log to read.
    log: PathBuf,
    /// SQLite database to write; created if missing.
    db: PathBuf,
    /// Network the log was recorded on.
    network: String,
    /// Channel or query name.
    buffer: String,

    /// Milliseconds between batch commits.
    #[arg(long, env = "IRCLOG_COMMIT_INTERVAL_MS", default_value_t = 1000)]
    commit_interval_ms: u64,

    /// Read timestamps as UTC instead of local time.
    #[arg(long)]
    utc: bool,

    /// Do not print the progress line.
    #[arg(long)]
    quiet: bool,

    /// Print the run summary as JSON.
    #[arg(long)]
    summary_json: bool,
}

fn main() -> ExitCode {
    let json_logs = std::env::var("IRCLOG_LOG_JSON").unwrap_or_default() == "1";
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("irclog=info"));
    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let cli = Cli::parse();
    match run(&cli) {
        Ok(summary) => {
            if cli.summary_json {
                match serde_json::to_string(&summary) {
                    Ok(json) => println!("{json}"),
                    Err(e) => tracing::warn!("failed to encode summary: {e}"),
                }
            } else {
                println!(
                    "\nSuccessfully converted {} entries. {}/second",
                    summary.messages,
                    summary.rate()
                );
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            // Corrupt-line errors already name the line and its content.
            println!();
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<IngestSummary> {
    if !cli.quiet {
        println!(
            "Saving entries from {} to {}",
            cli.log.display(),
            cli.db.display()
        );
    }

    let input = read_log(&cli.log)
        .with_context(|| format!("failed to read {}", cli.log.display()))?;

    let store = SqliteLogStore::open(&cli.db)
        .with_context(|| format!("failed to open {}", cli.db.display()))?;
    let config = IngestConfig {
        network: cli.network.clone(),
        buffer: cli.buffer.clone(),
        commit_interval: Duration::from_millis(cli.commit_interval_ms),
        zone: if cli.utc {
            TimeZoneMode::Utc
        } else {
            TimeZoneMode::Local
        },
    };
    let mut ingestor = Ingestor::new(store, config)?;

    let quiet = cli.quiet;
    let summary = ingestor.run_with_progress(&input, |p: Progress| {
        if quiet {
            return;
        }
        print!(
            " Converted {}/{} entries. {}/second        \r",
            p.done,
            p.total,
            p.rate()
        );
        let _ = std::io::stdout().flush();
    })?;
    Ok(summary)
}

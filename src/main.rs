//! Command-line front-end to the Gini index, GDP and population dataset index

use gini_atlas::{
    cli::Args, config::Config, dataset::DatasetIndex, load, progress::ProgressReport,
    report::Answer, Result,
};
use log::LevelFilter;
use tokio::io::{AsyncWriteExt, BufWriter};

#[tokio::main]
async fn main() -> Result<()> {
    // Set up logging
    setup_logging().map_err(|e| anyhow::format_err!("{e}"))?;

    // Decode CLI arguments
    let args = Args::parse_and_check()?;
    let (config, command) = Config::new(args);

    // Load the dataset
    let report = ProgressReport::new();
    let client = reqwest::Client::new();
    let parsed = load::load(&config, client, &report).await?;

    // Deal with rejected rows
    if let Some(first_error) = parsed.errors.first() {
        let num_errors = parsed.errors.len();
        anyhow::ensure!(
            !config.strict,
            "rejected {num_errors} malformed rows from {}, starting with {first_error}",
            config.source
        );
        eprintln!(
            "Skipped {num_errors} malformed rows from {}, starting with {first_error}",
            config.source
        );
    }

    // Index the dataset and answer the query
    let index = DatasetIndex::build(parsed.records);
    let answer = Answer::new(&index, &command)?.render(config.format)?;

    // Display the answer
    {
        let stdout = tokio::io::stdout();
        let mut stdout = BufWriter::new(stdout);
        stdout.write_all(answer.as_bytes()).await?;
        stdout.flush().await?;
    }
    Ok(())
}

/// Set up logging
fn setup_logging() -> syslog::Result<()> {
    syslog::init(
        syslog::Facility::LOG_USER,
        if cfg!(feature = "log-trace") {
            LevelFilter::Trace
        } else if cfg!(debug_assertions) {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        },
        None,
    )
}

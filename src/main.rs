//! Wordcrawl main entry point
//!
//! This is the command-line interface for the Wordcrawl single-host word counter.

use anyhow::Context;
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use wordcrawl::cli::{usage, Cli, CrawlRequest, Invocation};
use wordcrawl::crawler::{Crawler, ReqwestFetcher};
use wordcrawl::output::write_report;
use wordcrawl::ConfigError;

#[tokio::main]
async fn main() -> ExitCode {
    let request = match Cli::parse_args().into_invocation() {
        Ok(Invocation::Help) => {
            println!("{}", usage());
            return ExitCode::SUCCESS;
        }
        Ok(Invocation::Crawl(request)) => request,
        Err(ConfigError::MissingUrl) => {
            eprintln!("{}", ConfigError::MissingUrl);
            eprintln!("Run 'wordcrawl help' for usage");
            return ExitCode::FAILURE;
        }
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    setup_logging(request.config.verbose);

    match handle_crawl(request).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Crawl failed: {:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Sets up the logging/tracing subscriber
///
/// `RUST_LOG` wins when set; otherwise `-v` enables debug output for this
/// crate. Logs go to stderr so stdout only carries the report.
fn setup_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("wordcrawl=debug")
        } else {
            EnvFilter::new("wordcrawl=warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Runs the crawl and prints the report
async fn handle_crawl(request: CrawlRequest) -> anyhow::Result<()> {
    let verbose = request.config.verbose;

    let fetcher = ReqwestFetcher::from_config(&request.config)
        .context("Failed to build HTTP client")?;
    let crawler = Crawler::new(&request.seed, Arc::new(fetcher), request.config)
        .with_context(|| format!("Cannot crawl {}", request.seed))?;

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupt received, stopping crawl");
                cancel.cancel();
            }
        });
    }

    let report = crawler.run_until_cancelled(cancel).await;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, &report, verbose).context("Failed to write report")?;
    out.flush()?;

    Ok(())
}

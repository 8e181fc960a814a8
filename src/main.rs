// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing)
// 3. Dispatch to the appropriate subcommand handler
// 4. Print the crawl report
// 5. Exit with proper code (0 = full mirror, 1 = partial mirror, 2 = error)
// =============================================================================

mod cli;        // src/cli.rs - command-line parsing
mod config;     // src/config.rs - validated crawl configuration
mod crawl;      // src/crawl/ - link extraction, scope, traversal
mod error;      // src/error.rs - error types
mod fetch;      // src/fetch/ - HTTP fetcher
mod resource;   // src/resource/ - identifiers and the service root
mod sink;       // src/sink/ - writing documents to disk

use anyhow::{anyhow, bail, Result};
use clap::Parser;
use std::path::Path;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Commands, CrawlArgs};
use config::CrawlConfig;
use crawl::{CrawlReport, Crawler, ResourceState};
use fetch::HttpFetcher;
use resource::ServiceRoot;
use sink::{FsSink, INDEX_FILE};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = every reachable resource was saved
//   Ok(1) = some resources failed, or the crawl was interrupted
//   Err   = configuration / authentication / unexpected error
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Crawl(args) => handle_crawl(&args).await,
        Commands::Locate { target, output_dir } => handle_locate(&target, &output_dir),
    }
}

// RUST_LOG wins; otherwise info, or debug for our own crate with --verbose
fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "info,redfish_mirror=debug"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

// Handles the 'crawl' subcommand
async fn handle_crawl(args: &CrawlArgs) -> Result<i32> {
    let config = CrawlConfig::from_args(args)?;

    if config.http.accept_invalid_certs {
        eprintln!("⚠️  TLS certificate verification is disabled (--insecure)");
    }
    println!("🔍 Crawling {} from {}", config.root.base_url(), config.start);
    println!("📁 Writing mirror to {}", config.output_dir.display());

    let fetcher = HttpFetcher::new(config.root.clone(), config.http.clone())?;
    let sink = FsSink::new(&config.output_dir);

    // ctrl-c stops the crawl between requests and keeps what was mirrored so far
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, stopping after the current request");
            let _ = shutdown_tx.send(true);
        }
    });

    let crawler = Crawler::new(config.root.clone(), fetcher, sink, config.options.clone())
        .with_shutdown(shutdown_rx);
    let report = crawler.crawl(&config.start).await?;

    print_results(&report, args.json)?;

    if report.is_complete() {
        Ok(0)
    } else {
        Ok(1)
    }
}

// Handles the 'locate' subcommand
//
// "/redfish/v1/Chassis/1"                 -> redfish_mock_data/Chassis/1/index.json
// "redfish_mock_data/Chassis/1/index.json" -> /redfish/v1/Chassis/1
fn handle_locate(target: &str, output_dir: &Path) -> Result<i32> {
    // Only the path matters here; the host is never contacted
    let root = ServiceRoot::new("localhost")?;
    let sink = FsSink::new(output_dir);

    if target.ends_with(INDEX_FILE) {
        match sink.identifier_for(Path::new(target), &root) {
            Some(id) => println!("{}", id),
            None => bail!(
                "{} is not an {} inside {}",
                target,
                INDEX_FILE,
                sink.output_root().display()
            ),
        }
    } else {
        let id = root
            .resolve(target)
            .ok_or_else(|| anyhow!("Invalid resource identifier: {}", target))?;
        println!("{}", sink.location(&id)?.display());
    }

    Ok(0)
}

// Prints the report either as a table or JSON
fn print_results(report: &CrawlReport, json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(report)?;
        println!("{}", json_output);
    } else {
        print_table(report);
    }
    Ok(())
}

// Prints the report as a human-readable table in the terminal
fn print_table(report: &CrawlReport) {
    println!();
    println!("{:<60} {:<15} {:<30}", "RESOURCE", "STATUS", "DETAIL");
    println!("{}", "=".repeat(105));

    for outcome in &report.resources {
        let id = outcome.id.as_str();
        let id_display = if id.len() > 57 {
            format!("...{}", &id[id.len() - 54..])
        } else {
            id.to_string()
        };

        println!(
            "{:<60} {:<15} {:<30}",
            id_display,
            format_status(&outcome.state),
            format_detail(&outcome.state)
        );
    }

    println!();
    println!("📊 Summary:");
    println!("   ✅ Saved: {}", report.saved_count());
    println!("   ❌ Failed: {}", report.failed_count());
    println!("   📋 Total: {}", report.resources.len());
    if report.interrupted {
        println!("   ⏹️  Interrupted with {} resource(s) still queued", report.pending);
    }
    println!("   ⏱️  {} ms", report.elapsed_ms);
}

fn format_status(state: &ResourceState) -> String {
    let icon = if state.is_saved() { "✅" } else { "❌" };
    format!("{} {}", icon, state.label())
}

fn format_detail(state: &ResourceState) -> String {
    match state {
        ResourceState::Saved { path } => path.display().to_string(),
        ResourceState::FetchFailed {
            status: Some(status),
            ..
        } => format!("HTTP {}", status),
        ResourceState::FetchFailed {
            transport: Some(kind),
            ..
        } => kind.to_string(),
        ResourceState::FetchFailed { reason, .. }
        | ResourceState::ParseFailed { reason }
        | ResourceState::PersistFailed { reason } => reason.clone(),
    }
}

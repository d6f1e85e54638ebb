//! Forum-Ripple main entry point
//!
//! This is the command-line interface for the Forum-Ripple thread archiver.

use clap::Parser;
use forum_ripple::config::{load_config_with_hash, load_seeds, validate, Config, SeedList};
use forum_ripple::crawler::crawl;
use forum_ripple::output::print_report;
use forum_ripple::RippleError;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Forum-Ripple: an original-poster thread archiver
///
/// Forum-Ripple reads thread URLs from a seed file, keeps only the posts
/// written by each thread's original poster across every page, saves their
/// text and images, and follows links to other threads found in those posts.
#[derive(Parser, Debug)]
#[command(name = "forum-ripple")]
#[command(version = "1.0.0")]
#[command(about = "An original-poster thread archiver", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Seed file with one thread URL per line (overrides the config)
    #[arg(value_name = "SEEDS")]
    seeds: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Override the maximum recursion depth
    #[arg(long, value_name = "N")]
    max_depth: Option<u32>,

    /// Show the resolved configuration and seeds without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    run(cli).await?;
    Ok(())
}

/// Loads configuration and seeds, then dispatches to the selected mode
async fn run(cli: Cli) -> forum_ripple::Result<()> {
    let (mut config, config_hash) = match &cli.config {
        Some(path) => {
            let (config, hash) = load_config_with_hash(path)?;
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };

    if let Some(depth) = cli.max_depth {
        config.crawler.max_depth = depth;
        validate(&config)?;
    }
    if let Some(seeds) = &cli.seeds {
        config.crawler.seeds_path = seeds.display().to_string();
    }

    setup_logging(cli.verbose, cli.quiet, Path::new(&config.output.log_path))?;

    match (&cli.config, &config_hash) {
        (Some(path), Some(hash)) => {
            tracing::info!("Configuration loaded from {} (hash: {})", path.display(), hash)
        }
        _ => tracing::info!("No configuration file given, using defaults"),
    }

    let seeds = match load_seeds(Path::new(&config.crawler.seeds_path)) {
        Ok(seeds) => seeds,
        Err(e) => {
            tracing::error!("{}", e);
            return Err(RippleError::Config(e));
        }
    };
    for (line, content) in &seeds.rejected {
        tracing::warn!("Skipping seed line {}: {}", line, content);
    }

    if cli.dry_run {
        handle_dry_run(&config, &seeds);
        return Ok(());
    }

    handle_crawl(&config, &seeds).await
}

/// Filter directives for a verbosity level
fn filter_directives(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        // Only show errors
        return "error";
    }
    match verbose {
        0 => "forum_ripple=info,warn",
        1 => "forum_ripple=debug,info",
        2 => "forum_ripple=trace,debug",
        _ => "trace",
    }
}

/// Sets up console and log-file output
///
/// `-q` only quiets the console; the log file always keeps every step.
fn setup_logging(verbose: u8, quiet: bool, log_path: &Path) -> std::io::Result<()> {
    let log_file = open_log_file(log_path)?;

    let console = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_filter(EnvFilter::new(filter_directives(verbose, quiet)));

    let file = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(log_file))
        .with_filter(EnvFilter::new(filter_directives(verbose, false)));

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .init();

    Ok(())
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Handles the --dry-run mode: shows the resolved configuration and seeds
fn handle_dry_run(config: &Config, seeds: &SeedList) {
    println!("=== Forum-Ripple Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Seed file: {}", config.crawler.seeds_path);

    println!("\nHTTP:");
    println!("  User agent: {}", config.user_agent.value);
    println!("  Page timeout: {}s", config.http.timeout_secs);
    println!("  Connect timeout: {}s", config.http.connect_timeout_secs);
    println!("  Image timeout: {}s", config.http.image_timeout_secs);
    println!(
        "  Proxy: {}",
        config.http.proxy.as_deref().unwrap_or("(none)")
    );

    println!("\nOutput:");
    println!("  Archive directory: {}", config.output.archive_dir);
    println!("  Text file: {}", config.output.text_file_name);
    println!("  Log file: {}", config.output.log_path);

    println!("\nSeeds ({}):", seeds.len());
    for seed in &seeds.urls {
        println!("  - {}", seed);
    }
    if !seeds.rejected.is_empty() {
        println!("\nRejected lines ({}):", seeds.rejected.len());
        for (line, content) in &seeds.rejected {
            println!("  - line {}: {}", line, content);
        }
    }

    match seeds.allowed_origin() {
        Some(origin) => println!("\n✓ Links will be followed within {}", origin),
        None => println!("\n✗ No usable seed; nothing would be crawled"),
    }
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, seeds: &SeedList) -> forum_ripple::Result<()> {
    if seeds.is_empty() {
        tracing::warn!("Seed file {} has no usable URLs", config.crawler.seeds_path);
    }

    match crawl(config, seeds).await {
        Ok(report) => {
            tracing::info!("Crawl completed");
            print_report(&report);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e)
        }
    }
}

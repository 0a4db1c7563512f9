//! Contact-Sweep main entry point
//!
//! This is the command-line interface for the Contact-Sweep batch scanner.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use contact_sweep::config::{load_config, validate, Config};
use contact_sweep::output::run_selftest;
use contact_sweep::scanner::{DomainScanner, Extractor};
use contact_sweep::server;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Contact-Sweep: a concurrent link and contact scanner
///
/// Contact-Sweep fetches batches of web pages under a bounded concurrency budget and
/// reports the links, email addresses, and phone numbers found on each page.
#[derive(Parser, Debug)]
#[command(name = "contact-sweep")]
#[command(version)]
#[command(about = "A concurrent link and contact scanner", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP service exposing POST /scan
    Serve(ServeArgs),

    /// Scan a single URL and print its result as JSON
    Scan(ScanArgs),

    /// Check the extractor against an HTML fixture
    Selftest(SelftestArgs),
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to bind
    #[arg(short, long)]
    port: Option<u16>,

    /// Ceiling for concurrent fetches per batch
    #[arg(long, env = "CONTACT_SWEEP_MAX_CONCURRENCY")]
    max_concurrency: Option<usize>,

    /// Default per-URL timeout in seconds
    #[arg(long, value_name = "SECONDS", env = "CONTACT_SWEEP_REQUEST_TIMEOUT")]
    timeout: Option<f64>,
}

#[derive(Args, Debug)]
struct ScanArgs {
    /// URL to scan; `https://` is assumed when no scheme is given
    url: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Per-URL timeout in seconds
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<f64>,

    /// User-Agent header to send instead of the configured one
    #[arg(long)]
    user_agent: Option<String>,
}

#[derive(Args, Debug)]
struct SelftestArgs {
    /// HTML fixture to extract
    #[arg(default_value = "fixtures/sample_site.html")]
    fixture: PathBuf,

    /// Expected result JSON (defaults to the fixture path with `.expected.json`)
    #[arg(short, long, value_name = "FILE")]
    expected: Option<PathBuf>,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match cli.command {
        Command::Serve(args) => handle_serve(args).await?,
        Command::Scan(args) => handle_scan(args).await?,
        Command::Selftest(args) => handle_selftest(args)?,
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// `RUST_LOG`, when set, takes precedence over the flags.
fn setup_logging(verbose: u8, quiet: bool) {
    let default_filter = if quiet {
        "error"
    } else {
        match verbose {
            0 => "contact_sweep=info,warn",
            1 => "contact_sweep=debug,tower_http=debug,info",
            2 => "contact_sweep=trace,tower_http=trace,debug",
            _ => "trace",
        }
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the configuration file if one was given, otherwise the built-in defaults
fn base_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path).with_context(|| format!("Failed to load {}", path.display()))
        }
        None => Ok(Config::default()),
    }
}

/// Converts a seconds flag to milliseconds; non-positive values become 0 and fail validation
fn secs_to_millis(secs: f64) -> u64 {
    if secs.is_finite() && secs > 0.0 {
        (secs * 1000.0).round().max(1.0) as u64
    } else {
        0
    }
}

/// Handles `serve`: defaults, then file, then flags and environment
async fn handle_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = base_config(args.config.as_deref())?;

    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(max) = args.max_concurrency {
        config.scanner.max_concurrency = max;
    }
    if let Some(secs) = args.timeout {
        config.scanner.request_timeout_ms = secs_to_millis(secs);
    }

    validate(&config).context("Invalid configuration")?;
    server::serve(&config).await.context("Server failed")?;
    Ok(())
}

/// Handles `scan`: exits with status 1 when the URL did not scan cleanly
async fn handle_scan(args: ScanArgs) -> anyhow::Result<()> {
    let mut config = base_config(args.config.as_deref())?;
    if let Some(secs) = args.timeout {
        config.scanner.request_timeout_ms = secs_to_millis(secs);
    }
    validate(&config).context("Invalid configuration")?;

    let scanner = DomainScanner::new(&config).context("Failed to build HTTP client")?;
    let timeout = config.scanner.request_timeout();
    let result = scanner
        .scan_gated(&args.url, timeout, args.user_agent.as_deref(), None)
        .await;

    println!("{}", serde_json::to_string_pretty(&result)?);

    if !result.is_ok() {
        std::process::exit(1);
    }
    Ok(())
}

/// Handles `selftest`: prints the report and exits with status 1 on mismatch
fn handle_selftest(args: SelftestArgs) -> anyhow::Result<()> {
    let expected = args
        .expected
        .unwrap_or_else(|| args.fixture.with_extension("expected.json"));

    let report = run_selftest(&args.fixture, &expected, &Extractor::default())
        .with_context(|| format!("Self-test of {} could not run", args.fixture.display()))?;

    let rendered = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{}", rendered);

    if !report.success {
        tracing::error!("Self-test failed for {}", args.fixture.display());
        std::process::exit(1);
    }
    Ok(())
}

//! WPBot - Main entry point
//!
//! Command-line front end: reads recipients and a message, then drives
//! WhatsApp Web through a WebDriver endpoint to send the message to each
//! recipient in turn.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use wpbot::config::load_country_table;
use wpbot::normalization::normalize_lines;
use wpbot::recipients::{build_recipient_list, read_recipient_lines, resolve_message};
use wpbot::strategy::{OneShotOptions, SendStrategy};
use wpbot::webdriver::BrowserOptions;
use wpbot::{
    spawn_batch, BatchReport, CanonicalNumber, Config, CountryTable, DispatchError, Dispatcher,
    Metrics, PacingConfig, PersistentSession, ScriptedOneShot, WebDriverChatSession,
    WebDriverClient, WebDriverLauncher,
};

#[derive(Parser, Debug)]
#[command(name = "wpbot", version, about = "Send one WhatsApp message to a list of phone numbers")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON file with country rules replacing the built-in table
    #[arg(long, global = true, value_name = "FILE")]
    countries_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Send a message to every recipient in a file
    Send(SendArgs),

    /// Print the normalized, de-duplicated numbers of a recipients file
    Normalize(NormalizeArgs),

    /// List the known countries and their dialing codes
    Countries,
}

#[derive(Args, Debug)]
struct SendArgs {
    /// Recipients file, one number per line ("#" starts a comment)
    #[arg(short, long, value_name = "FILE")]
    recipients: PathBuf,

    /// Message text
    #[arg(short, long, conflicts_with = "message_file")]
    message: Option<String>,

    /// File containing the message text
    #[arg(long, value_name = "FILE")]
    message_file: Option<PathBuf>,

    /// Seconds the web client gets to load a chat
    #[arg(long, default_value_t = 40)]
    wait: u64,

    /// Seconds to wait before closing the browser after a send
    #[arg(long, default_value_t = 3)]
    close_time: u64,

    /// Leave the browser open after a scripted send (until the next recipient)
    #[arg(long)]
    keep_tab_open: bool,

    /// Reuse one logged-in browser session for the whole batch
    #[arg(long)]
    single_tab: bool,

    /// Normalize local numbers for this country instead of requiring "+" numbers
    #[arg(long)]
    country: Option<String>,

    /// Drop repeated recipients, keeping the first occurrence
    #[arg(long)]
    dedupe: bool,

    /// Browser profile directory (overrides WPBOT_CHROME_USER_DATA_DIR)
    #[arg(long, value_name = "DIR")]
    user_data_dir: Option<PathBuf>,

    /// WebDriver endpoint (overrides WPBOT_WEBDRIVER_URL)
    #[arg(long, value_name = "URL")]
    webdriver_url: Option<String>,
}

#[derive(Args, Debug)]
struct NormalizeArgs {
    /// Recipients file with locally formatted numbers
    #[arg(short, long, value_name = "FILE")]
    recipients: PathBuf,

    /// Country whose local formats apply (default: WPBOT_DEFAULT_COUNTRY)
    #[arg(long)]
    country: Option<String>,
}

fn init_logging(verbose: bool) {
    // Logs go to stderr; stdout carries command output only
    let default_filter = if verbose { "wpbot=debug" } else { "wpbot=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let table = load_country_table(cli.countries_file.as_deref())?;

    match cli.command {
        Command::Send(args) => run_send(args, config, &table).await,
        Command::Normalize(args) => run_normalize(args, &config, &table),
        Command::Countries => {
            print_countries(&table);
            Ok(())
        }
    }
}

async fn run_send(args: SendArgs, mut config: Config, table: &CountryTable) -> Result<()> {
    if let Some(url) = args.webdriver_url {
        Config::validate_http_url("--webdriver-url", &url)?;
        config.webdriver_url = url;
    }
    if args.user_data_dir.is_some() {
        config.chrome_user_data_dir = args.user_data_dir;
    }

    let message = resolve_message(args.message.as_deref(), args.message_file.as_deref())?;
    let metrics = Metrics::new();
    let recipients = load_recipients(
        &args.recipients,
        args.country.as_deref(),
        args.dedupe,
        table,
        &metrics,
    )?;

    if recipients.is_empty() {
        println!("No valid recipients found.");
        return Ok(());
    }

    info!(
        "Using WebDriver at {} ({} recipient(s))",
        config.webdriver_url,
        recipients.len()
    );

    let client = WebDriverClient::new(&config).with_metrics(metrics.clone());
    let browser = BrowserOptions::new(config.chrome_user_data_dir.clone());

    let (strategy, pacing): (Box<dyn SendStrategy>, PacingConfig) = if args.single_tab {
        let session = WebDriverChatSession::new(
            client,
            browser.prepare_profile(),
            config.web_client_url.clone(),
            args.wait,
        );
        (
            Box::new(PersistentSession::new(session, args.wait)),
            PacingConfig::persistent_session(),
        )
    } else {
        let launcher = WebDriverLauncher::new(
            client,
            browser.prepare_profile(),
            config.web_client_url.clone(),
        );
        let options = OneShotOptions {
            wait_seconds: args.wait,
            close_tab: !args.keep_tab_open,
            close_time_seconds: args.close_time,
        };
        (
            Box::new(ScriptedOneShot::new(launcher, options)),
            PacingConfig::scripted(args.wait),
        )
    };

    let dispatcher = Dispatcher::new(pacing).with_metrics(metrics.clone());
    let mut handle = spawn_batch(dispatcher, recipients, message, strategy);

    while let Some(event) = handle.next_event().await {
        println!("{}", event);
    }

    let result = handle.finish().await;
    log_metrics(&metrics);

    match result {
        Ok(report) => {
            print_summary(&report);
            Ok(())
        }
        Err(DispatchError::Infrastructure { reason, report }) => {
            print_summary(&report);
            Err(anyhow::anyhow!("Batch aborted: {}", reason))
        }
        Err(e) => Err(e.into()),
    }
}

/// Read the recipients file, either through the strict canonical gate or,
/// with a country, through normalization.
fn load_recipients(
    path: &Path,
    country: Option<&str>,
    unique: bool,
    table: &CountryTable,
    metrics: &Metrics,
) -> Result<Vec<CanonicalNumber>> {
    let lines = read_recipient_lines(path)?;

    let recipients = match country {
        Some(country) => {
            let batch = normalize_lines(&lines, table, country, unique);
            metrics.record_recipients_skipped(batch.rejected.len());
            batch.numbers
        }
        None => {
            let scan = build_recipient_list(&lines);
            metrics.record_recipients_skipped(scan.skipped.len());
            if unique {
                wpbot::dedupe(scan.recipients)
            } else {
                scan.recipients
            }
        }
    };

    Ok(recipients)
}

fn run_normalize(args: NormalizeArgs, config: &Config, table: &CountryTable) -> Result<()> {
    let country = args.country.as_deref().unwrap_or(&config.default_country);
    let lines = read_recipient_lines(&args.recipients)
        .with_context(|| format!("reading {}", args.recipients.display()))?;

    let batch = normalize_lines(&lines, table, country, true);

    for number in &batch.numbers {
        println!("{}", number);
    }

    if !batch.rejected.is_empty() {
        warn!(
            "{} line(s) could not be normalized for {}",
            batch.rejected.len(),
            country
        );
    }
    info!("{} unique number(s)", batch.numbers.len());

    Ok(())
}

fn print_countries(table: &CountryTable) {
    for rule in table.sorted_by_name() {
        println!(
            "{:<24} {:<6} {}",
            rule.name(),
            rule.dialing_code(),
            rule.local_prefix_patterns().join(", ")
        );
    }
}

fn print_summary(report: &BatchReport) {
    println!(
        "Summary: {} sent, {} failed, {} not attempted ({}s)",
        report.sent_count(),
        report.failed_count(),
        report.not_attempted.len(),
        report.elapsed().num_seconds()
    );

    for outcome in report.failed() {
        println!("  failed: {}", outcome.recipient);
    }
    for recipient in &report.not_attempted {
        println!("  not attempted: {}", recipient);
    }
}

fn log_metrics(metrics: &Metrics) {
    let summary = metrics.summary();
    info!(
        "WebDriver requests: {} ({} errors, avg {:.1}ms); messages sent: {}, failed: {}; skipped lines: {}",
        summary.webdriver_requests_total,
        summary.webdriver_errors_total,
        summary.webdriver_duration_avg_ms,
        summary.messages_sent_total,
        summary.messages_failed_total,
        summary.recipients_skipped_total
    );
}

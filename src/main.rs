//! feedchart - live bar chart of a WebSocket data feed
//!
//! Connects to the counting device, draws one bar per category, and keeps
//! reconnecting after a fixed delay whenever the link drops.
//!
//! ## Usage
//!
//! ```bash
//! # Start the dashboard against the default device
//! feedchart
//!
//! # Another endpoint and a faster retry
//! feedchart --endpoint ws://127.0.0.1:8080 --reconnect-delay-ms 500
//!
//! # No terminal UI, log chart updates instead
//! feedchart --headless -v
//!
//! # Custom config file and log directory
//! feedchart --config ./feedchart.yaml --log-dir /tmp/feedchart-logs
//! ```

use std::io::Write;
use std::panic;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use feedchart_config::{Config, Overrides};
use feedchart_core::{FeedChartError, LogGuard, LogOutput, init_logging};
use feedchart_feed::{FeedListener, ListenerConfig};
use feedchart_tui::{App, SnapshotSink, run_headless};
use tracing::{error, info};

/// Live bar chart of a WebSocket data feed
///
/// Shows the latest quantity per category as reported by the device and
/// reconnects automatically when the connection drops.
#[derive(Parser, Debug)]
#[command(name = "feedchart")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// WebSocket endpoint of the data source (overrides the config file)
    #[arg(long)]
    endpoint: Option<String>,

    /// Milliseconds to wait before reconnecting (overrides the config file)
    #[arg(long)]
    reconnect_delay_ms: Option<u64>,

    /// Config file (defaults to ~/.feedchart/config.yaml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run without the terminal UI and log chart updates instead
    #[arg(long)]
    headless: bool,

    /// Directory for log files (defaults to ~/.feedchart/logs/)
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Enable verbose logging (increases log level)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            report(&e);
            return ExitCode::from(1);
        }
    };

    let _guard = match setup_logging(&cli, &config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            return ExitCode::from(1);
        }
    };

    if !cli.headless {
        install_panic_hook();
    }

    info!(
        endpoint = %config.feed.endpoint,
        reconnect_delay_ms = config.feed.reconnect_delay_ms,
        headless = cli.headless,
        "Starting feedchart"
    );

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to start runtime: {}", e);
            eprintln!("Error: failed to start runtime: {}", e);
            return ExitCode::from(1);
        }
    };

    match runtime.block_on(run(&config, cli.headless)) {
        Ok(()) => {
            info!("feedchart exited normally");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("feedchart error: {}", e);
            report(&e);
            ExitCode::from(1)
        }
    }
}

/// Load the config file and apply command line overrides.
fn load_config(cli: &Cli) -> feedchart_core::Result<Config> {
    let config = Config::load(cli.config.as_deref())?.with_overrides(Overrides {
        endpoint: cli.endpoint.clone(),
        reconnect_delay_ms: cli.reconnect_delay_ms,
        log_dir: cli.log_dir.clone(),
    });
    config.validate()?;
    Ok(config)
}

/// Set up logging based on CLI arguments and config.
fn setup_logging(cli: &Cli, config: &Config) -> feedchart_core::Result<LogGuard> {
    // The TUI owns the terminal, so only headless mode logs to stderr
    let output = if cli.headless {
        LogOutput::FileAndConsole
    } else {
        LogOutput::FileOnly
    };
    init_logging(config.logging.dir.clone(), cli.verbose > 0, output)
}

/// Start the listener, run the chosen front end, then stop the listener.
async fn run(config: &Config, headless: bool) -> feedchart_core::Result<()> {
    let listener_config = ListenerConfig::new(&config.feed.endpoint, config.feed.reconnect_delay())
        .with_buffer_size(config.feed.channel_buffer);
    let (listener, mut events) = FeedListener::new(listener_config);
    let handle = listener.spawn();

    let result = if headless {
        let mut sink = SnapshotSink::new();
        run_headless(&mut sink, &mut events, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for Ctrl+C: {}", e);
            }
        })
        .await;
        info!(updates = sink.updates(), snapshot = %sink.summary(), "final chart");
        Ok(())
    } else {
        let mut app = App::new(config);
        app.run(&mut events)
            .await
            .map_err(|e| FeedChartError::TerminalInit {
                message: e.to_string(),
            })
    };

    // Unblock a listener waiting on a full channel before asking it to stop
    drop(events);
    handle.stop().await;
    result
}

/// Print an error and any guidance to stderr.
fn report(e: &FeedChartError) {
    eprintln!("{}: {}", error_label(e), e);
    if let Some(hint) = e.guidance() {
        eprintln!("Hint: {}", hint);
    }
}

fn error_label(e: &FeedChartError) -> &'static str {
    if e.is_fatal() { "Fatal error" } else { "Error" }
}

/// Install a panic hook that restores the terminal before printing the panic message.
fn install_panic_hook() {
    let original_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));
}

/// Restore terminal to its normal state.
fn restore_terminal() -> std::io::Result<()> {
    let mut stdout = std::io::stdout();

    let _ = crossterm::terminal::disable_raw_mode();
    crossterm::execute!(
        stdout,
        crossterm::terminal::LeaveAlternateScreen,
        crossterm::cursor::Show
    )?;
    stdout.flush()?;

    Ok(())
}

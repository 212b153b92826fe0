//! GreenHero Headless
//!
//! Drives a [`Hub`] from line commands on stdin and prints every
//! [`HubMessage`] as one JSON object per line on stdout. Logs go to stderr,
//! so stdout stays machine-readable.
//!
//! # Usage
//!
//! ```bash
//! printf 'upload meal.jpg\nanalyze\nwait\nquit\n' | greenhero-headless
//!
//! # Fast, reproducible runs
//! GREENHERO_ANALYSIS_DELAY_MS=10 GREENHERO_SEED=7 greenhero-headless
//!
//! # With verbose logging
//! RUST_LOG=debug greenhero-headless
//! ```
//!
//! # Commands
//!
//! - `snapshot`: print the full ledger state
//! - `complete <task-id>`: mark a task done
//! - `upload <path>`: load a meal photo
//! - `analyze` / `cancel`: start or cancel analysis
//! - `wait`: block until the analysis in flight settles
//! - `quote <reward-id>` / `confirm <quote-id>` / `drop <quote-id>`: redeem
//! - `quit`: shut down (also on end of input or Ctrl+C)

use std::future::Future;
use std::path::PathBuf;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};

use greenhero_core::{
    load_config, Hub, HubMessage, MealClassifier, MockClassifier, QuoteId, SurfaceEvent,
};

/// One parsed stdin line
#[derive(Debug, PartialEq)]
enum Command {
    Event(SurfaceEvent),
    Wait,
    Help,
}

const HELP: &str = "commands: snapshot | complete <task-id> | upload <path> | analyze | cancel | \
                    wait | quote <reward-id> | confirm <quote-id> | drop <quote-id> | quit";

fn parse_command(line: &str) -> Result<Command, String> {
    let mut parts = line.split_whitespace();
    let verb = parts.next().unwrap_or_default();
    let arg = parts.collect::<Vec<_>>().join(" ");

    let event = match verb {
        "snapshot" => SurfaceEvent::RequestSnapshot,
        "complete" => SurfaceEvent::CompleteTask {
            task_id: parse_number(&arg, "task id")?.into(),
        },
        "upload" if !arg.is_empty() => SurfaceEvent::ImageSelected {
            path: PathBuf::from(arg),
        },
        "upload" => return Err("upload needs a file path".to_string()),
        "analyze" => SurfaceEvent::StartAnalysis,
        "cancel" => SurfaceEvent::CancelAnalysis,
        "quote" => SurfaceEvent::QuoteRedemption {
            reward_id: parse_number(&arg, "reward id")?.into(),
        },
        "confirm" => SurfaceEvent::ConfirmRedemption {
            quote_id: parse_quote(&arg)?,
        },
        "drop" => SurfaceEvent::CancelQuote {
            quote_id: parse_quote(&arg)?,
        },
        "quit" | "exit" => SurfaceEvent::QuitRequested,
        "wait" => return Ok(Command::Wait),
        "help" | "" => return Ok(Command::Help),
        other => return Err(format!("unknown command: {other}")),
    };
    Ok(Command::Event(event))
}

fn parse_number(arg: &str, what: &str) -> Result<u32, String> {
    arg.trim()
        .parse()
        .map_err(|_| format!("expected a {what}, got {arg:?}"))
}

fn parse_quote(arg: &str) -> Result<QuoteId, String> {
    let digits = arg.trim().trim_start_matches('q');
    digits
        .parse::<u64>()
        .map(QuoteId)
        .map_err(|_| format!("expected a quote id like q1, got {arg:?}"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("greenhero_headless=info".parse()?)
                .add_directive("greenhero_core=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let config = load_config()?;
    info!(
        source = %config.source,
        delay = ?config.analysis.delay,
        "Starting GreenHero headless"
    );

    let (msg_tx, mut msg_rx) = mpsc::channel::<HubMessage>(256);
    let classifier = MockClassifier::new(config.analysis.mock_config());
    let mut hub = Hub::new(classifier, config, msg_tx);

    let printer = tokio::spawn(async move {
        while let Some(msg) = msg_rx.recv().await {
            match serde_json::to_string(&msg) {
                Ok(line) => println!("{line}"),
                Err(e) => warn!(error = %e, "Failed to encode message"),
            }
        }
    });

    hub.handle_event(SurfaceEvent::Connected).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut tick = tokio::time::interval(tokio::time::Duration::from_millis(50));

    while !hub.quit_requested() {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match parse_command(line.trim()) {
                    Ok(Command::Event(event)) => hub.handle_event(event).await?,
                    Ok(Command::Wait) => {
                        if wait_or_interrupt(&mut hub, tokio::signal::ctrl_c()).await {
                            info!("Received Ctrl+C while waiting, shutting down");
                            break;
                        }
                    }
                    Ok(Command::Help) => eprintln!("{HELP}"),
                    Err(e) => eprintln!("{e}"),
                }
            }
            _ = tick.tick() => {
                hub.poll_analysis().await;
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down");
                break;
            }
        }
    }

    if !hub.quit_requested() {
        hub.shutdown().await;
    }
    drop(hub);
    printer.await?;

    Ok(())
}

/// Wait for the run in flight unless `interrupt` fires first
///
/// Returns `true` when interrupted.
async fn wait_or_interrupt<C, F>(hub: &mut Hub<C>, interrupt: F) -> bool
where
    C: MealClassifier + 'static,
    F: Future,
{
    tokio::select! {
        _ = hub.await_analysis() => false,
        _ = interrupt => true,
    }
}

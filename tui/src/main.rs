//! GreenHero TUI Entry Point
//!
//! Launches the terminal dashboard: tasks, achievements, leaderboard,
//! reward shop and the meal photo analyzer.
//!
//! Usage:
//!   greenhero-tui
//!
//! Configuration comes from `~/.config/greenhero/greenhero.toml` and
//! `GREENHERO_*` environment variables. Logs go to
//! `~/.cache/greenhero/greenhero-tui.log` (filter with `RUST_LOG`).

use std::io::{self, IsTerminal};
use std::panic;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use greenhero_core::load_config;
use greenhero_tui::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: greenhero-tui requires a terminal (TTY)");
        eprintln!();
        eprintln!("For scripted use, run greenhero-headless instead.");
        std::process::exit(1);
    }

    let config = load_config()?;
    tracing::info!(source = %config.source, "Configuration loaded");

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut app = App::new(config).await?;
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result?;
    println!("\n\x1b[32mGreenHero:\x1b[0m {}\n", app.farewell());
    Ok(())
}

/// Log to a file; stderr belongs to the alternate screen
fn init_logging() {
    let Some(dir) = dirs::cache_dir().map(|d| d.join("greenhero")) else {
        return;
    };
    if std::fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("greenhero-tui.log"))
    else {
        return;
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false),
        )
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("greenhero_tui=info,greenhero_core=info")),
        )
        .init();
}

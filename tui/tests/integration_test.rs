//! Integration Tests for TUI + Hub
//!
//! Drive the App the way a terminal would: key events go through
//! `map_key`, intents through the embedded Hub, and frames are rendered
//! into a `TestBackend` so the output can be inspected.

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pretty_assertions::assert_eq;
use ratatui::backend::TestBackend;
use ratatui::Terminal;

use greenhero_core::{AnalysisPhase, GreenConfig, HubMessage, NotifyLevel};
use greenhero_tui::display::DisplayState;
use greenhero_tui::input::{map_key, InputMode, Tab};
use greenhero_tui::App;

// ============================================================================
// Helpers
// ============================================================================

fn test_config() -> GreenConfig {
    let mut config = GreenConfig::default();
    config.analysis.delay = Duration::from_millis(10);
    config.analysis.timeout = Duration::from_secs(2);
    config.analysis.vegetarian_probability = 1.0;
    config.analysis.failure_rate = 0.0;
    config.analysis.seed = Some(7);
    config
}

async fn press(app: &mut App, code: KeyCode) {
    let intent = map_key(app.mode(), KeyEvent::new(code, KeyModifiers::NONE));
    app.apply_intent(intent).await.expect("intent applies");
}

async fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c)).await;
    }
}

fn screen(app: &mut App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(120, 40)).expect("test terminal");
    app.render(&mut terminal).expect("render");
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|cell| cell.symbol())
        .collect()
}

fn write_png(dir: &tempfile::TempDir, name: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    image::RgbImage::new(8, 8)
        .save_with_format(&path, image::ImageFormat::Png)
        .expect("png written");
    path
}

// ============================================================================
// App flows
// ============================================================================

#[tokio::test]
async fn test_startup_shows_seed_balance() {
    let mut app = App::new(test_config()).await.unwrap();

    assert_eq!(app.display().balance, 1250);
    assert_eq!(app.tab(), Tab::Tasks);
    assert_eq!(app.display().tasks().len(), 4);
    assert!(screen(&mut app).contains("1,250"));
}

#[tokio::test]
async fn test_enter_completes_selected_task() {
    let mut app = App::new(test_config()).await.unwrap();

    // The first seed task is already done
    press(&mut app, KeyCode::Down).await;
    assert_eq!(app.selected(), 1);
    press(&mut app, KeyCode::Enter).await;

    assert_eq!(app.display().balance, 1280);
    assert_eq!(app.display().last_delta, Some(30));
    assert!(app.display().tasks()[1].completed);
}

#[tokio::test]
async fn test_completed_task_is_not_paid_twice() {
    let mut app = App::new(test_config()).await.unwrap();

    press(&mut app, KeyCode::Enter).await;

    assert_eq!(app.display().balance, 1250);
    let note = app.display().notification.as_ref().expect("notified");
    assert_eq!(note.level, NotifyLevel::Info);
    assert_eq!(note.message, "Task already completed");
}

#[tokio::test]
async fn test_redeem_reward_with_confirmation() {
    let mut app = App::new(test_config()).await.unwrap();

    press(&mut app, KeyCode::Char('4')).await;
    assert_eq!(app.tab(), Tab::Rewards);
    press(&mut app, KeyCode::Enter).await;

    let quote = app.display().pending_quote.clone().expect("quote shown");
    assert_eq!(quote.cost, 200);
    assert_eq!(quote.balance_after, 1050);
    assert!(screen(&mut app).contains("[y/n]"));

    press(&mut app, KeyCode::Char('y')).await;
    assert_eq!(app.display().balance, 1050);
    assert!(app.display().pending_quote.is_none());
}

#[tokio::test]
async fn test_declined_quote_keeps_balance() {
    let mut app = App::new(test_config()).await.unwrap();

    press(&mut app, KeyCode::Char('4')).await;
    press(&mut app, KeyCode::Enter).await;
    press(&mut app, KeyCode::Char('n')).await;

    assert_eq!(app.display().balance, 1250);
    assert!(app.display().pending_quote.is_none());
}

#[tokio::test]
async fn test_quoting_another_reward_replaces_the_first() {
    let mut app = App::new(test_config()).await.unwrap();

    press(&mut app, KeyCode::Char('4')).await;
    press(&mut app, KeyCode::Enter).await;
    let first = app.display().pending_quote.clone().expect("first quote");
    press(&mut app, KeyCode::Down).await;
    press(&mut app, KeyCode::Enter).await;

    let second = app.display().pending_quote.clone().expect("second quote");
    assert_ne!(first.quote_id, second.quote_id);
    assert_eq!(second.cost, 500);

    press(&mut app, KeyCode::Char('y')).await;
    assert_eq!(app.display().balance, 750);
    assert!(app.display().pending_quote.is_none());
}

#[tokio::test]
async fn test_escape_dismisses_quote_without_quitting() {
    let mut app = App::new(test_config()).await.unwrap();

    press(&mut app, KeyCode::Char('4')).await;
    press(&mut app, KeyCode::Enter).await;
    assert!(app.display().pending_quote.is_some());

    press(&mut app, KeyCode::Esc).await;
    assert!(app.is_running());
    assert!(!app.display().quit);
    assert!(app.display().pending_quote.is_none());

    press(&mut app, KeyCode::Char('y')).await;
    assert_eq!(app.display().balance, 1250);
}

#[tokio::test]
async fn test_photo_analysis_credits_vegetarian_task() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_png(&dir, "lunch.png");
    let mut app = App::new(test_config()).await.unwrap();

    press(&mut app, KeyCode::Char('o')).await;
    assert_eq!(app.tab(), Tab::Analysis);
    assert!(matches!(app.mode(), InputMode::ImagePath(_)));

    type_text(&mut app, &path.display().to_string()).await;
    press(&mut app, KeyCode::Enter).await;

    assert_eq!(app.mode(), &InputMode::Normal);
    assert_eq!(app.display().phase, AnalysisPhase::ImageLoaded);
    let summary = app.display().image.clone().expect("image loaded");
    assert_eq!(summary.file_name, "lunch.png");
    assert!(screen(&mut app).contains("lunch.png"));

    press(&mut app, KeyCode::Char('a')).await;
    assert_eq!(app.display().phase, AnalysisPhase::Analyzing);

    assert!(app.settle_analysis().await);
    assert_eq!(app.display().phase, AnalysisPhase::ResultReady);
    let result = app.display().result.clone().expect("result shown");
    assert!(result.is_vegetarian);
    assert_eq!(app.display().balance, 1280);
    assert!(app.display().tasks()[1].completed);
    assert!(screen(&mut app).contains("Vegetarian meal"));
}

#[tokio::test]
async fn test_cancelled_analysis_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_png(&dir, "dinner.png");
    let mut config = test_config();
    config.analysis.delay = Duration::from_millis(200);
    let mut app = App::new(config).await.unwrap();

    press(&mut app, KeyCode::Char('o')).await;
    type_text(&mut app, &path.display().to_string()).await;
    press(&mut app, KeyCode::Enter).await;
    press(&mut app, KeyCode::Char('a')).await;
    press(&mut app, KeyCode::Char('c')).await;

    assert!(!app.settle_analysis().await);
    assert_eq!(app.display().phase, AnalysisPhase::ImageLoaded);
    assert!(app.display().result.is_none());
    assert_eq!(app.display().balance, 1250);
}

#[tokio::test]
async fn test_missing_photo_is_reported() {
    let mut app = App::new(test_config()).await.unwrap();

    press(&mut app, KeyCode::Char('o')).await;
    type_text(&mut app, "/definitely/not/here.png").await;
    press(&mut app, KeyCode::Enter).await;

    assert_eq!(app.display().phase, AnalysisPhase::Idle);
    assert!(app.display().image.is_none());
    let note = app.display().notification.as_ref().expect("notified");
    assert_eq!(note.level, NotifyLevel::Error);
}

#[tokio::test]
async fn test_prompt_escape_returns_to_normal_mode() {
    let mut app = App::new(test_config()).await.unwrap();

    press(&mut app, KeyCode::Char('o')).await;
    type_text(&mut app, "q").await;
    assert!(app.is_running());
    press(&mut app, KeyCode::Esc).await;

    assert_eq!(app.mode(), &InputMode::Normal);
    assert!(app.is_running());
}

#[tokio::test]
async fn test_quit_key_stops_app() {
    let mut app = App::new(test_config()).await.unwrap();

    press(&mut app, KeyCode::Char('q')).await;

    assert!(!app.is_running());
    assert!(app.display().quit);
    assert!(app.farewell().contains("1250"));
}

#[tokio::test]
async fn test_every_tab_renders() {
    let mut app = App::new(test_config()).await.unwrap();

    for (key, needle) in [
        ('1', "Green Tasks"),
        ('2', "Achievements"),
        ('3', "Leaderboard"),
        ('4', "Reward Shop"),
        ('5', "Meal photo"),
    ] {
        press(&mut app, KeyCode::Char(key)).await;
        let text = screen(&mut app);
        assert!(text.contains(needle), "tab {key} missing {needle}");
    }
}

// ============================================================================
// DisplayState
// ============================================================================

#[test]
fn test_display_tracks_balance_messages() {
    let mut display = DisplayState::new();

    display.apply_message(HubMessage::BalanceChanged {
        balance: 1300,
        delta: 50,
    });
    assert_eq!(display.balance, 1300);
    assert_eq!(display.last_delta, Some(50));

    display.apply_message(HubMessage::AnalysisFailed {
        error: "classifier timed out".to_string(),
    });
    assert_eq!(display.analysis_error.as_deref(), Some("classifier timed out"));
    assert!(!display.activity.is_empty());
}

#[test]
fn test_notification_expires() {
    let mut display = DisplayState::new();

    display.apply_message(HubMessage::info("hello"));
    assert!(display.notification.is_some());

    display.update(Duration::from_secs(10));
    assert!(display.notification.is_none());
}

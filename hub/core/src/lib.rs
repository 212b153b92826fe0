//! GreenHero Core - Headless State for the Green Task Tracker
//!
//! This crate holds the behavioral core of GreenHero, completely independent
//! of any UI framework. It can drive the TUI, a web UI, or run headless for
//! testing and automation.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        UI Surfaces                               │
//! │  ┌─────────┐  ┌──────────────────┐  ┌────────────────────────┐  │
//! │  │   TUI   │  │ greenhero-       │  │  Tests / automation    │  │
//! │  │(ratatui)│  │ headless (JSON)  │  │                        │  │
//! │  └────┬────┘  └────────┬─────────┘  └───────────┬────────────┘  │
//! │       └────────────────┴────────────────────────┘               │
//! │                        │                                         │
//! │                 SurfaceEvent (up)                               │
//! │                 HubMessage (down)                               │
//! └────────────────────────┼─────────────────────────────────────────┘
//!                          │
//! ┌────────────────────────┼─────────────────────────────────────────┐
//! │                      HUB                                          │
//! │  ┌──────────────┐   GreenSignal   ┌──────────────────────────┐   │
//! │  │   Ledger     │ <────────────── │   AnalysisSession        │   │
//! │  │ tasks, coins │   (SignalSink)  │   + MealClassifier       │   │
//! │  │ rewards      │                 │   (mock or real model)   │   │
//! │  └──────────────┘                 └──────────────────────────┘   │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`Hub`]: Owns the ledger, the analysis session and the classifier
//! - [`Ledger`]: Tasks, Green Coin balance, rewards and redemptions
//! - [`AnalysisSession`]: The meal-analysis state machine
//! - [`MealClassifier`]: Swappable classification contract
//! - [`SurfaceEvent`] / [`HubMessage`]: The surface protocol
//!
//! # Quick Start
//!
//! ```ignore
//! use greenhero_core::{GreenConfig, Hub, MockClassifier, SurfaceEvent};
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let (tx, mut rx) = mpsc::channel(100);
//!     let config = GreenConfig::default();
//!     let classifier = MockClassifier::new(config.analysis.mock_config());
//!     let mut hub = Hub::new(classifier, config, tx);
//!
//!     hub.handle_event(SurfaceEvent::CompleteTask { task_id: 2.into() }).await?;
//!
//!     while let Ok(msg) = rx.try_recv() {
//!         // Render message
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # No TUI Dependencies
//!
//! This crate has **zero** dependencies on ratatui, crossterm, or any other
//! UI framework.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod achievements;
pub mod analysis;
pub mod config;
pub mod events;
pub mod hub;
pub mod leaderboard;
pub mod ledger;
pub mod messages;
pub mod profile;
pub mod rewards;
pub mod seed;
pub mod signals;

pub use achievements::{Achievement, AchievementLevel};
pub use analysis::{
    AnalysisError, AnalysisPhase, AnalysisResult, AnalysisSession, AnalysisTicket,
    ConfidenceBand, ImageReadError, ImageSummary, InferenceError, MealClassifier, MealImage,
    MockClassifier, MockClassifierConfig, NutritionEstimate, Settlement,
};
pub use config::{
    default_config_path, load_config, load_config_from_path, load_config_with_env,
    AnalysisConfig, ConfigError, ConfigSource, GreenConfig, GreenToml, LedgerConfig,
    RewardsConfig,
};
pub use events::SurfaceEvent;
pub use hub::Hub;
pub use leaderboard::{Leaderboard, LeaderboardEntry};
pub use ledger::{
    Completion, CompletionOutcome, Ledger, LedgerError, LedgerSnapshot, Task, TaskCategory,
    TaskId,
};
pub use messages::{HubMessage, NotifyLevel};
pub use profile::HeroProfile;
pub use rewards::{QuoteId, Redemption, RedemptionQuote, Reward, RewardId, RewardView};
pub use signals::{GreenSignal, SignalKind, SignalSink};

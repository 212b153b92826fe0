//! Hub Client
//!
//! Thin wrapper around the Hub for TUI integration.
//! This client embeds the Hub directly (no network) and provides
//! a convenient interface for sending events and receiving messages.
//!
//! # Architecture
//!
//! The TUI is a "thin client" - it doesn't contain any business logic.
//! The TUI's job is:
//! 1. Convert terminal events to SurfaceEvents
//! 2. Send SurfaceEvents to the Hub
//! 3. Receive HubMessages
//! 4. Render display state based on messages

use std::path::PathBuf;

use tokio::sync::mpsc;

use greenhero_core::{
    GreenConfig, Hub, HubMessage, MockClassifier, QuoteId, RewardId, SurfaceEvent, TaskId,
};

/// Client for communicating with the embedded Hub
pub struct HubClient {
    /// The embedded Hub instance
    hub: Hub<MockClassifier>,
    /// Receiver for messages from the Hub
    rx: mpsc::Receiver<HubMessage>,
}

impl HubClient {
    /// Create a new HubClient with an embedded Hub running the mock classifier
    pub fn new(config: GreenConfig) -> Self {
        let (tx, rx) = mpsc::channel(256);
        let classifier = MockClassifier::new(config.analysis.mock_config());
        let hub = Hub::new(classifier, config, tx);
        Self { hub, rx }
    }

    /// Connect this surface to the Hub
    pub async fn connect(&mut self) -> anyhow::Result<()> {
        self.hub.handle_event(SurfaceEvent::Connected).await
    }

    /// Mark a task as done
    pub async fn complete_task(&mut self, task_id: TaskId) -> anyhow::Result<()> {
        self.hub
            .handle_event(SurfaceEvent::CompleteTask { task_id })
            .await
    }

    /// Load a meal photo from disk
    pub async fn select_image(&mut self, path: PathBuf) -> anyhow::Result<()> {
        self.hub
            .handle_event(SurfaceEvent::ImageSelected { path })
            .await
    }

    /// Start analysis of the loaded photo
    pub async fn start_analysis(&mut self) -> anyhow::Result<()> {
        self.hub.handle_event(SurfaceEvent::StartAnalysis).await
    }

    /// Cancel the analysis in flight
    pub async fn cancel_analysis(&mut self) -> anyhow::Result<()> {
        self.hub.handle_event(SurfaceEvent::CancelAnalysis).await
    }

    /// Ask for a redemption quote
    pub async fn quote_redemption(&mut self, reward_id: RewardId) -> anyhow::Result<()> {
        self.hub
            .handle_event(SurfaceEvent::QuoteRedemption { reward_id })
            .await
    }

    /// Confirm a quoted redemption
    pub async fn confirm_redemption(&mut self, quote_id: QuoteId) -> anyhow::Result<()> {
        self.hub
            .handle_event(SurfaceEvent::ConfirmRedemption { quote_id })
            .await
    }

    /// Drop a quoted redemption
    pub async fn cancel_quote(&mut self, quote_id: QuoteId) -> anyhow::Result<()> {
        self.hub
            .handle_event(SurfaceEvent::CancelQuote { quote_id })
            .await
    }

    /// Notify the Hub that the user wants to quit
    pub async fn request_quit(&mut self) -> anyhow::Result<()> {
        self.hub.handle_event(SurfaceEvent::QuitRequested).await
    }

    /// Apply finished analysis runs (call this in the event loop)
    pub async fn poll_analysis(&mut self) -> bool {
        self.hub.poll_analysis().await
    }

    /// Wait for the run in flight to settle
    pub async fn await_analysis(&mut self) -> bool {
        self.hub.await_analysis().await
    }

    /// Receive all pending messages from the Hub (non-blocking)
    pub fn recv_all(&mut self) -> Vec<HubMessage> {
        let mut messages = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            messages.push(msg);
        }
        messages
    }

    /// Current balance, straight from the ledger
    pub fn balance(&self) -> u64 {
        self.hub.ledger().balance()
    }
}

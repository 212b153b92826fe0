//! The Hub - GreenHero's Core
//!
//! The Hub owns the [`Ledger`], the [`AnalysisSession`] and the classifier.
//! Surfaces send it [`SurfaceEvent`]s and render the [`HubMessage`]s it
//! sends back.
//!
//! # Analysis runs
//!
//! `StartAnalysis` spawns the classifier call onto the tokio runtime under a
//! fresh [`AnalysisTicket`] and returns immediately. The finished run comes
//! back over an internal channel; surfaces drive it with
//! [`Hub::poll_analysis`] in their event loop, or [`Hub::await_analysis`]
//! when they have nothing else to do. Cancelling or loading a new image
//! aborts the spawned task and any completion that still slips through is
//! discarded as stale. A run whose task dies without reporting (a
//! panicking classifier) settles as a backend failure.
//!
//! A vegetarian result raises a [`GreenSignal`] that the ledger accepts as a
//! [`SignalSink`]; that is the only path from analysis to coins.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};

use crate::analysis::{
    AnalysisResult, AnalysisSession, AnalysisTicket, InferenceError, MealClassifier, MealImage,
    Settlement,
};
use crate::config::GreenConfig;
use crate::events::SurfaceEvent;
use crate::ledger::{CompletionOutcome, Ledger, TaskId};
use crate::messages::HubMessage;
use crate::rewards::{QuoteId, RewardId};
use crate::signals::{GreenSignal, SignalSink};

/// A finished classifier call, tagged with the run it belongs to
#[derive(Debug)]
struct AnalysisCompletion {
    ticket: AnalysisTicket,
    outcome: Result<AnalysisResult, InferenceError>,
}

/// The spawned task for the run in flight
struct AnalysisRun {
    ticket: AnalysisTicket,
    handle: JoinHandle<()>,
}

/// What woke `await_analysis`
enum RunWake {
    Completion(Option<AnalysisCompletion>),
    Joined(AnalysisTicket, Result<(), JoinError>),
}

/// The Hub
pub struct Hub<C: MealClassifier + 'static> {
    /// Configuration
    config: GreenConfig,
    /// Tasks, balance and rewards
    ledger: Ledger,
    /// Meal-analysis state
    session: AnalysisSession,
    /// Classifier shared with spawned runs
    classifier: Arc<C>,
    /// Channel to the surface
    tx: mpsc::Sender<HubMessage>,
    /// Completions from spawned runs
    analysis_tx: mpsc::Sender<AnalysisCompletion>,
    analysis_rx: mpsc::Receiver<AnalysisCompletion>,
    /// The spawned run, if any
    task: Option<AnalysisRun>,
    /// Set once the surface asked to quit
    quit_requested: bool,
}

impl<C: MealClassifier + 'static> Hub<C> {
    /// Create a Hub with the given classifier
    pub fn new(classifier: C, config: GreenConfig, tx: mpsc::Sender<HubMessage>) -> Self {
        let ledger = Ledger::new(config.ledger.initial_balance)
            .with_redemption(config.rewards.redemption_enabled);
        let (analysis_tx, analysis_rx) = mpsc::channel(8);

        tracing::info!(
            classifier = classifier.name(),
            initial_balance = ledger.balance(),
            redemption_enabled = ledger.redemption_enabled(),
            "Hub created"
        );

        Self {
            config,
            ledger,
            session: AnalysisSession::new(),
            classifier: Arc::new(classifier),
            tx,
            analysis_tx,
            analysis_rx,
            task: None,
            quit_requested: false,
        }
    }

    /// The ledger
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// The analysis session
    pub fn session(&self) -> &AnalysisSession {
        &self.session
    }

    /// The configuration in use
    pub fn config(&self) -> &GreenConfig {
        &self.config
    }

    /// Whether the surface asked to quit
    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Handle an event from the UI surface
    ///
    /// Rejected actions (unknown task, no image, insufficient balance, ...)
    /// are reported to the surface as notifications and leave state alone.
    ///
    /// # Errors
    ///
    /// Currently infallible; the `Result` leaves room for surfaces that
    /// need to tear down on a fatal Hub error.
    pub async fn handle_event(&mut self, event: SurfaceEvent) -> anyhow::Result<()> {
        tracing::debug!(event = event.name(), "Surface event");

        match event {
            SurfaceEvent::Connected | SurfaceEvent::RequestSnapshot => {
                self.send_snapshot().await;
                self.send(HubMessage::AnalysisPhaseChanged {
                    phase: self.session.phase(),
                })
                .await;
            }

            SurfaceEvent::Disconnected => {
                let invalidated = self.session.cancel();
                self.abort_run(invalidated);
            }

            SurfaceEvent::CompleteTask { task_id } => {
                self.complete_task(task_id).await;
            }

            SurfaceEvent::QuoteRedemption { reward_id } => {
                self.quote_redemption(reward_id).await;
            }

            SurfaceEvent::ConfirmRedemption { quote_id } => {
                self.confirm_redemption(quote_id).await;
            }

            SurfaceEvent::CancelQuote { quote_id } => {
                if self.ledger.cancel_quote(quote_id) {
                    self.send(HubMessage::info("Redemption cancelled")).await;
                }
            }

            SurfaceEvent::ImageSelected { path } => {
                self.select_image(&path).await;
            }

            SurfaceEvent::ImageUploaded { file_name, bytes } => {
                match MealImage::from_bytes(file_name, bytes, self.config.analysis.max_image_bytes) {
                    Ok(image) => self.load_image(image).await,
                    Err(e) => {
                        tracing::warn!(error = %e, "Rejected uploaded image");
                        self.send(HubMessage::error(e.to_string())).await;
                    }
                }
            }

            SurfaceEvent::StartAnalysis => {
                self.start_analysis().await;
            }

            SurfaceEvent::CancelAnalysis => {
                if let Some(ticket) = self.session.cancel() {
                    self.abort_run(Some(ticket));
                    self.send_phase().await;
                    self.send(HubMessage::info("Analysis cancelled")).await;
                } else {
                    self.send(HubMessage::info("No analysis in progress")).await;
                }
            }

            SurfaceEvent::QuitRequested => {
                self.shutdown().await;
            }
        }

        Ok(())
    }

    /// Apply any finished analysis runs
    ///
    /// Returns `true` if a completion was processed (stale ones included).
    pub async fn poll_analysis(&mut self) -> bool {
        // Reap first: a task that finished cleanly has already queued its completion
        let finished = if self.task.as_ref().is_some_and(|run| run.handle.is_finished()) {
            self.task.take()
        } else {
            None
        };
        let finished = match finished {
            Some(run) => Some((run.ticket, run.handle.await)),
            None => None,
        };

        let mut completions = Vec::new();
        while let Ok(completion) = self.analysis_rx.try_recv() {
            completions.push(completion);
        }

        let mut processed = !completions.is_empty();
        for completion in completions {
            self.apply_completion(completion).await;
        }

        if let Some((ticket, Err(e))) = finished {
            self.apply_join_error(ticket, &e).await;
            processed = true;
        }
        processed
    }

    /// Wait until the run in flight settles
    ///
    /// Returns `false` immediately when nothing is in flight.
    pub async fn await_analysis(&mut self) -> bool {
        if self.session.in_flight().is_none() {
            return false;
        }

        while self.session.in_flight().is_some() {
            let wake = match self.task.as_mut() {
                Some(run) => {
                    let ticket = run.ticket;
                    tokio::select! {
                        completion = self.analysis_rx.recv() => RunWake::Completion(completion),
                        joined = &mut run.handle => RunWake::Joined(ticket, joined),
                    }
                }
                None => RunWake::Completion(self.analysis_rx.recv().await),
            };

            match wake {
                RunWake::Completion(Some(completion)) => self.apply_completion(completion).await,
                RunWake::Completion(None) => return false,
                RunWake::Joined(ticket, joined) => {
                    self.task = None;
                    if let Err(e) = joined {
                        self.apply_join_error(ticket, &e).await;
                    }
                }
            }
        }
        true
    }

    /// Cancel any run and tell the surface to go away
    pub async fn shutdown(&mut self) {
        let invalidated = self.session.cancel();
        self.abort_run(invalidated);
        self.quit_requested = true;
        self.send(HubMessage::Quit).await;
        tracing::info!(
            balance = self.ledger.balance(),
            earned = self.ledger.earned(),
            spent = self.ledger.spent(),
            "Hub shut down"
        );
    }

    // =========================================================================
    // Ledger
    // =========================================================================

    async fn complete_task(&mut self, task_id: TaskId) {
        match self.ledger.complete_task(task_id) {
            Ok(CompletionOutcome::Completed(completion)) => {
                self.send(HubMessage::TaskCompleted {
                    task_id,
                    coins: completion.coins,
                    balance: completion.balance,
                })
                .await;
                self.send_balance_change(completion.coins, true).await;
                self.send_snapshot().await;
            }
            Ok(CompletionOutcome::AlreadyCompleted(_)) => {
                self.send(HubMessage::info("Task already completed")).await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Task completion rejected");
                self.send(HubMessage::error(e.to_string())).await;
            }
        }
    }

    async fn quote_redemption(&mut self, reward_id: RewardId) {
        match self.ledger.quote_redemption(reward_id) {
            Ok(quote) => {
                self.send(HubMessage::RedemptionQuoted { quote }).await;
            }
            Err(e) => {
                tracing::debug!(error = %e, reward_id = %reward_id, "Redemption refused");
                self.send(HubMessage::warning(e.to_string())).await;
            }
        }
    }

    async fn confirm_redemption(&mut self, quote_id: QuoteId) {
        match self.ledger.confirm_redemption(quote_id) {
            Ok(redemption) => {
                let cost = redemption.cost;
                self.send(HubMessage::RedemptionConfirmed { redemption }).await;
                self.send_balance_change(cost, false).await;
                self.send_snapshot().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, quote_id = %quote_id, "Redemption failed");
                self.send(HubMessage::warning(e.to_string())).await;
            }
        }
    }

    // =========================================================================
    // Analysis
    // =========================================================================

    async fn select_image(&mut self, path: &Path) {
        match MealImage::from_path(path, self.config.analysis.max_image_bytes).await {
            Ok(image) => self.load_image(image).await,
            Err(e) => {
                tracing::warn!(error = %e, path = %path.display(), "Rejected image file");
                self.send(HubMessage::error(e.to_string())).await;
            }
        }
    }

    async fn load_image(&mut self, image: MealImage) {
        let summary = image.summary();
        let invalidated = self.session.load_image(image);
        self.abort_run(invalidated);

        self.send(HubMessage::ImageLoaded { summary }).await;
        self.send_phase().await;
    }

    async fn start_analysis(&mut self) {
        let ticket = match self.session.begin() {
            Ok(ticket) => ticket,
            Err(e) => {
                self.send(HubMessage::warning(e.to_string())).await;
                return;
            }
        };

        let Some(image) = self.session.image().cloned() else {
            return;
        };

        if !self.classifier.ready().await {
            self.session.cancel();
            self.send(HubMessage::error("Meal classifier is not ready")).await;
            return;
        }

        let classifier = Arc::clone(&self.classifier);
        let tx = self.analysis_tx.clone();
        let timeout = self.config.analysis.timeout;

        tracing::info!(
            %ticket,
            classifier = classifier.name(),
            file = image.file_name(),
            "Analysis started"
        );

        let handle = tokio::spawn(async move {
            let outcome = match tokio::time::timeout(timeout, classifier.classify(&image)).await {
                Ok(outcome) => outcome,
                Err(_) => Err(InferenceError::Timeout(
                    u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                )),
            };
            if tx.send(AnalysisCompletion { ticket, outcome }).await.is_err() {
                tracing::debug!(%ticket, "Hub gone before analysis finished");
            }
        });
        self.task = Some(AnalysisRun { ticket, handle });

        self.send_phase().await;
    }

    /// Settle a run whose task ended without reporting
    async fn apply_join_error(&mut self, ticket: AnalysisTicket, e: &JoinError) {
        tracing::error!(%ticket, error = %e, "Analysis task died");
        self.apply_completion(AnalysisCompletion {
            ticket,
            outcome: Err(InferenceError::Backend(format!("classifier task failed: {e}"))),
        })
        .await;
    }

    async fn apply_completion(&mut self, completion: AnalysisCompletion) {
        let AnalysisCompletion { ticket, outcome } = completion;

        match self.session.settle(ticket, outcome) {
            Settlement::Ready(result) => {
                self.task = None;
                tracing::info!(
                    %ticket,
                    is_vegetarian = result.is_vegetarian,
                    confidence = result.confidence,
                    "Analysis finished"
                );
                let signal = result.signal();
                self.send(HubMessage::AnalysisReady { result }).await;
                self.send_phase().await;
                if let Some(signal) = signal {
                    self.raise_signal(signal).await;
                }
            }
            Settlement::Failed(e) => {
                self.task = None;
                tracing::warn!(%ticket, error = %e, "Analysis failed");
                self.send(HubMessage::AnalysisFailed {
                    error: e.to_string(),
                })
                .await;
                self.send_phase().await;
            }
            Settlement::Stale => {}
        }
    }

    async fn raise_signal(&mut self, signal: GreenSignal) {
        self.send(HubMessage::SignalRaised {
            signal: signal.clone(),
        })
        .await;

        let completions = self.ledger.accept(&signal);
        if completions.is_empty() {
            self.send(HubMessage::info(format!(
                "{} task already completed",
                signal.kind().label()
            )))
            .await;
            return;
        }

        for completion in completions {
            self.send(HubMessage::TaskCompleted {
                task_id: completion.task_id,
                coins: completion.coins,
                balance: completion.balance,
            })
            .await;
            self.send_balance_change(completion.coins, true).await;
            self.send(HubMessage::success(format!(
                "+{} Green Coins",
                completion.coins
            )))
            .await;
        }
        self.send_snapshot().await;
    }

    fn abort_run(&mut self, invalidated: Option<AnalysisTicket>) {
        if invalidated.is_none() {
            return;
        }
        if let Some(run) = self.task.take() {
            run.handle.abort();
        }
    }

    // =========================================================================
    // Messaging
    // =========================================================================

    async fn send_phase(&self) {
        self.send(HubMessage::AnalysisPhaseChanged {
            phase: self.session.phase(),
        })
        .await;
    }

    async fn send_snapshot(&self) {
        self.send(HubMessage::Snapshot(self.ledger.snapshot())).await;
    }

    async fn send_balance_change(&self, amount: u64, credit: bool) {
        let magnitude = i64::try_from(amount).unwrap_or(i64::MAX);
        self.send(HubMessage::BalanceChanged {
            balance: self.ledger.balance(),
            delta: if credit { magnitude } else { -magnitude },
        })
        .await;
    }

    async fn send(&self, msg: HubMessage) {
        if let Err(e) = self.tx.send(msg).await {
            tracing::warn!("Failed to send message to surface: {}", e);
        }
    }
}

impl<C: MealClassifier + 'static> Drop for Hub<C> {
    fn drop(&mut self) {
        if let Some(run) = self.task.take() {
            run.handle.abort();
        }
    }
}

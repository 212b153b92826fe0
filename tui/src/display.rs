//! Display State Types
//!
//! Types that represent the current display state for the TUI.
//! These are derived from HubMessages and used for rendering.
//!
//! # Design Philosophy
//!
//! The TUI is a "thin client" - it just renders what the Hub tells it to.
//! Display state is the bridge between HubMessages and rendering. Nothing
//! here computes a balance or decides a verdict.

use std::time::Duration;

use greenhero_core::{
    Achievement, AnalysisPhase, AnalysisResult, HeroProfile, HubMessage, ImageSummary,
    LeaderboardEntry, LedgerSnapshot, NotifyLevel, RedemptionQuote, RewardView, Task, TaskId,
};

/// How long a toast stays up
const NOTIFICATION_TTL: Duration = Duration::from_secs(4);

/// Most recent activity lines kept
const ACTIVITY_LIMIT: usize = 50;

/// A toast notification
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayNotification {
    /// Severity
    pub level: NotifyLevel,
    /// Text
    pub message: String,
    /// Time left on screen
    pub remaining: Duration,
}

/// Everything the TUI renders
#[derive(Clone, Debug)]
pub struct DisplayState {
    /// Last full ledger state
    pub snapshot: Option<LedgerSnapshot>,
    /// Live balance
    pub balance: u64,
    /// Last balance change, for the header flash
    pub last_delta: Option<i64>,
    /// Analysis phase
    pub phase: AnalysisPhase,
    /// Loaded meal photo
    pub image: Option<ImageSummary>,
    /// Latest analysis result
    pub result: Option<AnalysisResult>,
    /// Latest analysis failure
    pub analysis_error: Option<String>,
    /// Redemption waiting for y/n
    pub pending_quote: Option<RedemptionQuote>,
    /// Current toast
    pub notification: Option<DisplayNotification>,
    /// Recent activity, newest last
    pub activity: Vec<String>,
    /// The Hub said goodbye
    pub quit: bool,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            snapshot: None,
            balance: 0,
            last_delta: None,
            phase: AnalysisPhase::Idle,
            image: None,
            result: None,
            analysis_error: None,
            pending_quote: None,
            notification: None,
            activity: Vec::new(),
            quit: false,
        }
    }
}

impl DisplayState {
    /// Create a new display state
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a HubMessage to update display state
    pub fn apply_message(&mut self, msg: HubMessage) {
        match msg {
            HubMessage::Snapshot(snapshot) => {
                self.balance = snapshot.balance;
                self.snapshot = Some(snapshot);
            }
            HubMessage::BalanceChanged { balance, delta } => {
                self.balance = balance;
                self.last_delta = Some(delta);
            }
            HubMessage::TaskCompleted {
                task_id,
                coins,
                balance,
            } => {
                self.balance = balance;
                let title = self
                    .task(task_id)
                    .map_or_else(|| format!("Task {task_id}"), |t| t.title.clone());
                self.push_activity(format!("{title} completed (+{coins})"));
            }
            HubMessage::RedemptionQuoted { quote } => {
                self.pending_quote = Some(quote);
            }
            HubMessage::RedemptionConfirmed { redemption } => {
                if self
                    .pending_quote
                    .as_ref()
                    .is_some_and(|q| q.quote_id == redemption.quote_id)
                {
                    self.pending_quote = None;
                }
                self.balance = redemption.balance;
                self.push_activity(format!(
                    "Redeemed reward {} (-{})",
                    redemption.reward_id, redemption.cost
                ));
            }
            HubMessage::ImageLoaded { summary } => {
                self.push_activity(format!("Photo loaded: {}", summary.file_name));
                self.image = Some(summary);
                self.result = None;
                self.analysis_error = None;
            }
            HubMessage::AnalysisPhaseChanged { phase } => {
                if phase == AnalysisPhase::Analyzing {
                    self.result = None;
                    self.analysis_error = None;
                }
                self.phase = phase;
            }
            HubMessage::AnalysisReady { result } => {
                self.push_activity(format!(
                    "Analysis: {} ({})",
                    if result.is_vegetarian {
                        "vegetarian"
                    } else {
                        "not vegetarian"
                    },
                    result.confidence_label()
                ));
                self.result = Some(result);
            }
            HubMessage::AnalysisFailed { error } => {
                self.push_activity(format!("Analysis failed: {error}"));
                self.analysis_error = Some(error);
            }
            HubMessage::SignalRaised { signal } => {
                self.push_activity(format!("{} detected", signal.kind().label()));
            }
            HubMessage::Notify { level, message } => {
                self.notification = Some(DisplayNotification {
                    level,
                    message,
                    remaining: NOTIFICATION_TTL,
                });
            }
            HubMessage::Quit => {
                self.quit = true;
            }
        }
    }

    /// Advance timers
    pub fn update(&mut self, delta: Duration) {
        if let Some(n) = self.notification.as_mut() {
            n.remaining = n.remaining.saturating_sub(delta);
            if n.remaining.is_zero() {
                self.notification = None;
                self.last_delta = None;
            }
        }
    }

    /// Forget the pending quote (after answering it)
    pub fn take_quote(&mut self) -> Option<RedemptionQuote> {
        self.pending_quote.take()
    }

    // =========================================================================
    // Snapshot views
    // =========================================================================

    /// Tasks, in display order
    pub fn tasks(&self) -> &[Task] {
        self.snapshot.as_ref().map_or(&[], |s| &s.tasks)
    }

    /// One task by id
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks().iter().find(|t| t.id == id)
    }

    /// Achievements
    pub fn achievements(&self) -> &[Achievement] {
        self.snapshot.as_ref().map_or(&[], |s| &s.achievements)
    }

    /// Leaderboard rows, already ranked
    pub fn leaderboard(&self) -> &[LeaderboardEntry] {
        self.snapshot.as_ref().map_or(&[], |s| &s.leaderboard)
    }

    /// Reward catalog with affordability
    pub fn rewards(&self) -> &[RewardView] {
        self.snapshot.as_ref().map_or(&[], |s| &s.rewards)
    }

    /// Hero profile
    pub fn profile(&self) -> Option<&HeroProfile> {
        self.snapshot.as_ref().map(|s| &s.profile)
    }

    /// Whether redemption is switched on
    pub fn redemption_enabled(&self) -> bool {
        self.snapshot.as_ref().is_some_and(|s| s.redemption_enabled)
    }

    fn push_activity(&mut self, line: String) {
        self.activity.push(line);
        if self.activity.len() > ACTIVITY_LIMIT {
            let excess = self.activity.len() - ACTIVITY_LIMIT;
            self.activity.drain(..excess);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_expires() {
        let mut display = DisplayState::new();
        display.apply_message(HubMessage::info("hello"));
        assert!(display.notification.is_some());

        display.update(Duration::from_secs(2));
        assert!(display.notification.is_some());
        display.update(Duration::from_secs(3));
        assert!(display.notification.is_none());
    }

    #[test]
    fn test_activity_is_capped() {
        let mut display = DisplayState::new();
        for i in 0..(ACTIVITY_LIMIT + 10) {
            display.push_activity(format!("line {i}"));
        }
        assert_eq!(display.activity.len(), ACTIVITY_LIMIT);
        assert_eq!(display.activity[0], "line 10");
    }

    #[test]
    fn test_empty_views_before_snapshot() {
        let display = DisplayState::new();
        assert!(display.tasks().is_empty());
        assert!(display.rewards().is_empty());
        assert!(display.profile().is_none());
        assert!(!display.redemption_enabled());
    }
}

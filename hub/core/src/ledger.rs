//! Task/Reward Ledger
//!
//! The Ledger owns the Green Coin balance, the task list and the reward
//! catalog. Completing a task is idempotent; redeeming a reward is a
//! quote-then-confirm debit. At most one quote is pending; a new quote
//! replaces the previous one.
//!
//! # Invariants
//!
//! - A completed task never reverts, and its coins are credited once.
//! - The balance never goes negative.
//! - `earned() - spent() == balance() - initial_balance()`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::achievements::Achievement;
use crate::leaderboard::{Leaderboard, LeaderboardEntry};
use crate::profile::HeroProfile;
use crate::rewards::{QuoteId, Redemption, RedemptionQuote, Reward, RewardId, RewardView};
use crate::seed;
use crate::signals::{GreenSignal, SignalKind, SignalSink};

/// Task identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(pub u32);

impl From<u32> for TaskId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::str::FromStr for TaskId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Task category
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    /// Getting around
    Transport,
    /// Eating
    Food,
    /// Everyday habits
    Lifestyle,
    /// Events and one-offs
    Special,
}

impl TaskCategory {
    /// Human-readable label
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Transport => "Transport",
            Self::Food => "Food",
            Self::Lifestyle => "Lifestyle",
            Self::Special => "Special",
        }
    }

    /// Unicode icon
    #[must_use]
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Transport => "\u{1f6b2}", // bicycle
            Self::Food => "\u{1f37d}",      // fork and knife with plate
            Self::Lifestyle => "\u{267b}",  // recycling
            Self::Special => "\u{1f332}",   // evergreen tree
        }
    }
}

/// A user-completable green task
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: TaskId,
    /// Display title
    pub title: String,
    /// Display description
    pub description: String,
    /// Category
    pub category: TaskCategory,
    /// Reward in Green Coins
    pub coins: u64,
    /// Whether the task is done
    pub completed: bool,
    /// Signal that completes this task automatically
    #[serde(default)]
    pub trigger: Option<SignalKind>,
}

/// A task completion that credited coins
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    /// Task that was completed
    pub task_id: TaskId,
    /// Coins credited
    pub coins: u64,
    /// Balance after the credit
    pub balance: u64,
}

/// Result of asking the ledger to complete a task
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// Task flipped to completed and coins were credited
    Completed(Completion),
    /// Task was already completed; nothing changed
    AlreadyCompleted(TaskId),
}

impl CompletionOutcome {
    /// The new completion, if one happened
    #[must_use]
    pub fn completion(&self) -> Option<Completion> {
        match self {
            Self::Completed(c) => Some(*c),
            Self::AlreadyCompleted(_) => None,
        }
    }
}

/// Errors from ledger operations
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// No task with this identifier
    #[error("Unknown task: {0}")]
    UnknownTask(TaskId),

    /// No reward with this identifier
    #[error("Unknown reward: {0}")]
    UnknownReward(RewardId),

    /// No pending quote with this identifier
    #[error("Unknown or expired quote: {0}")]
    UnknownQuote(QuoteId),

    /// Balance does not cover the reward
    #[error("Insufficient balance: reward costs {cost} coins, balance is {balance}")]
    InsufficientBalance {
        /// Reward cost
        cost: u64,
        /// Current balance
        balance: u64,
    },

    /// Redemption is switched off in configuration
    #[error("Reward redemption is not enabled")]
    RedemptionDisabled,
}

/// Serializable view of the whole ledger, for surfaces
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Current balance
    pub balance: u64,
    /// Balance at session start
    pub initial_balance: u64,
    /// Tasks in display order
    pub tasks: Vec<Task>,
    /// Achievements
    pub achievements: Vec<Achievement>,
    /// Ranked leaderboard with the live self row
    pub leaderboard: Vec<LeaderboardEntry>,
    /// Reward catalog with affordability
    pub rewards: Vec<RewardView>,
    /// Header stats
    pub profile: HeroProfile,
    /// Whether redemption is enabled
    pub redemption_enabled: bool,
}

/// The task/reward/currency state store
#[derive(Clone, Debug)]
pub struct Ledger {
    balance: u64,
    initial_balance: u64,
    tasks: Vec<Task>,
    rewards: Vec<Reward>,
    achievements: Vec<Achievement>,
    leaderboard: Leaderboard,
    profile: HeroProfile,
    completions: Vec<Completion>,
    redemptions: Vec<Redemption>,
    pending_quote: Option<RedemptionQuote>,
    next_quote: u64,
    redemption_enabled: bool,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(seed::INITIAL_BALANCE)
    }
}

impl Ledger {
    /// Create a ledger from the seed data with the given starting balance
    #[must_use]
    pub fn new(initial_balance: u64) -> Self {
        Self {
            balance: initial_balance,
            initial_balance,
            tasks: seed::tasks(),
            rewards: seed::rewards(),
            achievements: seed::achievements(),
            leaderboard: seed::leaderboard(),
            profile: seed::profile(),
            completions: Vec::new(),
            redemptions: Vec::new(),
            pending_quote: None,
            next_quote: 1,
            redemption_enabled: true,
        }
    }

    /// Replace the task list
    #[must_use]
    pub fn with_tasks(mut self, tasks: Vec<Task>) -> Self {
        self.tasks = tasks;
        self
    }

    /// Replace the reward catalog
    #[must_use]
    pub fn with_rewards(mut self, rewards: Vec<Reward>) -> Self {
        self.rewards = rewards;
        self
    }

    /// Enable or disable redemption
    #[must_use]
    pub fn with_redemption(mut self, enabled: bool) -> Self {
        self.redemption_enabled = enabled;
        self
    }

    // ---------------------------------------------------------------------
    // Read accessors
    // ---------------------------------------------------------------------

    /// Current balance
    #[must_use]
    pub fn balance(&self) -> u64 {
        self.balance
    }

    /// Balance at session start
    #[must_use]
    pub fn initial_balance(&self) -> u64 {
        self.initial_balance
    }

    /// All tasks in display order
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Look up a task
    #[must_use]
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Achievements
    #[must_use]
    pub fn achievements(&self) -> &[Achievement] {
        &self.achievements
    }

    /// Ranked leaderboard with the self row at the live balance
    #[must_use]
    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        self.leaderboard.ranked(self.balance)
    }

    /// Reward catalog
    #[must_use]
    pub fn rewards(&self) -> &[Reward] {
        &self.rewards
    }

    /// Look up a reward
    #[must_use]
    pub fn reward(&self, id: RewardId) -> Option<&Reward> {
        self.rewards.iter().find(|r| r.id == id)
    }

    /// Header stats
    #[must_use]
    pub fn profile(&self) -> &HeroProfile {
        &self.profile
    }

    /// Completions made during this session
    #[must_use]
    pub fn completions(&self) -> &[Completion] {
        &self.completions
    }

    /// Confirmed redemptions
    #[must_use]
    pub fn redemptions(&self) -> &[Redemption] {
        &self.redemptions
    }

    /// Coins credited by completions during this session
    #[must_use]
    pub fn earned(&self) -> u64 {
        self.completions.iter().map(|c| c.coins).sum()
    }

    /// Coins debited by confirmed redemptions
    #[must_use]
    pub fn spent(&self) -> u64 {
        self.redemptions.iter().map(|r| r.cost).sum()
    }

    /// Whether redemption is enabled
    #[must_use]
    pub fn redemption_enabled(&self) -> bool {
        self.redemption_enabled
    }

    /// Full serializable view
    #[must_use]
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            balance: self.balance,
            initial_balance: self.initial_balance,
            tasks: self.tasks.clone(),
            achievements: self.achievements.clone(),
            leaderboard: self.leaderboard(),
            rewards: self
                .rewards
                .iter()
                .map(|r| RewardView {
                    reward: r.clone(),
                    affordable: self.balance >= r.coins,
                })
                .collect(),
            profile: self.profile.clone(),
            redemption_enabled: self.redemption_enabled,
        }
    }

    // ---------------------------------------------------------------------
    // Tasks
    // ---------------------------------------------------------------------

    /// Complete a task
    ///
    /// Credits the task's coins on first completion only.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UnknownTask`] if no task has this id. State is
    /// unchanged in that case.
    pub fn complete_task(&mut self, id: TaskId) -> Result<CompletionOutcome, LedgerError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(LedgerError::UnknownTask(id))?;

        if task.completed {
            tracing::debug!(task_id = %id, "Task already completed");
            return Ok(CompletionOutcome::AlreadyCompleted(id));
        }

        task.completed = true;
        self.balance = self.balance.saturating_add(task.coins);
        let completion = Completion {
            task_id: id,
            coins: task.coins,
            balance: self.balance,
        };
        self.completions.push(completion);

        tracing::info!(
            task_id = %id,
            coins = completion.coins,
            balance = self.balance,
            "Task completed"
        );
        Ok(CompletionOutcome::Completed(completion))
    }

    // ---------------------------------------------------------------------
    // Redemption
    // ---------------------------------------------------------------------

    /// Whether the balance covers a reward (the UI gate)
    #[must_use]
    pub fn can_redeem(&self, id: RewardId) -> bool {
        self.redemption_enabled && self.reward(id).is_some_and(|r| self.balance >= r.coins)
    }

    /// Price a redemption without debiting
    ///
    /// The new quote replaces any pending one, which can no longer be
    /// confirmed.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::RedemptionDisabled`] when switched off
    /// - [`LedgerError::UnknownReward`] for an unknown id
    /// - [`LedgerError::InsufficientBalance`] when `balance < cost`
    pub fn quote_redemption(&mut self, id: RewardId) -> Result<RedemptionQuote, LedgerError> {
        if !self.redemption_enabled {
            return Err(LedgerError::RedemptionDisabled);
        }
        let reward = self.reward(id).ok_or(LedgerError::UnknownReward(id))?;
        let balance_after =
            self.balance
                .checked_sub(reward.coins)
                .ok_or(LedgerError::InsufficientBalance {
                    cost: reward.coins,
                    balance: self.balance,
                })?;

        let quote = RedemptionQuote {
            quote_id: QuoteId(self.next_quote),
            reward_id: id,
            reward_name: reward.name.clone(),
            cost: reward.coins,
            balance_after,
        };
        self.next_quote += 1;
        if let Some(previous) = self.pending_quote.replace(quote.clone()) {
            tracing::debug!(quote_id = %previous.quote_id, "Pending quote replaced");
        }

        tracing::debug!(quote_id = %quote.quote_id, reward_id = %id, cost = quote.cost, "Redemption quoted");
        Ok(quote)
    }

    /// Confirm a quote and debit the balance
    ///
    /// The quote is consumed whether or not the debit succeeds.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::UnknownQuote`] if the quote is not pending
    /// - [`LedgerError::InsufficientBalance`] if the balance no longer covers it
    pub fn confirm_redemption(&mut self, quote_id: QuoteId) -> Result<Redemption, LedgerError> {
        let quote = self
            .take_pending(quote_id)
            .ok_or(LedgerError::UnknownQuote(quote_id))?;

        let balance = self
            .balance
            .checked_sub(quote.cost)
            .ok_or(LedgerError::InsufficientBalance {
                cost: quote.cost,
                balance: self.balance,
            })?;
        self.balance = balance;

        let redemption = Redemption {
            quote_id,
            reward_id: quote.reward_id,
            cost: quote.cost,
            balance,
        };
        self.redemptions.push(redemption.clone());

        tracing::info!(
            reward_id = %quote.reward_id,
            cost = quote.cost,
            balance,
            "Reward redeemed"
        );
        Ok(redemption)
    }

    /// Drop a pending quote. Returns whether one was pending.
    pub fn cancel_quote(&mut self, quote_id: QuoteId) -> bool {
        self.take_pending(quote_id).is_some()
    }

    /// The quote awaiting confirmation, if any
    #[must_use]
    pub fn pending_quote(&self) -> Option<&RedemptionQuote> {
        self.pending_quote.as_ref()
    }

    /// Number of unconfirmed quotes (0 or 1)
    #[must_use]
    pub fn pending_quote_count(&self) -> usize {
        usize::from(self.pending_quote.is_some())
    }

    fn take_pending(&mut self, quote_id: QuoteId) -> Option<RedemptionQuote> {
        if self.pending_quote.as_ref()?.quote_id == quote_id {
            self.pending_quote.take()
        } else {
            None
        }
    }
}

impl SignalSink for Ledger {
    fn accept(&mut self, signal: &GreenSignal) -> Vec<Completion> {
        let kind = signal.kind();
        let matching: Vec<TaskId> = self
            .tasks
            .iter()
            .filter(|t| t.trigger == Some(kind) && !t.completed)
            .map(|t| t.id)
            .collect();

        if matching.is_empty() {
            tracing::debug!(signal = kind.label(), "Signal matched no open task");
        }

        matching
            .into_iter()
            .filter_map(|id| self.complete_task(id).ok())
            .filter_map(|outcome| outcome.completion())
            .collect()
    }
}

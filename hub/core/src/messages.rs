//! Hub Messages
//!
//! Messages sent from the Hub to UI surfaces.
//!
//! # Design Philosophy
//!
//! Surfaces are pure renderers. Every balance they show, every phase label
//! and every verdict comes from one of these messages, so two surfaces
//! attached to the same Hub always agree.

use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisPhase, AnalysisResult, ImageSummary};
use crate::ledger::{LedgerSnapshot, TaskId};
use crate::rewards::{Redemption, RedemptionQuote};
use crate::signals::GreenSignal;

/// Messages from the Hub to a UI surface
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum HubMessage {
    // ============================================
    // Ledger Messages
    // ============================================
    /// Full ledger state
    Snapshot(LedgerSnapshot),

    /// Balance moved
    BalanceChanged {
        /// New balance
        balance: u64,
        /// Signed change
        delta: i64,
    },

    /// A task was completed and credited
    TaskCompleted {
        /// Completed task
        task_id: TaskId,
        /// Coins credited
        coins: u64,
        /// Balance after the credit
        balance: u64,
    },

    /// A redemption is waiting for confirmation
    RedemptionQuoted {
        /// The quote to confirm or cancel
        quote: RedemptionQuote,
    },

    /// A redemption went through
    RedemptionConfirmed {
        /// What was redeemed
        redemption: Redemption,
    },

    // ============================================
    // Analysis Messages
    // ============================================
    /// A new image replaced the previous one
    ImageLoaded {
        /// Image metadata
        summary: ImageSummary,
    },

    /// The analysis phase changed
    AnalysisPhaseChanged {
        /// New phase
        phase: AnalysisPhase,
    },

    /// A run produced a result
    AnalysisReady {
        /// The result
        result: AnalysisResult,
    },

    /// A run failed
    AnalysisFailed {
        /// Error description
        error: String,
    },

    /// A result raised a signal toward the ledger
    SignalRaised {
        /// The signal
        signal: GreenSignal,
    },

    // ============================================
    // System Messages
    // ============================================
    /// Something to tell the user
    Notify {
        /// Severity
        level: NotifyLevel,
        /// Text to show
        message: String,
    },

    /// The Hub is shutting down
    Quit,
}

impl HubMessage {
    /// Shorthand for an info notification
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self::Notify {
            level: NotifyLevel::Info,
            message: message.into(),
        }
    }

    /// Shorthand for a success notification
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::Notify {
            level: NotifyLevel::Success,
            message: message.into(),
        }
    }

    /// Shorthand for a warning notification
    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self::Notify {
            level: NotifyLevel::Warning,
            message: message.into(),
        }
    }

    /// Shorthand for an error notification
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::Notify {
            level: NotifyLevel::Error,
            message: message.into(),
        }
    }
}

/// Notification levels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotifyLevel {
    /// Informational
    Info,
    /// Warning
    Warning,
    /// Error
    Error,
    /// Success
    Success,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notify_shorthands() {
        assert_eq!(
            HubMessage::warning("low balance"),
            HubMessage::Notify {
                level: NotifyLevel::Warning,
                message: "low balance".to_string(),
            }
        );
    }

    #[test]
    fn test_phase_message_serializes() {
        let msg = HubMessage::AnalysisPhaseChanged {
            phase: AnalysisPhase::Analyzing,
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"AnalysisPhaseChanged":{"phase":"Analyzing"}}"#);
    }
}

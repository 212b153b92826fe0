//! Surface Events
//!
//! Events sent from UI surfaces to the Hub.
//!
//! # Design Philosophy
//!
//! Surfaces report what the user did. They never touch the balance or the
//! analysis state themselves; the Hub decides what an event means and
//! answers with [`HubMessage`](crate::messages::HubMessage)s.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::ledger::TaskId;
use crate::rewards::{QuoteId, RewardId};

/// Events from a UI surface to the Hub
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceEvent {
    // ============================================
    // Connection Events
    // ============================================
    /// Surface attached; the Hub answers with a snapshot
    Connected,

    /// Surface detached; any analysis in flight is cancelled
    Disconnected,

    /// Ask for a fresh snapshot
    RequestSnapshot,

    // ============================================
    // Ledger Events
    // ============================================
    /// User marked a task as done
    CompleteTask {
        /// Task to complete
        task_id: TaskId,
    },

    /// User asked to redeem a reward
    QuoteRedemption {
        /// Reward to redeem
        reward_id: RewardId,
    },

    /// User confirmed a quoted redemption
    ConfirmRedemption {
        /// Quote being confirmed
        quote_id: QuoteId,
    },

    /// User backed out of a quoted redemption
    CancelQuote {
        /// Quote being dropped
        quote_id: QuoteId,
    },

    // ============================================
    // Analysis Events
    // ============================================
    /// User picked an image file on disk
    ImageSelected {
        /// Path to the file
        path: PathBuf,
    },

    /// Surface handed over image bytes directly
    ImageUploaded {
        /// Original file name
        file_name: String,
        /// Raw file contents
        bytes: Vec<u8>,
    },

    /// User pressed "analyze"
    StartAnalysis,

    /// User cancelled the run in flight
    CancelAnalysis,

    // ============================================
    // Lifecycle
    // ============================================
    /// User asked to quit
    QuitRequested,
}

impl SurfaceEvent {
    /// Short name for logs
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
            Self::RequestSnapshot => "request_snapshot",
            Self::CompleteTask { .. } => "complete_task",
            Self::QuoteRedemption { .. } => "quote_redemption",
            Self::ConfirmRedemption { .. } => "confirm_redemption",
            Self::CancelQuote { .. } => "cancel_quote",
            Self::ImageSelected { .. } => "image_selected",
            Self::ImageUploaded { .. } => "image_uploaded",
            Self::StartAnalysis => "start_analysis",
            Self::CancelAnalysis => "cancel_analysis",
            Self::QuitRequested => "quit_requested",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        assert_eq!(
            SurfaceEvent::CompleteTask { task_id: TaskId(2) }.name(),
            "complete_task"
        );
        assert_eq!(SurfaceEvent::StartAnalysis.name(), "start_analysis");
    }

    #[test]
    fn test_event_json_shape() {
        let json = serde_json::to_string(&SurfaceEvent::CompleteTask { task_id: TaskId(2) })
            .unwrap();
        assert_eq!(json, r#"{"CompleteTask":{"task_id":2}}"#);
        let back: SurfaceEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, SurfaceEvent::CompleteTask { task_id: TaskId(2) });
    }
}

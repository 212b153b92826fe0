//! Analysis Session State Machine
//!
//! ```text
//!   Idle ──load_image──> ImageLoaded ──begin──> Analyzing ──settle(Ok)──> ResultReady
//!                          ^   ^                   │  │                       │
//!                          │   └──────cancel───────┘  └──settle(Err)──> Failed│
//!                          └───────────── load_image (any state) ─────────────┘
//! ```
//!
//! Every `begin` hands out a fresh [`AnalysisTicket`]. Loading a new image or
//! cancelling invalidates the outstanding ticket, so a completion that
//! arrives late is reported as [`Settlement::Stale`] and changes nothing.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::classifier::InferenceError;
use super::image::MealImage;
use super::result::AnalysisResult;

/// Token identifying one analysis run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnalysisTicket(pub u64);

impl std::fmt::Display for AnalysisTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "run#{}", self.0)
    }
}

/// Observable session state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisPhase {
    /// No image
    Idle,
    /// Image present, no result
    ImageLoaded,
    /// Classification in flight
    Analyzing,
    /// Result present
    ResultReady,
    /// Last run failed
    Failed,
}

impl AnalysisPhase {
    /// Human-readable label
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "Waiting for a photo",
            Self::ImageLoaded => "Ready to analyze",
            Self::Analyzing => "Analyzing...",
            Self::ResultReady => "Result ready",
            Self::Failed => "Analysis failed",
        }
    }

    /// Whether `begin` would be accepted
    #[must_use]
    pub fn can_begin(&self) -> bool {
        matches!(self, Self::ImageLoaded | Self::ResultReady | Self::Failed)
    }
}

impl std::fmt::Display for AnalysisPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Errors when starting a run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// Nothing to analyze
    #[error("No image loaded")]
    NoImage,

    /// A run is already in flight
    #[error("Analysis already in progress ({0})")]
    AlreadyAnalyzing(AnalysisTicket),
}

/// What happened when a completion was settled
#[derive(Clone, Debug, PartialEq)]
pub enum Settlement {
    /// The run produced a result, now current
    Ready(AnalysisResult),
    /// The run failed; the session is in [`AnalysisPhase::Failed`]
    Failed(InferenceError),
    /// The ticket was no longer current; nothing changed
    Stale,
}

/// The meal-analysis state store
#[derive(Debug, Default)]
pub struct AnalysisSession {
    image: Option<MealImage>,
    result: Option<AnalysisResult>,
    error: Option<InferenceError>,
    in_flight: Option<AnalysisTicket>,
    next_ticket: u64,
    runs_settled: u64,
}

impl AnalysisSession {
    /// Create an idle session
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase
    #[must_use]
    pub fn phase(&self) -> AnalysisPhase {
        if self.in_flight.is_some() {
            AnalysisPhase::Analyzing
        } else if self.result.is_some() {
            AnalysisPhase::ResultReady
        } else if self.error.is_some() {
            AnalysisPhase::Failed
        } else if self.image.is_some() {
            AnalysisPhase::ImageLoaded
        } else {
            AnalysisPhase::Idle
        }
    }

    /// Loaded image
    #[must_use]
    pub fn image(&self) -> Option<&MealImage> {
        self.image.as_ref()
    }

    /// Current result
    #[must_use]
    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    /// Error from the last run
    #[must_use]
    pub fn last_error(&self) -> Option<&InferenceError> {
        self.error.as_ref()
    }

    /// Ticket of the run in flight
    #[must_use]
    pub fn in_flight(&self) -> Option<AnalysisTicket> {
        self.in_flight
    }

    /// Number of runs that settled (ready or failed)
    #[must_use]
    pub fn runs_settled(&self) -> u64 {
        self.runs_settled
    }

    /// Load a new image
    ///
    /// Discards any result or error and invalidates the run in flight.
    /// Returns the invalidated ticket so the caller can abort its work.
    pub fn load_image(&mut self, image: MealImage) -> Option<AnalysisTicket> {
        tracing::debug!(file = image.file_name(), "Meal image loaded");
        self.image = Some(image);
        self.result = None;
        self.error = None;
        self.in_flight.take()
    }

    /// Start a run
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::NoImage`] in [`AnalysisPhase::Idle`]
    /// - [`AnalysisError::AlreadyAnalyzing`] while a run is in flight
    pub fn begin(&mut self) -> Result<AnalysisTicket, AnalysisError> {
        if let Some(ticket) = self.in_flight {
            return Err(AnalysisError::AlreadyAnalyzing(ticket));
        }
        if self.image.is_none() {
            return Err(AnalysisError::NoImage);
        }

        self.next_ticket += 1;
        let ticket = AnalysisTicket(self.next_ticket);
        self.in_flight = Some(ticket);
        self.result = None;
        self.error = None;
        Ok(ticket)
    }

    /// Apply a completed run
    ///
    /// Only the ticket in flight is applied, and only once.
    pub fn settle(
        &mut self,
        ticket: AnalysisTicket,
        outcome: Result<AnalysisResult, InferenceError>,
    ) -> Settlement {
        if self.in_flight != Some(ticket) {
            tracing::debug!(%ticket, "Discarding stale analysis completion");
            return Settlement::Stale;
        }
        self.in_flight = None;
        self.runs_settled += 1;

        match outcome {
            Ok(result) => {
                self.result = Some(result.clone());
                Settlement::Ready(result)
            }
            Err(e) => {
                self.error = Some(e.clone());
                Settlement::Failed(e)
            }
        }
    }

    /// Cancel the run in flight, returning its ticket
    pub fn cancel(&mut self) -> Option<AnalysisTicket> {
        let ticket = self.in_flight.take();
        if let Some(t) = ticket {
            tracing::debug!(ticket = %t, "Analysis cancelled");
        }
        ticket
    }

    /// Drop everything and return to [`AnalysisPhase::Idle`]
    pub fn reset(&mut self) -> Option<AnalysisTicket> {
        self.image = None;
        self.result = None;
        self.error = None;
        self.in_flight.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::NutritionEstimate;

    fn meal_image(name: &str) -> MealImage {
        let img = image::RgbImage::new(2, 2);
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        MealImage::from_bytes(name, out.into_inner(), 1 << 20).unwrap()
    }

    fn result(is_vegetarian: bool) -> AnalysisResult {
        AnalysisResult {
            is_vegetarian,
            confidence: 0.95,
            detected_ingredients: Vec::new(),
            nutrition_estimate: NutritionEstimate {
                calories: 350,
                protein: 18,
                carbs: 45,
                fat: 9,
            },
            suggestions: Vec::new(),
        }
    }

    #[test]
    fn test_happy_path_phases() {
        let mut session = AnalysisSession::new();
        assert_eq!(session.phase(), AnalysisPhase::Idle);

        session.load_image(meal_image("a.png"));
        assert_eq!(session.phase(), AnalysisPhase::ImageLoaded);

        let ticket = session.begin().unwrap();
        assert_eq!(session.phase(), AnalysisPhase::Analyzing);

        let settled = session.settle(ticket, Ok(result(true)));
        assert_eq!(settled, Settlement::Ready(result(true)));
        assert_eq!(session.phase(), AnalysisPhase::ResultReady);
        assert_eq!(session.runs_settled(), 1);
    }

    #[test]
    fn test_begin_without_image() {
        let mut session = AnalysisSession::new();
        assert_eq!(session.begin().unwrap_err(), AnalysisError::NoImage);
        assert_eq!(session.phase(), AnalysisPhase::Idle);
    }

    #[test]
    fn test_begin_is_guarded_while_analyzing() {
        let mut session = AnalysisSession::new();
        session.load_image(meal_image("a.png"));
        let ticket = session.begin().unwrap();
        assert_eq!(
            session.begin().unwrap_err(),
            AnalysisError::AlreadyAnalyzing(ticket)
        );
        assert_eq!(session.in_flight(), Some(ticket));
    }

    #[test]
    fn test_new_upload_clears_result() {
        let mut session = AnalysisSession::new();
        session.load_image(meal_image("a.png"));
        let ticket = session.begin().unwrap();
        session.settle(ticket, Ok(result(false)));
        assert!(session.result().is_some());

        session.load_image(meal_image("b.png"));
        assert!(session.result().is_none());
        assert_eq!(session.phase(), AnalysisPhase::ImageLoaded);
        assert_eq!(session.image().unwrap().file_name(), "b.png");
    }

    #[test]
    fn test_upload_mid_analysis_makes_completion_stale() {
        let mut session = AnalysisSession::new();
        session.load_image(meal_image("a.png"));
        let old = session.begin().unwrap();

        let invalidated = session.load_image(meal_image("b.png"));
        assert_eq!(invalidated, Some(old));

        assert_eq!(session.settle(old, Ok(result(true))), Settlement::Stale);
        assert!(session.result().is_none());
        assert_eq!(session.phase(), AnalysisPhase::ImageLoaded);
        assert_eq!(session.runs_settled(), 0);
    }

    #[test]
    fn test_ticket_settles_once() {
        let mut session = AnalysisSession::new();
        session.load_image(meal_image("a.png"));
        let ticket = session.begin().unwrap();
        session.settle(ticket, Ok(result(true)));
        assert_eq!(session.settle(ticket, Ok(result(true))), Settlement::Stale);
        assert_eq!(session.runs_settled(), 1);
    }

    #[test]
    fn test_failure_then_retry() {
        let mut session = AnalysisSession::new();
        session.load_image(meal_image("a.png"));
        let ticket = session.begin().unwrap();
        let settled = session.settle(ticket, Err(InferenceError::Timeout(10)));
        assert_eq!(settled, Settlement::Failed(InferenceError::Timeout(10)));
        assert_eq!(session.phase(), AnalysisPhase::Failed);
        assert!(session.phase().can_begin());

        let retry = session.begin().unwrap();
        assert_ne!(retry, ticket);
        assert!(session.last_error().is_none());
    }

    #[test]
    fn test_cancel() {
        let mut session = AnalysisSession::new();
        session.load_image(meal_image("a.png"));
        let ticket = session.begin().unwrap();
        assert_eq!(session.cancel(), Some(ticket));
        assert_eq!(session.phase(), AnalysisPhase::ImageLoaded);
        assert_eq!(session.settle(ticket, Ok(result(true))), Settlement::Stale);
        assert_eq!(session.cancel(), None);
    }

    #[test]
    fn test_reset() {
        let mut session = AnalysisSession::new();
        session.load_image(meal_image("a.png"));
        session.begin().unwrap();
        assert!(session.reset().is_some());
        assert_eq!(session.phase(), AnalysisPhase::Idle);
    }
}

//! Meal Classifier Trait
//!
//! The contract every classifier satisfies. The mock generator and a real
//! on-device model are interchangeable implementations, so the session and
//! the hub never know which one they are driving.

use async_trait::async_trait;
use thiserror::Error;

use super::image::MealImage;
use super::result::AnalysisResult;

/// Errors from a classification run
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InferenceError {
    /// The model could not interpret the image
    #[error("Image could not be analyzed: {0}")]
    Unreadable(String),

    /// The run exceeded its time budget
    #[error("Analysis timed out after {0}ms")]
    Timeout(u64),

    /// The model backend failed
    #[error("Classifier backend error: {0}")]
    Backend(String),
}

/// Meal classifier
///
/// Implement this trait to plug in a real model.
#[async_trait]
pub trait MealClassifier: Send + Sync {
    /// Classifier name, for logs (e.g. "mock")
    fn name(&self) -> &str;

    /// Whether the classifier is ready to take requests
    async fn ready(&self) -> bool {
        true
    }

    /// Classify one meal image
    async fn classify(&self, image: &MealImage) -> Result<AnalysisResult, InferenceError>;
}

//! Meal Analysis
//!
//! Classifies a meal photo as vegetarian or not. The classifier sits behind
//! the [`MealClassifier`] trait so the random mock and a real model are
//! interchangeable.
//!
//! # Components
//!
//! - [`MealImage`]: A validated `image/*` upload
//! - [`MealClassifier`]: The `classify(image) -> AnalysisResult` contract
//! - [`MockClassifier`]: Timed random result generator
//! - [`AnalysisSession`]: The Idle/ImageLoaded/Analyzing/ResultReady/Failed
//!   state machine with ticket-based cancellation
//!
//! # Usage
//!
//! ```ignore
//! use greenhero_core::analysis::{AnalysisSession, MealClassifier, MealImage, MockClassifier};
//!
//! let mut session = AnalysisSession::new();
//! session.load_image(MealImage::from_path("lunch.jpg", 10 << 20).await?);
//! let ticket = session.begin()?;
//! let outcome = classifier.classify(session.image().unwrap()).await;
//! session.settle(ticket, outcome);
//! ```

mod classifier;
mod image;
mod mock;
mod result;
mod session;

pub use classifier::{InferenceError, MealClassifier};
pub use image::{ImageReadError, ImageSummary, MealImage};
pub use mock::{MockClassifier, MockClassifierConfig};
pub use result::{AnalysisResult, ConfidenceBand, NutritionEstimate};
pub use session::{AnalysisError, AnalysisPhase, AnalysisSession, AnalysisTicket, Settlement};

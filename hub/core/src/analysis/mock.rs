//! Mock Classifier
//!
//! Stands in for a real food-recognition model. After a fixed delay it makes
//! up a result: a weighted coin flip for the verdict, a confidence in
//! [0.92, 0.99), a fixed ingredient list and randomized nutrition numbers.
//! The image is never looked at.

use std::ops::Range;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::classifier::{InferenceError, MealClassifier};
use super::image::MealImage;
use super::result::{AnalysisResult, NutritionEstimate};

/// Confidence range for generated verdicts
pub const CONFIDENCE_RANGE: Range<f64> = 0.92..0.99;

const CALORIES: Range<u32> = 300..500;
const PROTEIN: Range<u32> = 15..25;
const CARBS: Range<u32> = 40..60;
const FAT: Range<u32> = 8..20;

const INGREDIENTS: &[&str] = &["vegetables", "tofu", "mushrooms", "green pepper", "carrot"];

const SUGGESTIONS: &[&str] = &[
    "This meal meets the plant-based standard. Green task complete!",
    "Pair it with seasonal local vegetables to cut transport emissions",
    "Try organic ingredients next time to support sustainable farming",
];

/// Mock classifier settings
#[derive(Clone, Debug, PartialEq)]
pub struct MockClassifierConfig {
    /// Simulated inference latency
    pub delay: Duration,
    /// Chance a result is vegetarian
    pub vegetarian_probability: f64,
    /// Chance a run fails with [`InferenceError::Unreadable`]
    pub failure_rate: f64,
    /// Fixed RNG seed for reproducible runs
    pub seed: Option<u64>,
}

impl Default for MockClassifierConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(3),
            vegetarian_probability: 0.7,
            failure_rate: 0.0,
            seed: None,
        }
    }
}

impl MockClassifierConfig {
    /// Set the simulated latency
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Set the vegetarian probability
    #[must_use]
    pub fn with_vegetarian_probability(mut self, p: f64) -> Self {
        self.vegetarian_probability = p;
        self
    }

    /// Set the failure rate
    #[must_use]
    pub fn with_failure_rate(mut self, p: f64) -> Self {
        self.failure_rate = p;
        self
    }

    /// Fix the RNG seed
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Random result generator behind the [`MealClassifier`] contract
pub struct MockClassifier {
    config: MockClassifierConfig,
    rng: Mutex<StdRng>,
}

impl MockClassifier {
    /// Create a mock classifier
    #[must_use]
    pub fn new(config: MockClassifierConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            rng: Mutex::new(rng),
        }
    }

    /// Settings in use
    #[must_use]
    pub fn config(&self) -> &MockClassifierConfig {
        &self.config
    }

    /// Draw one outcome without waiting
    ///
    /// # Errors
    ///
    /// Returns [`InferenceError::Unreadable`] with probability
    /// `failure_rate`.
    pub fn draw(&self) -> Result<AnalysisResult, InferenceError> {
        let mut rng = self.rng.lock();
        if rng.gen_bool(probability(self.config.failure_rate)) {
            return Err(InferenceError::Unreadable(
                "no food detected in the photo".to_string(),
            ));
        }
        Ok(generate_result(
            &mut *rng,
            self.config.vegetarian_probability,
        ))
    }
}

impl Default for MockClassifier {
    fn default() -> Self {
        Self::new(MockClassifierConfig::default())
    }
}

#[async_trait]
impl MealClassifier for MockClassifier {
    fn name(&self) -> &str {
        "mock"
    }

    async fn classify(&self, image: &MealImage) -> Result<AnalysisResult, InferenceError> {
        tracing::debug!(
            file = image.file_name(),
            delay = ?self.config.delay,
            "Mock analysis started"
        );
        tokio::time::sleep(self.config.delay).await;
        self.draw()
    }
}

/// Generate a mock result from any RNG
pub fn generate_result<R: Rng + ?Sized>(rng: &mut R, vegetarian_probability: f64) -> AnalysisResult {
    AnalysisResult {
        is_vegetarian: rng.gen_bool(probability(vegetarian_probability)),
        confidence: rng.gen_range(CONFIDENCE_RANGE),
        detected_ingredients: INGREDIENTS.iter().map(|s| (*s).to_string()).collect(),
        nutrition_estimate: NutritionEstimate {
            calories: rng.gen_range(CALORIES),
            protein: rng.gen_range(PROTEIN),
            carbs: rng.gen_range(CARBS),
            fat: rng.gen_range(FAT),
        },
        suggestions: SUGGESTIONS.iter().map(|s| (*s).to_string()).collect(),
    }
}

/// Clamp a probability for `gen_bool`, mapping NaN to 0
fn probability(p: f64) -> f64 {
    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, 1.0)
    }
}

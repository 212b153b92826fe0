//! Analysis result types

use serde::{Deserialize, Serialize};

use crate::signals::GreenSignal;

/// Estimated nutrition for the photographed meal
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutritionEstimate {
    /// Kilocalories
    pub calories: u32,
    /// Protein, grams
    pub protein: u32,
    /// Carbohydrates, grams
    pub carbs: u32,
    /// Fat, grams
    pub fat: u32,
}

/// How much to trust a verdict, for display
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceBand {
    /// 90% and up
    High,
    /// 80% to 90%
    Medium,
    /// Below 80%
    Low,
}

impl ConfidenceBand {
    /// Band for a confidence in [0, 1]
    #[must_use]
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 0.9 {
            Self::High
        } else if confidence >= 0.8 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Output of one classification run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Verdict
    pub is_vegetarian: bool,
    /// Confidence in the verdict, in [0, 1]
    pub confidence: f64,
    /// Ingredients spotted, in display order
    pub detected_ingredients: Vec<String>,
    /// Nutrition estimate
    pub nutrition_estimate: NutritionEstimate,
    /// Advisory suggestions, in display order
    pub suggestions: Vec<String>,
}

impl AnalysisResult {
    /// Display band for the confidence
    #[must_use]
    pub fn confidence_band(&self) -> ConfidenceBand {
        ConfidenceBand::from_confidence(self.confidence)
    }

    /// Confidence as a percentage string, e.g. `95.3%`
    #[must_use]
    pub fn confidence_label(&self) -> String {
        format!("{:.1}%", self.confidence * 100.0)
    }

    /// The signal this result raises, if any
    #[must_use]
    pub fn signal(&self) -> Option<GreenSignal> {
        self.is_vegetarian
            .then_some(GreenSignal::VegetarianMealDetected {
                confidence: self.confidence,
            })
    }
}

//! Green Signals
//!
//! Domain events raised when something in the world satisfies a green task.
//! The analysis side raises signals, and whoever owns task completion
//! consumes them through [`SignalSink`]. Neither side knows the other's task
//! identifiers.

use serde::{Deserialize, Serialize};

use crate::ledger::Completion;

/// Kind of signal, used as a task trigger
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalKind {
    /// A meal was verified as vegetarian
    VegetarianMeal,
}

impl SignalKind {
    /// Human-readable label
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::VegetarianMeal => "vegetarian meal",
        }
    }
}

/// A domain signal
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GreenSignal {
    /// The meal analysis decided the photographed meal is vegetarian
    VegetarianMealDetected {
        /// Classifier confidence for the verdict
        confidence: f64,
    },
}

impl GreenSignal {
    /// The trigger kind this signal satisfies
    #[must_use]
    pub fn kind(&self) -> SignalKind {
        match self {
            Self::VegetarianMealDetected { .. } => SignalKind::VegetarianMeal,
        }
    }
}

/// Capability for consuming green signals
///
/// Implemented by [`crate::Ledger`]. Returns the task completions the signal
/// caused (empty when every matching task was already done).
pub trait SignalSink {
    /// Consume a signal
    fn accept(&mut self, signal: &GreenSignal) -> Vec<Completion>;
}

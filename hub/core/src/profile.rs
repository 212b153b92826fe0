//! Hero profile header stats

use serde::{Deserialize, Serialize};

use crate::achievements::AchievementLevel;

/// Static header stats for the current user
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeroProfile {
    /// Hero tier shown next to the balance
    pub level: AchievementLevel,
    /// Consecutive check-in days
    pub streak_days: u32,
    /// Tasks completed this month
    pub monthly_completed: u32,
    /// Monthly task goal
    pub monthly_goal: u32,
    /// Estimated carbon saved, in kilograms
    pub carbon_saved_kg: f64,
}

impl HeroProfile {
    /// Monthly progress label, e.g. `18/30`
    #[must_use]
    pub fn monthly_label(&self) -> String {
        format!("{}/{}", self.monthly_completed, self.monthly_goal)
    }
}

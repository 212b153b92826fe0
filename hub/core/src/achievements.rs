//! Achievements
//!
//! Read-only progress toward long-running milestones. Values come from the
//! seed data and nothing in a session mutates them.

use serde::{Deserialize, Serialize};

/// Achievement tier
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AchievementLevel {
    /// Entry tier
    Bronze,
    /// Second tier
    Silver,
    /// Third tier
    Gold,
    /// Top tier
    Diamond,
}

impl AchievementLevel {
    /// Parse a level from a string, case-insensitive
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "bronze" => Some(Self::Bronze),
            "silver" => Some(Self::Silver),
            "gold" => Some(Self::Gold),
            "diamond" => Some(Self::Diamond),
            _ => None,
        }
    }

    /// Human-readable label
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Bronze => "Bronze",
            Self::Silver => "Silver",
            Self::Gold => "Gold",
            Self::Diamond => "Diamond",
        }
    }

    /// Badge text, e.g. `GOLD`
    #[must_use]
    pub fn badge(&self) -> String {
        self.label().to_uppercase()
    }
}

impl std::fmt::Display for AchievementLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A progress snapshot toward a milestone
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    /// Identifier
    pub id: u32,
    /// Display title
    pub title: String,
    /// Tier
    pub level: AchievementLevel,
    /// Steps done so far
    pub progress: u32,
    /// Steps required
    pub total: u32,
}

impl Achievement {
    /// Progress as a percentage (0-100)
    #[must_use]
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let pct = (u64::from(self.progress) * 100) / u64::from(self.total);
        u8::try_from(pct.min(100)).unwrap_or(100)
    }

    /// Whether the milestone has been reached
    #[must_use]
    pub fn is_unlocked(&self) -> bool {
        self.total > 0 && self.progress >= self.total
    }
}

//! Session Seed Data
//!
//! The fixed lists every session starts from. Nothing here is persisted;
//! each new [`crate::Ledger`] starts over from these values.

use crate::achievements::{Achievement, AchievementLevel};
use crate::leaderboard::{Leaderboard, Peer};
use crate::ledger::{Task, TaskCategory, TaskId};
use crate::profile::HeroProfile;
use crate::rewards::{Reward, RewardId};
use crate::signals::SignalKind;

/// Default starting balance
pub const INITIAL_BALANCE: u64 = 1250;

/// Seed task list
#[must_use]
pub fn tasks() -> Vec<Task> {
    vec![
        Task {
            id: TaskId(1),
            title: "Take public transit".to_string(),
            description: "Commute by metro or bus today".to_string(),
            category: TaskCategory::Transport,
            coins: 50,
            completed: true,
            trigger: None,
        },
        Task {
            id: TaskId(2),
            title: "Vegetarian meal".to_string(),
            description: "Choose a plant-based meal to cut your carbon footprint".to_string(),
            category: TaskCategory::Food,
            coins: 30,
            completed: false,
            trigger: Some(SignalKind::VegetarianMeal),
        },
        Task {
            id: TaskId(3),
            title: "Sort your recycling".to_string(),
            description: "Separate waste and recyclables correctly".to_string(),
            category: TaskCategory::Lifestyle,
            coins: 20,
            completed: false,
            trigger: None,
        },
        Task {
            id: TaskId(4),
            title: "Beach clean-up".to_string(),
            description: "Join the weekend beach clean-up".to_string(),
            category: TaskCategory::Special,
            coins: 100,
            completed: false,
            trigger: None,
        },
    ]
}

/// Seed achievements
#[must_use]
pub fn achievements() -> Vec<Achievement> {
    vec![
        Achievement {
            id: 1,
            title: "Commute Hero".to_string(),
            level: AchievementLevel::Gold,
            progress: 25,
            total: 30,
        },
        Achievement {
            id: 2,
            title: "Veggie Master".to_string(),
            level: AchievementLevel::Silver,
            progress: 12,
            total: 20,
        },
        Achievement {
            id: 3,
            title: "Recycling Expert".to_string(),
            level: AchievementLevel::Bronze,
            progress: 8,
            total: 10,
        },
    ]
}

/// Seed leaderboard (peers only; the user's row is live)
#[must_use]
pub fn leaderboard() -> Leaderboard {
    let peer = |name: &str, coins: u64, avatar: &str| Peer {
        name: name.to_string(),
        coins,
        avatar: avatar.to_string(),
    };
    Leaderboard::new(
        vec![
            peer("Eco Scout", 2850, "\u{1f331}"),           // seedling
            peer("Green Liver", 2640, "\u{1f33f}"),         // herb
            peer("Earth Guardian", 2420, "\u{1f30d}"),      // globe
            peer("Sustainability Doer", 1180, "\u{267b}"),  // recycling
        ],
        "You",
        "\u{1f60a}",
    )
}

/// Seed reward catalog
#[must_use]
pub fn rewards() -> Vec<Reward> {
    let reward = |id: u32, name: &str, coins: u64, category: &str| Reward {
        id: RewardId(id),
        name: name.to_string(),
        coins,
        category: category.to_string(),
    };
    vec![
        reward(1, "Coffee voucher", 200, "Dining"),
        reward(2, "Supermarket credit $50", 500, "Shopping"),
        reward(3, "Eco cutlery set", 300, "Eco goods"),
        reward(4, "Beach clean-up donation", 100, "Charity"),
        reward(5, "Bike-share free pass", 150, "Transport"),
        reward(6, "Tree adoption", 800, "Eco action"),
    ]
}

/// Seed header stats
#[must_use]
pub fn profile() -> HeroProfile {
    HeroProfile {
        level: AchievementLevel::Silver,
        streak_days: 7,
        monthly_completed: 18,
        monthly_goal: 30,
        carbon_saved_kg: 45.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_task_ids_unique_and_positive() {
        let tasks = tasks();
        let ids: HashSet<_> = tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids.len(), tasks.len());
        assert!(tasks.iter().all(|t| t.coins > 0));
    }

    #[test]
    fn test_only_meal_task_has_trigger() {
        let triggered: Vec<_> = tasks()
            .into_iter()
            .filter(|t| t.trigger == Some(SignalKind::VegetarianMeal))
            .map(|t| t.id)
            .collect();
        assert_eq!(triggered, vec![TaskId(2)]);
    }

    #[test]
    fn test_reward_ids_unique() {
        let rewards = rewards();
        let ids: HashSet<_> = rewards.iter().map(|r| r.id).collect();
        assert_eq!(ids.len(), rewards.len());
    }
}

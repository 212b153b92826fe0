//! Leaderboard
//!
//! Peer rows are static. The current user's row is built from the live
//! balance every time the board is read, and ranks are recomputed from the
//! coin totals.

use serde::{Deserialize, Serialize};

/// One ranked row
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// 1-based rank
    pub rank: u32,
    /// Display name
    pub name: String,
    /// Coin total
    pub coins: u64,
    /// Avatar glyph
    pub avatar: String,
    /// Whether this row is the current user
    pub is_self: bool,
}

impl LeaderboardEntry {
    /// Top-three row
    #[must_use]
    pub fn is_podium(&self) -> bool {
        self.rank <= 3
    }
}

/// A static peer row
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Peer {
    /// Display name
    pub name: String,
    /// Coin total
    pub coins: u64,
    /// Avatar glyph
    pub avatar: String,
}

/// Peer rows plus the current user's identity
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Leaderboard {
    peers: Vec<Peer>,
    self_name: String,
    self_avatar: String,
}

impl Leaderboard {
    /// Create a board from static peers
    #[must_use]
    pub fn new(peers: Vec<Peer>, self_name: impl Into<String>, self_avatar: impl Into<String>) -> Self {
        Self {
            peers,
            self_name: self_name.into(),
            self_avatar: self_avatar.into(),
        }
    }

    /// Rank everyone, with the current user's coins set to `balance`
    ///
    /// Sorted by coins, descending. A peer with the same total as the user
    /// keeps the higher rank.
    #[must_use]
    pub fn ranked(&self, balance: u64) -> Vec<LeaderboardEntry> {
        let mut rows: Vec<LeaderboardEntry> = self
            .peers
            .iter()
            .map(|p| LeaderboardEntry {
                rank: 0,
                name: p.name.clone(),
                coins: p.coins,
                avatar: p.avatar.clone(),
                is_self: false,
            })
            .collect();
        rows.push(LeaderboardEntry {
            rank: 0,
            name: self.self_name.clone(),
            coins: balance,
            avatar: self.self_avatar.clone(),
            is_self: true,
        });

        // Stable sort keeps peers ahead of the self row on ties
        rows.sort_by(|a, b| b.coins.cmp(&a.coins));
        for (i, row) in rows.iter_mut().enumerate() {
            row.rank = u32::try_from(i + 1).unwrap_or(u32::MAX);
        }
        rows
    }

    /// The current user's rank for a given balance
    #[must_use]
    pub fn self_rank(&self, balance: u64) -> u32 {
        self.ranked(balance)
            .iter()
            .find(|e| e.is_self)
            .map_or(0, |e| e.rank)
    }
}

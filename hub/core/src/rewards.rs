//! Reward Catalog and Redemption Types
//!
//! Rewards are bought with Green Coins. Redemption is two-phase: the ledger
//! first issues a [`RedemptionQuote`] (no debit), and the debit only happens
//! when the surface confirms the quote.

use serde::{Deserialize, Serialize};

/// Reward identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RewardId(pub u32);

impl From<u32> for RewardId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for RewardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An item in the reward catalog
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    /// Identifier
    pub id: RewardId,
    /// Display name
    pub name: String,
    /// Cost in Green Coins
    pub coins: u64,
    /// Catalog category (display only)
    pub category: String,
}

/// A reward together with whether the current balance covers it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardView {
    /// The reward
    pub reward: Reward,
    /// `balance >= reward.coins`
    pub affordable: bool,
}

/// Pending-quote identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuoteId(pub u64);

impl From<u64> for QuoteId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for QuoteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "q{}", self.0)
    }
}

/// A priced, unconfirmed redemption
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedemptionQuote {
    /// Quote identifier, used to confirm or cancel
    pub quote_id: QuoteId,
    /// Reward being redeemed
    pub reward_id: RewardId,
    /// Reward name, for confirmation prompts
    pub reward_name: String,
    /// Cost that will be debited
    pub cost: u64,
    /// Balance after the debit, at quote time
    pub balance_after: u64,
}

/// A confirmed redemption
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redemption {
    /// The quote this redemption settled
    pub quote_id: QuoteId,
    /// Reward redeemed
    pub reward_id: RewardId,
    /// Coins debited
    pub cost: u64,
    /// Balance after the debit
    pub balance: u64,
}

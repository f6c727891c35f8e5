// src/core/types.rs
use serde::{Deserialize, Serialize};

/// Identifier of a purchasable product.
pub type ItemId = u64;

/// Identifier of a shopper.
pub type UserId = u64;

/// Items bought together in one order. Duplicates are meaningful in
/// multiset mode and collapse in set mode.
pub type Basket = Vec<ItemId>;

/// A user's baskets, oldest first.
pub type OrderHistory = Vec<Basket>;

/// The actual next basket of one user, as supplied by the evaluation split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundTruthRow {
    pub user_id: UserId,
    pub basket: Basket,
}

impl GroundTruthRow {
    pub fn new(user_id: UserId, basket: Basket) -> Self {
        Self { user_id, basket }
    }
}

/// A ground-truth row joined with the engine's prediction for that user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictedRow {
    pub user_id: UserId,
    pub truth: Basket,
    pub predicted: Basket,
}

/// A predicted row together with its similarity score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRow {
    pub user_id: UserId,
    pub truth: Basket,
    pub predicted: Basket,
    pub score: f64,
}

/// Repetition/exploration split for one user.
///
/// Both values are expected in `[0, 1]` and expected to sum to 1. Neither
/// expectation is enforced here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ratios {
    pub repetition: f64,
    pub exploration: f64,
}

impl Ratios {
    /// Builds the split from an exploration ratio alone.
    pub fn from_exploration(exploration: f64) -> Self {
        Self {
            repetition: 1.0 - exploration,
            exploration,
        }
    }
}

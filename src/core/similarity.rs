// File: src/core/similarity.rs
use crate::core::types::ItemId;
use crate::error::{BasketError, BasketResult};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Basket comparison used when scoring a prediction against ground truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Jaccard over de-duplicated item sets.
    #[default]
    Set,
    /// Jaccard over item multisets; rewards predicting repeat quantities.
    Multiset,
}

impl Metric {
    /// Similarity of two baskets. Two empty baskets score 0.0.
    pub fn score(self, truth: &[ItemId], predicted: &[ItemId]) -> f64 {
        self.try_score(truth, predicted).unwrap_or(0.0)
    }

    /// Like [`Metric::score`], but reports the empty/empty case as
    /// [`BasketError::DivisionUndefined`].
    pub fn try_score(self, truth: &[ItemId], predicted: &[ItemId]) -> BasketResult<f64> {
        match self {
            Metric::Set => try_set_jaccard(truth, predicted),
            Metric::Multiset => try_multiset_jaccard(truth, predicted),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Metric::Set => "set-jaccard",
            Metric::Multiset => "multiset-jaccard",
        }
    }
}

/// `|A ∩ B| / |A ∪ B|` over the distinct items of each basket.
pub fn set_jaccard(a: &[ItemId], b: &[ItemId]) -> f64 {
    try_set_jaccard(a, b).unwrap_or(0.0)
}

pub fn try_set_jaccard(a: &[ItemId], b: &[ItemId]) -> BasketResult<f64> {
    let a: HashSet<ItemId> = a.iter().copied().collect();
    let b: HashSet<ItemId> = b.iter().copied().collect();

    let union = a.union(&b).count();
    if union == 0 {
        return Err(BasketError::DivisionUndefined { what: "set jaccard" });
    }
    let intersection = a.intersection(&b).count();
    Ok(intersection as f64 / union as f64)
}

/// Sum of per-item `min` counts over sum of per-item `max` counts.
pub fn multiset_jaccard(a: &[ItemId], b: &[ItemId]) -> f64 {
    try_multiset_jaccard(a, b).unwrap_or(0.0)
}

pub fn try_multiset_jaccard(a: &[ItemId], b: &[ItemId]) -> BasketResult<f64> {
    let counts_a = item_counts(a);
    let counts_b = item_counts(b);

    let mut numerator = 0usize;
    let mut denominator = 0usize;
    let distinct: HashSet<&ItemId> = counts_a.keys().chain(counts_b.keys()).collect();
    for item in distinct {
        let count_a = counts_a.get(item).copied().unwrap_or(0);
        let count_b = counts_b.get(item).copied().unwrap_or(0);
        numerator += count_a.min(count_b);
        denominator += count_a.max(count_b);
    }

    if denominator == 0 {
        return Err(BasketError::DivisionUndefined {
            what: "multiset jaccard",
        });
    }
    Ok(numerator as f64 / denominator as f64)
}

fn item_counts(basket: &[ItemId]) -> HashMap<ItemId, usize> {
    let mut counts = HashMap::with_capacity(basket.len());
    for &item in basket {
        *counts.entry(item).or_insert(0) += 1;
    }
    counts
}

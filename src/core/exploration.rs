// File: src/core/exploration.rs
use crate::core::tables::RatioTable;
use crate::core::types::{ItemId, OrderHistory, Ratios, UserId};
use crate::error::{BasketError, BasketResult};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Number of trailing baskets measured when no window is configured.
pub const DEFAULT_LAST_N: usize = 1;

/// Fraction of first-time purchases among the items of the last `last_n`
/// baskets. Baskets are de-duplicated before counting.
///
/// A window holding no items yields 0.0.
pub fn exploration_ratio(history: &OrderHistory, last_n: usize) -> f64 {
    try_exploration_ratio(history, last_n).unwrap_or(0.0)
}

/// Complement of [`exploration_ratio`]. A window holding no items yields 1.0.
pub fn repetition_ratio(history: &OrderHistory, last_n: usize) -> f64 {
    1.0 - exploration_ratio(history, last_n)
}

/// Like [`exploration_ratio`], but reports an empty window as
/// [`BasketError::DivisionUndefined`].
pub fn try_exploration_ratio(history: &OrderHistory, last_n: usize) -> BasketResult<f64> {
    let (explored, total) = window_counts(history, last_n);
    if total == 0 {
        return Err(BasketError::DivisionUndefined {
            what: "exploration ratio",
        });
    }
    Ok(explored as f64 / total as f64)
}

/// Returns `(exploration events, items considered)` inside the window.
fn window_counts(history: &OrderHistory, last_n: usize) -> (usize, usize) {
    let mut bought: HashSet<ItemId> = HashSet::new();
    let mut explored = 0;
    let mut total = 0;
    let window_start = history.len().saturating_sub(last_n);

    for (position, basket) in history.iter().enumerate() {
        let in_window = position >= window_start;
        let distinct: HashSet<ItemId> = basket.iter().copied().collect();
        if in_window {
            total += distinct.len();
        }
        for item in distinct {
            if bought.insert(item) && in_window {
                explored += 1;
            }
        }
    }

    (explored, total)
}

impl RatioTable {
    /// Measures every user's history and stores the resulting split.
    ///
    /// Users whose window holds no items count as pure repetition.
    pub fn from_histories(histories: &HashMap<UserId, OrderHistory>, last_n: usize) -> Self {
        let mut table = RatioTable::new();
        for (&user_id, history) in histories {
            let exploration = match try_exploration_ratio(history, last_n) {
                Ok(ratio) => ratio,
                Err(_) => {
                    debug!(user_id, last_n, "empty exploration window");
                    0.0
                }
            };
            table.insert(user_id, Ratios::from_exploration(exploration));
        }
        table
    }
}

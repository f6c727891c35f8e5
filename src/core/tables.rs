// --- File: src/core/tables.rs
use crate::core::types::{ItemId, Ratios, UserId};
use crate::error::{BasketError, BasketResult};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

// --- Ranking ---

/// One `(item, frequency)` entry of a ranked list.
pub type RankedItem = (ItemId, f64);

/// Frequency descending, then item id ascending.
fn rank_order(a: &RankedItem, b: &RankedItem) -> Ordering {
    b.1.total_cmp(&a.1).then(a.0.cmp(&b.0))
}

/// Sums duplicate items and sorts the result by [`rank_order`].
fn rank(entries: impl IntoIterator<Item = (ItemId, f64)>) -> BasketResult<Vec<RankedItem>> {
    let mut merged: HashMap<ItemId, f64> = HashMap::new();
    for (item_id, value) in entries {
        if !value.is_finite() || value < 0.0 {
            return Err(BasketError::InvalidFrequency { item_id, value });
        }
        *merged.entry(item_id).or_insert(0.0) += value;
    }
    let mut ranked: Vec<RankedItem> = merged.into_iter().collect();
    ranked.sort_by(rank_order);
    Ok(ranked)
}

fn head(ranked: &[RankedItem], k: usize) -> Vec<ItemId> {
    ranked.iter().take(k).map(|&(item, _)| item).collect()
}

// --- Per-user frequencies ---

/// One aggregated `(user, item) -> frequency` row as produced upstream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrequencyRow {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub frequency: f64,
}

/// Per-user item frequencies, ranked once on construction.
///
/// Serialized as the flat row list it was built from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<FrequencyRow>", into = "Vec<FrequencyRow>")]
pub struct FrequencyTable {
    users: HashMap<UserId, Vec<RankedItem>>,
}

impl FrequencyTable {
    pub fn from_rows(rows: impl IntoIterator<Item = FrequencyRow>) -> BasketResult<Self> {
        let mut grouped: HashMap<UserId, Vec<(ItemId, f64)>> = HashMap::new();
        for row in rows {
            grouped
                .entry(row.user_id)
                .or_default()
                .push((row.item_id, row.frequency));
        }

        let mut users = HashMap::with_capacity(grouped.len());
        for (user_id, entries) in grouped {
            users.insert(user_id, rank(entries)?);
        }
        Ok(Self { users })
    }

    /// Builds a table from `(user, item, frequency)` triples.
    pub fn from_triples(
        triples: impl IntoIterator<Item = (UserId, ItemId, f64)>,
    ) -> BasketResult<Self> {
        Self::from_rows(
            triples
                .into_iter()
                .map(|(user_id, item_id, frequency)| FrequencyRow {
                    user_id,
                    item_id,
                    frequency,
                }),
        )
    }

    /// The user's ranked row, or `None` if the user never bought anything.
    pub fn ranked(&self, user_id: UserId) -> Option<&[RankedItem]> {
        self.users.get(&user_id).map(Vec::as_slice)
    }

    /// Top `k` items of the user's row.
    pub fn top_k(&self, user_id: UserId, k: usize) -> Option<Vec<ItemId>> {
        self.ranked(user_id).map(|ranked| head(ranked, k))
    }

    /// Sum of the user's frequencies.
    pub fn total(&self, user_id: UserId) -> Option<f64> {
        self.ranked(user_id)
            .map(|ranked| ranked.iter().map(|&(_, freq)| freq).sum())
    }

    /// Every item the user has a frequency for.
    pub fn items(&self, user_id: UserId) -> Option<HashSet<ItemId>> {
        self.ranked(user_id)
            .map(|ranked| ranked.iter().map(|&(item, _)| item).collect())
    }

    pub fn contains_user(&self, user_id: UserId) -> bool {
        self.users.contains_key(&user_id)
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}

impl TryFrom<Vec<FrequencyRow>> for FrequencyTable {
    type Error = BasketError;

    fn try_from(rows: Vec<FrequencyRow>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<FrequencyTable> for Vec<FrequencyRow> {
    fn from(table: FrequencyTable) -> Self {
        let mut user_ids: Vec<UserId> = table.users.keys().copied().collect();
        user_ids.sort_unstable();

        let mut rows = Vec::new();
        for user_id in user_ids {
            for &(item_id, frequency) in &table.users[&user_id] {
                rows.push(FrequencyRow {
                    user_id,
                    item_id,
                    frequency,
                });
            }
        }
        rows
    }
}

// --- Global frequencies ---

/// One aggregated `item -> frequency` row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemFrequency {
    pub item_id: ItemId,
    pub frequency: f64,
}

/// Item popularity across all users; the exploration pool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ItemFrequency>", into = "Vec<ItemFrequency>")]
pub struct GlobalFrequencyTable {
    ranked: Vec<RankedItem>,
}

impl GlobalFrequencyTable {
    pub fn from_pairs(pairs: impl IntoIterator<Item = (ItemId, f64)>) -> BasketResult<Self> {
        Ok(Self {
            ranked: rank(pairs)?,
        })
    }

    pub fn ranked(&self) -> &[RankedItem] {
        &self.ranked
    }

    pub fn top_k(&self, k: usize) -> Vec<ItemId> {
        head(&self.ranked, k)
    }

    /// Top `k` items not contained in `excluded`, in rank order.
    pub fn top_k_excluding(&self, k: usize, excluded: &HashSet<ItemId>) -> Vec<ItemId> {
        self.ranked
            .iter()
            .map(|&(item, _)| item)
            .filter(|item| !excluded.contains(item))
            .take(k)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }
}

impl TryFrom<Vec<ItemFrequency>> for GlobalFrequencyTable {
    type Error = BasketError;

    fn try_from(rows: Vec<ItemFrequency>) -> Result<Self, Self::Error> {
        Self::from_pairs(rows.into_iter().map(|row| (row.item_id, row.frequency)))
    }
}

impl From<GlobalFrequencyTable> for Vec<ItemFrequency> {
    fn from(table: GlobalFrequencyTable) -> Self {
        table
            .ranked
            .into_iter()
            .map(|(item_id, frequency)| ItemFrequency { item_id, frequency })
            .collect()
    }
}

// --- Bundle handed to the engine ---

/// Every frequency source a prediction method may draw from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrequencyTables {
    pub global: GlobalFrequencyTable,
    #[serde(default)]
    pub personal: Option<FrequencyTable>,
    #[serde(default)]
    pub weighted: Option<FrequencyTable>,
}

impl FrequencyTables {
    pub fn new(global: GlobalFrequencyTable) -> Self {
        Self {
            global,
            personal: None,
            weighted: None,
        }
    }

    pub fn with_personal(mut self, personal: FrequencyTable) -> Self {
        self.personal = Some(personal);
        self
    }

    pub fn with_weighted(mut self, weighted: FrequencyTable) -> Self {
        self.weighted = Some(weighted);
        self
    }
}

// --- Per-user scalars ---

/// Expected next-basket size per user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BasketSizeTable {
    sizes: HashMap<UserId, f64>,
}

impl BasketSizeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, user_id: UserId, size: f64) {
        self.sizes.insert(user_id, size);
    }

    pub fn get(&self, user_id: UserId) -> Option<f64> {
        self.sizes.get(&user_id).copied()
    }

    /// Floored size, clamped at zero. NaN counts as zero.
    pub fn predicted_size(&self, user_id: UserId) -> BasketResult<usize> {
        let size = self.get(user_id).ok_or(BasketError::UnknownUser {
            user_id,
            table: "basket size",
        })?;
        // Float-to-int `as` saturates and maps NaN to 0.
        Ok(size.floor().max(0.0) as usize)
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}

impl FromIterator<(UserId, f64)> for BasketSizeTable {
    fn from_iter<T: IntoIterator<Item = (UserId, f64)>>(iter: T) -> Self {
        Self {
            sizes: iter.into_iter().collect(),
        }
    }
}

/// Repetition/exploration split per user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RatioTable {
    ratios: HashMap<UserId, Ratios>,
}

impl RatioTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, user_id: UserId, ratios: Ratios) {
        self.ratios.insert(user_id, ratios);
    }

    pub fn get(&self, user_id: UserId) -> BasketResult<Ratios> {
        self.ratios
            .get(&user_id)
            .copied()
            .ok_or(BasketError::UnknownUser {
                user_id,
                table: "ratio",
            })
    }

    pub fn len(&self) -> usize {
        self.ratios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratios.is_empty()
    }
}

impl FromIterator<(UserId, Ratios)> for RatioTable {
    fn from_iter<T: IntoIterator<Item = (UserId, Ratios)>>(iter: T) -> Self {
        Self {
            ratios: iter.into_iter().collect(),
        }
    }
}

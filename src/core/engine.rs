use crate::core::tables::{BasketSizeTable, FrequencyTable, FrequencyTables, RatioTable};
use crate::core::types::{ItemId, UserId};
use crate::error::{BasketError, BasketResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// The closed set of prediction heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    /// Most popular items overall.
    #[serde(rename = "gfreq")]
    GlobalFrequency,
    /// The user's most frequently bought items.
    #[serde(rename = "pfreq")]
    PersonalFrequency,
    /// Same as personal frequency, over the weighted table.
    #[serde(rename = "wpfreq")]
    WeightedPersonalFrequency,
    /// Personal favourites blended with popular items the user never bought.
    #[serde(rename = "gpfreq")]
    GuidedPersonalFrequency,
}

impl Method {
    pub const ALL: [Method; 4] = [
        Method::GlobalFrequency,
        Method::PersonalFrequency,
        Method::WeightedPersonalFrequency,
        Method::GuidedPersonalFrequency,
    ];

    pub fn selector(self) -> &'static str {
        match self {
            Method::GlobalFrequency => "gfreq",
            Method::PersonalFrequency => "pfreq",
            Method::WeightedPersonalFrequency => "wpfreq",
            Method::GuidedPersonalFrequency => "gpfreq",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.selector())
    }
}

impl FromStr for Method {
    type Err = BasketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|method| method.selector() == s)
            .ok_or_else(|| BasketError::UnsupportedMethod {
                method: s.to_string(),
            })
    }
}

/// Produces next-basket predictions from read-only, pre-aggregated tables.
#[derive(Debug, Clone, Copy)]
pub struct PredictionEngine<'a> {
    frequencies: &'a FrequencyTables,
    basket_sizes: &'a BasketSizeTable,
    ratios: Option<&'a RatioTable>,
}

impl<'a> PredictionEngine<'a> {
    pub fn new(frequencies: &'a FrequencyTables, basket_sizes: &'a BasketSizeTable) -> Self {
        Self {
            frequencies,
            basket_sizes,
            ratios: None,
        }
    }

    /// Supplies the repetition/exploration split needed by guided predictions.
    pub fn with_ratios(mut self, ratios: &'a RatioTable) -> Self {
        self.ratios = Some(ratios);
        self
    }

    /// Predicts the user's next basket, most confident item first.
    ///
    /// `threshold` is only read, and only validated, by the personal-frequency
    /// methods; `None` and `Some(0.0)` both disable trimming.
    pub fn predict(
        &self,
        user_id: UserId,
        method: Method,
        threshold: Option<f64>,
    ) -> BasketResult<Vec<ItemId>> {
        let size = self.basket_sizes.predicted_size(user_id)?;

        let predicted = match method {
            Method::GlobalFrequency => self.frequencies.global.top_k(size),
            Method::PersonalFrequency => {
                let table = required(self.frequencies.personal.as_ref(), method, "personal")?;
                personal_top(table, user_id, size, validate_threshold(threshold)?)?
            }
            Method::WeightedPersonalFrequency => {
                let table = required(self.frequencies.weighted.as_ref(), method, "weighted")?;
                personal_top(table, user_id, size, validate_threshold(threshold)?)?
            }
            Method::GuidedPersonalFrequency => self.guided(user_id, size)?,
        };

        debug!(user_id, %method, size, predicted = predicted.len(), "basket predicted");
        Ok(predicted)
    }

    fn guided(&self, user_id: UserId, size: usize) -> BasketResult<Vec<ItemId>> {
        let method = Method::GuidedPersonalFrequency;
        let personal = required(self.frequencies.personal.as_ref(), method, "personal")?;
        let ratios = required(self.ratios, method, "ratio")?.get(user_id)?;

        let (repetition_quota, exploration_quota) =
            split_quotas(size, ratios.repetition, ratios.exploration);

        let mut predicted = personal
            .top_k(user_id, repetition_quota)
            .ok_or_else(|| unknown_personal(user_id))?;
        let bought = personal.items(user_id).ok_or_else(|| unknown_personal(user_id))?;
        predicted.extend(
            self.frequencies
                .global
                .top_k_excluding(exploration_quota, &bought),
        );
        Ok(predicted)
    }
}

/// `ceil(size * repetition)` and `floor(size * exploration)`, clamped so the
/// two quotas never exceed `size` together.
fn split_quotas(size: usize, repetition: f64, exploration: f64) -> (usize, usize) {
    let repetition_quota = ((size as f64 * repetition).ceil().max(0.0) as usize).min(size);
    let exploration_quota = ((size as f64 * exploration).floor().max(0.0) as usize)
        .min(size - repetition_quota);
    (repetition_quota, exploration_quota)
}

/// Top of the user's row, optionally trimmed by share of the user's total.
///
/// Trimming only inspects the original head, so it can drop items but never
/// pull in ones ranked beyond `size`.
fn personal_top(
    table: &FrequencyTable,
    user_id: UserId,
    size: usize,
    threshold: Option<f64>,
) -> BasketResult<Vec<ItemId>> {
    let ranked = table.ranked(user_id).ok_or_else(|| unknown_personal(user_id))?;

    let mut size = size;
    if let Some(threshold) = threshold.filter(|&t| t > 0.0) {
        let total: f64 = ranked.iter().map(|&(_, freq)| freq).sum();
        if total > 0.0 {
            let below = ranked
                .iter()
                .take(size)
                .filter(|&&(_, freq)| freq / total < threshold)
                .count();
            size -= below;
        }
    }

    Ok(ranked.iter().take(size).map(|&(item, _)| item).collect())
}

fn validate_threshold(threshold: Option<f64>) -> BasketResult<Option<f64>> {
    match threshold {
        Some(value) if !(0.0..=1.0).contains(&value) => {
            Err(BasketError::InvalidThreshold { value })
        }
        other => Ok(other),
    }
}

fn required<'t, T>(
    table: Option<&'t T>,
    method: Method,
    name: &'static str,
) -> BasketResult<&'t T> {
    table.ok_or(BasketError::MissingTable {
        method: method.selector(),
        table: name,
    })
}

fn unknown_personal(user_id: UserId) -> BasketError {
    BasketError::UnknownUser {
        user_id,
        table: "personal frequency",
    }
}

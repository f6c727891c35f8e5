// File: src/core/scorer.rs
use crate::config::{EvalConfig, FailurePolicy};
use crate::core::engine::PredictionEngine;
use crate::core::types::{GroundTruthRow, PredictedRow, ScoredRow, UserId};
use crate::error::BasketResult;
use rayon::prelude::*;
use tracing::{info, warn};

/// Runs the prediction engine over a ground-truth table and aggregates
/// per-row similarity into a mean.
pub struct BatchScorer<'a> {
    engine: PredictionEngine<'a>,
    config: EvalConfig,
}

impl<'a> BatchScorer<'a> {
    pub fn new(engine: PredictionEngine<'a>, config: EvalConfig) -> Self {
        Self { engine, config }
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Attaches a prediction to every row.
    pub fn predict_rows(&self, rows: &[GroundTruthRow]) -> BasketResult<Vec<PredictedRow>> {
        self.run(rows, |row| self.predict_row(row))
    }

    /// Predicts and scores every row.
    pub fn score_rows(&self, rows: &[GroundTruthRow]) -> BasketResult<Vec<ScoredRow>> {
        self.run(rows, |row| {
            let predicted = self.predict_row(row)?;
            let score = self.config.metric.score(&predicted.truth, &predicted.predicted);
            Ok(ScoredRow {
                user_id: predicted.user_id,
                truth: predicted.truth,
                predicted: predicted.predicted,
                score,
            })
        })
    }

    /// Mean similarity over all rows. An empty batch scores 0.0.
    pub fn score(&self, rows: &[GroundTruthRow]) -> BasketResult<f64> {
        let scored = self.score_rows(rows)?;
        let mean = mean_score(&scored);
        info!(
            method = %self.config.method,
            metric = self.config.metric.name(),
            rows = rows.len(),
            scored = scored.len(),
            mean,
            "batch scored"
        );
        Ok(mean)
    }

    fn predict_row(&self, row: &GroundTruthRow) -> BasketResult<PredictedRow> {
        let predicted = self
            .engine
            .predict(row.user_id, self.config.method, self.config.threshold)?;
        Ok(PredictedRow {
            user_id: row.user_id,
            truth: row.basket.clone(),
            predicted,
        })
    }

    /// Applies `f` to every row, serially or on the rayon pool, then applies
    /// the failure policy. Output keeps input order.
    fn run<T, F>(&self, rows: &[GroundTruthRow], f: F) -> BasketResult<Vec<T>>
    where
        T: Send,
        F: Fn(&GroundTruthRow) -> BasketResult<T> + Sync,
    {
        match (self.config.failure_policy, self.config.parallel) {
            (FailurePolicy::Strict, false) => rows.iter().map(&f).collect(),
            // Short-circuits on whichever failing row rayon reaches first.
            (FailurePolicy::Strict, true) => rows.par_iter().map(&f).collect(),
            (FailurePolicy::Lenient, parallel) => {
                let results: Vec<(UserId, BasketResult<T>)> = if parallel {
                    rows.par_iter().map(|row| (row.user_id, f(row))).collect()
                } else {
                    rows.iter().map(|row| (row.user_id, f(row))).collect()
                };
                Ok(results
                    .into_iter()
                    .filter_map(|(user_id, result)| match result {
                        Ok(value) => Some(value),
                        Err(e) => {
                            warn!(user_id, error = %e, "skipping row");
                            None
                        }
                    })
                    .collect())
            }
        }
    }
}

/// Arithmetic mean of row scores; 0.0 when there are none.
pub fn mean_score(rows: &[ScoredRow]) -> f64 {
    if rows.is_empty() {
        warn!("no scored rows, reporting 0.0");
        return 0.0;
    }
    rows.iter().map(|row| row.score).sum::<f64>() / rows.len() as f64
}

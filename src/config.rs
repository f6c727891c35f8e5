// File: src/config.rs
use crate::core::engine::Method;
use crate::core::exploration::DEFAULT_LAST_N;
use crate::core::similarity::Metric;
use crate::error::BasketResult;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// What the batch scorer does when one row fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Abort on a failing row. Serial runs report the first failure in input
    /// order; parallel runs may report any failing row.
    #[default]
    Strict,
    /// Log and skip failing rows; average the rest.
    Lenient,
}

/// Settings for one evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    pub method: Method,
    pub metric: Metric,
    /// Minimum share of a user's total frequency an item needs to stay in a
    /// personal prediction. `None` disables trimming.
    pub threshold: Option<f64>,
    /// Trailing baskets measured when ratios are derived from histories.
    pub last_n: usize,
    pub failure_policy: FailurePolicy,
    /// Fan rows out over the rayon pool.
    pub parallel: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            method: Method::PersonalFrequency,
            metric: Metric::Set,
            threshold: None,
            last_n: DEFAULT_LAST_N,
            failure_policy: FailurePolicy::Strict,
            parallel: false,
        }
    }
}

impl EvalConfig {
    pub fn from_json_file(path: &Path) -> BasketResult<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

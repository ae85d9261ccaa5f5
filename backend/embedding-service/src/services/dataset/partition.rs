use super::index::UserHistory;
use crate::error::{Result, ServiceError};
use crate::models::Record;
use indexmap::IndexMap;
use std::str::FromStr;
use tracing::debug;

/// Allowed distance of the ratio sum from 1.0
const RATIO_SUM_TOLERANCE: f64 = 1e-6;

/// Ordered split name → fraction
///
/// Key order is cut order: earlier splits take the front of each user's history,
/// the last split takes whatever remains.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitRatios {
    ratios: Vec<(String, f64)>,
}

impl SplitRatios {
    /// Build from (name, ratio) pairs. Validation is deferred to [`partition`].
    pub fn new<I, S>(ratios: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            ratios: ratios
                .into_iter()
                .map(|(name, ratio)| (name.into(), ratio))
                .collect(),
        }
    }

    pub fn train_test(train: f64) -> Self {
        Self::new([("train", train), ("test", 1.0 - train)])
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.ratios.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.ratios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratios.is_empty()
    }

    pub fn validate(&self) -> Result<()> {
        if self.ratios.is_empty() {
            return Err(ServiceError::InvalidConfiguration(
                "at least one split is required".to_string(),
            ));
        }

        let mut seen = std::collections::HashSet::new();
        for (name, ratio) in &self.ratios {
            if !seen.insert(name.as_str()) {
                return Err(ServiceError::InvalidConfiguration(format!(
                    "duplicate split name '{}'",
                    name
                )));
            }
            if !(*ratio > 0.0 && *ratio <= 1.0) {
                return Err(ServiceError::InvalidConfiguration(format!(
                    "split '{}' has ratio {} outside (0, 1]",
                    name, ratio
                )));
            }
        }

        let sum: f64 = self.ratios.iter().map(|(_, r)| r).sum();
        if (sum - 1.0).abs() > RATIO_SUM_TOLERANCE {
            return Err(ServiceError::InvalidConfiguration(format!(
                "split ratios must sum to 1, got {}",
                sum
            )));
        }

        Ok(())
    }
}

impl Default for SplitRatios {
    fn default() -> Self {
        Self::train_test(0.8)
    }
}

/// Parses `train=0.8,test=0.2`
impl FromStr for SplitRatios {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self> {
        let mut ratios = Vec::new();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (name, ratio) = part.split_once('=').ok_or_else(|| {
                ServiceError::InvalidConfiguration(format!(
                    "expected name=ratio, got '{}'",
                    part
                ))
            })?;
            let ratio: f64 = ratio.trim().parse().map_err(|_| {
                ServiceError::InvalidConfiguration(format!(
                    "ratio for split '{}' is not a number: '{}'",
                    name.trim(),
                    ratio.trim()
                ))
            })?;
            ratios.push((name.trim().to_string(), ratio));
        }
        Ok(Self { ratios })
    }
}

/// split name → per-user sub-histories
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartitionedHistory {
    splits: IndexMap<String, UserHistory>,
}

impl PartitionedHistory {
    pub fn get(&self, split: &str) -> Option<&UserHistory> {
        self.splits.get(split)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &UserHistory)> {
        self.splits.iter().map(|(name, history)| (name.as_str(), history))
    }

    pub fn split_names(&self) -> impl Iterator<Item = &str> {
        self.splits.keys().map(String::as_str)
    }

    /// Records of one split, users in first-seen order
    pub fn flatten(&self, split: &str) -> Option<Vec<Record>> {
        self.splits.get(split).map(UserHistory::to_records)
    }
}

/// Cut every user's history into contiguous, order-preserving pieces
///
/// For a history of length `L`, split `i` (all but the last) receives
/// `floor(L * ratio_i)` items; the last split receives the remainder, so
/// floor rounding never drops records.
pub fn partition(history: &UserHistory, ratios: &SplitRatios) -> Result<PartitionedHistory> {
    ratios.validate()?;

    let mut splits: IndexMap<String, UserHistory> = ratios
        .names()
        .map(|name| (name.to_string(), UserHistory::new()))
        .collect();
    let last = ratios.len() - 1;

    for (user_id, interactions) in history.iter() {
        let len = interactions.len();
        let mut cursor = 0usize;

        for (idx, ((_, ratio), split)) in ratios.ratios.iter().zip(splits.values_mut()).enumerate() {
            let end = if idx == last {
                len
            } else {
                let take = ((len as f64) * ratio).floor() as usize;
                cursor + take.min(len - cursor)
            };
            split.insert(user_id, interactions[cursor..end].to_vec());
            cursor = end;
        }
    }

    debug!(
        "Partitioned {} users into {} splits",
        history.user_count(),
        ratios.len()
    );

    Ok(PartitionedHistory { splits })
}

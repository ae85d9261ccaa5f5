// ============================================
// Evaluate Job
// ============================================
//
// Scores a JSON-lines split with the recommendation model and reports
// class accuracy against binarized ratings.
//
// Usage:
//   embedding-service --mode evaluate --split output/test.jsonl

use crate::config::DatasetConfig;
use crate::error::Result;
use crate::services::dataset::read_jsonl;
use crate::services::evaluation::{response_accuracy, to_inference_request};
use crate::services::providers::{PredictionKind, ScoringProvider};
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationReport {
    pub count: usize,
    pub accuracy: f64,
}

pub async fn run_evaluate_job(
    dataset: &DatasetConfig,
    provider: &dyn ScoringProvider,
    split_path: &Path,
) -> Result<EvaluationReport> {
    let records = read_jsonl(split_path)?;

    // ratings become 0/1 classes; scores are then judged by the recommend threshold
    let (request, labels) = to_inference_request(&records, Some(dataset.label_threshold));
    let payload = serde_json::to_string(&request)?;

    let response = provider
        .score(PredictionKind::Recommendation, &payload)
        .await?;
    let accuracy = response_accuracy(&response, &labels, dataset.recommend_threshold)?;

    info!(
        "Evaluated {} records from {}: accuracy={:.4}",
        records.len(),
        split_path.display(),
        accuracy
    );

    Ok(EvaluationReport {
        count: records.len(),
        accuracy,
    })
}

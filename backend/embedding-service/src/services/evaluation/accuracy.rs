use super::binarize::binarize;
use crate::error::{Result, ServiceError};
use crate::models::{ScorePrediction, ScoreResponse};

/// Fraction of pairs where the predicted class equals the thresholded label
///
/// The predicted class comes from the positive-class score (`scores[1]`); both
/// sides use the same strict `> threshold` rule.
pub fn class_accuracy(predictions: &[ScorePrediction], labels: &[f32], threshold: f32) -> Result<f64> {
    if predictions.len() != labels.len() {
        return Err(ServiceError::LengthMismatch {
            predictions: predictions.len(),
            labels: labels.len(),
        });
    }
    if predictions.is_empty() {
        return Err(ServiceError::EmptyInput(
            "accuracy needs at least one prediction".to_string(),
        ));
    }

    let mut total = 0.0f64;
    for (prediction, &label) in predictions.iter().zip(labels) {
        let predicted = binarize(prediction.positive_score()?, threshold) as i32;
        let actual = binarize(label, threshold) as i32;
        total += (1 - (predicted - actual).pow(2)) as f64;
    }

    Ok(total / predictions.len() as f64)
}

pub fn response_accuracy(response: &ScoreResponse, labels: &[f32], threshold: f32) -> Result<f64> {
    class_accuracy(&response.predictions, labels, threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(neg: f32, pos: f32) -> ScorePrediction {
        ScorePrediction {
            scores: vec![neg, pos],
        }
    }

    #[test]
    fn test_exact_match() {
        let predictions = vec![scores(0.1, 0.9), scores(0.8, 0.2)];
        let accuracy = class_accuracy(&predictions, &[4.0, 2.0], 3.0).unwrap();
        assert_eq!(accuracy, 1.0);
    }

    #[test]
    fn test_partial_match() {
        // positive scores are compared against the same threshold as the labels
        let predictions = vec![scores(0.0, 4.5), scores(0.0, 1.0), scores(0.0, 3.0), scores(0.0, 5.0)];
        let accuracy = class_accuracy(&predictions, &[5.0, 4.0, 1.0, 3.0], 3.0).unwrap();
        assert!((accuracy - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_length_mismatch() {
        let err = class_accuracy(&[scores(0.1, 0.9)], &[1.0, 2.0], 3.0).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::LengthMismatch {
                predictions: 1,
                labels: 2
            }
        ));
    }

    #[test]
    fn test_empty_input() {
        let err = class_accuracy(&[], &[], 3.0).unwrap_err();
        assert!(matches!(err, ServiceError::EmptyInput(_)));
    }

    #[test]
    fn test_single_score_is_contract_violation() {
        let predictions = vec![ScorePrediction { scores: vec![0.9] }];
        let err = class_accuracy(&predictions, &[4.0], 3.0).unwrap_err();
        assert!(matches!(err, ServiceError::ProviderContractViolation(_)));
    }

    #[test]
    fn test_response_accuracy() {
        let response = ScoreResponse {
            predictions: vec![scores(0.2, 0.8), scores(0.3, 0.7)],
        };
        let accuracy = response_accuracy(&response, &[1.0, 0.0], 0.5).unwrap();
        assert!((accuracy - 0.5).abs() < 1e-9);
    }
}

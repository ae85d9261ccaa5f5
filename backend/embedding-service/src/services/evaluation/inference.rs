use super::binarize::binarize;
use crate::models::{InferenceInstance, InferenceRequest, Record};

/// Split records into a scoring request and the matching ground-truth labels
///
/// With `binarize_threshold`, labels are turned into 0.0/1.0 classes for the
/// recommendation model; otherwise raw ratings are returned.
pub fn to_inference_request(
    records: &[Record],
    binarize_threshold: Option<f32>,
) -> (InferenceRequest, Vec<f32>) {
    let instances = records
        .iter()
        .map(|r| InferenceInstance {
            in0: vec![r.user_id],
            in1: vec![r.item_id],
        })
        .collect();

    let labels = records
        .iter()
        .map(|r| match binarize_threshold {
            Some(threshold) => f32::from(binarize(r.label, threshold)),
            None => r.label,
        })
        .collect();

    (InferenceRequest { instances }, labels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let records = vec![Record::new(1, 10, 4.0), Record::new(2, 20, 2.0)];
        let (request, labels) = to_inference_request(&records, None);

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({
                "instances": [
                    {"in0": [1], "in1": [10]},
                    {"in0": [2], "in1": [20]}
                ]
            })
        );
        assert_eq!(labels, vec![4.0, 2.0]);
    }

    #[test]
    fn test_binarized_labels() {
        let records = vec![Record::new(1, 10, 4.0), Record::new(2, 20, 3.0)];
        let (_, labels) = to_inference_request(&records, Some(3.0));
        assert_eq!(labels, vec![1.0, 0.0]);
    }
}

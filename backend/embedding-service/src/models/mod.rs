use crate::error::{Result, ServiceError};
use serde::{Deserialize, Serialize};

pub type UserId = u64;
pub type ItemId = u64;

/// One (user, item, label) interaction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "InteractionRow", try_from = "InteractionRow")]
pub struct Record {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub label: f32,
}

impl Record {
    pub fn new(user_id: UserId, item_id: ItemId, label: f32) -> Self {
        Self {
            user_id,
            item_id,
            label,
        }
    }

    /// Parse one delimited row: `user_id, item_id, label, ...`
    ///
    /// Columns past the third are ignored.
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Result<Self> {
        let user_raw = field(fields, 0, "user_id")?;
        let item_raw = field(fields, 1, "item_id")?;
        let label_raw = field(fields, 2, "label")?;

        let user_id = user_raw
            .parse::<UserId>()
            .map_err(|_| ServiceError::format("user_id", user_raw))?;
        let item_id = item_raw
            .parse::<ItemId>()
            .map_err(|_| ServiceError::format("item_id", item_raw))?;
        let label = label_raw
            .parse::<f32>()
            .map_err(|_| ServiceError::format("label", label_raw))?;

        Ok(Self::new(user_id, item_id, label))
    }

    pub fn parse_line(line: &str, delimiter: char) -> Result<Self> {
        let fields: Vec<&str> = line.split(delimiter).collect();
        Self::from_fields(&fields)
    }

    pub fn interaction(&self) -> Interaction {
        Interaction {
            item_id: self.item_id,
            label: self.label,
        }
    }
}

/// Wire shape of a record: `{"in0": [user], "in1": [item], "label": x}`
///
/// The scoring model takes one identifier per input slot, so ids stay wrapped
/// in single-element lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRow {
    pub in0: Vec<UserId>,
    pub in1: Vec<ItemId>,
    pub label: f32,
}

impl From<Record> for InteractionRow {
    fn from(record: Record) -> Self {
        Self {
            in0: vec![record.user_id],
            in1: vec![record.item_id],
            label: record.label,
        }
    }
}

impl TryFrom<InteractionRow> for Record {
    type Error = ServiceError;

    fn try_from(row: InteractionRow) -> Result<Self> {
        let user_id = single(&row.in0, "in0")?;
        let item_id = single(&row.in1, "in1")?;
        Ok(Record::new(user_id, item_id, row.label))
    }
}

fn field<'a, S: AsRef<str>>(fields: &'a [S], idx: usize, name: &'static str) -> Result<&'a str> {
    fields
        .get(idx)
        .map(|f| f.as_ref().trim())
        .ok_or_else(|| ServiceError::format(name, "<missing>"))
}

fn single(ids: &[u64], field: &'static str) -> Result<u64> {
    match ids {
        [id] => Ok(*id),
        other => Err(ServiceError::format(field, format!("{:?}", other))),
    }
}

/// (item, label) entry of a user's history
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interaction {
    pub item_id: ItemId,
    pub label: f32,
}

// ============================================
// Model endpoint wire types
// ============================================

/// Scoring request instance: `{"in0": [user], "in1": [item]}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceInstance {
    pub in0: Vec<UserId>,
    pub in1: Vec<ItemId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceRequest {
    pub instances: Vec<InferenceInstance>,
}

/// Embedding request instance: `{"in1": [item]}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingInstance {
    pub in1: Vec<ItemId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingRequest {
    pub instances: Vec<EmbeddingInstance>,
}

impl EmbeddingRequest {
    pub fn for_items(item_ids: &[ItemId]) -> Self {
        Self {
            instances: item_ids
                .iter()
                .map(|&id| EmbeddingInstance { in1: vec![id] })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingPrediction {
    pub embeddings: Vec<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingResponse {
    pub predictions: Vec<EmbeddingPrediction>,
}

/// Two-class score vector: index 0 = negative, index 1 = positive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorePrediction {
    pub scores: Vec<f32>,
}

impl ScorePrediction {
    pub fn positive_score(&self) -> Result<f32> {
        self.scores.get(1).copied().ok_or_else(|| {
            ServiceError::ProviderContractViolation(format!(
                "expected a two-class score vector, got {} scores",
                self.scores.len()
            ))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResponse {
    pub predictions: Vec<ScorePrediction>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ignores_trailing_fields() {
        let record = Record::parse_line("196\t242\t3\t881250949", '\t').unwrap();
        assert_eq!(record, Record::new(196, 242, 3.0));
    }

    #[test]
    fn test_parse_rejects_non_numeric_ids() {
        let err = Record::parse_line("abc,242,3", ',').unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Format {
                field: "user_id",
                ..
            }
        ));

        let err = Record::parse_line("1,x,3", ',').unwrap_err();
        assert!(matches!(err, ServiceError::Format { field: "item_id", .. }));

        let err = Record::parse_line("1,2,high", ',').unwrap_err();
        assert!(matches!(err, ServiceError::Format { field: "label", .. }));
    }

    #[test]
    fn test_parse_missing_label() {
        let err = Record::parse_line("1,2", ',').unwrap_err();
        assert!(matches!(err, ServiceError::Format { field: "label", .. }));
    }

    #[test]
    fn test_wire_shape() {
        let json = serde_json::to_value(Record::new(7, 42, 4.5)).unwrap();
        assert_eq!(json, serde_json::json!({"in0": [7], "in1": [42], "label": 4.5}));

        let back: Record = serde_json::from_value(json).unwrap();
        assert_eq!(back, Record::new(7, 42, 4.5));
    }

    #[test]
    fn test_wire_shape_rejects_multi_id_slot() {
        let result: std::result::Result<Record, _> =
            serde_json::from_str(r#"{"in0": [1, 2], "in1": [3], "label": 1.0}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_embedding_request_shape() {
        let request = EmbeddingRequest::for_items(&[5, 9]);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"instances": [{"in1": [5]}, {"in1": [9]}]})
        );
    }

    #[test]
    fn test_positive_score_requires_two_classes() {
        let prediction = ScorePrediction { scores: vec![0.4] };
        assert!(matches!(
            prediction.positive_score(),
            Err(ServiceError::ProviderContractViolation(_))
        ));

        let prediction = ScorePrediction {
            scores: vec![0.3, 0.7],
        };
        assert_eq!(prediction.positive_score().unwrap(), 0.7);
    }
}

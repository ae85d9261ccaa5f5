use super::cache::EmbeddingCache;
use crate::error::{Result, ServiceError};
use crate::models::ItemId;

/// Closest candidate and its Euclidean distance to the query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub item_id: ItemId,
    pub distance: f32,
}

/// Exact nearest neighbor by linear scan
///
/// `best` starts at the first candidate with distance +inf and is only replaced
/// on a strictly smaller distance, so ties keep the earliest candidate. The
/// query itself is not excluded; see [`nearest_excluding`].
pub fn nearest(query_id: ItemId, candidate_ids: &[ItemId], cache: &EmbeddingCache) -> Result<Neighbor> {
    let first = *candidate_ids
        .first()
        .ok_or_else(|| ServiceError::MissingEmbedding("candidate set is empty".to_string()))?;
    let query = cache.get(query_id)?;

    let mut best = Neighbor {
        item_id: first,
        distance: f32::INFINITY,
    };

    for &candidate_id in candidate_ids {
        let candidate = cache.get(candidate_id)?;
        let distance = (candidate - query).mapv(|d| d * d).sum().sqrt();

        if distance < best.distance {
            best = Neighbor {
                item_id: candidate_id,
                distance,
            };
        }
    }

    Ok(best)
}

/// [`nearest`] over the candidates with `query_id` removed
pub fn nearest_excluding(
    query_id: ItemId,
    candidate_ids: &[ItemId],
    cache: &EmbeddingCache,
) -> Result<Neighbor> {
    let candidates: Vec<ItemId> = candidate_ids
        .iter()
        .copied()
        .filter(|&id| id != query_id)
        .collect();
    nearest(query_id, &candidates, cache)
}

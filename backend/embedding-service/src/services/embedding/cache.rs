use crate::error::{Result, ServiceError};
use crate::models::ItemId;
use crate::services::providers::EmbeddingProvider;
use ndarray::Array1;
use std::collections::HashMap;
use tracing::info;

pub type EmbeddingVector = Array1<f32>;

/// item_id → embedding, filled by one batched provider call and read-only afterwards
#[derive(Debug, Clone, Default)]
pub struct EmbeddingCache {
    embeddings: HashMap<ItemId, EmbeddingVector>,
    dimension: usize,
}

impl EmbeddingCache {
    /// Request embeddings for `item_ids` in a single call and zip them back by position
    ///
    /// The provider must return exactly one vector per requested id, all of the
    /// same length. Nothing is cached if it does not.
    pub async fn populate(provider: &dyn EmbeddingProvider, item_ids: &[ItemId]) -> Result<Self> {
        let vectors = provider.embed(item_ids).await?;
        let cache = Self::from_response(item_ids, vectors)?;

        info!(
            "Embedding cache populated: {} items, dimension {}",
            cache.len(),
            cache.dimension
        );
        Ok(cache)
    }

    pub fn from_response(item_ids: &[ItemId], vectors: Vec<Vec<f32>>) -> Result<Self> {
        if vectors.len() != item_ids.len() {
            return Err(ServiceError::ProviderContractViolation(format!(
                "requested {} embeddings, received {}",
                item_ids.len(),
                vectors.len()
            )));
        }

        let dimension = vectors.first().map(Vec::len).unwrap_or(0);
        if let Some((pos, bad)) = vectors
            .iter()
            .enumerate()
            .find(|(_, v)| v.len() != dimension)
        {
            return Err(ServiceError::ProviderContractViolation(format!(
                "embedding for item {} has length {}, expected {}",
                item_ids[pos],
                bad.len(),
                dimension
            )));
        }

        let embeddings = item_ids
            .iter()
            .copied()
            .zip(vectors.into_iter().map(Array1::from_vec))
            .collect();

        Ok(Self {
            embeddings,
            dimension,
        })
    }

    pub fn get(&self, item_id: ItemId) -> Result<&EmbeddingVector> {
        self.embeddings.get(&item_id).ok_or_else(|| {
            ServiceError::MissingEmbedding(format!("item {} is not in the cache", item_id))
        })
    }

    pub fn contains(&self, item_id: ItemId) -> bool {
        self.embeddings.contains_key(&item_id)
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.embeddings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.embeddings.is_empty()
    }
}

// ============================================
// Neighbor Job
// ============================================
//
// Finds the item closest to a query item in the embedding space.
//
// Workflow:
// 1. Load the training ratings and collect the distinct item ids
// 2. Persist the id list to `<output_dir>/unique_item_ids.json`
// 3. Fetch embeddings for all ids in one batched call
// 4. Linear-scan search with the query excluded from the candidates
// 5. Resolve display names from the item metadata file
//
// Usage:
//   embedding-service --mode neighbors --item 1

use crate::config::Config;
use crate::error::Result;
use crate::models::ItemId;
use crate::services::dataset::{load_item_names, load_records, unique_item_ids, write_item_ids};
use crate::services::embedding::{nearest_excluding, EmbeddingCache, Neighbor};
use crate::services::providers::EmbeddingProvider;
use std::fs;
use tracing::info;

pub const UNIQUE_ITEM_IDS_FILE: &str = "unique_item_ids.json";

#[derive(Debug, Clone)]
pub struct NeighborReport {
    pub query_id: ItemId,
    pub neighbor: Neighbor,
    pub query_name: Option<String>,
    pub neighbor_name: Option<String>,
    pub candidate_count: usize,
}

pub async fn run_neighbor_job(
    config: &Config,
    provider: &dyn EmbeddingProvider,
    query_id: ItemId,
) -> Result<NeighborReport> {
    let data_path = config.dataset.data_path(&config.service);
    let records = load_records(&data_path, config.dataset.delimiter, false)?;
    let item_ids = unique_item_ids(&records);

    fs::create_dir_all(&config.service.output_dir)?;
    write_item_ids(config.service.output_dir.join(UNIQUE_ITEM_IDS_FILE), &item_ids)?;
    info!("Found {} unique items in {}", item_ids.len(), data_path.display());

    let cache = EmbeddingCache::populate(provider, &item_ids).await?;
    let neighbor = nearest_excluding(query_id, &item_ids, &cache)?;

    let item_path = config.dataset.item_path(&config.service);
    let names = load_item_names(&item_path)?;

    let report = NeighborReport {
        query_id,
        neighbor,
        query_name: names.get(&query_id).cloned(),
        neighbor_name: names.get(&neighbor.item_id).cloned(),
        candidate_count: item_ids.len().saturating_sub(1),
    };

    info!(
        "The closest item to {} in the embedding space is {} (distance {:.4})",
        report.query_name.as_deref().unwrap_or("<unknown>"),
        report.neighbor_name.as_deref().unwrap_or("<unknown>"),
        neighbor.distance
    );

    Ok(report)
}

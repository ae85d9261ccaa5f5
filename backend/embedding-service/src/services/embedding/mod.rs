/// Embedding Module
///
/// Item embeddings fetched from the embedding model and exact
/// nearest-neighbor lookup over them.
pub mod cache;
pub mod search;

pub use cache::{EmbeddingCache, EmbeddingVector};
pub use search::{nearest, nearest_excluding, Neighbor};

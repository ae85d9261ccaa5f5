// ============================================
// Jobs Module
// ============================================
//
// One-shot runners selected by `--mode`:
// 1. partition / convert: ratings file → JSON-lines splits
// 2. neighbors: nearest item in the embedding space
// 3. evaluate: recommendation accuracy on a split
//
// `predict` needs no job; main calls the Predictor directly.

pub mod evaluate_job;
pub mod neighbor_job;
pub mod partition_job;

pub use evaluate_job::{run_evaluate_job, EvaluationReport};
pub use neighbor_job::{run_neighbor_job, NeighborReport, UNIQUE_ITEM_IDS_FILE};
pub use partition_job::{run_convert_job, run_partition_job, PartitionReport, SplitOutput};

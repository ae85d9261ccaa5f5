/// Dataset Module
///
/// Turns raw rating rows into per-user histories and ratio-based splits.
///
/// # Workflow
/// 1. Load delimited rows into [`Record`](crate::models::Record)s
/// 2. Group by user and by item ([`InteractionIndex`])
/// 3. Cut each user's history by [`SplitRatios`] ([`partition`])
/// 4. Flatten each split and write it as JSON lines
pub mod index;
pub mod io;
pub mod partition;

pub use index::{DatasetStats, InteractionIndex, ItemIndex, UserHistory};
pub use io::{
    convert_delimited_to_jsonl, load_item_names, load_records, read_item_names, read_jsonl,
    read_records, unique_item_ids, write_item_ids, write_jsonl,
};
pub use partition::{partition, PartitionedHistory, SplitRatios};

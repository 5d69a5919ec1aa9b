// src/lib.rs
//
// Data-quality core for scraped lead batches: duplicate detection and
// merging, cross-campaign exclusion, and weighted lead scoring. Pure,
// synchronous, in-memory; the caller owns all I/O.

pub mod exclusion;
pub mod matching;
pub mod merging;
pub mod models;
pub mod pipeline;
pub mod scoring;

pub use exclusion::{partition_leads, HistoricalIndex};
pub use matching::find_duplicate_groups;
pub use merging::{apply_merge, merge_group};
pub use pipeline::{run_pipeline, PipelineConfig, PipelineOutcome, PipelineStats};
pub use scoring::{score_batch, score_lead};

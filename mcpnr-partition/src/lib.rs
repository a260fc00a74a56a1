//! Fiduccia-Mattheyses multi-way hypergraph partitioner.

pub mod buckets;
pub mod config;
pub mod driver;
pub mod engine;
pub mod error;
pub mod gain;
pub mod hypergraph;
pub mod io;
pub mod orchestrate;
pub mod pass;

pub use error::PartitionError;
pub use io::ParsedDesign;
pub use orchestrate::PartitionOutcome;

use anyhow::Result;

/// Parse `text`, partition it into `k` groups, and return the outcome.
/// Trial count is `min(32, hardware_parallelism)` unless `trial_override`
/// is set.
pub fn partition_text(text: &str, k: usize, trial_override: Option<usize>) -> Result<PartitionOutcome> {
    let design = io::parse_design(text)?;
    Ok(orchestrate::partition(&design, k, trial_override)?)
}

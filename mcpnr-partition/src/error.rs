//! Error taxonomy for the partitioner (see SPEC_FULL.md "Error handling").
//!
//! Kept as a small hand-written enum in the style of
//! `mcpnr_common::CellGetAttribError` / `mcpnr_routing::RoutingError` rather
//! than reaching for a derive-macro crate: the taxonomy is fixed and small,
//! and callers wrap it with `anyhow::Context` at the boundary.

use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum PartitionError {
    /// Missing argument, unreadable file, or a malformed token in the input stream.
    InputError(String),
    /// A net names a cell that was never declared in the cell list.
    ReferenceError { net: String, cell: String },
    /// An invariant was violated inside a single trial; the trial is discarded.
    TrialFailure(String),
    /// Every trial failed; there is no result to write.
    NoSolution,
}

impl Display for PartitionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            Self::InputError(s) => write!(f, "input error: {}", s),
            Self::ReferenceError { net, cell } => {
                write!(f, "net {:?} references undeclared cell {:?}", net, cell)
            }
            Self::TrialFailure(s) => write!(f, "trial failure: {}", s),
            Self::NoSolution => write!(f, "no trial produced a usable partition"),
        }
    }
}

impl std::error::Error for PartitionError {}

//! Multi-start orchestration (spec §4.7): T independent single-threaded
//! trials race to the best cut; the only shared mutable state is the
//! best-so-far record behind a mutex.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::driver;
use crate::engine::FmEngine;
use crate::error::PartitionError;
use crate::hypergraph::Hypergraph;
use crate::io::ParsedDesign;

pub const WALL_CLOCK_BUDGET: Duration = Duration::from_secs(50);

pub struct PartitionOutcome {
    pub cut_size: i64,
    /// `groups[g]` holds the names of every cell assigned to group `g`.
    pub groups: Vec<Vec<String>>,
}

/// Run `trials` independent trials in parallel and keep the smallest cut.
/// `trials` defaults to `min(32, max(1, hardware_parallelism))` but may be
/// overridden (spec §6, `MCPNR_PARTITION_TRIALS`).
pub fn partition(design: &ParsedDesign, k: usize, trial_override: Option<usize>) -> Result<PartitionOutcome, PartitionError> {
    let trials = trial_override.unwrap_or_else(default_trial_count);
    let deadline = Instant::now() + WALL_CLOCK_BUDGET;
    let best: Mutex<Option<PartitionOutcome>> = Mutex::new(None);

    std::thread::scope(|scope| {
        for trial in 0..trials {
            let best = &best;
            scope.spawn(move || {
                match run_trial(design, k, trial, deadline) {
                    Ok(outcome) => {
                        log::info!("trial {} finished with cutSize {}", trial, outcome.cut_size);
                        let mut guard = best.lock().unwrap();
                        let is_better = guard.as_ref().map(|cur| outcome.cut_size < cur.cut_size).unwrap_or(true);
                        if is_better {
                            *guard = Some(outcome);
                        }
                    }
                    Err(e) => log::warn!("trial {} discarded: {}", trial, e),
                }
            });
        }
    });

    best.into_inner().unwrap().ok_or(PartitionError::NoSolution)
}

fn default_trial_count() -> usize {
    let hw = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
    hw.clamp(1, 32)
}

fn run_trial(design: &ParsedDesign, k: usize, trial: usize, deadline: Instant) -> Result<PartitionOutcome, PartitionError> {
    let n = design.cells.len();
    let mut order: Vec<usize> = (0..n).collect();
    if trial == 0 {
        order.sort_by_key(|&i| design.cells[i].nets.len());
    } else {
        let mut rng = StdRng::from_entropy();
        order.shuffle(&mut rng);
    }

    let hypergraph = Hypergraph::from_specs(&design.cells, &design.nets, &order, k);
    let mut engine = FmEngine::new(hypergraph);
    let mut rng = StdRng::from_entropy();

    catch_unwind(AssertUnwindSafe(|| {
        driver::run(&mut engine, k, deadline, &mut rng);
    }))
    .map_err(|_| PartitionError::TrialFailure(format!("trial {} violated an invariant", trial)))?;

    let mut groups = vec![Vec::new(); k];
    for cell in &engine.hypergraph.cells {
        groups[cell.group].push(cell.name.clone());
    }

    Ok(PartitionOutcome { cut_size: engine.hypergraph.cut_size, groups })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hypergraph::CellSpec;

    #[test]
    fn single_trial_produces_all_cells_accounted_for() {
        let design = ParsedDesign {
            cells: vec![
                CellSpec { name: "X".into(), size: 1, nets: vec![0] },
                CellSpec { name: "Y".into(), size: 1, nets: vec![0] },
                CellSpec { name: "Z".into(), size: 1, nets: vec![0] },
            ],
            nets: vec![vec![0, 1, 2]],
        };
        let outcome = partition(&design, 2, Some(1)).expect("trial succeeds");
        let total: usize = outcome.groups.iter().map(|g| g.len()).sum();
        assert_eq!(total, 3);
        assert_eq!(outcome.cut_size, 1); // E4: balance forces a cut
    }
}

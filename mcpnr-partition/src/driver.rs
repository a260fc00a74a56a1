//! Hierarchical driver (spec §4.6): bisect 1 -> 2 -> 4 -> ... -> K
//! (Phase A), then refine multi-way until a fixed point or the wall-clock
//! budget expires (Phase B).

use std::time::Instant;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::engine::FmEngine;
use crate::pass::{multiway_fm, two_way_init_fm};

/// Run the full hierarchical driver against `engine`, whose hypergraph must
/// already have every cell in group 0. `k` is the target group count;
/// `deadline` bounds Phase B (spec §4.6 "50 s elapsed since engine start",
/// generalized so every trial shares one deadline set by the orchestrator).
pub fn run(engine: &mut FmEngine, k: usize, deadline: Instant, rng: &mut StdRng) {
    engine.rebuild();

    // Phase A: bisection ladder. `p` doubles 1, 2, 4, ... up to the largest
    // power of two below `k`; for a non-power-of-two `k` the final level's
    // `g + p` can run past `k` for some `g` (e.g. K=3, p=2, g=1 -> group 3,
    // which doesn't exist). Skip those: the last doubling always has
    // `2*p >= k`, so the groups in `0..p` that *are* still splittable cover
    // every index up to `k - 1`, and any group left un-split this level was
    // already created as a leaf at an earlier level.
    let mut p = 1;
    while p < k {
        for g in 0..p {
            if g + p >= k {
                continue;
            }
            let groups = [g, g + p];
            let iter = 2 * p as u32;

            log::info!("bisection level {} -> {}: splitting group {}", p, 2 * p, g);
            engine.rebuild();
            two_way_init_fm(engine, groups, iter);

            let mut last_cut = engine.hypergraph.cut_size;
            loop {
                engine.rebuild();
                multiway_fm(engine, &groups, iter);
                let improvement = last_cut - engine.hypergraph.cut_size;
                if (improvement as f64) <= engine.hypergraph.nets.len() as f64 * 1e-4 {
                    break;
                }
                last_cut = engine.hypergraph.cut_size;
            }
        }
        p *= 2;
    }

    // Phase B: multi-way refinement to a fixed point, or until the deadline.
    let mut last_cut = engine.hypergraph.cut_size;
    let all_groups: Vec<usize> = (0..k).collect();
    loop {
        if k > 2 {
            let mut order = all_groups.clone();
            order.shuffle(rng);
            let pair = [order[0], order[1]];
            engine.rebuild();
            multiway_fm(engine, &pair, k as u32);
        }

        engine.rebuild();
        multiway_fm(engine, &all_groups, k as u32);

        log::debug!("refinement round: cutSize = {}", engine.hypergraph.cut_size);

        if engine.hypergraph.cut_size == last_cut {
            break;
        }
        last_cut = engine.hypergraph.cut_size;

        if Instant::now() >= deadline {
            log::warn!("refinement stopped: wall-clock budget exhausted");
            break;
        }
    }
}

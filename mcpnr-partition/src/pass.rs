//! Pass driver (spec §4.5): `TwoWayInitFM` seeds a balanced bisection by
//! repeated unlocked moves; `MultiWayFM` runs one locked pass of moves and
//! rolls back to the best-cut prefix.

use crate::engine::{FmEngine, MoveRecord};

/// Balance window for a hierarchical-driver stage targeting `iter` groups
/// out of `k` total (spec §4.6):
/// ```text
/// S_min = total * 0.5^log2(iter) * 0.9^(iter/k)
/// S_max = total * 0.5^log2(iter) * 1.1^(iter/k)
/// ```
/// `log2(iter)` is well-defined for any positive `iter`, power of two or
/// not — `0.5^log2(iter)` is just `1/iter` by the definition of `log2`, so
/// no power-of-two clamp is needed to resolve the "K not a power of two"
/// open question (spec §9 — see SPEC_FULL.md resolution 2). The
/// bisection ladder always passes a power-of-two `iter`; full-`K`
/// multi-way refinement is the only caller that can pass a non-power-of-two
/// `iter` (when `K` itself isn't one), and the formula handles it directly.
pub fn balance_window(total_size: i64, iter: u32, k: usize) -> (i64, i64) {
    let log2_iter = (iter as f64).log2();
    let exponent = iter as f64 / k as f64;
    let base = total_size as f64 * 0.5f64.powf(log2_iter);
    let min_size = (base * 0.9f64.powf(exponent)).trunc() as i64;
    let max_size = (base * 1.1f64.powf(exponent)).trunc() as i64;
    (min_size, max_size)
}

/// TwoWayInitFM: seed a two-way split of `groups = [g0, g1]` (`g1` initially
/// empty) by repeatedly moving the best-gain cell out of `g0` until both
/// groups fall inside the balance window for this stage. No rollback.
pub fn two_way_init_fm(engine: &mut FmEngine, groups: [usize; 2], iter: u32) {
    let (min_size, max_size) = balance_window(engine.hypergraph.total_size(), iter, engine.k);
    let (g0, g1) = (groups[0], groups[1]);

    loop {
        if engine.move_cell_for_initialize(g0, g1).is_none() {
            // Defensive: every cell already moved (can happen for a
            // pathologically small group). Nothing left to seed with.
            break;
        }
        if engine.hypergraph.group_size[g0] <= max_size && engine.hypergraph.group_size[g1] >= min_size {
            break;
        }
    }
}

/// MultiWayFM: one locked pass over `groups`, moving cells greedily by gain
/// until no legal move remains or the cut has diverged to more than 10x its
/// value at pass entry, then rolling back to the best-cut prefix recorded
/// along the way (spec §4.5 steps 1-3).
///
/// The minimum-cut search treats the pass entry itself (zero moves applied)
/// as a candidate prefix, with its own size-diff baseline computed before
/// any move runs. A literal reading of the FM.cpp source instead indexes an
/// uninitialized "best so far" record the first time a later move merely
/// ties the entry cut size, which is undefined behavior; this avoids that
/// by comparing against a plain local variable instead of `records[-1]`,
/// while still letting a cut-neutral, balance-improving prefix win the tie
/// against the untouched entry (spec §4.5 step 2's tie-break applies to the
/// entry "prefix" exactly as it does to any other).
pub fn multiway_fm(engine: &mut FmEngine, groups: &[usize], iter: u32) {
    let (min_size, max_size) = balance_window(engine.hypergraph.total_size(), iter, engine.k);
    let cut0 = engine.hypergraph.cut_size;
    let entry_size_diff = group_size_diff(engine, groups);

    let mut records: Vec<MoveRecord> = Vec::with_capacity(engine.hypergraph.cells.len());
    loop {
        match engine.move_cell(groups, min_size, max_size) {
            None => break,
            Some(rec) => {
                let diverged = rec.cut_size_after > cut0.saturating_mul(10);
                records.push(rec);
                if diverged {
                    break;
                }
            }
        }
    }

    let mut min_cut = cut0;
    let mut min_size_diff = entry_size_diff;
    let mut min_idx: Option<usize> = None;
    for (i, rec) in records.iter().enumerate() {
        if rec.cut_size_after < min_cut {
            min_cut = rec.cut_size_after;
            min_size_diff = rec.size_diff_after;
            min_idx = Some(i);
        } else if rec.cut_size_after == min_cut && rec.size_diff_after < min_size_diff {
            min_size_diff = rec.size_diff_after;
            min_idx = Some(i);
        }
    }

    let keep = min_idx.map(|i| i + 1).unwrap_or(0);
    for rec in records[keep..].iter().rev() {
        engine.hypergraph.rollback_move(rec.cell, rec.from, rec.to);
    }
    engine.hypergraph.cut_size = min_cut;
}

fn group_size_diff(engine: &FmEngine, groups: &[usize]) -> i64 {
    let (mut max_g, mut min_g) = (i64::MIN, i64::MAX);
    for &g in groups {
        let gs = engine.hypergraph.group_size[g];
        max_g = max_g.max(gs);
        min_g = min_g.min(gs);
    }
    max_g - min_g
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hypergraph::{Cell, Hypergraph, Net};

    fn separable4() -> FmEngine {
        // E2: A,B,C,D size 1; nets {A,B},{C,D}; K=2
        let cells = vec![
            Cell { name: "A".into(), size: 1, nets: vec![0], group: 0 },
            Cell { name: "B".into(), size: 1, nets: vec![0], group: 0 },
            Cell { name: "C".into(), size: 1, nets: vec![1], group: 0 },
            Cell { name: "D".into(), size: 1, nets: vec![1], group: 0 },
        ];
        let nets = vec![Net { cells: vec![0, 1] }, Net { cells: vec![2, 3] }];
        FmEngine::new(Hypergraph::new(cells, nets, 2))
    }

    #[test]
    fn balance_window_centers_on_total_over_iter() {
        let (lo, hi) = balance_window(100, 2, 2);
        assert!(lo <= 50 && 50 <= hi);
    }

    #[test]
    fn two_way_init_then_multiway_reaches_zero_cut_on_separable_graph() {
        let mut e = separable4();
        e.rebuild();
        two_way_init_fm(&mut e, [0, 1], 2);
        let mut last = e.hypergraph.cut_size;
        loop {
            e.rebuild();
            multiway_fm(&mut e, &[0, 1], 2);
            if e.hypergraph.cut_size == last {
                break;
            }
            last = e.hypergraph.cut_size;
        }
        assert_eq!(e.hypergraph.cut_size, 0);
        assert_eq!(e.hypergraph.cut_size, e.hypergraph.recompute_cut_size());
    }

    #[test]
    fn multiway_fm_never_worsens_cut() {
        let mut e = separable4();
        e.rebuild();
        let before = e.hypergraph.cut_size;
        multiway_fm(&mut e, &[0, 1], 2);
        assert!(e.hypergraph.cut_size <= before);
    }
}

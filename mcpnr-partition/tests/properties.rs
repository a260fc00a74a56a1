//! Property-based invariant checks over small randomly generated
//! hypergraphs, run through the full engine/pass machinery.

use proptest::prelude::*;

use mcpnr_partition::engine::FmEngine;
use mcpnr_partition::hypergraph::{Cell, Hypergraph, Net};
use mcpnr_partition::pass::{multiway_fm, two_way_init_fm};

/// A small random hypergraph: `num_cells` cells of size 1, `num_nets`
/// nets each drawing 2-3 distinct cells.
fn arb_hypergraph(max_cells: usize, max_nets: usize) -> impl Strategy<Value = (Vec<Cell>, Vec<Net>)> {
    (2..=max_cells).prop_flat_map(move |n| {
        let nets = proptest::collection::vec(
            proptest::collection::hash_set(0..n, 2..=3.min(n)).prop_map(|s| s.into_iter().collect::<Vec<_>>()),
            0..=max_nets,
        );
        nets.prop_map(move |nets: Vec<Vec<usize>>| {
            let mut cells: Vec<Cell> = (0..n)
                .map(|i| Cell { name: format!("C{}", i), size: 1, nets: Vec::new(), group: 0 })
                .collect();
            for (net_idx, members) in nets.iter().enumerate() {
                for &c in members {
                    cells[c].nets.push(net_idx);
                }
            }
            let nets = nets.into_iter().map(|cells| Net { cells }).collect();
            (cells, nets)
        })
    })
}

proptest! {
    #[test]
    fn total_size_is_conserved_through_rebuild_and_moves((cells, nets) in arb_hypergraph(12, 10), k in 2usize..4) {
        let total = cells.iter().map(|c| c.size as i64).sum::<i64>();
        let hg = Hypergraph::new(cells, nets, k);
        let mut engine = FmEngine::new(hg);
        engine.rebuild();

        let groups: Vec<usize> = (0..k).collect();
        two_way_init_fm(&mut engine, [0, 1.min(k - 1)], k as u32);
        engine.rebuild();
        multiway_fm(&mut engine, &groups, k as u32);

        prop_assert_eq!(engine.hypergraph.total_size(), total);
        prop_assert_eq!(engine.hypergraph.group_size.iter().sum::<i64>(), total);
    }

    #[test]
    fn net_occupancy_matches_explicit_recount((cells, nets) in arb_hypergraph(10, 8), k in 2usize..4) {
        let hg = Hypergraph::new(cells, nets, k);
        let mut engine = FmEngine::new(hg);
        engine.rebuild();
        let groups: Vec<usize> = (0..k).collect();
        multiway_fm(&mut engine, &groups, k as u32);

        for (net_idx, net) in engine.hypergraph.nets.iter().enumerate() {
            let mut recount = vec![0i64; k];
            for &cell in &net.cells {
                recount[engine.hypergraph.cells[cell].group] += 1;
            }
            prop_assert_eq!(&engine.hypergraph.net_group_count[net_idx], &recount);
        }
    }

    #[test]
    fn cut_size_tracks_ground_truth_after_a_pass((cells, nets) in arb_hypergraph(10, 8), k in 2usize..4) {
        let hg = Hypergraph::new(cells, nets, k);
        let mut engine = FmEngine::new(hg);
        engine.rebuild();
        let groups: Vec<usize> = (0..k).collect();
        multiway_fm(&mut engine, &groups, k as u32);

        prop_assert_eq!(engine.hypergraph.cut_size, engine.hypergraph.recompute_cut_size());
    }

    #[test]
    fn rebuilt_gain_matches_ground_truth_single_move_delta((cells, nets) in arb_hypergraph(8, 6), k in 2usize..3) {
        let hg = Hypergraph::new(cells, nets, k);
        let mut engine = FmEngine::new(hg);
        engine.rebuild();

        for cell in 0..engine.hypergraph.cells.len() {
            let from = engine.hypergraph.cells[cell].group;
            for to in 0..k {
                if to == from {
                    continue;
                }
                let gidx = engine.buckets.gidx(cell, to);
                if gidx < 0 {
                    continue;
                }
                let reported_gain = gidx - engine.hypergraph.max_pins as i64;

                let cut_before = engine.hypergraph.cut_size;
                engine.apply_move(cell, from, to);
                let observed_gain = cut_before - engine.hypergraph.cut_size;
                engine.hypergraph.rollback_move(cell, from, to);
                engine.hypergraph.cut_size = cut_before;
                // `apply_move` also touches *other* cells' bucket entries via
                // gain maintenance; `rollback_move` only restores hypergraph
                // counters, so buckets must be rebuilt before the next check
                // reads a bucket entry for a different cell.
                engine.rebuild();

                prop_assert_eq!(reported_gain, observed_gain);
            }
        }
    }

    #[test]
    fn multiway_pass_never_worsens_the_cut((cells, nets) in arb_hypergraph(10, 8), k in 2usize..4) {
        let hg = Hypergraph::new(cells, nets, k);
        let mut engine = FmEngine::new(hg);
        engine.rebuild();
        let groups: Vec<usize> = (0..k).collect();
        let before = engine.hypergraph.cut_size;
        multiway_fm(&mut engine, &groups, k as u32);
        prop_assert!(engine.hypergraph.cut_size <= before);
    }
}

//! Gain maintenance (spec §4.3): the canonical update rules triggered when
//! a single cell moves from group `F` to group `T`.
//!
//! The six rules below are evaluated against the *post-move* occupancy
//! counts for each net incident to the moved cell (i.e. after `N[n][F]` and
//! `N[n][T]` have already been adjusted by [`crate::engine::FmEngine::apply_move`]).
//! Each rule's guard condition algebraically forces the group membership it
//! relies on (e.g. "every other cell of this net is in F") from the net's
//! occupancy arithmetic alone, so no extra `cell.group` lookup is needed for
//! the two rules that don't do one explicitly — see the derivation notes
//! inline.

use crate::engine::FmEngine;

/// Apply the five/six-rule gain update for a single net incident to the
/// just-moved cell `mover`. `len` is the net's arity; `from`/`to` are the
/// move's source/destination groups; `ngc_from`/`ngc_to` are this net's
/// *post-move* occupancy counts in those two groups.
pub(crate) fn apply_net_update(
    engine: &mut FmEngine,
    net: usize,
    mover: usize,
    from: usize,
    to: usize,
    len: i64,
    ngc_from: i64,
    ngc_to: i64,
) {
    let k = engine.k;
    let cells_in_net = engine.hypergraph.nets[net].cells.clone();

    // Rule 1: T went from empty to holding exactly the mover, and every
    // other cell of the net is (by arithmetic) still in F: their gain
    // toward every group but F goes up by 1.
    if ngc_to == 1 && ngc_from + 1 == len {
        for &cel in &cells_in_net {
            if cel != mover && engine.buckets.gidx(cel, to) >= 0 {
                for g in 0..k {
                    if g != from {
                        engine.buckets.update(cel, from, g, 1);
                    }
                }
            }
        }
    }

    // Rule 2: T now holds exactly 2 cells and F holds all the rest minus
    // those 2: the other cell already in T loses its gain toward F.
    if ngc_to == 2 && ngc_from + 2 == len {
        for &cel in &cells_in_net {
            if engine.hypergraph.cells[cel].group == to
                && cel != mover
                && engine.buckets.gidx(cel, from) >= 0
            {
                engine.buckets.update(cel, to, from, -1);
            }
        }
    }

    // Rule 3: F emptied out entirely and T now holds the whole net: every
    // other cell (forced into T by arithmetic) loses gain toward every
    // group but T.
    if ngc_from == 0 && ngc_to == len {
        for &cel in &cells_in_net {
            if cel != mover && engine.buckets.gidx(cel, from) >= 0 {
                for g in 0..k {
                    if g != to {
                        engine.buckets.update(cel, to, g, -1);
                    }
                }
            }
        }
    }

    // Rule 4: F now holds exactly one cell and T holds the rest: that lone
    // cell in F gains toward T.
    if ngc_from == 1 && ngc_to + 1 == len {
        for &cel in &cells_in_net {
            if engine.hypergraph.cells[cel].group == from
                && cel != mover
                && engine.buckets.gidx(cel, to) >= 0
            {
                engine.buckets.update(cel, from, to, 1);
            }
        }
    }

    // Rule 5: F is now empty and T holds all but one: every cell not in F
    // gains toward T.
    if ngc_from == 0 && ngc_to + 1 == len {
        for &cel in &cells_in_net {
            let g = engine.hypergraph.cells[cel].group;
            if g != from && cel != mover && engine.buckets.gidx(cel, to) >= 0 {
                engine.buckets.update(cel, g, to, 1);
            }
        }
    }

    // Rule 6: T now holds exactly one cell and F holds all but two: every
    // cell not in T loses gain toward F.
    if ngc_to == 1 && ngc_from + 2 == len {
        for &cel in &cells_in_net {
            let g = engine.hypergraph.cells[cel].group;
            if g != to && cel != mover && engine.buckets.gidx(cel, from) >= 0 {
                engine.buckets.update(cel, g, from, -1);
            }
        }
    }
}

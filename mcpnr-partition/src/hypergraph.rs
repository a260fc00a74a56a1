//! The hypergraph model (spec §3, §4.1): cells, nets, group assignment and
//! the incremental net-in-group occupancy counters.

/// A single cell as read from the input file, indexed by its position in
/// the *original* file order. Shared (read-only) across all trials; each
/// trial builds its own [`Hypergraph`] from a possibly different cell
/// ordering over the same specs.
#[derive(Clone, Debug)]
pub struct CellSpec {
    pub name: String,
    pub size: u32,
    /// Net indices this cell touches, in file order.
    pub nets: Vec<usize>,
}

#[derive(Clone, Debug)]
pub struct Cell {
    pub name: String,
    pub size: u32,
    pub nets: Vec<usize>,
    pub group: usize,
}

#[derive(Clone, Debug)]
pub struct Net {
    pub cells: Vec<usize>,
}

/// Owns the cell/net/group state for a single trial. Position handles (the
/// bucket-store arena) are allocated separately in [`crate::buckets::BucketStore`]
/// but are sized from this struct's `cells.len()` and `k`.
pub struct Hypergraph {
    pub cells: Vec<Cell>,
    pub nets: Vec<Net>,
    pub k: usize,
    pub max_pins: usize,
    pub group_size: Vec<i64>,
    /// `net_group_count[net][group]` = number of cells of `net` currently in `group`.
    pub net_group_count: Vec<Vec<i64>>,
    pub cut_size: i64,
}

impl Hypergraph {
    /// Build a fresh hypergraph with every cell in group 0, from a cell
    /// ordering already resolved to final indices (`cells`/`nets` reference
    /// each other by those final indices).
    pub fn new(cells: Vec<Cell>, nets: Vec<Net>, k: usize) -> Self {
        let max_pins = cells.iter().map(|c| c.nets.len()).max().unwrap_or(0);
        let mut group_size = vec![0i64; k];
        let total: i64 = cells.iter().map(|c| c.size as i64).sum();
        group_size[0] = total;

        let mut net_group_count = vec![vec![0i64; k]; nets.len()];
        for (idx, net) in nets.iter().enumerate() {
            net_group_count[idx][0] = net.cells.len() as i64;
        }

        Hypergraph {
            cells,
            nets,
            k,
            max_pins,
            group_size,
            net_group_count,
            cut_size: 0,
        }
    }

    /// Build a [`Hypergraph`] from shared specs plus a permutation of the
    /// original cell indices (the trial-specific seed ordering, spec §4.7).
    pub fn from_specs(cell_specs: &[CellSpec], net_cell_lists: &[Vec<usize>], order: &[usize], k: usize) -> Self {
        let mut new_index_of = vec![0usize; cell_specs.len()];
        for (new_idx, &orig_idx) in order.iter().enumerate() {
            new_index_of[orig_idx] = new_idx;
        }

        let cells = order
            .iter()
            .map(|&orig| {
                let spec = &cell_specs[orig];
                Cell {
                    name: spec.name.clone(),
                    size: spec.size,
                    nets: spec.nets.clone(),
                    group: 0,
                }
            })
            .collect();

        let nets = net_cell_lists
            .iter()
            .map(|cl| Net {
                cells: cl.iter().map(|&orig| new_index_of[orig]).collect(),
            })
            .collect();

        Hypergraph::new(cells, nets, k)
    }

    pub fn total_size(&self) -> i64 {
        self.group_size.iter().sum()
    }

    /// Reverse a single previously-applied move (spec §4.5 rollback): restores
    /// group assignment, group sizes, and net occupancy counters, but does
    /// *not* touch the bucket store — buckets are always rebuilt before the
    /// next pass.
    pub fn rollback_move(&mut self, cell: usize, from: usize, to: usize) {
        let size = self.cells[cell].size as i64;
        self.cells[cell].group = from;
        self.group_size[from] += size;
        self.group_size[to] -= size;

        let nets = self.cells[cell].nets.clone();
        for net in nets {
            self.net_group_count[net][from] += 1;
            self.net_group_count[net][to] -= 1;
        }
    }

    /// Ground-truth cut size: the number of nets with cells spread across
    /// two or more groups. Used by property tests (§8 item 3), not on the
    /// hot path.
    pub fn recompute_cut_size(&self) -> i64 {
        self.nets
            .iter()
            .enumerate()
            .filter(|(idx, _)| {
                self.net_group_count[*idx].iter().filter(|&&c| c > 0).count() >= 2
            })
            .count() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny() -> Hypergraph {
        // E1: 2 cells, 1 net, K=2
        let cells = vec![
            Cell { name: "C1".into(), size: 1, nets: vec![0], group: 0 },
            Cell { name: "C2".into(), size: 1, nets: vec![0], group: 0 },
        ];
        let nets = vec![Net { cells: vec![0, 1] }];
        Hypergraph::new(cells, nets, 2)
    }

    #[test]
    fn initial_state_has_zero_cut() {
        let hg = tiny();
        assert_eq!(hg.cut_size, 0);
        assert_eq!(hg.group_size, vec![2, 0]);
        assert_eq!(hg.recompute_cut_size(), 0);
    }

    #[test]
    fn rollback_restores_occupancy() {
        let mut hg = tiny();
        hg.cells[0].group = 1;
        hg.group_size[0] -= 1;
        hg.group_size[1] += 1;
        hg.net_group_count[0][0] -= 1;
        hg.net_group_count[0][1] += 1;

        hg.rollback_move(0, 0, 1);
        assert_eq!(hg.group_size, vec![2, 0]);
        assert_eq!(hg.net_group_count[0], vec![2, 0]);
        assert_eq!(hg.cells[0].group, 0);
    }
}

//! The gain-bucket store (spec §4.2): per (from, to) group pair, a set of
//! doubly linked lists indexed by `gain_index = gain + max_pins`, plus a
//! cached `head[from][to]` giving the highest non-empty index.
//!
//! Position handles are index-based nodes in a flat arena (spec §9
//! "Intrusive doubly linked list in arrays") rather than raw pointers: each
//! cell owns `k` node slots (one per possible target group), allocated once
//! and permuted for the engine's lifetime.

#[derive(Clone, Copy, Debug)]
struct Node {
    prev: Option<usize>,
    next: Option<usize>,
}

pub struct BucketStore {
    k: usize,
    max_pins: usize,
    /// `buckets[from][to][gain_index]` = head node id of that bucket's list.
    buckets: Vec<Vec<Vec<Option<usize>>>>,
    /// `head[from][to]` = highest non-empty gain_index, or -1.
    head: Vec<Vec<i64>>,
    /// Flat arena, one node per (cell, target group): `nodes[cell * k + to]`.
    nodes: Vec<Node>,
    /// `gidx[cell][to]` = current gain_index the cell sits at in
    /// `buckets[cell.group][to][..]`, or -1 if delisted / self group.
    gidx: Vec<Vec<i64>>,
}

impl BucketStore {
    pub fn new(num_cells: usize, k: usize, max_pins: usize) -> Self {
        let slots = 2 * max_pins + 1;
        BucketStore {
            k,
            max_pins,
            buckets: vec![vec![vec![None; slots]; k]; k],
            head: vec![vec![-1; k]; k],
            nodes: vec![Node { prev: None, next: None }; num_cells * k],
            gidx: vec![vec![-1; k]; num_cells],
        }
    }

    pub fn gidx(&self, cell: usize, to: usize) -> i64 {
        self.gidx[cell][to]
    }

    pub fn head(&self, from: usize, to: usize) -> i64 {
        self.head[from][to]
    }

    fn node_id(&self, cell: usize, to: usize) -> usize {
        cell * self.k + to
    }

    /// Clear every bucket and head cache. Does not touch `gidx`; callers
    /// (see [`crate::engine::FmEngine::rebuild`]) always overwrite `gidx`
    /// for every (cell, group) pair right after calling this.
    pub fn clear(&mut self) {
        for row in self.buckets.iter_mut() {
            for col in row.iter_mut() {
                col.iter_mut().for_each(|slot| *slot = None);
            }
        }
        for row in self.head.iter_mut() {
            row.iter_mut().for_each(|h| *h = -1);
        }
    }

    /// Mark a cell as having no entry toward `to` (its own current group).
    pub fn mark_absent(&mut self, cell: usize, to: usize) {
        self.gidx[cell][to] = -1;
    }

    /// Insert a cell into `buckets[from][to][gain + max_pins]`, prepending
    /// to the list (spec §4.2 insert).
    pub fn insert(&mut self, cell: usize, from: usize, to: usize, gain: i64) {
        let gidx = gain + self.max_pins as i64;
        self.insert_at_index(cell, from, to, gidx);
    }

    fn insert_at_index(&mut self, cell: usize, from: usize, to: usize, gidx: i64) {
        debug_assert!(gidx >= 0 && (gidx as usize) < 2 * self.max_pins + 1);
        let node_id = self.node_id(cell, to);
        let gidx_u = gidx as usize;

        let old_head = self.buckets[from][to][gidx_u];
        self.nodes[node_id].prev = None;
        self.nodes[node_id].next = old_head;
        if let Some(h) = old_head {
            self.nodes[h].prev = Some(node_id);
        }
        self.buckets[from][to][gidx_u] = Some(node_id);
        self.gidx[cell][to] = gidx;

        if self.head[from][to] < gidx {
            self.head[from][to] = gidx;
        }
    }

    /// Unlink a cell from `buckets[from][to][..]`, lowering `head[from][to]`
    /// if its bucket was the current head and became empty (spec §4.2 remove).
    pub fn remove(&mut self, cell: usize, from: usize, to: usize) {
        let gidx = self.gidx[cell][to];
        if gidx < 0 {
            return;
        }
        let gidx_u = gidx as usize;
        let node_id = self.node_id(cell, to);
        let (prev, next) = (self.nodes[node_id].prev, self.nodes[node_id].next);

        match prev {
            Some(p) => self.nodes[p].next = next,
            None => self.buckets[from][to][gidx_u] = next,
        }
        if let Some(n) = next {
            self.nodes[n].prev = prev;
        }
        self.nodes[node_id].prev = None;
        self.nodes[node_id].next = None;
        self.gidx[cell][to] = -1;

        if self.head[from][to] == gidx && self.buckets[from][to][gidx_u].is_none() {
            let mut p = gidx_u;
            loop {
                if p == 0 {
                    self.head[from][to] = -1;
                    break;
                }
                p -= 1;
                if self.buckets[from][to][p].is_some() {
                    self.head[from][to] = p as i64;
                    break;
                }
            }
        }
    }

    /// Remove then reinsert at `gain_index + delta` (spec §4.2 update).
    pub fn update(&mut self, cell: usize, from: usize, to: usize, delta: i64) {
        let gidx = self.gidx[cell][to];
        if gidx < 0 {
            return;
        }
        self.remove(cell, from, to);
        self.insert_at_index(cell, from, to, gidx + delta);
    }

    /// The cell sitting at the head of `buckets[from][to][..]`, if any.
    pub fn head_cell(&self, from: usize, to: usize) -> Option<usize> {
        let h = self.head[from][to];
        if h < 0 {
            return None;
        }
        self.buckets[from][to][h as usize].map(|node_id| node_id / self.k)
    }

    /// Up to `limit` cells starting from the head of `buckets[from][to][head]`,
    /// used by the move selector to try a couple of candidates before giving
    /// up on a (from, to) pair (spec §4.4).
    pub fn head_candidates(&self, from: usize, to: usize, limit: usize) -> Vec<usize> {
        let h = self.head[from][to];
        if h < 0 {
            return Vec::new();
        }
        let mut out = Vec::with_capacity(limit);
        let mut node = self.buckets[from][to][h as usize];
        while let Some(n) = node {
            if out.len() >= limit {
                break;
            }
            out.push(n / self.k);
            node = self.nodes[n].next;
        }
        out
    }
}

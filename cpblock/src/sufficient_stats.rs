//! Sufficient statistics for the core-periphery label switching.
//!
//! Tracks, for every `(block, role)` slot, the aggregated node mass `D`
//! (node count for the density objective, node strength for the
//! degree-corrected one), and for the node under evaluation the edge
//! weight `d̃` it sends into each slot.
//!
//! Both are maintained so that a candidate move can be scored in O(1) once
//! `d̃` has been gathered in O(degree).

use crate::graph::Graph;
use crate::partition::{Partition, Role};

/// Global per-`(block, role)` mass, always consistent with the partition.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockStats {
    /// `mass[b] = [periphery mass, core mass]`
    mass: Vec<[f64; 2]>,
    /// Number of nodes in each block
    size: Vec<usize>,
    /// Mass contributed by each node
    node_mass: Vec<f64>,
}

impl BlockStats {
    /// Build from scratch.
    ///
    /// * `node_mass` - per-node mass (length n)
    /// * `partition` - current assignment
    pub fn from_partition(node_mass: Vec<f64>, partition: &Partition) -> Self {
        debug_assert_eq!(node_mass.len(), partition.len());
        let k = partition.block_bound();
        let mut ret = BlockStats {
            mass: vec![[0.0; 2]; k],
            size: vec![0; k],
            node_mass,
        };
        ret.recompute(partition);
        ret
    }

    /// Full recomputation from the partition.
    ///
    /// Useful to clear floating-point drift after many `delta_move` calls.
    pub fn recompute(&mut self, partition: &Partition) {
        let k = partition.block_bound().max(self.mass.len());
        self.mass = vec![[0.0; 2]; k];
        self.size = vec![0; k];
        for v in 0..partition.len() {
            let (b, r) = partition.get(v);
            self.mass[b][r.index()] += self.node_mass[v];
            self.size[b] += 1;
        }
    }

    /// Aggregated mass in slot `(block, role)`
    #[inline]
    pub fn mass(&self, block: usize, role: Role) -> f64 {
        self.mass[block][role.index()]
    }

    /// `D(c, 1) + x · D(c, 0)`: mass a node with role `x` pairs up with in block `c`
    #[inline]
    pub fn paired_mass(&self, block: usize, role: Role) -> f64 {
        let m = &self.mass[block];
        m[1] + role.x() * m[0]
    }

    /// Number of nodes in `block`
    #[inline]
    pub fn size(&self, block: usize) -> usize {
        self.size[block]
    }

    /// Mass carried by node `v`
    #[inline]
    pub fn node_mass(&self, v: usize) -> f64 {
        self.node_mass[v]
    }

    /// Number of block slots
    pub fn num_slots(&self) -> usize {
        self.size.len()
    }

    /// Block ids currently holding at least one node, ascending
    pub fn nonempty_blocks(&self) -> impl Iterator<Item = usize> + '_ {
        self.size
            .iter()
            .enumerate()
            .filter(|(_, s)| **s > 0)
            .map(|(b, _)| b)
    }

    /// Move `vertex` from `old` to `new` slot in O(1).
    pub fn delta_move(&mut self, vertex: usize, old: (usize, Role), new: (usize, Role)) {
        if old == new {
            return;
        }
        let w = self.node_mass[vertex];
        self.mass[old.0][old.1.index()] -= w;
        self.mass[new.0][new.1.index()] += w;
        self.size[old.0] -= 1;
        self.size[new.0] += 1;
    }
}

/// Edge weight `d̃[block, role]` from one node to every slot.
///
/// The node itself never contributes since the graph has no self loops.
/// Only slots touched by the node's neighbors are non-zero; they are reset
/// sparsely between visits.
#[derive(Debug, Clone)]
pub struct NeighborStats {
    edge_to: Vec<[f64; 2]>,
    touched: Vec<usize>,
}

impl NeighborStats {
    /// Scratch space for `num_slots` blocks
    pub fn new(num_slots: usize) -> Self {
        NeighborStats {
            edge_to: vec![[0.0; 2]; num_slots],
            touched: Vec::new(),
        }
    }

    /// Rebuild `d̃` for `vertex` against the current partition.
    pub fn collect(&mut self, graph: &Graph, partition: &Partition, vertex: usize) {
        for &b in &self.touched {
            self.edge_to[b] = [0.0; 2];
        }
        self.touched.clear();

        for &(nbr, w) in graph.neighbors(vertex) {
            let (b, r) = partition.get(nbr);
            let slot = &mut self.edge_to[b];
            if slot[0] == 0.0 && slot[1] == 0.0 {
                self.touched.push(b);
            }
            slot[r.index()] += w;
        }
    }

    /// Edge weight into slot `(block, role)`
    #[inline]
    pub fn edge(&self, block: usize, role: Role) -> f64 {
        self.edge_to[block][role.index()]
    }

    /// `d̃(c, 1) + x · d̃(c, 0)`
    #[inline]
    pub fn paired_edge(&self, block: usize, role: Role) -> f64 {
        let e = &self.edge_to[block];
        e[1] + role.x() * e[0]
    }
}

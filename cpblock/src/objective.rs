//! Core-periphery block model objectives.
//!
//! # Quality
//!
//! ```text
//! ER:     Q = Σ_{i<j} (A_ij - p) B_ij(c, x)
//! Config: Q = (1/W) Σ_{i,j} (A_ij - s_i s_j / W) B_ij(c, x)
//! B_ij  = 1 iff c_i = c_j and (x_i = 1 or x_j = 1)
//! ```
//!
//! `p` is the mean edge weight per pair (the edge density on unweighted
//! graphs), `s_i` the node strength and `W = Σ_i s_i`. Rescaling every
//! edge weight by `a` rescales the ER quality by `a` and leaves the
//! config quality unchanged.
//! The degree-corrected sum runs over ordered pairs including `i = j`.
//!
//! # Incremental delta
//!
//! Moving node `i` only changes pairs that touch `i`. For a target slot
//! `(c, x)` their total is
//!
//! ```text
//! ER:     d̃(c,1) + x d̃(c,0) - p (N(c,1) + x N(c,0) - self)
//! Config: 2/W [d̃(c,1) + x d̃(c,0) - s_i (D(c,1) + x D(c,0) - self) / W] - x s_i² / W²
//! self  = δ(c_i, c) (x_i ∨ x) · mass_i
//! ```
//!
//! and `ΔQ` is the target total minus the total at `(c_i, x_i)`. The `self`
//! correction removes node `i` from the global aggregates. Without it a
//! "move" into the node's own block would be scored against itself.

use crate::error::CorePeripheryError;
use crate::graph::Graph;
use crate::partition::{Partition, Role};
use crate::sufficient_stats::{BlockStats, NeighborStats};
use serde::Serialize;

/// Which null expectation the objective is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectiveKind {
    /// Erdős-Rényi: constant edge probability (KM_ER)
    Er,
    /// Configuration model: degree-corrected expectation (KM_Config)
    Config,
}

impl std::fmt::Display for ObjectiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectiveKind::Er => write!(f, "er"),
            ObjectiveKind::Config => write!(f, "config"),
        }
    }
}

/// Scalar quality and its split across blocks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockQuality {
    /// Q
    pub total: f64,
    /// Contribution of each block id
    pub per_block: Vec<f64>,
}

/// Objective bound to one graph's normalization constants.
#[derive(Debug, Clone)]
pub struct Objective {
    kind: ObjectiveKind,
    density: f64,
    total_strength: f64,
    inv_total: f64,
}

impl Objective {
    /// Precompute `p` (ER) or `W` (config) for `graph`.
    ///
    /// Never fails: on degenerate graphs the normalization terms are zero,
    /// so every move scores zero.
    pub fn new(kind: ObjectiveKind, graph: &Graph) -> Self {
        let total_strength = graph.total_strength();
        let inv_total = if total_strength > 0.0 {
            1.0 / total_strength
        } else {
            0.0
        };
        Objective {
            kind,
            density: graph.weighted_density(),
            total_strength,
            inv_total,
        }
    }

    /// Objective variant
    pub fn kind(&self) -> ObjectiveKind {
        self.kind
    }

    /// Mass each node brings into the block aggregates: 1 for ER, strength
    /// for config.
    pub fn node_mass(&self, graph: &Graph) -> Vec<f64> {
        match self.kind {
            ObjectiveKind::Er => vec![1.0; graph.num_nodes()],
            ObjectiveKind::Config => (0..graph.num_nodes()).map(|v| graph.strength(v)).collect(),
        }
    }

    /// Full, non-incremental quality in O(N + M).
    ///
    /// The config variant fails with `DegenerateGraph` when the graph has no
    /// edge weight to normalize by.
    pub fn quality(&self, graph: &Graph, partition: &Partition) -> anyhow::Result<BlockQuality> {
        if partition.len() != graph.num_nodes() {
            return Err(CorePeripheryError::InvalidInput(format!(
                "partition has {} nodes, graph has {}",
                partition.len(),
                graph.num_nodes()
            ))
            .into());
        }

        let k = partition.block_bound();

        // scored edge weight within each block
        let mut within = vec![0.0; k];
        for &(i, j, w) in graph.edges() {
            let (ci, xi) = partition.get(i);
            let (cj, xj) = partition.get(j);
            if ci == cj && xi.either_core(xj) {
                within[ci] += w;
            }
        }

        let per_block: Vec<f64> = match self.kind {
            ObjectiveKind::Er => {
                let p = self.density;
                let mut size = vec![[0usize; 2]; k];
                for v in 0..partition.len() {
                    let (b, r) = partition.get(v);
                    size[b][r.index()] += 1;
                }
                let choose2 = |x: usize| -> f64 { (x * x.saturating_sub(1)) as f64 / 2.0 };
                (0..k)
                    .map(|b| {
                        let n = size[b][0] + size[b][1];
                        let pairs = choose2(n) - choose2(size[b][0]);
                        within[b] - p * pairs
                    })
                    .collect()
            }
            ObjectiveKind::Config => {
                if self.total_strength <= 0.0 {
                    return Err(CorePeripheryError::DegenerateGraph(
                        "total strength is zero; degree-corrected quality is undefined".into(),
                    )
                    .into());
                }
                let inv_w = self.inv_total;
                let mut mass = vec![[0.0f64; 2]; k];
                for v in 0..partition.len() {
                    let (b, r) = partition.get(v);
                    mass[b][r.index()] += graph.strength(v);
                }
                (0..k)
                    .map(|b| {
                        let all = mass[b][0] + mass[b][1];
                        let periphery = mass[b][0];
                        2.0 * within[b] * inv_w - (all * all - periphery * periphery) * inv_w * inv_w
                    })
                    .collect()
            }
        };

        Ok(BlockQuality {
            total: per_block.iter().sum(),
            per_block,
        })
    }

    /// Score of all pairs between `vertex` and block `block` if the vertex
    /// held `role` there.
    #[inline]
    fn pair_score(
        &self,
        vertex: usize,
        current: (usize, Role),
        block: usize,
        role: Role,
        d_tilde: &NeighborStats,
        stats: &BlockStats,
    ) -> f64 {
        let own_mass = stats.node_mass(vertex);
        let self_mass = if current.0 == block && current.1.either_core(role) {
            own_mass
        } else {
            0.0
        };
        let edge = d_tilde.paired_edge(block, role);
        let mass = stats.paired_mass(block, role) - self_mass;

        match self.kind {
            ObjectiveKind::Er => edge - self.density * mass,
            ObjectiveKind::Config => {
                let inv_w = self.inv_total;
                2.0 * inv_w * (edge - own_mass * mass * inv_w)
                    - role.x() * own_mass * own_mass * inv_w * inv_w
            }
        }
    }

    /// `ΔQ` for moving `vertex` from `current` to `candidate`.
    ///
    /// * `d_tilde` - edge weight from `vertex` to each slot
    /// * `stats` - global block aggregates, including `vertex` at `current`
    pub fn delta(
        &self,
        vertex: usize,
        current: (usize, Role),
        candidate: (usize, Role),
        d_tilde: &NeighborStats,
        stats: &BlockStats,
    ) -> f64 {
        self.pair_score(vertex, current, candidate.0, candidate.1, d_tilde, stats)
            - self.pair_score(vertex, current, current.0, current.1, d_tilde, stats)
    }
}

/// O(N²) evaluation straight from the pairwise definition.
#[cfg(test)]
pub(crate) fn brute_force_quality(kind: ObjectiveKind, graph: &Graph, partition: &Partition) -> f64 {
    let n = graph.num_nodes();
    let a = graph.to_dense();
    let b = |i: usize, j: usize| -> f64 {
        let (ci, xi) = partition.get(i);
        let (cj, xj) = partition.get(j);
        if ci == cj && xi.either_core(xj) {
            1.0
        } else {
            0.0
        }
    };
    let mut q = 0.0;
    match kind {
        ObjectiveKind::Er => {
            let p = graph.weighted_density();
            for i in 0..n {
                for j in 0..i {
                    q += (a[i * n + j] - p) * b(i, j);
                }
            }
        }
        ObjectiveKind::Config => {
            let w = graph.total_strength();
            for i in 0..n {
                for j in 0..n {
                    let expected = graph.strength(i) * graph.strength(j) / w;
                    q += (a[i * n + j] - expected) * b(i, j);
                }
            }
            q /= w;
        }
    }
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::error_kind;
    use crate::test_util::random_graph;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_partition(n: usize, k: usize, seed: u64) -> Partition {
        let mut rng = StdRng::seed_from_u64(seed);
        let block = (0..n).map(|_| rng.random_range(0..k)).collect();
        let is_core: Vec<bool> = (0..n).map(|_| rng.random::<f64>() < 0.5).collect();
        Partition::from_parts(block, &is_core)
    }

    #[test]
    fn test_quality_matches_brute_force() -> anyhow::Result<()> {
        let g = random_graph(15, 0.3, 11)?;
        for kind in [ObjectiveKind::Er, ObjectiveKind::Config] {
            let obj = Objective::new(kind, &g);
            for seed in 0..5 {
                let p = random_partition(15, 4, seed);
                let q = obj.quality(&g, &p)?;
                let expected = brute_force_quality(kind, &g, &p);
                assert!(
                    (q.total - expected).abs() < 1e-9,
                    "{}: fast={}, brute={}",
                    kind,
                    q.total,
                    expected
                );
                let sum: f64 = q.per_block.iter().sum();
                assert!((sum - q.total).abs() < 1e-12);
            }
        }
        Ok(())
    }

    /// For each vertex and each slot `(c', x')`:
    ///   delta(v, c', x') == Q(after moving v) - Q(before)
    fn check_delta_matches_brute_force(kind: ObjectiveKind, seed: u64) -> anyhow::Result<()> {
        let n = 12;
        let k = 4;
        let g = random_graph(n, 0.35, seed)?;
        let p = random_partition(n, k, seed + 100);
        let obj = Objective::new(kind, &g);
        let stats = BlockStats::from_partition(obj.node_mass(&g), &p);
        let mut d_tilde = NeighborStats::new(k);

        let q_before = brute_force_quality(kind, &g, &p);
        let mut max_err = 0.0f64;

        for v in 0..n {
            d_tilde.collect(&g, &p, v);
            let current = p.get(v);
            for c in 0..stats.num_slots() {
                for x in Role::ALL {
                    let computed = obj.delta(v, current, (c, x), &d_tilde, &stats);

                    let mut moved = p.clone();
                    moved.set(v, c, x);
                    let expected = brute_force_quality(kind, &g, &moved) - q_before;

                    let err = (computed - expected).abs();
                    max_err = max_err.max(err);
                    assert!(
                        err < 1e-9,
                        "{} v={}, from={:?}, to=({}, {:?}): computed={:.10}, expected={:.10}",
                        kind,
                        v,
                        current,
                        c,
                        x,
                        computed,
                        expected
                    );
                }
            }
        }
        log::debug!("{} delta max error: {:.2e}", kind, max_err);
        Ok(())
    }

    #[test]
    fn test_er_delta_matches_brute_force() -> anyhow::Result<()> {
        for seed in [1, 2, 3] {
            check_delta_matches_brute_force(ObjectiveKind::Er, seed)?;
        }
        Ok(())
    }

    #[test]
    fn test_config_delta_matches_brute_force() -> anyhow::Result<()> {
        for seed in [4, 5, 6] {
            check_delta_matches_brute_force(ObjectiveKind::Config, seed)?;
        }
        Ok(())
    }

    #[test]
    fn test_staying_put_scores_zero() -> anyhow::Result<()> {
        let g = random_graph(10, 0.4, 9)?;
        let p = random_partition(10, 3, 9);
        for kind in [ObjectiveKind::Er, ObjectiveKind::Config] {
            let obj = Objective::new(kind, &g);
            let stats = BlockStats::from_partition(obj.node_mass(&g), &p);
            let mut d_tilde = NeighborStats::new(3);
            for v in 0..10 {
                d_tilde.collect(&g, &p, v);
                assert_eq!(obj.delta(v, p.get(v), p.get(v), &d_tilde, &stats), 0.0);
            }
        }
        Ok(())
    }

    #[test]
    fn test_degenerate_graphs() -> anyhow::Result<()> {
        let empty = Graph::from_edges(4, &[])?;
        let p = Partition::singletons(4);

        let er = Objective::new(ObjectiveKind::Er, &empty).quality(&empty, &p)?;
        assert_eq!(er.total, 0.0);

        let single = Graph::from_edges(1, &[])?;
        let q = Objective::new(ObjectiveKind::Er, &single).quality(&single, &Partition::singletons(1))?;
        assert_eq!(q.total, 0.0);

        let err = Objective::new(ObjectiveKind::Config, &empty)
            .quality(&empty, &p)
            .unwrap_err();
        assert!(matches!(
            error_kind(&err),
            Some(CorePeripheryError::DegenerateGraph(_))
        ));
        Ok(())
    }

    #[test]
    fn test_complete_graph_single_block() -> anyhow::Result<()> {
        let n = 6;
        let mut edges = vec![];
        for i in 0..n {
            for j in (i + 1)..n {
                edges.push((i, j, 1.0));
            }
        }
        let g = Graph::from_edges(n, &edges)?;
        let p = Partition::from_parts(vec![0; n], &vec![true; n]);
        let q = Objective::new(ObjectiveKind::Er, &g).quality(&g, &p)?;
        // p = 1, every scored pair is an edge
        assert!(q.total.abs() < 1e-12);
        Ok(())
    }
}

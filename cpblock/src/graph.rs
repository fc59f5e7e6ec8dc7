//! Read-only simple undirected weighted graph.
//!
//! Nodes are dense indices `0..n`. External identifiers are mapped to
//! these indices once, by whoever builds the graph, so that every routine
//! in this crate works on plain `usize` offsets.

use crate::error::CorePeripheryError;
use std::collections::HashSet;

/// A weighted edge (i, j, weight)
pub type WeightedEdge = (usize, usize, f64);

/// Simple undirected weighted graph with adjacency and strength lookup.
#[derive(Debug, Clone)]
pub struct Graph {
    n: usize,
    /// `adj_list[v]` = vec of (neighbor, weight), in edge insertion order
    adj_list: Vec<Vec<(usize, f64)>>,
    /// Each undirected edge stored once
    edges: Vec<WeightedEdge>,
    /// Sum of incident edge weights per node
    strength: Vec<f64>,
    total_strength: f64,
}

impl Graph {
    /// Build a graph from a simple undirected edge list.
    ///
    /// * `n` - Number of nodes
    /// * `edges` - Weighted edge list `(i, j, w)`, each undirected pair once
    ///
    /// Rejects out-of-range indices, self loops, non-positive weights and
    /// repeated pairs. Normalizing a multigraph is the caller's job (see
    /// [`Graph::from_multi_edges`]).
    pub fn from_edges(n: usize, edges: &[WeightedEdge]) -> anyhow::Result<Self> {
        let mut seen = HashSet::with_capacity(edges.len());

        for &(i, j, w) in edges {
            if i >= n || j >= n {
                return Err(CorePeripheryError::InvalidInput(format!(
                    "edge ({}, {}) out of range for {} nodes",
                    i, j, n
                ))
                .into());
            }
            if i == j {
                return Err(
                    CorePeripheryError::InvalidInput(format!("self loop at node {}", i)).into(),
                );
            }
            if !(w.is_finite() && w > 0.0) {
                return Err(CorePeripheryError::InvalidInput(format!(
                    "edge ({}, {}) has weight {}",
                    i, j, w
                ))
                .into());
            }
            if !seen.insert((i.min(j), i.max(j))) {
                return Err(CorePeripheryError::InvalidInput(format!(
                    "duplicate edge ({}, {})",
                    i, j
                ))
                .into());
            }
        }

        Ok(Self::build(n, edges.to_vec()))
    }

    /// Collapse a multigraph into a simple unweighted graph.
    ///
    /// Self loops are dropped and parallel edges merged into a single edge
    /// of weight 1. The first occurrence of each pair fixes its position in
    /// the adjacency lists.
    pub fn from_multi_edges(n: usize, pairs: &[(usize, usize)]) -> anyhow::Result<Self> {
        let mut seen = HashSet::with_capacity(pairs.len());
        let mut edges = Vec::with_capacity(pairs.len());
        let mut n_loops = 0;
        let mut n_multi = 0;

        for &(i, j) in pairs {
            if i >= n || j >= n {
                return Err(CorePeripheryError::InvalidInput(format!(
                    "edge ({}, {}) out of range for {} nodes",
                    i, j, n
                ))
                .into());
            }
            if i == j {
                n_loops += 1;
                continue;
            }
            if seen.insert((i.min(j), i.max(j))) {
                edges.push((i, j, 1.0));
            } else {
                n_multi += 1;
            }
        }

        log::trace!(
            "collapsed multigraph: dropped {} self loops, merged {} parallel edges",
            n_loops,
            n_multi
        );

        Ok(Self::build(n, edges))
    }

    fn build(n: usize, edges: Vec<WeightedEdge>) -> Self {
        let mut adj_list = vec![Vec::new(); n];
        let mut strength = vec![0.0; n];
        for &(i, j, w) in &edges {
            adj_list[i].push((j, w));
            adj_list[j].push((i, w));
            strength[i] += w;
            strength[j] += w;
        }
        let total_strength = strength.iter().sum();

        Graph {
            n,
            adj_list,
            edges,
            strength,
            total_strength,
        }
    }

    /// Number of nodes N
    pub fn num_nodes(&self) -> usize {
        self.n
    }

    /// Number of undirected edges M (unweighted count)
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Edge list, each undirected edge once
    pub fn edges(&self) -> &[WeightedEdge] {
        &self.edges
    }

    /// Neighbors of `v` with edge weights
    #[inline]
    pub fn neighbors(&self, v: usize) -> &[(usize, f64)] {
        &self.adj_list[v]
    }

    /// Number of neighbors of `v`
    #[inline]
    pub fn degree(&self, v: usize) -> usize {
        self.adj_list[v].len()
    }

    /// Sum of incident edge weights of `v`
    #[inline]
    pub fn strength(&self, v: usize) -> f64 {
        self.strength[v]
    }

    /// Sum of all node strengths (`2M` for unweighted graphs)
    pub fn total_strength(&self) -> f64 {
        self.total_strength
    }

    /// Degree sequence (neighbor counts)
    pub fn degree_sequence(&self) -> Vec<usize> {
        self.adj_list.iter().map(|x| x.len()).collect()
    }

    /// Edge density `M / (N(N-1)/2)`, zero for graphs with at most one node
    pub fn density(&self) -> f64 {
        if self.n <= 1 {
            return 0.0;
        }
        let max_edges = (self.n * (self.n - 1)) as f64 / 2.0;
        self.edges.len() as f64 / max_edges
    }

    /// Mean edge weight per node pair `Σw / (N(N-1)/2)`; equals
    /// [`Graph::density`] on unweighted graphs
    pub fn weighted_density(&self) -> f64 {
        if self.n <= 1 {
            return 0.0;
        }
        self.total_strength / (self.n * (self.n - 1)) as f64
    }

    /// Weight of edge (i, j), zero if absent
    pub fn weight(&self, i: usize, j: usize) -> f64 {
        self.adj_list[i]
            .iter()
            .find(|&&(nbr, _)| nbr == j)
            .map(|&(_, w)| w)
            .unwrap_or(0.0)
    }

    /// Dense row-major adjacency matrix, `N x N`
    pub fn to_dense(&self) -> Vec<f64> {
        let n = self.n;
        let mut dense = vec![0.0; n * n];
        for &(i, j, w) in &self.edges {
            dense[i * n + j] = w;
            dense[j * n + i] = w;
        }
        dense
    }
}

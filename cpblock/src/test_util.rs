//! Graph fixtures shared by the unit tests.

use crate::graph::{Graph, WeightedEdge};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// G(n, p) random graph
pub fn random_graph(n: usize, p: f64, seed: u64) -> anyhow::Result<Graph> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut edges = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            if rng.random::<f64>() < p {
                edges.push((i, j, 1.0));
            }
        }
    }
    Graph::from_edges(n, &edges)
}

/// Planted core-periphery graph: `n_core` densely linked core nodes, each
/// periphery node attached mostly to the core.
pub fn planted_core_periphery(
    n_core: usize,
    n_periphery: usize,
    p_cc: f64,
    p_cp: f64,
    p_pp: f64,
    seed: u64,
) -> anyhow::Result<Graph> {
    let n = n_core + n_periphery;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut edges = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            let p = match (i < n_core, j < n_core) {
                (true, true) => p_cc,
                (false, false) => p_pp,
                _ => p_cp,
            };
            if rng.random::<f64>() < p {
                edges.push((i, j, 1.0));
            }
        }
    }
    Graph::from_edges(n, &edges)
}

/// Complete graph K_n
pub fn complete_graph(n: usize) -> anyhow::Result<Graph> {
    let mut edges = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            edges.push((i, j, 1.0));
        }
    }
    Graph::from_edges(n, &edges)
}

/// Zachary's karate club: 34 members, 78 ties (0-indexed)
pub fn karate_club() -> anyhow::Result<Graph> {
    let adj: [(usize, &[usize]); 26] = [
        (0, &[1, 2, 3, 4, 5, 6, 7, 8, 10, 11, 12, 13, 17, 19, 21, 31]),
        (1, &[2, 3, 7, 13, 17, 19, 21, 30]),
        (2, &[3, 7, 8, 9, 13, 27, 28, 32]),
        (3, &[7, 12, 13]),
        (4, &[6, 10]),
        (5, &[6, 10, 16]),
        (6, &[16]),
        (8, &[30, 32, 33]),
        (9, &[33]),
        (13, &[33]),
        (14, &[32, 33]),
        (15, &[32, 33]),
        (18, &[32, 33]),
        (19, &[33]),
        (20, &[32, 33]),
        (22, &[32, 33]),
        (23, &[25, 27, 29, 32, 33]),
        (24, &[25, 27, 31]),
        (25, &[31]),
        (26, &[29, 33]),
        (27, &[33]),
        (28, &[31, 33]),
        (29, &[32, 33]),
        (30, &[32, 33]),
        (31, &[32, 33]),
        (32, &[33]),
    ];
    let edges: Vec<WeightedEdge> = adj
        .iter()
        .flat_map(|&(i, nbrs)| nbrs.iter().map(move |&j| (i, j, 1.0)))
        .collect();
    Graph::from_edges(34, &edges)
}

#[test]
fn test_karate_club_shape() -> anyhow::Result<()> {
    let g = karate_club()?;
    assert_eq!(g.num_nodes(), 34);
    assert_eq!(g.num_edges(), 78);
    assert_eq!(g.degree(33), 17);
    assert_eq!(g.degree(0), 16);
    Ok(())
}

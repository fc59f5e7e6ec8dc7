//! Degree-preserving randomization by configuration-model stub matching.

use crate::error::CorePeripheryError;
use crate::graph::{Graph, WeightedEdge};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Pair up node stubs uniformly at random.
///
/// Node `v` contributes `degrees[v]` stubs. The shuffled stub list is read
/// off two at a time, so the result may contain self loops and parallel
/// edges; every node keeps exactly its requested degree.
///
/// * `degrees` - target degree of each node
/// * `rng` - random number generator
pub fn configuration_model<R: Rng + ?Sized>(
    degrees: &[usize],
    rng: &mut R,
) -> anyhow::Result<Vec<(usize, usize)>> {
    let total: usize = degrees.iter().sum();
    if total % 2 != 0 {
        return Err(CorePeripheryError::Randomization(format!(
            "degree sequence sums to {}, which is odd",
            total
        ))
        .into());
    }

    let mut stubs: Vec<usize> = Vec::with_capacity(total);
    for (v, &d) in degrees.iter().enumerate() {
        stubs.extend(std::iter::repeat_n(v, d));
    }
    stubs.shuffle(rng);

    Ok(stubs.chunks_exact(2).map(|s| (s[0], s[1])).collect())
}

/// Draw a simple graph with (nearly) the degree sequence of `graph`.
///
/// Self loops and parallel edges from the stub matching are collapsed, so
/// high-degree nodes may lose a few edges. The observed edge weights are
/// shuffled onto the surviving edges, so rescaling the weights of `graph`
/// rescales the randomized graph the same way.
pub fn randomize_graph(graph: &Graph, seed: u64) -> anyhow::Result<Graph> {
    let mut rng = StdRng::seed_from_u64(seed);
    let pairs = configuration_model(&graph.degree_sequence(), &mut rng)?;
    let skeleton = Graph::from_multi_edges(graph.num_nodes(), &pairs)?;

    let mut weights: Vec<f64> = graph.edges().iter().map(|&(_, _, w)| w).collect();
    weights.shuffle(&mut rng);

    let edges: Vec<WeightedEdge> = skeleton
        .edges()
        .iter()
        .zip(weights)
        .map(|(&(i, j, _), w)| (i, j, w))
        .collect();
    Graph::from_edges(graph.num_nodes(), &edges)
}

/// Seed of the `trial`-th randomization under `base_seed`
pub fn trial_seed(base_seed: u64, trial: usize) -> u64 {
    base_seed ^ (trial as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

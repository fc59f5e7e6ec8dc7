use crate::common::*;
use crate::common_io::open_buf_reader;

use cpblock::{Graph, WeightedEdge};
use std::collections::{HashMap, HashSet};
use std::io::BufRead;

/// Edge list read from a file, with node names in first-appearance order.
pub struct EdgeListInput {
    /// Simple undirected graph over `0..node_names.len()`
    pub graph: Graph,
    /// Name of each node index
    pub node_names: Vec<Box<str>>,
}

///
/// Read an undirected edge list.
///
/// * `input_file` - `source target [weight]` per line, whitespace or
///   comma separated, optionally gzipped. Lines starting with `#` or `%`
///   are skipped.
///
/// Self loops are dropped and repeated pairs (in either direction) keep
/// their first weight.
///
pub fn read_edge_list(input_file: &str) -> anyhow::Result<EdgeListInput> {
    let reader = open_buf_reader(input_file)?;

    let mut name_to_index: HashMap<Box<str>, usize> = HashMap::new();
    let mut node_names: Vec<Box<str>> = vec![];
    let mut edges: Vec<WeightedEdge> = vec![];
    let mut seen: HashSet<(usize, usize)> = HashSet::new();
    let mut n_loops = 0;
    let mut n_dups = 0;

    let mut index_of = |name: &str| -> usize {
        if let Some(&i) = name_to_index.get(name) {
            return i;
        }
        let i = node_names.len();
        node_names.push(name.into());
        name_to_index.insert(name.into(), i);
        i
    };

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('%') {
            continue;
        }

        let words: Vec<&str> = line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|w| !w.is_empty())
            .collect();

        if words.len() < 2 {
            return Err(anyhow::anyhow!(
                "{}:{}: expected `source target [weight]`, found {:?}",
                input_file,
                line_no + 1,
                line
            ));
        }

        let weight = match words.get(2) {
            Some(w) => w.parse::<f64>().map_err(|e| {
                anyhow::anyhow!("{}:{}: bad weight {:?}: {}", input_file, line_no + 1, w, e)
            })?,
            None => 1.0,
        };

        let i = index_of(words[0]);
        let j = index_of(words[1]);

        if i == j {
            n_loops += 1;
            continue;
        }
        if !seen.insert((i.min(j), i.max(j))) {
            n_dups += 1;
            continue;
        }
        edges.push((i, j, weight));
    }

    if n_loops > 0 {
        warn!("dropped {} self loops", n_loops);
    }
    if n_dups > 0 {
        warn!("merged {} repeated edges (first weight kept)", n_dups);
    }

    let graph = Graph::from_edges(node_names.len(), &edges)?;
    info!(
        "read {} nodes and {} edges from {}",
        graph.num_nodes(),
        graph.num_edges(),
        input_file
    );

    Ok(EdgeListInput { graph, node_names })
}

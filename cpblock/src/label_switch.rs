//! Label-switching local search over `(block, role)` assignments.
//!
//! Starting from singleton core blocks, each sweep visits the nodes in a
//! freshly seeded random order and moves a node to the candidate slot with
//! the largest strictly positive `ΔQ`. The search stops when a sweep makes
//! no move or when the global update budget is spent. Block ids are then
//! compacted and the quality recomputed from scratch.

use crate::error::CorePeripheryError;
use crate::graph::Graph;
use crate::objective::{BlockQuality, Objective, ObjectiveKind};
use crate::partition::{Partition, Role};
use crate::sufficient_stats::{BlockStats, NeighborStats};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;

/// Which slots a node may move to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CandidateScope {
    /// Blocks of the node's neighbors, both roles each: at most `2·deg`
    /// candidates (KM_ER, KM_Config)
    Neighbors,
    /// Every non-empty block, both roles each, in ascending block id
    AllBlocks,
}

/// How the search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SearchStatus {
    /// A full sweep made no move
    Converged,
    /// `max_updates` moves were accepted
    BudgetExhausted,
}

/// Options for the label-switching search.
#[derive(Debug, Clone)]
pub struct LabelSwitchOptions {
    /// Maximum number of accepted moves. Default: 1000
    pub max_updates: usize,
    /// Random seed for the sweep orders. Default: drawn from the thread rng
    pub seed: Option<u64>,
    /// Candidate set per node. Default: `Neighbors`
    pub scope: CandidateScope,
    /// A move is accepted only if `ΔQ` exceeds this. Default: 1e-12
    pub min_gain: f64,
    /// Keep every accepted move in the result. Default: false
    pub record_moves: bool,
}

impl Default for LabelSwitchOptions {
    fn default() -> Self {
        LabelSwitchOptions {
            max_updates: 1000,
            seed: None,
            scope: CandidateScope::Neighbors,
            min_gain: 1e-12,
            record_moves: false,
        }
    }
}

/// One accepted move.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AcceptedMove {
    /// Moved node
    pub vertex: usize,
    /// Slot before the move
    pub from: (usize, Role),
    /// Slot after the move
    pub to: (usize, Role),
    /// Incremental `ΔQ` of the move
    pub gain: f64,
}

/// Outcome of one label-switching run.
#[derive(Debug, Clone, Serialize)]
pub struct CorePeripheryFit {
    /// Objective the partition was optimized for
    pub kind: ObjectiveKind,
    /// Final partition, block ids compacted to `0..K`
    pub partition: Partition,
    /// Q recomputed from scratch
    pub quality: f64,
    /// Contribution of each block to Q
    pub block_quality: Vec<f64>,
    /// Converged or out of budget
    pub status: SearchStatus,
    /// Accepted moves
    pub num_updates: usize,
    /// Sweeps started (the last one may be partial)
    pub num_sweeps: usize,
    /// Accepted moves in order, if requested. Block ids refer to the
    /// compacted starting partition, before the final compaction.
    pub moves: Vec<AcceptedMove>,
}

impl CorePeripheryFit {
    /// Number of blocks
    pub fn num_blocks(&self) -> usize {
        self.block_quality.len()
    }

    /// Nodes holding the core role
    pub fn core_nodes(&self) -> Vec<usize> {
        self.partition.core_nodes()
    }
}

/// Label-switching optimizer for one objective variant.
#[derive(Debug, Clone)]
pub struct LabelSwitch {
    kind: ObjectiveKind,
    options: LabelSwitchOptions,
}

impl LabelSwitch {
    /// Create a new optimizer.
    pub fn new(kind: ObjectiveKind, options: LabelSwitchOptions) -> Self {
        LabelSwitch { kind, options }
    }

    /// Objective variant
    pub fn kind(&self) -> ObjectiveKind {
        self.kind
    }

    /// Options
    pub fn options(&self) -> &LabelSwitchOptions {
        &self.options
    }

    /// Run from the singleton all-core partition.
    pub fn optimize(&self, graph: &Graph) -> anyhow::Result<CorePeripheryFit> {
        self.optimize_from(graph, Partition::singletons(graph.num_nodes()))
    }

    /// Run from a caller-supplied partition.
    ///
    /// Block ids of `partition` may be arbitrary; they are compacted to
    /// `0..K` before the search.
    pub fn optimize_from(
        &self,
        graph: &Graph,
        mut partition: Partition,
    ) -> anyhow::Result<CorePeripheryFit> {
        let n = graph.num_nodes();
        let opts = &self.options;

        if partition.len() != n {
            return Err(CorePeripheryError::InvalidInput(format!(
                "partition has {} nodes, graph has {}",
                partition.len(),
                n
            ))
            .into());
        }
        if opts.max_updates == 0 {
            return Err(
                CorePeripheryError::InvalidInput("max_updates must be positive".into()).into(),
            );
        }

        let base_seed = opts.seed.unwrap_or_else(|| rand::rng().random::<u64>());

        // statistics are sized by the largest block id
        partition.relabel();

        let objective = Objective::new(self.kind, graph);
        let mut stats = BlockStats::from_partition(objective.node_mass(graph), &partition);
        let mut d_tilde = NeighborStats::new(stats.num_slots());

        let mut order: Vec<usize> = Vec::with_capacity(n);
        let mut moves = Vec::new();
        let mut num_updates = 0;
        let mut num_sweeps = 0;

        let status = loop {
            if num_updates >= opts.max_updates {
                break SearchStatus::BudgetExhausted;
            }

            let sweep_seed = base_seed ^ (num_sweeps as u64 + 1).wrapping_mul(2654435761);
            let mut rng = StdRng::seed_from_u64(sweep_seed);
            order.clear();
            order.extend(0..n);
            order.shuffle(&mut rng);
            num_sweeps += 1;

            let mut sweep_moves = 0;
            for &v in &order {
                let Some((to, gain)) =
                    self.best_move(v, graph, &partition, &objective, &stats, &mut d_tilde)
                else {
                    continue;
                };

                let from = partition.get(v);
                stats.delta_move(v, from, to);
                partition.set(v, to.0, to.1);
                num_updates += 1;
                sweep_moves += 1;

                if opts.record_moves {
                    moves.push(AcceptedMove {
                        vertex: v,
                        from,
                        to,
                        gain,
                    });
                }

                if num_updates >= opts.max_updates {
                    break;
                }
            }

            debug!(
                "sweep {}: {} moves ({} total)",
                num_sweeps, sweep_moves, num_updates
            );

            if num_updates >= opts.max_updates {
                break SearchStatus::BudgetExhausted;
            }
            if sweep_moves == 0 {
                break SearchStatus::Converged;
            }
        };

        partition.relabel();

        let quality = if graph.total_strength() > 0.0 {
            objective.quality(graph, &partition)?
        } else {
            let k = partition.num_blocks();
            BlockQuality {
                total: 0.0,
                per_block: vec![0.0; k],
            }
        };

        info!(
            "label switching [{}]: {:?} after {} updates in {} sweeps, {} blocks, Q = {:.6}",
            self.kind,
            status,
            num_updates,
            num_sweeps,
            quality.per_block.len(),
            quality.total
        );

        Ok(CorePeripheryFit {
            kind: self.kind,
            partition,
            quality: quality.total,
            block_quality: quality.per_block,
            status,
            num_updates,
            num_sweeps,
            moves,
        })
    }

    /// Best strictly improving slot for `vertex`, first encountered on ties.
    fn best_move(
        &self,
        vertex: usize,
        graph: &Graph,
        partition: &Partition,
        objective: &Objective,
        stats: &BlockStats,
        d_tilde: &mut NeighborStats,
    ) -> Option<((usize, Role), f64)> {
        if self.options.scope == CandidateScope::Neighbors && graph.degree(vertex) == 0 {
            return None;
        }

        let current = partition.get(vertex);
        d_tilde.collect(graph, partition, vertex);

        let mut best: Option<(usize, Role)> = None;
        let mut best_gain = 0.0;

        let mut consider = |block: usize| {
            for role in Role::ALL {
                let gain = objective.delta(vertex, current, (block, role), d_tilde, stats);
                if gain > best_gain {
                    best_gain = gain;
                    best = Some((block, role));
                }
            }
        };

        match self.options.scope {
            CandidateScope::Neighbors => {
                for &(nbr, _) in graph.neighbors(vertex) {
                    consider(partition.block[nbr]);
                }
            }
            CandidateScope::AllBlocks => {
                for block in stats.nonempty_blocks() {
                    consider(block);
                }
            }
        }

        match best {
            Some(to) if best_gain > self.options.min_gain => Some((to, best_gain)),
            _ => None,
        }
    }
}

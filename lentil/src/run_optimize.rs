use crate::common::*;
use crate::input::*;
use crate::output::*;

use clap::Parser;
use cpblock::be_correlation::block_correlations;
use cpblock::{CandidateScope, LabelSwitch, LabelSwitchOptions};

#[derive(Parser, Debug, Clone)]
pub struct OptimizeArgs {
    /// edge list file: `source target [weight]` per line, whitespace or
    /// comma separated, optionally gzipped (`.gz`)
    #[arg(required = true)]
    pub edge_file: Box<str>,

    /// null expectation of the objective
    #[arg(long, short = 'm', value_enum, default_value = "er")]
    pub model: Model,

    /// maximum number of accepted moves
    #[arg(long, default_value_t = 1000)]
    pub max_updates: usize,

    /// random seed for the sweep orders (drawn at random if not given)
    #[arg(long)]
    pub seed: Option<u64>,

    /// consider every non-empty block as a move target, not only the
    /// blocks of a node's neighbors
    #[arg(long, default_value_t = false)]
    pub all_blocks: bool,

    /// smallest gain for a move to be accepted
    #[arg(long, default_value_t = 1e-12)]
    pub min_gain: f64,

    /// family-wise level for the per-block correlation report
    #[arg(long, short = 'a', default_value_t = 0.05)]
    pub alpha: f64,

    /// output header: writes `{out}.partition.tsv.gz` and `{out}.summary.json`
    #[arg(long, short, required = true)]
    pub out: Box<str>,

    /// number of threads (default: all cores)
    #[arg(long)]
    pub threads: Option<usize>,

    /// verbosity
    #[arg(long, short)]
    pub verbose: bool,
}

impl OptimizeArgs {
    /// Optimizer settings with a concrete seed
    pub fn label_switch_options(&self, seed: u64) -> LabelSwitchOptions {
        LabelSwitchOptions {
            max_updates: self.max_updates,
            seed: Some(seed),
            scope: if self.all_blocks {
                CandidateScope::AllBlocks
            } else {
                CandidateScope::Neighbors
            },
            min_gain: self.min_gain,
            record_moves: false,
        }
    }
}

/// Fit a core-periphery partition and write it out
pub fn run_optimize(args: OptimizeArgs) -> anyhow::Result<()> {
    init_runtime(args.verbose, args.threads)?;

    let input = read_edge_list(&args.edge_file)?;
    let graph = &input.graph;

    let seed = args.seed.unwrap_or_else(rand::random);
    info!("label switching with seed {}", seed);

    let fit = LabelSwitch::new(args.model.into(), args.label_switch_options(seed)).optimize(graph)?;
    let correlations = block_correlations(graph, &fit.partition, args.alpha)?;

    write_partition(
        &format!("{}.partition.tsv.gz", args.out),
        &input.node_names,
        &fit,
    )?;

    let mut summary = RunSummary::new(
        "optimize",
        &args.edge_file,
        graph.num_edges(),
        Some(seed),
        &fit,
    );
    summary.block_correlation = Some(&correlations);
    write_summary(&format!("{}.summary.json", args.out), &summary)?;

    info!("done");
    Ok(())
}

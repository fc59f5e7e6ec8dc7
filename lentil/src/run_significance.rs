use crate::common::*;
use crate::input::*;
use crate::output::*;

use clap::Parser;
use cpblock::null_model::test_significance;
use cpblock::{CandidateScope, LabelSwitchOptions, NullModelOptions};

#[derive(Parser, Debug, Clone)]
pub struct SignificanceArgs {
    /// edge list file: `source target [weight]` per line, whitespace or
    /// comma separated, optionally gzipped (`.gz`)
    #[arg(required = true)]
    pub edge_file: Box<str>,

    /// null expectation of the objective
    #[arg(long, short = 'm', value_enum, default_value = "er")]
    pub model: Model,

    /// number of configuration-model randomizations
    #[arg(long, short = 'r', default_value_t = 100)]
    pub num_randomizations: usize,

    /// significance level
    #[arg(long, short = 'a', default_value_t = 0.05)]
    pub alpha: f64,

    /// maximum number of accepted moves per optimization
    #[arg(long, default_value_t = 1000)]
    pub max_updates: usize,

    /// random seed for the observed fit and the randomizations (drawn
    /// at random if not given)
    #[arg(long)]
    pub seed: Option<u64>,

    /// consider every non-empty block as a move target
    #[arg(long, default_value_t = false)]
    pub all_blocks: bool,

    /// output header: writes `{out}.partition.tsv.gz`,
    /// `{out}.summary.json` and `{out}.null.tsv.gz`
    #[arg(long, short, required = true)]
    pub out: Box<str>,

    /// number of threads (default: all cores)
    #[arg(long)]
    pub threads: Option<usize>,

    /// verbosity (also shows a progress bar)
    #[arg(long, short)]
    pub verbose: bool,
}

/// Fit the observed graph and test it against randomized graphs
pub fn run_significance(args: SignificanceArgs) -> anyhow::Result<()> {
    init_runtime(args.verbose, args.threads)?;

    let input = read_edge_list(&args.edge_file)?;
    let graph = &input.graph;

    let seed = args.seed.unwrap_or_else(rand::random);
    info!(
        "{} randomizations with seed {}",
        args.num_randomizations, seed
    );

    let options = NullModelOptions {
        num_randomizations: args.num_randomizations,
        alpha: args.alpha,
        optimizer: LabelSwitchOptions {
            max_updates: args.max_updates,
            seed: Some(seed),
            scope: if args.all_blocks {
                CandidateScope::AllBlocks
            } else {
                CandidateScope::Neighbors
            },
            ..Default::default()
        },
        keep_null_samples: true,
        show_progress: args.verbose,
    };

    let (fit, mut test) = test_significance(graph, args.model.into(), &options)?;
    let null_samples = test.null_samples.take().unwrap_or_default();

    if test.significant {
        info!("core-periphery structure is significant (p = {:.4e})", test.p_value);
    } else {
        info!("no significant core-periphery structure (p = {:.4e})", test.p_value);
    }

    write_partition(
        &format!("{}.partition.tsv.gz", args.out),
        &input.node_names,
        &fit,
    )?;
    write_null_samples(&format!("{}.null.tsv.gz", args.out), &null_samples)?;

    let mut summary = RunSummary::new(
        "significance",
        &args.edge_file,
        graph.num_edges(),
        Some(seed),
        &fit,
    );
    summary.significance = Some(&test);
    write_summary(&format!("{}.summary.json", args.out), &summary)?;

    info!("done");
    Ok(())
}

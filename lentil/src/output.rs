use crate::common::*;
use crate::common_io::{mkdir, open_buf_writer};

use cpblock::be_correlation::BlockCorrelations;
use cpblock::{CorePeripheryFit, ObjectiveKind, Role, SearchStatus, SignificanceTest};
use serde::Serialize;
use std::io::Write;

/// Everything written to `{out}.summary.json`
#[derive(Serialize)]
pub struct RunSummary<'a> {
    /// subcommand that produced the run
    pub command: &'a str,
    /// input edge list
    pub edge_file: &'a str,
    /// objective variant
    pub model: ObjectiveKind,
    /// number of nodes
    pub num_nodes: usize,
    /// number of undirected edges
    pub num_edges: usize,
    /// seed actually used, if any
    pub seed: Option<u64>,
    /// Q of the final partition
    pub quality: f64,
    /// per-block contribution to Q
    pub block_quality: &'a [f64],
    /// number of blocks
    pub num_blocks: usize,
    /// number of core nodes
    pub num_core: usize,
    /// how the search ended
    pub status: SearchStatus,
    /// accepted moves
    pub num_updates: usize,
    /// sweeps started
    pub num_sweeps: usize,
    /// per-block Borgatti-Everett correlations
    pub block_correlation: Option<&'a BlockCorrelations>,
    /// null-model verdict
    pub significance: Option<&'a SignificanceTest>,
}

impl<'a> RunSummary<'a> {
    /// Summary of `fit` with no diagnostics attached
    pub fn new(
        command: &'a str,
        edge_file: &'a str,
        num_edges: usize,
        seed: Option<u64>,
        fit: &'a CorePeripheryFit,
    ) -> Self {
        RunSummary {
            command,
            edge_file,
            model: fit.kind,
            num_nodes: fit.partition.len(),
            num_edges,
            seed,
            quality: fit.quality,
            block_quality: &fit.block_quality,
            num_blocks: fit.num_blocks(),
            num_core: fit.core_nodes().len(),
            status: fit.status,
            num_updates: fit.num_updates,
            num_sweeps: fit.num_sweeps,
            block_correlation: None,
            significance: None,
        }
    }
}

///
/// Write `node block role` rows, one per node
///
pub fn write_partition(
    output_file: &str,
    node_names: &[Box<str>],
    fit: &CorePeripheryFit,
) -> anyhow::Result<()> {
    mkdir(output_file)?;
    let mut writer = open_buf_writer(output_file)?;
    writeln!(writer, "node\tblock\trole")?;
    for (name, (&b, &r)) in node_names
        .iter()
        .zip(fit.partition.block.iter().zip(fit.partition.role.iter()))
    {
        let role = match r {
            Role::Core => "core",
            Role::Periphery => "periphery",
        };
        writeln!(writer, "{}\t{}\t{}", name, b, role)?;
    }
    writer.flush()?;
    info!("wrote {}", output_file);
    Ok(())
}

///
/// Write the run summary as pretty JSON
///
pub fn write_summary(output_file: &str, summary: &RunSummary) -> anyhow::Result<()> {
    mkdir(output_file)?;
    std::fs::write(output_file, serde_json::to_string_pretty(summary)?)?;
    info!("wrote {}", output_file);
    Ok(())
}

///
/// Write `trial quality` rows for the null-model samples
///
pub fn write_null_samples(output_file: &str, samples: &[f64]) -> anyhow::Result<()> {
    mkdir(output_file)?;
    let mut writer = open_buf_writer(output_file)?;
    writeln!(writer, "trial\tquality")?;
    for (t, q) in samples.iter().enumerate() {
        writeln!(writer, "{}\t{}", t, q)?;
    }
    writer.flush()?;
    info!("wrote {}", output_file);
    Ok(())
}

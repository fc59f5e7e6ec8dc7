//! Core-periphery block models for undirected graphs.
//!
//! Every node receives a block id `c_i` and a role `x_i` (core or
//! periphery). A pair of nodes is scored when both sit in the same block
//! and at least one of them is core; periphery-periphery pairs are not.
//! The quality `Q` rewards scored pairs that are denser than a null
//! expectation:
//!
//! * [`ObjectiveKind::Er`] compares against a constant edge density
//!   (KM_ER).
//! * [`ObjectiveKind::Config`] compares against the configuration model
//!   `s_i s_j / W` (KM_Config).
//!
//! [`LabelSwitch`] maximizes `Q` by greedy label switching with O(1)
//! incremental `ΔQ` per candidate. [`null_model::test_significance`]
//! calibrates the result against degree-preserving randomizations.
//!
//! # References
//!
//! Kojaku & Masuda (2018). "Core-periphery structure requires something
//! else in the network." New Journal of Physics 20, 043012.

#![warn(missing_docs)]

/// Typed error variants carried inside `anyhow::Error`
pub mod error;

/// Simple undirected weighted graph with adjacency lists
pub mod graph;

/// Block and role assignment per node
pub mod partition;

/// Quality functions and incremental move deltas
pub mod objective;

/// Per-slot aggregates kept in sync with the partition
pub mod sufficient_stats;

/// Label-switching optimizer
pub mod label_switch;

/// Configuration-model randomization
pub mod randomize;

/// Gaussian kernel density estimate
pub mod kde;

/// Significance testing against randomized graphs
pub mod null_model;

/// Borgatti-Everett block correlations with Šidák correction
pub mod be_correlation;

#[cfg(test)]
pub(crate) mod test_util;


pub use error::{error_kind, CorePeripheryError};
pub use graph::{Graph, WeightedEdge};
pub use label_switch::{
    CandidateScope, CorePeripheryFit, LabelSwitch, LabelSwitchOptions, SearchStatus,
};
pub use null_model::{NullModelOptions, SignificanceTest};
pub use objective::{Objective, ObjectiveKind};
pub use partition::{Partition, Role};

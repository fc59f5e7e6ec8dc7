//! Command-line front end for core-periphery detection with `cpblock`.
//!
//! Reads an edge list, fits a core-periphery partition by label switching
//! and optionally tests it against configuration-model randomizations.

pub mod common;
pub mod common_io;
pub mod input;
pub mod output;
pub mod run_optimize;
pub mod run_significance;

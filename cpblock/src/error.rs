use std::fmt;

/// Typed failures raised by the core-periphery routines.
///
/// Functions in this crate return `anyhow::Result`; these variants travel
/// inside the `anyhow::Error` and can be recovered with `downcast_ref`.
#[derive(Debug, Clone, PartialEq)]
pub enum CorePeripheryError {
    /// Malformed graph or option input.
    InvalidInput(String),
    /// A normalization constant is zero (e.g., no edges for the
    /// degree-corrected objective).
    DegenerateGraph(String),
    /// Statistical validation could not produce a meaningful answer.
    Validation(String),
    /// Null-model graph generation failed.
    Randomization(String),
}

impl fmt::Display for CorePeripheryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorePeripheryError::InvalidInput(msg) => write!(f, "invalid input: {}", msg),
            CorePeripheryError::DegenerateGraph(msg) => write!(f, "degenerate graph: {}", msg),
            CorePeripheryError::Validation(msg) => write!(f, "validation failed: {}", msg),
            CorePeripheryError::Randomization(msg) => write!(f, "randomization failed: {}", msg),
        }
    }
}

impl std::error::Error for CorePeripheryError {}

/// Recover the typed error, if any, from an `anyhow::Error`.
pub fn error_kind(err: &anyhow::Error) -> Option<&CorePeripheryError> {
    err.downcast_ref::<CorePeripheryError>()
}

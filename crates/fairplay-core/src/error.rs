//! Engine error types.

use thiserror::Error;

/// Result type alias for engine operations.
pub type BalanceResult<T> = Result<T, BalanceError>;

/// The two ways the engine can fail. Both are definitive: the caller may
/// retry with a larger budget or relaxed constraints, the engine never does.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BalanceError {
    /// The attempt budget ran out without a single valid grouping.
    #[error("no valid grouping found after {attempts} attempts; constraints are unsatisfiable for this roster and group count")]
    Unsatisfiable { attempts: usize },

    /// Every diversity run failed to produce a valid grouping.
    #[error("no valid options available after {runs} runs")]
    NoValidOptions { runs: usize },
}

//! Error types.

use thiserror::Error;

/// Errors surfaced by genome evaluation and population construction.
///
/// Structural rejections (self-loops, cycles, duplicate innovations) are not
/// errors: [`Genome::add_connection_gene`](crate::genome::Genome::add_connection_gene)
/// reports them through its `bool` return and leaves the genome unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NeatError {
    /// `query` was called with the wrong number of input values.
    #[error("expected {expected} input value(s), got {actual}")]
    InputSize {
        /// Number of input neurons in the genome.
        expected: usize,
        /// Length of the supplied input slice.
        actual: usize,
    },

    /// The configuration failed [`NeatConfig::validate`](crate::config::NeatConfig::validate).
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The seed genome cannot start a run.
    #[error("invalid seed genome: {0}")]
    InvalidSeed(String),
}

//! Estimator error types.

use thiserror::Error;

/// Result type for estimator operations.
pub type EstimateResult<T> = Result<T, EstimateError>;

/// Errors raised by the zone estimator.
///
/// Every variant is a precondition violation on malformed or insufficient
/// input data. None of them are retried or recovered internally; callers
/// get a message naming the precondition that failed.
#[derive(Error, Debug)]
pub enum EstimateError {
    /// Average cell count requested for a zone without stations
    #[error("zone '{zone}' has no base stations")]
    EmptyZone { zone: String },

    /// Cluster selection attempted with fewer than 3 stations total
    #[error("need at least 3 base stations to form a cluster")]
    InsufficientStations,

    /// Fewer than 3 distinct frequencies across the full station list
    #[error("not enough stations with distinct frequencies for a cluster")]
    DistinctFrequenciesUnavailable,

    /// Externally supplied cluster does not contain exactly 3 stations
    #[error("stations must have length 3, got {len}")]
    InvalidClusterSize { len: usize },

    /// Station with zero coverage radius reached the cell-count formula
    #[error("division by zero: station '{station}' has zero coverage radius")]
    DivisionByZero { station: String },
}

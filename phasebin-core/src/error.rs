//! Error types for phasebin-core.

use crate::ObserverPhaseSpaceDimension;
use thiserror::Error;

/// Result type alias for phasebin operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for phasebin operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Not enough bin boundaries to define a single bin.
    #[error("{dimension} discretization requires at least {required} bin boundaries, got {actual}")]
    TooFewBoundaries {
        dimension: ObserverPhaseSpaceDimension,
        required: usize,
        actual: usize,
    },

    /// Bin boundaries are not sorted.
    #[error("{dimension} bin boundaries are not sorted at boundary {index}")]
    UnsortedBoundaries {
        dimension: ObserverPhaseSpaceDimension,
        index: usize,
    },

    /// More than two consecutive boundaries are equal.
    #[error("{dimension} bin boundary {index} repeats an existing line bin")]
    RepeatedLineBin {
        dimension: ObserverPhaseSpaceDimension,
        index: usize,
    },

    /// A bin boundary lies outside of the dimension domain.
    #[error("{dimension} bin boundary {value} is outside of the dimension domain")]
    BoundaryOutOfDomain {
        dimension: ObserverPhaseSpaceDimension,
        value: f64,
    },

    /// A discrete bin has no admissible values.
    #[error("{dimension} bin {bin} has no values")]
    EmptyBin {
        dimension: ObserverPhaseSpaceDimension,
        bin: usize,
    },

    /// The direction quadrature order must be positive.
    #[error("invalid PQLA quadrature order: {0}")]
    InvalidQuadratureOrder(u32),

    /// Track lengths must be finite and non-negative.
    #[error("invalid track length: {0}")]
    InvalidTrackLength(f64),

    /// A track time cannot be derived from a particle that is not moving.
    #[error("invalid particle speed: {0}")]
    InvalidParticleSpeed(f64),

    /// A track length and particle speed give an unrepresentable duration.
    #[error("track of length {track_length} at speed {speed} has no finite duration")]
    InvalidTrackDuration { track_length: f64, speed: f64 },

    /// A phase-space point lacks a value for a discretized dimension.
    #[error("no {0} value was supplied")]
    MissingDimensionValue(ObserverPhaseSpaceDimension),

    /// A value is outside of a dimension discretization.
    #[error("{0} value is not in the discretization")]
    ValueNotInDiscretization(ObserverPhaseSpaceDimension),

    /// A range does not overlap a dimension discretization.
    #[error("{0} range does not intersect the discretization")]
    RangeDoesNotIntersect(ObserverPhaseSpaceDimension),

    /// A dimension bin index is out of range.
    #[error("{dimension} bin index {index} is out of range ({bins} bins)")]
    BinIndexOutOfRange {
        dimension: ObserverPhaseSpaceDimension,
        index: usize,
        bins: usize,
    },

    /// A flat phase-space bin index is out of range.
    #[error("discretization index {index} is out of range ({bins} bins)")]
    DiscretizationIndexOutOfRange { index: usize, bins: usize },

    /// Unknown dimension name.
    #[error("unknown phase-space dimension: {0}")]
    UnknownDimension(String),

    /// Formatting error while printing bins.
    #[error("format error: {0}")]
    Format(#[from] std::fmt::Error),
}

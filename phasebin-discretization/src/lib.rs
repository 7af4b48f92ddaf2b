//! phasebin-discretization: Observer phase-space discretizations.
//!
//! This crate provides the binning strategies for single dimensions and
//! the composite phase-space discretization built from them:
//! - **Ordered continuous** - sorted boundaries, right-closed bins, line bins
//! - **Ordered discrete** - collision number bins up to each boundary
//! - **Unordered discrete** - possibly overlapping sets of source ids
//! - **Direction** - PQLA octahedral tessellation of the unit sphere
//!
#![warn(missing_docs)]

mod continuous;
mod direction;
mod dimension;
mod format;
mod ordered_discrete;
mod phase_space;
mod unordered;

pub use continuous::OrderedContinuousDiscretization;
pub use dimension::{
    BinIndexArray, BinIndexWeightPairArray, DimensionDiscretization,
    ObserverCollisionNumberDimensionDiscretization, ObserverCosineDimensionDiscretization,
    ObserverDimensionDiscretization, ObserverDirectionDimensionDiscretization,
    ObserverEnergyDimensionDiscretization, ObserverSourceEnergyDimensionDiscretization,
    ObserverSourceIdDimensionDiscretization, ObserverSourceTimeDimensionDiscretization,
    ObserverTimeDimensionDiscretization,
};
pub use direction::DirectionDiscretization;
pub use ordered_discrete::OrderedDiscreteDiscretization;
pub use phase_space::ObserverPhaseSpaceDiscretization;
pub use unordered::UnorderedDiscreteDiscretization;

// Re-export the core types every caller needs
pub use phasebin_core::{
    DimensionValue, Error, ObserverParticleStateWrapper, ObserverPhaseSpaceDimension,
    PhaseSpacePoint, Result,
};

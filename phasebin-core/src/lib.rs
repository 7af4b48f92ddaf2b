//! phasebin-core: Core types for observer phase-space binning.
//!
//! This crate provides the foundational abstractions shared by every
//! discretization: the phase-space dimensions and their static traits,
//! tagged dimension values, particle states and the observer particle
//! state wrapper that exposes a particle to the binning code.
//!

pub mod dimension;
pub mod error;
pub mod particle;
pub mod traits;
pub mod value;
pub mod wrapper;

pub use dimension::ObserverPhaseSpaceDimension;
pub use error::{Error, Result};
pub use particle::{ParticleState, ParticleStateData, ParticleType, SPEED_OF_LIGHT};
pub use traits::{
    CollisionNumberDimension, ContinuousDimension, CosineDimension, DimensionTraits,
    DirectionDimension, EnergyDimension, OrderedCountDimension, SourceEnergyDimension,
    SourceIdDimension, SourceTimeDimension, TimeDimension, UnorderedCountDimension,
};
pub use value::{DimensionValue, PhaseSpacePoint};
pub use wrapper::ObserverParticleStateWrapper;

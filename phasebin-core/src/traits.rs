//! Static per-dimension traits.
//!
//! Every phase-space dimension has a zero sized marker type implementing
//! [`DimensionTraits`]. The marker fixes the value type of the dimension,
//! its theoretical domain and how its value (or range of values) is read
//! from an [`ObserverParticleStateWrapper`]. A dimension without a marker
//! simply has no traits, so there is no default to fall back on.
//!
//! The marker sub-traits [`ContinuousDimension`], [`OrderedCountDimension`]
//! and [`UnorderedCountDimension`] select which discretization strategies a
//! dimension may be binned with.

use crate::{
    DimensionValue, ObserverParticleStateWrapper, ObserverPhaseSpaceDimension, PhaseSpacePoint,
};
use std::fmt;

/// Static metadata and value extraction for one phase-space dimension.
pub trait DimensionTraits: fmt::Debug + Send + Sync + 'static {
    /// Type of the dimension values.
    type Value: Copy + PartialEq + fmt::Debug + Send + Sync;

    /// The dimension these traits describe.
    const DIMENSION: ObserverPhaseSpaceDimension;

    /// Returns the human readable dimension name.
    #[inline]
    fn name() -> &'static str {
        Self::DIMENSION.name()
    }

    /// Returns the dimension name without whitespace.
    #[inline]
    fn basic_name() -> &'static str {
        Self::DIMENSION.basic_name()
    }

    /// Returns the smallest admissible value.
    fn lower_bound() -> Self::Value;

    /// Returns the largest admissible value.
    fn upper_bound() -> Self::Value;

    /// Reads the dimension value from a wrapped particle.
    fn value(wrapper: &ObserverParticleStateWrapper<'_>) -> Self::Value;

    /// Reads the range of values the wrapped particle spans.
    ///
    /// Point-like dimensions return the current value twice.
    #[inline]
    fn range(wrapper: &ObserverParticleStateWrapper<'_>) -> (Self::Value, Self::Value) {
        let value = Self::value(wrapper);
        (value, value)
    }

    /// Tags a value with this dimension.
    fn wrap(value: Self::Value) -> DimensionValue;

    /// Returns the value if it belongs to this dimension.
    fn from_value(value: &DimensionValue) -> Option<Self::Value>;

    /// Returns this dimension's value stored in a phase-space point.
    #[inline]
    fn from_point(point: &PhaseSpacePoint) -> Option<Self::Value> {
        point.get(Self::DIMENSION).and_then(Self::from_value)
    }
}

/// Real valued, ordered dimension.
pub trait ContinuousDimension: DimensionTraits<Value = f64> {}

/// Ordered count dimension.
pub trait OrderedCountDimension: DimensionTraits<Value = u32> {}

/// Unordered count (identifier) dimension.
pub trait UnorderedCountDimension: DimensionTraits<Value = u32> {}

/// Angle cosine with respect to an observer surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CosineDimension;

impl DimensionTraits for CosineDimension {
    type Value = f64;
    const DIMENSION: ObserverPhaseSpaceDimension = ObserverPhaseSpaceDimension::Cosine;

    fn lower_bound() -> f64 {
        -1.0
    }

    fn upper_bound() -> f64 {
        1.0
    }

    fn value(wrapper: &ObserverParticleStateWrapper<'_>) -> f64 {
        wrapper.angle_cosine()
    }

    fn wrap(value: f64) -> DimensionValue {
        DimensionValue::Cosine(value)
    }

    fn from_value(value: &DimensionValue) -> Option<f64> {
        match value {
            DimensionValue::Cosine(v) => Some(*v),
            _ => None,
        }
    }
}

impl ContinuousDimension for CosineDimension {}

/// Source (birth) energy of the particle history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceEnergyDimension;

impl DimensionTraits for SourceEnergyDimension {
    type Value = f64;
    const DIMENSION: ObserverPhaseSpaceDimension = ObserverPhaseSpaceDimension::SourceEnergy;

    fn lower_bound() -> f64 {
        0.0
    }

    fn upper_bound() -> f64 {
        f64::INFINITY
    }

    fn value(wrapper: &ObserverParticleStateWrapper<'_>) -> f64 {
        wrapper.particle().source_energy()
    }

    fn wrap(value: f64) -> DimensionValue {
        DimensionValue::SourceEnergy(value)
    }

    fn from_value(value: &DimensionValue) -> Option<f64> {
        match value {
            DimensionValue::SourceEnergy(v) => Some(*v),
            _ => None,
        }
    }
}

impl ContinuousDimension for SourceEnergyDimension {}

/// Current particle energy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnergyDimension;

impl DimensionTraits for EnergyDimension {
    type Value = f64;
    const DIMENSION: ObserverPhaseSpaceDimension = ObserverPhaseSpaceDimension::Energy;

    fn lower_bound() -> f64 {
        0.0
    }

    fn upper_bound() -> f64 {
        f64::INFINITY
    }

    fn value(wrapper: &ObserverParticleStateWrapper<'_>) -> f64 {
        wrapper.particle().energy()
    }

    fn wrap(value: f64) -> DimensionValue {
        DimensionValue::Energy(value)
    }

    fn from_value(value: &DimensionValue) -> Option<f64> {
        match value {
            DimensionValue::Energy(v) => Some(*v),
            _ => None,
        }
    }
}

impl ContinuousDimension for EnergyDimension {}

/// Source (birth) time of the particle history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceTimeDimension;

impl DimensionTraits for SourceTimeDimension {
    type Value = f64;
    const DIMENSION: ObserverPhaseSpaceDimension = ObserverPhaseSpaceDimension::SourceTime;

    fn lower_bound() -> f64 {
        0.0
    }

    fn upper_bound() -> f64 {
        f64::INFINITY
    }

    fn value(wrapper: &ObserverParticleStateWrapper<'_>) -> f64 {
        wrapper.particle().source_time()
    }

    fn wrap(value: f64) -> DimensionValue {
        DimensionValue::SourceTime(value)
    }

    fn from_value(value: &DimensionValue) -> Option<f64> {
        match value {
            DimensionValue::SourceTime(v) => Some(*v),
            _ => None,
        }
    }
}

impl ContinuousDimension for SourceTimeDimension {}

/// Current particle time.
///
/// The range of a wrapped particle is the start and end time of its
/// current track segment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeDimension;

impl DimensionTraits for TimeDimension {
    type Value = f64;
    const DIMENSION: ObserverPhaseSpaceDimension = ObserverPhaseSpaceDimension::Time;

    fn lower_bound() -> f64 {
        0.0
    }

    fn upper_bound() -> f64 {
        f64::INFINITY
    }

    fn value(wrapper: &ObserverParticleStateWrapper<'_>) -> f64 {
        wrapper.particle().time()
    }

    fn range(wrapper: &ObserverParticleStateWrapper<'_>) -> (f64, f64) {
        (wrapper.start_time(), wrapper.end_time())
    }

    fn wrap(value: f64) -> DimensionValue {
        DimensionValue::Time(value)
    }

    fn from_value(value: &DimensionValue) -> Option<f64> {
        match value {
            DimensionValue::Time(v) => Some(*v),
            _ => None,
        }
    }
}

impl ContinuousDimension for TimeDimension {}

/// Number of collisions undergone by the particle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionNumberDimension;

impl DimensionTraits for CollisionNumberDimension {
    type Value = u32;
    const DIMENSION: ObserverPhaseSpaceDimension = ObserverPhaseSpaceDimension::CollisionNumber;

    fn lower_bound() -> u32 {
        0
    }

    fn upper_bound() -> u32 {
        u32::MAX
    }

    fn value(wrapper: &ObserverParticleStateWrapper<'_>) -> u32 {
        wrapper.particle().collision_number()
    }

    fn wrap(value: u32) -> DimensionValue {
        DimensionValue::CollisionNumber(value)
    }

    fn from_value(value: &DimensionValue) -> Option<u32> {
        match value {
            DimensionValue::CollisionNumber(v) => Some(*v),
            _ => None,
        }
    }
}

impl OrderedCountDimension for CollisionNumberDimension {}

/// Id of the source that emitted the particle history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceIdDimension;

impl DimensionTraits for SourceIdDimension {
    type Value = u32;
    const DIMENSION: ObserverPhaseSpaceDimension = ObserverPhaseSpaceDimension::SourceId;

    fn lower_bound() -> u32 {
        0
    }

    fn upper_bound() -> u32 {
        u32::MAX
    }

    fn value(wrapper: &ObserverParticleStateWrapper<'_>) -> u32 {
        wrapper.particle().source_id()
    }

    fn wrap(value: u32) -> DimensionValue {
        DimensionValue::SourceId(value)
    }

    fn from_value(value: &DimensionValue) -> Option<u32> {
        match value {
            DimensionValue::SourceId(v) => Some(*v),
            _ => None,
        }
    }
}

impl UnorderedCountDimension for SourceIdDimension {}

/// Particle direction of flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectionDimension;

impl DimensionTraits for DirectionDimension {
    type Value = [f64; 3];
    const DIMENSION: ObserverPhaseSpaceDimension = ObserverPhaseSpaceDimension::Direction;

    fn lower_bound() -> [f64; 3] {
        [-1.0; 3]
    }

    fn upper_bound() -> [f64; 3] {
        [1.0; 3]
    }

    fn value(wrapper: &ObserverParticleStateWrapper<'_>) -> [f64; 3] {
        wrapper.particle().direction()
    }

    fn wrap(value: [f64; 3]) -> DimensionValue {
        DimensionValue::Direction(value)
    }

    fn from_value(value: &DimensionValue) -> Option<[f64; 3]> {
        match value {
            DimensionValue::Direction(v) => Some(*v),
            _ => None,
        }
    }
}

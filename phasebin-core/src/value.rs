//! Tagged dimension values and phase-space points.
//!
//! A [`DimensionValue`] carries both the dimension it belongs to and a
//! value of that dimension's type. [`PhaseSpacePoint`] keys its entries by
//! the variant, so a value can never be stored under the wrong dimension.

use crate::traits::{
    CollisionNumberDimension, CosineDimension, DimensionTraits, DirectionDimension,
    EnergyDimension, SourceEnergyDimension, SourceIdDimension, SourceTimeDimension, TimeDimension,
};
use crate::{ObserverParticleStateWrapper, ObserverPhaseSpaceDimension};
use std::collections::BTreeMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A value of one phase-space dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DimensionValue {
    Cosine(f64),
    SourceEnergy(f64),
    Energy(f64),
    SourceTime(f64),
    Time(f64),
    CollisionNumber(u32),
    SourceId(u32),
    Direction([f64; 3]),
}

impl DimensionValue {
    /// Returns the dimension this value belongs to.
    #[must_use]
    pub fn dimension(&self) -> ObserverPhaseSpaceDimension {
        match self {
            Self::Cosine(_) => ObserverPhaseSpaceDimension::Cosine,
            Self::SourceEnergy(_) => ObserverPhaseSpaceDimension::SourceEnergy,
            Self::Energy(_) => ObserverPhaseSpaceDimension::Energy,
            Self::SourceTime(_) => ObserverPhaseSpaceDimension::SourceTime,
            Self::Time(_) => ObserverPhaseSpaceDimension::Time,
            Self::CollisionNumber(_) => ObserverPhaseSpaceDimension::CollisionNumber,
            Self::SourceId(_) => ObserverPhaseSpaceDimension::SourceId,
            Self::Direction(_) => ObserverPhaseSpaceDimension::Direction,
        }
    }

    /// Extracts the point value of a dimension from a particle wrapper.
    #[must_use]
    pub fn from_wrapper(
        dimension: ObserverPhaseSpaceDimension,
        wrapper: &ObserverParticleStateWrapper<'_>,
    ) -> Self {
        match dimension {
            ObserverPhaseSpaceDimension::Cosine => extract::<CosineDimension>(wrapper),
            ObserverPhaseSpaceDimension::SourceEnergy => extract::<SourceEnergyDimension>(wrapper),
            ObserverPhaseSpaceDimension::Energy => extract::<EnergyDimension>(wrapper),
            ObserverPhaseSpaceDimension::SourceTime => extract::<SourceTimeDimension>(wrapper),
            ObserverPhaseSpaceDimension::Time => extract::<TimeDimension>(wrapper),
            ObserverPhaseSpaceDimension::CollisionNumber => {
                extract::<CollisionNumberDimension>(wrapper)
            }
            ObserverPhaseSpaceDimension::SourceId => extract::<SourceIdDimension>(wrapper),
            ObserverPhaseSpaceDimension::Direction => extract::<DirectionDimension>(wrapper),
        }
    }
}

fn extract<D: DimensionTraits>(wrapper: &ObserverParticleStateWrapper<'_>) -> DimensionValue {
    D::wrap(D::value(wrapper))
}

impl fmt::Display for DimensionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = ", self.dimension())?;
        match self {
            Self::Cosine(v)
            | Self::SourceEnergy(v)
            | Self::Energy(v)
            | Self::SourceTime(v)
            | Self::Time(v) => write!(f, "{v}"),
            Self::CollisionNumber(v) | Self::SourceId(v) => write!(f, "{v}"),
            Self::Direction([x, y, z]) => write!(f, "({x}, {y}, {z})"),
        }
    }
}

/// A point in the observer phase space.
///
/// Dimensions without a value are simply absent.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PhaseSpacePoint {
    values: BTreeMap<ObserverPhaseSpaceDimension, DimensionValue>,
}

impl PhaseSpacePoint {
    /// Creates an empty point.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a point holding the value of every dimension of a wrapped particle.
    #[must_use]
    pub fn from_wrapper(wrapper: &ObserverParticleStateWrapper<'_>) -> Self {
        ObserverPhaseSpaceDimension::ALL
            .into_iter()
            .map(|dimension| DimensionValue::from_wrapper(dimension, wrapper))
            .collect()
    }

    /// Adds a value, replacing any previous value of the same dimension.
    #[must_use]
    pub fn with_value(mut self, value: DimensionValue) -> Self {
        self.insert(value);
        self
    }

    /// Inserts a value and returns the previous value of its dimension.
    pub fn insert(&mut self, value: DimensionValue) -> Option<DimensionValue> {
        self.values.insert(value.dimension(), value)
    }

    /// Returns the value of a dimension.
    #[must_use]
    pub fn get(&self, dimension: ObserverPhaseSpaceDimension) -> Option<&DimensionValue> {
        self.values.get(&dimension)
    }

    /// Returns true if the point has a value for the dimension.
    #[must_use]
    pub fn contains(&self, dimension: ObserverPhaseSpaceDimension) -> bool {
        self.values.contains_key(&dimension)
    }

    /// Returns the number of dimensions with a value.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no dimension has a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns an iterator over the values in canonical dimension order.
    pub fn iter(&self) -> impl Iterator<Item = &DimensionValue> {
        self.values.values()
    }
}

impl FromIterator<DimensionValue> for PhaseSpacePoint {
    fn from_iter<I: IntoIterator<Item = DimensionValue>>(iter: I) -> Self {
        let mut point = Self::new();
        point.extend(iter);
        point
    }
}

impl Extend<DimensionValue> for PhaseSpacePoint {
    fn extend<I: IntoIterator<Item = DimensionValue>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

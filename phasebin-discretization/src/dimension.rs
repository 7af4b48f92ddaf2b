//! Single dimension discretization interface.

use crate::continuous::OrderedContinuousDiscretization;
use crate::direction::DirectionDiscretization;
use crate::ordered_discrete::OrderedDiscreteDiscretization;
use crate::unordered::UnorderedDiscreteDiscretization;
use phasebin_core::{
    CollisionNumberDimension, CosineDimension, EnergyDimension, ObserverParticleStateWrapper,
    ObserverPhaseSpaceDimension, PhaseSpacePoint, Result, SourceEnergyDimension,
    SourceIdDimension, SourceTimeDimension, TimeDimension,
};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Bin indices of a value.
pub type BinIndexArray = Vec<usize>;

/// Bin indices with the weight of each bin.
pub type BinIndexWeightPairArray = Vec<(usize, f64)>;

/// Cosine bins.
pub type ObserverCosineDimensionDiscretization = OrderedContinuousDiscretization<CosineDimension>;
/// Source energy bins.
pub type ObserverSourceEnergyDimensionDiscretization =
    OrderedContinuousDiscretization<SourceEnergyDimension>;
/// Energy bins.
pub type ObserverEnergyDimensionDiscretization = OrderedContinuousDiscretization<EnergyDimension>;
/// Source time bins.
pub type ObserverSourceTimeDimensionDiscretization =
    OrderedContinuousDiscretization<SourceTimeDimension>;
/// Time bins.
pub type ObserverTimeDimensionDiscretization = OrderedContinuousDiscretization<TimeDimension>;
/// Collision number bins.
pub type ObserverCollisionNumberDimensionDiscretization =
    OrderedDiscreteDiscretization<CollisionNumberDimension>;
/// Source id bins.
pub type ObserverSourceIdDimensionDiscretization =
    UnorderedDiscreteDiscretization<SourceIdDimension>;
/// Direction bins.
pub type ObserverDirectionDimensionDiscretization = DirectionDiscretization;

/// Queries shared by every single dimension discretization.
///
/// Discretizations are immutable once built, so all queries take `&self`
/// and may run concurrently.
pub trait DimensionDiscretization: fmt::Debug + Send + Sync {
    /// Returns the discretized dimension.
    fn dimension(&self) -> ObserverPhaseSpaceDimension;

    /// Returns the human readable name of the discretized dimension.
    fn dimension_name(&self) -> &'static str {
        self.dimension().name()
    }

    /// Returns the number of bins.
    fn number_of_bins(&self) -> usize;

    /// Returns true if the point's value of this dimension is binned.
    ///
    /// A point without a value for the dimension is not in the discretization.
    fn is_value_in_discretization(&self, point: &PhaseSpacePoint) -> bool;

    /// Returns true if the wrapped particle's value of this dimension is binned.
    fn is_wrapper_in_discretization(&self, wrapper: &ObserverParticleStateWrapper<'_>) -> bool;

    /// Returns true if the wrapped particle's range of this dimension
    /// overlaps the bins.
    fn does_range_intersect_discretization(
        &self,
        wrapper: &ObserverParticleStateWrapper<'_>,
    ) -> bool;

    /// Returns the bins containing the point's value.
    fn calculate_bin_indices_of_value(&self, point: &PhaseSpacePoint) -> Result<BinIndexArray>;

    /// Returns the bins containing the wrapped particle's value.
    fn calculate_bin_indices_of_wrapper(
        &self,
        wrapper: &ObserverParticleStateWrapper<'_>,
    ) -> Result<BinIndexArray>;

    /// Returns the bins containing the wrapped particle's value, each with
    /// a weight of one.
    fn calculate_bin_indices_and_weights_of_value(
        &self,
        wrapper: &ObserverParticleStateWrapper<'_>,
    ) -> Result<BinIndexWeightPairArray> {
        Ok(self
            .calculate_bin_indices_of_wrapper(wrapper)?
            .into_iter()
            .map(|bin| (bin, 1.0))
            .collect())
    }

    /// Returns the bins overlapped by the wrapped particle's range with the
    /// fraction of the range inside each.
    fn calculate_bin_indices_and_weights_of_range(
        &self,
        wrapper: &ObserverParticleStateWrapper<'_>,
    ) -> Result<BinIndexWeightPairArray>;

    /// Writes `"<Name> Bin: <boundaries>"` for one bin.
    fn print_boundaries_of_bin(&self, out: &mut dyn fmt::Write, bin_index: usize) -> Result<()>;

    /// Writes `"<Name> Bin Boundaries: ..."`.
    fn print(&self, out: &mut dyn fmt::Write) -> Result<()>;

    /// Returns the description of one bin.
    fn bin_description(&self, bin_index: usize) -> Result<String> {
        let mut description = String::new();
        self.print_boundaries_of_bin(&mut description, bin_index)?;
        Ok(description)
    }
}

/// Discretization of any one phase-space dimension.
///
/// Each variant pairs a dimension with the binning strategy it supports.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "dimension", rename_all = "snake_case")
)]
pub enum ObserverDimensionDiscretization {
    /// Ordered continuous cosine bins.
    Cosine(ObserverCosineDimensionDiscretization),
    /// Ordered continuous source energy bins.
    SourceEnergy(ObserverSourceEnergyDimensionDiscretization),
    /// Ordered continuous energy bins.
    Energy(ObserverEnergyDimensionDiscretization),
    /// Ordered continuous source time bins.
    SourceTime(ObserverSourceTimeDimensionDiscretization),
    /// Ordered continuous time bins.
    Time(ObserverTimeDimensionDiscretization),
    /// Ordered discrete collision number bins.
    CollisionNumber(ObserverCollisionNumberDimensionDiscretization),
    /// Unordered, possibly overlapping source id sets.
    SourceId(ObserverSourceIdDimensionDiscretization),
    /// PQLA direction bins.
    Direction(ObserverDirectionDimensionDiscretization),
}

macro_rules! dispatch {
    ($self:ident, $inner:ident => $call:expr) => {
        match $self {
            Self::Cosine($inner) => $call,
            Self::SourceEnergy($inner) => $call,
            Self::Energy($inner) => $call,
            Self::SourceTime($inner) => $call,
            Self::Time($inner) => $call,
            Self::CollisionNumber($inner) => $call,
            Self::SourceId($inner) => $call,
            Self::Direction($inner) => $call,
        }
    };
}

impl DimensionDiscretization for ObserverDimensionDiscretization {
    fn dimension(&self) -> ObserverPhaseSpaceDimension {
        dispatch!(self, d => d.dimension())
    }

    fn number_of_bins(&self) -> usize {
        dispatch!(self, d => d.number_of_bins())
    }

    fn is_value_in_discretization(&self, point: &PhaseSpacePoint) -> bool {
        dispatch!(self, d => d.is_value_in_discretization(point))
    }

    fn is_wrapper_in_discretization(&self, wrapper: &ObserverParticleStateWrapper<'_>) -> bool {
        dispatch!(self, d => d.is_wrapper_in_discretization(wrapper))
    }

    fn does_range_intersect_discretization(
        &self,
        wrapper: &ObserverParticleStateWrapper<'_>,
    ) -> bool {
        dispatch!(self, d => d.does_range_intersect_discretization(wrapper))
    }

    fn calculate_bin_indices_of_value(&self, point: &PhaseSpacePoint) -> Result<BinIndexArray> {
        dispatch!(self, d => d.calculate_bin_indices_of_value(point))
    }

    fn calculate_bin_indices_of_wrapper(
        &self,
        wrapper: &ObserverParticleStateWrapper<'_>,
    ) -> Result<BinIndexArray> {
        dispatch!(self, d => d.calculate_bin_indices_of_wrapper(wrapper))
    }

    fn calculate_bin_indices_and_weights_of_value(
        &self,
        wrapper: &ObserverParticleStateWrapper<'_>,
    ) -> Result<BinIndexWeightPairArray> {
        dispatch!(self, d => d.calculate_bin_indices_and_weights_of_value(wrapper))
    }

    fn calculate_bin_indices_and_weights_of_range(
        &self,
        wrapper: &ObserverParticleStateWrapper<'_>,
    ) -> Result<BinIndexWeightPairArray> {
        dispatch!(self, d => d.calculate_bin_indices_and_weights_of_range(wrapper))
    }

    fn print_boundaries_of_bin(&self, out: &mut dyn fmt::Write, bin_index: usize) -> Result<()> {
        dispatch!(self, d => d.print_boundaries_of_bin(out, bin_index))
    }

    fn print(&self, out: &mut dyn fmt::Write) -> Result<()> {
        dispatch!(self, d => d.print(out))
    }
}

impl fmt::Display for ObserverDimensionDiscretization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.print(f).map_err(|_| fmt::Error)
    }
}

macro_rules! impl_from_strategy {
    ($($variant:ident => $strategy:ty),* $(,)?) => {
        $(
            impl From<$strategy> for ObserverDimensionDiscretization {
                fn from(discretization: $strategy) -> Self {
                    Self::$variant(discretization)
                }
            }
        )*
    };
}

impl_from_strategy! {
    Cosine => ObserverCosineDimensionDiscretization,
    SourceEnergy => ObserverSourceEnergyDimensionDiscretization,
    Energy => ObserverEnergyDimensionDiscretization,
    SourceTime => ObserverSourceTimeDimensionDiscretization,
    Time => ObserverTimeDimensionDiscretization,
    CollisionNumber => ObserverCollisionNumberDimensionDiscretization,
    SourceId => ObserverSourceIdDimensionDiscretization,
    Direction => ObserverDirectionDimensionDiscretization,
}

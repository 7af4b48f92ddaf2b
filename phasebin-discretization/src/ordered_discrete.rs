//! Ordered discrete dimension discretization (collision number).
//!
//! `N` strictly increasing boundaries define `N` bins: `[0, b0]`,
//! `(b0, b1]`, ..., `(bN-2, bN-1]`. Values above the last boundary are
//! outside of the discretization; use `u32::MAX` as the last boundary to
//! bin every remaining count together.

use crate::dimension::{BinIndexArray, BinIndexWeightPairArray, DimensionDiscretization};
use phasebin_core::{
    Error, ObserverParticleStateWrapper, ObserverPhaseSpaceDimension, OrderedCountDimension,
    PhaseSpacePoint, Result,
};
use std::fmt;
use std::marker::PhantomData;

/// Bins of an ordered count dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedDiscreteDiscretization<D> {
    boundaries: Vec<u32>,
    _dimension: PhantomData<D>,
}

impl<D: OrderedCountDimension> OrderedDiscreteDiscretization<D> {
    /// Creates a discretization from strictly increasing upper bin limits.
    ///
    /// Bin 0 holds `[0, b0]` and bin `i` holds `(b(i-1), bi]`. Values above
    /// the last boundary are outside the discretization. Use `u32::MAX` as
    /// the last boundary to make the top bin catch every larger count.
    pub fn new(boundaries: Vec<u32>) -> Result<Self> {
        if boundaries.is_empty() {
            return Err(Error::TooFewBoundaries {
                dimension: D::DIMENSION,
                required: 1,
                actual: 0,
            });
        }

        if let Some(index) = boundaries.windows(2).position(|pair| pair[1] <= pair[0]) {
            return Err(Error::UnsortedBoundaries {
                dimension: D::DIMENSION,
                index: index + 1,
            });
        }

        log::debug!(
            "created {} discretization with {} bins",
            D::name(),
            boundaries.len()
        );

        Ok(Self {
            boundaries,
            _dimension: PhantomData,
        })
    }

    /// Returns the upper limit of every bin.
    #[must_use]
    pub fn boundaries(&self) -> &[u32] {
        &self.boundaries
    }

    /// Returns true if the value is at most the last boundary.
    #[must_use]
    pub fn contains_value(&self, value: u32) -> bool {
        self.boundaries
            .last()
            .is_some_and(|&upper| value <= upper)
    }

    /// Returns the bin containing the value.
    #[must_use]
    pub fn bin_index(&self, value: u32) -> Option<usize> {
        let bin = self.boundaries.partition_point(|&boundary| boundary < value);
        (bin < self.boundaries.len()).then_some(bin)
    }

    /// Returns the inclusive lower and upper value of a bin.
    #[must_use]
    pub fn bin_limits(&self, bin_index: usize) -> Option<(u32, u32)> {
        let upper = *self.boundaries.get(bin_index)?;
        let lower = if bin_index == 0 {
            D::lower_bound()
        } else {
            self.boundaries[bin_index - 1] + 1
        };

        Some((lower, upper))
    }

    fn single_bin(&self, value: u32) -> Result<BinIndexArray> {
        self.bin_index(value)
            .map(|bin| vec![bin])
            .ok_or(Error::ValueNotInDiscretization(D::DIMENSION))
    }
}

impl<D: OrderedCountDimension> DimensionDiscretization for OrderedDiscreteDiscretization<D> {
    fn dimension(&self) -> ObserverPhaseSpaceDimension {
        D::DIMENSION
    }

    fn number_of_bins(&self) -> usize {
        self.boundaries.len()
    }

    fn is_value_in_discretization(&self, point: &PhaseSpacePoint) -> bool {
        D::from_point(point).is_some_and(|value| self.contains_value(value))
    }

    fn is_wrapper_in_discretization(&self, wrapper: &ObserverParticleStateWrapper<'_>) -> bool {
        self.contains_value(D::value(wrapper))
    }

    fn does_range_intersect_discretization(
        &self,
        wrapper: &ObserverParticleStateWrapper<'_>,
    ) -> bool {
        let (start, end) = D::range(wrapper);
        start <= end && self.contains_value(start)
    }

    fn calculate_bin_indices_of_value(&self, point: &PhaseSpacePoint) -> Result<BinIndexArray> {
        let value = D::from_point(point).ok_or(Error::MissingDimensionValue(D::DIMENSION))?;
        self.single_bin(value)
    }

    fn calculate_bin_indices_of_wrapper(
        &self,
        wrapper: &ObserverParticleStateWrapper<'_>,
    ) -> Result<BinIndexArray> {
        self.single_bin(D::value(wrapper))
    }

    fn calculate_bin_indices_and_weights_of_range(
        &self,
        wrapper: &ObserverParticleStateWrapper<'_>,
    ) -> Result<BinIndexWeightPairArray> {
        let (start, _) = D::range(wrapper);
        self.bin_index(start)
            .map(|bin| vec![(bin, 1.0)])
            .ok_or(Error::RangeDoesNotIntersect(D::DIMENSION))
    }

    fn print_boundaries_of_bin(&self, out: &mut dyn fmt::Write, bin_index: usize) -> Result<()> {
        let (lower, upper) = self.bin_limits(bin_index).ok_or(Error::BinIndexOutOfRange {
            dimension: D::DIMENSION,
            index: bin_index,
            bins: self.number_of_bins(),
        })?;

        write!(out, "{} Bin: [{lower},{upper}]", D::name())?;
        Ok(())
    }

    fn print(&self, out: &mut dyn fmt::Write) -> Result<()> {
        write!(out, "{} Bin Boundaries:", D::name())?;
        for boundary in &self.boundaries {
            write!(out, " {boundary}")?;
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::OrderedDiscreteDiscretization;
    use phasebin_core::OrderedCountDimension;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize)]
    struct BoundariesRef<'a> {
        boundaries: &'a [u32],
    }

    #[derive(Deserialize)]
    struct Boundaries {
        boundaries: Vec<u32>,
    }

    impl<D: OrderedCountDimension> Serialize for OrderedDiscreteDiscretization<D> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            BoundariesRef {
                boundaries: &self.boundaries,
            }
            .serialize(serializer)
        }
    }

    impl<'de, D: OrderedCountDimension> Deserialize<'de> for OrderedDiscreteDiscretization<D> {
        fn deserialize<De: Deserializer<'de>>(deserializer: De) -> Result<Self, De::Error> {
            let repr = Boundaries::deserialize(deserializer)?;
            Self::new(repr.boundaries).map_err(De::Error::custom)
        }
    }
}

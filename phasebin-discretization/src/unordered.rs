//! Unordered discrete dimension discretization (source id).
//!
//! Every bin is an explicit set of admissible values. Sets may overlap, in
//! which case a value belongs to several bins at once.

use crate::dimension::{BinIndexArray, BinIndexWeightPairArray, DimensionDiscretization};
use phasebin_core::{
    Error, ObserverParticleStateWrapper, ObserverPhaseSpaceDimension, PhaseSpacePoint, Result,
    UnorderedCountDimension,
};
use std::collections::BTreeSet;
use std::fmt;
use std::marker::PhantomData;

/// Bins of an unordered count dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnorderedDiscreteDiscretization<D> {
    bins: Vec<BTreeSet<u32>>,
    _dimension: PhantomData<D>,
}

impl<D: UnorderedCountDimension> UnorderedDiscreteDiscretization<D> {
    /// Creates a discretization from the value set of every bin.
    pub fn new<I, B>(bins: I) -> Result<Self>
    where
        I: IntoIterator<Item = B>,
        B: IntoIterator<Item = u32>,
    {
        let bins: Vec<BTreeSet<u32>> = bins
            .into_iter()
            .map(|bin| bin.into_iter().collect())
            .collect();

        if bins.is_empty() {
            return Err(Error::TooFewBoundaries {
                dimension: D::DIMENSION,
                required: 1,
                actual: 0,
            });
        }

        if let Some(bin) = bins.iter().position(BTreeSet::is_empty) {
            return Err(Error::EmptyBin {
                dimension: D::DIMENSION,
                bin,
            });
        }

        log::debug!(
            "created {} discretization with {} bins",
            D::name(),
            bins.len()
        );

        Ok(Self {
            bins,
            _dimension: PhantomData,
        })
    }

    /// Returns the value set of every bin.
    #[must_use]
    pub fn bins(&self) -> &[BTreeSet<u32>] {
        &self.bins
    }

    /// Returns true if any bin contains the value.
    #[must_use]
    pub fn contains_value(&self, value: u32) -> bool {
        self.bins.iter().any(|bin| bin.contains(&value))
    }

    /// Returns every bin containing the value, in bin order.
    #[must_use]
    pub fn bin_indices(&self, value: u32) -> BinIndexArray {
        self.bins
            .iter()
            .enumerate()
            .filter(|(_, bin)| bin.contains(&value))
            .map(|(index, _)| index)
            .collect()
    }

    fn matching_bins(&self, value: u32) -> Result<BinIndexArray> {
        let bins = self.bin_indices(value);
        if bins.is_empty() {
            Err(Error::ValueNotInDiscretization(D::DIMENSION))
        } else {
            Ok(bins)
        }
    }
}

fn write_set(out: &mut dyn fmt::Write, bin: &BTreeSet<u32>) -> fmt::Result {
    out.write_char('{')?;
    for (position, value) in bin.iter().enumerate() {
        if position > 0 {
            out.write_char(',')?;
        }
        write!(out, "{value}")?;
    }
    out.write_char('}')
}

impl<D: UnorderedCountDimension> DimensionDiscretization for UnorderedDiscreteDiscretization<D> {
    fn dimension(&self) -> ObserverPhaseSpaceDimension {
        D::DIMENSION
    }

    fn number_of_bins(&self) -> usize {
        self.bins.len()
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
        self.is_wrapper_in_discretization(wrapper)
    }

    fn calculate_bin_indices_of_value(&self, point: &PhaseSpacePoint) -> Result<BinIndexArray> {
        let value = D::from_point(point).ok_or(Error::MissingDimensionValue(D::DIMENSION))?;
        self.matching_bins(value)
    }

    fn calculate_bin_indices_of_wrapper(
        &self,
        wrapper: &ObserverParticleStateWrapper<'_>,
    ) -> Result<BinIndexArray> {
        self.matching_bins(D::value(wrapper))
    }

    fn calculate_bin_indices_and_weights_of_range(
        &self,
        wrapper: &ObserverParticleStateWrapper<'_>,
    ) -> Result<BinIndexWeightPairArray> {
        let bins = self.bin_indices(D::value(wrapper));
        if bins.is_empty() {
            return Err(Error::RangeDoesNotIntersect(D::DIMENSION));
        }

        Ok(bins.into_iter().map(|bin| (bin, 1.0)).collect())
    }

    fn print_boundaries_of_bin(&self, out: &mut dyn fmt::Write, bin_index: usize) -> Result<()> {
        let bin = self.bins.get(bin_index).ok_or(Error::BinIndexOutOfRange {
            dimension: D::DIMENSION,
            index: bin_index,
            bins: self.number_of_bins(),
        })?;

        write!(out, "{} Bin: ", D::name())?;
        write_set(out, bin)?;
        Ok(())
    }

    fn print(&self, out: &mut dyn fmt::Write) -> Result<()> {
        write!(out, "{} Bin Boundaries:", D::name())?;
        for bin in &self.bins {
            out.write_char(' ')?;
            write_set(out, bin)?;
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::UnorderedDiscreteDiscretization;
    use phasebin_core::UnorderedCountDimension;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeSet;

    #[derive(Serialize)]
    struct BinsRef<'a> {
        bins: &'a [BTreeSet<u32>],
    }

    #[derive(Deserialize)]
    struct Bins {
        bins: Vec<Vec<u32>>,
    }

    impl<D: UnorderedCountDimension> Serialize for UnorderedDiscreteDiscretization<D> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            BinsRef { bins: &self.bins }.serialize(serializer)
        }
    }

    impl<'de, D: UnorderedCountDimension> Deserialize<'de> for UnorderedDiscreteDiscretization<D> {
        fn deserialize<De: Deserializer<'de>>(deserializer: De) -> Result<Self, De::Error> {
            let repr = Bins::deserialize(deserializer)?;
            Self::new(repr.bins).map_err(De::Error::custom)
        }
    }
}

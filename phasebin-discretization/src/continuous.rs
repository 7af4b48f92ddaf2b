//! Ordered continuous dimension discretization.
//!
//! `N + 1` sorted boundaries define `N` bins. The first bin is closed,
//! `[b0, b1]`, and every later bin is right-closed, `(bi, bi+1]`. Two equal
//! adjacent boundaries define a zero-width line bin which captures exactly
//! the repeated value.

use crate::dimension::{BinIndexArray, BinIndexWeightPairArray, DimensionDiscretization};
use crate::format::format_scientific;
use phasebin_core::{
    ContinuousDimension, Error, ObserverParticleStateWrapper, ObserverPhaseSpaceDimension,
    PhaseSpacePoint, Result,
};
use std::fmt;
use std::marker::PhantomData;

/// Bins of a real valued, ordered dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedContinuousDiscretization<D> {
    boundaries: Vec<f64>,
    has_line_bins: bool,
    _dimension: PhantomData<D>,
}

impl<D: ContinuousDimension> OrderedContinuousDiscretization<D> {
    /// Creates a discretization from sorted bin boundaries.
    ///
    /// At least two boundaries are required, all finite and inside the
    /// dimension domain. An open-ended top bin uses `f64::MAX` as its
    /// upper boundary. A boundary may be repeated once to form a line bin.
    pub fn new(boundaries: Vec<f64>) -> Result<Self> {
        let dimension = D::DIMENSION;

        if boundaries.len() < 2 {
            return Err(Error::TooFewBoundaries {
                dimension,
                required: 2,
                actual: boundaries.len(),
            });
        }

        for &value in &boundaries {
            if !value.is_finite() || value < D::lower_bound() || value > D::upper_bound() {
                return Err(Error::BoundaryOutOfDomain { dimension, value });
            }
        }

        let mut has_line_bins = false;
        for (index, pair) in boundaries.windows(2).enumerate() {
            if pair[1] < pair[0] {
                return Err(Error::UnsortedBoundaries {
                    dimension,
                    index: index + 1,
                });
            }
            if pair[1] <= pair[0] {
                if has_repeat_before(&boundaries, index) {
                    return Err(Error::RepeatedLineBin {
                        dimension,
                        index: index + 1,
                    });
                }
                has_line_bins = true;
            }
        }

        log::debug!(
            "created {} discretization with {} bins",
            D::name(),
            boundaries.len() - 1
        );

        Ok(Self {
            boundaries,
            has_line_bins,
            _dimension: PhantomData,
        })
    }

    /// Returns the bin boundaries.
    #[must_use]
    pub fn boundaries(&self) -> &[f64] {
        &self.boundaries
    }

    /// Returns true if any bin has zero width.
    #[must_use]
    pub fn has_line_bins(&self) -> bool {
        self.has_line_bins
    }

    /// Returns the lowest boundary.
    #[must_use]
    pub fn lower_boundary(&self) -> f64 {
        self.boundaries[0]
    }

    /// Returns the highest boundary.
    #[must_use]
    pub fn upper_boundary(&self) -> f64 {
        self.boundaries[self.boundaries.len() - 1]
    }

    /// Returns true if the value lies between the lowest and highest boundary.
    #[must_use]
    pub fn contains_value(&self, value: f64) -> bool {
        value >= self.lower_boundary() && value <= self.upper_boundary()
    }

    /// Returns the lower and upper boundary of a bin.
    #[must_use]
    pub fn bin_boundaries(&self, bin_index: usize) -> Option<(f64, f64)> {
        if bin_index + 1 < self.boundaries.len() {
            Some((self.boundaries[bin_index], self.boundaries[bin_index + 1]))
        } else {
            None
        }
    }

    /// Returns the bin containing the value.
    ///
    /// A value equal to a repeated boundary belongs to the line bin.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn bin_index(&self, value: f64) -> Option<usize> {
        if !self.contains_value(value) {
            return None;
        }

        let boundaries = &self.boundaries;
        let mut bin = boundaries[1..].partition_point(|&boundary| boundary < value);

        if self.has_line_bins
            && bin + 2 < boundaries.len()
            && boundaries[bin + 1] == value
            && boundaries[bin + 2] == value
        {
            bin += 1;
        }

        Some(bin)
    }

    /// Returns true if the range `[start, end]` overlaps the discretization.
    ///
    /// A range ending at the lowest boundary or starting at the highest
    /// boundary does not intersect. A zero length range is a point and an
    /// inverted range never intersects.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn does_range_intersect(&self, start: f64, end: f64) -> bool {
        if start == end {
            self.contains_value(start)
        } else {
            start < end && start < self.upper_boundary() && end > self.lower_boundary()
        }
    }

    /// Returns every bin overlapped by `[start, end]` with the fraction of
    /// the range that falls inside it.
    ///
    /// The fractions are relative to the full range, so they sum to less
    /// than one when part of the range lies outside the discretization.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn bin_indices_and_weights_of_range(&self, start: f64, end: f64) -> BinIndexWeightPairArray {
        if start == end {
            return self
                .bin_index(start)
                .map(|bin| vec![(bin, 1.0)])
                .unwrap_or_default();
        }

        if !self.does_range_intersect(start, end) {
            return BinIndexWeightPairArray::new();
        }

        let boundaries = &self.boundaries;
        let length = end - start;
        let first_bin = boundaries[1..].partition_point(|&boundary| boundary <= start);

        let mut pairs = BinIndexWeightPairArray::new();
        for bin in first_bin..boundaries.len() - 1 {
            let lower = boundaries[bin];
            if lower >= end {
                break;
            }

            let overlap = boundaries[bin + 1].min(end) - lower.max(start);
            if overlap > 0.0 {
                pairs.push((bin, overlap / length));
            }
        }

        pairs
    }

    fn value_of_point(point: &PhaseSpacePoint) -> Result<f64> {
        D::from_point(point).ok_or(Error::MissingDimensionValue(D::DIMENSION))
    }

    fn single_bin(&self, value: f64) -> Result<BinIndexArray> {
        self.bin_index(value)
            .map(|bin| vec![bin])
            .ok_or(Error::ValueNotInDiscretization(D::DIMENSION))
    }
}

/// Returns true if the boundary pair ending at `index + 1` follows another
/// repeated pair.
#[allow(clippy::float_cmp)]
fn has_repeat_before(boundaries: &[f64], index: usize) -> bool {
    index > 0 && boundaries[index - 1] == boundaries[index]
}

impl<D: ContinuousDimension> DimensionDiscretization for OrderedContinuousDiscretization<D> {
    fn dimension(&self) -> ObserverPhaseSpaceDimension {
        D::DIMENSION
    }

    fn number_of_bins(&self) -> usize {
        self.boundaries.len() - 1
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
        self.does_range_intersect(start, end)
    }

    fn calculate_bin_indices_of_value(&self, point: &PhaseSpacePoint) -> Result<BinIndexArray> {
        self.single_bin(Self::value_of_point(point)?)
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
        let (start, end) = D::range(wrapper);
        let pairs = self.bin_indices_and_weights_of_range(start, end);

        if pairs.is_empty() {
            Err(Error::RangeDoesNotIntersect(D::DIMENSION))
        } else {
            Ok(pairs)
        }
    }

    #[allow(clippy::float_cmp)]
    fn print_boundaries_of_bin(&self, out: &mut dyn fmt::Write, bin_index: usize) -> Result<()> {
        let (lower, upper) =
            self.bin_boundaries(bin_index)
                .ok_or(Error::BinIndexOutOfRange {
                    dimension: D::DIMENSION,
                    index: bin_index,
                    bins: self.number_of_bins(),
                })?;

        let open = if bin_index == 0 || lower == upper {
            '['
        } else {
            '('
        };

        write!(
            out,
            "{} Bin: {open}{},{}]",
            D::name(),
            format_scientific(lower),
            format_scientific(upper)
        )?;
        Ok(())
    }

    fn print(&self, out: &mut dyn fmt::Write) -> Result<()> {
        write!(out, "{} Bin Boundaries:", D::name())?;
        for &boundary in &self.boundaries {
            write!(out, " {}", format_scientific(boundary))?;
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::OrderedContinuousDiscretization;
    use phasebin_core::ContinuousDimension;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize)]
    struct BoundariesRef<'a> {
        boundaries: &'a [f64],
    }

    #[derive(Deserialize)]
    struct Boundaries {
        boundaries: Vec<f64>,
    }

    impl<D: ContinuousDimension> Serialize for OrderedContinuousDiscretization<D> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            BoundariesRef {
                boundaries: &self.boundaries,
            }
            .serialize(serializer)
        }
    }

    impl<'de, D: ContinuousDimension> Deserialize<'de> for OrderedContinuousDiscretization<D> {
        fn deserialize<De: Deserializer<'de>>(deserializer: De) -> Result<Self, De::Error> {
            let repr = Boundaries::deserialize(deserializer)?;
            Self::new(repr.boundaries).map_err(De::Error::custom)
        }
    }
}

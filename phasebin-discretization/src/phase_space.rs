//! Composite observer phase-space discretization.
//!
//! Dimensions are encoded into one flat bin index in the order they were
//! assigned, the first assigned dimension varying fastest:
//!
//! `flat = Σ_d local[d] × Π_{d' < d} bins[d']`
//!
//! Dimensions that were never assigned behave as a single bin that
//! accepts every value.

use crate::dimension::{
    BinIndexArray, BinIndexWeightPairArray, DimensionDiscretization,
    ObserverDimensionDiscretization,
};
use phasebin_core::{
    Error, ObserverParticleStateWrapper, ObserverPhaseSpaceDimension, PhaseSpacePoint, Result,
};
use rayon::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A dimension discretization assigned to a phase space.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AssignedDimension {
    discretization: Arc<ObserverDimensionDiscretization>,
    /// Range queries use the dimension's range rather than its value.
    #[cfg_attr(feature = "serde", serde(default))]
    range_dimension: bool,
}

/// Multi-dimensional discretization of the observer phase space.
///
/// Discretizations are shared through `Arc`, so a single dimension
/// discretization may be reused by many phase spaces. Assignment requires
/// `&mut self`; once set up, every query takes `&self` and the phase space
/// can be shared between threads.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(from = "Vec<AssignedDimension>", into = "Vec<AssignedDimension>")
)]
pub struct ObserverPhaseSpaceDiscretization {
    dimensions: Vec<AssignedDimension>,
}

impl ObserverPhaseSpaceDiscretization {
    /// Creates a phase space without any discretized dimension.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns a discretization to its dimension.
    ///
    /// When `range_dimension` is set, range queries attribute the wrapped
    /// particle's range of the dimension (the track segment times for
    /// [`ObserverPhaseSpaceDimension::Time`]) to every overlapped bin with
    /// the overlapped fraction as weight. Otherwise the dimension is binned
    /// by its current value.
    ///
    /// Assigning a dimension that already has a discretization replaces it
    /// in place, keeping its position in the index encoding.
    pub fn assign_discretization_to_dimension(
        &mut self,
        discretization: Arc<ObserverDimensionDiscretization>,
        range_dimension: bool,
    ) {
        let dimension = discretization.dimension();
        let assigned = AssignedDimension {
            discretization,
            range_dimension,
        };

        if let Some(existing) = self
            .dimensions
            .iter_mut()
            .find(|entry| entry.discretization.dimension() == dimension)
        {
            log::warn!("replacing the existing {dimension} discretization");
            *existing = assigned;
        } else {
            log::debug!(
                "assigned {dimension} discretization with {} bins",
                assigned.discretization.number_of_bins()
            );
            self.dimensions.push(assigned);
        }
    }

    /// Returns the discretization of a dimension.
    #[must_use]
    pub fn dimension_discretization(
        &self,
        dimension: ObserverPhaseSpaceDimension,
    ) -> Option<&Arc<ObserverDimensionDiscretization>> {
        self.find(dimension).map(|entry| &entry.discretization)
    }

    /// Returns true if the dimension has been assigned a discretization.
    #[must_use]
    pub fn does_dimension_have_discretization(&self, dimension: ObserverPhaseSpaceDimension) -> bool {
        self.find(dimension).is_some()
    }

    /// Returns true if the dimension is binned by range.
    #[must_use]
    pub fn is_range_dimension(&self, dimension: ObserverPhaseSpaceDimension) -> bool {
        self.find(dimension).is_some_and(|entry| entry.range_dimension)
    }

    /// Returns the discretized dimensions in assignment order.
    #[must_use]
    pub fn discretized_dimensions(&self) -> Vec<ObserverPhaseSpaceDimension> {
        self.dimensions
            .iter()
            .map(|entry| entry.discretization.dimension())
            .collect()
    }

    /// Returns the discretized dimensions as a set.
    #[must_use]
    pub fn discretized_dimension_set(&self) -> BTreeSet<ObserverPhaseSpaceDimension> {
        self.dimensions
            .iter()
            .map(|entry| entry.discretization.dimension())
            .collect()
    }

    /// Returns the total number of bins.
    #[must_use]
    pub fn number_of_bins(&self) -> usize {
        self.dimensions
            .iter()
            .map(|entry| entry.discretization.number_of_bins())
            .product()
    }

    /// Returns the number of bins of one dimension (1 if not discretized).
    #[must_use]
    pub fn number_of_bins_of_dimension(&self, dimension: ObserverPhaseSpaceDimension) -> usize {
        self.find(dimension)
            .map_or(1, |entry| entry.discretization.number_of_bins())
    }

    /// Returns true if every discretized dimension accepts the point's value.
    #[must_use]
    pub fn is_point_in_discretization(&self, point: &PhaseSpacePoint) -> bool {
        self.dimensions
            .iter()
            .all(|entry| entry.discretization.is_value_in_discretization(point))
    }

    /// Returns true if every discretized dimension accepts the wrapped
    /// particle's value.
    #[must_use]
    pub fn is_wrapper_in_discretization(&self, wrapper: &ObserverParticleStateWrapper<'_>) -> bool {
        self.dimensions
            .iter()
            .all(|entry| entry.discretization.is_wrapper_in_discretization(wrapper))
    }

    /// Returns true if the wrapped particle overlaps every discretized
    /// dimension: by range for range dimensions, by value otherwise.
    #[must_use]
    pub fn does_range_intersect_discretization(
        &self,
        wrapper: &ObserverParticleStateWrapper<'_>,
    ) -> bool {
        self.dimensions.iter().all(|entry| {
            if entry.range_dimension {
                entry
                    .discretization
                    .does_range_intersect_discretization(wrapper)
            } else {
                entry.discretization.is_wrapper_in_discretization(wrapper)
            }
        })
    }

    /// Returns every flat bin index the point belongs to.
    ///
    /// More than one index is returned when a dimension has overlapping bins.
    pub fn calculate_bin_indices_of_point(&self, point: &PhaseSpacePoint) -> Result<BinIndexArray> {
        let local_bins = self
            .dimensions
            .iter()
            .map(|entry| entry.discretization.calculate_bin_indices_of_value(point))
            .collect::<Result<Vec<_>>>()?;

        Ok(self.combine_bin_indices(&local_bins))
    }

    /// Returns every flat bin index the wrapped particle belongs to.
    pub fn calculate_bin_indices_of_wrapper(
        &self,
        wrapper: &ObserverParticleStateWrapper<'_>,
    ) -> Result<BinIndexArray> {
        let local_bins = self
            .dimensions
            .iter()
            .map(|entry| entry.discretization.calculate_bin_indices_of_wrapper(wrapper))
            .collect::<Result<Vec<_>>>()?;

        Ok(self.combine_bin_indices(&local_bins))
    }

    /// Returns every flat bin index overlapped by the wrapped particle with
    /// its weight.
    ///
    /// Range dimensions contribute the fraction of their range inside each
    /// bin, the other dimensions a weight of one. The weight of a flat bin
    /// is the product over dimensions.
    pub fn calculate_bin_indices_and_weights_of_range(
        &self,
        wrapper: &ObserverParticleStateWrapper<'_>,
    ) -> Result<BinIndexWeightPairArray> {
        let local_pairs = self
            .dimensions
            .iter()
            .map(|entry| {
                if entry.range_dimension {
                    entry
                        .discretization
                        .calculate_bin_indices_and_weights_of_range(wrapper)
                } else {
                    entry
                        .discretization
                        .calculate_bin_indices_and_weights_of_value(wrapper)
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(self.combine(&local_pairs))
    }

    /// Bins many points in parallel.
    pub fn calculate_bin_indices_of_points(
        &self,
        points: &[PhaseSpacePoint],
    ) -> Vec<Result<BinIndexArray>> {
        points
            .par_iter()
            .map(|point| self.calculate_bin_indices_of_point(point))
            .collect()
    }

    /// Encodes per-dimension bin indices into a flat index.
    ///
    /// Discretized dimensions missing from the map use bin 0. A nonzero
    /// index for a dimension without a discretization is out of range.
    pub fn calculate_discretization_index(
        &self,
        dimension_bin_indices: &HashMap<ObserverPhaseSpaceDimension, usize>,
    ) -> Result<usize> {
        for (&dimension, &index) in dimension_bin_indices {
            if index > 0 && !self.does_dimension_have_discretization(dimension) {
                return Err(Error::BinIndexOutOfRange {
                    dimension,
                    index,
                    bins: 1,
                });
            }
        }

        let mut flat_index = 0;
        let mut radix = 1;
        for entry in &self.dimensions {
            let dimension = entry.discretization.dimension();
            let bins = entry.discretization.number_of_bins();
            let index = dimension_bin_indices.get(&dimension).copied().unwrap_or(0);

            if index >= bins {
                return Err(Error::BinIndexOutOfRange {
                    dimension,
                    index,
                    bins,
                });
            }

            flat_index += index * radix;
            radix *= bins;
        }

        Ok(flat_index)
    }

    /// Returns the per-dimension bin descriptions of a flat index, joined
    /// with `", "`. The name is empty when no dimension is discretized.
    pub fn bin_name(&self, index: usize) -> Result<String> {
        let bins = self.number_of_bins();
        if index >= bins {
            return Err(Error::DiscretizationIndexOutOfRange { index, bins });
        }

        let mut remainder = index;
        let mut descriptions = Vec::with_capacity(self.dimensions.len());
        for entry in &self.dimensions {
            let dimension_bins = entry.discretization.number_of_bins();
            descriptions.push(
                entry
                    .discretization
                    .bin_description(remainder % dimension_bins)?,
            );
            remainder /= dimension_bins;
        }

        Ok(descriptions.join(", "))
    }

    /// Writes the bin boundaries of every discretized dimension, one line each.
    pub fn print(&self, out: &mut dyn fmt::Write) -> Result<()> {
        for entry in &self.dimensions {
            entry.discretization.print(out)?;
            out.write_char('\n')?;
        }
        Ok(())
    }

    /// Writes the bin boundaries of one dimension. Nothing is written for a
    /// dimension without a discretization.
    pub fn print_dimension(
        &self,
        out: &mut dyn fmt::Write,
        dimension: ObserverPhaseSpaceDimension,
    ) -> Result<()> {
        match self.find(dimension) {
            Some(entry) => entry.discretization.print(out),
            None => Ok(()),
        }
    }

    /// Writes the boundaries of one bin of one dimension.
    pub fn print_bin(
        &self,
        out: &mut dyn fmt::Write,
        dimension: ObserverPhaseSpaceDimension,
        bin_index: usize,
    ) -> Result<()> {
        match self.find(dimension) {
            Some(entry) => entry.discretization.print_boundaries_of_bin(out, bin_index),
            None if bin_index == 0 => Ok(()),
            None => Err(Error::BinIndexOutOfRange {
                dimension,
                index: bin_index,
                bins: 1,
            }),
        }
    }

    fn find(&self, dimension: ObserverPhaseSpaceDimension) -> Option<&AssignedDimension> {
        self.dimensions
            .iter()
            .find(|entry| entry.discretization.dimension() == dimension)
    }

    fn combine_bin_indices(&self, local_bins: &[BinIndexArray]) -> BinIndexArray {
        let local_pairs: Vec<BinIndexWeightPairArray> = local_bins
            .iter()
            .map(|bins| bins.iter().map(|&bin| (bin, 1.0)).collect())
            .collect();

        self.combine(&local_pairs)
            .into_iter()
            .map(|(index, _)| index)
            .collect()
    }

    /// Cartesian product of the per-dimension bins. Earlier dimensions vary
    /// fastest in the output, matching the index encoding.
    fn combine(&self, local_pairs: &[BinIndexWeightPairArray]) -> BinIndexWeightPairArray {
        let mut combined: BinIndexWeightPairArray = vec![(0, 1.0)];
        let mut radix = 1;

        for (entry, pairs) in self.dimensions.iter().zip(local_pairs) {
            let mut next = Vec::with_capacity(combined.len() * pairs.len());
            for &(local_index, local_weight) in pairs {
                for &(index, weight) in &combined {
                    next.push((index + local_index * radix, weight * local_weight));
                }
            }

            combined = next;
            radix *= entry.discretization.number_of_bins();
        }

        combined
    }
}

impl fmt::Display for ObserverPhaseSpaceDiscretization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.print(f).map_err(|_| fmt::Error)
    }
}

#[cfg(feature = "serde")]
impl From<Vec<AssignedDimension>> for ObserverPhaseSpaceDiscretization {
    fn from(dimensions: Vec<AssignedDimension>) -> Self {
        let mut discretization = Self::new();
        for entry in dimensions {
            discretization
                .assign_discretization_to_dimension(entry.discretization, entry.range_dimension);
        }
        discretization
    }
}

#[cfg(feature = "serde")]
impl From<ObserverPhaseSpaceDiscretization> for Vec<AssignedDimension> {
    fn from(discretization: ObserverPhaseSpaceDiscretization) -> Self {
        discretization.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension::{
        ObserverCollisionNumberDimensionDiscretization, ObserverCosineDimensionDiscretization,
        ObserverEnergyDimensionDiscretization, ObserverSourceIdDimensionDiscretization,
    };
    use phasebin_core::{DimensionValue, ParticleStateData};

    fn cosine() -> Arc<ObserverDimensionDiscretization> {
        Arc::new(
            ObserverCosineDimensionDiscretization::new(vec![-1.0, -1.0 / 3.0, 1.0 / 3.0, 1.0])
                .unwrap()
                .into(),
        )
    }

    fn collision_number() -> Arc<ObserverDimensionDiscretization> {
        Arc::new(
            ObserverCollisionNumberDimensionDiscretization::new(vec![1, 2, 3, 5])
                .unwrap()
                .into(),
        )
    }

    #[test]
    fn test_empty_phase_space() {
        let discretization = ObserverPhaseSpaceDiscretization::new();
        let photon = ParticleStateData::photon(0);
        let wrapper = ObserverParticleStateWrapper::new(&photon);

        assert_eq!(discretization.number_of_bins(), 1);
        assert_eq!(
            discretization.number_of_bins_of_dimension(ObserverPhaseSpaceDimension::Energy),
            1
        );
        assert!(discretization.is_point_in_discretization(&PhaseSpacePoint::new()));
        assert_eq!(
            discretization
                .calculate_bin_indices_of_point(&PhaseSpacePoint::new())
                .unwrap(),
            vec![0]
        );
        assert_eq!(
            discretization
                .calculate_bin_indices_and_weights_of_range(&wrapper)
                .unwrap(),
            vec![(0, 1.0)]
        );
        assert_eq!(discretization.bin_name(0).unwrap(), "");
        assert_eq!(discretization.to_string(), "");
    }

    #[test]
    fn test_reassignment_keeps_position() {
        let mut discretization = ObserverPhaseSpaceDiscretization::new();
        discretization.assign_discretization_to_dimension(cosine(), false);
        discretization.assign_discretization_to_dimension(collision_number(), false);

        let energy = Arc::new(
            ObserverEnergyDimensionDiscretization::new(vec![0.0, 1.0])
                .unwrap()
                .into(),
        );
        discretization.assign_discretization_to_dimension(energy, false);

        let finer_cosine = Arc::new(
            ObserverCosineDimensionDiscretization::new(vec![-1.0, 0.0, 1.0])
                .unwrap()
                .into(),
        );
        discretization.assign_discretization_to_dimension(finer_cosine, true);

        assert_eq!(
            discretization.discretized_dimensions(),
            vec![
                ObserverPhaseSpaceDimension::Cosine,
                ObserverPhaseSpaceDimension::CollisionNumber,
                ObserverPhaseSpaceDimension::Energy,
            ]
        );
        assert_eq!(
            discretization.number_of_bins_of_dimension(ObserverPhaseSpaceDimension::Cosine),
            2
        );
        assert!(discretization.is_range_dimension(ObserverPhaseSpaceDimension::Cosine));
        assert!(!discretization.is_range_dimension(ObserverPhaseSpaceDimension::Energy));
        assert_eq!(discretization.number_of_bins(), 8);
    }

    #[test]
    fn test_missing_point_value() {
        let mut discretization = ObserverPhaseSpaceDiscretization::new();
        discretization.assign_discretization_to_dimension(cosine(), false);

        let point = PhaseSpacePoint::new().with_value(DimensionValue::Energy(1.0));
        assert!(!discretization.is_point_in_discretization(&point));
        assert!(matches!(
            discretization.calculate_bin_indices_of_point(&point),
            Err(Error::MissingDimensionValue(ObserverPhaseSpaceDimension::Cosine))
        ));
    }

    #[test]
    fn test_discretization_index() {
        let mut discretization = ObserverPhaseSpaceDiscretization::new();
        discretization.assign_discretization_to_dimension(
            Arc::new(
                ObserverEnergyDimensionDiscretization::new(vec![0.0, 1.0, 2.0, 3.0])
                    .unwrap()
                    .into(),
            ),
            false,
        );
        discretization.assign_discretization_to_dimension(cosine(), false);

        let indices = HashMap::from([
            (ObserverPhaseSpaceDimension::Cosine, 1),
            (ObserverPhaseSpaceDimension::Energy, 2),
        ]);
        assert_eq!(discretization.calculate_discretization_index(&indices).unwrap(), 5);

        let out_of_range = HashMap::from([(ObserverPhaseSpaceDimension::Cosine, 3)]);
        assert!(discretization
            .calculate_discretization_index(&out_of_range)
            .is_err());

        let undiscretized = HashMap::from([(ObserverPhaseSpaceDimension::Time, 1)]);
        assert!(discretization
            .calculate_discretization_index(&undiscretized)
            .is_err());
    }

    #[test]
    fn test_bin_names() {
        let mut discretization = ObserverPhaseSpaceDiscretization::new();
        discretization.assign_discretization_to_dimension(cosine(), false);
        discretization.assign_discretization_to_dimension(collision_number(), false);

        assert_eq!(
            discretization.bin_name(0).unwrap(),
            "Cosine Bin: [-1.000000000000000000e+00,-3.333333333333333148e-01], \
             Collision Number Bin: [0,1]"
        );
        assert_eq!(
            discretization.bin_name(11).unwrap(),
            "Cosine Bin: (3.333333333333333148e-01,1.000000000000000000e+00], \
             Collision Number Bin: [4,5]"
        );
        assert!(matches!(
            discretization.bin_name(12),
            Err(Error::DiscretizationIndexOutOfRange { index: 12, bins: 12 })
        ));
    }

    #[test]
    fn test_print_dimension_and_bin() {
        let mut discretization = ObserverPhaseSpaceDiscretization::new();
        discretization.assign_discretization_to_dimension(collision_number(), false);
        discretization.assign_discretization_to_dimension(
            Arc::new(
                ObserverSourceIdDimensionDiscretization::new(vec![vec![0], vec![0, 1]])
                    .unwrap()
                    .into(),
            ),
            false,
        );

        let mut out = String::new();
        discretization
            .print_dimension(&mut out, ObserverPhaseSpaceDimension::SourceId)
            .unwrap();
        assert_eq!(out, "Source Id Bin Boundaries: {0} {0,1}");

        out.clear();
        discretization
            .print_bin(&mut out, ObserverPhaseSpaceDimension::CollisionNumber, 1)
            .unwrap();
        assert_eq!(out, "Collision Number Bin: [2,2]");

        out.clear();
        discretization
            .print_dimension(&mut out, ObserverPhaseSpaceDimension::Energy)
            .unwrap();
        assert!(out.is_empty());

        assert_eq!(
            discretization.to_string(),
            "Collision Number Bin Boundaries: 1 2 3 5\nSource Id Bin Boundaries: {0} {0,1}\n"
        );
    }

    #[test]
    fn test_parallel_batch_matches_serial() {
        let mut discretization = ObserverPhaseSpaceDiscretization::new();
        discretization.assign_discretization_to_dimension(cosine(), false);
        discretization.assign_discretization_to_dimension(collision_number(), false);

        let points: Vec<PhaseSpacePoint> = (0..64u32)
            .map(|i| {
                PhaseSpacePoint::new()
                    .with_value(DimensionValue::Cosine(-1.0 + f64::from(i) / 32.0))
                    .with_value(DimensionValue::CollisionNumber(i % 7))
            })
            .collect();

        let batch = discretization.calculate_bin_indices_of_points(&points);
        assert_eq!(batch.len(), points.len());
        for (point, result) in points.iter().zip(batch) {
            match discretization.calculate_bin_indices_of_point(point) {
                Ok(expected) => assert_eq!(result.unwrap(), expected),
                Err(_) => assert!(result.is_err()),
            }
        }
    }

    #[test]
    fn test_shared_between_threads() {
        let mut discretization = ObserverPhaseSpaceDiscretization::new();
        discretization.assign_discretization_to_dimension(collision_number(), false);
        let shared = Arc::new(discretization);

        let handles: Vec<_> = (0..4u32)
            .map(|collisions| {
                let shared = Arc::clone(&shared);
                std::thread::spawn(move || {
                    let point = PhaseSpacePoint::new()
                        .with_value(DimensionValue::CollisionNumber(collisions));
                    shared.calculate_bin_indices_of_point(&point).unwrap()
                })
            })
            .collect();

        let results: Vec<BinIndexArray> =
            handles.into_iter().map(|handle| handle.join().unwrap()).collect();
        assert_eq!(results, vec![vec![0], vec![0], vec![1], vec![2]]);
    }
}

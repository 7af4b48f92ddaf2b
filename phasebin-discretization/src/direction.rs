//! Direction discretization using a PQLA tessellation of the unit sphere.
//!
//! The sphere is mapped onto the octahedron `|x| + |y| + |z| = 1`. Every
//! octant face is cut into a `k x k` triangular grid, giving `8k²` bins for
//! quadrature order `k`. Bin `o * k² + t` is triangle `t` of octant `o`,
//! where bit 0, 1 and 2 of `o` are set for negative x, y and z.
//!
//! Within an octant the triangles are numbered row by row. Row `i` covers
//! `i <= k|x| < i + 1` and holds `2(k - i) - 1` triangles, alternating
//! between upward (even) and downward (odd) ones along increasing `|y|`.

use crate::dimension::{BinIndexArray, BinIndexWeightPairArray, DimensionDiscretization};
use phasebin_core::{
    DimensionTraits, DirectionDimension, Error, ObserverParticleStateWrapper,
    ObserverPhaseSpaceDimension, PhaseSpacePoint, Result,
};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// PQLA direction bins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DirectionDiscretization {
    quadrature_order: u32,
    forward_binning: bool,
}

impl DirectionDiscretization {
    /// Largest supported quadrature order.
    pub const MAX_QUADRATURE_ORDER: u32 = 1 << 14;

    /// Creates a tessellation of the given order.
    ///
    /// With `forward_binning` disabled a direction is binned by the
    /// direction it came from, i.e. its negation.
    pub fn new(quadrature_order: u32, forward_binning: bool) -> Result<Self> {
        if quadrature_order == 0 || quadrature_order > Self::MAX_QUADRATURE_ORDER {
            return Err(Error::InvalidQuadratureOrder(quadrature_order));
        }

        log::debug!(
            "created PQLA direction discretization of order {quadrature_order} ({} bins)",
            8 * quadrature_order as usize * quadrature_order as usize
        );

        Ok(Self {
            quadrature_order,
            forward_binning,
        })
    }

    /// Returns the quadrature order `k`.
    #[must_use]
    pub fn quadrature_order(&self) -> u32 {
        self.quadrature_order
    }

    /// Returns true if directions are binned as they are.
    #[must_use]
    pub fn is_forward_binning(&self) -> bool {
        self.forward_binning
    }

    fn triangles_per_octant(&self) -> usize {
        let order = self.quadrature_order as usize;
        order * order
    }

    /// Returns true if the direction can be binned (non-zero and finite).
    #[must_use]
    pub fn contains_direction(direction: [f64; 3]) -> bool {
        let norm: f64 = direction.iter().map(|component| component.abs()).sum();
        norm.is_finite() && norm > 0.0
    }

    /// Returns the bin of a direction. The direction need not be normalized.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn bin_index(&self, direction: [f64; 3]) -> Option<usize> {
        if !Self::contains_direction(direction) {
            return None;
        }

        let [x, y, z] = if self.forward_binning {
            direction
        } else {
            direction.map(|component| -component)
        };

        let octant =
            usize::from(x < 0.0) | (usize::from(y < 0.0) << 1) | (usize::from(z < 0.0) << 2);

        let norm = x.abs() + y.abs() + z.abs();
        let order = self.quadrature_order as usize;
        let scale = f64::from(self.quadrature_order);
        let u = x.abs() / norm * scale;
        let v = y.abs() / norm * scale;

        let row = (u.floor() as usize).min(order - 1);
        let column = (v.floor() as usize).min(order - 1 - row);

        let upward = (u - row as f64) + (v - column as f64) <= 1.0 || row + column == order - 1;
        let triangle = row * (2 * order - row) + 2 * column + usize::from(!upward);

        Some(octant * self.triangles_per_octant() + triangle)
    }

    fn direction_of_point(point: &PhaseSpacePoint) -> Result<[f64; 3]> {
        DirectionDimension::from_point(point)
            .ok_or(Error::MissingDimensionValue(ObserverPhaseSpaceDimension::Direction))
    }

    fn single_bin(&self, direction: [f64; 3]) -> Result<BinIndexArray> {
        self.bin_index(direction)
            .map(|bin| vec![bin])
            .ok_or(Error::ValueNotInDiscretization(
                ObserverPhaseSpaceDimension::Direction,
            ))
    }
}

fn sign(negative: bool) -> char {
    if negative {
        '-'
    } else {
        '+'
    }
}

impl DimensionDiscretization for DirectionDiscretization {
    fn dimension(&self) -> ObserverPhaseSpaceDimension {
        ObserverPhaseSpaceDimension::Direction
    }

    fn number_of_bins(&self) -> usize {
        8 * self.triangles_per_octant()
    }

    fn is_value_in_discretization(&self, point: &PhaseSpacePoint) -> bool {
        DirectionDimension::from_point(point).is_some_and(Self::contains_direction)
    }

    fn is_wrapper_in_discretization(&self, wrapper: &ObserverParticleStateWrapper<'_>) -> bool {
        Self::contains_direction(DirectionDimension::value(wrapper))
    }

    fn does_range_intersect_discretization(
        &self,
        wrapper: &ObserverParticleStateWrapper<'_>,
    ) -> bool {
        self.is_wrapper_in_discretization(wrapper)
    }

    fn calculate_bin_indices_of_value(&self, point: &PhaseSpacePoint) -> Result<BinIndexArray> {
        self.single_bin(Self::direction_of_point(point)?)
    }

    fn calculate_bin_indices_of_wrapper(
        &self,
        wrapper: &ObserverParticleStateWrapper<'_>,
    ) -> Result<BinIndexArray> {
        self.single_bin(DirectionDimension::value(wrapper))
    }

    fn calculate_bin_indices_and_weights_of_range(
        &self,
        wrapper: &ObserverParticleStateWrapper<'_>,
    ) -> Result<BinIndexWeightPairArray> {
        self.bin_index(DirectionDimension::value(wrapper))
            .map(|bin| vec![(bin, 1.0)])
            .ok_or(Error::RangeDoesNotIntersect(
                ObserverPhaseSpaceDimension::Direction,
            ))
    }

    fn print_boundaries_of_bin(&self, out: &mut dyn fmt::Write, bin_index: usize) -> Result<()> {
        if bin_index >= self.number_of_bins() {
            return Err(Error::BinIndexOutOfRange {
                dimension: ObserverPhaseSpaceDimension::Direction,
                index: bin_index,
                bins: self.number_of_bins(),
            });
        }

        let octant = bin_index / self.triangles_per_octant();
        let triangle = bin_index % self.triangles_per_octant();

        write!(
            out,
            "Direction Bin: octant ({}x,{}y,{}z) triangle {triangle}",
            sign(octant & 1 != 0),
            sign(octant & 2 != 0),
            sign(octant & 4 != 0)
        )?;
        Ok(())
    }

    fn print(&self, out: &mut dyn fmt::Write) -> Result<()> {
        write!(
            out,
            "Direction Bin Boundaries: PQLA order {} ({} binning)",
            self.quadrature_order,
            if self.forward_binning {
                "forward"
            } else {
                "reverse"
            }
        )?;
        Ok(())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for DirectionDiscretization {
    fn deserialize<De>(deserializer: De) -> std::result::Result<Self, De::Error>
    where
        De: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Repr {
            quadrature_order: u32,
            forward_binning: bool,
        }

        let repr = Repr::deserialize(deserializer)?;
        Self::new(repr.quadrature_order, repr.forward_binning)
            .map_err(<De::Error as serde::de::Error>::custom)
    }
}

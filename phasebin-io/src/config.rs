//! User-facing JSON description of a phase space.
//!
//! ```json
//! {
//!   "dimensions": [
//!     { "dimension": "cosine", "boundaries": [-1.0, 0.0, 1.0] },
//!     { "dimension": "time", "boundaries": [1e-6, 1e-5, 1e-4], "range": true },
//!     { "dimension": "collision_number", "boundaries": [0, 1, 4294967295] },
//!     { "dimension": "source_id", "bins": [[0], [0, 1]] },
//!     { "dimension": "direction", "quadrature_order": 2 }
//!   ]
//! }
//! ```
//!
//! Dimensions are assigned in the listed order, so the first entry varies
//! fastest in the flat bin index.

use crate::Result;
use phasebin_core::ObserverPhaseSpaceDimension;
use phasebin_discretization::{
    DirectionDiscretization, ObserverCollisionNumberDimensionDiscretization,
    ObserverCosineDimensionDiscretization, ObserverDimensionDiscretization,
    ObserverEnergyDimensionDiscretization, ObserverPhaseSpaceDiscretization,
    ObserverSourceEnergyDimensionDiscretization, ObserverSourceIdDimensionDiscretization,
    ObserverSourceTimeDimensionDiscretization, ObserverTimeDimensionDiscretization,
};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

/// Binning of a single dimension, tagged by dimension name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "dimension", rename_all = "snake_case")]
pub enum Binning {
    /// Cosine bin boundaries in `[-1, 1]`.
    Cosine {
        /// Sorted boundaries.
        boundaries: Vec<f64>,
    },
    /// Source energy bin boundaries (MeV).
    SourceEnergy {
        /// Sorted boundaries.
        boundaries: Vec<f64>,
    },
    /// Energy bin boundaries (MeV).
    Energy {
        /// Sorted boundaries.
        boundaries: Vec<f64>,
    },
    /// Source time bin boundaries (s).
    SourceTime {
        /// Sorted boundaries.
        boundaries: Vec<f64>,
    },
    /// Time bin boundaries (s).
    Time {
        /// Sorted boundaries.
        boundaries: Vec<f64>,
    },
    /// Upper collision number of every bin.
    CollisionNumber {
        /// Strictly increasing boundaries.
        boundaries: Vec<u32>,
    },
    /// Source id sets.
    SourceId {
        /// Admissible ids of every bin.
        bins: Vec<Vec<u32>>,
    },
    /// PQLA direction bins.
    Direction {
        /// Quadrature order `k`, giving `8k²` bins.
        quadrature_order: u32,
        /// Bin the direction of travel rather than its reverse.
        #[serde(default = "default_forward_binning")]
        forward_binning: bool,
    },
}

fn default_forward_binning() -> bool {
    true
}

impl Binning {
    /// Returns the dimension this binning applies to.
    #[must_use]
    pub fn dimension(&self) -> ObserverPhaseSpaceDimension {
        match self {
            Self::Cosine { .. } => ObserverPhaseSpaceDimension::Cosine,
            Self::SourceEnergy { .. } => ObserverPhaseSpaceDimension::SourceEnergy,
            Self::Energy { .. } => ObserverPhaseSpaceDimension::Energy,
            Self::SourceTime { .. } => ObserverPhaseSpaceDimension::SourceTime,
            Self::Time { .. } => ObserverPhaseSpaceDimension::Time,
            Self::CollisionNumber { .. } => ObserverPhaseSpaceDimension::CollisionNumber,
            Self::SourceId { .. } => ObserverPhaseSpaceDimension::SourceId,
            Self::Direction { .. } => ObserverPhaseSpaceDimension::Direction,
        }
    }

    /// Validates the binning and builds its discretization.
    pub fn build(&self) -> Result<ObserverDimensionDiscretization> {
        let discretization: ObserverDimensionDiscretization = match self {
            Self::Cosine { boundaries } => {
                ObserverCosineDimensionDiscretization::new(boundaries.clone())?.into()
            }
            Self::SourceEnergy { boundaries } => {
                ObserverSourceEnergyDimensionDiscretization::new(boundaries.clone())?.into()
            }
            Self::Energy { boundaries } => {
                ObserverEnergyDimensionDiscretization::new(boundaries.clone())?.into()
            }
            Self::SourceTime { boundaries } => {
                ObserverSourceTimeDimensionDiscretization::new(boundaries.clone())?.into()
            }
            Self::Time { boundaries } => {
                ObserverTimeDimensionDiscretization::new(boundaries.clone())?.into()
            }
            Self::CollisionNumber { boundaries } => {
                ObserverCollisionNumberDimensionDiscretization::new(boundaries.clone())?.into()
            }
            Self::SourceId { bins } => {
                ObserverSourceIdDimensionDiscretization::new(bins.iter().cloned())?.into()
            }
            Self::Direction {
                quadrature_order,
                forward_binning,
            } => DirectionDiscretization::new(*quadrature_order, *forward_binning)?.into(),
        };

        Ok(discretization)
    }
}

/// One configured dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionConfig {
    /// Dimension and its bins.
    #[serde(flatten)]
    pub binning: Binning,
    /// Bin by the dimension's range in range queries.
    #[serde(default)]
    pub range: bool,
}

impl DimensionConfig {
    /// Creates a dimension binned by value.
    #[must_use]
    pub fn new(binning: Binning) -> Self {
        Self {
            binning,
            range: false,
        }
    }

    /// Sets whether the dimension is binned by range.
    #[must_use]
    pub fn with_range(mut self, range: bool) -> Self {
        self.range = range;
        self
    }
}

/// Phase-space configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseSpaceConfig {
    /// Dimensions in assignment order.
    #[serde(default)]
    pub dimensions: Vec<DimensionConfig>,
}

impl PhaseSpaceConfig {
    /// Parses a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a configuration from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let config: Self = serde_json::from_reader(reader)?;

        log::info!(
            "loaded phase-space configuration with {} dimensions from {}",
            config.dimensions.len(),
            path.display()
        );
        Ok(config)
    }

    /// Appends a dimension.
    #[must_use]
    pub fn with_dimension(mut self, dimension: DimensionConfig) -> Self {
        self.dimensions.push(dimension);
        self
    }

    /// Builds the phase-space discretization.
    ///
    /// A dimension listed twice keeps its first position and the last
    /// listed binning.
    pub fn build(&self) -> Result<ObserverPhaseSpaceDiscretization> {
        let mut discretization = ObserverPhaseSpaceDiscretization::new();
        for dimension in &self.dimensions {
            let binning = Arc::new(dimension.binning.build()?);
            discretization.assign_discretization_to_dimension(binning, dimension.range);
        }

        log::debug!(
            "built phase space with {} bins",
            discretization.number_of_bins()
        );
        Ok(discretization)
    }
}

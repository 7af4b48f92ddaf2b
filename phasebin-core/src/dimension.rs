//! Observer phase-space dimensions.

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One physical axis of the observer phase space.
///
/// The variant order is the canonical order used when dimensions are listed
/// as a set. Flat bin indices do not depend on it: a phase-space
/// discretization encodes its dimensions in assignment order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ObserverPhaseSpaceDimension {
    /// Cosine of the angle between the particle direction and a surface normal.
    Cosine,
    /// Energy the particle history was born with.
    SourceEnergy,
    /// Current particle energy.
    Energy,
    /// Time the particle history was born at.
    SourceTime,
    /// Current particle time.
    Time,
    /// Number of collisions the particle has undergone.
    CollisionNumber,
    /// Identifier of the source that emitted the particle history.
    SourceId,
    /// Particle direction of flight.
    Direction,
}

impl ObserverPhaseSpaceDimension {
    /// Every dimension in canonical order.
    pub const ALL: [Self; 8] = [
        Self::Cosine,
        Self::SourceEnergy,
        Self::Energy,
        Self::SourceTime,
        Self::Time,
        Self::CollisionNumber,
        Self::SourceId,
        Self::Direction,
    ];

    /// Returns the human readable dimension name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Cosine => "Cosine",
            Self::SourceEnergy => "Source Energy",
            Self::Energy => "Energy",
            Self::SourceTime => "Source Time",
            Self::Time => "Time",
            Self::CollisionNumber => "Collision Number",
            Self::SourceId => "Source Id",
            Self::Direction => "Direction",
        }
    }

    /// Returns the dimension name without whitespace.
    #[must_use]
    pub fn basic_name(self) -> &'static str {
        match self {
            Self::Cosine => "Cosine",
            Self::SourceEnergy => "SourceEnergy",
            Self::Energy => "Energy",
            Self::SourceTime => "SourceTime",
            Self::Time => "Time",
            Self::CollisionNumber => "CollisionNumber",
            Self::SourceId => "SourceId",
            Self::Direction => "Direction",
        }
    }

    /// Returns true if the dimension values are totally ordered.
    #[must_use]
    pub fn is_ordered(self) -> bool {
        !matches!(self, Self::SourceId | Self::Direction)
    }

    /// Returns true if the dimension values are real valued.
    #[must_use]
    pub fn is_continuous(self) -> bool {
        matches!(
            self,
            Self::Cosine | Self::SourceEnergy | Self::Energy | Self::SourceTime | Self::Time
        )
    }
}

impl fmt::Display for ObserverPhaseSpaceDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ObserverPhaseSpaceDimension {
    type Err = Error;

    /// Parses a dimension from its basic name, ignoring case and underscores.
    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-' && !c.is_whitespace())
            .collect();

        Self::ALL
            .into_iter()
            .find(|dimension| dimension.basic_name().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| Error::UnknownDimension(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_names() {
        assert_eq!(ObserverPhaseSpaceDimension::Cosine.name(), "Cosine");
        assert_eq!(
            ObserverPhaseSpaceDimension::SourceEnergy.name(),
            "Source Energy"
        );
        assert_eq!(
            ObserverPhaseSpaceDimension::CollisionNumber.basic_name(),
            "CollisionNumber"
        );
        assert_eq!(ObserverPhaseSpaceDimension::SourceId.to_string(), "Source Id");
    }

    #[test]
    fn test_ordering_and_continuity_flags() {
        assert!(ObserverPhaseSpaceDimension::Time.is_ordered());
        assert!(ObserverPhaseSpaceDimension::Time.is_continuous());
        assert!(ObserverPhaseSpaceDimension::CollisionNumber.is_ordered());
        assert!(!ObserverPhaseSpaceDimension::CollisionNumber.is_continuous());
        assert!(!ObserverPhaseSpaceDimension::SourceId.is_ordered());
        assert!(!ObserverPhaseSpaceDimension::Direction.is_continuous());
    }

    #[test]
    fn test_parse_dimension() {
        assert_eq!(
            "source_energy".parse::<ObserverPhaseSpaceDimension>().unwrap(),
            ObserverPhaseSpaceDimension::SourceEnergy
        );
        assert_eq!(
            "CollisionNumber".parse::<ObserverPhaseSpaceDimension>().unwrap(),
            ObserverPhaseSpaceDimension::CollisionNumber
        );
        assert_eq!(
            "time".parse::<ObserverPhaseSpaceDimension>().unwrap(),
            ObserverPhaseSpaceDimension::Time
        );
        assert!("momentum".parse::<ObserverPhaseSpaceDimension>().is_err());
    }
}

//! Particle state types observed by the phase-space discretizations.
//!
//! The binning code only ever reads a particle through the [`ParticleState`]
//! trait. [`ParticleStateData`] is a plain implementation suitable for
//! tests, command line tools and transport codes without their own state.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Speed of light in cm/s.
pub const SPEED_OF_LIGHT: f64 = 29_979_245_800.0;

/// Neutron rest mass energy in MeV.
pub const NEUTRON_REST_MASS_ENERGY: f64 = 939.565_420_52;

/// Electron rest mass energy in MeV.
pub const ELECTRON_REST_MASS_ENERGY: f64 = 0.510_998_95;

/// Particle species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ParticleType {
    Photon,
    Neutron,
    Electron,
}

impl ParticleType {
    /// Returns the rest mass energy (MeV).
    #[must_use]
    pub fn rest_mass_energy(self) -> f64 {
        match self {
            Self::Photon => 0.0,
            Self::Neutron => NEUTRON_REST_MASS_ENERGY,
            Self::Electron => ELECTRON_REST_MASS_ENERGY,
        }
    }

    /// Returns the speed (cm/s) of a particle with the given kinetic energy (MeV).
    #[must_use]
    pub fn speed(self, kinetic_energy: f64) -> f64 {
        if self == Self::Photon {
            return SPEED_OF_LIGHT;
        }

        let rest_mass_energy = self.rest_mass_energy();
        let total_energy = kinetic_energy + rest_mass_energy;
        SPEED_OF_LIGHT * (kinetic_energy * (kinetic_energy + 2.0 * rest_mass_energy)).sqrt()
            / total_energy
    }
}

/// Read-only view of a particle's kinematic state.
pub trait ParticleState: Send + Sync {
    /// Returns the particle species.
    fn particle_type(&self) -> ParticleType;

    /// Returns the history number the particle belongs to.
    fn history_number(&self) -> u64;

    /// Returns the kinetic energy (MeV).
    fn energy(&self) -> f64;

    /// Returns the particle time (s).
    fn time(&self) -> f64;

    /// Returns the energy the history was born with (MeV).
    fn source_energy(&self) -> f64;

    /// Returns the time the history was born at (s).
    fn source_time(&self) -> f64;

    /// Returns the number of collisions undergone.
    fn collision_number(&self) -> u32;

    /// Returns the id of the source that emitted the history.
    fn source_id(&self) -> u32;

    /// Returns the unit direction of flight.
    fn direction(&self) -> [f64; 3];

    /// Returns the particle speed (cm/s).
    #[inline]
    fn speed(&self) -> f64 {
        self.particle_type().speed(self.energy())
    }
}

/// Concrete particle state.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParticleStateData {
    particle_type: ParticleType,
    history_number: u64,
    energy: f64,
    time: f64,
    source_energy: f64,
    source_time: f64,
    collision_number: u32,
    source_id: u32,
    direction: [f64; 3],
}

impl ParticleStateData {
    /// Creates a particle state of the given species at 1 MeV, time zero,
    /// travelling along +z.
    #[must_use]
    pub fn new(particle_type: ParticleType, history_number: u64) -> Self {
        Self {
            particle_type,
            history_number,
            energy: 1.0,
            time: 0.0,
            source_energy: 1.0,
            source_time: 0.0,
            collision_number: 0,
            source_id: 0,
            direction: [0.0, 0.0, 1.0],
        }
    }

    /// Creates a photon state.
    #[must_use]
    pub fn photon(history_number: u64) -> Self {
        Self::new(ParticleType::Photon, history_number)
    }

    /// Creates a neutron state.
    #[must_use]
    pub fn neutron(history_number: u64) -> Self {
        Self::new(ParticleType::Neutron, history_number)
    }

    /// Creates an electron state.
    #[must_use]
    pub fn electron(history_number: u64) -> Self {
        Self::new(ParticleType::Electron, history_number)
    }

    pub fn set_energy(&mut self, energy: f64) {
        self.energy = energy;
    }

    pub fn set_time(&mut self, time: f64) {
        self.time = time;
    }

    pub fn set_source_energy(&mut self, source_energy: f64) {
        self.source_energy = source_energy;
    }

    pub fn set_source_time(&mut self, source_time: f64) {
        self.source_time = source_time;
    }

    pub fn set_collision_number(&mut self, collision_number: u32) {
        self.collision_number = collision_number;
    }

    /// Increments the collision number by one.
    pub fn increment_collision_number(&mut self) {
        self.collision_number = self.collision_number.saturating_add(1);
    }

    pub fn set_source_id(&mut self, source_id: u32) {
        self.source_id = source_id;
    }

    pub fn set_direction(&mut self, direction: [f64; 3]) {
        self.direction = direction;
    }
}

impl ParticleState for ParticleStateData {
    #[inline]
    fn particle_type(&self) -> ParticleType {
        self.particle_type
    }

    #[inline]
    fn history_number(&self) -> u64 {
        self.history_number
    }

    #[inline]
    fn energy(&self) -> f64 {
        self.energy
    }

    #[inline]
    fn time(&self) -> f64 {
        self.time
    }

    #[inline]
    fn source_energy(&self) -> f64 {
        self.source_energy
    }

    #[inline]
    fn source_time(&self) -> f64 {
        self.source_time
    }

    #[inline]
    fn collision_number(&self) -> u32 {
        self.collision_number
    }

    #[inline]
    fn source_id(&self) -> u32 {
        self.source_id
    }

    #[inline]
    fn direction(&self) -> [f64; 3] {
        self.direction
    }
}

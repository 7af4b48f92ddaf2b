//! Observer view of a particle state.

use crate::{Error, ParticleState, Result};

/// Borrowed view of a particle used by every dimension discretization.
///
/// Besides the particle itself the wrapper carries the angle cosine with
/// respect to an observer surface and the start/end times of the current
/// track segment. The lifetime ties the wrapper to the particle it reads.
#[derive(Clone, Copy)]
pub struct ObserverParticleStateWrapper<'a> {
    particle: &'a dyn ParticleState,
    angle_cosine: f64,
    start_time: f64,
    end_time: f64,
}

impl<'a> ObserverParticleStateWrapper<'a> {
    /// Creates a wrapper with an angle cosine of 1 and a zero length track
    /// segment at the particle time.
    pub fn new(particle: &'a dyn ParticleState) -> Self {
        let time = particle.time();

        Self {
            particle,
            angle_cosine: 1.0,
            start_time: time,
            end_time: time,
        }
    }

    /// Returns the wrapped particle.
    #[inline]
    #[must_use]
    pub fn particle(&self) -> &'a dyn ParticleState {
        self.particle
    }

    #[inline]
    #[must_use]
    pub fn angle_cosine(&self) -> f64 {
        self.angle_cosine
    }

    pub fn set_angle_cosine(&mut self, angle_cosine: f64) {
        self.angle_cosine = angle_cosine;
    }

    #[inline]
    #[must_use]
    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn set_start_time(&mut self, start_time: f64) {
        self.start_time = start_time;
    }

    #[inline]
    #[must_use]
    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    pub fn set_end_time(&mut self, end_time: f64) {
        self.end_time = end_time;
    }

    /// Returns the time spanned by the track segment.
    #[inline]
    #[must_use]
    pub fn time_duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// Treats the particle time as the start of a track of the given length (cm).
    pub fn calculate_state_times_using_particle_time_as_start_time(
        &mut self,
        track_length: f64,
    ) -> Result<()> {
        let duration = self.track_duration(track_length)?;

        self.start_time = self.particle.time();
        self.end_time = self.start_time + duration;
        log::debug!(
            "track of {track_length} cm spans [{}, {}] s",
            self.start_time,
            self.end_time
        );
        Ok(())
    }

    /// Treats the particle time as the end of a track of the given length (cm).
    pub fn calculate_state_times_using_particle_time_as_end_time(
        &mut self,
        track_length: f64,
    ) -> Result<()> {
        let duration = self.track_duration(track_length)?;

        self.end_time = self.particle.time();
        self.start_time = self.end_time - duration;
        log::debug!(
            "track of {track_length} cm spans [{}, {}] s",
            self.start_time,
            self.end_time
        );
        Ok(())
    }

    /// A zero length track takes no time, even for a particle at rest.
    #[allow(clippy::float_cmp)]
    fn track_duration(&self, track_length: f64) -> Result<f64> {
        if !track_length.is_finite() || track_length < 0.0 {
            return Err(Error::InvalidTrackLength(track_length));
        }
        if track_length == 0.0 {
            return Ok(0.0);
        }

        let speed = self.particle.speed();
        if !speed.is_finite() || speed <= 0.0 {
            return Err(Error::InvalidParticleSpeed(speed));
        }

        let duration = track_length / speed;
        if duration.is_finite() {
            Ok(duration)
        } else {
            Err(Error::InvalidTrackDuration {
                track_length,
                speed,
            })
        }
    }
}

impl std::fmt::Debug for ObserverParticleStateWrapper<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverParticleStateWrapper")
            .field("particle_type", &self.particle.particle_type())
            .field("history_number", &self.particle.history_number())
            .field("angle_cosine", &self.angle_cosine)
            .field("start_time", &self.start_time)
            .field("end_time", &self.end_time)
            .finish()
    }
}

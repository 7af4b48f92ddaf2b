//! phasebin CLI - Observer phase-space discretization tool.
//!
//! Builds a phase-space discretization from a JSON configuration and bins
//! points or particle tracks in it.
#![allow(clippy::uninlined_format_args)]

use clap::{Args, Parser, Subcommand, ValueEnum};
use phasebin_core::{DimensionValue, ObserverParticleStateWrapper, ParticleStateData, PhaseSpacePoint};
use phasebin_discretization::{DimensionDiscretization, ObserverPhaseSpaceDiscretization};
use phasebin_io::{save_discretization, PhaseSpaceConfig};
use serde_json::json;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for CLI operations.
type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
enum CliError {
    #[error("I/O error: {0}")]
    PhasebinIo(#[from] phasebin_io::Error),

    #[error("Core error: {0}")]
    Core(#[from] phasebin_core::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("a direction needs exactly three components, got {0}")]
    Direction(usize),
}

/// Particle type of a track.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Particle {
    /// Travels at the speed of light
    Photon,
    /// Relativistic neutron
    Neutron,
    /// Relativistic electron
    Electron,
}

/// Observer phase-space discretization tool.
#[derive(Parser)]
#[command(name = "phasebin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the bins of a configured phase space
    Describe {
        /// Phase-space configuration (JSON)
        config: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print the bins a phase-space point falls in
    Locate {
        /// Phase-space configuration (JSON)
        config: PathBuf,

        #[command(flatten)]
        values: PointValues,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print the weighted bins a particle track overlaps
    Track {
        /// Phase-space configuration (JSON)
        config: PathBuf,

        /// Particle type
        #[arg(short, long, value_enum, default_value = "photon")]
        particle: Particle,

        /// Track length (cm)
        #[arg(long)]
        track_length: f64,

        /// Treat the particle time as the end of the track
        #[arg(long)]
        time_is_end: bool,

        #[command(flatten)]
        state: TrackState,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Build a configured phase space and save it as an archive
    Archive {
        /// Phase-space configuration (JSON)
        config: PathBuf,

        /// Archive file path
        output: PathBuf,
    },
}

/// Values of a phase-space point. Dimensions left out are not set.
#[derive(Args)]
struct PointValues {
    /// Angle cosine
    #[arg(long, allow_negative_numbers = true)]
    cosine: Option<f64>,

    /// Source energy (MeV)
    #[arg(long)]
    source_energy: Option<f64>,

    /// Energy (MeV)
    #[arg(long)]
    energy: Option<f64>,

    /// Source time (s)
    #[arg(long)]
    source_time: Option<f64>,

    /// Time (s)
    #[arg(long)]
    time: Option<f64>,

    /// Collision number
    #[arg(long)]
    collision_number: Option<u32>,

    /// Source id
    #[arg(long)]
    source_id: Option<u32>,

    /// Unit direction as x,y,z
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    direction: Option<Vec<f64>>,
}

/// State of the particle at the tracked position.
#[derive(Args)]
struct TrackState {
    /// Angle cosine
    #[arg(long, default_value = "1.0", allow_negative_numbers = true)]
    cosine: f64,

    /// Energy (MeV)
    #[arg(long, default_value = "1.0")]
    energy: f64,

    /// Time (s)
    #[arg(long, default_value = "0.0")]
    time: f64,

    /// Source energy (MeV)
    #[arg(long, default_value = "1.0")]
    source_energy: f64,

    /// Source time (s)
    #[arg(long, default_value = "0.0")]
    source_time: f64,

    /// Collision number
    #[arg(long, default_value = "0")]
    collision_number: u32,

    /// Source id
    #[arg(long, default_value = "0")]
    source_id: u32,

    /// Unit direction as x,y,z
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    direction: Option<Vec<f64>>,
}

fn parse_direction(components: &[f64]) -> Result<[f64; 3]> {
    <[f64; 3]>::try_from(components).map_err(|_| CliError::Direction(components.len()))
}

impl PointValues {
    fn to_point(&self) -> Result<PhaseSpacePoint> {
        let mut point = PhaseSpacePoint::new();
        point.extend(self.cosine.map(DimensionValue::Cosine));
        point.extend(self.source_energy.map(DimensionValue::SourceEnergy));
        point.extend(self.energy.map(DimensionValue::Energy));
        point.extend(self.source_time.map(DimensionValue::SourceTime));
        point.extend(self.time.map(DimensionValue::Time));
        point.extend(self.collision_number.map(DimensionValue::CollisionNumber));
        point.extend(self.source_id.map(DimensionValue::SourceId));
        if let Some(direction) = &self.direction {
            point.insert(DimensionValue::Direction(parse_direction(direction)?));
        }
        Ok(point)
    }
}

impl TrackState {
    fn to_particle(&self, particle: Particle) -> Result<ParticleStateData> {
        let mut state = match particle {
            Particle::Photon => ParticleStateData::photon(0),
            Particle::Neutron => ParticleStateData::neutron(0),
            Particle::Electron => ParticleStateData::electron(0),
        };

        state.set_energy(self.energy);
        state.set_time(self.time);
        state.set_source_energy(self.source_energy);
        state.set_source_time(self.source_time);
        state.set_collision_number(self.collision_number);
        state.set_source_id(self.source_id);
        if let Some(direction) = &self.direction {
            state.set_direction(parse_direction(direction)?);
        }
        Ok(state)
    }
}

fn load(config: &Path) -> Result<ObserverPhaseSpaceDiscretization> {
    let discretization = PhaseSpaceConfig::from_path(config)?.build()?;
    log::info!(
        "{} dimensions, {} bins",
        discretization.discretized_dimensions().len(),
        discretization.number_of_bins()
    );
    Ok(discretization)
}

fn describe(discretization: &ObserverPhaseSpaceDiscretization, as_json: bool) -> Result<()> {
    if as_json {
        let dimensions: Vec<_> = discretization
            .discretized_dimensions()
            .into_iter()
            .filter_map(|dimension| discretization.dimension_discretization(dimension))
            .map(|dimension| {
                json!({
                    "dimension": dimension.dimension_name(),
                    "bins": dimension.number_of_bins(),
                    "range": discretization.is_range_dimension(dimension.dimension()),
                    "boundaries": dimension.to_string(),
                })
            })
            .collect();

        let report = json!({
            "bins": discretization.number_of_bins(),
            "dimensions": dimensions,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print!("{}", discretization);
    for dimension in discretization.discretized_dimensions() {
        let range = if discretization.is_range_dimension(dimension) {
            " (range)"
        } else {
            ""
        };
        println!(
            "{}: {} bins{}",
            dimension,
            discretization.number_of_bins_of_dimension(dimension),
            range
        );
    }
    println!("Total bins: {}", discretization.number_of_bins());
    Ok(())
}

fn locate(
    discretization: &ObserverPhaseSpaceDiscretization,
    values: &PointValues,
    as_json: bool,
) -> Result<()> {
    let point = values.to_point()?;
    for value in point.iter() {
        log::debug!("{}", value);
    }

    let bins = discretization.calculate_bin_indices_of_point(&point)?;

    if as_json {
        let entries = bins
            .iter()
            .map(|&bin| -> Result<serde_json::Value> {
                Ok(json!({ "bin": bin, "name": discretization.bin_name(bin)? }))
            })
            .collect::<Result<Vec<_>>>()?;
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for bin in bins {
        println!("{:>8}  {}", bin, discretization.bin_name(bin)?);
    }
    Ok(())
}

fn track(
    discretization: &ObserverPhaseSpaceDiscretization,
    particle: &ParticleStateData,
    cosine: f64,
    track_length: f64,
    time_is_end: bool,
    as_json: bool,
) -> Result<()> {
    let mut wrapper = ObserverParticleStateWrapper::new(particle);
    wrapper.set_angle_cosine(cosine);
    if time_is_end {
        wrapper.calculate_state_times_using_particle_time_as_end_time(track_length)?;
    } else {
        wrapper.calculate_state_times_using_particle_time_as_start_time(track_length)?;
    }
    log::info!(
        "track spans [{:e}, {:e}] s",
        wrapper.start_time(),
        wrapper.end_time()
    );

    if !discretization.does_range_intersect_discretization(&wrapper) {
        log::warn!("track does not intersect the phase space");
    }
    let pairs = discretization.calculate_bin_indices_and_weights_of_range(&wrapper)?;

    if as_json {
        let entries = pairs
            .iter()
            .map(|&(bin, weight)| -> Result<serde_json::Value> {
                Ok(json!({
                    "bin": bin,
                    "weight": weight,
                    "name": discretization.bin_name(bin)?,
                }))
            })
            .collect::<Result<Vec<_>>>()?;
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for (bin, weight) in pairs {
        println!(
            "{:>8}  {:.6e}  {}",
            bin,
            weight,
            discretization.bin_name(bin)?
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match cli.command {
        Commands::Describe { config, json } => {
            let discretization = load(&config)?;
            describe(&discretization, json)?;
        }

        Commands::Locate {
            config,
            values,
            json,
        } => {
            let discretization = load(&config)?;
            locate(&discretization, &values, json)?;
        }

        Commands::Track {
            config,
            particle,
            track_length,
            time_is_end,
            state,
            json,
        } => {
            let discretization = load(&config)?;
            let particle = state.to_particle(particle)?;
            track(
                &discretization,
                &particle,
                state.cosine,
                track_length,
                time_is_end,
                json,
            )?;
        }

        Commands::Archive { config, output } => {
            let discretization = load(&config)?;
            save_discretization(&output, &discretization)?;
            println!(
                "Saved {} bins over {} dimensions to {}",
                discretization.number_of_bins(),
                discretization.discretized_dimensions().len(),
                output.display()
            );
        }
    }

    Ok(())
}

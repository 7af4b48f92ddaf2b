//! phasebin-io: Configuration files and archives for phasebin.
//!
//! This crate reads user-facing JSON phase-space configurations and saves
//! or restores exact JSON archives of built discretizations via serde.
//!

mod archive;
pub mod config;
mod error;

pub use archive::{load_discretization, save_discretization};
pub use config::{Binning, DimensionConfig, PhaseSpaceConfig};
pub use error::{Error, Result};

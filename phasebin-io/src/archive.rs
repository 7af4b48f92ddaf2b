//! Exact JSON archives of discretizations.
//!
//! Archives store the validated discretization itself rather than the
//! configuration it was built from, so loading re-validates every
//! boundary and restores the assignment order and range flags.

use crate::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Writes a discretization to a pretty-printed JSON archive.
pub fn save_discretization<T, P>(path: P, discretization: &T) -> Result<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, discretization)?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    log::info!("saved discretization archive to {}", path.display());
    Ok(())
}

/// Reads a discretization from a JSON archive.
pub fn load_discretization<T, P>(path: P) -> Result<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let discretization = serde_json::from_reader(reader)?;

    log::info!("loaded discretization archive from {}", path.display());
    Ok(discretization)
}

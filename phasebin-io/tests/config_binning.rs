#![allow(clippy::unreadable_literal)]
use approx::assert_relative_eq;
use phasebin_core::{
    DimensionValue, ObserverParticleStateWrapper, ParticleStateData, PhaseSpacePoint,
};
use phasebin_discretization::ObserverPhaseSpaceDiscretization;
use phasebin_io::{load_discretization, save_discretization, PhaseSpaceConfig};
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

const CONFIG: &str = r#"{
    "dimensions": [
        { "dimension": "time", "boundaries": [1e-6, 1e-5, 1e-4, 1e-3], "range": true },
        { "dimension": "source_id", "bins": [[0], [0, 1], [1, 2]] },
        { "dimension": "collision_number", "boundaries": [1, 2, 3, 5] }
    ]
}"#;

fn config_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(CONFIG.as_bytes()).unwrap();
    file
}

#[test]
fn test_configured_phase_space_bins_tracks() {
    let config = PhaseSpaceConfig::from_path(config_file().path()).unwrap();
    let discretization = config.build().unwrap();
    assert_eq!(discretization.number_of_bins(), 36);

    let mut photon = ParticleStateData::photon(1);
    photon.set_time(2e-6);
    photon.set_collision_number(2);
    let mut wrapper = ObserverParticleStateWrapper::new(&photon);
    wrapper
        .calculate_state_times_using_particle_time_as_start_time(539626.4244)
        .unwrap();

    let pairs = discretization
        .calculate_bin_indices_and_weights_of_range(&wrapper)
        .unwrap();
    let bins: Vec<usize> = pairs.iter().map(|&(bin, _)| bin).collect();
    assert_eq!(bins, vec![9, 10, 12, 13]);

    assert_relative_eq!(pairs[0].1, 0.44444444444444453, max_relative = 1e-12);
    assert_relative_eq!(pairs[1].1, 0.5555555555555556, max_relative = 1e-12);
    let total: f64 = pairs.iter().map(|&(_, weight)| weight).sum();
    assert_relative_eq!(total, 2.0, max_relative = 1e-12);
}

#[test]
fn test_archive_preserves_binning() {
    let dir = TempDir::new().unwrap();
    let archive = dir.path().join("phase_space.json");

    let built = PhaseSpaceConfig::from_json_str(CONFIG)
        .unwrap()
        .build()
        .unwrap();
    save_discretization(&archive, &built).unwrap();
    let restored: ObserverPhaseSpaceDiscretization = load_discretization(&archive).unwrap();

    let point = PhaseSpacePoint::new()
        .with_value(DimensionValue::Time(5e-5))
        .with_value(DimensionValue::SourceId(1))
        .with_value(DimensionValue::CollisionNumber(5));

    assert_eq!(
        restored.calculate_bin_indices_of_point(&point).unwrap(),
        built.calculate_bin_indices_of_point(&point).unwrap()
    );
    assert_eq!(
        restored.calculate_bin_indices_of_point(&point).unwrap(),
        vec![1 + 3 + 27, 1 + 6 + 27]
    );
}

#![allow(clippy::unreadable_literal, clippy::float_cmp)]
use approx::assert_relative_eq;
use phasebin_core::{ParticleStateData, SPEED_OF_LIGHT};
use phasebin_discretization::{
    BinIndexWeightPairArray, DimensionValue, DirectionDiscretization,
    ObserverCollisionNumberDimensionDiscretization, ObserverCosineDimensionDiscretization,
    ObserverDimensionDiscretization, ObserverEnergyDimensionDiscretization,
    ObserverParticleStateWrapper, ObserverPhaseSpaceDimension, ObserverPhaseSpaceDiscretization,
    ObserverSourceEnergyDimensionDiscretization, ObserverSourceIdDimensionDiscretization,
    ObserverSourceTimeDimensionDiscretization, ObserverTimeDimensionDiscretization,
    PhaseSpacePoint,
};
use std::collections::HashMap;
use std::sync::Arc;

fn shared<T: Into<ObserverDimensionDiscretization>>(discretization: T) -> Arc<ObserverDimensionDiscretization> {
    Arc::new(discretization.into())
}

fn cosine_bins() -> Arc<ObserverDimensionDiscretization> {
    shared(
        ObserverCosineDimensionDiscretization::new(vec![-1.0, -1.0 / 3.0, 1.0 / 3.0, 1.0])
            .unwrap(),
    )
}

fn collision_bins() -> Arc<ObserverDimensionDiscretization> {
    shared(ObserverCollisionNumberDimensionDiscretization::new(vec![1, 2, 3, 5]).unwrap())
}

fn source_id_bins() -> Arc<ObserverDimensionDiscretization> {
    shared(ObserverSourceIdDimensionDiscretization::new(vec![vec![0], vec![0, 1], vec![1, 2]]).unwrap())
}

fn time_bins() -> Arc<ObserverDimensionDiscretization> {
    shared(ObserverTimeDimensionDiscretization::new(vec![1e-6, 1e-5, 1e-4, 1e-3]).unwrap())
}

fn point(cosine: f64, collisions: u32) -> PhaseSpacePoint {
    PhaseSpacePoint::new()
        .with_value(DimensionValue::Cosine(cosine))
        .with_value(DimensionValue::CollisionNumber(collisions))
}

fn assert_pairs_eq(actual: &BinIndexWeightPairArray, expected: &[(usize, f64)]) {
    assert_eq!(actual.len(), expected.len(), "pairs: {actual:?}");
    for (&(bin, weight), &(expected_bin, expected_weight)) in actual.iter().zip(expected) {
        assert_eq!(bin, expected_bin, "pairs: {actual:?}");
        assert_relative_eq!(weight, expected_weight, max_relative = 1e-12);
    }
}

/// Track length (cm) a photon covers in `duration` seconds.
fn photon_track(duration: f64) -> f64 {
    duration * SPEED_OF_LIGHT
}

#[test]
fn test_bin_count_grows_with_each_dimension() {
    let mut discretization = ObserverPhaseSpaceDiscretization::new();
    assert_eq!(discretization.number_of_bins(), 1);

    let three = vec![0.0, 1.0, 2.0, 3.0];
    let steps: Vec<(Arc<ObserverDimensionDiscretization>, usize)> = vec![
        (cosine_bins(), 3),
        (
            shared(ObserverSourceEnergyDimensionDiscretization::new(three.clone()).unwrap()),
            9,
        ),
        (
            shared(ObserverEnergyDimensionDiscretization::new(three.clone()).unwrap()),
            27,
        ),
        (
            shared(ObserverSourceTimeDimensionDiscretization::new(three.clone()).unwrap()),
            81,
        ),
        (shared(ObserverTimeDimensionDiscretization::new(three).unwrap()), 243),
        (collision_bins(), 972),
        (source_id_bins(), 2916),
    ];

    for (dimension_discretization, expected) in steps {
        discretization.assign_discretization_to_dimension(dimension_discretization, false);
        assert_eq!(discretization.number_of_bins(), expected);
    }

    assert_eq!(discretization.discretized_dimension_set().len(), 7);
    assert!(!discretization.does_dimension_have_discretization(ObserverPhaseSpaceDimension::Direction));
}

#[test]
fn test_cosine_and_collision_number_indices() {
    let mut discretization = ObserverPhaseSpaceDiscretization::new();
    discretization.assign_discretization_to_dimension(cosine_bins(), false);
    discretization.assign_discretization_to_dimension(collision_bins(), false);
    assert_eq!(discretization.number_of_bins(), 12);

    let bins = |cosine, collisions| {
        discretization
            .calculate_bin_indices_of_point(&point(cosine, collisions))
            .unwrap()
    };

    assert_eq!(bins(-1.0, 0), vec![0]);
    assert_eq!(bins(0.0, 0), vec![1]);
    assert_eq!(bins(1.0, 1), vec![2]);

    let cosines = [-1.0, -0.5, 0.0, 0.2, 0.5, 1.0];
    let expected = [3, 3, 4, 4, 5, 5];
    for (&cosine, &index) in cosines.iter().zip(&expected) {
        assert_eq!(bins(cosine, 2), vec![index], "cosine {cosine}");
    }

    assert_eq!(bins(-1.0, 5), vec![9]);
    assert_eq!(bins(0.0, 4), vec![10]);
    assert_eq!(bins(1.0, 5), vec![11]);

    assert!(!discretization.is_point_in_discretization(&point(0.0, 6)));
    assert!(discretization
        .calculate_bin_indices_of_point(&point(0.0, 6))
        .is_err());
}

#[test]
fn test_overlapping_source_ids_multiply_indices() {
    let mut discretization = ObserverPhaseSpaceDiscretization::new();
    discretization.assign_discretization_to_dimension(cosine_bins(), false);
    discretization.assign_discretization_to_dimension(collision_bins(), false);
    discretization.assign_discretization_to_dimension(source_id_bins(), false);
    assert_eq!(discretization.number_of_bins(), 36);

    for (cosine, collisions, local) in [(-1.0, 0, 0), (0.0, 2, 4), (1.0, 5, 11)] {
        let with_source = |source_id| {
            discretization
                .calculate_bin_indices_of_point(
                    &point(cosine, collisions).with_value(DimensionValue::SourceId(source_id)),
                )
                .unwrap()
        };

        assert_eq!(with_source(0), vec![local, local + 12]);
        assert_eq!(with_source(1), vec![local + 12, local + 24]);
        assert_eq!(with_source(2), vec![local + 24]);
    }
}

#[test]
fn test_wrapper_indices_match_point_indices() {
    let mut discretization = ObserverPhaseSpaceDiscretization::new();
    discretization.assign_discretization_to_dimension(cosine_bins(), false);
    discretization.assign_discretization_to_dimension(collision_bins(), false);

    let mut neutron = ParticleStateData::neutron(7);
    neutron.set_collision_number(3);
    let mut wrapper = ObserverParticleStateWrapper::new(&neutron);
    wrapper.set_angle_cosine(0.5);

    let from_wrapper = discretization
        .calculate_bin_indices_of_wrapper(&wrapper)
        .unwrap();
    let from_point = discretization
        .calculate_bin_indices_of_point(&PhaseSpacePoint::from_wrapper(&wrapper))
        .unwrap();

    assert_eq!(from_wrapper, vec![8]);
    assert_eq!(from_wrapper, from_point);
    assert!(discretization.is_wrapper_in_discretization(&wrapper));
}

#[test]
fn test_time_range_weights() {
    let mut discretization = ObserverPhaseSpaceDiscretization::new();
    discretization.assign_discretization_to_dimension(time_bins(), true);

    let mut photon = ParticleStateData::photon(0);
    let weights = |photon: &ParticleStateData, track_length: f64| {
        let mut wrapper = ObserverParticleStateWrapper::new(photon);
        wrapper
            .calculate_state_times_using_particle_time_as_start_time(track_length)
            .unwrap();
        discretization
            .calculate_bin_indices_and_weights_of_range(&wrapper)
            .unwrap()
    };

    assert_pairs_eq(&weights(&photon, 149896.22900000002), &[(0, 0.8)]);
    assert_pairs_eq(
        &weights(&photon, 149896229.0),
        &[(0, 0.0018), (1, 0.018), (2, 0.18)],
    );

    photon.set_time(2e-6);
    assert_pairs_eq(
        &weights(&photon, 539626.4244),
        &[(0, 0.44444444444444453), (1, 0.5555555555555556)],
    );

    photon.set_time(5e-4);
    assert_pairs_eq(&weights(&photon, 134906606.10000002), &[(2, 0.1111111111111111)]);
}

#[test]
fn test_time_range_combined_with_value_dimensions() {
    let mut discretization = ObserverPhaseSpaceDiscretization::new();
    discretization.assign_discretization_to_dimension(time_bins(), true);
    discretization.assign_discretization_to_dimension(source_id_bins(), false);

    let mut photon = ParticleStateData::photon(0);
    photon.set_time(2e-6);
    let mut wrapper = ObserverParticleStateWrapper::new(&photon);
    wrapper
        .calculate_state_times_using_particle_time_as_start_time(539626.4244)
        .unwrap();

    let early = 0.44444444444444453;
    let late = 0.5555555555555556;
    assert_pairs_eq(
        &discretization
            .calculate_bin_indices_and_weights_of_range(&wrapper)
            .unwrap(),
        &[(0, early), (1, late), (3, early), (4, late)],
    );

    discretization.assign_discretization_to_dimension(collision_bins(), false);
    photon.set_collision_number(2);
    let mut wrapper = ObserverParticleStateWrapper::new(&photon);
    wrapper
        .calculate_state_times_using_particle_time_as_start_time(539626.4244)
        .unwrap();

    assert_pairs_eq(
        &discretization
            .calculate_bin_indices_and_weights_of_range(&wrapper)
            .unwrap(),
        &[(9, early), (10, late), (12, early), (13, late)],
    );
}

#[test]
fn test_time_without_range_flag_uses_particle_time() {
    let mut discretization = ObserverPhaseSpaceDiscretization::new();
    discretization.assign_discretization_to_dimension(time_bins(), false);

    let mut photon = ParticleStateData::photon(0);
    photon.set_time(2e-6);
    let mut wrapper = ObserverParticleStateWrapper::new(&photon);
    wrapper
        .calculate_state_times_using_particle_time_as_start_time(photon_track(1e-4))
        .unwrap();

    assert_eq!(
        discretization
            .calculate_bin_indices_and_weights_of_range(&wrapper)
            .unwrap(),
        vec![(0, 1.0)]
    );
}

#[test]
fn test_range_intersection() {
    let mut discretization = ObserverPhaseSpaceDiscretization::new();
    discretization.assign_discretization_to_dimension(time_bins(), true);

    let mut photon = ParticleStateData::photon(0);
    let mut wrapper = ObserverParticleStateWrapper::new(&photon);
    wrapper
        .calculate_state_times_using_particle_time_as_start_time(photon_track(1e-7))
        .unwrap();
    assert!(!discretization.does_range_intersect_discretization(&wrapper));

    wrapper
        .calculate_state_times_using_particle_time_as_start_time(photon_track(5e-6))
        .unwrap();
    assert!(discretization.does_range_intersect_discretization(&wrapper));

    photon.set_time(1e-6);
    let mut wrapper = ObserverParticleStateWrapper::new(&photon);
    wrapper
        .calculate_state_times_using_particle_time_as_end_time(1.0)
        .unwrap();
    assert!(!discretization.does_range_intersect_discretization(&wrapper));

    photon.set_time(1e-3);
    let mut wrapper = ObserverParticleStateWrapper::new(&photon);
    wrapper
        .calculate_state_times_using_particle_time_as_start_time(1.0)
        .unwrap();
    assert!(!discretization.does_range_intersect_discretization(&wrapper));
}

#[test]
fn test_range_intersection_requires_every_dimension() {
    let mut discretization = ObserverPhaseSpaceDiscretization::new();
    discretization.assign_discretization_to_dimension(time_bins(), true);
    discretization.assign_discretization_to_dimension(
        shared(ObserverEnergyDimensionDiscretization::new(vec![1e-2, 1e-1, 1.0]).unwrap()),
        false,
    );

    let mut photon = ParticleStateData::photon(0);
    photon.set_energy(5e-3);
    let mut wrapper = ObserverParticleStateWrapper::new(&photon);
    wrapper
        .calculate_state_times_using_particle_time_as_start_time(photon_track(5e-6))
        .unwrap();

    assert!(!discretization.does_range_intersect_discretization(&wrapper));
    assert!(!discretization.is_wrapper_in_discretization(&wrapper));
    assert!(discretization
        .calculate_bin_indices_and_weights_of_range(&wrapper)
        .is_err());
}

#[test]
fn test_direction_dimension() {
    let mut discretization = ObserverPhaseSpaceDiscretization::new();
    discretization.assign_discretization_to_dimension(
        shared(DirectionDiscretization::new(2, true).unwrap()),
        false,
    );
    discretization.assign_discretization_to_dimension(collision_bins(), false);
    assert_eq!(
        discretization.number_of_bins_of_dimension(ObserverPhaseSpaceDimension::Direction),
        32
    );
    assert_eq!(discretization.number_of_bins(), 128);

    let mut photon = ParticleStateData::photon(0);
    photon.set_collision_number(2);
    photon.set_direction([0.0, 0.0, -1.0]);
    let wrapper = ObserverParticleStateWrapper::new(&photon);

    let bins = discretization
        .calculate_bin_indices_of_wrapper(&wrapper)
        .unwrap();
    assert_eq!(bins.len(), 1);
    assert!(bins[0] >= 32 && bins[0] < 64);
}

#[test]
fn test_discretization_index_round_trips_through_bin_name() {
    let mut discretization = ObserverPhaseSpaceDiscretization::new();
    discretization.assign_discretization_to_dimension(cosine_bins(), false);
    discretization.assign_discretization_to_dimension(collision_bins(), false);

    let index = discretization
        .calculate_discretization_index(&HashMap::from([
            (ObserverPhaseSpaceDimension::Cosine, 2),
            (ObserverPhaseSpaceDimension::CollisionNumber, 1),
        ]))
        .unwrap();
    assert_eq!(index, 5);
    assert_eq!(
        discretization.bin_name(index).unwrap(),
        "Cosine Bin: (3.333333333333333148e-01,1.000000000000000000e+00], \
         Collision Number Bin: [2,2]"
    );
}

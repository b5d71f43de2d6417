use evtol_sizer::aircraft::{Aircraft, AircraftError, Field};
use evtol_sizer::mission::{PhaseKind, PhasePowers};
use evtol_sizer::sizing::{SizingError, SizingSettings, Stage, size_aircraft, sweep};

fn concept() -> Aircraft {
    let mut aircraft = Aircraft::new("lift-cruise");
    aircraft.cruise_speed = Some(60.0);
    aircraft.range = Some(100_000.0);
    aircraft.stall_speed = Some(35.0);
    aircraft.passenger_count = Some(4);
    aircraft.payload_mass = Some(400.0);
    aircraft.motor_count = Some(6);
    aircraft.propeller_radius = Some(1.2);
    aircraft.wing.aspect_ratio = Some(9.0);
    aircraft.horizontal_tail.aspect_ratio = Some(4.0);
    aircraft.horizontal_tail.root_thickness = Some(0.08);
    aircraft.horizontal_tail.volume_coefficient = Some(0.6);
    aircraft.horizontal_tail.arm = Some(5.0);
    aircraft.vertical_tail.aspect_ratio = Some(1.5);
    aircraft.vertical_tail.root_thickness = Some(0.08);
    aircraft.vertical_tail.volume_coefficient = Some(0.04);
    aircraft.vertical_tail.arm = Some(5.0);
    aircraft.fuselage.length = Some(8.0);
    aircraft.fuselage.width = Some(1.6);
    aircraft.fuselage.height = Some(1.6);
    aircraft
}

#[test]
fn sizes_concept_and_conserves_mass() {
    let mut aircraft = concept();
    let report = size_aircraft(&mut aircraft, &SizingSettings::default(), None).unwrap();

    let total = aircraft.total_mass.unwrap();
    assert!(total > 1_600.0 && total < 1_900.0, "total = {total}");
    assert!(report.outer_iterations() >= 2);
    assert!(report.inner_iterations >= report.outer_iterations());
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);

    let tree = aircraft.mass_breakdown.as_ref().unwrap();
    assert!((tree.mass() - total).abs() <= 1e-9 * total);
    let leaf_sum: f64 = tree.leaves().iter().map(|(_, leaf)| leaf.mass()).sum();
    assert!((leaf_sum - total).abs() <= 1e-9 * total);
    assert_eq!(tree.mass_of("payload"), Some(400.0));
    assert!(tree.find("airframe.horizontal_tail").is_some());
    assert!(tree.cg().is_some());

    let mut again = tree.clone();
    again.aggregate().unwrap();
    assert_eq!(&again, tree);

    assert!(aircraft.hover_power.unwrap() > aircraft.cruise_power.unwrap());
    assert!(aircraft.reference_power.unwrap() >= aircraft.hover_power.unwrap());
    assert!(aircraft.mission_energy.unwrap() > 0.0);
    assert!(aircraft.mission.phases.iter().all(|p| p.energy.is_some()));
    assert_eq!(
        aircraft.wing.area,
        report.history.last().map(|s| s.wing_area)
    );
}

#[test]
fn failed_sizing_leaves_aircraft_untouched() {
    let mut aircraft = concept();
    let before = aircraft.clone();
    let settings = SizingSettings {
        initial_mass: 300.0,
        ..SizingSettings::default()
    };
    let err = size_aircraft(&mut aircraft, &settings, None).unwrap_err();
    assert_eq!(
        err,
        SizingError::PayloadExceedsTotal {
            payload: 400.0,
            total: 300.0
        }
    );
    assert_eq!(aircraft, before);
}

#[test]
fn exhausted_budgets_report_the_failing_stage() {
    let mut aircraft = concept();
    let outer = SizingSettings {
        outer_max_iterations: 1,
        ..SizingSettings::default()
    };
    match size_aircraft(&mut aircraft, &outer, None).unwrap_err() {
        SizingError::NotConverged {
            stage,
            history,
            snapshots,
            ..
        } => {
            assert_eq!(stage, Stage::Outer);
            assert_eq!(history.len(), 2);
            assert_eq!(snapshots.len(), 1);
            assert_eq!(snapshots[0].iteration, 1);
            assert_eq!(snapshots[0].total_mass, history[1]);
            assert!(snapshots[0].battery_mass > 0.0);
        }
        other => panic!("unexpected {other:?}"),
    }

    let inner = SizingSettings {
        max_iterations: 2,
        ..SizingSettings::default()
    };
    match size_aircraft(&mut aircraft, &inner, None).unwrap_err() {
        SizingError::NotConverged {
            stage,
            iterations,
            snapshots,
            ..
        } => {
            assert_eq!(stage, Stage::Inner);
            assert_eq!(iterations, 2);
            assert!(snapshots.is_empty());
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(aircraft.total_mass.is_none());
}

#[test]
fn missing_inputs_are_reported_before_iterating() {
    let mut aircraft = concept();
    aircraft.payload_mass = None;
    let err = size_aircraft(&mut aircraft, &SizingSettings::default(), None).unwrap_err();
    assert!(matches!(
        err,
        SizingError::Aircraft(AircraftError::MissingField {
            field: Field::PayloadMass,
            ..
        })
    ));
}

#[test]
fn external_phase_powers_override_estimates() {
    let mut aircraft = concept();
    let mut powers = PhasePowers::default();
    powers.by_name.insert("cruise".into(), 250_000.0);
    powers.by_kind.insert(PhaseKind::Descent, 40_000.0);
    size_aircraft(&mut aircraft, &SizingSettings::default(), Some(&powers)).unwrap();

    let cruise = aircraft.mission.phase("cruise").unwrap();
    assert_eq!(cruise.power, Some(250_000.0));
    assert_eq!(aircraft.mission.phase("descent").unwrap().power, Some(40_000.0));
    let baseline = {
        let mut plain = concept();
        size_aircraft(&mut plain, &SizingSettings::default(), None).unwrap();
        plain.total_mass.unwrap()
    };
    assert!(aircraft.total_mass.unwrap() > baseline);
}

#[test]
fn sweep_sizes_each_point_independently() {
    let points = sweep(
        &concept(),
        &[30.0, 35.0, 40.0],
        &SizingSettings::default(),
        None,
        |aircraft, stall_speed| aircraft.stall_speed = Some(stall_speed),
    );
    assert_eq!(points.len(), 3);
    let areas: Vec<f64> = points
        .iter()
        .map(|p| {
            let (aircraft, _) = p.result.as_ref().unwrap();
            aircraft.wing.area.unwrap()
        })
        .collect();
    assert!(areas[0] > areas[1] && areas[1] > areas[2], "{areas:?}");
    assert_eq!(points[1].value, 35.0);
}

use evtol_sizer::mission::{MissionPhase, MissionProfile, MissionWarning, PhaseKind, PhaseState};

#[test]
fn order_problems_only_warn() {
    let profile = MissionProfile::new(vec![
        MissionPhase::new("cruise", PhaseKind::Cruise)
            .with_speeds(50.0, 0.0)
            .with_distance(5_000.0),
        MissionPhase::new("loiter", PhaseKind::Loiter).with_duration(60.0),
    ]);
    let repaired = profile.validate_and_repair();
    assert!(repaired.warnings.contains(&MissionWarning::MissingTakeoff {
        found: PhaseKind::Cruise
    }));
    assert!(repaired.warnings.contains(&MissionWarning::MissingLanding {
        found: PhaseKind::Loiter
    }));
    assert_eq!(repaired.value.phases[0].duration, Some(100.0));
}

#[test]
fn start_states_are_chained() {
    let profile = MissionProfile::new(vec![
        MissionPhase::new("takeoff", PhaseKind::Takeoff).with_duration(10.0),
        MissionPhase::new("climb", PhaseKind::HoverClimb)
            .with_speeds(0.0, 2.0)
            .with_end_altitude(20.0)
            .with_start(PhaseState {
                time: 99.0,
                position: 0.0,
                altitude: 0.0,
            }),
        MissionPhase::new("landing", PhaseKind::Landing).with_duration(10.0),
    ]);
    let repaired = profile.validate_and_repair();
    assert_eq!(repaired.warnings.len(), 1);
    assert!(matches!(
        repaired.warnings[0],
        MissionWarning::StartStateMismatch { .. }
    ));
    let phases = &repaired.value.phases;
    assert_eq!(phases[1].start_state().time, 10.0);
    assert_eq!(phases[1].duration, Some(10.0));
    assert_eq!(phases[2].start_state().time, 20.0);
    assert_eq!(phases[2].start_state().altitude, 20.0);
}

#[test]
fn inconsistent_duration_is_corrected() {
    let profile = MissionProfile::new(vec![
        MissionPhase::new("takeoff", PhaseKind::Takeoff).with_duration(5.0),
        MissionPhase::new("up", PhaseKind::HoverClimb)
            .with_duration(3.0)
            .with_speeds(0.0, 1.0)
            .with_end_altitude(15.0),
        MissionPhase::new("hold", PhaseKind::Loiter),
        MissionPhase::new("landing", PhaseKind::Landing).with_duration(-4.0),
    ]);
    let repaired = profile.validate_and_repair();
    let phases = &repaired.value.phases;
    assert_eq!(phases[1].duration, Some(15.0));
    assert_eq!(phases[2].duration, Some(0.0));
    assert_eq!(phases[3].duration, Some(0.0));
    assert!(repaired.warnings.contains(&MissionWarning::DurationMismatch {
        phase: "up".into(),
        given: 3.0,
        derived: 15.0
    }));
    assert!(repaired.warnings.contains(&MissionWarning::DurationUnresolved {
        phase: "hold".into()
    }));
}

#[test]
fn repair_is_stable() {
    let profile = MissionProfile::new(vec![
        MissionPhase::new("takeoff", PhaseKind::Takeoff).with_duration(5.0),
        MissionPhase::new("landing", PhaseKind::Landing).with_duration(5.0),
    ]);
    let once = profile.validate_and_repair();
    let twice = once.value.validate_and_repair();
    assert!(twice.warnings.is_empty());
    assert_eq!(once.value, twice.value);
}

#[test]
fn zero_duration_without_kinematics_is_flagged() {
    let profile = MissionProfile::new(vec![
        MissionPhase::new("takeoff", PhaseKind::Takeoff).with_duration(5.0),
        MissionPhase::new("hold", PhaseKind::Loiter).with_duration(0.0),
    ]);
    let repaired = profile.validate_and_repair();
    assert!(repaired.warnings.contains(&MissionWarning::DurationUnresolved {
        phase: "hold".into()
    }));
    assert!(repaired.warnings.contains(&MissionWarning::MissingLanding {
        found: PhaseKind::Loiter
    }));
    assert_eq!(repaired.value.phases[1].duration, Some(0.0));
}

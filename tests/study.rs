use std::fs;
use std::path::Path;

use evtol_sizer::Study;
use evtol_sizer::config;
use evtol_sizer::export::ConceptStore;
use evtol_sizer::hinge::Combination;

fn load(concept: &str) -> Study {
    Study::load(
        Path::new(concept),
        Some(Path::new("configs/settings.yaml")),
        None,
    )
    .expect("study inputs")
}

#[test]
fn sample_concepts_parse_in_si() {
    let lift_cruise = config::load_single_aircraft("configs/concepts/lift_cruise.yaml").unwrap();
    assert!((lift_cruise.cruise_speed.unwrap() - 60.0).abs() < 1e-9);
    assert!((lift_cruise.range.unwrap() - 100_000.0).abs() < 1e-6);
    assert_eq!(lift_cruise.motor_count, Some(6));

    let all = config::load_aircraft("configs/concepts").unwrap();
    let names: Vec<_> = all.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, ["folding_wing", "lift_cruise"]);
}

#[test]
fn lift_cruise_sizes_with_consistent_breakdown() {
    let outcome = load("configs/concepts/lift_cruise.yaml").run().expect("sizing");
    let aircraft = &outcome.aircraft;
    let total = aircraft.total_mass.unwrap();
    assert!(total > 1600.0 && total < 1900.0, "total mass {total}");
    assert!(outcome.hinge.is_none());

    let tree = aircraft.mass_breakdown.as_ref().unwrap();
    let leaves: f64 = tree.leaves().iter().map(|(_, leaf)| leaf.mass()).sum();
    assert!((tree.mass() - total).abs() < 1e-6);
    assert!((leaves - total).abs() < 1e-6);
    assert!(tree.cg().is_some());

    // configs/settings.yaml moves the battery
    let battery = tree.find("battery").unwrap();
    assert!((battery.cg().unwrap() - 0.42).abs() < 1e-12);

    assert!(aircraft.wing.area.unwrap() > 10.0);
    assert!(aircraft.hover_power.unwrap() > aircraft.cruise_power.unwrap());
    assert!(outcome.report.outer_iterations() >= 2);
    let last = outcome.report.history.last().unwrap();
    assert!((last.total_mass - total).abs() / total < 1e-3);
}

#[test]
fn folding_wing_gets_hinge_loads_from_policy_override() {
    let study = load("configs/concepts/folding_wing.toml");
    assert_eq!(
        study.settings.hinge.policy.resolve("folding_wing").combination,
        Combination::MaxOfComponents
    );
    let outcome = study.run().expect("sizing");
    let loads = outcome.hinge.as_ref().expect("hinge loads");
    assert!((loads.eta_hinge - 0.6).abs() < 1e-12);
    assert!(loads.shear > 0.0 && loads.moment > 0.0);
    assert_eq!(loads.distribution.len(), 21);
    assert_eq!(outcome.aircraft.hinge.as_ref(), Some(loads));

    let total = outcome.aircraft.total_mass.unwrap();
    assert!(total > 700.0 && total < 1200.0, "total mass {total}");
}

#[test]
fn external_powers_make_the_concept_heavier() {
    let baseline = load("configs/concepts/lift_cruise.yaml").run().unwrap();
    let mut study = load("configs/concepts/lift_cruise.yaml");
    study.powers = Some(config::load_phase_powers("configs/powers.yaml").unwrap());
    let overridden = study.run().unwrap();
    assert!(overridden.aircraft.total_mass.unwrap() > baseline.aircraft.total_mass.unwrap());
}

#[test]
fn artifacts_and_store_round_trip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let outcome = load("configs/concepts/folding_wing.toml").run().unwrap();

    let written = outcome.write_artifacts(dir.path(), false).unwrap();
    let names: Vec<_> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
        .collect();
    assert_eq!(
        names,
        [
            "folding_wing_mass.csv",
            "folding_wing_history.csv",
            "folding_wing_mission.csv",
            "folding_wing_hinge.csv",
        ]
    );
    let mass = fs::read_to_string(dir.path().join("folding_wing_mass.csv")).unwrap();
    assert!(mass.starts_with("path,depth,mass_kg,cg,leaf"));
    assert!(mass.contains("folding_wing.battery,1,"));

    let store = ConceptStore::new(dir.path().join("store"));
    let first = outcome.save(&store, None).unwrap();
    let second = outcome.save(&store, None).unwrap();
    assert!(first.ends_with("folding_wing_v1.json"));
    assert!(second.ends_with("folding_wing_v2.json"));

    let stored = store.load_latest("folding_wing").unwrap();
    assert_eq!(stored.version, 2);
    let reloaded = stored.aircraft;
    let total = outcome.aircraft.total_mass.unwrap();
    assert!((reloaded.total_mass.unwrap() - total).abs() < 1e-9 * total);
    let tree = reloaded.mass_breakdown.unwrap();
    assert_eq!(
        tree.leaves().len(),
        outcome.aircraft.mass_breakdown.as_ref().unwrap().leaves().len()
    );
    assert!(reloaded.hinge.is_some());
}

#[test]
fn convergence_plot_is_rendered() {
    let dir = tempfile::tempdir().expect("tempdir");
    let outcome = load("configs/concepts/lift_cruise.yaml").run().unwrap();
    let written = outcome.write_artifacts(&dir.path().join("out"), true).unwrap();
    let png = written.last().unwrap();
    assert!(png.ends_with("lift_cruise_convergence.png"));
    let metadata = fs::metadata(png).expect("png metadata");
    assert!(metadata.len() > 0, "PNG output should not be empty");
}

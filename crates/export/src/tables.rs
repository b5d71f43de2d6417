//! CSV tables of sizing artefacts.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use evtol_aircraft::HingeLoads;
use evtol_mass::MassObject;
use evtol_mission::MissionProfile;
use evtol_sizing::SizingSnapshot;

use crate::ExportError;

/// Create a writer for the target path, handling stdout (`-`) by convention.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    Ok(Box::new(BufWriter::new(file)))
}

/// One node of the mass tree, groups included.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MassRow {
    pub path: String,
    pub depth: usize,
    pub mass_kg: f64,
    pub cg: Option<f64>,
    pub leaf: bool,
}

/// Flatten the tree depth-first; the root row carries the aircraft total.
pub fn mass_rows(tree: &MassObject) -> Vec<MassRow> {
    let mut rows = Vec::new();
    collect(tree, tree.name().to_string(), 0, &mut rows);
    rows
}

fn collect(node: &MassObject, path: String, depth: usize, rows: &mut Vec<MassRow>) {
    rows.push(MassRow {
        path: path.clone(),
        depth,
        mass_kg: node.mass(),
        cg: node.cg(),
        leaf: node.is_leaf(),
    });
    for child in node.children() {
        collect(child, format!("{path}.{}", child.name()), depth + 1, rows);
    }
}

#[derive(Serialize)]
struct PhaseRow<'a> {
    name: &'a str,
    kind: String,
    duration_s: Option<f64>,
    distance_m: f64,
    end_altitude_m: f64,
    power_w: Option<f64>,
    energy_j: Option<f64>,
}

pub fn write_mass_breakdown(path: &Path, tree: &MassObject) -> Result<(), ExportError> {
    write_rows(path, mass_rows(tree))
}

pub fn write_history(path: &Path, history: &[SizingSnapshot]) -> Result<(), ExportError> {
    write_rows(path, history)
}

pub fn write_hinge_distribution(path: &Path, loads: &HingeLoads) -> Result<(), ExportError> {
    write_rows(path, &loads.distribution)
}

pub fn write_mission(path: &Path, mission: &MissionProfile) -> Result<(), ExportError> {
    let rows = mission.phases.iter().map(|phase| {
        let start = phase.start_state();
        let end = phase.end_state();
        PhaseRow {
            name: &phase.name,
            kind: phase.kind.to_string(),
            duration_s: phase.duration,
            distance_m: end.position - start.position,
            end_altitude_m: end.altitude,
            power_w: phase.power,
            energy_j: phase.energy,
        }
    });
    write_rows(path, rows)
}

fn write_rows<I>(path: &Path, rows: I) -> Result<(), ExportError>
where
    I: IntoIterator,
    I::Item: Serialize,
{
    let mut writer = csv::Writer::from_writer(writer_for_path(path)?);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use evtol_mass::MassObject;
    use tempfile::tempdir;

    #[test]
    fn mass_breakdown_lists_every_node() {
        let tree = MassObject::group(
            "C1",
            [
                MassObject::leaf("payload", 10.0, 0.2).unwrap(),
                MassObject::group("airframe", [MassObject::leaf("wing", 30.0, 0.6).unwrap()])
                    .unwrap(),
            ],
        )
        .unwrap();
        let rows = mass_rows(&tree);
        let paths: Vec<_> = rows.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, ["C1", "C1.airframe", "C1.airframe.wing", "C1.payload"]);
        assert_eq!(rows[0].mass_kg, 40.0);
        assert!((rows[0].cg.unwrap() - 0.5).abs() < 1e-12);

        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join("mass.csv");
        write_mass_breakdown(&path, &tree).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("path,depth,mass_kg,cg,leaf"));
        assert_eq!(text.lines().count(), 5);
        assert!(text.contains("C1.airframe.wing,2,30.0,0.6,true"));
    }
}

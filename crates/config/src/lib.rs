//! Configuration models and loaders for aircraft concepts, sizing settings, and phase powers.
//!
//! Concepts are read from a YAML file (one record or a list), a single TOML file, or a
//! directory of such files, sorted by file name. Any input field may carry a unit
//! annotation under `units`, converted to SI through the core unit registry before
//! validation.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use evtol_aircraft::{Aircraft, AircraftError, Field};
use evtol_core::units::{self, UnitError};
use evtol_hinge::HingePolicy;
use evtol_mission::PhasePowers;
use evtol_sizing::SizingSettings;

/// Aircraft record as written in a concept file.
#[derive(Debug, Clone, Deserialize)]
pub struct ConceptFile {
    #[serde(flatten)]
    pub aircraft: Aircraft,
    /// Unit of any field given in something other than SI, keyed by field key.
    #[serde(default)]
    pub units: BTreeMap<String, String>,
}

/// Everything that steers a sizing run besides the concept itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub sizing: SizingSettings,
    pub hinge: HingeSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HingeSettings {
    #[serde(flatten)]
    pub policy: HingePolicy,
    /// Number of evenly spaced stations in the reported distribution.
    pub stations: usize,
}

impl Default for HingeSettings {
    fn default() -> Self {
        Self {
            policy: HingePolicy::default(),
            stations: 21,
        }
    }
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("no aircraft records found in {0}")]
    Empty(PathBuf),
    #[error("unknown field '{0}' in unit annotations")]
    UnknownField(String),
    #[error("field '{0}' is dimensionless and takes no unit")]
    Dimensionless(Field),
    #[error(transparent)]
    Unit(#[from] UnitError),
    #[error("invalid aircraft: {0}")]
    Invalid(#[from] AircraftError),
    #[error("invalid settings: {0}")]
    Settings(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

/// Load and validate aircraft concepts from a file or a directory of concept files.
pub fn load_aircraft<P: AsRef<Path>>(path: P) -> Result<Vec<Aircraft>, ConfigError> {
    let path = path.as_ref();
    let files: Vec<ConceptFile> = load_records(path)?;
    if files.is_empty() {
        return Err(ConfigError::Empty(path.to_path_buf()));
    }
    files
        .into_iter()
        .map(|file| {
            let aircraft = apply_units(file)?;
            aircraft.validate()?;
            log::debug!("loaded aircraft '{}' from {}", aircraft.name, path.display());
            Ok(aircraft)
        })
        .collect()
}

/// Load the first concept from `path`.
pub fn load_single_aircraft<P: AsRef<Path>>(path: P) -> Result<Aircraft, ConfigError> {
    let path = path.as_ref();
    load_aircraft(path)?
        .into_iter()
        .next()
        .ok_or_else(|| ConfigError::Empty(path.to_path_buf()))
}

/// Load sizing and hinge settings from a YAML or TOML file.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings, ConfigError> {
    let settings: Settings = load_document(path.as_ref())?;
    settings
        .sizing
        .validate()
        .map_err(|err| ConfigError::Settings(err.to_string()))?;
    Ok(settings)
}

/// Load an external phase-power table (W) from a YAML or TOML file.
pub fn load_phase_powers<P: AsRef<Path>>(path: P) -> Result<PhasePowers, ConfigError> {
    let powers: PhasePowers = load_document(path.as_ref())?;
    if let Some((name, power)) = powers
        .by_name
        .iter()
        .map(|(k, v)| (k.to_string(), *v))
        .chain(powers.by_kind.iter().map(|(k, v)| (k.to_string(), *v)))
        .find(|(_, v)| !(v.is_finite() && *v >= 0.0))
    {
        return Err(ConfigError::Settings(format!(
            "phase power for '{name}' must be a finite non-negative value (got {power})"
        )));
    }
    Ok(powers)
}

/// SI unit a field is stored in, or `None` for dimensionless fields.
pub fn si_unit(field: Field) -> Option<&'static str> {
    use Field::*;
    match field {
        CruiseSpeed | StallSpeed | ClimbRate | VerticalClimbRate => Some("m/s"),
        CruiseAltitude | Range | HoverHeight | PropellerRadius | WingSpan | WingChord
        | WingMaxChord | HorizontalTailRootThickness | HorizontalTailArm
        | VerticalTailRootThickness | VerticalTailArm | FuselageLength | FuselagePerimeter
        | FuselageWidth | FuselageHeight => Some("m"),
        GroundDuration | TransitionDuration => Some("s"),
        PayloadMass | AvionicsMass => Some("kg"),
        BatterySpecificEnergy => Some("Wh/kg"),
        WingArea | WingMaxArea | HorizontalTailArea | VerticalTailArea => Some("m2"),
        _ => None,
    }
}

fn apply_units(file: ConceptFile) -> Result<Aircraft, ConfigError> {
    let ConceptFile { mut aircraft, units } = file;
    for (key, unit) in &units {
        let field = Field::from_key(key).ok_or_else(|| ConfigError::UnknownField(key.clone()))?;
        let target = si_unit(field).ok_or(ConfigError::Dimensionless(field))?;
        if let Some(value) = field.get(&aircraft) {
            field.set(&mut aircraft, Some(units::convert(value, unit, target)?));
        }
    }
    Ok(aircraft)
}

fn load_document<T>(path: &Path) -> Result<T, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    if is_toml(path) {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

fn load_records<T, P>(path: P) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.is_dir() {
        read_dir_records(path)
    } else if is_toml(path) {
        let contents = std::fs::read_to_string(path)?;
        let record: T = toml::from_str(&contents)?;
        Ok(vec![record])
    } else {
        let reader = File::open(path)?;
        Ok(match serde_yaml::from_reader(reader)? {
            OneOrMany::Many(records) => records,
            OneOrMany::One(record) => vec![record],
        })
    }
}

fn read_dir_records<T>(dir: &Path) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    let mut records = Vec::new();
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| is_toml(path) || is_yaml(path))
        .collect();
    entries.sort();
    for path in entries {
        records.extend(load_records(&path)?);
    }
    Ok(records)
}

fn is_toml(path: &Path) -> bool {
    path.extension().map(|ext| ext == "toml").unwrap_or(false)
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext == "yaml" || ext == "yml")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use evtol_hinge::Combination;
    use evtol_mission::PhaseKind;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn yaml_concept_with_units_is_converted_to_si() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("concept.yaml");
        fs::write(
            &path,
            "name: C1\ncruise_speed: 216\nrange: 100\npayload_mass: 400\n\
             wing:\n  aspect_ratio: 9\nunits:\n  cruise_speed: km/h\n  range: km\n",
        )
        .unwrap();
        let aircraft = load_single_aircraft(&path).unwrap();
        assert_eq!(aircraft.name, "C1");
        assert!((aircraft.cruise_speed.unwrap() - 60.0).abs() < 1e-9);
        assert!((aircraft.range.unwrap() - 100_000.0).abs() < 1e-6);
        assert_eq!(aircraft.wing.aspect_ratio, Some(9.0));
        assert_eq!(aircraft.cl_max, Some(1.6));
    }

    #[test]
    fn directory_of_records_loads_sorted() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.toml"), "name = \"B\"\n").unwrap();
        fs::write(dir.path().join("c.yaml"), "- name: C1\n- name: C2\n").unwrap();
        fs::write(dir.path().join("a.toml"), "name = \"A\"\n[wing]\ntaper_ratio = 0.5\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        let records = load_aircraft(dir.path()).unwrap();
        let names: Vec<_> = records.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["A", "B", "C1", "C2"]);
        assert_eq!(records[0].wing.taper_ratio, Some(0.5));
    }

    #[test]
    fn invalid_records_and_units_are_rejected() {
        let dir = tempdir().unwrap();
        let bad_value = dir.path().join("bad.yaml");
        fs::write(&bad_value, "- name: X\n  figure_of_merit: 1.4\n").unwrap();
        assert!(matches!(
            load_aircraft(&bad_value),
            Err(ConfigError::Invalid(AircraftError::InvalidValue {
                field: Field::FigureOfMerit,
                ..
            }))
        ));

        let bad_unit = dir.path().join("unit.yaml");
        fs::write(&bad_unit, "name: Y\nrange: 10\nunits:\n  range: kg\n").unwrap();
        assert!(matches!(
            load_aircraft(&bad_unit),
            Err(ConfigError::Unit(UnitError::IncompatibleDimensions { .. }))
        ));

        let dimensionless = dir.path().join("dimless.yaml");
        fs::write(&dimensionless, "name: Z\ncd0: 0.03\nunits:\n  cd0: m\n").unwrap();
        assert!(matches!(
            load_aircraft(&dimensionless),
            Err(ConfigError::Dimensionless(Field::Cd0))
        ));
    }

    #[test]
    fn settings_fill_defaults_and_read_overrides() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(
            &path,
            "[sizing]\ntolerance = 0.001\n[sizing.cg_table]\nbattery = 0.5\n\n\
             [hinge]\ncombination = \"max_of_components\"\nstations = 11\n\
             [hinge.overrides.C2]\ncombination = \"superpose\"\nengine_stations = [0.4]\n",
        )
        .unwrap();
        let settings = load_settings(&path).unwrap();
        assert_eq!(settings.sizing.tolerance, 0.001);
        assert_eq!(settings.sizing.max_iterations, 200);
        assert_eq!(settings.sizing.cg_table.get("battery"), Some(&0.5));
        assert_eq!(settings.hinge.stations, 11);
        assert_eq!(settings.hinge.policy.combination, Combination::MaxOfComponents);
        assert_eq!(
            settings.hinge.policy.resolve("C2").engine_stations,
            Some(vec![0.4])
        );

        fs::write(&path, "[sizing]\ndamping = 0.0\n").unwrap();
        assert!(matches!(load_settings(&path), Err(ConfigError::Settings(_))));
    }

    #[test]
    fn phase_powers_load_by_name_and_kind() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("powers.yaml");
        fs::write(
            &path,
            "by_name:\n  cruise: 120000\nby_kind:\n  hover_climb: 400000\n",
        )
        .unwrap();
        let powers = load_phase_powers(&path).unwrap();
        assert_eq!(powers.by_name.get("cruise"), Some(&120_000.0));
        assert_eq!(powers.by_kind.get(&PhaseKind::HoverClimb), Some(&400_000.0));

        fs::write(&path, "by_name:\n  cruise: -1\n").unwrap();
        assert!(matches!(load_phase_powers(&path), Err(ConfigError::Settings(_))));
    }
}

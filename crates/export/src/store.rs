//! Versioned JSON store of aircraft concepts: `<directory>/<name>_v<version>.json`.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use evtol_aircraft::Aircraft;

use crate::ExportError;

/// Stored document: the aircraft plus bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredConcept {
    pub version: u32,
    /// RFC 3339 UTC timestamp.
    pub saved_at: String,
    pub aircraft: Aircraft,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConceptStore {
    directory: PathBuf,
}

impl ConceptStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn path_for(&self, name: &str, version: u32) -> PathBuf {
        self.directory.join(format!("{name}_v{version}.json"))
    }

    /// Write `aircraft` as `version`, replacing any existing file of that version.
    pub fn save(&self, aircraft: &Aircraft, version: u32) -> Result<PathBuf, ExportError> {
        check_name(&aircraft.name)?;
        fs::create_dir_all(&self.directory)?;
        let path = self.path_for(&aircraft.name, version);
        if path.exists() {
            log::warn!("overwriting {}", path.display());
        }
        let document = StoredConcept {
            version,
            saved_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            aircraft: aircraft.clone(),
        };
        serde_json::to_writer_pretty(BufWriter::new(File::create(&path)?), &document)?;
        log::info!("saved '{}' v{version} to {}", aircraft.name, path.display());
        Ok(path)
    }

    pub fn load(&self, name: &str, version: u32) -> Result<StoredConcept, ExportError> {
        check_name(name)?;
        let path = self.path_for(name, version);
        if !path.exists() {
            return Err(ExportError::NotFound {
                name: name.to_string(),
                version: Some(version),
            });
        }
        Ok(serde_json::from_reader(BufReader::new(File::open(path)?))?)
    }

    /// Stored versions of `name`, ascending.
    pub fn versions(&self, name: &str) -> Result<Vec<u32>, ExportError> {
        check_name(name)?;
        if !self.directory.is_dir() {
            return Ok(Vec::new());
        }
        let prefix = format!("{name}_v");
        let mut versions: Vec<u32> = fs::read_dir(&self.directory)?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let file_name = entry.file_name();
                let file_name = file_name.to_str()?;
                file_name
                    .strip_prefix(&prefix)?
                    .strip_suffix(".json")?
                    .parse()
                    .ok()
            })
            .collect();
        versions.sort_unstable();
        Ok(versions)
    }

    pub fn load_latest(&self, name: &str) -> Result<StoredConcept, ExportError> {
        let latest = self
            .versions(name)?
            .last()
            .copied()
            .ok_or_else(|| ExportError::NotFound {
                name: name.to_string(),
                version: None,
            })?;
        self.load(name, latest)
    }

    /// Version following the latest stored one (1 for a new concept).
    pub fn next_version(&self, name: &str) -> Result<u32, ExportError> {
        Ok(self.versions(name)?.last().map_or(1, |v| v + 1))
    }
}

fn check_name(name: &str) -> Result<(), ExportError> {
    let valid = !name.is_empty()
        && !name.contains(['/', '\\'])
        && name != "."
        && name != "..";
    if valid {
        Ok(())
    } else {
        Err(ExportError::InvalidName(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn versions_round_trip_and_latest_wins() {
        let dir = tempdir().unwrap();
        let store = ConceptStore::new(dir.path().join("store"));
        assert_eq!(store.versions("C1").unwrap(), Vec::<u32>::new());
        assert_eq!(store.next_version("C1").unwrap(), 1);

        let mut aircraft = Aircraft::new("C1");
        aircraft.payload_mass = Some(400.0);
        store.save(&aircraft, 1).unwrap();
        aircraft.payload_mass = Some(450.0);
        let path = store.save(&aircraft, 10).unwrap();
        assert!(path.ends_with("C1_v10.json"));
        store.save(&Aircraft::new("C10"), 3).unwrap();

        assert_eq!(store.versions("C1").unwrap(), vec![1, 10]);
        assert_eq!(store.next_version("C1").unwrap(), 11);
        let first = store.load("C1", 1).unwrap();
        assert_eq!(first.aircraft.payload_mass, Some(400.0));
        let latest = store.load_latest("C1").unwrap();
        assert_eq!(latest.version, 10);
        assert_eq!(latest.aircraft, aircraft);
        assert!(latest.saved_at.ends_with('Z'));
    }

    #[test]
    fn missing_concepts_and_bad_names_fail() {
        let dir = tempdir().unwrap();
        let store = ConceptStore::new(dir.path());
        assert!(matches!(
            store.load("ghost", 2),
            Err(ExportError::NotFound {
                version: Some(2),
                ..
            })
        ));
        assert!(matches!(
            store.load_latest("ghost"),
            Err(ExportError::NotFound { version: None, .. })
        ));
        assert!(matches!(
            store.save(&Aircraft::new("../escape"), 1),
            Err(ExportError::InvalidName(_))
        ));
    }
}

//! End-to-end study of one concept: load, size, evaluate the hinge, write artefacts.

use std::path::{Path, PathBuf};

use thiserror::Error;

use evtol_aircraft::{Aircraft, HingeLoads};
use evtol_config::{ConfigError, Settings};
use evtol_export::{ConceptStore, ExportError};
use evtol_hinge::HingeError;
use evtol_mission::PhasePowers;
use evtol_sizing::{SizingError, SizingReport};

#[derive(Debug, Error)]
pub enum StudyError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("sizing failed: {0}")]
    Sizing(#[from] SizingError),
    #[error("hinge loads: {0}")]
    Hinge(#[from] HingeError),
    #[error("export failed: {0}")]
    Export(#[from] ExportError),
}

/// Inputs of a study.
#[derive(Debug, Clone, Default)]
pub struct Study {
    pub aircraft: Aircraft,
    pub settings: Settings,
    pub powers: Option<PhasePowers>,
}

/// Sized concept and everything computed on the way.
#[derive(Debug, Clone)]
pub struct StudyOutcome {
    pub aircraft: Aircraft,
    pub report: SizingReport,
    pub hinge: Option<HingeLoads>,
}

impl Study {
    pub fn load(
        aircraft: &Path,
        settings: Option<&Path>,
        powers: Option<&Path>,
    ) -> Result<Self, StudyError> {
        Ok(Self {
            aircraft: evtol_config::load_single_aircraft(aircraft)?,
            settings: settings
                .map(evtol_config::load_settings)
                .transpose()?
                .unwrap_or_default(),
            powers: powers.map(evtol_config::load_phase_powers).transpose()?,
        })
    }

    /// Size the concept; folding-wing concepts (hinge position set) also get hinge loads.
    pub fn run(&self) -> Result<StudyOutcome, StudyError> {
        let mut aircraft = self.aircraft.clone();
        let report =
            evtol_sizing::size_aircraft(&mut aircraft, &self.settings.sizing, self.powers.as_ref())?;
        for warning in &report.warnings {
            log::warn!("{}: {warning}", aircraft.name);
        }

        let hinge = if aircraft.wing.hinge_position.is_some() {
            let hinge = &self.settings.hinge;
            Some(evtol_hinge::apply_hinge_loads(
                &mut aircraft,
                &hinge.policy,
                hinge.stations,
            )?)
        } else {
            None
        };

        Ok(StudyOutcome {
            aircraft,
            report,
            hinge,
        })
    }
}

impl StudyOutcome {
    /// Write CSV tables (and optionally the convergence plot) into `directory`.
    pub fn write_artifacts(&self, directory: &Path, plot: bool) -> Result<Vec<PathBuf>, StudyError> {
        let name = &self.aircraft.name;
        let mut written = Vec::new();

        if let Some(tree) = &self.aircraft.mass_breakdown {
            let path = directory.join(format!("{name}_mass.csv"));
            evtol_export::write_mass_breakdown(&path, tree)?;
            written.push(path);
        }

        let path = directory.join(format!("{name}_history.csv"));
        evtol_export::write_history(&path, &self.report.history)?;
        written.push(path);

        let path = directory.join(format!("{name}_mission.csv"));
        evtol_export::write_mission(&path, &self.aircraft.mission)?;
        written.push(path);

        if let Some(loads) = &self.hinge {
            let path = directory.join(format!("{name}_hinge.csv"));
            evtol_export::write_hinge_distribution(&path, loads)?;
            written.push(path);
        }

        if plot {
            let path = directory.join(format!("{name}_convergence.png"));
            evtol_export::plot_convergence(&path, name, &self.report.history, (900, 600))?;
            written.push(path);
        }

        Ok(written)
    }

    /// Save the sized concept; `None` picks the next free version.
    pub fn save(&self, store: &ConceptStore, version: Option<u32>) -> Result<PathBuf, StudyError> {
        let version = match version {
            Some(v) => v,
            None => store.next_version(&self.aircraft.name)?,
        };
        Ok(store.save(&self.aircraft, version)?)
    }
}

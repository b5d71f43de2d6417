//! Nested Class I / Class II sizing loop.
//!
//! The outer loop re-sizes the lifting surfaces from the current total mass (Class I); the
//! inner loop finds the fixed point of the Class II mass budget with that geometry frozen.
//! Powers, energies, and propulsion masses are re-evaluated at every inner trial mass.

pub mod class_one;
pub mod class_two;
pub mod fixed_point;

use std::fmt;
use std::thread;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use evtol_aircraft::{Aircraft, AircraftError, Field, GeometryError};
use evtol_mass::{CgTable, MassError, MassObject};
use evtol_mission::{MissionError, MissionProfile, MissionWarning, PhasePowers, StandardMission};
use evtol_weights::WeightsError;

pub use class_one::{ClassOne, PowerEstimate};
pub use class_two::{ClassTwo, budget};
pub use fixed_point::{FixedPoint, IterationError, IterationSettings, iterate};

/// Which loop failed to converge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Inner,
    Outer,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Inner => "inner (Class II)",
            Stage::Outer => "outer (Class I)",
        })
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SizingError {
    #[error(transparent)]
    Aircraft(#[from] AircraftError),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error(transparent)]
    Mission(#[from] MissionError),
    #[error(transparent)]
    Weights(#[from] WeightsError),
    #[error("mass tree: {0}")]
    Mass(#[from] MassError),
    #[error("payload {payload} kg is not below the trial total mass {total} kg")]
    PayloadExceedsTotal { payload: f64, total: f64 },
    #[error("mission has no powered phases")]
    EmptyMission,
    #[error(
        "{stage} loop did not converge after {iterations} iterations (last total mass {last_iterate} kg)"
    )]
    NotConverged {
        stage: Stage,
        last_iterate: f64,
        iterations: usize,
        /// Iterates of the failing loop, starting guess first.
        history: Vec<f64>,
        /// Outer iterations completed before the failure.
        snapshots: Vec<SizingSnapshot>,
    },
    #[error("{stage} loop produced a non-positive total mass {iterate} kg")]
    NonPositiveMass { stage: Stage, iterate: f64 },
    #[error("invalid sizing settings: {0}")]
    InvalidSettings(&'static str),
}

impl SizingError {
    fn from_inner(err: IterationError<SizingError>, snapshots: &[SizingSnapshot]) -> Self {
        match err {
            IterationError::Map(err) => err,
            IterationError::NotConverged {
                last_iterate,
                iterations,
                history,
                ..
            } => SizingError::NotConverged {
                stage: Stage::Inner,
                last_iterate,
                iterations,
                history,
                snapshots: snapshots.to_vec(),
            },
            IterationError::NonPositive { iterate } => SizingError::NonPositiveMass {
                stage: Stage::Inner,
                iterate,
            },
            IterationError::InvalidSettings(reason) => SizingError::InvalidSettings(reason),
        }
    }
}

/// Tolerances, budgets, and the cg lookup applied to the converged mass tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizingSettings {
    /// Starting guess for the total mass (kg).
    pub initial_mass: f64,
    /// Inner fixed-point tolerance (kg).
    pub tolerance: f64,
    pub max_iterations: usize,
    pub damping: f64,
    /// Relative change in total mass and wing area that ends the outer loop.
    pub outer_tolerance: f64,
    pub outer_max_iterations: usize,
    /// Component cg fractions; entries override [`default_cg_table`].
    pub cg_table: CgTable,
}

impl Default for SizingSettings {
    fn default() -> Self {
        let inner = IterationSettings::default();
        Self {
            initial_mass: 1_500.0,
            tolerance: inner.tolerance,
            max_iterations: inner.max_iterations,
            damping: inner.damping,
            outer_tolerance: 1e-4,
            outer_max_iterations: 50,
            cg_table: CgTable::new(),
        }
    }
}

impl SizingSettings {
    pub fn iteration(&self) -> IterationSettings {
        IterationSettings {
            tolerance: self.tolerance,
            max_iterations: self.max_iterations,
            damping: self.damping,
        }
    }

    pub fn validate(&self) -> Result<(), SizingError> {
        self.iteration()
            .validate()
            .map_err(SizingError::InvalidSettings)?;
        if !(self.initial_mass > 0.0 && self.initial_mass.is_finite()) {
            return Err(SizingError::InvalidSettings("initial_mass must be positive"));
        }
        if !(self.outer_tolerance > 0.0 && self.outer_tolerance.is_finite()) {
            return Err(SizingError::InvalidSettings("outer_tolerance must be positive"));
        }
        if self.outer_max_iterations == 0 {
            return Err(SizingError::InvalidSettings(
                "outer_max_iterations must be at least 1",
            ));
        }
        Ok(())
    }

    /// Default cg table overlaid with the configured entries.
    pub fn effective_cg_table(&self) -> CgTable {
        let mut table = default_cg_table();
        table.extend(self.cg_table.iter().map(|(k, v)| (k.clone(), *v)));
        table
    }
}

/// Fuselage-fraction cg positions for every budget leaf.
pub fn default_cg_table() -> CgTable {
    [
        ("payload", 0.40),
        ("battery", 0.45),
        ("wing", 0.40),
        ("fuselage", 0.45),
        ("horizontal_tail", 0.95),
        ("vertical_tail", 0.95),
        ("landing_gear", 0.45),
        ("motors", 0.40),
        ("propellers", 0.40),
        ("flight_controls", 0.35),
        ("electrical", 0.30),
        ("furnishings", 0.40),
        ("avionics", 0.15),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

/// State at the end of one outer iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingSnapshot {
    pub iteration: usize,
    pub total_mass: f64,
    pub wing_area: f64,
    pub inner_iterations: usize,
    pub battery_mass: f64,
    pub hover_power: f64,
    pub cruise_power: f64,
    pub reference_power: f64,
    pub mission_energy: f64,
}

/// Outcome of a successful sizing run; the sized values live on the aircraft.
#[derive(Debug, Clone, PartialEq)]
pub struct SizingReport {
    pub history: Vec<SizingSnapshot>,
    pub inner_iterations: usize,
    pub warnings: Vec<MissionWarning>,
}

impl SizingReport {
    pub fn outer_iterations(&self) -> usize {
        self.history.len()
    }
}

/// Every field the sizing chain reads, checked before the first iteration.
const REQUIRED: &[Field] = &[
    Field::CruiseSpeed,
    Field::CruiseAltitude,
    Field::ClMax,
    Field::Cd0,
    Field::OswaldEfficiency,
    Field::UltimateLoadFactor,
    Field::PassengerCount,
    Field::PayloadMass,
    Field::AvionicsMass,
    Field::MotorCount,
    Field::PropellerRadius,
    Field::PropellerBladeCount,
    Field::FigureOfMerit,
    Field::PropellerEfficiency,
    Field::MotorEfficiency,
    Field::MotorSpecificPower,
    Field::ThrustToWeight,
    Field::BatterySpecificEnergy,
    Field::BatteryEfficiency,
    Field::SocMin,
    Field::WingAspectRatio,
    Field::FuselageLength,
];

const MISSION_FIELDS: &[Field] = &[
    Field::CruiseSpeed,
    Field::CruiseAltitude,
    Field::Range,
    Field::HoverHeight,
    Field::VerticalClimbRate,
    Field::ClimbRate,
    Field::GroundDuration,
    Field::TransitionDuration,
];

/// Standard mission template filled from the aircraft record.
pub fn standard_mission(aircraft: &Aircraft) -> Result<StandardMission, AircraftError> {
    aircraft.require_all(MISSION_FIELDS)?;
    Ok(StandardMission {
        cruise_altitude: aircraft.require(Field::CruiseAltitude)?,
        cruise_speed: aircraft.require(Field::CruiseSpeed)?,
        range: aircraft.require(Field::Range)?,
        hover_height: aircraft.require(Field::HoverHeight)?,
        vertical_speed: aircraft.require(Field::VerticalClimbRate)?,
        climb_rate: aircraft.require(Field::ClimbRate)?,
        ground_duration: aircraft.require(Field::GroundDuration)?,
        transition_duration: aircraft.require(Field::TransitionDuration)?,
    })
}

/// Size `aircraft` in place.
///
/// An empty mission is replaced by the standard template; a given one is validated and
/// repaired first. On failure the aircraft is left untouched.
pub fn size_aircraft(
    aircraft: &mut Aircraft,
    settings: &SizingSettings,
    powers: Option<&PhasePowers>,
) -> Result<SizingReport, SizingError> {
    settings.validate()?;
    aircraft.validate()?;
    aircraft.require_all(REQUIRED)?;

    let mut working = aircraft.clone();
    working.clear_outputs();
    if working.wing.area.is_some() || working.wing.span.is_some() || working.wing.chord.is_some() {
        working.wing.resolve_planform()?;
    }

    let repaired = if working.mission.is_empty() {
        MissionProfile::standard(&standard_mission(&working)?)?
    } else {
        working.mission.validate_and_repair()
    };
    working.mission = repaired.value;
    let warnings = repaired.warnings;

    let iteration = settings.iteration();
    let mut mass = settings.initial_mass;
    let mut wing_area = working.wing.area;
    let mut masses = vec![mass];
    let mut history = Vec::new();
    let mut inner_total = 0;

    for outer in 1..=settings.outer_max_iterations {
        let class_one = ClassOne::estimate(&working, mass)?;
        class_one.apply(&mut working)?;

        let fixed = iterate(
            |m| ClassTwo::evaluate(&working, m, powers).map(|c| c.total()),
            mass,
            &iteration,
        )
        .map_err(|err| SizingError::from_inner(err, &history))?;
        inner_total += fixed.iterations;

        // Freeze the budget at the converged mass so the total is exactly its sum.
        let class_two = ClassTwo::evaluate(&working, fixed.value, powers)?;
        let total = class_two.total();
        let area = class_one.wing_area;

        history.push(SizingSnapshot {
            iteration: outer,
            total_mass: total,
            wing_area: area,
            inner_iterations: fixed.iterations,
            battery_mass: class_two.battery_mass(),
            hover_power: class_two.powers.hover,
            cruise_power: class_two.powers.cruise,
            reference_power: class_two.reference_power,
            mission_energy: class_two.mission_energy,
        });
        masses.push(total);
        log::debug!(
            "outer iteration {outer}: m = {total:.3} kg, S = {area:.4} m², {} inner iterations",
            fixed.iterations
        );

        let mass_change = relative_change(mass, total);
        let area_change = wing_area.map_or(f64::INFINITY, |prev| relative_change(prev, area));
        mass = total;
        wing_area = Some(area);

        if mass_change < settings.outer_tolerance && area_change < settings.outer_tolerance {
            let mut tree = MassObject::from_breakdown(working.name.clone(), &class_two.breakdown)?;
            tree.set_cg_from_table(&settings.effective_cg_table())?;

            working.total_mass = Some(total);
            working.hover_power = Some(class_two.powers.hover);
            working.cruise_power = Some(class_two.powers.cruise);
            working.reference_power = Some(class_two.reference_power);
            working.mission_energy = Some(class_two.mission_energy);
            working.mission = class_two.mission;
            working.mass_breakdown = Some(tree);
            *aircraft = working;

            log::info!(
                "sized '{}': {total:.2} kg after {outer} outer / {inner_total} inner iterations",
                aircraft.name
            );
            return Ok(SizingReport {
                history,
                inner_iterations: inner_total,
                warnings,
            });
        }
    }

    Err(SizingError::NotConverged {
        stage: Stage::Outer,
        last_iterate: mass,
        iterations: settings.outer_max_iterations,
        history: masses,
        snapshots: history,
    })
}

fn relative_change(previous: f64, current: f64) -> f64 {
    (current - previous).abs() / current.abs().max(f64::EPSILON)
}

/// One point of a parameter sweep.
#[derive(Debug)]
pub struct SweepPoint {
    pub value: f64,
    pub result: Result<(Aircraft, SizingReport), SizingError>,
}

/// Size one copy of `base` per value, in parallel. `configure` applies the swept value.
pub fn sweep<F>(
    base: &Aircraft,
    values: &[f64],
    settings: &SizingSettings,
    powers: Option<&PhasePowers>,
    configure: F,
) -> Vec<SweepPoint>
where
    F: Fn(&mut Aircraft, f64) + Sync,
{
    let configure = &configure;
    thread::scope(|scope| {
        let handles: Vec<_> = values
            .iter()
            .map(|&value| {
                let mut aircraft = base.clone();
                scope.spawn(move || {
                    configure(&mut aircraft, value);
                    let result =
                        size_aircraft(&mut aircraft, settings, powers).map(|report| (aircraft, report));
                    SweepPoint { value, result }
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
            .collect()
    })
}

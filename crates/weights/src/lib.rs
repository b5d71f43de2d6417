//! Class II mass estimation: component regressions and the battery model.

pub mod battery;
pub mod components;
pub mod regressions;

use evtol_aircraft::AircraftError;
use evtol_mission::MissionError;
use thiserror::Error;

pub use battery::{BatterySpec, battery_mass, mission_energy};
pub use components::*;

#[derive(Debug, Error, PartialEq)]
pub enum WeightsError {
    #[error(transparent)]
    Aircraft(#[from] AircraftError),
    #[error("mission energy unavailable: {0}")]
    Mission(#[from] MissionError),
    #[error("trial total mass must be positive (got {0} kg)")]
    NonPositiveTrialMass(f64),
    #[error("component '{component}' evaluated to non-positive mass {mass} kg")]
    NonPositiveMass { component: &'static str, mass: f64 },
}

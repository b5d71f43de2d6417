//! Class II mass budget at a trial total mass.

use evtol_aircraft::{Aircraft, Field, Tail};
use evtol_mass::MassBreakdown;
use evtol_mission::{MissionProfile, PhasePowers};
use evtol_weights::{self as weights, BatterySpec};

use crate::SizingError;
use crate::class_one::PowerEstimate;

/// One evaluation of the Class II map `m -> g(m)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassTwo {
    pub trial_mass: f64,
    pub powers: PowerEstimate,
    /// Mission with powers and energies filled in.
    pub mission: MissionProfile,
    /// Peak phase power (W); sizes the motors and propellers.
    pub reference_power: f64,
    pub mission_energy: f64,
    pub breakdown: MassBreakdown,
}

impl ClassTwo {
    /// Recompute powers, mission energy, and every component mass at `trial_mass`.
    ///
    /// `overrides` replace the estimated power of the phases they name.
    pub fn evaluate(
        aircraft: &Aircraft,
        trial_mass: f64,
        overrides: Option<&PhasePowers>,
    ) -> Result<Self, SizingError> {
        let powers = PowerEstimate::at_mass(aircraft, trial_mass)?;
        let mut mission = aircraft.mission.clone();
        mission.assign_powers(&powers.to_phase_powers())?;
        if let Some(overrides) = overrides {
            mission.assign_powers(overrides)?;
        }
        let mission_energy = mission.compute_energies()?;
        let reference_power = mission
            .peak_power()
            .ok_or(SizingError::EmptyMission)?;
        let breakdown = budget(aircraft, &mission, reference_power, trial_mass)?;
        Ok(Self {
            trial_mass,
            powers,
            mission,
            reference_power,
            mission_energy,
            breakdown,
        })
    }

    /// `g(m)`: the summed budget.
    pub fn total(&self) -> f64 {
        self.breakdown.total()
    }

    pub fn battery_mass(&self) -> f64 {
        self.breakdown.get("battery").unwrap_or(0.0)
    }
}

/// Nested mass budget for a mission whose phases already carry powers.
///
/// Tails without an area and a zero avionics allowance are left out of the tree.
pub fn budget(
    aircraft: &Aircraft,
    mission: &MissionProfile,
    reference_power: f64,
    trial_mass: f64,
) -> Result<MassBreakdown, SizingError> {
    let payload = aircraft.require(Field::PayloadMass)?;
    if payload >= trial_mass {
        return Err(SizingError::PayloadExceedsTotal {
            payload,
            total: trial_mass,
        });
    }

    let battery = weights::battery_mass(mission, &BatterySpec::from_aircraft(aircraft)?)?;

    let mut airframe = vec![
        ("wing", weights::wing_mass(aircraft, trial_mass)?),
        ("fuselage", weights::fuselage_mass(aircraft, trial_mass)?),
        ("landing_gear", weights::landing_gear_mass(aircraft, trial_mass)?),
    ];
    if has_surface(&aircraft.horizontal_tail) {
        airframe.push((
            "horizontal_tail",
            weights::horizontal_tail_mass(aircraft, trial_mass)?,
        ));
    }
    if has_surface(&aircraft.vertical_tail) {
        airframe.push((
            "vertical_tail",
            weights::vertical_tail_mass(aircraft, trial_mass)?,
        ));
    }

    let propulsion = [
        ("motors", weights::motor_mass(aircraft, reference_power)?),
        ("propellers", weights::propeller_mass(aircraft, reference_power)?),
    ];

    let mut fixed_equipment = vec![
        ("flight_controls", weights::flight_controls_mass(aircraft, trial_mass)?),
        ("electrical", weights::electrical_mass(aircraft, trial_mass)?),
        ("furnishings", weights::furnishings_mass(aircraft, trial_mass)?),
    ];
    let avionics = weights::avionics_mass(aircraft)?;
    if avionics > 0.0 {
        fixed_equipment.push(("avionics", avionics));
    }

    Ok(MassBreakdown::group([
        ("payload", MassBreakdown::Mass(payload)),
        ("battery", MassBreakdown::Mass(battery)),
        ("airframe", leaves(airframe)),
        ("propulsion", leaves(propulsion)),
        ("fixed_equipment", leaves(fixed_equipment)),
    ]))
}

fn has_surface(tail: &Tail) -> bool {
    tail.area.is_some()
}

fn leaves<I>(entries: I) -> MassBreakdown
where
    I: IntoIterator<Item = (&'static str, f64)>,
{
    MassBreakdown::group(entries.into_iter().map(|(k, m)| (k, MassBreakdown::Mass(m))))
}

//! Energy-system mass from mission energy.

use evtol_aircraft::{Aircraft, Field};
use evtol_core::units::wh_to_j;
use evtol_mission::{MissionError, MissionProfile};

use crate::WeightsError;

/// Battery pack parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatterySpec {
    /// Pack specific energy (Wh/kg).
    pub specific_energy: f64,
    /// Discharge/system efficiency.
    pub efficiency: f64,
    /// Minimum state of charge kept in reserve.
    pub soc_min: f64,
}

impl BatterySpec {
    pub fn from_aircraft(aircraft: &Aircraft) -> Result<Self, WeightsError> {
        Ok(Self {
            specific_energy: aircraft.require(Field::BatterySpecificEnergy)?,
            efficiency: aircraft.require(Field::BatteryEfficiency)?,
            soc_min: aircraft.require(Field::SocMin)?,
        })
    }

    /// Pack mass (kg) for a required mission energy (J): `E (1 + SoC_min) / (e η)`.
    pub fn mass_for_energy(&self, energy_j: f64) -> f64 {
        energy_j * (1.0 + self.soc_min) / (wh_to_j(self.specific_energy) * self.efficiency)
    }
}

/// Required mission energy (J): each phase's energy, or power × duration when only the power
/// is known.
pub fn mission_energy(profile: &MissionProfile) -> Result<f64, MissionError> {
    profile.phases.iter().try_fold(0.0, |acc, phase| {
        let energy = match (phase.energy, phase.power, phase.duration) {
            (Some(energy), _, _) => energy,
            (None, Some(power), Some(duration)) => power * duration,
            (None, Some(_), None) => {
                return Err(MissionError::MissingDuration {
                    phase: phase.name.clone(),
                });
            }
            (None, None, _) => {
                return Err(MissionError::MissingPower {
                    phase: phase.name.clone(),
                });
            }
        };
        Ok(acc + energy)
    })
}

/// Battery mass (kg) for the mission.
pub fn battery_mass(profile: &MissionProfile, pack: &BatterySpec) -> Result<f64, WeightsError> {
    let energy = mission_energy(profile)?;
    let mass = pack.mass_for_energy(energy);
    if mass > 0.0 && mass.is_finite() {
        Ok(mass)
    } else {
        Err(WeightsError::NonPositiveMass {
            component: "battery",
            mass,
        })
    }
}

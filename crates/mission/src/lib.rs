//! Mission profile model: an ordered sequence of flight phases with kinematics, power and energy.

pub mod repair;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use repair::{MissionWarning, Repaired};

/// Kind of flight phase. Vertical kinds are flown on the lift system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    Takeoff,
    HoverClimb,
    Transition,
    Climb,
    Cruise,
    Loiter,
    Descent,
    HoverDescent,
    Landing,
}

impl PhaseKind {
    /// Phases flown in powered-lift (hover) mode.
    pub fn is_vertical(self) -> bool {
        matches!(
            self,
            PhaseKind::Takeoff | PhaseKind::HoverClimb | PhaseKind::HoverDescent | PhaseKind::Landing
        )
    }
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PhaseKind::Takeoff => "takeoff",
            PhaseKind::HoverClimb => "hover climb",
            PhaseKind::Transition => "transition",
            PhaseKind::Climb => "climb",
            PhaseKind::Cruise => "cruise",
            PhaseKind::Loiter => "loiter",
            PhaseKind::Descent => "descent",
            PhaseKind::HoverDescent => "hover descent",
            PhaseKind::Landing => "landing",
        };
        f.write_str(label)
    }
}

/// Time (s), horizontal position (m) and altitude (m) at a phase boundary.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PhaseState {
    pub time: f64,
    pub position: f64,
    pub altitude: f64,
}

impl PhaseState {
    /// Component-wise comparison with an absolute tolerance.
    pub fn matches(&self, other: &PhaseState, tol: f64) -> bool {
        (self.time - other.time).abs() <= tol
            && (self.position - other.position).abs() <= tol
            && (self.altitude - other.altitude).abs() <= tol
    }
}

/// A single mission phase. Speeds in m/s, distances in m, power in W, energy in J.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionPhase {
    pub name: String,
    pub kind: PhaseKind,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub horizontal_speed: f64,
    #[serde(default)]
    pub vertical_speed: f64,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub end_altitude: Option<f64>,
    /// Start state; `None` means "continue from the previous phase".
    #[serde(default)]
    pub start: Option<PhaseState>,
    #[serde(default)]
    pub power: Option<f64>,
    #[serde(default)]
    pub energy: Option<f64>,
}

impl MissionPhase {
    pub fn new(name: impl Into<String>, kind: PhaseKind) -> Self {
        Self {
            name: name.into(),
            kind,
            duration: None,
            horizontal_speed: 0.0,
            vertical_speed: 0.0,
            distance: None,
            end_altitude: None,
            start: None,
            power: None,
            energy: None,
        }
    }

    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn with_speeds(mut self, horizontal: f64, vertical: f64) -> Self {
        self.horizontal_speed = horizontal;
        self.vertical_speed = vertical;
        self
    }

    pub fn with_distance(mut self, distance: f64) -> Self {
        self.distance = Some(distance);
        self
    }

    pub fn with_end_altitude(mut self, altitude: f64) -> Self {
        self.end_altitude = Some(altitude);
        self
    }

    pub fn with_start(mut self, start: PhaseState) -> Self {
        self.start = Some(start);
        self
    }

    pub fn start_state(&self) -> PhaseState {
        self.start.unwrap_or_default()
    }

    /// State at the end of the phase, derived from the start state and kinematics.
    pub fn end_state(&self) -> PhaseState {
        let start = self.start_state();
        let duration = self.duration.unwrap_or(0.0);
        PhaseState {
            time: start.time + duration,
            position: start.position
                + self
                    .distance
                    .unwrap_or(self.horizontal_speed * duration),
            altitude: self
                .end_altitude
                .unwrap_or(start.altitude + self.vertical_speed * duration),
        }
    }
}

/// Externally supplied electrical power per phase (W), by phase name with a per-kind fallback.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhasePowers {
    #[serde(default)]
    pub by_name: BTreeMap<String, f64>,
    #[serde(default)]
    pub by_kind: BTreeMap<PhaseKind, f64>,
}

impl PhasePowers {
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty() && self.by_kind.is_empty()
    }

    pub fn power_for(&self, phase: &MissionPhase) -> Option<f64> {
        self.by_name
            .get(&phase.name)
            .or_else(|| self.by_kind.get(&phase.kind))
            .copied()
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum MissionError {
    #[error("phase '{phase}' has no power assigned")]
    MissingPower { phase: String },
    #[error("phase '{phase}' has no duration")]
    MissingDuration { phase: String },
    #[error("phase '{phase}' has no energy; run compute_energies first")]
    MissingEnergy { phase: String },
    #[error("phase '{phase}' power {power} W is not a finite non-negative value")]
    InvalidPower { phase: String, power: f64 },
    #[error("range {range} m is shorter than the climb/transition/descent legs ({required} m)")]
    RangeTooShort { range: f64, required: f64 },
    #[error("mission parameter '{0}' must be positive")]
    NonPositive(&'static str),
}

/// Ordered sequence of phases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MissionProfile {
    #[serde(default)]
    pub phases: Vec<MissionPhase>,
}

/// Inputs for the standard vertical take-off, cruise, vertical landing template.
#[derive(Debug, Clone)]
pub struct StandardMission {
    pub cruise_altitude: f64,
    pub cruise_speed: f64,
    pub range: f64,
    pub hover_height: f64,
    pub vertical_speed: f64,
    pub climb_rate: f64,
    pub ground_duration: f64,
    pub transition_duration: f64,
}

impl MissionProfile {
    pub fn new(phases: Vec<MissionPhase>) -> Self {
        Self { phases }
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    pub fn phase(&self, name: &str) -> Option<&MissionPhase> {
        self.phases.iter().find(|p| p.name == name)
    }

    /// Build takeoff → hover climb → transition → climb → cruise → descent → transition →
    /// hover descent → landing. Cruise covers whatever range the other legs leave.
    pub fn standard(template: &StandardMission) -> Result<Repaired<MissionProfile>, MissionError> {
        for (name, value) in [
            ("cruise_speed", template.cruise_speed),
            ("range", template.range),
            ("vertical_speed", template.vertical_speed),
            ("climb_rate", template.climb_rate),
        ] {
            if value <= 0.0 {
                return Err(MissionError::NonPositive(name));
            }
        }

        let v = template.cruise_speed;
        let climb_height = (template.cruise_altitude - template.hover_height).max(0.0);
        let climb_time = climb_height / template.climb_rate;
        let leg_distance = 2.0 * v * climb_time + 2.0 * 0.5 * v * template.transition_duration;
        let cruise_distance = template.range - leg_distance;
        if cruise_distance < 0.0 {
            return Err(MissionError::RangeTooShort {
                range: template.range,
                required: leg_distance,
            });
        }

        let phases = vec![
            MissionPhase::new("takeoff", PhaseKind::Takeoff)
                .with_duration(template.ground_duration)
                .with_end_altitude(0.0),
            MissionPhase::new("hover_climb", PhaseKind::HoverClimb)
                .with_speeds(0.0, template.vertical_speed)
                .with_end_altitude(template.hover_height),
            MissionPhase::new("transition_out", PhaseKind::Transition)
                .with_duration(template.transition_duration)
                .with_speeds(0.5 * v, 0.0),
            MissionPhase::new("climb", PhaseKind::Climb)
                .with_speeds(v, template.climb_rate)
                .with_end_altitude(template.cruise_altitude.max(template.hover_height)),
            MissionPhase::new("cruise", PhaseKind::Cruise)
                .with_speeds(v, 0.0)
                .with_distance(cruise_distance),
            MissionPhase::new("descent", PhaseKind::Descent)
                .with_speeds(v, -template.climb_rate)
                .with_end_altitude(template.hover_height),
            MissionPhase::new("transition_in", PhaseKind::Transition)
                .with_duration(template.transition_duration)
                .with_speeds(0.5 * v, 0.0),
            MissionPhase::new("hover_descent", PhaseKind::HoverDescent)
                .with_speeds(0.0, -template.vertical_speed)
                .with_end_altitude(0.0),
            MissionPhase::new("landing", PhaseKind::Landing)
                .with_duration(template.ground_duration)
                .with_end_altitude(0.0),
        ];

        Ok(MissionProfile::new(phases).validate_and_repair())
    }

    /// Assign powers from an external table. Phases it does not cover keep their current power.
    /// Returns the number of phases assigned.
    pub fn assign_powers(&mut self, powers: &PhasePowers) -> Result<usize, MissionError> {
        let mut assigned = 0;
        for phase in &mut self.phases {
            if let Some(power) = powers.power_for(phase) {
                if !power.is_finite() || power < 0.0 {
                    return Err(MissionError::InvalidPower {
                        phase: phase.name.clone(),
                        power,
                    });
                }
                phase.power = Some(power);
                phase.energy = None;
                assigned += 1;
            }
        }
        Ok(assigned)
    }

    /// Fill `energy = power · duration` for every phase and return the total (J).
    pub fn compute_energies(&mut self) -> Result<f64, MissionError> {
        let mut total = 0.0;
        for phase in &mut self.phases {
            let power = phase.power.ok_or_else(|| MissionError::MissingPower {
                phase: phase.name.clone(),
            })?;
            let duration = phase.duration.ok_or_else(|| MissionError::MissingDuration {
                phase: phase.name.clone(),
            })?;
            let energy = power * duration;
            phase.energy = Some(energy);
            total += energy;
        }
        Ok(total)
    }

    /// Sum of phase energies (J). Every phase must already carry an energy.
    pub fn total_energy(&self) -> Result<f64, MissionError> {
        self.phases.iter().try_fold(0.0, |acc, phase| {
            phase
                .energy
                .map(|e| acc + e)
                .ok_or_else(|| MissionError::MissingEnergy {
                    phase: phase.name.clone(),
                })
        })
    }

    /// Highest assigned phase power (W), if any phase has one.
    pub fn peak_power(&self) -> Option<f64> {
        self.phases
            .iter()
            .filter_map(|p| p.power)
            .fold(None, |acc: Option<f64>, p| Some(acc.map_or(p, |a| a.max(p))))
    }

    pub fn total_distance(&self) -> f64 {
        self.phases
            .iter()
            .map(|p| p.end_state().position - p.start_state().position)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template() -> StandardMission {
        StandardMission {
            cruise_altitude: 500.0,
            cruise_speed: 50.0,
            range: 100_000.0,
            hover_height: 15.0,
            vertical_speed: 2.0,
            climb_rate: 2.5,
            ground_duration: 15.0,
            transition_duration: 20.0,
        }
    }

    #[test]
    fn standard_mission_covers_range_and_chains_states() {
        let repaired = MissionProfile::standard(&template()).unwrap();
        assert!(repaired.warnings.is_empty(), "{:?}", repaired.warnings);
        let profile = repaired.value;
        assert_eq!(profile.phases.first().unwrap().kind, PhaseKind::Takeoff);
        assert_eq!(profile.phases.last().unwrap().kind, PhaseKind::Landing);
        assert!((profile.total_distance() - 100_000.0).abs() < 1e-6);
        for pair in profile.phases.windows(2) {
            assert!(pair[1].start_state().matches(&pair[0].end_state(), 1e-9));
        }
        let hover_climb = profile.phase("hover_climb").unwrap();
        assert!((hover_climb.duration.unwrap() - 7.5).abs() < 1e-9);
        assert!(profile.phases.last().unwrap().end_state().altitude.abs() < 1e-9);
    }

    #[test]
    fn short_range_is_rejected() {
        let mut template = template();
        template.range = 1_000.0;
        assert!(matches!(
            MissionProfile::standard(&template),
            Err(MissionError::RangeTooShort { .. })
        ));
    }

    #[test]
    fn energies_require_powers() {
        let mut profile = MissionProfile::standard(&template()).unwrap().value;
        let err = profile.compute_energies().unwrap_err();
        assert_eq!(
            err,
            MissionError::MissingPower {
                phase: "takeoff".into()
            }
        );
        assert!(profile.total_energy().is_err());

        let mut powers = PhasePowers::default();
        powers.by_kind.insert(PhaseKind::Takeoff, 200_000.0);
        powers.by_kind.insert(PhaseKind::HoverClimb, 210_000.0);
        powers.by_kind.insert(PhaseKind::HoverDescent, 190_000.0);
        powers.by_kind.insert(PhaseKind::Landing, 200_000.0);
        powers.by_kind.insert(PhaseKind::Transition, 150_000.0);
        powers.by_kind.insert(PhaseKind::Climb, 90_000.0);
        powers.by_kind.insert(PhaseKind::Descent, 30_000.0);
        powers.by_name.insert("cruise".into(), 60_000.0);
        assert_eq!(profile.assign_powers(&powers).unwrap(), 9);

        let total = profile.compute_energies().unwrap();
        let cruise = profile.phase("cruise").unwrap();
        assert!((cruise.energy.unwrap() - 60_000.0 * cruise.duration.unwrap()).abs() < 1e-6);
        assert!((profile.total_energy().unwrap() - total).abs() < 1e-6);
        assert_eq!(profile.peak_power(), Some(210_000.0));
    }

    #[test]
    fn negative_power_is_rejected() {
        let mut profile = MissionProfile::standard(&template()).unwrap().value;
        let mut powers = PhasePowers::default();
        powers.by_name.insert("cruise".into(), -1.0);
        assert!(matches!(
            profile.assign_powers(&powers),
            Err(MissionError::InvalidPower { .. })
        ));
    }
}

//! Validate-and-repair pass over a mission profile.
//!
//! Inconsistencies are corrected in place and reported as warnings; nothing here fails.

use thiserror::Error;

use crate::{MissionProfile, PhaseKind, PhaseState};

const STATE_TOL: f64 = 1e-6;

/// A value together with the warnings raised while producing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Repaired<T> {
    pub value: T,
    pub warnings: Vec<MissionWarning>,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum MissionWarning {
    #[error("mission has no phases")]
    Empty,
    #[error("mission starts with {found} instead of takeoff")]
    MissingTakeoff { found: PhaseKind },
    #[error("mission ends with {found} instead of landing")]
    MissingLanding { found: PhaseKind },
    #[error("phase '{phase}' start state {found:?} differs from previous end state {expected:?}; using the latter")]
    StartStateMismatch {
        phase: String,
        expected: PhaseState,
        found: PhaseState,
    },
    #[error("phase '{phase}' duration {given} s disagrees with its kinematics ({derived} s); using the latter")]
    DurationMismatch {
        phase: String,
        given: f64,
        derived: f64,
    },
    #[error("phase '{phase}' has non-positive duration {given} s; derived {derived} s from its kinematics")]
    DurationReplaced {
        phase: String,
        given: f64,
        derived: f64,
    },
    #[error("phase '{phase}' duration cannot be derived; treating it as zero")]
    DurationUnresolved { phase: String },
    #[error("phase '{phase}' climbs to {target} m but its vertical speed points the other way")]
    VerticalSpeedSign { phase: String, target: f64 },
}

impl MissionProfile {
    /// Return a repaired copy of the profile plus the warnings describing each correction.
    ///
    /// Durations follow the vertical kinematics (altitude change over vertical speed) when
    /// available, then the horizontal ones (distance over horizontal speed). Each start state
    /// is forced onto the previous phase's end state.
    pub fn validate_and_repair(&self) -> Repaired<MissionProfile> {
        let mut profile = self.clone();
        let mut warnings = Vec::new();

        match (profile.phases.first(), profile.phases.last()) {
            (Some(first), Some(last)) => {
                if first.kind != PhaseKind::Takeoff {
                    warnings.push(MissionWarning::MissingTakeoff { found: first.kind });
                }
                if last.kind != PhaseKind::Landing {
                    warnings.push(MissionWarning::MissingLanding { found: last.kind });
                }
            }
            _ => warnings.push(MissionWarning::Empty),
        }

        let mut previous_end: Option<PhaseState> = None;
        for phase in &mut profile.phases {
            let start = match (previous_end, phase.start) {
                (Some(expected), Some(found)) if !found.matches(&expected, STATE_TOL) => {
                    warnings.push(MissionWarning::StartStateMismatch {
                        phase: phase.name.clone(),
                        expected,
                        found,
                    });
                    expected
                }
                (Some(expected), _) => expected,
                (None, found) => found.unwrap_or_default(),
            };
            phase.start = Some(start);

            let vertical = match phase.end_altitude {
                Some(target) if phase.vertical_speed != 0.0 => {
                    let t = (target - start.altitude) / phase.vertical_speed;
                    if t < 0.0 {
                        warnings.push(MissionWarning::VerticalSpeedSign {
                            phase: phase.name.clone(),
                            target,
                        });
                        None
                    } else {
                        Some(t)
                    }
                }
                _ => None,
            };
            let horizontal = match phase.distance {
                Some(distance) if phase.horizontal_speed > 0.0 => {
                    Some(distance / phase.horizontal_speed)
                }
                _ => None,
            };
            let derived = vertical.or(horizontal);

            match (phase.duration, derived) {
                (Some(given), Some(derived)) if given <= 0.0 => {
                    warnings.push(MissionWarning::DurationReplaced {
                        phase: phase.name.clone(),
                        given,
                        derived,
                    });
                    phase.duration = Some(derived);
                }
                (Some(given), Some(derived))
                    if (given - derived).abs() > STATE_TOL * derived.max(1.0) =>
                {
                    warnings.push(MissionWarning::DurationMismatch {
                        phase: phase.name.clone(),
                        given,
                        derived,
                    });
                    phase.duration = Some(derived);
                }
                (Some(given), None) if given <= 0.0 => {
                    warnings.push(MissionWarning::DurationUnresolved {
                        phase: phase.name.clone(),
                    });
                    phase.duration = Some(0.0);
                }
                (Some(_), _) => {}
                (None, Some(derived)) => phase.duration = Some(derived),
                (None, None) => {
                    warnings.push(MissionWarning::DurationUnresolved {
                        phase: phase.name.clone(),
                    });
                    phase.duration = Some(0.0);
                }
            }

            let duration = phase.duration.unwrap_or(0.0);
            if phase.distance.is_none() {
                phase.distance = Some(phase.horizontal_speed * duration);
            }
            if phase.end_altitude.is_none() {
                phase.end_altitude = Some(start.altitude + phase.vertical_speed * duration);
            }

            previous_end = Some(phase.end_state());
        }

        for warning in &warnings {
            log::warn!("mission repaired: {warning}");
        }

        Repaired {
            value: profile,
            warnings,
        }
    }
}

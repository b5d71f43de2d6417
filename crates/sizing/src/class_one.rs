//! Class I estimate: wing and tail sizing, and the phase power model used by Class II.

use std::f64::consts::PI;

use evtol_aircraft::{Aircraft, Field};
use evtol_core::atmosphere;
use evtol_core::constants::{G0, RHO0};
use evtol_mission::{PhaseKind, PhasePowers};

use crate::SizingError;

/// Electrical power demand per flight regime at a given total mass (W).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PowerEstimate {
    pub hover: f64,
    pub vertical_climb: f64,
    pub cruise: f64,
    pub climb: f64,
    pub descent: f64,
}

impl PowerEstimate {
    /// Momentum-theory lift power and parabolic-polar wing-borne power at `total_mass`.
    pub fn at_mass(aircraft: &Aircraft, total_mass: f64) -> Result<Self, SizingError> {
        aircraft.require_all(&[
            Field::ThrustToWeight,
            Field::FigureOfMerit,
            Field::MotorEfficiency,
            Field::PropellerEfficiency,
            Field::VerticalClimbRate,
            Field::ClimbRate,
            Field::CruiseSpeed,
            Field::CruiseAltitude,
            Field::Cd0,
            Field::OswaldEfficiency,
            Field::WingArea,
            Field::WingAspectRatio,
        ])?;
        let thrust_to_weight = aircraft.require(Field::ThrustToWeight)?;
        let fom = aircraft.require(Field::FigureOfMerit)?;
        let eta_motor = aircraft.require(Field::MotorEfficiency)?;
        let eta_prop = aircraft.require(Field::PropellerEfficiency)?;
        let disk_area = aircraft.disk_area()?;

        let weight = total_mass * G0;
        let thrust = thrust_to_weight * weight;
        let induced_hover = (thrust / (2.0 * RHO0 * disk_area)).sqrt();
        let hover = thrust * induced_hover / (fom * eta_motor);

        let half_climb = 0.5 * aircraft.require(Field::VerticalClimbRate)?;
        let vertical_climb = thrust
            * (half_climb + (half_climb * half_climb + induced_hover * induced_hover).sqrt())
            / (fom * eta_motor);

        let speed = aircraft.require(Field::CruiseSpeed)?;
        let rho = atmosphere::density(aircraft.require(Field::CruiseAltitude)?);
        let area = aircraft.require(Field::WingArea)?;
        let aspect_ratio = aircraft.require(Field::WingAspectRatio)?;
        let q = 0.5 * rho * speed * speed;
        let cl = weight / (q * area);
        let cd = aircraft.require(Field::Cd0)?
            + cl * cl / (PI * aspect_ratio * aircraft.require(Field::OswaldEfficiency)?);
        let drag_power = q * area * cd * speed;
        let climb_power = weight * aircraft.require(Field::ClimbRate)?;
        let eta = eta_prop * eta_motor;

        Ok(Self {
            hover,
            vertical_climb,
            cruise: drag_power / eta,
            climb: (drag_power + climb_power) / eta,
            descent: (drag_power - climb_power).max(0.0) / eta,
        })
    }

    /// Power for a phase kind. Transitions are flown at hover power.
    pub fn for_kind(&self, kind: PhaseKind) -> f64 {
        match kind {
            PhaseKind::Takeoff
            | PhaseKind::Landing
            | PhaseKind::HoverDescent
            | PhaseKind::Transition => self.hover,
            PhaseKind::HoverClimb => self.vertical_climb,
            PhaseKind::Climb => self.climb,
            PhaseKind::Cruise | PhaseKind::Loiter => self.cruise,
            PhaseKind::Descent => self.descent,
        }
    }

    /// Per-kind power table, ready for [`evtol_mission::MissionProfile::assign_powers`].
    pub fn to_phase_powers(&self) -> PhasePowers {
        const KINDS: [PhaseKind; 9] = [
            PhaseKind::Takeoff,
            PhaseKind::HoverClimb,
            PhaseKind::Transition,
            PhaseKind::Climb,
            PhaseKind::Cruise,
            PhaseKind::Loiter,
            PhaseKind::Descent,
            PhaseKind::HoverDescent,
            PhaseKind::Landing,
        ];
        PhasePowers {
            by_name: Default::default(),
            by_kind: KINDS.iter().map(|&k| (k, self.for_kind(k))).collect(),
        }
    }
}

/// Lifting-surface geometry for one outer iteration.
///
/// Powers depend on the trial mass and are re-estimated inside the Class II map.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassOne {
    pub wing_area: f64,
    pub horizontal_tail_area: Option<f64>,
    pub vertical_tail_area: Option<f64>,
}

impl ClassOne {
    /// Size the lifting surfaces for `total_mass`.
    ///
    /// The wing is sized from the stall speed when one is given; otherwise the current area
    /// is kept. Tails with a volume coefficient and arm are re-sized from the wing.
    pub fn estimate(aircraft: &Aircraft, total_mass: f64) -> Result<Self, SizingError> {
        let mut sized = aircraft.clone();
        sized.wing.set_area(wing_area(aircraft, total_mass)?)?;

        let horizontal_tail_area = horizontal_tail_area(&sized)?;
        let vertical_tail_area = vertical_tail_area(&sized)?;
        let wing_area = sized.require(Field::WingArea)?;

        Ok(Self {
            wing_area,
            horizontal_tail_area,
            vertical_tail_area,
        })
    }

    /// Write the sized areas into `aircraft`.
    pub fn apply(&self, aircraft: &mut Aircraft) -> Result<(), SizingError> {
        aircraft.wing.set_area(self.wing_area)?;
        if let Some(area) = self.horizontal_tail_area {
            aircraft.horizontal_tail.area = Some(area);
        }
        if let Some(area) = self.vertical_tail_area {
            aircraft.vertical_tail.area = Some(area);
        }
        Ok(())
    }
}

/// Wing area from the stall condition `S = 2 m g / (ρ0 V_s² CL_max)`, or the current area.
pub fn wing_area(aircraft: &Aircraft, total_mass: f64) -> Result<f64, SizingError> {
    match aircraft.stall_speed {
        Some(stall_speed) => {
            let cl_max = aircraft.require(Field::ClMax)?;
            Ok(2.0 * total_mass * G0 / (RHO0 * stall_speed * stall_speed * cl_max))
        }
        None => Ok(aircraft.require(Field::WingArea)?),
    }
}

/// `S_h = V_h S_w c̄ / l_h`, when the tail carries a volume coefficient and arm.
fn horizontal_tail_area(aircraft: &Aircraft) -> Result<Option<f64>, SizingError> {
    let tail = &aircraft.horizontal_tail;
    let (Some(volume), Some(arm)) = (tail.volume_coefficient, tail.arm) else {
        return Ok(None);
    };
    let area = aircraft.require(Field::WingArea)?;
    let mac = aircraft.wing.mean_aerodynamic_chord()?;
    Ok(Some(volume * area * mac / arm))
}

/// `S_v = V_v S_w b / l_v`, when the tail carries a volume coefficient and arm.
fn vertical_tail_area(aircraft: &Aircraft) -> Result<Option<f64>, SizingError> {
    let tail = &aircraft.vertical_tail;
    let (Some(volume), Some(arm)) = (tail.volume_coefficient, tail.arm) else {
        return Ok(None);
    };
    let area = aircraft.require(Field::WingArea)?;
    let span = aircraft.require(Field::WingSpan)?;
    Ok(Some(volume * area * span / arm))
}

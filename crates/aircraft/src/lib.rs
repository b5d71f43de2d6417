//! Aircraft concept record: sizing inputs, component geometry, mission, and sizing outputs.
//!
//! Inputs are optional so that a concept can be authored incrementally; every model
//! checks the fields it needs up front with [`Aircraft::require_all`] and fails naming
//! the first missing one.

pub mod fields;
pub mod geometry;

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use evtol_mass::MassObject;
use evtol_mission::MissionProfile;

pub use fields::{Constraint, Field};
pub use geometry::{Fuselage, GeometryError, Known, Planform, PlanformLimits, PlanformSolution, Tail, Wing};

#[derive(Debug, Error, PartialEq)]
pub enum AircraftError {
    #[error("aircraft '{aircraft}' is missing required field '{field}'")]
    MissingField { aircraft: String, field: Field },
    #[error("aircraft '{aircraft}' field '{field}' = {value} violates constraint {constraint}")]
    InvalidValue {
        aircraft: String,
        field: Field,
        value: f64,
        constraint: Constraint,
    },
    #[error("aircraft '{0}' has not been sized yet")]
    NotSized(String),
    #[error("geometry error: {0}")]
    Geometry(#[from] GeometryError),
}

/// Shear and bending moment at one spanwise station (η ∈ [0, 1] of the half span).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpanStation {
    pub eta: f64,
    /// Shear force (N).
    pub shear: f64,
    /// Bending moment (N·m).
    pub moment: f64,
}

/// Hinge loads written back by the hinge-loading model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HingeLoads {
    pub eta_hinge: f64,
    pub shear: f64,
    pub moment: f64,
    pub distribution: Vec<SpanStation>,
}

/// Design concept. SI units throughout unless a field says otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Aircraft {
    pub name: String,

    // Mission and performance
    pub cruise_speed: Option<f64>,
    pub cruise_altitude: Option<f64>,
    pub range: Option<f64>,
    pub hover_height: Option<f64>,
    pub stall_speed: Option<f64>,
    pub climb_rate: Option<f64>,
    pub vertical_climb_rate: Option<f64>,
    pub ground_duration: Option<f64>,
    pub transition_duration: Option<f64>,

    // Aerodynamics
    pub cl_max: Option<f64>,
    pub cd0: Option<f64>,
    pub oswald_efficiency: Option<f64>,

    // Structure and payload
    pub ultimate_load_factor: Option<f64>,
    pub passenger_count: Option<u32>,
    pub payload_mass: Option<f64>,
    pub avionics_mass: Option<f64>,

    // Propulsion
    pub motor_count: Option<u32>,
    pub motor_wing_count: Option<u32>,
    pub propeller_radius: Option<f64>,
    pub propeller_blade_count: Option<u32>,
    pub figure_of_merit: Option<f64>,
    pub propeller_efficiency: Option<f64>,
    pub motor_efficiency: Option<f64>,
    /// Continuous motor power per unit motor mass (W/kg).
    pub motor_specific_power: Option<f64>,
    /// Hover thrust over weight.
    pub thrust_to_weight: Option<f64>,

    // Energy storage
    /// Pack-level specific energy (Wh/kg).
    pub battery_specific_energy: Option<f64>,
    pub battery_efficiency: Option<f64>,
    pub soc_min: Option<f64>,

    // Components
    pub wing: Wing,
    pub horizontal_tail: Tail,
    pub vertical_tail: Tail,
    pub fuselage: Fuselage,
    pub mission: MissionProfile,

    // Sizing outputs
    pub total_mass: Option<f64>,
    pub hover_power: Option<f64>,
    pub cruise_power: Option<f64>,
    pub reference_power: Option<f64>,
    pub mission_energy: Option<f64>,
    pub mass_breakdown: Option<MassObject>,
    pub hinge: Option<HingeLoads>,
}

impl Default for Aircraft {
    fn default() -> Self {
        Self {
            name: "concept".to_string(),
            cruise_speed: None,
            cruise_altitude: Some(300.0),
            range: None,
            hover_height: Some(15.24),
            stall_speed: None,
            climb_rate: Some(2.54),
            vertical_climb_rate: Some(1.5),
            ground_duration: Some(15.0),
            transition_duration: Some(30.0),
            cl_max: Some(1.6),
            cd0: Some(0.035),
            oswald_efficiency: Some(0.8),
            ultimate_load_factor: Some(5.7),
            passenger_count: None,
            payload_mass: None,
            avionics_mass: Some(30.0),
            motor_count: None,
            motor_wing_count: None,
            propeller_radius: None,
            propeller_blade_count: Some(5),
            figure_of_merit: Some(0.75),
            propeller_efficiency: Some(0.8),
            motor_efficiency: Some(0.95),
            motor_specific_power: Some(5_000.0),
            thrust_to_weight: Some(1.1),
            battery_specific_energy: Some(250.0),
            battery_efficiency: Some(0.9),
            soc_min: Some(0.2),
            wing: Wing::default(),
            horizontal_tail: Tail::default(),
            vertical_tail: Tail::default(),
            fuselage: Fuselage::default(),
            mission: MissionProfile::default(),
            total_mass: None,
            hover_power: None,
            cruise_power: None,
            reference_power: None,
            mission_energy: None,
            mass_breakdown: None,
            hinge: None,
        }
    }
}

impl Aircraft {
    /// Default-valued concept with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Reject any populated field that violates its constraint.
    pub fn validate(&self) -> Result<(), AircraftError> {
        for &field in Field::ALL {
            if let Some(value) = field.get(self) {
                let constraint = field.constraint();
                if !constraint.admits(value) {
                    return Err(AircraftError::InvalidValue {
                        aircraft: self.name.clone(),
                        field,
                        value,
                        constraint,
                    });
                }
            }
        }
        Ok(())
    }

    /// Value of a required field.
    pub fn require(&self, field: Field) -> Result<f64, AircraftError> {
        field.get(self).ok_or_else(|| AircraftError::MissingField {
            aircraft: self.name.clone(),
            field,
        })
    }

    /// Eager necessary-parameter check: fails on the first unset field.
    pub fn require_all(&self, fields: &[Field]) -> Result<(), AircraftError> {
        fields.iter().try_for_each(|&f| self.require(f).map(|_| ()))
    }

    /// Converged total mass (kg).
    pub fn sized_mass(&self) -> Result<f64, AircraftError> {
        self.total_mass
            .ok_or_else(|| AircraftError::NotSized(self.name.clone()))
    }

    /// Total propeller disk area of the lift system (m²).
    pub fn disk_area(&self) -> Result<f64, AircraftError> {
        let radius = self.require(Field::PropellerRadius)?;
        let count = self.require(Field::MotorCount)?;
        Ok(count * PI * radius * radius)
    }

    /// Clear every sizing output, e.g. before re-sizing a modified concept.
    pub fn clear_outputs(&mut self) {
        self.total_mass = None;
        self.hover_power = None;
        self.cruise_power = None;
        self.reference_power = None;
        self.mission_energy = None;
        self.mass_breakdown = None;
        self.hinge = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_names_aircraft_and_field() {
        let aircraft = Aircraft::new("C1");
        let err = aircraft
            .require_all(&[Field::ClMax, Field::CruiseSpeed])
            .unwrap_err();
        assert_eq!(
            err,
            AircraftError::MissingField {
                aircraft: "C1".into(),
                field: Field::CruiseSpeed
            }
        );
        assert_eq!(
            err.to_string(),
            "aircraft 'C1' is missing required field 'cruise_speed'"
        );
    }

    #[test]
    fn validation_rejects_out_of_range_fraction() {
        let mut aircraft = Aircraft::new("C2");
        aircraft.validate().unwrap();
        aircraft.figure_of_merit = Some(1.3);
        assert!(matches!(
            aircraft.validate(),
            Err(AircraftError::InvalidValue {
                field: Field::FigureOfMerit,
                ..
            })
        ));
        aircraft.figure_of_merit = Some(0.7);
        aircraft.payload_mass = Some(-5.0);
        assert!(aircraft.validate().is_err());
    }

    #[test]
    fn disk_area_sums_all_rotors() {
        let mut aircraft = Aircraft::new("C3");
        aircraft.propeller_radius = Some(1.0);
        aircraft.motor_count = Some(4);
        assert!((aircraft.disk_area().unwrap() - 4.0 * PI).abs() < 1e-12);
    }
}

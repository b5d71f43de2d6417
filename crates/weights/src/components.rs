//! Per-component mass estimates for an aircraft at a trial total mass.
//!
//! Every function first checks the inputs it needs and the trial mass, then evaluates the
//! matching regression. Results are in kilograms.

use evtol_aircraft::{Aircraft, AircraftError, Field};

use crate::regressions::{self, MAIN_GEAR, NOSE_GEAR};
use crate::WeightsError;

/// Undercarriage placement factor for a low-wing layout.
const K_UC_LOW_WING: f64 = 1.0;

fn check_trial(total_mass: f64) -> Result<(), WeightsError> {
    if total_mass > 0.0 && total_mass.is_finite() {
        Ok(())
    } else {
        Err(WeightsError::NonPositiveTrialMass(total_mass))
    }
}

fn positive(component: &'static str, mass: f64) -> Result<f64, WeightsError> {
    if mass > 0.0 && mass.is_finite() {
        Ok(mass)
    } else {
        Err(WeightsError::NonPositiveMass { component, mass })
    }
}

pub fn wing_mass(aircraft: &Aircraft, total_mass: f64) -> Result<f64, WeightsError> {
    check_trial(total_mass)?;
    let area = aircraft.require(Field::WingArea)?;
    let aspect_ratio = aircraft.require(Field::WingAspectRatio)?;
    let n_ult = aircraft.require(Field::UltimateLoadFactor)?;
    positive(
        "wing",
        regressions::cessna_wing_kg(total_mass, area, n_ult, aspect_ratio),
    )
}

pub fn fuselage_mass(aircraft: &Aircraft, total_mass: f64) -> Result<f64, WeightsError> {
    check_trial(total_mass)?;
    let length = aircraft.require(Field::FuselageLength)?;
    let passengers = aircraft.require(Field::PassengerCount)?;
    let perimeter = aircraft
        .fuselage
        .max_perimeter()
        .ok_or_else(|| AircraftError::MissingField {
            aircraft: aircraft.name.clone(),
            field: Field::FuselagePerimeter,
        })?;
    positive(
        "fuselage",
        regressions::cessna_fuselage_kg(total_mass, length, perimeter, passengers),
    )
}

pub fn horizontal_tail_mass(aircraft: &Aircraft, total_mass: f64) -> Result<f64, WeightsError> {
    check_trial(total_mass)?;
    let area = aircraft.require(Field::HorizontalTailArea)?;
    let aspect_ratio = aircraft.require(Field::HorizontalTailAspectRatio)?;
    let thickness = aircraft.require(Field::HorizontalTailRootThickness)?;
    positive(
        "horizontal_tail",
        regressions::cessna_horizontal_tail_kg(total_mass, area, aspect_ratio, thickness),
    )
}

pub fn vertical_tail_mass(aircraft: &Aircraft, total_mass: f64) -> Result<f64, WeightsError> {
    check_trial(total_mass)?;
    let area = aircraft.require(Field::VerticalTailArea)?;
    let aspect_ratio = aircraft.require(Field::VerticalTailAspectRatio)?;
    let thickness = aircraft.require(Field::VerticalTailRootThickness)?;
    let sweep = aircraft.vertical_tail.sweep.unwrap_or(0.0);
    positive(
        "vertical_tail",
        regressions::cessna_vertical_tail_kg(total_mass, area, aspect_ratio, thickness, sweep),
    )
}

pub fn landing_gear_mass(_aircraft: &Aircraft, total_mass: f64) -> Result<f64, WeightsError> {
    check_trial(total_mass)?;
    positive(
        "landing_gear",
        regressions::torenbeek_gear_kg(total_mass, K_UC_LOW_WING, &[MAIN_GEAR, NOSE_GEAR]),
    )
}

/// Combined mass of all motors, sized by the reference (peak electrical) power.
pub fn motor_mass(aircraft: &Aircraft, reference_power: f64) -> Result<f64, WeightsError> {
    let specific_power = aircraft.require(Field::MotorSpecificPower)?;
    positive("motors", reference_power / specific_power)
}

/// Combined mass of all propellers, sized by the reference power.
pub fn propeller_mass(aircraft: &Aircraft, reference_power: f64) -> Result<f64, WeightsError> {
    let count = aircraft.require(Field::MotorCount)?;
    let blades = aircraft.require(Field::PropellerBladeCount)?;
    let radius = aircraft.require(Field::PropellerRadius)?;
    positive(
        "propellers",
        regressions::gd_propellers_kg(count, blades, 2.0 * radius, reference_power),
    )
}

pub fn flight_controls_mass(_aircraft: &Aircraft, total_mass: f64) -> Result<f64, WeightsError> {
    check_trial(total_mass)?;
    positive(
        "flight_controls",
        regressions::cessna_flight_controls_kg(total_mass),
    )
}

pub fn electrical_mass(_aircraft: &Aircraft, total_mass: f64) -> Result<f64, WeightsError> {
    check_trial(total_mass)?;
    positive("electrical", regressions::cessna_electrical_kg(total_mass))
}

pub fn furnishings_mass(aircraft: &Aircraft, total_mass: f64) -> Result<f64, WeightsError> {
    check_trial(total_mass)?;
    let passengers = aircraft.require(Field::PassengerCount)?;
    positive(
        "furnishings",
        regressions::cessna_furnishings_kg(total_mass, passengers),
    )
}

/// Fixed avionics allowance taken directly from the record.
pub fn avionics_mass(aircraft: &Aircraft) -> Result<f64, WeightsError> {
    Ok(aircraft.require(Field::AvionicsMass)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn concept() -> Aircraft {
        let mut aircraft = Aircraft::new("test");
        aircraft.wing.area = Some(20.0);
        aircraft.wing.aspect_ratio = Some(8.0);
        aircraft.ultimate_load_factor = Some(1.5);
        aircraft.fuselage.length = Some(8.0);
        aircraft.fuselage.width = Some(1.6);
        aircraft.fuselage.height = Some(1.6);
        aircraft.passenger_count = Some(4);
        aircraft
    }

    #[test]
    fn wing_mass_uses_record_fields() {
        let kg = wing_mass(&concept(), 1_500.0).unwrap();
        assert!((kg - 151.1627).abs() / 151.1627 < 1e-3);
    }

    #[test]
    fn missing_inputs_fail_fast() {
        let mut aircraft = concept();
        aircraft.wing.aspect_ratio = None;
        let err = wing_mass(&aircraft, 1_500.0).unwrap_err();
        assert!(matches!(
            err,
            WeightsError::Aircraft(AircraftError::MissingField {
                field: Field::WingAspectRatio,
                ..
            })
        ));
    }

    #[test]
    fn non_positive_trial_mass_is_rejected() {
        let aircraft = concept();
        assert_eq!(
            fuselage_mass(&aircraft, -10.0).unwrap_err(),
            WeightsError::NonPositiveTrialMass(-10.0)
        );
        assert!(fuselage_mass(&aircraft, 1_800.0).unwrap() > 0.0);
    }
}

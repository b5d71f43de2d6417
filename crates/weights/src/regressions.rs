//! Empirical Class II regressions in their native (imperial) units.
//!
//! Each `*_kg` function accepts SI inputs, converts to the unit system the regression was
//! fitted in, evaluates it, and converts the result back to kilograms. The exponents are
//! only valid in the documented units, so conversions must stay exactly where they are.

use evtol_core::units::{kg_to_lb, lb_to_kg, m2_to_ft2, m_to_ft, m_to_in, w_to_hp};

/// Cessna wing: `0.04674 W^0.397 S^0.360 n^0.397 A^1.712` (lb, ft²).
pub fn cessna_wing_kg(total_mass_kg: f64, area_m2: f64, load_factor: f64, aspect_ratio: f64) -> f64 {
    let w = kg_to_lb(total_mass_kg);
    let s = m2_to_ft2(area_m2);
    let lb = 0.04674 * w.powf(0.397) * s.powf(0.360) * load_factor.powf(0.397) * aspect_ratio.powf(1.712);
    lb_to_kg(lb)
}

/// Cessna fuselage: `14.86 W^0.144 (l/p)^0.778 l^0.383 N_pax^0.455` (lb, ft).
pub fn cessna_fuselage_kg(total_mass_kg: f64, length_m: f64, perimeter_m: f64, passengers: f64) -> f64 {
    let w = kg_to_lb(total_mass_kg);
    let l = m_to_ft(length_m);
    let p = m_to_ft(perimeter_m);
    let lb = 14.86 * w.powf(0.144) * (l / p).powf(0.778) * l.powf(0.383) * passengers.powf(0.455);
    lb_to_kg(lb)
}

/// Cessna horizontal tail: `3.184 W^0.887 S^0.101 A^0.138 / (174.04 t_r^0.223)`
/// (lb, ft², root thickness in inches).
pub fn cessna_horizontal_tail_kg(
    total_mass_kg: f64,
    area_m2: f64,
    aspect_ratio: f64,
    root_thickness_m: f64,
) -> f64 {
    let w = kg_to_lb(total_mass_kg);
    let s = m2_to_ft2(area_m2);
    let t = m_to_in(root_thickness_m);
    let lb = 3.184 * w.powf(0.887) * s.powf(0.101) * aspect_ratio.powf(0.138) / (174.04 * t.powf(0.223));
    lb_to_kg(lb)
}

/// Cessna vertical tail: `1.68 W^0.567 S^1.249 A^0.482 / (639.95 t_r^0.747 cos(Λ)^0.882)`
/// (lb, ft², root thickness in inches).
pub fn cessna_vertical_tail_kg(
    total_mass_kg: f64,
    area_m2: f64,
    aspect_ratio: f64,
    root_thickness_m: f64,
    sweep_deg: f64,
) -> f64 {
    let w = kg_to_lb(total_mass_kg);
    let s = m2_to_ft2(area_m2);
    let t = m_to_in(root_thickness_m);
    let cos_sweep = sweep_deg.to_radians().cos();
    let lb = 1.68 * w.powf(0.567) * s.powf(1.249) * aspect_ratio.powf(0.482)
        / (639.95 * t.powf(0.747) * cos_sweep.powf(0.882));
    lb_to_kg(lb)
}

/// Coefficients of one Torenbeek landing gear leg group: `A + B W^0.75 + C W + D W^1.5` (lb).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GearCoefficients {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

/// Torenbeek general-aviation main gear, fixed.
pub const MAIN_GEAR: GearCoefficients = GearCoefficients {
    a: 20.0,
    b: 0.10,
    c: 0.019,
    d: 0.0,
};

/// Torenbeek general-aviation nose gear, fixed.
pub const NOSE_GEAR: GearCoefficients = GearCoefficients {
    a: 25.0,
    b: 0.0,
    c: 0.0024,
    d: 0.0,
};

/// Torenbeek landing gear: sum of leg groups scaled by `k_uc` (1.0 low wing, 1.08 high wing).
pub fn torenbeek_gear_kg(total_mass_kg: f64, k_uc: f64, legs: &[GearCoefficients]) -> f64 {
    let w = kg_to_lb(total_mass_kg);
    let lb: f64 = legs
        .iter()
        .map(|g| g.a + g.b * w.powf(0.75) + g.c * w + g.d * w.powf(1.5))
        .sum();
    lb_to_kg(k_uc * lb)
}

/// General Dynamics propeller regression:
/// `31.92 N_p N_bl^0.391 (D P / (1000 N_p))^0.782` (lb, ft, shp).
pub fn gd_propellers_kg(propellers: f64, blades: f64, diameter_m: f64, total_power_w: f64) -> f64 {
    let d = m_to_ft(diameter_m);
    let p = w_to_hp(total_power_w);
    let lb = 31.92 * propellers * blades.powf(0.391) * (d * p / (1_000.0 * propellers)).powf(0.782);
    lb_to_kg(lb)
}

/// Cessna flight controls: `0.0168 W` (lb).
pub fn cessna_flight_controls_kg(total_mass_kg: f64) -> f64 {
    lb_to_kg(0.0168 * kg_to_lb(total_mass_kg))
}

/// Cessna electrical system: `0.0268 W` (lb).
pub fn cessna_electrical_kg(total_mass_kg: f64) -> f64 {
    lb_to_kg(0.0268 * kg_to_lb(total_mass_kg))
}

/// Cessna furnishings: `0.412 N_pax^1.145 W^0.489` (lb).
pub fn cessna_furnishings_kg(total_mass_kg: f64, passengers: f64) -> f64 {
    lb_to_kg(0.412 * passengers.powf(1.145) * kg_to_lb(total_mass_kg).powf(0.489))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wing_matches_hand_computation() {
        // W = 3306.93 lb, S = 215.278 ft², n = 1.5, A = 8 -> 333.257 lb
        let kg = cessna_wing_kg(1_500.0, 20.0, 1.5, 8.0);
        assert!((kg - 151.1627).abs() / 151.1627 < 1e-3, "wing = {kg}");
    }

    #[test]
    fn gear_is_linear_dominated() {
        let light = torenbeek_gear_kg(1_000.0, 1.0, &[MAIN_GEAR, NOSE_GEAR]);
        let heavy = torenbeek_gear_kg(2_000.0, 1.0, &[MAIN_GEAR, NOSE_GEAR]);
        assert!(heavy > light);
        assert!(heavy < 2.0 * light);
    }

    #[test]
    fn component_masses_grow_with_total_mass() {
        let small = cessna_fuselage_kg(1_500.0, 8.0, 5.5, 4.0);
        let large = cessna_fuselage_kg(2_500.0, 8.0, 5.5, 4.0);
        assert!(large > small && small > 0.0);
        let ht = cessna_horizontal_tail_kg(2_000.0, 3.0, 4.0, 0.09);
        let vt = cessna_vertical_tail_kg(2_000.0, 1.5, 1.5, 0.09, 30.0);
        assert!(ht > 0.0 && vt > 0.0);
    }
}

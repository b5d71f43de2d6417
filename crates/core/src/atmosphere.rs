//! International Standard Atmosphere, troposphere and lower stratosphere (up to 20 km).

use crate::constants::{G0, P0, R_AIR, T0};

const LAPSE_RATE: f64 = 0.0065; // K/m
const TROPOPAUSE_M: f64 = 11_000.0;
const T_TROPOPAUSE: f64 = T0 - LAPSE_RATE * TROPOPAUSE_M;

/// Static temperature (K) at geopotential altitude `h_m`.
pub fn temperature(h_m: f64) -> f64 {
    if h_m <= TROPOPAUSE_M {
        T0 - LAPSE_RATE * h_m
    } else {
        T_TROPOPAUSE
    }
}

/// Static pressure (Pa) at geopotential altitude `h_m`.
pub fn pressure(h_m: f64) -> f64 {
    let exponent = G0 / (LAPSE_RATE * R_AIR);
    if h_m <= TROPOPAUSE_M {
        P0 * (temperature(h_m) / T0).powf(exponent)
    } else {
        let p11 = P0 * (T_TROPOPAUSE / T0).powf(exponent);
        p11 * (-(G0 * (h_m - TROPOPAUSE_M)) / (R_AIR * T_TROPOPAUSE)).exp()
    }
}

/// Air density (kg/m³) at geopotential altitude `h_m`.
pub fn density(h_m: f64) -> f64 {
    pressure(h_m) / (R_AIR * temperature(h_m))
}

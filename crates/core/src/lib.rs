//! Core units, constants, and the standard atmosphere for the eVTOL sizing workspace.

pub mod atmosphere;
pub mod units;

/// Physical constants expressed in SI units (unless stated otherwise).
pub mod constants {
    /// Standard gravity at Earth's surface (m/s²).
    pub const G0: f64 = 9.80665;
    /// ISA sea-level air density (kg/m³).
    pub const RHO0: f64 = 1.225;
    /// ISA sea-level static pressure (Pa).
    pub const P0: f64 = 101_325.0;
    /// ISA sea-level temperature (K).
    pub const T0: f64 = 288.15;
    /// Specific gas constant of dry air (J/(kg·K)).
    pub const R_AIR: f64 = 287.052_87;
}

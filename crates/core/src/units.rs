//! Unit conversion backed by a small dimensional-analysis registry.
//!
//! Conversion factors come from `uom` unit definitions so that the imperial
//! regressions used by the weight estimators share one source of truth. The
//! string registry serves configuration files and CLI input; the typed helpers
//! below are what the formulas call directly.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use thiserror::Error;
use uom::si::f64::{Area, Energy, Force, Length, Mass, MassDensity, Power, Time, Velocity};
use uom::si::{area, energy, force, length, mass, mass_density, power, time, velocity};

/// Physical dimension of a registered unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Dimension {
    Mass,
    Length,
    Area,
    Velocity,
    Power,
    Energy,
    Time,
    Force,
    Density,
    SpecificEnergy,
}

/// Registered unit: its dimension and multiplicative factor to the SI base unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitDef {
    pub dimension: Dimension,
    pub to_si: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum UnitError {
    #[error("unknown unit '{0}'")]
    UnknownUnit(String),
    #[error("cannot convert '{from}' ({from_dim:?}) to '{to}' ({to_dim:?})")]
    IncompatibleDimensions {
        from: String,
        from_dim: Dimension,
        to: String,
        to_dim: Dimension,
    },
}

static REGISTRY: LazyLock<BTreeMap<&'static str, UnitDef>> = LazyLock::new(build_registry);

fn def(dimension: Dimension, to_si: f64) -> UnitDef {
    UnitDef { dimension, to_si }
}

fn build_registry() -> BTreeMap<&'static str, UnitDef> {
    use Dimension as D;

    let wh_in_j = Energy::new::<energy::watt_hour>(1.0).get::<energy::joule>();
    let lb_in_kg = Mass::new::<mass::pound>(1.0).get::<mass::kilogram>();

    BTreeMap::from([
        ("kg", def(D::Mass, 1.0)),
        ("g", def(D::Mass, Mass::new::<mass::gram>(1.0).get::<mass::kilogram>())),
        ("lb", def(D::Mass, lb_in_kg)),
        ("m", def(D::Length, 1.0)),
        ("km", def(D::Length, Length::new::<length::kilometer>(1.0).get::<length::meter>())),
        ("ft", def(D::Length, Length::new::<length::foot>(1.0).get::<length::meter>())),
        ("in", def(D::Length, Length::new::<length::inch>(1.0).get::<length::meter>())),
        ("nmi", def(D::Length, Length::new::<length::nautical_mile>(1.0).get::<length::meter>())),
        ("mi", def(D::Length, Length::new::<length::mile>(1.0).get::<length::meter>())),
        ("m2", def(D::Area, 1.0)),
        ("ft2", def(D::Area, Area::new::<area::square_foot>(1.0).get::<area::square_meter>())),
        ("m/s", def(D::Velocity, 1.0)),
        (
            "km/h",
            def(D::Velocity, Velocity::new::<velocity::kilometer_per_hour>(1.0).get::<velocity::meter_per_second>()),
        ),
        ("kt", def(D::Velocity, Velocity::new::<velocity::knot>(1.0).get::<velocity::meter_per_second>())),
        (
            "ft/s",
            def(D::Velocity, Velocity::new::<velocity::foot_per_second>(1.0).get::<velocity::meter_per_second>()),
        ),
        (
            "ft/min",
            def(D::Velocity, Velocity::new::<velocity::foot_per_minute>(1.0).get::<velocity::meter_per_second>()),
        ),
        ("W", def(D::Power, 1.0)),
        ("kW", def(D::Power, Power::new::<power::kilowatt>(1.0).get::<power::watt>())),
        ("hp", def(D::Power, Power::new::<power::horsepower>(1.0).get::<power::watt>())),
        ("J", def(D::Energy, 1.0)),
        ("Wh", def(D::Energy, wh_in_j)),
        ("kWh", def(D::Energy, Energy::new::<energy::kilowatt_hour>(1.0).get::<energy::joule>())),
        ("s", def(D::Time, 1.0)),
        ("min", def(D::Time, Time::new::<time::minute>(1.0).get::<time::second>())),
        ("h", def(D::Time, Time::new::<time::hour>(1.0).get::<time::second>())),
        ("N", def(D::Force, 1.0)),
        ("lbf", def(D::Force, Force::new::<force::pound_force>(1.0).get::<force::newton>())),
        (
            "kg/m3",
            def(
                D::Density,
                MassDensity::new::<mass_density::kilogram_per_cubic_meter>(1.0)
                    .get::<mass_density::kilogram_per_cubic_meter>(),
            ),
        ),
        ("J/kg", def(D::SpecificEnergy, 1.0)),
        ("Wh/kg", def(D::SpecificEnergy, wh_in_j)),
        ("Wh/lb", def(D::SpecificEnergy, wh_in_j / lb_in_kg)),
    ])
}

/// Look up a unit symbol in the registry.
pub fn lookup(symbol: &str) -> Result<UnitDef, UnitError> {
    REGISTRY
        .get(symbol)
        .copied()
        .ok_or_else(|| UnitError::UnknownUnit(symbol.to_string()))
}

/// Convert `value` from unit `from` to unit `to`.
pub fn convert(value: f64, from: &str, to: &str) -> Result<f64, UnitError> {
    let factor = conversion_factor(from, to)?;
    Ok(value * factor)
}

/// Convert every element of `values` from `from` to `to`.
pub fn convert_slice(values: &[f64], from: &str, to: &str) -> Result<Vec<f64>, UnitError> {
    let factor = conversion_factor(from, to)?;
    Ok(values.iter().map(|v| v * factor).collect())
}

fn conversion_factor(from: &str, to: &str) -> Result<f64, UnitError> {
    let src = lookup(from)?;
    let dst = lookup(to)?;
    if src.dimension != dst.dimension {
        return Err(UnitError::IncompatibleDimensions {
            from: from.to_string(),
            from_dim: src.dimension,
            to: to.to_string(),
            to_dim: dst.dimension,
        });
    }
    Ok(src.to_si / dst.to_si)
}

/// Convert kilograms to pounds (mass).
#[inline]
pub fn kg_to_lb(v: f64) -> f64 {
    Mass::new::<mass::kilogram>(v).get::<mass::pound>()
}

/// Convert pounds (mass) to kilograms.
#[inline]
pub fn lb_to_kg(v: f64) -> f64 {
    Mass::new::<mass::pound>(v).get::<mass::kilogram>()
}

/// Convert metres to feet.
#[inline]
pub fn m_to_ft(v: f64) -> f64 {
    Length::new::<length::meter>(v).get::<length::foot>()
}

/// Convert metres to inches.
#[inline]
pub fn m_to_in(v: f64) -> f64 {
    Length::new::<length::meter>(v).get::<length::inch>()
}

/// Convert square metres to square feet.
#[inline]
pub fn m2_to_ft2(v: f64) -> f64 {
    Area::new::<area::square_meter>(v).get::<area::square_foot>()
}

/// Convert watts to (mechanical) horsepower.
#[inline]
pub fn w_to_hp(v: f64) -> f64 {
    Power::new::<power::watt>(v).get::<power::horsepower>()
}

/// Convert watt-hours to joules.
#[inline]
pub fn wh_to_j(v: f64) -> f64 {
    Energy::new::<energy::watt_hour>(v).get::<energy::joule>()
}

/// Convert joules to kilowatt-hours.
#[inline]
pub fn j_to_kwh(v: f64) -> f64 {
    Energy::new::<energy::joule>(v).get::<energy::kilowatt_hour>()
}

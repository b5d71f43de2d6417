//! Shear and bending moment at a folding-wing hinge.
//!
//! The half wing carries a linearly tapered lift distribution, relieved by the weight of
//! wing-mounted engines acting as point loads. Loads are factored by the ultimate load
//! factor; span stations are expressed as η ∈ [0, 1] of the half span from the root.

pub mod policy;

use thiserror::Error;

use evtol_aircraft::{Aircraft, AircraftError, Field, HingeLoads, SpanStation};
use evtol_core::constants::G0;

pub use policy::{Combination, ConceptOverride, HingePolicy, ResolvedPolicy};

#[derive(Debug, Error, PartialEq)]
pub enum HingeError {
    #[error(transparent)]
    Aircraft(#[from] AircraftError),
    #[error("mass tree has no '{0}' entry")]
    MissingComponent(String),
    #[error("no engine station table for {0} wing-mounted engines (supported: 0, 2, 4)")]
    UnsupportedEngineCount(u32),
    #[error("{count} wing-mounted engines cannot be spread over {stations} stations per half wing")]
    EngineStationMismatch { count: u32, stations: usize },
    #[error("span station {0} lies outside [0, 1]")]
    InvalidStation(f64),
    #[error("at least two distribution stations are required (got {0})")]
    TooFewStations(usize),
    #[error("wing carries the whole aircraft mass; no lift left to distribute")]
    NonPositiveLift,
}

/// Half-wing engine stations by wing-mounted engine count.
pub fn engine_stations(wing_engines: u32) -> Result<Vec<f64>, HingeError> {
    match wing_engines {
        0 => Ok(Vec::new()),
        2 => Ok(vec![0.5]),
        4 => Ok(vec![0.3, 0.8]),
        n => Err(HingeError::UnsupportedEngineCount(n)),
    }
}

/// Fraction of the half-wing lift outboard of η for taper ratio λ.
pub fn shear_fraction(eta: f64, taper: f64) -> f64 {
    2.0 / (1.0 + taper) * ((1.0 - eta) - (1.0 - taper) * (1.0 - eta * eta) / 2.0)
}

/// Moment of the outboard lift about η, per unit half lift and half span.
pub fn moment_fraction(eta: f64, taper: f64) -> f64 {
    let outboard = (1.0 - eta).powi(2) / 2.0;
    let taper_term = 1.0 / 3.0 - eta / 2.0 + eta.powi(3) / 6.0;
    2.0 / (1.0 + taper) * (outboard - (1.0 - taper) * taper_term)
}

/// Factored half-wing loading of one concept.
#[derive(Debug, Clone, PartialEq)]
pub struct WingLoadCase {
    /// Half-wing lift net of the wing's own mass (N).
    pub half_lift: f64,
    pub half_span: f64,
    pub taper: f64,
    /// Factored weight of one engine (N).
    pub engine_load: f64,
    pub engine_stations: Vec<f64>,
    pub combination: Combination,
}

impl WingLoadCase {
    pub fn from_aircraft(aircraft: &Aircraft, policy: &HingePolicy) -> Result<Self, HingeError> {
        aircraft.require_all(&[
            Field::UltimateLoadFactor,
            Field::WingSpan,
            Field::WingTaperRatio,
            Field::MotorCount,
            Field::MotorWingCount,
        ])?;
        let total = aircraft.sized_mass()?;
        let tree = aircraft
            .mass_breakdown
            .as_ref()
            .ok_or_else(|| AircraftError::NotSized(aircraft.name.clone()))?;
        let component = |path: &str| {
            tree.mass_of(path)
                .ok_or_else(|| HingeError::MissingComponent(path.to_string()))
        };
        let wing = component("airframe.wing")?;
        let propulsion = component("propulsion.motors")? + component("propulsion.propellers")?;

        let n = aircraft.require(Field::UltimateLoadFactor)?;
        let motor_count = aircraft.require(Field::MotorCount)?;
        let wing_engines = aircraft.motor_wing_count.unwrap_or(0);

        let resolved = policy.resolve(&aircraft.name);
        let stations = match resolved.engine_stations {
            Some(stations) => {
                if wing_engines as usize != 2 * stations.len() {
                    return Err(HingeError::EngineStationMismatch {
                        count: wing_engines,
                        stations: stations.len(),
                    });
                }
                stations
            }
            None => engine_stations(wing_engines)?,
        };
        if let Some(&bad) = stations.iter().find(|s| !(0.0..=1.0).contains(*s)) {
            return Err(HingeError::InvalidStation(bad));
        }

        let half_lift = n * G0 * (total - wing) / 2.0;
        if half_lift <= 0.0 {
            return Err(HingeError::NonPositiveLift);
        }
        log::debug!(
            "hinge load case for '{}': {:?}, engines at {stations:?}",
            aircraft.name,
            resolved.combination
        );

        Ok(Self {
            half_lift,
            half_span: aircraft.require(Field::WingSpan)? / 2.0,
            taper: aircraft.require(Field::WingTaperRatio)?,
            engine_load: n * G0 * propulsion / motor_count,
            engine_stations: stations,
            combination: resolved.combination,
        })
    }

    /// Shear and moment of the distributed lift at η.
    pub fn distributed(&self, eta: f64) -> (f64, f64) {
        (
            self.half_lift * shear_fraction(eta, self.taper),
            self.half_lift * self.half_span * moment_fraction(eta, self.taper),
        )
    }

    /// Shear and moment of the engines strictly outboard of η.
    pub fn point(&self, eta: f64) -> (f64, f64) {
        self.engine_stations
            .iter()
            .filter(|&&station| station > eta)
            .fold((0.0, 0.0), |(shear, moment), &station| {
                (
                    shear + self.engine_load,
                    moment + self.engine_load * (station - eta) * self.half_span,
                )
            })
    }

    pub fn at(&self, eta: f64) -> SpanStation {
        let (vd, md) = self.distributed(eta);
        let (vp, mp) = self.point(eta);
        let (shear, moment) = match self.combination {
            Combination::Superpose => (vd - vp, md - mp),
            Combination::MaxOfComponents => (vd.max(vp), md.max(mp)),
        };
        SpanStation { eta, shear, moment }
    }
}

/// Hinge loads and the spanwise distribution sampled at `stations` evenly spaced points.
pub fn hinge_loads(
    aircraft: &Aircraft,
    policy: &HingePolicy,
    stations: usize,
) -> Result<HingeLoads, HingeError> {
    if stations < 2 {
        return Err(HingeError::TooFewStations(stations));
    }
    let eta_hinge = aircraft.require(Field::WingHingePosition)?;
    let case = WingLoadCase::from_aircraft(aircraft, policy)?;

    let last = (stations - 1) as f64;
    let distribution = (0..stations).map(|i| case.at(i as f64 / last)).collect();
    let hinge = case.at(eta_hinge);
    Ok(HingeLoads {
        eta_hinge,
        shear: hinge.shear,
        moment: hinge.moment,
        distribution,
    })
}

/// Compute hinge loads and store them on the aircraft record.
pub fn apply_hinge_loads(
    aircraft: &mut Aircraft,
    policy: &HingePolicy,
    stations: usize,
) -> Result<HingeLoads, HingeError> {
    let loads = hinge_loads(aircraft, policy, stations)?;
    log::info!(
        "hinge of '{}' at η = {:.2}: V = {:.1} N, M = {:.1} N·m",
        aircraft.name,
        loads.eta_hinge,
        loads.shear,
        loads.moment
    );
    aircraft.hinge = Some(loads.clone());
    Ok(loads)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_forms_hit_their_end_values() {
        for taper in [0.3, 0.5, 1.0] {
            assert!((shear_fraction(0.0, taper) - 1.0).abs() < 1e-12);
            assert!(shear_fraction(1.0, taper).abs() < 1e-12);
            assert!(moment_fraction(1.0, taper).abs() < 1e-12);
        }
        // Uniform load: root moment is half lift times half of the half span.
        assert!((moment_fraction(0.0, 1.0) - 0.5).abs() < 1e-12);
    }
}

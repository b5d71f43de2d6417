//! Named numeric inputs of the aircraft record and their validity constraints.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Aircraft;

/// Validity constraint attached to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Constraint {
    /// `x > 0`
    Positive,
    /// `x >= 0`
    NonNegative,
    /// `0 < x <= 1`
    Fraction,
    /// `0 <= x <= 1`
    UnitInterval,
    /// `-90 < x < 90` (degrees)
    Angle,
}

impl Constraint {
    pub fn admits(self, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        match self {
            Constraint::Positive => value > 0.0,
            Constraint::NonNegative => value >= 0.0,
            Constraint::Fraction => value > 0.0 && value <= 1.0,
            Constraint::UnitInterval => (0.0..=1.0).contains(&value),
            Constraint::Angle => value > -90.0 && value < 90.0,
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Constraint::Positive => "> 0",
            Constraint::NonNegative => ">= 0",
            Constraint::Fraction => "0 < x <= 1",
            Constraint::UnitInterval => "0 <= x <= 1",
            Constraint::Angle => "-90 < x < 90",
        })
    }
}

macro_rules! fields {
    ($( $variant:ident => $key:literal, $kind:ident, $constraint:ident, $($path:ident).+ ; )*) => {
        /// Every numeric input of [`Aircraft`], addressable by a dotted key.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum Field {
            $($variant),*
        }

        impl Field {
            pub const ALL: &'static [Field] = &[$(Field::$variant),*];

            /// Dotted key as used in configuration files (e.g. `wing.taper_ratio`).
            pub fn key(self) -> &'static str {
                match self {
                    $(Field::$variant => $key),*
                }
            }

            pub fn constraint(self) -> Constraint {
                match self {
                    $(Field::$variant => Constraint::$constraint),*
                }
            }

            /// Current value on `aircraft`; counts are widened to `f64`.
            pub fn get(self, aircraft: &Aircraft) -> Option<f64> {
                match self {
                    $(Field::$variant => fields!(@get $kind, aircraft.$($path).+)),*
                }
            }

            /// Overwrite the value on `aircraft`; counts are rounded.
            pub fn set(self, aircraft: &mut Aircraft, value: Option<f64>) {
                match self {
                    $(Field::$variant => fields!(@set $kind, aircraft.$($path).+, value)),*
                }
            }
        }
    };
    (@get real, $e:expr) => { $e };
    (@get count, $e:expr) => { $e.map(f64::from) };
    (@set real, $place:expr, $v:expr) => { $place = $v };
    (@set count, $place:expr, $v:expr) => { $place = $v.map(|v| v.round().max(0.0) as u32) };
}

fields! {
    CruiseSpeed => "cruise_speed", real, Positive, cruise_speed;
    CruiseAltitude => "cruise_altitude", real, NonNegative, cruise_altitude;
    Range => "range", real, Positive, range;
    HoverHeight => "hover_height", real, NonNegative, hover_height;
    StallSpeed => "stall_speed", real, Positive, stall_speed;
    ClimbRate => "climb_rate", real, Positive, climb_rate;
    VerticalClimbRate => "vertical_climb_rate", real, Positive, vertical_climb_rate;
    GroundDuration => "ground_duration", real, NonNegative, ground_duration;
    TransitionDuration => "transition_duration", real, NonNegative, transition_duration;
    ClMax => "cl_max", real, Positive, cl_max;
    Cd0 => "cd0", real, Positive, cd0;
    OswaldEfficiency => "oswald_efficiency", real, Fraction, oswald_efficiency;
    UltimateLoadFactor => "ultimate_load_factor", real, Positive, ultimate_load_factor;
    PassengerCount => "passenger_count", count, Positive, passenger_count;
    PayloadMass => "payload_mass", real, Positive, payload_mass;
    AvionicsMass => "avionics_mass", real, NonNegative, avionics_mass;
    MotorCount => "motor_count", count, Positive, motor_count;
    MotorWingCount => "motor_wing_count", count, NonNegative, motor_wing_count;
    PropellerRadius => "propeller_radius", real, Positive, propeller_radius;
    PropellerBladeCount => "propeller_blade_count", count, Positive, propeller_blade_count;
    FigureOfMerit => "figure_of_merit", real, Fraction, figure_of_merit;
    PropellerEfficiency => "propeller_efficiency", real, Fraction, propeller_efficiency;
    MotorEfficiency => "motor_efficiency", real, Fraction, motor_efficiency;
    MotorSpecificPower => "motor_specific_power", real, Positive, motor_specific_power;
    ThrustToWeight => "thrust_to_weight", real, Positive, thrust_to_weight;
    BatterySpecificEnergy => "battery_specific_energy", real, Positive, battery_specific_energy;
    BatteryEfficiency => "battery_efficiency", real, Fraction, battery_efficiency;
    SocMin => "soc_min", real, UnitInterval, soc_min;
    WingArea => "wing.area", real, Positive, wing.area;
    WingAspectRatio => "wing.aspect_ratio", real, Positive, wing.aspect_ratio;
    WingSpan => "wing.span", real, Positive, wing.span;
    WingChord => "wing.chord", real, Positive, wing.chord;
    WingTaperRatio => "wing.taper_ratio", real, Fraction, wing.taper_ratio;
    WingThicknessToChord => "wing.thickness_to_chord", real, Fraction, wing.thickness_to_chord;
    WingSweep => "wing.sweep", real, Angle, wing.sweep;
    WingMaxArea => "wing.max_area", real, Positive, wing.max_area;
    WingMaxChord => "wing.max_chord", real, Positive, wing.max_chord;
    WingHingePosition => "wing.hinge_position", real, UnitInterval, wing.hinge_position;
    HorizontalTailArea => "horizontal_tail.area", real, Positive, horizontal_tail.area;
    HorizontalTailAspectRatio => "horizontal_tail.aspect_ratio", real, Positive, horizontal_tail.aspect_ratio;
    HorizontalTailRootThickness => "horizontal_tail.root_thickness", real, Positive, horizontal_tail.root_thickness;
    HorizontalTailVolume => "horizontal_tail.volume_coefficient", real, Positive, horizontal_tail.volume_coefficient;
    HorizontalTailArm => "horizontal_tail.arm", real, Positive, horizontal_tail.arm;
    VerticalTailArea => "vertical_tail.area", real, Positive, vertical_tail.area;
    VerticalTailAspectRatio => "vertical_tail.aspect_ratio", real, Positive, vertical_tail.aspect_ratio;
    VerticalTailRootThickness => "vertical_tail.root_thickness", real, Positive, vertical_tail.root_thickness;
    VerticalTailSweep => "vertical_tail.sweep", real, Angle, vertical_tail.sweep;
    VerticalTailVolume => "vertical_tail.volume_coefficient", real, Positive, vertical_tail.volume_coefficient;
    VerticalTailArm => "vertical_tail.arm", real, Positive, vertical_tail.arm;
    FuselageLength => "fuselage.length", real, Positive, fuselage.length;
    FuselagePerimeter => "fuselage.perimeter", real, Positive, fuselage.perimeter;
    FuselageWidth => "fuselage.width", real, Positive, fuselage.width;
    FuselageHeight => "fuselage.height", real, Positive, fuselage.height;
}

impl Field {
    /// Look a field up by its dotted key.
    pub fn from_key(key: &str) -> Option<Field> {
        Field::ALL.iter().copied().find(|f| f.key() == key)
    }

    /// Value the field takes on a default-constructed aircraft.
    pub fn default_value(self) -> Option<f64> {
        self.get(&Aircraft::default())
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

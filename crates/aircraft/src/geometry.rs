//! Wing, tail and fuselage records plus the wing planform solver.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Two known planform quantities from which the other two are derived.
///
/// `chord` is the mean geometric chord `S / b`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "known", rename_all = "snake_case")]
pub enum Known {
    AreaAspectRatio { area: f64, aspect_ratio: f64 },
    AreaSpan { area: f64, span: f64 },
    AreaChord { area: f64, chord: f64 },
    SpanAspectRatio { span: f64, aspect_ratio: f64 },
    SpanChord { span: f64, chord: f64 },
    AspectRatioChord { aspect_ratio: f64, chord: f64 },
}

/// Ceilings applied after solving.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanformLimits {
    pub max_area: Option<f64>,
    pub max_chord: Option<f64>,
}

/// Fully resolved planform: area (m²), aspect ratio, span (m), mean chord (m).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Planform {
    pub area: f64,
    pub aspect_ratio: f64,
    pub span: f64,
    pub chord: f64,
}

/// Result of [`Planform::solve`], recording which ceilings were hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanformSolution {
    pub planform: Planform,
    pub area_clamped: bool,
    pub chord_clamped: bool,
}

#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("planform quantity '{quantity}' must be positive (got {value})")]
    NonPositive { quantity: &'static str, value: f64 },
    #[error("wing planform is incomplete; '{0}' is unset")]
    Incomplete(&'static str),
}

impl Planform {
    /// Resolve all four quantities from two, then apply the ceilings.
    ///
    /// An area above `max_area` is reduced at constant aspect ratio; a chord above
    /// `max_chord` is then reduced at constant area (span grows).
    pub fn solve(known: Known, limits: &PlanformLimits) -> Result<PlanformSolution, GeometryError> {
        let planform = match known {
            Known::AreaAspectRatio { area, aspect_ratio } => {
                positive("area", area)?;
                positive("aspect_ratio", aspect_ratio)?;
                Self::from_area_aspect(area, aspect_ratio)
            }
            Known::AreaSpan { area, span } => {
                positive("area", area)?;
                positive("span", span)?;
                Self::from_area_span(area, span)
            }
            Known::AreaChord { area, chord } => {
                positive("area", area)?;
                positive("chord", chord)?;
                Self::from_area_span(area, area / chord)
            }
            Known::SpanAspectRatio { span, aspect_ratio } => {
                positive("span", span)?;
                positive("aspect_ratio", aspect_ratio)?;
                let chord = span / aspect_ratio;
                Self::from_area_span(span * chord, span)
            }
            Known::SpanChord { span, chord } => {
                positive("span", span)?;
                positive("chord", chord)?;
                Self::from_area_span(span * chord, span)
            }
            Known::AspectRatioChord {
                aspect_ratio,
                chord,
            } => {
                positive("aspect_ratio", aspect_ratio)?;
                positive("chord", chord)?;
                let span = aspect_ratio * chord;
                Self::from_area_span(span * chord, span)
            }
        };

        let mut solution = PlanformSolution {
            planform,
            area_clamped: false,
            chord_clamped: false,
        };

        if let Some(max_area) = limits.max_area {
            if solution.planform.area > max_area {
                solution.planform = Self::from_area_aspect(max_area, solution.planform.aspect_ratio);
                solution.area_clamped = true;
            }
        }
        if let Some(max_chord) = limits.max_chord {
            if solution.planform.chord > max_chord {
                let area = solution.planform.area;
                solution.planform = Self::from_area_span(area, area / max_chord);
                solution.chord_clamped = true;
            }
        }

        Ok(solution)
    }

    fn from_area_aspect(area: f64, aspect_ratio: f64) -> Self {
        let span = (area * aspect_ratio).sqrt();
        Self {
            area,
            aspect_ratio,
            span,
            chord: area / span,
        }
    }

    fn from_area_span(area: f64, span: f64) -> Self {
        Self {
            area,
            aspect_ratio: span * span / area,
            span,
            chord: area / span,
        }
    }
}

fn positive(quantity: &'static str, value: f64) -> Result<(), GeometryError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(GeometryError::NonPositive { quantity, value })
    }
}

/// Main wing. Planform fields are kept consistent through [`Wing::set_planform`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Wing {
    pub area: Option<f64>,
    pub aspect_ratio: Option<f64>,
    pub span: Option<f64>,
    pub chord: Option<f64>,
    pub taper_ratio: Option<f64>,
    pub thickness_to_chord: Option<f64>,
    /// Quarter-chord sweep (degrees).
    pub sweep: Option<f64>,
    pub max_area: Option<f64>,
    pub max_chord: Option<f64>,
    /// Spanwise station of the fold hinge as a fraction of the half span.
    pub hinge_position: Option<f64>,
}

impl Default for Wing {
    fn default() -> Self {
        Self {
            area: None,
            aspect_ratio: None,
            span: None,
            chord: None,
            taper_ratio: Some(0.45),
            thickness_to_chord: Some(0.15),
            sweep: Some(0.0),
            max_area: None,
            max_chord: None,
            hinge_position: None,
        }
    }
}

impl Wing {
    pub fn limits(&self) -> PlanformLimits {
        PlanformLimits {
            max_area: self.max_area,
            max_chord: self.max_chord,
        }
    }

    /// Solve the planform from two known quantities and store all four.
    pub fn set_planform(&mut self, known: Known) -> Result<PlanformSolution, GeometryError> {
        let solution = Planform::solve(known, &self.limits())?;
        if solution.area_clamped || solution.chord_clamped {
            log::warn!(
                "wing planform clamped (area: {}, chord: {}) to S = {:.3} m², c = {:.3} m",
                solution.area_clamped,
                solution.chord_clamped,
                solution.planform.area,
                solution.planform.chord
            );
        }
        let p = solution.planform;
        self.area = Some(p.area);
        self.aspect_ratio = Some(p.aspect_ratio);
        self.span = Some(p.span);
        self.chord = Some(p.chord);
        Ok(solution)
    }

    /// Set a new area keeping the current aspect ratio.
    pub fn set_area(&mut self, area: f64) -> Result<PlanformSolution, GeometryError> {
        let aspect_ratio = self
            .aspect_ratio
            .ok_or(GeometryError::Incomplete("aspect_ratio"))?;
        self.set_planform(Known::AreaAspectRatio { area, aspect_ratio })
    }

    /// Complete planform, if all four quantities are set.
    pub fn planform(&self) -> Option<Planform> {
        Some(Planform {
            area: self.area?,
            aspect_ratio: self.aspect_ratio?,
            span: self.span?,
            chord: self.chord?,
        })
    }

    /// Resolve a partially specified planform from whichever two quantities are present.
    pub fn resolve_planform(&mut self) -> Result<PlanformSolution, GeometryError> {
        let known = match (self.area, self.aspect_ratio, self.span, self.chord) {
            (Some(area), Some(aspect_ratio), _, _) => Known::AreaAspectRatio { area, aspect_ratio },
            (Some(area), _, Some(span), _) => Known::AreaSpan { area, span },
            (Some(area), _, _, Some(chord)) => Known::AreaChord { area, chord },
            (_, Some(aspect_ratio), Some(span), _) => Known::SpanAspectRatio { span, aspect_ratio },
            (_, _, Some(span), Some(chord)) => Known::SpanChord { span, chord },
            (_, Some(aspect_ratio), _, Some(chord)) => Known::AspectRatioChord {
                aspect_ratio,
                chord,
            },
            (None, _, _, _) => return Err(GeometryError::Incomplete("area")),
            _ => return Err(GeometryError::Incomplete("aspect_ratio")),
        };
        self.set_planform(known)
    }

    /// Root chord of a straight-tapered trapezoidal wing (m).
    pub fn root_chord(&self) -> Result<f64, GeometryError> {
        let area = self.area.ok_or(GeometryError::Incomplete("area"))?;
        let span = self.span.ok_or(GeometryError::Incomplete("span"))?;
        let taper = self.taper_ratio.unwrap_or(1.0);
        Ok(2.0 * area / (span * (1.0 + taper)))
    }

    /// Mean aerodynamic chord of a straight-tapered wing (m).
    pub fn mean_aerodynamic_chord(&self) -> Result<f64, GeometryError> {
        let root = self.root_chord()?;
        let taper = self.taper_ratio.unwrap_or(1.0);
        Ok(2.0 / 3.0 * root * (1.0 + taper + taper * taper) / (1.0 + taper))
    }
}

/// Horizontal or vertical tail surface.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tail {
    pub area: Option<f64>,
    pub aspect_ratio: Option<f64>,
    /// Maximum root thickness (m).
    pub root_thickness: Option<f64>,
    /// Quarter-chord sweep (degrees).
    pub sweep: Option<f64>,
    /// Tail volume coefficient; when set, the area is sized from it.
    pub volume_coefficient: Option<f64>,
    /// Distance from wing to tail aerodynamic centre (m).
    pub arm: Option<f64>,
}

/// Fuselage envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fuselage {
    pub length: Option<f64>,
    pub perimeter: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl Fuselage {
    /// Maximum perimeter (m): explicit, or the Ramanujan ellipse through width and height.
    pub fn max_perimeter(&self) -> Option<f64> {
        if let Some(p) = self.perimeter {
            return Some(p);
        }
        let a = self.width? / 2.0;
        let b = self.height? / 2.0;
        let h = ((a - b) / (a + b)).powi(2);
        Some(PI * (a + b) * (1.0 + 3.0 * h / (10.0 + (4.0 - 3.0 * h).sqrt())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9 * a.abs().max(1.0)
    }

    #[test]
    fn every_pair_yields_the_same_planform() {
        let reference = Planform {
            area: 20.0,
            aspect_ratio: 8.0,
            span: 160f64.sqrt(),
            chord: 20.0 / 160f64.sqrt(),
        };
        let limits = PlanformLimits::default();
        let cases = [
            Known::AreaAspectRatio { area: 20.0, aspect_ratio: 8.0 },
            Known::AreaSpan { area: 20.0, span: reference.span },
            Known::AreaChord { area: 20.0, chord: reference.chord },
            Known::SpanAspectRatio { span: reference.span, aspect_ratio: 8.0 },
            Known::SpanChord { span: reference.span, chord: reference.chord },
            Known::AspectRatioChord { aspect_ratio: 8.0, chord: reference.chord },
        ];
        for known in cases {
            let p = Planform::solve(known, &limits).unwrap().planform;
            assert!(close(p.area, reference.area), "{known:?} -> {p:?}");
            assert!(close(p.aspect_ratio, reference.aspect_ratio), "{known:?} -> {p:?}");
            assert!(close(p.span, reference.span), "{known:?} -> {p:?}");
            assert!(close(p.chord, reference.chord), "{known:?} -> {p:?}");
        }
    }

    #[test]
    fn ceilings_clamp_silently() {
        let limits = PlanformLimits {
            max_area: Some(15.0),
            max_chord: Some(1.2),
        };
        let s = Planform::solve(Known::AreaAspectRatio { area: 20.0, aspect_ratio: 6.0 }, &limits).unwrap();
        assert!(s.area_clamped);
        assert!(s.chord_clamped);
        assert!(close(s.planform.area, 15.0));
        assert!(close(s.planform.chord, 1.2));
        assert!(close(s.planform.span, 12.5));
        assert!(close(s.planform.aspect_ratio, 12.5 * 12.5 / 15.0));
    }

    #[test]
    fn non_positive_inputs_are_rejected() {
        let err = Planform::solve(
            Known::AreaSpan { area: -1.0, span: 3.0 },
            &PlanformLimits::default(),
        )
        .unwrap_err();
        assert_eq!(err, GeometryError::NonPositive { quantity: "area", value: -1.0 });
    }

    #[test]
    fn mac_of_rectangular_wing_is_its_chord() {
        let mut wing = Wing {
            taper_ratio: Some(1.0),
            ..Wing::default()
        };
        wing.set_planform(Known::SpanChord { span: 10.0, chord: 1.5 }).unwrap();
        assert!(close(wing.mean_aerodynamic_chord().unwrap(), 1.5));
        wing.set_area(30.0).unwrap();
        assert!(close(wing.aspect_ratio.unwrap(), 10.0 / 1.5));
        assert!(close(wing.area.unwrap(), 30.0));
    }

    #[test]
    fn circular_fuselage_perimeter() {
        let f = Fuselage {
            width: Some(2.0),
            height: Some(2.0),
            ..Fuselage::default()
        };
        assert!(close(f.max_perimeter().unwrap(), 2.0 * PI));
    }
}

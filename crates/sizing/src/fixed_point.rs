//! Scalar fixed-point (Picard) iteration with optional under-relaxation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stopping rule and relaxation for [`iterate`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IterationSettings {
    /// Absolute tolerance on `|g(m) - m|`.
    pub tolerance: f64,
    pub max_iterations: usize,
    /// Relaxation factor ω in `(0, 1]`; 1 is plain Picard iteration.
    pub damping: f64,
}

impl Default for IterationSettings {
    fn default() -> Self {
        Self {
            tolerance: 1e-2,
            max_iterations: 200,
            damping: 1.0,
        }
    }
}

impl IterationSettings {
    pub fn validate(&self) -> Result<(), &'static str> {
        if !(self.tolerance > 0.0 && self.tolerance.is_finite()) {
            return Err("tolerance must be positive");
        }
        if self.max_iterations == 0 {
            return Err("max_iterations must be at least 1");
        }
        if !(self.damping > 0.0 && self.damping <= 1.0) {
            return Err("damping must lie in (0, 1]");
        }
        Ok(())
    }
}

/// Converged fixed point.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedPoint {
    /// `g` evaluated at the last iterate.
    pub value: f64,
    /// Number of map evaluations.
    pub iterations: usize,
    pub residual: f64,
    /// Every iterate, starting with the initial guess.
    pub history: Vec<f64>,
}

#[derive(Debug, Error, PartialEq)]
pub enum IterationError<E> {
    #[error(
        "no fixed point after {iterations} iterations (last iterate {last_iterate}, residual {residual})"
    )]
    NotConverged {
        last_iterate: f64,
        iterations: usize,
        residual: f64,
        history: Vec<f64>,
    },
    #[error("iterate left the positive reals: {iterate}")]
    NonPositive { iterate: f64 },
    #[error("invalid iteration settings: {0}")]
    InvalidSettings(&'static str),
    #[error(transparent)]
    Map(E),
}

/// Iterate `m <- m + ω (g(m) - m)` from `m0` until `|g(m) - m| < tolerance`.
///
/// Every iterate must stay positive and finite; errors raised by `g` abort the iteration
/// unchanged.
pub fn iterate<F, E>(
    mut g: F,
    m0: f64,
    settings: &IterationSettings,
) -> Result<FixedPoint, IterationError<E>>
where
    F: FnMut(f64) -> Result<f64, E>,
{
    settings.validate().map_err(IterationError::InvalidSettings)?;
    check_positive(m0)?;

    let mut m = m0;
    let mut history = vec![m0];
    let mut residual = f64::INFINITY;

    for k in 1..=settings.max_iterations {
        let gm = g(m).map_err(IterationError::Map)?;
        check_positive(gm)?;
        residual = (gm - m).abs();
        log::trace!("fixed point iteration {k}: m = {m:.6}, g(m) = {gm:.6}, residual = {residual:.3e}");

        if residual < settings.tolerance {
            history.push(gm);
            return Ok(FixedPoint {
                value: gm,
                iterations: k,
                residual,
                history,
            });
        }

        m += settings.damping * (gm - m);
        check_positive(m)?;
        history.push(m);
    }

    Err(IterationError::NotConverged {
        last_iterate: m,
        iterations: settings.max_iterations,
        residual,
        history,
    })
}

fn check_positive<E>(value: f64) -> Result<(), IterationError<E>> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(IterationError::NonPositive { iterate: value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    fn tight() -> IterationSettings {
        IterationSettings {
            tolerance: 1e-9,
            max_iterations: 500,
            damping: 1.0,
        }
    }

    #[test]
    fn contraction_converges_from_any_start() {
        let expected = 200.0 / 0.7;
        for m0 in [100.0, 1_000.0, 5_000.0] {
            let fp = iterate(|m| Ok::<_, Infallible>(0.3 * m + 200.0), m0, &tight()).unwrap();
            assert!((fp.value - expected).abs() < 1e-6, "m0 = {m0}: {}", fp.value);
            assert!(fp.residual < 1e-9);
            assert_eq!(fp.history.first(), Some(&m0));
        }
    }

    #[test]
    fn damping_still_reaches_the_fixed_point() {
        let settings = IterationSettings {
            damping: 0.5,
            ..tight()
        };
        let fp = iterate(|m| Ok::<_, Infallible>(0.3 * m + 200.0), 100.0, &settings).unwrap();
        assert!((fp.value - 200.0 / 0.7).abs() < 1e-6);
    }

    #[test]
    fn expanding_map_reports_divergence() {
        let settings = IterationSettings {
            max_iterations: 40,
            ..tight()
        };
        let err = iterate(|m| Ok::<_, Infallible>(1.5 * m), 100.0, &settings).unwrap_err();
        match err {
            IterationError::NotConverged {
                iterations,
                history,
                last_iterate,
                ..
            } => {
                assert_eq!(iterations, 40);
                assert_eq!(history.len(), 41);
                assert!(last_iterate > 100.0);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn map_errors_pass_through() {
        let err = iterate(|_| Err::<f64, _>("boom"), 10.0, &tight()).unwrap_err();
        assert_eq!(err, IterationError::Map("boom"));
    }

    #[test]
    fn negative_iterates_are_rejected() {
        let err = iterate(|m| Ok::<_, Infallible>(m - 1_000.0), 10.0, &tight()).unwrap_err();
        assert_eq!(err, IterationError::NonPositive { iterate: -990.0 });
        let settings = IterationSettings {
            damping: 1.5,
            ..tight()
        };
        assert!(matches!(
            iterate(|m| Ok::<_, Infallible>(m), 10.0, &settings),
            Err(IterationError::InvalidSettings(_))
        ));
    }
}

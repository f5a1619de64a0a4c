//! Failure-envelope tracer
//!
//! Finds the boundary, in (a, b) load-multiplier space, of the region where
//! a laminate survives the combined load a*N + b*M: `a` scales the force
//! part of a reference load, `b` the moment part. Boundary points are roots
//! of `1 - max ply failure index`, located by bracketed bisection; the sweep
//! across `a` is embarrassingly parallel and runs on rayon.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::analysis::ThinPlateAnalysis;
use crate::error::{LamError, LamResult};
use crate::failure::{self, FailureCriterion, FailureKind};
use crate::math::{bisect_root, Vec3, Vec6};

/// Tuning knobs for the envelope sweep
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeOptions {
    /// Multiplier magnitude the root brackets extend to
    pub bracket: f64,
    /// Spacing of the swept `a` samples
    pub step: f64,
    /// Relative interval tolerance of the root finder
    pub tol: f64,
    /// Iteration bound of the root finder
    pub max_iter: usize,
}

impl Default for EnvelopeOptions {
    fn default() -> Self {
        Self {
            bracket: 100.0,
            step: 0.01,
            tol: 1e-12,
            max_iter: 200,
        }
    }
}

impl EnvelopeOptions {
    /// Reject options the sweep cannot run with. The fields are public, so
    /// this runs again at the top of [`trace_envelope`].
    fn validate(&self) -> LamResult<()> {
        if !(self.step > 0.0 && self.step.is_finite()) {
            return Err(LamError::InvalidOptions(format!(
                "step must be positive and finite, got {}",
                self.step
            )));
        }
        if !(self.bracket > 0.0 && self.bracket.is_finite()) {
            return Err(LamError::InvalidOptions(format!(
                "bracket must be positive and finite, got {}",
                self.bracket
            )));
        }
        if !(self.tol > 0.0 && self.tol.is_finite()) {
            return Err(LamError::InvalidOptions(format!(
                "tolerance must be positive and finite, got {}",
                self.tol
            )));
        }
        Ok(())
    }

    /// Set the bracket magnitude
    pub fn with_bracket(mut self, bracket: f64) -> Self {
        self.bracket = bracket;
        self
    }

    /// Set the sweep step
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    /// Set the root-finder tolerance
    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }
}

/// A traced failure envelope.
///
/// `a_plot`/`b_plot` form a closed boundary polyline suitable for direct
/// plotting: `[a_min, a.., a_max, a(reversed).., a_min]` against
/// `[0, b_upper.., 0, b_lower(reversed).., 0]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Force-multiplier root on the negative a-axis (b = 0)
    pub a_min: f64,
    /// Force-multiplier root on the positive a-axis (b = 0)
    pub a_max: f64,
    /// Moment-multiplier root on the negative b-axis (a = 0), when bracketable
    pub b_min: Option<f64>,
    /// Moment-multiplier root on the positive b-axis (a = 0), when bracketable
    pub b_max: Option<f64>,
    /// Boundary polyline, a-coordinates
    pub a_plot: Vec<f64>,
    /// Boundary polyline, b-coordinates
    pub b_plot: Vec<f64>,
    /// Number of swept samples attempted
    pub samples: usize,
    /// Samples dropped because no root could be bracketed
    pub skipped: usize,
}

/// Trace the failure envelope of a laminate under a reference load split
/// into a force part `n` and a moment part `m`.
///
/// The four baseline roots fix the other multiplier at zero. The sweep then
/// walks `a` from `2*a_min` to `2*a_max`, solving the lower and upper `b`
/// roots at each sample; the second bracket is seeded just inside the first
/// root so the finder cannot rediscover it. Samples where no root brackets
/// are logged and skipped, never fatal.
///
/// Fails with [`LamError::InvalidOptions`] before any work when the options
/// carry a non-positive or non-finite step, bracket or tolerance.
pub fn trace_envelope(
    analysis: &ThinPlateAnalysis,
    n: &Vec3,
    m: &Vec3,
    criterion: FailureCriterion,
    kind: FailureKind,
    options: &EnvelopeOptions,
) -> LamResult<Envelope> {
    options.validate()?;

    let margin = |a: f64, b: f64| -> Option<f64> {
        let mut r = Vec6::zeros();
        r.fixed_rows_mut::<3>(0).copy_from(&(n * a));
        r.fixed_rows_mut::<3>(3).copy_from(&(m * b));
        let states = analysis.ply_states_for(&r);
        failure::max_failure_index(analysis.laminate(), &states, criterion, kind)
            .map(|index| 1.0 - index)
    };

    // An unloaded laminate must evaluate cleanly; if not, no ply carries the
    // limits this criterion needs and the whole trace is meaningless.
    if margin(0.0, 0.0).is_none() {
        return Err(LamError::NoStrengthData);
    }
    let margin = |a: f64, b: f64| margin(a, b).unwrap_or(f64::NAN);

    let bracket = options.bracket;
    let solve = |f: &(dyn Fn(f64) -> f64 + Sync), lo: f64, hi: f64| {
        bisect_root(f, lo, hi, options.tol, options.max_iter)
    };

    // Baseline roots. The sweep axis needs both a-roots; the b-baselines are
    // best effort (a pure-force reference load has none).
    let a_min = solve(&|a| margin(a, 0.0), -bracket, 0.0)?;
    let a_max = solve(&|a| margin(a, 0.0), 0.0, bracket)?;
    let b_min = solve(&|b| margin(0.0, b), -bracket, 0.0).ok();
    let b_max = solve(&|b| margin(0.0, b), 0.0, bracket).ok();
    if b_min.is_none() || b_max.is_none() {
        log::debug!("no moment-axis baseline root; reference moment may be zero");
    }

    // Sample a from 2*a_min up to 2*a_max, left half then right half.
    let mut a_samples = Vec::new();
    let mut a = 2.0 * a_min;
    while a < 0.0 {
        a_samples.push(a);
        a += options.step;
    }
    let mut a = 0.0;
    while a < 2.0 * a_max {
        a_samples.push(a);
        a += options.step;
    }
    let samples = a_samples.len();

    // Each sample is independent; results come back in ascending-a order
    // because the indexed collect preserves input order.
    let solved: Vec<Option<(f64, f64, f64)>> = a_samples
        .par_iter()
        .map(|&a| {
            let result = if a < 0.0 {
                solve(&|b| margin(a, b), -bracket, 0.0).and_then(|lower| {
                    solve(&|b| margin(a, b), 0.99 * lower, bracket)
                        .map(|upper| (a, lower, upper))
                })
            } else {
                solve(&|b| margin(a, b), 0.0, bracket).and_then(|upper| {
                    solve(&|b| margin(a, b), -bracket, 0.99 * upper)
                        .map(|lower| (a, lower, upper))
                })
            };
            if let Err(err) = &result {
                log::debug!("envelope sample a={a:.4}: {err}");
            }
            result.ok()
        })
        .collect();

    let converged: Vec<(f64, f64, f64)> = solved.into_iter().flatten().collect();
    let skipped = samples - converged.len();
    if skipped > 0 {
        log::warn!("envelope sweep skipped {skipped} of {samples} samples (no bracket)");
    }

    let mut a_plot = Vec::with_capacity(2 * converged.len() + 3);
    let mut b_plot = Vec::with_capacity(2 * converged.len() + 3);
    a_plot.push(a_min);
    b_plot.push(0.0);
    for &(a, _, upper) in &converged {
        a_plot.push(a);
        b_plot.push(upper);
    }
    a_plot.push(a_max);
    b_plot.push(0.0);
    for &(a, lower, _) in converged.iter().rev() {
        a_plot.push(a);
        b_plot.push(lower);
    }
    a_plot.push(a_min);
    b_plot.push(0.0);

    Ok(Envelope {
        a_min,
        a_max,
        b_min,
        b_max,
        a_plot,
        b_plot,
        samples,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::laminate::{Laminate, Ply};
    use crate::material::{Material, PlateMaterial, StressLimits};

    fn pm45_laminate() -> Laminate {
        // [+-45]s stack of the baseline material.
        let uni = PlateMaterial::new("uni", 1.85e7, 1.8e6, 0.3, 9.3e5, 1.0, 0.01)
            .unwrap()
            .with_stress_limits(StressLimits::new(327e3, -235e3, 9.3e3, -37e3, 13.8e3).unwrap());
        let plies = vec![
            Ply::new(Material::Plate(uni.clone()), 45.0),
            Ply::new(Material::Plate(uni), -45.0),
        ];
        Laminate::new(plies, 1, true).unwrap()
    }

    #[test]
    fn test_pure_force_baseline_roots_straddle_zero() {
        let analysis = ThinPlateAnalysis::new(&pm45_laminate()).unwrap();
        let envelope = trace_envelope(
            &analysis,
            &Vec3::new(1000.0, 0.0, 0.0),
            &Vec3::zeros(),
            FailureCriterion::MaxStress,
            FailureKind::Any,
            &EnvelopeOptions::default(),
        )
        .unwrap();

        assert!(envelope.a_min < 0.0);
        assert!(envelope.a_max > 0.0);
        // Zero reference moment: no b root can bracket anywhere, so the
        // polyline collapses onto the a-axis and is symmetric about b = 0.
        assert!(envelope.b_min.is_none());
        assert!(envelope.b_max.is_none());
        assert!(envelope.b_plot.iter().all(|&b| b == 0.0));
    }

    #[test]
    fn test_unbracketable_samples_skipped_not_fatal() {
        let analysis = ThinPlateAnalysis::new(&pm45_laminate()).unwrap();
        let envelope = trace_envelope(
            &analysis,
            &Vec3::new(1000.0, 0.0, 0.0),
            &Vec3::zeros(),
            FailureCriterion::MaxStress,
            FailureKind::Any,
            &EnvelopeOptions::default().with_step(0.05),
        )
        .unwrap();

        // Every sample fails to bracket, yet the trace still returns the
        // baseline polyline.
        assert_eq!(envelope.skipped, envelope.samples);
        assert_eq!(envelope.a_plot.len(), 3);
        assert_eq!(envelope.b_plot.len(), 3);
    }

    #[test]
    fn test_combined_load_envelope_closed_and_consistent() {
        let analysis = ThinPlateAnalysis::new(&pm45_laminate()).unwrap();
        let envelope = trace_envelope(
            &analysis,
            &Vec3::new(1000.0, 0.0, 0.0),
            &Vec3::new(10.0, 0.0, 0.0),
            FailureCriterion::Hoffman,
            FailureKind::Any,
            &EnvelopeOptions::default().with_step(0.05),
        )
        .unwrap();

        let converged = envelope.samples - envelope.skipped;
        assert!(converged > 0, "expected some samples to converge");
        // The sweep overshoots the envelope on purpose (it runs out to twice
        // the a-baseline roots), so the outermost samples cannot bracket and
        // the polyline must shrink by exactly the skipped count.
        assert!(envelope.skipped > 0, "expected some samples to skip");
        assert_eq!(envelope.a_plot.len(), 2 * converged + 3);
        assert_eq!(envelope.a_plot.len(), envelope.b_plot.len());

        // Closed polyline.
        assert_eq!(envelope.a_plot.first(), envelope.a_plot.last());
        assert_eq!(envelope.b_plot.first(), envelope.b_plot.last());

        // Upper branch above the a-axis, lower branch below, where solved.
        assert!(envelope.b_max.unwrap() > 0.0);
        assert!(envelope.b_min.unwrap() < 0.0);
    }

    #[test]
    fn test_degenerate_options_rejected() {
        let analysis = ThinPlateAnalysis::new(&pm45_laminate()).unwrap();
        let n = Vec3::new(1000.0, 0.0, 0.0);
        let m = Vec3::zeros();
        let bad = [
            EnvelopeOptions::default().with_step(0.0),
            EnvelopeOptions::default().with_step(-0.01),
            EnvelopeOptions::default().with_step(f64::NAN),
            EnvelopeOptions::default().with_bracket(0.0),
            EnvelopeOptions::default().with_tolerance(-1e-12),
        ];
        for options in bad {
            let err = trace_envelope(
                &analysis,
                &n,
                &m,
                FailureCriterion::MaxStress,
                FailureKind::Any,
                &options,
            )
            .unwrap_err();
            assert!(matches!(err, LamError::InvalidOptions(_)), "{options:?}");
        }
    }

    #[test]
    fn test_no_strength_data_rejected() {
        let core = PlateMaterial::new("core", 10e3, 10e3, 0.3, 5e3, 0.05, 0.25).unwrap();
        let lam =
            Laminate::new(vec![Ply::new(Material::Plate(core), 0.0)], 1, true).unwrap();
        let analysis = ThinPlateAnalysis::new(&lam).unwrap();
        let err = trace_envelope(
            &analysis,
            &Vec3::new(1.0, 0.0, 0.0),
            &Vec3::zeros(),
            FailureCriterion::MaxStress,
            FailureKind::Any,
            &EnvelopeOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, LamError::NoStrengthData));
    }
}

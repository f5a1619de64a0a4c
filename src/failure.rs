//! Multi-axial ply failure criteria
//!
//! Every criterion is a pure function of one ply's recovered stress/strain
//! state and its material limits, returning a scalar index where values of
//! one or more denote predicted failure. Plies whose material does not carry
//! the limits a criterion needs (core materials, typically) are skipped.

use serde::{Deserialize, Serialize};

use crate::laminate::Laminate;
use crate::material::Material;
use crate::results::{PlyFailureIndex, PlyState};

/// Failure criterion selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureCriterion {
    /// Largest stress component against its sign-selected limit
    MaxStress,
    /// Largest strain component against its sign-selected limit
    MaxStrain,
    /// Tsai-Hill quadratic interaction criterion
    TsaiHill,
    /// Hoffman criterion; continuous across tension/compression sign changes
    Hoffman,
}

/// Which stress/strain component the max-type criteria examine.
///
/// The quadratic criteria (Tsai-Hill, Hoffman) always use the full state and
/// ignore this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FailureKind {
    #[default]
    Any,
    Longitudinal,
    Transverse,
    Shear,
}

/// Failure index of one ply, or `None` when the material lacks the limits
/// the criterion needs.
pub fn ply_failure_index(
    material: &Material,
    state: &PlyState,
    criterion: FailureCriterion,
    kind: FailureKind,
) -> Option<f64> {
    match criterion {
        FailureCriterion::MaxStress => {
            let l = material.stress_limits()?;
            let (s1, s2, s12) = (state.stress[0], state.stress[1], state.stress[2]);
            let long = if s1 >= 0.0 { s1 / l.f1t } else { s1 / l.f1c };
            let trans = if s2 >= 0.0 { s2 / l.f2t } else { s2 / l.f2c };
            let shear = s12.abs() / l.f12s;
            Some(select(kind, long, trans, shear))
        }
        FailureCriterion::MaxStrain => {
            let l = material.strain_limits()?;
            let (e1, e2, e12) = (state.strain[0], state.strain[1], state.strain[2]);
            let long = if e1 >= 0.0 { e1 / l.e1t } else { e1 / l.e1c };
            let trans = if e2 >= 0.0 { e2 / l.e2t } else { e2 / l.e2c };
            let shear = e12.abs() / l.e12s;
            Some(select(kind, long, trans, shear))
        }
        FailureCriterion::TsaiHill => {
            let l = material.stress_limits()?;
            let (s1, s2, s12) = (state.stress[0], state.stress[1], state.stress[2]);
            let f1 = if s1 >= 0.0 { l.f1t } else { l.f1c };
            let f2 = if s2 >= 0.0 { l.f2t } else { l.f2c };
            Some(
                (s1 / f1).powi(2) + (s2 / f2).powi(2) + (s12 / l.f12s).powi(2)
                    - s1 * s2 / (f1 * f1),
            )
        }
        FailureCriterion::Hoffman => {
            let l = material.stress_limits()?;
            let (s1, s2, s12) = (state.stress[0], state.stress[1], state.stress[2]);
            // No branch on stress sign; f1c/f2c are negative so the quadratic
            // terms stay positive.
            Some(
                -s1 * s1 / (l.f1t * l.f1c) + s1 * s2 / (l.f1t * l.f1c)
                    - s2 * s2 / (l.f2t * l.f2c)
                    + s1 * (1.0 / l.f1t + 1.0 / l.f1c)
                    + s2 * (1.0 / l.f2t + 1.0 / l.f2c)
                    + (s12 / l.f12s).powi(2),
            )
        }
    }
}

fn select(kind: FailureKind, long: f64, trans: f64, shear: f64) -> f64 {
    match kind {
        FailureKind::Any => long.max(trans).max(shear),
        FailureKind::Longitudinal => long,
        FailureKind::Transverse => trans,
        FailureKind::Shear => shear,
    }
}

/// Failure index of every ply that carries the needed limits.
///
/// `states` must be the recovered states of `laminate`'s plies, in stack
/// order.
pub fn failure_indices(
    laminate: &Laminate,
    states: &[PlyState],
    criterion: FailureCriterion,
    kind: FailureKind,
) -> Vec<PlyFailureIndex> {
    laminate
        .plies()
        .iter()
        .zip(states)
        .enumerate()
        .filter_map(|(ply, (p, state))| {
            ply_failure_index(&p.material, state, criterion, kind)
                .map(|index| PlyFailureIndex { ply, index })
        })
        .collect()
}

/// The governing (largest) ply failure index, or `None` when no ply carries
/// the needed limits.
pub fn max_failure_index(
    laminate: &Laminate,
    states: &[PlyState],
    criterion: FailureCriterion,
    kind: FailureKind,
) -> Option<f64> {
    failure_indices(laminate, states, criterion, kind)
        .into_iter()
        .map(|p| p.index)
        .reduce(f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;
    use crate::material::{PlateMaterial, StressLimits};
    use approx::assert_relative_eq;

    fn limited() -> Material {
        Material::Plate(
            PlateMaterial::new("uni", 21.3e6, 1.5e6, 0.27, 1.0e6, 1.0, 0.01)
                .unwrap()
                .with_stress_limits(
                    StressLimits::new(330e3, -250e3, 8.3e3, -33e3, 11e3).unwrap(),
                ),
        )
    }

    fn state(s1: f64, s2: f64, s12: f64) -> PlyState {
        PlyState {
            stress: Vec3::new(s1, s2, s12),
            strain: Vec3::zeros(),
            z_mid: 0.0,
        }
    }

    #[test]
    fn test_max_stress_sign_selection() {
        let m = limited();
        let tension =
            ply_failure_index(&m, &state(330e3, 0.0, 0.0), FailureCriterion::MaxStress, FailureKind::Longitudinal)
                .unwrap();
        assert_relative_eq!(tension, 1.0, max_relative = 1e-12);

        let compression =
            ply_failure_index(&m, &state(-250e3, 0.0, 0.0), FailureCriterion::MaxStress, FailureKind::Longitudinal)
                .unwrap();
        assert_relative_eq!(compression, 1.0, max_relative = 1e-12);
    }

    #[test]
    fn test_max_stress_negative_shear_governs() {
        let m = limited();
        let index = ply_failure_index(
            &m,
            &state(0.0, 0.0, -11e3),
            FailureCriterion::MaxStress,
            FailureKind::Any,
        )
        .unwrap();
        assert_relative_eq!(index, 1.0, max_relative = 1e-12);
    }

    #[test]
    fn test_hoffman_continuous_at_sign_change() {
        let m = limited();
        let eps = 1e-3;
        let below = ply_failure_index(
            &m,
            &state(-eps, 5e3, 2e3),
            FailureCriterion::Hoffman,
            FailureKind::Any,
        )
        .unwrap();
        let above = ply_failure_index(
            &m,
            &state(eps, 5e3, 2e3),
            FailureCriterion::Hoffman,
            FailureKind::Any,
        )
        .unwrap();
        assert!((below - above).abs() < 1e-6);
    }

    #[test]
    fn test_indices_monotonic_under_load_scaling() {
        let m = limited();
        for criterion in [FailureCriterion::MaxStress, FailureCriterion::Hoffman] {
            let base = ply_failure_index(
                &m,
                &state(100e3, 3e3, 4e3),
                criterion,
                FailureKind::Any,
            )
            .unwrap();
            let scaled = ply_failure_index(
                &m,
                &state(150e3, 4.5e3, 6e3),
                criterion,
                FailureKind::Any,
            )
            .unwrap();
            assert!(scaled >= base, "{criterion:?}: {scaled} < {base}");
        }
    }

    #[test]
    fn test_unlimited_material_skipped() {
        let core = Material::Plate(
            PlateMaterial::new("core", 10e3, 10e3, 0.3, 5e3, 0.05, 0.25).unwrap(),
        );
        assert!(ply_failure_index(
            &core,
            &state(1.0, 1.0, 1.0),
            FailureCriterion::MaxStress,
            FailureKind::Any
        )
        .is_none());
    }

    #[test]
    fn test_tsai_hill_known_value() {
        let m = limited();
        let s = state(165e3, 4.15e3, 5.5e3);
        let index =
            ply_failure_index(&m, &s, FailureCriterion::TsaiHill, FailureKind::Any).unwrap();
        let expected = (165e3_f64 / 330e3).powi(2) + (4.15e3_f64 / 8.3e3).powi(2)
            + (5.5e3_f64 / 11e3).powi(2)
            - 165e3 * 4.15e3 / (330e3_f64 * 330e3);
        assert_relative_eq!(index, expected, max_relative = 1e-12);
    }
}

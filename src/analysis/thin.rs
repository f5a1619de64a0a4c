//! Thin-plate (classical lamination theory) engine
//!
//! Builds the coupled in-plane/bending ABD system of a ply stack and
//! recovers per-ply stress and strain from applied load resultants. The
//! formulation neglects transverse shear, which holds while the laminate is
//! thin relative to its short transverse span (about 1:10).
//!
//! The through-thickness origin is the geometric mid-surface, negative
//! towards the tool side.

use serde::{Deserialize, Serialize};

use crate::analysis::z_intervals;
use crate::error::{LamError, LamResult};
use crate::failure::{self, FailureCriterion, FailureKind};
use crate::laminate::Laminate;
use crate::math::{rotation_2d, Mat3, Mat6, Vec3, Vec6};
use crate::results::{EffectiveProperties, PlyFailureIndex, PlyState};

/// Mid-surface response and recovered ply states for one applied load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct LoadState {
    resultants: Vec6,
    mid_strains: Vec3,
    curvatures: Vec3,
    ply_states: Vec<PlyState>,
}

/// Classical lamination theory analysis of one laminate.
///
/// Construction builds the ABD system; loads can then be applied repeatedly,
/// each application overwriting the recovered ply states. All derived per-ply
/// data lives here, never on the [`Laminate`] itself, so independent analyses
/// of the same stack cannot alias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThinPlateAnalysis {
    laminate: Laminate,
    total_thickness: f64,
    areal_density: f64,
    /// Rotated in-plane stiffness of each ply in laminate axes
    ply_stiffness: Vec<Mat3>,
    /// Unrotated ply stiffness in material axes, for stress recovery
    ply_local_stiffness: Vec<Mat3>,
    /// Rotated CTE vector of each ply in laminate axes
    ply_cte: Vec<Vec3>,
    a: Mat3,
    b: Mat3,
    d: Mat3,
    abd: Mat6,
    abd_inv: Mat6,
    /// Thermal load resultants per unit temperature
    specific_nt: Vec3,
    load: Option<LoadState>,
}

impl ThinPlateAnalysis {
    /// Build the ABD system for a laminate of plate materials.
    ///
    /// Fails with [`LamError::TypeMismatch`] when the stack contains a
    /// continuum material.
    pub fn new(laminate: &Laminate) -> LamResult<Self> {
        let total_thickness = laminate.total_thickness();
        let areal_density = laminate.areal_density();

        let mut ply_stiffness = Vec::with_capacity(laminate.len());
        let mut ply_local_stiffness = Vec::with_capacity(laminate.len());
        let mut ply_cte = Vec::with_capacity(laminate.len());
        let mut a = Mat3::zeros();
        let mut b = Mat3::zeros();
        let mut d = Mat3::zeros();
        let mut specific_nt = Vec3::zeros();

        let intervals = z_intervals(laminate);
        for (i, (ply, &(z_low, z_up))) in laminate.plies().iter().zip(&intervals).enumerate() {
            let material = ply.material.as_plate().ok_or_else(|| LamError::TypeMismatch {
                ply: i,
                name: ply.material.name().to_string(),
                expected: "thin-plate",
                found: ply.material.variant(),
            })?;

            // Rotated stiffness from the invariants keeps ABD symmetric to
            // machine precision.
            let q = material.invariants().rotated_stiffness(ply.orientation_deg);

            let t = ply.orientation_deg.to_radians();
            let (c, s) = (t.cos(), t.sin());
            let cte = Vec3::new(
                material.a1 * c * c + material.a2 * s * s,
                material.a1 * s * s + material.a2 * c * c,
                (material.a2 - material.a1) * c * s,
            );

            a += q * (z_up - z_low);
            b += q * (z_up * z_up - z_low * z_low) / 2.0;
            d += q * (z_up.powi(3) - z_low.powi(3)) / 3.0;
            specific_nt += q * cte * (z_up - z_low);

            ply_stiffness.push(q);
            ply_local_stiffness.push(*material.stiffness());
            ply_cte.push(cte);
        }

        let mut abd = Mat6::zeros();
        abd.fixed_view_mut::<3, 3>(0, 0).copy_from(&a);
        abd.fixed_view_mut::<3, 3>(0, 3).copy_from(&b);
        abd.fixed_view_mut::<3, 3>(3, 0).copy_from(&b);
        abd.fixed_view_mut::<3, 3>(3, 3).copy_from(&d);

        let abd_inv = abd
            .try_inverse()
            .ok_or(LamError::Singular("inverting the ABD system"))?;

        Ok(Self {
            laminate: laminate.clone(),
            total_thickness,
            areal_density,
            ply_stiffness,
            ply_local_stiffness,
            ply_cte,
            a,
            b,
            d,
            abd,
            abd_inv,
            specific_nt,
            load: None,
        })
    }

    /// The analyzed laminate
    pub fn laminate(&self) -> &Laminate {
        &self.laminate
    }

    /// Total stack thickness
    pub fn total_thickness(&self) -> f64 {
        self.total_thickness
    }

    /// Total areal density
    pub fn areal_density(&self) -> f64 {
        self.areal_density
    }

    /// Membrane stiffness block
    pub fn a_matrix(&self) -> &Mat3 {
        &self.a
    }

    /// Membrane-bending coupling block
    pub fn b_matrix(&self) -> &Mat3 {
        &self.b
    }

    /// Bending stiffness block
    pub fn d_matrix(&self) -> &Mat3 {
        &self.d
    }

    /// The assembled 6x6 ABD system
    pub fn abd(&self) -> &Mat6 {
        &self.abd
    }

    /// Thermal force resultants per unit temperature change
    pub fn specific_thermal_resultants(&self) -> &Vec3 {
        &self.specific_nt
    }

    /// Effective in-plane engineering constants from the membrane block.
    ///
    /// Only exact for symmetric stacks; an asymmetric stack logs a warning
    /// and still returns the approximate values.
    pub fn effective_properties(&self) -> LamResult<EffectiveProperties> {
        if !self.laminate.is_symmetric() {
            log::warn!(
                "laminate is not symmetric; effective properties are approximate (B != 0)"
            );
        }

        let c = self
            .a
            .try_inverse()
            .ok_or(LamError::Singular("inverting the membrane block"))?;
        let t = self.total_thickness;

        let effective_cte = c * self.specific_nt;

        Ok(EffectiveProperties {
            exx: 1.0 / (c[(0, 0)] * t),
            eyy: 1.0 / (c[(1, 1)] * t),
            gxy: 1.0 / (c[(2, 2)] * t),
            nuxy: -c[(0, 1)] / c[(0, 0)],
            etaxs: c[(0, 2)] / c[(0, 0)],
            etays: c[(1, 2)] / c[(1, 1)],
            ax: effective_cte[0],
            ay: effective_cte[1],
            axy: effective_cte[2],
        })
    }

    /// Mid-surface strains and curvatures for a resultant vector, without
    /// touching stored state.
    pub fn mid_state_for(&self, resultants: &Vec6) -> (Vec3, Vec3) {
        let x = self.abd_inv * resultants;
        (x.fixed_rows::<3>(0).into(), x.fixed_rows::<3>(3).into())
    }

    /// Recover every ply's stress/strain state in material axes for a
    /// resultant vector, without touching stored state.
    ///
    /// The z-walk repeats the stiffness-build pass exactly, evaluates the
    /// global strain at each ply mid-plane, halves the engineering shear to
    /// tensor form, rotates into the ply axes and back-computes stress from
    /// the ply's local stiffness.
    pub fn ply_states_for(&self, resultants: &Vec6) -> Vec<PlyState> {
        let (mid_strains, curvatures) = self.mid_state_for(resultants);

        z_intervals(&self.laminate)
            .iter()
            .zip(self.laminate.plies().iter().zip(&self.ply_local_stiffness))
            .map(|(&(z_low, z_up), (ply, q_local))| {
                let z_mid = (z_low + z_up) / 2.0;
                let mut global = mid_strains + curvatures * z_mid;
                global[2] /= 2.0; // gamma to epsilon

                let strain = rotation_2d(ply.orientation_deg) * global;
                let stress = q_local * strain;

                PlyState {
                    stress,
                    strain,
                    z_mid,
                }
            })
            .collect()
    }

    /// Apply force/moment resultants (Nx, Ny, Nxy, Mx, My, Mxy) and store
    /// the recovered mid-surface and ply states.
    ///
    /// Returns the mid-surface strains and curvatures. Fails with
    /// [`LamError::DimensionMismatch`] unless six components are given.
    pub fn apply_resultants(&mut self, resultants: &[f64]) -> LamResult<(Vec3, Vec3)> {
        if resultants.len() != 6 {
            return Err(LamError::DimensionMismatch(resultants.len()));
        }
        let r = Vec6::from_row_slice(resultants);

        let (mid_strains, curvatures) = self.mid_state_for(&r);
        let ply_states = self.ply_states_for(&r);

        self.load = Some(LoadState {
            resultants: r,
            mid_strains,
            curvatures,
            ply_states,
        });
        Ok((mid_strains, curvatures))
    }

    /// Apply mid-surface strains and curvatures instead of resultants,
    /// storing the equivalent load state. Returns the resultants.
    pub fn resultants_from_strains(&mut self, strains_curvatures: &[f64]) -> LamResult<Vec6> {
        if strains_curvatures.len() != 6 {
            return Err(LamError::DimensionMismatch(strains_curvatures.len()));
        }
        let x = Vec6::from_row_slice(strains_curvatures);
        let r = self.abd * x;

        let ply_states = self.ply_states_for(&r);
        self.load = Some(LoadState {
            resultants: r,
            mid_strains: x.fixed_rows::<3>(0).into(),
            curvatures: x.fixed_rows::<3>(3).into(),
            ply_states,
        });
        Ok(r)
    }

    /// Resultants of the stored load state
    pub fn resultants(&self) -> LamResult<&Vec6> {
        self.load
            .as_ref()
            .map(|l| &l.resultants)
            .ok_or(LamError::NotAnalyzed)
    }

    /// Mid-surface strains of the stored load state
    pub fn mid_strains(&self) -> LamResult<&Vec3> {
        self.load
            .as_ref()
            .map(|l| &l.mid_strains)
            .ok_or(LamError::NotAnalyzed)
    }

    /// Mid-surface curvatures of the stored load state
    pub fn curvatures(&self) -> LamResult<&Vec3> {
        self.load
            .as_ref()
            .map(|l| &l.curvatures)
            .ok_or(LamError::NotAnalyzed)
    }

    /// Recovered per-ply states of the stored load state
    pub fn ply_states(&self) -> LamResult<&[PlyState]> {
        self.load
            .as_ref()
            .map(|l| l.ply_states.as_slice())
            .ok_or(LamError::NotAnalyzed)
    }

    /// Failure index of every ply carrying the limits the criterion needs,
    /// under the stored load state.
    pub fn failure_indices(
        &self,
        criterion: FailureCriterion,
        kind: FailureKind,
    ) -> LamResult<Vec<PlyFailureIndex>> {
        let states = self.ply_states()?;
        Ok(failure::failure_indices(
            &self.laminate,
            states,
            criterion,
            kind,
        ))
    }
}

//! Generalized (thick laminate) homogenization engine
//!
//! Builds every ply's full 6x6 stiffness in laminate axes and condenses the
//! stack into an equivalent anisotropic continuum by thickness-weighted
//! static condensation of the out-of-plane block. Useful where out-of-plane
//! terms matter, e.g. feeding solid elements.

use serde::{Deserialize, Serialize};

use crate::error::{LamError, LamResult};
use crate::laminate::Laminate;
use crate::math::{inplane_permutation, rotation_3d, Mat3, Mat6};
use crate::results::EngineeringConstants;

/// Thickness-weighted accumulators of the four condensation blocks.
///
/// With H partitioned into in-plane (I) and out-of-plane (S) 3x3 blocks,
/// each ply contributes its weighted share of the combinations needed to
/// reassemble the homogenized stiffness.
#[derive(Debug, Clone, Copy)]
struct CondensationSums {
    /// sum of w * H_SS^-1
    ss_inv: Mat3,
    /// sum of w * H_SS^-1 * H_SI
    ss_inv_si: Mat3,
    /// sum of w * H_IS * H_SS^-1
    is_ss_inv: Mat3,
    /// sum of w * (H_II - H_IS * H_SS^-1 * H_SI)
    condensed_ii: Mat3,
}

impl CondensationSums {
    fn zeros() -> Self {
        Self {
            ss_inv: Mat3::zeros(),
            ss_inv_si: Mat3::zeros(),
            is_ss_inv: Mat3::zeros(),
            condensed_ii: Mat3::zeros(),
        }
    }

    fn accumulate(&mut self, h: &Mat6, weight: f64) -> LamResult<()> {
        let h_ii: Mat3 = h.fixed_view::<3, 3>(0, 0).into();
        let h_is: Mat3 = h.fixed_view::<3, 3>(0, 3).into();
        let h_si: Mat3 = h.fixed_view::<3, 3>(3, 0).into();
        let h_ss: Mat3 = h.fixed_view::<3, 3>(3, 3).into();
        let h_ss_inv = h_ss
            .try_inverse()
            .ok_or(LamError::Singular("inverting the out-of-plane block"))?;

        self.ss_inv += h_ss_inv * weight;
        self.ss_inv_si += h_ss_inv * h_si * weight;
        self.is_ss_inv += h_is * h_ss_inv * weight;
        self.condensed_ii += (h_ii - h_is * h_ss_inv * h_si) * weight;
        Ok(())
    }

    /// Reassemble the homogenized stiffness in permuted component order
    fn reassemble(&self) -> LamResult<Mat6> {
        let ss = self
            .ss_inv
            .try_inverse()
            .ok_or(LamError::Singular("reassembling the condensed stiffness"))?;

        let mut k = Mat6::zeros();
        k.fixed_view_mut::<3, 3>(0, 0)
            .copy_from(&(self.condensed_ii + self.is_ss_inv * ss * self.ss_inv_si));
        k.fixed_view_mut::<3, 3>(0, 3)
            .copy_from(&(self.is_ss_inv * ss));
        k.fixed_view_mut::<3, 3>(3, 0)
            .copy_from(&(ss * self.ss_inv_si));
        k.fixed_view_mut::<3, 3>(3, 3).copy_from(&ss);
        Ok(k)
    }
}

/// Permuted 6x6 stiffness of one ply in laminate axes.
///
/// Transforms the material compliance into laminate axes, inverts, and
/// reorders components so the in-plane terms come first.
fn ply_permuted_stiffness(
    compliance: &Mat6,
    orientation_deg: f64,
    ply: usize,
) -> LamResult<Mat6> {
    let p = inplane_permutation();
    let t = rotation_3d(orientation_deg);
    let t_inv = t
        .try_inverse()
        .ok_or(LamError::Singular("inverting the ply transform"))?;

    let s_global = t_inv * compliance * t;
    let stiffness_global = s_global.try_inverse().ok_or_else(|| {
        log::error!("ply {ply}: global compliance is singular");
        LamError::Singular("inverting the ply global compliance")
    })?;
    Ok(p * stiffness_global * p)
}

/// Homogenized 3D analysis of a thick laminate.
///
/// Construction computes the equivalent global stiffness/compliance pair and
/// the full set of engineering constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinuumAnalysis {
    laminate: Laminate,
    total_thickness: f64,
    areal_density: f64,
    stiffness: Mat6,
    compliance: Mat6,
    constants: EngineeringConstants,
}

impl ContinuumAnalysis {
    /// Homogenize a laminate of continuum materials.
    ///
    /// Fails with [`LamError::TypeMismatch`] when the stack contains a plate
    /// material.
    pub fn new(laminate: &Laminate) -> LamResult<Self> {
        let total_thickness = laminate.total_thickness();
        let areal_density = laminate.areal_density();

        let mut sums = CondensationSums::zeros();
        for (i, ply) in laminate.plies().iter().enumerate() {
            let material = ply
                .material
                .as_continuum()
                .ok_or_else(|| LamError::TypeMismatch {
                    ply: i,
                    name: ply.material.name().to_string(),
                    expected: "continuum",
                    found: ply.material.variant(),
                })?;

            let h = ply_permuted_stiffness(material.compliance(), ply.orientation_deg, i)?;
            sums.accumulate(&h, ply.thickness / total_thickness)?;
        }

        let p = inplane_permutation();
        let k_permuted = sums.reassemble()?;
        let compliance_permuted = k_permuted
            .try_inverse()
            .ok_or(LamError::Singular("inverting the homogenized stiffness"))?;

        let stiffness = p * k_permuted * p;
        let compliance = p * compliance_permuted * p;
        let constants = engineering_constants(&compliance);

        Ok(Self {
            laminate: laminate.clone(),
            total_thickness,
            areal_density,
            stiffness,
            compliance,
            constants,
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

    /// Homogenized 6x6 stiffness in laminate axes, component order
    /// (11, 22, 33, 23, 13, 12)
    pub fn stiffness(&self) -> &Mat6 {
        &self.stiffness
    }

    /// Homogenized 6x6 compliance in laminate axes
    pub fn compliance(&self) -> &Mat6 {
        &self.compliance
    }

    /// Engineering constants extracted from the homogenized compliance
    pub fn constants(&self) -> &EngineeringConstants {
        &self.constants
    }
}

/// Engineering constants from a 6x6 tensor-shear compliance
fn engineering_constants(s: &Mat6) -> EngineeringConstants {
    EngineeringConstants {
        exx: 1.0 / s[(0, 0)],
        eyy: 1.0 / s[(1, 1)],
        ezz: 1.0 / s[(2, 2)],
        gyz: 1.0 / (2.0 * s[(3, 3)]),
        gxz: 1.0 / (2.0 * s[(4, 4)]),
        gxy: 1.0 / (2.0 * s[(5, 5)]),
        nuxy: -s[(1, 0)] / s[(0, 0)],
        nuxz: -s[(0, 2)] / s[(0, 0)],
        nuyz: -s[(1, 2)] / s[(1, 1)],
        etaxs: s[(0, 5)] / s[(0, 0)],
        etays: s[(1, 5)] / s[(1, 1)],
        etazs: s[(2, 5)] / s[(2, 2)],
        etart: s[(3, 4)] / (2.0 * s[(4, 4)]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::laminate::Ply;
    use crate::material::{ContinuumMaterial, Material};
    use approx::assert_relative_eq;

    fn glass() -> ContinuumMaterial {
        ContinuumMaterial::new(
            "Glass Uni",
            41e9,
            10.4e9,
            10.4e9,
            0.28,
            0.28,
            0.50,
            4.3e9,
            4.3e9,
            3.5e9,
            1970.0,
            0.25e-3,
        )
        .unwrap()
    }

    #[test]
    fn test_single_ply_constants_match_material() {
        let lam =
            Laminate::new(vec![Ply::new(Material::Continuum(glass()), 0.0)], 1, false).unwrap();
        let analysis = ContinuumAnalysis::new(&lam).unwrap();
        let c = analysis.constants();
        assert_relative_eq!(c.exx, 41e9, max_relative = 0.01);
        assert_relative_eq!(c.eyy, 10.4e9, max_relative = 0.01);
        assert_relative_eq!(c.ezz, 10.4e9, max_relative = 0.01);
        assert_relative_eq!(c.gxy, 4.3e9, max_relative = 0.01);
        assert_relative_eq!(c.gyz, 3.5e9, max_relative = 0.01);
        assert_relative_eq!(c.nuxy, 0.28, max_relative = 0.01);
    }

    #[test]
    fn test_single_ply_rotated_90_swaps_moduli() {
        let lam =
            Laminate::new(vec![Ply::new(Material::Continuum(glass()), 90.0)], 1, false).unwrap();
        let analysis = ContinuumAnalysis::new(&lam).unwrap();
        let c = analysis.constants();
        assert_relative_eq!(c.exx, 10.4e9, max_relative = 0.01);
        assert_relative_eq!(c.eyy, 41e9, max_relative = 0.01);
    }

    #[test]
    fn test_partition_inversion_round_trip() {
        // For a uniform-orientation stack the condensation must reproduce the
        // ply stiffness exactly: reassembled blocks == direct assembly.
        let lam =
            Laminate::new(vec![Ply::new(Material::Continuum(glass()), 30.0)], 4, false).unwrap();
        let analysis = ContinuumAnalysis::new(&lam).unwrap();

        let direct = {
            let p = inplane_permutation();
            let h = ply_permuted_stiffness(glass().compliance(), 30.0, 0).unwrap();
            p * h * p
        };
        assert_relative_eq!(*analysis.stiffness(), direct, max_relative = 1e-9);
    }

    #[test]
    fn test_stiffness_compliance_inverse_pair() {
        let plies = vec![
            Ply::new(Material::Continuum(glass()), 0.0),
            Ply::new(Material::Continuum(glass()), 45.0),
            Ply::new(Material::Continuum(glass()), 90.0),
        ];
        let lam = Laminate::new(plies, 1, true).unwrap();
        let analysis = ContinuumAnalysis::new(&lam).unwrap();
        let product = analysis.stiffness() * analysis.compliance();
        assert_relative_eq!(product, Mat6::identity(), epsilon = 1e-9);
    }

    #[test]
    fn test_plate_material_rejected() {
        use crate::material::PlateMaterial;
        let m = PlateMaterial::new("thin", 21.3e6, 1.5e6, 0.27, 1.0e6, 1.0, 0.01).unwrap();
        let lam = Laminate::new(vec![Ply::new(Material::Plate(m), 0.0)], 1, false).unwrap();
        let err = ContinuumAnalysis::new(&lam).unwrap_err();
        assert!(matches!(err, LamError::TypeMismatch { .. }));
    }
}

//! Ply material models
//!
//! Two material variants exist: [`PlateMaterial`] carries the four in-plane
//! constants used by classical lamination theory, and [`ContinuumMaterial`]
//! carries the full orthotropic set including out-of-plane terms. The variant
//! decides which stiffness engine may consume the material; mixing them is a
//! [`TypeMismatch`](crate::error::LamError::TypeMismatch).

use serde::{Deserialize, Serialize};

use crate::error::{LamError, LamResult};
use crate::math::{Mat3, Mat6};

/// Ply stress limits in material axes.
///
/// Tensile and shear limits are positive, compressive limits negative. The
/// sign convention lets the sign-selected criteria divide by the limit
/// directly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StressLimits {
    /// Longitudinal tensile limit (> 0)
    pub f1t: f64,
    /// Longitudinal compressive limit (< 0)
    pub f1c: f64,
    /// Transverse tensile limit (> 0)
    pub f2t: f64,
    /// Transverse compressive limit (< 0)
    pub f2c: f64,
    /// In-plane shear limit (> 0)
    pub f12s: f64,
}

impl StressLimits {
    /// Create validated stress limits
    pub fn new(f1t: f64, f1c: f64, f2t: f64, f2c: f64, f12s: f64) -> LamResult<Self> {
        let ok = f1t > 0.0
            && f2t > 0.0
            && f12s > 0.0
            && f1c < 0.0
            && f2c < 0.0
            && [f1t, f1c, f2t, f2c, f12s].iter().all(|v| v.is_finite());
        if ok {
            Ok(Self {
                f1t,
                f1c,
                f2t,
                f2c,
                f12s,
            })
        } else {
            Err(LamError::InvalidMaterial {
                name: "stress limits".to_string(),
                reason: "tensile and shear limits must be positive, compressive limits negative"
                    .to_string(),
            })
        }
    }
}

/// Ply strain limits in material axes, same sign convention as
/// [`StressLimits`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrainLimits {
    pub e1t: f64,
    pub e1c: f64,
    pub e2t: f64,
    pub e2c: f64,
    pub e12s: f64,
}

impl StrainLimits {
    /// Create validated strain limits
    pub fn new(e1t: f64, e1c: f64, e2t: f64, e2c: f64, e12s: f64) -> LamResult<Self> {
        let ok = e1t > 0.0
            && e2t > 0.0
            && e12s > 0.0
            && e1c < 0.0
            && e2c < 0.0
            && [e1t, e1c, e2t, e2c, e12s].iter().all(|v| v.is_finite());
        if ok {
            Ok(Self {
                e1t,
                e1c,
                e2t,
                e2c,
                e12s,
            })
        } else {
            Err(LamError::InvalidMaterial {
                name: "strain limits".to_string(),
                reason: "tensile and shear limits must be positive, compressive limits negative"
                    .to_string(),
            })
        }
    }
}

/// The five rotation invariants of a plate material stiffness.
///
/// These let the thin-plate engine evaluate the rotated stiffness at any
/// angle with trigonometric identities instead of repeated matrix rotation,
/// which also keeps the accumulated ABD matrix exactly symmetric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Invariants {
    pub u1: f64,
    pub u2: f64,
    pub u3: f64,
    pub u4: f64,
    pub u5: f64,
}

impl Invariants {
    /// Derive the invariants from an in-plane stiffness matrix
    pub fn from_stiffness(q: &Mat3) -> Self {
        let (q11, q22, q12, q66) = (q[(0, 0)], q[(1, 1)], q[(0, 1)], q[(2, 2)]);
        Self {
            u1: (q11 + q22) * 3.0 / 8.0 + q12 / 4.0 + q66 / 2.0,
            u2: (q11 - q22) / 2.0,
            u3: (q11 + q22) / 8.0 - q12 / 4.0 - q66 / 2.0,
            u4: (q11 + q22) / 8.0 + q12 * 3.0 / 4.0 - q66 / 2.0,
            u5: (q11 + q22) / 8.0 - q12 / 4.0 + q66 / 2.0,
        }
    }

    /// Rotated in-plane stiffness at a ply orientation
    pub fn rotated_stiffness(&self, orientation_deg: f64) -> Mat3 {
        let t = orientation_deg.to_radians();
        let c2 = (2.0 * t).cos();
        let c4 = (4.0 * t).cos();
        let s2 = (2.0 * t).sin();
        let s4 = (4.0 * t).sin();

        let q11 = self.u1 + self.u2 * c2 + self.u3 * c4;
        let q22 = self.u1 - self.u2 * c2 + self.u3 * c4;
        let q12 = self.u4 - self.u3 * c4;
        let q66 = self.u5 - self.u3 * c4;
        let q16 = self.u2 * s2 / 2.0 + self.u3 * s4;
        let q26 = self.u2 * s2 / 2.0 - self.u3 * s4;

        #[rustfmt::skip]
        let q = Mat3::new(
            q11, q12, q16,
            q12, q22, q26,
            q16, q26, q66,
        );
        q
    }
}

fn check_positive(name: &str, what: &str, value: f64) -> LamResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(LamError::InvalidMaterial {
            name: name.to_string(),
            reason: format!("{what} must be strictly positive and finite, got {value}"),
        })
    }
}

fn check_finite(name: &str, what: &str, value: f64) -> LamResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(LamError::InvalidMaterial {
            name: name.to_string(),
            reason: format!("{what} must be finite, got {value}"),
        })
    }
}

/// A 2D plate material for classical lamination theory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlateMaterial {
    /// Material name
    pub name: String,
    /// Longitudinal modulus
    pub e11: f64,
    /// Transverse modulus
    pub e22: f64,
    /// Major Poisson ratio
    pub nu12: f64,
    /// In-plane shear modulus
    pub g12: f64,
    /// Longitudinal CTE
    pub a1: f64,
    /// Transverse CTE
    pub a2: f64,
    /// Density (mass per volume)
    pub density: f64,
    /// Cured ply thickness, the default ply thickness
    pub cpt: f64,
    /// Stress limits, absent for core-type materials
    pub stress_limits: Option<StressLimits>,
    /// Strain limits for the max-strain criterion
    pub strain_limits: Option<StrainLimits>,

    compliance: Mat3,
    stiffness: Mat3,
    invariants: Invariants,
}

impl PlateMaterial {
    /// Create a validated plate material. CTE terms default to zero and can
    /// be set with [`with_cte`](Self::with_cte).
    pub fn new(
        name: &str,
        e11: f64,
        e22: f64,
        nu12: f64,
        g12: f64,
        density: f64,
        cpt: f64,
    ) -> LamResult<Self> {
        check_positive(name, "E11", e11)?;
        check_positive(name, "E22", e22)?;
        check_positive(name, "G12", g12)?;
        check_positive(name, "CPT", cpt)?;
        check_finite(name, "Nu12", nu12)?;
        check_finite(name, "density", density)?;

        let s11 = 1.0 / e11;
        let s12 = -nu12 / e11;
        let s22 = 1.0 / e22;
        let s66 = 1.0 / g12;

        #[rustfmt::skip]
        let compliance = Mat3::new(
            s11, s12, 0.0,
            s12, s22, 0.0,
            0.0, 0.0, s66,
        );

        let stiffness = compliance
            .try_inverse()
            .ok_or(LamError::Singular("inverting plate compliance"))?;
        let invariants = Invariants::from_stiffness(&stiffness);

        Ok(Self {
            name: name.to_string(),
            e11,
            e22,
            nu12,
            g12,
            a1: 0.0,
            a2: 0.0,
            density,
            cpt,
            stress_limits: None,
            strain_limits: None,
            compliance,
            stiffness,
            invariants,
        })
    }

    /// Set the ply CTE terms
    pub fn with_cte(mut self, a1: f64, a2: f64) -> Self {
        self.a1 = a1;
        self.a2 = a2;
        self
    }

    /// Attach stress limits
    pub fn with_stress_limits(mut self, limits: StressLimits) -> Self {
        self.stress_limits = Some(limits);
        self
    }

    /// Attach strain limits
    pub fn with_strain_limits(mut self, limits: StrainLimits) -> Self {
        self.strain_limits = Some(limits);
        self
    }

    /// In-plane compliance in material axes
    pub fn compliance(&self) -> &Mat3 {
        &self.compliance
    }

    /// In-plane stiffness in material axes
    pub fn stiffness(&self) -> &Mat3 {
        &self.stiffness
    }

    /// The five rotation invariants
    pub fn invariants(&self) -> &Invariants {
        &self.invariants
    }
}

/// A 3D continuum material with out-of-plane properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinuumMaterial {
    /// Material name
    pub name: String,
    pub e11: f64,
    pub e22: f64,
    pub e33: f64,
    pub nu12: f64,
    pub nu13: f64,
    pub nu23: f64,
    pub g12: f64,
    pub g13: f64,
    pub g23: f64,
    /// Density (mass per volume)
    pub density: f64,
    /// Cured ply thickness, the default ply thickness
    pub cpt: f64,
    /// Stress limits, absent for core-type materials
    pub stress_limits: Option<StressLimits>,
    /// Strain limits for the max-strain criterion
    pub strain_limits: Option<StrainLimits>,

    compliance: Mat6,
}

impl ContinuumMaterial {
    /// Create a validated continuum material
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: &str,
        e11: f64,
        e22: f64,
        e33: f64,
        nu12: f64,
        nu13: f64,
        nu23: f64,
        g12: f64,
        g13: f64,
        g23: f64,
        density: f64,
        cpt: f64,
    ) -> LamResult<Self> {
        check_positive(name, "E11", e11)?;
        check_positive(name, "E22", e22)?;
        check_positive(name, "E33", e33)?;
        check_positive(name, "G12", g12)?;
        check_positive(name, "G13", g13)?;
        check_positive(name, "G23", g23)?;
        check_positive(name, "CPT", cpt)?;
        check_finite(name, "Nu12", nu12)?;
        check_finite(name, "Nu13", nu13)?;
        check_finite(name, "Nu23", nu23)?;
        check_finite(name, "density", density)?;

        // Orthotropic compliance in tensor-shear form, component order
        // (11, 22, 33, 23, 13, 12). The shear diagonal carries the factor
        // of two from the tensor convention.
        let s12 = -nu12 / e11;
        let s13 = -nu13 / e11;
        let s23 = -nu23 / e22;

        #[rustfmt::skip]
        let compliance = Mat6::new(
            1.0 / e11, s12,       s13,       0.0,             0.0,             0.0,
            s12,       1.0 / e22, s23,       0.0,             0.0,             0.0,
            s13,       s23,       1.0 / e33, 0.0,             0.0,             0.0,
            0.0,       0.0,       0.0,       1.0 / (2.0 * g23), 0.0,           0.0,
            0.0,       0.0,       0.0,       0.0,             1.0 / (2.0 * g13), 0.0,
            0.0,       0.0,       0.0,       0.0,             0.0,             1.0 / (2.0 * g12),
        );

        Ok(Self {
            name: name.to_string(),
            e11,
            e22,
            e33,
            nu12,
            nu13,
            nu23,
            g12,
            g13,
            g23,
            density,
            cpt,
            stress_limits: None,
            strain_limits: None,
            compliance,
        })
    }

    /// Attach stress limits
    pub fn with_stress_limits(mut self, limits: StressLimits) -> Self {
        self.stress_limits = Some(limits);
        self
    }

    /// Attach strain limits
    pub fn with_strain_limits(mut self, limits: StrainLimits) -> Self {
        self.strain_limits = Some(limits);
        self
    }

    /// 6x6 compliance in material axes
    pub fn compliance(&self) -> &Mat6 {
        &self.compliance
    }
}

/// A ply material, either plate (2D) or continuum (3D)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Material {
    Plate(PlateMaterial),
    Continuum(ContinuumMaterial),
}

impl Material {
    /// Material name
    pub fn name(&self) -> &str {
        match self {
            Material::Plate(m) => &m.name,
            Material::Continuum(m) => &m.name,
        }
    }

    /// Variant name for diagnostics
    pub fn variant(&self) -> &'static str {
        match self {
            Material::Plate(_) => "plate",
            Material::Continuum(_) => "continuum",
        }
    }

    /// Density (mass per volume)
    pub fn density(&self) -> f64 {
        match self {
            Material::Plate(m) => m.density,
            Material::Continuum(m) => m.density,
        }
    }

    /// Cured ply thickness
    pub fn cpt(&self) -> f64 {
        match self {
            Material::Plate(m) => m.cpt,
            Material::Continuum(m) => m.cpt,
        }
    }

    /// Stress limits if the material carries them
    pub fn stress_limits(&self) -> Option<&StressLimits> {
        match self {
            Material::Plate(m) => m.stress_limits.as_ref(),
            Material::Continuum(m) => m.stress_limits.as_ref(),
        }
    }

    /// Strain limits if the material carries them
    pub fn strain_limits(&self) -> Option<&StrainLimits> {
        match self {
            Material::Plate(m) => m.strain_limits.as_ref(),
            Material::Continuum(m) => m.strain_limits.as_ref(),
        }
    }

    /// The plate variant, if this is one
    pub fn as_plate(&self) -> Option<&PlateMaterial> {
        match self {
            Material::Plate(m) => Some(m),
            Material::Continuum(_) => None,
        }
    }

    /// The continuum variant, if this is one
    pub fn as_continuum(&self) -> Option<&ContinuumMaterial> {
        match self {
            Material::Continuum(m) => Some(m),
            Material::Plate(_) => None,
        }
    }
}

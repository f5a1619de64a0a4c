//! Result types for laminate analysis

use serde::{Deserialize, Serialize};

use crate::math::Vec3;

/// Recovered stress and strain state of one ply in its material axes.
///
/// Strain is in tensor form (the shear component is epsilon-12, not
/// gamma-12). Overwritten each time a new load is applied to the owning
/// analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlyState {
    /// Stress (sigma-1, sigma-2, sigma-12)
    pub stress: Vec3,
    /// Tensor strain (eps-1, eps-2, eps-12)
    pub strain: Vec3,
    /// Through-thickness ordinate of the ply mid-plane
    pub z_mid: f64,
}

/// Failure index of one ply under the current load
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlyFailureIndex {
    /// Ply position in the stack, tool side first
    pub ply: usize,
    /// Scalar criterion value; >= 1 denotes predicted failure
    pub index: f64,
}

/// Effective in-plane engineering constants of a thin laminate.
///
/// Derived from the membrane (A) block alone, so the values are only exact
/// for symmetric stacks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectiveProperties {
    /// Effective modulus along the stack x-axis
    pub exx: f64,
    /// Effective modulus along the stack y-axis
    pub eyy: f64,
    /// Effective in-plane shear modulus
    pub gxy: f64,
    /// Effective major Poisson ratio
    pub nuxy: f64,
    /// Extension-shear coupling ratio, x-direction
    pub etaxs: f64,
    /// Extension-shear coupling ratio, y-direction
    pub etays: f64,
    /// Effective CTE along x
    pub ax: f64,
    /// Effective CTE along y
    pub ay: f64,
    /// Effective shear CTE
    pub axy: f64,
}

/// Full anisotropic engineering constants of a homogenized thick laminate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineeringConstants {
    pub exx: f64,
    pub eyy: f64,
    pub ezz: f64,
    pub gyz: f64,
    pub gxz: f64,
    pub gxy: f64,
    pub nuxy: f64,
    pub nuxz: f64,
    pub nuyz: f64,
    /// Extension-shear coupling, x normal to in-plane shear
    pub etaxs: f64,
    /// Extension-shear coupling, y normal to in-plane shear
    pub etays: f64,
    /// Extension-shear coupling, z normal to in-plane shear
    pub etazs: f64,
    /// Coupling between the two transverse shears
    pub etart: f64,
}

//! Plies and ply stacks

use serde::{Deserialize, Serialize};

use crate::error::{LamError, LamResult};
use crate::material::Material;

/// A single layer of a laminate.
///
/// Orientation is measured in degrees between the ply 1-direction and the
/// logical stack x-axis. A ply is immutable once built; everything an engine
/// derives for it (transforms, recovered stress and strain) is owned by the
/// analysis object, so replicated and mirrored plies never alias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ply {
    /// Ply material
    pub material: Material,
    /// Fiber orientation in degrees from the stack x-axis
    pub orientation_deg: f64,
    /// Ply thickness
    pub thickness: f64,
}

impl Ply {
    /// Create a ply at the material's cured ply thickness
    pub fn new(material: Material, orientation_deg: f64) -> Self {
        let thickness = material.cpt();
        Self {
            material,
            orientation_deg,
            thickness,
        }
    }

    /// Override the ply thickness
    pub fn with_thickness(mut self, thickness: f64) -> Self {
        self.thickness = thickness;
        self
    }
}

/// An ordered stack of plies.
///
/// The order is physical deposition order starting from the tool surface.
/// Symmetry is a stored flag set at build time; downstream code trusts it
/// when deciding whether effective-property shortcuts apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Laminate {
    plies: Vec<Ply>,
    symmetric: bool,
    n_count: usize,
}

impl Laminate {
    /// Build a stack from a base ply list.
    ///
    /// The list is replicated `n_count` times in order, then, when
    /// `symmetric` is set, the reverse of the replicated list is appended to
    /// form a mid-plane symmetric stack.
    pub fn new(plies: Vec<Ply>, n_count: usize, symmetric: bool) -> LamResult<Self> {
        if plies.is_empty() {
            return Err(LamError::InvalidStack("ply list is empty".to_string()));
        }
        if n_count == 0 {
            return Err(LamError::InvalidStack(
                "repetition count must be at least 1".to_string(),
            ));
        }

        let mut stack = Vec::with_capacity(plies.len() * n_count * if symmetric { 2 } else { 1 });
        for _ in 0..n_count {
            stack.extend(plies.iter().cloned());
        }
        if symmetric {
            let mirrored: Vec<Ply> = stack.iter().rev().cloned().collect();
            stack.extend(mirrored);
        }

        Ok(Self {
            plies: stack,
            symmetric,
            n_count,
        })
    }

    /// The plies in tool-to-surface order
    pub fn plies(&self) -> &[Ply] {
        &self.plies
    }

    /// Number of physical plies
    pub fn len(&self) -> usize {
        self.plies.len()
    }

    /// True when the stack has no plies (never the case for a built laminate)
    pub fn is_empty(&self) -> bool {
        self.plies.is_empty()
    }

    /// Whether the stack was built mid-plane symmetric
    pub fn is_symmetric(&self) -> bool {
        self.symmetric
    }

    /// Repetition count the stack was built with
    pub fn n_count(&self) -> usize {
        self.n_count
    }

    /// Total stack thickness
    pub fn total_thickness(&self) -> f64 {
        self.plies.iter().map(|p| p.thickness).sum()
    }

    /// Total areal density (mass per area)
    pub fn areal_density(&self) -> f64 {
        self.plies
            .iter()
            .map(|p| p.material.density() * p.thickness)
            .sum()
    }
}

//! Laminate Solver - composite laminate mechanics in Rust
//!
//! This library computes the effective mechanical behavior of laminated
//! composite materials from ply properties and locates failure under
//! combined in-plane and bending loads:
//! - Plate (2D) and continuum (3D) orthotropic ply materials
//! - Stack building with repetition counts and mid-plane symmetry
//! - Classical lamination theory (ABD system, effective constants, thermal
//!   resultants)
//! - 3D homogenization of thick stacks by partitioned static condensation
//! - Per-ply stress/strain recovery and multi-axial failure criteria
//!   (max stress, max strain, Tsai-Hill, Hoffman)
//! - Failure-envelope tracing in load-multiplier space
//!
//! ## Example
//! ```rust
//! use laminate_solver::prelude::*;
//!
//! // Define a unidirectional ply material with strength limits
//! let uni = PlateMaterial::new("uni", 21.3e6, 1.5e6, 0.27, 1.0e6, 1.0, 0.01)
//!     .unwrap()
//!     .with_stress_limits(StressLimits::new(330e3, -250e3, 8.3e3, -33e3, 11e3).unwrap());
//!
//! // Build a [0/30/-30/90]s stack
//! let plies = vec![
//!     Ply::new(Material::Plate(uni.clone()), 0.0),
//!     Ply::new(Material::Plate(uni.clone()), 30.0),
//!     Ply::new(Material::Plate(uni.clone()), -30.0),
//!     Ply::new(Material::Plate(uni), 90.0),
//! ];
//! let laminate = Laminate::new(plies, 1, true).unwrap();
//!
//! // Analyze and apply force/moment resultants
//! let mut analysis = ThinPlateAnalysis::new(&laminate).unwrap();
//! let props = analysis.effective_properties().unwrap();
//! assert!(props.exx > props.eyy);
//!
//! analysis
//!     .apply_resultants(&[1000.0, 0.0, 0.0, 0.0, 0.0, 0.0])
//!     .unwrap();
//! let indices = analysis
//!     .failure_indices(FailureCriterion::Hoffman, FailureKind::Any)
//!     .unwrap();
//! assert_eq!(indices.len(), laminate.len());
//! ```

pub mod analysis;
pub mod envelope;
pub mod error;
pub mod failure;
pub mod laminate;
pub mod material;
pub mod math;
pub mod results;

// Re-export common types
pub mod prelude {
    pub use crate::analysis::{ContinuumAnalysis, ThinPlateAnalysis};
    pub use crate::envelope::{trace_envelope, Envelope, EnvelopeOptions};
    pub use crate::error::{LamError, LamResult, RootError};
    pub use crate::failure::{FailureCriterion, FailureKind};
    pub use crate::laminate::{Laminate, Ply};
    pub use crate::material::{
        ContinuumMaterial, Material, PlateMaterial, StrainLimits, StressLimits,
    };
    pub use crate::results::{
        EffectiveProperties, EngineeringConstants, PlyFailureIndex, PlyState,
    };
}

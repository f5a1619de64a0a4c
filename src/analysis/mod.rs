//! Laminate stiffness engines
//!
//! Two engines consume a [`Laminate`](crate::laminate::Laminate): the
//! thin-plate engine ([`thin::ThinPlateAnalysis`]) builds the coupled ABD
//! system of classical lamination theory, and the generalized engine
//! ([`continuum::ContinuumAnalysis`]) homogenizes the full 3D stiffness of a
//! thick stack.

pub mod continuum;
pub mod thin;

pub use continuum::ContinuumAnalysis;
pub use thin::ThinPlateAnalysis;

use crate::laminate::Laminate;

/// Through-thickness interval of every ply, tool side first.
///
/// The z-origin sits at the geometric mid-surface, so the first interval
/// starts at minus half the total thickness. Both the ABD build and the
/// ply-state recovery walk the stack through this one function so the two
/// passes can never disagree on ply bounds.
pub(crate) fn z_intervals(laminate: &Laminate) -> Vec<(f64, f64)> {
    let mut z_low = -laminate.total_thickness() / 2.0;
    laminate
        .plies()
        .iter()
        .map(|ply| {
            let z_up = z_low + ply.thickness;
            let interval = (z_low, z_up);
            z_low = z_up;
            interval
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::laminate::Ply;
    use crate::material::{Material, PlateMaterial};

    #[test]
    fn test_z_intervals_span_thickness() {
        let uni = Material::Plate(
            PlateMaterial::new("uni", 21.3e6, 1.5e6, 0.27, 1.0e6, 1.0, 0.01).unwrap(),
        );
        let lam = Laminate::new(vec![Ply::new(uni, 0.0)], 4, false).unwrap();
        let z = z_intervals(&lam);
        assert_eq!(z.len(), 4);
        assert!((z[0].0 + 0.02).abs() < 1e-12);
        assert!((z[3].1 - 0.02).abs() < 1e-12);
        for w in z.windows(2) {
            assert!((w[0].1 - w[1].0).abs() < 1e-12);
        }
    }
}

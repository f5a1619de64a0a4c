//! Mathematical utilities for laminate calculations

use nalgebra::{Matrix3, Matrix6, Vector3, Vector6};

use crate::error::RootError;

pub type Mat3 = Matrix3<f64>;
pub type Mat6 = Matrix6<f64>;
pub type Vec3 = Vector3<f64>;
pub type Vec6 = Vector6<f64>;

/// In-plane strain/stress rotation matrix for a ply orientation.
///
/// Rotates tensor components (11, 22, 12) from laminate axes into the ply
/// material axes. The shear component must be in tensor form (epsilon, not
/// gamma) before this is applied.
pub fn rotation_2d(orientation_deg: f64) -> Mat3 {
    let t = orientation_deg.to_radians();
    let m = t.cos();
    let n = t.sin();

    #[rustfmt::skip]
    let r = Mat3::new(
         m * m,   n * n,    2.0 * m * n,
         n * n,   m * m,   -2.0 * m * n,
        -m * n,   m * n,    m * m - n * n,
    );
    r
}

/// 6x6 transform for a ply rotated about the laminate thickness axis.
///
/// The ply 3-direction is assumed parallel to the global z-axis, which
/// collapses the general transform to a plane rotation embedded in 3D.
/// Component order is (11, 22, 33, 23, 13, 12).
pub fn rotation_3d(orientation_deg: f64) -> Mat6 {
    let t = orientation_deg.to_radians();
    let m1 = t.cos();
    let m2 = -t.sin();
    let n1 = t.sin();
    let n2 = t.cos();

    #[rustfmt::skip]
    let r = Mat6::new(
        m1 * m1, n1 * n1, 0.0, 0.0, 0.0, 2.0 * n1 * m1,
        m2 * m2, n2 * n2, 0.0, 0.0, 0.0, 2.0 * n2 * m2,
        0.0,     0.0,     1.0, 0.0, 0.0, 0.0,
        0.0,     0.0,     0.0, n2,  m2,  0.0,
        0.0,     0.0,     0.0, n1,  m1,  0.0,
        m2 * m1, n2 * n1, 0.0, 0.0, 0.0, n1 * m2 + n2 * m1,
    );
    r
}

/// Permutation that groups the in-plane components (11, 22, 12) ahead of the
/// out-of-plane components (23, 13, 33).
///
/// The reordering only swaps components 3 and 6, so the matrix is its own
/// inverse.
pub fn inplane_permutation() -> Mat6 {
    #[rustfmt::skip]
    let p = Mat6::new(
        1.0, 0.0, 0.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0, 0.0, 0.0,
        0.0, 0.0, 0.0, 0.0, 0.0, 1.0,
        0.0, 0.0, 0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 0.0, 0.0, 1.0, 0.0,
        0.0, 0.0, 1.0, 0.0, 0.0, 0.0,
    );
    p
}

/// Find a root of `f` inside a bracket by bisection.
///
/// The endpoints may be given in either order. Fails with
/// [`RootError::NoBracket`] when `f` has the same sign at both endpoints and
/// with [`RootError::MaxIterations`] when the interval does not shrink below
/// `tol` within the iteration bound.
pub fn bisect_root<F>(f: F, a: f64, b: f64, tol: f64, max_iter: usize) -> Result<f64, RootError>
where
    F: Fn(f64) -> f64,
{
    let (mut lo, mut hi) = if a <= b { (a, b) } else { (b, a) };
    let mut f_lo = f(lo);
    let f_hi = f(hi);

    if f_lo == 0.0 {
        return Ok(lo);
    }
    if f_hi == 0.0 {
        return Ok(hi);
    }
    if f_lo * f_hi > 0.0 {
        return Err(RootError::NoBracket { lo, hi });
    }

    for _ in 0..max_iter {
        let mid = 0.5 * (lo + hi);
        if (hi - lo).abs() <= tol * mid.abs().max(1.0) {
            return Ok(mid);
        }
        let f_mid = f(mid);
        if f_mid == 0.0 {
            return Ok(mid);
        }
        if f_lo * f_mid < 0.0 {
            hi = mid;
        } else {
            lo = mid;
            f_lo = f_mid;
        }
    }

    Err(RootError::MaxIterations(max_iter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rotation_2d_identity_at_zero() {
        let r = rotation_2d(0.0);
        assert_relative_eq!(r, Mat3::identity(), epsilon = 1e-12);
    }

    #[test]
    fn test_rotation_3d_identity_at_zero() {
        let r = rotation_3d(0.0);
        assert_relative_eq!(r, Mat6::identity(), epsilon = 1e-12);
    }

    #[test]
    fn test_permutation_is_involution() {
        let p = inplane_permutation();
        assert_relative_eq!(p * p, Mat6::identity(), epsilon = 1e-15);
    }

    #[test]
    fn test_bisect_finds_sqrt_two() {
        let root = bisect_root(|x| x * x - 2.0, 0.0, 2.0, 1e-14, 200).unwrap();
        assert_relative_eq!(root, 2.0_f64.sqrt(), epsilon = 1e-10);
    }

    #[test]
    fn test_bisect_reversed_bracket() {
        let root = bisect_root(|x| x - 1.0, 3.0, -3.0, 1e-14, 200).unwrap();
        assert_relative_eq!(root, 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_bisect_no_bracket() {
        let err = bisect_root(|x| x * x + 1.0, -1.0, 1.0, 1e-14, 200).unwrap_err();
        assert!(matches!(err, RootError::NoBracket { .. }));
    }
}

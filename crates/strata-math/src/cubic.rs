//! Real roots of cubic polynomials.
//!
//! Uses the trigonometric form when the discriminant is negative (three
//! distinct real roots) and Cardano's formula otherwise.

use std::f64::consts::PI;

use thiserror::Error;

/// Errors from [`solve_cubic`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CubicError {
    /// `a` was zero, so the polynomial is not cubic.
    #[error("leading coefficient is zero")]
    LeadingCoefficientZero,
}

/// Real roots of `ax³ + bx² + cx + d`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CubicRoots {
    /// One real root and a complex-conjugate pair.
    One(f64),
    /// Three real roots in descending order. Repeated roots appear repeatedly.
    Three(f64, f64, f64),
}

impl CubicRoots {
    /// Number of real roots, counting multiplicity.
    pub fn count(&self) -> usize {
        match self {
            Self::One(_) => 1,
            Self::Three(..) => 3,
        }
    }

    /// The largest real root.
    pub fn largest(&self) -> f64 {
        match *self {
            Self::One(x) | Self::Three(x, _, _) => x,
        }
    }

    pub fn to_vec(&self) -> Vec<f64> {
        match *self {
            Self::One(x) => vec![x],
            Self::Three(x1, x2, x3) => vec![x1, x2, x3],
        }
    }
}

/// Solves `ax³ + bx² + cx + d = 0` over the reals.
pub fn solve_cubic(a: f64, b: f64, c: f64, d: f64) -> Result<CubicRoots, CubicError> {
    if a == 0.0 {
        return Err(CubicError::LeadingCoefficientZero);
    }

    // Monic form x³ + px² + qx + r.
    let (p, q, r) = (b / a, c / a, d / a);
    let shift = p / 3.0;
    let big_q = (3.0 * q - p * p) / 9.0;
    let big_r = (9.0 * p * q - 27.0 * r - 2.0 * p * p * p) / 54.0;
    let q_cube = big_q * big_q * big_q;
    let discriminant = q_cube + big_r * big_r;

    let roots = if discriminant < 0.0 {
        let theta = (big_r / (-q_cube).sqrt()).clamp(-1.0, 1.0).acos();
        let m = 2.0 * (-big_q).sqrt();
        sorted(
            m * (theta / 3.0).cos() - shift,
            m * ((theta + 2.0 * PI) / 3.0).cos() - shift,
            m * ((theta + 4.0 * PI) / 3.0).cos() - shift,
        )
    } else if discriminant > 0.0 {
        let sqrt_d = discriminant.sqrt();
        CubicRoots::One((big_r + sqrt_d).cbrt() + (big_r - sqrt_d).cbrt() - shift)
    } else {
        let cbrt_r = big_r.cbrt();
        sorted(2.0 * cbrt_r - shift, -cbrt_r - shift, -cbrt_r - shift)
    };
    Ok(roots)
}

fn sorted(x1: f64, x2: f64, x3: f64) -> CubicRoots {
    let mut roots = [x1, x2, x3];
    roots.sort_by(|a, b| b.total_cmp(a));
    CubicRoots::Three(roots[0], roots[1], roots[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < EPS,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_three_distinct_roots_descending() {
        // (x - 1)(x - 2)(x - 3)
        let roots = solve_cubic(1.0, -6.0, 11.0, -6.0).unwrap();
        let CubicRoots::Three(x1, x2, x3) = roots else {
            panic!("expected three roots, got {roots:?}");
        };
        assert_close(x1, 3.0);
        assert_close(x2, 2.0);
        assert_close(x3, 1.0);
    }

    #[test]
    fn test_single_real_root() {
        // x³ + x + 2 = (x + 1)(x² - x + 2)
        let roots = solve_cubic(1.0, 0.0, 1.0, 2.0).unwrap();
        assert_eq!(roots.count(), 1);
        assert_close(roots.largest(), -1.0);
    }

    #[test]
    fn test_repeated_root() {
        // (x - 2)²(x + 4) = x³ - 12x + 16
        let roots = solve_cubic(1.0, 0.0, -12.0, 16.0).unwrap();
        let v = roots.to_vec();
        assert_eq!(v.len(), 3);
        assert_close(v[0], 2.0);
        assert_close(v[1], 2.0);
        assert_close(v[2], -4.0);
    }

    #[test]
    fn test_non_monic_scaling() {
        let monic = solve_cubic(1.0, -6.0, 11.0, -6.0).unwrap().to_vec();
        let scaled = solve_cubic(-2.5, 15.0, -27.5, 15.0).unwrap().to_vec();
        for (a, b) in monic.iter().zip(&scaled) {
            assert_close(*a, *b);
        }
    }

    #[test]
    fn test_zero_leading_coefficient() {
        assert_eq!(
            solve_cubic(0.0, 1.0, 2.0, 3.0),
            Err(CubicError::LeadingCoefficientZero)
        );
    }
}

//! Closed-form solutions of the one-dimensional diffusion equation, one per
//! boundary-condition case, plus the error-function kernel they share.

use std::f64::consts::PI;

use crate::core::case::Case;

/// Below this D·t the spread is treated as an unresolved delta at the source.
const DT_EPSILON: f64 = 1e-9;

/// Diffusion coefficient of an isotropic 3D random walk: D = Γλ²/6.
///
/// The factor 6 is 3 dimensions times 2 directions (Einstein relation).
#[inline]
pub fn diffusion_coefficient(jump_rate: f64, jump_length: f64) -> f64 {
    jump_rate * jump_length * jump_length / 6.0
}

/// Complementary error function.
///
/// Rational polynomial approximation from Abramowitz & Stegun 7.1.26,
/// absolute error below 1.5e-7 for x >= 0; the negative half-line follows
/// from erfc(-x) = 2 - erfc(x).
pub fn erfc(x: f64) -> f64 {
    if x < 0.0 {
        return 2.0 - erfc(-x);
    }
    const P: f64 = 0.327_591_1;
    const A1: f64 = 0.254_829_592;
    const A2: f64 = -0.284_496_736;
    const A3: f64 = 1.421_413_741;
    const A4: f64 = -1.453_152_027;
    const A5: f64 = 1.061_405_429;
    let t = 1.0 / (1.0 + P * x);
    let poly = t * (A1 + t * (A2 + t * (A3 + t * (A4 + t * A5))));
    poly * (-x * x).exp()
}

/// Exact solution for `case` at depth `x` and elapsed time `t`, given the
/// diffusion coefficient `d`.
///
/// Case 1 returns the relative concentration C/C₀; cases 2 and 3 return a
/// probability density over x (per micrometer). At vanishing D·t the
/// solutions degenerate to a delta at the source, approximated by an
/// epsilon guard so no NaN or infinity ever reaches callers.
pub fn concentration_at(case: Case, x: f64, t: f64, d: f64) -> f64 {
    let dt = d * t;
    if dt < DT_EPSILON {
        return match case {
            Case::SemiInfiniteSource if x.abs() < 0.01 => 1.0,
            _ => 0.0,
        };
    }
    match case {
        Case::SemiInfiniteSource => erfc(x / (2.0 * dt.sqrt())),
        Case::PlanarSourceInfinite => (-x * x / (4.0 * dt)).exp() / (2.0 * (PI * dt).sqrt()),
        // Thin film on a reflecting wall: all mass folded onto x >= 0, so the
        // prefactor is double the planar one.
        Case::ThinFilmSemiInfinite => (-x * x / (4.0 * dt)).exp() / (PI * dt).sqrt(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reference erf via composite Simpson integration of 2/√π · exp(-t²);
    /// discretization error is far below the tolerance under test.
    fn erfc_reference(x: f64) -> f64 {
        let n = 2000usize;
        let h = x / n as f64;
        let f = |t: f64| (-t * t).exp();
        let mut sum = f(0.0) + f(x);
        for k in 1..n {
            let w = if k % 2 == 1 { 4.0 } else { 2.0 };
            sum += w * f(h * k as f64);
        }
        1.0 - (2.0 / PI.sqrt()) * sum * h / 3.0
    }

    #[test]
    fn erfc_at_zero_is_one() {
        assert!((erfc(0.0) - 1.0).abs() < 1.5e-7);
    }

    #[test]
    fn erfc_decays_to_zero() {
        assert!(erfc(6.0) < 1e-9);
        assert!(erfc(10.0) < 1e-9);
    }

    #[test]
    fn erfc_reflection_identity() {
        for x in [0.1, 0.5, 1.0, 2.5] {
            assert!((erfc(-x) - (2.0 - erfc(x))).abs() < 1e-15);
        }
    }

    #[test]
    fn erfc_matches_reference_within_published_bound() {
        for i in 0..=80 {
            let x = 0.05 * i as f64;
            let reference = erfc_reference(x);
            let err = (erfc(x) - reference).abs();
            assert!(err <= 1.5e-7, "erfc({x}) off by {err:e}");
            let err_neg = (erfc(-x) - (2.0 - reference)).abs();
            assert!(err_neg <= 1.5e-7, "erfc({}) off by {err_neg:e}", -x);
        }
    }

    #[test]
    fn diffusion_coefficient_is_exact() {
        for (gamma, lambda) in [(60.0, 1.0), (1.0, 3.0), (1e6, 0.01), (0.5, 2.0)] {
            let d = diffusion_coefficient(gamma, lambda);
            assert_eq!(d, gamma * lambda * lambda / 6.0);
            assert!(d >= 0.0);
        }
        assert_eq!(diffusion_coefficient(0.0, 1.0), 0.0);
    }

    #[test]
    fn vanishing_time_degenerates_to_a_delta() {
        let d = 10.0;
        assert_eq!(
            concentration_at(Case::SemiInfiniteSource, 0.0, 0.0, d),
            1.0
        );
        assert_eq!(
            concentration_at(Case::SemiInfiniteSource, 5.0, 0.0, d),
            0.0
        );
        assert_eq!(
            concentration_at(Case::PlanarSourceInfinite, 0.0, 0.0, d),
            0.0
        );
        assert_eq!(
            concentration_at(Case::ThinFilmSemiInfinite, 0.0, 0.0, d),
            0.0
        );
        // Guard applies to vanishing D just as it does to vanishing t.
        assert_eq!(
            concentration_at(Case::PlanarSourceInfinite, 1.0, 5.0, 0.0),
            0.0
        );
    }

    #[test]
    fn semi_infinite_profile_starts_at_one_and_decreases() {
        let d = 10.0;
        let t = 4.0;
        // The polynomial's constants sum to one only to within ~1e-9.
        assert!((concentration_at(Case::SemiInfiniteSource, 0.0, t, d) - 1.0).abs() < 1e-8);
        let mut prev = f64::INFINITY;
        for i in 0..40 {
            let c = concentration_at(Case::SemiInfiniteSource, 2.5 * i as f64, t, d);
            assert!(c <= prev);
            assert!((0.0..=1.0).contains(&c));
            prev = c;
        }
    }

    #[test]
    fn planar_density_is_symmetric_and_peaked_at_origin() {
        let d = 10.0;
        let t = 10.0;
        let peak = concentration_at(Case::PlanarSourceInfinite, 0.0, t, d);
        assert!((peak - 1.0 / (2.0 * (PI * d * t).sqrt())).abs() < 1e-15);
        for x in [5.0, 12.5, 30.0] {
            let plus = concentration_at(Case::PlanarSourceInfinite, x, t, d);
            let minus = concentration_at(Case::PlanarSourceInfinite, -x, t, d);
            assert!((plus - minus).abs() < 1e-15);
            assert!(plus < peak);
        }
    }

    #[test]
    fn thin_film_density_doubles_the_planar_one() {
        let d = 10.0;
        let t = 7.0;
        for x in [0.0, 3.0, 11.0, 40.0] {
            let film = concentration_at(Case::ThinFilmSemiInfinite, x, t, d);
            let planar = concentration_at(Case::PlanarSourceInfinite, x, t, d);
            assert!((film - 2.0 * planar).abs() < 1e-15);
        }
    }
}

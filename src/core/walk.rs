use std::f64::consts::PI;

use rand::Rng;

use crate::core::case::Case;
use crate::core::particles::{ParticleSet, DIM};
use crate::error::{Error, Result};

/// Microscopic jump parameters of the random walk.
///
/// `jump_rate` is the attempt frequency Γ in hertz; `jump_length` is the jump
/// distance λ in micrometers. The macroscopic diffusion coefficient is
/// derived from these on demand (see [`crate::core::analytic`]), never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkParameters {
    jump_rate: f64,
    jump_length: f64,
}

impl WalkParameters {
    /// Create validated walk parameters.
    ///
    /// A zero jump rate is admitted and freezes the walk; negative or
    /// non-finite rates and non-positive lengths are rejected with
    /// `Error::InvalidParam`.
    pub fn new(jump_rate: f64, jump_length: f64) -> Result<Self> {
        if !jump_rate.is_finite() || jump_rate < 0.0 {
            return Err(Error::InvalidParam(
                "jump rate must be finite and >= 0".into(),
            ));
        }
        if !jump_length.is_finite() || jump_length <= 0.0 {
            return Err(Error::InvalidParam(
                "jump length must be finite and > 0".into(),
            ));
        }
        Ok(Self {
            jump_rate,
            jump_length,
        })
    }

    /// Jump attempt frequency Γ in hertz.
    #[inline]
    pub fn jump_rate(self) -> f64 {
        self.jump_rate
    }

    /// Jump distance λ in micrometers.
    #[inline]
    pub fn jump_length(self) -> f64 {
        self.jump_length
    }
}

/// Advance every active particle by `dt` seconds of simulated time.
///
/// The interval is split into `max(1, ceil(Γ·dt))` sub-steps so the per-sub-
/// step jump probability Γ·Δt never exceeds one. Within each sub-step every
/// particle independently either stays put or performs one jump of length λ
/// in a direction drawn uniformly on the unit sphere, after which the case
/// boundary rule is enforced.
///
/// The Bernoulli trial per sub-step approximates a Poisson jump process; the
/// approximation only holds because sub-stepping keeps Γ·Δt <= 1.
///
/// A non-positive or non-finite `dt` is a no-op, as is Γ = 0.
pub fn advance<R: Rng>(
    particles: &mut ParticleSet,
    params: WalkParameters,
    case: Case,
    dt: f64,
    rng: &mut R,
) {
    if !dt.is_finite() || dt <= 0.0 {
        return;
    }
    let gamma = params.jump_rate();
    if gamma <= 0.0 {
        return;
    }

    let sub_steps = (gamma * dt).ceil().max(1.0) as usize;
    let sub_dt = dt / sub_steps as f64;
    let p_jump = gamma * sub_dt;
    let length = params.jump_length();

    for _ in 0..sub_steps {
        for pos in particles.active_positions_mut() {
            if rng.random::<f64>() < p_jump {
                jump(pos, length, rng);
                case.apply_boundary(pos);
            }
        }
    }
}

/// Apply one isotropic jump of the given length to `pos`.
///
/// Uniform sphere sampling: cos θ uniform on [-1, 1], φ uniform on [0, 2π).
fn jump<R: Rng>(pos: &mut [f64; DIM], length: f64, rng: &mut R) {
    let cos_theta: f64 = rng.random_range(-1.0..=1.0);
    let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();
    let phi: f64 = rng.random_range(0.0..2.0 * PI);
    pos[0] += length * sin_theta * phi.cos();
    pos[1] += length * sin_theta * phi.sin();
    pos[2] += length * cos_theta;
}

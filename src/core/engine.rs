use rand::{rng, rngs::StdRng, Rng, SeedableRng};

use crate::core::analytic;
use crate::core::case::{Case, LATERAL_WIDTH};
use crate::core::histogram::{self, NUM_BINS};
use crate::core::particles::{ParticleSet, DIM};
use crate::core::walk::{self, WalkParameters};
use crate::error::{Error, Result};

/// Simulation clock: elapsed simulated seconds, run flag, speed multiplier.
#[derive(Debug, Clone, Copy)]
struct Clock {
    elapsed: f64,
    running: bool,
    speed: f64,
}

/// Owner of all mutable simulation state.
///
/// External collaborators (renderer, plotter, controls) talk to this type
/// only: one `step(dt)` per animation tick advances the walk, and every query
/// leaves state untouched. The particle buffer is allocated once at capacity
/// and reused across resets and case switches; `step` performs no allocation.
#[derive(Debug)]
pub struct SimulationEngine {
    case: Case,
    params: WalkParameters,
    particles: ParticleSet,
    clock: Clock,
    rng: StdRng,
}

impl SimulationEngine {
    /// Create an engine with `num_atoms` particles seeded on the source plane
    /// of `case`.
    ///
    /// Pass a seed to make every subsequent run identical; `None` draws fresh
    /// entropy.
    ///
    /// Errors: `Error::CapacityExceeded` if `num_atoms` passes the buffer
    /// capacity.
    pub fn new(
        num_atoms: usize,
        case: Case,
        params: WalkParameters,
        seed: Option<u64>,
    ) -> Result<Self> {
        let mut engine = Self {
            case,
            params,
            particles: ParticleSet::new(),
            clock: Clock {
                elapsed: 0.0,
                running: true,
                speed: 1.0,
            },
            rng: match seed {
                Some(s) => SeedableRng::seed_from_u64(s),
                None => SeedableRng::seed_from_u64(rng().random()),
            },
        };
        engine.particles.activate(num_atoms)?;
        engine.seed_range(0, num_atoms)?;
        Ok(engine)
    }

    /// Advance by one external tick of `dt` wall-clock seconds.
    ///
    /// The simulated interval is `dt` scaled by the speed multiplier; the
    /// caller is responsible for clamping runaway tick deltas. Calls with a
    /// non-positive `dt`, or while paused, leave all state unchanged. All
    /// particle mutations complete before this returns.
    pub fn step(&mut self, dt: f64) {
        if !self.clock.running || !dt.is_finite() || dt <= 0.0 {
            return;
        }
        let sim_dt = dt * self.clock.speed;
        walk::advance(
            &mut self.particles,
            self.params,
            self.case,
            sim_dt,
            &mut self.rng,
        );
        self.clock.elapsed += sim_dt;
    }

    /// Re-seed every active particle on the source plane and zero the clock.
    /// The run flag and speed multiplier survive a reset.
    pub fn reset(&mut self) -> Result<()> {
        let n = self.particles.active_count();
        self.seed_range(0, n)?;
        self.clock.elapsed = 0.0;
        Ok(())
    }

    /// Switch to case `n` (1-3) and perform a full reset under the new
    /// boundary geometry.
    ///
    /// Errors: `Error::InvalidCase`; state is unchanged on failure.
    pub fn set_case(&mut self, n: u32) -> Result<()> {
        self.case = Case::from_number(n)?;
        self.reset()
    }

    /// Replace the walk parameters and speed multiplier without resetting.
    ///
    /// The diffusion coefficient is derived from the new parameters on
    /// demand; nothing is cached. Errors: `Error::InvalidParam` for a
    /// non-positive speed or invalid Γ/λ; state is unchanged on failure.
    pub fn set_parameters(&mut self, jump_rate: f64, jump_length: f64, speed: f64) -> Result<()> {
        let params = WalkParameters::new(jump_rate, jump_length)?;
        if !speed.is_finite() || speed <= 0.0 {
            return Err(Error::InvalidParam("speed must be finite and > 0".into()));
        }
        self.params = params;
        self.clock.speed = speed;
        Ok(())
    }

    /// Grow or shrink the active particle count to `n`.
    ///
    /// Growth seeds exactly the newly activated slots on the source plane;
    /// shrinking deactivates the highest slots with no data movement.
    /// Errors: `Error::CapacityExceeded` with state untouched.
    pub fn set_particle_count(&mut self, n: usize) -> Result<()> {
        let current = self.particles.active_count();
        if n > current {
            self.particles.activate(n - current)?;
            self.seed_range(current, n)?;
        } else {
            self.particles.deactivate(current - n)?;
        }
        Ok(())
    }

    /// Pause or resume the clock; `step` is a no-op while paused.
    pub fn set_running(&mut self, running: bool) {
        self.clock.running = running;
    }

    /// Elapsed simulated time in seconds.
    #[inline]
    pub fn time(&self) -> f64 {
        self.clock.elapsed
    }

    /// Whether `step` currently advances the simulation.
    #[inline]
    pub fn running(&self) -> bool {
        self.clock.running
    }

    /// Speed multiplier applied to every tick interval.
    #[inline]
    pub fn speed(&self) -> f64 {
        self.clock.speed
    }

    /// Active boundary-condition case.
    #[inline]
    pub fn case(&self) -> Case {
        self.case
    }

    /// 1-based number of the active case.
    #[inline]
    pub fn case_number(&self) -> u32 {
        self.case.number()
    }

    /// Diffusion coefficient D = Γλ²/6 for the current parameters, in µm²/s.
    #[inline]
    pub fn diffusion_coefficient(&self) -> f64 {
        analytic::diffusion_coefficient(self.params.jump_rate(), self.params.jump_length())
    }

    /// Current walk parameters.
    #[inline]
    pub fn parameters(&self) -> WalkParameters {
        self.params
    }

    /// Visible window `[min, max]` of the active case.
    #[inline]
    pub fn visible(&self) -> (f64, f64) {
        self.case.visible()
    }

    /// Number of active particles.
    #[inline]
    pub fn num_atoms(&self) -> usize {
        self.particles.active_count()
    }

    /// Positions of all active particles, for the rendering collaborator.
    #[inline]
    pub fn positions(&self) -> &[[f64; DIM]] {
        self.particles.active_positions()
    }

    /// Position of active particle `i`.
    pub fn position_at(&self, i: usize) -> Result<[f64; DIM]> {
        self.particles.position_at(i)
    }

    /// Raw histogram counts over the visible window.
    pub fn histogram_counts(&self) -> [u32; NUM_BINS] {
        histogram::counts(&self.particles, self.case)
    }

    /// Normalized comparison curve for the active case (C/C₀ for case 1, a
    /// probability density for cases 2 and 3).
    pub fn histogram(&self) -> [f64; NUM_BINS] {
        let counts = self.histogram_counts();
        histogram::normalized(&counts, self.case, self.particles.active_count())
    }

    /// Closed-form solution of the active case at depth `x` and the current
    /// elapsed time.
    pub fn analytical_at(&self, x: f64) -> f64 {
        analytic::concentration_at(self.case, x, self.clock.elapsed, self.diffusion_coefficient())
    }

    /// Active particles inside the visible window, inclusive on both ends.
    pub fn count_in_view(&self) -> usize {
        histogram::count_in_view(&self.particles, self.case)
    }

    /// Place slots `from..to` on the source plane with a uniform lateral
    /// spread over the periodic slab.
    fn seed_range(&mut self, from: usize, to: usize) -> Result<()> {
        let half = 0.5 * LATERAL_WIDTH;
        let x = self.case.source_x();
        for i in from..to {
            let y = self.rng.random_range(-half..=half);
            let z = self.rng.random_range(-half..=half);
            self.particles.set_position_at(i, [x, y, z])?;
        }
        Ok(())
    }
}

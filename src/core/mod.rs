//! Core simulation engine for the random-walk diffusion model.
//!
//! Everything stateful hangs off [`engine::SimulationEngine`]; the remaining
//! modules are the pieces it composes: particle storage, the stepping
//! kinematics, per-case boundary rules, closed-form solutions, and the
//! histogram diagnostics compared against them.

pub mod analytic;
pub mod case;
pub mod engine;
pub mod histogram;
pub mod particles;
pub mod walk;

pub use case::Case;
pub use engine::SimulationEngine;
pub use particles::ParticleSet;
pub use walk::WalkParameters;

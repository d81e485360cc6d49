#[cfg(feature = "pyo3")]
use numpy::ndarray::{Array1, Array2};
#[cfg(feature = "pyo3")]
use numpy::{IntoPyArray, PyArray1, PyArray2};
#[cfg(feature = "pyo3")]
use pyo3::exceptions::PyValueError;
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

pub mod core;
pub mod error;

pub use crate::core::{Case, SimulationEngine, WalkParameters};
pub use crate::error::{Error, Result};

#[cfg(feature = "pyo3")]
fn py_err<E: ToString>(e: E) -> PyErr {
    PyValueError::new_err(e.to_string())
}

/// Python-facing wrapper around the Rust simulation engine.
///
/// The visual layers (3D particle view, comparison chart, controls) drive
/// this class from the animation loop:
/// - __new__(num_atoms, case=1, jump_rate=60.0, jump_length=1.0, seed=None)
/// - step(dt) once per frame with the frame interval in seconds
/// - get_positions() / get_histogram() / analytical_curve(xs) for display
#[cfg(feature = "pyo3")]
#[pyclass]
pub struct DiffusionSim {
    engine: SimulationEngine,
}

#[cfg(feature = "pyo3")]
#[pymethods]
impl DiffusionSim {
    /// Initialize a new random-walk diffusion simulation.
    ///
    /// Parameters
    /// - num_atoms: number of particles (int, <= 5000)
    /// - case: boundary regime, 1 = constant source, 2 = planar source,
    ///   3 = thin film (int)
    /// - jump_rate: jump attempt frequency in Hz (float, >= 0)
    /// - jump_length: jump distance in micrometers (float, > 0)
    /// - seed: RNG seed (int) for reproducibility; None for nondeterministic
    ///
    /// Errors: raises ValueError on invalid parameters.
    #[new]
    #[pyo3(signature = (num_atoms=2000, case=1, jump_rate=60.0, jump_length=1.0, seed=None))]
    fn new(
        num_atoms: usize,
        case: u32,
        jump_rate: f64,
        jump_length: f64,
        seed: Option<u64>,
    ) -> PyResult<Self> {
        let case = Case::from_number(case).map_err(py_err)?;
        let params = WalkParameters::new(jump_rate, jump_length).map_err(py_err)?;
        let engine = SimulationEngine::new(num_atoms, case, params, seed).map_err(py_err)?;
        Ok(Self { engine })
    }

    /// Advance by one animation tick of `dt` wall seconds (releases the GIL
    /// during computation). Paused or non-positive ticks are ignored.
    fn step(&mut self, py: Python<'_>, dt: f64) {
        py.allow_threads(|| self.engine.step(dt));
    }

    /// Re-seed all particles on the source plane and zero the clock.
    fn reset(&mut self) -> PyResult<()> {
        self.engine.reset().map_err(py_err)
    }

    /// Switch boundary case (1-3); implies a full reset.
    fn set_case(&mut self, case: u32) -> PyResult<()> {
        self.engine.set_case(case).map_err(py_err)
    }

    /// Update jump rate (Hz), jump length (µm) and playback speed multiplier.
    fn set_parameters(&mut self, jump_rate: f64, jump_length: f64, speed: f64) -> PyResult<()> {
        self.engine
            .set_parameters(jump_rate, jump_length, speed)
            .map_err(py_err)
    }

    /// Grow or shrink the number of simulated particles.
    fn set_particle_count(&mut self, num_atoms: usize) -> PyResult<()> {
        self.engine.set_particle_count(num_atoms).map_err(py_err)
    }

    /// Pause or resume stepping.
    fn set_running(&mut self, running: bool) {
        self.engine.set_running(running);
    }

    /// Return positions of active particles as a NumPy array of shape (N, 3),
    /// dtype=float64.
    fn get_positions<'py>(&self, py: Python<'py>) -> PyResult<Py<PyArray2<f64>>> {
        let positions = self.engine.positions();
        let mut arr = Array2::<f64>::zeros((positions.len(), 3));
        for (i, pos) in positions.iter().enumerate() {
            for (k, &c) in pos.iter().enumerate() {
                arr[[i, k]] = c;
            }
        }
        let pyarr = arr.into_pyarray(py);
        Ok(pyarr.to_owned().into())
    }

    /// Return the normalized comparison curve over the visible bins
    /// (C/C₀ for case 1, probability density for cases 2 and 3).
    fn get_histogram<'py>(&self, py: Python<'py>) -> PyResult<Py<PyArray1<f64>>> {
        let curve = self.engine.histogram();
        let arr = Array1::from_iter(curve.iter().copied());
        Ok(arr.into_pyarray(py).to_owned().into())
    }

    /// Return raw per-bin particle counts over the visible window.
    fn get_histogram_counts<'py>(&self, py: Python<'py>) -> PyResult<Py<PyArray1<u32>>> {
        let counts = self.engine.histogram_counts();
        let arr = Array1::from_iter(counts.iter().copied());
        Ok(arr.into_pyarray(py).to_owned().into())
    }

    /// Evaluate the closed-form solution at depth x for the current time.
    fn analytical_at(&self, x: f64) -> f64 {
        self.engine.analytical_at(x)
    }

    /// Evaluate the closed-form solution at each x in `xs`, for chart
    /// overlays.
    fn analytical_curve<'py>(&self, py: Python<'py>, xs: Vec<f64>) -> PyResult<Py<PyArray1<f64>>> {
        let arr = Array1::from_iter(xs.iter().map(|&x| self.engine.analytical_at(x)));
        Ok(arr.into_pyarray(py).to_owned().into())
    }

    /// Number of active particles with x inside the visible window.
    fn count_in_view(&self) -> usize {
        self.engine.count_in_view()
    }

    /// Elapsed simulated seconds.
    #[getter]
    fn time(&self) -> f64 {
        self.engine.time()
    }

    /// Whether step() currently advances the simulation.
    #[getter]
    fn running(&self) -> bool {
        self.engine.running()
    }

    /// Playback speed multiplier.
    #[getter]
    fn speed(&self) -> f64 {
        self.engine.speed()
    }

    /// Active case number (1-3).
    #[getter]
    fn case_num(&self) -> u32 {
        self.engine.case_number()
    }

    /// Number of active particles.
    #[getter]
    fn num_atoms(&self) -> usize {
        self.engine.num_atoms()
    }

    /// Diffusion coefficient D = Γλ²/6 in µm²/s.
    #[getter]
    fn diffusion_coefficient(&self) -> f64 {
        self.engine.diffusion_coefficient()
    }

    /// Lower edge of the visible window in µm.
    #[getter]
    fn visible_min(&self) -> f64 {
        self.engine.visible().0
    }

    /// Upper edge of the visible window in µm.
    #[getter]
    fn visible_max(&self) -> f64 {
        self.engine.visible().1
    }
}

/// The diffsim Python module entry point.
#[cfg(feature = "pyo3")]
#[pymodule]
fn diffsim(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<DiffusionSim>()?;
    Ok(())
}

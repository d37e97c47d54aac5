//! Forage Core - Batched Multi-Agent Food Foraging
//!
//! A foraging scenario for vectorized reinforcement-learning training:
//! thousands of independent environment copies advance in lock-step, with
//! every per-entity attribute stored as a column indexed by environment.

pub mod core;
pub mod env;
pub mod scenario;
pub mod sim;

#[cfg(feature = "python")]
pub mod py_api;

#[cfg(feature = "python")]
use pyo3::prelude::*;

// Re-export key types
pub use crate::core::config::FoodConfig;
pub use crate::core::error::ScenarioError;
pub use env::{StepOutcome, VecEnv};
pub use scenario::{FoodScenario, Scenario, StepPhase};
pub use sim::{BatchMatrix, BatchPos, Device, World};

/// Initialize tracing for the library.
#[cfg_attr(feature = "python", pyfunction)]
pub fn setup_logging(level: Option<String>) {
    let filter = level.unwrap_or_else(|| "info".to_string());
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Python module initialization
#[cfg(feature = "python")]
#[pymodule]
fn forage_core(_py: Python, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<py_api::PyFoodEnv>()?;
    m.add_function(wrap_pyfunction!(setup_logging, m)?)?;
    Ok(())
}

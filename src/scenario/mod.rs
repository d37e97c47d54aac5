//! Scenario lifecycle contract.
//!
//! A driver builds the world once with [`Scenario::make_world`], then
//! interleaves resets with steps. Within a step it calls
//! [`Scenario::reward`] and [`Scenario::observation`] once per agent, in the
//! world's agent order, and finally [`Scenario::done`].

pub mod food;
pub mod phase;


use crate::core::error::Result;
use crate::sim::{BatchMatrix, Device, World};

pub use food::FoodScenario;
pub use phase::{StepLedger, StepPhase};

pub trait Scenario: Send {
    /// Build the static entity set. No randomness happens here.
    fn make_world(&mut self, batch_dim: usize, device: Device) -> World;

    /// Re-initialize one row, or the whole batch when `env_index` is `None`.
    fn reset_world_at(&mut self, world: &mut World, env_index: Option<usize>) -> Result<()>;

    /// Per-row reward for `agent`.
    fn reward(&mut self, world: &mut World, agent: usize) -> Result<Vec<f32>>;

    /// Per-row feature vector for `agent`.
    fn observation(&self, world: &World, agent: usize) -> Result<BatchMatrix>;

    /// Per-row episode termination.
    fn done(&self, world: &World) -> Vec<bool>;
}

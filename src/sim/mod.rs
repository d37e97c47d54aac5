//! Batched particle-world primitives.
//!
//! Minimal, non-physical versions of the simulator's world and entities:
//! enough state for a scenario to build, reset, score and observe.

pub mod batch;
pub mod entity;
pub mod world;

use serde::{Deserialize, Serialize};

pub use batch::{BatchMatrix, BatchPos, DIM_P};
pub use entity::{Agent, Color, EntityState, Landmark, Sphere};
pub use world::World;

/// Where batched state lives. Only host memory is supported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Device {
    #[default]
    Cpu,
}

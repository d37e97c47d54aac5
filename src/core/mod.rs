//! Configuration and error types shared by the scenario and the driver.

pub mod config;
pub mod error;

pub use config::FoodConfig;
pub use error::{Result, ScenarioError};

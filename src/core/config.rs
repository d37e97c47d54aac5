use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::error::{Result, ScenarioError};

/// Hyperparameters for the food foraging scenario.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoodConfig {
    /// Number of agents. One food item is spawned per agent.
    pub n_agents: usize,
    /// Hand every agent the same reward for any food consumed in its env.
    pub share_reward: bool,
    /// Seed for reset positions. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for FoodConfig {
    fn default() -> Self {
        FoodConfig {
            n_agents: 4,
            share_reward: false,
            seed: None,
        }
    }
}

impl FoodConfig {
    pub fn new(n_agents: usize, share_reward: bool) -> Self {
        FoodConfig {
            n_agents,
            share_reward,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build a config from loosely-typed keyword options.
    ///
    /// Unknown keys are ignored and malformed values fall back to the default.
    pub fn from_kwargs(kwargs: &Value) -> Self {
        let defaults = Self::default();
        let Some(map) = kwargs.as_object() else {
            warn!("[FoodConfig] kwargs is not an object, using defaults");
            return defaults;
        };

        let n_agents = match map.get("n_agents") {
            None => defaults.n_agents,
            Some(v) => v.as_u64().map(|n| n as usize).unwrap_or_else(|| {
                warn!("[FoodConfig] malformed n_agents={}, using {}", v, defaults.n_agents);
                defaults.n_agents
            }),
        };

        let share_reward = match map.get("share_reward") {
            None => defaults.share_reward,
            Some(v) => v.as_bool().unwrap_or_else(|| {
                warn!(
                    "[FoodConfig] malformed share_reward={}, using {}",
                    v, defaults.share_reward
                );
                defaults.share_reward
            }),
        };

        let seed = match map.get("seed") {
            None | Some(Value::Null) => None,
            Some(v) => {
                let seed = v.as_u64();
                if seed.is_none() {
                    warn!("[FoodConfig] malformed seed={}, drawing from entropy", v);
                }
                seed
            }
        };

        FoodConfig {
            n_agents,
            share_reward,
            seed,
        }
    }

    /// Parse JSON text, then apply the same fallbacks as [`FoodConfig::from_kwargs`].
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| ScenarioError::Config(e.to_string()))?;
        Ok(Self::from_kwargs(&value))
    }
}

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::core::config::FoodConfig;
use crate::core::error::ScenarioError;
use crate::env::VecEnv;
use crate::scenario::{FoodScenario, Scenario};
use crate::sim::{BatchMatrix, Device};

impl From<ScenarioError> for PyErr {
    fn from(err: ScenarioError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

type PyObs = Vec<Vec<Vec<f32>>>;

fn to_py_obs(obs: Vec<BatchMatrix>) -> PyObs {
    obs.iter().map(BatchMatrix::to_rows).collect()
}

/// Python handle on a batched foraging environment.
#[pyclass]
pub struct PyFoodEnv {
    env: VecEnv<FoodScenario>,
}

#[pymethods]
impl PyFoodEnv {
    #[new]
    #[pyo3(signature = (batch_dim=32, n_agents=4, share_reward=false, seed=None, max_steps=None))]
    pub fn new(
        batch_dim: usize,
        n_agents: usize,
        share_reward: bool,
        seed: Option<u64>,
        max_steps: Option<u64>,
    ) -> Self {
        let config = FoodConfig {
            n_agents,
            share_reward,
            seed,
        };
        Self {
            env: VecEnv::new(FoodScenario::new(config), batch_dim, Device::Cpu, max_steps),
        }
    }

    #[getter]
    pub fn n_agents(&self) -> usize {
        self.env.n_agents()
    }

    #[getter]
    pub fn batch_dim(&self) -> usize {
        self.env.batch_dim()
    }

    /// Reset every env, or only `env_index`. Returns `obs[agent][env][feature]`.
    #[pyo3(signature = (env_index=None))]
    pub fn reset(&mut self, env_index: Option<usize>) -> PyResult<PyObs> {
        let obs = match env_index {
            Some(i) => self.env.reset_at(i)?,
            None => self.env.reset()?,
        };
        Ok(to_py_obs(obs))
    }

    /// Move an agent in one env. This is where an external physics step plugs in.
    pub fn set_agent_pos(&mut self, agent: usize, env_index: usize, x: f32, y: f32) -> PyResult<()> {
        let world = self.env.world_mut();
        world.check_env_index(env_index)?;
        world.agent_mut(agent)?.state.set_pos([x, y], Some(env_index));
        Ok(())
    }

    /// Returns `(obs, rewards, terminated, truncated)`.
    pub fn step(&mut self) -> PyResult<(PyObs, Vec<Vec<f32>>, Vec<bool>, Vec<bool>)> {
        let out = self.env.step()?;
        Ok((
            to_py_obs(out.observations),
            out.rewards,
            out.terminated,
            out.truncated,
        ))
    }

    pub fn done(&self) -> Vec<bool> {
        self.env.scenario().done(self.env.world())
    }

    pub fn snapshot_json(&self) -> String {
        self.env.snapshot_json()
    }

    pub fn __repr__(&self) -> String {
        format!(
            "PyFoodEnv(batch_dim={}, n_agents={}, share_reward={})",
            self.env.batch_dim(),
            self.env.n_agents(),
            self.env.scenario().config().share_reward
        )
    }
}

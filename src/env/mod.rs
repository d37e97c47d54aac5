//! Vectorized environment driver.
//!
//! Owns the world and calls the scenario hooks in the fixed per-step order.
//! Physics is not simulated here: callers move agents through
//! [`VecEnv::world_mut`] between steps, then call [`VecEnv::step`] to score.


use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::core::error::Result;
use crate::scenario::Scenario;
use crate::sim::{BatchMatrix, Device, World};

/// Everything produced by one scoring step, indexed `[agent][row]`.
#[derive(Clone, Debug, Serialize)]
pub struct StepOutcome {
    pub observations: Vec<BatchMatrix>,
    pub rewards: Vec<Vec<f32>>,
    pub terminated: Vec<bool>,
    pub truncated: Vec<bool>,
}

pub struct VecEnv<S: Scenario> {
    scenario: S,
    world: World,
    steps: Vec<u64>,
    max_steps: Option<u64>,
}

impl<S: Scenario> VecEnv<S> {
    pub fn new(mut scenario: S, batch_dim: usize, device: Device, max_steps: Option<u64>) -> Self {
        let world = scenario.make_world(batch_dim, device);
        info!(
            "[VecEnv] ready (batch_dim={}, agents={}, max_steps={:?})",
            batch_dim,
            world.agents().len(),
            max_steps
        );
        VecEnv {
            scenario,
            world,
            steps: vec![0; batch_dim],
            max_steps,
        }
    }

    pub fn scenario(&self) -> &S {
        &self.scenario
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable world access for the physics step.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn n_agents(&self) -> usize {
        self.world.agents().len()
    }

    pub fn batch_dim(&self) -> usize {
        self.world.batch_dim()
    }

    /// Steps taken by each row since its last reset.
    pub fn steps(&self) -> &[u64] {
        &self.steps
    }

    /// Reset every row and return one observation per agent.
    pub fn reset(&mut self) -> Result<Vec<BatchMatrix>> {
        self.scenario.reset_world_at(&mut self.world, None)?;
        self.steps.par_iter_mut().for_each(|s| *s = 0);
        info!("[VecEnv] full reset of {} envs", self.batch_dim());
        self.observe_all()
    }

    /// Reset a single row and return one observation per agent.
    pub fn reset_at(&mut self, env_index: usize) -> Result<Vec<BatchMatrix>> {
        self.scenario
            .reset_world_at(&mut self.world, Some(env_index))?;
        self.steps[env_index] = 0;
        debug!("[VecEnv] reset env {}", env_index);
        self.observe_all()
    }

    /// Score one step: reward then observation for each agent in list order,
    /// then termination and truncation per row.
    pub fn step(&mut self) -> Result<StepOutcome> {
        let n_agents = self.n_agents();
        let mut rewards = Vec::with_capacity(n_agents);
        let mut observations = Vec::with_capacity(n_agents);

        for agent in 0..n_agents {
            rewards.push(self.scenario.reward(&mut self.world, agent)?);
            observations.push(self.scenario.observation(&self.world, agent)?);
        }

        self.steps.par_iter_mut().for_each(|s| *s += 1);
        let terminated = self.scenario.done(&self.world);
        let truncated: Vec<bool> = match self.max_steps {
            Some(limit) => self.steps.par_iter().map(|s| *s >= limit).collect(),
            None => vec![false; self.batch_dim()],
        };

        debug!(
            "[VecEnv] step done ({} terminated, {} truncated)",
            terminated.iter().filter(|d| **d).count(),
            truncated.iter().filter(|t| **t).count()
        );

        Ok(StepOutcome {
            observations,
            rewards,
            terminated,
            truncated,
        })
    }

    /// JSON snapshot of the whole batched world.
    pub fn snapshot_json(&self) -> String {
        serde_json::to_string(&self.world).unwrap_or("{}".to_string())
    }

    fn observe_all(&self) -> Result<Vec<BatchMatrix>> {
        (0..self.n_agents())
            .map(|agent| self.scenario.observation(&self.world, agent))
            .collect()
    }
}

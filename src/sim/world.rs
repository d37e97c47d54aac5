use serde::Serialize;

use super::batch::DIM_P;
use super::entity::{Agent, Landmark};
use super::Device;
use crate::core::error::{Result, ScenarioError};

/// Batched particle world: a fixed entity set, every attribute `batch_dim` rows deep.
#[derive(Clone, Debug, Serialize)]
pub struct World {
    batch_dim: usize,
    device: Device,
    pub x_semidim: f32,
    pub y_semidim: f32,
    agents: Vec<Agent>,
    landmarks: Vec<Landmark>,
}

impl World {
    pub fn new(batch_dim: usize, device: Device, x_semidim: f32, y_semidim: f32) -> Self {
        World {
            batch_dim,
            device,
            x_semidim,
            y_semidim,
            agents: Vec::new(),
            landmarks: Vec::new(),
        }
    }

    /// Register an agent, allocating its batched state.
    pub fn add_agent(&mut self, mut agent: Agent) {
        agent.allocate(self.batch_dim);
        self.agents.push(agent);
    }

    /// Register a landmark, allocating its batched state.
    pub fn add_landmark(&mut self, mut landmark: Landmark) {
        landmark.allocate(self.batch_dim);
        self.landmarks.push(landmark);
    }

    #[inline]
    pub fn batch_dim(&self) -> usize {
        self.batch_dim
    }

    #[inline]
    pub fn dim_p(&self) -> usize {
        DIM_P
    }

    pub fn device(&self) -> Device {
        self.device
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agents_mut(&mut self) -> &mut [Agent] {
        &mut self.agents
    }

    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }

    pub fn landmarks_mut(&mut self) -> &mut [Landmark] {
        &mut self.landmarks
    }

    /// Agents read-only alongside mutable landmarks.
    pub fn split_mut(&mut self) -> (&[Agent], &mut [Landmark]) {
        (&self.agents, &mut self.landmarks)
    }

    pub fn agent(&self, index: usize) -> Result<&Agent> {
        self.agents.get(index).ok_or(ScenarioError::AgentOutOfRange {
            index,
            n_agents: self.agents.len(),
        })
    }

    pub fn agent_mut(&mut self, index: usize) -> Result<&mut Agent> {
        let n_agents = self.agents.len();
        self.agents
            .get_mut(index)
            .ok_or(ScenarioError::AgentOutOfRange { index, n_agents })
    }

    pub fn check_env_index(&self, index: usize) -> Result<()> {
        if index < self.batch_dim {
            Ok(())
        } else {
            Err(ScenarioError::EnvIndexOutOfRange {
                index,
                batch_dim: self.batch_dim,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{Color, Sphere};

    #[test]
    fn entities_are_allocated_to_batch_dim() {
        let mut world = World::new(5, Device::Cpu, 1.0, 1.0);
        world.add_agent(Agent::new("agent 0", false, Sphere::new(0.03)));
        world.add_landmark(Landmark::new("food 0", false, Sphere::new(0.08), Color::Green));

        assert_eq!(world.agents()[0].state.pos.batch_dim(), 5);
        let food = &world.landmarks()[0];
        assert_eq!(food.batch_dim(), 5);
        assert_eq!(food.eaten, vec![false; 5]);
        assert_eq!(food.render, vec![true; 5]);
        assert_eq!(world.dim_p(), 2);
    }

    #[test]
    fn indices_are_checked() {
        let mut world = World::new(2, Device::Cpu, 1.0, 1.0);
        world.add_agent(Agent::new("agent 0", false, Sphere::new(0.03)));

        assert!(world.agent(0).is_ok());
        assert_eq!(
            world.agent(1).unwrap_err(),
            ScenarioError::AgentOutOfRange {
                index: 1,
                n_agents: 1
            }
        );
        assert!(world.check_env_index(1).is_ok());
        assert!(matches!(
            world.check_env_index(2),
            Err(ScenarioError::EnvIndexOutOfRange { index: 2, .. })
        ));
    }
}

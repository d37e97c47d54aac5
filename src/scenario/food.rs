//! Food foraging scenario.
//!
//! `n_agents` agents start at the origin and `n_agents` food items are
//! scattered uniformly over the arena. Touching an uneaten food item earns
//! reward, either split among the agents touching it or shared by everyone in
//! the environment, and the item stays eaten until the env is reset. The
//! episode is done once every item has been eaten.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Uniform};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::phase::{StepLedger, StepPhase};
use super::Scenario;
use crate::core::config::FoodConfig;
use crate::core::error::Result;
use crate::sim::batch::{
    and_assign, mask_and_not, masked_add, masked_add_scalar, or_assign, reciprocal_or_zero,
};
use crate::sim::{Agent, BatchMatrix, BatchPos, Color, Device, Landmark, Sphere, World, DIM_P};

pub const AGENT_RADIUS: f32 = 0.03;
pub const FOOD_RADIUS: f32 = 0.08;
pub const WORLD_SEMIDIM: f32 = 1.0;
/// Written over every row that earned nothing this step.
pub const IDLE_PENALTY: f32 = -0.01;

pub struct FoodScenario {
    config: FoodConfig,
    rng: StdRng,
    ledger: Option<StepLedger>,
}

impl FoodScenario {
    pub fn new(config: FoodConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        FoodScenario {
            config,
            rng,
            ledger: None,
        }
    }

    pub fn config(&self) -> &FoodConfig {
        &self.config
    }

    pub fn phase(&self) -> StepPhase {
        self.ledger
            .as_ref()
            .map_or(StepPhase::Idle, StepLedger::phase)
    }

    /// Commit landmark bookkeeping and close the open step.
    fn close_step(&mut self, world: &mut World) {
        if let Some(ledger) = self.ledger.take() {
            let skipped = ledger.unscored();
            if !skipped.is_empty() {
                warn!(
                    "[FoodScenario] committing step with unscored agents {:?}",
                    skipped
                );
            }
        }

        let newly_eaten: usize = world
            .landmarks_mut()
            .iter_mut()
            .map(Landmark::commit_step)
            .sum();
        debug!("[FoodScenario] step committed, {} food cells eaten", newly_eaten);
    }
}

impl Default for FoodScenario {
    fn default() -> Self {
        Self::new(FoodConfig::default())
    }
}

/// Per-row number of agents touching `landmark`.
fn count_on_food(agents: &[Agent], landmark: &Landmark) -> Vec<u32> {
    let mut counts = vec![0u32; landmark.batch_dim()];
    for agent in agents {
        let touching = agent.state.pos.within(
            &landmark.state.pos,
            agent.shape.radius + landmark.shape.radius,
        );
        counts
            .par_iter_mut()
            .zip(touching.par_iter())
            .for_each(|(c, t)| *c += u32::from(*t));
    }
    counts
}

impl Scenario for FoodScenario {
    fn make_world(&mut self, batch_dim: usize, device: Device) -> World {
        let n_agents = self.config.n_agents;
        let n_food = n_agents;

        let mut world = World::new(batch_dim, device, WORLD_SEMIDIM, WORLD_SEMIDIM);
        for i in 0..n_agents {
            world.add_agent(Agent::new(
                format!("agent {i}"),
                false,
                Sphere::new(AGENT_RADIUS),
            ));
        }
        for i in 0..n_food {
            world.add_landmark(Landmark::new(
                format!("food {i}"),
                false,
                Sphere::new(FOOD_RADIUS),
                Color::Green,
            ));
        }
        self.ledger = None;

        info!(
            "🍎 [FoodScenario] world built (batch_dim={}, n_agents={}, n_food={}, share_reward={})",
            batch_dim, n_agents, n_food, self.config.share_reward
        );
        world
    }

    fn reset_world_at(&mut self, world: &mut World, env_index: Option<usize>) -> Result<()> {
        if let Some(row) = env_index {
            world.check_env_index(row)?;
        }
        let batch_dim = world.batch_dim();
        let xs = Uniform::new(-world.x_semidim, world.x_semidim);
        let ys = Uniform::new(-world.y_semidim, world.y_semidim);
        let rng = &mut self.rng;

        for agent in world.agents_mut() {
            agent.state.set_pos([0.0, 0.0], env_index);
        }

        for landmark in world.landmarks_mut() {
            match env_index {
                Some(row) => {
                    let pos = [xs.sample(rng), ys.sample(rng)];
                    landmark.state.set_pos(pos, Some(row));
                    landmark.reset_consumption_at(row);
                }
                None => {
                    let rows: Vec<[f32; DIM_P]> = (0..batch_dim)
                        .map(|_| [xs.sample(rng), ys.sample(rng)])
                        .collect();
                    landmark.state.pos = BatchPos::from_rows(&rows);
                    landmark.reset_consumption();
                }
            }
        }

        if env_index.is_none() {
            self.ledger = None;
        }
        debug!("[FoodScenario] reset env_index={:?}", env_index);
        Ok(())
    }

    fn reward(&mut self, world: &mut World, agent: usize) -> Result<Vec<f32>> {
        world.agent(agent)?;
        let n_agents = world.agents().len();
        self.ledger
            .get_or_insert_with(|| StepLedger::open(n_agents))
            .mark(agent)?;
        let is_last = agent + 1 == n_agents;

        let mut rews = vec![0.0f32; world.batch_dim()];
        let (agents, landmarks) = world.split_mut();
        let scored = &agents[agent];

        for landmark in landmarks.iter_mut() {
            let how_many_on_food = count_on_food(agents, landmark);
            let anyone_on_food: Vec<bool> = how_many_on_food.par_iter().map(|n| *n > 0).collect();
            or_assign(&mut landmark.just_eaten, &anyone_on_food);

            assert!(
                how_many_on_food.iter().all(|n| *n as usize <= n_agents),
                "more agents on {} than exist in the world",
                landmark.name
            );

            if self.config.share_reward {
                let newly_eaten = mask_and_not(&landmark.just_eaten, &landmark.eaten);
                masked_add_scalar(&mut rews, &newly_eaten, 1.0);
            } else {
                let on_food = scored.state.pos.within(
                    &landmark.state.pos,
                    scored.shape.radius + landmark.shape.radius,
                );
                let credited = mask_and_not(&on_food, &landmark.eaten);
                let eating_rew = reciprocal_or_zero(&how_many_on_food);
                masked_add(&mut rews, &credited, &eating_rew);
            }
        }

        if is_last {
            self.close_step(world);
        }

        rews.par_iter_mut()
            .for_each(|r| *r = if *r == 0.0 { IDLE_PENALTY } else { *r });
        Ok(rews)
    }

    fn observation(&self, world: &World, agent: usize) -> Result<BatchMatrix> {
        let agent = world.agent(agent)?;
        let landmarks = world.landmarks();
        let cols = DIM_P + landmarks.len() * (DIM_P + 1);
        let mut obs = BatchMatrix::zeros(world.batch_dim(), cols);

        obs.data
            .par_chunks_mut(cols)
            .enumerate()
            .for_each(|(row, out)| {
                let [ax, ay] = agent.state.pos.row(row);
                out[0] = ax;
                out[1] = ay;
                for (k, landmark) in landmarks.iter().enumerate() {
                    let base = DIM_P + k * (DIM_P + 1);
                    let [lx, ly] = landmark.state.pos.row(row);
                    out[base] = lx - ax;
                    out[base + 1] = ly - ay;
                    out[base + 2] = f32::from(u8::from(landmark.eaten[row]));
                }
            });
        Ok(obs)
    }

    fn done(&self, world: &World) -> Vec<bool> {
        let mut done = vec![true; world.batch_dim()];
        for landmark in world.landmarks() {
            and_assign(&mut done, &landmark.eaten);
        }
        done
    }
}

//! Step transaction for the per-agent reward pass.
//!
//! A ledger is opened by the first reward call of a step and consumed when the
//! last agent in list order is scored. Landmark bookkeeping is committed at
//! that point and nowhere else.

use serde::Serialize;

use crate::core::error::{Result, ScenarioError};

/// Where the reward pass stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum StepPhase {
    /// No step open; the next reward call opens one.
    Idle,
    /// `scored` of `total` agents have been scored in the open step.
    Scoring { scored: usize, total: usize },
}

/// Which agents have been scored in the open step.
#[derive(Clone, Debug)]
pub struct StepLedger {
    scored: Vec<bool>,
}

impl StepLedger {
    pub fn open(n_agents: usize) -> Self {
        StepLedger {
            scored: vec![false; n_agents],
        }
    }

    /// Fails if `agent` was already scored in this step.
    pub fn check(&self, agent: usize) -> Result<()> {
        if self.scored.get(agent).copied().unwrap_or(false) {
            Err(ScenarioError::AgentAlreadyScored { index: agent })
        } else {
            Ok(())
        }
    }

    pub fn mark(&mut self, agent: usize) -> Result<()> {
        self.check(agent)?;
        self.scored[agent] = true;
        Ok(())
    }

    pub fn unscored(&self) -> Vec<usize> {
        self.scored
            .iter()
            .enumerate()
            .filter(|(_, s)| !**s)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn phase(&self) -> StepPhase {
        StepPhase::Scoring {
            scored: self.scored.iter().filter(|s| **s).count(),
            total: self.scored.len(),
        }
    }
}

use thiserror::Error;

/// Caller-contract errors surfaced by the scenario and the driver.
///
/// Broken internal invariants are not represented here; those panic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScenarioError {
    #[error("agent index {index} out of range (n_agents={n_agents})")]
    AgentOutOfRange { index: usize, n_agents: usize },

    #[error("env index {index} out of range (batch_dim={batch_dim})")]
    EnvIndexOutOfRange { index: usize, batch_dim: usize },

    #[error("agent {index} was already scored in the current step")]
    AgentAlreadyScored { index: usize },

    #[error("invalid config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ScenarioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_index() {
        let err = ScenarioError::EnvIndexOutOfRange {
            index: 9,
            batch_dim: 4,
        };
        assert_eq!(err.to_string(), "env index 9 out of range (batch_dim=4)");

        let err = ScenarioError::AgentAlreadyScored { index: 2 };
        assert!(err.to_string().contains("agent 2"));
    }
}

use crate::consensus::{MaliciousBehavior, NetworkParams};
use crate::ConfigError;
use serde::{Deserialize, Serialize};

/// Configuration of a consensus simulation run.
/// Every field is optional in the TOML file, missing ones fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub num_nodes: usize,
    pub num_transactions: usize,
    pub p_graph: f64,
    pub p_malicious: f64,
    pub p_tx_distribution: f64,
    pub num_rounds: usize,
    // A fixed seed makes the run reproducible. A random one is picked when absent.
    pub seed: Option<u64>,
    pub malicious_behavior: MaliciousBehavior,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_nodes: 100,
            num_transactions: 500,
            p_graph: 0.1,
            p_malicious: 0.15,
            p_tx_distribution: 0.01,
            num_rounds: 10,
            seed: None,
            malicious_behavior: MaliciousBehavior::Silent,
        }
    }
}

impl SimulationConfig {
    pub fn from_toml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses and validates the configuration.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::validate_probability("p_graph", self.p_graph)?;
        Self::validate_probability("p_malicious", self.p_malicious)?;
        Self::validate_probability("p_tx_distribution", self.p_tx_distribution)?;
        if self.num_nodes == 0 {
            return Err(ConfigError::Zero("num_nodes"));
        }
        // Transaction ids are u32.
        if u32::try_from(self.num_transactions).is_err() {
            return Err(ConfigError::TooLarge {
                name: "num_transactions",
                value: self.num_transactions,
                max: u32::MAX as usize,
            });
        }
        Ok(())
    }

    pub fn network_params(&self) -> NetworkParams {
        NetworkParams {
            p_graph: self.p_graph,
            p_malicious: self.p_malicious,
            p_tx_distribution: self.p_tx_distribution,
            num_rounds: self.num_rounds,
        }
    }

    fn validate_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
        if (0.0..=1.0).contains(&value) {
            Ok(())
        } else {
            Err(ConfigError::InvalidProbability { name, value })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(
            SimulationConfig::from_toml_str("").unwrap(),
            SimulationConfig::default()
        );
    }

    #[test]
    fn partial_file_overrides_fields() {
        let config = SimulationConfig::from_toml_str(
            r#"
            num_nodes = 20
            p_graph = 0.3
            seed = 42
            malicious_behavior = "stubborn"
            "#,
        )
        .unwrap();
        assert_eq!(config.num_nodes, 20);
        assert_eq!(config.p_graph, 0.3);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.malicious_behavior, MaliciousBehavior::Stubborn);
        assert_eq!(config.num_rounds, 10);
    }

    #[test]
    fn probabilities_are_checked() {
        let error = SimulationConfig::from_toml_str("p_malicious = 1.5").unwrap_err();
        assert!(matches!(
            error,
            ConfigError::InvalidProbability {
                name: "p_malicious",
                ..
            }
        ));
    }

    #[test]
    fn zero_nodes_is_rejected() {
        assert!(matches!(
            SimulationConfig::from_toml_str("num_nodes = 0"),
            Err(ConfigError::Zero("num_nodes"))
        ));
    }

    #[test]
    fn too_many_transactions_is_rejected() {
        let config = SimulationConfig {
            num_transactions: u32::MAX as usize + 1,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TooLarge {
                name: "num_transactions",
                ..
            })
        ));
    }

    #[test]
    fn unknown_behavior_is_a_parse_error() {
        assert!(matches!(
            SimulationConfig::from_toml_str(r#"malicious_behavior = "loud""#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            SimulationConfig::from_toml_file("/nonexistent/simulation.toml"),
            Err(ConfigError::Io { .. })
        ));
    }
}

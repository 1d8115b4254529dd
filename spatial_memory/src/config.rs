//! Configuration for the knowledge graph and the agent controller.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How much of the world the agent knows up front.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Vision radius in tiles. Scouting reveals twice this radius.
    pub vision_range: u32,

    /// Fraction of the grid width revealed around the start (capped at 1.0).
    pub completeness: f32,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            vision_range: 1,
            completeness: 0.0,
        }
    }
}

/// Limits of the agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub energy_max: i64,
    /// Maximum units carried per resource.
    pub resource_max: u32,
    pub hunger_thirst_max: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            energy_max: 100,
            resource_max: 5,
            hunger_thirst_max: 20,
        }
    }
}

/// Complete configuration, usually read from a TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpatialMemoryConfig {
    pub memory: MemoryConfig,
    pub agent: AgentConfig,
}

impl SpatialMemoryConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.memory.completeness.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "memory.completeness must be finite, got {}",
                self.memory.completeness
            )));
        }
        if self.agent.energy_max <= 0 {
            return Err(ConfigError::Invalid(format!(
                "agent.energy_max must be positive, got {}",
                self.agent.energy_max
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SpatialMemoryConfig::default();
        assert_eq!(config.memory.vision_range, 1);
        assert_eq!(config.memory.completeness, 0.0);
        assert_eq!(config.agent.energy_max, 100);
        assert_eq!(config.agent.resource_max, 5);
        assert_eq!(config.agent.hunger_thirst_max, 20);
    }

    #[test]
    fn test_partial_toml() {
        let config = SpatialMemoryConfig::from_toml_str(
            r#"
            [memory]
            vision_range = 3

            [agent]
            resource_max = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.memory.vision_range, 3);
        assert_eq!(config.memory.completeness, 0.0);
        assert_eq!(config.agent.resource_max, 2);
        assert_eq!(config.agent.energy_max, 100);
    }

    #[test]
    fn test_invalid_energy() {
        let result = SpatialMemoryConfig::from_toml_str("[agent]\nenergy_max = 0\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_malformed_toml() {
        let result = SpatialMemoryConfig::from_toml_str("[memory\nvision_range = 1");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CodonforgeError, Result};

/// Parameters for one optimization, loadable from a TOML file and
/// overridable by the caller before the run starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizationConfig {
    pub population_size: usize,
    pub mutation_probability: f64,
    pub crossover_probability: f64,
    /// Stop once the best fitness has been stale for more than this many
    /// generations.
    pub max_gens_since_improvement: usize,
    /// Hard cap on generations per population.
    pub max_gens_total: usize,
    pub tournament_size: usize,
    /// Number of independent populations to run.
    pub num_populations: usize,
    /// NCBI translation table id.
    pub genetic_code: u8,
    /// Memoize fitness per sequence string.
    pub cache: bool,
    /// Fixed RNG seed for reproducible runs; each population derives its
    /// own seed from it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for OptimizationConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            mutation_probability: 0.3,
            crossover_probability: 0.8,
            max_gens_since_improvement: 50,
            max_gens_total: 5000,
            tournament_size: 3,
            num_populations: 1,
            genetic_code: 11,
            cache: true,
            seed: None,
        }
    }
}

impl OptimizationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 1 {
            return Err(CodonforgeError::Configuration(
                "Population size must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_probability) {
            return Err(CodonforgeError::Configuration(
                "Mutation probability must be between 0 and 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.crossover_probability) {
            return Err(CodonforgeError::Configuration(
                "Crossover probability must be between 0 and 1".to_string(),
            ));
        }
        if self.max_gens_since_improvement < 1 {
            return Err(CodonforgeError::Configuration(
                "Max generations since improvement must be at least 1".to_string(),
            ));
        }
        if self.max_gens_total < 1 {
            return Err(CodonforgeError::Configuration(
                "Max total generations must be at least 1".to_string(),
            ));
        }
        if self.tournament_size < 1 {
            return Err(CodonforgeError::Configuration(
                "Tournament size must be at least 1".to_string(),
            ));
        }
        if self.num_populations < 1 {
            return Err(CodonforgeError::Configuration(
                "Number of populations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| CodonforgeError::Configuration(format!("Failed to read config: {}", e)))?;

        let config: Self = toml::from_str(&contents)
            .map_err(|e| CodonforgeError::Configuration(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| CodonforgeError::Configuration(format!("Failed to serialize: {}", e)))?;

        std::fs::write(path, contents)
            .map_err(|e| CodonforgeError::Configuration(format!("Failed to write config: {}", e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        OptimizationConfig::default().validate().unwrap();
    }

    #[test]
    fn probabilities_out_of_range_are_rejected() {
        let config = OptimizationConfig {
            mutation_probability: -0.1,
            ..OptimizationConfig::default()
        };
        assert!(config.validate().is_err());

        let config = OptimizationConfig {
            crossover_probability: 1.1,
            ..OptimizationConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_sized_populations_are_rejected() {
        let config = OptimizationConfig {
            population_size: 0,
            ..OptimizationConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: OptimizationConfig =
            toml::from_str("population_size = 20\nmutation_probability = 0.5\n").unwrap();
        assert_eq!(config.population_size, 20);
        assert_eq!(config.mutation_probability, 0.5);
        assert_eq!(config.genetic_code, 11);
        assert!(config.cache);
    }
}

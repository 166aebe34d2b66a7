//! Configuration records for every mining engine.
//!
//! Each engine takes one explicit record; every tunable has a serde default so a
//! partial JSON object is enough to configure a run.

use serde::{Deserialize, Serialize};

/// Restrict GRAANK candidates to those with (or without) a target column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetFilter {
    /// Column index of the target feature.
    pub column: usize,
    /// When true, keep only candidates that do NOT touch the target column.
    #[serde(default)]
    pub exclude: bool,
}

/// Exhaustive (GRAANK) search configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraankConfig {
    /// Keep every well-formed candidate regardless of the support threshold.
    #[serde(default)]
    pub ignore_support: bool,
    /// Stop once this apriori level is reached.
    #[serde(default)]
    pub max_level: Option<usize>,
    /// Optional target-column filter.
    #[serde(default)]
    pub target: Option<TargetFilter>,
}

impl GraankConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(level) = self.max_level
            && level < 2
        {
            return Err(ConfigError::InvalidMaxLevel(level));
        }
        Ok(())
    }
}

/// Iteration budget shared by the metaheuristic engines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchBudget {
    /// Number of iterations. A value of exactly 1 switches to exploratory mode:
    /// iterate until a best pattern is rediscovered.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Upper bound on iterations in exploratory mode.
    #[serde(default = "default_exploration_limit")]
    pub exploration_limit: usize,
    /// Random seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for SearchBudget {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            exploration_limit: default_exploration_limit(),
            random_seed: None,
        }
    }
}

impl SearchBudget {
    /// Fixed number of iterations.
    pub fn iterations(max_iterations: usize) -> Self {
        Self {
            max_iterations,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        if self.exploration_limit == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        Ok(())
    }
}

fn default_max_iterations() -> usize {
    1
}
fn default_exploration_limit() -> usize {
    10_000
}

/// Genetic algorithm configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneticConfig {
    #[serde(default)]
    pub budget: SearchBudget,
    /// Individuals kept after each generation.
    #[serde(default = "default_population_size")]
    pub population_size: usize,
    /// Proportion of children bred per generation (0.0-1.0).
    #[serde(default = "default_crossover_fraction")]
    pub crossover_fraction: f64,
    /// Upper bound of the crossover blend factor.
    #[serde(default = "default_crossover_gamma")]
    pub crossover_gamma: f64,
    /// Probability of perturbing each decimal digit (0.0-1.0).
    #[serde(default = "default_mutation_rate")]
    pub mutation_rate: f64,
    /// Scale of a digit perturbation.
    #[serde(default = "default_mutation_sigma")]
    pub mutation_sigma: f64,
}

impl Default for GeneticConfig {
    fn default() -> Self {
        Self {
            budget: SearchBudget::default(),
            population_size: default_population_size(),
            crossover_fraction: default_crossover_fraction(),
            crossover_gamma: default_crossover_gamma(),
            mutation_rate: default_mutation_rate(),
            mutation_sigma: default_mutation_sigma(),
        }
    }
}

impl GeneticConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.budget.validate()?;
        if self.population_size < 2 {
            return Err(ConfigError::PopulationTooSmall(self.population_size));
        }
        check_unit("crossover_fraction", self.crossover_fraction)?;
        check_unit("mutation_rate", self.mutation_rate)?;
        check_non_negative("crossover_gamma", self.crossover_gamma)?;
        check_non_negative("mutation_sigma", self.mutation_sigma)?;
        Ok(())
    }
}

fn default_population_size() -> usize {
    5
}
fn default_crossover_fraction() -> f64 {
    0.5
}
fn default_crossover_gamma() -> f64 {
    1.0
}
fn default_mutation_rate() -> f64 {
    0.9
}
fn default_mutation_sigma() -> f64 {
    0.9
}

/// Hill-climbing (local search) configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HillClimbingConfig {
    #[serde(default)]
    pub budget: SearchBudget,
    /// Scale applied to each random step.
    #[serde(default = "default_step_size")]
    pub step_size: f64,
}

impl Default for HillClimbingConfig {
    fn default() -> Self {
        Self {
            budget: SearchBudget::default(),
            step_size: default_step_size(),
        }
    }
}

impl HillClimbingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.budget.validate()?;
        if !(self.step_size > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "step_size",
                value: self.step_size,
            });
        }
        Ok(())
    }
}

fn default_step_size() -> f64 {
    0.5
}

/// Particle swarm configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleSwarmConfig {
    #[serde(default)]
    pub budget: SearchBudget,
    /// Number of particles in the swarm.
    #[serde(default = "default_particle_count")]
    pub particle_count: usize,
    /// Weight of the previous velocity.
    #[serde(default = "default_inertia")]
    pub inertia: f64,
    /// Pull towards a particle's own best position.
    #[serde(default = "default_personal_coeff")]
    pub personal_coeff: f64,
    /// Pull towards the swarm's best position.
    #[serde(default = "default_global_coeff")]
    pub global_coeff: f64,
}

impl Default for ParticleSwarmConfig {
    fn default() -> Self {
        Self {
            budget: SearchBudget::default(),
            particle_count: default_particle_count(),
            inertia: default_inertia(),
            personal_coeff: default_personal_coeff(),
            global_coeff: default_global_coeff(),
        }
    }
}

impl ParticleSwarmConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.budget.validate()?;
        if self.particle_count < 2 {
            return Err(ConfigError::PopulationTooSmall(self.particle_count));
        }
        check_non_negative("inertia", self.inertia)?;
        check_non_negative("personal_coeff", self.personal_coeff)?;
        check_non_negative("global_coeff", self.global_coeff)?;
        Ok(())
    }
}

fn default_particle_count() -> usize {
    5
}
fn default_inertia() -> f64 {
    0.9
}
fn default_personal_coeff() -> f64 {
    0.01
}
fn default_global_coeff() -> f64 {
    0.9
}

/// Random search configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RandomSearchConfig {
    #[serde(default)]
    pub budget: SearchBudget,
}

impl RandomSearchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.budget.validate()
    }
}

/// Engine selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MiningAlgorithm {
    /// Exhaustive level-wise search.
    Graank(GraankConfig),
    /// Genetic algorithm over the numeric search space.
    Genetic(GeneticConfig),
    /// Hill climbing over the numeric search space.
    HillClimbing(HillClimbingConfig),
    /// Particle swarm optimisation over the numeric search space.
    ParticleSwarm(ParticleSwarmConfig),
    /// Uniform random sampling of the numeric search space.
    RandomSearch(RandomSearchConfig),
}

impl Default for MiningAlgorithm {
    fn default() -> Self {
        Self::Graank(GraankConfig::default())
    }
}

impl MiningAlgorithm {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::Graank(c) => c.validate(),
            Self::Genetic(c) => c.validate(),
            Self::HillClimbing(c) => c.validate(),
            Self::ParticleSwarm(c) => c.validate(),
            Self::RandomSearch(c) => c.validate(),
        }
    }
}

fn check_unit(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter { name, value })
    }
}

fn check_non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter { name, value })
    }
}

/// Engine configuration validation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Iteration budget must be positive")]
    ZeroIterations,
    #[error("Population size must be at least 2 (got {0})")]
    PopulationTooSmall(usize),
    #[error("Invalid value {value} for {name}")]
    InvalidParameter { name: &'static str, value: f64 },
    #[error("Maximum apriori level must be at least 2 (got {0})")]
    InvalidMaxLevel(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_valid() {
        assert!(GraankConfig::default().validate().is_ok());
        assert!(GeneticConfig::default().validate().is_ok());
        assert!(HillClimbingConfig::default().validate().is_ok());
        assert!(ParticleSwarmConfig::default().validate().is_ok());
        assert!(RandomSearchConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_configs() {
        let ga = GeneticConfig {
            population_size: 1,
            ..Default::default()
        };
        assert_eq!(ga.validate(), Err(ConfigError::PopulationTooSmall(1)));

        let hc = HillClimbingConfig {
            step_size: 0.0,
            ..Default::default()
        };
        assert!(hc.validate().is_err());

        let rs = RandomSearchConfig {
            budget: SearchBudget::iterations(0),
        };
        assert_eq!(rs.validate(), Err(ConfigError::ZeroIterations));

        let graank = GraankConfig {
            max_level: Some(1),
            ..Default::default()
        };
        assert_eq!(graank.validate(), Err(ConfigError::InvalidMaxLevel(1)));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let algo: MiningAlgorithm =
            serde_json::from_str(r#"{"type": "Genetic", "budget": {"max_iterations": 3}}"#)
                .unwrap();
        match algo {
            MiningAlgorithm::Genetic(c) => {
                assert_eq!(c.budget.max_iterations, 3);
                assert_eq!(c.budget.exploration_limit, 10_000);
                assert_eq!(c.population_size, 5);
                assert_eq!(c.mutation_rate, 0.9);
            }
            other => panic!("unexpected algorithm {other:?}"),
        }
    }

    #[test]
    fn test_serialization() {
        let algo = MiningAlgorithm::ParticleSwarm(ParticleSwarmConfig::default());
        let json = serde_json::to_string(&algo).unwrap();
        let parsed: MiningAlgorithm = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, algo);
    }
}

//! Common contract of every mining engine.

use crate::schema::{ConfigError, MiningAlgorithm, MiningResult};

use super::bitmap::{BitmapProvider, GradualData};
use super::graank::Graank;
use super::search::{GeneticGraank, HillClimbingGraank, ParticleGraank, RandomGraank};

/// A gradual pattern discovery engine.
pub trait PatternMiner {
    /// Engine name reported in results.
    fn algorithm(&self) -> &'static str;

    /// Run one discovery over a read-only provider.
    fn mine(&mut self, provider: &dyn BitmapProvider) -> MiningResult;

    /// Run one discovery and store the patterns on the data context.
    fn discover(&mut self, data: &mut GradualData) -> MiningResult {
        let result = self.mine(data);
        data.set_gradual_patterns(result.patterns.clone());
        result
    }
}

impl MiningAlgorithm {
    /// Instantiate the selected engine.
    pub fn build(self) -> Result<Box<dyn PatternMiner>, ConfigError> {
        Ok(match self {
            Self::Graank(config) => Box::new(Graank::new(config)?),
            Self::Genetic(config) => Box::new(GeneticGraank::new(config)?),
            Self::HillClimbing(config) => Box::new(HillClimbingGraank::new(config)?),
            Self::ParticleSwarm(config) => Box::new(ParticleGraank::new(config)?),
            Self::RandomSearch(config) => Box::new(RandomGraank::new(config)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::bitmap::tests::dummy_data;
    use crate::schema::{HillClimbingConfig, SearchBudget};

    #[test]
    fn test_build_from_json() {
        let algo: MiningAlgorithm = serde_json::from_str(r#"{"type": "Graank"}"#).unwrap();
        let mut miner = algo.build().unwrap();
        assert_eq!(miner.algorithm(), "GRAANK");

        let mut data = dummy_data(0.5);
        let result = miner.discover(&mut data);
        assert_eq!(data.gradual_patterns().len(), result.patterns.len());
    }

    #[test]
    fn test_build_rejects_invalid_config() {
        let algo = MiningAlgorithm::HillClimbing(HillClimbingConfig {
            budget: SearchBudget::iterations(0),
            ..Default::default()
        });
        assert!(algo.build().is_err());
    }

    #[test]
    fn test_every_engine_names_itself() {
        let names: Vec<&str> = [
            MiningAlgorithm::Graank(Default::default()),
            MiningAlgorithm::Genetic(Default::default()),
            MiningAlgorithm::HillClimbing(Default::default()),
            MiningAlgorithm::ParticleSwarm(Default::default()),
            MiningAlgorithm::RandomSearch(Default::default()),
        ]
        .into_iter()
        .map(|algo| algo.build().unwrap().algorithm())
        .collect();
        assert_eq!(
            names,
            vec!["GRAANK", "GA-GRAANK", "LS-GRAANK", "PSO-GRAANK", "RS-GRAANK"]
        );
    }
}

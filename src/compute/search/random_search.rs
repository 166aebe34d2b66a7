//! Uniform random sampling of the numeric search space.

use crate::schema::{ConfigError, MiningResult, RandomSearchConfig};

use super::super::bitmap::BitmapProvider;
use super::super::miner::PatternMiner;
use super::{SearchRng, SearchState};

/// Random search: a fresh position every iteration, keeping the cheapest.
pub struct RandomGraank {
    config: RandomSearchConfig,
    rng: SearchRng,
}

impl RandomGraank {
    pub const NAME: &'static str = "RS-GRAANK";

    pub fn new(config: RandomSearchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = SearchRng::from_budget(&config.budget);
        Ok(Self { config, rng })
    }

    pub fn config(&self) -> &RandomSearchConfig {
        &self.config
    }
}

impl PatternMiner for RandomGraank {
    fn algorithm(&self) -> &'static str {
        Self::NAME
    }

    fn mine(&mut self, provider: &dyn BitmapProvider) -> MiningResult {
        let mut state = SearchState::new(provider, &self.config.budget);
        if state.space.is_empty() {
            return MiningResult::empty(Self::NAME, Some(0));
        }
        let lower = state.space.lower_bound();
        let upper = state.space.upper_bound();

        let start = self.rng.uniform(lower, upper);
        let mut best = state.evaluate(start, provider);

        while state.should_continue() {
            let position = (lower + self.rng.unit()) * (upper - lower);
            let candidate = state.evaluate(position, provider);
            if candidate.cost < best.cost {
                best = candidate;
            }
            state.complete_iteration(best.position, provider);
        }

        state.finish(Self::NAME, provider)
    }
}

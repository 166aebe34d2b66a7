//! Local search: random steps away from the best-known position.

use crate::schema::{ConfigError, HillClimbingConfig, MiningResult};

use super::super::bitmap::BitmapProvider;
use super::super::miner::PatternMiner;
use super::{SearchRng, SearchState};

/// Hill climbing over the numeric search space.
pub struct HillClimbingGraank {
    config: HillClimbingConfig,
    rng: SearchRng,
}

impl HillClimbingGraank {
    pub const NAME: &'static str = "LS-GRAANK";

    pub fn new(config: HillClimbingConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = SearchRng::from_budget(&config.budget);
        Ok(Self { config, rng })
    }

    pub fn config(&self) -> &HillClimbingConfig {
        &self.config
    }
}

impl PatternMiner for HillClimbingGraank {
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

        let start = self.rng.position(&state.space);
        let mut best = state.evaluate(start, provider);

        while state.should_continue() {
            let step = self.rng.uniform(lower, upper) * self.config.step_size;
            let neighbor = state.evaluate(best.position + step, provider);
            if neighbor.cost < best.cost {
                best = neighbor;
            }
            state.complete_iteration(best.position, provider);
        }

        state.finish(Self::NAME, provider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::bitmap::tests::dummy_data;
    use crate::compute::search::tests::check_result;
    use crate::schema::SearchBudget;

    fn config(iterations: usize, seed: u64) -> HillClimbingConfig {
        HillClimbingConfig {
            budget: SearchBudget::iterations(iterations).with_seed(seed),
            step_size: 0.5,
        }
    }

    #[test]
    fn test_three_iterations_on_dummy_data() {
        for seed in 0..20 {
            let mut data = dummy_data(0.5);
            let result = HillClimbingGraank::new(config(3, seed))
                .unwrap()
                .discover(&mut data);

            assert_eq!(result.algorithm, "LS-GRAANK");
            assert_eq!(result.iterations, Some(3));
            // One starting evaluation plus one neighbor per iteration.
            assert_eq!(result.evaluations, 4);
            check_result(&result, 0.5);
            assert_eq!(data.gradual_patterns(), result.patterns.as_slice());
        }
    }

    #[test]
    fn test_three_iterations_find_age_expenses() {
        let data = dummy_data(0.5);
        let result = (0..200)
            .map(|seed| HillClimbingGraank::new(config(3, seed)).unwrap().mine(&data))
            .find(|r| r.contains_rendered(&["Age+", "Expenses-"]))
            .expect("some seed reaches {Age+, Expenses-} within three iterations");

        assert_eq!(result.iterations, Some(3));
        check_result(&result, 0.5);
        let found = result
            .rendered
            .iter()
            .find(|r| r.0 == vec!["Age+", "Expenses-"])
            .unwrap();
        assert_eq!(found.1, 1.0);

        let json: serde_json::Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();
        let expected = serde_json::json!([["Age+", "Expenses-"], 1.0]);
        let best = json["Best Patterns"].as_array().unwrap();
        assert!(best.contains(&expected));
    }

    #[test]
    fn test_seed_reproducible() {
        let data = dummy_data(0.5);
        let a = HillClimbingGraank::new(config(10, 42)).unwrap().mine(&data);
        let b = HillClimbingGraank::new(config(10, 42)).unwrap().mine(&data);
        assert_eq!(a.rendered, b.rendered);
        assert_eq!(a.invalid_count, b.invalid_count);
    }

    #[test]
    fn test_exploratory_mode_terminates() {
        let data = dummy_data(0.5);
        let result = HillClimbingGraank::new(config(1, 3)).unwrap().mine(&data);
        let iterations = result.iterations.unwrap();
        assert!(iterations >= 1);
        assert!(iterations <= SearchBudget::default().exploration_limit);
        check_result(&result, 0.5);
    }

    #[test]
    fn test_json_shape() {
        let data = dummy_data(0.5);
        let result = HillClimbingGraank::new(config(3, 9)).unwrap().mine(&data);
        let json: serde_json::Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();
        assert_eq!(json["Algorithm"], "LS-GRAANK");
        assert!(json["Best Patterns"].is_array());
        assert_eq!(json["Iterations"], 3);
        assert!(json.get("Patterns").is_none());
    }
}

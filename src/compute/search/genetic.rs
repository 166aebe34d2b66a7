//! Genetic algorithm over the numeric search space.
//!
//! Children are blended from two random parents, then mutated digit by digit
//! on the decimal form of their position. Each generation keeps the
//! `population_size` cheapest individuals of parents and children combined.

use crate::schema::{ConfigError, GeneticConfig, MiningResult};

use super::super::bitmap::BitmapProvider;
use super::super::miner::PatternMiner;
use super::{Candidate, SearchRng, SearchState};

/// Genetic search engine.
pub struct GeneticGraank {
    config: GeneticConfig,
    rng: SearchRng,
}

impl GeneticGraank {
    pub const NAME: &'static str = "GA-GRAANK";

    pub fn new(config: GeneticConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = SearchRng::from_budget(&config.budget);
        Ok(Self { config, rng })
    }

    pub fn config(&self) -> &GeneticConfig {
        &self.config
    }

    /// Number of children per generation, rounded to an even count.
    pub fn children_count(&self) -> usize {
        let half = self.config.crossover_fraction * self.config.population_size as f64 / 2.0;
        (half.round_ties_even() * 2.0) as usize
    }

    /// Blend two parent positions: `a·p1 + (1-a)·p2` and the mirrored mix.
    fn crossover(&mut self, p1: f64, p2: f64) -> (f64, f64) {
        let alpha = self.rng.uniform(0.0, self.config.crossover_gamma);
        (
            alpha * p1 + (1.0 - alpha) * p2,
            alpha * p2 + (1.0 - alpha) * p1,
        )
    }

    /// Perturb decimal digits of the integer part of `position`.
    fn mutate(&mut self, position: f64) -> f64 {
        mutate_digits(
            position,
            self.config.mutation_rate,
            self.config.mutation_sigma,
            &mut self.rng,
        )
    }
}

/// Each digit is picked with probability `rate` and shifted by
/// `sigma * U(0, 1)`, keeping the integer part of the result.
fn mutate_digits(position: f64, rate: f64, sigma: f64, rng: &mut SearchRng) -> f64 {
    let digits = format!("{:.0}", position.max(0.0).trunc());
    let mutated: String = digits
        .chars()
        .map(|c| {
            let digit = c.to_digit(10).unwrap_or(0) as f64;
            if rng.unit() <= rate {
                let shifted = digit + sigma * rng.unit();
                format!("{}", shifted.trunc() as u64)
            } else {
                c.to_string()
            }
        })
        .collect();
    mutated.parse::<f64>().unwrap_or(position)
}

impl PatternMiner for GeneticGraank {
    fn algorithm(&self) -> &'static str {
        Self::NAME
    }

    fn mine(&mut self, provider: &dyn BitmapProvider) -> MiningResult {
        let mut state = SearchState::new(provider, &self.config.budget);
        if state.space.is_empty() {
            return MiningResult::empty(Self::NAME, Some(0));
        }
        let population_size = self.config.population_size;
        let children_count = self.children_count();

        let mut population: Vec<Candidate> = (0..population_size)
            .map(|_| {
                let position = self.rng.position(&state.space);
                state.evaluate(position, provider)
            })
            .collect();
        let mut best = population[0];
        for individual in &population[1..] {
            if individual.cost < best.cost {
                best = *individual;
            }
        }

        while state.should_continue() {
            let mut children = Vec::with_capacity(children_count);
            for _ in 0..children_count / 2 {
                let (i, j) = self.rng.pick_pair(population.len());
                let (p1, p2) = self.crossover(population[i].position, population[j].position);

                for blended in [p1, p2] {
                    let child = state.evaluate(blended, provider);
                    if child.cost < best.cost {
                        best = child;
                    }
                    let mutant = self.mutate(child.position);
                    let mutant = state.evaluate(mutant, provider);
                    if mutant.cost < best.cost {
                        best = mutant;
                    }
                    children.push(mutant);
                }
            }

            population.extend(children);
            population.sort_by(|a, b| a.cost.total_cmp(&b.cost));
            population.truncate(population_size);

            state.complete_iteration(best.position, provider);
        }

        state.finish(Self::NAME, provider)
    }
}

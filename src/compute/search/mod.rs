//! Metaheuristic engines over the numeric search space.
//!
//! Every engine keeps a running best-ever candidate; after each iteration the
//! best position is decoded, validated and offered to the elite list.

mod genetic;
mod hill_climbing;
mod particle_swarm;
mod random_search;

pub use genetic::GeneticGraank;
pub use hill_climbing::HillClimbingGraank;
pub use particle_swarm::ParticleGraank;
pub use random_search::RandomGraank;

use std::time::Instant;

use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Uniform};

use crate::schema::{ExtendedPattern, MiningResult, SearchBudget};

use super::bitmap::BitmapProvider;
use super::codec::{INVALID_COST, NumericSearchSpace};
use super::validation::{is_subset_or_superset, position_of_duplicate, validate};

/// Random number generator for the search engines.
pub struct SearchRng {
    rng: StdRng,
}

impl SearchRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seed from the budget, or from a random seed when none is configured.
    pub fn from_budget(budget: &SearchBudget) -> Self {
        Self::new(budget.random_seed.unwrap_or_else(rand::random))
    }

    /// Uniform draw in `[0, 1)`.
    pub fn unit(&mut self) -> f64 {
        self.rng.r#gen::<f64>()
    }

    /// Uniform draw in `[low, high)`; `low` when the range is empty.
    pub fn uniform(&mut self, low: f64, high: f64) -> f64 {
        if high <= low {
            return low;
        }
        Uniform::new(low, high).sample(&mut self.rng)
    }

    /// A whole-number position in `[lower, upper)` of the space.
    pub fn position(&mut self, space: &NumericSearchSpace) -> f64 {
        self.uniform(space.lower_bound(), space.upper_bound()).trunc()
    }

    /// Two distinct indices below `len` (`len >= 2`).
    pub fn pick_pair(&mut self, len: usize) -> (usize, usize) {
        let picked = index::sample(&mut self.rng, len, 2);
        (picked.index(0), picked.index(1))
    }
}

/// A position with its cost. Lower cost is fitter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub position: f64,
    pub cost: f64,
}

/// Run-local bookkeeping shared by the four engines.
struct SearchState {
    space: NumericSearchSpace,
    budget: SearchBudget,
    best_patterns: Vec<ExtendedPattern>,
    invalid_count: usize,
    evaluations: usize,
    iterations: usize,
    repeated: usize,
    start_time: Instant,
}

impl SearchState {
    fn new(provider: &dyn BitmapProvider, budget: &SearchBudget) -> Self {
        Self {
            space: NumericSearchSpace::from_provider(provider),
            budget: budget.clone(),
            best_patterns: Vec::new(),
            invalid_count: 0,
            evaluations: 0,
            iterations: 0,
            repeated: 0,
            start_time: Instant::now(),
        }
    }

    /// Clamp a position and compute its cost.
    fn evaluate(&mut self, position: f64, provider: &dyn BitmapProvider) -> Candidate {
        let position = self.space.bound(position);
        let cost = self.space.evaluate(position, provider);
        self.evaluations += 1;
        if cost == INVALID_COST {
            self.invalid_count += 1;
        }
        Candidate { position, cost }
    }

    /// True while the budget allows another iteration.
    ///
    /// A budget of exactly one iteration runs until a best pattern is
    /// rediscovered, capped by the exploration limit.
    fn should_continue(&self) -> bool {
        if self.budget.max_iterations == 1 {
            self.repeated < 1 && self.iterations < self.budget.exploration_limit
        } else {
            self.iterations < self.budget.max_iterations
        }
    }

    /// Offer the best position to the elite list and close the iteration.
    fn complete_iteration(&mut self, best_position: f64, provider: &dyn BitmapProvider) {
        let pattern = validate(&self.space.decode(best_position), provider);

        if let Some(index) = position_of_duplicate(&pattern, &self.best_patterns) {
            self.best_patterns[index].freq_count += 1;
            self.repeated += 1;
        } else if is_subset_or_superset(&pattern, &self.best_patterns, true) {
            self.repeated += 1;
        } else if pattern.support() >= provider.min_support() {
            log::debug!("iteration {}: accepted {}", self.iterations, pattern);
            self.best_patterns.push(ExtendedPattern::new(pattern));
        }
        self.iterations += 1;
    }

    fn finish(self, algorithm: &str, provider: &dyn BitmapProvider) -> MiningResult {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        log::info!(
            "{}: {} patterns, {} invalid of {} evaluations, {} iterations in {:.3}s",
            algorithm,
            self.best_patterns.len(),
            self.invalid_count,
            self.evaluations,
            self.iterations,
            elapsed
        );

        let titles = provider.titles();
        let patterns: Vec<_> = self.best_patterns.into_iter().map(|e| e.pattern).collect();
        MiningResult {
            algorithm: algorithm.to_string(),
            rendered: patterns.iter().map(|p| p.render(titles)).collect(),
            patterns,
            invalid_count: self.invalid_count,
            iterations: Some(self.iterations),
            evaluations: self.evaluations,
            elapsed_seconds: elapsed,
        }
    }
}

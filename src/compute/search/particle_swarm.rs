//! Particle swarm optimisation over the numeric search space.

use crate::schema::{ConfigError, MiningResult, ParticleSwarmConfig};

use super::super::bitmap::BitmapProvider;
use super::super::miner::PatternMiner;
use super::{Candidate, SearchRng, SearchState};

/// A swarm member: current position, velocity and personal best.
#[derive(Debug, Clone, Copy)]
struct Particle {
    position: f64,
    velocity: f64,
    personal_best: Candidate,
}

/// Particle swarm engine.
pub struct ParticleGraank {
    config: ParticleSwarmConfig,
    rng: SearchRng,
}

impl ParticleGraank {
    pub const NAME: &'static str = "PSO-GRAANK";

    pub fn new(config: ParticleSwarmConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = SearchRng::from_budget(&config.budget);
        Ok(Self { config, rng })
    }

    pub fn config(&self) -> &ParticleSwarmConfig {
        &self.config
    }

    /// `w·v + c_p·r1·(pbest - x) + c_g·r2·(gbest - x)`
    fn next_velocity(&mut self, particle: &Particle, global_best: f64) -> f64 {
        let personal_pull = self.config.personal_coeff
            * self.rng.unit()
            * (particle.personal_best.position - particle.position);
        let global_pull =
            self.config.global_coeff * self.rng.unit() * (global_best - particle.position);
        self.config.inertia * particle.velocity + personal_pull + global_pull
    }
}

impl PatternMiner for ParticleGraank {
    fn algorithm(&self) -> &'static str {
        Self::NAME
    }

    fn mine(&mut self, provider: &dyn BitmapProvider) -> MiningResult {
        let mut state = SearchState::new(provider, &self.config.budget);
        if state.space.is_empty() {
            return MiningResult::empty(Self::NAME, Some(0));
        }

        let mut swarm: Vec<Particle> = (0..self.config.particle_count)
            .map(|_| {
                let position = self.rng.position(&state.space);
                Particle {
                    position,
                    velocity: 1.0,
                    personal_best: Candidate {
                        position,
                        cost: f64::INFINITY,
                    },
                }
            })
            .collect();
        let mut global_best = state.evaluate(swarm[0].position, provider);

        while state.should_continue() {
            for particle in swarm.iter_mut() {
                let current = state.evaluate(particle.position, provider);
                if current.cost < particle.personal_best.cost {
                    particle.personal_best = current;
                }
                if current.cost < global_best.cost {
                    global_best = current;
                }
            }

            for i in 0..swarm.len() {
                let velocity = self.next_velocity(&swarm[i], global_best.position);
                let particle = &mut swarm[i];
                particle.velocity = velocity;
                particle.position = state.space.bound(particle.position + velocity);
            }

            state.complete_iteration(global_best.position, provider);
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

    fn config(iterations: usize, seed: u64) -> ParticleSwarmConfig {
        ParticleSwarmConfig {
            budget: SearchBudget::iterations(iterations).with_seed(seed),
            ..Default::default()
        }
    }

    #[test]
    fn test_velocity_update() {
        let mut pso = ParticleGraank::new(ParticleSwarmConfig {
            inertia: 0.5,
            personal_coeff: 0.0,
            global_coeff: 0.0,
            ..Default::default()
        })
        .unwrap();
        let particle = Particle {
            position: 10.0,
            velocity: 4.0,
            personal_best: Candidate {
                position: 20.0,
                cost: 0.5,
            },
        };
        assert_eq!(pso.next_velocity(&particle, 100.0), 2.0);

        pso.config.global_coeff = 1.0;
        let v = pso.next_velocity(&particle, 100.0);
        assert!((2.0..92.0).contains(&v));

        // At the global best with no inertia the particle stays put.
        pso.config.inertia = 0.0;
        assert_eq!(pso.next_velocity(&particle, 10.0), 0.0);
    }

    #[test]
    fn test_particle_swarm_on_dummy_data() {
        for seed in 0..10 {
            let mut data = dummy_data(0.5);
            let result = ParticleGraank::new(config(4, seed)).unwrap().discover(&mut data);
            assert_eq!(result.algorithm, "PSO-GRAANK");
            assert_eq!(result.iterations, Some(4));
            // One seed evaluation plus every particle each iteration.
            assert_eq!(result.evaluations, 1 + 4 * 5);
            check_result(&result, 0.5);
        }
    }
}

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::prelude::*;
use rand::rngs::StdRng;

use crate::config::OptimizationConfig;
use crate::engine::operators::Operators;
use crate::engine::progress::{GenerationUpdate, ProgressCallback};
use crate::error::Result;
use crate::types::{Individual, StopReason};

/// Ranking value for a fitness. NaN compares below every real fitness, so
/// un-comparable individuals fall out of selection instead of poisoning
/// comparisons.
pub(crate) fn rank(fitness: f64) -> f64 {
    if fitness.is_nan() {
        f64::NEG_INFINITY
    } else {
        fitness
    }
}

/// Outcome of a single population run.
#[derive(Debug)]
pub struct RunOutcome {
    pub best: Individual,
    pub generations: usize,
    pub elapsed: Duration,
    pub stop_reason: StopReason,
}

/// Drives one population through generations: evaluate, tournament-select,
/// crossover, mutate, replace. Stops early once the best fitness has gone
/// stale for longer than `max_gens_since_improvement`, or at the
/// `max_gens_total` cap, or cooperatively at a generation boundary when the
/// cancel flag is raised.
pub struct EvolutionEngine {
    operators: Operators,
    config: OptimizationConfig,
    rng: StdRng,
    cancel: Arc<AtomicBool>,
}

impl EvolutionEngine {
    pub fn new(
        operators: Operators,
        config: &OptimizationConfig,
        rng: StdRng,
        cancel: Arc<AtomicBool>,
    ) -> Self {
        Self {
            operators,
            config: config.clone(),
            rng,
            cancel,
        }
    }

    pub fn run<C: ProgressCallback>(&mut self, run: usize, callback: &mut C) -> Result<RunOutcome> {
        let start = Instant::now();

        let seeded = self.operators.seed(&mut self.rng);
        let mut scored = self.evaluate(seeded)?;

        let mut best = best_of(&scored);
        let mut generation = 0;
        let mut gens_since_improvement = 0;

        callback.on_generation_complete(&GenerationUpdate {
            run,
            generation,
            best_fitness: best.fitness,
            gens_since_improvement,
            elapsed: start.elapsed(),
        });

        let stop_reason = loop {
            if gens_since_improvement > self.config.max_gens_since_improvement {
                break StopReason::Converged;
            }
            if generation >= self.config.max_gens_total {
                break StopReason::MaxGenerationsReached;
            }
            if self.cancel.load(Ordering::Relaxed) {
                break StopReason::Cancelled;
            }

            let offspring = self.next_generation(&scored);
            scored = self.evaluate(offspring)?;
            generation += 1;

            let generation_best = best_of(&scored);
            if rank(generation_best.fitness) > rank(best.fitness) {
                best = generation_best;
                gens_since_improvement = 0;
            } else {
                gens_since_improvement += 1;
            }

            callback.on_generation_complete(&GenerationUpdate {
                run,
                generation,
                best_fitness: best.fitness,
                gens_since_improvement,
                elapsed: start.elapsed(),
            });
        };

        Ok(RunOutcome {
            best,
            generations: generation,
            elapsed: start.elapsed(),
            stop_reason,
        })
    }

    fn evaluate(&mut self, population: Vec<String>) -> Result<Vec<Individual>> {
        population
            .into_iter()
            .map(|sequence| {
                let fitness = self.operators.fitness(&sequence)?;
                Ok(Individual { sequence, fitness })
            })
            .collect()
    }

    /// Best-of-K tournament; the first strictly better candidate wins ties.
    fn tournament<'a>(&mut self, scored: &'a [Individual]) -> &'a Individual {
        let mut best = &scored[self.rng.gen_range(0..scored.len())];
        for _ in 1..self.config.tournament_size {
            let candidate = &scored[self.rng.gen_range(0..scored.len())];
            if rank(candidate.fitness) > rank(best.fitness) {
                best = candidate;
            }
        }
        best
    }

    fn next_generation(&mut self, scored: &[Individual]) -> Vec<String> {
        let mut next = Vec::with_capacity(self.config.population_size);

        while next.len() < self.config.population_size {
            let parent1 = self.tournament(scored);
            let parent2 = self.tournament(scored);

            let (child1, child2) = if self.rng.gen::<f64>() < self.config.crossover_probability {
                self.operators
                    .crossover(&parent1.sequence, &parent2.sequence, &mut self.rng)
            } else {
                (parent1.sequence.clone(), parent2.sequence.clone())
            };

            for child in [child1, child2] {
                if next.len() == self.config.population_size {
                    break;
                }
                if self.rng.gen::<f64>() < self.config.mutation_probability {
                    next.push(self.operators.mutate(&child, &mut self.rng));
                } else {
                    next.push(child);
                }
            }
        }

        next
    }
}

fn best_of(scored: &[Individual]) -> Individual {
    let mut best = &scored[0];
    for individual in &scored[1..] {
        if rank(individual.fitness) > rank(best.fitness) {
            best = individual;
        }
    }
    best.clone()
}

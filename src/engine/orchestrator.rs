use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::codon::{self, GeneticCode};
use crate::config::OptimizationConfig;
use crate::engine::evolution::{rank, EvolutionEngine};
use crate::engine::operators::Operators;
use crate::engine::progress::{NullProgress, ProgressCallback};
use crate::error::Result;
use crate::types::{FrequencyProfile, OptimizationResult};

/// Wires the operators and the evolution loop together and runs one or more
/// independent populations against the same target.
pub struct Optimizer {
    aa_seq: String,
    profile: FrequencyProfile,
    config: OptimizationConfig,
    code: &'static GeneticCode,
    cancel: Arc<AtomicBool>,
}

impl Optimizer {
    /// Validates everything eagerly: the config, the genetic code id, the
    /// profile, and the amino-acid sequence. Nothing is deferred into the
    /// optimization loop.
    pub fn new(
        aa_seq: &str,
        profile: FrequencyProfile,
        config: OptimizationConfig,
    ) -> Result<Self> {
        config.validate()?;
        let code = codon::genetic_code(config.genetic_code)?;

        if !aa_seq.is_empty() && aa_seq.chars().all(|c| matches!(c, 'A' | 'T' | 'G' | 'C')) {
            log::warn!(
                "The target sequence only contains A/T/G/C and looks like DNA, \
                 not an amino acid sequence. Ensure you are passing amino acids."
            );
        }

        // Constructing a throwaway operator set surfaces profile and
        // sequence problems now instead of at the first run.
        Operators::new(aa_seq, &profile, code, config.population_size, config.cache)?;

        Ok(Self {
            aa_seq: aa_seq.to_string(),
            profile,
            config,
            code,
            cancel: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Handle for cooperative cancellation. Raising it stops every run at
    /// its next generation boundary; in-flight evaluations are never
    /// interrupted.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Runs with no progress sink attached.
    pub fn run(&self) -> Result<Vec<OptimizationResult>> {
        self.run_with_progress(&mut NullProgress)
    }

    /// Runs `num_populations` independent populations sequentially, each
    /// with its own operator instance and fitness cache, and returns their
    /// best individuals ordered best-first (NaN fitness last).
    pub fn run_with_progress<C: ProgressCallback>(
        &self,
        callback: &mut C,
    ) -> Result<Vec<OptimizationResult>> {
        let mut results = Vec::with_capacity(self.config.num_populations);

        for run in 0..self.config.num_populations {
            callback.on_run_start(run, self.config.num_populations);

            let operators = Operators::new(
                &self.aa_seq,
                &self.profile,
                self.code,
                self.config.population_size,
                self.config.cache,
            )?;
            let rng = match self.config.seed {
                Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(run as u64)),
                None => StdRng::from_entropy(),
            };
            let mut engine =
                EvolutionEngine::new(operators, &self.config, rng, Arc::clone(&self.cancel));

            let outcome = engine.run(run, callback)?;
            log::debug!(
                "Population {} finished after {} generation(s): fitness {:.6} ({:?})",
                run,
                outcome.generations,
                outcome.best.fitness,
                outcome.stop_reason
            );

            results.push(OptimizationResult {
                sequence: outcome.best.sequence,
                fitness: outcome.best.fitness,
                generations: outcome.generations,
                elapsed: outcome.elapsed,
                stop_reason: outcome.stop_reason,
            });

            if self.cancel.load(Ordering::Relaxed) {
                break;
            }
        }

        results.sort_by(|a, b| {
            rank(b.fitness)
                .partial_cmp(&rank(a.fitness))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CodonforgeError;
    use crate::types::FeatureKey;

    fn codons_profile(pairs: &[(&str, f64)]) -> FrequencyProfile {
        let mut profile = FrequencyProfile::new();
        profile.insert(
            FeatureKey::Codons,
            pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        );
        profile
    }

    #[test]
    fn construction_validates_the_config() {
        let config = OptimizationConfig {
            mutation_probability: 1.5,
            ..OptimizationConfig::default()
        };
        let result = Optimizer::new("M", codons_profile(&[("ATG", 1.0)]), config);
        assert!(matches!(result, Err(CodonforgeError::Configuration(_))));
    }

    #[test]
    fn construction_validates_the_genetic_code() {
        let config = OptimizationConfig {
            genetic_code: 99,
            ..OptimizationConfig::default()
        };
        let result = Optimizer::new("M", codons_profile(&[("ATG", 1.0)]), config);
        assert!(matches!(
            result,
            Err(CodonforgeError::UnknownGeneticCode(99))
        ));
    }

    #[test]
    fn construction_validates_the_profile_eagerly() {
        let mut profile = FrequencyProfile::new();
        profile.insert(FeatureKey::Kmer(3), [("ATG".to_string(), 1.0)].into_iter().collect());
        profile.insert(FeatureKey::Codons, [("ATG".to_string(), 1.0)].into_iter().collect());

        let result = Optimizer::new("M", profile, OptimizationConfig::default());
        assert!(matches!(result, Err(CodonforgeError::Validation(_))));
    }
}

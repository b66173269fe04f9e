use std::collections::HashMap;

use rand::prelude::*;

use crate::codon::GeneticCode;
use crate::error::{CodonforgeError, Result};
use crate::stats::{distance, kmers};
use crate::types::{FeatureKey, FrequencyProfile, KmerMap};

/// The four GA primitives for one optimization run, specialized to a fixed
/// amino-acid sequence and target profile. All candidate sequences are
/// codon-aligned DNA strings of the same length.
///
/// Construction is where every input problem surfaces: a malformed profile
/// or an unencodable amino acid fails here, never later inside the loop.
pub struct Operators {
    population_size: usize,
    feature_keys: Vec<FeatureKey>,
    target_flat: KmerMap,
    code: &'static GeneticCode,
    /// Synonymous codon choices per amino-acid position, resolved up front.
    codon_choices: Vec<&'static [&'static str]>,
    cache: Option<HashMap<String, f64>>,
}

impl Operators {
    pub fn new(
        target_aa_seq: &str,
        target_freqs: &FrequencyProfile,
        code: &'static GeneticCode,
        population_size: usize,
        cache: bool,
    ) -> Result<Self> {
        if target_aa_seq.is_empty() {
            return Err(CodonforgeError::InvalidArgument(
                "Target amino acid sequence is empty.".to_string(),
            ));
        }
        target_freqs.validate()?;
        if target_freqs.is_empty() {
            return Err(CodonforgeError::Validation(
                "Target frequency profile has no entries.".to_string(),
            ));
        }

        let mut codon_choices = Vec::with_capacity(target_aa_seq.len());
        for aa in target_aa_seq.chars() {
            match code.codons_for(aa) {
                Some(codons) if !codons.is_empty() => codon_choices.push(codons),
                _ => {
                    return Err(CodonforgeError::InvalidArgument(format!(
                        "Amino acid {:?} is not encodable under genetic code {}.",
                        aa, code.id
                    )))
                }
            }
        }

        Ok(Self {
            population_size,
            feature_keys: target_freqs.feature_keys(),
            target_flat: target_freqs.flatten(),
            code,
            codon_choices,
            cache: cache.then(HashMap::new),
        })
    }

    /// Builds the initial population. Every position gets a uniformly random
    /// synonymous codon, so generation 0 already carries the diversity
    /// crossover and mutation need to make progress.
    pub fn seed<R: Rng>(&self, rng: &mut R) -> Vec<String> {
        (0..self.population_size)
            .map(|_| self.random_coding_sequence(rng))
            .collect()
    }

    fn random_coding_sequence<R: Rng>(&self, rng: &mut R) -> String {
        let mut seq = String::with_capacity(self.codon_choices.len() * 3);
        for codons in &self.codon_choices {
            seq.push_str(codons[rng.gen_range(0..codons.len())]);
        }
        seq
    }

    /// Cosine similarity between the candidate's flattened frequency vector
    /// and the flattened target. Memoized per exact sequence string: the
    /// same candidate routinely survives generations or is regenerated by
    /// crossover, and the k-mer decomposition dominates the cost.
    pub fn fitness(&mut self, seq: &str) -> Result<f64> {
        if let Some(cache) = &self.cache {
            if let Some(&fitness) = cache.get(seq) {
                return Ok(fitness);
            }
        }

        let freqs = kmers::kmer_frequencies_from_seq(seq, &self.feature_keys)?;
        let mut flat = KmerMap::new();
        for (_, map) in freqs {
            flat.extend(map);
        }
        let fitness = distance::cosine(&flat, &self.target_flat);

        if let Some(cache) = &mut self.cache {
            cache.insert(seq.to_string(), fitness);
        }
        Ok(fitness)
    }

    /// Single-point crossover at an interior codon boundary, swapping tails.
    /// One-codon parents have no interior boundary, so the pair is exchanged
    /// whole.
    pub fn crossover<R: Rng>(&self, parent1: &str, parent2: &str, rng: &mut R) -> (String, String) {
        let n_codons = parent1.len() / 3;
        if n_codons < 2 {
            return (parent2.to_string(), parent1.to_string());
        }
        self.crossover_at(parent1, parent2, rng.gen_range(1..n_codons) * 3)
    }

    fn crossover_at(&self, parent1: &str, parent2: &str, split: usize) -> (String, String) {
        let child1 = format!("{}{}", &parent1[..split], &parent2[split..]);
        let child2 = format!("{}{}", &parent2[..split], &parent1[split..]);
        (child1, child2)
    }

    /// Replaces one randomly chosen codon with a different synonym. Only
    /// positions whose codon actually has synonyms are candidates; a
    /// sequence made entirely of synonym-free codons is returned unchanged.
    pub fn mutate<R: Rng>(&self, seq: &str, rng: &mut R) -> String {
        let mut codons: Vec<&str> = (0..seq.len() / 3).map(|i| &seq[i * 3..i * 3 + 3]).collect();

        let mutable: Vec<usize> = codons
            .iter()
            .enumerate()
            .filter(|(_, codon)| self.code.has_synonyms(codon))
            .map(|(idx, _)| idx)
            .collect();

        let idx = match mutable.choose(rng) {
            Some(&idx) => idx,
            None => return seq.to_string(),
        };

        let current = codons[idx];
        let replacements: Vec<&str> = self
            .code
            .synonyms(current)
            .unwrap_or(&[])
            .iter()
            .copied()
            .filter(|&synonym| synonym != current)
            .collect();
        codons[idx] = replacements[rng.gen_range(0..replacements.len())];

        codons.concat()
    }

    #[cfg(test)]
    fn cached_evaluations(&self) -> usize {
        self.cache.as_ref().map_or(0, HashMap::len)
    }
}

//! Featurize DNA k-mer/codon usage and evolve coding sequences to match it.
//!
//! The crate has two halves:
//!
//! - **Featurization**: turn DNA sequences into k-mer / codon frequency
//!   profiles ([`featurize`], [`stats`]).
//! - **Optimization**: given a target amino-acid sequence and a target
//!   profile, search for a DNA sequence that translates to those amino
//!   acids while matching the target usage ([`engine`]). The search is a
//!   genetic algorithm over codon-aligned DNA strings: synonymous-codon
//!   seeding, codon-boundary crossover, synonymous mutation, and a
//!   cosine-similarity fitness over flattened frequency vectors, memoized
//!   per candidate.
//!
//! File parsing and the CLI live at the edges ([`io`], the `codonforge`
//! binary); the engine itself only ever sees plain strings and maps.
//!
//! ```no_run
//! use codonforge::{FeatureKey, FrequencyProfile, OptimizationConfig, Optimizer};
//!
//! # fn main() -> codonforge::Result<()> {
//! let target = codonforge::featurize::featurize_sequence(
//!     "ATGGCTGCTAAA",
//!     &[FeatureKey::Kmer(1), FeatureKey::Codons],
//! )?;
//!
//! let config = OptimizationConfig {
//!     population_size: 50,
//!     seed: Some(42),
//!     ..OptimizationConfig::default()
//! };
//! let optimizer = Optimizer::new("MAAK", target, config)?;
//! let results = optimizer.run()?;
//! println!("best: {} ({:.4})", results[0].sequence, results[0].fitness);
//! # Ok(())
//! # }
//! ```

pub mod codon;
pub mod config;
pub mod engine;
pub mod error;
pub mod featurize;
pub mod io;
pub mod stats;
pub mod types;

pub use config::OptimizationConfig;
pub use engine::{
    ChannelProgress, ConsoleProgress, GenerationUpdate, NullProgress, Optimizer, ProgressCallback,
};
pub use error::{CodonforgeError, Result};
pub use types::{
    FeatureKey, FrequencyProfile, Individual, KmerCounts, KmerMap, OptimizationResult, StopReason,
};

use rayon::prelude::*;

use crate::error::Result;
use crate::stats::kmers::{kmer_counts, kmer_frequencies, kmer_frequencies_from_seq, kmers};
use crate::types::{FeatureKey, FrequencyProfile, KmerCounts};

/// Featurizes a single sequence into a frequency profile.
pub fn featurize_sequence(seq: &str, keys: &[FeatureKey]) -> Result<FrequencyProfile> {
    Ok(kmer_frequencies_from_seq(seq, keys)?.into_iter().collect())
}

/// Featurizes a collection of sequences into one aggregated profile.
///
/// Counts are accumulated per feature key across all sequences and
/// normalized once at the end, so short sequences are weighted by their
/// k-mer counts rather than averaged per file.
pub fn featurize_collection(seqs: &[String], keys: &[FeatureKey]) -> Result<FrequencyProfile> {
    let mut profile = FrequencyProfile::new();
    for &key in keys {
        let per_seq: Vec<KmerCounts> = seqs
            .par_iter()
            .map(|seq| kmer_counts(&kmers(seq, key.k(), key.overlap())?))
            .collect::<Result<Vec<_>>>()?;

        let merged = per_seq.into_iter().fold(KmerCounts::new(), merge_counts);
        profile.insert(key, kmer_frequencies(&merged, false)?);
    }
    Ok(profile)
}

fn merge_counts(mut acc: KmerCounts, extra: KmerCounts) -> KmerCounts {
    for (kmer, count) in extra {
        *acc.entry(kmer).or_insert(0) += count;
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn featurize_sequence_matches_direct_computation() {
        let profile = featurize_sequence("GATTACA", &[FeatureKey::Kmer(2)]).unwrap();
        let map = profile.get(&FeatureKey::Kmer(2)).unwrap();
        assert_eq!(map.len(), 5);
        assert!((map["GA"] - 1.0 / 6.0).abs() < 1e-12);
        assert!((map["AT"] - 1.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn collection_counts_are_pooled_before_normalizing() {
        let seqs = vec!["ATG".to_string(), "GGG".to_string()];
        let profile = featurize_collection(&seqs, &[FeatureKey::Kmer(1)]).unwrap();
        let map = profile.get(&FeatureKey::Kmer(1)).unwrap();

        // 6 bases total: one A, one T, four G.
        assert!((map["A"] - 1.0 / 6.0).abs() < 1e-12);
        assert!((map["T"] - 1.0 / 6.0).abs() < 1e-12);
        assert!((map["G"] - 4.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn collection_featurizes_codons_without_overlap() {
        let seqs = vec!["ATGAAA".to_string(), "ATGCCC".to_string()];
        let profile = featurize_collection(&seqs, &[FeatureKey::Codons]).unwrap();
        let map = profile.get(&FeatureKey::Codons).unwrap();

        assert!((map["ATG"] - 0.5).abs() < 1e-12);
        assert!((map["AAA"] - 0.25).abs() < 1e-12);
        assert!((map["CCC"] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn collection_propagates_empty_sequence_errors() {
        let seqs = vec!["ATG".to_string(), String::new()];
        assert!(featurize_collection(&seqs, &[FeatureKey::Kmer(1)]).is_err());
    }
}

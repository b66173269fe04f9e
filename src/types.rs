use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{CodonforgeError, Result};

/// Sparse k-mer -> frequency (or weight) vector.
pub type KmerMap = HashMap<String, f64>;

/// Raw k-mer occurrence counts.
pub type KmerCounts = HashMap<String, u32>;

/// Tolerance for the sum-to-one check on frequency maps.
pub const SUM_TOLERANCE: f64 = 1e-9;

/// Key of one entry in a frequency profile.
///
/// `Kmer(3)` and `Codons` share a key length but are different statistics:
/// overlapping 3-mers slide one base at a time, codons are the
/// non-overlapping reading-frame triplets. Keeping them as distinct
/// variants prevents the two from being silently conflated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FeatureKey {
    Kmer(usize),
    Codons,
}

impl FeatureKey {
    /// Window length used to extract this feature.
    pub fn k(&self) -> usize {
        match self {
            FeatureKey::Kmer(k) => *k,
            FeatureKey::Codons => 3,
        }
    }

    /// Whether extraction slides one symbol at a time.
    pub fn overlap(&self) -> bool {
        matches!(self, FeatureKey::Kmer(_))
    }
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureKey::Kmer(k) => write!(f, "{}", k),
            FeatureKey::Codons => write!(f, "codons"),
        }
    }
}

impl FromStr for FeatureKey {
    type Err = CodonforgeError;

    fn from_str(s: &str) -> Result<Self> {
        if s == "codons" {
            return Ok(FeatureKey::Codons);
        }
        match s.parse::<usize>() {
            Ok(k) if k >= 1 => Ok(FeatureKey::Kmer(k)),
            _ => Err(CodonforgeError::Validation(format!(
                "Target key {:?} is neither a positive integer nor \"codons\".",
                s
            ))),
        }
    }
}

impl TryFrom<String> for FeatureKey {
    type Error = CodonforgeError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<FeatureKey> for String {
    fn from(key: FeatureKey) -> String {
        key.to_string()
    }
}

/// A set of target frequency maps keyed by [`FeatureKey`], serialized with
/// the plain string keys (`"1"`, `"2"`, ..., `"codons"`) the file formats
/// use.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrequencyProfile(BTreeMap<FeatureKey, KmerMap>);

impl FrequencyProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a profile from string-keyed maps, e.g. straight out of a
    /// deserialized document.
    pub fn from_named_maps(maps: HashMap<String, KmerMap>) -> Result<Self> {
        maps.into_iter()
            .map(|(key, map)| Ok((key.parse::<FeatureKey>()?, map)))
            .collect()
    }

    pub fn insert(&mut self, key: FeatureKey, map: KmerMap) -> Option<KmerMap> {
        self.0.insert(key, map)
    }

    pub fn get(&self, key: &FeatureKey) -> Option<&KmerMap> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FeatureKey, &KmerMap)> {
        self.0.iter()
    }

    pub fn feature_keys(&self) -> Vec<FeatureKey> {
        self.0.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Checks the profile invariants: no k=3/codons conflict, every key the
    /// declared length, every map summing to one.
    pub fn validate(&self) -> Result<()> {
        if self.0.contains_key(&FeatureKey::Kmer(3)) && self.0.contains_key(&FeatureKey::Codons) {
            return Err(CodonforgeError::Validation(
                "A profile cannot target both k=3 and codons: overlapping 3-mers and \
                 reading-frame codons are different statistics."
                    .to_string(),
            ));
        }

        for (key, map) in &self.0 {
            if map.is_empty() {
                return Err(CodonforgeError::Validation(format!(
                    "Frequencies for k={} are empty.",
                    key
                )));
            }
            for kmer in map.keys() {
                if kmer.len() != key.k() {
                    return Err(CodonforgeError::Validation(format!(
                        "Key {} for k={} is of length {}, expected {}.",
                        kmer,
                        key,
                        kmer.len(),
                        key.k()
                    )));
                }
            }
            let sum: f64 = map.values().sum();
            if (sum - 1.0).abs() > SUM_TOLERANCE {
                return Err(CodonforgeError::Validation(format!(
                    "Values for k={} sum to {}, not 1.",
                    key, sum
                )));
            }
        }
        Ok(())
    }

    /// Flattens all per-k maps into one sparse vector. Keys from different
    /// k-levels have different lengths and never collide ([`validate`]
    /// rules out the k=3/codons overlap).
    ///
    /// [`validate`]: FrequencyProfile::validate
    pub fn flatten(&self) -> KmerMap {
        let mut flat = KmerMap::new();
        for map in self.0.values() {
            flat.extend(map.iter().map(|(kmer, &value)| (kmer.clone(), value)));
        }
        flat
    }
}

impl FromIterator<(FeatureKey, KmerMap)> for FrequencyProfile {
    fn from_iter<I: IntoIterator<Item = (FeatureKey, KmerMap)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One candidate DNA sequence with its fitness.
#[derive(Debug, Clone)]
pub struct Individual {
    pub sequence: String,
    pub fitness: f64,
}

/// Why an optimization run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// No strict fitness improvement for more than the configured number of
    /// generations.
    Converged,
    /// The generation cap was hit first.
    MaxGenerationsReached,
    /// The cancellation handle was triggered.
    Cancelled,
}

/// Best individual of one population run.
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    pub sequence: String,
    pub fitness: f64,
    pub generations: usize,
    pub elapsed: Duration,
    pub stop_reason: StopReason,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, f64)]) -> KmerMap {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn feature_key_parses_ints_and_codons() {
        assert_eq!("1".parse::<FeatureKey>().unwrap(), FeatureKey::Kmer(1));
        assert_eq!("12".parse::<FeatureKey>().unwrap(), FeatureKey::Kmer(12));
        assert_eq!("codons".parse::<FeatureKey>().unwrap(), FeatureKey::Codons);
        assert!("0".parse::<FeatureKey>().is_err());
        assert!("-1".parse::<FeatureKey>().is_err());
        assert!("kmers".parse::<FeatureKey>().is_err());
    }

    #[test]
    fn feature_key_orders_kmers_before_codons() {
        let mut keys = vec![FeatureKey::Codons, FeatureKey::Kmer(2), FeatureKey::Kmer(1)];
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec![FeatureKey::Kmer(1), FeatureKey::Kmer(2), FeatureKey::Codons]
        );
    }

    #[test]
    fn profiles_build_from_plain_string_keyed_maps() {
        let mut maps = HashMap::new();
        maps.insert("2".to_string(), map(&[("AT", 1.0)]));
        maps.insert("codons".to_string(), map(&[("ATG", 1.0)]));

        let profile = FrequencyProfile::from_named_maps(maps).unwrap();
        assert_eq!(
            profile.feature_keys(),
            vec![FeatureKey::Kmer(2), FeatureKey::Codons]
        );

        let mut bad = HashMap::new();
        bad.insert("zero".to_string(), map(&[("A", 1.0)]));
        assert!(FrequencyProfile::from_named_maps(bad).is_err());
    }

    #[test]
    fn profile_round_trips_through_json() {
        let mut profile = FrequencyProfile::new();
        profile.insert(FeatureKey::Kmer(1), map(&[("A", 0.5), ("T", 0.5)]));
        profile.insert(FeatureKey::Codons, map(&[("ATG", 1.0)]));

        let json = serde_json::to_string(&profile).unwrap();
        assert!(json.contains("\"codons\""));
        assert!(json.contains("\"1\""));

        let back: FrequencyProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), 2);
        assert_eq!(back.get(&FeatureKey::Codons).unwrap()["ATG"], 1.0);
    }

    #[test]
    fn profile_rejects_unknown_keys_on_deserialize() {
        let result = serde_json::from_str::<FrequencyProfile>(r#"{"kmers": {"A": 1.0}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn validate_rejects_conflicting_codon_keys() {
        let mut profile = FrequencyProfile::new();
        profile.insert(FeatureKey::Kmer(3), map(&[("ATG", 1.0)]));
        profile.insert(FeatureKey::Codons, map(&[("ATG", 1.0)]));
        assert!(matches!(
            profile.validate(),
            Err(CodonforgeError::Validation(_))
        ));
    }

    #[test]
    fn validate_rejects_bad_sums() {
        let mut profile = FrequencyProfile::new();
        profile.insert(FeatureKey::Kmer(1), map(&[("A", 1.0), ("T", 1.0)]));
        let err = profile.validate().unwrap_err();
        assert!(err.to_string().contains("sum to 2"));
    }

    #[test]
    fn validate_rejects_mismatched_key_lengths() {
        let mut profile = FrequencyProfile::new();
        profile.insert(FeatureKey::Kmer(2), map(&[("AT", 0.5), ("G", 0.5)]));
        assert!(profile.validate().is_err());
    }

    #[test]
    fn validate_accepts_sums_within_tolerance() {
        let mut profile = FrequencyProfile::new();
        profile.insert(
            FeatureKey::Kmer(1),
            map(&[("A", 0.1), ("T", 0.2), ("G", 0.3), ("C", 0.4)]),
        );
        profile.validate().unwrap();
    }

    #[test]
    fn flatten_merges_all_levels() {
        let mut profile = FrequencyProfile::new();
        profile.insert(FeatureKey::Kmer(1), map(&[("A", 0.5), ("T", 0.5)]));
        profile.insert(FeatureKey::Kmer(2), map(&[("AT", 1.0)]));
        let flat = profile.flatten();
        assert_eq!(flat.len(), 3);
        assert_eq!(flat["AT"], 1.0);
    }
}

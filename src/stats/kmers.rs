use std::collections::{BTreeMap, HashMap};

use crate::error::{CodonforgeError, Result};
use crate::types::{FeatureKey, KmerCounts, KmerMap};

/// Extracts every length-`k` substring of `seq`, in order.
///
/// With `overlap` the window advances one symbol at a time and yields
/// `seq.len() - k + 1` k-mers; without it the window advances `k` symbols
/// and any trailing remainder shorter than `k` is dropped. A sequence
/// shorter than `k` yields no k-mers; an empty sequence or `k == 0` is
/// rejected.
pub fn kmers(seq: &str, k: usize, overlap: bool) -> Result<Vec<String>> {
    if k < 1 {
        return Err(CodonforgeError::InvalidArgument(
            "k value >= 1 is required".to_string(),
        ));
    }
    if seq.is_empty() {
        return Err(CodonforgeError::InvalidArgument(
            "cannot extract k-mers from an empty sequence".to_string(),
        ));
    }

    let bytes = seq.as_bytes();
    if bytes.len() < k {
        return Ok(Vec::new());
    }

    let stride = if overlap { 1 } else { k };
    let mut result = Vec::with_capacity((bytes.len() - k) / stride + 1);
    let mut i = 0;
    while i + k <= bytes.len() {
        result.push(String::from_utf8_lossy(&bytes[i..i + k]).into_owned());
        i += stride;
    }
    Ok(result)
}

/// Counts occurrences of each distinct k-mer. Every element must have the
/// same length as the first; an empty list is an empty map.
pub fn kmer_counts(kmers: &[String]) -> Result<KmerCounts> {
    let k = kmers.first().map_or(0, |first| first.len());

    let mut counts = KmerCounts::new();
    for kmer in kmers {
        if kmer.len() != k {
            return Err(CodonforgeError::LengthMismatch {
                expected: k,
                kmer: kmer.clone(),
                actual: kmer.len(),
            });
        }
        *counts.entry(kmer.clone()).or_insert(0) += 1;
    }
    Ok(counts)
}

/// Normalizes a count (or weight) map into frequencies summing to one.
///
/// The validating path re-checks that every key has the same length and
/// maps empty input to an empty map. Passing `validate = false` skips the
/// length scan; the fitness loop takes this path because its input comes
/// straight out of [`kmers`] and is already uniform. Callers on the fast
/// path are responsible for that precondition themselves.
pub fn kmer_frequencies<V>(counts: &HashMap<String, V>, validate: bool) -> Result<KmerMap>
where
    V: Into<f64> + Copy,
{
    if validate {
        if counts.is_empty() {
            return Ok(KmerMap::new());
        }
        uniform_length_check(counts.keys())?;
    }

    let total: f64 = counts.values().map(|&v| v.into()).sum();
    Ok(counts
        .iter()
        .map(|(kmer, &v)| (kmer.clone(), v.into() / total))
        .collect())
}

/// Featurizes one sequence for each requested key in a single call.
/// `Codons` extracts non-overlapping reading-frame triplets; everything
/// else uses the sliding window.
pub fn kmer_frequencies_from_seq(
    seq: &str,
    keys: &[FeatureKey],
) -> Result<BTreeMap<FeatureKey, KmerMap>> {
    let mut result = BTreeMap::new();
    for &key in keys {
        let extracted = kmers(seq, key.k(), key.overlap())?;
        let counts = kmer_counts(&extracted)?;
        result.insert(key, kmer_frequencies(&counts, false)?);
    }
    Ok(result)
}

fn uniform_length_check<'a, I>(keys: I) -> Result<()>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut iter = keys.into_iter();
    let k = match iter.next() {
        Some(first) => first.len(),
        None => return Ok(()),
    };
    for kmer in iter {
        if kmer.len() != k {
            return Err(CodonforgeError::LengthMismatch {
                expected: k,
                kmer: kmer.clone(),
                actual: kmer.len(),
            });
        }
    }
    Ok(())
}

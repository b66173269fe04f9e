use std::collections::HashSet;

use crate::types::KmerMap;

/// Euclidean distance between two sparse vectors keyed by k-mer. The key
/// sets need not match: a key missing from one map contributes its full
/// weight from the other.
pub fn euclidean(map1: &KmerMap, map2: &KmerMap) -> f64 {
    let mut seen = HashSet::with_capacity(map1.len());
    let mut sum = 0.0;

    for (key, value) in map1 {
        seen.insert(key.as_str());
        let other = map2.get(key).copied().unwrap_or(0.0);
        sum += (value - other) * (value - other);
    }
    for (key, value) in map2 {
        if !seen.contains(key.as_str()) {
            sum += value * value;
        }
    }

    sum.sqrt()
}

/// L2 norm of a single sparse vector, i.e. its distance to the zero vector.
pub fn norm(map: &KmerMap) -> f64 {
    map.values().map(|v| v * v).sum::<f64>().sqrt()
}

/// Cosine similarity of two sparse vectors. When either vector is all-zero
/// the division by zero yields NaN; that is deliberate and must be handled
/// by the caller, not papered over here.
pub fn cosine(map1: &KmerMap, map2: &KmerMap) -> f64 {
    let mut dot = 0.0;
    for (key, value) in map1 {
        dot += value * map2.get(key).copied().unwrap_or(0.0);
    }
    dot / (norm(map1) * norm(map2))
}

//! Empirical order-0 Shannon entropy

use rustc_hash::FxHashMap;

use crate::Symbol;

/// Entropy of `sequence` in bits per symbol.
///
/// Returns 0.0 for an empty sequence.
pub fn entropy(sequence: &[Symbol]) -> f64 {
    if sequence.is_empty() {
        return 0.0;
    }

    let mut counts: FxHashMap<Symbol, u32> = FxHashMap::default();
    for &symbol in sequence {
        *counts.entry(symbol).or_insert(0) += 1;
    }

    let n = sequence.len() as f64;
    counts
        .values()
        .map(|&count| {
            let count = count as f64;
            // p * log2(1/p), never negative zero
            (count / n) * (n / count).log2()
        })
        .sum()
}

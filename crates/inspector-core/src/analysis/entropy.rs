//! Shannon entropy over byte histograms.

/// Computes the Shannon entropy of `data` in bits per byte.
///
/// The result lies in `0.0..=8.0`: a buffer of one repeated byte scores 0,
/// a buffer using all 256 byte values equally often scores exactly 8. An
/// empty buffer scores 0.
///
/// # Examples
///
/// ```
/// use inspector_core::analysis::shannon_entropy;
///
/// assert_eq!(shannon_entropy(&[0u8; 64]), 0.0);
/// assert_eq!(shannon_entropy(b"abab"), 1.0);
/// ```
#[must_use]
pub fn shannon_entropy(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }

    let mut counts = [0u64; 256];
    for &byte in data {
        counts[usize::from(byte)] += 1;
    }

    let total = data.len() as f64;
    let entropy = counts
        .iter()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let p = count as f64 / total;
            p * p.log2()
        })
        .sum::<f64>();

    // keeps a single-symbol buffer at +0.0 rather than -0.0
    0.0 - entropy
}

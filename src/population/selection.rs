//! Fitness-proportionate (roulette wheel) selection.

use rand::Rng;

/// Draws an index with probability proportional to its weight.
///
/// Negative and NaN weights count as zero. When no weight is positive the
/// draw is degenerate and index 0 is returned.
///
/// # Panics
/// Panics if `weights` is empty.
///
/// # Complexity
/// O(n) per draw (linear scan)
pub fn proportionate<R: Rng>(weights: &[f64], rng: &mut R) -> usize {
    assert!(!weights.is_empty(), "cannot select from an empty set");

    let clamp = |w: f64| if w > 0.0 { w } else { 0.0 };
    let total: f64 = weights.iter().copied().map(clamp).sum();
    if total <= 0.0 || !total.is_finite() {
        return 0;
    }

    let threshold = rng.random_range(0.0..total);
    let mut cumulative = 0.0;
    let mut last_positive = 0;
    for (i, &w) in weights.iter().enumerate() {
        let w = clamp(w);
        if w == 0.0 {
            continue;
        }
        cumulative += w;
        last_positive = i;
        if cumulative > threshold {
            return i;
        }
    }

    last_positive // floating-point fallback
}

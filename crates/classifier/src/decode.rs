//! Turning raw logits into ranked probabilities.

/// Numerically stable softmax. Returns an empty vector for empty input.
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let Some(max) = logits.iter().copied().reduce(f32::max) else {
        return Vec::new();
    };
    let exps: Vec<f32> = logits.iter().map(|&l| (l - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Class indices ordered by descending probability.
///
/// The sort is stable, so equal probabilities keep the lower index first.
pub fn rank(probabilities: &[f32]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..probabilities.len()).collect();
    order.sort_by(|&a, &b| probabilities[b].total_cmp(&probabilities[a]));
    order
}

/// The first `min(k, n)` entries of [`rank`].
pub fn top_k(probabilities: &[f32], k: usize) -> Vec<usize> {
    let mut order = rank(probabilities);
    order.truncate(k);
    order
}

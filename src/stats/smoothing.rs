use crate::core::InstanceCount;

/// Pseudo-count mass of the uniform prior in every m-estimate.
pub const M: f64 = 1.0;

/// m-estimate of P(X = x) from `count` observations of x among `total`,
/// where X ranges over `num_values` values.
///
/// Always finite and strictly positive, even for zero counts, and
/// converges to the empirical frequency as `total` grows.
#[inline]
pub fn m_estimate(count: InstanceCount, total: InstanceCount, num_values: usize) -> f64 {
    (count as f64 + M / num_values as f64) / (total as f64 + M)
}

/// m-estimate with an arbitrary prior probability in place of the uniform
/// 1/num_values.
#[inline]
pub fn empirical_m_estimate(count: InstanceCount, total: InstanceCount, prior: f64) -> f64 {
    (count as f64 + M * prior) / (total as f64 + M)
}

/// Leave-one-out m-estimate: when the estimate is for the held-out
/// instance's own class, one observation is discounted from both the count
/// and the total, so every training instance can be scored against the
/// statistics of all the others without a second pass.
#[inline]
pub fn m_estimate_loocv(
    count: InstanceCount,
    total: InstanceCount,
    num_values: usize,
    is_true_class: bool,
) -> f64 {
    if is_true_class {
        m_estimate(count.saturating_sub(1), total.saturating_sub(1), num_values)
    } else {
        m_estimate(count, total.saturating_sub(1), num_values)
    }
}

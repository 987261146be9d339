/// Scales `v` in place so it sums to 1.
///
/// When the sum is zero or non-finite (all-zero evidence, or an underflow
/// despite pre-scaling) the result is the uniform distribution rather than
/// a vector of NaNs.
pub fn normalise(v: &mut [f64]) {
    if v.is_empty() {
        return;
    }
    let total: f64 = v.iter().sum();
    if total > 0.0 && total.is_finite() {
        for x in v.iter_mut() {
            *x /= total;
        }
    } else {
        let uniform = 1.0 / v.len() as f64;
        v.fill(uniform);
    }
}

pub fn sum(v: &[f64]) -> f64 {
    v.iter().sum()
}

pub fn mean(v: &[f64]) -> f64 {
    sum(v) / v.len() as f64
}

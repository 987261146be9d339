//! Information-theoretic measures computed from raw (unsmoothed) counts,
//! plus the multi-class Matthews correlation coefficient.

use crate::core::InstanceCount;
use crate::stats::{AttrClassDist, Crosstab, PairClassDist};

/// Mutual information I(X; C) between each attribute and the class,
/// in bits, from raw joint frequencies. Zero-count terms are skipped
/// (0 log 0 := 0).
pub fn mutual_information(dist: &AttrClassDist) -> Vec<f64> {
    let total = dist.total() as f64;
    let schema = dist.schema().clone();

    (0..dist.num_attributes())
        .map(|a| {
            let mut mi = 0.0;
            for v in 0..schema.num_values(a) {
                for y in 0..dist.num_classes() {
                    let avy = dist.count(a, v, y);
                    if avy > 0 {
                        let av = dist.value_count(a, v) as f64;
                        let cy = dist.class_count(y) as f64;
                        mi += (avy as f64 / total)
                            * (avy as f64 / (av / total * cy)).log2();
                    }
                }
            }
            mi
        })
        .collect()
}

/// Class-conditional mutual information I(X1; X2 | C) for every attribute
/// pair, in bits, from raw joint frequencies. The result is symmetric and
/// non-negative up to floating-point imprecision.
pub fn conditional_mutual_information(dist: &PairClassDist) -> Crosstab<f64> {
    let xy = dist.attr_counts();
    let total = xy.total() as f64;
    let schema = dist.schema().clone();
    let mut cmi = Crosstab::new(dist.num_attributes());

    for x1 in 1..dist.num_attributes() {
        for x2 in 0..x1 {
            let mut m = 0.0;
            for v1 in 0..schema.num_values(x1) {
                for v2 in 0..schema.num_values(x2) {
                    for y in 0..dist.num_classes() {
                        let x1x2y = dist.count(x1, v1, x2, v2, y);
                        if x1x2y > 0 {
                            let x1y = xy.count(x1, v1, y) as f64;
                            let x2y = xy.count(x2, v2, y) as f64;
                            m += (x1x2y as f64 / total)
                                * (xy.class_count(y) as f64 * x1x2y as f64 / (x1y * x2y)).log2();
                        }
                    }
                }
            }

            // CMI is non-negative; tolerate floating-point noise only
            debug_assert!(m >= -1e-8, "negative conditional mutual information: {m}");

            cmi.set(x1, x2, m);
            cmi.set(x2, x1, m);
        }
    }

    cmi
}

/// Multi-class Matthews correlation coefficient of a confusion matrix
/// (rows = true class, columns = predicted class), via the
/// trace/covariance generalization. Returns 0 when either covariance term
/// is zero.
pub fn matthews_correlation(xtab: &Crosstab<InstanceCount>) -> f64 {
    let dim = xtab.dim();

    let mut n = 0.0;
    let mut trace = 0.0;
    for k in 0..dim {
        trace += xtab.get(k, k) as f64;
        for l in 0..dim {
            n += xtab.get(k, l) as f64;
        }
    }

    let row_dot_col = |k: usize, l: usize| -> f64 {
        (0..dim).map(|i| xtab.get(k, i) as f64 * xtab.get(i, l) as f64).sum()
    };
    let row_dot_row = |k: usize, l: usize| -> f64 {
        (0..dim).map(|i| xtab.get(k, i) as f64 * xtab.get(l, i) as f64).sum()
    };
    let col_dot_col = |k: usize, l: usize| -> f64 {
        (0..dim).map(|i| xtab.get(i, k) as f64 * xtab.get(i, l) as f64).sum()
    };

    let mut rowcol = 0.0;
    let mut rowrow = 0.0;
    let mut colcol = 0.0;
    for k in 0..dim {
        for l in 0..dim {
            rowcol += row_dot_col(k, l);
            rowrow += row_dot_row(k, l);
            colcol += col_dot_col(k, l);
        }
    }

    let cov_xy = n * trace - rowcol;
    let cov_xx = n * n - rowrow;
    let cov_yy = n * n - colcol;
    let denominator = (cov_xx * cov_yy).sqrt();

    if denominator > 0.0 { cov_xy / denominator } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::core::Instance;
    use crate::testing::dummies::{
        binary_pair_schema, scenario_instances, three_attribute_schema,
    };

    #[test]
    fn test_mutual_information_of_identical_attribute_and_class() {
        // attribute 0 equals the class, attribute 1 is constant
        let schema = Arc::new(binary_pair_schema());
        let mut dist = AttrClassDist::new(schema);
        for &y in &[0, 0, 1, 1] {
            dist.update(&Instance::new(vec![y, 0], y));
        }
        let mi = mutual_information(&dist);
        assert!((mi[0] - 1.0).abs() < 1e-9, "I(X;C) of a copy of C is 1 bit, got {}", mi[0]);
        assert!(mi[1].abs() < 1e-9, "constant attribute carries no information");
    }

    #[test]
    fn test_cmi_non_negative_and_symmetric() {
        let schema = Arc::new(three_attribute_schema());
        let mut dist = PairClassDist::new(schema);
        for inst in scenario_instances() {
            let widened = Instance::new(
                vec![inst.value(0), inst.value(1), (inst.value(0) + inst.value(1)) % 2],
                inst.class(),
            );
            dist.update(&widened);
        }
        let cmi = conditional_mutual_information(&dist);
        for x1 in 0..3 {
            for x2 in 0..3 {
                if x1 != x2 {
                    assert!(cmi.get(x1, x2) >= -1e-8);
                    assert_eq!(cmi.get(x1, x2), cmi.get(x2, x1));
                }
            }
        }
    }

    #[test]
    fn test_mcc_perfect_and_inverted_predictions() {
        let mut perfect = Crosstab::<InstanceCount>::new(2);
        perfect.add(0, 0, 10);
        perfect.add(1, 1, 10);
        assert!((matthews_correlation(&perfect) - 1.0).abs() < 1e-12);

        let mut inverted = Crosstab::<InstanceCount>::new(2);
        inverted.add(0, 1, 10);
        inverted.add(1, 0, 10);
        assert!((matthews_correlation(&inverted) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_mcc_degenerate_matrix_is_zero() {
        // every prediction lands in one column: cov_yy == 0
        let mut xtab = Crosstab::<InstanceCount>::new(3);
        xtab.add(0, 0, 4);
        xtab.add(1, 0, 2);
        xtab.add(2, 0, 1);
        assert_eq!(matthews_correlation(&xtab), 0.0);
    }
}

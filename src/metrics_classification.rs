//! Common metrics for performance evaluation of a binary classifier
//!
//! Scoring is essential to compare classifiers trained from different multiplier sets. This
//! module computes accuracy, the ROC curve and the precision-recall curve from real-valued
//! decision scores and `-1`/`+1` ground truth labels, together with the area under both curves.
use std::cmp::Ordering;
use std::fmt;

use ndarray::prelude::*;
use ndarray::Data;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::dataset::{check_labels, check_len};
use crate::display::PrintOptions;
use crate::error::{Error, Result};
use crate::Float;

/// Integration using the trapezoidal rule.
fn trapezoidal<A: Float>(vals: &[(A, A)]) -> A {
    let mut prev_x = vals[0].0;
    let mut prev_y = vals[0].1;
    let mut integral = A::zero();

    for (x, y) in vals.iter().skip(1) {
        integral += (*x - prev_x) * (prev_y + *y) / A::cast(2.0);
        prev_x = *x;
        prev_y = *y;
    }
    integral
}

/// Cumulative counts at every distinct threshold
///
/// Scores are visited in descending order. For each distinct score the number of true positives
/// and false positives among all samples scored at least as high is recorded.
struct ThresholdCounts<A> {
    tps_fps: Vec<(A, A)>,
    thresholds: Vec<A>,
    positives: A,
    negatives: A,
}

fn threshold_counts<A: Float, D: Data<Elem = A>, E: Data<Elem = A>>(
    scores: &ArrayBase<D, Ix1>,
    labels: &ArrayBase<E, Ix1>,
) -> Result<ThresholdCounts<A>> {
    check_len("scores", labels.len(), scores.len())?;
    check_labels(labels)?;
    if scores.iter().any(|x| x.is_nan()) {
        return Err(Error::Parameters("scores contain NaN".to_string()));
    }

    let positives = labels.iter().filter(|x| **x > A::zero()).count();
    let negatives = labels.len() - positives;
    if positives == 0 || negatives == 0 {
        return Err(Error::SingleClass);
    }

    let mut tuples = scores
        .iter()
        .zip(labels.iter())
        .map(|(s, l)| (*s, *l > A::zero()))
        .collect::<Vec<(A, bool)>>();

    tuples.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

    let (mut tp, mut fp) = (A::zero(), A::zero());
    let mut tps_fps = Vec::new();
    let mut thresholds = Vec::new();

    for (i, (s, t)) in tuples.iter().enumerate() {
        if *t {
            tp += A::one();
        } else {
            fp += A::one();
        }

        // close the group once the next score differs
        let last_of_group = tuples.get(i + 1).map(|next| next.0 != *s).unwrap_or(true);
        if last_of_group {
            tps_fps.push((tp, fp));
            thresholds.push(*s);
        }
    }

    Ok(ThresholdCounts {
        tps_fps,
        thresholds,
        positives: A::cast(positives),
        negatives: A::cast(negatives),
    })
}

/// Receiver operating characteristic
///
/// The curve consists of `(false positive rate, true positive rate)` points, starting in the
/// origin. The i-th threshold belongs to the (i+1)-th point of the curve, as the origin
/// corresponds to a threshold above the largest score.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiverOperatingCharacteristic<A> {
    curve: Vec<(A, A)>,
    thresholds: Vec<A>,
}

impl<A: Float> ReceiverOperatingCharacteristic<A> {
    pub fn get_curve(&self) -> Vec<(A, A)> {
        self.curve.clone()
    }

    pub fn get_thresholds(&self) -> Vec<A> {
        self.thresholds.clone()
    }

    pub fn area_under_curve(&self) -> A {
        trapezoidal(&self.curve)
    }
}

/// Precision-recall curve
///
/// The curve consists of `(recall, precision)` points with increasing recall, starting with
/// the point `(0, 1)`. Points are recorded up to the first threshold at which every positive
/// sample is recovered. The i-th threshold belongs to the (i+1)-th point of the curve.
#[derive(Debug, Clone, PartialEq)]
pub struct PrecisionRecallCurve<A> {
    curve: Vec<(A, A)>,
    thresholds: Vec<A>,
}

impl<A: Float> PrecisionRecallCurve<A> {
    pub fn get_curve(&self) -> Vec<(A, A)> {
        self.curve.clone()
    }

    pub fn get_thresholds(&self) -> Vec<A> {
        self.thresholds.clone()
    }

    /// Integrates precision over recall with the trapezoidal rule
    pub fn area_under_curve(&self) -> A {
        trapezoidal(&self.curve)
    }
}

/// Binary classification metrics computed from decision scores
///
/// The implementing array contains the decision scores, the argument the `-1`/`+1` ground
/// truth. A positive score predicts the positive class, a negative score the negative class and
/// a score of exactly zero predicts neither.
pub trait BinaryClassification<A> {
    /// Fraction of labels equal to the sign of the score
    fn accuracy<E: Data<Elem = A>>(&self, labels: &ArrayBase<E, Ix1>) -> Result<A>;

    /// The ROC curve gives insight about the separability of a binary classification task.
    /// Fails if only one class is present.
    fn roc<E: Data<Elem = A>>(
        &self,
        labels: &ArrayBase<E, Ix1>,
    ) -> Result<ReceiverOperatingCharacteristic<A>>;

    /// Precision and recall for every distinct threshold. Fails if only one class is present.
    fn precision_recall<E: Data<Elem = A>>(
        &self,
        labels: &ArrayBase<E, Ix1>,
    ) -> Result<PrecisionRecallCurve<A>>;
}

impl<A: Float, D: Data<Elem = A>> BinaryClassification<A> for ArrayBase<D, Ix1> {
    fn accuracy<E: Data<Elem = A>>(&self, labels: &ArrayBase<E, Ix1>) -> Result<A> {
        check_len("scores", labels.len(), self.len())?;
        check_labels(labels)?;
        if labels.is_empty() {
            return Err(Error::NotEnoughSamples);
        }

        let correct = self
            .iter()
            .zip(labels.iter())
            .filter(|(s, l)| s.sign() == **l)
            .count();

        Ok(A::cast(correct) / A::cast(labels.len()))
    }

    fn roc<E: Data<Elem = A>>(
        &self,
        labels: &ArrayBase<E, Ix1>,
    ) -> Result<ReceiverOperatingCharacteristic<A>> {
        let counts = threshold_counts(self, labels)?;

        let mut curve = Vec::with_capacity(counts.tps_fps.len() + 1);
        curve.push((A::zero(), A::zero()));
        curve.extend(
            counts
                .tps_fps
                .iter()
                .map(|(tp, fp)| (*fp / counts.negatives, *tp / counts.positives)),
        );

        Ok(ReceiverOperatingCharacteristic {
            curve,
            thresholds: counts.thresholds,
        })
    }

    fn precision_recall<E: Data<Elem = A>>(
        &self,
        labels: &ArrayBase<E, Ix1>,
    ) -> Result<PrecisionRecallCurve<A>> {
        let counts = threshold_counts(self, labels)?;

        // stop once full recall is attained, later points add no area
        let last = counts
            .tps_fps
            .iter()
            .position(|(tp, _)| *tp == counts.positives)
            .unwrap_or(counts.tps_fps.len() - 1);

        let mut curve = Vec::with_capacity(last + 2);
        curve.push((A::zero(), A::one()));
        curve.extend(
            counts.tps_fps[..=last]
                .iter()
                .map(|(tp, fp)| (*tp / counts.positives, *tp / (*tp + *fp))),
        );

        Ok(PrecisionRecallCurve {
            curve,
            thresholds: counts.thresholds[..=last].to_vec(),
        })
    }
}

/// Accuracy, ROC area-under-curve and precision-recall area-under-curve of a classifier
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryMetrics<A> {
    pub accuracy: A,
    pub auroc: A,
    pub auprc: A,
}

impl<A: Float> BinaryMetrics<A> {
    /// Format the metrics with the given print options
    pub fn format_with(&self, options: &PrintOptions) -> String {
        format!(
            "accuracy {}, AUROC {}, AUPRC {}",
            options.format_value(self.accuracy),
            options.format_value(self.auroc),
            options.format_value(self.auprc)
        )
    }
}

impl<A: Float> fmt::Display for BinaryMetrics<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_with(&PrintOptions::default()))
    }
}

/// Computes accuracy, AUROC and AUPRC from ground truth labels and decision scores
///
/// Fails with [`Error::SingleClass`] if the labels contain only one class, because neither
/// curve is defined in that case.
pub fn evaluate_metrics<A: Float, D: Data<Elem = A>, E: Data<Elem = A>>(
    labels: &ArrayBase<D, Ix1>,
    scores: &ArrayBase<E, Ix1>,
) -> Result<BinaryMetrics<A>> {
    let accuracy = scores.accuracy(labels)?;
    let auroc = scores.roc(labels)?.area_under_curve();
    let auprc = scores.precision_recall(labels)?.area_under_curve();

    tracing::debug!(
        "evaluated {} scores: accuracy {}, auroc {}, auprc {}",
        scores.len(),
        accuracy,
        auroc,
        auprc
    );

    Ok(BinaryMetrics {
        accuracy,
        auroc,
        auprc,
    })
}

#[cfg(test)]
mod tests {
    use super::{evaluate_metrics, BinaryClassification};
    use crate::error::Error;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array1};
    use ndarray_rand::rand::{Rng, SeedableRng};
    use rand_xoshiro::Xoshiro256Plus;

    #[test]
    fn perfect_separation() {
        let labels = array![1., 1., -1., -1.];
        let scores = array![2., 1., -1., -2.];

        let metrics = evaluate_metrics(&labels, &scores).unwrap();
        assert_abs_diff_eq!(metrics.accuracy, 1.0);
        assert_abs_diff_eq!(metrics.auroc, 1.0);
        assert_abs_diff_eq!(metrics.auprc, 1.0);
    }

    #[test]
    fn zero_score_is_never_correct() {
        let labels = array![1., -1., 1., -1.];
        let scores = array![0., -1., 3., 0.];

        assert_abs_diff_eq!(scores.accuracy(&labels).unwrap(), 0.5);
    }

    #[test]
    fn test_roc_curve() {
        let scores = array![0.1, 0.3, 0.5, 0.7, 0.8, 0.9];
        let labels = array![-1., 1., -1., 1., 1., 1.];

        let result = vec![
            (0.0, 0.0),
            (0.0, 0.25),
            (0.0, 0.5),
            (0.0, 0.75),
            (0.5, 0.75),
            (0.5, 1.0),
            (1.0, 1.0),
        ];

        let roc = scores.roc(&labels).unwrap();
        assert_eq!(roc.get_curve(), result);
        assert_eq!(roc.get_thresholds(), vec![0.9, 0.8, 0.7, 0.5, 0.3, 0.1]);
        assert_abs_diff_eq!(roc.area_under_curve(), 0.875);
    }

    #[test]
    fn roc_groups_tied_scores() {
        let scores = array![0.5, 0.5, 0.5, 0.5];
        let labels = array![1., -1., 1., -1.];

        let roc = scores.roc(&labels).unwrap();
        assert_eq!(roc.get_curve(), vec![(0.0, 0.0), (1.0, 1.0)]);
        assert_abs_diff_eq!(roc.area_under_curve(), 0.5);
    }

    #[test]
    fn test_precision_recall_curve() {
        let scores = array![0.9, 0.8, 0.7, 0.6, 0.5];
        let labels = array![1., -1., 1., -1., -1.];

        let prc = scores.precision_recall(&labels).unwrap();
        // stops at 0.7 where both positives are recovered
        assert_eq!(
            prc.get_curve(),
            vec![(0.0, 1.0), (0.5, 1.0), (0.5, 0.5), (1.0, 2.0 / 3.0)]
        );
        assert_eq!(prc.get_thresholds(), vec![0.9, 0.8, 0.7]);
        assert_abs_diff_eq!(
            prc.area_under_curve(),
            0.5 + 0.5 * (0.5 + 2.0 / 3.0) / 2.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn single_class_is_an_error() {
        let labels = array![1., 1., 1.];
        let scores = array![0.2, -0.3, 1.0];

        assert!(matches!(
            evaluate_metrics(&labels, &scores),
            Err(Error::SingleClass)
        ));
        assert!(matches!(scores.roc(&labels), Err(Error::SingleClass)));
        assert!(matches!(
            scores.precision_recall(&labels),
            Err(Error::SingleClass)
        ));
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let labels = array![1., -1., 1.];
        let scores = array![0.2, -0.3];

        assert!(matches!(
            evaluate_metrics(&labels, &scores),
            Err(Error::MismatchedLength { .. })
        ));
    }

    #[test]
    fn random_scores_have_auroc_near_half() {
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        let scores: Array1<f64> = Array1::linspace(-1.0, 1.0, 2000);
        let labels = scores.mapv(|_| if rng.gen_bool(0.5) { 1.0 } else { -1.0 });

        let roc = scores.roc(&labels).unwrap();
        assert!((roc.area_under_curve() - 0.5).abs() < 0.05);
    }

    #[test]
    fn inverted_scores_have_zero_auroc() {
        let labels = array![1., 1., -1., -1.];
        let scores = array![-2., -1., 1., 2.];

        let metrics = evaluate_metrics(&labels, &scores).unwrap();
        assert_abs_diff_eq!(metrics.accuracy, 0.0);
        assert_abs_diff_eq!(metrics.auroc, 0.0);
        assert_abs_diff_eq!(
            metrics.auprc,
            0.5 * (1.0 / 3.0) / 2.0 + 0.5 * (1.0 / 3.0 + 0.5) / 2.0,
            epsilon = 1e-12
        );
    }
}

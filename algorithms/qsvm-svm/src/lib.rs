//! # Support vector classifiers with given multipliers
//!
//! A support vector classifier separates two classes with a hyperplane in the feature space of a
//! kernel. In its dual form the classifier is fully described by one multiplier `alpha_n` per
//! training sample, the samples and labels themselves, a kernel and the offset `b`:
//!
//! ```text
//! f(x) = sum_n alpha_n * y_n * k(x_n, x) + b
//! ```
//!
//! Samples with `alpha_n > 0` are the support vectors. This crate does not solve for the
//! multipliers, they are produced elsewhere, for example decoded from the bit string an annealer
//! returned (see `qsvm-codec`). What remains is:
//!
//! * evaluating the [decision function](decision_function) for arbitrary query points,
//! * estimating the [offset](estimate_offset) `b` from the multipliers,
//! * measuring the quality of the resulting [`Classifier`] on a labelled dataset.
//!
//! ## Offset estimation
//!
//! Multipliers found by an annealer are quantized and often sit at the bounds `0` or `C` of the
//! box constraint. Averaging over the remaining margin support vectors can then place the
//! hyperplane poorly, so a second strategy searches the offsets which flip a single prediction
//! and keeps the one classifying most support vectors correctly. See [`OffsetStrategy`].
//!
//! ## Example
//!
//! ```
//! use ndarray::array;
//! use qsvm::ParamGuard;
//! use qsvm_kernel::{KernelFamily, KernelMethod, KernelSelector};
//! use qsvm_svm::{Classifier, OffsetParams, OffsetStrategy};
//!
//! let kernel = KernelFamily::single(KernelMethod::Linear).unwrap();
//! let support = array![[0.0, 2.0], [1.0, 1.0], [2.0, 0.0], [3.0, -1.0]];
//! let labels = array![1.0, 1.0, -1.0, -1.0];
//! let alpha = array![0.0, 0.5, 0.5, 0.0];
//!
//! let params = OffsetParams::new(1.0)
//!     .strategy(OffsetStrategy::CandidateSearch)
//!     .check()
//!     .unwrap();
//!
//! let classifier = Classifier::new(alpha, support, labels, KernelSelector::DEFAULT)
//!     .unwrap()
//!     .fit_offset(&kernel, &params)
//!     .unwrap();
//!
//! let prediction = classifier.predict(&kernel, array![[-1.0, 3.0]].view()).unwrap();
//! assert_eq!(prediction, array![1.0]);
//! ```
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use std::fmt;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use qsvm::dataset::check_labels;
use qsvm::display::PrintOptions;
use qsvm::metrics::{evaluate_metrics, BinaryMetrics};
use qsvm::{Dataset, Float};
use qsvm_kernel::{KernelProvider, KernelSelector};

mod decision;
pub mod error;
mod hyperparams;
mod offset;

pub use decision::decision_function;
pub use error::{Result, SvmError};
pub use hyperparams::{OffsetParams, OffsetStrategy, OffsetValidParams};
pub use offset::estimate_offset;

use decision::check_support;

/// Support vector classifier in dual form
///
/// Bundles the multipliers, the support vectors with their labels, the kernel selector and the
/// offset. The kernel itself is not stored, every evaluation takes a [`KernelProvider`] which is
/// asked for the kernel addressed by the selector.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct Classifier<F> {
    alpha: Array1<F>,
    support: Array2<F>,
    labels: Array1<F>,
    selector: KernelSelector,
    bias: F,
}

impl<F: Float> Classifier<F> {
    /// Create a classifier with zero offset
    ///
    /// Fails if the lengths of `alpha`, `support` and `labels` differ, if a label is not `-1` or
    /// `+1`, or if a multiplier is negative or not finite.
    pub fn new(
        alpha: Array1<F>,
        support: Array2<F>,
        labels: Array1<F>,
        selector: KernelSelector,
    ) -> Result<Self> {
        check_support(alpha.view(), support.view(), labels.view())?;
        check_labels(&labels)?;

        if let Some((index, value)) = alpha
            .iter()
            .enumerate()
            .find(|(_, a)| !a.is_finite() || **a < F::zero())
        {
            return Err(SvmError::InvalidMultiplier {
                index,
                value: value.to_f64().unwrap_or(f64::NAN),
            });
        }

        Ok(Classifier {
            alpha,
            support,
            labels,
            selector,
            bias: F::zero(),
        })
    }

    /// Replace the offset
    pub fn with_bias(mut self, bias: F) -> Self {
        self.bias = bias;
        self
    }

    pub fn alpha(&self) -> ArrayView1<F> {
        self.alpha.view()
    }

    pub fn support(&self) -> ArrayView2<F> {
        self.support.view()
    }

    pub fn labels(&self) -> ArrayView1<F> {
        self.labels.view()
    }

    pub fn selector(&self) -> KernelSelector {
        self.selector
    }

    pub fn bias(&self) -> F {
        self.bias
    }

    /// Returns the number of support vectors
    ///
    /// Only multipliers noticeably larger than zero are counted.
    pub fn nsupport(&self) -> usize {
        self.alpha
            .iter()
            // around 1e-5 for f32 and 2e-14 for f64
            .filter(|x| x.abs() > F::cast(100.) * F::epsilon())
            .count()
    }

    /// Scores of the query points, see [`decision_function`]
    pub fn decision_function<K: KernelProvider<F>>(
        &self,
        kernel: &K,
        query: ArrayView2<F>,
    ) -> Result<Array1<F>> {
        decision_function(
            kernel,
            query,
            self.alpha.view(),
            self.support.view(),
            self.labels.view(),
            self.selector,
            self.bias,
        )
    }

    /// Predicted classes of the query points
    ///
    /// Points on the hyperplane are predicted as `0`.
    pub fn predict<K: KernelProvider<F>>(
        &self,
        kernel: &K,
        query: ArrayView2<F>,
    ) -> Result<Array1<F>> {
        Ok(self.decision_function(kernel, query)?.mapv(|x| x.sign()))
    }

    /// Estimate the offset from the multipliers, see [`estimate_offset`]
    ///
    /// The current offset plays no role in the estimation.
    pub fn estimate_offset<K: KernelProvider<F>>(
        &self,
        kernel: &K,
        params: &OffsetValidParams<F>,
    ) -> Result<F> {
        estimate_offset(
            kernel,
            self.alpha.view(),
            self.support.view(),
            self.labels.view(),
            self.selector,
            params,
        )
    }

    /// Estimate the offset and return the classifier using it
    pub fn fit_offset<K: KernelProvider<F>>(
        self,
        kernel: &K,
        params: &OffsetValidParams<F>,
    ) -> Result<Self> {
        let bias = self.estimate_offset(kernel, params)?;

        Ok(self.with_bias(bias))
    }

    /// Accuracy, AUROC and AUPRC on a labelled dataset
    pub fn evaluate<K: KernelProvider<F>>(
        &self,
        kernel: &K,
        dataset: &Dataset<F>,
    ) -> Result<BinaryMetrics<F>> {
        let scores = self.decision_function(kernel, dataset.records())?;
        let metrics = evaluate_metrics(&dataset.targets(), &scores)?;

        Ok(metrics)
    }

    /// Format multipliers and offset with the given print options
    pub fn format_with(&self, options: &PrintOptions) -> String {
        format!(
            "{} support vectors of {} samples, kernel {}, bias {}\nalpha {}",
            self.nsupport(),
            self.alpha.len(),
            self.selector,
            options.format_value(self.bias),
            options.format_array(&self.alpha)
        )
    }
}

impl<F: Float> fmt::Display for Classifier<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_with(&PrintOptions::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::{Classifier, OffsetParams, OffsetStrategy, SvmError};
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array1, Array2, ArrayView2};
    use qsvm::display::PrintOptions;
    use qsvm::{Dataset, ParamGuard};
    use qsvm_kernel::{KernelError, KernelFamily, KernelMethod, KernelSelector};

    // samples are indices into a fixed kernel matrix
    fn fixed(
        xn: ArrayView2<f64>,
        xm: ArrayView2<f64>,
        _: KernelSelector,
    ) -> Result<Array2<f64>, KernelError> {
        let gram = array![[1., 0., -0.2], [0., 1., 0.2], [-0.2, 0.2, -0.2]];

        Ok(Array2::from_shape_fn((xn.nrows(), xm.nrows()), |(i, j)| {
            gram[(xn[(i, 0)] as usize, xm[(j, 0)] as usize)]
        }))
    }

    fn worked_example() -> Classifier<f64> {
        Classifier::new(
            array![0., 0., 5.],
            array![[0.], [1.], [2.]],
            array![-1., 1., 1.],
            KernelSelector::DEFAULT,
        )
        .unwrap()
    }

    #[test]
    fn worked_offset_example() {
        let classifier = worked_example();

        let cross = classifier
            .decision_function(&fixed, classifier.support())
            .unwrap();
        assert_abs_diff_eq!(cross, array![-1., 1., -1.], epsilon = 1e-12);

        for strategy in &[OffsetStrategy::Averaging, OffsetStrategy::CandidateSearch] {
            let params = OffsetParams::new(10.).strategy(*strategy).check().unwrap();
            let b = classifier.estimate_offset(&fixed, &params).unwrap();
            // weight 25 on the last sample only, b = 1 - (-1)
            assert_abs_diff_eq!(b, 2.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn rejects_invalid_multipliers() {
        let res = Classifier::new(
            array![0.5, -0.1],
            array![[0.], [1.]],
            array![1., -1.],
            KernelSelector::DEFAULT,
        );
        assert!(matches!(
            res,
            Err(SvmError::InvalidMultiplier { index: 1, .. })
        ));

        let res = Classifier::new(
            array![0.5, f64::NAN],
            array![[0.], [1.]],
            array![1., -1.],
            KernelSelector::DEFAULT,
        );
        assert!(matches!(
            res,
            Err(SvmError::InvalidMultiplier { index: 1, .. })
        ));

        let res = Classifier::new(
            array![0.5, 0.5],
            array![[0.], [1.]],
            array![1., 0.],
            KernelSelector::DEFAULT,
        );
        assert!(matches!(res, Err(SvmError::BaseCrate(_))));

        let res = Classifier::new(
            array![0.5, 0.5, 0.5],
            array![[0.], [1.]],
            array![1., -1.],
            KernelSelector::DEFAULT,
        );
        assert!(matches!(res, Err(SvmError::BaseCrate(_))));
    }

    #[test]
    fn counts_support_vectors() {
        let classifier = Classifier::new(
            array![0., 1e-20, 0.3, 10.],
            Array2::zeros((4, 2)),
            array![1., 1., -1., -1.],
            KernelSelector::new(2),
        )
        .unwrap();

        assert_eq!(classifier.nsupport(), 2);
    }

    #[test]
    fn saturated_classifier_is_degenerate() {
        let kernel = KernelFamily::single(KernelMethod::Linear).unwrap();
        let classifier = Classifier::new(
            array![0., 2., 2.],
            array![[1., 0.], [0., 1.], [1., 1.]],
            array![1., -1., 1.],
            KernelSelector::DEFAULT,
        )
        .unwrap();
        let params = OffsetParams::new(2.).check().unwrap();

        assert!(matches!(
            classifier.fit_offset(&kernel, &params),
            Err(SvmError::NoSupportVectors)
        ));
    }

    #[test]
    fn separable_data_is_classified() {
        let kernel = KernelFamily::new(vec![KernelMethod::Gaussian(1.0), KernelMethod::Linear])
            .unwrap();
        let support = array![[0.0, 2.0], [1.0, 1.0], [2.0, 0.0], [3.0, -1.0]];
        let labels = array![1.0, 1.0, -1.0, -1.0];
        let params = OffsetParams::new(1.)
            .strategy(OffsetStrategy::CandidateSearch)
            .check()
            .unwrap();

        let classifier = Classifier::new(
            array![0.0, 0.5, 0.5, 0.0],
            support.clone(),
            labels.clone(),
            KernelSelector::new(1),
        )
        .unwrap()
        .fit_offset(&kernel, &params)
        .unwrap();

        let predictions = classifier.predict(&kernel, support.view()).unwrap();
        assert_eq!(predictions, labels);

        let dataset = Dataset::new(support, labels).unwrap();
        let metrics = classifier.evaluate(&kernel, &dataset).unwrap();
        assert_abs_diff_eq!(metrics.accuracy, 1.0);
        assert_abs_diff_eq!(metrics.auroc, 1.0);
        assert_abs_diff_eq!(metrics.auprc, 1.0);
    }

    #[test]
    fn single_class_evaluation_fails() {
        let kernel = KernelFamily::single(KernelMethod::Linear).unwrap();
        let classifier = worked_example().with_bias(0.5);
        let dataset = Dataset::new(array![[1.], [2.]], Array1::ones(2)).unwrap();

        assert!(matches!(
            classifier.evaluate(&kernel, &dataset),
            Err(SvmError::BaseCrate(qsvm::Error::SingleClass))
        ));
    }

    #[test]
    fn prints_with_options() {
        let classifier = worked_example().with_bias(0.123456);

        assert_eq!(
            classifier.to_string(),
            "1 support vectors of 3 samples, kernel -1, bias 0.1235\nalpha [0.0000, 0.0000, 5.0000]"
        );
        assert_eq!(
            classifier.format_with(&PrintOptions::default().precision(1)),
            "1 support vectors of 3 samples, kernel -1, bias 0.1\nalpha [0.0, 0.0, 5.0]"
        );
    }
}

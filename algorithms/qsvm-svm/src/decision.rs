use ndarray::{Array1, ArrayView1, ArrayView2};
use qsvm::dataset::check_len;
use qsvm::Float;
use qsvm_kernel::{KernelProvider, KernelSelector};

use crate::error::{Result, SvmError};

/// Check that multipliers, support vectors and labels describe the same samples
pub(crate) fn check_support<F: Float>(
    alpha: ArrayView1<F>,
    support: ArrayView2<F>,
    labels: ArrayView1<F>,
) -> Result<()> {
    check_len("support vectors", alpha.len(), support.nrows())?;
    check_len("labels", alpha.len(), labels.len())?;

    Ok(())
}

/// Evaluates the decision function for every row of `query`
///
/// For a query point `x` the score is `sum_n alpha_n * y_n * k(x_n, x) + bias`, where `x_n` and
/// `y_n` are the support vectors and their labels. The kernel provider is called exactly once,
/// with the support vectors as left and the query points as right argument, and the resulting
/// `support x query` matrix is reduced along the support axis.
///
/// The sign of a score is the predicted class, its magnitude the distance to the separating
/// hyperplane in feature space.
///
/// Fails on mismatched lengths of `alpha`, `support` and `labels`, on a feature count mismatch
/// between query and support vectors, and if the kernel provider fails.
pub fn decision_function<F: Float, K: KernelProvider<F>>(
    kernel: &K,
    query: ArrayView2<F>,
    alpha: ArrayView1<F>,
    support: ArrayView2<F>,
    labels: ArrayView1<F>,
    selector: KernelSelector,
    bias: F,
) -> Result<Array1<F>> {
    check_support(alpha, support, labels)?;
    if query.ncols() != support.ncols() {
        return Err(SvmError::FeatureMismatch {
            query: query.ncols(),
            support: support.ncols(),
        });
    }

    let kernel_matrix = kernel.kernel_matrix(support, query, selector)?;
    let expected = (support.nrows(), query.nrows());
    if kernel_matrix.dim() != expected {
        return Err(SvmError::KernelShape {
            expected,
            found: kernel_matrix.dim(),
        });
    }

    let weights = &alpha * &labels;

    Ok(weights.dot(&kernel_matrix) + bias)
}

use std::cmp::Ordering;

use ndarray::{Array1, ArrayView1, ArrayView2};
use qsvm::Float;
use qsvm_kernel::{KernelProvider, KernelSelector};

use crate::decision::decision_function;
use crate::error::{Result, SvmError};
use crate::hyperparams::{OffsetStrategy, OffsetValidParams};

/// Total weights below this magnitude count as "no margin support vectors" for the candidate search
const WEIGHT_TOLERANCE: f64 = 1e-8;

/// Estimates the offset (bias) of the separating hyperplane
///
/// Both strategies start from the unbiased decision values of the support vectors themselves,
/// `cross_n = sum_j alpha_j * y_j * k(x_j, x_n)`.
///
/// * [`OffsetStrategy::Averaging`] returns the average of `y_n - cross_n`, weighted by
///   `alpha_n * (C - alpha_n)`. The weight vanishes for multipliers at either end of the box
///   `[0, C]`, so only margin support vectors contribute.
/// * [`OffsetStrategy::CandidateSearch`] uses the average as first candidate, followed by the
///   negated midpoints between consecutive sorted decision values, closest to the average first.
///   It returns the first candidate with the highest number of correctly classified support
///   vectors.
///
/// Fails with [`SvmError::NoSupportVectors`] if the total weight vanishes, as the classifier
/// then carries no information about the position of its margin.
pub fn estimate_offset<F: Float, K: KernelProvider<F>>(
    kernel: &K,
    alpha: ArrayView1<F>,
    support: ArrayView2<F>,
    labels: ArrayView1<F>,
    selector: KernelSelector,
    params: &OffsetValidParams<F>,
) -> Result<F> {
    let cross = decision_function(
        kernel,
        support,
        alpha,
        support,
        labels,
        selector,
        F::zero(),
    )?;

    match params.strategy() {
        OffsetStrategy::Averaging => averaged_offset(alpha, labels, cross.view(), params.c()),
        OffsetStrategy::CandidateSearch => {
            searched_offset(alpha, labels, cross.view(), params.c())
        }
    }
}

/// Weights `alpha_n * (C - alpha_n)` and their weighted average of `y_n - cross_n`
fn weighted_average<F: Float>(
    alpha: ArrayView1<F>,
    labels: ArrayView1<F>,
    cross: ArrayView1<F>,
    c: F,
) -> (F, F) {
    let weights = alpha.mapv(|a| a * (c - a));
    let total = weights.sum();
    let residuals = &labels - &cross;

    ((&weights * &residuals).sum() / total, total)
}

pub(crate) fn averaged_offset<F: Float>(
    alpha: ArrayView1<F>,
    labels: ArrayView1<F>,
    cross: ArrayView1<F>,
    c: F,
) -> Result<F> {
    let (offset, total) = weighted_average(alpha, labels, cross, c);

    if total.is_zero() {
        tracing::warn!("no support vectors found, all multipliers are at the bounds 0 or {}", c);
        return Err(SvmError::NoSupportVectors);
    }

    tracing::debug!("averaged offset {} from total weight {}", offset, total);
    Ok(offset)
}

/// Number of samples whose label equals the sign of `cross + offset`
fn count_correct<F: Float>(labels: ArrayView1<F>, cross: ArrayView1<F>, offset: F) -> usize {
    labels
        .iter()
        .zip(cross.iter())
        .filter(|(y, f)| (**f + offset).sign() == **y)
        .count()
}

/// Candidate offsets, the average first
fn offset_candidates<F: Float>(average: F, cross: ArrayView1<F>) -> Vec<F> {
    let mut sorted = cross.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    // each value between two neighbouring decision values flips a prediction
    let mut midpoints = sorted
        .windows(2)
        .map(|pair| -(pair[0] + pair[1]) / F::cast(2.0))
        .collect::<Vec<_>>();
    midpoints.sort_by(|a, b| {
        (*a - average)
            .abs()
            .partial_cmp(&(*b - average).abs())
            .unwrap_or(Ordering::Equal)
    });

    let mut candidates = Vec::with_capacity(midpoints.len() + 1);
    candidates.push(average);
    candidates.extend(midpoints);
    candidates
}

pub(crate) fn searched_offset<F: Float>(
    alpha: ArrayView1<F>,
    labels: ArrayView1<F>,
    cross: ArrayView1<F>,
    c: F,
) -> Result<F> {
    let (average, total) = weighted_average(alpha, labels, cross, c);

    if total.abs() <= F::cast(WEIGHT_TOLERANCE) {
        tracing::warn!("no support vectors found, discarding this classifier");
        return Err(SvmError::NoSupportVectors);
    }

    let candidates = offset_candidates(average, cross);
    let counts = candidates
        .iter()
        .map(|b| count_correct(labels, cross, *b))
        .collect::<Array1<usize>>();

    // first maximum wins
    let mut best = 0;
    for (i, count) in counts.iter().enumerate() {
        if *count > counts[best] {
            best = i;
        }
    }

    tracing::debug!(
        "searched {} offset candidates, {} classifies {} of {} support vectors correctly (average {} classifies {})",
        candidates.len(),
        candidates[best],
        counts[best],
        labels.len(),
        average,
        counts[0]
    );

    Ok(candidates[best])
}

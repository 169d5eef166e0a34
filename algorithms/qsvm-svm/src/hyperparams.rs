use qsvm::{Float, ParamGuard};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::SvmError;

/// Algorithm used to estimate the offset of the separating hyperplane
///
/// See [`estimate_offset`](crate::estimate_offset) for a description of both strategies.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OffsetStrategy {
    /// Weighted average over the margin support vectors
    Averaging,
    /// Search the offset maximizing training accuracy, starting from the average
    CandidateSearch,
}

impl Default for OffsetStrategy {
    fn default() -> Self {
        OffsetStrategy::Averaging
    }
}

/// A verified hyper-parameter set for offset estimation
///
/// See [`OffsetParams`] for more information.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetValidParams<F> {
    c: F,
    strategy: OffsetStrategy,
}

impl<F: Float> OffsetValidParams<F> {
    /// The upper bound `C` of the multiplier box constraint
    pub fn c(&self) -> F {
        self.c
    }

    pub fn strategy(&self) -> OffsetStrategy {
        self.strategy
    }
}

/// Offset estimation hyperparameters
///
/// The regularization constant `C` bounds every multiplier, `0 <= alpha_n <= C`. Only
/// multipliers strictly inside this box carry information about the position of the margin, so
/// `C` is required to estimate the offset.
///
/// ## Example
///
/// ```
/// use qsvm::ParamGuard;
/// use qsvm_svm::{OffsetParams, OffsetStrategy};
///
/// let params = OffsetParams::new(10.0)
///     .strategy(OffsetStrategy::CandidateSearch)
///     .check()
///     .unwrap();
/// assert_eq!(params.c(), 10.0);
/// ```
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetParams<F>(OffsetValidParams<F>);

impl<F: Float> OffsetParams<F> {
    /// Create hyperparameters with regularization constant `c` and the averaging strategy
    pub fn new(c: F) -> Self {
        Self(OffsetValidParams {
            c,
            strategy: OffsetStrategy::default(),
        })
    }

    /// Set the regularization constant.
    ///
    /// `c` must be positive and finite
    pub fn c(mut self, c: F) -> Self {
        self.0.c = c;
        self
    }

    /// Set the estimation strategy.
    ///
    /// Defaults to [`OffsetStrategy::Averaging`] if not set
    pub fn strategy(mut self, strategy: OffsetStrategy) -> Self {
        self.0.strategy = strategy;
        self
    }
}

impl<F: Float> ParamGuard for OffsetParams<F> {
    type Checked = OffsetValidParams<F>;
    type Error = SvmError;

    fn check_ref(&self) -> Result<&Self::Checked, Self::Error> {
        if !self.0.c.is_finite() || self.0.c <= F::zero() {
            Err(SvmError::InvalidC(self.0.c.to_f64().unwrap_or(f64::NAN)))
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked, Self::Error> {
        self.check_ref()?;
        Ok(self.0)
    }
}

//! `qsvm` provides the building blocks to evaluate support vector classifiers whose dual
//! multipliers were found by a quadratic unconstrained binary optimizer, for example a quantum
//! annealer.
//!
//! ## The Big Picture
//!
//! The annealer only accepts binary variables. Multipliers are therefore written as sums of
//! positional weights selected by single bits (see `qsvm-codec`), and the bit strings returned
//! by the annealer are decoded back into real valued multipliers. A classifier built from those
//! multipliers (see `qsvm-svm`) is then evaluated with an arbitrary kernel (see `qsvm-kernel`).
//!
//! This base crate contains the pieces shared by all of them:
//!
//! * the [`Float`] bound for `f32` and `f64`,
//! * the labelled [`Dataset`],
//! * the common [`Error`](error::Error) type,
//! * the [`ParamGuard`] pattern used for every set of hyperparameters,
//! * binary classification [`metrics`],
//! * [`PrintOptions`](display::PrintOptions) for numeric output.

pub mod dataset;
pub mod display;
pub mod error;
mod metrics_classification;
mod param_guard;
pub mod prelude;

pub use dataset::{Dataset, Float};
pub use error::{Error, Result};
pub use param_guard::ParamGuard;

/// Common metrics functions for binary classification
pub mod metrics {
    pub use crate::metrics_classification::{
        evaluate_metrics, BinaryClassification, BinaryMetrics, PrecisionRecallCurve,
        ReceiverOperatingCharacteristic,
    };
}

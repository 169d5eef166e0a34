//! qsvm prelude.
//!
//! This module contains the most used types, type aliases, traits and
//! functions that you can import easily as a group.
//!

#[doc(no_inline)]
pub use crate::error::{Error, Result};

#[doc(no_inline)]
pub use crate::param_guard::ParamGuard;

#[doc(no_inline)]
pub use crate::dataset::{Dataset, Float};

#[doc(no_inline)]
pub use crate::display::PrintOptions;

#[doc(no_inline)]
pub use crate::metrics_classification::{evaluate_metrics, BinaryClassification, BinaryMetrics};

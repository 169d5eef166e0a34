//! Datasets
//!
//! This module implements the dataset struct holding a sample set together with its binary
//! labels, and the floating point bound shared by all crates of the workspace.
use ndarray::{Array1, Array2, ArrayBase, ArrayView1, ArrayView2, Data, Ix1, ScalarOperand};

use num_traits::{AsPrimitive, FromPrimitive, NumAssignOps, NumCast, Signed};
use rand::distributions::uniform::SampleUniform;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use std::cmp::PartialOrd;
use std::fmt;
use std::iter::Sum;
use std::ops::{AddAssign, DivAssign, MulAssign, SubAssign};

use crate::error::{Error, Result};

/// Floating point numbers
///
/// This trait bound multiplexes to the most common assumption of floating point number and
/// implement them for 32bit and 64bit floating points. They are used for samples, multipliers,
/// labels and decision scores alike.
pub trait Float:
    FromPrimitive
    + num_traits::Float
    + PartialOrd
    + Sync
    + Send
    + Default
    + fmt::Display
    + fmt::Debug
    + fmt::LowerExp
    + Signed
    + Sum
    + NumAssignOps
    + AsPrimitive<usize>
    + for<'a> AddAssign<&'a Self>
    + for<'a> MulAssign<&'a Self>
    + for<'a> SubAssign<&'a Self>
    + for<'a> DivAssign<&'a Self>
    + num_traits::MulAdd<Output = Self>
    + SampleUniform
    + ScalarOperand
    + approx::AbsDiffEq
{
    fn cast<T: NumCast>(x: T) -> Self {
        NumCast::from(x).unwrap()
    }

    /// Three-valued sign: `-1`, `0` or `+1`
    ///
    /// Unlike `signum` a zero (of either sign) maps to zero, so a score sitting exactly on the
    /// hyperplane is assigned to neither class. NaN stays NaN.
    fn sign(self) -> Self {
        if self > Self::zero() {
            Self::one()
        } else if self < Self::zero() {
            -Self::one()
        } else if self.is_nan() {
            self
        } else {
            Self::zero()
        }
    }
}

impl Float for f32 {}

impl Float for f64 {}

/// Returns `true` if `x` is one of the two class labels `-1` and `+1`
pub fn is_binary_label<F: Float>(x: F) -> bool {
    x == F::one() || x == -F::one()
}

/// Verify that every entry of `labels` is a class label
pub fn check_labels<F: Float, D: Data<Elem = F>>(labels: &ArrayBase<D, Ix1>) -> Result<()> {
    match labels.iter().find(|x| !is_binary_label(**x)) {
        Some(x) => Err(Error::InvalidLabel(x.to_f64().unwrap_or(f64::NAN))),
        None => Ok(()),
    }
}

/// Verify that an array has the expected number of entries
pub fn check_len(name: &'static str, expected: usize, found: usize) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(Error::MismatchedLength {
            name,
            expected,
            found,
        })
    }
}

/// A sample set with one binary label per sample
///
/// Records are stored row-wise, every row is a feature vector. Targets are `-1` or `+1` and
/// index-aligned with the rows. Both are immutable once the dataset is constructed.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset<F> {
    records: Array2<F>,
    targets: Array1<F>,
}

impl<F: Float> Dataset<F> {
    /// Create a new dataset from records and labels
    ///
    /// Fails if the number of labels differs from the number of rows or if a label is neither
    /// `-1` nor `+1`.
    pub fn new(records: Array2<F>, targets: Array1<F>) -> Result<Dataset<F>> {
        check_len("targets", records.nrows(), targets.len())?;
        check_labels(&targets)?;

        Ok(Dataset { records, targets })
    }

    pub fn records(&self) -> ArrayView2<F> {
        self.records.view()
    }

    pub fn targets(&self) -> ArrayView1<F> {
        self.targets.view()
    }

    pub fn nsamples(&self) -> usize {
        self.records.nrows()
    }

    pub fn nfeatures(&self) -> usize {
        self.records.ncols()
    }

    /// Number of samples in the positive class
    pub fn npositive(&self) -> usize {
        self.targets.iter().filter(|x| **x > F::zero()).count()
    }

    pub fn into_parts(self) -> (Array2<F>, Array1<F>) {
        (self.records, self.targets)
    }
}

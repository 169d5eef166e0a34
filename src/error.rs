//! Error types in qsvm
//!

use thiserror::Error;

use ndarray::ShapeError;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error("invalid parameter {0}")]
    Parameters(String),
    #[error("invalid ndarray shape {0}")]
    NdShape(#[from] ShapeError),
    #[error("mismatched lengths: {name} has {found} entries, expected {expected}")]
    MismatchedLength {
        name: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("labels must be -1 or +1, found {0}")]
    InvalidLabel(f64),
    #[error("only one class present in labels, the curve is undefined")]
    SingleClass,
    #[error("not enough samples")]
    NotEnoughSamples,
}

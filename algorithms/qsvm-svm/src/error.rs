use qsvm_kernel::KernelError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SvmError>;

#[derive(Error, Debug, Clone)]
pub enum SvmError {
    #[error("C should be positive and finite, but is {0}")]
    InvalidC(f64),
    #[error("multipliers should be non-negative and finite, found {value} at index {index}")]
    InvalidMultiplier { index: usize, value: f64 },
    #[error("query points have {query} features, support vectors have {support}")]
    FeatureMismatch { query: usize, support: usize },
    #[error("kernel matrix has shape {found:?}, expected {expected:?}")]
    KernelShape {
        expected: (usize, usize),
        found: (usize, usize),
    },
    #[error("no support vectors found, the classifier has no usable margin information")]
    NoSupportVectors,
    #[error(transparent)]
    Kernel(#[from] KernelError),
    #[error(transparent)]
    BaseCrate(#[from] qsvm::Error),
}

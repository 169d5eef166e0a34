use thiserror::Error;

use crate::KernelSelector;

pub type Result<T> = std::result::Result<T, KernelError>;

#[derive(Error, Debug, Clone)]
pub enum KernelError {
    #[error("no kernel registered for selector {0}")]
    UnknownSelector(KernelSelector),
    #[error("a kernel family needs at least one kernel method")]
    EmptyFamily,
    #[error("invalid kernel method: {0}")]
    InvalidMethod(String),
    #[error("samples have {left} features on the left and {right} on the right")]
    FeatureMismatch { left: usize, right: usize },
    #[error("kernel evaluation failed: {0}")]
    Evaluation(String),
    #[error(transparent)]
    BaseCrate(#[from] qsvm::Error),
}

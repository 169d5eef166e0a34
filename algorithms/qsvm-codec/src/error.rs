use thiserror::Error;

pub type Result<T> = std::result::Result<T, CodecError>;

#[derive(Error, Debug, Clone)]
pub enum CodecError {
    #[error("base should be at least 2, but is {0}")]
    InvalidBase(usize),
    #[error("number of digits should be in range [1, {max}], but is {found}")]
    InvalidDigits { found: usize, max: usize },
    #[error("weight {base}^{exponent} is not representable as a finite float")]
    WeightOverflow { base: usize, exponent: usize },
    #[error("binary string of length {len} does not split into groups of {digits} digits")]
    MalformedLength { len: usize, digits: usize },
    #[error("invalid binary digit {found:?} at position {position}")]
    InvalidDigit { position: usize, found: char },
    #[error("invalid bit {found} at position {position}, expected 0 or 1")]
    InvalidBit { position: usize, found: f64 },
    #[error("value at index {0} is not finite")]
    NonFiniteValue(usize),
    #[error(transparent)]
    BaseCrate(#[from] qsvm::Error),
}

use crate::error::CodecError;
use qsvm::ParamGuard;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// Largest supported number of digits per value
///
/// Encoding enumerates all `2^digits` digit combinations, this keeps the enumeration below
/// 17 million entries.
pub const MAX_DIGITS: usize = 24;

/// A verified hyper-parameter set ready to build a [`Quantizer`](crate::Quantizer)
///
/// See [`QuantizerParams`] for more information.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuantizerValidParams {
    pub(crate) base: usize,
    pub(crate) digits: usize,
}

impl QuantizerValidParams {
    /// The base `B` of the positional weights `B^0, ..., B^(K-1)`
    pub fn base(&self) -> usize {
        self.base
    }

    /// The number of binary digits `K` spent on every value
    pub fn digits(&self) -> usize {
        self.digits
    }
}

/// Quantization hyperparameters
///
/// A value is represented by `digits` binary digits. The k-th digit selects the weight
/// `base^k`, so a group of digits encodes the sum of the selected weights. Note that the digits
/// are binary selectors, not base-`base` digits: with `digits = K` there are `2^K` representable
/// values per scalar.
///
/// ## Example
///
/// ```
/// use qsvm::ParamGuard;
/// use qsvm_codec::QuantizerParams;
///
/// let params = QuantizerParams::new().base(2).digits(5).check().unwrap();
/// assert_eq!(params.base(), 2);
/// ```
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuantizerParams(pub(crate) QuantizerValidParams);

impl Default for QuantizerParams {
    fn default() -> Self {
        Self::new()
    }
}

impl QuantizerParams {
    /// Create hyper parameter set with base 10 and three digits per value
    pub fn new() -> Self {
        Self(QuantizerValidParams {
            base: 10,
            digits: 3,
        })
    }

    /// Set the base of the positional weights.
    ///
    /// Defaults to `10` if not set
    ///
    /// `base` must be at least `2`
    pub fn base(mut self, base: usize) -> Self {
        self.0.base = base;
        self
    }

    /// Set the number of binary digits per value.
    ///
    /// Defaults to `3` if not set
    ///
    /// `digits` must be between `1` and [`MAX_DIGITS`]
    pub fn digits(mut self, digits: usize) -> Self {
        self.0.digits = digits;
        self
    }
}

impl ParamGuard for QuantizerParams {
    type Checked = QuantizerValidParams;
    type Error = CodecError;

    fn check_ref(&self) -> Result<&Self::Checked, Self::Error> {
        if self.0.base < 2 {
            Err(CodecError::InvalidBase(self.0.base))
        } else if self.0.digits == 0 || self.0.digits > MAX_DIGITS {
            Err(CodecError::InvalidDigits {
                found: self.0.digits,
                max: MAX_DIGITS,
            })
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked, Self::Error> {
        self.check_ref()?;
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{QuantizerParams, MAX_DIGITS};
    use crate::error::CodecError;
    use qsvm::ParamGuard;

    #[test]
    fn defaults() {
        let params = QuantizerParams::default().check().unwrap();
        assert_eq!(params.base(), 10);
        assert_eq!(params.digits(), 3);
    }

    #[test]
    fn base_below_two_is_rejected() {
        for base in &[0, 1] {
            let res = QuantizerParams::new().base(*base).check();
            assert!(matches!(res, Err(CodecError::InvalidBase(b)) if b == *base));
        }
    }

    #[test]
    fn digit_count_is_bounded() {
        assert!(matches!(
            QuantizerParams::new().digits(0).check(),
            Err(CodecError::InvalidDigits { found: 0, .. })
        ));
        assert!(QuantizerParams::new().digits(MAX_DIGITS).check().is_ok());
        assert!(QuantizerParams::new().digits(MAX_DIGITS + 1).check().is_err());
    }
}

//! # Quantization codec
//!
//! Quadratic unconstrained binary optimizers, like quantum annealers, only handle binary
//! variables. To let them search for the multipliers of a support vector classifier every
//! multiplier is represented by `K` binary digits. Digit `k` selects the positional weight
//! `B^k`, the value of a group of digits is the sum of the selected weights.
//!
//! With `B = 10` and `K = 3` the digit string `"011"` stands for `0 * 1 + 1 * 10 + 1 * 100 = 110`
//! and the representable values are the `2^3 = 8` subset sums of `{1, 10, 100}`.
//!
//! Encoding picks, for every value independently, the digit combination whose value is closest.
//! Decoding an encoded sequence therefore projects each value onto the lattice of representable
//! values, and encoding such a projection again reproduces the same digits.
//!
//! ## Example
//!
//! ```
//! use ndarray::array;
//! use qsvm_codec::Quantizer;
//!
//! let quantizer = Quantizer::<f64>::with_base_digits(10, 3).unwrap();
//!
//! let binary = quantizer.encode(&array![123.4, 0.0, 999.9]).unwrap();
//! assert_eq!(binary, "111000111");
//!
//! let alpha = quantizer.decode(&binary).unwrap();
//! assert_eq!(alpha, array![111.0, 0.0, 111.0]);
//! ```
use ndarray::{Array1, ArrayBase, Data, Ix1};
use qsvm::Float;

pub mod error;
mod hyperparams;
mod quantizer;

pub use error::{CodecError, Result};
pub use hyperparams::{QuantizerParams, QuantizerValidParams, MAX_DIGITS};
pub use quantizer::Quantizer;

/// Encode values with base `base` and `digits` binary digits per value
///
/// Enumerates the lattice once for the whole call. Use a [`Quantizer`] to share the enumeration
/// between several calls.
pub fn encode<F: Float, D: Data<Elem = F>>(
    values: &ArrayBase<D, Ix1>,
    base: usize,
    digits: usize,
) -> Result<String> {
    Quantizer::with_base_digits(base, digits)?.encode(values)
}

/// Encode values and return the digits as numeric zeros and ones
pub fn encode_as_vec<F: Float, D: Data<Elem = F>>(
    values: &ArrayBase<D, Ix1>,
    base: usize,
    digits: usize,
) -> Result<Array1<F>> {
    Quantizer::with_base_digits(base, digits)?.encode_as_vec(values)
}

/// Decode a binary string produced with the same base and number of digits
pub fn decode<F: Float>(binary: &str, base: usize, digits: usize) -> Result<Array1<F>> {
    Quantizer::with_base_digits(base, digits)?.decode(binary)
}

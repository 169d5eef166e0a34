use ndarray::{Array1, Array2, ArrayBase, ArrayView1, Data, Ix1};
use qsvm::{Float, ParamGuard};

use crate::error::{CodecError, Result};
use crate::hyperparams::{QuantizerParams, QuantizerValidParams};

/// Fixed-width binary codec for continuous values
///
/// A quantizer owns the positional weights `W = [B^0, ..., B^(K-1)]` and the magnitudes of all
/// `2^K` digit combinations, the lattice. Combination `i` is written as the zero padded,
/// `K`-digit binary numeral of `i`; its k-th character selects `W[k]`. The lattice is enumerated
/// once on construction and shared by every encode call.
///
/// Encoding is separable: each value is mapped independently to the combination with the
/// closest magnitude, the lowest combination index winning ties.
#[derive(Debug, Clone, PartialEq)]
pub struct Quantizer<F> {
    params: QuantizerValidParams,
    weights: Array1<F>,
    lattice: Array1<F>,
}

impl<F: Float> Quantizer<F> {
    /// Default hyperparameters, base 10 with three digits
    pub fn params() -> QuantizerParams {
        QuantizerParams::new()
    }

    /// Build a quantizer from checked hyperparameters
    ///
    /// Fails if a weight or the largest lattice value overflows the float type.
    pub fn new(params: &QuantizerValidParams) -> Result<Self> {
        let base = F::cast(params.base());
        let weights = (0..params.digits())
            .map(|k| base.powi(k as i32))
            .collect::<Array1<F>>();

        if let Some(exponent) = weights.iter().position(|w| !w.is_finite()) {
            return Err(CodecError::WeightOverflow {
                base: params.base(),
                exponent,
            });
        }
        if !weights.sum().is_finite() {
            return Err(CodecError::WeightOverflow {
                base: params.base(),
                exponent: params.digits() - 1,
            });
        }

        let lattice = (0..1usize << params.digits())
            .map(|idx| combination_value(idx, &weights))
            .collect::<Array1<F>>();

        tracing::debug!(
            "enumerated {} lattice values for base {} with {} digits",
            lattice.len(),
            params.base(),
            params.digits()
        );

        Ok(Quantizer {
            params: *params,
            weights,
            lattice,
        })
    }

    /// Check the base and digit count and build a quantizer
    pub fn with_base_digits(base: usize, digits: usize) -> Result<Self> {
        let params = QuantizerParams::new().base(base).digits(digits).check()?;
        Self::new(&params)
    }

    pub fn base(&self) -> usize {
        self.params.base()
    }

    pub fn digits(&self) -> usize {
        self.params.digits()
    }

    /// The positional weights `B^0, ..., B^(K-1)`
    pub fn weights(&self) -> ArrayView1<F> {
        self.weights.view()
    }

    /// Magnitudes of all digit combinations in enumeration order
    pub fn lattice(&self) -> ArrayView1<F> {
        self.lattice.view()
    }

    /// Largest representable value, the sum of all weights
    pub fn max_value(&self) -> F {
        self.weights.sum()
    }

    /// Index of the first combination with minimal distance to `value`
    fn nearest(&self, value: F) -> usize {
        let mut best = 0;
        let mut best_dist = (self.lattice[0] - value).abs();

        for (idx, magnitude) in self.lattice.iter().enumerate().skip(1) {
            let dist = (*magnitude - value).abs();
            if dist < best_dist {
                best = idx;
                best_dist = dist;
            }
        }

        best
    }

    fn nearest_indices<D: Data<Elem = F>>(&self, values: &ArrayBase<D, Ix1>) -> Result<Vec<usize>> {
        values
            .iter()
            .enumerate()
            .map(|(i, value)| {
                if value.is_finite() {
                    Ok(self.nearest(*value))
                } else {
                    Err(CodecError::NonFiniteValue(i))
                }
            })
            .collect()
    }

    /// Encode values into a string of `len(values) * K` binary digits
    ///
    /// Values outside of `[0, max_value]` are clamped to the closest end of the lattice by the
    /// nearest-neighbour search. Fails on NaN or infinite values.
    pub fn encode<D: Data<Elem = F>>(&self, values: &ArrayBase<D, Ix1>) -> Result<String> {
        let digits = self.digits();
        let indices = self.nearest_indices(values)?;

        let mut binary = String::with_capacity(indices.len() * digits);
        for idx in indices {
            binary.push_str(&format!("{:0width$b}", idx, width = digits));
        }

        Ok(binary)
    }

    /// Same as [`encode`](Self::encode) but returns the digits as numeric zeros and ones
    pub fn encode_as_vec<D: Data<Elem = F>>(&self, values: &ArrayBase<D, Ix1>) -> Result<Array1<F>> {
        let binary = self.encode(values)?;

        Ok(binary
            .chars()
            .map(|c| if c == '1' { F::one() } else { F::zero() })
            .collect())
    }

    /// Decode a binary string into `len(binary) / K` values
    ///
    /// Fails if the string contains anything but `0` and `1`, or if its length is not a
    /// multiple of `K`.
    pub fn decode(&self, binary: &str) -> Result<Array1<F>> {
        let bits = binary
            .chars()
            .enumerate()
            .map(|(position, c)| match c {
                '0' => Ok(F::zero()),
                '1' => Ok(F::one()),
                found => Err(CodecError::InvalidDigit { position, found }),
            })
            .collect::<Result<Vec<F>>>()?;

        self.decode_bits(bits)
    }

    /// Decode numeric zeros and ones, as produced by [`encode_as_vec`](Self::encode_as_vec)
    pub fn decode_vec<D: Data<Elem = F>>(&self, bits: &ArrayBase<D, Ix1>) -> Result<Array1<F>> {
        let bits = bits
            .iter()
            .enumerate()
            .map(|(position, b)| {
                if *b == F::zero() || *b == F::one() {
                    Ok(*b)
                } else {
                    Err(CodecError::InvalidBit {
                        position,
                        found: b.to_f64().unwrap_or(f64::NAN),
                    })
                }
            })
            .collect::<Result<Vec<F>>>()?;

        self.decode_bits(bits)
    }

    fn decode_bits(&self, bits: Vec<F>) -> Result<Array1<F>> {
        let digits = self.digits();
        if bits.len() % digits != 0 {
            return Err(CodecError::MalformedLength {
                len: bits.len(),
                digits,
            });
        }

        let groups = Array2::from_shape_vec((bits.len() / digits, digits), bits)
            .map_err(qsvm::Error::from)?;

        Ok(groups.dot(&self.weights))
    }

    /// Nearest lattice value for every input, equal to decoding the encoded values
    pub fn project<D: Data<Elem = F>>(&self, values: &ArrayBase<D, Ix1>) -> Result<Array1<F>> {
        let indices = self.nearest_indices(values)?;

        Ok(indices.into_iter().map(|idx| self.lattice[idx]).collect())
    }
}

/// Magnitude of the digit combination with index `idx`
///
/// The first character of the binary numeral, the most significant bit of `idx`, selects the
/// smallest weight.
fn combination_value<F: Float>(idx: usize, weights: &Array1<F>) -> F {
    let digits = weights.len();

    weights
        .iter()
        .enumerate()
        .filter(|(k, _)| (idx >> (digits - 1 - k)) & 1 == 1)
        .map(|(_, w)| *w)
        .sum()
}

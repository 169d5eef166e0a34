//! Formatting of numeric output
//!
//! Arrays of multipliers, scores and metrics are printed with a fixed number of digits. The
//! options are passed explicitly to every formatting routine instead of living in process-wide
//! state.
use ndarray::{ArrayBase, Data, Ix1};
use std::fmt;

use crate::Float;

/// Options controlling how floating point values are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintOptions {
    /// Number of digits after the decimal point
    pub precision: usize,
    /// Never switch to scientific notation for very small or very large values
    pub suppress: bool,
}

impl Default for PrintOptions {
    fn default() -> Self {
        PrintOptions {
            precision: 4,
            suppress: true,
        }
    }
}

impl PrintOptions {
    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn suppress(mut self, suppress: bool) -> Self {
        self.suppress = suppress;
        self
    }

    fn use_scientific<F: Float>(&self, x: F) -> bool {
        if self.suppress || x.is_zero() || !x.is_finite() {
            return false;
        }
        let abs = x.abs();
        abs < F::cast(1e-4) || abs >= F::cast(1e16)
    }

    /// Format a single value
    pub fn format_value<F: Float>(&self, x: F) -> String {
        if self.use_scientific(x) {
            format!("{:.*e}", self.precision, x)
        } else {
            format!("{:.*}", self.precision, x)
        }
    }

    /// Format a one-dimensional array as `[a, b, c]`
    pub fn format_array<F: Float, D: Data<Elem = F>>(&self, arr: &ArrayBase<D, Ix1>) -> String {
        let items = arr
            .iter()
            .map(|x| self.format_value(*x))
            .collect::<Vec<_>>();

        format!("[{}]", items.join(", "))
    }

    /// Wraps a value so that it can be used with `{}` in format strings
    pub fn display<F: Float>(&self, x: F) -> Formatted<F> {
        Formatted {
            value: x,
            options: *self,
        }
    }
}

/// A value bundled with its print options
pub struct Formatted<F> {
    value: F,
    options: PrintOptions,
}

impl<F: Float> fmt::Display for Formatted<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.options.format_value(self.value))
    }
}

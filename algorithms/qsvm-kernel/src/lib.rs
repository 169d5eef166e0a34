//! ## Kernel providers
//!
//! The decision function of a support vector classifier only touches the samples through a
//! kernel, a similarity measure between two points. Here a kernel is consumed through the
//! [`KernelProvider`] trait: given two sample sets of shape `A x D` and `B x D` and a
//! [`KernelSelector`], it returns the `A x B` matrix of kernel values.
//!
//! The selector chooses a kernel *family*, it is an opaque index and not a continuous
//! hyperparameter. Every closure with the right signature is a provider, and
//! [`KernelFamily`] maps selectors onto a list of [`KernelMethod`]s:
//!
//! ```
//! use ndarray::array;
//! use qsvm_kernel::{KernelFamily, KernelMethod, KernelProvider, KernelSelector};
//!
//! let family = KernelFamily::new(vec![KernelMethod::Linear, KernelMethod::Gaussian(2.0)]).unwrap();
//! let x = array![[1.0, 0.0], [0.0, 1.0]];
//!
//! let gram = family
//!     .kernel_matrix(x.view(), x.view(), KernelSelector::new(0))
//!     .unwrap();
//! assert_eq!(gram, array![[1.0, 0.0], [0.0, 1.0]]);
//! ```
use ndarray::prelude::*;
use ndarray::Data;
use std::fmt;
use std::ops::Mul;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use qsvm::Float;

pub mod error;

pub use error::{KernelError, Result};

/// Opaque selector of a kernel family
///
/// Providers decide what a selector means. The value `-1`, also the default, asks for the
/// provider's default kernel.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KernelSelector(i64);

impl KernelSelector {
    /// Selects the default kernel of a provider
    pub const DEFAULT: KernelSelector = KernelSelector(-1);

    pub fn new(index: i64) -> Self {
        KernelSelector(index)
    }

    pub fn index(&self) -> i64 {
        self.0
    }
}

impl Default for KernelSelector {
    fn default() -> Self {
        KernelSelector::DEFAULT
    }
}

impl From<i64> for KernelSelector {
    fn from(index: i64) -> Self {
        KernelSelector(index)
    }
}

impl fmt::Display for KernelSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Source of kernel matrices
///
/// `kernel_matrix(xn, xm, selector)` returns the matrix `K` with `K[(i, j)] = k(xn_i, xm_j)`,
/// one row per sample in `xn` and one column per sample in `xm`.
pub trait KernelProvider<F: Float> {
    fn kernel_matrix(
        &self,
        xn: ArrayView2<F>,
        xm: ArrayView2<F>,
        selector: KernelSelector,
    ) -> Result<Array2<F>>;
}

impl<F, Func> KernelProvider<F> for Func
where
    F: Float,
    Func: Fn(ArrayView2<F>, ArrayView2<F>, KernelSelector) -> Result<Array2<F>>,
{
    fn kernel_matrix(
        &self,
        xn: ArrayView2<F>,
        xm: ArrayView2<F>,
        selector: KernelSelector,
    ) -> Result<Array2<F>> {
        self(xn, xm, selector)
    }
}

/// The inner product definition used by a kernel.
///
/// There are three methods available:
///
/// - Gaussian(eps):  `d(x, x') = exp(-norm(x - x')/eps) `
/// - Linear: `d(x, x') = <x, x'>`
/// - Polynomial(constant, degree):  `d(x, x') = (<x, x'> + costant)^(degree)`
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Copy, Clone, PartialOrd, PartialEq)]
pub enum KernelMethod<F> {
    /// Gaussian(eps): exp(-norm(x - x')/eps)
    Gaussian(F),
    /// Euclidean inner product
    Linear,
    /// Polynomial(constant, degree):  ` (<x, x'> + costant)^(degree)`
    Polynomial(F, F),
}

impl<F: Float> KernelMethod<F> {
    pub fn distance(&self, a: ArrayView1<F>, b: ArrayView1<F>) -> F {
        match *self {
            KernelMethod::Gaussian(eps) => {
                let distance = a
                    .iter()
                    .zip(b.iter())
                    .map(|(x, y)| (*x - *y) * (*x - *y))
                    .sum::<F>();

                (-distance / eps).exp()
            }
            KernelMethod::Linear => a.mul(&b).sum(),
            KernelMethod::Polynomial(c, d) => (a.mul(&b).sum() + c).powf(d),
        }
    }

    pub fn is_linear(&self) -> bool {
        matches!(*self, KernelMethod::Linear)
    }

    fn validate(&self) -> Result<()> {
        match *self {
            KernelMethod::Gaussian(eps) if !(eps.is_finite() && eps > F::zero()) => Err(
                KernelError::InvalidMethod(format!("gaussian width should be positive, but is {}", eps)),
            ),
            KernelMethod::Polynomial(c, d) if !(c.is_finite() && d.is_finite()) => {
                Err(KernelError::InvalidMethod(format!(
                    "polynomial constant {} and degree {} should be finite",
                    c, d
                )))
            }
            _ => Ok(()),
        }
    }

    /// Kernel values between every row of `xn` and every row of `xm`
    pub fn cross_matrix<D: Data<Elem = F>, E: Data<Elem = F>>(
        &self,
        xn: &ArrayBase<D, Ix2>,
        xm: &ArrayBase<E, Ix2>,
    ) -> Result<Array2<F>> {
        if xn.ncols() != xm.ncols() {
            return Err(KernelError::FeatureMismatch {
                left: xn.ncols(),
                right: xm.ncols(),
            });
        }

        Ok(cross_from_fn(xn, xm, self))
    }
}

fn cross_from_fn<F: Float, D: Data<Elem = F>, E: Data<Elem = F>>(
    xn: &ArrayBase<D, Ix2>,
    xm: &ArrayBase<E, Ix2>,
    method: &KernelMethod<F>,
) -> Array2<F> {
    let mut similarity = Array2::zeros((xn.nrows(), xm.nrows()));

    for (i, a) in xn.outer_iter().enumerate() {
        for (j, b) in xm.outer_iter().enumerate() {
            similarity[(i, j)] = method.distance(a.view(), b.view());
        }
    }

    similarity
}

/// A list of kernel methods addressed by selector
///
/// Selector `i >= 0` picks the i-th method, [`KernelSelector::DEFAULT`] picks the default
/// method (the first one, unless changed with [`with_default`](KernelFamily::with_default)).
/// Any other selector is rejected.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct KernelFamily<F> {
    methods: Vec<KernelMethod<F>>,
    default: usize,
}

impl<F: Float> KernelFamily<F> {
    /// Create a family from a non-empty list of valid methods
    pub fn new(methods: Vec<KernelMethod<F>>) -> Result<Self> {
        if methods.is_empty() {
            return Err(KernelError::EmptyFamily);
        }
        for method in &methods {
            method.validate()?;
        }

        Ok(KernelFamily {
            methods,
            default: 0,
        })
    }

    /// A family with a single method, selected by `0` and by the default selector
    pub fn single(method: KernelMethod<F>) -> Result<Self> {
        Self::new(vec![method])
    }

    /// Change the method picked by the default selector
    pub fn with_default(mut self, index: usize) -> Result<Self> {
        if index >= self.methods.len() {
            return Err(KernelError::UnknownSelector(KernelSelector::new(index as i64)));
        }
        self.default = index;
        Ok(self)
    }

    pub fn methods(&self) -> &[KernelMethod<F>] {
        &self.methods
    }

    /// The method a selector refers to
    pub fn resolve(&self, selector: KernelSelector) -> Result<&KernelMethod<F>> {
        let index = match selector.index() {
            -1 => Some(self.default),
            i if i >= 0 => Some(i as usize),
            _ => None,
        };

        index
            .and_then(|i| self.methods.get(i))
            .ok_or(KernelError::UnknownSelector(selector))
    }
}

impl<F: Float> KernelProvider<F> for KernelFamily<F> {
    fn kernel_matrix(
        &self,
        xn: ArrayView2<F>,
        xm: ArrayView2<F>,
        selector: KernelSelector,
    ) -> Result<Array2<F>> {
        let method = self.resolve(selector)?;
        tracing::trace!(
            "computing {}x{} kernel matrix with {:?}",
            xn.nrows(),
            xm.nrows(),
            method
        );

        method.cross_matrix(&xn, &xm)
    }
}

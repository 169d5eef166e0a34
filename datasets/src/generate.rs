//! Utility functions for randomly generating labelled datasets

use ndarray::{s, Array, Array1, Array2, ArrayBase, Data, Ix1};
use ndarray_rand::{
    rand::Rng,
    rand_distr::{Distribution, StandardNormal},
    RandomExt,
};
use qsvm::Dataset;

use crate::error::Result;

/// Special case of `blobs_with_distribution` with a standard normal distribution.
pub fn blobs(
    blob_size: usize,
    negative: &ArrayBase<impl Data<Elem = f64>, Ix1>,
    positive: &ArrayBase<impl Data<Elem = f64>, Ix1>,
    rng: &mut impl Rng,
) -> Result<Dataset<f64>> {
    blobs_with_distribution(blob_size, negative, positive, StandardNormal, rng)
}

/// Generate a binary classification problem of two blobs
///
/// `blob_size` points are sampled around the centroid `negative` and labelled `-1`, followed by
/// `blob_size` points around `positive` labelled `+1`. Both centroids must have the same
/// dimension.
pub fn blobs_with_distribution(
    blob_size: usize,
    negative: &ArrayBase<impl Data<Elem = f64>, Ix1>,
    positive: &ArrayBase<impl Data<Elem = f64>, Ix1>,
    distribution: impl Distribution<f64> + Clone,
    rng: &mut impl Rng,
) -> Result<Dataset<f64>> {
    qsvm::dataset::check_len("centroid", negative.len(), positive.len())?;

    let mut records = Array2::zeros((2 * blob_size, negative.len()));
    records
        .slice_mut(s![..blob_size, ..])
        .assign(&make_blob(blob_size, negative, distribution.clone(), rng));
    records
        .slice_mut(s![blob_size.., ..])
        .assign(&make_blob(blob_size, positive, distribution, rng));

    let targets = Array1::from_shape_fn(2 * blob_size, |i| if i < blob_size { -1.0 } else { 1.0 });

    Ok(Dataset::new(records, targets)?)
}

/// Generate `blob_size` data points (a "blob") around `blob_centroid` using the given distribution.
fn make_blob(
    blob_size: usize,
    blob_centroid: &ArrayBase<impl Data<Elem = f64>, Ix1>,
    distribution: impl Distribution<f64>,
    rng: &mut impl Rng,
) -> Array2<f64> {
    let shape = (blob_size, blob_centroid.len());
    let origin_blob: Array2<f64> = Array::random_using(shape, distribution, rng);
    origin_blob + blob_centroid
}

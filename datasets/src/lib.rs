//! `qsvm-datasets` reads and writes the data files used around quantized support vector
//! classifiers.
//!
//! ## The Big Picture
//!
//! Classifiers are trained and evaluated on labelled samples. This crate turns the raw files
//! into a [`qsvm::Dataset`] and persists results:
//!
//! * [`load_intensities`]: binding intensities of DNA sequences, labelled at a percentile
//! * [`load_split_dataset`] and [`write_samples`]: pre-split datasets in a whitespace format
//! * [`read_hyperlabel`] and [`write_predictions`]: files of the hyperlabel challenge
//! * [`save_json`]: any serializable value as JSON
//! * [`generate`]: synthetic two-class problems for tests and examples
//!
//! ## Loading a dataset
//!
//! ```no_run
//! let train = qsvm_datasets::load_intensities("data", "mad50").unwrap();
//! println!("{} sequences, {} positive", train.nsamples(), train.npositive());
//! ```
//!
//! Every failure is returned as [`DatasetError`]. Failures while writing are additionally
//! logged with `tracing`, so a caller may continue without losing the diagnostic.

mod dataset;
pub mod error;
pub mod generate;
mod persist;

pub use dataset::{
    array_from_csv, load_intensities, load_split_dataset, read_hyperlabel, sequences_to_onehot,
    Hyperlabel,
};
pub use error::{DatasetError, Result};
pub use persist::{save_json, write_predictions, write_samples};

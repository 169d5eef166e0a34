use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DatasetError>;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("could not access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}, line {line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },
    #[error("invalid dataset key {0:?}, expected a protein prefix followed by a percentile")]
    InvalidKey(String),
    #[error("sequence {index} has length {found}, expected {expected}")]
    RaggedSequences {
        index: usize,
        expected: usize,
        found: usize,
    },
    #[error("no line starting with {0:?} found")]
    MissingTag(&'static str),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    ReadArray(#[from] ndarray_csv::ReadError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    NdShape(#[from] ndarray::ShapeError),
    #[error(transparent)]
    BaseCrate(#[from] qsvm::Error),
}

impl DatasetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DatasetError::Io {
            path: path.into(),
            source,
        }
    }
}

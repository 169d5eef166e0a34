use std::fs;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use ndarray::prelude::*;
use ndarray_csv::Array2Reader;
use qsvm::Dataset;

use crate::error::{DatasetError, Result};

const BASES: &[u8] = b"ACGT";

/// Line after which the hyperlabel data rows start
const HYPERLABEL_TAG: &str = "description:";

/// Convert CSV bytes into 2D array
pub fn array_from_csv<R: Read>(csv: R, has_headers: bool, separator: u8) -> Result<Array2<f64>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(has_headers)
        .delimiter(separator)
        .from_reader(csv);

    Ok(reader.deserialize_array2_dynamic()?)
}

/// One-hot encoding of nucleotide sequences
///
/// Every base becomes a block of four entries, one per letter of `ACGT`, so a sequence of
/// length `L` is turned into a row of `4 L` zeros and ones. Letters outside of `ACGT` give an
/// all-zero block. All sequences must have the same length.
pub fn sequences_to_onehot<S: AsRef<str>>(sequences: &[S]) -> Result<Array2<f64>> {
    let len = sequences.first().map(|s| s.as_ref().len()).unwrap_or(0);
    let mut onehot = Array2::zeros((sequences.len(), BASES.len() * len));

    for (index, (sequence, mut row)) in sequences.iter().zip(onehot.outer_iter_mut()).enumerate() {
        let sequence = sequence.as_ref().as_bytes();
        if sequence.len() != len {
            return Err(DatasetError::RaggedSequences {
                index,
                expected: len,
                found: sequence.len(),
            });
        }

        for (position, base) in sequence.iter().enumerate() {
            if let Some(letter) = BASES.iter().position(|b| b == base) {
                row[BASES.len() * position + letter] = 1.0;
            }
        }
    }

    Ok(onehot)
}

fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|err| {
        tracing::error!("could not read {}: {}", path.display(), err);
        DatasetError::io(path, err)
    })
}

fn parse_float(path: &Path, line: usize, token: &str) -> Result<f64> {
    token.parse().map_err(|_| DatasetError::Parse {
        path: path.to_path_buf(),
        line,
        message: format!("{:?} is not a number", token),
    })
}

/// Split a dataset key like `mad50` into protein prefix and percentile
fn parse_key(key: &str) -> Result<(&str, f64)> {
    let invalid = || DatasetError::InvalidKey(key.to_string());

    if !key.is_char_boundary(3) || key.len() <= 3 {
        return Err(invalid());
    }
    let (prefix, percentile) = key.split_at(3);
    let percentile = percentile.parse::<f64>().map_err(|_| invalid())?;

    if (0.0..=100.0).contains(&percentile) {
        Ok((prefix, percentile))
    } else {
        Err(invalid())
    }
}

/// Load binding intensities of a protein and label them at a percentile
///
/// The key consists of a three letter protein prefix and a percentile, for example `mad50` or
/// `myc99`. The whitespace separated file `intensities-<prefix>filtered` in `dir` starts with a
/// header row, followed by one row per sequence with the sequence in the first and its
/// log-intensity in the second column.
///
/// Records are the one-hot encoded sequences scaled to `-1` and `+1`. With `N` sequences the
/// threshold is the intensity at index `floor(N * percentile / 100)` in ascending order, every
/// sequence at or above the threshold is labelled `+1`, the others `-1`.
pub fn load_intensities<P: AsRef<Path>>(dir: P, key: &str) -> Result<Dataset<f64>> {
    let (prefix, percentile) = parse_key(key)?;
    let path = dir.as_ref().join(format!("intensities-{}filtered", prefix));
    let content = read_to_string(&path)?;

    let mut sequences = Vec::new();
    let mut intensities = Vec::new();
    // first line is the header
    for (line, row) in content.lines().enumerate().skip(1) {
        let mut tokens = row.split_whitespace();
        let (sequence, intensity) = match (tokens.next(), tokens.next()) {
            (Some(sequence), Some(intensity)) => (sequence, intensity),
            (None, _) => continue,
            (Some(_), None) => {
                return Err(DatasetError::Parse {
                    path,
                    line: line + 1,
                    message: "expected a sequence and an intensity".to_string(),
                })
            }
        };

        sequences.push(sequence);
        intensities.push(parse_float(&path, line + 1, intensity)?);
    }

    if intensities.is_empty() {
        return Err(qsvm::Error::NotEnoughSamples.into());
    }

    let records = sequences_to_onehot(&sequences)? * 2.0 - 1.0;

    let mut sorted = intensities.clone();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let k = ((sorted.len() as f64 * percentile / 100.0) as usize).min(sorted.len() - 1);
    let theta = sorted[k];

    let targets = intensities
        .iter()
        .map(|y| if *y >= theta { 1.0 } else { -1.0 })
        .collect::<Array1<_>>();

    tracing::debug!(
        "loaded {} sequences from {}, threshold {} labels {} positive",
        targets.len(),
        path.display(),
        theta,
        targets.iter().filter(|y| **y > 0.0).count()
    );

    Ok(Dataset::new(records, targets)?)
}

/// Load a dataset written by [`write_samples`](crate::write_samples)
///
/// The whitespace separated file has one header row. In every other row the first column is an
/// identifier, the second the label and the remaining columns are the features.
pub fn load_split_dataset<P: AsRef<Path>>(path: P) -> Result<Dataset<f64>> {
    let path = path.as_ref();
    let content = read_to_string(path)?;

    let mut values = Vec::new();
    let mut nrows = 0;
    let mut ncols = None;
    for (line, row) in content.lines().enumerate().skip(1) {
        let row = row
            .split_whitespace()
            .map(|token| parse_float(path, line + 1, token))
            .collect::<Result<Vec<_>>>()?;

        if row.is_empty() {
            continue;
        }
        match ncols {
            None if row.len() < 2 => {
                return Err(DatasetError::Parse {
                    path: path.to_path_buf(),
                    line: line + 1,
                    message: "expected an identifier and a label".to_string(),
                })
            }
            None => ncols = Some(row.len()),
            Some(n) if n != row.len() => {
                return Err(DatasetError::Parse {
                    path: path.to_path_buf(),
                    line: line + 1,
                    message: format!("found {} columns, expected {}", row.len(), n),
                })
            }
            _ => {}
        }

        values.extend(row);
        nrows += 1;
    }

    let array = Array2::from_shape_vec((nrows, ncols.unwrap_or(2)), values)?;
    let (records, targets) = (
        array.slice(s![.., 2..]).to_owned(),
        array.column(1).to_owned(),
    );

    Ok(Dataset::new(records, targets)?)
}

/// Training and test split of a hyperlabel data file
#[derive(Debug, Clone, PartialEq)]
pub struct Hyperlabel {
    pub records: Array2<f64>,
    pub targets: Array1<f64>,
    /// Samples with a negative target, the target is not known
    pub test: Array2<f64>,
}

/// Read a data file in the hyperlabel format
///
/// Everything up to and including the line starting with `description:` is skipped. Each
/// following row is comma separated with the target in the first column. Rows with a negative
/// target form the test set.
pub fn read_hyperlabel<P: AsRef<Path>>(path: P) -> Result<Hyperlabel> {
    let path = path.as_ref();
    let content = read_to_string(path)?;

    let mut offset = None;
    let mut position = 0;
    for line in content.split_inclusive('\n') {
        position += line.len();
        if line.starts_with(HYPERLABEL_TAG) {
            offset = Some(position);
            break;
        }
    }
    let offset = offset.ok_or(DatasetError::MissingTag(HYPERLABEL_TAG))?;

    let array = array_from_csv(content[offset..].as_bytes(), false, b',')?;
    let (targets, features) = (array.column(0), array.slice(s![.., 1..]));

    let train = targets
        .iter()
        .enumerate()
        .filter(|(_, y)| **y >= 0.0)
        .map(|(i, _)| i)
        .collect::<Vec<_>>();
    let test = targets
        .iter()
        .enumerate()
        .filter(|(_, y)| **y < 0.0)
        .map(|(i, _)| i)
        .collect::<Vec<_>>();

    Ok(Hyperlabel {
        records: features.select(Axis(0), &train),
        targets: targets.select(Axis(0), &train),
        test: features.select(Axis(0), &test),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn onehot_blocks() {
        let onehot = sequences_to_onehot(&["ACGT", "TTNA"]).unwrap();

        assert_eq!(onehot.dim(), (2, 16));
        assert_eq!(
            onehot.row(0),
            array![1., 0., 0., 0., 0., 1., 0., 0., 0., 0., 1., 0., 0., 0., 0., 1.]
        );
        assert_eq!(
            onehot.row(1),
            array![0., 0., 0., 1., 0., 0., 0., 1., 0., 0., 0., 0., 1., 0., 0., 0.]
        );
    }

    #[test]
    fn onehot_rejects_ragged_sequences() {
        assert!(matches!(
            sequences_to_onehot(&["ACG", "AC"]),
            Err(DatasetError::RaggedSequences {
                index: 1,
                expected: 3,
                found: 2
            })
        ));
        assert_eq!(sequences_to_onehot::<&str>(&[]).unwrap().dim(), (0, 0));
    }

    #[test]
    fn dataset_keys() {
        assert_eq!(parse_key("mad50").unwrap(), ("mad", 50.0));
        assert_eq!(parse_key("myc99.5").unwrap(), ("myc", 99.5));
        assert!(parse_key("mad").is_err());
        assert!(parse_key("madxx").is_err());
        assert!(parse_key("mad150").is_err());
    }

    #[test]
    fn csv_arrays() {
        let array = array_from_csv(&b"a,b\n1,2\n3,4\n"[..], true, b',').unwrap();
        assert_eq!(array, array![[1., 2.], [3., 4.]]);
    }
}

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use ndarray::{ArrayBase, Data, Ix1};
use qsvm::Dataset;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::{DatasetError, Result};

fn create(path: &Path) -> Result<BufWriter<File>> {
    File::create(path).map(BufWriter::new).map_err(|err| {
        tracing::error!("could not create {}: {}", path.display(), err);
        DatasetError::io(path, err)
    })
}

fn log_failure<T>(path: &Path, res: Result<T>) -> Result<T> {
    if let Err(err) = &res {
        tracing::error!("could not write {}: {}", path.display(), err);
    }
    res
}

/// Write a dataset in the format read by [`load_split_dataset`](crate::load_split_dataset)
///
/// The header `id label data` is followed by one space separated row per sample with its index,
/// its label and its features.
pub fn write_samples<P: AsRef<Path>>(dataset: &Dataset<f64>, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut writer = WriterBuilder::new()
        .delimiter(b' ')
        .flexible(true)
        .from_writer(create(path)?);

    let res = (|| -> Result<()> {
        writer.write_record(&["id", "label", "data"])?;
        for (i, (record, target)) in dataset
            .records()
            .outer_iter()
            .zip(dataset.targets().iter())
            .enumerate()
        {
            let label = if *target > 0.0 { "1" } else { "-1" };
            let mut row = vec![i.to_string(), label.to_string()];
            row.extend(record.iter().map(|x| x.to_string()));

            writer.write_record(&row)?;
        }
        writer.flush().map_err(|err| DatasetError::io(path, err))
    })();

    log_failure(path, res)
}

/// Write predictions to `<prefix><dataset>_predictions.txt`
///
/// The file contains a single line with the method name, the dataset name and all predictions,
/// separated by spaces. The prefix is prepended verbatim, pass a directory with a trailing
/// separator. Returns the path of the written file.
pub fn write_predictions<D: Data<Elem = f64>>(
    prefix: &str,
    method: &str,
    dataset: &str,
    predictions: &ArrayBase<D, Ix1>,
) -> Result<PathBuf> {
    let path = PathBuf::from(format!("{}{}_predictions.txt", prefix, dataset));
    let mut file = create(&path)?;

    let res = (|| -> std::io::Result<()> {
        write!(file, "{} {}", method, dataset)?;
        for prediction in predictions.iter() {
            write!(file, " {}", prediction)?;
        }
        writeln!(file)?;
        file.flush()
    })()
    .map_err(|err| DatasetError::io(&path, err));

    log_failure(&path, res)?;
    Ok(path)
}

/// Serialize a value as JSON with sorted keys and an indentation of four spaces
///
/// Failures are logged and returned, they never abort the process.
pub fn save_json<T: Serialize + ?Sized, P: AsRef<Path>>(path: P, value: &T) -> Result<()> {
    let path = path.as_ref();

    // maps of `serde_json::Value` are ordered by key
    let value = log_failure(path, serde_json::to_value(value).map_err(DatasetError::from))?;
    let mut writer = create(path)?;

    let res = (|| -> Result<()> {
        let mut serializer =
            Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"    "));
        value.serialize(&mut serializer)?;
        writer
            .flush()
            .map_err(|err| DatasetError::io(path, err))
    })();

    log_failure(path, res)?;
    tracing::debug!("saved {}", path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{save_json, write_predictions};
    use crate::DatasetError;
    use ndarray::array;
    use serde_json::json;
    use std::fs;

    #[test]
    fn json_keys_are_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.json");

        save_json(&path, &json!({"b": [1, 2], "a": {"d": 1.5, "c": "x"}})).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "{\n    \"a\": {\n        \"c\": \"x\",\n        \"d\": 1.5\n    },\n    \"b\": [\n        1,\n        2\n    ]\n}"
        );
    }

    #[test]
    fn unwritable_location_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("result.json");

        assert!(matches!(
            save_json(&path, &json!({"a": 1})),
            Err(DatasetError::Io { .. })
        ));
    }

    #[test]
    fn predictions_on_one_line() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = format!("{}/", dir.path().display());

        let path = write_predictions(&prefix, "qsvm", "mad50", &array![1.0, -1.0, 0.5]).unwrap();

        assert_eq!(path, dir.path().join("mad50_predictions.txt"));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "qsvm mad50 1 -1 0.5\n"
        );
    }
}

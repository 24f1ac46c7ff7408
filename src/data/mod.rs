//! Dataset providers.
//!
//! A provider hands over a finished [`Dataset`]: identifier columns removed,
//! numeric columns standardized, labels mapped to class indices `0..K`.
//! Nothing downstream mutates it.

pub mod synthetic;

use crate::error::{FeatselError, Result};
use crate::preprocessing::StandardScaler;
use crate::primitives::Matrix;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Named feature columns with a row-aligned class-index label vector.
///
/// # Examples
///
/// ```
/// use featsel::data::Dataset;
/// use featsel::primitives::Matrix;
///
/// let x = Matrix::from_vec(4, 2, vec![0.0, 1.0, 1.0, 0.0, 0.5, 0.5, 0.2, 0.9])
///     .expect("4x2");
/// let ds = Dataset::new(
///     vec!["a".into(), "b".into()],
///     x,
///     vec![0, 1, 0, 1],
///     vec!["no".into(), "yes".into()],
/// )
/// .expect("consistent dataset");
/// assert_eq!(ds.n_features(), 2);
/// assert_eq!(ds.n_classes(), 2);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Dataset {
    names: Vec<String>,
    x: Matrix<f32>,
    y: Vec<usize>,
    class_names: Vec<String>,
}

impl Dataset {
    /// Assembles a dataset, checking that names, rows and labels line up.
    ///
    /// # Errors
    ///
    /// - [`FeatselError::Data`] if the matrix is empty or `names` does not
    ///   match the column count.
    /// - [`FeatselError::LabelMismatch`] if `y` is not row-aligned or holds a
    ///   label outside `0..class_names.len()`.
    pub fn new(
        names: Vec<String>,
        x: Matrix<f32>,
        y: Vec<usize>,
        class_names: Vec<String>,
    ) -> Result<Self> {
        let (n_rows, n_cols) = x.shape();
        if n_rows == 0 || n_cols == 0 {
            return Err(FeatselError::data(format!(
                "dataset must have rows and columns, got {n_rows}x{n_cols}"
            )));
        }
        if names.len() != n_cols {
            return Err(FeatselError::data(format!(
                "{} column names for {n_cols} columns",
                names.len()
            )));
        }
        if y.len() != n_rows {
            return Err(FeatselError::label_mismatch(format!(
                "{} labels for {n_rows} rows",
                y.len()
            )));
        }
        if let Some(&bad) = y.iter().find(|&&label| label >= class_names.len()) {
            return Err(FeatselError::label_mismatch(format!(
                "label {bad} outside {} declared classes",
                class_names.len()
            )));
        }
        Ok(Self {
            names,
            x,
            y,
            class_names,
        })
    }

    /// Column names, in column order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Feature matrix.
    #[must_use]
    pub fn x(&self) -> &Matrix<f32> {
        &self.x
    }

    /// Class indices.
    #[must_use]
    pub fn y(&self) -> &[usize] {
        &self.y
    }

    /// Original label text per class index.
    #[must_use]
    pub fn class_names(&self) -> &[String] {
        &self.class_names
    }

    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.x.n_rows()
    }

    #[must_use]
    pub fn n_features(&self) -> usize {
        self.x.n_cols()
    }

    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.class_names.len()
    }
}

/// Source of a cleaned, standardized dataset.
pub trait DatasetProvider {
    /// Loads the dataset.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read or is malformed.
    fn load_dataset(&self) -> Result<Dataset>;
}

/// Reads a headered CSV file.
///
/// Every non-label, non-dropped column must be numeric. Labels are arbitrary
/// strings; distinct values are ordered numerically when they all parse as
/// numbers and lexically otherwise, then numbered from 0.
#[derive(Debug, Clone)]
pub struct CsvProvider {
    path: PathBuf,
    label: String,
    drop: Vec<String>,
    standardize: bool,
}

impl CsvProvider {
    /// Provider for `path` with labels in column `label`.
    #[must_use]
    pub fn new(path: impl AsRef<Path>, label: impl Into<String>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            label: label.into(),
            drop: Vec::new(),
            standardize: true,
        }
    }

    /// Identifier columns to discard.
    #[must_use]
    pub fn with_drop<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.drop.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Toggle z-score standardization (on by default).
    #[must_use]
    pub fn with_standardize(mut self, standardize: bool) -> Self {
        self.standardize = standardize;
        self
    }

    fn read(&self) -> Result<Dataset> {
        let mut reader = csv::Reader::from_path(&self.path)?;
        let headers = reader.headers()?.clone();

        let label_idx = headers
            .iter()
            .position(|h| h == self.label)
            .ok_or_else(|| {
                FeatselError::data(format!(
                    "label column '{}' not found; available: {:?}",
                    self.label,
                    headers.iter().collect::<Vec<_>>()
                ))
            })?;
        for name in &self.drop {
            if !headers.iter().any(|h| h == name) {
                return Err(FeatselError::data(format!(
                    "drop column '{name}' not found"
                )));
            }
        }

        let feature_cols: Vec<(usize, String)> = headers
            .iter()
            .enumerate()
            .filter(|&(i, h)| i != label_idx && !self.drop.iter().any(|d| d == h))
            .map(|(i, h)| (i, h.to_string()))
            .collect();
        if feature_cols.is_empty() {
            return Err(FeatselError::data("no feature columns left"));
        }

        let mut values = Vec::new();
        let mut raw_labels = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = record?;
            // header is line 1
            let line = row + 2;
            for (idx, name) in &feature_cols {
                let cell = record.get(*idx).unwrap_or("").trim();
                let value: f32 = cell.parse().map_err(|_| {
                    FeatselError::data(format!(
                        "line {line}, column '{name}': '{cell}' is not numeric"
                    ))
                })?;
                if !value.is_finite() {
                    return Err(FeatselError::data(format!(
                        "line {line}, column '{name}': '{cell}' is not finite"
                    )));
                }
                values.push(value);
            }
            raw_labels.push(record.get(label_idx).unwrap_or("").trim().to_string());
        }

        let n_rows = raw_labels.len();
        let x = Matrix::from_vec(n_rows, feature_cols.len(), values)
            .map_err(|e| FeatselError::data(format!("{}: {e}", self.path.display())))?;
        let x = if self.standardize && n_rows > 0 {
            StandardScaler::new().fit_transform(&x)?
        } else {
            x
        };

        let (y, class_names) = index_labels(&raw_labels);
        let names = feature_cols.into_iter().map(|(_, name)| name).collect();
        Dataset::new(names, x, y, class_names)
    }
}

impl DatasetProvider for CsvProvider {
    fn load_dataset(&self) -> Result<Dataset> {
        let dataset = self.read()?;
        tracing::info!(
            path = %self.path.display(),
            rows = dataset.n_samples(),
            features = dataset.n_features(),
            classes = dataset.n_classes(),
            "loaded CSV dataset"
        );
        Ok(dataset)
    }
}

/// Map label strings to dense class indices.
fn index_labels(raw: &[String]) -> (Vec<usize>, Vec<String>) {
    let distinct: BTreeSet<&str> = raw.iter().map(String::as_str).collect();
    let mut classes: Vec<&str> = distinct.into_iter().collect();

    let numeric: Option<Vec<f64>> = classes.iter().map(|c| c.parse::<f64>().ok()).collect();
    if let Some(keys) = numeric {
        let mut paired: Vec<(f64, &str)> = keys.into_iter().zip(classes).collect();
        paired.sort_by(|a, b| a.0.total_cmp(&b.0));
        classes = paired.into_iter().map(|(_, c)| c).collect();
    }

    let y = raw
        .iter()
        .map(|label| classes.iter().position(|c| c == label).unwrap_or(0))
        .collect();
    (y, classes.into_iter().map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(lines: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        for line in lines {
            writeln!(file, "{line}").expect("write line");
        }
        file
    }

    #[test]
    fn test_csv_provider_drops_and_standardizes() {
        let file = write_csv(&[
            "id,a,b,quality",
            "r1,1.0,10,3",
            "r2,2.0,20,1",
            "r3,3.0,30,3",
            "r4,4.0,40,2",
        ]);
        let ds = CsvProvider::new(file.path(), "quality")
            .with_drop(["id"])
            .load_dataset()
            .expect("load");

        assert_eq!(ds.names(), &["a".to_string(), "b".to_string()]);
        assert_eq!(ds.n_samples(), 4);
        assert_eq!(ds.class_names(), &["1", "2", "3"]);
        assert_eq!(ds.y(), &[2, 0, 2, 1]);
        let mean: f32 = ds.x().column(0).iter().sum::<f32>() / 4.0;
        assert!(mean.abs() < 1e-5);
    }

    #[test]
    fn test_csv_provider_without_standardize_keeps_values() {
        let file = write_csv(&["x,y", "1.5,a", "2.5,b"]);
        let ds = CsvProvider::new(file.path(), "y")
            .with_standardize(false)
            .load_dataset()
            .expect("load");
        assert_eq!(ds.x().column(0), vec![1.5, 2.5]);
    }

    #[test]
    fn test_numeric_labels_sort_numerically() {
        let raw: Vec<String> = ["10", "9", "10", "2"].iter().map(|s| s.to_string()).collect();
        let (y, classes) = index_labels(&raw);
        assert_eq!(classes, vec!["2", "9", "10"]);
        assert_eq!(y, vec![2, 1, 2, 0]);
    }

    #[test]
    fn test_missing_label_column_errors() {
        let file = write_csv(&["x,y", "1,0"]);
        let err = CsvProvider::new(file.path(), "class")
            .load_dataset()
            .expect_err("no such column");
        assert!(err.to_string().contains("class"));
    }

    #[test]
    fn test_non_numeric_feature_errors() {
        let file = write_csv(&["x,y", "abc,0"]);
        let err = CsvProvider::new(file.path(), "y")
            .load_dataset()
            .expect_err("non numeric");
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_non_finite_feature_errors() {
        for cell in ["NaN", "inf", "-inf"] {
            let row = format!("2.0,{cell},1");
            let file = write_csv(&["a,b,y", "1.0,0.5,0", &row]);
            let err = CsvProvider::new(file.path(), "y")
                .load_dataset()
                .expect_err("non finite");
            assert!(matches!(err, FeatselError::Data { .. }));
            let message = err.to_string();
            assert!(message.contains("line 3"), "{message}");
            assert!(message.contains("column 'b'"), "{message}");
        }
    }

    #[test]
    fn test_dataset_rejects_label_out_of_range() {
        let x = Matrix::from_vec(2, 1, vec![0.0, 1.0]).expect("2x1");
        let err = Dataset::new(vec!["a".into()], x, vec![0, 3], vec!["p".into(), "q".into()])
            .expect_err("label 3");
        assert!(matches!(err, FeatselError::LabelMismatch { .. }));
    }
}

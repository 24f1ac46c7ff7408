//! Matrix type for 2D numeric data.

use serde::{Deserialize, Serialize};

/// A 2D matrix (row-major storage).
///
/// # Examples
///
/// ```
/// use featsel::primitives::Matrix;
///
/// let m = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).expect("data length matches rows * cols");
/// assert_eq!(m.shape(), (2, 3));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T: Copy> Matrix<T> {
    /// Creates a new matrix from a vector of data.
    ///
    /// # Errors
    ///
    /// Returns an error if data length doesn't match rows * cols.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self, &'static str> {
        if data.len() != rows * cols {
            return Err("Data length must equal rows * cols");
        }
        Ok(Self { data, rows, cols })
    }

    /// Builds a matrix from equally sized rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the rows are ragged.
    pub fn from_rows(rows: &[Vec<T>]) -> Result<Self, &'static str> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            if row.len() != cols {
                return Err("All rows must have the same length");
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            data,
            rows: rows.len(),
            cols,
        })
    }

    /// Returns the shape as (rows, cols).
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.cols
    }

    /// Gets element at (row, col).
    ///
    /// # Panics
    ///
    /// Panics if indices are out of bounds.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> T {
        self.data[row * self.cols + col]
    }

    /// Sets element at (row, col).
    ///
    /// # Panics
    ///
    /// Panics if indices are out of bounds.
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        self.data[row * self.cols + col] = value;
    }

    /// Returns a row as a slice.
    #[must_use]
    pub fn row(&self, row_idx: usize) -> &[T] {
        let start = row_idx * self.cols;
        &self.data[start..start + self.cols]
    }

    /// Returns a column as an owned vector.
    #[must_use]
    pub fn column(&self, col_idx: usize) -> Vec<T> {
        (0..self.rows)
            .map(|row| self.data[row * self.cols + col_idx])
            .collect()
    }

    /// Returns the underlying data as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Projects the matrix onto the given columns, in the given order.
    ///
    /// # Panics
    ///
    /// Panics if any column index is out of bounds.
    #[must_use]
    pub fn select_columns(&self, columns: &[usize]) -> Self {
        let mut data = Vec::with_capacity(self.rows * columns.len());
        for row in 0..self.rows {
            let base = row * self.cols;
            data.extend(columns.iter().map(|&c| self.data[base + c]));
        }
        Self {
            data,
            rows: self.rows,
            cols: columns.len(),
        }
    }

    /// Gathers the given rows (duplicates allowed, as in bootstrap samples).
    ///
    /// # Panics
    ///
    /// Panics if any row index is out of bounds.
    #[must_use]
    pub fn select_rows(&self, rows: &[usize]) -> Self {
        let mut data = Vec::with_capacity(rows.len() * self.cols);
        for &r in rows {
            data.extend_from_slice(self.row(r));
        }
        Self {
            data,
            rows: rows.len(),
            cols: self.cols,
        }
    }
}

impl<T: Copy + Default> Matrix<T> {
    /// Creates a matrix filled with `T::default()` (zeros for numeric types).
    #[must_use]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![T::default(); rows * cols],
            rows,
            cols,
        }
    }
}

impl Matrix<f32> {
    /// Index of the largest entry in each row.
    ///
    /// Ties resolve to the lowest column index. Rows of an empty-column
    /// matrix map to 0.
    #[must_use]
    pub fn argmax_rows(&self) -> Vec<usize> {
        (0..self.rows)
            .map(|r| {
                let mut best = 0;
                for (c, &v) in self.row(r).iter().enumerate() {
                    if v > self.row(r)[best] {
                        best = c;
                    }
                }
                best
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "matrix_tests.rs"]
mod tests;

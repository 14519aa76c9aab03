//! Dense row-major matrix and the arithmetic primitives the pipeline is built on.
//!
//! # Ownership
//!
//! A [`Matrix`] owns its buffer. Every primitive that produces a matrix returns
//! a fresh owned value; release is `Drop`. Construction either fully succeeds
//! or returns [`SymNmfError::Allocation`]; a partially built matrix is never
//! observable, so failure paths need no release bookkeeping.
//!
//! # Invariants
//! - `data.len() == rows * cols` at all times.
//! - Indices are zero-based `(row, col)`.

use core::ops::{Index, IndexMut};

use crate::error::{Result, SymNmfError};

/// Dense, mutable, row-major matrix of `f64`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "MatrixRepr"))]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

/// Unchecked wire form; deserialisation goes through [`Matrix::from_vec`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct MatrixRepr {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

#[cfg(feature = "serde")]
impl TryFrom<MatrixRepr> for Matrix {
    type Error = SymNmfError;

    fn try_from(repr: MatrixRepr) -> Result<Self> {
        Matrix::from_vec(repr.rows, repr.cols, repr.data)
    }
}

/// Obtain a zeroed buffer of `rows * cols` values without aborting on OOM.
fn alloc_buffer(rows: usize, cols: usize) -> Result<Vec<f64>> {
    let len = rows
        .checked_mul(cols)
        .ok_or_else(|| SymNmfError::allocation(rows, cols))?;
    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|_| SymNmfError::allocation(rows, cols))?;
    data.resize(len, 0.0);
    Ok(data)
}

impl Matrix {
    /// Allocate a zero-initialised `rows × cols` matrix.
    pub fn zeros(rows: usize, cols: usize) -> Result<Self> {
        Ok(Self {
            rows,
            cols,
            data: alloc_buffer(rows, cols)?,
        })
    }

    /// Build a matrix from a row-major buffer.
    ///
    /// Fails with `DimensionMismatch` if `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if rows.checked_mul(cols) != Some(data.len()) {
            return Err(SymNmfError::dimension_mismatch(
                "from_vec",
                (rows, cols),
                (1, data.len()),
            ));
        }
        Ok(Self { rows, cols, data })
    }

    /// Build a matrix from nested rows. All rows must have the same length.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let n = rows.len();
        let d = rows.first().map_or(0, |r| r.as_ref().len());
        let mut m = Self::zeros(n, d)?;
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != d {
                return Err(SymNmfError::dimension_mismatch(
                    "from_rows",
                    (1, d),
                    (1, row.len()),
                ));
            }
            m.row_mut(i).copy_from_slice(row);
        }
        Ok(m)
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Shape as `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// True when `rows == cols`.
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Entry at `(row, col)`, or `None` when out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    /// Borrow row `i` as a slice.
    ///
    /// # Panics
    /// Panics if `i >= rows`.
    pub fn row(&self, i: usize) -> &[f64] {
        let start = i * self.cols;
        &self.data[start..start + self.cols]
    }

    /// Mutably borrow row `i`.
    ///
    /// # Panics
    /// Panics if `i >= rows`.
    pub fn row_mut(&mut self, i: usize) -> &mut [f64] {
        let start = i * self.cols;
        &mut self.data[start..start + self.cols]
    }

    /// Iterate over rows as slices.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        // chunks_exact(0) panics
        let width = self.cols.max(1);
        self.data.chunks_exact(width).take(if self.cols == 0 { 0 } else { self.rows })
    }

    /// Row-major view of all entries.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Copy into nested `Vec` rows.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.rows).map(|i| self.row(i).to_vec()).collect()
    }

    /// Independent copy with identical contents.
    ///
    /// Unlike `Clone`, reports allocation failure instead of aborting.
    pub fn try_clone(&self) -> Result<Self> {
        let mut data = alloc_buffer(self.rows, self.cols)?;
        data.copy_from_slice(&self.data);
        Ok(Self {
            rows: self.rows,
            cols: self.cols,
            data,
        })
    }

    /// `cols × rows` transpose: `result[j][i] = self[i][j]`.
    pub fn transpose(&self) -> Result<Self> {
        let mut out = Self::zeros(self.cols, self.rows)?;
        for i in 0..self.rows {
            for j in 0..self.cols {
                out.data[j * self.rows + i] = self.data[i * self.cols + j];
            }
        }
        Ok(out)
    }

    /// Standard matrix product `self · other`.
    ///
    /// Fails with `DimensionMismatch` before allocating anything when the inner
    /// dimensions differ. Each entry accumulates its products in ascending `k`.
    pub fn multiply(&self, other: &Matrix) -> Result<Self> {
        if self.cols != other.rows {
            return Err(SymNmfError::dimension_mismatch(
                "multiply",
                self.shape(),
                other.shape(),
            ));
        }
        let mut out = Self::zeros(self.rows, other.cols)?;
        for i in 0..self.rows {
            let a_row = self.row(i);
            let out_row = &mut out.data[i * other.cols..(i + 1) * other.cols];
            for (k, &a_ik) in a_row.iter().enumerate() {
                let b_row = &other.data[k * other.cols..(k + 1) * other.cols];
                for (o, &b_kj) in out_row.iter_mut().zip(b_row) {
                    *o += a_ik * b_kj;
                }
            }
        }
        Ok(out)
    }

    /// Elementwise `self - other`. Both operands must share a shape.
    pub fn subtract(&self, other: &Matrix) -> Result<Self> {
        if self.shape() != other.shape() {
            return Err(SymNmfError::dimension_mismatch(
                "subtract",
                self.shape(),
                other.shape(),
            ));
        }
        let mut out = Self::zeros(self.rows, self.cols)?;
        for ((o, &a), &b) in out.data.iter_mut().zip(&self.data).zip(&other.data) {
            *o = a - b;
        }
        Ok(out)
    }

    /// Sum of squares of all entries.
    ///
    /// This is the *squared* Frobenius norm; no square root is taken.
    pub fn frobenius_norm_squared(&self) -> f64 {
        self.data.iter().map(|v| v * v).sum()
    }

    /// Elementwise `x ↦ 1/√x`, with `0 ↦ 0`.
    ///
    /// Any negative entry fails the whole operation with `NegativeValue`.
    pub fn inverse_sqrt_elementwise(&self) -> Result<Self> {
        let mut out = Self::zeros(self.rows, self.cols)?;
        for (idx, (o, &v)) in out.data.iter_mut().zip(&self.data).enumerate() {
            if v == 0.0 {
                *o = 0.0;
            } else if v < 0.0 {
                return Err(SymNmfError::NegativeValue {
                    row: idx / self.cols,
                    col: idx % self.cols,
                    value: v,
                });
            } else {
                *o = 1.0 / v.sqrt();
            }
        }
        Ok(out)
    }

    /// Arithmetic mean of all entries; `0.0` for an empty matrix.
    pub fn mean(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.data.iter().sum::<f64>() / self.data.len() as f64
    }

    /// True when square and `|a[i][j] - a[j][i]| <= tol` for every pair.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        if !self.is_square() {
            return false;
        }
        (0..self.rows).all(|i| {
            (i + 1..self.cols).all(|j| (self[(i, j)] - self[(j, i)]).abs() <= tol)
        })
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        assert!(row < self.rows && col < self.cols, "index ({row}, {col}) out of bounds");
        &self.data[row * self.cols + col]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        assert!(row < self.rows && col < self.cols, "index ({row}, {col}) out of bounds");
        &mut self.data[row * self.cols + col]
    }
}

/// Euclidean distance `√Σ (v1[i] - v2[i])²` over the common prefix of the two vectors.
///
/// An empty vector stands for an absent one and yields `0.0`.
pub fn euclidean_distance(v1: &[f64], v2: &[f64]) -> f64 {
    if v1.is_empty() || v2.is_empty() {
        return 0.0;
    }
    v1.iter()
        .zip(v2)
        .map(|(a, b)| (a - b) * (a - b))
        .sum::<f64>()
        .sqrt()
}

// ─── Tests ────────────────────────────────────────────────────────────────

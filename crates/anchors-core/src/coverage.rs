//! Reference coverage dataset and the coverage estimator.
//!
//! The coverage matrix is drawn once per explanation: one row per reference
//! sample, one column per predicate of the original instance. A mask covers
//! a row when every predicate in the mask is active in that row, so coverage
//! can only shrink as a mask grows.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{AnchorError, AnchorResult};

/// Row-major boolean matrix of predicate activations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverageData {
    n_rows: usize,
    n_features: usize,
    cells: Vec<bool>,
}

impl CoverageData {
    /// An empty matrix with `n_features` columns.
    pub fn new(n_features: usize) -> Self {
        Self {
            n_rows: 0,
            n_features,
            cells: Vec::new(),
        }
    }

    /// Build a matrix from equally wide rows.
    ///
    /// # Errors
    ///
    /// Returns [`AnchorError::InvalidInput`] if the rows differ in width.
    pub fn from_rows(n_features: usize, rows: &[Vec<bool>]) -> AnchorResult<Self> {
        let mut data = Self::new(n_features);
        for row in rows {
            data.push_row(row)?;
        }
        Ok(data)
    }

    /// Append one activation row.
    ///
    /// # Errors
    ///
    /// Returns [`AnchorError::InvalidInput`] if the row width is wrong.
    pub fn push_row(&mut self, row: &[bool]) -> AnchorResult<()> {
        if row.len() != self.n_features {
            return Err(AnchorError::InvalidInput(format!(
                "coverage row has {} columns, expected {}",
                row.len(),
                self.n_features
            )));
        }
        self.cells.extend_from_slice(row);
        self.n_rows += 1;
        Ok(())
    }

    /// Append every row of `other`.
    ///
    /// # Errors
    ///
    /// Returns [`AnchorError::InvalidInput`] if the column counts differ.
    pub fn extend(&mut self, other: &CoverageData) -> AnchorResult<()> {
        if other.n_features != self.n_features {
            return Err(AnchorError::InvalidInput(format!(
                "cannot merge coverage data with {} columns into {} columns",
                other.n_features, self.n_features
            )));
        }
        self.cells.extend_from_slice(&other.cells);
        self.n_rows += other.n_rows;
        Ok(())
    }

    /// Number of reference rows.
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of predicate columns.
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Whether the matrix holds no rows.
    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    /// Activation row `index`, if present.
    pub fn row(&self, index: usize) -> Option<&[bool]> {
        if index >= self.n_rows {
            return None;
        }
        let start = index * self.n_features;
        Some(&self.cells[start..start + self.n_features])
    }

    /// Fraction of rows whose active predicates include every index of `mask`.
    ///
    /// Returns 0.0 for an empty matrix. Indices outside the matrix are never
    /// active.
    pub fn coverage(&self, mask: &[usize]) -> f64 {
        if self.n_rows == 0 {
            return 0.0;
        }
        if mask.iter().any(|&f| f >= self.n_features) {
            return 0.0;
        }
        if self.n_features == 0 {
            // Only the empty mask reaches this point.
            return 1.0;
        }

        #[cfg(feature = "parallel")]
        let covered = self
            .cells
            .par_chunks(self.n_features)
            .filter(|row| covers(row, mask))
            .count();

        #[cfg(not(feature = "parallel"))]
        let covered = self
            .cells
            .chunks(self.n_features)
            .filter(|row| covers(row, mask))
            .count();

        covered as f64 / self.n_rows as f64
    }
}

#[inline]
fn covers(row: &[bool], mask: &[usize]) -> bool {
    mask.iter().all(|&f| row[f])
}

use crate::error::{OpticsError, Result};
use crate::grid::Grid;
use crate::linalg::Matrix;
use std::fmt;
use std::ops::Index;
use std::sync::Arc;

/// Values sampled one-to-one on the points of a [Grid].
///
/// The field shares its grid with every other field sampled on it; it never
/// copies or mutates the grid. Transmission fields are `Field<f64>`, electric
/// fields are `Field<Complex64>`.
#[derive(Debug, Clone, PartialEq)]
pub struct Field<T> {
    values: Vec<T>,
    grid: Arc<Grid>,
}

/// A real-valued field holding transmission values in `[0, 1]`.
pub type TransmissionField = Field<f64>;

impl<T> Field<T> {
    /// Pair `values` with `grid`. Fails if there is not exactly one value per
    /// grid point.
    pub fn new(values: Vec<T>, grid: Arc<Grid>) -> Result<Self> {
        if values.len() != grid.size() {
            return Err(OpticsError::SizeMismatch {
                expected: grid.size(),
                found: values.len(),
            });
        }
        Ok(Self { values, grid })
    }

    /// Pair values that are known to match the grid size.
    pub(crate) fn from_parts(values: Vec<T>, grid: Arc<Grid>) -> Self {
        debug_assert_eq!(values.len(), grid.size());
        Self { values, grid }
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn into_values(self) -> Vec<T> {
        self.values
    }

    pub fn grid(&self) -> &Arc<Grid> {
        &self.grid
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.values.iter()
    }

    /// New field on the same grid with `f` applied to every value.
    pub fn map<U>(&self, f: impl Fn(&T) -> U) -> Field<U> {
        Field {
            values: self.values.iter().map(f).collect(),
            grid: Arc::clone(&self.grid),
        }
    }

    /// Check that `other` has the same number of samples as this field's grid.
    pub(crate) fn check_same_size(&self, other: &Grid) -> Result<()> {
        if other.size() != self.grid.size() {
            return Err(OpticsError::SizeMismatch {
                expected: self.grid.size(),
                found: other.size(),
            });
        }
        Ok(())
    }
}

impl Field<f64> {
    /// Field of zeros on `grid`.
    pub fn zeros(grid: Arc<Grid>) -> Self {
        Self::from_parts(vec![0.0; grid.size()], grid)
    }

    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Two-dimensional view of a field sampled on a separated grid.
    pub fn shaped(&self) -> Result<ShapedField<'_>> {
        let [nrows, ncols] = self.grid.shape()?;
        Ok(ShapedField { field: self, nrows, ncols })
    }
}

impl<T> Index<usize> for Field<T> {
    type Output = T;
    fn index(&self, index: usize) -> &T {
        &self.values[index]
    }
}

impl<'a, T> IntoIterator for &'a Field<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// Row/column view of a real [Field] on a separated grid, rows following
/// the second grid axis.
#[derive(Debug)]
pub struct ShapedField<'a> {
    field: &'a Field<f64>,
    nrows: usize,
    ncols: usize,
}

impl Matrix for ShapedField<'_> {
    fn nrows(&self) -> usize {
        self.nrows
    }
    fn ncols(&self) -> usize {
        self.ncols
    }
    fn eval(&self, row_index: usize, col_index: usize) -> f64 {
        self.field.values[row_index * self.ncols + col_index]
    }
}

impl fmt::Display for ShapedField<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.format(f)
    }
}

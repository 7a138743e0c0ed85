//! Exact brute-force cosine similarity.
//!
//! Both sets are unit-normalized once and multiplied as dense matrices, so a
//! cell is `inquiry_unit · reference_unit`. Vectors whose L2 norm is zero or
//! not finite cannot be normalized; they are zeroed instead and score exactly
//! `0.0` against everything. NaN never reaches the matrix.

use ndarray::{Array2, ArrayView1};

use crate::types::{MatchError, VectorSet};

/// Dense `(inquiries, references)` matrix of cosine similarities in `[-1, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    cells: Array2<f64>,
}

impl SimilarityMatrix {
    /// Wraps precomputed rows. Every row must have the same length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, MatchError> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        let mut flat = Vec::with_capacity(rows.len() * cols);
        for (row, values) in rows.iter().enumerate() {
            if values.len() != cols {
                return Err(MatchError::RaggedMatrix {
                    row,
                    expected: cols,
                    actual: values.len(),
                });
            }
            flat.extend_from_slice(values);
        }
        let cells = Array2::from_shape_vec((rows.len(), cols), flat).map_err(|e| {
            MatchError::InvalidConfig(format!("cannot shape similarity matrix: {e}"))
        })?;
        Ok(Self { cells })
    }

    pub fn rows(&self) -> usize {
        self.cells.nrows()
    }

    pub fn cols(&self) -> usize {
        self.cells.ncols()
    }

    /// `(rows, cols)`, i.e. `(|inquiries|, |references|)`.
    pub fn shape(&self) -> (usize, usize) {
        self.cells.dim()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.cells.get((row, col)).copied()
    }

    pub fn row(&self, row: usize) -> ArrayView1<'_, f64> {
        self.cells.row(row)
    }

    pub fn as_array(&self) -> &Array2<f64> {
        &self.cells
    }
}

/// Output of [`score`]: the matrix plus the vectors that had to be zeroed.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreReport {
    pub matrix: SimilarityMatrix,
    /// Inquiry indices with a zero or non-finite norm.
    pub degenerate_inquiries: Vec<usize>,
    /// Reference indices with a zero or non-finite norm.
    pub degenerate_references: Vec<usize>,
}

impl ScoreReport {
    pub fn has_degenerate(&self) -> bool {
        !self.degenerate_inquiries.is_empty() || !self.degenerate_references.is_empty()
    }
}

/// Scores every inquiry against every reference.
///
/// Fails when either set is empty or when any vector's length differs from
/// the first inquiry vector's.
pub fn score<I, R>(inquiries: &[I], references: &[R]) -> Result<ScoreReport, MatchError>
where
    I: AsRef<[f64]>,
    R: AsRef<[f64]>,
{
    let first = inquiries
        .first()
        .ok_or(MatchError::EmptySet(VectorSet::Inquiry))?;
    if references.is_empty() {
        return Err(MatchError::EmptySet(VectorSet::Reference));
    }
    let dim = first.as_ref().len();

    let (queries, degenerate_inquiries) = unit_rows(inquiries, dim, VectorSet::Inquiry)?;
    let (docs, degenerate_references) = unit_rows(references, dim, VectorSet::Reference)?;

    let mut cells = queries.dot(&docs.t());
    // Rounding can push identical directions a hair past 1.
    cells.mapv_inplace(|x| x.clamp(-1.0, 1.0));
    for &row in &degenerate_inquiries {
        cells.row_mut(row).fill(0.0);
    }
    for &col in &degenerate_references {
        cells.column_mut(col).fill(0.0);
    }

    Ok(ScoreReport {
        matrix: SimilarityMatrix { cells },
        degenerate_inquiries,
        degenerate_references,
    })
}

/// Cosine similarity of two vectors, with the same zero-norm guard as [`score`].
pub fn cosine(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }
    let (Some(ua), Some(ub)) = (unit_vector(a), unit_vector(b)) else {
        return 0.0;
    };
    let dot: f64 = ua.iter().zip(&ub).map(|(x, y)| x * y).sum();
    dot.clamp(-1.0, 1.0)
}

/// `v / |v|`, or `None` when the norm is zero or not finite.
///
/// Components are divided by the largest magnitude before squaring so tiny
/// or huge vectors neither underflow to zero nor overflow to infinity.
fn unit_vector(v: &[f64]) -> Option<Vec<f64>> {
    if v.iter().any(|x| !x.is_finite()) {
        return None;
    }
    let scale = v.iter().fold(0.0_f64, |max, x| max.max(x.abs()));
    if scale == 0.0 {
        return None;
    }
    let scaled: Vec<f64> = v.iter().map(|x| x / scale).collect();
    let norm = scaled.iter().map(|x| x * x).sum::<f64>().sqrt();
    Some(scaled.into_iter().map(|x| x / norm).collect())
}

fn unit_rows<V: AsRef<[f64]>>(
    vectors: &[V],
    dim: usize,
    set: VectorSet,
) -> Result<(Array2<f64>, Vec<usize>), MatchError> {
    let mut out = Array2::<f64>::zeros((vectors.len(), dim));
    let mut degenerate = Vec::new();

    for (index, vector) in vectors.iter().enumerate() {
        let vector = vector.as_ref();
        if vector.len() != dim {
            return Err(MatchError::DimensionMismatch {
                set,
                index,
                expected: dim,
                actual: vector.len(),
            });
        }
        match unit_vector(vector) {
            Some(unit) => {
                for (cell, value) in out.row_mut(index).iter_mut().zip(unit) {
                    *cell = value;
                }
            }
            None => degenerate.push(index),
        }
    }

    Ok((out, degenerate))
}

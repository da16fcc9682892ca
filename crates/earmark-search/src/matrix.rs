//! Sparse row storage for TF-IDF features.

use std::collections::BTreeMap;

use sprs::{CsMat, CsVec, CsVecView};

/// One document's weights over the vocabulary columns.
pub type SparseVector = CsVec<f64>;

/// Build an L2-normalized vector of dimension `dim` from per-column weights.
///
/// Zero weights are not stored, so a document with no weighted term yields
/// an empty vector rather than a row of NaNs.
#[must_use]
pub fn normalized_vector(dim: usize, weights: BTreeMap<usize, f64>) -> SparseVector {
    let norm = weights.values().map(|w| w * w).sum::<f64>().sqrt();
    let (indices, data): (Vec<usize>, Vec<f64>) = weights
        .into_iter()
        .filter(|(_, weight)| *weight != 0.0)
        .map(|(col, weight)| (col, weight / norm))
        .unzip();
    CsVec::new(dim, indices, data)
}

/// One sparse row per catalog entry, in catalog order, stored as CSR.
///
/// Rows are unit length, or empty for entries without any vocabulary
/// term. Immutable once fitted.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    matrix: CsMat<f64>,
}

impl FeatureMatrix {
    /// Stack `rows` into a CSR matrix with `n_cols` columns.
    #[must_use]
    pub fn from_rows(rows: &[SparseVector], n_cols: usize) -> Self {
        let mut indptr = Vec::with_capacity(rows.len() + 1);
        let mut indices = Vec::new();
        let mut data = Vec::new();

        indptr.push(0usize);
        for row in rows {
            for (col, &weight) in row.iter() {
                indices.push(col);
                data.push(weight);
            }
            indptr.push(indices.len());
        }

        Self {
            matrix: CsMat::new((rows.len(), n_cols), indptr, indices, data),
        }
    }

    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.matrix.rows()
    }

    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.matrix.cols()
    }

    /// Stored weights across all rows.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.matrix.nnz()
    }

    #[must_use]
    pub fn row(&self, idx: usize) -> Option<CsVecView<'_, f64>> {
        self.matrix.outer_view(idx)
    }

    pub fn rows(&self) -> impl Iterator<Item = CsVecView<'_, f64>> + '_ {
        self.matrix.outer_iterator()
    }

    /// Cosine similarity between two rows; both are pre-normalized so this
    /// is a plain dot product. Out-of-range rows score zero.
    #[must_use]
    pub fn similarity(&self, a: usize, b: usize) -> f64 {
        match (self.row(a), self.row(b)) {
            (Some(a), Some(b)) => a.dot(&b),
            _ => 0.0,
        }
    }

    /// Similarity of `query` against every row, in row order.
    #[must_use]
    pub fn scores_against(&self, query: &SparseVector) -> Vec<f64> {
        self.rows().map(|row| row.dot(query)).collect()
    }
}

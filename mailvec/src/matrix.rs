use std::collections::BTreeMap;

use sprs::CsMat;
use tracing::debug;

use crate::bag::WordCountBag;
use crate::vocabulary::{Vocabulary, OOV_INDEX};

/// Document-by-word count matrix in CSR form.
///
/// Row `i` belongs to the `i`-th encoded document. Column 0 holds the summed counts of
/// out-of-vocabulary words, column `j > 0` the count of the word with index `j`.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureMatrix {
    inner: CsMat<usize>,
}

impl FeatureMatrix {
    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        self.inner.shape()
    }

    pub fn rows(&self) -> usize {
        self.inner.rows()
    }

    pub fn cols(&self) -> usize {
        self.inner.cols()
    }

    /// Number of stored non-zero cells.
    pub fn nnz(&self) -> usize {
        self.inner.nnz()
    }

    /// Returns the value of a cell, 0 if it is not stored.
    ///
    /// # Panics
    ///
    /// Panics if the position is out of bounds.
    pub fn get(&self, row: usize, col: usize) -> usize {
        let (rows, cols) = self.shape();
        assert!(row < rows && col < cols, "position out of bounds");
        self.inner.get(row, col).copied().unwrap_or(0)
    }

    /// Sum of the cells of a row.
    pub fn row_sum(&self, row: usize) -> usize {
        self.inner
            .outer_view(row)
            .map_or(0, |r| r.data().iter().sum())
    }

    /// Iterates over the stored `(column, count)` pairs of a row in column order.
    pub fn row(&self, row: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.inner
            .outer_view(row)
            .into_iter()
            .flat_map(|r| {
                r.indices()
                    .iter()
                    .copied()
                    .zip(r.data().iter().copied())
                    .collect::<Vec<_>>()
            })
    }

    /// Expands the matrix into dense rows.
    pub fn to_dense(&self) -> Vec<Vec<usize>> {
        let cols = self.cols();
        self.inner
            .outer_iterator()
            .map(|r| {
                let mut dense = vec![0; cols];
                for (col, &count) in r.iter() {
                    dense[col] = count;
                }
                dense
            })
            .collect()
    }

    pub fn as_csr(&self) -> &CsMat<usize> {
        &self.inner
    }

    pub fn into_csr(self) -> CsMat<usize> {
        self.inner
    }
}

/// Encodes documents as rows of a [`FeatureMatrix`].
///
/// The shape is always `(bags.len(), vocabulary.max_size() + 1)`. Words missing from the
/// vocabulary are summed into column 0, so no count is lost.
pub fn transform(bags: &[WordCountBag], vocabulary: &Vocabulary) -> FeatureMatrix {
    debug!(
        num_docs = bags.len(),
        vocab_size = vocabulary.len(),
        "Transforming documents"
    );

    let num_cols = vocabulary.max_size() + 1;
    let mut indptr = Vec::with_capacity(bags.len() + 1);
    let mut indices = vec![];
    let mut data = vec![];
    indptr.push(0);

    for bag in bags {
        let mut row = BTreeMap::new();
        for (word, count) in bag.iter() {
            let col = vocabulary.get(word).unwrap_or(OOV_INDEX);
            *row.entry(col).or_insert(0) += count;
        }
        for (col, count) in row {
            indices.push(col);
            data.push(count);
        }
        indptr.push(indices.len());
    }

    debug!(nnz = data.len(), "Transform complete");
    FeatureMatrix {
        inner: CsMat::new((bags.len(), num_cols), indptr, indices, data),
    }
}

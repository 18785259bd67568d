use crate::error::{Result, SparseDataError};
use crate::sparse_dataset::{SparseRow, SparseSample};

/// Stored entries of one batched matrix as parallel
/// `(batch-local row, column, value)` sequences
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseCoo {
    pub rows: Vec<i64>,
    pub cols: Vec<i64>,
    pub values: Vec<f32>,
}

impl SparseCoo {
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `[rows, cols]`, the `2 x nnz` index layout of a COO tensor
    pub fn indices(&self) -> [&[i64]; 2] {
        [&self.rows, &self.cols]
    }
}

/// Features and labels of `batch_size` samples
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseBatch {
    pub x: SparseCoo,
    pub y: SparseCoo,
    pub batch_size: usize,
}

fn to_i64(index: usize) -> Result<i64> {
    i64::try_from(index).map_err(|_| SparseDataError::IndexOverflow { index })
}

fn collate_named<'a, I>(what: &str, rows: I) -> Result<SparseCoo>
where
    I: IntoIterator<Item = &'a SparseRow>,
    I::IntoIter: Clone,
{
    let rows = rows.into_iter();

    let mut nnz = 0;
    for (i, row) in rows.clone().enumerate() {
        if row.values.len() != row.indices.len() {
            return Err(SparseDataError::shape_mismatch(
                format!("values of {} {}", what, i),
                row.indices.len(),
                row.values.len(),
            ));
        }
        nnz += row.nnz();
    }

    let mut coo = SparseCoo {
        rows: Vec::with_capacity(nnz),
        cols: Vec::with_capacity(nnz),
        values: Vec::with_capacity(nnz),
    };

    for (i, row) in rows.enumerate() {
        let id = to_i64(i)?;
        coo.rows.extend(std::iter::repeat_n(id, row.nnz()));
        for &j in row.indices.iter() {
            coo.cols.push(to_i64(j)?);
        }
        coo.values.extend_from_slice(&row.values);
    }

    Ok(coo)
}

///
/// Stack sparse rows into one batched matrix. The `i`-th row gets
/// batch-local id `i`; its columns and values are appended verbatim,
/// so duplicates and order are whatever the row carried. Rows without
/// entries still take an id.
///
pub fn collate_rows<'a, I>(rows: I) -> Result<SparseCoo>
where
    I: IntoIterator<Item = &'a SparseRow>,
    I::IntoIter: Clone,
{
    collate_named("extract", rows)
}

///
/// Collate samples, in the given order, into one batch of features
/// and labels with `batch_size = samples.len()`
///
pub fn sparse_collate(samples: &[SparseSample]) -> Result<SparseBatch> {
    Ok(SparseBatch {
        x: collate_named("X extract", samples.iter().map(|s| &s.x))?,
        y: collate_named("Y extract", samples.iter().map(|s| &s.y))?,
        batch_size: samples.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_rows_keep_their_ids() -> anyhow::Result<()> {
        let rows = vec![
            SparseRow::new(vec![], vec![]),
            SparseRow::new(vec![4, 2], vec![1.0, 2.0]),
            SparseRow::new(vec![], vec![]),
            SparseRow::new(vec![0], vec![3.0]),
        ];
        let coo = collate_rows(&rows)?;
        assert_eq!(coo.rows, vec![1, 1, 3]);
        assert_eq!(coo.cols, vec![4, 2, 0]);
        assert_eq!(coo.values, vec![1.0, 2.0, 3.0]);
        Ok(())
    }

    #[test]
    fn duplicate_columns_survive() -> anyhow::Result<()> {
        let rows = vec![SparseRow::new(vec![7, 7], vec![1.0, 1.0])];
        let coo = collate_rows(&rows)?;
        assert_eq!(coo.cols, vec![7, 7]);
        assert_eq!(coo.indices(), [&[0_i64, 0][..], &[7_i64, 7][..]]);
        Ok(())
    }

    #[test]
    fn label_mismatch_names_the_matrix() {
        let samples = vec![SparseSample {
            x: SparseRow::new(vec![0], vec![1.0]),
            y: SparseRow::new(vec![0, 1], vec![1.0]),
        }];
        match sparse_collate(&samples) {
            Err(SparseDataError::ShapeMismatch {
                what,
                expected,
                got,
            }) => {
                assert!(what.starts_with("values of Y extract 0"));
                assert_eq!((expected, got), (2, 1));
            }
            other => panic!("expected a shape mismatch, got {:?}", other),
        }
    }
}

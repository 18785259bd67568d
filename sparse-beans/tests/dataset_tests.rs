use matrix_util::csr_util::{
    csr_from_triplets, sparse_format_err, CooMatrix, CscMatrix, CsrMatrix, RawCsr, SparseTriplets,
};
use sparse_beans::error::SparseDataError;
use sparse_beans::sparse_collate::sparse_collate;
use sparse_beans::sparse_dataset::{SparseDataset, SparseRow};

/// X: 2 x 3 with row 0 = {1: 0.5} and an empty row 1;
/// Y: 2 x 2 with row 0 = {0: -1, 1: +1}, row 1 = {0: +1}
fn two_samples() -> anyhow::Result<(CsrMatrix<f32>, CsrMatrix<f32>)> {
    let x = csr_from_triplets(2, 3, vec![(0, 1, 0.5)])?;
    let y = csr_from_triplets(2, 2, vec![(0, 0, -1.0), (0, 1, 1.0), (1, 0, 1.0)])?;
    Ok((x, y))
}

#[test]
fn labels_are_rescaled_to_zero_one() -> anyhow::Result<()> {
    let (x, y) = two_samples()?;
    let data = SparseDataset::new(x, y)?;

    assert_eq!(data.len(), 2);
    assert_eq!(data.input_size(), 3);
    assert_eq!(data.output_size(), 2);

    let row0 = data.get_row(0)?;
    assert_eq!(row0.y.indices, vec![0, 1]);
    approx::assert_abs_diff_eq!(row0.y.values[0], 0.0);
    approx::assert_abs_diff_eq!(row0.y.values[1], 1.0);

    let row1 = data.get_row(1)?;
    assert_eq!(row1.y.indices, vec![0]);
    approx::assert_abs_diff_eq!(row1.y.values[0], 1.0);

    Ok(())
}

#[test]
fn feature_rows_and_their_batch() -> anyhow::Result<()> {
    let (x, y) = two_samples()?;
    let data = SparseDataset::new(x, y)?;

    let row0 = data.get_row(0)?;
    let row1 = data.get_row(1)?;
    assert_eq!(row0.x, SparseRow::new(vec![1], vec![0.5]));
    assert_eq!(row1.x, SparseRow::new(vec![], vec![]));

    let batch = sparse_collate(&[row0, row1])?;
    assert_eq!(batch.batch_size, 2);
    assert_eq!(batch.x.rows, vec![0]);
    assert_eq!(batch.x.cols, vec![1]);
    assert_eq!(batch.x.values, vec![0.5]);

    assert_eq!(batch.y.rows, vec![0, 0, 1]);
    assert_eq!(batch.y.cols, vec![0, 1, 0]);
    assert_eq!(batch.y.values, vec![0.0, 1.0, 1.0]);
    Ok(())
}

#[test]
fn row_count_disagreement_is_a_shape_mismatch() -> anyhow::Result<()> {
    let x = csr_from_triplets(3, 2, vec![(0, 0, 1.0)])?;
    let y = csr_from_triplets(2, 2, vec![(0, 0, 1.0)])?;

    match SparseDataset::new(x, y) {
        Err(SparseDataError::ShapeMismatch { expected, got, .. }) => {
            assert_eq!((expected, got), (3, 2));
        }
        Err(e) => panic!("unexpected error: {}", e),
        Ok(_) => panic!("rows 3 vs. 2 must not be accepted"),
    }
    Ok(())
}

#[test]
fn out_of_range_row_is_rejected() -> anyhow::Result<()> {
    let (x, y) = two_samples()?;
    let data = SparseDataset::new(x, y)?;

    for idx in [2, 3, usize::MAX] {
        assert!(matches!(
            data.get_row(idx),
            Err(SparseDataError::IndexOutOfRange { index, len: 2 }) if index == idx
        ));
    }
    Ok(())
}

#[test]
fn rescale_keeps_every_stored_entry() -> anyhow::Result<()> {
    let triplets = vec![
        (0, 0, -1.0),
        (0, 3, 0.0),
        (1, 1, 1.0),
        (2, 2, 0.0),
        (2, 3, -1.0),
        (3, 0, 1.0),
    ];
    let y = csr_from_triplets(4, 4, triplets.clone())?;
    let x = csr_from_triplets(4, 5, vec![])?;
    let data = SparseDataset::new(x, y.clone())?;

    let labels = data.labels();
    assert_eq!(labels.nnz(), y.nnz());
    assert_eq!(labels.row_offsets(), y.row_offsets());
    assert_eq!(labels.col_indices(), y.col_indices());
    for (before, after) in y.values().iter().zip(labels.values()) {
        approx::assert_abs_diff_eq!((before + 1.0) / 2.0, *after);
    }
    Ok(())
}

#[test]
fn row_lengths_follow_row_offsets() -> anyhow::Result<()> {
    let x = csr_from_triplets(
        4,
        6,
        vec![(0, 5, 1.0), (0, 0, 1.0), (0, 2, 3.0), (2, 4, 2.0), (3, 1, 1.0)],
    )?;
    let y = csr_from_triplets(4, 3, vec![(1, 2, 1.0), (3, 0, -1.0), (3, 1, -1.0)])?;
    let data = SparseDataset::new(x.clone(), y.clone())?;

    for idx in 0..data.len() {
        let sample = data.get_row(idx)?;
        let x_len = x.row_offsets()[idx + 1] - x.row_offsets()[idx];
        let y_len = y.row_offsets()[idx + 1] - y.row_offsets()[idx];
        assert_eq!(sample.x.indices.len(), x_len);
        assert_eq!(sample.x.values.len(), x_len);
        assert_eq!(sample.y.indices.len(), y_len);
        assert_eq!(sample.y.values.len(), y_len);
    }
    Ok(())
}

#[test]
fn other_sparse_layouts_are_accepted() -> anyhow::Result<()> {
    // X as column-compressed f64, Y as coordinate i8
    let x = CscMatrix::<f64>::try_from_csc_data(2, 3, vec![0, 0, 1, 1], vec![0], vec![0.5])
        .map_err(sparse_format_err)?;
    let y = CooMatrix::<i8>::try_from_triplets(2, 2, vec![0, 0, 1], vec![0, 1, 0], vec![-1, 1, 1])
        .map_err(sparse_format_err)?;
    let data = SparseDataset::new(x, y)?;

    let row0 = data.get_row(0)?;
    assert_eq!(row0.x, SparseRow::new(vec![1], vec![0.5]));
    assert_eq!(row0.y, SparseRow::new(vec![0, 1], vec![0.0, 1.0]));

    let triplets = SparseTriplets::new(2, 3, vec![(0, 1, 0.5_f32)]);
    let labels = SparseTriplets::new(2, 2, vec![(1, 0, 1_i32)]);
    let data = SparseDataset::new(triplets, labels)?;
    assert_eq!(data.get_row(1)?.y, SparseRow::new(vec![0], vec![1.0]));
    Ok(())
}

#[test]
fn dataset_is_shared_across_threads() -> anyhow::Result<()> {
    use rayon::prelude::*;

    let n = 200;
    let x = csr_from_triplets(n, 10, (0..n).map(|i| (i, i % 10, i as f32)).collect())?;
    let y = csr_from_triplets(n, 3, (0..n).map(|i| (i, i % 3, 1.0)).collect())?;
    let data = SparseDataset::new(x, y)?;

    let rows = (0..n)
        .into_par_iter()
        .map(|i| data.get_row(i))
        .collect::<Result<Vec<_>, _>>()?;

    for (i, row) in rows.iter().enumerate() {
        assert_eq!(row.x.indices, vec![i % 10]);
        approx::assert_abs_diff_eq!(row.x.values[0], i as f32);
        assert_eq!(row.y.indices, vec![i % 3]);
    }
    Ok(())
}

#[test]
fn raw_arrays_in_any_column_order_come_out_sorted() -> anyhow::Result<()> {
    let x = RawCsr {
        nrows: 2,
        ncols: 5,
        row_offsets: vec![0, 3, 4],
        col_indices: vec![4, 1, 3, 0],
        values: vec![0.4_f32, 0.1, 0.3, 1.0],
    };
    let y = RawCsr {
        nrows: 2,
        ncols: 3,
        row_offsets: vec![0, 2, 2],
        col_indices: vec![2, 0],
        values: vec![-1.0_f64, 1.0],
    };
    let data = SparseDataset::new(x, y)?;

    let row0 = data.get_row(0)?;
    assert_eq!(row0.x, SparseRow::new(vec![1, 3, 4], vec![0.1, 0.3, 0.4]));
    assert_eq!(row0.y, SparseRow::new(vec![0, 2], vec![1.0, 0.0]));
    assert!(data.get_row(1)?.y.is_empty());
    Ok(())
}

use crate::common_io::*;
use crate::csr_util::{csr_from_triplets, CsrMatrix};
use anyhow::anyhow;
use rayon::prelude::*;
use std::io::{BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq)]
enum MtxField {
    Real,
    Pattern,
}

/// `%%MatrixMarket matrix coordinate <field> general`
fn parse_banner(banner: &str) -> anyhow::Result<MtxField> {
    let words: Vec<String> = banner
        .split_whitespace()
        .map(|w| w.to_lowercase())
        .collect();

    if words.len() < 5 || words[0] != "%%matrixmarket" || words[1] != "matrix" {
        anyhow::bail!("not a MatrixMarket banner: {}", banner);
    }
    if words[2] != "coordinate" {
        anyhow::bail!("only coordinate format is supported, found {}", words[2]);
    }
    if words[4] != "general" {
        anyhow::bail!("only general symmetry is supported, found {}", words[4]);
    }

    match words[3].as_str() {
        "real" | "double" | "integer" => Ok(MtxField::Real),
        "pattern" => Ok(MtxField::Pattern),
        other => Err(anyhow!("unsupported MatrixMarket field: {}", other)),
    }
}

fn parse_shape(line: &str) -> anyhow::Result<(usize, usize, usize)> {
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.len() != 3 {
        anyhow::bail!("failed to parse mtx header: {}", line);
    }
    Ok((words[0].parse()?, words[1].parse()?, words[2].parse()?))
}

// 1-based `row col [value]` to a 0-based triplet
fn parse_entry(line: &str, field: MtxField) -> anyhow::Result<(usize, usize, f32)> {
    let words: Vec<&str> = line.split_whitespace().collect();

    let expected = match field {
        MtxField::Real => 3,
        MtxField::Pattern => 2,
    };
    if words.len() != expected {
        anyhow::bail!("expected {} fields: {}", expected, line);
    }

    let row = words[0].parse::<usize>()?;
    let col = words[1].parse::<usize>()?;
    if row == 0 || col == 0 {
        anyhow::bail!("mtx indices are 1-based: {}", line);
    }

    let val = match field {
        MtxField::Real => words[2].parse::<f32>()?,
        MtxField::Pattern => 1.0,
    };

    Ok((row - 1, col - 1, val))
}

/// Read a MatrixMarket coordinate file into a row-compressed matrix.
/// Entries whose value is zero stay stored.
/// * `mtx_file` - Path to the matrix market file (e.g., "x.mtx.gz")
pub fn read_mtx_csr(mtx_file: &str) -> anyhow::Result<CsrMatrix<f32>> {
    let mut lines = open_buf_reader(mtx_file)?.lines();

    let banner = lines
        .next()
        .ok_or_else(|| anyhow!("empty mtx file: {}", mtx_file))??;
    let field = parse_banner(&banner)?;

    let mut shape = None;
    let mut data_lines: Vec<Box<str>> = vec![];

    for line in lines {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('%') {
            continue;
        }
        if shape.is_none() {
            shape = Some(parse_shape(line)?);
        } else {
            data_lines.push(line.into());
        }
    }

    let (nrow, ncol, nnz) = shape.ok_or_else(|| anyhow!("no mtx header in {}", mtx_file))?;

    let triplets = data_lines
        .par_iter()
        .map(|line| parse_entry(line, field))
        .collect::<anyhow::Result<Vec<_>>>()?;

    if triplets.len() != nnz {
        anyhow::bail!(
            "{}: header says {} entries, found {}",
            mtx_file,
            nnz,
            triplets.len()
        );
    }

    csr_from_triplets(nrow, ncol, triplets)
}

/// Write every stored entry of `csr` into a MatrixMarket file with
/// 1-based indices
/// * `csr` - the matrix to write
/// * `mtx_file` - the output file (e.g., "matrix.mtx.gz")
pub fn write_mtx_csr(csr: &CsrMatrix<f32>, mtx_file: &str) -> anyhow::Result<()> {
    mkdir(mtx_file)?;

    let mut buf = open_buf_writer(mtx_file)?;

    writeln!(buf, "%%MatrixMarket matrix coordinate real general")?;
    writeln!(buf, "{}\t{}\t{}", csr.nrows(), csr.ncols(), csr.nnz())?;

    for (row, col, val) in csr.triplet_iter() {
        writeln!(buf, "{}\t{}\t{}", row + 1, col + 1, val)?;
    }

    buf.flush()?;
    Ok(())
}

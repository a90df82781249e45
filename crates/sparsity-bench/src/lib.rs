//! Benchmark profiles for the sparsity workspace.
//!
//! - [`stencil_pairs`]: five-point finite-difference stencil on an `n` by `n` grid
//! - [`build_pattern`]: assemble a pattern from a pair list with a given initial capacity

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use sparsity_pattern::{PatternError, SparsityPattern};

/// Coupling pairs of a five-point stencil on an `n` by `n` grid.
///
/// Unknowns are numbered row-major from 1. Each unknown couples to itself
/// and its in-grid north, south, east, and west neighbours, so interior rows
/// end up with 5 columns. Pairs are emitted per unknown, without duplicates.
pub fn stencil_pairs(n: usize) -> Vec<(usize, usize)> {
    let mut pairs = Vec::with_capacity(5 * n * n);
    for j in 0..n {
        for i in 0..n {
            let row = j * n + i + 1;
            pairs.push((row, row));
            if i > 0 {
                pairs.push((row, row - 1));
            }
            if i + 1 < n {
                pairs.push((row, row + 1));
            }
            if j > 0 {
                pairs.push((row, row - n));
            }
            if j + 1 < n {
                pairs.push((row, row + n));
            }
        }
    }
    pairs
}

/// Build a square pattern of `size` rows from `pairs`.
///
/// # Errors
///
/// Any error from [`SparsityPattern::insert`].
pub fn build_pattern(
    size: usize,
    initial_capacity: usize,
    pairs: &[(usize, usize)],
) -> Result<SparsityPattern, PatternError> {
    let mut pattern = SparsityPattern::with_capacity(size, size, initial_capacity)?;
    pattern.insert_all(pairs.iter().copied())?;
    Ok(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stencil_row_lengths() {
        let n = 4;
        let pattern = build_pattern(n * n, 1, &stencil_pairs(n)).unwrap();
        // Corner, edge, interior.
        assert_eq!(pattern.row_len(1).unwrap(), 3);
        assert_eq!(pattern.row_len(2).unwrap(), 4);
        assert_eq!(pattern.row_len(6).unwrap(), 5);
        assert_eq!(pattern.row_view(6).unwrap().to_vec(), vec![2, 5, 6, 7, 10]);
    }

    #[test]
    fn stencil_has_no_duplicates() {
        let n = 5;
        let pairs = stencil_pairs(n);
        let pattern = build_pattern(n * n, 8, &pairs).unwrap();
        assert_eq!(pattern.nnz(), pairs.len());
    }
}

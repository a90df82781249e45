//! Test utilities for sparsity pattern development.
//!
//! Stands in for the mesh traversal that feeds a pattern in production:
//! the fixtures in [`mesh`] emit `(row, col)` pairs the way element-by-element
//! assembly discovers them, and [`ReferencePattern`] is a plain
//! `BTreeSet`-per-row model to compare against.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod mesh;

use std::collections::BTreeSet;

/// Obviously-correct pattern model: one ordered set per 1-based row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReferencePattern {
    rows: Vec<BTreeSet<usize>>,
}

impl ReferencePattern {
    pub fn new(row_count: usize) -> Self {
        Self {
            rows: vec![BTreeSet::new(); row_count],
        }
    }

    /// Record `(row, col)`; returns whether it was new.
    ///
    /// # Panics
    ///
    /// Panics if `row` is 0 or past `row_count`.
    pub fn insert(&mut self, row: usize, col: usize) -> bool {
        self.rows[row - 1].insert(col)
    }

    /// Sorted columns of a 1-based row.
    pub fn row(&self, row: usize) -> Vec<usize> {
        self.rows[row - 1].iter().copied().collect()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn nnz(&self) -> usize {
        self.rows.iter().map(BTreeSet::len).sum()
    }

    /// Build from a pair stream.
    pub fn from_pairs(row_count: usize, pairs: impl IntoIterator<Item = (usize, usize)>) -> Self {
        let mut model = Self::new(row_count);
        for (row, col) in pairs {
            model.insert(row, col);
        }
        model
    }
}

/// Compressed sparse row offsets and column indices from per-row lists.
///
/// This is the shape a downstream matrix builder derives from a finished
/// pattern: `offsets[r]..offsets[r + 1]` indexes row `r + 1`'s columns.
pub fn to_csr<R, C>(rows: R) -> (Vec<usize>, Vec<usize>)
where
    R: IntoIterator<Item = C>,
    C: IntoIterator<Item = usize>,
{
    let mut offsets = vec![0];
    let mut columns = Vec::new();
    for row in rows {
        columns.extend(row);
        offsets.push(columns.len());
    }
    (offsets, columns)
}

//! Element connectivity fixtures.
//!
//! Each element couples every pair of its nodes, so assembly visits
//! `(a, b)` for all `a, b` in the element, including `a == b`. Shared nodes
//! make neighbouring elements emit the same pair, which is exactly the
//! duplicate traffic a pattern has to collapse.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Node lists of a 1D chain of `elements` two-node line elements.
///
/// Nodes are numbered `1..=elements + 1`.
pub fn line_elements(elements: usize) -> Vec<Vec<usize>> {
    (1..=elements).map(|e| vec![e, e + 1]).collect()
}

/// Node lists of an `nx` by `ny` grid of four-node quadrilaterals.
///
/// Nodes are numbered row-major from 1, `(nx + 1) * (ny + 1)` in total.
pub fn grid_elements(nx: usize, ny: usize) -> Vec<Vec<usize>> {
    let stride = nx + 1;
    let mut elements = Vec::with_capacity(nx * ny);
    for j in 0..ny {
        for i in 0..nx {
            let lower = j * stride + i + 1;
            let upper = lower + stride;
            elements.push(vec![lower, lower + 1, upper + 1, upper]);
        }
    }
    elements
}

/// Number of nodes in a grid built by [`grid_elements`].
pub fn grid_node_count(nx: usize, ny: usize) -> usize {
    (nx + 1) * (ny + 1)
}

/// Element-by-element assembly order: every node pair of every element.
pub fn assembly_pairs(elements: &[Vec<usize>]) -> Vec<(usize, usize)> {
    elements
        .iter()
        .flat_map(|nodes| {
            nodes
                .iter()
                .flat_map(move |&a| nodes.iter().map(move |&b| (a, b)))
        })
        .collect()
}

/// Seeded random pair stream for differential tests.
///
/// Produces `count` pairs with rows in `1..=row_count` and columns in
/// `1..=col_count`. The same seed always yields the same stream.
pub fn random_pairs(
    seed: u64,
    row_count: usize,
    col_count: usize,
    count: usize,
) -> Vec<(usize, usize)> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            (
                rng.random_range(1..=row_count),
                rng.random_range(1..=col_count),
            )
        })
        .collect()
}

/// Shuffle `pairs` deterministically and append `repeats` extra copies of
/// randomly chosen entries.
pub fn shuffled_with_repeats(
    mut pairs: Vec<(usize, usize)>,
    seed: u64,
    repeats: usize,
) -> Vec<(usize, usize)> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    if !pairs.is_empty() {
        for _ in 0..repeats {
            let pick = pairs[rng.random_range(0..pairs.len())];
            pairs.push(pick);
        }
    }
    pairs.shuffle(&mut rng);
    pairs
}

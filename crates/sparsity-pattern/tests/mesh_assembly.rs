//! Integration test: build patterns from mesh connectivity and random
//! pair streams, and check them against the `BTreeSet` reference model.

use sparsity_pattern::{PatternError, SparsityPattern};
use sparsity_test_utils::mesh::{
    assembly_pairs, grid_elements, grid_node_count, line_elements, random_pairs,
    shuffled_with_repeats,
};
use sparsity_test_utils::{to_csr, ReferencePattern};

fn assert_matches(pattern: &SparsityPattern, model: &ReferencePattern) {
    assert_eq!(pattern.row_count(), model.row_count());
    for view in pattern {
        let got: Vec<usize> = view.iter().map(|c| c as usize).collect();
        assert_eq!(got, model.row(view.row()), "row {}", view.row());
    }
    assert_eq!(pattern.nnz(), model.nnz());
}

// ── Mesh-driven assembly ────────────────────────────────────────────

#[test]
fn grid_assembly_matches_reference() {
    let (nx, ny) = (6, 4);
    let nodes = grid_node_count(nx, ny);
    let pairs = shuffled_with_repeats(assembly_pairs(&grid_elements(nx, ny)), 11, 50);

    let mut pattern = SparsityPattern::with_capacity(nodes, nodes, 2).unwrap();
    pattern.insert_all(pairs.iter().copied()).unwrap();

    assert_matches(&pattern, &ReferencePattern::from_pairs(nodes, pairs));
}

#[test]
fn grid_interior_node_couples_to_nine() {
    let (nx, ny) = (3, 3);
    let nodes = grid_node_count(nx, ny);
    let mut pattern = SparsityPattern::new(nodes, nodes).unwrap();
    pattern
        .insert_all(assembly_pairs(&grid_elements(nx, ny)))
        .unwrap();

    // Node 6 is interior: (1,1) in a 4x4 node lattice.
    let view = pattern.row_view(6).unwrap();
    assert_eq!(view.to_vec(), vec![1, 2, 3, 5, 6, 7, 9, 10, 11]);
    // Corner node 1 sees only its own element.
    assert_eq!(pattern.row_view(1).unwrap().to_vec(), vec![1, 2, 5, 6]);
}

#[test]
fn line_chain_rows_grow_from_single_slot() {
    let elements = 5;
    let nodes = elements + 1;
    let mut pattern = SparsityPattern::with_capacity(nodes, nodes, 1).unwrap();
    pattern.insert_all(assembly_pairs(&line_elements(elements))).unwrap();

    // End nodes hold 2 columns, interior nodes 3; capacity doubles 1 → 2 → 4.
    assert_eq!(pattern.row_view(1).unwrap().to_vec(), vec![1, 2]);
    assert_eq!(pattern.row_capacity(1).unwrap(), 2);
    assert_eq!(pattern.row_view(3).unwrap().to_vec(), vec![2, 3, 4]);
    assert_eq!(pattern.row_capacity(3).unwrap(), 4);
    assert_eq!(pattern.row_view(nodes).unwrap().to_vec(), vec![5, 6]);

    // Superseded blocks went back to the heap.
    assert_eq!(pattern.heap_stats().live_blocks, nodes);
}

#[test]
fn assembly_order_does_not_matter() {
    let (nx, ny) = (4, 2);
    let nodes = grid_node_count(nx, ny);
    let pairs = assembly_pairs(&grid_elements(nx, ny));

    let mut forward = SparsityPattern::new(nodes, nodes).unwrap();
    forward.insert_all(pairs.iter().copied()).unwrap();

    let mut shuffled = SparsityPattern::with_capacity(nodes, nodes, 1).unwrap();
    shuffled
        .insert_all(shuffled_with_repeats(pairs, 99, 20))
        .unwrap();

    for (a, b) in forward.rows().zip(shuffled.rows()) {
        assert_eq!(a.to_vec(), b.to_vec());
    }
}

// ── Random streams ──────────────────────────────────────────────────

#[test]
fn random_streams_match_reference() {
    for seed in 0..8 {
        let (rows, cols) = (40, 300);
        let pairs = random_pairs(seed, rows, cols, 2_000);

        let mut pattern = SparsityPattern::with_capacity(rows, cols, 4).unwrap();
        let added = pattern.insert_all(pairs.iter().copied()).unwrap();

        let model = ReferencePattern::from_pairs(rows, pairs);
        assert_eq!(added, model.nnz());
        assert_matches(&pattern, &model);
    }
}

#[test]
fn random_stream_into_u64_pattern() {
    let (rows, cols) = (10, 1_000);
    let pairs = random_pairs(5, rows, cols, 500);

    let mut pattern = SparsityPattern::<u64>::with_heap_config(
        rows,
        cols,
        2,
        sparsity_heap::HeapConfig::default(),
    )
    .unwrap();
    pattern.insert_all(pairs.iter().copied()).unwrap();

    let model = ReferencePattern::from_pairs(rows, pairs);
    for row in 1..=rows {
        let got: Vec<usize> = pattern
            .row_view(row)
            .unwrap()
            .iter()
            .map(|c| c as usize)
            .collect();
        assert_eq!(got, model.row(row));
    }
}

// ── Downstream consumers ────────────────────────────────────────────

#[test]
fn csr_build_from_rows() {
    let (nx, ny) = (2, 2);
    let nodes = grid_node_count(nx, ny);
    let mut pattern = SparsityPattern::new(nodes, nodes).unwrap();
    pattern
        .insert_all(assembly_pairs(&grid_elements(nx, ny)))
        .unwrap();

    let (offsets, columns) =
        to_csr(pattern.rows().map(|view| view.iter().map(|c| c as usize)));

    assert_eq!(offsets.len(), nodes + 1);
    assert_eq!(*offsets.last().unwrap(), pattern.nnz());
    for (r, window) in offsets.windows(2).enumerate() {
        let row = &columns[window[0]..window[1]];
        assert!(row.windows(2).all(|w| w[0] < w[1]), "row {} unsorted", r + 1);
        assert_eq!(row.len(), pattern.row_len(r + 1).unwrap());
    }
}

#[test]
fn out_of_range_pair_stops_assembly() {
    let mut pattern = SparsityPattern::new(3, 3).unwrap();
    let err = pattern
        .insert_all([(1, 1), (2, 2), (4, 1), (3, 3)])
        .unwrap_err();
    assert!(matches!(
        err,
        PatternError::RowOutOfRange { row: 4, row_count: 3 }
    ));
    assert_eq!(pattern.nnz(), 2);
    assert!(pattern.row_view(3).unwrap().is_empty());
}

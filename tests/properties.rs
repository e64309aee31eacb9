//! Property-based tests for mesh extraction.
//!
//! These tests generate random kernel reports and verify extraction
//! invariants.
//!
//! Run with: cargo test --test properties

use proptest::prelude::*;
use rippl::grid::connectivity::decode_connectivity;
use rippl::prelude::*;

// =============================================================================
// Strategies for generating random kernel reports
// =============================================================================

fn arb_cell_type() -> impl Strategy<Value = CellType> {
    prop::sample::select(CellType::ALL.to_vec())
}

/// A well-formed kernel report: `1..=N` node tags in shuffled order and
/// elements of one cell type referencing existing tags.
fn arb_reports() -> impl Strategy<Value = (CellType, RawNodeReport, RawElementReport)> {
    (arb_cell_type(), 1usize..60, 0usize..20).prop_flat_map(|(cell_type, extra, num_elements)| {
        let num_nodes = cell_type.nodes_per_element() + extra;
        let tags = Just((1..=num_nodes as u64).collect::<Vec<_>>()).prop_shuffle();
        let coords = prop::collection::vec(-100.0..100.0f64, num_nodes * 3);
        let element_tags = prop::collection::vec(
            1..=num_nodes as u64,
            num_elements * cell_type.nodes_per_element(),
        );

        (tags, coords, element_tags).prop_map(move |(tags, coords, element_tags)| {
            (
                cell_type,
                RawNodeReport::new(tags, coords),
                RawElementReport::single(cell_type.kernel_code(), element_tags),
            )
        })
    })
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn proptest_connectivity_layout((cell_type, nodes, elements) in arb_reports()) {
        let mesh = MeshExtractor::extract(&nodes, &elements, cell_type.dimension()).unwrap();
        let k = cell_type.nodes_per_element();

        prop_assert_eq!(mesh.cell_type(), cell_type);
        prop_assert_eq!(mesh.num_nodes(), nodes.num_nodes());

        let connectivity = mesh.connectivity();
        prop_assert_eq!(connectivity.len(), mesh.num_elements() * (k + 1));
        for cell in connectivity.chunks_exact(k + 1) {
            prop_assert_eq!(cell[0], k as i64);
            for &index in &cell[1..] {
                prop_assert!(index >= 0 && (index as usize) < mesh.num_nodes());
            }
        }
    }

    #[test]
    fn proptest_indices_are_tags_minus_one((cell_type, nodes, elements) in arb_reports()) {
        let mesh = MeshExtractor::extract(&nodes, &elements, cell_type.dimension()).unwrap();

        let tags = &elements.node_tag_lists[0];
        let indices = mesh.element_indices();
        prop_assert_eq!(indices.len(), tags.len());
        for (&tag, &index) in tags.iter().zip(indices) {
            prop_assert_eq!(index as u64, tag - 1);
        }
    }

    #[test]
    fn proptest_nodes_are_placed_by_tag((cell_type, nodes, elements) in arb_reports()) {
        let mesh = MeshExtractor::extract(&nodes, &elements, cell_type.dimension()).unwrap();

        for (&tag, xyz) in nodes.node_tags.iter().zip(nodes.coordinates.chunks_exact(3)) {
            let p = mesh.node(tag as usize - 1).unwrap();
            prop_assert_eq!([p.x, p.y, p.z], [xyz[0], xyz[1], xyz[2]]);
        }
    }

    #[test]
    fn proptest_connectivity_decodes_to_rows((cell_type, nodes, elements) in arb_reports()) {
        let mesh = MeshExtractor::extract(&nodes, &elements, cell_type.dimension()).unwrap();

        let rows = decode_connectivity(&mesh.connectivity()).unwrap();
        let expected: Vec<Vec<usize>> = mesh.elements().map(<[usize]>::to_vec).collect();
        prop_assert_eq!(rows, expected);
    }

    #[test]
    fn proptest_grid_matches_mesh((cell_type, nodes, elements) in arb_reports()) {
        let mesh = MeshExtractor::extract(&nodes, &elements, cell_type.dimension()).unwrap();
        let grid = UnstructuredGrid::from_mesh(&mesh);

        prop_assert_eq!(grid.num_points(), mesh.num_nodes());
        prop_assert_eq!(grid.num_cells(), mesh.num_elements());
        let connectivity = mesh.connectivity();
        prop_assert_eq!(grid.connectivity(), connectivity.as_slice());
        prop_assert_eq!(
            grid.cell_types().to_array(),
            vec![cell_type.vtk_code(); mesh.num_elements()]
        );

        let offsets = grid.offsets();
        prop_assert_eq!(offsets.len(), grid.num_cells());
        prop_assert_eq!(
            offsets.last().copied().unwrap_or(0),
            grid.cell_connectivity().len() as i64
        );
    }

    #[test]
    fn proptest_gap_in_tags_rejected(
        (cell_type, mut nodes, elements) in arb_reports(),
        pick in any::<prop::sample::Index>(),
    ) {
        // Moving one tag past N leaves a hole in 1..=N.
        let i = pick.index(nodes.node_tags.len());
        nodes.node_tags[i] = nodes.num_nodes() as u64 + 1;

        let result = MeshExtractor::extract(&nodes, &elements, cell_type.dimension());
        let is_gap_error = matches!(result, Err(MeshError::NonContiguousNodeTags { .. }));
        prop_assert!(is_gap_error);
    }

    #[test]
    fn proptest_indivisible_tag_list_rejected(
        (cell_type, nodes, mut elements) in arb_reports(),
    ) {
        elements.node_tag_lists[0].push(1);

        let result = MeshExtractor::extract(&nodes, &elements, cell_type.dimension());
        let is_shape_error = matches!(result, Err(MeshError::MalformedElementData { .. }));
        prop_assert!(is_shape_error);
    }
}

#[test]
fn test_cell_table_is_consistent() {
    for cell_type in CellType::ALL {
        let k = cell_type.nodes_per_element();
        assert_eq!(CellType::from_nodes_per_element(k).unwrap(), cell_type);
        assert_eq!(
            CellType::from_kernel_code(cell_type.kernel_code(), cell_type.dimension()).unwrap(),
            cell_type
        );
        assert_eq!(rippl::mesh::vtk_cell_type(k).unwrap(), cell_type.vtk_code());
    }
}

//! Mesh extraction from raw meshing kernel output.
//!
//! Extraction turns a kernel's node report and one dimension's element
//! report into a [`NormalizedMesh`]:
//!
//! 1. [`validate_topology`] checks that the dimension holds a single element
//!    type.
//! 2. The type code is resolved to a [`CellType`].
//! 3. [`normalize_nodes`] and [`normalize_elements`] shift tags into dense
//!    0-based indices.
//! 4. [`NormalizedMesh::new`] checks every element index against the nodes.
//!
//! Any failure is returned as is; no partially built mesh escapes.
//!
//! # Example
//!
//! ```
//! use rippl::extract::MeshExtractor;
//! use rippl::kernel::{RawElementReport, RawNodeReport};
//!
//! let nodes = RawNodeReport::new(
//!     vec![1, 2, 3, 4],
//!     vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0],
//! );
//! let elements = RawElementReport::single(3, vec![1, 2, 3, 4]);
//!
//! let mesh = MeshExtractor::extract(&nodes, &elements, 2).unwrap();
//! assert_eq!(mesh.connectivity(), vec![4, 0, 1, 2, 3]);
//! assert_eq!(mesh.cell_type().vtk_code(), 9);
//! ```

mod normalize;
mod topology;

pub use normalize::{normalize_elements, normalize_nodes};
pub use topology::validate_topology;

use log::{debug, info};

use crate::error::{MeshError, Result};
use crate::kernel::{KernelSession, MeshingKernel, RawElementReport, RawNodeReport};
use crate::mesh::{CellType, NormalizedMesh};

/// Highest spatial dimension a meshing kernel reports.
pub const MAX_DIMENSION: u8 = 3;

/// Builds [`NormalizedMesh`] values from raw kernel reports.
pub struct MeshExtractor;

impl MeshExtractor {
    /// Extract the `dim`-dimensional elements of a mesh.
    pub fn extract(
        nodes: &RawNodeReport,
        elements: &RawElementReport,
        dim: u8,
    ) -> Result<NormalizedMesh> {
        if dim > MAX_DIMENSION {
            return Err(MeshError::invalid_param("dim", dim, "must be 0, 1, 2 or 3"));
        }

        let (code, node_tags) = validate_topology(elements, dim)?;
        let cell_type = CellType::from_kernel_code(code, dim)?;
        if cell_type.dimension() != dim {
            return Err(MeshError::UnsupportedTopology {
                dim,
                codes: vec![code],
            });
        }
        debug!(
            "Dimension {} holds {} elements (kernel type {})",
            dim, cell_type, code
        );

        let positions = normalize_nodes(&nodes.node_tags, &nodes.coordinates)?;
        let indices = normalize_elements(&node_tags, cell_type.nodes_per_element())?;
        let mesh = NormalizedMesh::new(positions, indices, cell_type)?;

        info!(
            "Extracted mesh: {} nodes, {} elements ({})",
            mesh.num_nodes(),
            mesh.num_elements(),
            mesh.cell_type()
        );
        Ok(mesh)
    }

    /// Extract the `dim`-dimensional elements from an active kernel session.
    pub fn extract_from_session<K: MeshingKernel + ?Sized>(
        session: &KernelSession<'_, K>,
        dim: u8,
    ) -> Result<NormalizedMesh> {
        let elements = session.element_report(dim)?;
        let nodes = session.node_report()?;
        Self::extract(&nodes, &elements, dim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square_nodes() -> RawNodeReport {
        RawNodeReport::new(
            vec![1, 2, 3, 4],
            vec![
                0.0, 0.0, 0.0, //
                1.0, 0.0, 0.0, //
                1.0, 1.0, 0.0, //
                0.0, 1.0, 0.0,
            ],
        )
    }

    /// A 2 x 1 strip of quads: nodes 1..=6, bottom row then top row.
    fn quad_strip() -> (RawNodeReport, RawElementReport) {
        let nodes = RawNodeReport::new(
            vec![1, 2, 3, 4, 5, 6],
            vec![
                0.0, 0.0, 0.0, //
                1.0, 0.0, 0.0, //
                2.0, 0.0, 0.0, //
                0.0, 1.0, 0.0, //
                1.0, 1.0, 0.0, //
                2.0, 1.0, 0.0,
            ],
        );
        let elements = RawElementReport::single(3, vec![1, 2, 5, 4, 2, 3, 6, 5]);
        (nodes, elements)
    }

    #[test]
    fn test_single_quad() {
        let elements = RawElementReport::single(3, vec![1, 2, 3, 4]);
        let mesh = MeshExtractor::extract(&unit_square_nodes(), &elements, 2).unwrap();

        assert_eq!(mesh.num_nodes(), 4);
        assert_eq!(mesh.num_elements(), 1);
        assert_eq!(mesh.element(0), Some(&[0, 1, 2, 3][..]));
        assert_eq!(mesh.connectivity(), vec![4, 0, 1, 2, 3]);
        assert_eq!(mesh.cell_types().uniform_code(), Some(9));
        assert_eq!(mesh.node_array()[2], [1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_quad_strip() {
        let (nodes, elements) = quad_strip();
        let mesh = MeshExtractor::extract(&nodes, &elements, 2).unwrap();

        assert_eq!(mesh.num_elements(), 2);
        assert_eq!(mesh.connectivity().len(), 2 * (4 + 1));
        for row in mesh.elements() {
            assert!(row.iter().all(|&i| i < mesh.num_nodes()));
        }
    }

    #[test]
    fn test_mixed_topology_rejected() {
        let elements = RawElementReport::new(vec![2, 3], vec![vec![1, 2, 3], vec![1, 2, 3, 4]]);
        let result = MeshExtractor::extract(&unit_square_nodes(), &elements, 2);
        assert!(matches!(
            result,
            Err(MeshError::UnsupportedTopology { ref codes, .. }) if codes == &[2, 3]
        ));
    }

    #[test]
    fn test_unknown_kernel_code_rejected() {
        // 2 = linear triangle
        let elements = RawElementReport::single(2, vec![1, 2, 3]);
        let result = MeshExtractor::extract(&unit_square_nodes(), &elements, 2);
        assert!(matches!(result, Err(MeshError::UnsupportedTopology { .. })));
    }

    #[test]
    fn test_cell_dimension_must_match() {
        let elements = RawElementReport::single(3, vec![1, 2, 3, 4]);
        let result = MeshExtractor::extract(&unit_square_nodes(), &elements, 3);
        assert!(matches!(
            result,
            Err(MeshError::UnsupportedTopology { dim: 3, .. })
        ));
    }

    #[test]
    fn test_indivisible_tag_list_rejected() {
        let elements = RawElementReport::single(3, (1..=10).collect());
        let result = MeshExtractor::extract(&unit_square_nodes(), &elements, 2);
        assert!(matches!(
            result,
            Err(MeshError::MalformedElementData {
                len: 10,
                nodes_per_element: 4
            })
        ));
    }

    #[test]
    fn test_element_referencing_missing_node() {
        let elements = RawElementReport::single(3, vec![1, 2, 3, 5]);
        let result = MeshExtractor::extract(&unit_square_nodes(), &elements, 2);
        assert!(matches!(
            result,
            Err(MeshError::InvalidNodeIndex { index: 4, .. })
        ));
    }

    #[test]
    fn test_dimension_out_of_range() {
        let elements = RawElementReport::single(3, vec![1, 2, 3, 4]);
        let result = MeshExtractor::extract(&unit_square_nodes(), &elements, 4);
        assert!(matches!(result, Err(MeshError::InvalidParameter { .. })));
    }

    #[test]
    fn test_repeated_extraction_is_independent() {
        let (nodes, elements) = quad_strip();
        let a = MeshExtractor::extract(&nodes, &elements, 2).unwrap();
        let b = MeshExtractor::extract(&nodes, &elements, 2).unwrap();
        assert_eq!(a, b);
        assert_ne!(a.nodes().as_ptr(), b.nodes().as_ptr());
    }
}

//! The normalized, 0-based mesh record.

use std::slice::ChunksExact;

use nalgebra::Point3;

use super::cell::CellType;
use crate::error::{MeshError, Result};
use crate::grid::connectivity;
use crate::grid::CellTypes;

/// A homogeneous mesh with dense 0-based node and element indices.
///
/// Nodes are stored in index order: node `i` is the node the meshing kernel
/// tagged `i + 1`. Elements are stored row-major, `nodes_per_element`
/// indices per row. A `NormalizedMesh` is immutable; the constructor checks
/// every invariant so a value of this type is always fully valid.
///
/// # Example
///
/// ```
/// use rippl::mesh::{CellType, NormalizedMesh};
/// use nalgebra::Point3;
///
/// let nodes = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let mesh = NormalizedMesh::new(nodes, vec![0, 1, 2, 3], CellType::Quad4).unwrap();
///
/// assert_eq!(mesh.num_elements(), 1);
/// assert_eq!(mesh.connectivity(), vec![4, 0, 1, 2, 3]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedMesh {
    nodes: Vec<Point3<f64>>,
    elements: Vec<usize>,
    cell_type: CellType,
}

impl NormalizedMesh {
    /// Assemble a mesh from nodes and flat row-major element indices.
    ///
    /// Fails with [`MeshError::MalformedElementData`] if `elements` does not
    /// split into whole rows, and with [`MeshError::InvalidNodeIndex`] if any
    /// index is out of range.
    pub fn new(nodes: Vec<Point3<f64>>, elements: Vec<usize>, cell_type: CellType) -> Result<Self> {
        let nodes_per_element = cell_type.nodes_per_element();
        if elements.len() % nodes_per_element != 0 {
            return Err(MeshError::MalformedElementData {
                len: elements.len(),
                nodes_per_element,
            });
        }

        let num_nodes = nodes.len();
        if let Some(pos) = elements.iter().position(|&i| i >= num_nodes) {
            return Err(MeshError::InvalidNodeIndex {
                element: pos / nodes_per_element,
                index: elements[pos],
                num_nodes,
            });
        }

        Ok(Self {
            nodes,
            elements,
            cell_type,
        })
    }

    /// Node positions, indexed `0..num_nodes()`.
    #[inline]
    pub fn nodes(&self) -> &[Point3<f64>] {
        &self.nodes
    }

    /// Position of a single node.
    #[inline]
    pub fn node(&self, index: usize) -> Option<&Point3<f64>> {
        self.nodes.get(index)
    }

    /// Iterate over element rows.
    #[inline]
    pub fn elements(&self) -> ChunksExact<'_, usize> {
        self.elements.chunks_exact(self.nodes_per_element())
    }

    /// Node indices of a single element.
    pub fn element(&self, index: usize) -> Option<&[usize]> {
        let k = self.nodes_per_element();
        let start = index.checked_mul(k)?;
        self.elements.get(start..start.checked_add(k)?)
    }

    /// All element indices, row-major.
    #[inline]
    pub fn element_indices(&self) -> &[usize] {
        &self.elements
    }

    /// The cell type shared by every element.
    #[inline]
    pub fn cell_type(&self) -> CellType {
        self.cell_type
    }

    /// Nodes per element.
    #[inline]
    pub fn nodes_per_element(&self) -> usize {
        self.cell_type.nodes_per_element()
    }

    /// Number of nodes.
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of elements.
    #[inline]
    pub fn num_elements(&self) -> usize {
        self.elements.len() / self.nodes_per_element()
    }

    /// Whether the mesh has no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Node positions as an N x 3 array.
    pub fn node_array(&self) -> Vec<[f64; 3]> {
        self.nodes.iter().map(|p| [p.x, p.y, p.z]).collect()
    }

    /// Count-prefixed connectivity buffer for an unstructured grid.
    pub fn connectivity(&self) -> Vec<i64> {
        connectivity::encode_flat(&self.elements, self.nodes_per_element())
    }

    /// Cell types of all elements.
    pub fn cell_types(&self) -> CellTypes {
        CellTypes::Uniform {
            code: self.cell_type.vtk_code(),
            count: self.num_elements(),
        }
    }

    /// Axis-aligned bounding box, or `None` for a mesh without nodes.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = self.nodes.first()?;
        let mut min = *first;
        let mut max = *first;
        for p in &self.nodes[1..] {
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }
        Some((min, max))
    }
}

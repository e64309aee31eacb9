//! Unstructured grid assembly.
//!
//! An [`UnstructuredGrid`] is the visualization-side view of a
//! [`NormalizedMesh`]: point coordinates, a count-prefixed connectivity
//! buffer and per-cell VTK type codes, in the layout VTK-style unstructured
//! grid constructors expect. The buffers are derived on demand and are not
//! part of the mesh itself.
//!
//! ```
//! use rippl::grid::UnstructuredGrid;
//! use rippl::mesh::{CellType, NormalizedMesh};
//! use nalgebra::Point3;
//!
//! let nodes = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let mesh = NormalizedMesh::new(nodes, vec![0, 1, 2, 3], CellType::Quad4).unwrap();
//! let grid = UnstructuredGrid::from_mesh(&mesh);
//!
//! assert_eq!(grid.connectivity(), &[4, 0, 1, 2, 3]);
//! assert_eq!(grid.offsets(), vec![4]);
//! ```

pub mod connectivity;

use log::debug;

use crate::mesh::{CellType, NormalizedMesh};

/// VTK cell type codes of a grid's cells.
///
/// Homogeneous meshes carry one code for every cell, so the scalar form is
/// kept and the per-cell array is only built when asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellTypes {
    /// `count` cells, all of type `code`.
    Uniform {
        /// VTK cell type code.
        code: u8,
        /// Number of cells.
        count: usize,
    },
}

impl CellTypes {
    /// Number of cells.
    pub fn len(&self) -> usize {
        match *self {
            CellTypes::Uniform { count, .. } => count,
        }
    }

    /// Whether there are no cells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The single code shared by every cell.
    pub fn uniform_code(&self) -> Option<u8> {
        match *self {
            CellTypes::Uniform { code, .. } => Some(code),
        }
    }

    /// One code per cell.
    pub fn to_array(&self) -> Vec<u8> {
        match *self {
            CellTypes::Uniform { code, count } => vec![code; count],
        }
    }
}

/// Points, connectivity and cell types of an unstructured grid.
#[derive(Debug, Clone, PartialEq)]
pub struct UnstructuredGrid {
    points: Vec<[f64; 3]>,
    connectivity: Vec<i64>,
    cell_type: CellType,
    cell_types: CellTypes,
}

impl UnstructuredGrid {
    /// Assemble a grid from a normalized mesh.
    pub fn from_mesh(mesh: &NormalizedMesh) -> Self {
        let grid = Self {
            points: mesh.node_array(),
            connectivity: mesh.connectivity(),
            cell_type: mesh.cell_type(),
            cell_types: mesh.cell_types(),
        };
        debug!(
            "Assembled unstructured grid: {} points, {} {} cells",
            grid.num_points(),
            grid.num_cells(),
            grid.cell_type
        );
        grid
    }

    /// Point coordinates.
    #[inline]
    pub fn points(&self) -> &[[f64; 3]] {
        &self.points
    }

    /// Count-prefixed connectivity buffer.
    #[inline]
    pub fn connectivity(&self) -> &[i64] {
        &self.connectivity
    }

    /// The cell type of every cell.
    #[inline]
    pub fn cell_type(&self) -> CellType {
        self.cell_type
    }

    /// VTK cell type codes.
    #[inline]
    pub fn cell_types(&self) -> CellTypes {
        self.cell_types
    }

    /// Number of points.
    #[inline]
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Number of cells.
    #[inline]
    pub fn num_cells(&self) -> usize {
        self.cell_types.len()
    }

    /// Connectivity without the per-cell count prefixes.
    pub fn cell_connectivity(&self) -> Vec<i64> {
        let stride = self.cell_type.nodes_per_element() + 1;
        self.connectivity
            .chunks_exact(stride)
            .flat_map(|cell| cell[1..].iter().copied())
            .collect()
    }

    /// End offset of every cell in [`Self::cell_connectivity`], as used by
    /// XML VTK files.
    pub fn offsets(&self) -> Vec<i64> {
        let k = self.cell_type.nodes_per_element() as i64;
        (1..=self.num_cells() as i64).map(|i| i * k).collect()
    }
}

//! Cell type classification.
//!
//! [`CellType`] is the closed set of element families rippl can hand to a
//! VTK-style unstructured grid. Each variant ties together three numbering
//! schemes for the same topology:
//!
//! | Variant | Nodes | Meshing kernel code | VTK code |
//! |---------|-------|---------------------|----------|
//! | [`CellType::Quad4`] | 4 | 3 | 9 (`VTK_QUAD`) |
//! | [`CellType::Hex8`] | 8 | 5 | 12 (`VTK_HEXAHEDRON`) |
//! | [`CellType::Quad9`] | 9 | 10 | 28 (`VTK_BIQUADRATIC_QUAD`) |
//! | [`CellType::Hex27`] | 27 | 12 | 29 (`VTK_TRIQUADRATIC_HEXAHEDRON`) |
//!
//! See <https://vtk.org/doc/nightly/html/vtkCellType_8h_source.html>.

use std::fmt;

use crate::error::{MeshError, Result};

/// A supported element topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellType {
    /// Bilinear quadrilateral.
    Quad4,
    /// Trilinear hexahedron.
    Hex8,
    /// Biquadratic quadrilateral.
    Quad9,
    /// Triquadratic hexahedron.
    ///
    /// Rows are passed through in kernel order. Gmsh and VTK number the
    /// mid-edge and face-center nodes differently.
    Hex27,
}

impl CellType {
    /// All supported cell types.
    pub const ALL: [CellType; 4] = [
        CellType::Quad4,
        CellType::Hex8,
        CellType::Quad9,
        CellType::Hex27,
    ];

    /// Classify a cell by its node count.
    ///
    /// # Example
    ///
    /// ```
    /// use rippl::mesh::CellType;
    ///
    /// assert_eq!(CellType::from_nodes_per_element(8).unwrap(), CellType::Hex8);
    /// assert!(CellType::from_nodes_per_element(3).is_err());
    /// ```
    pub fn from_nodes_per_element(nodes_per_element: usize) -> Result<CellType> {
        match nodes_per_element {
            4 => Ok(CellType::Quad4),
            8 => Ok(CellType::Hex8),
            9 => Ok(CellType::Quad9),
            27 => Ok(CellType::Hex27),
            _ => Err(MeshError::UnsupportedCellType { nodes_per_element }),
        }
    }

    /// Classify a cell by the meshing kernel's element type code.
    ///
    /// `dim` is only carried into the error for diagnostics.
    pub fn from_kernel_code(code: i32, dim: u8) -> Result<CellType> {
        match code {
            3 => Ok(CellType::Quad4),
            5 => Ok(CellType::Hex8),
            10 => Ok(CellType::Quad9),
            12 => Ok(CellType::Hex27),
            _ => Err(MeshError::UnsupportedTopology {
                dim,
                codes: vec![code],
            }),
        }
    }

    /// Number of nodes per element.
    #[inline]
    pub fn nodes_per_element(self) -> usize {
        match self {
            CellType::Quad4 => 4,
            CellType::Hex8 => 8,
            CellType::Quad9 => 9,
            CellType::Hex27 => 27,
        }
    }

    /// The VTK cell type code.
    #[inline]
    pub fn vtk_code(self) -> u8 {
        match self {
            CellType::Quad4 => 9,
            CellType::Hex8 => 12,
            CellType::Quad9 => 28,
            CellType::Hex27 => 29,
        }
    }

    /// The meshing kernel's element type code.
    #[inline]
    pub fn kernel_code(self) -> i32 {
        match self {
            CellType::Quad4 => 3,
            CellType::Hex8 => 5,
            CellType::Quad9 => 10,
            CellType::Hex27 => 12,
        }
    }

    /// Topological dimension of the cell.
    #[inline]
    pub fn dimension(self) -> u8 {
        match self {
            CellType::Quad4 | CellType::Quad9 => 2,
            CellType::Hex8 | CellType::Hex27 => 3,
        }
    }

    /// Human-readable topology name.
    pub fn name(self) -> &'static str {
        match self {
            CellType::Quad4 => "bilinear quadrilateral",
            CellType::Hex8 => "trilinear hexahedron",
            CellType::Quad9 => "biquadratic quadrilateral",
            CellType::Hex27 => "triquadratic hexahedron",
        }
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Look up the VTK cell type code for a node count.
pub fn vtk_cell_type(nodes_per_element: usize) -> Result<u8> {
    CellType::from_nodes_per_element(nodes_per_element).map(CellType::vtk_code)
}

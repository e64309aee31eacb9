//! # Rippl
//!
//! Turns the output of a finite-element meshing kernel into data a
//! visualization toolkit can consume directly.
//!
//! A meshing kernel reports nodes and elements with 1-based tags and its own
//! element type codes. Rippl validates that a dimension holds one element
//! type, shifts tags into dense 0-based indices and encodes the elements as
//! a VTK-style unstructured grid.
//!
//! ## Features
//!
//! - **Kernel sessions**: RAII guard that always finalizes the kernel
//! - **Strict extraction**: mixed topologies, gaps in node tags and dangling
//!   element references are errors, never silently repaired
//! - **Cell types**: linear and quadratic quadrilaterals and hexahedra
//! - **File formats**: Gmsh MSH 2.2/4.1 in, legacy VTK and VTU out
//!
//! ## Quick Start
//!
//! ```no_run
//! use rippl::prelude::*;
//!
//! // A saved kernel mesh acts as an offline kernel
//! let mut file = rippl::io::load("rectangle.msh").unwrap();
//! let mesh = {
//!     let session = KernelSession::open(&mut file, "rectangle").unwrap();
//!     MeshExtractor::extract_from_session(&session, 2).unwrap()
//! };
//!
//! println!("Nodes: {}", mesh.num_nodes());
//! println!("Elements: {} ({})", mesh.num_elements(), mesh.cell_type());
//!
//! let grid = UnstructuredGrid::from_mesh(&mesh);
//! rippl::io::save(&grid, "rectangle.vtu").unwrap();
//! ```
//!
//! ## Extracting From Raw Reports
//!
//! ```
//! use rippl::prelude::*;
//!
//! // Two quads sharing an edge; tags arrive 1-based
//! let nodes = RawNodeReport::new(
//!     vec![1, 2, 3, 4, 5, 6],
//!     vec![
//!         0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 2.0, 0.0, 0.0, //
//!         0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 2.0, 1.0, 0.0,
//!     ],
//! );
//! let elements = RawElementReport::single(3, vec![1, 2, 5, 4, 2, 3, 6, 5]);
//!
//! let mesh = MeshExtractor::extract(&nodes, &elements, 2).unwrap();
//! assert_eq!(mesh.cell_type(), CellType::Quad4);
//! assert_eq!(mesh.connectivity(), vec![4, 0, 1, 4, 3, 4, 1, 2, 5, 4]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod extract;
pub mod grid;
pub mod io;
pub mod kernel;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use rippl::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{MeshError, Result};
    pub use crate::extract::MeshExtractor;
    pub use crate::grid::{CellTypes, UnstructuredGrid};
    pub use crate::kernel::{KernelSession, MeshingKernel, RawElementReport, RawNodeReport};
    pub use crate::mesh::{CellType, NormalizedMesh};
}

// Re-export nalgebra types for convenience
pub use nalgebra;

#[cfg(test)]
mod tests {
    use super::prelude::*;

    /// 2 x 2 x 1 block of hexahedra, nodes numbered x-fastest.
    fn hex_block() -> (RawNodeReport, RawElementReport) {
        let (nx, ny, nz) = (3u64, 3u64, 2u64);
        let mut tags = Vec::new();
        let mut coords = Vec::new();
        for k in 0..nz {
            for j in 0..ny {
                for i in 0..nx {
                    tags.push(1 + i + nx * (j + ny * k));
                    coords.extend_from_slice(&[i as f64, j as f64, k as f64]);
                }
            }
        }

        let tag = |i: u64, j: u64, k: u64| 1 + i + nx * (j + ny * k);
        let mut connectivity = Vec::new();
        for j in 0..ny - 1 {
            for i in 0..nx - 1 {
                for k in [0, 1] {
                    connectivity.extend_from_slice(&[
                        tag(i, j, k),
                        tag(i + 1, j, k),
                        tag(i + 1, j + 1, k),
                        tag(i, j + 1, k),
                    ]);
                }
            }
        }

        (
            RawNodeReport::new(tags, coords),
            RawElementReport::single(5, connectivity),
        )
    }

    #[test]
    fn test_hex_block_end_to_end() {
        let (nodes, elements) = hex_block();
        let mesh = MeshExtractor::extract(&nodes, &elements, 3).unwrap();

        assert_eq!(mesh.num_nodes(), 18);
        assert_eq!(mesh.num_elements(), 4);
        assert_eq!(mesh.cell_type(), CellType::Hex8);

        let grid = UnstructuredGrid::from_mesh(&mesh);
        assert_eq!(grid.num_cells(), 4);
        assert_eq!(grid.connectivity().len(), 4 * 9);
        assert_eq!(grid.cell_types(), CellTypes::Uniform { code: 12, count: 4 });
        assert!(grid
            .connectivity()
            .chunks_exact(9)
            .all(|cell| cell[0] == 8 && cell[1..].iter().all(|&i| (0..18).contains(&i))));
    }
}

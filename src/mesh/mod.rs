//! Core mesh data structures.
//!
//! This module provides the normalized mesh record produced by extraction
//! and the closed set of cell types it can hold.
//!
//! # Overview
//!
//! The primary type is [`NormalizedMesh`], a homogeneous mesh whose node and
//! element indices are dense and 0-based, ready for array-oriented consumers
//! such as VTK unstructured grids. Every element shares one [`CellType`].
//!
//! # Construction
//!
//! Meshes are normally produced by [`crate::extract::MeshExtractor`] from raw
//! meshing kernel output, but they can also be assembled directly:
//!
//! ```
//! use rippl::mesh::{CellType, NormalizedMesh};
//! use nalgebra::Point3;
//!
//! let nodes = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//!
//! let mesh = NormalizedMesh::new(nodes, vec![0, 1, 2, 3], CellType::Quad4).unwrap();
//! assert_eq!(mesh.cell_type().vtk_code(), 9);
//! ```

mod cell;
mod normalized;

pub use cell::{vtk_cell_type, CellType};
pub use normalized::NormalizedMesh;

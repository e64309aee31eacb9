//! Mesh file I/O.
//!
//! Meshes come in as Gmsh MSH files and go out as VTK unstructured grids.
//!
//! # Supported Formats
//!
//! | Format | Extension | Load | Save | Notes |
//! |--------|-----------|------|------|-------|
//! | Gmsh MSH | `.msh` | ✓ | ✗ | ASCII 2.2 and 4.1 |
//! | Legacy VTK | `.vtk` | ✗ | ✓ | ASCII |
//! | VTK XML | `.vtu` | ✗ | ✓ | ASCII data arrays |
//!
//! # Usage
//!
//! ```no_run
//! use rippl::extract::MeshExtractor;
//! use rippl::grid::UnstructuredGrid;
//! use rippl::io::{load, save};
//! use rippl::kernel::KernelSession;
//!
//! let mut file = load("model.msh").unwrap();
//! let session = KernelSession::open(&mut file, "model").unwrap();
//! let mesh = MeshExtractor::extract_from_session(&session, 3).unwrap();
//!
//! save(&UnstructuredGrid::from_mesh(&mesh), "model.vtu").unwrap();
//! ```

pub mod msh;
pub mod vtk;
pub mod vtu;

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MeshError, Result};
use crate::grid::UnstructuredGrid;

pub use msh::MshFile;

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Gmsh MSH format.
    Msh,
    /// Legacy VTK format.
    Vtk,
    /// VTK XML unstructured grid format.
    Vtu,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "msh" => Some(Format::Msh),
            "vtk" => Some(Format::Vtk),
            "vtu" => Some(Format::Vtu),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }

    /// File extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Msh => "msh",
            Format::Vtk => "vtk",
            Format::Vtu => "vtu",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

fn detect(path: &Path) -> Result<Format> {
    Format::from_path(path).ok_or_else(|| MeshError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })
}

/// Load a mesh file with automatic format detection.
///
/// Only MSH files can be loaded. The returned [`MshFile`] acts as a meshing
/// kernel for extraction.
pub fn load<P: AsRef<Path>>(path: P) -> Result<MshFile> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Msh => msh::load(path),
        Format::Vtk | Format::Vtu => Err(MeshError::LoadError {
            path: path.to_path_buf(),
            message: "VTK files are output only".to_string(),
        }),
    }
}

/// Save a grid with automatic format detection.
///
/// The format is determined by the file extension.
pub fn save<P: AsRef<Path>>(grid: &UnstructuredGrid, path: P) -> Result<()> {
    let path = path.as_ref();
    save_as(grid, path, detect(path)?)
}

/// Save a grid in an explicit format, whatever the path's extension.
pub fn save_as<P: AsRef<Path>>(grid: &UnstructuredGrid, path: P, format: Format) -> Result<()> {
    let path = path.as_ref();
    match format {
        Format::Vtk => vtk::save(grid, path),
        Format::Vtu => vtu::save(grid, path),
        Format::Msh => Err(MeshError::SaveError {
            path: path.to_path_buf(),
            message: "MSH saving is not supported".to_string(),
        }),
    }
}

//! Legacy VTK format support.
//!
//! Writes an [`UnstructuredGrid`] as an ASCII legacy `.vtk` file. The
//! `CELLS` section of that format is the count-prefixed connectivity buffer
//! itself, so the grid's buffers are written without conversion.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::grid::UnstructuredGrid;

/// Title line written when none is given.
pub const DEFAULT_TITLE: &str = "Generated by rippl";

/// Write a grid in legacy ASCII VTK format.
pub fn write<W: Write>(grid: &UnstructuredGrid, title: &str, writer: W) -> Result<()> {
    let mut writer = BufWriter::new(writer);

    // The title is a single line of at most 256 characters.
    let title: String = title.lines().next().unwrap_or_default().chars().take(256).collect();

    writeln!(writer, "# vtk DataFile Version 3.0")?;
    writeln!(writer, "{}", title)?;
    writeln!(writer, "ASCII")?;
    writeln!(writer, "DATASET UNSTRUCTURED_GRID")?;

    writeln!(writer, "POINTS {} double", grid.num_points())?;
    for p in grid.points() {
        writeln!(writer, "{} {} {}", p[0], p[1], p[2])?;
    }

    let stride = grid.cell_type().nodes_per_element() + 1;
    writeln!(writer, "CELLS {} {}", grid.num_cells(), grid.connectivity().len())?;
    for cell in grid.connectivity().chunks_exact(stride) {
        let line: Vec<String> = cell.iter().map(i64::to_string).collect();
        writeln!(writer, "{}", line.join(" "))?;
    }

    let code = grid.cell_type().vtk_code();
    writeln!(writer, "CELL_TYPES {}", grid.num_cells())?;
    for _ in 0..grid.num_cells() {
        writeln!(writer, "{}", code)?;
    }

    writer.flush()?;
    Ok(())
}

/// Save a grid to a legacy `.vtk` file.
///
/// # Example
///
/// ```no_run
/// use rippl::grid::UnstructuredGrid;
/// use rippl::io::vtk;
/// # fn grid() -> UnstructuredGrid { unimplemented!() }
///
/// vtk::save(&grid(), "mesh.vtk").unwrap();
/// ```
pub fn save<P: AsRef<Path>>(grid: &UnstructuredGrid, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    write(grid, DEFAULT_TITLE, file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{CellType, NormalizedMesh};
    use nalgebra::Point3;

    fn two_quads() -> UnstructuredGrid {
        let nodes = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(2.0, 1.0, 0.0),
        ];
        let mesh =
            NormalizedMesh::new(nodes, vec![0, 1, 4, 3, 1, 2, 5, 4], CellType::Quad4).unwrap();
        UnstructuredGrid::from_mesh(&mesh)
    }

    #[test]
    fn test_write_two_quads() {
        let mut out = Vec::new();
        write(&two_quads(), "strip", &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "# vtk DataFile Version 3.0");
        assert_eq!(lines[1], "strip");
        assert_eq!(lines[3], "DATASET UNSTRUCTURED_GRID");
        assert_eq!(lines[4], "POINTS 6 double");
        assert_eq!(lines[6], "1 0 0");
        assert_eq!(lines[11], "CELLS 2 10");
        assert_eq!(lines[12], "4 0 1 4 3");
        assert_eq!(lines[13], "4 1 2 5 4");
        assert_eq!(lines[14], "CELL_TYPES 2");
        assert_eq!(&lines[15..], &["9", "9"]);
    }

    #[test]
    fn test_title_is_one_line() {
        let mut out = Vec::new();
        write(&two_quads(), "first\nsecond", &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().nth(1), Some("first"));
        assert_eq!(text.lines().nth(2), Some("ASCII"));
    }

    #[test]
    fn test_save_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strip.vtk");
        save(&two_quads(), &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains(DEFAULT_TITLE));
        assert!(text.contains("CELL_TYPES 2"));
    }
}

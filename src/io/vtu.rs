//! VTK XML unstructured grid (`.vtu`) support.
//!
//! Cells are written in the XML layout: flat connectivity without count
//! prefixes, end offsets and per-cell type codes. Markup goes through
//! `quick_xml`, so attribute and text content is escaped.

use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::{MeshError, Result};
use crate::grid::UnstructuredGrid;

/// Values per line inside a `DataArray`.
const VALUES_PER_LINE: usize = 12;

fn xml_error(e: impl Display) -> MeshError {
    MeshError::Xml(e.to_string())
}

/// The handful of elements a `.vtu` file needs, on top of an indenting
/// `quick_xml` writer.
struct VtuWriter<W: Write> {
    xml: Writer<BufWriter<W>>,
}

impl<W: Write> VtuWriter<W> {
    fn new(writer: W) -> Self {
        Self {
            xml: Writer::new_with_indent(BufWriter::new(writer), b' ', 2),
        }
    }

    fn declaration(&mut self) -> Result<()> {
        self.xml
            .write_event(Event::Decl(BytesDecl::new("1.0", None, None)))
            .map_err(xml_error)
    }

    fn start_element(&mut self, name: &str, attrs: &[(&str, String)]) -> Result<()> {
        let mut element = BytesStart::new(name);
        for (key, value) in attrs {
            element.push_attribute((*key, value.as_str()));
        }
        self.xml
            .write_event(Event::Start(element))
            .map_err(xml_error)
    }

    fn end_element(&mut self, name: &str) -> Result<()> {
        self.xml
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_error)
    }

    fn write_data_array<T: Display>(&mut self, attrs: &[(&str, String)], data: &[T]) -> Result<()> {
        let mut attrs = attrs.to_vec();
        attrs.push(("format", "ascii".to_string()));
        self.start_element("DataArray", &attrs)?;

        let lines: Vec<String> = data
            .chunks(VALUES_PER_LINE)
            .map(|line| {
                line.iter()
                    .map(T::to_string)
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect();
        if !lines.is_empty() {
            let text = lines.join("\n");
            self.xml
                .write_event(Event::Text(BytesText::new(&text)))
                .map_err(xml_error)?;
        }

        self.end_element("DataArray")
    }

    fn finish(self) -> Result<()> {
        self.xml.into_inner().flush()?;
        Ok(())
    }
}

/// Write a grid as a VTK XML unstructured grid.
pub fn write<W: Write>(grid: &UnstructuredGrid, writer: W) -> Result<()> {
    let mut w = VtuWriter::new(writer);

    w.declaration()?;
    w.start_element(
        "VTKFile",
        &[
            ("type", "UnstructuredGrid".to_string()),
            ("version", "1.0".to_string()),
            ("byte_order", "LittleEndian".to_string()),
            ("header_type", "UInt64".to_string()),
        ],
    )?;
    w.start_element("UnstructuredGrid", &[])?;
    w.start_element(
        "Piece",
        &[
            ("NumberOfPoints", grid.num_points().to_string()),
            ("NumberOfCells", grid.num_cells().to_string()),
        ],
    )?;

    w.start_element("Points", &[])?;
    let coords: Vec<f64> = grid.points().iter().flatten().copied().collect();
    w.write_data_array(
        &[
            ("type", "Float64".to_string()),
            ("NumberOfComponents", "3".to_string()),
        ],
        &coords,
    )?;
    w.end_element("Points")?;

    w.start_element("Cells", &[])?;
    w.write_data_array(
        &[
            ("type", "Int64".to_string()),
            ("Name", "connectivity".to_string()),
        ],
        &grid.cell_connectivity(),
    )?;
    w.write_data_array(
        &[
            ("type", "Int64".to_string()),
            ("Name", "offsets".to_string()),
        ],
        &grid.offsets(),
    )?;
    w.write_data_array(
        &[("type", "UInt8".to_string()), ("Name", "types".to_string())],
        &grid.cell_types().to_array(),
    )?;
    w.end_element("Cells")?;

    w.end_element("Piece")?;
    w.end_element("UnstructuredGrid")?;
    w.end_element("VTKFile")?;
    w.finish()
}

/// Save a grid to a `.vtu` file.
pub fn save<P: AsRef<Path>>(grid: &UnstructuredGrid, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    write(grid, file)
}

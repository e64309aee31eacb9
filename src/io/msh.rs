//! Gmsh MSH format support.
//!
//! This module reads ASCII MSH files, versions 2.2 and 4.1, into an
//! [`MshFile`]. An `MshFile` implements [`MeshingKernel`], so a mesh saved by
//! the meshing kernel can be extracted offline exactly as it would be from a
//! live kernel session.
//!
//! Only the `$MeshFormat`, `$Nodes` and `$Elements` sections are
//! interpreted; other sections (`$Entities`, `$PhysicalNames`, ...) are
//! skipped. Binary MSH files are rejected.
//!
//! # Example
//!
//! ```no_run
//! use rippl::extract::MeshExtractor;
//! use rippl::io::msh;
//! use rippl::kernel::KernelSession;
//!
//! let mut file = msh::load("rectangle.msh").unwrap();
//! let session = KernelSession::open(&mut file, "rectangle").unwrap();
//! let mesh = MeshExtractor::extract_from_session(&session, 2).unwrap();
//! ```

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use log::debug;

use crate::error::{MeshError, Result};
use crate::kernel::{MeshingKernel, RawElementReport, RawNodeReport};

/// MSH format revisions understood by the reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MshVersion {
    /// Legacy 2.x layout (one node or element per line).
    V2,
    /// 4.1 layout (entity blocks).
    V4,
}

/// Upper bound on node storage reserved from a header count before any
/// node has been read.
const MAX_PREALLOC_NODES: usize = 1 << 20;

/// Dimension and node count of the Gmsh element types that are commonly
/// written to MSH files.
fn element_shape(code: i32) -> Option<(u8, usize)> {
    match code {
        15 => Some((0, 1)),  // point
        1 => Some((1, 2)),   // line
        8 => Some((1, 3)),   // line3
        2 => Some((2, 3)),   // triangle
        9 => Some((2, 6)),   // triangle6
        3 => Some((2, 4)),   // quad
        16 => Some((2, 8)),  // quad8
        10 => Some((2, 9)),  // quad9
        4 => Some((3, 4)),   // tet
        11 => Some((3, 10)), // tet10
        5 => Some((3, 8)),   // hex
        17 => Some((3, 20)), // hex20
        12 => Some((3, 27)), // hex27
        6 => Some((3, 6)),   // prism
        7 => Some((3, 5)),   // pyramid
        _ => None,
    }
}

/// The mesh stored in an MSH file.
#[derive(Debug, Clone)]
pub struct MshFile {
    version: MshVersion,
    nodes: RawNodeReport,
    elements: BTreeMap<u8, RawElementReport>,
    session: Option<String>,
}

impl MshFile {
    /// Parse an ASCII MSH file.
    pub fn parse<R: BufRead>(reader: R) -> Result<MshFile> {
        let mut lines = LineReader::new(reader);
        let mut version = None;
        let mut nodes = None;
        let mut elements = BTreeMap::new();

        while let Some(line) = lines.next_line()? {
            match line.as_str() {
                "$MeshFormat" => version = Some(parse_mesh_format(&mut lines)?),
                "$Nodes" => {
                    let version = version
                        .ok_or_else(|| lines.error("$Nodes section before $MeshFormat"))?;
                    nodes = Some(match version {
                        MshVersion::V2 => parse_nodes_v2(&mut lines)?,
                        MshVersion::V4 => parse_nodes_v4(&mut lines)?,
                    });
                }
                "$Elements" => {
                    let version = version
                        .ok_or_else(|| lines.error("$Elements section before $MeshFormat"))?;
                    elements = match version {
                        MshVersion::V2 => parse_elements_v2(&mut lines)?,
                        MshVersion::V4 => parse_elements_v4(&mut lines)?,
                    };
                }
                section if section.starts_with('$') => {
                    lines.skip_section(&section[1..])?;
                }
                other => {
                    return Err(lines.error(format!("unexpected line outside a section: {}", other)))
                }
            }
        }

        let version = version.ok_or_else(|| lines.error("missing $MeshFormat section"))?;
        let nodes = nodes.ok_or_else(|| lines.error("missing $Nodes section"))?;

        debug!(
            "Parsed MSH {:?}: {} nodes, element dimensions {:?}",
            version,
            nodes.num_nodes(),
            elements.keys().collect::<Vec<_>>()
        );

        Ok(MshFile {
            version,
            nodes,
            elements,
            session: None,
        })
    }

    /// Format revision of the parsed file.
    pub fn version(&self) -> MshVersion {
        self.version
    }

    /// Number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.nodes.num_nodes()
    }

    /// Dimensions that hold at least one element, ascending.
    pub fn dimensions(&self) -> impl Iterator<Item = u8> + '_ {
        self.elements.keys().copied()
    }

    /// Highest dimension that holds elements.
    pub fn max_dimension(&self) -> Option<u8> {
        self.elements.keys().next_back().copied()
    }

    /// Element type codes present in a dimension, in order of appearance.
    pub fn element_types(&self, dim: u8) -> &[i32] {
        self.elements
            .get(&dim)
            .map(|r| r.element_type_codes.as_slice())
            .unwrap_or(&[])
    }

    /// Number of elements of one type in a dimension, when the type's node
    /// count is known.
    pub fn num_elements(&self, dim: u8, code: i32) -> Option<usize> {
        let report = self.elements.get(&dim)?;
        let i = report.element_type_codes.iter().position(|&c| c == code)?;
        let (_, nodes_per_element) = element_shape(code)?;
        Some(report.node_tag_lists[i].len() / nodes_per_element)
    }

    fn require_session(&self) -> Result<()> {
        if self.session.is_some() {
            Ok(())
        } else {
            Err(MeshError::SessionInactive)
        }
    }
}

impl MeshingKernel for MshFile {
    fn initialize(&mut self, model_name: &str) -> Result<()> {
        self.session = Some(model_name.to_string());
        Ok(())
    }

    fn finalize(&mut self) {
        self.session = None;
    }

    fn element_report(&self, dim: u8) -> Result<RawElementReport> {
        self.require_session()?;
        Ok(self.elements.get(&dim).cloned().unwrap_or_default())
    }

    fn node_report(&self) -> Result<RawNodeReport> {
        self.require_session()?;
        Ok(self.nodes.clone())
    }
}

impl FromStr for MshFile {
    type Err = MeshError;

    fn from_str(s: &str) -> Result<Self> {
        MshFile::parse(s.as_bytes())
    }
}

/// Load an MSH file.
///
/// # Example
///
/// ```no_run
/// use rippl::io::msh;
///
/// let file = msh::load("model.msh").unwrap();
/// println!("{} nodes", file.num_nodes());
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<MshFile> {
    let path = path.as_ref();
    let file = File::open(path)?;
    MshFile::parse(BufReader::new(file)).map_err(|e| match e {
        MeshError::Parse { line, message } => MeshError::LoadError {
            path: path.to_path_buf(),
            message: format!("line {}: {}", line, message),
        },
        other => other,
    })
}

/// Line-oriented reader that tracks line numbers and skips blank lines.
struct LineReader<R> {
    inner: R,
    line: usize,
}

impl<R: BufRead> LineReader<R> {
    fn new(inner: R) -> Self {
        Self { inner, line: 0 }
    }

    fn next_line(&mut self) -> Result<Option<String>> {
        let mut buf = String::new();
        loop {
            buf.clear();
            if self.inner.read_line(&mut buf)? == 0 {
                return Ok(None);
            }
            self.line += 1;
            let trimmed = buf.trim();
            if !trimmed.is_empty() {
                return Ok(Some(trimmed.to_string()));
            }
        }
    }

    fn expect_line(&mut self, what: &str) -> Result<String> {
        self.next_line()?
            .ok_or_else(|| self.error(format!("unexpected end of file, expected {}", what)))
    }

    fn expect_end(&mut self, section: &str) -> Result<()> {
        let line = self.expect_line(section)?;
        if line == format!("$End{}", section) {
            Ok(())
        } else {
            Err(self.error(format!("expected $End{}, found {}", section, line)))
        }
    }

    fn skip_section(&mut self, section: &str) -> Result<()> {
        let end = format!("$End{}", section);
        while let Some(line) = self.next_line()? {
            if line == end {
                return Ok(());
            }
        }
        Err(self.error(format!("unterminated ${} section", section)))
    }

    /// Parse every whitespace-separated token of `line`.
    fn tokens<T: FromStr>(&self, line: &str, what: &str) -> Result<Vec<T>> {
        line.split_whitespace()
            .map(|t| {
                t.parse::<T>()
                    .map_err(|_| self.error(format!("invalid {}: {}", what, t)))
            })
            .collect()
    }

    /// Parse a line that must hold exactly `N` integers.
    fn header<const N: usize>(&mut self, what: &str) -> Result<[u64; N]> {
        let line = self.expect_line(what)?;
        let values: Vec<u64> = self.tokens(&line, what)?;
        values
            .try_into()
            .map_err(|_| self.error(format!("{} must have {} fields: {}", what, N, line)))
    }

    fn error(&self, message: impl Into<String>) -> MeshError {
        MeshError::Parse {
            line: self.line,
            message: message.into(),
        }
    }
}

fn parse_mesh_format<R: BufRead>(lines: &mut LineReader<R>) -> Result<MshVersion> {
    let line = lines.expect_line("mesh format")?;
    let mut fields = line.split_whitespace();
    let version = fields.next().unwrap_or_default();
    let file_type = fields.next().unwrap_or("0");

    let version = match version {
        "2" | "2.0" | "2.1" | "2.2" => MshVersion::V2,
        "4.1" => MshVersion::V4,
        other => return Err(lines.error(format!("unsupported MSH version {}", other))),
    };
    if file_type != "0" {
        return Err(lines.error("binary MSH files are not supported"));
    }

    lines.expect_end("MeshFormat")?;
    Ok(version)
}

fn parse_nodes_v2<R: BufRead>(lines: &mut LineReader<R>) -> Result<RawNodeReport> {
    let [count] = lines.header::<1>("node count")?;
    let mut report = RawNodeReport::with_capacity(count);

    for _ in 0..count {
        let line = lines.expect_line("node")?;
        let (tag, xyz) = line
            .split_once(char::is_whitespace)
            .ok_or_else(|| lines.error(format!("invalid node line: {}", line)))?;
        let tag: u64 = tag
            .parse()
            .map_err(|_| lines.error(format!("invalid node tag: {}", tag)))?;
        let xyz: Vec<f64> = lines.tokens(xyz, "coordinate")?;
        if xyz.len() != 3 {
            return Err(lines.error(format!("node {} must have 3 coordinates", tag)));
        }
        report.node_tags.push(tag);
        report.coordinates.extend_from_slice(&xyz);
    }

    lines.expect_end("Nodes")?;
    Ok(report)
}

fn parse_nodes_v4<R: BufRead>(lines: &mut LineReader<R>) -> Result<RawNodeReport> {
    let [num_blocks, num_nodes, _, _] = lines.header::<4>("nodes header")?;
    let mut report = RawNodeReport::with_capacity(num_nodes);

    for _ in 0..num_blocks {
        let [_, _, parametric, in_block] = lines.header::<4>("node block header")?;
        let in_block = in_block as usize;

        for _ in 0..in_block {
            let [tag] = lines.header::<1>("node tag")?;
            report.node_tags.push(tag);
        }
        for _ in 0..in_block {
            let line = lines.expect_line("node coordinates")?;
            let values: Vec<f64> = lines.tokens(&line, "coordinate")?;
            // Parametric nodes append their (u, v, w) after x y z.
            if values.len() < 3 || (parametric == 0 && values.len() != 3) {
                return Err(lines.error(format!("invalid node coordinates: {}", line)));
            }
            report.coordinates.extend_from_slice(&values[..3]);
        }
    }

    if report.node_tags.len() as u64 != num_nodes {
        return Err(lines.error(format!(
            "nodes header announces {} nodes, blocks hold {}",
            num_nodes,
            report.node_tags.len()
        )));
    }

    lines.expect_end("Nodes")?;
    Ok(report)
}

fn parse_elements_v2<R: BufRead>(
    lines: &mut LineReader<R>,
) -> Result<BTreeMap<u8, RawElementReport>> {
    let [count] = lines.header::<1>("element count")?;
    let mut reports: BTreeMap<u8, RawElementReport> = BTreeMap::new();

    for _ in 0..count {
        let line = lines.expect_line("element")?;
        let values: Vec<i64> = lines.tokens(&line, "element field")?;
        if values.len() < 3 {
            return Err(lines.error(format!("invalid element line: {}", line)));
        }

        let code = i32::try_from(values[1])
            .map_err(|_| lines.error(format!("invalid element type {}", values[1])))?;
        let (dim, nodes_per_element) = element_shape(code)
            .ok_or_else(|| lines.error(format!("unknown element type {}", code)))?;
        let node_start = 3 + values[2].max(0) as usize;
        if values.len() != node_start + nodes_per_element {
            return Err(lines.error(format!(
                "element type {} needs {} nodes: {}",
                code, nodes_per_element, line
            )));
        }

        let tags = node_tags(lines, &values[node_start..])?;
        reports.entry(dim).or_default().push(code, &tags);
    }

    lines.expect_end("Elements")?;
    Ok(reports)
}

fn parse_elements_v4<R: BufRead>(
    lines: &mut LineReader<R>,
) -> Result<BTreeMap<u8, RawElementReport>> {
    let [num_blocks, num_elements, _, _] = lines.header::<4>("elements header")?;
    let mut reports: BTreeMap<u8, RawElementReport> = BTreeMap::new();
    let mut seen = 0u64;

    for _ in 0..num_blocks {
        let [dim, _, code, in_block] = lines.header::<4>("element block header")?;
        let code = i32::try_from(code)
            .map_err(|_| lines.error(format!("invalid element type {}", code)))?;
        let dim = u8::try_from(dim)
            .ok()
            .filter(|&d| d <= 3)
            .ok_or_else(|| lines.error(format!("invalid entity dimension {}", dim)))?;
        let expected = element_shape(code).map(|(_, n)| n);

        let mut tags = Vec::new();
        for _ in 0..in_block {
            let line = lines.expect_line("element")?;
            let values: Vec<i64> = lines.tokens(&line, "element field")?;
            let nodes = values.get(1..).unwrap_or_default();
            if nodes.is_empty() || expected.is_some_and(|n| n != nodes.len()) {
                return Err(lines.error(format!(
                    "element of type {} has {} nodes: {}",
                    code,
                    nodes.len(),
                    line
                )));
            }
            tags.extend(node_tags(lines, nodes)?);
        }
        seen += in_block;
        reports.entry(dim).or_default().push(code, &tags);
    }

    if seen != num_elements {
        return Err(lines.error(format!(
            "elements header announces {} elements, blocks hold {}",
            num_elements, seen
        )));
    }

    lines.expect_end("Elements")?;
    Ok(reports)
}

impl RawNodeReport {
    /// An empty report with room for `count` nodes, capped so a corrupt
    /// header cannot request an arbitrary allocation.
    fn with_capacity(count: u64) -> Self {
        let count = usize::try_from(count)
            .unwrap_or(usize::MAX)
            .min(MAX_PREALLOC_NODES);
        RawNodeReport {
            node_tags: Vec::with_capacity(count),
            coordinates: Vec::with_capacity(count * 3),
        }
    }
}

fn node_tags<R>(lines: &LineReader<R>, values: &[i64]) -> Result<Vec<u64>>
where
    R: BufRead,
{
    values
        .iter()
        .map(|&v| u64::try_from(v).map_err(|_| lines.error(format!("invalid node tag {}", v))))
        .collect()
}

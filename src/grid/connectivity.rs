//! Count-prefixed connectivity buffers.
//!
//! VTK-style unstructured grids take their cells as one flat integer array in
//! which every cell is written as its node count followed by its node
//! indices:
//!
//! ```text
//! [K, n0, n1, .., nK-1, K, n0, .., nK-1, ...]
//! ```
//!
//! Entries are `i64`, the width of `vtkIdType` on 64-bit builds.

use crate::error::{MeshError, Result};

/// Encode element rows into a count-prefixed connectivity buffer.
///
/// Every row must hold exactly `nodes_per_element` indices; the output has
/// length `rows * (nodes_per_element + 1)` and keeps row order.
///
/// # Example
///
/// ```
/// use rippl::grid::connectivity::encode_connectivity;
///
/// let rows: [&[usize]; 2] = [&[0, 1, 2, 3], &[1, 4, 5, 2]];
/// let buffer = encode_connectivity(rows, 4).unwrap();
/// assert_eq!(buffer, vec![4, 0, 1, 2, 3, 4, 1, 4, 5, 2]);
/// ```
pub fn encode_connectivity<'a, I>(rows: I, nodes_per_element: usize) -> Result<Vec<i64>>
where
    I: IntoIterator<Item = &'a [usize]>,
{
    let rows = rows.into_iter();
    let mut buffer = Vec::with_capacity(rows.size_hint().0 * (nodes_per_element + 1));

    for (element, row) in rows.enumerate() {
        if row.len() != nodes_per_element {
            return Err(MeshError::ElementShapeMismatch {
                element,
                expected: nodes_per_element,
                found: row.len(),
            });
        }
        buffer.push(nodes_per_element as i64);
        buffer.extend(row.iter().map(|&i| i as i64));
    }

    Ok(buffer)
}

/// Encode flat row-major element storage whose length is already a multiple
/// of `nodes_per_element`.
pub(crate) fn encode_flat(elements: &[usize], nodes_per_element: usize) -> Vec<i64> {
    debug_assert_eq!(elements.len() % nodes_per_element, 0);
    let mut buffer =
        Vec::with_capacity(elements.len() + elements.len() / nodes_per_element);
    for row in elements.chunks_exact(nodes_per_element) {
        buffer.push(nodes_per_element as i64);
        buffer.extend(row.iter().map(|&i| i as i64));
    }
    buffer
}

/// Decode a count-prefixed connectivity buffer back into element rows.
///
/// Rows may have different lengths; each is as long as its leading count.
pub fn decode_connectivity(buffer: &[i64]) -> Result<Vec<Vec<usize>>> {
    let mut rows = Vec::new();
    let mut position = 0;

    while position < buffer.len() {
        let count = buffer[position];
        if count < 0 {
            return Err(MeshError::MalformedConnectivity {
                position,
                reason: "negative node count",
            });
        }
        let count = count as usize;
        let start = position + 1;
        let end = start + count;
        if end > buffer.len() {
            return Err(MeshError::MalformedConnectivity {
                position,
                reason: "node count runs past end of buffer",
            });
        }

        let mut row = Vec::with_capacity(count);
        for (offset, &index) in buffer[start..end].iter().enumerate() {
            if index < 0 {
                return Err(MeshError::MalformedConnectivity {
                    position: start + offset,
                    reason: "negative node index",
                });
            }
            row.push(index as usize);
        }
        rows.push(row);
        position = end;
    }

    Ok(rows)
}

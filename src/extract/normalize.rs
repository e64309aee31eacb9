//! Conversion from 1-based kernel tags to dense 0-based indices.
//!
//! Kernel tags for a freshly generated mesh run `1..=N`, so a uniform shift by
//! one gives array indices directly. Tags that leave gaps (for instance after
//! elements were deleted in the kernel) cannot be shifted into a dense range;
//! they are rejected with [`MeshError::NonContiguousNodeTags`] instead of
//! producing an index space with holes.

use nalgebra::Point3;

use crate::error::{MeshError, Result};

/// Turn a node report into positions indexed by `tag - 1`.
///
/// `coordinates` holds three values per tag, in tag order. Each triple is
/// stored at index `tag - 1`, so tags need not be sorted but must be a
/// permutation of `1..=node_tags.len()`.
///
/// # Example
///
/// ```
/// use rippl::extract::normalize_nodes;
///
/// let nodes = normalize_nodes(&[2, 1], &[1.0, 0.0, 0.0, 0.0, 0.0, 0.0]).unwrap();
/// assert_eq!(nodes[0].x, 0.0);
/// assert_eq!(nodes[1].x, 1.0);
/// ```
pub fn normalize_nodes(node_tags: &[u64], coordinates: &[f64]) -> Result<Vec<Point3<f64>>> {
    let num_nodes = node_tags.len();
    if coordinates.len() != num_nodes * 3 {
        return Err(MeshError::MalformedNodeData {
            reason: format!(
                "{} coordinates for {} node tags (expected {})",
                coordinates.len(),
                num_nodes,
                num_nodes * 3
            ),
        });
    }

    let mut slots: Vec<Option<Point3<f64>>> = vec![None; num_nodes];
    for (&tag, xyz) in node_tags.iter().zip(coordinates.chunks_exact(3)) {
        let index = tag_to_index(tag, num_nodes)
            .ok_or(MeshError::NonContiguousNodeTags { tag, num_nodes })?;
        let slot = &mut slots[index];
        if slot.is_some() {
            return Err(MeshError::NonContiguousNodeTags { tag, num_nodes });
        }
        *slot = Some(Point3::new(xyz[0], xyz[1], xyz[2]));
    }

    // N tags, all in range, none repeated: every slot is filled.
    Ok(slots.into_iter().flatten().collect())
}

/// Reshape a flat 1-based node tag list into 0-based element rows.
///
/// The result is row-major with `nodes_per_element` indices per row. The
/// list length must be an exact multiple of `nodes_per_element`.
///
/// # Example
///
/// ```
/// use rippl::extract::normalize_elements;
///
/// let rows = normalize_elements(&[1, 2, 3, 4, 2, 5, 6, 3], 4).unwrap();
/// assert_eq!(rows, vec![0, 1, 2, 3, 1, 4, 5, 2]);
/// ```
pub fn normalize_elements(node_tag_list: &[u64], nodes_per_element: usize) -> Result<Vec<usize>> {
    if nodes_per_element == 0 {
        return Err(MeshError::invalid_param(
            "nodes_per_element",
            nodes_per_element,
            "must be positive",
        ));
    }
    if node_tag_list.len() % nodes_per_element != 0 {
        return Err(MeshError::MalformedElementData {
            len: node_tag_list.len(),
            nodes_per_element,
        });
    }

    node_tag_list
        .iter()
        .enumerate()
        .map(|(pos, &tag)| {
            tag.checked_sub(1)
                .map(|i| i as usize)
                .ok_or(MeshError::InvalidNodeTag {
                    element: pos / nodes_per_element,
                    tag,
                })
        })
        .collect()
}

#[inline]
fn tag_to_index(tag: u64, num_nodes: usize) -> Option<usize> {
    let index = usize::try_from(tag.checked_sub(1)?).ok()?;
    (index < num_nodes).then_some(index)
}

//! Element topology validation.

use std::borrow::Cow;

use crate::error::{MeshError, Result};
use crate::kernel::RawElementReport;

/// Check that a dimension's element report holds exactly one distinct
/// element type.
///
/// Returns that type code and its node tag list. A code listed more than
/// once has its tag lists joined in report order. Empty and mixed reports
/// fail with [`MeshError::UnsupportedTopology`] listing every code found.
///
/// # Example
///
/// ```
/// use rippl::extract::validate_topology;
/// use rippl::kernel::RawElementReport;
///
/// let report = RawElementReport::single(3, vec![1, 2, 3, 4]);
/// let (code, tags) = validate_topology(&report, 2).unwrap();
/// assert_eq!(code, 3);
/// assert_eq!(tags.as_ref(), &[1, 2, 3, 4]);
/// ```
pub fn validate_topology(report: &RawElementReport, dim: u8) -> Result<(i32, Cow<'_, [u64]>)> {
    let codes = &report.element_type_codes;
    if codes.len() != report.node_tag_lists.len() {
        return Err(MeshError::MismatchedElementReport {
            codes: codes.len(),
            tag_lists: report.node_tag_lists.len(),
        });
    }

    let code = match codes.first() {
        Some(&first) if codes.iter().all(|&c| c == first) => first,
        _ => {
            return Err(MeshError::UnsupportedTopology {
                dim,
                codes: codes.clone(),
            })
        }
    };

    let tags = match report.node_tag_lists.as_slice() {
        [tags] => Cow::Borrowed(tags.as_slice()),
        lists => Cow::Owned(lists.concat()),
    };

    Ok((code, tags))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_type_accepted() {
        let report = RawElementReport::single(5, (1..=8).collect());
        let (code, tags) = validate_topology(&report, 3).unwrap();
        assert_eq!(code, 5);
        assert_eq!(tags.len(), 8);
        assert!(matches!(tags, Cow::Borrowed(_)));
    }

    #[test]
    fn test_mixed_types_rejected() {
        let report = RawElementReport::new(vec![2, 3], vec![vec![1, 2, 3], vec![1, 2, 3, 4]]);
        match validate_topology(&report, 2) {
            Err(MeshError::UnsupportedTopology { dim, codes }) => {
                assert_eq!(dim, 2);
                assert_eq!(codes, vec![2, 3]);
            }
            other => panic!("expected UnsupportedTopology, got {:?}", other),
        }
    }

    #[test]
    fn test_repeated_code_is_one_type() {
        let report = RawElementReport::new(vec![3, 3], vec![vec![1, 2, 3, 4], vec![2, 5, 6, 3]]);
        let (code, tags) = validate_topology(&report, 2).unwrap();
        assert_eq!(code, 3);
        assert_eq!(tags.as_ref(), &[1, 2, 3, 4, 2, 5, 6, 3]);
    }

    #[test]
    fn test_empty_report_rejected() {
        let report = RawElementReport::default();
        assert!(matches!(
            validate_topology(&report, 2),
            Err(MeshError::UnsupportedTopology { codes, .. }) if codes.is_empty()
        ));
    }

    #[test]
    fn test_missing_tag_list_rejected() {
        let report = RawElementReport::new(vec![3], Vec::new());
        assert!(matches!(
            validate_topology(&report, 2),
            Err(MeshError::MismatchedElementReport {
                codes: 1,
                tag_lists: 0
            })
        ));
    }
}

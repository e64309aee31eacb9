//! Boundary with the external meshing kernel.
//!
//! The meshing kernel owns process-wide session state that must be
//! initialized before any query and finalized afterwards. Here that state is
//! an explicit [`KernelSession`] handle: opening it initializes the kernel,
//! dropping it finalizes the kernel, and raw reports can only be read
//! through it.
//!
//! ```
//! use rippl::kernel::{KernelSession, MeshingKernel, RawElementReport, RawNodeReport};
//! use rippl::error::Result;
//!
//! struct OneQuad;
//!
//! impl MeshingKernel for OneQuad {
//!     fn initialize(&mut self, _model_name: &str) -> Result<()> { Ok(()) }
//!     fn finalize(&mut self) {}
//!     fn element_report(&self, _dim: u8) -> Result<RawElementReport> {
//!         Ok(RawElementReport::single(3, vec![1, 2, 3, 4]))
//!     }
//!     fn node_report(&self) -> Result<RawNodeReport> {
//!         Ok(RawNodeReport::new(
//!             vec![1, 2, 3, 4],
//!             vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0],
//!         ))
//!     }
//! }
//!
//! let mut kernel = OneQuad;
//! let session = KernelSession::open(&mut kernel, "square").unwrap();
//! assert_eq!(session.node_report().unwrap().num_nodes(), 4);
//! ```

use log::info;

use crate::error::Result;

/// The element report for one spatial dimension.
///
/// `node_tag_lists[i]` holds the 1-based node tags of every element of type
/// `element_type_codes[i]`, concatenated element by element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawElementReport {
    /// Kernel element type codes present in this dimension.
    pub element_type_codes: Vec<i32>,
    /// Flat node tag list for each type code.
    pub node_tag_lists: Vec<Vec<u64>>,
}

impl RawElementReport {
    /// Create a report from parallel code and tag-list vectors.
    pub fn new(element_type_codes: Vec<i32>, node_tag_lists: Vec<Vec<u64>>) -> Self {
        Self {
            element_type_codes,
            node_tag_lists,
        }
    }

    /// Create a report holding a single element type.
    pub fn single(element_type_code: i32, node_tags: Vec<u64>) -> Self {
        Self::new(vec![element_type_code], vec![node_tags])
    }

    /// Whether the report holds no element types.
    pub fn is_empty(&self) -> bool {
        self.element_type_codes.is_empty()
    }

    /// Append node tags for an element type, keeping codes in order of
    /// first appearance.
    pub fn push(&mut self, element_type_code: i32, node_tags: &[u64]) {
        match self
            .element_type_codes
            .iter()
            .position(|&c| c == element_type_code)
        {
            Some(i) => self.node_tag_lists[i].extend_from_slice(node_tags),
            None => {
                self.element_type_codes.push(element_type_code);
                self.node_tag_lists.push(node_tags.to_vec());
            }
        }
    }
}

/// The node report of a mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawNodeReport {
    /// 1-based node tags.
    pub node_tags: Vec<u64>,
    /// Coordinates, three per node, in `node_tags` order.
    pub coordinates: Vec<f64>,
}

impl RawNodeReport {
    /// Create a node report.
    pub fn new(node_tags: Vec<u64>, coordinates: Vec<f64>) -> Self {
        Self {
            node_tags,
            coordinates,
        }
    }

    /// Number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.node_tags.len()
    }
}

/// A meshing kernel that can report the mesh it generated.
pub trait MeshingKernel {
    /// Start a session for the named model.
    fn initialize(&mut self, model_name: &str) -> Result<()>;

    /// End the current session. Must not fail.
    fn finalize(&mut self);

    /// Element types and node tags for one spatial dimension.
    fn element_report(&self, dim: u8) -> Result<RawElementReport>;

    /// All nodes of the mesh.
    fn node_report(&self) -> Result<RawNodeReport>;
}

/// An active meshing kernel session.
///
/// The kernel is finalized when the session is dropped, on every exit path.
pub struct KernelSession<'k, K: MeshingKernel + ?Sized> {
    kernel: &'k mut K,
    model_name: String,
}

impl<'k, K: MeshingKernel + ?Sized> KernelSession<'k, K> {
    /// Initialize `kernel` for `model_name`.
    pub fn open(kernel: &'k mut K, model_name: &str) -> Result<Self> {
        info!("Starting meshing kernel session '{}'...", model_name);
        kernel.initialize(model_name)?;
        Ok(Self {
            kernel,
            model_name: model_name.to_string(),
        })
    }

    /// Name of the model this session was opened for.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Element report for one spatial dimension.
    pub fn element_report(&self, dim: u8) -> Result<RawElementReport> {
        self.kernel.element_report(dim)
    }

    /// Node report.
    pub fn node_report(&self) -> Result<RawNodeReport> {
        self.kernel.node_report()
    }
}

impl<K: MeshingKernel + ?Sized> Drop for KernelSession<'_, K> {
    fn drop(&mut self) {
        self.kernel.finalize();
        info!("Finished meshing kernel session '{}'.", self.model_name);
    }
}

impl<K: MeshingKernel + ?Sized> std::fmt::Debug for KernelSession<'_, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KernelSession")
            .field("model_name", &self.model_name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MeshError;

    #[derive(Default)]
    struct CountingKernel {
        active: bool,
        initialized: usize,
        finalized: usize,
        fail_init: bool,
    }

    impl MeshingKernel for CountingKernel {
        fn initialize(&mut self, _model_name: &str) -> Result<()> {
            if self.fail_init {
                return Err(MeshError::SessionInactive);
            }
            self.active = true;
            self.initialized += 1;
            Ok(())
        }

        fn finalize(&mut self) {
            self.active = false;
            self.finalized += 1;
        }

        fn element_report(&self, _dim: u8) -> Result<RawElementReport> {
            if !self.active {
                return Err(MeshError::SessionInactive);
            }
            Ok(RawElementReport::single(3, vec![1, 2, 3, 4]))
        }

        fn node_report(&self) -> Result<RawNodeReport> {
            if !self.active {
                return Err(MeshError::SessionInactive);
            }
            Ok(RawNodeReport::default())
        }
    }

    #[test]
    fn test_session_finalizes_on_drop() {
        let mut kernel = CountingKernel::default();
        {
            let session = KernelSession::open(&mut kernel, "model").unwrap();
            assert_eq!(session.model_name(), "model");
            assert!(session.element_report(2).is_ok());
        }
        assert_eq!(kernel.initialized, 1);
        assert_eq!(kernel.finalized, 1);
        assert!(!kernel.active);
    }

    #[test]
    fn test_session_finalizes_on_error_path() {
        fn use_session(kernel: &mut CountingKernel) -> Result<()> {
            let session = KernelSession::open(kernel, "model")?;
            session.element_report(2)?;
            Err(MeshError::SessionInactive)
        }

        let mut kernel = CountingKernel::default();
        assert!(use_session(&mut kernel).is_err());
        assert_eq!(kernel.finalized, 1);
    }

    #[test]
    fn test_failed_open_does_not_finalize() {
        let mut kernel = CountingKernel {
            fail_init: true,
            ..Default::default()
        };
        assert!(KernelSession::open(&mut kernel, "model").is_err());
        assert_eq!(kernel.finalized, 0);
    }

    #[test]
    fn test_push_groups_by_first_appearance() {
        let mut report = RawElementReport::default();
        report.push(3, &[1, 2, 3, 4]);
        report.push(10, &[1, 2, 3, 4, 5, 6, 7, 8, 9]);
        report.push(3, &[2, 5, 6, 3]);

        assert_eq!(report.element_type_codes, vec![3, 10]);
        assert_eq!(report.node_tag_lists[0], vec![1, 2, 3, 4, 2, 5, 6, 3]);
        assert_eq!(report.node_tag_lists[1].len(), 9);
    }
}

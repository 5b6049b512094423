//! Interfaces to the application receiving the imported grid.

use crate::element::Dimension;
use crate::element::Element;
use crate::element::ElementCounts;
use crate::vertex::Vertex;
use std::error;
use std::fmt;

/// Failure reported by the host when it cannot create, allocate or store
/// part of the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostError {
    message: String,
}

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl error::Error for HostError {}

/// Storage for an unstructured grid, filled by the importer.
///
/// Storage is allocated up front then filled at sequential positions, so
/// the importer must know exact counts before writing anything.
pub trait GridModel {
    type VertexList: Copy;
    type Region: Copy;

    fn create_vertex_list(&mut self) -> Result<Self::VertexList, HostError>;

    fn allocate_vertices(&mut self, list: Self::VertexList, count: usize)
        -> Result<(), HostError>;

    fn set_vertex(
        &mut self,
        list: Self::VertexList,
        index: usize,
        vertex: Vertex,
    ) -> Result<(), HostError>;

    /// Creates a surface domain (2D) or a volume block (3D) on top of the
    /// given vertex list.
    fn create_region(
        &mut self,
        list: Self::VertexList,
        dimension: Dimension,
    ) -> Result<Self::Region, HostError>;

    fn allocate_elements(
        &mut self,
        region: Self::Region,
        counts: &ElementCounts,
    ) -> Result<(), HostError>;

    fn set_element(
        &mut self,
        region: Self::Region,
        index: usize,
        element: &Element,
    ) -> Result<(), HostError>;
}

/// Progress reporting, cancellation and diagnostics.
///
/// Every progress method returns whether the import should go on. The
/// importer checks after each record, so a cancel request is honored
/// within one vertex or element.
pub trait Host {
    fn progress_init(&mut self, major_steps: u32) -> bool {
        let _ = major_steps;
        true
    }

    fn progress_begin_step(&mut self, total: usize) -> bool {
        let _ = total;
        true
    }

    fn progress_increment(&mut self) -> bool {
        true
    }

    fn progress_end_step(&mut self) -> bool {
        true
    }

    /// Called once at the end of the import, whether it succeeded or not.
    fn progress_end(&mut self, ok: bool) -> bool {
        ok
    }

    fn send_diagnostic(&mut self, message: &str) {
        tracing::error!("{message}");
    }
}

/// A host without user interface: never cancels, logs diagnostics.
#[derive(Copy, Clone, Debug, Default)]
pub struct Silent;

impl Host for Silent {}

/// Runs `f` inside a progress step of `total` increments.
///
/// The step is always ended, even when `f` fails or the host refused to
/// begin it.
pub(crate) fn step<H, T, F>(host: &mut H, total: usize, f: F) -> crate::Result<T>
where
    H: Host + ?Sized,
    F: FnOnce(&mut H) -> crate::Result<T>,
{
    let result = if host.progress_begin_step(total) {
        f(host)
    } else {
        Err(crate::Error::cancelled())
    };
    let ended = host.progress_end_step();
    let value = result?;
    if !ended {
        return Err(crate::Error::cancelled());
    }
    Ok(value)
}

/// Checks in with the host after one record.
pub(crate) fn increment<H>(host: &mut H) -> crate::Result<()>
where
    H: Host + ?Sized,
{
    if host.progress_increment() {
        Ok(())
    } else {
        tracing::info!("import cancelled by host");
        Err(crate::Error::cancelled())
    }
}

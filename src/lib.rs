//! Importer for SU2 ASCII grid files.
//!
//! SU2 files declare their dimension, point count and element count as
//! `KEY= VALUE` lines, each count being followed by its records. The
//! importer scans the header once, remembering where the point and element
//! sections start, then seeks back to read them. The element section is
//! read twice: once to count elements by kind, so that the receiving
//! [GridModel] can allocate exact storage, then once to store them.
//!
//! # Example
//!
//! ```
//! use std::io::Cursor;
//!
//! let input = "\
//! NDIME= 2
//! NELEM= 1
//! 5 0 1 2 0
//! NPOIN= 3
//! 0.0 0.0 0
//! 1.0 0.0 1
//! 0.0 1.0 2
//! ";
//! let mesh = su2_import::Mesh::from_reader(Cursor::new(input))?;
//! assert_eq!(mesh.vertex_count(), 3);
//! assert_eq!(mesh.element_count(), 1);
//! # Ok::<(), su2_import::Error>(())
//! ```

#[cfg(test)]
#[macro_use]
extern crate approx;

pub mod element;
mod error;
mod header;
mod host;
mod importer;
mod mesh;
mod pass;
pub mod plugin;
mod reader;
mod vertex;


pub use crate::element::Dimension;
pub use crate::element::Element;
pub use crate::element::ElementCounts;
pub use crate::element::ElementKind;
pub use crate::error::Error;
pub use crate::error::ErrorKind;
pub use crate::error::HostOp;
pub use crate::error::Reading;
pub use crate::error::Result;
pub use crate::header::scan_header;
pub use crate::header::Header;
pub use crate::header::Key;
pub use crate::host::GridModel;
pub use crate::host::Host;
pub use crate::host::HostError;
pub use crate::host::Silent;
pub use crate::importer::import_file;
pub use crate::importer::Importer;
pub use crate::importer::Summary;
pub use crate::mesh::Mesh;
pub use crate::mesh::Region;
pub use crate::mesh::RegionId;
pub use crate::mesh::VertexListId;
pub use crate::pass::count_elements;
pub use crate::pass::load_elements;
pub use crate::plugin::FormatInfo;
pub use crate::reader::LineReader;
pub use crate::reader::SectionStart;
pub use crate::vertex::read_vertices;
pub use crate::vertex::Vertex;

//! Element kinds, their SU2 codes, and the records stored in the grid model.

use std::fmt;
use std::ops;

/// Largest node count of any supported element (hexahedra).
pub const MAX_NODES: usize = 8;

const KIND_COUNT: usize = 7;

/// Dimensionality of a grid, as declared by its `NDIME` key.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Dimension {
    /// 2D grid made of triangles and quadrilaterals.
    Surface,
    /// 3D grid made of tetrahedra, pyramids, wedges and hexahedra.
    Volume,
}

impl Dimension {
    pub fn from_ndime(ndime: u32) -> Option<Self> {
        match ndime {
            2 => Some(Dimension::Surface),
            3 => Some(Dimension::Volume),
            _ => None,
        }
    }

    pub fn ndime(self) -> usize {
        match self {
            Dimension::Surface => 2,
            Dimension::Volume => 3,
        }
    }

    pub fn is_volumetric(self) -> bool {
        self == Dimension::Volume
    }

    /// Number of tokens on a point line: the coordinates plus the point index.
    pub fn point_token_count(self) -> usize {
        self.ndime() + 1
    }

    /// Element kinds a grid of this dimension may contain.
    pub fn element_kinds(self) -> &'static [ElementKind] {
        match self {
            Dimension::Surface => &[ElementKind::Triangle, ElementKind::Quadrilateral],
            Dimension::Volume => &[
                ElementKind::Tetrahedron,
                ElementKind::Pyramid,
                ElementKind::Wedge,
                ElementKind::Hexahedron,
            ],
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}D", self.ndime())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementKind {
    Bar,
    Triangle,
    Quadrilateral,
    Tetrahedron,
    Pyramid,
    Wedge,
    Hexahedron,
}

impl ElementKind {
    pub const ALL: [ElementKind; KIND_COUNT] = [
        ElementKind::Bar,
        ElementKind::Triangle,
        ElementKind::Quadrilateral,
        ElementKind::Tetrahedron,
        ElementKind::Pyramid,
        ElementKind::Wedge,
        ElementKind::Hexahedron,
    ];

    /// Decodes an SU2 element code.
    ///
    /// Only the kinds allowed in a grid of the given dimension are
    /// recognized. Bars never are: SU2 only uses them for boundary markers,
    /// which this importer does not read.
    pub fn from_code(code: u32, dimension: Dimension) -> Option<Self> {
        let kind = match code {
            5 => ElementKind::Triangle,
            9 => ElementKind::Quadrilateral,
            10 => ElementKind::Tetrahedron,
            12 => ElementKind::Hexahedron,
            13 => ElementKind::Wedge,
            14 => ElementKind::Pyramid,
            _ => return None,
        };
        if kind.dimension() != dimension.ndime() {
            return None;
        }
        Some(kind)
    }

    /// The SU2 (and VTK) code of this kind.
    pub fn code(self) -> u32 {
        match self {
            ElementKind::Bar => 3,
            ElementKind::Triangle => 5,
            ElementKind::Quadrilateral => 9,
            ElementKind::Tetrahedron => 10,
            ElementKind::Hexahedron => 12,
            ElementKind::Wedge => 13,
            ElementKind::Pyramid => 14,
        }
    }

    pub fn dimension(self) -> usize {
        match self {
            ElementKind::Bar => 1,
            ElementKind::Triangle | ElementKind::Quadrilateral => 2,
            ElementKind::Tetrahedron
            | ElementKind::Pyramid
            | ElementKind::Wedge
            | ElementKind::Hexahedron => 3,
        }
    }

    pub fn node_count(self) -> usize {
        match self {
            ElementKind::Bar => 2,
            ElementKind::Triangle => 3,
            ElementKind::Quadrilateral | ElementKind::Tetrahedron => 4,
            ElementKind::Pyramid => 5,
            ElementKind::Wedge => 6,
            ElementKind::Hexahedron => 8,
        }
    }

    /// Name published in the host's capability registry.
    pub fn name(self) -> &'static str {
        match self {
            ElementKind::Bar => "Bar",
            ElementKind::Triangle => "Tri",
            ElementKind::Quadrilateral => "Quad",
            ElementKind::Tetrahedron => "Tet",
            ElementKind::Pyramid => "Pyramid",
            ElementKind::Wedge => "Wedge",
            ElementKind::Hexahedron => "Hex",
        }
    }

    pub(crate) fn short_name(self) -> &'static str {
        match self {
            ElementKind::Bar => "bar",
            ElementKind::Triangle => "tri",
            ElementKind::Quadrilateral => "quad",
            ElementKind::Tetrahedron => "tet",
            ElementKind::Pyramid => "pyramid",
            ElementKind::Wedge => "prism",
            ElementKind::Hexahedron => "hex",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Number of elements of each kind.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ElementCounts([usize; KIND_COUNT]);

impl ElementCounts {
    pub fn increment(&mut self, kind: ElementKind) {
        self.0[kind.index()] += 1;
    }

    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }

    /// Kinds with at least one element, along with their count.
    pub fn iter(&self) -> impl Iterator<Item = (ElementKind, usize)> + '_ {
        ElementKind::ALL
            .iter()
            .zip(&self.0)
            .filter(|(_, count)| **count != 0)
            .map(|(kind, count)| (*kind, *count))
    }
}

impl ops::Index<ElementKind> for ElementCounts {
    type Output = usize;

    fn index(&self, kind: ElementKind) -> &usize {
        &self.0[kind.index()]
    }
}

impl ops::IndexMut<ElementKind> for ElementCounts {
    fn index_mut(&mut self, kind: ElementKind) -> &mut usize {
        &mut self.0[kind.index()]
    }
}

impl FromIterator<(ElementKind, usize)> for ElementCounts {
    fn from_iter<I: IntoIterator<Item = (ElementKind, usize)>>(iter: I) -> Self {
        let mut counts = ElementCounts::default();
        for (kind, count) in iter {
            counts[kind] += count;
        }
        counts
    }
}

/// A grid element: its kind and the raw vertex indices read from the file.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Element {
    kind: ElementKind,
    nodes: [usize; MAX_NODES],
}

impl Element {
    /// Returns `None` unless `nodes` holds exactly `kind.node_count()` indices.
    pub fn new(kind: ElementKind, nodes: &[usize]) -> Option<Self> {
        if nodes.len() != kind.node_count() {
            return None;
        }
        let mut element = Element {
            kind,
            nodes: [0; MAX_NODES],
        };
        element.nodes[..nodes.len()].copy_from_slice(nodes);
        Some(element)
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn nodes(&self) -> &[usize] {
        &self.nodes[..self.kind.node_count()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_by_dimension() {
        for dim in [Dimension::Surface, Dimension::Volume] {
            for kind in dim.element_kinds() {
                assert_eq!(ElementKind::from_code(kind.code(), dim), Some(*kind));
            }
        }
        assert_eq!(ElementKind::from_code(10, Dimension::Surface), None);
        assert_eq!(ElementKind::from_code(5, Dimension::Volume), None);
        assert_eq!(ElementKind::from_code(3, Dimension::Surface), None);
        assert_eq!(ElementKind::from_code(0, Dimension::Volume), None);
    }

    #[test]
    fn test_counts() {
        let mut counts = ElementCounts::default();
        counts.increment(ElementKind::Wedge);
        counts.increment(ElementKind::Tetrahedron);
        counts.increment(ElementKind::Wedge);
        assert_eq!(counts.total(), 3);
        assert_eq!(counts[ElementKind::Wedge], 2);
        assert_eq!(counts[ElementKind::Hexahedron], 0);
        assert_eq!(
            counts.iter().collect::<Vec<_>>(),
            [(ElementKind::Tetrahedron, 1), (ElementKind::Wedge, 2)],
        );
    }

    #[test]
    fn test_element_nodes() {
        let e = Element::new(ElementKind::Pyramid, &[4, 3, 2, 1, 0]).unwrap();
        assert_eq!(e.nodes(), [4, 3, 2, 1, 0]);
        assert!(Element::new(ElementKind::Pyramid, &[4, 3, 2, 1]).is_none());
    }
}

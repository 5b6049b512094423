//! An in-memory grid model.

use crate::element::Dimension;
use crate::element::Element;
use crate::element::ElementCounts;
use crate::host::GridModel;
use crate::host::HostError;
use crate::host::Silent;
use crate::importer::Importer;
use crate::plugin::FormatInfo;
use crate::vertex::Vertex;
use crate::Error;
use crate::ErrorKind;
use std::fs;
use std::io;
use std::path::Path;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VertexListId(usize);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RegionId(usize);

/// Elements sharing a vertex list: a domain in 2D, a block in 3D.
///
/// Element storage is sized once from per-kind counts, then filled by
/// index. Writing more elements of a kind than were allocated fails.
#[derive(Debug)]
pub struct Region {
    dimension: Dimension,
    allocated: ElementCounts,
    filled: ElementCounts,
    slots: Vec<Option<Element>>,
}

impl Region {
    fn new(dimension: Dimension) -> Self {
        Self {
            dimension,
            allocated: ElementCounts::default(),
            filled: ElementCounts::default(),
            slots: Vec::new(),
        }
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// Per-kind counts storage was allocated for.
    pub fn allocated(&self) -> &ElementCounts {
        &self.allocated
    }

    /// Per-kind counts of the elements set so far.
    pub fn counts(&self) -> &ElementCounts {
        &self.filled
    }

    pub fn element(&self, index: usize) -> Option<&Element> {
        self.slots.get(index)?.as_ref()
    }

    /// Elements that were set, in index order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.slots.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.filled.total()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Grid made of at most one vertex list and regions built on top of it.
#[derive(Debug, Default)]
pub struct Mesh {
    vertex_list: Option<Vec<Vertex>>,
    regions: Vec<Region>,
}

impl Mesh {
    /// Imports an SU2 grid file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Mesh, Error> {
        let path = path.as_ref();
        let file = fs::File::open(path).map_err(|source| {
            Error::from(ErrorKind::Open {
                path: path.display().to_string(),
                source,
            })
        })?;
        Mesh::from_reader(io::BufReader::new(file))
    }

    /// Imports an SU2 grid from a seekable stream.
    pub fn from_reader<R>(r: R) -> Result<Mesh, Error>
    where
        R: io::BufRead + io::Seek,
    {
        let mut mesh = Mesh::default();
        Importer::new(r, FormatInfo::su2())?.read(&mut mesh, &mut Silent)?;
        Ok(mesh)
    }

    /// Dimension of the first region, if any.
    pub fn dimension(&self) -> Option<Dimension> {
        self.regions.first().map(Region::dimension)
    }

    pub fn vertices(&self) -> &[Vertex] {
        self.vertex_list.as_deref().unwrap_or_default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices().len()
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn region(&self, id: RegionId) -> &Region {
        &self.regions[id.0]
    }

    /// Elements of all regions, region after region.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.regions.iter().flat_map(Region::elements)
    }

    pub fn element_count(&self) -> usize {
        self.regions.iter().map(Region::len).sum()
    }

    /// Per-kind element counts over all regions.
    pub fn counts(&self) -> ElementCounts {
        self.regions
            .iter()
            .flat_map(|region| region.counts().iter())
            .collect()
    }

    fn vertex_list_mut(&mut self, list: VertexListId) -> Result<&mut Vec<Vertex>, HostError> {
        match (&mut self.vertex_list, list) {
            (Some(vertices), VertexListId(0)) => Ok(vertices),
            _ => Err(HostError::new("no such vertex list")),
        }
    }

    fn region_mut(&mut self, region: RegionId) -> Result<&mut Region, HostError> {
        self.regions
            .get_mut(region.0)
            .ok_or_else(|| HostError::new("no such region"))
    }
}

impl GridModel for Mesh {
    type VertexList = VertexListId;
    type Region = RegionId;

    fn create_vertex_list(&mut self) -> Result<VertexListId, HostError> {
        if self.vertex_list.is_some() {
            return Err(HostError::new("the mesh already has a vertex list"));
        }
        self.vertex_list = Some(Vec::new());
        Ok(VertexListId(0))
    }

    fn allocate_vertices(&mut self, list: VertexListId, count: usize) -> Result<(), HostError> {
        let vertices = self.vertex_list_mut(list)?;
        vertices
            .try_reserve_exact(count)
            .map_err(|err| HostError::new(err.to_string()))?;
        vertices.resize(count, Vertex::default());
        Ok(())
    }

    fn set_vertex(
        &mut self,
        list: VertexListId,
        index: usize,
        vertex: Vertex,
    ) -> Result<(), HostError> {
        let slot = self
            .vertex_list_mut(list)?
            .get_mut(index)
            .ok_or_else(|| HostError::new(format!("vertex {index} was not allocated")))?;
        *slot = vertex;
        Ok(())
    }

    fn create_region(
        &mut self,
        list: VertexListId,
        dimension: Dimension,
    ) -> Result<RegionId, HostError> {
        self.vertex_list_mut(list)?;
        self.regions.push(Region::new(dimension));
        Ok(RegionId(self.regions.len() - 1))
    }

    fn allocate_elements(
        &mut self,
        region: RegionId,
        counts: &ElementCounts,
    ) -> Result<(), HostError> {
        let region = self.region_mut(region)?;
        if let Some((kind, _)) = counts
            .iter()
            .find(|(kind, _)| kind.dimension() != region.dimension.ndime())
        {
            return Err(HostError::new(format!(
                "{kind} elements do not belong in a {} region",
                region.dimension,
            )));
        }
        let total = counts.total();
        region.slots.clear();
        region
            .slots
            .try_reserve_exact(total)
            .map_err(|err| HostError::new(err.to_string()))?;
        region.slots.resize(total, None);
        region.allocated = *counts;
        region.filled = ElementCounts::default();
        Ok(())
    }

    fn set_element(
        &mut self,
        region: RegionId,
        index: usize,
        element: &Element,
    ) -> Result<(), HostError> {
        let region = self.region_mut(region)?;
        let kind = element.kind();
        let Some(slot) = region.slots.get_mut(index) else {
            return Err(HostError::new(format!("element {index} was not allocated")));
        };
        let previous = slot.as_ref().map(Element::kind);
        let freed = usize::from(previous == Some(kind));
        if region.filled[kind] - freed == region.allocated[kind] {
            return Err(HostError::new(format!("no room left for {kind} elements")));
        }
        if let Some(previous) = previous {
            region.filled[previous] -= 1;
        }
        *slot = Some(*element);
        region.filled[kind] += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementKind;

    fn tri(nodes: [usize; 3]) -> Element {
        Element::new(ElementKind::Triangle, &nodes).unwrap()
    }

    #[test]
    fn test_single_vertex_list() {
        let mut mesh = Mesh::default();
        let list = mesh.create_vertex_list().unwrap();
        assert!(mesh.create_vertex_list().is_err());
        mesh.allocate_vertices(list, 2).unwrap();
        mesh.set_vertex(list, 1, Vertex::new(1.0, 2.0, 3.0)).unwrap();
        assert!(mesh.set_vertex(list, 2, Vertex::default()).is_err());
        assert_eq!(mesh.vertices(), [Vertex::default(), Vertex::new(1.0, 2.0, 3.0)]);
    }

    #[test]
    fn test_element_budget() {
        let mut mesh = Mesh::default();
        let list = mesh.create_vertex_list().unwrap();
        let region = mesh.create_region(list, Dimension::Surface).unwrap();
        let counts = [(ElementKind::Triangle, 1), (ElementKind::Quadrilateral, 1)]
            .into_iter()
            .collect();
        mesh.allocate_elements(region, &counts).unwrap();

        mesh.set_element(region, 0, &tri([0, 1, 2])).unwrap();
        assert!(mesh.set_element(region, 1, &tri([1, 2, 3])).is_err());
        let quad = Element::new(ElementKind::Quadrilateral, &[0, 1, 2, 3]).unwrap();
        mesh.set_element(region, 1, &quad).unwrap();
        assert!(mesh.set_element(region, 2, &quad).is_err());

        // Overwriting frees the previous element's budget.
        mesh.set_element(region, 0, &tri([2, 1, 0])).unwrap();
        assert_eq!(mesh.element_count(), 2);
        assert_eq!(mesh.region(region).element(0), Some(&tri([2, 1, 0])));
        assert_eq!(mesh.counts(), counts);
    }

    #[test]
    fn test_kinds_must_match_region() {
        let mut mesh = Mesh::default();
        let list = mesh.create_vertex_list().unwrap();
        let region = mesh.create_region(list, Dimension::Surface).unwrap();
        let counts = [(ElementKind::Hexahedron, 1)].into_iter().collect();
        assert!(mesh.allocate_elements(region, &counts).is_err());
    }
}

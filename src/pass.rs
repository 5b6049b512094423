//! The two traversals of the element section.
//!
//! SU2 files only declare the total number of elements, while hosts want
//! storage allocated per kind before anything is written. The element
//! section is thus read twice from the same offset: once to count elements
//! by kind, and once to decode and store them. Both passes share
//! [traverse], which owns the line grammar; they only differ by their
//! [ElementVisitor].

use crate::element::Dimension;
use crate::element::Element;
use crate::element::ElementCounts;
use crate::element::ElementKind;
use crate::element::MAX_NODES;
use crate::error::host_error;
use crate::error::ErrorKind;
use crate::error::HostOp;
use crate::error::Reading;
use crate::header::Header;
use crate::host;
use crate::host::GridModel;
use crate::host::Host;
use crate::reader::parse_int;
use crate::reader::tokenize;
use crate::reader::LineReader;
use crate::Error;
use crate::Result;
use std::io;

trait ElementVisitor {
    fn reading(&self, dimension: Dimension) -> Reading;

    /// Handles one element line, whose kind code has already been decoded.
    fn visit(
        &mut self,
        kind: ElementKind,
        tokens: &[&str],
        line: &str,
    ) -> std::result::Result<(), ErrorKind>;
}

/// Reads the `NELEM` element lines and feeds them to `visitor`.
fn traverse<R, H, V>(
    reader: &mut LineReader<R>,
    header: &Header,
    host: &mut H,
    visitor: &mut V,
) -> Result<()>
where
    R: io::BufRead + io::Seek,
    H: Host + ?Sized,
    V: ElementVisitor,
{
    let dimension = header.dimension;
    let reading = visitor.reading(dimension);
    reader.seek(header.element_section)?;

    host::step(host, header.element_count, |host| {
        for _ in 0..header.element_count {
            if !reader.next_significant_line()? {
                return Err(Error::at(
                    ErrorKind::UnexpectedEof { reading },
                    reader.lineno(),
                ));
            }
            let line = reader.line();
            let lineno = reader.lineno();
            let tokens: Vec<&str> = tokenize(line).collect();

            let code = tokens.first().and_then(|token| parse_int::<u32>(token));
            let Some(code) = code else {
                let line = line.to_owned();
                return Err(Error::at(ErrorKind::BadElementType { reading, line }, lineno));
            };
            let Some(kind) = ElementKind::from_code(code, dimension) else {
                let line = line.to_owned();
                return Err(Error::at(
                    ErrorKind::UnexpectedElementType { reading, line },
                    lineno,
                ));
            };

            visitor
                .visit(kind, &tokens, line)
                .map_err(|kind| Error::at(kind, lineno))?;
            host::increment(host)?;
        }
        Ok(())
    })
}

/// Classification pass: counts elements by kind, stores nothing.
struct Counter {
    counts: ElementCounts,
}

impl ElementVisitor for Counter {
    fn reading(&self, dimension: Dimension) -> Reading {
        Reading::Counts(dimension)
    }

    fn visit(
        &mut self,
        kind: ElementKind,
        _tokens: &[&str],
        _line: &str,
    ) -> std::result::Result<(), ErrorKind> {
        self.counts.increment(kind);
        Ok(())
    }
}

pub fn count_elements<R, H>(
    reader: &mut LineReader<R>,
    header: &Header,
    host: &mut H,
) -> Result<ElementCounts>
where
    R: io::BufRead + io::Seek,
    H: Host + ?Sized,
{
    let mut counter = Counter {
        counts: ElementCounts::default(),
    };
    traverse(reader, header, host, &mut counter)?;
    tracing::debug!(counts = ?counter.counts, "counted elements");
    Ok(counter.counts)
}

/// Decodes `CODE V1 ... Vn INDEX`. The trailing index must be a valid
/// integer but is dropped: elements are stored in file order.
fn decode_element(kind: ElementKind, tokens: &[&str]) -> Option<Element> {
    let node_count = kind.node_count();
    if tokens.len() != node_count + 2 {
        return None;
    }
    let mut nodes = [0; MAX_NODES];
    for (node, token) in nodes.iter_mut().zip(&tokens[1..=node_count]) {
        *node = parse_int(token)?;
    }
    let _index: usize = parse_int(tokens[node_count + 1])?;
    Element::new(kind, &nodes[..node_count])
}

/// Loading pass: decodes elements and writes them at sequential positions.
struct Loader<'m, M>
where
    M: GridModel + ?Sized,
{
    model: &'m mut M,
    region: M::Region,
    dimension: Dimension,
    /// What is left of the counts found by the classification pass.
    remaining: ElementCounts,
    next: usize,
}

impl<M> ElementVisitor for Loader<'_, M>
where
    M: GridModel + ?Sized,
{
    fn reading(&self, dimension: Dimension) -> Reading {
        Reading::Elements(dimension)
    }

    fn visit(
        &mut self,
        kind: ElementKind,
        tokens: &[&str],
        line: &str,
    ) -> std::result::Result<(), ErrorKind> {
        let element = decode_element(kind, tokens).ok_or_else(|| ErrorKind::BadConnectivity {
            kind,
            line: line.to_owned(),
        })?;

        // Both passes read the same bytes, so this only fails if the
        // stream changed in between.
        if self.remaining[kind] == 0 {
            return Err(ErrorKind::CountMismatch {
                kind,
                line: line.to_owned(),
            });
        }
        self.remaining[kind] -= 1;

        self.model
            .set_element(self.region, self.next, &element)
            .map_err(|source| ErrorKind::Host {
                op: HostOp::SetElement(self.dimension),
                line: Some(line.to_owned()),
                source,
            })?;
        self.next += 1;
        Ok(())
    }
}

/// Creates the region holding the elements, allocates it from `counts`,
/// then streams the element lines into it.
pub fn load_elements<R, M, H>(
    reader: &mut LineReader<R>,
    header: &Header,
    counts: &ElementCounts,
    list: M::VertexList,
    model: &mut M,
    host: &mut H,
) -> Result<M::Region>
where
    R: io::BufRead + io::Seek,
    M: GridModel + ?Sized,
    H: Host + ?Sized,
{
    let dimension = header.dimension;
    let region = model
        .create_region(list, dimension)
        .map_err(host_error(HostOp::CreateRegion(dimension)))?;
    model
        .allocate_elements(region, counts)
        .map_err(host_error(HostOp::AllocateElements(dimension)))?;

    let mut loader = Loader {
        model,
        region,
        dimension,
        remaining: *counts,
        next: 0,
    };
    traverse(reader, header, host, &mut loader)?;
    tracing::debug!(count = loader.next, "loaded elements");
    Ok(region)
}

use crate::element::Dimension;
use crate::error::host_error;
use crate::error::ErrorKind;
use crate::error::HostOp;
use crate::error::Reading;
use crate::header::Header;
use crate::host;
use crate::host::GridModel;
use crate::host::Host;
use crate::reader::parse_float;
use crate::reader::parse_int;
use crate::reader::tokenize;
use crate::reader::LineReader;
use crate::Error;
use crate::Result;
use std::io;

/// A grid point. `z` is zero in 2D grids.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vertex {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Decodes `X Y INDEX` (2D) or `X Y Z INDEX` (3D).
///
/// The declared index must be a valid integer but is otherwise unused:
/// points are stored in file order.
fn parse_point(tokens: &[&str], dimension: Dimension) -> Option<Vertex> {
    let (index, coords) = tokens.split_last()?;
    let _index: usize = parse_int(index)?;
    let mut vertex = Vertex::default();
    match (dimension, coords) {
        (Dimension::Surface, [x, y]) => {
            vertex.x = parse_float(x)?;
            vertex.y = parse_float(y)?;
        }
        (Dimension::Volume, [x, y, z]) => {
            vertex.x = parse_float(x)?;
            vertex.y = parse_float(y)?;
            vertex.z = parse_float(z)?;
        }
        _ => return None,
    }
    Some(vertex)
}

/// Creates the vertex list, then streams the `NPOIN` point lines into it.
pub fn read_vertices<R, M, H>(
    reader: &mut LineReader<R>,
    header: &Header,
    model: &mut M,
    host: &mut H,
) -> Result<M::VertexList>
where
    R: io::BufRead + io::Seek,
    M: GridModel + ?Sized,
    H: Host + ?Sized,
{
    let list = model
        .create_vertex_list()
        .map_err(host_error(HostOp::CreateVertexList))?;
    model
        .allocate_vertices(list, header.vertex_count)
        .map_err(host_error(HostOp::AllocateVertices))?;
    reader.seek(header.vertex_section)?;

    let dimension = header.dimension;
    host::step(host, header.vertex_count, |host| {
        for index in 0..header.vertex_count {
            if !reader.next_significant_line()? {
                return Err(Error::at(
                    ErrorKind::UnexpectedEof {
                        reading: Reading::Points,
                    },
                    reader.lineno(),
                ));
            }
            let line = reader.line();
            let lineno = reader.lineno();
            let tokens: Vec<&str> = tokenize(line).collect();
            if tokens.len() != dimension.point_token_count() {
                let line = line.to_owned();
                return Err(Error::at(ErrorKind::BadPointTokenCount { line }, lineno));
            }
            let vertex = parse_point(&tokens, dimension).ok_or_else(|| {
                let line = line.to_owned();
                Error::at(ErrorKind::BadPoint { line }, lineno)
            })?;
            model.set_vertex(list, index, vertex).map_err(|source| {
                let line = Some(line.to_owned());
                let op = HostOp::SetVertex;
                Error::at(ErrorKind::Host { op, line, source }, lineno)
            })?;
            host::increment(host)?;
        }
        Ok(())
    })?;

    tracing::debug!(count = header.vertex_count, "read vertices");
    Ok(list)
}

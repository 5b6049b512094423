use crate::element::Dimension;
use crate::error::ErrorKind;
use crate::host;
use crate::host::Host;
use crate::reader::parse_int;
use crate::reader::split_key_value;
use crate::reader::LineReader;
use crate::reader::SectionStart;
use crate::Error;
use crate::Result;
use std::fmt;
use std::io;
use std::str;

/// Header keys the importer needs. Matching is exact and case-sensitive.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Key {
    /// Dimensionality, 2 or 3.
    Ndime,
    /// Element count, followed by the element lines.
    Nelem,
    /// Point count, followed by the point lines.
    Npoin,
}

impl Key {
    pub fn as_str(self) -> &'static str {
        match self {
            Key::Ndime => "NDIME",
            Key::Nelem => "NELEM",
            Key::Npoin => "NPOIN",
        }
    }
}

impl str::FromStr for Key {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Key, ()> {
        Ok(match s {
            "NDIME" => Key::Ndime,
            "NELEM" => Key::Nelem,
            "NPOIN" => Key::Npoin,
            _ => return Err(()),
        })
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the header scan found: the declared sizes of the grid and where
/// its bulk sections start.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Header {
    pub dimension: Dimension,
    pub vertex_count: usize,
    pub element_count: usize,
    pub vertex_section: SectionStart,
    pub element_section: SectionStart,
}

/// Number of progress increments of the header scan, one per key.
pub(crate) const HEADER_STEPS: usize = 3;

/// Scans `KEY = VALUE` lines from the current position until NDIME, NELEM
/// and NPOIN have all been found.
///
/// Other lines are skipped. Scanning stops as soon as the three keys are
/// known, so duplicates further down the file go unnoticed.
pub fn scan_header<R, H>(reader: &mut LineReader<R>, host: &mut H) -> Result<Header>
where
    R: io::BufRead + io::Seek,
    H: Host + ?Sized,
{
    host::step(host, HEADER_STEPS, |host| {
        let mut dimension = None;
        let mut elements = None;
        let mut vertices = None;

        loop {
            if !reader.next_significant_line()? {
                let missing = [
                    (Key::Ndime, dimension.is_none()),
                    (Key::Nelem, elements.is_none()),
                    (Key::Npoin, vertices.is_none()),
                ]
                .into_iter()
                .filter_map(|(key, missing)| missing.then_some(key))
                .collect();
                return Err(Error::at(
                    ErrorKind::MissingKeys { missing },
                    reader.lineno(),
                ));
            }

            let line = reader.line();
            let Some((key, value)) = split_key_value(line) else {
                continue;
            };
            let Ok(key) = key.parse::<Key>() else {
                continue;
            };
            let lineno = reader.lineno();
            let duplicate = || {
                let line = line.to_owned();
                Error::at(ErrorKind::DuplicateKey { key, line }, lineno)
            };
            let invalid = || {
                let line = line.to_owned();
                Error::at(ErrorKind::InvalidValue { key, line }, lineno)
            };

            match key {
                Key::Ndime => {
                    if dimension.is_some() {
                        return Err(duplicate());
                    }
                    let dim = parse_int::<u32>(value)
                        .and_then(Dimension::from_ndime)
                        .ok_or_else(invalid)?;
                    tracing::debug!(lineno, %dim, "found dimension");
                    dimension = Some(dim);
                }
                Key::Nelem | Key::Npoin => {
                    let found = if key == Key::Nelem {
                        &mut elements
                    } else {
                        &mut vertices
                    };
                    if found.is_some() {
                        return Err(duplicate());
                    }
                    let count = parse_int::<usize>(value).ok_or_else(invalid)?;
                    let section = reader.position();
                    tracing::debug!(lineno, %key, count, offset = section.offset(), "found section");
                    *found = Some((count, section));
                }
            }

            if let (Some(dimension), Some(elements), Some(vertices)) =
                (dimension, elements, vertices)
            {
                return Ok(Header {
                    dimension,
                    vertex_count: vertices.0,
                    element_count: elements.0,
                    vertex_section: vertices.1,
                    element_section: elements.1,
                });
            }
            host::increment(host)?;
        }
    })
}

use crate::element::Dimension;
use crate::element::ElementKind;
use crate::header::Key;
use crate::host::HostError;
use std::error;
use std::fmt;
use std::io;

/// What the importer was streaming when a record went wrong.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Reading {
    Counts(Dimension),
    Points,
    Elements(Dimension),
}

impl Reading {
    /// Singular name of one record of this section.
    fn record(self) -> String {
        match self {
            Reading::Counts(dim) => format!("{dim} count"),
            Reading::Points => String::from("point"),
            Reading::Elements(dim) => format!("{dim} element"),
        }
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reading::Counts(dim) => write!(f, "{dim} counts"),
            Reading::Points => write!(f, "point"),
            Reading::Elements(dim) => write!(f, "{dim} element"),
        }
    }
}

/// Host call that failed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HostOp {
    CreateVertexList,
    AllocateVertices,
    SetVertex,
    CreateRegion(Dimension),
    AllocateElements(Dimension),
    SetElement(Dimension),
}

impl fmt::Display for HostOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostOp::CreateVertexList => write!(f, "Could not create vertex list"),
            HostOp::AllocateVertices => write!(f, "Could not allocate vertex list"),
            HostOp::SetVertex => write!(f, "Could not set vertex list data"),
            HostOp::CreateRegion(Dimension::Surface) => write!(f, "Could not create domain entity"),
            HostOp::CreateRegion(Dimension::Volume) => write!(f, "Could not create block entity"),
            HostOp::AllocateElements(Dimension::Surface) => {
                write!(f, "Could not allocate domain elements")
            }
            HostOp::AllocateElements(Dimension::Volume) => {
                write!(f, "Could not allocate block elements")
            }
            HostOp::SetElement(dim) => write!(f, "Could not set {dim} element data"),
        }
    }
}

#[derive(Debug)]
pub enum ErrorKind {
    Io(io::Error),
    Open {
        path: String,
        source: io::Error,
    },
    DuplicateKey {
        key: Key,
        line: String,
    },
    InvalidValue {
        key: Key,
        line: String,
    },
    /// The stream ended before NDIME, NELEM and NPOIN were all declared.
    MissingKeys {
        missing: Vec<Key>,
    },
    UnexpectedEof {
        reading: Reading,
    },
    BadElementType {
        reading: Reading,
        line: String,
    },
    UnexpectedElementType {
        reading: Reading,
        line: String,
    },
    BadConnectivity {
        kind: ElementKind,
        line: String,
    },
    BadPointTokenCount {
        line: String,
    },
    BadPoint {
        line: String,
    },
    /// The loading pass met more elements of a kind than the
    /// classification pass counted.
    CountMismatch {
        kind: ElementKind,
        line: String,
    },
    Host {
        op: HostOp,
        line: Option<String>,
        source: HostError,
    },
    /// The host asked to stop through its progress callbacks.
    Cancelled,
}

/// Writes `msg` or `msg: 'detail'`, the form diagnostics take on the host side.
fn with_detail(f: &mut fmt::Formatter<'_>, msg: impl fmt::Display, detail: &str) -> fmt::Result {
    if detail.is_empty() {
        write!(f, "{msg}")
    } else {
        write!(f, "{msg}: '{detail}'")
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Io(err) => write!(f, "io error: {err}"),
            ErrorKind::Open { path, .. } => with_detail(f, "Could not open file", path),
            ErrorKind::DuplicateKey { key, line } => {
                with_detail(f, format_args!("Duplicate {key} value"), line)
            }
            ErrorKind::InvalidValue { key, line } => {
                with_detail(f, format_args!("Invalid {key} value"), line)
            }
            ErrorKind::MissingKeys { missing } => {
                let missing = itertools::join(missing, ", ");
                with_detail(f, "Unexpected EOF while scanning header", &missing)
            }
            ErrorKind::UnexpectedEof { reading } => {
                write!(f, "Unexpected EOF while reading {reading}")
            }
            ErrorKind::BadElementType { reading, line } => {
                with_detail(f, format_args!("Could not read {} type", reading.record()), line)
            }
            ErrorKind::UnexpectedElementType { reading, line } => {
                with_detail(f, format_args!("Unexpected {} type", reading.record()), line)
            }
            ErrorKind::BadConnectivity { kind, line } => with_detail(
                f,
                format_args!("Invalid {} element connectivity", kind.short_name()),
                line,
            ),
            ErrorKind::BadPointTokenCount { line } => {
                with_detail(f, "Unexpected number of point tokens", line)
            }
            ErrorKind::BadPoint { line } => with_detail(f, "Could not read point", line),
            ErrorKind::CountMismatch { kind, line } => with_detail(
                f,
                format_args!("Element data changed while reading {kind} elements"),
                line,
            ),
            ErrorKind::Host { op, line, .. } => {
                with_detail(f, op, line.as_deref().unwrap_or_default())
            }
            ErrorKind::Cancelled => write!(f, "Import cancelled"),
        }
    }
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    lineno: usize,
}

impl Error {
    pub(crate) fn at(kind: ErrorKind, lineno: usize) -> Error {
        Error { kind, lineno }
    }

    pub(crate) fn cancelled() -> Error {
        Error::from(ErrorKind::Cancelled)
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Line of the input the error was found at, if it relates to one.
    pub fn lineno(&self) -> Option<usize> {
        if self.lineno == 0 {
            None
        } else {
            Some(self.lineno)
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.kind, ErrorKind::Cancelled)
    }

    /// The message sent to the host, without line information.
    pub fn diagnostic(&self) -> String {
        self.kind.to_string()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.lineno() {
            Some(lineno) => write!(f, "at line {}: {}", lineno, self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match &self.kind {
            ErrorKind::Io(err) | ErrorKind::Open { source: err, .. } => Some(err),
            ErrorKind::Host { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error { kind, lineno: 0 }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::from(ErrorKind::Io(err))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Maps the failure of a host call that is not tied to a line.
pub(crate) fn host_error(op: HostOp) -> impl FnOnce(HostError) -> Error {
    move |source| Error::from(ErrorKind::Host {
        op,
        line: None,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_format() {
        let err = Error::at(
            ErrorKind::DuplicateKey {
                key: Key::Ndime,
                line: String::from("NDIME= 3"),
            },
            7,
        );
        assert_eq!(err.diagnostic(), "Duplicate NDIME value: 'NDIME= 3'");
        assert_eq!(err.to_string(), "at line 7: Duplicate NDIME value: 'NDIME= 3'");

        let err = Error::from(ErrorKind::UnexpectedEof {
            reading: Reading::Counts(Dimension::Volume),
        });
        assert_eq!(err.lineno(), None);
        assert_eq!(err.to_string(), "Unexpected EOF while reading 3D counts");
    }

    #[test]
    fn test_record_names() {
        let line = String::from("7 0 1 2 0");
        let err = ErrorKind::UnexpectedElementType {
            reading: Reading::Counts(Dimension::Surface),
            line: line.clone(),
        };
        assert_eq!(err.to_string(), "Unexpected 2D count type: '7 0 1 2 0'");
        let err = ErrorKind::BadElementType {
            reading: Reading::Elements(Dimension::Volume),
            line,
        };
        assert_eq!(err.to_string(), "Could not read 3D element type: '7 0 1 2 0'");
    }

    #[test]
    fn test_host_without_line() {
        let err = ErrorKind::Host {
            op: HostOp::CreateRegion(Dimension::Volume),
            line: None,
            source: HostError::new("out of handles"),
        };
        assert_eq!(err.to_string(), "Could not create block entity");
    }
}

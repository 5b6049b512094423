//! The import pipeline: header scan, classification, then loading.

use crate::element::Dimension;
use crate::element::ElementCounts;
use crate::error::ErrorKind;
use crate::header::scan_header;
use crate::host::GridModel;
use crate::host::Host;
use crate::pass::count_elements;
use crate::pass::load_elements;
use crate::plugin::FormatInfo;
use crate::reader::LineReader;
use crate::vertex::read_vertices;
use crate::Error;
use crate::Result;
use std::fs;
use std::io;
use std::path::Path;

/// Number of major steps announced to the host: header scan,
/// classification, vertex loading and element loading.
const MAJOR_STEPS: u32 = 4;

/// What was imported.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Summary {
    pub dimension: Dimension,
    pub vertex_count: usize,
    pub counts: ElementCounts,
}

/// Reads one SU2 grid from a seekable stream into a [GridModel].
///
/// The stream is read from its current position. Import state lives for
/// the duration of [Importer::read] only, so the same importer can be
/// rewound and read again.
pub struct Importer<R> {
    reader: LineReader<R>,
    format: FormatInfo,
}

impl<R> Importer<R>
where
    R: io::BufRead + io::Seek,
{
    pub fn new(input: R, format: FormatInfo) -> io::Result<Self> {
        Ok(Self {
            reader: LineReader::new(input)?,
            format,
        })
    }

    pub fn format(&self) -> &FormatInfo {
        &self.format
    }

    /// Runs the whole pipeline, stopping at the first failure.
    ///
    /// The model is left as is on failure: whatever was created and set
    /// before the error stays there, and it is up to the caller to discard
    /// it.
    pub fn read<M, H>(&mut self, model: &mut M, host: &mut H) -> Result<Summary>
    where
        M: GridModel + ?Sized,
        H: Host + ?Sized,
    {
        let _span = tracing::info_span!("import", format = %self.format.name).entered();

        let result = if host.progress_init(MAJOR_STEPS) {
            self.run(model, host)
        } else {
            Err(Error::cancelled())
        };
        let ended = host.progress_end(result.is_ok());
        let summary = result?;
        if !ended {
            return Err(Error::cancelled());
        }

        tracing::info!(
            dimension = %summary.dimension,
            vertices = summary.vertex_count,
            elements = summary.counts.total(),
            "imported grid",
        );
        Ok(summary)
    }

    fn run<M, H>(&mut self, model: &mut M, host: &mut H) -> Result<Summary>
    where
        M: GridModel + ?Sized,
        H: Host + ?Sized,
    {
        let reader = &mut self.reader;

        let header = {
            let _span = tracing::info_span!("scan header").entered();
            scan_header(reader, host)?
        };

        let counts = {
            let _span = tracing::info_span!("count elements").entered();
            count_elements(reader, &header, host)?
        };

        let list = {
            let _span = tracing::info_span!("read vertices").entered();
            read_vertices(reader, &header, model, host)?
        };

        {
            let _span = tracing::info_span!("load elements").entered();
            load_elements(reader, &header, &counts, list, model, host)?;
        }

        Ok(Summary {
            dimension: header.dimension,
            vertex_count: header.vertex_count,
            counts,
        })
    }

    /// Like [Importer::read], but reports failures to the host and only
    /// tells whether the import succeeded.
    ///
    /// Cancellations are not reported: the host asked for them.
    pub fn import<M, H>(&mut self, model: &mut M, host: &mut H) -> bool
    where
        M: GridModel + ?Sized,
        H: Host + ?Sized,
    {
        match self.read(model, host) {
            Ok(_) => true,
            Err(err) => {
                report(&err, host);
                false
            }
        }
    }
}

fn report<H>(err: &Error, host: &mut H)
where
    H: Host + ?Sized,
{
    if err.is_cancelled() {
        return;
    }
    tracing::warn!(lineno = err.lineno(), "{err}");
    host.send_diagnostic(&err.diagnostic());
}

/// Imports the grid file at `path` into `model`.
///
/// Returns whether the import succeeded. Failures are reported to the host
/// through [Host::send_diagnostic].
pub fn import_file<M, H>(
    path: impl AsRef<Path>,
    model: &mut M,
    host: &mut H,
    format: &FormatInfo,
) -> bool
where
    M: GridModel + ?Sized,
    H: Host + ?Sized,
{
    let path = path.as_ref();
    if !format.matches_extension(path) {
        tracing::warn!(path = %path.display(), "unexpected extension for {} grid", format.name);
    }

    let file = match fs::File::open(path) {
        Ok(file) => file,
        Err(source) => {
            let path = path.display().to_string();
            report(&Error::from(ErrorKind::Open { path, source }), host);
            return false;
        }
    };

    let mut importer = match Importer::new(io::BufReader::new(file), format.clone()) {
        Ok(importer) => importer,
        Err(err) => {
            report(&Error::from(err), host);
            return false;
        }
    };
    importer.import(model, host)
}

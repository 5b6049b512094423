//! Line-oriented access to a seekable text stream.

use num_traits::Num;
use num_traits::Unsigned;
use std::io;
use std::io::SeekFrom;

/// Comment marker, only recognized as the first non-blank character.
const COMMENT: char = '%';

/// Position of a line in the stream: its byte offset, and the number of
/// lines before it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SectionStart {
    offset: u64,
    lineno: usize,
}

impl SectionStart {
    pub fn offset(self) -> u64 {
        self.offset
    }

    /// Line number of the line that comes before the section.
    pub fn lineno(self) -> usize {
        self.lineno
    }
}

/// Reads significant lines, that is non-blank lines that are not comments.
///
/// Line endings do not matter and bytes that are not valid UTF-8 are
/// replaced, so that junk in ignored lines never aborts an import.
pub struct LineReader<R> {
    inner: R,
    offset: u64,
    lineno: usize,
    buf: Vec<u8>,
    line: String,
}

impl<R> LineReader<R>
where
    R: io::BufRead + io::Seek,
{
    pub fn new(mut inner: R) -> io::Result<Self> {
        let offset = inner.stream_position()?;
        Ok(Self {
            inner,
            offset,
            lineno: 0,
            buf: Vec::new(),
            line: String::new(),
        })
    }

    /// Where the next line starts.
    pub fn position(&self) -> SectionStart {
        SectionStart {
            offset: self.offset,
            lineno: self.lineno,
        }
    }

    pub fn seek(&mut self, to: SectionStart) -> io::Result<()> {
        self.inner.seek(SeekFrom::Start(to.offset))?;
        self.offset = to.offset;
        self.lineno = to.lineno;
        self.line.clear();
        Ok(())
    }

    /// Moves to the next significant line, trimmed of surrounding
    /// whitespace. Returns `false` on end of stream.
    pub fn next_significant_line(&mut self) -> io::Result<bool> {
        loop {
            self.buf.clear();
            let n = self.inner.read_until(b'\n', &mut self.buf)?;
            if n == 0 {
                self.line.clear();
                return Ok(false);
            }
            self.offset += n as u64;
            self.lineno += 1;

            let line = String::from_utf8_lossy(&self.buf);
            let line = line.trim();
            if line.is_empty() || line.starts_with(COMMENT) {
                continue;
            }
            self.line.clear();
            self.line.push_str(line);
            return Ok(true);
        }
    }

    /// The last significant line read, empty after a seek or at end of stream.
    pub fn line(&self) -> &str {
        &self.line
    }

    /// Number of the last line read.
    pub fn lineno(&self) -> usize {
        self.lineno
    }
}

pub fn tokenize(line: &str) -> impl Iterator<Item = &str> {
    line.split_whitespace()
}

/// Splits `KEY = VALUE` on the first `=`. The key must not be empty.
pub fn split_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, value.trim()))
}

/// Parses a base-10 unsigned integer. An optional `+` sign is accepted.
pub fn parse_int<T>(token: &str) -> Option<T>
where
    T: Num + Unsigned,
{
    T::from_str_radix(token, 10).ok()
}

pub fn parse_float(token: &str) -> Option<f64> {
    token.parse().ok()
}

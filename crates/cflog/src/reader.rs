//! Scoped log-file reader: normalize the stream, decode the header,
//! hand out the record sequence.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines, Read, Seek};
use std::path::Path;

use tracing::debug;

use crate::error::LogReaderError;
use crate::header::Header;
use crate::model::LogEntry;
use crate::record::Entries;
use crate::source::{ObjectFetcher, SourceLocator};
use crate::stream::ByteStream;

/// One decode pass over one log file.
///
/// Opening a reader sniffs the compression envelope and decodes the
/// two-line header eagerly, so header errors terminate the scope before
/// any record is produced. The underlying handle is owned by the reader
/// (and by the [`Entries`] iterator built from it) and is released when
/// that owner is dropped, on every exit path.
///
/// The produced sequence is forward-only and not restartable; a reader
/// supports exactly one pass.
#[derive(Debug)]
pub struct LogReader<R: Read + Seek> {
    header: Header,
    lines: Lines<BufReader<ByteStream<R>>>,
}

impl LogReader<File> {
    /// Open a local log file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, LogReaderError> {
        debug!("Opening log file: {}", path.as_ref().display());
        Self::from_stream(File::open(path)?)
    }

    /// Resolve a source locator, staging remote objects through
    /// `fetcher`. The locator is validated before any retrieval happens.
    pub fn open_locator(
        source: &str,
        fetcher: &dyn ObjectFetcher,
    ) -> Result<Self, LogReaderError> {
        match SourceLocator::parse(source)? {
            SourceLocator::Local(path) => Self::open(path),
            SourceLocator::S3 { bucket, key } => {
                debug!("Staging remote log object: s3://{}/{}", bucket, key);
                Self::from_stream(fetcher.fetch(&bucket, &key)?)
            }
        }
    }
}

impl<R: Read + Seek> LogReader<R> {
    /// Build a reader over an already-open byte source (a staged file,
    /// an in-memory buffer). The source must be positioned at offset 0
    /// and seekable at least far enough to sniff and rewind.
    pub fn from_stream(source: R) -> Result<Self, LogReaderError> {
        let stream = ByteStream::new(source)?;
        if stream.is_compressed() {
            debug!("Detected gzip envelope");
        }

        let mut lines = BufReader::new(stream).lines();
        let version_line = match lines.next() {
            Some(line) => line?,
            None => return Err(LogReaderError::InvalidHeaderVersion(String::new())),
        };
        let fields_line = match lines.next() {
            Some(line) => line?,
            None => return Err(LogReaderError::InvalidHeaderFields(String::new())),
        };

        let header = Header::parse(&version_line, &fields_line)?;
        debug!("Decoded log header with {} fields", header.field_count());

        Ok(Self { header, lines })
    }

    /// The header governing this scope.
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Consume the reader and hand out the forward-only record sequence.
    pub fn entries(self) -> Entries<BufReader<ByteStream<R>>> {
        Entries::new(self.header, self.lines)
    }
}

impl<R: Read + Seek> IntoIterator for LogReader<R> {
    type Item = Result<LogEntry, LogReaderError>;
    type IntoIter = Entries<BufReader<ByteStream<R>>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries()
    }
}

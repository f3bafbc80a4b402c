//! Byte-stream normalization.
//!
//! Access logs arrive either as plain text or gzip-compressed with no
//! out-of-band signal. The normalizer sniffs the gzip magic once at
//! open time and hands back a uniform `Read` over the logical content.

use std::io::{Read, Seek, SeekFrom};

use flate2::read::GzDecoder;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// A byte source selected once at open time: the raw stream, or a
/// gzip-decoding wrapper over it.
#[derive(Debug)]
pub enum ByteStream<R: Read + Seek> {
    Plain(R),
    Gzip(GzDecoder<R>),
}

impl<R: Read + Seek> ByteStream<R> {
    /// Peek the first two bytes for the gzip magic, rewind to offset 0,
    /// and pick the variant. Streams shorter than two bytes pass through
    /// unchanged. Malformed gzip is not detected here; it surfaces as an
    /// I/O error once bytes are actually read.
    pub fn new(mut source: R) -> std::io::Result<Self> {
        let mut magic = [0u8; 2];
        let n = read_up_to(&mut source, &mut magic)?;
        source.seek(SeekFrom::Start(0))?;

        if n == magic.len() && magic == GZIP_MAGIC {
            Ok(ByteStream::Gzip(GzDecoder::new(source)))
        } else {
            Ok(ByteStream::Plain(source))
        }
    }

    pub fn is_compressed(&self) -> bool {
        matches!(self, ByteStream::Gzip(_))
    }
}

impl<R: Read + Seek> Read for ByteStream<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self {
            ByteStream::Plain(inner) => inner.read(buf),
            ByteStream::Gzip(inner) => inner.read(buf),
        }
    }
}

/// Fill `buf` as far as the stream allows, tolerating short reads.
fn read_up_to<R: Read>(source: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match source.read(&mut buf[filled..])? {
            0 => break,
            n => filled += n,
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::{Cursor, Write};

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_plain_stream_passes_through() {
        let mut stream = ByteStream::new(Cursor::new(b"hello world".to_vec())).unwrap();
        assert!(!stream.is_compressed());

        let mut out = Vec::new();
        stream.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"hello world");
    }

    #[test]
    fn test_gzip_stream_is_decompressed() {
        let mut stream = ByteStream::new(Cursor::new(gzip(b"hello world"))).unwrap();
        assert!(stream.is_compressed());

        let mut out = Vec::new();
        stream.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"hello world");
    }

    #[test]
    fn test_short_stream_passes_through() {
        let mut stream = ByteStream::new(Cursor::new(b"x".to_vec())).unwrap();
        assert!(!stream.is_compressed());

        let mut out = Vec::new();
        stream.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"x");
    }

    #[test]
    fn test_position_is_rewound_before_handoff() {
        // First two bytes must still be part of the decoded output.
        let mut stream = ByteStream::new(Cursor::new(b"#Version: 1.0".to_vec())).unwrap();
        let mut out = String::new();
        stream.read_to_string(&mut out).unwrap();
        assert!(out.starts_with("#Version"));
    }

    #[test]
    fn test_truncated_gzip_errors_on_read_not_open() {
        let mut payload = gzip(b"hello world");
        payload.truncate(6); // magic + partial header survives sniffing
        let mut stream = ByteStream::new(Cursor::new(payload)).unwrap();
        assert!(stream.is_compressed());

        let mut out = Vec::new();
        assert!(stream.read_to_end(&mut out).is_err());
    }
}

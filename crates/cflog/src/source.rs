//! Source locators and the retrieval-collaborator boundary.
//!
//! The decoder itself never talks to remote storage. Remote objects are
//! staged on the local filesystem by an [`ObjectFetcher`] implementation
//! supplied by the caller; credential and session configuration live
//! behind that trait, outside the decoder.

use std::fs::File;
use std::path::PathBuf;

use crate::error::LogReaderError;

/// Where a log file lives: on the local filesystem, or as an object in
/// remote storage that must be staged before decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocator {
    Local(PathBuf),
    S3 { bucket: String, key: String },
}

impl SourceLocator {
    /// Parse a source string.
    ///
    /// `s3://bucket/key` locators are validated up front: a recognized
    /// scheme, a non-empty bucket, and a non-empty object key, all
    /// checked before any retrieval is attempted. Strings without a
    /// scheme are taken as local paths.
    pub fn parse(source: &str) -> Result<Self, LogReaderError> {
        let reject = || LogReaderError::InvalidSourceLocator(source.to_string());

        if let Some(rest) = source.strip_prefix("s3://") {
            let (bucket, key) = rest.split_once('/').ok_or_else(reject)?;
            if bucket.is_empty() || key.is_empty() {
                return Err(reject());
            }
            return Ok(SourceLocator::S3 {
                bucket: bucket.to_string(),
                key: key.to_string(),
            });
        }

        // Any other scheme is unsupported rather than a relative path.
        if source.contains("://") || source.is_empty() {
            return Err(reject());
        }

        Ok(SourceLocator::Local(PathBuf::from(source)))
    }
}

/// The external retrieval collaborator.
///
/// Implementations download `bucket`/`key` to local storage, fully, and
/// hand back an open handle to the staged copy positioned at offset 0.
/// Transfer retries and timeouts belong here, not in the decoder; the
/// decoder assumes the returned handle is a static, already-complete
/// byte stream.
pub trait ObjectFetcher {
    fn fetch(&self, bucket: &str, key: &str) -> std::io::Result<File>;
}

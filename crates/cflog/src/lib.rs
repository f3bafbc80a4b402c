// Typed decoding of CDN access logs (W3C extended log format,
// CloudFront standard-log field set).

// Decoder core
pub mod error;
pub mod header;
pub mod model;
pub mod record;
pub mod stream;

// Open/close scope and the retrieval boundary
pub mod reader;
pub mod source;

// Re-export commonly used types
pub use error::LogReaderError;
pub use model::LogEntry;
pub use reader::LogReader;
pub use record::Entries;
pub use source::{ObjectFetcher, SourceLocator};

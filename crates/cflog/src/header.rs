//! The two-line log header: version declaration and field ordering.

use std::collections::HashMap;

use crate::error::LogReaderError;

/// The only log format version this decoder understands.
pub const SUPPORTED_VERSION: &str = "1.0";

/// Parsed header. The field-name ordering captured here is authoritative
/// for every data line in the stream; it is decoded once per scope and
/// owned by the record decoder for the lifetime of the iteration.
#[derive(Debug, Clone)]
pub struct Header {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl Header {
    /// Parse the two leading header lines.
    ///
    /// Line 1 must read `#Version: 1.0` and line 2 `#Fields: <names>`,
    /// tolerating extra whitespace around the tokens. The field list is
    /// split on runs of whitespace.
    pub fn parse(version_line: &str, fields_line: &str) -> Result<Self, LogReaderError> {
        let version = strip_directive(version_line, "Version:")
            .ok_or_else(|| LogReaderError::InvalidHeaderVersion(version_line.to_string()))?;
        if version != SUPPORTED_VERSION {
            return Err(LogReaderError::InvalidHeaderVersion(version_line.to_string()));
        }

        let fields = strip_directive(fields_line, "Fields:")
            .ok_or_else(|| LogReaderError::InvalidHeaderFields(fields_line.to_string()))?;
        let names: Vec<String> = fields.split_whitespace().map(str::to_string).collect();
        if names.is_empty() {
            return Err(LogReaderError::InvalidHeaderFields(fields_line.to_string()));
        }

        let index = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();

        Ok(Self { names, index })
    }

    /// Field names in declaration order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn field_count(&self) -> usize {
        self.names.len()
    }

    /// Column index for a named field, if the header declares it.
    pub(crate) fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }
}

/// Match `#` + optional spaces + `directive` and return the trimmed
/// remainder, or `None` if the line is not that directive.
fn strip_directive<'a>(line: &'a str, directive: &str) -> Option<&'a str> {
    let rest = line.trim().strip_prefix('#')?;
    let rest = rest.trim_start().strip_prefix(directive)?;
    Some(rest.trim())
}

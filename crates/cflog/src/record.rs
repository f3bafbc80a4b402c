//! Record decoding: positional zipping of tab-separated values against
//! the header ordering, sentinel collapsing, and per-field coercion into
//! [`LogEntry`].

use std::io::{BufRead, Lines};
use std::net::IpAddr;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use tracing::trace;

use crate::error::LogReaderError;
use crate::header::Header;
use crate::model::LogEntry;

/// Per-column marker for "value not present".
pub const SENTINEL: &str = "-";

/// One data line zipped against the header ordering.
///
/// Columns beyond the header's field count are ignored; columns missing
/// from the end of the line read as absent.
struct Row<'a> {
    header: &'a Header,
    values: Vec<&'a str>,
}

impl<'a> Row<'a> {
    fn new(header: &'a Header, line: &'a str) -> Self {
        let mut values: Vec<&str> = line.split('\t').collect();
        values.truncate(header.field_count());
        Self { header, values }
    }

    /// Raw token for a named column. Absent columns, empty tokens, and
    /// the `-` sentinel all collapse to `None`.
    fn get(&self, column: &str) -> Option<&'a str> {
        let idx = self.header.position(column)?;
        match self.values.get(idx).copied() {
            None | Some("") | Some(SENTINEL) => None,
            Some(value) => Some(value),
        }
    }

    /// Like [`Row::get`], but absence is a hard error naming the
    /// record field (not the source column).
    fn required(&self, column: &str, field: &'static str) -> Result<&'a str, LogReaderError> {
        self.get(column)
            .ok_or(LogReaderError::MissingRequiredField(field))
    }
}

fn invalid(field: &'static str, value: &str) -> LogReaderError {
    LogReaderError::InvalidFieldValue {
        field,
        value: value.to_string(),
    }
}

fn parse_int<T: FromStr>(field: &'static str, raw: &str) -> Result<T, LogReaderError> {
    raw.parse().map_err(|_| invalid(field, raw))
}

fn parse_decimal(field: &'static str, raw: &str) -> Result<Decimal, LogReaderError> {
    Decimal::from_str(raw).map_err(|_| invalid(field, raw))
}

fn parse_ip(field: &'static str, raw: &str) -> Result<IpAddr, LogReaderError> {
    raw.parse().map_err(|_| invalid(field, raw))
}

/// Status column policy: sentinel or missing column decodes to 0, as
/// does the literal `000` the edge writes when the client disconnected
/// before a response. Anything else must be three digits in 100..=599.
fn parse_status(raw: Option<&str>) -> Result<u16, LogReaderError> {
    let raw = match raw {
        None => return Ok(0),
        Some(v) => v,
    };
    if raw == "000" {
        return Ok(0);
    }
    let digits = raw.as_bytes();
    let shaped = digits.len() == 3
        && (b'1'..=b'5').contains(&digits[0])
        && digits[1].is_ascii_digit()
        && digits[2].is_ascii_digit();
    if !shaped {
        return Err(invalid("status_code", raw));
    }
    parse_int("status_code", raw)
}

/// Combine the `date` and `time` columns into a UTC timestamp.
fn parse_log_time(date_raw: &str, time_raw: &str) -> Result<DateTime<Utc>, LogReaderError> {
    let date = NaiveDate::parse_from_str(date_raw, "%Y-%m-%d")
        .map_err(|_| invalid("log_time", date_raw))?;
    let time = NaiveTime::parse_from_str(time_raw, "%H:%M:%S")
        .map_err(|_| invalid("log_time", time_raw))?;
    Ok(date.and_time(time).and_utc())
}

/// Coercion for best-effort columns: any parse failure degrades to
/// `None` instead of failing the record.
fn best_effort<T: FromStr>(column: &str, raw: Option<&str>) -> Option<T> {
    let raw = raw?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            trace!("Unparsable best-effort column {}: {:?}", column, raw);
            None
        }
    }
}

/// Decode one data line against the header ordering.
pub(crate) fn decode_line(header: &Header, line: &str) -> Result<LogEntry, LogReaderError> {
    let row = Row::new(header, line);

    let log_time = parse_log_time(
        row.required("date", "log_time")?,
        row.required("time", "log_time")?,
    )?;

    let request_protocol = row.required("cs-protocol", "request_protocol")?.to_string();
    let plain_http = request_protocol == "http";

    let edge_result_type = row
        .required("x-edge-result-type", "edge_result_type")?
        .to_string();
    // Column added in a later log format revision; older streams fall
    // back to the coarse result type.
    let edge_detailed_result_type = match row.get("x-edge-detailed-result-type") {
        Some(value) => value.to_string(),
        None => edge_result_type.clone(),
    };

    Ok(LogEntry {
        log_time,
        edge_location: row.required("x-edge-location", "edge_location")?.to_string(),
        sent_bytes: parse_int("sent_bytes", row.required("sc-bytes", "sent_bytes")?)?,
        client_ip_addr: parse_ip("client_ip_addr", row.required("c-ip", "client_ip_addr")?)?,
        request_method: row.required("cs-method", "request_method")?.to_string(),
        distribution_host: row.required("cs(Host)", "distribution_host")?.to_string(),
        request_uri_stem: row.required("cs-uri-stem", "request_uri_stem")?.to_string(),
        status_code: parse_status(row.get("sc-status"))?,
        referer: row.get("cs(Referer)").map(str::to_string),
        user_agent: row.get("cs(User-Agent)").map(str::to_string),
        query_string: row.get("cs-uri-query").map(str::to_string),
        cookie: row.get("cs(Cookie)").map(str::to_string),
        edge_result_type,
        request_id: row.required("x-edge-request-id", "request_id")?.to_string(),
        request_host: row.required("x-host-header", "request_host")?.to_string(),
        received_bytes: parse_int("received_bytes", row.required("cs-bytes", "received_bytes")?)?,
        time_taken: parse_decimal("time_taken", row.required("time-taken", "time_taken")?)?,
        forwarded_for: best_effort("x-forwarded-for", row.get("x-forwarded-for")),
        // TLS columns carry stale values on cleartext requests.
        tls_proto: (!plain_http)
            .then(|| row.get("ssl-protocol").map(str::to_string))
            .flatten(),
        tls_cipher: (!plain_http)
            .then(|| row.get("ssl-cipher").map(str::to_string))
            .flatten(),
        edge_response_result_type: row
            .required("x-edge-response-result-type", "edge_response_result_type")?
            .to_string(),
        http_proto: row.required("cs-protocol-version", "http_proto")?.to_string(),
        fle_status: row.get("fle-status").map(str::to_string),
        fle_encrypted_fields: best_effort("fle-encrypted-fields", row.get("fle-encrypted-fields")),
        client_port: parse_int("client_port", row.required("c-port", "client_port")?)?,
        time_to_first_bytes: parse_decimal(
            "time_to_first_bytes",
            row.required("time-to-first-byte", "time_to_first_bytes")?,
        )?,
        edge_detailed_result_type,
        content_type: row.get("sc-content-type").map(str::to_string),
        content_length: best_effort("sc-content-len", row.get("sc-content-len")),
        range_start: best_effort("sc-range-start", row.get("sc-range-start")),
        range_end: best_effort("sc-range-end", row.get("sc-range-end")),
        request_protocol,
    })
}

/// Forward-only record sequence over a decoded line source.
///
/// Each `next()` reads lines until a non-comment line is found, then
/// decodes it. End of stream ends the sequence normally. After an `Err`
/// item the iterator's position is unspecified; callers that do not
/// abandon the iterator at that point get undefined resumption behavior.
pub struct Entries<B: BufRead> {
    header: Header,
    lines: Lines<B>,
}

impl<B: BufRead> Entries<B> {
    pub(crate) fn new(header: Header, lines: Lines<B>) -> Self {
        Self { header, lines }
    }

    /// The header governing this sequence.
    pub fn header(&self) -> &Header {
        &self.header
    }
}

impl<B: BufRead> Iterator for Entries<B> {
    type Item = Result<LogEntry, LogReaderError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            let line = line.trim_end_matches('\r');
            if line.starts_with('#') {
                continue;
            }
            return Some(decode_line(&self.header, line));
        }
    }
}

//! The decoded log record.

use std::net::IpAddr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// One decoded access-log line. Immutable once produced; every entry is
/// owned by the caller and carries no reference back into the stream it
/// was read from.
///
/// Nullable fields hold `None` both when the source column was missing
/// from the line (or the header) and when it carried the `-` sentinel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    /// Date and time of the request, UTC.
    pub log_time: DateTime<Utc>,
    /// Edge location (POP) that served the request.
    pub edge_location: String,
    /// Bytes sent to the client, headers included.
    pub sent_bytes: u64,
    pub client_ip_addr: IpAddr,
    pub request_method: String,
    /// Distribution domain name (`cs(Host)`).
    pub distribution_host: String,
    pub request_uri_stem: String,
    /// HTTP status, or 0 when the server closed the connection before
    /// responding (logged as `000`).
    pub status_code: u16,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    pub query_string: Option<String>,
    pub cookie: Option<String>,
    pub edge_result_type: String,
    pub request_id: String,
    /// `Host` header sent by the client (`x-host-header`).
    pub request_host: String,
    /// `http` or `https`.
    pub request_protocol: String,
    pub received_bytes: u64,
    /// Seconds between request receipt and last byte out. Exact decimal,
    /// never binary floating point.
    pub time_taken: Decimal,
    pub forwarded_for: Option<IpAddr>,
    /// Always `None` when `request_protocol` is `http`.
    pub tls_proto: Option<String>,
    /// Always `None` when `request_protocol` is `http`.
    pub tls_cipher: Option<String>,
    pub edge_response_result_type: String,
    /// HTTP version on the client connection (`cs-protocol-version`).
    pub http_proto: String,
    pub fle_status: Option<String>,
    pub fle_encrypted_fields: Option<u32>,
    pub client_port: u16,
    pub time_to_first_bytes: Decimal,
    /// Falls back to `edge_result_type` when the source column is absent.
    pub edge_detailed_result_type: String,
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    pub range_start: Option<u64>,
    pub range_end: Option<u64>,
}

//! Span attribute names shared across Comanda crates.
//!
//! `tracing` macros need literal field names, so these constants are used
//! where attributes are recorded dynamically (`Span::record`) and as the
//! reference for the literal names in `info_span!` calls.

/// Session UUID (v7).
pub const SESSION_ID: &str = "session.id";

/// Session kind (`assistant` or `analytics`).
pub const SESSION_KIND: &str = "session.kind";

/// Per-session request sequence number.
pub const REQUEST_TICKET: &str = "request.ticket";

/// Name of the query backend (e.g., "http").
pub const QUERY_SERVICE: &str = "query.service";

/// Endpoint path the query was posted to (e.g., "/manager/ask").
pub const QUERY_ENDPOINT: &str = "query.endpoint";

/// HTTP status returned by the query backend.
pub const QUERY_STATUS: &str = "query.status";

/// OTel tracer name.
pub const TRACER_NAME: &str = "comanda";

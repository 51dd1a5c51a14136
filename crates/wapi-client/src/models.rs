//! WAPI request and response models

use crate::query::QueryParams;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Default number of records requested per page
pub const DEFAULT_PAGE_SIZE: i64 = 1000;

/// HTTP methods used by the WAPI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// Read
    Get,
    /// Create, batch request
    Post,
    /// Modify
    Put,
    /// Remove
    Delete,
}

impl HttpMethod {
    /// Upper-case method name
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single request handed to the transport
#[derive(Debug, Clone, PartialEq)]
pub struct WapiRequest {
    /// HTTP method
    pub method: HttpMethod,
    /// Full object URL
    pub url: String,
    /// Query parameters, sent only when non-empty
    pub query: QueryParams,
    /// JSON body, already filtered: never set for GET or empty payloads
    pub body: Option<Value>,
}

/// Raw response returned by the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WapiResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw response body
    pub body: String,
}

impl WapiResponse {
    /// Create a response from a status and body
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Paged response wrapper returned when `_return_as_object=1`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse {
    /// Records on this page
    pub result: Vec<Value>,
    /// Continuation token; absent on the last page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_id: Option<String>,
}

/// Options for [`WapiClient::read`](crate::WapiClient::read)
#[derive(Debug, Clone, PartialEq)]
pub struct ReadOptions {
    /// Fields to return; include `"default"` to add to the base fields
    pub return_fields: Vec<String>,
    /// Fetch all records in pages (default: true)
    pub paging: bool,
    /// Records per page, must be positive when paging (default: 1000)
    pub page_size: i64,
    /// Positive: truncate to this many records.
    /// Negative: fail with `LimitExceeded` if more than `|max_results|` exist.
    /// None: unbounded.
    pub max_results: Option<i64>,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            return_fields: Vec::new(),
            paging: true,
            page_size: DEFAULT_PAGE_SIZE,
            max_results: None,
        }
    }
}

impl ReadOptions {
    /// Paged read of up to 1000 records per page, unbounded, default fields
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the return fields
    #[must_use]
    pub fn return_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.return_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable paging
    #[must_use]
    pub fn paging(mut self, paging: bool) -> Self {
        self.paging = paging;
        self
    }

    /// Set the page size
    #[must_use]
    pub fn page_size(mut self, page_size: i64) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the result limit; negative values make overflow an error
    #[must_use]
    pub fn max_results(mut self, max_results: i64) -> Self {
        self.max_results = Some(max_results);
        self
    }
}

/// Outcome of a read.
///
/// The paged path yields the flattened records; the unpaged path yields the
/// decoded body exactly as the server sent it.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadResult {
    /// Records accumulated across pages
    Records(Vec<Value>),
    /// Decoded body of a single unpaged call
    Raw(Value),
}

impl ReadResult {
    /// Records from a paged read, or `None` for a raw body
    pub fn records(&self) -> Option<&[Value]> {
        match self {
            ReadResult::Records(records) => Some(records),
            ReadResult::Raw(_) => None,
        }
    }

    /// Convert into a single JSON value (records become an array)
    pub fn into_value(self) -> Value {
        match self {
            ReadResult::Records(records) => Value::Array(records),
            ReadResult::Raw(value) => value,
        }
    }
}

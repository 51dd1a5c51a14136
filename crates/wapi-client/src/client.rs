//! WAPI request dispatcher
//!
//! Turns read/create/update/delete/batch operations into HTTP calls against
//! the versioned base URL, follows `next_page_id` continuation tokens for
//! paged reads, and translates failed responses into [`WapiError`].

use crate::config::ClientConfig;
use crate::error::{ApiError, WapiError};
use crate::models::{HttpMethod, PageResponse, ReadOptions, ReadResult, WapiRequest};
use crate::query::{self, QueryParams};
use crate::session::Session;
use crate::transport::{HttpTransport, Transport};
use serde_json::Value;
use tracing::{debug, info};

/// WAPI client
pub struct WapiClient<T: Transport = HttpTransport> {
    session: Session,
    transport: T,
}

impl WapiClient<HttpTransport> {
    /// Create a new WAPI client backed by reqwest
    ///
    /// # Arguments
    /// * `config` - Host, credentials, version, TLS and logging settings
    pub fn new(config: &ClientConfig) -> Result<Self, WapiError> {
        let session = config.session();
        let transport = HttpTransport::new(
            session.credentials().clone(),
            session.tls_verify(),
            config.timeout,
        )?;
        Ok(Self { session, transport })
    }

    /// Create a client from `WAPI_*` environment variables
    pub fn from_env() -> Result<Self, WapiError> {
        Self::new(&ClientConfig::from_env()?)
    }
}

impl<T: Transport> WapiClient<T> {
    /// Create a client over an arbitrary transport
    pub fn with_transport(session: Session, mut transport: T) -> Result<Self, WapiError> {
        if transport.tls_verify() != session.tls_verify() {
            transport.set_tls_verify(session.tls_verify())?;
        }
        Ok(Self { session, transport })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        self.session.base_url()
    }

    /// Session settings (base URL, credentials, flags)
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Whether TLS certificates are verified
    pub fn tls_verify(&self) -> bool {
        self.session.tls_verify()
    }

    /// Turn TLS certificate verification on or off.
    ///
    /// Disabling verification suppresses insecure-connection warnings for the
    /// whole process (see [`Transport::set_tls_verify`]).
    pub fn set_tls_verify(&mut self, value: bool) -> Result<(), WapiError> {
        self.transport.set_tls_verify(value)?;
        self.session.set_tls_verify(value);
        Ok(())
    }

    /// Read objects by type or reference.
    ///
    /// With `options.paging` set this returns [`ReadResult::Records`], the
    /// records of every page in server order. Without paging it makes one
    /// call and returns [`ReadResult::Raw`], the decoded body untouched.
    ///
    /// # Arguments
    /// * `object` - Object type (e.g. "record:host") or reference
    /// * `filters` - Field filters, e.g. `[("name~", "^web")]`
    /// * `options` - Return fields, paging and result limits
    ///
    /// # Errors
    /// * `InvalidArgument` - `page_size <= 0` while paging, or `max_results == 0`
    /// * `LimitExceeded` - negative `max_results` and more records exist
    /// * `RemoteRequestFailed` - the WAPI returned a non-2xx status
    pub async fn read(
        &self,
        object: &str,
        filters: &[(&str, &str)],
        options: &ReadOptions,
    ) -> Result<ReadResult, WapiError> {
        if options.paging {
            self.read_paged(object, filters, options)
                .await
                .map(ReadResult::Records)
        } else {
            self.read_unpaged(object, filters, options)
                .await
                .map(ReadResult::Raw)
        }
    }

    /// Paged read returning the accumulated records.
    ///
    /// `options.paging` is ignored; this always pages.
    pub async fn read_paged(
        &self,
        object: &str,
        filters: &[(&str, &str)],
        options: &ReadOptions,
    ) -> Result<Vec<Value>, WapiError> {
        if options.page_size <= 0 {
            return Err(WapiError::InvalidArgument(
                "page_size must be a positive integer when paging is enabled".to_string(),
            ));
        }
        check_max_results(options.max_results)?;

        let url = self.session.object_url(object);
        let max_results = options.max_results;
        let limit = max_results.map(|m| usize::try_from(m.unsigned_abs()).unwrap_or(usize::MAX));
        let page_size = effective_page_size(options.page_size, max_results);

        let mut params = base_params(filters, &options.return_fields);
        params.insert(query::PAGING, 1);
        params.insert(query::RETURN_AS_OBJECT, 1);
        params.insert(query::MAX_RESULTS, page_size);

        let mut page = self.fetch_page(&url, params).await?;
        let mut results = page.result;
        let mut pages = 1usize;

        while let Some(token) = page.next_page_id.take() {
            if limit.is_some_and(|limit| results.len() >= limit) {
                break;
            }
            let mut params = QueryParams::new();
            params.insert(query::PAGE_ID, token);
            page = self.fetch_page(&url, params).await?;
            results.append(&mut page.result);
            pages += 1;
        }

        debug!(
            "Read {} {} record(s) in {} page(s)",
            results.len(),
            object,
            pages
        );

        match (max_results, limit) {
            (Some(max), Some(limit)) if max < 0 && results.len() > limit => {
                Err(WapiError::LimitExceeded {
                    limit: max.unsigned_abs(),
                    actual: results.len(),
                })
            }
            (Some(max), Some(limit)) if max > 0 && results.len() > limit => {
                results.truncate(limit);
                Ok(results)
            }
            _ => Ok(results),
        }
    }

    /// Single-call read returning the decoded body as-is.
    ///
    /// `max_results`, if set, is passed through to the server unchanged with
    /// no client-side enforcement.
    pub async fn read_unpaged(
        &self,
        object: &str,
        filters: &[(&str, &str)],
        options: &ReadOptions,
    ) -> Result<Value, WapiError> {
        check_max_results(options.max_results)?;

        let url = self.session.object_url(object);
        let mut params = base_params(filters, &options.return_fields);
        if let Some(max_results) = options.max_results {
            params.insert(query::MAX_RESULTS, max_results);
        }

        self.call_wapi(HttpMethod::Get, &url, params, None).await
    }

    /// Create a new object
    ///
    /// # Arguments
    /// * `object` - Object type to create (e.g. "record:host")
    /// * `fields` - Field values for the new object
    /// * `return_fields` - Fields to return; include "default" to add to the base fields
    ///
    /// # Returns
    /// * `Ok(Value)` - The decoded response (usually the new object's reference)
    /// * `Err(WapiError)` - If the request fails
    pub async fn create(
        &self,
        object: &str,
        fields: &Value,
        return_fields: &[&str],
    ) -> Result<Value, WapiError> {
        let url = self.session.object_url(object);
        let params = query::build_return_fields(return_fields);
        self.call_wapi(HttpMethod::Post, &url, params, Some(fields))
            .await
    }

    /// Update an existing object by reference
    ///
    /// # Arguments
    /// * `reference` - The object's `_ref`
    /// * `fields` - Field values to change
    /// * `return_fields` - Fields to return; include "default" to add to the base fields
    pub async fn modify(
        &self,
        reference: &str,
        fields: &Value,
        return_fields: &[&str],
    ) -> Result<Value, WapiError> {
        let url = self.session.object_url(reference);
        let params = query::build_return_fields(return_fields);
        self.call_wapi(HttpMethod::Put, &url, params, Some(fields))
            .await
    }

    /// Delete an object by reference
    ///
    /// # Arguments
    /// * `reference` - The object's `_ref`
    /// * `extra_args` - Additional delete arguments, sent as query parameters
    pub async fn remove(
        &self,
        reference: &str,
        extra_args: &[(&str, &str)],
    ) -> Result<Value, WapiError> {
        let url = self.session.object_url(reference);
        let params = QueryParams::from_filters(extra_args);
        self.call_wapi(HttpMethod::Delete, &url, params, None).await
    }

    /// Send a multi-operation payload to the generic `request` object.
    ///
    /// `payload` is a request object or a list of them; the response is
    /// returned without interpretation.
    pub async fn batch(&self, payload: &Value) -> Result<Value, WapiError> {
        let url = self.session.object_url("request");
        self.call_wapi(HttpMethod::Post, &url, QueryParams::new(), Some(payload))
            .await
    }

    async fn fetch_page(&self, url: &str, params: QueryParams) -> Result<PageResponse, WapiError> {
        let body = self.call_wapi(HttpMethod::Get, url, params, None).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// Perform one HTTP request and decode the JSON response
    async fn call_wapi(
        &self,
        method: HttpMethod,
        url: &str,
        params: QueryParams,
        body: Option<&Value>,
    ) -> Result<Value, WapiError> {
        let body = body.filter(|b| method != HttpMethod::Get && !is_empty_body(b));
        let body_text = body.map(Value::to_string).unwrap_or_default();

        if self.session.log_api_calls() {
            info!(%method, url, params = %params, body = %body_text, "WAPI call");
        } else {
            debug!(%method, url, params = %params, body = %body_text, "WAPI call");
        }

        let request = WapiRequest {
            method,
            url: url.to_string(),
            query: params,
            body: body.cloned(),
        };
        let response = self.transport.send(&request).await?;

        if !response.is_success() {
            let err = ApiError::from_response(response.status, &response.body);
            debug!("{} {} failed: {}", method, url, err);
            return Err(err.into());
        }

        Ok(serde_json::from_str(&response.body)?)
    }
}

impl<T: Transport + std::fmt::Debug> std::fmt::Debug for WapiClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WapiClient")
            .field("session", &self.session)
            .field("transport", &self.transport)
            .finish()
    }
}

fn check_max_results(max_results: Option<i64>) -> Result<(), WapiError> {
    if max_results == Some(0) {
        return Err(WapiError::InvalidArgument(
            "max_results cannot be zero".to_string(),
        ));
    }
    Ok(())
}

/// Shrink the page size so a bounded read does not over-fetch.
///
/// A negative limit asks for one extra record so an over-limit result set
/// shows up without a separate count query.
fn effective_page_size(page_size: i64, max_results: Option<i64>) -> i64 {
    match max_results {
        Some(max) if max > 0 && max < page_size => max,
        Some(max) if max < 0 && max.unsigned_abs() <= page_size.unsigned_abs() => {
            max.saturating_abs().saturating_add(1)
        }
        _ => page_size,
    }
}

fn base_params(filters: &[(&str, &str)], return_fields: &[String]) -> QueryParams {
    let mut params = QueryParams::from_filters(filters);
    let fields: Vec<&str> = return_fields.iter().map(String::as_str).collect();
    params.extend(query::build_return_fields(&fields));
    params
}

fn is_empty_body(body: &Value) -> bool {
    match body {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

//! Mock transport for unit testing
//!
//! [`MockTransport`] replays queued responses in order and records every
//! request it receives, so tests can drive the dispatcher without a running
//! grid master.

use crate::error::WapiError;
use crate::models::{WapiRequest, WapiResponse};
use crate::transport::Transport;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Scripted transport
///
/// Clones share the same queue and request log, so a test can keep a handle
/// after moving the transport into a client.
#[derive(Debug, Clone)]
pub struct MockTransport {
    pub(crate) responses: Arc<Mutex<VecDeque<WapiResponse>>>,
    pub(crate) requests: Arc<Mutex<Vec<WapiRequest>>>,
    pub(crate) tls_verify: Arc<Mutex<bool>>,
}

impl MockTransport {
    /// Create a mock with an empty response queue
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            tls_verify: Arc::new(Mutex::new(true)),
        }
    }

    /// Queue a raw response
    pub fn push_response(&self, response: WapiResponse) -> &Self {
        self.responses
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push_back(response);
        self
    }

    /// Queue a 200 response with a JSON body
    pub fn push_json(&self, body: Value) -> &Self {
        self.push_response(WapiResponse::new(200, body.to_string()))
    }

    /// Queue one page of a paged read
    pub fn push_page(&self, records: Vec<Value>, next_page_id: Option<&str>) -> &Self {
        let mut page = serde_json::json!({ "result": records });
        if let Some(token) = next_page_id {
            page["next_page_id"] = Value::String(token.to_string());
        }
        self.push_json(page)
    }

    /// Queue an error response
    pub fn push_error(&self, status: u16, body: impl Into<String>) -> &Self {
        self.push_response(WapiResponse::new(status, body))
    }

    /// Requests received so far, in order
    pub fn requests(&self) -> Vec<WapiRequest> {
        self.requests
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: &WapiRequest) -> Result<WapiResponse, WapiError> {
        self.requests
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(request.clone());

        self.responses
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .pop_front()
            .ok_or_else(|| {
                WapiError::InvalidConfig(format!(
                    "MockTransport has no response queued for {} {}",
                    request.method, request.url
                ))
            })
    }

    fn tls_verify(&self) -> bool {
        *self
            .tls_verify
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn set_tls_verify(&mut self, value: bool) -> Result<(), WapiError> {
        *self
            .tls_verify
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = value;
        Ok(())
    }
}

//! Mock transport for unit testing.
//!
//! This module provides a transport that serves scripted responses without
//! making real network requests.

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tokio::sync::Notify;

use super::request::ApiRequest;
use super::transport::Transport;
use crate::error::ApiError;

/// Holds a request in flight until the test releases it.
#[derive(Debug, Default)]
pub struct MockGate {
    arrived: Notify,
    released: Notify,
}

impl MockGate {
    /// Wait until a request reaches the transport.
    pub async fn wait_for_request(&self) {
        self.arrived.notified().await;
    }

    /// Let one held request complete.
    pub fn release(&self) {
        self.released.notify_one();
    }
}

/// Transport returning scripted responses, keyed by request path.
///
/// Responses for the same path are served in the order they were scripted.
/// Unscripted paths fail with a transport error.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    responses: Arc<Mutex<HashMap<String, VecDeque<Result<Value, ApiError>>>>>,
    requests: Arc<Mutex<Vec<ApiRequest>>>,
    gate: Arc<Mutex<Option<Arc<MockGate>>>>,
}

impl MockTransport {
    /// Create a mock with nothing scripted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for a path (leading `/` is ignored).
    pub fn respond(&self, path: &str, response: Result<Value, ApiError>) {
        self.responses
            .lock()
            .unwrap()
            .entry(path.trim_start_matches('/').to_string())
            .or_default()
            .push_back(response);
    }

    /// Hold every subsequent request until the returned gate releases it.
    pub fn gate(&self) -> Arc<MockGate> {
        let gate = Arc::new(MockGate::default());
        *self.gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests received so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    async fn handle(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let path = request.relative_path().to_string();
        let method = request.method;
        self.requests.lock().unwrap().push(request);

        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.arrived.notify_one();
            gate.released.notified().await;
        }

        self.responses
            .lock()
            .unwrap()
            .get_mut(&path)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| {
                Err(ApiError::Transport(format!(
                    "no mock response for {method} {path}"
                )))
            })
    }
}

impl Transport for MockTransport {
    fn execute(
        &self,
        request: &ApiRequest,
    ) -> impl Future<Output = Result<Value, ApiError>> + Send {
        self.handle(request.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn scripted_responses_are_served_in_order() {
        let mock = MockTransport::new();
        mock.respond("/getAll", Ok(json!([])));
        mock.respond("getAll", Ok(json!([{"id": 1}])));

        assert_eq!(mock.execute(&ApiRequest::get("getAll")).await, Ok(json!([])));
        assert_eq!(
            mock.execute(&ApiRequest::get("/getAll")).await,
            Ok(json!([{"id": 1}]))
        );
        assert_eq!(mock.request_count(), 2);
    }

    #[tokio::test]
    async fn unscripted_path_is_a_transport_error() {
        let mock = MockTransport::new();
        let result = mock.execute(&ApiRequest::delete("delete/9")).await;
        assert!(matches!(result, Err(ApiError::Transport(_))));
    }
}

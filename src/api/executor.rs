//! Request executor: one request at a time, with loading and error tracking.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use super::request::ApiRequest;
use super::transport::Transport;
use crate::error::ApiError;
use crate::metrics;

/// Status of the most recent request issued through an executor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestState {
    /// Last successful payload, any shape.
    pub data: Option<Value>,
    /// True only while a request is in flight.
    pub loading: bool,
    /// Message from the last failure, cleared when a new request starts.
    pub error: Option<String>,
}

/// Issues requests through a [`Transport`] and records their outcome.
///
/// Failures never escape: they are turned into a stored message and the call
/// returns `None`. Clones share state.
#[derive(Debug)]
pub struct RequestExecutor<T> {
    transport: Arc<T>,
    state: Arc<Mutex<RequestState>>,
    cancel: CancellationToken,
}

impl<T> Clone for RequestExecutor<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            state: Arc::clone(&self.state),
            cancel: self.cancel.clone(),
        }
    }
}

/// Clears the loading flag on every exit path, including cancellation and
/// the future being dropped mid-flight.
struct LoadingGuard<'a> {
    state: &'a Mutex<RequestState>,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        lock(self.state).loading = false;
    }
}

fn lock(state: &Mutex<RequestState>) -> MutexGuard<'_, RequestState> {
    // State stays consistent field-by-field, so a poisoned lock is still usable.
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl<T: Transport> RequestExecutor<T> {
    /// Create an executor whose requests are dropped when `cancel` fires.
    pub fn new(transport: Arc<T>, cancel: CancellationToken) -> Self {
        Self {
            transport,
            state: Arc::new(Mutex::new(RequestState::default())),
            cancel,
        }
    }

    /// Snapshot of the current request state.
    pub fn state(&self) -> RequestState {
        lock(&self.state).clone()
    }

    /// True while a request is in flight.
    pub fn loading(&self) -> bool {
        lock(&self.state).loading
    }

    /// Message from the last failure.
    pub fn error(&self) -> Option<String> {
        lock(&self.state).error.clone()
    }

    /// Last successful payload.
    pub fn data(&self) -> Option<Value> {
        lock(&self.state).data.clone()
    }

    /// Token that cancels this executor's requests.
    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Issue a request and return its payload, or `None` on failure or
    /// cancellation.
    pub async fn send(&self, request: ApiRequest) -> Option<Value> {
        self.run(request, |value| Ok(value.clone())).await
    }

    /// Issue a request and decode the payload into `R`.
    ///
    /// A payload that does not decode counts as a failure and is not stored.
    pub async fn send_as<R: DeserializeOwned>(&self, request: ApiRequest) -> Option<R> {
        self.run(request, |value| {
            serde_json::from_value::<R>(value.clone()).map_err(ApiError::from)
        })
        .await
    }

    #[instrument(skip(self, request, decode), fields(method = %request.method, path = %request.path))]
    async fn run<R>(
        &self,
        request: ApiRequest,
        decode: impl FnOnce(&Value) -> Result<R, ApiError>,
    ) -> Option<R> {
        {
            let mut state = lock(&self.state);
            state.loading = true;
            state.error = None;
        }
        let _guard = LoadingGuard { state: &self.state };

        metrics::record_request(request.method);
        let started = Instant::now();

        let outcome = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(ApiError::Cancelled),
            result = self.transport.execute(&request) => result,
        };
        let outcome = outcome.and_then(|value| decode(&value).map(|decoded| (value, decoded)));

        metrics::record_latency(request.method, started.elapsed());

        match outcome {
            Ok((value, decoded)) => {
                debug!("Request succeeded");
                let mut state = lock(&self.state);
                state.error = None;
                state.data = Some(value);
                Some(decoded)
            }
            Err(ApiError::Cancelled) => {
                debug!("Request cancelled");
                None
            }
            Err(err) => {
                let message = err.user_message();
                warn!(error = %message, "Request failed");
                metrics::record_failure(request.method);
                lock(&self.state).error = Some(message);
                None
            }
        }
    }
}

//! Views: async controllers that render store state, hold draft input and
//! issue requests through their own executor.
//!
//! Every view owns a cancellation token. Cancelling it (directly, or through
//! the parent [`App`](crate::router::App)) drops in-flight requests before
//! they can write to the store.

pub mod edit;
pub mod health;
pub mod list;
pub mod render;

pub use edit::EditView;
pub use health::{Badge, HealthState, HealthView, ServiceCheck, ServiceStatus};
pub use list::ListView;

use crate::api::{RequestExecutor, Transport};
use crate::error::{ViewError, FALLBACK_ERROR_MESSAGE};

/// Turn a `None` from the executor into the matching view error.
pub(crate) fn request_failure<T: Transport>(exec: &RequestExecutor<T>) -> ViewError {
    if exec.cancel_token().is_cancelled() {
        ViewError::Cancelled
    } else {
        ViewError::Request(
            exec.error()
                .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string()),
        )
    }
}

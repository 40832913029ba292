//! Task-local trace id for the request being served.
//!
//! `ResponseError::error_response` gets no request, so Problem Details bodies
//! read the id set by `RequestTrace` from here.

use std::future::Future;

use tokio::task_local;

const NO_TRACE: &str = "unknown";

task_local! {
    static TRACE_ID: String;
}

/// Trace id of the current task, or `"unknown"` outside a request.
pub fn trace_id() -> String {
    TRACE_ID
        .try_with(Clone::clone)
        .unwrap_or_else(|_| NO_TRACE.to_string())
}

pub async fn with_trace_id<F: Future>(trace_id: String, future: F) -> F::Output {
    TRACE_ID.scope(trace_id, future).await
}

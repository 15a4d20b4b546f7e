use std::future::Future;

use axum::extract::State;
use axum::http::StatusCode;

/// Handler for `GET /healthz`. The process is up.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// State that can tell whether its backing services are reachable.
pub trait ReadinessCheck {
    fn ready(&self) -> impl Future<Output = bool> + Send;
}

/// Handler for `GET /readyz`. 200 when the check succeeds, 503 otherwise.
pub async fn readyz<S>(State(state): State<S>) -> StatusCode
where
    S: ReadinessCheck + Clone + Send + Sync + 'static,
{
    if state.ready().await {
        StatusCode::OK
    } else {
        tracing::warn!("readiness check failed");
        StatusCode::SERVICE_UNAVAILABLE
    }
}

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{error, info};
use uuid::Uuid;

/// Logs one line per request: method, path, status and latency, tagged with
/// a request id. Error statuses log at error level.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = Uuid::new_v4();
    let start = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let elapsed_ms = start.elapsed().as_millis();
    if status.is_client_error() || status.is_server_error() {
        error!(
            "{} {} {} - {}ms [{}]",
            method,
            path,
            status.as_u16(),
            elapsed_ms,
            request_id
        );
    } else {
        info!(
            "{} {} {} - {}ms [{}]",
            method,
            path,
            status.as_u16(),
            elapsed_ms,
            request_id
        );
    }
    response
}

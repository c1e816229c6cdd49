use crate::services::metrics::{HTTP_REQUESTS_TOTAL, HTTP_REQUEST_DURATION};
use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};

/// Count and time requests. The path label is the matched route template.
pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    let method = req.method().to_string();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let timer = HTTP_REQUEST_DURATION
        .with_label_values(&[method.as_str(), path.as_str()])
        .start_timer();
    let response = next.run(req).await;
    timer.observe_duration();

    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method.as_str(), path.as_str(), response.status().as_str()])
        .inc();

    response
}

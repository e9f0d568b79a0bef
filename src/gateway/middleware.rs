//! Gateway 中间件

use std::sync::atomic::{AtomicU64, Ordering};

use axum::{
    extract::Request,
    http::{header, HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::Instrument;

use crate::gateway::handlers::ErrorResponse;

/// 全局请求计数器，用于生成 request_id
static REQUEST_COUNTER: AtomicU64 = AtomicU64::new(1);

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// 请求日志中间件
///
/// 为每个请求创建 span，结束时记录状态码和耗时，并回写 `x-request-id`
pub async fn request_logger(request: Request, next: Next) -> Response {
    let request_id = REQUEST_COUNTER.fetch_add(1, Ordering::Relaxed);
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let span = tracing::info_span!("req", id = request_id, %method, %path);

    async move {
        let start = std::time::Instant::now();
        let mut response = next.run(request).await;
        let latency_ms = start.elapsed().as_millis() as u64;
        let status = response.status().as_u16();

        if status >= 500 {
            tracing::warn!(status, latency_ms, "done");
        } else {
            tracing::info!(status, latency_ms, "done");
        }

        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), HeaderValue::from(request_id));
        response
    }
    .instrument(span)
    .await
}

/// 超时层只返回空的 408，这里补上 `{error, details}` 响应体
pub async fn timeout_envelope(request: Request, next: Next) -> Response {
    let response = next.run(request).await;

    let bare_timeout = response.status() == StatusCode::REQUEST_TIMEOUT
        && !response.headers().contains_key(header::CONTENT_TYPE);
    if !bare_timeout {
        return response;
    }

    tracing::warn!("request timed out");
    let body = ErrorResponse {
        error: "Request timed out".to_string(),
        details: "the request did not complete within the server time limit".to_string(),
    };
    (StatusCode::REQUEST_TIMEOUT, Json(body)).into_response()
}

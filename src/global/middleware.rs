//! 요청 추적 미들웨어
//!
//! 요청마다 request id를 붙이고, 처리 시간을 span 안에서 기록합니다.

use std::time::Instant;

use axum::{
    body::Body,
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

/// 분산 추적용 request id 헤더
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// 들어온 `x-request-id`가 있으면 그대로 쓰고, 없으면 UUID를 새로 발급합니다.
/// 응답에도 같은 헤더를 실어 보냅니다.
pub async fn request_tracing(request: Request<Body>, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(String::from)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let span = tracing::info_span!(
        "http_request",
        request_id = %request_id,
        method = %method,
        route = %normalize_path(&path),
    );

    async move {
        tracing::debug!(path = %path, "Request started");
        let start = Instant::now();

        let mut response = next.run(request).await;

        tracing::info!(
            status = response.status().as_u16(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Request completed"
        );

        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        response
    }
    .instrument(span)
    .await
}

/// 경로 파라미터(감정 이름 등)가 로그 필드에 그대로 퍼지지 않도록 앞 두 구간만 남깁니다.
fn normalize_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.len() <= 2 {
        path.to_string()
    } else {
        format!("/{}/{}", segments[0], segments[1])
    }
}

//! 情感分析处理器

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    Json,
};

use crate::gateway::{handlers::ApiError, state::AppState};
use crate::sentiment::{AnalysisRequest, AnalysisResult};

/// POST /api/v1/analyze 和 POST /api/v1/model（旧别名）共用的处理器
///
/// 请求体直接按 JSON 解析，不检查 Content-Type
pub async fn handle_analyze(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let body = body.map_err(|e| ApiError::Validation(e.body_text()))?;
    let request = parse_request(&body)?;

    tracing::debug!(chars = request.text.chars().count(), "analyze");

    let result = state
        .service()
        .analyze_sentiment(&request.text)
        .await
        .inspect_err(|e| tracing::warn!(kind = e.kind(), "analysis failed: {e}"))?;

    tracing::info!(sentiment = %result.sentiment, score = result.score, "analyzed");
    Ok(Json(result))
}

fn parse_request(body: &[u8]) -> Result<AnalysisRequest, ApiError> {
    let request: AnalysisRequest =
        serde_json::from_slice(body).map_err(|e| ApiError::Validation(e.to_string()))?;

    if request.text.is_empty() {
        return Err(ApiError::Validation("text must not be empty".to_string()));
    }
    Ok(request)
}

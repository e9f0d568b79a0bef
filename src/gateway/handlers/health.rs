//! 健康检查处理器

use axum::Json;
use serde::Serialize;

/// 健康检查响应
#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// GET /api/v1/health
///
/// 不依赖配置和模型端点状态，始终返回 200
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        version: "1.0",
    })
}

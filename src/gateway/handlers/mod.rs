//! HTTP 请求处理器

pub mod analyze;
pub mod health;

pub use analyze::handle_analyze;
pub use health::handle_health;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::sentiment::ServiceError;

/// 处理器错误，统一转换为 `{error, details}` 响应
#[derive(Debug, Error)]
pub enum ApiError {
    /// 入站请求体无法解析或未通过校验
    #[error("Invalid request body")]
    Validation(String),

    /// 转发失败；所有子类都映射为 500
    #[error("Failed to analyze sentiment")]
    Analysis(#[from] ServiceError),
}

#[derive(Serialize)]
pub(crate) struct ErrorResponse {
    pub error: String,
    pub details: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Analysis(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn details(&self) -> String {
        match self {
            ApiError::Validation(details) => details.clone(),
            ApiError::Analysis(err) => err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
            details: self.details(),
        };
        (self.status(), Json(body)).into_response()
    }
}

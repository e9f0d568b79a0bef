use reqwest::StatusCode;
use thiserror::Error;

/// 转发调用失败的原因
#[derive(Debug, Error)]
pub enum ServiceError {
    /// 出站请求体无法序列化
    #[error("failed to marshal request body: {0}")]
    Serialization(#[source] serde_json::Error),

    /// 连接失败、超时、DNS 解析失败等
    #[error("failed to call external service: {0}")]
    Transport(#[source] reqwest::Error),

    /// 模型端点返回了非 200 状态码
    #[error("external service returned error: {body}, status code: {}", .status.as_u16())]
    Upstream { status: StatusCode, body: String },

    /// 响应体不是合法的 `AnalysisResult` JSON
    #[error("failed to parse response: {source}, body: {body}")]
    Deserialization {
        #[source]
        source: serde_json::Error,
        body: String,
    },
}

impl ServiceError {
    /// 简短的错误类别名，用于日志
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::Serialization(_) => "serialization",
            ServiceError::Transport(_) => "transport",
            ServiceError::Upstream { .. } => "upstream",
            ServiceError::Deserialization { .. } => "deserialization",
        }
    }
}

//! 情感分析抽象层
//!
//! 定义请求/结果类型和统一的 `SentimentService` 接口。
//! 实际推理由外部模型端点完成，本模块只负责转发。

mod error;
pub mod forwarding;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use error::ServiceError;
pub use forwarding::ForwardingService;

/// 情感分析请求，入站和出站使用同一结构
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub text: String,
}

/// 情感分析结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// 约定为 positive / negative / neutral，不做校验
    pub sentiment: String,
    /// 约定在 0.0 - 1.0 之间，不做校验
    pub score: f64,
}

/// SentimentService Trait - 情感分析服务的统一接口
#[async_trait]
pub trait SentimentService: Send + Sync {
    /// 分析文本情感，每次调用只尝试一次
    async fn analyze_sentiment(&self, text: &str) -> Result<AnalysisResult, ServiceError>;

    /// 模型端点 URL（用于诊断）
    fn model_endpoint(&self) -> &str;
}

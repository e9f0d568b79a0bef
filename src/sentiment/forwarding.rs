//! 转发服务
//!
//! 把文本以 JSON 形式 POST 到配置的模型端点，并解析返回结果。
//! 不做重试和退避：每次调用只发一次请求。

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};

use crate::config::Config;
use crate::sentiment::{AnalysisRequest, AnalysisResult, SentimentService, ServiceError};

/// 出站请求总超时（秒）
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub struct ForwardingService {
    model_endpoint: String,
    client: Client,
    timeout: Duration,
}

impl ForwardingService {
    /// 使用默认的 10 秒超时创建服务
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        Self::with_timeout(config, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(config: &Config, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("mood-gateway/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            model_endpoint: config.model_endpoint.clone(),
            client,
            timeout,
        })
    }

    /// 出站请求总超时
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl SentimentService for ForwardingService {
    async fn analyze_sentiment(&self, text: &str) -> Result<AnalysisResult, ServiceError> {
        let request = AnalysisRequest {
            text: text.to_string(),
        };
        let body = serde_json::to_vec(&request).map_err(ServiceError::Serialization)?;

        tracing::debug!(endpoint = %self.model_endpoint, bytes = body.len(), "forwarding");

        let response = self
            .client
            .post(&self.model_endpoint)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(ServiceError::Transport)?;

        let status = response.status();
        let body = response.text().await.map_err(ServiceError::Transport)?;

        if status != StatusCode::OK {
            return Err(ServiceError::Upstream { status, body });
        }

        serde_json::from_str(&body).map_err(|source| ServiceError::Deserialization { source, body })
    }

    fn model_endpoint(&self) -> &str {
        &self.model_endpoint
    }
}

//! Serve 命令 - 启动网关服务器

use std::path::Path;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::gateway;

/// 解析配置并启动服务器
///
/// 配置解析失败时直接返回错误，不会绑定任何端口
pub async fn serve_command(config_dir: &Path) -> Result<()> {
    let config = Config::resolve(config_dir).context("Configuration error")?;
    tracing::info!(
        "Configuration loaded successfully. Using port: {}",
        config.port
    );

    gateway::serve(config).await
}

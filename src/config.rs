//! 应用配置模块
//!
//! 负责解析网关运行所需的配置，来源优先级从高到低：
//! - 进程环境变量
//! - 配置目录下的 `app.env` 文件（`KEY=VALUE` 格式）
//! - 默认值

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// 配置文件名（位于配置目录下）
pub const CONFIG_FILE_NAME: &str = "app.env";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: &str = "8080";

/// 配置解析错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("MODEL_ENDPOINT is required")]
    MissingModelEndpoint,

    #[error("PORT must be a valid port number, got {0:?}")]
    InvalidPort(String),

    #[error("error reading config file {}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },
}

/// 应用配置
///
/// 启动时解析一次，之后只读，显式传入各组件的构造函数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// 服务器监听地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
    /// 情感分析模型的 HTTP 端点（**必需**）
    pub model_endpoint: String,
}

impl Config {
    /// 从进程环境变量和 `config_dir/app.env` 解析配置
    ///
    /// # 环境变量
    ///
    /// - `HOST`: 服务器监听地址（默认: "0.0.0.0"）
    /// - `PORT`: 服务器监听端口（默认: 8080）
    /// - `MODEL_ENDPOINT`: 模型端点 URL（**必需**）
    pub fn resolve(config_dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::resolve_with(config_dir, |key| std::env::var(key).ok())
    }

    /// 与 [`Config::resolve`] 相同，但环境变量通过 `env` 查询
    pub fn resolve_with<F>(config_dir: impl AsRef<Path>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let sources = Sources::load(config_dir.as_ref(), env)?;
        let (host, port) = sources.listen_addr()?;

        let model_endpoint = sources
            .get("MODEL_ENDPOINT")
            .map(|v| v.trim().to_string())
            .ok_or(ConfigError::MissingModelEndpoint)?;

        Ok(Self {
            host,
            port,
            model_endpoint,
        })
    }

    /// 监听地址，形如 `0.0.0.0:8080`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 只解析监听地址，不要求 `MODEL_ENDPOINT`
///
/// 供只需连接本地网关的命令使用
pub fn resolve_listen_addr(config_dir: impl AsRef<Path>) -> Result<(String, u16), ConfigError> {
    resolve_listen_addr_with(config_dir, |key| std::env::var(key).ok())
}

pub fn resolve_listen_addr_with<F>(
    config_dir: impl AsRef<Path>,
    env: F,
) -> Result<(String, u16), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    Sources::load(config_dir.as_ref(), env)?.listen_addr()
}

/// 环境变量加配置文件的合并视图
struct Sources<F> {
    env: F,
    file: HashMap<String, String>,
}

impl<F> Sources<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn load(config_dir: &Path, env: F) -> Result<Self, ConfigError> {
        let file = read_config_file(&config_dir.join(CONFIG_FILE_NAME))?;
        Ok(Self { env, file })
    }

    /// 空值视为未设置，继续向下一个来源查找
    fn get(&self, key: &str) -> Option<String> {
        (self.env)(key)
            .filter(|v| !v.trim().is_empty())
            .or_else(|| {
                self.file
                    .get(key)
                    .filter(|v| !v.trim().is_empty())
                    .cloned()
            })
    }

    fn listen_addr(&self) -> Result<(String, u16), ConfigError> {
        let host = self.get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port_raw = self.get("PORT").unwrap_or_else(|| DEFAULT_PORT.to_string());
        let port = port_raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidPort(port_raw.clone()))?;

        Ok((host, port))
    }
}

/// 读取配置文件；文件不存在时返回空表
fn read_config_file(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let file_error = |source| ConfigError::File {
        path: path.to_path_buf(),
        source,
    };

    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(e) if e.not_found() => return Ok(HashMap::new()),
        Err(e) => return Err(file_error(e)),
    };

    let vars = iter.collect::<Result<HashMap<_, _>, _>>().map_err(file_error)?;
    tracing::debug!("Loaded {} value(s) from {}", vars.len(), path.display());
    Ok(vars)
}

/// 日志模式，只影响默认日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    Debug,
    Release,
}

impl LogMode {
    /// 读取 `GATEWAY_MODE`，`release` 以外的值都视为 debug
    pub fn from_env() -> Self {
        Self::parse(std::env::var("GATEWAY_MODE").ok().as_deref())
    }

    fn parse(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("release") => LogMode::Release,
            _ => LogMode::Debug,
        }
    }

    /// 未设置 `RUST_LOG` 时使用的过滤规则
    pub fn default_filter(self) -> &'static str {
        match self {
            LogMode::Debug => "mood_gateway=debug,tower_http=debug",
            LogMode::Release => "mood_gateway=info",
        }
    }
}

//! Mood Gateway - 情感分析转发服务
//!
//! 一个轻量级的 HTTP 网关：接收包含文本的 JSON 请求，转发到配置的
//! 情感分析模型端点，并把解析后的结果返回给调用方。
//!
//! # 命令行接口
//!
//! - `serve`: 启动网关服务器（默认命令）
//! - `test`: 向本地服务器发送测试请求

mod commands;
mod config;
mod gateway;
mod sentiment;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use config::LogMode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Mood Gateway CLI
#[derive(Parser)]
#[command(name = "mood-gateway")]
#[command(about = "Sentiment analysis HTTP gateway", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// 可用的命令
#[derive(Subcommand)]
enum Commands {
    /// 启动网关服务器
    Serve {
        /// `app.env` 所在目录
        #[arg(long, default_value = ".")]
        config_dir: PathBuf,
    },
    /// 向本地服务器发送测试请求
    Test {
        /// 要分析的文本
        #[arg(short, long, default_value = "I really enjoyed this!")]
        text: String,
        /// `app.env` 所在目录
        #[arg(long, default_value = ".")]
        config_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // 加载 .env 文件（如果存在）
    if let Ok(dotenv_path) = std::env::var("GATEWAY_ENV_FILE") {
        dotenvy::from_path(&dotenv_path).ok();
    } else {
        dotenvy::dotenv().ok();
    }

    // 初始化日志系统
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| LogMode::from_env().default_filter().into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false),
        )
        .init();

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Serve {
        config_dir: PathBuf::from("."),
    });

    let result = match command {
        Commands::Serve { config_dir } => commands::serve_command(&config_dir).await,
        Commands::Test { text, config_dir } => match config::resolve_listen_addr(&config_dir) {
            Ok((host, port)) => commands::test_command(&host, port, &text).await,
            Err(e) => Err(e.into()),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

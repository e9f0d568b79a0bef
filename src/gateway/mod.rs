//! Gateway 应用层
//!
//! HTTP 服务器、路由和优雅关闭

mod handlers;
mod middleware;
mod state;

pub use state::AppState;

use std::any::Any;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    http::StatusCode,
    middleware as axum_middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tokio::{net::TcpListener, signal, sync::oneshot};
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::Config;
use crate::sentiment::{ForwardingService, SentimentService};

/// 单个入站请求的总时限，需大于出站超时
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// 收到关闭信号后等待进行中请求的时间
const SHUTDOWN_GRACE_SECS: u64 = 5;

pub async fn serve(config: Config) -> Result<()> {
    let service = ForwardingService::new(&config).context("Failed to create HTTP client")?;
    tracing::info!(endpoint = service.model_endpoint(), "Forwarding to model endpoint");

    let app = build_router(AppState::new(Arc::new(service)));
    let listener = TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr()))?;
    tracing::info!("Starting server on http://{}", listener.local_addr()?);

    run(listener, app, shutdown_signal()).await
}

pub fn build_router(state: AppState) -> Router {
    router_with_timeout(state, Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
}

fn router_with_timeout(state: AppState, request_timeout: Duration) -> Router {
    let api_routes = Router::new()
        .route("/health", get(handlers::handle_health))
        .route("/analyze", post(handlers::handle_analyze))
        // 旧路径，保留以兼容现有调用方
        .route("/model", post(handlers::handle_analyze));

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(axum_middleware::from_fn(middleware::request_logger))
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(panic_response))
                .layer(axum_middleware::from_fn(middleware::timeout_envelope))
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    request_timeout,
                )),
        )
        .with_state(state)
}

/// 运行服务器直到 `signal` 完成，然后最多等待 5 秒让进行中的请求结束
pub async fn run<F>(listener: TcpListener, app: Router, signal: F) -> Result<()>
where
    F: Future<Output = ()>,
{
    run_with_grace(listener, app, signal, Duration::from_secs(SHUTDOWN_GRACE_SECS)).await
}

/// 收到信号后停止接受新连接；超过 `grace` 仍有请求未结束时强制终止并返回错误
async fn run_with_grace<F>(
    listener: TcpListener,
    app: Router,
    signal: F,
    grace: Duration,
) -> Result<()>
where
    F: Future<Output = ()>,
{
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = stop_rx.await;
            })
            .await
    });

    tokio::select! {
        joined = &mut server => {
            joined.context("Server task failed")??;
            return Ok(());
        }
        _ = signal => {}
    }

    let _ = stop_tx.send(());

    match tokio::time::timeout(grace, &mut server).await {
        Ok(joined) => {
            joined.context("Server task failed")??;
            tracing::info!("Server shutdown complete");
            Ok(())
        }
        Err(_) => {
            server.abort();
            anyhow::bail!(
                "Server forced to shutdown: requests still running after {:?}",
                grace
            )
        }
    }
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = err
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| err.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_else(|| "unknown panic".to_string());

    tracing::error!("handler panicked: {details}");

    let body = handlers::ErrorResponse {
        error: "Internal server error".to_string(),
        details,
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    #[cfg(not(unix))]
    tokio::select! {
        _ = ctrl_c => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}

//! HTTP Server
//!
//! Axum HTTP 服务器启动和配置

use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::Router;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::middleware::{error_logging_middleware, method_not_allowed_body};
use super::routes::create_routes;
use super::state::AppState;

/// 构建完整应用（路由 + 中间件）
pub fn build_app(state: Arc<AppState>, max_body_bytes: usize) -> Router {
    // CORS 配置 - 允许所有来源的跨域请求
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .expose_headers(Any)
        .max_age(Duration::from_secs(3600));

    create_routes(state.clone())
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(middleware::from_fn(method_not_allowed_body))
        .layer(middleware::from_fn(error_logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// HTTP 服务器
pub struct HttpServer {
    addr: String,
    router: Router,
}

impl HttpServer {
    /// 创建新的 HTTP 服务器
    pub fn new(addr: impl Into<String>, state: AppState, max_body_bytes: usize) -> Self {
        Self {
            addr: addr.into(),
            router: build_app(Arc::new(state), max_body_bytes),
        }
    }

    /// 启动服务器（带优雅关闭）
    pub async fn run_with_shutdown<F>(self, shutdown_signal: F) -> Result<(), std::io::Error>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        info!("Starting HTTP server on {} (with graceful shutdown)", self.addr);

        let listener = TcpListener::bind(&self.addr).await?;
        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal)
            .await?;

        Ok(())
    }
}

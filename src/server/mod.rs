//! # HTTP 服务器
//!
//! Axum HTTP 服务器：装配路由、CORS 中间件与请求追踪

pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;

use crate::config::RelayConfig;
use crate::error::{RelayError, Result};
use crate::oauth::TokenExchangeClient;
use axum::Router;
use axum::http::HeaderValue;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// 应用状态
///
/// 请求之间共享的只读内容：配置与出站 HTTP 客户端
#[derive(Clone)]
pub struct AppState {
    config: Arc<RelayConfig>,
    exchange_client: TokenExchangeClient,
    allow_origin: HeaderValue,
}

impl AppState {
    /// 根据配置构造应用状态
    ///
    /// `allowed_origin` 无法作为合法响应头时报配置错误
    pub fn new(config: Arc<RelayConfig>) -> Result<Self> {
        let allow_origin =
            HeaderValue::from_str(&config.cors.allowed_origin).map_err(|e| {
                RelayError::config_with_source(
                    format!("invalid allowed_origin: {}", config.cors.allowed_origin),
                    e,
                )
            })?;

        let exchange_client = TokenExchangeClient::new(
            config.oauth.token_url.clone(),
            Duration::from_secs(config.oauth.request_timeout),
        );

        Ok(Self {
            config,
            exchange_client,
            allow_origin,
        })
    }

    /// 应用配置
    #[must_use]
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Token交换客户端
    #[must_use]
    pub const fn exchange_client(&self) -> &TokenExchangeClient {
        &self.exchange_client
    }

    /// CORS 允许来源响应头值
    #[must_use]
    pub const fn allow_origin(&self) -> &HeaderValue {
        &self.allow_origin
    }
}

/// 中继服务器
pub struct RelayServer {
    /// 配置
    config: Arc<RelayConfig>,
    /// 路由器
    router: Router,
}

impl RelayServer {
    /// 创建新的中继服务器
    pub fn new(config: RelayConfig) -> Result<Self> {
        let config = Arc::new(config);
        let state = AppState::new(config.clone())?;
        let router = Self::create_router(state);

        Ok(Self { config, router })
    }

    /// 创建路由器
    ///
    /// CORS 中间件在最外层，保证每个响应（包括预检）都带跨域头
    fn create_router(state: AppState) -> Router {
        routes::create_routes(state.clone())
            .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
            .layer(axum::middleware::from_fn_with_state(
                state,
                middleware::cors_middleware,
            ))
    }

    /// 测试与嵌入场景使用的路由器副本
    #[must_use]
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// 启动服务器
    pub async fn serve(self) -> Result<()> {
        let bind_address = self.config.server.bind_address.clone();
        let ip = bind_address.parse::<std::net::IpAddr>().map_err(|e| {
            RelayError::config_with_source(format!("invalid bind address '{bind_address}'"), e)
        })?;
        let addr = SocketAddr::new(ip, self.config.server.port);

        tracing::info!(%addr, "starting oauth relay server");

        let listener = TcpListener::bind(&addr).await?;

        axum::serve(listener, self.router)
            .await
            .map_err(|e| RelayError::network(format!("server error: {e}")))?;

        Ok(())
    }
}

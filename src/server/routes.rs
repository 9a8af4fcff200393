//! # 路由配置
//!
//! 定义所有API路由和路由组织

use super::AppState;
use axum::Router;
use axum::routing::get;

/// 创建所有路由
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        // 授权码兑换路由
        .nest("/api", auth_routes())
        // 存活探测
        .route("/ping", get(super::handlers::system::ping_handler))
        .with_state(state)
}

/// 授权相关路由
fn auth_routes() -> Router<AppState> {
    // OPTIONS 预检由 CORS 中间件统一应答，这里只注册 GET
    Router::new().route("/auth", get(super::handlers::auth::exchange_code))
}
